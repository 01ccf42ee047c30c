//! `orderpick generate-id` command - pick a free location identifier
//!
//! Ctrl-C cancels the walk between oracle checks.

use std::path::Path;

use orderpick_core::config::EngineConfig;
use orderpick_core::error::Result;
use orderpick_core::identifier::{
    FileOracle, IdentifierGenerator, OrgContext, SetOracle, UniquenessOracle,
};

use crate::cli::{Cli, OutputFormat};

/// Execute the generate-id command
pub fn execute(
    cli: &Cli,
    config: &EngineConfig,
    org: &str,
    taken: Option<&Path>,
    from: Option<&str>,
) -> Result<()> {
    match taken {
        Some(path) => {
            tracing::debug!(path = %path.display(), "checking against taken file");
            run(cli, config, FileOracle::new(path), org, from)
        }
        None => run(cli, config, SetOracle::default(), org, from),
    }
}

fn run<O: UniquenessOracle>(
    cli: &Cli,
    config: &EngineConfig,
    oracle: O,
    org: &str,
    from: Option<&str>,
) -> Result<()> {
    let mut generator = IdentifierGenerator::new(oracle, config.identifier.clone());

    let cancel = generator.cancel_token();
    let _ = ctrlc::set_handler(move || {
        cancel.cancel();
    });

    let org = OrgContext::new(org);
    let generated = match from {
        Some(value) => generator.next_available(&org, value)?,
        None => generator.generate_detailed(&org)?,
    };

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&generated)?);
        }
        OutputFormat::Human => {
            println!("{}", generated.value);
            if !cli.quiet && generated.collisions > 0 {
                eprintln!("skipped {} identifiers already in use", generated.collisions);
            }
        }
    }

    Ok(())
}
