//! Command dispatch logic for orderpick

use orderpick_core::config::EngineConfig;
use orderpick_core::error::Result;

use crate::cli::{Cli, Commands};
use crate::commands;

pub fn run(cli: &Cli) -> Result<()> {
    let config = EngineConfig::load_or_default(&cli.config)?;

    match &cli.command {
        Commands::Select {
            orders,
            script,
            mode,
            existing,
        } => commands::select::execute(
            cli,
            &config,
            orders,
            script.as_deref(),
            *mode,
            existing.as_deref(),
        ),

        Commands::GenerateId { org, taken, from } => {
            commands::generate_id::execute(cli, &config, org, taken.as_deref(), from.as_deref())
        }

        Commands::List {
            orders,
            page,
            page_size,
            search,
            sort_by,
            direction,
            bookable,
        } => commands::list::execute(
            cli,
            &config,
            orders,
            commands::list::ListOptions {
                page: *page,
                page_size: *page_size,
                search: search.as_deref(),
                sort_by,
                direction,
                bookable: *bookable,
            },
        ),
    }
}
