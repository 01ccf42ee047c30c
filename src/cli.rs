//! CLI argument parsing for orderpick
//!
//! Global flags: --format, --config, --quiet, --verbose, --log-level, --log-json

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use orderpick_core::config::CONFIG_FILE;
use orderpick_core::guard::ActionMode;

/// Output format for orderpick commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for machine consumption
    Json,
}

/// Orderpick - order line-item selection and location identifiers
#[derive(Parser, Debug)]
#[command(name = "orderpick")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Configuration file
    #[arg(long, global = true, env = "ORDERPICK_CONFIG", default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level or filter directive (overrides --verbose)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a selection session over a set of orders
    Select {
        /// JSON array of orders with their line items
        #[arg(long)]
        orders: PathBuf,

        /// JSON array of toggle steps to replay
        #[arg(long)]
        script: Option<PathBuf>,

        /// Session mode (defaults to the configured mode)
        #[arg(long, value_parser = parse_action_mode)]
        mode: Option<ActionMode>,

        /// JSON array of line items already attached to the entity
        #[arg(long)]
        existing: Option<PathBuf>,
    },

    /// Generate a free location identifier
    GenerateId {
        /// Organization id embedded in the identifier
        #[arg(long)]
        org: String,

        /// File of identifiers already in use, one per line
        #[arg(long)]
        taken: Option<PathBuf>,

        /// Continue after this taken identifier instead of a random seed
        #[arg(long)]
        from: Option<String>,
    },

    /// List a page of orders
    List {
        /// JSON array of orders with their line items
        #[arg(long)]
        orders: PathBuf,

        /// Zero-based page index
        #[arg(long, default_value_t = 0)]
        page: usize,

        /// Orders per page (defaults to the configured page size)
        #[arg(long)]
        page_size: Option<usize>,

        /// Case-insensitive match on order id or purchase order number
        #[arg(long)]
        search: Option<String>,

        /// Sort key: CREATED_DATE, PURCHASE_ORDER_NUMBER or ID
        #[arg(long, default_value = "CREATED_DATE")]
        sort_by: String,

        /// Sort direction: ASC or DESC
        #[arg(long, default_value = "DESC")]
        direction: String,

        /// Only orders ready for booking
        #[arg(long)]
        bookable: bool,
    },
}

fn parse_action_mode(s: &str) -> Result<ActionMode, String> {
    s.parse::<ActionMode>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_select_with_mode() {
        let cli = Cli::try_parse_from([
            "orderpick", "select", "--orders", "o.json", "--mode", "edit",
        ])
        .unwrap();
        match cli.command {
            Commands::Select { mode, .. } => assert_eq!(mode, Some(ActionMode::Edit)),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_bad_mode_is_rejected() {
        assert!(Cli::try_parse_from([
            "orderpick", "select", "--orders", "o.json", "--mode", "update",
        ])
        .is_err());
    }
}
