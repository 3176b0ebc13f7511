//! CLI module for the ingestion tool.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use crate::models::OutputFormat;

/// Embed contract and support-ticket datasets and load them into Qdrant.
#[derive(Debug, Parser)]
#[command(name = "support-ingest")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(long, short = 'f', global = true, help = "Output format: text or json")]
    pub format: Option<OutputFormat>,

    #[arg(long, short = 'v', global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Defaults to `upsert` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Recreate the collections and upload freshly embedded datasets
    Upsert(commands::UpsertArgs),

    /// Check the embedding service and collection state
    Status,

    /// Find the records closest to a free-text query
    Search(commands::SearchArgs),
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Upsert(commands::UpsertArgs::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_upsert() {
        let cli = Cli::try_parse_from(["support-ingest"]).unwrap();
        assert!(cli.command.is_none());
        assert!(matches!(cli.command.unwrap_or_default(), Commands::Upsert(_)));
    }

    #[test]
    fn test_upsert_flags() {
        let cli = Cli::try_parse_from([
            "support-ingest",
            "--format",
            "json",
            "upsert",
            "--batch-size",
            "3",
            "--dataset",
            "tickets",
            "--validate-only",
        ])
        .unwrap();

        assert_eq!(cli.format, Some(OutputFormat::Json));
        let Some(Commands::Upsert(args)) = cli.command else {
            panic!("expected upsert");
        };
        assert_eq!(args.batch_size, Some(3));
        assert_eq!(args.datasets, vec!["tickets".to_string()]);
        assert!(args.validate_only);
    }

    #[test]
    fn test_search_args() {
        let cli = Cli::try_parse_from([
            "support-ingest",
            "search",
            "refund for late delivery",
            "--collection",
            "tickets",
            "-n",
            "3",
        ])
        .unwrap();

        let Some(Commands::Search(args)) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.query, "refund for late delivery");
        assert_eq!(args.collection.as_deref(), Some("tickets"));
        assert_eq!(args.limit, 3);
    }

    #[test]
    fn test_search_defaults() {
        let cli = Cli::try_parse_from(["support-ingest", "search", "login loop"]).unwrap();
        let Some(Commands::Search(args)) = cli.command else {
            panic!("expected search");
        };
        assert!(args.collection.is_none());
        assert_eq!(args.limit, commands::DEFAULT_SEARCH_LIMIT);
    }

    #[test]
    fn test_search_requires_query() {
        assert!(Cli::try_parse_from(["support-ingest", "search"]).is_err());
    }
}
