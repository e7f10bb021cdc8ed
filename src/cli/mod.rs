//! CLI module - Command-line interface for revkart
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// revkart - product review scraper
/// Scrapes product reviews for a search term and caches them by term
#[derive(Parser)]
#[command(name = "revkart")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server (default)
    #[command(alias = "web")]
    Serve,

    /// Search for products and print their reviews
    #[command(alias = "s")]
    Scrape {
        /// Search query; words are joined with the configured separator
        #[arg(required = true)]
        query: Vec<String>,

        /// Scrape even when the term is already cached
        #[arg(long)]
        no_cache: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show cached products for a search without scraping
    #[command(alias = "l")]
    Lookup {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List stored scrapes for a search
    #[command(alias = "h")]
    History {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,

        /// Number of entries to show
        #[arg(long, default_value = "20")]
        limit: u64,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["revkart"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_scrape_collects_query_words() {
        let cli = Cli::try_parse_from(["revkart", "scrape", "red", "phone", "--no-cache"]).unwrap();
        match cli.command {
            Some(Commands::Scrape {
                query,
                no_cache,
                json,
            }) => {
                assert_eq!(query, vec!["red".to_string(), "phone".to_string()]);
                assert!(no_cache);
                assert!(!json);
            }
            _ => panic!("expected scrape command"),
        }
    }

    #[test]
    fn test_history_limit_default() {
        let cli = Cli::try_parse_from(["revkart", "history", "tv"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::History { limit: 20, .. })
        ));
    }

    #[test]
    fn test_scrape_requires_query() {
        assert!(Cli::try_parse_from(["revkart", "scrape"]).is_err());
    }
}
