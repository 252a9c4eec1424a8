//! CLI argument definitions using clap
//!
//! Commands:
//! - searchkit compile --models <dir> --entity <name> [--config <path>]
//! - searchkit check --models <dir> --entity <name> <path>...

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// searchkit - compile search requests into authorized query criteria
#[derive(Parser, Debug)]
#[command(name = "searchkit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a search request read from stdin
    Compile {
        /// Directory of entity model files (*.json)
        #[arg(long)]
        models: PathBuf,

        /// Root entity of the search
        #[arg(long)]
        entity: String,

        /// Path to compiler configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Report whether field paths may be filtered and sorted on
    Check {
        /// Directory of entity model files (*.json)
        #[arg(long)]
        models: PathBuf,

        /// Root entity of the paths
        #[arg(long)]
        entity: String,

        /// Dotted field paths
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compile() {
        let cli = Cli::try_parse_from([
            "searchkit", "compile", "--models", "./models", "--entity", "pets",
        ])
        .unwrap();

        match cli.command {
            Command::Compile {
                models,
                entity,
                config,
            } => {
                assert_eq!(models, PathBuf::from("./models"));
                assert_eq!(entity, "pets");
                assert!(config.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_check_requires_paths() {
        let result = Cli::try_parse_from(["searchkit", "check", "--models", "m", "--entity", "pets"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from([
            "searchkit", "check", "--models", "m", "--entity", "pets", "name", "owner.name",
        ])
        .unwrap();
        match cli.command {
            Command::Check { paths, .. } => assert_eq!(paths, vec!["name", "owner.name"]),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
