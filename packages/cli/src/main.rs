#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for kvsheet.
//!
//! `kvsheet extract` runs a batch extraction from a PDF to an XLSX
//! workbook, `kvsheet inspect` shows how a PDF would be chunked without
//! calling the model, and `kvsheet` with no subcommand starts the
//! interactive flow.
//!
//! Uses `indicatif-log-bridge` (via [`kvsheet_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.

mod batch;
mod config;
mod inspect;
mod interactive;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::batch::{DEFAULT_INPUT, ExtractArgs};
use crate::config::FileConfig;

#[derive(Parser)]
#[command(name = "kvsheet", about = "Extract key/value pairs from a PDF into an Excel sheet")]
struct Cli {
    /// TOML config file (default: `kvsheet.toml` in the working directory, if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract key/value pairs from a PDF and write them to a workbook
    Extract(ExtractArgs),
    /// Show page, character and chunk counts without calling the model
    Inspect {
        /// PDF to read
        #[arg(long, default_value = DEFAULT_INPUT)]
        input: PathBuf,
        /// Maximum characters per chunk (default: 6000)
        #[arg(long)]
        chunk_limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = kvsheet_cli_utils::init_logger();
    let cli = Cli::parse();

    let file = FileConfig::load(cli.config.as_deref())?;

    let Some(command) = cli.command else {
        return interactive::run(&multi, &file).await;
    };

    match command {
        Commands::Extract(args) => batch::run(&args, &file).await?,
        Commands::Inspect { input, chunk_limit } => {
            let limit = chunk_limit
                .or(file.pipeline.chunk_limit)
                .unwrap_or(kvsheet_chunk::DEFAULT_BATCH_CHUNK_LIMIT);
            inspect::run(&input, limit)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["kvsheet"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn config_flag_is_global() {
        let cli =
            Cli::try_parse_from(["kvsheet", "extract", "--config", "custom.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(cli.command, Some(Commands::Extract(_))));
    }

    #[test]
    fn inspect_defaults() {
        let cli = Cli::try_parse_from(["kvsheet", "inspect"]).unwrap();
        match cli.command {
            Some(Commands::Inspect { input, chunk_limit }) => {
                assert_eq!(input, PathBuf::from(DEFAULT_INPUT));
                assert_eq!(chunk_limit, None);
            }
            _ => panic!("expected inspect"),
        }
    }
}
