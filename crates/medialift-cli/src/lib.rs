//! medialift CLI Library
//!
//! Moves a batch of media files through three manifest-driven stages.
//!
//! # Overview
//!
//! - **Rename**: give every requested destination name a collision-free
//!   numbered form (`medialift rename`)
//! - **Fetch**: download each record from its source URL into a local folder,
//!   skipping files already present (`medialift fetch`)
//! - **Publish**: upload fetched files to the destination as ContentVersion
//!   records (`medialift publish`)
//!
//! Every stage reads a CSV manifest, enriches each row with its outcome and
//! writes the whole set back out, so the output of one stage feeds the next
//! and a re-run picks up where the last one stopped.

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod api;
pub mod commands;
pub mod config;
pub mod dedupe;
pub mod error;
pub mod fetch;
pub mod manifest;
pub mod progress;
pub mod publish;

// Re-export commonly used types
pub use config::Config;
pub use error::{CliError, Result};
pub use manifest::Manifest;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// medialift - rename, fetch and publish media files from CSV manifests
#[derive(Parser, Debug)]
#[command(name = "medialift")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print the full command reference as Markdown
    #[arg(long, hide = true)]
    pub markdown_help: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assign unique numbered names to every row's `new_name`
    Rename {
        /// Input manifest with a `new_name` column
        #[arg(short, long, default_value = "input.csv")]
        input: PathBuf,

        /// Output manifest with an added `renamed` column
        #[arg(short, long, default_value = "deduped_files.csv")]
        output: PathBuf,
    },

    /// Download every row's `s3_url` into the download directory
    Fetch {
        /// Input manifest with `filename`, `s3_url` and `new_name` (or `renamed`) columns
        #[arg(short, long, default_value = "download_files.csv")]
        input: PathBuf,

        /// Output manifest with per-row transfer results
        #[arg(short, long, default_value = "download_results.csv")]
        output: PathBuf,

        /// Download directory [env: MEDIALIFT_DOWNLOAD_DIR]
        #[arg(short, long)]
        download_dir: Option<PathBuf>,

        /// Pause between downloads in milliseconds [env: MEDIALIFT_FETCH_DELAY_MS, default: 100]
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Fail a download after this many seconds without receiving data [env: MEDIALIFT_TIMEOUT_SECS, default: 300]
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Upload every fetched row as a ContentVersion
    Publish {
        /// Input manifest with `Title`, `PathOnClient` and `S3_URL` columns, or the fetch stage's output
        #[arg(short, long, default_value = "files.csv")]
        input: PathBuf,

        /// Output manifest with per-row upload results
        #[arg(short, long, default_value = "upload_results.csv")]
        output: PathBuf,

        /// Destination instance URL [env: MEDIALIFT_INSTANCE_URL]
        #[arg(long)]
        instance_url: Option<String>,

        /// Destination bearer token [env: MEDIALIFT_ACCESS_TOKEN]
        #[arg(long)]
        access_token: Option<String>,

        /// Destination REST API version [env: MEDIALIFT_API_VERSION, default: 64.0]
        #[arg(long)]
        api_version: Option<String>,

        /// Fail a request after this many seconds without receiving data [env: MEDIALIFT_TIMEOUT_SECS, default: 300]
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_rename_defaults() {
        let cli = Cli::try_parse_from(["medialift", "rename"]).unwrap();
        match cli.command {
            Some(Commands::Rename { input, output }) => {
                assert_eq!(input, PathBuf::from("input.csv"));
                assert_eq!(output, PathBuf::from("deduped_files.csv"));
            },
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_publish_flags() {
        let cli = Cli::try_parse_from([
            "medialift",
            "publish",
            "--instance-url",
            "https://example.my.salesforce.com",
            "--access-token",
            "token",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Publish {
                instance_url,
                access_token,
                api_version,
                ..
            }) => {
                assert_eq!(instance_url.as_deref(), Some("https://example.my.salesforce.com"));
                assert_eq!(access_token.as_deref(), Some("token"));
                assert!(api_version.is_none());
            },
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["medialift"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.markdown_help);
    }
}
