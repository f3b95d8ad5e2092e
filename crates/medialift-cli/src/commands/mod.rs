//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function that loads the
//! input manifest, runs one stage over every row, writes the enriched
//! manifest and prints a summary to stdout.

pub mod fetch;
pub mod publish;
pub mod rename;
