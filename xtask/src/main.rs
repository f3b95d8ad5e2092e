//! Build automation tasks for medialift
//!
//! - Generating the CLI reference from the clap definitions

use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for medialift", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate the CLI reference in Markdown
    GenerateCliDocs {
        /// Output directory for generated documentation
        #[arg(short, long, default_value = "docs")]
        output_dir: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateCliDocs { output_dir } => generate_cli_docs(&output_dir)?,
    }

    Ok(())
}

fn generate_cli_docs(output_dir: &str) -> anyhow::Result<()> {
    println!("Generating CLI documentation...");

    let markdown = clap_markdown::help_markdown::<medialift_cli::Cli>();

    let content = format!(
        r#"# medialift CLI Reference

This documentation is auto-generated from the CLI source code. Last updated: {}.

## Overview

medialift moves a batch of media files through three stages, each driven by a
CSV manifest whose output is the next stage's input:

1. `rename` numbers every requested name (`a.mp4` becomes `a-1.mp4`, `a-2.mp4`, ...)
2. `fetch` downloads each row's `s3_url`, skipping files already on disk
3. `publish` uploads the files as Salesforce ContentVersion records

## Quick Start

```bash
medialift rename --input input.csv --output deduped_files.csv
medialift fetch --input deduped_files.csv --download-dir ./downloads
medialift publish --input files.csv \
  --instance-url https://example.my.salesforce.com \
  --access-token "$TOKEN"
```

Re-running `fetch` is safe: rows whose file already exists are reported as
`skipped_exists` and nothing is downloaded again.

## Commands

{}

## Environment Variables

A `.env` file in the working directory is loaded before these are read.
Command-line flags take precedence.

- `MEDIALIFT_DOWNLOAD_DIR` - Download directory (default: `<Downloads>/medialift`)
- `MEDIALIFT_FETCH_DELAY_MS` - Pause between downloads (default: `100`)
- `MEDIALIFT_TIMEOUT_SECS` - Seconds a connection may go without data (default: `300`)
- `MEDIALIFT_INSTANCE_URL` - Destination instance URL
- `MEDIALIFT_ACCESS_TOKEN` - Destination bearer token
- `MEDIALIFT_API_VERSION` - Destination REST API version (default: `64.0`)
- `MEDIALIFT_LOG_LEVEL` - `trace`, `debug`, `info`, `warn`, `error`
- `MEDIALIFT_LOG_OUTPUT` - `console` (stderr) or `file`
- `MEDIALIFT_LOG_FORMAT` - `text` or `json`
- `MEDIALIFT_LOG_DIR` - Directory for log files

## Manifest Columns

| Stage | Reads | Adds |
|---|---|---|
| rename | `new_name` | `renamed` |
| fetch | `s3_url`, `renamed` or `new_name`, `filename` | `local_path`, `transfer_status`, `checksum`, `error_detail` |
| publish | `Title`, `PathOnClient`, `S3_URL` (or `s3_url`), `local_path`, `transfer_status` | `Status`, `Message`, `ContentVersionId` |

---

*This documentation is automatically generated from the CLI source code. To update, run `cargo xtask generate-cli-docs`.*
"#,
        chrono::Utc::now().format("%Y-%m-%d"),
        markdown
    );

    let output_path = PathBuf::from(output_dir);
    fs::create_dir_all(&output_path)?;

    let file_path = output_path.join("cli.md");
    fs::write(&file_path, content)?;

    println!("✅ Generated CLI documentation at: {}", file_path.display());

    Ok(())
}
