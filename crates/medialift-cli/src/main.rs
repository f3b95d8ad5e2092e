//! medialift CLI - Main entry point

use clap::Parser;
use medialift_cli::{commands, Cli, Commands, Config};
use medialift_common::logging::{init_logging, LogConfig, LogLevel};
use std::process;
use std::time::Duration;
use tracing::error;

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.markdown_help {
        println!("{}", clap_markdown::help_markdown::<Cli>());
        return;
    }

    if cli.command.is_none() {
        eprintln!("Error: A subcommand is required");
        eprintln!();
        eprintln!("For more information, try '--help'.");
        process::exit(2);
    }

    let level = if cli.verbose { LogLevel::Debug } else { LogLevel::Warn };
    let base = LogConfig::default().with_level(level);

    // Environment variables take precedence over the verbose flag
    let log_config = base.clone().merge_env().unwrap_or(base);

    // The CLI works without logging, but a file guard must outlive the command
    let _guard = init_logging(&log_config).ok().flatten();

    if let Err(e) = execute_command(&cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> medialift_cli::Result<()> {
    let Some(ref command) = cli.command else {
        return Ok(());
    };

    let mut config = Config::from_env()?;

    match command {
        Commands::Rename { input, output } => commands::rename::run(input, output).await,

        Commands::Fetch {
            input,
            output,
            download_dir,
            delay_ms,
            timeout_secs,
        } => {
            if let Some(dir) = download_dir {
                config.download_dir = dir.clone();
            }
            if let Some(ms) = delay_ms {
                config.fetch_delay = Duration::from_millis(*ms);
            }
            if let Some(secs) = timeout_secs {
                config.timeout = Duration::from_secs(*secs);
            }
            commands::fetch::run(input, output, &config).await
        },

        Commands::Publish {
            input,
            output,
            instance_url,
            access_token,
            api_version,
            timeout_secs,
        } => {
            if let Some(url) = instance_url {
                config.set_instance_url(url.clone());
            }
            if let Some(token) = access_token {
                config.access_token = Some(token.clone());
            }
            if let Some(version) = api_version {
                config.api_version = version.clone();
            }
            if let Some(secs) = timeout_secs {
                config.timeout = Duration::from_secs(*secs);
            }
            commands::publish::run(input, output, &config).await
        },
    }
}
