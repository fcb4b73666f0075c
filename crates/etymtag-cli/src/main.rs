//! etymtag - Tag Estonian tokens with their etymological origin.

use clap::Parser;
use etymtag_cli::commands;
use etymtag_cli::{Cli, Command, Config, Formatter};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> etymtag_cli::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.database = db;
    }
    debug!("Using lexicon cache at {}", config.database);

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Tag(args) => commands::execute_tag(args, &config, &formatter).await?,
        Command::Seed(args) => commands::execute_seed(args, &config, &formatter).await?,
        Command::Purge(args) => commands::execute_purge(args, &config, &formatter).await?,
        Command::Show(args) => commands::execute_show(args, &config, &formatter).await?,
        Command::Render(args) => commands::execute_render(args, &formatter).await?,
    }

    Ok(())
}

/// Logs go to stderr so JSONL on stdout stays clean.
fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(format!("etymtag={}", level)),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("etymtag=info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
