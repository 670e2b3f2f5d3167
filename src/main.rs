//! blockcraft - headless crafting and inventory session runner
//!
//! Replays a JSON step script against a player inventory and prints the
//! final state as JSON.

mod config;
mod script;

use anyhow::{Context, Result};
use blockcraft_crafting::RecipeBook;
use blockcraft_testkit::JsonlSink;
use clap::Parser;
use config::SessionConfig;
use script::SessionRunner;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless crafting session runner", long_about = None)]
struct Args {
    /// Session script (JSON list of steps)
    #[arg(short, long)]
    script: PathBuf,

    /// Session config (TOML); defaults to config/session.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Recipe table (JSON); overrides the config and the built-in table
    #[arg(short, long)]
    recipes: Option<PathBuf>,

    /// Write one JSONL event per applied step
    #[arg(long)]
    events: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over --log-level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting blockcraft v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => SessionConfig::load_from_path(path),
        None => SessionConfig::load(),
    };

    let book = match args.recipes.as_ref().or(config.recipes.as_ref()) {
        Some(path) => RecipeBook::load_from_file(path)
            .with_context(|| format!("Failed to load recipes from {}", path.display()))?,
        None => RecipeBook::with_defaults(),
    };
    info!(recipes = book.len(), "Recipe table ready");

    let steps = script::load_steps(&args.script)?;
    let mut runner = SessionRunner::new(&book, config.starting_inventory());
    if let Some(path) = &args.events {
        let sink = JsonlSink::create(path)
            .with_context(|| format!("Failed to create event log {}", path.display()))?;
        runner = runner.with_events(sink);
    }

    let report = runner.run(&steps)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
