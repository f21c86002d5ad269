//! pagesel - Entry Point

use clap::Parser;
use pagesel::config::{self, CliOverrides};
use pagesel::source::{load_records, CollectingSink, JsonFileSink, MemorySource, SelectionSink};
use pagesel::state::{ListController, SelectionSet, SessionState};
use pagesel::view::{self, SessionParts};
use pagesel::view_state::ColumnRenderer;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// pagesel - pick records from a paginated list
#[derive(Parser, Debug)]
#[command(name = "pagesel")]
#[command(version)]
#[command(about = "Select records from a windowed, incrementally fetched list")]
pub struct Args {
    /// Records to page through (JSON array or JSON Lines, each with an `_id`)
    pub records: PathBuf,

    /// Records selected when the session starts
    #[arg(long)]
    pub selected: Option<PathBuf>,

    /// Write the saved selection here instead of printing it to stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Field the search box filters on
    #[arg(long)]
    pub filter_field: Option<String>,

    /// Records per fetched page
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub page_size: Option<u64>,

    /// Quiet period before a search edit is applied
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// Simulated latency of every page fetch
    #[arg(long)]
    pub latency_ms: Option<u64>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            filter_field: self.filter_field.clone(),
            page_size: self
                .page_size
                .map(|size| usize::try_from(size).unwrap_or(usize::MAX)),
            debounce_ms: self.debounce_ms,
            latency_ms: self.latency_ms,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = config::load_config_with_precedence(args.config.clone())?;
        let merged = config::merge_config(config_file);
        let with_env = config::apply_env_overrides(merged);
        config::apply_cli_overrides(with_env, args.overrides())
    };
    let list_config = config.list_config()?;

    pagesel::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let records = load_records(&args.records)?;
    let selected = match &args.selected {
        Some(path) => load_records(path)?,
        None => Vec::new(),
    };
    info!(
        records = records.len(),
        selected = selected.len(),
        "Records loaded"
    );

    let source = MemorySource::new(records, config.page_size)
        .with_latency(Duration::from_millis(config.latency_ms));

    let collected = CollectingSink::new();
    let sink: Box<dyn SelectionSink> = match &args.output {
        Some(path) => Box::new(JsonFileSink::new(path)),
        None => Box::new(collected.clone()),
    };

    let parts = SessionParts {
        controller: ListController::new(list_config, SelectionSet::from_records(selected)),
        renderer: Box::new(ColumnRenderer::new(config.columns.clone())),
        sink,
        source: Arc::new(source),
        title: config.title.clone(),
    };

    match view::run_session(parts)? {
        SessionState::Saved => match &args.output {
            Some(path) => eprintln!("Selection written to {}", path.display()),
            None => {
                let saved = collected.saved().unwrap_or_default();
                println!("{}", serde_json::to_string_pretty(&saved)?);
            }
        },
        SessionState::Cancelled | SessionState::Open => eprintln!("Cancelled; nothing saved"),
    }

    Ok(())
}
