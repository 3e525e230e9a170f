//! tabstore - Load tab-delimited files into an in-memory relation store

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use tabstore::config::{Config, OutputFormat, DEFAULT_CHANNEL_CAPACITY};
use tabstore::output::render_to_stdout;
use tabstore::Store;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Terminal,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Terminal => OutputFormat::Terminal,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Load tab-delimited files into named relations and report what was stored
#[derive(Parser, Debug)]
#[command(name = "tabstore")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Tab-delimited files to load; each is stored under its base name
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Number of parser workers (defaults to the logical CPU count)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Capacity of the line and row channels
    #[arg(long, default_value_t = DEFAULT_CHANNEL_CAPACITY)]
    channel_capacity: usize,

    /// Interval between progress log lines, in milliseconds
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    progress_ms: u64,

    /// Summary format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: CliOutputFormat,

    /// Print up to this many rows of each relation
    #[arg(long, default_value_t = 0)]
    preview: usize,
}

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok((loaded, failed)) => {
            if failed == 0 {
                ExitCode::SUCCESS
            } else if loaded > 0 {
                ExitCode::from(1) // Some files were skipped
            } else {
                ExitCode::from(2) // Nothing loaded
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run() -> Result<(usize, usize)> {
    let cli = Cli::parse();

    let mut config = Config::default()
        .with_channel_capacity(cli.channel_capacity)
        .with_progress_interval(Duration::from_millis(cli.progress_ms));
    if let Some(workers) = cli.workers {
        config = config.with_workers(workers);
    }

    let mut store = Store::with_config(config);
    let results = store.add_all(&cli.files);

    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    let loaded = results.len() - failed;

    render_to_stdout(&store, cli.preview, cli.format.into())
        .context("failed to write summary")?;

    Ok((loaded, failed))
}
