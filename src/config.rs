//! Configuration handling for tabstore

use std::thread;
use std::time::Duration;

/// Default capacity of the line and row channels
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Default interval between progress log lines
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// Output format for the load summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(OutputFormat::Terminal),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Tuning for the ingestion pipeline
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of parser workers
    pub workers: usize,
    /// Capacity of the channel between the line producer and the workers
    pub line_capacity: usize,
    /// Capacity of the channel between the workers and the aggregator
    pub row_capacity: usize,
    /// How often the aggregator logs its progress
    pub progress_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            line_capacity: DEFAULT_CHANNEL_CAPACITY,
            row_capacity: DEFAULT_CHANNEL_CAPACITY,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl Config {
    /// Set the number of parser workers (at least one)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set both channel capacities (at least one)
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.line_capacity = capacity.max(1);
        self.row_capacity = capacity.max(1);
        self
    }

    /// Set the progress log interval
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }
}

/// Logical CPU count, falling back to a single worker
fn default_workers() -> usize {
    thread::available_parallelism().map_or(1, |n| n.get())
}
