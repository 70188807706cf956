use crate::core::RegistryConfig;
use crate::logging::LogFormat;
use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Process prepaid card commands
#[derive(Parser, Debug)]
#[command(name = "prepaid-card-engine")]
#[command(
    about = "Process prepaid card commands: loads, authorization holds, captures and refunds",
    long_about = None
)]
pub struct CliArgs {
    /// Input CSV file path containing command records
    #[arg(value_name = "INPUT", help = "Path to the input command CSV file")]
    pub input_file: PathBuf,

    /// Processing strategy to use for applying commands
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for synchronous or 'async' for asynchronous"
    )]
    pub strategy: StrategyType,

    /// Number of commands per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of commands per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of worker threads (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of worker threads (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Seed for card number generation
    #[arg(
        long = "seed",
        value_name = "SEED",
        help = "Seed the card number generator for reproducible card numbers"
    )]
    pub seed: Option<u64>,

    /// Attempts to find an unused card number
    #[arg(
        long = "max-card-number-attempts",
        value_name = "COUNT",
        help = "Attempts to find an unused card number before giving up (default: 5)"
    )]
    pub max_card_number_attempts: Option<usize>,

    /// Interval between periodic card reports (async mode only)
    #[arg(
        long = "report-interval",
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Log a report of every card every SECS seconds while processing"
    )]
    pub report_interval: Option<u64>,

    /// Default log filter
    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        default_value = "info",
        help = "Log filter used when RUST_LOG is not set"
    )]
    pub log_level: String,

    /// Log output format
    #[arg(
        long = "log-format",
        value_name = "FORMAT",
        default_value = "pretty",
        help = "Log format: 'pretty' or 'json'"
    )]
    pub log_format: LogFormat,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values take their defaults; zero values fall back to the
    /// defaults with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Create a RegistryConfig from CLI arguments
    pub fn to_registry_config(&self) -> RegistryConfig {
        match self.max_card_number_attempts {
            Some(attempts) => RegistryConfig::new(self.seed, attempts),
            None => RegistryConfig {
                seed: self.seed,
                ..RegistryConfig::default()
            },
        }
    }

    /// Interval between periodic card reports, if requested
    pub fn report_interval(&self) -> Option<Duration> {
        self.report_interval.map(Duration::from_secs)
    }
}
