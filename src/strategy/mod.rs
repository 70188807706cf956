//! Processing strategies
//!
//! A strategy reads a command file, applies every command to a fresh card
//! registry and writes the final card report.
//!
//! - `sync` - Single-threaded, one row at a time
//! - `async` - Batches processed on a tokio runtime, cards in parallel

use crate::cli::StrategyType;
use crate::core::RegistryConfig;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Common interface of the processing strategies
pub trait ProcessingStrategy: Send + Sync {
    /// Process a command file and write the card report to `output`
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The file was processed; rejected commands are logged, not returned
    /// * `Err(String)` - A fatal error (file not readable, runtime failure, write failure)
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String>;
}

/// Create a processing strategy
///
/// # Arguments
///
/// * `strategy_type` - Which strategy to build
/// * `config` - Batch settings for the async strategy; defaults when `None`
/// * `registry` - Settings of the card registry the strategy creates
/// * `report_interval` - Period of the card report log (async strategy only)
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
    registry: RegistryConfig,
    report_interval: Option<Duration>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(registry)),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(
                AsyncProcessingStrategy::new(config, registry).with_report_interval(report_interval),
            )
        }
    }
}
