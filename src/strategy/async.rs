//! Asynchronous batch processing strategy
//!
//! Reads the command file in batches and applies each batch on a tokio
//! multi-thread runtime, one task per card. Batches run one after another, so
//! a card's commands are applied in file order even when they span batches.
//!
//! With a report interval configured, a background task logs a report of
//! every card at that period until processing finishes.

use crate::core::{BatchProcessor, CardRegistry, CommandEngine, RegistryConfig};
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::write_cards_csv;
use crate::strategy::ProcessingStrategy;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Batch settings for the async strategy
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of commands read per batch
    pub batch_size: usize,

    /// Number of runtime worker threads
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a config, falling back to the defaults for zero values
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size,
                default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            tracing::warn!(
                "Invalid max_concurrent_batches ({}), using default ({})",
                max_concurrent_batches,
                default.max_concurrent_batches
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
    registry: RegistryConfig,
    report_interval: Option<Duration>,
}

impl AsyncProcessingStrategy {
    /// Create a strategy with the given batch and registry settings
    pub fn new(config: BatchConfig, registry: RegistryConfig) -> Self {
        Self {
            config,
            registry,
            report_interval: None,
        }
    }

    /// Log a report of every card at `interval` while processing
    ///
    /// A zero interval disables the report.
    pub fn with_report_interval(mut self, interval: Option<Duration>) -> Self {
        self.report_interval = interval.filter(|period| !period.is_zero());
        self
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .enable_time()
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        runtime.block_on(async {
            let registry = Arc::new(CardRegistry::new(self.registry.clone()));
            let engine = Arc::new(CommandEngine::new(registry));
            let processor = BatchProcessor::new(Arc::clone(&engine));

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;

            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            let reporter = self.report_interval.map(|period| {
                let engine = Arc::clone(&engine);
                tokio::spawn(async move {
                    let mut ticker = tokio::time::interval(period);
                    // The first tick completes immediately
                    ticker.tick().await;
                    loop {
                        ticker.tick().await;
                        engine.log_card_reports();
                    }
                })
            });

            loop {
                let batch = reader.read_batch(self.config.batch_size).await;

                if batch.is_empty() {
                    break;
                }

                let size = batch.len();
                let accepted = processor.process_batch(batch).await;
                tracing::debug!(size, accepted, "Batch processed");
            }

            if let Some(reporter) = reporter {
                reporter.abort();
            }

            write_cards_csv(&engine.card_reports(), output)?;

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn strategy(batch_size: usize) -> AsyncProcessingStrategy {
        AsyncProcessingStrategy::new(
            BatchConfig::new(batch_size, 2),
            RegistryConfig::new(Some(1), 5),
        )
    }

    #[test]
    fn test_batch_config_zero_values_fall_back_to_defaults() {
        let config = BatchConfig::new(0, 0);

        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.max_concurrent_batches, num_cpus::get());
    }

    #[test]
    fn test_async_strategy_processes_multiple_cards() {
        let file = create_temp_csv(
            "type,card,hold,amount,name,currency\n\
             create,alice,,,Ada Lovelace,GBP\n\
             create,bob,,,Grace Hopper,USD\n\
             load,bob,,20.00,,\n\
             load,alice,,10.00,,\n",
        );
        let mut output = Vec::new();

        strategy(1000).process(file.path(), &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("alice,"));
        assert!(lines[1].ends_with(",Ada Lovelace,GBP,10.00,0.00,10.00,10.00,true"));
        assert!(lines[2].starts_with("bob,"));
        assert!(lines[2].ends_with(",Grace Hopper,USD,20.00,0.00,20.00,20.00,true"));
    }

    #[test]
    fn test_async_strategy_maintains_ordering_across_batches() {
        let file = create_temp_csv(
            "type,card,hold,amount,name,currency\n\
             create,alice,,,Ada Lovelace,GBP\n\
             load,alice,,10.00,,\n\
             authorize,alice,h1,10.00,Coffee Shop,\n\
             capture,alice,h1,4.00,,\n\
             refund,alice,h1,1.00,,\n",
        );
        let mut output = Vec::new();

        strategy(1).process(file.path(), &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[1].ends_with(",10.00,6.00,7.00,1.00,true"));
    }

    #[test]
    fn test_async_strategy_with_report_interval() {
        let file = create_temp_csv(
            "type,card,hold,amount,name,currency\n\
             create,alice,,,Ada Lovelace,GBP\n",
        );
        let mut output = Vec::new();

        strategy(10)
            .with_report_interval(Some(Duration::from_millis(1)))
            .process(file.path(), &mut output)
            .unwrap();

        assert_eq!(String::from_utf8(output).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_async_strategy_handles_missing_file() {
        let mut output = Vec::new();

        let result = strategy(10).process(Path::new("nonexistent.csv"), &mut output);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Failed to open file"));
    }
}
