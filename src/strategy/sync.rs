//! Synchronous processing strategy
//!
//! Applies commands one at a time in file order on the calling thread.

use crate::core::{log_outcome, CardRegistry, CommandEngine, RegistryConfig};
use crate::io::csv_format::write_cards_csv;
use crate::io::sync_reader::SyncReader;
use crate::strategy::ProcessingStrategy;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Synchronous processing strategy
#[derive(Debug, Clone, Default)]
pub struct SyncProcessingStrategy {
    registry: RegistryConfig,
}

impl SyncProcessingStrategy {
    /// Create a strategy whose registry uses `registry`
    pub fn new(registry: RegistryConfig) -> Self {
        Self { registry }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let registry = Arc::new(CardRegistry::new(self.registry.clone()));
        let engine = CommandEngine::new(registry);

        let reader = SyncReader::new(input_path)?;

        for result in reader {
            match result {
                Ok(record) => {
                    let outcome = engine.process(&record);
                    log_outcome(&record, &outcome);
                }
                Err(e) => {
                    tracing::warn!("Skipping invalid record: {}", e);
                }
            }
        }

        write_cards_csv(&engine.card_reports(), output)?;

        Ok(())
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

    fn run(content: &str) -> String {
        let file = create_temp_csv(content);
        let strategy = SyncProcessingStrategy::new(RegistryConfig::new(Some(1), 5));
        let mut output = Vec::new();

        strategy.process(file.path(), &mut output).unwrap();

        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_sync_strategy_processes_card_lifecycle() {
        let output = run("type,card,hold,amount,name,currency\n\
                          create,alice,,,Ada Lovelace,GBP\n\
                          load,alice,,10.00,,\n\
                          authorize,alice,h1,4.00,Coffee Shop,\n\
                          capture,alice,h1,1.50,,\n");

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("card,card_number,cardholder"));
        assert!(lines[1].starts_with("alice,"));
        assert!(lines[1].ends_with(",Ada Lovelace,GBP,10.00,2.50,8.50,6.00,true"));
    }

    #[test]
    fn test_sync_strategy_skips_rejected_commands() {
        let output = run("type,card,hold,amount,name,currency\n\
                          create,alice,,,Ada Lovelace,GBP\n\
                          authorize,alice,h1,4.00,Coffee Shop,\n\
                          load,bob,,1.00,,\n\
                          load,alice,,not-money,,\n\
                          load,alice,,2.00,,\n");

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with(",2.00,0.00,2.00,2.00,true"));
    }

    #[test]
    fn test_sync_strategy_handles_missing_file() {
        let strategy = SyncProcessingStrategy::default();
        let mut output = Vec::new();

        let result = strategy.process(Path::new("nonexistent.csv"), &mut output);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Failed to open file"));
    }
}
