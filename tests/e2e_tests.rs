//! End-to-end integration tests
//!
//! These tests validate the complete command processing pipeline using
//! predefined CSV test fixtures. Each test:
//! 1. Reads input.csv from a fixture directory
//! 2. Applies all commands through the engine
//! 3. Generates the card report CSV
//! 4. Compares the report with expected.csv
//!
//! Card numbers are random, so the `card_number` column is checked for shape
//! and then dropped before comparing. expected.csv files leave it out.
//!
//! Test fixtures are located in tests/fixtures/ and cover:
//! - Happy path scenarios
//! - Authorization limits and unusable cards
//! - Capture installments, completion and reversals
//! - Refunds and the settled-amount bound
//! - Invalid card and hold references
//! - Malformed rows
//!
//! Each test is run twice: once with the sync strategy and once with the async strategy.

#[cfg(test)]
mod tests {
    use prepaid_card_engine::cli::StrategyType;
    use prepaid_card_engine::core::RegistryConfig;
    use prepaid_card_engine::strategy::{create_strategy, BatchConfig};
    use rstest::rstest;
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    /// Check the card_number column and remove it from every line
    fn strip_card_numbers(output: &str) -> String {
        output
            .lines()
            .enumerate()
            .map(|(index, line)| {
                let mut fields: Vec<&str> = line.split(',').collect();
                let number = fields.remove(1);
                if index == 0 {
                    assert_eq!(number, "card_number");
                } else {
                    let number: u64 = number
                        .parse()
                        .unwrap_or_else(|e| panic!("Invalid card number '{}': {}", number, e));
                    assert!(number >= 1 && number <= i64::MAX as u64);
                }
                fields.join(",") + "\n"
            })
            .collect()
    }

    /// Run a test fixture by processing input.csv and comparing with expected.csv
    ///
    /// # Arguments
    ///
    /// * `fixture_name` - Name of the fixture directory (e.g., "happy_path")
    /// * `strategy_type` - Processing strategy to use (Sync or Async)
    /// * `config` - Batch settings for the async strategy
    ///
    /// # Panics
    ///
    /// Panics if:
    /// - Input or expected files cannot be read
    /// - Output doesn't match expected
    fn run_test_fixture(fixture_name: &str, strategy_type: StrategyType, config: Option<BatchConfig>) {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let input_path = format!("{}/input.csv", fixture_dir);
        let expected_path = format!("{}/expected.csv", fixture_dir);

        assert!(
            Path::new(&input_path).exists(),
            "Input file not found: {}",
            input_path
        );
        assert!(
            Path::new(&expected_path).exists(),
            "Expected file not found: {}",
            expected_path
        );

        let strategy = create_strategy(strategy_type, config, RegistryConfig::default(), None);

        let mut temp_output = NamedTempFile::new().expect("Failed to create temp file");

        strategy
            .process(Path::new(&input_path), &mut temp_output)
            .unwrap_or_else(|e| panic!("Failed to process commands: {}", e));

        temp_output.flush().expect("Failed to flush temp file");

        let actual_output = fs::read_to_string(temp_output.path())
            .unwrap_or_else(|e| panic!("Failed to read temp output file: {}", e));
        let actual_output = strip_card_numbers(&actual_output);

        let expected_output = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("Failed to read expected file {}: {}", expected_path, e));

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {} (strategy: {:?})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, strategy_type, actual_output, expected_output
        );
    }

    /// End-to-end test for all fixtures with both processing strategies
    #[rstest]
    #[case("happy_path")]
    #[case("authorization_limits")]
    #[case("capture_lifecycle")]
    #[case("refunds")]
    #[case("invalid_references")]
    #[case("malformed_data")]
    #[case("multiple_cards")]
    fn test_fixtures(
        #[case] fixture: &str,
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        run_test_fixture(fixture, strategy, None);
    }

    /// Tiny batches split every card's commands across many batches
    #[rstest]
    #[case("capture_lifecycle")]
    #[case("refunds")]
    #[case("multiple_cards")]
    fn test_fixtures_with_small_batches(#[case] fixture: &str) {
        run_test_fixture(fixture, StrategyType::Async, Some(BatchConfig::new(2, 4)));
    }

    #[test]
    fn test_seeded_sync_runs_issue_same_card_numbers() {
        let run = || {
            let strategy = create_strategy(
                StrategyType::Sync,
                None,
                RegistryConfig::new(Some(42), 5),
                None,
            );
            let mut output = Vec::new();
            strategy
                .process(Path::new("tests/fixtures/multiple_cards/input.csv"), &mut output)
                .unwrap();
            String::from_utf8(output).unwrap()
        };

        assert_eq!(run(), run());
    }
}
