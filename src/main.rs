//! Prepaid Card Engine CLI
//!
//! Command-line interface for processing prepaid card commands from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- commands.csv > cards.csv
//! cargo run -- --strategy sync commands.csv > cards.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 commands.csv > cards.csv
//! cargo run -- --seed 42 --report-interval 5 --log-format json commands.csv > cards.csv
//! ```
//!
//! The program applies the commands in the input file to a fresh card
//! registry and writes the final state of every card to stdout. Logs go to
//! stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use prepaid_card_engine::cli;
use prepaid_card_engine::logging;
use prepaid_card_engine::strategy;
use std::process;

fn main() {
    let args = cli::parse_args();

    logging::init_logging(&args.log_level, args.log_format);

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(
            args.strategy,
            config,
            args.to_registry_config(),
            args.report_interval(),
        )
    };

    tracing::info!(
        input = %args.input_file.display(),
        strategy = ?args.strategy,
        "Processing command file"
    );

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        tracing::error!("{}", e);
        process::exit(1);
    }
}
