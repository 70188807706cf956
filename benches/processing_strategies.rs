//! Benchmark suite for comparing processing strategies
//!
//! This benchmark compares the sync and async processing strategies using
//! the divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```
//!
//! # Benchmark Inputs
//!
//! Command files are generated into temporary files before timing starts.
//! Each card goes through a full lifecycle: creation, a load, a hold captured
//! in two installments and partly refunded, a reversed hold and a query. The
//! steps of different cards are interleaved, so every batch touches many cards.

use prepaid_card_engine::cli::StrategyType;
use prepaid_card_engine::core::RegistryConfig;
use prepaid_card_engine::strategy::{create_strategy, BatchConfig};
use std::io::Write;
use tempfile::NamedTempFile;

/// Number of cards in each generated command file
const CARDS: &[usize] = &[10, 1_000, 20_000];

fn main() {
    divan::main();
}

/// One step of a card's lifecycle as a command row
fn lifecycle_step(step: usize, card: usize) -> String {
    match step {
        0 => format!("create,card{card},,,Cardholder {card},GBP"),
        1 => format!("load,card{card},,100.00,,"),
        2 => format!("authorize,card{card},h1,40.00,Merchant {card},"),
        3 => format!("capture,card{card},h1,15.00,,"),
        4 => format!("capture,card{card},h1,25.00,,"),
        5 => format!("refund,card{card},h1,5.00,,"),
        6 => format!("authorize,card{card},h2,10.00,Merchant {card},"),
        7 => format!("reverse,card{card},h2,10.00,,"),
        _ => format!("query,card{card},,,,"),
    }
}

/// Generate a command file with the lifecycle of `cards` cards
fn command_file(cards: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "type,card,hold,amount,name,currency").expect("Failed to write header");
    for step in 0..9 {
        for card in 0..cards {
            writeln!(file, "{}", lifecycle_step(step, card)).expect("Failed to write command");
        }
    }
    file.flush().expect("Failed to flush temp file");
    file
}

/// Benchmark the synchronous processing strategy
#[divan::bench(args = CARDS)]
fn sync_strategy(bencher: divan::Bencher, cards: usize) {
    let input = command_file(cards);
    let strategy = create_strategy(StrategyType::Sync, None, RegistryConfig::default(), None);

    bencher.bench(|| {
        let mut output = Vec::new();
        strategy
            .process(input.path(), &mut output)
            .expect("Processing failed");
    });
}

/// Benchmark the asynchronous processing strategy
#[divan::bench(args = CARDS)]
fn async_strategy(bencher: divan::Bencher, cards: usize) {
    let input = command_file(cards);
    let strategy = create_strategy(
        StrategyType::Async,
        Some(BatchConfig::default()),
        RegistryConfig::default(),
        None,
    );

    bencher.bench(|| {
        let mut output = Vec::new();
        strategy
            .process(input.path(), &mut output)
            .expect("Processing failed");
    });
}
