//! Core card ledger module
//!
//! This module contains the business logic of the card engine:
//! - `card_ledger`: Balance operations on a single card
//! - `hold_manager`: Placing and reversing authorization holds
//! - `capture_manager`: Capturing and refunding holds
//! - `card_numbers`: Card number generation
//! - `registry`: Thread-safe store of cards, holds and captures
//! - `engine`: Applies command-file records to a registry
//! - `batch_processor`: Concurrent batch processing for the async strategy
//! - `traits`: Trait abstractions

pub mod batch_processor;
pub mod capture_manager;
pub mod card_ledger;
pub mod card_numbers;
pub mod engine;
pub mod hold_manager;
pub mod registry;
pub mod traits;

pub use batch_processor::BatchProcessor;
pub use card_numbers::{RandomCardNumbers, SeededCardNumbers};
pub use engine::{log_outcome, CardReport, CommandEngine, CommandOutcome};
pub use registry::{CardRegistry, RegistryConfig};
pub use traits::CardNumberSource;
