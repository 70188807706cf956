//! Card number generation
//!
//! Card numbers are random values in `1..=i64::MAX`. Two sources are
//! provided: `RandomCardNumbers` draws from the thread-local generator, and
//! `SeededCardNumbers` draws from a seeded generator so runs can be repeated
//! with the same numbers.

use super::traits::CardNumberSource;
use crate::types::CardNumber;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Largest card number that can be issued
pub const MAX_CARD_NUMBER: CardNumber = i64::MAX as CardNumber;

/// Card numbers drawn from the thread-local random generator
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCardNumbers;

impl CardNumberSource for RandomCardNumbers {
    fn next_candidate(&self) -> CardNumber {
        rand::thread_rng().gen_range(1..=MAX_CARD_NUMBER)
    }
}

/// Card numbers drawn from a seeded generator
///
/// The generator sits behind a mutex so the source can be shared by every
/// task that creates cards.
#[derive(Debug)]
pub struct SeededCardNumbers {
    rng: Mutex<StdRng>,
}

impl SeededCardNumbers {
    /// Create a source that yields the same sequence for the same seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl CardNumberSource for SeededCardNumbers {
    fn next_candidate(&self) -> CardNumber {
        self.rng.lock().gen_range(1..=MAX_CARD_NUMBER)
    }
}
