//! Core traits for the card registry
//!
//! The registry draws card numbers from a `CardNumberSource`, so production
//! code can use a random generator while tests and reproducible runs plug in
//! a seeded or fixed one.

use crate::types::CardNumber;
use std::fmt;

/// Source of candidate card numbers
///
/// Candidates do not have to be unique. The registry rejects candidates that
/// are already taken and asks again, up to its attempt budget.
pub trait CardNumberSource: fmt::Debug + Send + Sync {
    /// Produce the next candidate card number
    fn next_candidate(&self) -> CardNumber;
}
