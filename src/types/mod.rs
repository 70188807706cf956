//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `card`: Cards, card numbers, money and currencies
//! - `hold`: Authorization holds and their lifecycle state
//! - `capture`: Settlement state of a hold
//! - `command`: Commands read from command files
//! - `error`: Error types for the card engine

pub mod capture;
pub mod card;
pub mod command;
pub mod error;
pub mod hold;

pub use capture::Capture;
pub use card::{Card, CardNumber, CardSnapshot, Cardholder, Cents, Currency};
pub use command::{CardLabel, Command, CommandRecord, HoldLabel};
pub use error::{CardError, CommandError};
pub use hold::{AuthorizationHold, HoldState, HoldToken};
