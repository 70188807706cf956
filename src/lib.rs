//! Prepaid Card Engine Library
//! # Overview
//!
//! This library implements a prepaid card ledger: cards are loaded with
//! funds, merchants place authorization holds on them, and holds are captured
//! (in one go or in installments), reversed, or refunded after capture.
//! Command files drive the ledger through a sync or an async strategy.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Card, AuthorizationHold, Capture, errors)
//! - [`core`] - Business logic components:
//!   - [`core::card_ledger`] - Balance operations on a card
//!   - [`core::hold_manager`] - Authorization holds and reversals
//!   - [`core::capture_manager`] - Captures and refunds
//!   - [`core::registry`] - Thread-safe store of cards, holds and captures
//!   - [`core::engine`] - Applies command-file records to a registry
//! - [`io`] - Command file parsing and card report output
//! - [`strategy`] - Sync and async processing strategies
//! - [`cli`] - CLI arguments parsing
//! - [`logging`] - Tracing subscriber setup
//!
//! # Card Balances
//!
//! Each card maintains, in cents:
//! - `loaded_funds`: Everything ever loaded
//! - `blocked_funds`: Reserved by authorization holds
//! - `total_funds`: On the card, blocked or not
//! - available funds: `total_funds - blocked_funds`
//!
//! `0 <= blocked_funds <= total_funds` holds after every operation.

pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod strategy;
pub mod types;

pub use crate::core::{CardRegistry, CommandEngine, RegistryConfig};
pub use io::write_cards_csv;
pub use types::{
    AuthorizationHold, Capture, Card, CardError, CardNumber, CardSnapshot, Cents, CommandError,
    CommandRecord, Currency, HoldState, HoldToken,
};
