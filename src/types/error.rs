//! Error types for the Prepaid Card Engine
//!
//! This module defines the errors raised by the card ledger and by the
//! command layer that drives it.
//!
//! # Error Categories
//!
//! - **Card creation errors**: unsupported currency, missing cardholder, identifier exhaustion
//! - **Lookup errors**: unknown card, hold or capture
//! - **Balance errors**: unusable card, insufficient funds, arithmetic overflow
//! - **Lifecycle errors**: captures, reversals and refunds that break the hold/capture rules
//! - **Command errors**: labels that do not resolve to a card or hold in the command file
//!
//! Every `CardError` is a recoverable business error. The operation that raised it
//! left the ledger untouched.

use super::card::{CardNumber, Cents};
use super::hold::HoldToken;
use thiserror::Error;

/// Errors raised by the card ledger
///
/// A closed set of error kinds. Each variant carries the values that made the
/// operation fail, and [`CardError::code`] gives a stable identifier for the kind
/// that callers can match on or forward across process boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    /// The requested currency is not in the supported set
    #[error("Currency '{currency}' is not supported")]
    InvalidCurrency {
        /// The rejected currency code
        currency: String,
    },

    /// A card cannot be created without a cardholder name
    #[error("A cardholder name is required")]
    CardholderRequired,

    /// An authorization hold cannot be placed without a merchant name
    #[error("A merchant name is required")]
    MerchantRequired,

    /// No unused card number was found within the attempt budget
    ///
    /// This should not happen in normal operation and is logged distinctly.
    #[error("Could not find a unique card number after {attempts} attempts")]
    IdentifierExhausted {
        /// Number of candidates that were tried
        attempts: usize,
    },

    /// No card is registered under the given number
    #[error("Card {card} does not exist")]
    CardNotFound {
        /// The card number that was looked up
        card: CardNumber,
    },

    /// The card has never been loaded with funds
    #[error("Card {card} is not usable until funds are loaded")]
    CardNotUsable {
        /// The card number
        card: CardNumber,
    },

    /// The card balance cannot cover the requested amount
    ///
    /// For blocking, `available` is the unblocked balance. For unblocking and
    /// capturing, it is the currently blocked balance.
    #[error("Insufficient funds on card {card}: available {available}, requested {requested}")]
    InsufficientFunds {
        /// The card number
        card: CardNumber,
        /// Cents the card could cover
        available: Cents,
        /// Cents that were requested
        requested: Cents,
    },

    /// Amounts must be at least one cent
    #[error("Amount for {operation} must be greater than zero")]
    InvalidAmount {
        /// Operation that received the zero amount
        operation: String,
    },

    /// A balance would exceed the representable range
    #[error("Arithmetic overflow in {operation} for card {card}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// The card number
        card: CardNumber,
    },

    /// No hold with the given token exists on the card
    #[error("Authorization hold {hold} not found on card {card}")]
    HoldNotFound {
        /// The card number
        card: CardNumber,
        /// The token that was looked up
        hold: HoldToken,
    },

    /// The hold has already been captured in full
    #[error("Capture for authorization hold {hold} is already completed")]
    CaptureAlreadyCompleted {
        /// The hold token
        hold: HoldToken,
    },

    /// The capture would settle more than the hold authorizes
    #[error("Capture of {requested} on authorization hold {hold} exceeds authorization: authorized {authorized}, already settled {settled}")]
    CaptureExceedsAuthorization {
        /// The hold token
        hold: HoldToken,
        /// Cents currently authorized by the hold
        authorized: Cents,
        /// Cents already settled against the hold
        settled: Cents,
        /// Cents that were requested
        requested: Cents,
    },

    /// Nothing has been captured against the hold yet
    #[error("No capture exists for authorization hold {hold}")]
    CaptureNotFound {
        /// The hold token
        hold: HoldToken,
    },

    /// The reversal asks for more than the hold authorizes
    #[error("Reversal of {requested} on authorization hold {hold} exceeds authorized amount {authorized}")]
    ReversalExceedsAuthorizedAmount {
        /// The hold token
        hold: HoldToken,
        /// Cents currently authorized by the hold
        authorized: Cents,
        /// Cents that were requested
        requested: Cents,
    },

    /// The reversal would release money that has already been captured
    #[error("Reversal of {requested} on authorization hold {hold} would release captured funds: uncaptured {uncaptured}")]
    ReversalBelowCapturedAmount {
        /// The hold token
        hold: HoldToken,
        /// Cents of the hold not yet settled
        uncaptured: Cents,
        /// Cents that were requested
        requested: Cents,
    },

    /// The refund asks for more than is currently captured
    #[error("Refund of {requested} on authorization hold {hold} exceeds captured amount {captured}")]
    RefundExceedsCapturedAmount {
        /// The hold token
        hold: HoldToken,
        /// Cents currently captured
        captured: Cents,
        /// Cents that were requested
        requested: Cents,
    },
}

impl CardError {
    /// Stable snake_case identifier of the error kind
    pub fn code(&self) -> &'static str {
        match self {
            CardError::InvalidCurrency { .. } => "invalid_currency",
            CardError::CardholderRequired => "cardholder_required",
            CardError::MerchantRequired => "merchant_required",
            CardError::IdentifierExhausted { .. } => "identifier_exhausted",
            CardError::CardNotFound { .. } => "card_not_found",
            CardError::CardNotUsable { .. } => "card_not_usable",
            CardError::InsufficientFunds { .. } => "insufficient_funds",
            CardError::InvalidAmount { .. } => "invalid_amount",
            CardError::ArithmeticOverflow { .. } => "arithmetic_overflow",
            CardError::HoldNotFound { .. } => "hold_not_found",
            CardError::CaptureAlreadyCompleted { .. } => "capture_already_completed",
            CardError::CaptureExceedsAuthorization { .. } => "capture_exceeds_authorization",
            CardError::CaptureNotFound { .. } => "capture_not_found",
            CardError::ReversalExceedsAuthorizedAmount { .. } => {
                "reversal_exceeds_authorized_amount"
            }
            CardError::ReversalBelowCapturedAmount { .. } => "reversal_below_captured_amount",
            CardError::RefundExceedsCapturedAmount { .. } => "refund_exceeds_captured_amount",
        }
    }
}

// Helper functions for creating common errors

impl CardError {
    /// Create an InvalidCurrency error
    pub fn invalid_currency(currency: &str) -> Self {
        CardError::InvalidCurrency {
            currency: currency.to_string(),
        }
    }

    /// Create a CardNotUsable error
    pub fn card_not_usable(card: CardNumber) -> Self {
        CardError::CardNotUsable { card }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(card: CardNumber, available: Cents, requested: Cents) -> Self {
        CardError::InsufficientFunds {
            card,
            available,
            requested,
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(operation: &str) -> Self {
        CardError::InvalidAmount {
            operation: operation.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, card: CardNumber) -> Self {
        CardError::ArithmeticOverflow {
            operation: operation.to_string(),
            card,
        }
    }
}

/// Errors raised while applying a command from a command file
///
/// Command files refer to cards and holds through labels because the real
/// identifiers are generated while the file is processed. Label resolution
/// errors live here; ledger errors are wrapped unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The card label has not been created earlier in the file
    #[error("Unknown card '{card}'")]
    UnknownCard {
        /// The card label
        card: String,
    },

    /// The card label is already bound to a card
    #[error("Card '{card}' already exists")]
    DuplicateCard {
        /// The card label
        card: String,
    },

    /// The hold label has not been authorized on this card
    #[error("Unknown authorization hold '{hold}' on card '{card}'")]
    UnknownHold {
        /// The card label
        card: String,
        /// The hold label
        hold: String,
    },

    /// The hold label is already bound to a hold on this card
    #[error("Authorization hold '{hold}' already exists on card '{card}'")]
    DuplicateHold {
        /// The card label
        card: String,
        /// The hold label
        hold: String,
    },

    /// The ledger rejected the operation
    #[error(transparent)]
    Ledger(#[from] CardError),
}

impl CommandError {
    /// Stable snake_case identifier of the error kind
    pub fn code(&self) -> &'static str {
        match self {
            CommandError::UnknownCard { .. } => "unknown_card",
            CommandError::DuplicateCard { .. } => "duplicate_card",
            CommandError::UnknownHold { .. } => "unknown_hold",
            CommandError::DuplicateHold { .. } => "duplicate_hold",
            CommandError::Ledger(error) => error.code(),
        }
    }
}
