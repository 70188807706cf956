//! Card-related types for the Prepaid Card Engine
//!
//! This module defines the Card structure, its identifier and money types,
//! the supported currencies, and the read-only snapshot handed to callers.

use super::error::CardError;
use std::fmt;
use std::str::FromStr;

/// Card identifier
///
/// Opaque random number in `1..=i64::MAX`, assigned by the registry.
pub type CardNumber = u64;

/// Money amount in cents
pub type Cents = u64;

/// Supported card currencies
///
/// The set is closed. Card creation rejects any other code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Currency {
    /// Pound Sterling
    Gbp,
    /// United States Dollar
    Usd,
}

impl Currency {
    /// Every supported currency
    pub const SUPPORTED: [Currency; 2] = [Currency::Gbp, Currency::Usd];

    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Gbp => "GBP",
            Currency::Usd => "USD",
        }
    }

    /// Human-readable currency name
    pub fn name(&self) -> &'static str {
        match self {
            Currency::Gbp => "Pound Sterling",
            Currency::Usd => "United States Dollar",
        }
    }
}

impl FromStr for Currency {
    type Err = CardError;

    /// Parse an ISO 4217 code
    ///
    /// Codes are matched exactly; `gbp` is not `GBP`.
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Currency::SUPPORTED
            .into_iter()
            .find(|currency| currency.code() == code)
            .ok_or_else(|| CardError::invalid_currency(code))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The person a card is issued to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cardholder {
    pub name: String,
}

/// Prepaid card state
///
/// The balance fields are only ever changed by the card ledger operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// The card number
    pub number: CardNumber,

    /// The cardholder
    pub cardholder: Cardholder,

    /// Currency all amounts on this card are denominated in
    pub currency: Currency,

    /// Cents ever loaded onto the card
    ///
    /// Grows with every load and never shrinks.
    pub loaded_funds: Cents,

    /// Cents reserved by open authorization holds
    ///
    /// Always between zero and `total_funds`.
    pub blocked_funds: Cents,

    /// Cents on the card, blocked or not
    ///
    /// Grows with loads and refunds, shrinks only when holds are captured.
    pub total_funds: Cents,

    /// Whether the card has ever been loaded
    ///
    /// Holds can only be placed on usable cards. Once set it stays set.
    pub usable: bool,
}

impl Card {
    /// Create a new card with zero balances
    ///
    /// # Arguments
    ///
    /// * `number` - The card number assigned by the registry
    /// * `cardholder_name` - Name of the cardholder
    /// * `currency` - Currency of the card
    ///
    /// # Returns
    ///
    /// A new Card with all balances at zero that is not yet usable
    pub fn new(number: CardNumber, cardholder_name: &str, currency: Currency) -> Self {
        Card {
            number,
            cardholder: Cardholder {
                name: cardholder_name.to_string(),
            },
            currency,
            loaded_funds: 0,
            blocked_funds: 0,
            total_funds: 0,
            usable: false,
        }
    }

    /// Cents a new hold may draw against
    pub fn available_funds(&self) -> Cents {
        self.total_funds.saturating_sub(self.blocked_funds)
    }

    /// Read-only view of the card for callers outside the ledger
    pub fn snapshot(&self) -> CardSnapshot {
        CardSnapshot {
            number: self.number,
            cardholder_name: self.cardholder.name.clone(),
            currency: self.currency,
            loaded_funds: self.loaded_funds,
            blocked_funds: self.blocked_funds,
            total_funds: self.total_funds,
            available_funds: self.available_funds(),
            usable: self.usable,
        }
    }
}

/// Point-in-time copy of a card's state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSnapshot {
    pub number: CardNumber,
    pub cardholder_name: String,
    pub currency: Currency,
    pub loaded_funds: Cents,
    pub blocked_funds: Cents,
    pub total_funds: Cents,
    pub available_funds: Cents,
    pub usable: bool,
}
