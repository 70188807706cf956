//! Command types for the Prepaid Card Engine
//!
//! Each command file row is one operation on the ledger. Cards and
//! holds are named by labels chosen in the file, since their real identifiers
//! only exist once the file is being processed.

use super::card::Cents;

/// Label naming a card inside a command file
pub type CardLabel = String;

/// Label naming an authorization hold inside a command file
///
/// Hold labels are scoped to their card.
pub type HoldLabel = String;

/// Operation requested by a command
///
/// Amounts are already converted to cents and validated as positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Issue a new card and bind it to the record's card label
    CreateCard {
        cardholder_name: String,
        currency: String,
    },

    /// Load funds onto the card, making it usable
    LoadFunds { amount: Cents },

    /// Place an authorization hold and bind it to `hold`
    Authorize {
        hold: HoldLabel,
        merchant_name: String,
        amount: Cents,
    },

    /// Release part or all of a hold's uncaptured funds
    Reverse { hold: HoldLabel, amount: Cents },

    /// Settle part or all of a hold
    Capture { hold: HoldLabel, amount: Cents },

    /// Return captured funds to the card
    Refund { hold: HoldLabel, amount: Cents },

    /// Report the card's current balances
    Query,
}

impl Command {
    /// Command name as written in the `type` column
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateCard { .. } => "create",
            Command::LoadFunds { .. } => "load",
            Command::Authorize { .. } => "authorize",
            Command::Reverse { .. } => "reverse",
            Command::Capture { .. } => "capture",
            Command::Refund { .. } => "refund",
            Command::Query => "query",
        }
    }
}

/// A single command read from a command file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRecord {
    /// The card the command applies to
    pub card: CardLabel,

    /// What to do with the card
    pub command: Command,
}
