//! Command processing orchestration
//!
//! This module provides the `CommandEngine` struct, which applies commands
//! read from a command file to a shared `CardRegistry`.
//!
//! # Design
//!
//! Command files name cards and holds by labels. The engine keeps two
//! concurrent label maps next to the registry:
//!
//! ```text
//! CommandEngine
//!     ├── Arc<CardRegistry>                       (cards, holds, captures)
//!     ├── DashMap<CardLabel, CardNumber>           (card labels)
//!     └── DashMap<(CardLabel, HoldLabel), HoldToken> (hold labels, scoped per card)
//! ```
//!
//! A label is bound only after the registry accepted the operation, so a
//! rejected `create` or `authorize` leaves the label free. `create` holds the
//! label's vacant entry while the card is issued. `authorize` places the hold
//! first and then binds the label; if a concurrent `authorize` bound the same
//! label in the meantime, the new hold is reversed in full.
//!
//! # Thread Safety
//!
//! The engine can be shared across tasks through an `Arc`. Commands for
//! different cards run in parallel; commands for the same card are expected
//! to arrive in order from a single task.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::registry::CardRegistry;
use crate::types::{
    CardError, CardLabel, CardNumber, CardSnapshot, Command, CommandError, CommandRecord,
    HoldLabel, HoldToken,
};

/// Result of a successfully applied command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// A card was issued
    CardCreated(CardNumber),
    /// An authorization hold was placed
    HoldPlaced(HoldToken),
    /// Funds were loaded, released, captured or refunded
    Applied,
    /// The card's current state
    Snapshot(CardSnapshot),
}

/// State of a card together with the label it was created under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardReport {
    pub label: CardLabel,
    pub snapshot: CardSnapshot,
}

/// Applies command records to a card registry
#[derive(Debug)]
pub struct CommandEngine {
    registry: Arc<CardRegistry>,
    cards: DashMap<CardLabel, CardNumber>,
    holds: DashMap<(CardLabel, HoldLabel), HoldToken>,
}

impl CommandEngine {
    /// Create an engine driving `registry`
    pub fn new(registry: Arc<CardRegistry>) -> Self {
        Self {
            registry,
            cards: DashMap::new(),
            holds: DashMap::new(),
        }
    }

    /// The registry the engine drives
    pub fn registry(&self) -> &Arc<CardRegistry> {
        &self.registry
    }

    fn card_number(&self, card: &str) -> Result<CardNumber, CommandError> {
        self.cards
            .get(card)
            .map(|entry| *entry.value())
            .ok_or_else(|| CommandError::UnknownCard {
                card: card.to_string(),
            })
    }

    fn hold_token(&self, card: &str, hold: &str) -> Result<HoldToken, CommandError> {
        self.holds
            .get(&(card.to_string(), hold.to_string()))
            .map(|entry| *entry.value())
            .ok_or_else(|| CommandError::UnknownHold {
                card: card.to_string(),
                hold: hold.to_string(),
            })
    }

    /// Apply a single command record
    ///
    /// # Arguments
    ///
    /// * `record` - The command and the card label it applies to
    ///
    /// # Returns
    ///
    /// * `Ok(CommandOutcome)` - What the command produced
    /// * `Err(CommandError)` - If a label does not resolve or the ledger rejected
    ///   the operation; nothing was changed
    pub fn process(&self, record: &CommandRecord) -> Result<CommandOutcome, CommandError> {
        let label = &record.card;

        match &record.command {
            Command::CreateCard {
                cardholder_name,
                currency,
            } => match self.cards.entry(label.clone()) {
                Entry::Occupied(_) => Err(CommandError::DuplicateCard {
                    card: label.clone(),
                }),
                Entry::Vacant(slot) => {
                    let number = self.registry.create_card(cardholder_name, currency)?;
                    slot.insert(number);
                    Ok(CommandOutcome::CardCreated(number))
                }
            },
            Command::LoadFunds { amount } => {
                let number = self.card_number(label)?;
                self.registry.load_funds(number, *amount)?;
                Ok(CommandOutcome::Applied)
            }
            Command::Authorize {
                hold,
                merchant_name,
                amount,
            } => {
                let number = self.card_number(label)?;
                let key = (label.clone(), hold.clone());
                if self.holds.contains_key(&key) {
                    return Err(CommandError::DuplicateHold {
                        card: label.clone(),
                        hold: hold.clone(),
                    });
                }

                let token = self.registry.authorize(number, merchant_name, *amount)?;
                match self.holds.entry(key) {
                    Entry::Vacant(slot) => {
                        slot.insert(token);
                        Ok(CommandOutcome::HoldPlaced(token))
                    }
                    Entry::Occupied(bound) => {
                        // Lost the label to a concurrent authorize
                        drop(bound);
                        self.registry.reverse(number, token, *amount)?;
                        Err(CommandError::DuplicateHold {
                            card: label.clone(),
                            hold: hold.clone(),
                        })
                    }
                }
            }
            Command::Reverse { hold, amount } => {
                let number = self.card_number(label)?;
                let token = self.hold_token(label, hold)?;
                self.registry.reverse(number, token, *amount)?;
                Ok(CommandOutcome::Applied)
            }
            Command::Capture { hold, amount } => {
                let number = self.card_number(label)?;
                let token = self.hold_token(label, hold)?;
                self.registry.capture(number, token, *amount)?;
                Ok(CommandOutcome::Applied)
            }
            Command::Refund { hold, amount } => {
                let number = self.card_number(label)?;
                let token = self.hold_token(label, hold)?;
                self.registry.refund(number, token, *amount)?;
                Ok(CommandOutcome::Applied)
            }
            Command::Query => {
                let number = self.card_number(label)?;
                Ok(CommandOutcome::Snapshot(self.registry.snapshot(number)?))
            }
        }
    }

    /// Current state of every labelled card, ordered by label
    ///
    /// Cards created on the registry directly, without a label, are left out.
    pub fn card_reports(&self) -> Vec<CardReport> {
        let labels: HashMap<CardNumber, CardLabel> = self
            .cards
            .iter()
            .map(|entry| (*entry.value(), entry.key().clone()))
            .collect();

        let mut reports: Vec<CardReport> = self
            .registry
            .snapshots()
            .into_iter()
            .filter_map(|snapshot| {
                labels.get(&snapshot.number).map(|label| CardReport {
                    label: label.clone(),
                    snapshot,
                })
            })
            .collect();
        reports.sort_by(|a, b| a.label.cmp(&b.label));
        reports
    }

    /// Log the current state of every labelled card
    pub fn log_card_reports(&self) {
        for report in self.card_reports() {
            log_snapshot(&report.label, &report.snapshot, "Card report");
        }
    }
}

fn log_snapshot(label: &str, snapshot: &CardSnapshot, message: &str) {
    tracing::info!(
        card = %label,
        card_number = snapshot.number,
        cardholder = %snapshot.cardholder_name,
        currency = %snapshot.currency,
        currency_name = snapshot.currency.name(),
        loaded = snapshot.loaded_funds,
        blocked = snapshot.blocked_funds,
        total = snapshot.total_funds,
        available = snapshot.available_funds,
        usable = snapshot.usable,
        "{}",
        message
    );
}

/// Log the outcome of a processed command
///
/// Query results are logged at info level, accepted commands at debug level
/// and rejected commands at warn level. Running out of card numbers is logged
/// as an error.
pub fn log_outcome(record: &CommandRecord, result: &Result<CommandOutcome, CommandError>) {
    let command = record.command.name();

    match result {
        Ok(CommandOutcome::Snapshot(snapshot)) => {
            log_snapshot(&record.card, snapshot, "Card query");
        }
        Ok(outcome) => {
            tracing::debug!(card = %record.card, command, ?outcome, "Command applied");
        }
        Err(CommandError::Ledger(error @ CardError::IdentifierExhausted { .. })) => {
            tracing::error!(
                card = %record.card,
                command,
                code = error.code(),
                "Card creation failed: {}",
                error
            );
        }
        Err(error) => {
            tracing::warn!(
                card = %record.card,
                command,
                code = error.code(),
                "Command rejected: {}",
                error
            );
        }
    }
}
