//! Thread-safe card registry
//!
//! This module provides the `CardRegistry` struct, the entry point to the card
//! ledger. It owns every card together with the card's authorization holds
//! and captures.
//!
//! # Design
//!
//! The registry stores one `CardRecord` per card in a `DashMap` keyed by card
//! number. Every operation looks the record up, takes its write guard and runs
//! the whole read-check-mutate sequence inside that guard. Holds and captures
//! live inside the record, so an operation never needs more than one lock.
//!
//! # Thread Safety
//!
//! Operations on the same card are serialized by the record's guard.
//! Operations on different cards proceed in parallel. Card number allocation
//! inserts into a vacant entry, so two concurrent creations can never claim
//! the same number.

use std::collections::HashMap;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::capture_manager::get_or_create_capture;
use super::card_ledger::validate_new_card;
use super::card_numbers::{RandomCardNumbers, SeededCardNumbers};
use super::hold_manager::authorize;
use super::traits::CardNumberSource;
use crate::types::{
    AuthorizationHold, Capture, Card, CardError, CardNumber, CardSnapshot, Cents, HoldState,
    HoldToken,
};

/// Configuration for a card registry
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Seed for card number generation
    ///
    /// `None` draws numbers from the thread-local random generator.
    pub seed: Option<u64>,

    /// How many candidate numbers to try before giving up on a new card
    pub max_card_number_attempts: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_card_number_attempts: 5,
        }
    }
}

impl RegistryConfig {
    /// Create a config, falling back to the default attempt budget for zero
    pub fn new(seed: Option<u64>, max_card_number_attempts: usize) -> Self {
        let default = Self::default();

        let max_card_number_attempts = if max_card_number_attempts == 0 {
            tracing::warn!(
                requested = max_card_number_attempts,
                default = default.max_card_number_attempts,
                "Invalid max_card_number_attempts, using default"
            );
            default.max_card_number_attempts
        } else {
            max_card_number_attempts
        };

        Self {
            seed,
            max_card_number_attempts,
        }
    }
}

/// A card and everything placed on it
#[derive(Debug, Clone)]
struct CardRecord {
    card: Card,
    holds: Vec<AuthorizationHold>,
    captures: HashMap<HoldToken, Capture>,
}

impl CardRecord {
    fn new(card: Card) -> Self {
        Self {
            card,
            holds: Vec::new(),
            captures: HashMap::new(),
        }
    }

    fn hold(&self, token: HoldToken) -> Result<&AuthorizationHold, CardError> {
        self.holds
            .iter()
            .find(|hold| hold.token == token)
            .ok_or(CardError::HoldNotFound {
                card: self.card.number,
                hold: token,
            })
    }
}

/// Shared store of cards, holds and captures
///
/// Independent registries can coexist in one process. Share one registry
/// between tasks by wrapping it in an `Arc`.
#[derive(Debug)]
pub struct CardRegistry {
    cards: DashMap<CardNumber, CardRecord>,
    numbers: Box<dyn CardNumberSource>,
    max_card_number_attempts: usize,
}

impl CardRegistry {
    /// Create an empty registry
    pub fn new(config: RegistryConfig) -> Self {
        let numbers: Box<dyn CardNumberSource> = match config.seed {
            Some(seed) => Box::new(SeededCardNumbers::new(seed)),
            None => Box::new(RandomCardNumbers),
        };

        Self::with_number_source(numbers, config.max_card_number_attempts)
    }

    /// Create an empty registry drawing card numbers from `numbers`
    pub fn with_number_source(
        numbers: Box<dyn CardNumberSource>,
        max_card_number_attempts: usize,
    ) -> Self {
        Self {
            cards: DashMap::new(),
            numbers,
            max_card_number_attempts,
        }
    }

    /// Run `f` against a card's record while holding its write guard
    fn update<T, F>(&self, number: CardNumber, f: F) -> Result<T, CardError>
    where
        F: FnOnce(&mut CardRecord) -> Result<T, CardError>,
    {
        let mut entry = self
            .cards
            .get_mut(&number)
            .ok_or(CardError::CardNotFound { card: number })?;
        f(entry.value_mut())
    }

    /// Run `f` against a card's record while holding its read guard
    fn read<T, F>(&self, number: CardNumber, f: F) -> Result<T, CardError>
    where
        F: FnOnce(&CardRecord) -> Result<T, CardError>,
    {
        let entry = self
            .cards
            .get(&number)
            .ok_or(CardError::CardNotFound { card: number })?;
        f(entry.value())
    }

    /// Issue a new card
    ///
    /// # Arguments
    ///
    /// * `cardholder_name` - Name of the cardholder
    /// * `currency_code` - ISO 4217 code of a supported currency
    ///
    /// # Returns
    ///
    /// * `Ok(CardNumber)` - Number of the new card, with zero balances
    /// * `Err(CardError)` - If the request is invalid or no unused number was found
    pub fn create_card(
        &self,
        cardholder_name: &str,
        currency_code: &str,
    ) -> Result<CardNumber, CardError> {
        let currency = validate_new_card(cardholder_name, currency_code)?;
        let cardholder_name = cardholder_name.trim();

        for _ in 0..self.max_card_number_attempts {
            let candidate = self.numbers.next_candidate();
            if let Entry::Vacant(slot) = self.cards.entry(candidate) {
                slot.insert(CardRecord::new(Card::new(
                    candidate,
                    cardholder_name,
                    currency,
                )));
                return Ok(candidate);
            }
        }

        Err(CardError::IdentifierExhausted {
            attempts: self.max_card_number_attempts,
        })
    }

    /// Current state of a card
    pub fn snapshot(&self, number: CardNumber) -> Result<CardSnapshot, CardError> {
        self.read(number, |record| Ok(record.card.snapshot()))
    }

    /// State of every card, ordered by card number
    pub fn snapshots(&self) -> Vec<CardSnapshot> {
        let mut snapshots: Vec<CardSnapshot> = self
            .cards
            .iter()
            .map(|entry| entry.value().card.snapshot())
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.number);
        snapshots
    }

    /// Number of cards in the registry
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the registry holds no cards
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Load funds onto a card
    pub fn load_funds(&self, number: CardNumber, amount: Cents) -> Result<(), CardError> {
        self.update(number, |record| record.card.load_funds(amount))
    }

    /// Place an authorization hold on a card
    ///
    /// # Returns
    ///
    /// * `Ok(HoldToken)` - Token of the new hold
    /// * `Err(CardError)` - If the hold could not be placed; nothing is recorded
    pub fn authorize(
        &self,
        number: CardNumber,
        merchant_name: &str,
        amount: Cents,
    ) -> Result<HoldToken, CardError> {
        self.update(number, |record| {
            let hold = authorize(&mut record.card, merchant_name.trim(), amount)?;
            let token = hold.token;
            record.holds.push(hold);
            Ok(token)
        })
    }

    /// Release part or all of a hold's uncaptured funds
    pub fn reverse(
        &self,
        number: CardNumber,
        token: HoldToken,
        amount: Cents,
    ) -> Result<(), CardError> {
        self.update(number, |record| {
            let CardRecord {
                card,
                holds,
                captures,
            } = record;
            let capture = captures.get_mut(&token);
            let hold = holds
                .iter_mut()
                .find(|hold| hold.token == token)
                .ok_or(CardError::HoldNotFound {
                    card: number,
                    hold: token,
                })?;
            hold.reverse(amount, capture, card)
        })
    }

    /// Settle an installment of a hold
    pub fn capture(
        &self,
        number: CardNumber,
        token: HoldToken,
        amount: Cents,
    ) -> Result<(), CardError> {
        self.update(number, |record| {
            let CardRecord {
                card,
                holds,
                captures,
            } = record;
            let hold = holds
                .iter()
                .find(|hold| hold.token == token)
                .ok_or(CardError::HoldNotFound {
                    card: number,
                    hold: token,
                })?;
            get_or_create_capture(captures, hold).capture(hold, amount, card)
        })
    }

    /// Return captured funds of a hold to its card
    pub fn refund(
        &self,
        number: CardNumber,
        token: HoldToken,
        amount: Cents,
    ) -> Result<(), CardError> {
        self.update(number, |record| {
            record.hold(token)?;
            let CardRecord { card, captures, .. } = record;
            captures
                .get_mut(&token)
                .ok_or(CardError::CaptureNotFound { hold: token })?
                .refund(amount, card)
        })
    }

    /// Copy of an authorization hold
    pub fn hold(&self, number: CardNumber, token: HoldToken) -> Result<AuthorizationHold, CardError> {
        self.read(number, |record| record.hold(token).cloned())
    }

    /// Lifecycle position of an authorization hold
    pub fn hold_state(&self, number: CardNumber, token: HoldToken) -> Result<HoldState, CardError> {
        self.read(number, |record| {
            let hold = record.hold(token)?;
            Ok(hold.state(record.captures.get(&token)))
        })
    }

    /// Copy of a hold's capture
    pub fn capture_for(&self, number: CardNumber, token: HoldToken) -> Result<Capture, CardError> {
        self.read(number, |record| {
            record.hold(token)?;
            record
                .captures
                .get(&token)
                .cloned()
                .ok_or(CardError::CaptureNotFound { hold: token })
        })
    }
}

impl Default for CardRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}
