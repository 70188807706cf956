//! Card ledger module
//!
//! This module owns every change to a card's balance fields. The ledger is
//! the single source of truth for money: holds and captures reference a card
//! but never keep their own copy of its balances.
//!
//! The ledger is responsible for:
//! - Validating new card requests (cardholder, currency)
//! - Loading funds and making cards usable
//! - Blocking and unblocking funds for authorization holds
//! - Removing captured funds and returning refunded funds
//!
//! Every operation checks before it mutates, so a failed operation leaves the
//! card exactly as it was. Together the checks keep
//! `0 <= blocked_funds <= total_funds` true at all times.

use crate::types::{Card, CardError, Cents, Currency};

/// Validate the fields of a new card
///
/// # Arguments
///
/// * `cardholder_name` - Name of the cardholder (must not be blank)
/// * `currency_code` - ISO 4217 code (must be a supported currency)
///
/// # Returns
///
/// * `Ok(Currency)` - The parsed currency
/// * `Err(CardError)` - If either field is invalid
///
/// # Errors
///
/// Returns an error if:
/// - The currency code is not supported (`InvalidCurrency`)
/// - The cardholder name is empty or whitespace (`CardholderRequired`)
pub fn validate_new_card(cardholder_name: &str, currency_code: &str) -> Result<Currency, CardError> {
    let currency = currency_code.parse::<Currency>()?;

    if cardholder_name.trim().is_empty() {
        return Err(CardError::CardholderRequired);
    }

    Ok(currency)
}

impl Card {
    /// Load funds onto the card
    ///
    /// Increases both the loaded and total funds and marks the card usable.
    ///
    /// # Arguments
    ///
    /// * `amount` - Cents to load (must be positive)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is zero
    /// - Adding the amount to loaded or total funds would overflow
    pub fn load_funds(&mut self, amount: Cents) -> Result<(), CardError> {
        if amount == 0 {
            return Err(CardError::invalid_amount("load_funds"));
        }

        let new_loaded = self
            .loaded_funds
            .checked_add(amount)
            .ok_or_else(|| CardError::arithmetic_overflow("load_funds", self.number))?;

        let new_total = self
            .total_funds
            .checked_add(amount)
            .ok_or_else(|| CardError::arithmetic_overflow("load_funds", self.number))?;

        self.loaded_funds = new_loaded;
        self.total_funds = new_total;
        self.usable = true;

        Ok(())
    }

    /// Return refunded funds to the card
    ///
    /// Increases total funds only. Loaded funds and the usable flag are
    /// left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is zero or total funds would overflow.
    pub fn refund(&mut self, amount: Cents) -> Result<(), CardError> {
        if amount == 0 {
            return Err(CardError::invalid_amount("refund"));
        }

        self.total_funds = self
            .total_funds
            .checked_add(amount)
            .ok_or_else(|| CardError::arithmetic_overflow("refund", self.number))?;

        Ok(())
    }

    /// Block funds for an authorization hold
    ///
    /// # Arguments
    ///
    /// * `amount` - Cents to block
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The card has never been loaded (`CardNotUsable`)
    /// - Fewer than `amount` cents are unblocked (`InsufficientFunds`)
    pub fn block_funds(&mut self, amount: Cents) -> Result<(), CardError> {
        if !self.usable {
            return Err(CardError::card_not_usable(self.number));
        }

        let available = self.available_funds();
        if available < amount {
            return Err(CardError::insufficient_funds(self.number, available, amount));
        }

        // Cannot overflow: blocked + amount <= total
        self.blocked_funds += amount;

        Ok(())
    }

    /// Release blocked funds back to the available balance
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The card has never been loaded (`CardNotUsable`)
    /// - Fewer than `amount` cents are blocked (`InsufficientFunds`)
    pub fn unblock_funds(&mut self, amount: Cents) -> Result<(), CardError> {
        if !self.usable {
            return Err(CardError::card_not_usable(self.number));
        }

        self.blocked_funds = self
            .blocked_funds
            .checked_sub(amount)
            .ok_or_else(|| {
                CardError::insufficient_funds(self.number, self.blocked_funds, amount)
            })?;

        Ok(())
    }

    /// Remove captured funds from the card
    ///
    /// The captured cents stop being blocked and leave the card for good,
    /// so both blocked and total funds decrease.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than `amount` cents are blocked
    /// (`InsufficientFunds`).
    pub fn capture_funds(&mut self, amount: Cents) -> Result<(), CardError> {
        if amount > self.blocked_funds {
            return Err(CardError::insufficient_funds(
                self.number,
                self.blocked_funds,
                amount,
            ));
        }

        // Cannot underflow: amount <= blocked <= total
        self.blocked_funds -= amount;
        self.total_funds -= amount;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn loaded_card(amount: Cents) -> Card {
        let mut card = Card::new(1, "Ada Lovelace", Currency::Gbp);
        card.load_funds(amount).unwrap();
        card
    }

    fn assert_invariant(card: &Card) {
        assert!(
            card.blocked_funds <= card.total_funds,
            "blocked {} exceeds total {}",
            card.blocked_funds,
            card.total_funds
        );
    }

    #[rstest]
    #[case::gbp("Ada Lovelace", "GBP", Currency::Gbp)]
    #[case::usd("Grace Hopper", "USD", Currency::Usd)]
    fn test_validate_new_card_accepts_valid_input(
        #[case] name: &str,
        #[case] code: &str,
        #[case] expected: Currency,
    ) {
        assert_eq!(validate_new_card(name, code), Ok(expected));
    }

    #[rstest]
    #[case::unsupported_currency("Ada Lovelace", "EUR", CardError::invalid_currency("EUR"))]
    #[case::empty_name("", "GBP", CardError::CardholderRequired)]
    #[case::blank_name("   ", "USD", CardError::CardholderRequired)]
    fn test_validate_new_card_rejects_invalid_input(
        #[case] name: &str,
        #[case] code: &str,
        #[case] expected: CardError,
    ) {
        assert_eq!(validate_new_card(name, code), Err(expected));
    }

    #[test]
    fn test_load_funds_increases_loaded_and_total_and_makes_usable() {
        let mut card = Card::new(1, "Ada Lovelace", Currency::Gbp);

        card.load_funds(1000).unwrap();

        assert_eq!(card.loaded_funds, 1000);
        assert_eq!(card.total_funds, 1000);
        assert_eq!(card.blocked_funds, 0);
        assert!(card.usable);
    }

    #[test]
    fn test_load_funds_multiple_times_accumulates() {
        let mut card = loaded_card(1000);

        card.load_funds(250).unwrap();
        card.load_funds(5).unwrap();

        assert_eq!(card.loaded_funds, 1255);
        assert_eq!(card.total_funds, 1255);
    }

    #[test]
    fn test_load_funds_rejects_zero() {
        let mut card = Card::new(1, "Ada Lovelace", Currency::Gbp);

        let result = card.load_funds(0);

        assert!(matches!(result, Err(CardError::InvalidAmount { .. })));
        assert!(!card.usable);
    }

    #[test]
    fn test_load_funds_overflow_leaves_card_unchanged() {
        let mut card = loaded_card(10);
        card.total_funds = Cents::MAX;

        let result = card.load_funds(1);

        assert!(matches!(result, Err(CardError::ArithmeticOverflow { .. })));
        assert_eq!(card.loaded_funds, 10);
        assert_eq!(card.total_funds, Cents::MAX);
    }

    #[test]
    fn test_refund_increases_total_only() {
        let mut card = loaded_card(1000);
        card.loaded_funds = 1000;

        card.refund(300).unwrap();

        assert_eq!(card.total_funds, 1300);
        assert_eq!(card.loaded_funds, 1000);
    }

    #[test]
    fn test_refund_does_not_make_card_usable() {
        let mut card = Card::new(1, "Ada Lovelace", Currency::Gbp);

        card.refund(300).unwrap();

        assert!(!card.usable);
    }

    #[test]
    fn test_block_funds_moves_available_to_blocked() {
        let mut card = loaded_card(1000);

        card.block_funds(400).unwrap();

        assert_eq!(card.blocked_funds, 400);
        assert_eq!(card.total_funds, 1000);
        assert_eq!(card.available_funds(), 600);
    }

    #[test]
    fn test_block_funds_requires_usable_card() {
        let mut card = Card::new(1, "Ada Lovelace", Currency::Gbp);

        let result = card.block_funds(1);

        assert_eq!(result, Err(CardError::card_not_usable(1)));
        assert_eq!(card.blocked_funds, 0);
    }

    #[test]
    fn test_block_exactly_available_succeeds_one_more_cent_fails() {
        let mut card = loaded_card(1000);
        card.block_funds(400).unwrap();

        let too_much = card.block_funds(601);
        assert_eq!(too_much, Err(CardError::insufficient_funds(1, 600, 601)));
        assert_eq!(card.blocked_funds, 400);

        card.block_funds(600).unwrap();
        assert_eq!(card.blocked_funds, 1000);
        assert_eq!(card.available_funds(), 0);
        assert_invariant(&card);
    }

    #[test]
    fn test_unblock_funds_releases_blocked() {
        let mut card = loaded_card(1000);
        card.block_funds(400).unwrap();

        card.unblock_funds(150).unwrap();

        assert_eq!(card.blocked_funds, 250);
        assert_eq!(card.total_funds, 1000);
    }

    #[test]
    fn test_unblock_funds_rejects_more_than_blocked() {
        let mut card = loaded_card(1000);
        card.block_funds(400).unwrap();

        let result = card.unblock_funds(401);

        assert_eq!(result, Err(CardError::insufficient_funds(1, 400, 401)));
        assert_eq!(card.blocked_funds, 400);
        assert_invariant(&card);
    }

    #[test]
    fn test_unblock_funds_requires_usable_card() {
        let mut card = Card::new(1, "Ada Lovelace", Currency::Gbp);

        assert_eq!(card.unblock_funds(0), Err(CardError::card_not_usable(1)));
    }

    #[test]
    fn test_capture_funds_removes_blocked_and_total() {
        let mut card = loaded_card(1000);
        card.block_funds(400).unwrap();

        card.capture_funds(150).unwrap();

        assert_eq!(card.blocked_funds, 250);
        assert_eq!(card.total_funds, 850);
        assert_eq!(card.loaded_funds, 1000);
        assert_invariant(&card);
    }

    #[test]
    fn test_capture_funds_rejects_more_than_blocked() {
        let mut card = loaded_card(1000);
        card.block_funds(400).unwrap();

        let result = card.capture_funds(500);

        assert_eq!(result, Err(CardError::insufficient_funds(1, 400, 500)));
        assert_eq!(card.blocked_funds, 400);
        assert_eq!(card.total_funds, 1000);
    }

    #[test]
    fn test_capture_then_refund_restores_total() {
        let mut card = loaded_card(1000);
        card.block_funds(400).unwrap();

        card.capture_funds(400).unwrap();
        card.refund(400).unwrap();

        assert_eq!(card.total_funds, 1000);
        assert_eq!(card.blocked_funds, 0);
        assert_eq!(card.available_funds(), 1000);
    }
}
