//! Capture management
//!
//! A hold is settled through a single `Capture` that accumulates installments.
//! Captured cents leave the card; refunds bring them back to the card's total
//! funds without reopening the hold.

use std::collections::HashMap;

use crate::types::{AuthorizationHold, Capture, Card, CardError, Cents, HoldToken};

/// Return the hold's capture, creating an empty one on first use
///
/// The capture is kept even if the installment that created it fails.
pub fn get_or_create_capture<'a>(
    captures: &'a mut HashMap<HoldToken, Capture>,
    hold: &AuthorizationHold,
) -> &'a mut Capture {
    captures
        .entry(hold.token)
        .or_insert_with(|| Capture::new(hold.token))
}

impl Capture {
    /// Settle an installment of the hold
    ///
    /// # Arguments
    ///
    /// * `hold` - The hold being settled
    /// * `amount` - Cents to capture (must be positive)
    /// * `card` - The card the hold is placed on
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is zero (`InvalidAmount`)
    /// - The hold is already settled in full (`CaptureAlreadyCompleted`)
    /// - The installment would settle more than is authorized (`CaptureExceedsAuthorization`)
    /// - The card cannot release the blocked funds (`InsufficientFunds`)
    pub fn capture(
        &mut self,
        hold: &AuthorizationHold,
        amount: Cents,
        card: &mut Card,
    ) -> Result<(), CardError> {
        if amount == 0 {
            return Err(CardError::invalid_amount("capture"));
        }

        if self.completed {
            return Err(CardError::CaptureAlreadyCompleted { hold: self.hold });
        }

        let settled = self.settled_amount();
        let exceeds = settled
            .checked_add(amount)
            .map_or(true, |total| total > hold.auth_amount);
        if exceeds {
            return Err(CardError::CaptureExceedsAuthorization {
                hold: self.hold,
                authorized: hold.auth_amount,
                settled,
                requested: amount,
            });
        }

        card.capture_funds(amount)?;
        self.captured_amount += amount;

        if self.settled_amount() == hold.auth_amount {
            self.completed = true;
        }

        Ok(())
    }

    /// Return captured funds to the card
    ///
    /// The hold stays settled: refunded cents count against the authorization
    /// and `completed` is not reset.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is zero (`InvalidAmount`)
    /// - The amount exceeds what is currently captured (`RefundExceedsCapturedAmount`)
    /// - The card total would overflow (`ArithmeticOverflow`)
    pub fn refund(&mut self, amount: Cents, card: &mut Card) -> Result<(), CardError> {
        if amount == 0 {
            return Err(CardError::invalid_amount("refund"));
        }

        if amount > self.captured_amount {
            return Err(CardError::RefundExceedsCapturedAmount {
                hold: self.hold,
                captured: self.captured_amount,
                requested: amount,
            });
        }

        card.refund(amount)?;
        self.captured_amount -= amount;
        self.refunded_amount += amount;

        Ok(())
    }
}
