//! Authorization hold management
//!
//! Placing a hold blocks funds on the card. Reversing a hold releases part or
//! all of its uncaptured funds and shrinks the authorized amount.
//!
//! Reversal checks the hold's capture before touching the card, so money that
//! has already been captured (or captured and refunded) is never released a
//! second time.

use crate::types::{AuthorizationHold, Capture, Card, CardError, Cents};

/// Place an authorization hold on a card
///
/// # Arguments
///
/// * `card` - The card to block funds on
/// * `merchant_name` - Merchant requesting the hold (must not be blank)
/// * `amount` - Cents to authorize (must be positive)
///
/// # Returns
///
/// * `Ok(AuthorizationHold)` - The new hold with a fresh token
/// * `Err(CardError)` - If the hold could not be placed; the card is unchanged
///
/// # Errors
///
/// Returns an error if:
/// - The merchant name is blank (`MerchantRequired`)
/// - The amount is zero (`InvalidAmount`)
/// - The card is not usable or cannot cover the amount
pub fn authorize(
    card: &mut Card,
    merchant_name: &str,
    amount: Cents,
) -> Result<AuthorizationHold, CardError> {
    if merchant_name.trim().is_empty() {
        return Err(CardError::MerchantRequired);
    }
    if amount == 0 {
        return Err(CardError::invalid_amount("authorize"));
    }

    let hold = AuthorizationHold::new(card.number, merchant_name, amount);
    card.block_funds(amount)?;

    Ok(hold)
}

impl AuthorizationHold {
    /// Release part or all of the hold's uncaptured funds
    ///
    /// # Arguments
    ///
    /// * `amount` - Cents to release (must be positive)
    /// * `capture` - The hold's capture, if anything was ever captured
    /// * `card` - The card the hold is placed on
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is zero (`InvalidAmount`)
    /// - The amount exceeds the authorized amount (`ReversalExceedsAuthorizedAmount`)
    /// - The amount exceeds the part not yet settled (`ReversalBelowCapturedAmount`)
    /// - The card rejects the unblock (`CardNotUsable`, `InsufficientFunds`)
    pub fn reverse(
        &mut self,
        amount: Cents,
        capture: Option<&mut Capture>,
        card: &mut Card,
    ) -> Result<(), CardError> {
        if amount == 0 {
            return Err(CardError::invalid_amount("reverse"));
        }

        if amount > self.auth_amount {
            return Err(CardError::ReversalExceedsAuthorizedAmount {
                hold: self.token,
                authorized: self.auth_amount,
                requested: amount,
            });
        }

        if let Some(capture) = capture.as_deref() {
            let uncaptured = self.auth_amount.saturating_sub(capture.settled_amount());
            if amount > uncaptured {
                return Err(CardError::ReversalBelowCapturedAmount {
                    hold: self.token,
                    uncaptured,
                    requested: amount,
                });
            }
        }

        card.unblock_funds(amount)?;
        self.auth_amount -= amount;

        // Settling what is left of the authorization closes the capture
        if let Some(capture) = capture {
            let settled = capture.settled_amount();
            if settled > 0 && settled == self.auth_amount {
                capture.completed = true;
            }
        }

        Ok(())
    }
}
