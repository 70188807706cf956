//! Capture types for the Prepaid Card Engine
//!
//! A capture settles an authorization hold, in one go or in installments.
//! There is at most one capture per hold, keyed by the hold token.

use super::card::Cents;
use super::hold::HoldToken;

/// Settlement state of an authorization hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    /// Token of the hold being settled
    pub hold: HoldToken,

    /// Cents captured and not refunded
    pub captured_amount: Cents,

    /// Cents refunded back to the card
    pub refunded_amount: Cents,

    /// Whether the hold has been settled in full
    ///
    /// Refunds do not reset this flag.
    pub completed: bool,
}

impl Capture {
    /// Create an empty capture for a hold
    pub fn new(hold: HoldToken) -> Self {
        Capture {
            hold,
            captured_amount: 0,
            refunded_amount: 0,
            completed: false,
        }
    }

    /// Cents ever captured against the hold, including refunded cents
    ///
    /// Refunded money went back to the card's total funds, not to the hold,
    /// so it still counts against the authorization.
    pub fn settled_amount(&self) -> Cents {
        self.captured_amount.saturating_add(self.refunded_amount)
    }
}
