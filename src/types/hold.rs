//! Authorization hold types for the Prepaid Card Engine
//!
//! An authorization hold is a merchant's reservation of funds on a card. The
//! reserved cents stay on the card (blocked) until they are captured or the
//! hold is reversed.

use super::capture::Capture;
use super::card::{CardNumber, Cents};
use uuid::Uuid;

/// Authorization hold identifier
///
/// Globally unique, generated when the hold is placed.
pub type HoldToken = Uuid;

/// A merchant's reservation of funds on a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationHold {
    /// The hold token
    pub token: HoldToken,

    /// The card the funds are reserved on
    pub card: CardNumber,

    /// Merchant that requested the hold
    pub merchant_name: String,

    /// Cents currently authorized
    ///
    /// Reversals shrink this value directly. It never grows.
    pub auth_amount: Cents,
}

impl AuthorizationHold {
    /// Create a hold with a fresh token
    pub fn new(card: CardNumber, merchant_name: &str, auth_amount: Cents) -> Self {
        AuthorizationHold {
            token: Uuid::new_v4(),
            card,
            merchant_name: merchant_name.to_string(),
            auth_amount,
        }
    }

    /// Lifecycle position of the hold given its capture, if any
    pub fn state(&self, capture: Option<&Capture>) -> HoldState {
        let settled = capture.map_or(0, Capture::settled_amount);

        match capture {
            Some(capture) if capture.completed => HoldState::Completed,
            _ if settled > 0 && settled >= self.auth_amount => HoldState::Completed,
            _ if settled > 0 => HoldState::PartiallyCaptured,
            _ if self.auth_amount == 0 => HoldState::Reversed,
            _ => HoldState::Open,
        }
    }
}

/// Lifecycle position of an authorization hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldState {
    /// Funds are blocked and nothing has been captured
    Open,
    /// Part of the authorization has been settled
    PartiallyCaptured,
    /// The whole authorization has been settled
    Completed,
    /// The authorization was released without any capture
    Reversed,
}
