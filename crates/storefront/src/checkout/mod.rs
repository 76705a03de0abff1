//! Checkout.
//!
//! # Architecture
//!
//! - [`cascade`] - Country → state → city → shipping state machine, no I/O
//! - [`totals`] - Price breakdown from the cart summary and shipping rate
//! - [`form`] - Shopper input and required-field validation
//! - [`submit`] - Order placement and cart clearing
//! - [`session`] - Drives all of the above against a [`CommerceApi`](crate::api::CommerceApi)

pub mod cascade;
pub mod form;
pub mod session;
pub mod submit;
pub mod totals;

#[cfg(test)]
pub(crate) mod fake;

pub use cascade::{
    Applied, CascadeError, CheckoutCascade, Destination, Level, LevelState, LookupTicket,
    ShippingLookup, ShippingState, TaggedRate,
};
pub use form::{CheckoutForm, RequiredField, ValidForm, ValidationError};
pub use session::CheckoutSession;
pub use submit::{OrderConfirmation, OrderOutcome, OrderSubmitter};
pub use totals::OrderTotals;

use thiserror::Error;

use crate::api::ApiError;

/// Errors that stop a checkout step.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Cascade(#[from] CascadeError),

    /// Backend call the step depends on failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

impl CheckoutError {
    /// Message suitable for an inline error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyCart => "Your cart is empty".to_string(),
            Self::Validation(e) => e.to_string(),
            Self::Cascade(e) => e.to_string(),
            Self::Api(e) => e.user_message(),
        }
    }
}
