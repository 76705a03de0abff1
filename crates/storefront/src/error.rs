//! Unified error handling.
//!
//! Each subsystem has its own error type; [`StorefrontError`] gathers them for
//! callers (such as the CLI) that drive several subsystems at once.

use thiserror::Error;

use crate::api::ApiError;
use crate::cart::{CartError, StorageError};
use crate::checkout::CheckoutError;
use crate::config::ConfigError;

/// Crate-level error type.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Cart storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A cart operation was refused.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Commerce backend call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Checkout could not proceed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl StorefrontError {
    /// Message suitable for showing to a shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(e) => e.user_message(),
            Self::Checkout(e) => e.user_message(),
            Self::Cart(e) => e.to_string(),
            Self::NotFound(what) => format!("{what} was not found"),
            Self::Config(_) | Self::Storage(_) => "Something went wrong, please try again".to_string(),
        }
    }

    /// Whether the error is worth reporting to error tracking.
    ///
    /// Shopper mistakes and backend rejections are expected and are not.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        match self {
            Self::Config(_) | Self::Storage(_) => true,
            Self::Api(e) => !matches!(e, ApiError::Rejected(_) | ApiError::Status { .. }),
            Self::Cart(_) | Self::Checkout(_) | Self::NotFound(_) => false,
        }
    }
}

/// Result type alias using [`StorefrontError`].
pub type Result<T> = std::result::Result<T, StorefrontError>;
