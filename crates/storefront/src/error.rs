//! Unified error handling.
//!
//! Provides a unified `AppError` type for every storefront operation. The
//! presentation layer turns it into a message with [`AppError::user_message`]
//! and logs the full error for internal failures.

use thiserror::Error;

use veggie_order_core::{CartError, CatalogError};

use crate::config::ConfigError;
use crate::services::checkout::CheckoutError;
use crate::services::messaging::LaunchError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A cart operation was rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Local storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The deep link could not be opened.
    #[error("Launch error: {0}")]
    Launch(#[from] LaunchError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Whether this error is a fault of the application rather than of the
    /// customer's input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        match self {
            Self::Config(_) | Self::Catalog(_) | Self::Storage(_) | Self::Launch(_) => true,
            Self::Checkout(err) => matches!(
                err,
                CheckoutError::Storage(_) | CheckoutError::DeepLink(_)
            ),
            Self::Cart(_) | Self::NotFound(_) => false,
        }
    }

    /// Message suitable for showing to the customer.
    ///
    /// Internal failures are reported generically; the details belong in
    /// the log.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(err) => err.to_string(),
            Self::Catalog(_) => "The product catalog is unavailable".to_string(),
            Self::Storage(_) => "Could not save your changes, please try again".to_string(),
            Self::Launch(_) => "Could not open the messaging app".to_string(),
            Self::Cart(err) => capitalize(&err.to_string()),
            Self::Checkout(err) => match err {
                CheckoutError::Storage(_) | CheckoutError::DeepLink(_) => {
                    "Failed to place order, please try again".to_string()
                }
                other => capitalize(&other.to_string()),
            },
            Self::NotFound(what) => format!("{what} not found"),
        }
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
