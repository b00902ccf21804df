//! Checkout error types.

use std::fmt;

use thiserror::Error;

use crate::storage::StorageError;

/// A required checkout form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Phone,
    Address,
}

impl Field {
    /// Field label as shown to the customer.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Address => "address",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors that can occur when submitting a checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// One or more required fields are blank.
    #[error("please fill in all required fields: {}", join(.0))]
    MissingFields(Vec<Field>),

    /// There is nothing to order.
    #[error("your cart is empty")]
    EmptyCart,

    /// The checkout was already submitted.
    #[error("order already submitted")]
    AlreadySubmitted,

    /// The deep link could not be built.
    #[error("invalid deep link: {0}")]
    DeepLink(#[from] url::ParseError),

    /// Reading or writing local storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

fn join(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}
