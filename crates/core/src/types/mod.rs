//! Core types for Veggie Order.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod quantity;

pub use id::{ItemId, OrderId};
pub use price::Price;
pub use quantity::{Quantity, Unit};
