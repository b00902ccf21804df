//! Veggie Order storefront library.
//!
//! Wires the core cart engine to local storage and the checkout hand-off:
//!
//! - [`config`] - environment configuration
//! - [`storage`] - local-storage records for cart, profile and order history
//! - [`services`] - cart operations, checkout flow and messaging deep links
//! - [`state`] - everything one run of the storefront needs
//! - [`error`] - the unified `AppError`

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod storage;

pub use error::{AppError, Result};
pub use state::AppState;
