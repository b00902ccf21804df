//! Subcommand implementations.
//!
//! Every command renders to a caller-supplied writer so the output can be
//! checked in tests.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;

use thiserror::Error;

use veggie_order_storefront::AppError;

pub use checkout::CheckoutArgs;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// The storefront rejected or failed the operation.
    #[error(transparent)]
    App(#[from] AppError),

    /// Writing output failed.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use veggie_order_core::Catalog;
    use veggie_order_storefront::AppState;
    use veggie_order_storefront::config::StorefrontConfig;
    use veggie_order_storefront::storage::MemoryStore;

    /// State over an empty in-memory store and the builtin catalog.
    #[allow(clippy::unwrap_used)]
    pub fn state() -> AppState<MemoryStore> {
        let vars: HashMap<String, String> = HashMap::new();
        let config = StorefrontConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();
        AppState::with_store(config, Catalog::builtin().unwrap(), MemoryStore::new())
    }

    /// Captured output as text.
    #[allow(clippy::unwrap_used)]
    pub fn text(out: Vec<u8>) -> String {
        String::from_utf8(out).unwrap()
    }
}
