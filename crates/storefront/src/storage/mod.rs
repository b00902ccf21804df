//! Local persistence for the cart, the user profile and the order history.
//!
//! # Layout
//!
//! Three independent JSON records live in a key-value store:
//!
//! - `cart` - array of cart lines
//! - `userInfo` - the saved delivery details
//! - `orderHistory` - array of order records, oldest first
//!
//! Every write is a full overwrite of one record. There is no locking and
//! no merging: two processes writing the same key race, and the last write
//! wins.
//!
//! Reads never fail. A missing record, an unreadable record or malformed
//! JSON all read back as the empty default.

mod file;
mod memory;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use veggie_order_core::{Cart, OrderRecord, UserProfile};

pub use file::FileStore;
pub use memory::MemoryStore;

/// Record keys.
pub mod keys {
    pub const CART: &str = "cart";
    pub const USER_INFO: &str = "userInfo";
    pub const ORDER_HISTORY: &str = "orderHistory";
}

/// Errors from the underlying store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing a record failed.
    #[error("storage I/O error for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A value could not be encoded as JSON.
    #[error("failed to encode '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The key cannot be used as a record name.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// A string key-value store with local-storage semantics.
pub trait KeyValueStore {
    /// Read the raw value for `key`, `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the key cannot be deleted.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Typed access to the storefront's records.
#[derive(Debug)]
pub struct LocalStorage<S> {
    store: S,
}

impl<S: KeyValueStore> LocalStorage<S> {
    /// Wrap a key-value store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The saved cart, or an empty cart.
    ///
    /// A record that breaks the cart invariants is treated as malformed.
    #[must_use]
    pub fn get_cart(&self) -> Cart {
        let cart: Cart = self.read(keys::CART).unwrap_or_default();
        match cart.validate() {
            Ok(()) => cart,
            Err(e) => {
                warn!(key = keys::CART, error = %e, "Invalid cart record, using default");
                Cart::default()
            }
        }
    }

    /// Overwrite the saved cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be written.
    pub fn save_cart(&mut self, cart: &Cart) -> Result<(), StorageError> {
        self.write(keys::CART, cart)
    }

    /// Delete the saved cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be deleted.
    pub fn clear_cart(&mut self) -> Result<(), StorageError> {
        debug!(key = keys::CART, "Clearing record");
        self.store.remove(keys::CART)
    }

    /// The saved delivery details, if any.
    #[must_use]
    pub fn get_user_info(&self) -> Option<UserProfile> {
        self.read(keys::USER_INFO)
    }

    /// Overwrite the saved delivery details.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the profile cannot be written.
    pub fn save_user_info(&mut self, info: &UserProfile) -> Result<(), StorageError> {
        self.write(keys::USER_INFO, info)
    }

    /// Every recorded order, oldest first.
    #[must_use]
    pub fn get_order_history(&self) -> Vec<OrderRecord> {
        self.read(keys::ORDER_HISTORY).unwrap_or_default()
    }

    /// Append `order` to the order history.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the history cannot be written.
    pub fn append_order(&mut self, order: &OrderRecord) -> Result<(), StorageError> {
        let mut history = self.get_order_history();
        history.push(order.clone());
        self.write(keys::ORDER_HISTORY, &history)
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consume the wrapper and return the underlying store.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.store
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(key, error = %e, "Failed to read record, using default");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Malformed record, using default");
                None
            }
        }
    }

    fn write<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        debug!(key, bytes = json.len(), "Writing record");
        self.store.set(key, &json)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use veggie_order_core::{Catalog, CustomerInfo, ItemId, Unit};

    use super::*;

    fn storage() -> LocalStorage<MemoryStore> {
        LocalStorage::new(MemoryStore::new())
    }

    fn cart_with_tomatoes() -> Cart {
        let catalog = Catalog::builtin().unwrap();
        let tomatoes = catalog.find(&ItemId::new("001")).unwrap();
        let mut cart = Cart::new();
        cart.add_or_merge(tomatoes, dec!(0.5), Unit::Kg).unwrap();
        cart
    }

    #[test]
    fn test_empty_store_reads_defaults() {
        let storage = storage();
        assert!(storage.get_cart().is_empty());
        assert!(storage.get_user_info().is_none());
        assert!(storage.get_order_history().is_empty());
    }

    #[test]
    fn test_cart_round_trip_and_clear() {
        let mut storage = storage();
        let cart = cart_with_tomatoes();

        storage.save_cart(&cart).unwrap();
        assert_eq!(storage.get_cart(), cart);

        storage.clear_cart().unwrap();
        assert!(storage.get_cart().is_empty());
        assert!(storage.store().get(keys::CART).unwrap().is_none());
    }

    #[test]
    fn test_malformed_json_reads_as_default() {
        let mut store = MemoryStore::new();
        store.set(keys::CART, "{oops").unwrap();
        store.set(keys::USER_INFO, "[]").unwrap();
        store.set(keys::ORDER_HISTORY, "42").unwrap();
        let storage = LocalStorage::new(store);

        assert!(storage.get_cart().is_empty());
        assert!(storage.get_user_info().is_none());
        assert!(storage.get_order_history().is_empty());
    }

    #[test]
    fn test_cart_breaking_invariants_reads_as_empty() {
        let line = r#"{"id":"001","name":"Tomato","price":30,"quantity":1,"unit":"kg","totalPrice":30}"#;
        let mut store = MemoryStore::new();
        store.set(keys::CART, &format!("[{line},{line}]")).unwrap();
        assert!(LocalStorage::new(store).get_cart().is_empty());

        let mut store = MemoryStore::new();
        store
            .set(
                keys::CART,
                r#"[{"id":"001","name":"Tomato","price":30,"quantity":25,"unit":"kg","totalPrice":750}]"#,
            )
            .unwrap();
        assert!(LocalStorage::new(store).get_cart().is_empty());
    }

    #[test]
    fn test_user_info_is_overwritten() {
        let mut storage = storage();
        let first = UserProfile {
            name: "A".to_string(),
            phone: "1".to_string(),
            address: "X".to_string(),
        };
        let second = UserProfile {
            name: "B".to_string(),
            ..first.clone()
        };

        storage.save_user_info(&first).unwrap();
        storage.save_user_info(&second).unwrap();
        assert_eq!(storage.get_user_info(), Some(second));
    }

    #[test]
    fn test_append_order_keeps_previous_orders() {
        let mut storage = storage();
        let cart = cart_with_tomatoes();
        let first = OrderRecord::new(
            CustomerInfo::default(),
            &cart,
            Utc.timestamp_millis_opt(1_000).unwrap(),
        );
        let second = OrderRecord::new(
            CustomerInfo::default(),
            &cart,
            Utc.timestamp_millis_opt(2_000).unwrap(),
        );

        storage.append_order(&first).unwrap();
        storage.append_order(&second).unwrap();

        let history = storage.get_order_history();
        assert_eq!(history, vec![first, second]);
    }

    #[test]
    fn test_records_use_expected_keys() {
        let mut storage = storage();
        storage.save_cart(&cart_with_tomatoes()).unwrap();
        storage.save_user_info(&UserProfile::default()).unwrap();

        let raw = storage.store().get("cart").unwrap().unwrap();
        assert!(raw.starts_with('['));
        assert!(storage.store().get("userInfo").unwrap().is_some());
    }
}
