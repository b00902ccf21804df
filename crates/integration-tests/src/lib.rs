//! Integration tests for Veggie Order.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p veggie-order-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - End-to-end checkout against a file-backed store
//! - `cart_persistence` - Cart and history records on disk
//! - `cart_properties` - Property tests for the cart engine
//!
//! Every test runs against its own temporary data directory.

use std::collections::HashMap;
use std::path::Path;

use tempfile::TempDir;

use veggie_order_storefront::AppState;
use veggie_order_storefront::config::StorefrontConfig;
use veggie_order_storefront::services::checkout::Checkout;
use veggie_order_storefront::storage::FileStore;

/// A storefront over a throw-away data directory.
pub struct TestContext {
    dir: TempDir,
    pub state: AppState<FileStore>,
}

impl TestContext {
    /// Create a storefront with the builtin catalog and an empty store.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory or the store cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let state = open_state(dir.path());
        Self { dir, state }
    }

    /// The data directory backing the store.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    /// A second, independent storefront over the same data directory.
    ///
    /// # Panics
    ///
    /// Panics if the store cannot be opened.
    #[must_use]
    pub fn reopen(&self) -> AppState<FileStore> {
        open_state(self.dir.path())
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Fill every required checkout field.
///
/// # Panics
///
/// Panics if the checkout was already submitted.
pub fn fill_form(checkout: &mut Checkout, name: &str, phone: &str, address: &str) {
    let form = checkout.form_mut().expect("Checkout already submitted");
    form.name = name.to_string();
    form.phone = phone.to_string();
    form.address = address.to_string();
}

fn open_state(dir: &Path) -> AppState<FileStore> {
    let vars = HashMap::from([(
        "VEGGIE_DATA_DIR".to_string(),
        dir.display().to_string(),
    )]);
    let config = StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
        .expect("Failed to build test config");
    AppState::open(config).expect("Failed to open storefront")
}
