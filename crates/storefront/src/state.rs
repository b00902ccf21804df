//! Application state shared by every command.

use tracing::info;

use veggie_order_core::Catalog;

use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::services::cart::CartService;
use crate::services::checkout::Checkout;
use crate::services::messaging::WhatsAppLink;
use crate::storage::{FileStore, KeyValueStore, LocalStorage};

/// Application state.
///
/// Owns the configuration, the catalog and the local store for one run of
/// the storefront.
#[derive(Debug)]
pub struct AppState<S = FileStore> {
    config: StorefrontConfig,
    catalog: Catalog,
    storage: LocalStorage<S>,
    link: WhatsAppLink,
}

impl AppState<FileStore> {
    /// Open the file-backed store and load the catalog named in `config`.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created or the
    /// catalog fails to load.
    pub fn open(config: StorefrontConfig) -> Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => {
                info!(path = %path.display(), "Loading catalog from file");
                Catalog::load(path)?
            }
            None => Catalog::builtin()?,
        };
        let store = FileStore::open(&config.data_dir)?;
        info!(
            data_dir = %config.data_dir.display(),
            items = catalog.len(),
            "Storefront ready"
        );
        Ok(Self::with_store(config, catalog, store))
    }
}

impl<S: KeyValueStore> AppState<S> {
    /// Create state over an arbitrary store.
    #[must_use]
    pub fn with_store(config: StorefrontConfig, catalog: Catalog, store: S) -> Self {
        let link = WhatsAppLink::new(&config.whatsapp);
        Self {
            config,
            catalog,
            storage: LocalStorage::new(store),
            link,
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Get a reference to local storage.
    #[must_use]
    pub const fn storage(&self) -> &LocalStorage<S> {
        &self.storage
    }

    /// Get a mutable reference to local storage.
    pub const fn storage_mut(&mut self) -> &mut LocalStorage<S> {
        &mut self.storage
    }

    /// Cart operations over this state's catalog and storage.
    pub const fn cart(&mut self) -> CartService<'_, S> {
        CartService::new(&mut self.storage, &self.catalog)
    }

    /// Start a checkout prefilled from the saved profile.
    #[must_use]
    pub fn begin_checkout(&self) -> Checkout {
        Checkout::begin(&self.storage, self.link.clone())
    }
}
