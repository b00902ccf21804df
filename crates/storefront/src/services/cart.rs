//! Cart operations against local storage.
//!
//! Each operation loads the saved cart, applies one mutation from the cart
//! engine and writes the whole cart back.

use rust_decimal::Decimal;
use tracing::{debug, info};

use veggie_order_core::{Cart, CartError, CartLine, Catalog, ItemId, Quantity, QuantityChange, Unit};

use crate::error::{AppError, Result};
use crate::storage::{KeyValueStore, LocalStorage};

/// Cart service.
///
/// Resolves catalog items and persists the cart after every change.
pub struct CartService<'a, S> {
    storage: &'a mut LocalStorage<S>,
    catalog: &'a Catalog,
}

impl<'a, S: KeyValueStore> CartService<'a, S> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(storage: &'a mut LocalStorage<S>, catalog: &'a Catalog) -> Self {
        Self { storage, catalog }
    }

    /// The saved cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.storage.get_cart()
    }

    /// Add `quantity` of item `id`, in `unit` or the item's own unit.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown item, `AppError::Cart` if
    /// the cart engine rejects the change and `AppError::Storage` if the cart
    /// cannot be saved.
    pub fn add(&mut self, id: &ItemId, quantity: Decimal, unit: Option<Unit>) -> Result<Quantity> {
        let item = self
            .catalog
            .find(id)
            .ok_or_else(|| AppError::NotFound(format!("Item {id}")))?;
        let unit = unit.unwrap_or(item.unit);

        let mut cart = self.storage.get_cart();
        let line_quantity = cart.add_or_merge(item, quantity, unit)?;
        self.storage.save_cart(&cart)?;

        info!(
            item_id = %id,
            quantity = %quantity,
            unit = %unit,
            line_quantity = %line_quantity,
            "Added to cart"
        );
        Ok(line_quantity)
    }

    /// Set the quantity of the line for `id`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Cart` if the item is not in the cart or the
    /// quantity is above the maximum, `AppError::Storage` if the cart cannot
    /// be saved.
    pub fn set(&mut self, id: &ItemId, quantity: Decimal) -> Result<QuantityChange> {
        self.update(id, |cart| cart.set_quantity(id, quantity))
    }

    /// Change the quantity of the line for `id` by `delta`.
    ///
    /// # Errors
    ///
    /// Same as [`CartService::set`].
    pub fn step(&mut self, id: &ItemId, delta: Decimal) -> Result<QuantityChange> {
        self.update(id, |cart| cart.step_quantity(id, delta))
    }

    /// Remove the line for `id`, returning it if it was present.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the cart cannot be saved.
    pub fn remove(&mut self, id: &ItemId) -> Result<Option<CartLine>> {
        let mut cart = self.storage.get_cart();
        let removed = cart.remove(id);
        if removed.is_some() {
            self.storage.save_cart(&cart)?;
            info!(item_id = %id, "Removed from cart");
        } else {
            debug!(item_id = %id, "Item not in cart, nothing removed");
        }
        Ok(removed)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the cart cannot be cleared.
    pub fn clear(&mut self) -> Result<()> {
        self.storage.clear_cart()?;
        info!("Cart cleared");
        Ok(())
    }

    fn update<F>(&mut self, id: &ItemId, change: F) -> Result<QuantityChange>
    where
        F: FnOnce(&mut Cart) -> std::result::Result<QuantityChange, CartError>,
    {
        let mut cart = self.storage.get_cart();
        let outcome = change(&mut cart)?;
        self.storage.save_cart(&cart)?;

        match outcome {
            QuantityChange::Updated(quantity) => {
                info!(item_id = %id, quantity = %quantity, "Cart quantity updated");
            }
            QuantityChange::Removed => {
                info!(item_id = %id, "Quantity below minimum, removed from cart");
            }
        }
        Ok(outcome)
    }
}
