//! The cart engine.
//!
//! A [`Cart`] is an ordered list of [`CartLine`]s, at most one per catalog
//! item. All operations here are synchronous and in-memory; persisting the
//! cart after a mutation is the caller's responsibility.
//!
//! Line quantities are held in base units (kg or piece) and stay within
//! [`Quantity::MIN`]..=[`Quantity::MAX`]. A line whose quantity would fall
//! below the minimum is removed rather than stored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;
use crate::types::{ItemId, Price, Quantity, Unit};

/// Errors returned by cart operations. The cart is unchanged on error.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The requested quantity is zero or negative.
    #[error("quantity must be greater than zero")]
    NonPositiveQuantity,

    /// The quantity converts to less than the minimum line quantity.
    #[error("quantity must be at least {min} {unit}")]
    BelowMinimum {
        /// Smallest allowed quantity.
        min: Quantity,
        /// Base unit of the line.
        unit: Unit,
    },

    /// The resulting line quantity would exceed the maximum.
    #[error("quantity for item {id} cannot exceed {max} {unit}")]
    AboveMaximum {
        /// Offending item.
        id: ItemId,
        /// Largest allowed quantity.
        max: Quantity,
        /// Base unit of the line.
        unit: Unit,
    },

    /// The item is out of stock.
    #[error("item {0} is out of stock")]
    OutOfStock(ItemId),

    /// The item cannot be measured in the requested unit.
    #[error("item {id} cannot be ordered in {unit}")]
    UnsupportedUnit {
        /// Offending item.
        id: ItemId,
        /// Requested unit.
        unit: Unit,
    },

    /// No line for this item exists in the cart.
    #[error("item {0} is not in the cart")]
    NotInCart(ItemId),

    /// More than one line refers to the same item.
    #[error("item {0} appears on more than one cart line")]
    DuplicateLine(ItemId),
}

/// Outcome of a successful quantity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The line now holds this quantity.
    Updated(Quantity),
    /// The quantity fell below the minimum and the line was removed.
    Removed,
}

/// A quantity of one catalog item held for purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    id: ItemId,
    name: String,
    /// Price per base unit, captured when the line was created.
    price: Price,
    #[serde(default)]
    image: String,
    quantity: Quantity,
    unit: Unit,
    total_price: Price,
}

impl CartLine {
    fn new(item: &CatalogItem, quantity: Quantity, total_price: Price) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            image: item.image.clone(),
            quantity,
            unit: item.unit,
            total_price,
        }
    }

    /// The catalog item this line refers to.
    #[must_use]
    pub const fn id(&self) -> &ItemId {
        &self.id
    }

    /// Display name of the item.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Price per base unit.
    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    /// Image URL of the item.
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Quantity in base units.
    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Base unit of the quantity (kg or piece).
    #[must_use]
    pub const fn unit(&self) -> Unit {
        self.unit
    }

    /// Line total.
    #[must_use]
    pub const fn total_price(&self) -> Price {
        self.total_price
    }
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add `quantity` of `item`, measured in `unit`, merging into an existing
    /// line for the same item. Returns the line's resulting quantity.
    ///
    /// Grams are converted to kilograms before storage and the line total is
    /// priced per kilogram accordingly.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the item is out of stock, the unit is not
    /// offered for the item, the quantity is not positive or converts to
    /// less than the minimum, or the merged line would exceed the maximum.
    pub fn add_or_merge(
        &mut self,
        item: &CatalogItem,
        quantity: Decimal,
        unit: Unit,
    ) -> Result<Quantity, CartError> {
        if quantity <= Decimal::ZERO {
            return Err(CartError::NonPositiveQuantity);
        }
        if !item.in_stock {
            return Err(CartError::OutOfStock(item.id.clone()));
        }
        if !item.accepts(unit) {
            return Err(CartError::UnsupportedUnit {
                id: item.id.clone(),
                unit,
            });
        }

        let added = Quantity::new(unit.to_base(quantity));
        if added.is_below_min() {
            return Err(CartError::BelowMinimum {
                min: Quantity::MIN,
                unit: item.unit,
            });
        }
        if added.is_above_max() {
            return Err(above_max(item.id.clone(), item.unit));
        }

        if let Some(line) = self.lines.iter_mut().find(|line| line.id == item.id) {
            let merged = line
                .quantity
                .checked_add(added)
                .filter(|merged| !merged.is_above_max())
                .ok_or_else(|| above_max(item.id.clone(), item.unit))?;
            line.quantity = merged;
            line.total_price += item.price * added;
            return Ok(merged);
        }

        let added_total = item.price * added;
        self.lines.push(CartLine::new(item, added, added_total));
        Ok(added)
    }

    /// Set the quantity of the line for `id`.
    ///
    /// Negative quantities are treated as zero. A quantity below the minimum
    /// removes the line; otherwise the line total is recomputed from the
    /// line's unit price.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotInCart` if there is no such line and
    /// `CartError::AboveMaximum` (leaving the line untouched) if the quantity
    /// exceeds the maximum.
    pub fn set_quantity(
        &mut self,
        id: &ItemId,
        quantity: Decimal,
    ) -> Result<QuantityChange, CartError> {
        let not_in_cart = || CartError::NotInCart(id.clone());
        let index = self.position(id).ok_or_else(not_in_cart)?;
        let quantity = Quantity::new(quantity).non_negative();

        if quantity.is_below_min() {
            self.lines.remove(index);
            return Ok(QuantityChange::Removed);
        }

        let line = self.lines.get_mut(index).ok_or_else(not_in_cart)?;
        if quantity.is_above_max() {
            return Err(above_max(line.id.clone(), line.unit));
        }
        line.quantity = quantity;
        line.total_price = line.price * quantity;
        Ok(QuantityChange::Updated(quantity))
    }

    /// Change the quantity of the line for `id` by `delta`.
    ///
    /// # Errors
    ///
    /// Same as [`Cart::set_quantity`].
    pub fn step_quantity(
        &mut self,
        id: &ItemId,
        delta: Decimal,
    ) -> Result<QuantityChange, CartError> {
        let line = self.get(id).ok_or_else(|| CartError::NotInCart(id.clone()))?;
        let stepped = line
            .quantity
            .amount()
            .checked_add(delta)
            .ok_or_else(|| above_max(line.id.clone(), line.unit))?;
        self.set_quantity(id, stepped)
    }

    /// Check the invariants the cart operations maintain: one line per item,
    /// quantities within [`Quantity::MIN`]..=[`Quantity::MAX`] and base units
    /// only. Useful for carts read back from storage.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, in line order.
    pub fn validate(&self) -> Result<(), CartError> {
        for (index, line) in self.lines.iter().enumerate() {
            if self.lines.iter().take(index).any(|prev| prev.id == line.id) {
                return Err(CartError::DuplicateLine(line.id.clone()));
            }
            if !line.unit.is_base() {
                return Err(CartError::UnsupportedUnit {
                    id: line.id.clone(),
                    unit: line.unit,
                });
            }
            if line.quantity.is_below_min() {
                return Err(CartError::BelowMinimum {
                    min: Quantity::MIN,
                    unit: line.unit,
                });
            }
            if line.quantity.is_above_max() {
                return Err(above_max(line.id.clone(), line.unit));
            }
        }
        Ok(())
    }

    /// Remove the line for `id`, returning it if it was present.
    pub fn remove(&mut self, id: &ItemId) -> Option<CartLine> {
        self.position(id).map(|index| self.lines.remove(index))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::total_price).sum()
    }

    /// The line for `id`, if any.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.id == id)
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of lines, as shown on the cart badge.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Consume the cart and return its lines.
    #[must_use]
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    fn position(&self, id: &ItemId) -> Option<usize> {
        self.lines.iter().position(|line| &line.id == id)
    }
}

fn above_max(id: ItemId, unit: Unit) -> CartError {
    CartError::AboveMaximum {
        id,
        max: Quantity::MAX,
        unit,
    }
}
