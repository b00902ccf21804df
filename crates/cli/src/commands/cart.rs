//! Cart commands.

use std::io::Write;

use rust_decimal::Decimal;

use veggie_order_core::{Cart, ItemId, QuantityChange, Unit};
use veggie_order_storefront::AppState;
use veggie_order_storefront::storage::KeyValueStore;

use super::CliError;

/// Print the cart lines and total.
pub fn show<S: KeyValueStore>(state: &AppState<S>, out: &mut impl Write) -> Result<(), CliError> {
    write_cart(out, &state.storage().get_cart())
}

/// Add an item to the cart and print the line's new quantity.
pub fn add<S: KeyValueStore>(
    state: &mut AppState<S>,
    id: &str,
    quantity: Decimal,
    unit: Option<Unit>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let id = ItemId::new(id);
    let line_quantity = state.cart().add(&id, quantity, unit)?;
    let cart = state.storage().get_cart();
    let name = cart.get(&id).map_or("", |line| line.name());
    writeln!(out, "Added to cart: {name} (now {line_quantity})")?;
    Ok(())
}

/// Set a line's quantity.
pub fn set<S: KeyValueStore>(
    state: &mut AppState<S>,
    id: &str,
    quantity: Decimal,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let id = ItemId::new(id);
    let change = state.cart().set(&id, quantity)?;
    write_change(out, &id, change)
}

/// Change a line's quantity by `delta`.
pub fn step<S: KeyValueStore>(
    state: &mut AppState<S>,
    id: &str,
    delta: Decimal,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let id = ItemId::new(id);
    let change = state.cart().step(&id, delta)?;
    write_change(out, &id, change)
}

/// Remove a line from the cart.
pub fn remove<S: KeyValueStore>(
    state: &mut AppState<S>,
    id: &str,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match state.cart().remove(&ItemId::new(id))? {
        Some(line) => writeln!(out, "Removed from cart: {}", line.name())?,
        None => writeln!(out, "Item {id} is not in the cart")?,
    }
    Ok(())
}

/// Empty the cart.
pub fn clear<S: KeyValueStore>(
    state: &mut AppState<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    state.cart().clear()?;
    writeln!(out, "Cart cleared")?;
    Ok(())
}

fn write_change(out: &mut impl Write, id: &ItemId, change: QuantityChange) -> Result<(), CliError> {
    match change {
        QuantityChange::Updated(quantity) => writeln!(out, "Item {id} quantity set to {quantity}")?,
        QuantityChange::Removed => writeln!(out, "Item {id} removed from cart")?,
    }
    Ok(())
}

/// Render cart lines followed by the total.
pub(crate) fn write_cart(out: &mut impl Write, cart: &Cart) -> Result<(), CliError> {
    if cart.is_empty() {
        writeln!(out, "Your cart is empty")?;
        return Ok(());
    }

    writeln!(out, "Cart ({} items)", cart.len())?;
    for line in cart.lines() {
        writeln!(
            out,
            "  {:<6} {:<24} {} {} x {} = {}",
            line.id(),
            line.name(),
            line.quantity(),
            line.unit(),
            line.price(),
            line.total_price()
        )?;
    }
    writeln!(out, "Total: {}", cart.total())?;
    Ok(())
}
