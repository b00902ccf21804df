//! Saved profile and order history.

use std::io::Write;

use veggie_order_storefront::AppState;
use veggie_order_storefront::storage::KeyValueStore;

use super::CliError;

/// Print the saved delivery details.
pub fn profile<S: KeyValueStore>(
    state: &AppState<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match state.storage().get_user_info() {
        Some(profile) => {
            writeln!(out, "Name:    {}", profile.name)?;
            writeln!(out, "Phone:   {}", profile.phone)?;
            writeln!(out, "Address: {}", profile.address)?;
        }
        None => writeln!(out, "No saved profile yet")?,
    }
    Ok(())
}

/// Print past orders, most recent first.
pub fn orders<S: KeyValueStore>(
    state: &AppState<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let history = state.storage().get_order_history();
    if history.is_empty() {
        writeln!(out, "You haven't placed any orders yet")?;
        return Ok(());
    }

    for order in history.iter().rev() {
        writeln!(
            out,
            "Order #{}  {}  {}",
            order.order_id.short(),
            order.display_date(),
            order.total
        )?;
        for line in &order.items {
            writeln!(
                out,
                "  {} ({} {}) - {}",
                line.name(),
                line.quantity(),
                line.unit(),
                line.total_price()
            )?;
        }
        let note = order.customer_info.note.trim();
        if !note.is_empty() {
            writeln!(out, "  Note: {note}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}
