//! Catalog browsing commands.

use std::io::Write;

use veggie_order_core::catalog::ALL_CATEGORIES;
use veggie_order_core::{CatalogItem, Unit};
use veggie_order_storefront::AppState;
use veggie_order_storefront::storage::KeyValueStore;

use super::CliError;

/// List available items, optionally narrowed by category and search text.
///
/// Without filters the items are grouped under their category headings.
pub fn list<S: KeyValueStore>(
    state: &AppState<S>,
    category: Option<&str>,
    search: Option<&str>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let catalog = state.catalog();

    if category.is_none() && search.is_none() {
        for (category, items) in catalog.grouped() {
            let available: Vec<_> = items.into_iter().filter(|item| item.in_stock).collect();
            if available.is_empty() {
                continue;
            }
            writeln!(out, "{category}")?;
            for item in available {
                write_item(out, item)?;
            }
            writeln!(out)?;
        }
        return Ok(());
    }

    let items = catalog.filter(category.unwrap_or(ALL_CATEGORIES), search.unwrap_or_default());

    if items.is_empty() {
        writeln!(out, "No items found")?;
        return Ok(());
    }
    for item in items {
        write_item(out, item)?;
    }
    Ok(())
}

/// List categories in catalog order.
pub fn categories<S: KeyValueStore>(
    state: &AppState<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    writeln!(out, "{ALL_CATEGORIES}")?;
    for category in state.catalog().categories() {
        writeln!(out, "{category}")?;
    }
    Ok(())
}

fn write_item(out: &mut impl Write, item: &CatalogItem) -> Result<(), CliError> {
    let units = item
        .selectable_units()
        .into_iter()
        .map(Unit::as_str)
        .collect::<Vec<_>>()
        .join("/");
    writeln!(
        out,
        "  {:<6} {:<24} {}/{} [{units}]",
        item.id, item.name, item.price, item.unit
    )?;
    Ok(())
}
