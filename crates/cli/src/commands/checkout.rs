//! Checkout command.

use std::io::Write;

use tracing::debug;
use url::Url;

use veggie_order_storefront::AppState;
use veggie_order_storefront::error::AppError;
use veggie_order_storefront::services::messaging::{LaunchError, MessageLauncher};
use veggie_order_storefront::storage::KeyValueStore;

use super::CliError;

/// Form values given on the command line. `None` keeps the prefilled value.
#[derive(Debug, Default)]
pub struct CheckoutArgs {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub note: Option<String>,
}

/// Prints the deep link for the customer to open.
#[derive(Debug, Clone, Copy)]
pub struct StdoutLauncher;

impl MessageLauncher for StdoutLauncher {
    fn launch(&self, link: &Url) -> Result<(), LaunchError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "Open this link to send your order on WhatsApp:")?;
        writeln!(out, "{link}")?;
        Ok(())
    }
}

/// Submit the cart as an order and print the confirmation.
pub fn place_order<S, L>(
    state: &mut AppState<S>,
    args: CheckoutArgs,
    launcher: &L,
    out: &mut impl Write,
) -> Result<(), CliError>
where
    S: KeyValueStore,
    L: MessageLauncher,
{
    let mut checkout = state.begin_checkout();
    if let Some(form) = checkout.form_mut() {
        let CheckoutArgs {
            name,
            phone,
            address,
            note,
        } = args;
        if let Some(name) = name {
            form.name = name;
        }
        if let Some(phone) = phone {
            form.phone = phone;
        }
        if let Some(address) = address {
            form.address = address;
        }
        if let Some(note) = note {
            form.note = note;
        }
    }

    let confirmation = checkout
        .submit(state.storage_mut(), launcher)
        .map_err(AppError::from)?;
    debug!(link = %confirmation.deep_link, "Checkout complete");

    let order = &confirmation.order;
    writeln!(out, "Order Placed Successfully!")?;
    writeln!(out, "Order #{} for {}", order.order_id.short(), order.total)?;
    writeln!(
        out,
        "Your order details have been sent to {}. If WhatsApp did not open, call us at {}.",
        state.config().store_name,
        state.config().contact_phone
    )?;
    Ok(())
}
