//! Checkout flow.
//!
//! A [`Checkout`] is a two-state machine:
//!
//! ```text
//! Editing --submit ok--> Submitted
//!    ^  |
//!    +--+ submit failed (missing fields, empty cart)
//! ```
//!
//! A successful submit records the order, empties the cart and hands the
//! order summary to the shop through a deep link. `Submitted` is terminal.

mod error;

pub use error::{CheckoutError, Field};

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};
use url::Url;

use veggie_order_core::{CustomerInfo, OrderRecord, UserProfile};

use crate::services::messaging::{MessageLauncher, WhatsAppLink};
use crate::storage::{KeyValueStore, LocalStorage};

/// Delivery details as typed into the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub note: String,
}

impl CheckoutForm {
    /// A form prefilled from the saved profile, with an empty note.
    #[must_use]
    pub fn prefilled(profile: Option<&UserProfile>) -> Self {
        profile.map_or_else(Self::default, |profile| Self {
            name: profile.name.clone(),
            phone: profile.phone.clone(),
            address: profile.address.clone(),
            note: String::new(),
        })
    }

    /// Required fields that are blank, in form order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<Field> {
        [
            (Field::Name, &self.name),
            (Field::Phone, &self.phone),
            (Field::Address, &self.address),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Check the required fields and return trimmed customer details.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::MissingFields` naming every blank required
    /// field.
    pub fn validate(&self) -> Result<CustomerInfo, CheckoutError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(CheckoutError::MissingFields(missing));
        }

        Ok(CustomerInfo {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            note: self.note.trim().to_string(),
        })
    }
}

/// The result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    /// The order as appended to the history.
    pub order: OrderRecord,
    /// Deep link carrying the order summary.
    pub deep_link: Url,
}

/// Checkout state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutState {
    Editing(CheckoutForm),
    Submitted(OrderConfirmation),
}

/// A single checkout session.
#[derive(Debug, Clone)]
pub struct Checkout {
    state: CheckoutState,
    link: WhatsAppLink,
}

impl Checkout {
    /// Start a checkout, prefilling the form from the saved profile.
    #[must_use]
    pub fn begin<S: KeyValueStore>(storage: &LocalStorage<S>, link: WhatsAppLink) -> Self {
        let profile = storage.get_user_info();
        Self {
            state: CheckoutState::Editing(CheckoutForm::prefilled(profile.as_ref())),
            link,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// The form, while still editing.
    #[must_use]
    pub const fn form(&self) -> Option<&CheckoutForm> {
        match &self.state {
            CheckoutState::Editing(form) => Some(form),
            CheckoutState::Submitted(_) => None,
        }
    }

    /// Mutable access to the form, while still editing.
    pub const fn form_mut(&mut self) -> Option<&mut CheckoutForm> {
        match &mut self.state {
            CheckoutState::Editing(form) => Some(form),
            CheckoutState::Submitted(_) => None,
        }
    }

    /// Whether the order has been placed.
    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        matches!(self.state, CheckoutState::Submitted(_))
    }

    /// Submit the order now.
    ///
    /// # Errors
    ///
    /// See [`Checkout::submit_at`].
    pub fn submit<S, L>(
        &mut self,
        storage: &mut LocalStorage<S>,
        launcher: &L,
    ) -> Result<OrderConfirmation, CheckoutError>
    where
        S: KeyValueStore,
        L: MessageLauncher,
    {
        self.submit_at(storage, launcher, Utc::now())
    }

    /// Submit the order as placed at `placed_at`.
    ///
    /// The saved profile is updated as soon as the fields validate, even if
    /// the cart then turns out to be empty. Once the order is recorded the
    /// checkout is submitted: failing to clear the cart or to open the deep
    /// link is logged and does not undo it.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::AlreadySubmitted` after a successful submit,
    /// `CheckoutError::MissingFields` or `CheckoutError::EmptyCart` when the
    /// order cannot be placed (storage is then unchanged apart from the
    /// profile), and `CheckoutError::Storage` if the profile or the order
    /// cannot be written.
    #[instrument(skip_all, fields(placed_at = %placed_at))]
    pub fn submit_at<S, L>(
        &mut self,
        storage: &mut LocalStorage<S>,
        launcher: &L,
        placed_at: DateTime<Utc>,
    ) -> Result<OrderConfirmation, CheckoutError>
    where
        S: KeyValueStore,
        L: MessageLauncher,
    {
        let form = match &self.state {
            CheckoutState::Editing(form) => form,
            CheckoutState::Submitted(_) => return Err(CheckoutError::AlreadySubmitted),
        };

        let customer = form.validate()?;
        storage.save_user_info(&customer.profile())?;

        let cart = storage.get_cart();
        if cart.is_empty() {
            info!("Checkout rejected: cart is empty");
            return Err(CheckoutError::EmptyCart);
        }

        let order = OrderRecord::new(customer, &cart, placed_at);
        let deep_link = self.link.order_link(&order.summary())?;

        storage.append_order(&order)?;
        if let Err(e) = storage.clear_cart() {
            warn!(order_id = %order.order_id, error = %e, "Order recorded but cart not cleared");
        }

        info!(
            order_id = %order.order_id,
            items = order.items.len(),
            total = %order.total,
            "Order placed"
        );

        if let Err(e) = launcher.launch(&deep_link) {
            warn!(order_id = %order.order_id, error = %e, "Failed to open order deep link");
        }

        let confirmation = OrderConfirmation { order, deep_link };
        self.state = CheckoutState::Submitted(confirmation.clone());
        Ok(confirmation)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use veggie_order_core::{Cart, Catalog, ItemId, Unit};

    use super::*;
    use crate::config::WhatsAppConfig;
    use crate::services::messaging::{LaunchError, RecordingLauncher};
    use crate::storage::{KeyValueStore, MemoryStore, StorageError};

    struct BrokenLauncher;

    impl MessageLauncher for BrokenLauncher {
        fn launch(&self, _link: &Url) -> Result<(), LaunchError> {
            Err(LaunchError::Unavailable("no browser".to_string()))
        }
    }

    /// A store that cannot delete records.
    #[derive(Default)]
    struct StuckStore(MemoryStore);

    impl KeyValueStore for StuckStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.0.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                key: key.to_string(),
                source: std::io::Error::other("disk"),
            })
        }
    }

    fn link() -> WhatsAppLink {
        WhatsAppLink::new(&WhatsAppConfig {
            base_url: Url::parse("https://wa.me").unwrap(),
            number: "919879876030".to_string(),
        })
    }

    fn placed_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 3, 20, 10, 30, 0).unwrap()
    }

    fn storage_with_cart() -> LocalStorage<MemoryStore> {
        let catalog = Catalog::builtin().unwrap();
        let mut cart = Cart::new();
        cart.add_or_merge(catalog.find(&ItemId::new("001")).unwrap(), dec!(0.5), Unit::Kg)
            .unwrap();
        let mut storage = LocalStorage::new(MemoryStore::new());
        storage.save_cart(&cart).unwrap();
        storage
    }

    fn fill(checkout: &mut Checkout) {
        let form = checkout.form_mut().unwrap();
        form.name = "Asha".to_string();
        form.phone = "9876543210".to_string();
        form.address = "12 Market Road".to_string();
    }

    #[test]
    fn test_prefilled_from_profile() {
        let mut storage = LocalStorage::new(MemoryStore::new());
        storage
            .save_user_info(&UserProfile {
                name: "Asha".to_string(),
                phone: "98".to_string(),
                address: "Road".to_string(),
            })
            .unwrap();

        let checkout = Checkout::begin(&storage, link());
        let form = checkout.form().unwrap();
        assert_eq!(form.name, "Asha");
        assert_eq!(form.address, "Road");
        assert!(form.note.is_empty());
    }

    #[test]
    fn test_missing_fields_leave_storage_untouched() {
        let mut storage = storage_with_cart();
        let cart_before = storage.get_cart();
        let mut checkout = Checkout::begin(&storage, link());
        checkout.form_mut().unwrap().name = "Asha".to_string();
        checkout.form_mut().unwrap().phone = "   ".to_string();

        let err = checkout
            .submit_at(&mut storage, &RecordingLauncher::new(), placed_at())
            .unwrap_err();

        assert!(
            matches!(err, CheckoutError::MissingFields(ref fields) if *fields == [Field::Phone, Field::Address])
        );
        assert_eq!(storage.get_cart(), cart_before);
        assert!(storage.get_order_history().is_empty());
        assert!(storage.get_user_info().is_none());
        assert!(!checkout.is_submitted());
    }

    #[test]
    fn test_empty_cart_saves_profile_but_places_nothing() {
        let mut storage = LocalStorage::new(MemoryStore::new());
        let mut checkout = Checkout::begin(&storage, link());
        fill(&mut checkout);
        let launcher = RecordingLauncher::new();

        let err = checkout
            .submit_at(&mut storage, &launcher, placed_at())
            .unwrap_err();

        assert!(matches!(err, CheckoutError::EmptyCart));
        assert_eq!(storage.get_user_info().unwrap().name, "Asha");
        assert!(storage.get_order_history().is_empty());
        assert!(launcher.opened().is_empty());
        assert!(checkout.form().is_some());
    }

    #[test]
    fn test_successful_submit() {
        let mut storage = storage_with_cart();
        let total_before = storage.get_cart().total();
        let mut checkout = Checkout::begin(&storage, link());
        fill(&mut checkout);
        checkout.form_mut().unwrap().note = "Ring twice".to_string();
        let launcher = RecordingLauncher::new();

        let confirmation = checkout
            .submit_at(&mut storage, &launcher, placed_at())
            .unwrap();

        assert!(checkout.is_submitted());
        assert!(storage.get_cart().is_empty());
        let history = storage.get_order_history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0], confirmation.order);
        assert_eq!(confirmation.order.total, total_before);
        assert_eq!(confirmation.order.order_id.as_str(), "ORD1679308200000");
        assert_eq!(launcher.opened(), vec![confirmation.deep_link.clone()]);

        let text = confirmation
            .deep_link
            .query_pairs()
            .find(|(key, _)| key == "text")
            .map(|(_, value)| value.into_owned())
            .unwrap();
        assert_eq!(text, confirmation.order.summary());
        assert!(text.contains("*Note:* Ring twice"));
    }

    #[test]
    fn test_second_submit_is_rejected() {
        let mut storage = storage_with_cart();
        let mut checkout = Checkout::begin(&storage, link());
        fill(&mut checkout);
        let launcher = RecordingLauncher::new();
        checkout.submit_at(&mut storage, &launcher, placed_at()).unwrap();

        let err = checkout
            .submit_at(&mut storage, &launcher, placed_at())
            .unwrap_err();
        assert!(matches!(err, CheckoutError::AlreadySubmitted));
        assert_eq!(storage.get_order_history().len(), 1);
        assert!(checkout.form_mut().is_none());
    }

    #[test]
    fn test_launcher_failure_keeps_order() {
        let mut storage = storage_with_cart();
        let mut checkout = Checkout::begin(&storage, link());
        fill(&mut checkout);

        checkout
            .submit_at(&mut storage, &BrokenLauncher, placed_at())
            .unwrap();

        assert_eq!(storage.get_order_history().len(), 1);
        assert!(storage.get_cart().is_empty());
    }

    #[test]
    fn test_failed_cart_clear_records_order_once() {
        let cart = storage_with_cart().get_cart();
        let mut storage = LocalStorage::new(StuckStore::default());
        storage.save_cart(&cart).unwrap();
        let mut checkout = Checkout::begin(&storage, link());
        fill(&mut checkout);
        let launcher = RecordingLauncher::new();

        checkout
            .submit_at(&mut storage, &launcher, placed_at())
            .unwrap();
        assert!(checkout.is_submitted());
        assert_eq!(launcher.opened().len(), 1);

        let err = checkout
            .submit_at(&mut storage, &launcher, placed_at())
            .unwrap_err();
        assert!(matches!(err, CheckoutError::AlreadySubmitted));
        assert_eq!(storage.get_order_history().len(), 1);
        assert_eq!(storage.get_cart().len(), 1);
    }

    #[test]
    fn test_resubmit_after_fixing_fields() {
        let mut storage = storage_with_cart();
        let mut checkout = Checkout::begin(&storage, link());
        let launcher = RecordingLauncher::new();

        assert!(checkout.submit_at(&mut storage, &launcher, placed_at()).is_err());
        fill(&mut checkout);
        assert!(checkout.submit_at(&mut storage, &launcher, placed_at()).is_ok());
    }

    #[test]
    fn test_validate_trims_values() {
        let form = CheckoutForm {
            name: "  Asha ".to_string(),
            phone: "98 ".to_string(),
            address: " Road".to_string(),
            note: "  ".to_string(),
        };
        let customer = form.validate().unwrap();
        assert_eq!(customer.name, "Asha");
        assert_eq!(customer.phone, "98");
        assert_eq!(customer.address, "Road");
        assert!(customer.note.is_empty());
    }
}
