//! Customer details and order records.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartLine};
use crate::types::{OrderId, Price};

/// Delivery details remembered between checkouts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// Customer details captured with an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
    pub address: String,
    /// Optional delivery instructions; empty when not given.
    #[serde(default)]
    pub note: String,
}

impl CustomerInfo {
    /// The remembered part of the customer details.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            name: self.name.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
        }
    }
}

/// A snapshot of a completed checkout.
///
/// Records are appended to the order history once and never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub order_id: OrderId,
    pub order_date: DateTime<Utc>,
    pub customer_info: CustomerInfo,
    pub items: Vec<CartLine>,
    pub total: Price,
}

impl OrderRecord {
    /// Snapshot `cart` as an order placed by `customer` at `placed_at`.
    #[must_use]
    pub fn new(customer: CustomerInfo, cart: &Cart, placed_at: DateTime<Utc>) -> Self {
        Self {
            order_id: OrderId::from_timestamp(placed_at),
            order_date: placed_at,
            customer_info: customer,
            items: cart.lines().to_vec(),
            total: cart.total(),
        }
    }

    /// Order date in long form, e.g. `March 20, 2023`.
    #[must_use]
    pub fn display_date(&self) -> String {
        self.order_date.format("%B %-d, %Y").to_string()
    }

    /// Human-readable order text sent to the shop.
    ///
    /// Formatting uses `*bold*` markers understood by the messaging app.
    #[must_use]
    pub fn summary(&self) -> String {
        OrderSummary(self).to_string()
    }
}

struct OrderSummary<'a>(&'a OrderRecord);

impl fmt::Display for OrderSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = self.0;
        let customer = &order.customer_info;

        writeln!(f, "*New Order*\n")?;
        writeln!(f, "*Customer Details*")?;
        writeln!(f, "Name: {}", customer.name)?;
        writeln!(f, "Phone: {}", customer.phone)?;
        writeln!(f, "Address: {}", customer.address)?;

        writeln!(f, "\n*Order Items*")?;
        for line in &order.items {
            writeln!(
                f,
                "{} ({} {}) - {}",
                line.name(),
                line.quantity(),
                line.unit(),
                line.total_price()
            )?;
        }

        writeln!(f, "\n*Total: {}*", order.total)?;

        let note = customer.note.trim();
        if !note.is_empty() {
            writeln!(f, "\n*Note:* {note}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::catalog::CatalogItem;
    use crate::types::{ItemId, Unit};

    fn customer(note: &str) -> CustomerInfo {
        CustomerInfo {
            name: "Asha Patel".to_string(),
            phone: "9876543210".to_string(),
            address: "12 Market Road, Surat".to_string(),
            note: note.to_string(),
        }
    }

    fn cart() -> Cart {
        let tomatoes = CatalogItem {
            id: ItemId::new("001"),
            name: "Tomato".to_string(),
            price: Price::new(dec!(30)),
            image: String::new(),
            category: "Everyday Vegetables".to_string(),
            unit: Unit::Kg,
            in_stock: true,
            description: None,
            options: vec![Unit::Kg, Unit::Gram],
        };
        let mut cart = Cart::new();
        cart.add_or_merge(&tomatoes, dec!(0.8), Unit::Kg).unwrap();
        cart
    }

    fn placed_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 3, 20, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_new_snapshots_cart() {
        let cart = cart();
        let order = OrderRecord::new(customer(""), &cart, placed_at());

        assert_eq!(order.items.len(), 1);
        assert_eq!(order.total, cart.total());
        assert_eq!(order.order_id, OrderId::from_timestamp(placed_at()));
        assert_eq!(order.order_date, placed_at());
    }

    #[test]
    fn test_display_date() {
        let order = OrderRecord::new(customer(""), &cart(), placed_at());
        assert_eq!(order.display_date(), "March 20, 2023");
    }

    #[test]
    fn test_summary_without_note() {
        let order = OrderRecord::new(customer(""), &cart(), placed_at());
        let expected = "*New Order*\n\n\
            *Customer Details*\n\
            Name: Asha Patel\n\
            Phone: 9876543210\n\
            Address: 12 Market Road, Surat\n\n\
            *Order Items*\n\
            Tomato (0.8 kg) - ₹24.00\n\n\
            *Total: ₹24.00*\n";
        assert_eq!(order.summary(), expected);
    }

    #[test]
    fn test_summary_with_note() {
        let order = OrderRecord::new(customer("Ring the bell"), &cart(), placed_at());
        assert!(order.summary().ends_with("*Total: ₹24.00*\n\n*Note:* Ring the bell\n"));
    }

    #[test]
    fn test_json_layout_matches_storage_format() {
        let order = OrderRecord::new(customer("x"), &cart(), placed_at());
        let value = serde_json::to_value(&order).unwrap();

        assert!(value["orderId"].as_str().unwrap().starts_with("ORD"));
        assert!(value["orderDate"].is_string());
        assert_eq!(value["customerInfo"]["note"], "x");
        assert_eq!(value["total"], 24.0);
        assert_eq!(value["items"][0]["totalPrice"], 24.0);
    }

    #[test]
    fn test_reads_browser_order_history_entry() {
        let json = r#"{
            "orderId": "ORD1711000123456",
            "orderDate": "2024-03-21T05:48:43.456Z",
            "customerInfo": {"name": "A", "phone": "1", "address": "X"},
            "items": [],
            "total": 0
        }"#;
        let order: OrderRecord = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_id.short(), "123456");
        assert!(order.customer_info.note.is_empty());
    }

    #[test]
    fn test_profile_drops_note() {
        let profile = customer("leave at gate").profile();
        assert_eq!(profile.name, "Asha Patel");
        assert_eq!(profile.address, "12 Market Road, Surat");
    }
}
