//! Cart and history records on disk.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::fs;

use rust_decimal_macros::dec;
use serde_json::Value;

use veggie_order_core::{ItemId, Price, Quantity, Unit};
use veggie_order_integration_tests::TestContext;

#[test]
fn test_cart_survives_reopen() {
    let mut ctx = TestContext::new();
    ctx.state.cart().add(&ItemId::new("001"), dec!(0.5), None).unwrap();
    ctx.state.cart().add(&ItemId::new("001"), dec!(0.3), None).unwrap();

    let cart = ctx.reopen().storage().get_cart();
    assert_eq!(cart.len(), 1);
    let line = cart.get(&ItemId::new("001")).unwrap();
    assert_eq!(line.quantity(), Quantity::new(dec!(0.8)));
    assert_eq!(line.total_price(), Price::new(dec!(24)));
}

#[test]
fn test_cart_record_layout() {
    let mut ctx = TestContext::new();
    ctx.state
        .cart()
        .add(&ItemId::new("004"), dec!(500), Some(Unit::Gram))
        .unwrap();

    let raw = fs::read_to_string(ctx.data_dir().join("cart.json")).unwrap();
    let json: Value = serde_json::from_str(&raw).unwrap();
    let lines = json.as_array().unwrap();
    assert_eq!(lines.len(), 1);
    let line = lines.first().unwrap();

    assert_eq!(line["id"], "004");
    assert_eq!(line["unit"], "kg");
    assert_eq!(line["quantity"].as_f64(), Some(0.5));
    assert_eq!(line["price"].as_f64(), Some(90.0));
    assert_eq!(line["totalPrice"].as_f64(), Some(45.0));
}

#[test]
fn test_reads_cart_written_by_browser() {
    let ctx = TestContext::new();
    fs::write(
        ctx.data_dir().join("cart.json"),
        r#"[{"id":"001","name":"Tomatoes","price":30,"image":"","quantity":0.8,"unit":"kg","totalPrice":24}]"#,
    )
    .unwrap();

    let cart = ctx.reopen().storage().get_cart();
    assert_eq!(cart.total(), Price::new(dec!(24)));
}

#[test]
fn test_malformed_records_read_as_empty() {
    let ctx = TestContext::new();
    fs::write(ctx.data_dir().join("cart.json"), "{not json").unwrap();
    fs::write(ctx.data_dir().join("userInfo.json"), "null").unwrap();
    fs::write(ctx.data_dir().join("orderHistory.json"), "").unwrap();

    let state = ctx.reopen();
    assert!(state.storage().get_cart().is_empty());
    assert!(state.storage().get_user_info().is_none());
    assert!(state.storage().get_order_history().is_empty());
}

#[test]
fn test_malformed_cart_is_replaced_on_next_add() {
    let ctx = TestContext::new();
    fs::write(ctx.data_dir().join("cart.json"), "[[[").unwrap();

    let mut state = ctx.reopen();
    state.cart().add(&ItemId::new("001"), dec!(1), None).unwrap();
    assert_eq!(state.storage().get_cart().len(), 1);
}

#[test]
fn test_last_write_wins_between_sessions() {
    let ctx = TestContext::new();
    let mut first = ctx.reopen();
    let mut second = ctx.reopen();

    first.cart().add(&ItemId::new("001"), dec!(1), None).unwrap();
    second.cart().add(&ItemId::new("002"), dec!(1), None).unwrap();

    // Each add reads the record afresh, so the second session sees the first.
    let cart = ctx.reopen().storage().get_cart();
    assert_eq!(cart.len(), 2);

    // A stale in-memory cart written wholesale overwrites everything.
    let stale = veggie_order_core::Cart::new();
    first.storage_mut().save_cart(&stale).unwrap();
    assert!(ctx.reopen().storage().get_cart().is_empty());
}
