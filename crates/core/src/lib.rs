//! Veggie Order Core - Catalog, cart and order types.
//!
//! This crate provides the domain model shared by the Veggie Order components:
//! - `storefront` - Persistence and checkout over a local key-value store
//! - `cli` - Command-line front end for browsing, cart editing and checkout
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no storage and no URL
//! handling. Its only I/O is [`Catalog::load`] reading a catalog file. Every
//! cart mutation is an in-memory operation; callers persist the result
//! explicitly.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, quantities and units
//! - [`catalog`] - The immutable product catalog
//! - [`cart`] - The cart engine
//! - [`order`] - Customer details and order records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod order;
pub mod types;

pub use cart::{Cart, CartError, CartLine, QuantityChange};
pub use catalog::{Catalog, CatalogError, CatalogItem};
pub use order::{CustomerInfo, OrderRecord, UserProfile};
pub use types::*;
