//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `cart` - Cart operations persisted to local storage
//! - `checkout` - Checkout form, order recording and hand-off
//! - `messaging` - Deep links to the shop's messaging app

pub mod cart;
pub mod checkout;
pub mod messaging;

pub use cart::CartService;
pub use checkout::{Checkout, CheckoutError, CheckoutForm, CheckoutState, Field, OrderConfirmation};
pub use messaging::{LaunchError, MessageLauncher, RecordingLauncher, WhatsAppLink};
