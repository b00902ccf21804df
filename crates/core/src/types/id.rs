//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

use chrono::{DateTime, Utc};

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<&str>`, `From<String>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use veggie_order_core::define_id;
/// define_id!(ShelfId);
/// define_id!(CrateId);
///
/// let shelf = ShelfId::new("A1");
/// let crate_id = CrateId::new("A1");
///
/// // These are different types, so this won't compile:
/// // let _: ShelfId = crate_id;
/// assert_eq!(shelf.as_str(), crate_id.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Catalog item ids are zero-padded strings ("001"), not integers.
define_id!(ItemId);
define_id!(OrderId);

impl OrderId {
    /// Prefix of every generated order id.
    pub const PREFIX: &'static str = "ORD";

    /// Number of trailing characters shown as the short order number.
    pub const SHORT_LEN: usize = 6;

    /// Build the time-based id for an order placed at `placed_at`.
    ///
    /// ```rust
    /// # use chrono::{TimeZone, Utc};
    /// # use veggie_order_core::OrderId;
    /// let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
    /// assert_eq!(OrderId::from_timestamp(at).as_str(), "ORD1700000000123");
    /// ```
    #[must_use]
    pub fn from_timestamp(placed_at: DateTime<Utc>) -> Self {
        Self(format!("{}{}", Self::PREFIX, placed_at.timestamp_millis()))
    }

    /// The last six characters of the id, used as a human-facing order number.
    #[must_use]
    pub fn short(&self) -> &str {
        let start = self
            .0
            .char_indices()
            .rev()
            .nth(Self::SHORT_LEN - 1)
            .map_or(0, |(idx, _)| idx);
        self.0.get(start..).unwrap_or(&self.0)
    }
}
