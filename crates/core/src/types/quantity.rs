//! Quantities and units of measurement.
//!
//! Cart lines always hold a quantity in a *base unit*: kilograms for
//! weighed produce, pieces for counted produce. Grams exist only as a
//! selection unit and are converted to kilograms before anything is stored.

use core::fmt;
use core::ops::{Add, Sub};
use core::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Unit`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown unit '{0}' (expected kg, g or piece)")]
pub struct UnitParseError(String);

/// Unit of measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Kilograms.
    Kg,
    /// Grams. Never stored on a cart line.
    #[serde(rename = "g")]
    Gram,
    /// Individually counted pieces.
    Piece,
}

impl Unit {
    const GRAMS_PER_KG: Decimal = dec!(1000);

    /// The unit cart lines are stored in for this selection unit.
    #[must_use]
    pub const fn base(self) -> Self {
        match self {
            Self::Kg | Self::Gram => Self::Kg,
            Self::Piece => Self::Piece,
        }
    }

    /// Whether this unit is its own base unit.
    #[must_use]
    pub const fn is_base(self) -> bool {
        matches!(self, Self::Kg | Self::Piece)
    }

    /// Convert an amount in this unit to its base unit.
    #[must_use]
    pub fn to_base(self, amount: Decimal) -> Decimal {
        match self {
            Self::Gram => amount / Self::GRAMS_PER_KG,
            Self::Kg | Self::Piece => amount,
        }
    }

    /// The unit's short label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kg => "kg",
            Self::Gram => "g",
            Self::Piece => "piece",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = UnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kg" => Ok(Self::Kg),
            "g" => Ok(Self::Gram),
            "piece" | "pc" | "pcs" => Ok(Self::Piece),
            _ => Err(UnitParseError(s.to_owned())),
        }
    }
}

/// An amount of produce in its base unit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Quantity {
    /// Smallest quantity a cart line may hold.
    pub const MIN: Self = Self(dec!(0.1));

    /// Largest quantity a cart line may hold.
    pub const MAX: Self = Self(dec!(10));

    /// Increment used by the quantity buttons.
    pub const STEP: Self = Self(dec!(0.1));

    /// No quantity at all.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a quantity. Range checks are the cart's job.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The amount in base units.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the quantity is below [`Quantity::MIN`].
    #[must_use]
    pub fn is_below_min(&self) -> bool {
        *self < Self::MIN
    }

    /// Whether the quantity is above [`Quantity::MAX`].
    #[must_use]
    pub fn is_above_max(&self) -> bool {
        *self > Self::MAX
    }

    /// Sum of two quantities, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Clamp negative amounts to zero.
    #[must_use]
    pub fn non_negative(self) -> Self {
        self.max(Self::ZERO)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl From<Decimal> for Quantity {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Quantity {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}
