//! The product catalog.
//!
//! The catalog is a fixed list of items seeded at build time from
//! `data/catalog.json`. It is never mutated at runtime; a different catalog
//! can be supplied as JSON text, which is validated the same way.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{ItemId, Price, Unit};

/// Catalog document compiled into the binary.
const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// Pseudo category that matches every available item.
pub const ALL_CATEGORIES: &str = "All";

/// Errors that can occur when loading a [`Catalog`].
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not a valid catalog JSON array.
    #[error("invalid catalog document: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two items share the same id.
    #[error("duplicate catalog item id: {0}")]
    DuplicateId(ItemId),

    /// An item has a negative price.
    #[error("catalog item {0} has a negative price")]
    NegativePrice(ItemId),

    /// An item is priced per gram; prices must be quoted per kg or piece.
    #[error("catalog item {0} must be priced per kg or per piece")]
    NonBaseUnit(ItemId),
}

/// A sellable product definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,
    /// Price per `unit`.
    pub price: Price,
    #[serde(default)]
    pub image: String,
    pub category: String,
    pub unit: Unit,
    pub in_stock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Selection units offered in addition to `unit`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<Unit>,
}

impl CatalogItem {
    /// Whether a customer may select quantities of this item in `unit`.
    ///
    /// Grams are only meaningful for items priced per kg.
    #[must_use]
    pub fn accepts(&self, unit: Unit) -> bool {
        if unit.base() != self.unit {
            return false;
        }
        unit == self.unit || self.options.contains(&unit)
    }

    /// Selection units offered for this item, base unit first.
    #[must_use]
    pub fn selectable_units(&self) -> Vec<Unit> {
        let mut units = vec![self.unit];
        units.extend(
            self.options
                .iter()
                .copied()
                .filter(|unit| *unit != self.unit && self.accepts(*unit)),
        );
        units
    }

    fn in_category(&self, category: &str) -> bool {
        category.eq_ignore_ascii_case(ALL_CATEGORIES)
            || self.category.eq_ignore_ascii_case(category)
    }

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.category.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }
}

/// The immutable product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Load the catalog compiled into this crate.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the embedded document fails validation.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parse and validate a catalog from a JSON array of items.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON and one of the
    /// validation variants if an item is inconsistent.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let items: Vec<CatalogItem> = serde_json::from_str(text)?;
        Self::new(items)
    }

    /// Read and validate a catalog document from `path`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read, otherwise the
    /// same errors as [`Catalog::from_json`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Build a catalog from items, validating ids, prices and units.
    ///
    /// # Errors
    ///
    /// Returns a validation variant of `CatalogError` for the first
    /// inconsistent item.
    pub fn new(items: Vec<CatalogItem>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id.clone()) {
                return Err(CatalogError::DuplicateId(item.id.clone()));
            }
            if item.price.is_negative() {
                return Err(CatalogError::NegativePrice(item.id.clone()));
            }
            if !item.unit.is_base() {
                return Err(CatalogError::NonBaseUnit(item.id.clone()));
            }
        }
        Ok(Self { items })
    }

    /// Every item, in catalog order.
    #[must_use]
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Items that are currently in stock.
    pub fn available(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter().filter(|item| item.in_stock)
    }

    /// Look up an item by id.
    #[must_use]
    pub fn find(&self, id: &ItemId) -> Option<&CatalogItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Unique categories in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .map(|item| item.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }

    /// Available items in `category`, compared case-insensitively.
    /// [`ALL_CATEGORIES`] matches everything.
    #[must_use]
    pub fn by_category(&self, category: &str) -> Vec<&CatalogItem> {
        self.available()
            .filter(|item| item.in_category(category))
            .collect()
    }

    /// Available items whose name, category or description contains `query`.
    ///
    /// Matching is case-insensitive; a blank query returns every available item.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&CatalogItem> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.available().collect();
        }
        self.available().filter(|item| item.matches(&needle)).collect()
    }

    /// Available items in `category` that also match `query`.
    ///
    /// This is [`Catalog::search`] narrowed by [`Catalog::by_category`].
    #[must_use]
    pub fn filter(&self, category: &str, query: &str) -> Vec<&CatalogItem> {
        self.search(query)
            .into_iter()
            .filter(|item| item.in_category(category))
            .collect()
    }

    /// All items grouped by category, categories in first-appearance order.
    #[must_use]
    pub fn grouped(&self) -> Vec<(&str, Vec<&CatalogItem>)> {
        self.categories()
            .into_iter()
            .map(|category| {
                let items = self
                    .items
                    .iter()
                    .filter(|item| item.category == category)
                    .collect();
                (category, items)
            })
            .collect()
    }

    /// Number of items in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
