//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional:
//! - `VEGGIE_DATA_DIR` - Directory holding the local store (default: .veggie)
//! - `VEGGIE_WHATSAPP_NUMBER` - Shop number orders are sent to (default: 919879876030)
//! - `VEGGIE_WHATSAPP_BASE_URL` - Deep-link base URL (default: <https://wa.me>)
//! - `VEGGIE_CATALOG_PATH` - Catalog JSON replacing the builtin catalog
//! - `VEGGIE_STORE_NAME` - Display name (default: Veggie Order Magic)
//! - `VEGGIE_CONTACT_PHONE` - Phone shown after checkout (default: +91 9879876030)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

const DEFAULT_DATA_DIR: &str = ".veggie";
const DEFAULT_WHATSAPP_NUMBER: &str = "919879876030";
const DEFAULT_WHATSAPP_BASE_URL: &str = "https://wa.me";
const DEFAULT_STORE_NAME: &str = "Veggie Order Magic";
const DEFAULT_CONTACT_PHONE: &str = "+91 9879876030";

/// E.164 bounds on the number of digits in a phone number.
const MIN_PHONE_DIGITS: usize = 8;
const MAX_PHONE_DIGITS: usize = 15;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory of the file-backed local store
    pub data_dir: PathBuf,
    /// Messaging hand-off configuration
    pub whatsapp: WhatsAppConfig,
    /// Catalog document overriding the builtin catalog
    pub catalog_path: Option<PathBuf>,
    /// Shop display name
    pub store_name: String,
    /// Phone number customers can call if the hand-off fails
    pub contact_phone: String,
}

/// Messaging deep-link configuration.
#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    /// Deep-link base URL, e.g. `https://wa.me`
    pub base_url: Url,
    /// Recipient number, digits only with country code
    pub number: String,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = PathBuf::from(get_or_default(&lookup, "VEGGIE_DATA_DIR", DEFAULT_DATA_DIR));
        let catalog_path = get_optional(&lookup, "VEGGIE_CATALOG_PATH").map(PathBuf::from);
        let store_name = get_or_default(&lookup, "VEGGIE_STORE_NAME", DEFAULT_STORE_NAME);
        let contact_phone = get_or_default(&lookup, "VEGGIE_CONTACT_PHONE", DEFAULT_CONTACT_PHONE);
        let whatsapp = WhatsAppConfig::from_lookup(&lookup)?;

        Ok(Self {
            data_dir,
            whatsapp,
            catalog_path,
            store_name,
            contact_phone,
        })
    }
}

impl WhatsAppConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = get_or_default(lookup, "VEGGIE_WHATSAPP_BASE_URL", DEFAULT_WHATSAPP_BASE_URL);
        let base_url = parse_base_url(&raw_url).map_err(|reason| {
            ConfigError::InvalidEnvVar("VEGGIE_WHATSAPP_BASE_URL".to_string(), reason)
        })?;

        let raw_number = get_or_default(lookup, "VEGGIE_WHATSAPP_NUMBER", DEFAULT_WHATSAPP_NUMBER);
        let number = normalize_phone_number(&raw_number).map_err(|reason| {
            ConfigError::InvalidEnvVar("VEGGIE_WHATSAPP_NUMBER".to_string(), reason)
        })?;

        Ok(Self { base_url, number })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating blank values as unset.
fn get_optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Get a variable with a default value.
fn get_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    get_optional(lookup, key).unwrap_or_else(|| default.to_string())
}

/// Parse an http(s) base URL.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.cannot_be_a_base() || url.host().is_none() {
        return Err("must be an absolute URL with a host".to_string());
    }
    Ok(url)
}

/// Strip formatting from a phone number and check it is a plausible
/// international number.
fn normalize_phone_number(raw: &str) -> Result<String, String> {
    let stripped: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '+'))
        .collect();

    if !stripped.chars().all(|c| c.is_ascii_digit()) {
        return Err("must contain only digits".to_string());
    }
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&stripped.len()) {
        return Err(format!(
            "must have between {MIN_PHONE_DIGITS} and {MAX_PHONE_DIGITS} digits (got {})",
            stripped.len()
        ));
    }
    Ok(stripped)
}
