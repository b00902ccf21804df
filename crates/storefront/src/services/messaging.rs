//! Order hand-off to the shop's messaging app.
//!
//! The storefront never talks to the messaging service directly. It builds a
//! deep link carrying the order summary and hands it to a [`MessageLauncher`],
//! which opens it (a browser, a terminal print, a test recorder). Delivery is
//! one-way and unconfirmed.

use std::cell::RefCell;

use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::WhatsAppConfig;

/// Errors that can occur when opening a deep link.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Writing or spawning the opener failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No way to open the link is available.
    #[error("launcher unavailable: {0}")]
    Unavailable(String),
}

/// Opens deep links.
pub trait MessageLauncher {
    /// Open `link`.
    ///
    /// # Errors
    ///
    /// Returns `LaunchError` if the link could not be handed off.
    fn launch(&self, link: &Url) -> Result<(), LaunchError>;
}

/// Builder for `wa.me`-style deep links addressed to the shop number.
#[derive(Debug, Clone)]
pub struct WhatsAppLink {
    base_url: Url,
    number: String,
}

impl WhatsAppLink {
    /// Create a link builder from configuration.
    #[must_use]
    pub fn new(config: &WhatsAppConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            number: config.number.clone(),
        }
    }

    /// Recipient number, digits only.
    #[must_use]
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Deep link opening a chat with the shop, prefilled with `text`.
    ///
    /// The link has the form `{base}/{number}?text={encoded text}`.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if the assembled link is not a valid URL.
    pub fn order_link(&self, text: &str) -> Result<Url, url::ParseError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let link = Url::parse(&format!(
            "{base}/{}?text={}",
            self.number,
            urlencoding::encode(text)
        ))?;
        debug!(length = link.as_str().len(), "Built order deep link");
        Ok(link)
    }
}

/// Launcher that keeps every link it is asked to open.
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    opened: RefCell<Vec<Url>>,
}

impl RecordingLauncher {
    /// Create a launcher with no recorded links.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Links opened so far, oldest first.
    #[must_use]
    pub fn opened(&self) -> Vec<Url> {
        self.opened.borrow().clone()
    }
}

impl MessageLauncher for RecordingLauncher {
    fn launch(&self, link: &Url) -> Result<(), LaunchError> {
        self.opened.borrow_mut().push(link.clone());
        Ok(())
    }
}
