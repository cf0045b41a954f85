//! Capabilities the pipeline needs from the outside world.
//!
//! The core never talks to a browser, the network or the filesystem itself.
//! Concrete implementations live in `tidings-drivers` (WebDriver) and
//! `tidings-web` (HTTP image download, JSON work item, xlsx export).

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::table::ExportTable;

/// Keys the pipeline needs to press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Tab,
}

/// Minimal browser automation surface. Selectors are opaque strings handed
/// through from configuration.
#[async_trait]
pub trait BrowserInterface: Send + Sync {
    type Element: Send + Sync;

    async fn open(&mut self, url: &str) -> Result<()>;

    /// First match of `selector`, searched under `parent` when given.
    /// `Ok(None)` when nothing matches.
    async fn find_one(
        &self,
        selector: &str,
        parent: Option<&Self::Element>,
    ) -> Result<Option<Self::Element>>;

    async fn find_all(&self, selector: &str) -> Result<Vec<Self::Element>>;

    /// Wait up to `timeout` for `selector` to become clickable and click it.
    async fn click_when_clickable(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Type `text` into the first visible match of `selector`.
    async fn input_text(&self, selector: &str, text: &str) -> Result<()>;

    async fn read_attribute(&self, element: &Self::Element, name: &str) -> Result<Option<String>>;

    async fn read_text(&self, element: &Self::Element) -> Result<String>;

    async fn press_key(&self, selector: &str, key: Key) -> Result<()>;
}

/// Downloads listing thumbnails.
#[async_trait]
pub trait ImageFetch: Send + Sync {
    /// Store the image behind `url` in `dest_dir` and return the new file's
    /// name. An empty `url` returns an empty name without touching the network.
    async fn fetch(&self, url: &str, dest_dir: &Path) -> Result<String>;
}

/// Where run parameters come from and where the audit output goes.
pub trait ParameterSource: Send {
    /// Raw `{search_phrase, news_categories, number_of_months}` variables.
    fn variables(&mut self) -> Result<Value>;

    /// Record the categories that were confirmed present upstream.
    fn publish_valid_categories(&mut self, valid: &[String]) -> Result<()>;
}

/// Persists the final table.
pub trait ExportSink: Send + Sync {
    fn persist(&self, table: &ExportTable, path: &Path) -> Result<()>;
}
