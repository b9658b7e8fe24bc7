//! Browser capabilities used by the scraper.
//!
//! The scraping core never talks to a browser directly. It needs a narrow
//! set of DOM operations per tab ([`PageDriver`]) and a way to open tabs
//! ([`PageFactory`]). [`ChromeBrowser`] provides both on top of
//! chromiumoxide; tests use an in-memory site instead.
//!
//! Tabs are expensive to open, so they are created once and recycled
//! through a [`PagePool`].

mod chrome;
pub mod pool;

pub use chrome::{ChromeBrowser, ChromePage};
pub use pool::{PageLease, PagePool};

use std::time::Duration;

use async_trait::async_trait;

use crate::app::Result;

/// DOM operations available on a single browser tab
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Handle to an element found on the current document
    type Element: Send + Sync;

    /// Navigate the tab to `url` and wait for the load to finish
    async fn goto(&self, url: &str) -> Result<()>;

    /// First element matching `selector`, if any
    async fn query_one(&self, selector: &str) -> Result<Option<Self::Element>>;

    /// All elements matching `selector`, in document order
    async fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>>;

    /// Descendants of `element` matching `selector`
    async fn query_within(
        &self,
        element: &Self::Element,
        selector: &str,
    ) -> Result<Vec<Self::Element>>;

    /// Attribute value, `None` when the attribute is not set
    async fn attribute(&self, element: &Self::Element, name: &str) -> Result<Option<String>>;

    /// Rendered text of the element
    async fn inner_text(&self, element: &Self::Element) -> Result<String>;

    /// Wait until at least one element matches `selector`.
    ///
    /// Fails with [`ExtractionTimeout`](crate::app::FreshwireError::ExtractionTimeout)
    /// when nothing shows up within `timeout`.
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Close the tab
    async fn close(&self) -> Result<()>;
}

/// Opens browser tabs
#[async_trait]
pub trait PageFactory: Send + Sync {
    type Page: PageDriver;

    async fn new_page(&self) -> Result<Self::Page>;

    /// Tear down the browser behind the pages
    async fn close(&self) -> Result<()>;
}
