//! Category crawler for FreshProduce.com.
//!
//! # Architecture
//!
//! ```text
//! categories ─┬─ discover_links ─┐            ┌─ extract_article ─┐
//!             ├─ discover_links ─┼─ hrefs ────┼─ extract_article ─┼─ ScrapeReport
//!             └─ discover_links ─┘            └─ extract_article ─┘
//! ```
//!
//! Both fan-outs run concurrently on the caller's task and share one
//! [`PagePool`](crate::browser::PagePool), so the pool size bounds how many
//! pages are navigating at once. A failing category or article only loses
//! its own result.
//!
//! # Usage
//!
//! ```rust,ignore
//! use freshwire::browser::ChromeBrowser;
//! use freshwire::scraper::{FreshProduceScraper, Scraper, ScraperConfig};
//!
//! let config = ScraperConfig::default();
//! let browser = ChromeBrowser::launch(&config).await?;
//! let scraper = FreshProduceScraper::new(browser, config);
//!
//! let articles = scraper.scrape().await?;
//! ```

mod config;
mod discovery;
mod extraction;
mod produce;
pub mod text;

pub use config::{BodyStrategy, ScraperConfig, Selectors};
pub use discovery::discover_links;
pub use extraction::extract_article;
pub use produce::FreshProduceScraper;

use crate::app::Result;
use crate::domain::Article;
use async_trait::async_trait;

/// Outcome of a full crawl
#[derive(Debug, Clone, Default)]
pub struct ScrapeReport {
    /// Articles with both a title and a body
    pub articles: Vec<Article>,
    /// Links that produced no article
    pub failed: usize,
}

impl ScrapeReport {
    pub fn attempted(&self) -> usize {
        self.articles.len() + self.failed
    }
}

/// Anything that can produce a batch of articles
#[async_trait]
pub trait Scraper: Send + Sync {
    async fn scrape(&self) -> Result<Vec<Article>>;
}
