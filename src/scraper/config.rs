use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the article body is pulled out of the content blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyStrategy {
    /// Longest text among all content blocks
    #[default]
    LargestBlock,
    /// Paragraphs of the first content block, one per line
    Paragraphs,
}

/// CSS selectors for the listing and article pages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    /// "Article" checkbox in the listing filter
    pub article_filter: String,
    /// Result links on a listing page
    pub result_link: String,
    /// "Next" pagination button
    pub next_button: String,
    pub title: String,
    /// Blocks holding the article body
    pub content: String,
    /// Paragraphs inside a content block (for `BodyStrategy::Paragraphs`)
    pub paragraph: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            article_filter: "input[name=Article]".to_string(),
            result_link: "div.result-panel a".to_string(),
            next_button: "div.next button.score-button.secondary".to_string(),
            title: "h1".to_string(),
            content: "div[data-epi-type=\"content\"]".to_string(),
            paragraph: "p".to_string(),
        }
    }
}

/// Configuration for the category scraper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Site root, without a trailing slash
    pub base_url: String,

    /// Categories to crawl, as shown on the site
    pub categories: Vec<String>,

    /// Number of browser pages in the pool (default: 5)
    pub max_concurrency: usize,

    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// Pause after every navigation in milliseconds (default: 200)
    pub slow_mo_ms: u64,

    /// How long to wait for listing results in seconds (default: 10)
    pub results_timeout_secs: u64,

    /// Page load timeout in seconds (default: 30)
    pub navigation_timeout_secs: u64,

    /// Stop paginating a category after this many pages
    pub max_pages_per_category: Option<usize>,

    pub body_strategy: BodyStrategy,

    pub selectors: Selectors,

    /// User agent string to use
    pub user_agent: Option<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.freshproduce.com".to_string(),
            categories: vec![
                "Global Trade".to_string(),
                "Food Safety".to_string(),
                "Technology".to_string(),
            ],
            max_concurrency: 5,
            headless: true,
            slow_mo_ms: 200,
            results_timeout_secs: 10,
            navigation_timeout_secs: 30,
            max_pages_per_category: None,
            body_strategy: BodyStrategy::LargestBlock,
            selectors: Selectors::default(),
            user_agent: Some(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                    .to_string(),
            ),
        }
    }
}

impl ScraperConfig {
    pub fn results_timeout(&self) -> Duration {
        Duration::from_secs(self.results_timeout_secs)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn slow_mo(&self) -> Duration {
        Duration::from_millis(self.slow_mo_ms)
    }

    /// Site root with any trailing slash removed
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
