use std::panic::AssertUnwindSafe;

use async_trait::async_trait;
use futures::future::join_all;
use futures::FutureExt;
use tracing::info;

use crate::app::Result;
use crate::browser::{PageFactory, PagePool};
use crate::domain::{Article, CategoryLinks};
use crate::scraper::discovery::discover_links;
use crate::scraper::extraction::extract_article;
use crate::scraper::{ScrapeReport, Scraper, ScraperConfig};

/// Scrapes FreshProduce.com articles for the configured categories
pub struct FreshProduceScraper<F> {
    factory: F,
    config: ScraperConfig,
}

impl<F: PageFactory> FreshProduceScraper<F> {
    pub fn new(factory: F, config: ScraperConfig) -> Self {
        Self { factory, config }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Browser the scraper opens its pages from
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Crawl every category and every article found.
    ///
    /// Only pool initialization can fail the run; per-category and
    /// per-article failures are counted in the report. The pool is shut
    /// down before returning, even if the crawl panics.
    pub async fn run(&self) -> Result<ScrapeReport> {
        let pool = PagePool::initialize(&self.factory, self.config.max_concurrency).await?;

        let outcome = AssertUnwindSafe(self.crawl(&pool)).catch_unwind().await;
        pool.shutdown().await;

        match outcome {
            Ok(report) => Ok(report),
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    async fn crawl(&self, pool: &PagePool<F::Page>) -> ScrapeReport {
        let categories = self.categories();
        let discovered: Vec<CategoryLinks> = join_all(
            categories
                .iter()
                .map(|category| discover_links(pool, &self.config, category)),
        )
        .await;

        let tasks: Vec<(&str, &str)> = discovered
            .iter()
            .flat_map(|links| {
                links
                    .hrefs
                    .iter()
                    .map(move |href| (links.category.as_str(), href.as_str()))
            })
            .collect();
        info!(
            "Found {} article links across {} categories",
            tasks.len(),
            categories.len()
        );

        let outcomes = join_all(
            tasks
                .iter()
                .map(|(category, href)| extract_article(pool, &self.config, category, href)),
        )
        .await;

        let attempted = outcomes.len();
        let articles: Vec<Article> = outcomes.into_iter().flatten().collect();
        let failed = attempted - articles.len();
        info!(
            "Successfully scraped {} articles. Failed: {}",
            articles.len(),
            failed
        );

        ScrapeReport { articles, failed }
    }

    /// Configured categories with repeats removed, first occurrence wins
    fn categories(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for category in &self.config.categories {
            if !seen.contains(category) {
                seen.push(category.clone());
            }
        }
        seen
    }
}

#[async_trait]
impl<F: PageFactory> Scraper for FreshProduceScraper<F> {
    async fn scrape(&self) -> Result<Vec<Article>> {
        Ok(self.run().await?.articles)
    }
}
