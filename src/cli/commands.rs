use tracing::warn;

use crate::app::{AppContext, Result};
use crate::browser::{ChromeBrowser, PageFactory};
use crate::domain::Article;
use crate::enrich::{enrich_articles, GeminiClient};
use crate::scraper::FreshProduceScraper;
use crate::store::{Record, RecordStore};

/// Stage one: crawl the site and write the scraped articles
pub async fn scrape(ctx: &AppContext) -> Result<Vec<Article>> {
    let config = ctx.config.scraper.clone();
    println!(
        "Scraping {} categories with {} pages...",
        config.categories.len(),
        config.max_concurrency
    );

    let browser = ChromeBrowser::launch(&config).await?;
    let scraper = FreshProduceScraper::new(browser, config);
    let result = scraper.run().await;
    if let Err(e) = scraper.factory().close().await {
        warn!("Failed to close browser: {}", e);
    }
    let report = result?;

    println!(
        "Scraped {} articles ({} failed)",
        report.articles.len(),
        report.failed
    );

    let store = ctx.scraped_store();
    let records: Vec<Record> = report.articles.iter().map(Article::core_record).collect();
    let written = store.write_records(&records)?;
    println!("Wrote {} rows to {}", written, store.path().display());

    Ok(report.articles)
}

/// Stage two: summarize articles read from the scraped table
pub async fn analyze(ctx: &AppContext) -> Result<()> {
    let enricher = ctx.enricher()?;
    let articles = ctx
        .scraped_store()
        .read_records()?
        .iter()
        .map(Article::from_record)
        .collect::<Result<Vec<_>>>()?;

    if articles.is_empty() {
        println!("No articles to analyze");
        return Ok(());
    }

    write_analysis(ctx, &enricher, articles).await
}

/// Both stages back to back
pub async fn run(ctx: &AppContext) -> Result<()> {
    // Fail on a missing API key before spending time in the browser
    let enricher = ctx.enricher()?;
    let articles = scrape(ctx).await?;

    if articles.is_empty() {
        println!("No articles to analyze");
        return Ok(());
    }

    write_analysis(ctx, &enricher, articles).await
}

async fn write_analysis(
    ctx: &AppContext,
    enricher: &GeminiClient,
    mut articles: Vec<Article>,
) -> Result<()> {
    println!("Analyzing {} articles...", articles.len());
    enrich_articles(enricher, &mut articles).await;

    let store = ctx.analysis_store();
    let records: Vec<Record> = articles.iter().map(Article::insights_record).collect();
    let written = store.write_records(&records)?;
    println!("Wrote {} rows to {}", written, store.path().display());
    Ok(())
}
