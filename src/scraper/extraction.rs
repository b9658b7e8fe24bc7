use tracing::{error, warn};

use crate::app::{FreshwireError, Result};
use crate::browser::{PageDriver, PagePool};
use crate::domain::Article;
use crate::scraper::config::BodyStrategy;
use crate::scraper::text::{article_url, clean_text};
use crate::scraper::ScraperConfig;

/// Fetch one article.
///
/// Returns `None` when the page cannot be loaded or either the title or the
/// body comes out empty.
pub async fn extract_article<P: PageDriver>(
    pool: &PagePool<P>,
    config: &ScraperConfig,
    category: &str,
    href: &str,
) -> Option<Article> {
    let page = match pool.acquire().await {
        Ok(page) => page,
        Err(e) => {
            error!("Article {}: {}", href, e);
            return None;
        }
    };

    let url = article_url(config.base(), href);
    let result = load_article(&*page, config, category, &url).await;
    if let Err(e) = pool.release(page) {
        warn!("Article {}: {}", href, e);
    }

    match result {
        Ok(Some(article)) => Some(article),
        Ok(None) => {
            warn!("Article {}: missing title or body, discarded", href);
            None
        }
        Err(e) => {
            error!("Article {}: {}", href, e);
            None
        }
    }
}

async fn load_article<P: PageDriver>(
    page: &P,
    config: &ScraperConfig,
    category: &str,
    url: &str,
) -> Result<Option<Article>> {
    page.goto(url).await?;

    let (title, body) = tokio::join!(
        extract_title(page, config),
        extract_body(page, config)
    );

    match (title, body) {
        (Some(title), Some(body)) => Ok(Some(Article::new(
            title,
            url.to_string(),
            category.to_string(),
            body,
        ))),
        _ => Ok(None),
    }
}

async fn extract_title<P: PageDriver>(page: &P, config: &ScraperConfig) -> Option<String> {
    match heading_text(page, config).await {
        Ok(title) => Some(title).filter(|t| !t.is_empty()),
        Err(e) => {
            error!("Extracting title: {}", e);
            None
        }
    }
}

async fn heading_text<P: PageDriver>(page: &P, config: &ScraperConfig) -> Result<String> {
    let selector = &config.selectors.title;
    let heading = page
        .query_one(selector)
        .await?
        .ok_or_else(|| FreshwireError::SelectorNotFound(selector.clone()))?;
    Ok(clean_text(&page.inner_text(&heading).await?))
}

async fn extract_body<P: PageDriver>(page: &P, config: &ScraperConfig) -> Option<String> {
    let result = match config.body_strategy {
        BodyStrategy::LargestBlock => largest_block(page, config).await,
        BodyStrategy::Paragraphs => first_block_paragraphs(page, config).await,
    };

    match result {
        Ok(body) => Some(body).filter(|b| !b.is_empty()),
        Err(e) => {
            error!("Extracting article text: {}", e);
            None
        }
    }
}

async fn largest_block<P: PageDriver>(page: &P, config: &ScraperConfig) -> Result<String> {
    let selector = &config.selectors.content;
    let mut largest: Option<String> = None;
    for block in page.query_all(selector).await? {
        let text = clean_text(&page.inner_text(&block).await?);
        if largest.as_ref().map_or(true, |l| text.len() > l.len()) {
            largest = Some(text);
        }
    }
    largest.ok_or_else(|| FreshwireError::SelectorNotFound(selector.clone()))
}

async fn first_block_paragraphs<P: PageDriver>(page: &P, config: &ScraperConfig) -> Result<String> {
    let selector = &config.selectors.content;
    let block = page
        .query_one(selector)
        .await?
        .ok_or_else(|| FreshwireError::SelectorNotFound(selector.clone()))?;

    let mut paragraphs = Vec::new();
    for paragraph in page.query_within(&block, &config.selectors.paragraph).await? {
        let text = clean_text(&page.inner_text(&paragraph).await?);
        if !text.is_empty() {
            paragraphs.push(text);
        }
    }
    Ok(paragraphs.join("\n"))
}
