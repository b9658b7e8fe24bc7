use tracing::{debug, error, info, warn};

use crate::app::Result;
use crate::browser::{PageDriver, PagePool};
use crate::domain::CategoryLinks;
use crate::scraper::text::listing_url;
use crate::scraper::ScraperConfig;

/// Collect every article link listed under `category`.
///
/// One page of the pool is held for the whole pagination, so pages of a
/// category are visited strictly in order. Failures are logged and turn into
/// an empty list.
pub async fn discover_links<P: PageDriver>(
    pool: &PagePool<P>,
    config: &ScraperConfig,
    category: &str,
) -> CategoryLinks {
    let page = match pool.acquire().await {
        Ok(page) => page,
        Err(e) => {
            error!("Category {}: {}", category, e);
            return CategoryLinks::empty(category);
        }
    };

    let result = paginate(&*page, config, category).await;
    if let Err(e) = pool.release(page) {
        warn!("Category {}: {}", category, e);
    }

    match result {
        Ok(hrefs) => {
            info!("Category {}: found {} links", category, hrefs.len());
            CategoryLinks {
                category: category.to_string(),
                hrefs,
            }
        }
        Err(e) => {
            error!("Category {}: {}", category, e);
            CategoryLinks::empty(category)
        }
    }
}

async fn paginate<P: PageDriver>(
    page: &P,
    config: &ScraperConfig,
    category: &str,
) -> Result<Vec<String>> {
    let selectors = &config.selectors;
    let mut page_number = 0;
    let mut hrefs = Vec::new();

    if config.max_pages_per_category == Some(0) {
        info!("Category {}: page limit is 0, nothing to visit", category);
        return Ok(hrefs);
    }

    page.goto(&listing_url(config.base(), category, page_number)).await?;
    if page.query_one(&selectors.article_filter).await?.is_none() {
        info!("No 'Article' filter for category: {}", category);
        return Ok(hrefs);
    }

    loop {
        if page_number > 0 {
            page.goto(&listing_url(config.base(), category, page_number)).await?;
        }
        page.wait_for(&selectors.result_link, config.results_timeout()).await?;

        let before = hrefs.len();
        for link in page.query_all(&selectors.result_link).await? {
            if let Some(href) = page.attribute(&link, "href").await? {
                if !href.is_empty() {
                    hrefs.push(href);
                }
            }
        }
        debug!(
            "Category {} page {}: {} links",
            category,
            page_number,
            hrefs.len() - before
        );

        if !has_next_page(page, &selectors.next_button).await? {
            break;
        }
        page_number += 1;

        if config
            .max_pages_per_category
            .is_some_and(|max| page_number >= max)
        {
            info!("Category {}: stopping at page limit {}", category, page_number);
            break;
        }
    }

    Ok(hrefs)
}

async fn has_next_page<P: PageDriver>(page: &P, selector: &str) -> Result<bool> {
    match page.query_one(selector).await? {
        Some(button) => Ok(page.attribute(&button, "disabled").await?.is_none()),
        None => Ok(false),
    }
}
