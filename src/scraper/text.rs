//! Text and URL helpers shared by discovery and extraction.

/// Collapse non-breaking spaces, zero-width spaces and whitespace runs into
/// single spaces, then trim.
pub fn clean_text(text: &str) -> String {
    text.split(|c: char| c.is_whitespace() || c == '\u{a0}' || c == '\u{200b}')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// "Food Safety" -> "food-safety"
pub fn category_slug(category: &str) -> String {
    category
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Listing page `page_number` of `category`, filtered to articles
pub fn listing_url(base: &str, category: &str, page_number: usize) -> String {
    format!(
        "{}/resources/{}/?pageNumber={}&filteredCategories=Article",
        base,
        category_slug(category),
        page_number
    )
}

/// Absolute URL of an article link. Relative hrefs are appended to `base`.
pub fn article_url(base: &str, href: &str) -> String {
    match url::Url::parse(href) {
        Ok(absolute) => absolute.to_string(),
        Err(_) => format!("{}{}", base, href),
    }
}
