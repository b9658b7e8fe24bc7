//! # freshwire
//!
//! Crawls FreshProduce.com by category, extracts article text with a headless
//! browser, asks Gemini for a summary and topics, and writes CSV tables.
//!
//! ## Architecture
//!
//! ```text
//! PagePool → Link discovery → Article extraction → Enrichment → CSV
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! # Scrape the configured categories into scraped_data.csv
//! freshwire scrape
//!
//! # Summarize them into analysis_summary.csv
//! GEMINI_API_KEY=... freshwire analyze
//!
//! # Both stages
//! freshwire run --category "Food Safety" -j 3
//! ```

/// Application context and error types.
pub mod app;

/// Browser capabilities and the page pool.
///
/// - [`PageDriver`](browser::PageDriver): DOM operations on one tab
/// - [`PageFactory`](browser::PageFactory): opens tabs
/// - [`PagePool`](browser::PagePool): fixed set of reusable tabs
/// - [`ChromeBrowser`](browser::ChromeBrowser): chromiumoxide backend
pub mod browser;

/// Command-line interface using clap.
///
/// - `scrape` - Crawl and write the scraped table
/// - `analyze` - Summarize the scraped table
/// - `run` - Both
pub mod cli;

/// Configuration loaded from `~/.config/freshwire/config.toml`.
pub mod config;

/// Core domain models.
pub mod domain;

/// Summaries and topics from Gemini.
pub mod enrich;

/// Category crawler: link discovery, article extraction, orchestration.
pub mod scraper;

/// CSV persistence with JSON-encoded cells.
pub mod store;

#[cfg(test)]
mod testing;
