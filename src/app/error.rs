use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FreshwireError {
    #[error("Failed to initialize browser pool: {0}")]
    Initialization(String),

    #[error("Page pool is closed")]
    PoolClosed,

    #[error("Pool entry {0} released while already free")]
    DoubleRelease(usize),

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Timed out after {timeout:?} waiting for {selector}")]
    ExtractionTimeout { selector: String, timeout: Duration },

    #[error("Selector not found: {0}")]
    SelectorNotFound(String),

    #[error("Enrichment failed: {0}")]
    Enrichment(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FreshwireError>;
