//! AI enrichment: a one-sentence summary and a few topics per article.
//!
//! Enrichment never fails a run. Empty input or any error from the model
//! yields empty [`Insights`].

mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{Article, Insights};

/// Most topics kept per article
pub const MAX_TOPICS: usize = 5;

#[async_trait]
pub trait Enricher: Send + Sync {
    async fn summarize(&self, title: &str, text: &str) -> Insights;
}

/// Attach insights to every article, one request at a time
pub async fn enrich_articles<E: Enricher + ?Sized>(enricher: &E, articles: &mut [Article]) {
    let total = articles.len();
    for (i, article) in articles.iter_mut().enumerate() {
        let insights = enricher.summarize(&article.title, &article.full_text).await;
        article.add_insights(insights);
        info!("Enriched article {}/{}: {}", i + 1, total, article.title);
    }
}

/// Settings for the Gemini client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Model name (default: gemini-2.5-flash)
    pub model: String,

    /// API root, without a trailing slash
    pub endpoint: String,

    /// API key; falls back to the variable named by `api_key_env`
    pub api_key: Option<String>,

    /// Environment variable holding the API key (default: GEMINI_API_KEY)
    pub api_key_env: String,

    /// Output token cap per request (default: 512)
    pub max_output_tokens: u32,

    /// Request timeout in seconds (default: 60)
    pub timeout_secs: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: None,
            api_key_env: "GEMINI_API_KEY".to_string(),
            max_output_tokens: 512,
            timeout_secs: 60,
        }
    }
}

impl EnrichmentConfig {
    /// Configured key, or the one from the environment
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
    }
}
