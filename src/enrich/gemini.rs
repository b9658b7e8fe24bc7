use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::app::{FreshwireError, Result};
use crate::domain::Insights;
use crate::enrich::{EnrichmentConfig, Enricher, MAX_TOPICS};

const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant that extracts summaries and \
     topics from articles and returns them in JSON format.";

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Deserialize)]
struct Answer {
    summary: String,
    #[serde(default)]
    topics: Vec<String>,
}

/// Gemini `generateContent` client
pub struct GeminiClient {
    client: Client,
    config: EnrichmentConfig,
    api_key: String,
}

impl GeminiClient {
    /// Fails with `Config` when no API key is configured or exported
    pub fn new(config: EnrichmentConfig) -> Result<Self> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            FreshwireError::Config(format!("{} not set", config.api_key_env))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("freshwire/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn prompt(title: &str, text: &str) -> String {
        format!(
            r#"You are a helpful assistant. I will give you the title and full text of an article.

Return your answer in valid JSON format using the following structure:

{{
"summary": "<one-sentence summary of the article>",
"topics": ["topic1", "topic2", "topic3"] just 3-5 primary topics or keywords from the text
}}

Here is the article:

Title: {title}
Text: {text}
"#
        )
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        );
        let body = json!({
            "system_instruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": { "maxOutputTokens": self.config.max_output_tokens },
        });

        let response: GenerateResponse = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
            .ok_or_else(|| FreshwireError::Enrichment("response has no text".to_string()))
    }
}

/// Parse the model's answer, tolerating a surrounding markdown code fence
pub fn parse_insights(raw: &str) -> Result<Insights> {
    let mut text = raw.trim();
    if text.starts_with("```") {
        text = text.trim_matches('`').trim();
        if text.get(..4).is_some_and(|tag| tag.eq_ignore_ascii_case("json")) {
            text = text[4..].trim();
        }
    }

    let answer: Answer = serde_json::from_str(text)
        .map_err(|e| FreshwireError::Enrichment(format!("invalid JSON answer: {}", e)))?;

    let topics = answer
        .topics
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .take(MAX_TOPICS)
        .collect();

    Ok(Insights {
        summary: answer.summary.trim().to_string(),
        topics,
    })
}

#[async_trait]
impl Enricher for GeminiClient {
    async fn summarize(&self, title: &str, text: &str) -> Insights {
        if title.trim().is_empty() || text.trim().is_empty() {
            info!("An article does not have a title or text");
            return Insights::default();
        }

        let result = async {
            let raw = self.generate(&Self::prompt(title, text)).await?;
            parse_insights(&raw)
        };

        match result.await {
            Ok(insights) => insights,
            Err(e) => {
                error!("Error analyzing article {}: {}", title, e);
                Insights::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GeminiClient {
        GeminiClient::new(EnrichmentConfig {
            api_key: Some("test-key".into()),
            // Nothing listens here; any request would fail
            endpoint: "http://127.0.0.1:9".into(),
            timeout_secs: 1,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_parse_plain_json() {
        let insights = parse_insights(r#"{"summary": "Prices rose.", "topics": ["prices", "apples"]}"#)
            .unwrap();
        assert_eq!(insights.summary, "Prices rose.");
        assert_eq!(insights.topics, vec!["prices", "apples"]);
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = "```json\n{\"summary\": \"S\", \"topics\": [\"a\"]}\n```";
        let insights = parse_insights(raw).unwrap();
        assert_eq!(insights.summary, "S");
        assert_eq!(insights.topics, vec!["a"]);
    }

    #[test]
    fn test_parse_caps_topics() {
        let raw = r#"{"summary": "S", "topics": ["1", "2", "3", "4", "5", "6", "7"]}"#;
        assert_eq!(parse_insights(raw).unwrap().topics.len(), MAX_TOPICS);
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(matches!(
            parse_insights("I cannot help with that."),
            Err(FreshwireError::Enrichment(_))
        ));
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let config = EnrichmentConfig {
            api_key: None,
            api_key_env: "FRESHWIRE_TEST_UNSET_KEY".into(),
            ..Default::default()
        };
        assert!(matches!(
            GeminiClient::new(config),
            Err(FreshwireError::Config(_))
        ));
    }

    #[test]
    fn test_prompt_mentions_title_and_text() {
        let prompt = GeminiClient::prompt("Frost damage", "Growers report losses.");
        assert!(prompt.contains("Title: Frost damage"));
        assert!(prompt.contains("Text: Growers report losses."));
    }

    #[tokio::test]
    async fn test_empty_input_skips_request() {
        let insights = client().summarize("", "Some text").await;
        assert!(insights.is_empty());
    }

    #[tokio::test]
    async fn test_request_failure_yields_empty_insights() {
        let insights = client().summarize("Title", "Some text").await;
        assert!(insights.is_empty());
    }
}
