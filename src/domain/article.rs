use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::app::{FreshwireError, Result};
use crate::store::Record;

/// A scraped article, optionally enriched with a summary and topics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub category: String,
    pub full_text: String,
    pub summary: Option<String>,
    pub topics: Option<Vec<String>>,
}

impl Article {
    pub fn new(title: String, url: String, category: String, full_text: String) -> Self {
        Self {
            title,
            url,
            category,
            full_text,
            summary: None,
            topics: None,
        }
    }

    pub fn add_insights(&mut self, insights: Insights) {
        self.summary = Some(insights.summary);
        self.topics = Some(insights.topics);
    }

    /// Row written by the scrape stage
    pub fn core_record(&self) -> Record {
        let mut record = Record::new();
        record.insert("title".into(), Value::String(self.title.clone()));
        record.insert("url".into(), Value::String(self.url.clone()));
        record.insert("category".into(), Value::String(self.category.clone()));
        record.insert(
            "full_article_text".into(),
            Value::String(self.full_text.clone()),
        );
        record
    }

    /// Row written by the analysis stage: the core columns plus insights
    pub fn insights_record(&self) -> Record {
        let mut record = self.core_record();
        record.insert(
            "summary".into(),
            Value::String(self.summary.clone().unwrap_or_default()),
        );
        let topics = self
            .topics
            .as_deref()
            .unwrap_or_default()
            .iter()
            .cloned()
            .map(Value::String)
            .collect();
        record.insert("topics".into(), Value::Array(topics));
        record
    }

    /// Rebuild an article from a row produced by either record shape
    pub fn from_record(record: &Record) -> Result<Self> {
        let mut article = Self::new(
            required_text(record, "title")?,
            required_text(record, "url")?,
            required_text(record, "category")?,
            required_text(record, "full_article_text")?,
        );

        article.summary = record.get("summary").map(cell_text);
        article.topics = match record.get("topics") {
            None => None,
            Some(Value::Array(values)) => Some(values.iter().map(cell_text).collect()),
            Some(Value::String(s)) if s.is_empty() => Some(Vec::new()),
            Some(other) => Some(vec![cell_text(other)]),
        };

        Ok(article)
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn required_text(record: &Record, field: &str) -> Result<String> {
    record
        .get(field)
        .map(cell_text)
        .ok_or_else(|| FreshwireError::Config(format!("Record is missing the {} column", field)))
}

/// Links found for one category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryLinks {
    pub category: String,
    pub hrefs: Vec<String>,
}

impl CategoryLinks {
    pub fn empty(category: &str) -> Self {
        Self {
            category: category.to_string(),
            hrefs: Vec::new(),
        }
    }
}

/// Summary and topics produced by enrichment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insights {
    pub summary: String,
    pub topics: Vec<String>,
}

impl Insights {
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.topics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> Article {
        Article::new(
            "Tariffs shift".into(),
            "https://www.freshproduce.com/resources/global-trade/tariffs/".into(),
            "Global Trade".into(),
            "Body text".into(),
        )
    }

    #[test]
    fn test_new_article_has_no_insights() {
        let article = article();
        assert!(article.summary.is_none());
        assert!(article.topics.is_none());
    }

    #[test]
    fn test_core_record_columns() {
        let record = article().core_record();
        let columns: Vec<_> = record.keys().cloned().collect();
        assert_eq!(columns, vec!["title", "url", "category", "full_article_text"]);
    }

    #[test]
    fn test_insights_record_includes_topics_array() {
        let mut article = article();
        article.add_insights(Insights {
            summary: "Short".into(),
            topics: vec!["trade".into(), "tariffs".into()],
        });
        let record = article.insights_record();
        assert_eq!(record["summary"], Value::String("Short".into()));
        assert_eq!(record["topics"], serde_json::json!(["trade", "tariffs"]));
    }

    #[test]
    fn test_from_record_round_trip() {
        let mut original = article();
        original.add_insights(Insights {
            summary: "Short".into(),
            topics: vec!["a".into(), "b".into()],
        });
        let rebuilt = Article::from_record(&original.insights_record()).unwrap();
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn test_from_core_record_has_no_insights() {
        let rebuilt = Article::from_record(&article().core_record()).unwrap();
        assert_eq!(rebuilt, article());
    }

    #[test]
    fn test_from_record_missing_column() {
        let mut record = article().core_record();
        record.remove("url");
        assert!(Article::from_record(&record).is_err());
    }
}
