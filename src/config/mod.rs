//! Configuration management for freshwire.
//!
//! Configuration is read from `~/.config/freshwire/config.toml` unless a path
//! is given. If the default file doesn't exist, a commented default is
//! created. Missing fields fall back to their defaults.

use crate::enrich::EnrichmentConfig;
use crate::scraper::ScraperConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Where the two stages write their tables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Scraped articles (default: scraped_data.csv)
    pub scraped_path: PathBuf,
    /// Articles with summary and topics (default: analysis_summary.csv)
    pub analysis_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            scraped_path: PathBuf::from("scraped_data.csv"),
            analysis_path: PathBuf::from("analysis_summary.csv"),
        }
    }
}

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub enrichment: EnrichmentConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from `path`, or from the default path.
    ///
    /// An explicit path must exist. The default path is created with
    /// commented defaults on first use.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = Self::default_config_path()?;
                if !default_path.exists() {
                    Self::create_default_config(&default_path)?;
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Get the default config file path: `~/.config/freshwire/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("freshwire").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# freshwire configuration

[scraper]
base_url = "https://www.freshproduce.com"
categories = ["Global Trade", "Food Safety", "Technology"]

# Browser pages opened up front; also the number of concurrent navigations
max_concurrency = 5

# Run browser in headless mode (no visible window)
headless = true

# Pause after every navigation (milliseconds)
slow_mo_ms = 200

# How long a listing page may take to show results (seconds)
results_timeout_secs = 10

# Page load timeout (seconds)
navigation_timeout_secs = 30

# Stop paginating a category after this many pages
# max_pages_per_category = 20

# "largest_block" or "paragraphs"
body_strategy = "largest_block"

[scraper.selectors]
article_filter = "input[name=Article]"
result_link = "div.result-panel a"
next_button = "div.next button.score-button.secondary"
title = "h1"
content = 'div[data-epi-type="content"]'
paragraph = "p"

[enrichment]
model = "gemini-2.5-flash"
# api_key = "..."
api_key_env = "GEMINI_API_KEY"
max_output_tokens = 512

[output]
scraped_path = "scraped_data.csv"
analysis_path = "analysis_summary.csv"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::BodyStrategy;

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config = Config::parse(&content).expect("Default config should be valid TOML");

        assert_eq!(config.scraper.categories.len(), 3);
        assert_eq!(config.scraper.max_concurrency, 5);
        assert_eq!(config.scraper.body_strategy, BodyStrategy::LargestBlock);
        assert_eq!(
            config.scraper.selectors.content,
            "div[data-epi-type=\"content\"]"
        );
        assert_eq!(config.enrichment.model, "gemini-2.5-flash");
        assert_eq!(config.output.scraped_path, PathBuf::from("scraped_data.csv"));
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[scraper]
categories = ["Technology"]
max_concurrency = 2
"##;
        let config = Config::parse(content).expect("Partial config should work");

        assert_eq!(config.scraper.categories, vec!["Technology"]);
        assert_eq!(config.scraper.max_concurrency, 2);
        // Default value
        assert_eq!(config.scraper.results_timeout_secs, 10);
        assert_eq!(
            config.output.analysis_path,
            PathBuf::from("analysis_summary.csv")
        );
    }

    #[test]
    fn test_empty_config() {
        let config = Config::parse("").expect("Empty config should work");
        assert_eq!(config.scraper.base_url, "https://www.freshproduce.com");
        assert_eq!(config.enrichment.api_key_env, "GEMINI_API_KEY");
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[scraper]\nheadless = false\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert!(!config.scraper.headless);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("missing.toml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_invalid_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[scraper\n").unwrap();

        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::Parse { .. })
        ));
    }
}
