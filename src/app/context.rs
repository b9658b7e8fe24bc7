use std::path::Path;

use crate::app::error::{FreshwireError, Result};
use crate::config::Config;
use crate::enrich::GeminiClient;
use crate::store::CsvStore;

pub struct AppContext {
    pub config: Config,
}

impl AppContext {
    /// Load configuration from `path`, or from the default location
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = Config::load(path).map_err(|e| FreshwireError::Config(e.to_string()))?;
        Ok(Self::with_config(config))
    }

    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    pub fn scraped_store(&self) -> CsvStore {
        CsvStore::new(&self.config.output.scraped_path)
    }

    pub fn analysis_store(&self) -> CsvStore {
        CsvStore::new(&self.config.output.analysis_path)
    }

    pub fn enricher(&self) -> Result<GeminiClient> {
        GeminiClient::new(self.config.enrichment.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_stores_follow_output_config() {
        let mut config = Config::default();
        config.output.scraped_path = PathBuf::from("out/scraped.csv");
        let ctx = AppContext::with_config(config);

        assert_eq!(ctx.scraped_store().path(), Path::new("out/scraped.csv"));
        assert_eq!(
            ctx.analysis_store().path(),
            Path::new("analysis_summary.csv")
        );
    }

    #[test]
    fn test_missing_config_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppContext::load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(FreshwireError::Config(_))));
    }
}
