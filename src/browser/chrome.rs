use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::app::{FreshwireError, Result};
use crate::browser::{PageDriver, PageFactory};
use crate::scraper::ScraperConfig;

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Headless Chrome reached through chromiumoxide
pub struct ChromeBrowser {
    browser: Mutex<Browser>,
    handler: Mutex<Option<JoinHandle<()>>>,
    user_agent: Option<String>,
    navigation_timeout: Duration,
    slow_mo: Duration,
}

impl ChromeBrowser {
    /// Launch a browser configured from `config`
    pub async fn launch(config: &ScraperConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-software-rasterizer");

        if !config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder.build().map_err(|e| {
            FreshwireError::Initialization(format!("Failed to build browser config: {}", e))
        })?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            FreshwireError::Initialization(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler event error: {}", e);
                }
            }
        });

        Ok(Self {
            browser: Mutex::new(browser),
            handler: Mutex::new(Some(handler)),
            user_agent: config.user_agent.clone(),
            navigation_timeout: config.navigation_timeout(),
            slow_mo: config.slow_mo(),
        })
    }
}

#[async_trait]
impl PageFactory for ChromeBrowser {
    type Page = ChromePage;

    async fn new_page(&self) -> Result<ChromePage> {
        let page = self
            .browser
            .lock()
            .await
            .new_page("about:blank")
            .await
            .map_err(|e| FreshwireError::Browser(format!("Failed to create page: {}", e)))?;

        if let Some(ref ua) = self.user_agent {
            page.set_user_agent(ua)
                .await
                .map_err(|e| FreshwireError::Browser(format!("Failed to set user agent: {}", e)))?;
        }

        Ok(ChromePage {
            page,
            navigation_timeout: self.navigation_timeout,
            slow_mo: self.slow_mo,
        })
    }

    async fn close(&self) -> Result<()> {
        self.browser
            .lock()
            .await
            .close()
            .await
            .map_err(|e| FreshwireError::Browser(format!("Failed to close browser: {}", e)))?;

        if let Some(handler) = self.handler.lock().await.take() {
            if let Err(e) = handler.await {
                warn!("Browser handler task ended abnormally: {}", e);
            }
        }
        Ok(())
    }
}

/// One Chrome tab
pub struct ChromePage {
    page: Page,
    navigation_timeout: Duration,
    slow_mo: Duration,
}

#[async_trait]
impl PageDriver for ChromePage {
    type Element = Element;

    async fn goto(&self, url: &str) -> Result<()> {
        let navigation = async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<_, chromiumoxide::error::CdpError>(())
        };

        match tokio::time::timeout(self.navigation_timeout, navigation).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(FreshwireError::Navigation {
                    url: url.to_string(),
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                return Err(FreshwireError::Navigation {
                    url: url.to_string(),
                    reason: format!("timed out after {:?}", self.navigation_timeout),
                })
            }
        }

        if !self.slow_mo.is_zero() {
            tokio::time::sleep(self.slow_mo).await;
        }
        Ok(())
    }

    async fn query_one(&self, selector: &str) -> Result<Option<Element>> {
        Ok(self.query_all(selector).await?.into_iter().next())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<Element>> {
        self.page
            .find_elements(selector)
            .await
            .map_err(|e| FreshwireError::Browser(format!("Query {} failed: {}", selector, e)))
    }

    async fn query_within(&self, element: &Element, selector: &str) -> Result<Vec<Element>> {
        element
            .find_elements(selector)
            .await
            .map_err(|e| FreshwireError::Browser(format!("Query {} failed: {}", selector, e)))
    }

    async fn attribute(&self, element: &Element, name: &str) -> Result<Option<String>> {
        element
            .attribute(name)
            .await
            .map_err(|e| FreshwireError::Browser(format!("Reading {} failed: {}", name, e)))
    }

    async fn inner_text(&self, element: &Element) -> Result<String> {
        let text = element
            .inner_text()
            .await
            .map_err(|e| FreshwireError::Browser(format!("Reading text failed: {}", e)))?;
        Ok(text.unwrap_or_default())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<()> {
        let poll = async {
            loop {
                if !self.query_all(selector).await?.is_empty() {
                    return Ok::<(), FreshwireError>(());
                }
                tokio::time::sleep(WAIT_POLL_INTERVAL).await;
            }
        };

        tokio::time::timeout(timeout, poll)
            .await
            .map_err(|_| FreshwireError::ExtractionTimeout {
                selector: selector.to_string(),
                timeout,
            })?
    }

    async fn close(&self) -> Result<()> {
        self.page
            .clone()
            .close()
            .await
            .map_err(|e| FreshwireError::Browser(format!("Failed to close page: {}", e)))
    }
}
