//! In-memory site used by the scraper tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::app::{FreshwireError, Result};
use crate::browser::{PageDriver, PageFactory};

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub text: String,
    pub attrs: HashMap<String, String>,
    pub children: HashMap<String, Vec<FakeElement>>,
}

impl FakeElement {
    pub fn text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Default::default()
        }
    }

    pub fn link(href: &str) -> Self {
        Self::default().attr("href", href)
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn child(mut self, selector: &str, elements: Vec<FakeElement>) -> Self {
        self.children.insert(selector.to_string(), elements);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeDocument {
    elements: HashMap<String, Vec<FakeElement>>,
}

impl FakeDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, selector: &str, elements: Vec<FakeElement>) -> Self {
        self.elements.insert(selector.to_string(), elements);
        self
    }
}

/// Documents keyed by URL, plus failure switches
#[derive(Debug, Default)]
pub struct FakeSite {
    documents: HashMap<String, FakeDocument>,
    stalled: HashSet<String>,
    panics: HashSet<String>,
    latency: Duration,
    visits: Mutex<Vec<String>>,
    navigating: AtomicUsize,
    peak_navigating: AtomicUsize,
}

impl FakeSite {
    pub fn page(mut self, url: &str, document: FakeDocument) -> Self {
        self.documents.insert(url.to_string(), document);
        self
    }

    /// Navigation to `url` times out
    pub fn stall(mut self, url: &str) -> Self {
        self.stalled.insert(url.to_string());
        self
    }

    /// Navigation to `url` panics
    pub fn panic_on(mut self, url: &str) -> Self {
        self.panics.insert(url.to_string());
        self
    }

    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }

    /// Most navigations that were in flight at the same time
    pub fn peak_navigating(&self) -> usize {
        self.peak_navigating.load(Ordering::SeqCst)
    }
}

pub struct FakeBrowser {
    site: Arc<FakeSite>,
    fail_after: Option<usize>,
    fail_close: bool,
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

impl FakeBrowser {
    pub fn new(site: FakeSite) -> Self {
        Self {
            site: Arc::new(site),
            fail_after: None,
            fail_close: false,
            opened: Arc::new(AtomicUsize::new(0)),
            closed: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Opening more than `n` pages fails
    pub fn fail_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Closing a page counts the attempt and then fails
    pub fn fail_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn site(&self) -> &FakeSite {
        &self.site
    }

    pub fn pages_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn pages_closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFactory for FakeBrowser {
    type Page = FakePage;

    async fn new_page(&self) -> Result<FakePage> {
        let opened = self.opened.load(Ordering::SeqCst);
        if self.fail_after.is_some_and(|n| opened >= n) {
            return Err(FreshwireError::Browser("cannot open tab".to_string()));
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(FakePage {
            site: self.site.clone(),
            current: Mutex::new(None),
            closed: self.closed.clone(),
            fail_close: self.fail_close,
        })
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

pub struct FakePage {
    site: Arc<FakeSite>,
    current: Mutex<Option<FakeDocument>>,
    closed: Arc<AtomicUsize>,
    fail_close: bool,
}

impl FakePage {
    fn elements(&self, selector: &str) -> Result<Vec<FakeElement>> {
        let current = self.current.lock().unwrap();
        let document = current
            .as_ref()
            .ok_or_else(|| FreshwireError::Browser("no document loaded".to_string()))?;
        Ok(document.elements.get(selector).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl PageDriver for FakePage {
    type Element = FakeElement;

    async fn goto(&self, url: &str) -> Result<()> {
        self.site.visits.lock().unwrap().push(url.to_string());
        if self.site.panics.contains(url) {
            panic!("browser crashed on {}", url);
        }

        let now = self.site.navigating.fetch_add(1, Ordering::SeqCst) + 1;
        self.site.peak_navigating.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.site.latency).await;
        self.site.navigating.fetch_sub(1, Ordering::SeqCst);

        if self.site.stalled.contains(url) {
            return Err(FreshwireError::Navigation {
                url: url.to_string(),
                reason: "timed out".to_string(),
            });
        }
        let document = self.site.documents.get(url).cloned().ok_or_else(|| {
            FreshwireError::Navigation {
                url: url.to_string(),
                reason: "404".to_string(),
            }
        })?;
        *self.current.lock().unwrap() = Some(document);
        Ok(())
    }

    async fn query_one(&self, selector: &str) -> Result<Option<FakeElement>> {
        Ok(self.elements(selector)?.into_iter().next())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<FakeElement>> {
        self.elements(selector)
    }

    async fn query_within(
        &self,
        element: &FakeElement,
        selector: &str,
    ) -> Result<Vec<FakeElement>> {
        Ok(element.children.get(selector).cloned().unwrap_or_default())
    }

    async fn attribute(&self, element: &FakeElement, name: &str) -> Result<Option<String>> {
        Ok(element.attrs.get(name).cloned())
    }

    async fn inner_text(&self, element: &FakeElement) -> Result<String> {
        Ok(element.text.clone())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<()> {
        if self.elements(selector)?.is_empty() {
            return Err(FreshwireError::ExtractionTimeout {
                selector: selector.to_string(),
                timeout,
            });
        }
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(FreshwireError::Browser("tab already gone".to_string()));
        }
        Ok(())
    }
}
