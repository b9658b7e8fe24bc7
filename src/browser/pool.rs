//! Fixed-size pool of reusable browser tabs.
//!
//! Two bounds must both hold before a caller gets a tab: the admission gate
//! (a semaphore with one permit per tab) limits how many callers hold a tab
//! at once, and the state table tells which tab is free. The table is owned
//! by the pool and only changes under its mutex.

use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{Notify, OwnedSemaphorePermit, Semaphore};
use tracing::{debug, info, warn};

use crate::app::{FreshwireError, Result};
use crate::browser::{PageDriver, PageFactory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryState {
    Free,
    InUse,
}

struct PoolInner<P> {
    pages: Vec<P>,
    states: Mutex<Vec<EntryState>>,
    gate: Arc<Semaphore>,
    released: Notify,
    closed: AtomicBool,
}

impl<P> PoolInner<P> {
    fn states(&self) -> MutexGuard<'_, Vec<EntryState>> {
        // A poisoned table is still consistent: every mutation is a single store.
        self.states.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn checkout(&self) -> Option<usize> {
        let mut states = self.states();
        let id = states.iter().position(|s| *s == EntryState::Free)?;
        states[id] = EntryState::InUse;
        Some(id)
    }

    fn mark_free(&self, id: usize) -> Result<()> {
        {
            let mut states = self.states();
            match states.get(id) {
                Some(EntryState::InUse) => states[id] = EntryState::Free,
                _ => return Err(FreshwireError::DoubleRelease(id)),
            }
        }
        self.released.notify_one();
        Ok(())
    }
}

/// Pool of browser tabs created once and handed out one caller at a time
pub struct PagePool<P> {
    inner: Arc<PoolInner<P>>,
}

impl<P> Clone for PagePool<P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<P: PageDriver> PagePool<P> {
    /// Open `limit` tabs up front.
    ///
    /// If any tab fails to open, the ones already opened are closed and the
    /// whole pool fails with `Initialization`.
    pub async fn initialize<F>(factory: &F, limit: usize) -> Result<Self>
    where
        F: PageFactory<Page = P>,
    {
        if limit == 0 {
            return Err(FreshwireError::Initialization(
                "pool limit must be at least 1".to_string(),
            ));
        }

        let mut pages = Vec::with_capacity(limit);
        for _ in 0..limit {
            match factory.new_page().await {
                Ok(page) => pages.push(page),
                Err(e) => {
                    for (id, page) in pages.iter().enumerate() {
                        if let Err(e) = page.close().await {
                            warn!("Failed to close page {}: {}", id, e);
                        }
                    }
                    return Err(FreshwireError::Initialization(e.to_string()));
                }
            }
        }

        info!("Opened {} browser pages", limit);

        Ok(Self {
            inner: Arc::new(PoolInner {
                pages,
                states: Mutex::new(vec![EntryState::Free; limit]),
                gate: Arc::new(Semaphore::new(limit)),
                released: Notify::new(),
                closed: AtomicBool::new(false),
            }),
        })
    }

    /// Wait for a free tab and check it out.
    ///
    /// Fails with `PoolClosed` once [`shutdown`](Self::shutdown) has run.
    pub async fn acquire(&self) -> Result<PageLease<P>> {
        let permit = self
            .inner
            .gate
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| FreshwireError::PoolClosed)?;

        loop {
            let notified = self.inner.released.notified();
            if self.inner.closed.load(Ordering::Acquire) {
                return Err(FreshwireError::PoolClosed);
            }
            if let Some(id) = self.inner.checkout() {
                debug!("Checked out page {}", id);
                return Ok(PageLease {
                    id,
                    pool: self.inner.clone(),
                    permit: Some(permit),
                    released: false,
                });
            }
            notified.await;
        }
    }

    /// Return a tab to the pool, waking one waiting caller
    pub fn release(&self, mut lease: PageLease<P>) -> Result<()> {
        lease.release()
    }

    /// Close the gate and every tab. Later `acquire` calls fail.
    pub async fn shutdown(&self) {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.inner.gate.close();
        self.inner.released.notify_waiters();

        for (id, page) in self.inner.pages.iter().enumerate() {
            if let Err(e) = page.close().await {
                warn!("Failed to close page {}: {}", id, e);
            }
        }
        info!("Page pool shut down");
    }

    pub fn size(&self) -> usize {
        self.inner.pages.len()
    }

    /// Number of tabs currently checked out
    pub fn in_use(&self) -> usize {
        self.inner
            .states()
            .iter()
            .filter(|s| **s == EntryState::InUse)
            .count()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }
}

/// A checked-out tab. Dropping the lease returns the tab to the pool.
pub struct PageLease<P> {
    id: usize,
    pool: Arc<PoolInner<P>>,
    permit: Option<OwnedSemaphorePermit>,
    released: bool,
}

impl<P> PageLease<P> {
    pub fn id(&self) -> usize {
        self.id
    }

    fn release(&mut self) -> Result<()> {
        if self.released {
            return Err(FreshwireError::DoubleRelease(self.id));
        }
        self.released = true;
        let result = self.pool.mark_free(self.id);
        // The permit goes back only after the entry is free again, so the
        // next admitted caller always finds a free entry.
        self.permit.take();
        debug!("Released page {}", self.id);
        result
    }
}

impl<P> Deref for PageLease<P> {
    type Target = P;

    fn deref(&self) -> &Self::Target {
        &self.pool.pages[self.id]
    }
}

impl<P> Drop for PageLease<P> {
    fn drop(&mut self) {
        if !self.released {
            if let Err(e) = self.release() {
                warn!("Page lease cleanup failed: {}", e);
            }
        }
    }
}
