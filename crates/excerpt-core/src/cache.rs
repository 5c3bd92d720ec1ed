//! Write-once store of fetched source documents.
//!
//! [`DocumentCache`] maps a source reference to the [`SourceDocument`] it
//! resolved to. Each key is filled at most once: concurrent requests for the
//! same reference share a single in-flight resolution, and once a document is
//! stored it is only ever read. Failed resolutions leave the slot empty.
//!
//! The cache is an ordinary value: construct one per render pass (or share one
//! across passes with an `Arc`) instead of reaching for a global.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OnceCell;
use tracing::debug;

use crate::{Result, SourceDocument};

type Slot = Arc<OnceCell<Arc<SourceDocument>>>;

/// Reference-keyed, write-once document store.
#[derive(Debug, Default)]
pub struct DocumentCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl DocumentCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The document stored for `reference`, if it has resolved.
    pub fn get(&self, reference: &str) -> Option<Arc<SourceDocument>> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(reference)
            .and_then(|slot| slot.get().cloned())
    }

    /// Whether `reference` has resolved.
    pub fn contains(&self, reference: &str) -> bool {
        self.get(reference).is_some()
    }

    /// Number of resolved documents.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    /// Whether no document has resolved yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the cached document for `reference`, running `fetch` to fill it
    /// if this is the first request.
    ///
    /// Callers racing on the same reference wait for the first caller's
    /// `fetch`; only one runs at a time. A failed `fetch` is returned to its
    /// caller and leaves the slot empty.
    pub async fn get_or_fetch<F, Fut>(&self, reference: &str, fetch: F) -> Result<Arc<SourceDocument>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        let slot = self.slot(reference);
        let document = slot
            .get_or_try_init(|| async move {
                debug!(reference, "resolving source");
                let raw_text = fetch().await?;
                Ok::<_, crate::Error>(Arc::new(SourceDocument::new(reference, raw_text)))
            })
            .await?;
        Ok(Arc::clone(document))
    }

    fn slot(&self, reference: &str) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(reference.to_string()).or_default())
    }
}
