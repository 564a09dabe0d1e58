//! Debounced address-bar suggestion lookup.
//!
//! Suggestion retrieval is a plain request/response lookup keyed by the
//! partial text; the only coordination concern is the debounce.  It is
//! modeled as a cancellable scheduled task: at most one lookup is pending,
//! and a newer query aborts the previous task outright so a stale response
//! can never land after a fresher one.  Teardown aborts whatever is
//! pending — no dangling timers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Queries below this length resolve to an empty batch without touching
/// the backend.
const MIN_QUERY_LEN: usize = 2;

/// Fetches suggestions for a partial query.
#[async_trait]
pub trait SuggestionBackend: Send + Sync {
    async fn fetch_suggestions(&self, query: &str, limit: usize) -> Result<Vec<String>, String>;
}

/// A completed lookup: the query it answers and its suggestions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionBatch {
    pub query: String,
    pub suggestions: Vec<String>,
}

/// Debounces suggestion lookups for one address bar.
pub struct SuggestionDebouncer {
    backend: Arc<dyn SuggestionBackend>,
    delay: Duration,
    limit: usize,
    pending: Option<JoinHandle<()>>,
    results_tx: mpsc::Sender<SuggestionBatch>,
}

impl SuggestionDebouncer {
    /// Creates a debouncer and the receiver its batches arrive on.
    pub fn new(
        backend: Arc<dyn SuggestionBackend>,
        delay: Duration,
        limit: usize,
    ) -> (Self, mpsc::Receiver<SuggestionBatch>) {
        let (results_tx, results_rx) = mpsc::channel(8);
        let debouncer = Self {
            backend,
            delay,
            limit,
            pending: None,
            results_tx,
        };
        (debouncer, results_rx)
    }

    /// Schedules a lookup for `query`, cancelling any pending one.
    ///
    /// Short queries resolve immediately to an empty batch so the UI can
    /// clear a stale dropdown.
    pub fn query(&mut self, query: &str) {
        self.cancel();

        if query.chars().count() < MIN_QUERY_LEN {
            let _ = self.results_tx.try_send(SuggestionBatch {
                query: query.to_string(),
                suggestions: Vec::new(),
            });
            return;
        }

        let backend = Arc::clone(&self.backend);
        let results_tx = self.results_tx.clone();
        let delay = self.delay;
        let limit = self.limit;
        let query = query.to_string();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match backend.fetch_suggestions(&query, limit).await {
                Ok(suggestions) => {
                    let _ = results_tx.send(SuggestionBatch { query, suggestions }).await;
                }
                // Suggestions are best-effort; a failed lookup just means
                // no dropdown update.
                Err(e) => debug!("suggestion lookup failed: {e}"),
            }
        }));
    }

    /// Aborts any pending lookup.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl Drop for SuggestionDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
