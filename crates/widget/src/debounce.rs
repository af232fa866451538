//! Keystroke coalescing for product search.

use std::sync::Mutex;
use std::time::Duration;

use quotelink_catalog::CatalogApi;
use tokio::task::JoinHandle;

use crate::controller::WidgetController;

/// Defers `search_products` until input has been quiet for `delay`.
///
/// At most one deferred call is pending; new input cancels and replaces it.
/// Cancellation only reaches the waiting period: once a search has been
/// dispatched it runs to completion, and the controller's staleness guard
/// decides whether its response is used.
pub struct SearchDebouncer<A> {
    controller: WidgetController<A>,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<A: CatalogApi> SearchDebouncer<A> {
    pub fn new(controller: WidgetController<A>, delay: Duration) -> Self {
        Self {
            controller,
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a new search-box value. Outside a Tokio runtime the input is
    /// dropped, since nothing could run the deferred search.
    pub fn input(&self, term: impl Into<String>) {
        let term = term.into();
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(%term, "no async runtime; search input dropped");
            return;
        };
        let controller = self.controller.clone();
        let delay = self.delay;

        let timer = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // Detached so that a later cancel cannot abort the request.
            tokio::spawn(async move {
                controller.search_products(&term).await;
            });
        });

        if let Some(previous) = self.slot().replace(timer) {
            previous.abort();
        }
    }

    /// Drop the pending deferred search, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.slot().take() {
            previous.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.slot().as_ref().is_some_and(|h| !h.is_finished())
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<A> Drop for SearchDebouncer<A> {
    fn drop(&mut self) {
        let slot = self
            .pending
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}
