//! Interaction controller.
//!
//! Sequences manufacturer load → manufacturer change → product search → render
//! → selection → quote staging, and owns the UI status state machine:
//!
//! ```text
//! idle → loading → success | error
//! error → loading      (retry)
//! success → loading    (new manufacturer or search)
//! ```
//!
//! State sits behind a `std::sync::Mutex` that is never held across an
//! `.await`, so overlapping operations interleave the same way they would on a
//! single-threaded event loop. Ordering hazards come only from async completion
//! order and are handled with generation tokens: a response is applied only if
//! no newer operation of the same kind was issued after it.

use std::sync::{Arc, Mutex, MutexGuard};

use quotelink_catalog::{CatalogApi, ProductEndpoint};
use quotelink_core::{Product, QuotePayload, SearchQuery};
use tokio::sync::watch;

use crate::config::{WidgetConfig, messages};
use crate::debounce::SearchDebouncer;
use crate::environment::{BrowsingContext, HostingMode, detect_mode};
use crate::host::QuoteHost;
use crate::render::{self, WidgetView};
use crate::state::{ControllerState, Outcome, Precondition, RetryAction, Status};

struct Inner<A> {
    api: A,
    host: Arc<dyn QuoteHost>,
    mode: HostingMode,
    config: WidgetConfig,
    state: Mutex<ControllerState>,
    views: watch::Sender<WidgetView>,
}

/// One controller per widget mount. Cloning yields another handle to the same
/// controller.
pub struct WidgetController<A> {
    inner: Arc<Inner<A>>,
}

impl<A> Clone for WidgetController<A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<A: CatalogApi> WidgetController<A> {
    /// Create a controller. The hosting mode is detected once here; it cannot
    /// change without a reload.
    pub fn new(
        api: A,
        config: WidgetConfig,
        context: &dyn BrowsingContext,
        host: Arc<dyn QuoteHost>,
    ) -> Self {
        let mode = detect_mode(context, &config.host_marker);
        let state = ControllerState::default();
        let (views, _) = watch::channel(render::view(&state, mode, &config));

        tracing::info!(mode = ?mode, "widget controller initialized");

        Self {
            inner: Arc::new(Inner {
                api,
                host,
                mode,
                config,
                state: Mutex::new(state),
                views,
            }),
        }
    }

    pub fn mode(&self) -> HostingMode {
        self.inner.mode
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.inner.config
    }

    /// Snapshot of the controller state.
    pub fn state(&self) -> ControllerState {
        self.lock().clone()
    }

    pub fn view(&self) -> WidgetView {
        self.inner.views.borrow().clone()
    }

    /// Observe every published view.
    pub fn subscribe(&self) -> watch::Receiver<WidgetView> {
        self.inner.views.subscribe()
    }

    /// Debouncer feeding this controller's search, with the configured quiet
    /// interval.
    pub fn debouncer(&self) -> SearchDebouncer<A> {
        SearchDebouncer::new(self.clone(), self.inner.config.search_debounce())
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        // A panic while holding the lock cannot leave the record half-written
        // in a way later operations depend on, so keep going.
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Mutate state, then publish the resulting view.
    ///
    /// Published under the state lock: the channel never holds a view older
    /// than the state.
    fn update<R>(&self, f: impl FnOnce(&mut ControllerState) -> R) -> R {
        let mut st = self.lock();
        let out = f(&mut st);
        self.inner
            .views
            .send_replace(render::view(&st, self.inner.mode, &self.inner.config));
        out
    }

    /// Fetch the manufacturer list. Each call supersedes the previous one.
    pub async fn load_manufacturers(&self) -> Outcome {
        let token = self.update(|st| {
            st.manufacturer_load_token += 1;
            st.loading_manufacturers = true;
            st.hide_error();
            st.set_status(Status::Loading, messages::LOADING);
            st.manufacturer_load_token
        });

        let result = self
            .inner
            .api
            .manufacturers(self.inner.config.manufacturer_limit)
            .await;

        self.update(|st| {
            if st.manufacturer_load_token != token {
                tracing::debug!(token, current = st.manufacturer_load_token, "discarding superseded manufacturer load");
                return Outcome::Discarded;
            }
            st.loading_manufacturers = false;

            match result {
                Ok(manufacturers) => {
                    tracing::info!(count = manufacturers.len(), "manufacturers loaded");
                    st.manufacturers = manufacturers;
                    st.manufacturers_loaded = true;
                    st.set_status(Status::Success, messages::READY);
                    Outcome::Applied
                }
                Err(e) => {
                    tracing::error!(error = %e, timed_out = e.is_timeout(), "failed to load manufacturers");
                    st.show_error(messages::API_ERROR, Some(RetryAction::ReloadManufacturers));
                    Outcome::Failed
                }
            }
        })
    }

    /// The error banner's retry control.
    pub async fn retry(&self) -> Outcome {
        self.update(|st| st.hide_error());
        self.load_manufacturers().await
    }

    /// Change the manufacturer scope. Results and selection never carry across
    /// a change, even to the same manufacturer.
    ///
    /// An empty name hides the search and result surfaces; any other value is
    /// taken verbatim and the unfiltered first page of it is loaded.
    pub async fn select_manufacturer(&self, name: &str) -> Outcome {
        self.update(|st| {
            st.clear_products();
            // In-flight searches belong to the previous scope.
            st.pending_search_token += 1;
            if st.searching {
                st.searching = false;
                if st.status == Status::Loading && !st.loading_manufacturers {
                    st.set_status(Status::Idle, messages::READY);
                }
            }
            st.selected_manufacturer = (!name.is_empty()).then(|| name.to_string());
        });

        if name.is_empty() {
            tracing::debug!("manufacturer cleared");
            return Outcome::Applied;
        }

        tracing::info!(manufacturer = %name, "manufacturer selected");
        self.search_products("").await
    }

    /// Search the selected manufacturer's products. Only the response to the
    /// most recently issued search is ever applied.
    pub async fn search_products(&self, term: &str) -> Outcome {
        let dispatch = self.update(|st| {
            let manufacturer = st.selected_manufacturer.clone()?;
            let query = SearchQuery::new(manufacturer, term).ok()?;
            st.pending_search_token += 1;
            st.searching = true;
            st.hide_error();
            st.set_status(Status::Loading, messages::SEARCHING);
            Some((st.pending_search_token, query))
        });

        let Some((token, query)) = dispatch else {
            tracing::debug!(%term, "search ignored: no manufacturer selected");
            return Outcome::PreconditionNotMet(Precondition::NoManufacturerSelected);
        };

        let endpoint = ProductEndpoint::from_hybrid_flag(self.inner.config.features.hybrid_search);
        tracing::debug!(token, manufacturer = %query.manufacturer(), %term, ?endpoint, "searching products");

        let result = self
            .inner
            .api
            .products(endpoint, query, self.inner.config.default_page_size)
            .await;

        self.update(|st| {
            if st.pending_search_token != token {
                tracing::debug!(token, current = st.pending_search_token, "discarding stale search response");
                return Outcome::Discarded;
            }
            st.searching = false;

            match result {
                Ok(page) => {
                    tracing::info!(count = page.products.len(), total = ?page.total_available, "products displayed");
                    st.current_page = Some(page);
                    st.set_status(Status::Success, messages::READY);
                    Outcome::Applied
                }
                Err(e) => {
                    tracing::error!(error = %e, timed_out = e.is_timeout(), "failed to search products");
                    st.show_error(messages::API_ERROR, None);
                    Outcome::Failed
                }
            }
        })
    }

    /// Select a product from the current results page.
    pub fn select_product(&self, product: &Product) -> Outcome {
        if !self.lock().has_result(product) {
            tracing::warn!(part_number = %product.part_number, "selection ignored: product not in current results");
            return Outcome::PreconditionNotMet(Precondition::ProductNotInResults);
        }

        self.update(|st| {
            // Re-check: results may have been replaced since the lookup above.
            if !st.has_result(product) {
                return Outcome::PreconditionNotMet(Precondition::ProductNotInResults);
            }
            tracing::debug!(part_number = %product.part_number, "product selected");
            st.selected_product = Some(product.clone());
            Outcome::Applied
        })
    }

    /// Select the product at `index` in the current results page.
    pub fn select_index(&self, index: usize) -> Outcome {
        let product = self.lock().current_results().get(index).cloned();
        match product {
            Some(p) => self.select_product(&p),
            None => {
                tracing::warn!(index, "selection ignored: index out of range");
                Outcome::PreconditionNotMet(Precondition::ProductNotInResults)
            }
        }
    }

    /// Idempotent.
    pub fn clear_selection(&self) {
        if self.lock().selected_product.is_none() {
            return;
        }
        self.update(|st| st.selected_product = None);
    }

    /// Hand the selected product to the CRM quote (or confirm locally when no
    /// CRM hosts the widget). The status reverts to ready on a timer, which
    /// needs a Tokio runtime; without one the confirmation stays up.
    pub fn stage_for_quote(&self) -> Outcome {
        let Some(product) = self.lock().selected_product.clone() else {
            tracing::debug!("quote staging ignored: no product selected");
            return Outcome::PreconditionNotMet(Precondition::NoProductSelected);
        };

        let payload = QuotePayload::from_product(&product, &self.inner.config.quote_fields);
        tracing::debug!(payload = %payload.to_json(), "quote payload prepared");

        let notice = if self.inner.mode.can_populate_quote() {
            if let Err(e) = self.inner.host.populate(&payload) {
                tracing::error!(error = %e, "failed to add product to quote");
                self.update(|st| st.show_error(messages::QUOTE_ERROR, None));
                return Outcome::Failed;
            }
            None
        } else {
            Some(format!(
                "Product \"{}\" would be added to quote in the CRM.",
                product.part_number
            ))
        };

        tracing::info!(part_number = %product.part_number, mode = ?self.inner.mode, "product staged for quote");

        let epoch = self.update(|st| {
            st.hide_error();
            st.notice = notice;
            st.set_status(Status::Success, messages::ADDED_TO_QUOTE);
            st.status_epoch
        });

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("no async runtime; quote confirmation will not revert");
            return Outcome::Applied;
        };
        let this = self.clone();
        let delay = self.inner.config.quote_revert();
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            this.update(|st| {
                if st.status_epoch == epoch {
                    st.notice = None;
                    st.set_status(Status::Idle, messages::READY);
                }
            });
        });

        Outcome::Applied
    }
}
