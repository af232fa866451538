//! Controller state and the outcomes of controller operations.

use quotelink_core::{Manufacturer, Product, ProductPage};
use serde::{Deserialize, Serialize};

use crate::config::messages;

/// UI status. No state is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Idle,
    Loading,
    Success,
    Error,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Idle => "idle",
            Status::Loading => "loading",
            Status::Success => "success",
            Status::Error => "error",
        }
    }
}

/// What the error banner's retry control re-runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryAction {
    ReloadManufacturers,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBanner {
    pub message: String,
    pub retry: Option<RetryAction>,
}

/// A controller operation that could not run because its input state was
/// missing. Logged, never shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    NoManufacturerSelected,
    ProductNotInResults,
    NoProductSelected,
}

/// Result of a controller operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operation completed and its result is now reflected in state.
    Applied,
    /// The operation failed; the user sees the error banner.
    Failed,
    /// A newer operation superseded this one; its response was dropped.
    Discarded,
    PreconditionNotMet(Precondition),
}

/// The single mutable record behind a widget mount.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerState {
    pub manufacturers: Vec<Manufacturer>,
    pub manufacturers_loaded: bool,
    pub selected_manufacturer: Option<String>,
    /// `None` while the result surface is hidden.
    pub current_page: Option<ProductPage>,
    pub selected_product: Option<Product>,
    pub pending_search_token: u64,
    pub manufacturer_load_token: u64,
    pub status: Status,
    pub status_message: String,
    /// Bumped on every status change; delayed reverts only fire if it is unchanged.
    pub status_epoch: u64,
    pub loading_manufacturers: bool,
    pub searching: bool,
    pub error: Option<ErrorBanner>,
    pub notice: Option<String>,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            manufacturers: Vec::new(),
            manufacturers_loaded: false,
            selected_manufacturer: None,
            current_page: None,
            selected_product: None,
            pending_search_token: 0,
            manufacturer_load_token: 0,
            status: Status::Idle,
            status_message: messages::READY.to_string(),
            status_epoch: 0,
            loading_manufacturers: false,
            searching: false,
            error: None,
            notice: None,
        }
    }
}

impl ControllerState {
    pub fn current_results(&self) -> &[Product] {
        self.current_page
            .as_ref()
            .map(|p| p.products.as_slice())
            .unwrap_or(&[])
    }

    /// Whether `product` is on the current results page.
    pub fn has_result(&self, product: &Product) -> bool {
        self.current_page.as_ref().is_some_and(|p| p.contains(product))
    }

    pub fn set_status(&mut self, status: Status, message: &str) {
        self.status = status;
        self.status_message = message.to_string();
        self.status_epoch += 1;
    }

    pub fn show_error(&mut self, message: &str, retry: Option<RetryAction>) {
        self.error = Some(ErrorBanner {
            message: message.to_string(),
            retry,
        });
        self.set_status(Status::Error, messages::ERROR);
    }

    pub fn hide_error(&mut self) {
        self.error = None;
    }

    /// Drop results and selection; hides the result surface.
    pub fn clear_products(&mut self) {
        self.current_page = None;
        self.selected_product = None;
    }
}
