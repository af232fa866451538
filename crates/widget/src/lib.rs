//! `quotelink-widget`
//!
//! **Responsibility:** the product lookup widget minus its markup.
//!
//! This crate provides:
//! - the interaction controller (manufacturer load, debounced product search,
//!   selection, quote staging) with its stale-response guard
//! - hosting-context detection (standalone, embedded, hosted by the CRM)
//! - the presentation mapping from controller state to display structures
//!
//! Markup is left to whatever shell renders [`WidgetView`].

pub mod config;
pub mod controller;
pub mod debounce;
pub mod environment;
pub mod host;
pub mod render;
pub mod state;

pub use config::WidgetConfig;
pub use controller::WidgetController;
pub use debounce::SearchDebouncer;
pub use environment::{BrowsingContext, HostingMode, StaticContext, detect_mode};
pub use host::{HostError, QuoteHost, UnavailableHost};
pub use render::WidgetView;
pub use state::{ControllerState, ErrorBanner, Outcome, Precondition, RetryAction, Status};
