//! Hosting-context detection.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where the widget is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostingMode {
    /// Own top-level window.
    Standalone,
    /// Framed by an unrecognized parent.
    Embedded,
    /// Framed by the target CRM; quote population is available.
    HostedByTarget,
}

impl HostingMode {
    pub fn can_populate_quote(&self) -> bool {
        *self == HostingMode::HostedByTarget
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cross-origin access to parent window denied")]
pub struct AccessDenied;

/// Capability query over the widget's browsing context.
pub trait BrowsingContext {
    fn is_top_level(&self) -> bool;
    fn has_distinct_parent(&self) -> bool;
    /// Host of the parent window's location. Cross-origin parents deny access.
    fn parent_host(&self) -> Result<String, AccessDenied>;
}

/// Decide the hosting mode from the browsing context.
///
/// Never fails: a parent that cannot be inspected is simply not the target.
pub fn detect_mode(context: &dyn BrowsingContext, marker: &str) -> HostingMode {
    if context.has_distinct_parent() {
        match context.parent_host() {
            Ok(host) if host.to_ascii_lowercase().contains(&marker.to_ascii_lowercase()) => {
                return HostingMode::HostedByTarget;
            }
            Ok(host) => tracing::debug!(%host, "parent host is not the target CRM"),
            Err(e) => tracing::debug!(error = %e, "parent window not inspectable"),
        }
    }

    if context.is_top_level() {
        HostingMode::Standalone
    } else {
        HostingMode::Embedded
    }
}

/// A browsing context fixed at construction (native hosts, tests).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticContext {
    TopLevel,
    /// Framed by a same-origin parent whose host is readable.
    Framed { parent_host: String },
    /// Framed by a cross-origin parent.
    CrossOrigin,
}

impl StaticContext {
    pub fn framed_by(host: impl Into<String>) -> Self {
        StaticContext::Framed {
            parent_host: host.into(),
        }
    }
}

impl BrowsingContext for StaticContext {
    fn is_top_level(&self) -> bool {
        matches!(self, StaticContext::TopLevel)
    }

    fn has_distinct_parent(&self) -> bool {
        !self.is_top_level()
    }

    fn parent_host(&self) -> Result<String, AccessDenied> {
        match self {
            StaticContext::Framed { parent_host } => Ok(parent_host.clone()),
            StaticContext::TopLevel | StaticContext::CrossOrigin => Err(AccessDenied),
        }
    }
}
