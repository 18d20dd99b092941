//! Side channel for failures the background units contain.
//!
//! Nothing here reaches the user: a failed tick or copy is reported to the
//! sink and the unit carries on.

use std::fmt::Display;

use crate::{clipboard::ClipboardError, OtpError};

/// Which background unit hit the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Refresh,
    Copy,
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Refresh => write!(f, "refresh"),
            Self::Copy => write!(f, "copy"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Failure {
    #[error("Error generating TOTP code during {action}")]
    Derivation {
        action: Action,
        #[source]
        source: OtpError,
    },
    #[error("Error copying TOTP code to clipboard")]
    Clipboard(#[source] ClipboardError),
}

impl Failure {
    pub fn action(&self) -> Action {
        match self {
            Self::Derivation { action, .. } => *action,
            Self::Clipboard(_) => Action::Copy,
        }
    }
}

pub trait DiagnosticSink: Send + Sync {
    fn report(&self, failure: &Failure);
}

/// Logs every failure at `warn`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, failure: &Failure) {
        match failure {
            Failure::Derivation { action, source } => {
                tracing::warn!(%action, error = %source, "{failure}");
            }
            Failure::Clipboard(source) => {
                tracing::warn!(error = %source, "{failure}");
            }
        }
    }
}
