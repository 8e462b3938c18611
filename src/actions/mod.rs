//! Server-side actions
//!
//! Each action validates its input, performs at most one write, and returns a
//! tagged outcome. Actions never touch the view cache or the response
//! themselves: the caller owning those reads the outcome and applies it.
//!
//! ```text
//! form ──▶ validate ──▶ store write ──▶ ActionOutcome::Success(Effects)
//!              │              │                  │
//!              ▼              ▼                  ▼
//!      ValidationFailed   StoreFailed     boundary invalidates views,
//!                                          then redirects (if any)
//! ```

pub mod auth;
pub mod invoices;

pub use auth::{AuthActions, AuthOutcome};
pub use invoices::InvoiceActions;

use crate::core::validation::FieldErrors;
use serde::{Deserialize, Serialize};

/// The `{errors?, message?}` object rendered next to a form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionState {
    /// State with a summary message only
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            errors: None,
            message: Some(message.into()),
        }
    }

    /// State with per-field errors and a summary message
    pub fn invalid(errors: FieldErrors, message: impl Into<String>) -> Self {
        Self {
            errors: Some(errors),
            message: Some(message.into()),
        }
    }
}

/// Side effects a successful action asks its caller to perform, in order:
/// invalidate every `revalidate` path, then navigate to `redirect`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effects {
    pub revalidate: Vec<String>,
    pub redirect: Option<String>,
}

impl Effects {
    /// Invalidate `path` and navigate to it
    pub fn revalidate_and_redirect(path: &str) -> Self {
        Self {
            revalidate: vec![path.to_string()],
            redirect: Some(path.to_string()),
        }
    }

    /// Invalidate `path` and stay on the current view
    pub fn revalidate(path: &str) -> Self {
        Self {
            revalidate: vec![path.to_string()],
            redirect: None,
        }
    }
}

/// Tagged result of an invoice action
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// The write went through
    Success(Effects),
    /// The form was rejected before any write
    ValidationFailed(ActionState),
    /// The store failed; the state carries a fixed message only
    StoreFailed(ActionState),
    /// The targeted invoice does not exist
    NotFound(ActionState),
}

impl ActionOutcome {
    /// Whether the write went through
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Success(_))
    }

    /// Effects to apply, for `Success` only
    pub fn effects(&self) -> Option<&Effects> {
        match self {
            ActionOutcome::Success(effects) => Some(effects),
            _ => None,
        }
    }

    /// Form state for the failure variants
    pub fn state(&self) -> Option<&ActionState> {
        match self {
            ActionOutcome::Success(_) => None,
            ActionOutcome::ValidationFailed(state)
            | ActionOutcome::StoreFailed(state)
            | ActionOutcome::NotFound(state) => Some(state),
        }
    }
}
