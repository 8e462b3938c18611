//! # Invoice Actions
//!
//! Server-side mutation handlers for an invoicing dashboard: create, update
//! and delete an invoice, and sign a user in with credentials.
//!
//! ## Features
//!
//! - **Validated forms**: one validation pass, fail-fast or collect-all
//! - **Minor units**: amounts are stored as integer cents
//! - **Explicit outcomes**: actions return what to invalidate and where to go
//!   instead of calling into the web framework
//! - **Pluggable stores**: in-memory by default, PostgreSQL behind `postgres`
//! - **Credential sign-in**: argon2-hashed passwords, classified failures
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use invoices::prelude::*;
//!
//! let store = Arc::new(InMemoryInvoiceStore::new());
//! let actions = InvoiceActions::new(store, "/dashboard/invoices");
//!
//! let form = InvoiceForm::from_pairs([
//!     ("customerId", "c1"),
//!     ("amount", "49.99"),
//!     ("status", "pending"),
//! ]);
//!
//! match actions.create_invoice_with_state(&ActionState::default(), &form).await {
//!     ActionOutcome::Success(effects) => {
//!         // invalidate effects.revalidate, then follow effects.redirect
//!     }
//!     ActionOutcome::ValidationFailed(state) => { /* render state.errors */ }
//!     other => { /* render other.state() */ }
//! }
//! ```

pub mod actions;
pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Actions ===
    pub use crate::actions::{
        ActionOutcome, ActionState, AuthActions, AuthOutcome, Effects, InvoiceActions,
    };

    // === Core Types ===
    pub use crate::core::{
        auth::{
            AuthClassification, AuthFailure, CredentialsProvider, IdentityProvider, Session, User,
            classify_auth_failure,
        },
        cache::{InMemoryViewCache, ViewCache},
        error::{ActionError, ConfigError, RequestError, ValidationError},
        invoice::{Invoice, InvoiceChanges, InvoiceDraft, InvoiceStatus, NewInvoice},
        store::{InvoiceStore, StoreError, UserStore},
        validation::{FieldErrors, InvoiceForm, ValidationMode, validate_create, validate_update},
    };

    // === Storage ===
    pub use crate::storage::{InMemoryInvoiceStore, InMemoryUserStore};
    #[cfg(feature = "postgres")]
    pub use crate::storage::{PostgresInvoiceStore, PostgresUserStore};

    // === Config ===
    pub use crate::config::AppConfig;

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use std::sync::Arc;
    pub use uuid::Uuid;
}
