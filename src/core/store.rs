//! Store traits for invoices and users
//!
//! Each write is a single parameterized statement against one collection.
//! Implementations must bind values, never splice them into statement text.

use crate::core::auth::User;
use crate::core::invoice::{Invoice, InvoiceChanges, NewInvoice};
use async_trait::async_trait;
use uuid::Uuid;

/// Failures raised by a store backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached
    #[error("failed to connect to {backend}: {message}")]
    Connection { backend: String, message: String },

    /// A statement was rejected (constraint violation, bad parameter, ...)
    #[error("{backend} query error: {message}")]
    Query { backend: String, message: String },

    /// The backend is shut down or otherwise refusing work
    #[error("storage backend '{backend}' is unavailable")]
    Unavailable { backend: String },

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Write access to the `invoices` collection, plus the list read view
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Insert one row with all five columns
    async fn insert(&self, invoice: &NewInvoice) -> Result<(), StoreError>;

    /// Set customer, amount and status on the row with `id`
    ///
    /// Returns the number of rows touched (0 when no row matches).
    async fn update(&self, id: &Uuid, changes: &InvoiceChanges) -> Result<u64, StoreError>;

    /// Remove the row with `id`, returning the number of rows removed
    async fn delete(&self, id: &Uuid) -> Result<u64, StoreError>;

    /// All invoices, newest date first
    async fn list(&self) -> Result<Vec<Invoice>, StoreError>;
}

/// Read access to registered users
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}
