//! Core module containing the invoice model, validation, and collaborator traits

pub mod auth;
pub mod cache;
pub mod error;
pub mod invoice;
pub mod store;
pub mod validation;

pub use auth::{
    AuthClassification, AuthFailure, CredentialsProvider, IdentityProvider, Session, User,
    classify_auth_failure,
};
pub use cache::{InMemoryViewCache, ViewCache};
pub use error::ActionError;
pub use invoice::{Invoice, InvoiceChanges, InvoiceDraft, InvoiceStatus, NewInvoice};
pub use store::{InvoiceStore, StoreError, UserStore};
pub use validation::{FieldErrors, InvoiceForm, ValidationMode};
