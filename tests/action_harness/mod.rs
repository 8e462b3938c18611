//! Shared test harness for action testing
//!
//! Provides store and provider doubles that record or fail on demand, plus
//! helpers for building forms and seeded users.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! mod action_harness;
//! use action_harness::*;
//! ```

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use uuid::Uuid;

use invoices::core::auth::{AuthFailure, IdentityProvider, Session, User, hash_password};
use invoices::core::invoice::{Invoice, InvoiceChanges, NewInvoice};
use invoices::core::store::{InvoiceStore, StoreError};
use invoices::core::validation::InvoiceForm;
use invoices::storage::{InMemoryInvoiceStore, InMemoryUserStore};

pub const LIST_PATH: &str = "/dashboard/invoices";
pub const DEMO_EMAIL: &str = "user@nextmail.com";
pub const DEMO_PASSWORD: &str = "123456";

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

pub fn invoice_form(customer: &str, amount: &str, status: &str) -> InvoiceForm {
    InvoiceForm::from_pairs([("customerId", customer), ("amount", amount), ("status", status)])
}

pub fn credentials(email: &str, password: &str) -> HashMap<String, String> {
    HashMap::from([
        ("email".to_string(), email.to_string()),
        ("password".to_string(), password.to_string()),
    ])
}

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

/// In-memory store that counts every call it receives
#[derive(Clone, Default)]
pub struct CountingStore {
    pub inner: InMemoryInvoiceStore,
    pub inserts: Arc<AtomicUsize>,
    pub updates: Arc<AtomicUsize>,
    pub deletes: Arc<AtomicUsize>,
    pub last_insert: Arc<Mutex<Option<NewInvoice>>>,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
            + self.updates.load(Ordering::SeqCst)
            + self.deletes.load(Ordering::SeqCst)
    }

    pub fn last_insert(&self) -> Option<NewInvoice> {
        self.last_insert.lock().unwrap().clone()
    }
}

#[async_trait]
impl InvoiceStore for CountingStore {
    async fn insert(&self, invoice: &NewInvoice) -> Result<(), StoreError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        *self.last_insert.lock().unwrap() = Some(invoice.clone());
        self.inner.insert(invoice).await
    }

    async fn update(&self, id: &Uuid, changes: &InvoiceChanges) -> Result<u64, StoreError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update(id, changes).await
    }

    async fn delete(&self, id: &Uuid) -> Result<u64, StoreError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(id).await
    }

    async fn list(&self) -> Result<Vec<Invoice>, StoreError> {
        self.inner.list().await
    }
}

/// Store whose next `list()` holds its snapshot until released
///
/// Call [`PausingStore::arm`] to pause the next read. The read signals
/// `snapshot_taken` once it has fetched its rows, then waits for `release`.
#[derive(Clone, Default)]
pub struct PausingStore {
    pub inner: CountingStore,
    armed: Arc<AtomicBool>,
    pub snapshot_taken: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl PausingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl InvoiceStore for PausingStore {
    async fn insert(&self, invoice: &NewInvoice) -> Result<(), StoreError> {
        self.inner.insert(invoice).await
    }

    async fn update(&self, id: &Uuid, changes: &InvoiceChanges) -> Result<u64, StoreError> {
        self.inner.update(id, changes).await
    }

    async fn delete(&self, id: &Uuid) -> Result<u64, StoreError> {
        self.inner.delete(id).await
    }

    async fn list(&self) -> Result<Vec<Invoice>, StoreError> {
        let rows = self.inner.list().await?;
        if self.armed.swap(false, Ordering::SeqCst) {
            self.snapshot_taken.notify_one();
            self.release.notified().await;
        }
        Ok(rows)
    }
}

/// Store whose every statement fails
#[derive(Clone, Default)]
pub struct FailingStore;

fn refused() -> StoreError {
    StoreError::Connection {
        backend: "PostgreSQL".to_string(),
        message: "connection refused (secret-host:5432)".to_string(),
    }
}

#[async_trait]
impl InvoiceStore for FailingStore {
    async fn insert(&self, _: &NewInvoice) -> Result<(), StoreError> {
        Err(refused())
    }

    async fn update(&self, _: &Uuid, _: &InvoiceChanges) -> Result<u64, StoreError> {
        Err(refused())
    }

    async fn delete(&self, _: &Uuid) -> Result<u64, StoreError> {
        Err(refused())
    }

    async fn list(&self) -> Result<Vec<Invoice>, StoreError> {
        Err(refused())
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// User store holding the demo user with a real argon2 hash
pub fn demo_users() -> InMemoryUserStore {
    let users = InMemoryUserStore::new();
    users
        .add(User {
            id: Uuid::new_v4(),
            name: "User".to_string(),
            email: DEMO_EMAIL.to_string(),
            password: hash_password(DEMO_PASSWORD).unwrap(),
        })
        .unwrap();
    users
}

/// Provider that always fails with a fixed message and records what it saw
pub struct FixedFailureProvider {
    pub message: String,
    pub seen: Mutex<Vec<(String, HashMap<String, String>)>>,
}

impl FixedFailureProvider {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl IdentityProvider for FixedFailureProvider {
    async fn sign_in(
        &self,
        scheme: &str,
        fields: &HashMap<String, String>,
    ) -> Result<Session, AuthFailure> {
        self.seen
            .lock()
            .unwrap()
            .push((scheme.to_string(), fields.clone()));
        Err(AuthFailure::new(self.message.clone()))
    }
}
