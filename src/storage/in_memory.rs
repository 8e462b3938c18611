//! In-memory stores for testing and development

use crate::core::auth::User;
use crate::core::invoice::{Invoice, InvoiceChanges, NewInvoice};
use crate::core::store::{InvoiceStore, StoreError, UserStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

const BACKEND: &str = "in-memory";

fn lock_error<T>(e: PoisonError<T>) -> StoreError {
    StoreError::Unavailable {
        backend: format!("{} ({})", BACKEND, e),
    }
}

/// In-memory invoice store
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
#[derive(Clone, Default)]
pub struct InMemoryInvoiceStore {
    invoices: Arc<RwLock<HashMap<Uuid, Invoice>>>,
}

impl InMemoryInvoiceStore {
    /// Create a new in-memory invoice store
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of one row, for inspection in tests and tools
    pub fn get(&self, id: &Uuid) -> Option<Invoice> {
        self.invoices.read().ok()?.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.invoices.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn insert(&self, invoice: &NewInvoice) -> Result<(), StoreError> {
        let mut invoices = self.invoices.write().map_err(lock_error)?;

        if invoices.contains_key(&invoice.id) {
            return Err(StoreError::Query {
                backend: BACKEND.to_string(),
                message: format!("duplicate key value violates unique constraint: {}", invoice.id),
            });
        }

        invoices.insert(invoice.id, invoice.clone().into_invoice());
        Ok(())
    }

    async fn update(&self, id: &Uuid, changes: &InvoiceChanges) -> Result<u64, StoreError> {
        let mut invoices = self.invoices.write().map_err(lock_error)?;

        let Some(invoice) = invoices.get_mut(id) else {
            return Ok(0);
        };

        invoice.customer_id = changes.customer_id.clone();
        invoice.amount = changes.amount_cents;
        invoice.status = changes.status;

        Ok(1)
    }

    async fn delete(&self, id: &Uuid) -> Result<u64, StoreError> {
        let mut invoices = self.invoices.write().map_err(lock_error)?;

        Ok(invoices.remove(id).map_or(0, |_| 1))
    }

    async fn list(&self) -> Result<Vec<Invoice>, StoreError> {
        let invoices = self.invoices.read().map_err(lock_error)?;

        let mut all: Vec<Invoice> = invoices.values().cloned().collect();
        all.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }
}

/// In-memory user store keyed by email
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user, replacing any user with the same email
    pub fn add(&self, user: User) -> Result<(), StoreError> {
        let mut users = self.users.write().map_err(lock_error)?;
        users.insert(user.email.clone(), user);
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().map_err(lock_error)?;

        Ok(users.get(email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::invoice::InvoiceStatus;
    use chrono::NaiveDate;

    fn new_invoice(customer: &str, amount: i64, day: u32) -> NewInvoice {
        NewInvoice {
            id: Uuid::new_v4(),
            customer_id: customer.to_string(),
            amount,
            status: InvoiceStatus::Pending,
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let store = InMemoryInvoiceStore::new();
        let row = new_invoice("c1", 4999, 1);

        store.insert(&row).await.unwrap();

        let stored = store.get(&row.id).unwrap();
        assert_eq!(stored.customer_id, "c1");
        assert_eq!(stored.amount, 4999);
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let store = InMemoryInvoiceStore::new();
        let row = new_invoice("c1", 100, 1);

        store.insert(&row).await.unwrap();
        assert!(store.insert(&row).await.is_err());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_update_leaves_id_and_date_alone() {
        let store = InMemoryInvoiceStore::new();
        let row = new_invoice("c1", 100, 5);
        store.insert(&row).await.unwrap();

        let changes = InvoiceChanges {
            customer_id: "c2".to_string(),
            amount_cents: 1000,
            status: InvoiceStatus::Paid,
        };
        assert_eq!(store.update(&row.id, &changes).await.unwrap(), 1);

        let stored = store.get(&row.id).unwrap();
        assert_eq!(stored.id, row.id);
        assert_eq!(stored.date, row.date);
        assert_eq!(stored.customer_id, "c2");
        assert_eq!(stored.amount, 1000);
        assert_eq!(stored.status, InvoiceStatus::Paid);
    }

    #[tokio::test]
    async fn test_update_unknown_id_touches_nothing() {
        let store = InMemoryInvoiceStore::new();
        let changes = InvoiceChanges {
            customer_id: "c2".to_string(),
            amount_cents: 1,
            status: InvoiceStatus::Paid,
        };
        assert_eq!(store.update(&Uuid::new_v4(), &changes).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = InMemoryInvoiceStore::new();
        let row = new_invoice("c1", 100, 1);
        store.insert(&row).await.unwrap();

        assert_eq!(store.delete(&row.id).await.unwrap(), 1);
        assert_eq!(store.delete(&row.id).await.unwrap(), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = InMemoryInvoiceStore::new();
        store.insert(&new_invoice("old", 1, 1)).await.unwrap();
        store.insert(&new_invoice("new", 2, 9)).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all[0].customer_id, "new");
        assert_eq!(all[1].customer_id, "old");
    }

    #[tokio::test]
    async fn test_user_lookup_by_email() {
        let users = InMemoryUserStore::new();
        users
            .add(User {
                id: Uuid::new_v4(),
                name: "User".to_string(),
                email: "user@nextmail.com".to_string(),
                password: "hash".to_string(),
            })
            .unwrap();

        assert!(users.find_by_email("user@nextmail.com").await.unwrap().is_some());
        assert!(users.find_by_email("nobody@nextmail.com").await.unwrap().is_none());
    }
}
