//! Create, update and delete actions for invoices
//!
//! Every mutation exists in two flavours:
//!
//! - the plain one (`create_invoice`, `update_invoice`) stops at the first
//!   invalid field and returns it as `Err(ActionError::Validation)`;
//! - the `_with_state` one collects every invalid field into an
//!   [`ActionState`] for inline form errors.
//!
//! Store failures are logged and turned into one fixed message per action in
//! both flavours.

use super::{ActionOutcome, ActionState, Effects};
use crate::core::error::ActionError;
use crate::core::invoice::{InvoiceChanges, NewInvoice};
use crate::core::store::InvoiceStore;
use crate::core::validation::{
    FieldErrors, InvoiceForm, ValidationMode, validate_create, validate_update,
};
use std::sync::Arc;
use uuid::Uuid;

pub const CREATE_FAILED: &str = "database error: could not create invoice";
pub const UPDATE_FAILED: &str = "database error: could not update invoice";
pub const DELETE_FAILED: &str = "database error: could not delete invoice";
pub const CREATE_INVALID: &str = "missing fields: could not create invoice";
pub const UPDATE_INVALID: &str = "missing fields: could not update invoice";
pub const UPDATE_NOT_FOUND: &str = "invoice not found: could not update invoice";

/// Invoice mutations over a shared store
#[derive(Clone)]
pub struct InvoiceActions {
    store: Arc<dyn InvoiceStore>,
    list_path: String,
}

impl InvoiceActions {
    /// `list_path` is the invoice-list view: invalidated after every write
    /// and the redirect target after create and update.
    pub fn new(store: Arc<dyn InvoiceStore>, list_path: impl Into<String>) -> Self {
        Self {
            store,
            list_path: list_path.into(),
        }
    }

    pub fn list_path(&self) -> &str {
        &self.list_path
    }

    pub fn store(&self) -> &Arc<dyn InvoiceStore> {
        &self.store
    }

    /// Create an invoice, failing fast on the first invalid field
    pub async fn create_invoice(&self, form: &InvoiceForm) -> Result<ActionOutcome, ActionError> {
        let draft = validate_create(form, ValidationMode::FailFast)?;
        Ok(self.insert(NewInvoice::from_draft(draft)).await)
    }

    /// Create an invoice, reporting every invalid field
    ///
    /// The previous state is accepted for form-action compatibility and ignored.
    pub async fn create_invoice_with_state(
        &self,
        _prev_state: &ActionState,
        form: &InvoiceForm,
    ) -> ActionOutcome {
        match validate_create(form, ValidationMode::Collect) {
            Ok(draft) => self.insert(NewInvoice::from_draft(draft)).await,
            Err(errors) => rejected(errors, CREATE_INVALID),
        }
    }

    /// Update an invoice, failing fast on the first invalid field
    pub async fn update_invoice(
        &self,
        id: &Uuid,
        form: &InvoiceForm,
    ) -> Result<ActionOutcome, ActionError> {
        let changes = validate_update(form, ValidationMode::FailFast)?;
        Ok(self.apply_update(id, &changes).await)
    }

    /// Update an invoice, reporting every invalid field
    pub async fn update_invoice_with_state(
        &self,
        id: &Uuid,
        _prev_state: &ActionState,
        form: &InvoiceForm,
    ) -> ActionOutcome {
        match validate_update(form, ValidationMode::Collect) {
            Ok(changes) => self.apply_update(id, &changes).await,
            Err(errors) => rejected(errors, UPDATE_INVALID),
        }
    }

    /// Delete an invoice; a missing row is not an error
    pub async fn delete_invoice(&self, id: &Uuid) -> ActionOutcome {
        match self.store.delete(id).await {
            Ok(removed) => {
                tracing::info!(invoice_id = %id, removed, "invoice deleted");
                ActionOutcome::Success(Effects::revalidate(&self.list_path))
            }
            Err(e) => {
                tracing::error!(invoice_id = %id, error = %e, "failed to delete invoice");
                ActionOutcome::StoreFailed(ActionState::message(DELETE_FAILED))
            }
        }
    }

    async fn insert(&self, invoice: NewInvoice) -> ActionOutcome {
        match self.store.insert(&invoice).await {
            Ok(()) => {
                tracing::info!(
                    invoice_id = %invoice.id,
                    customer_id = %invoice.customer_id,
                    amount = invoice.amount,
                    "invoice created"
                );
                ActionOutcome::Success(Effects::revalidate_and_redirect(&self.list_path))
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to create invoice");
                ActionOutcome::StoreFailed(ActionState::message(CREATE_FAILED))
            }
        }
    }

    async fn apply_update(&self, id: &Uuid, changes: &InvoiceChanges) -> ActionOutcome {
        match self.store.update(id, changes).await {
            Ok(0) => {
                tracing::warn!(invoice_id = %id, "update matched no invoice");
                ActionOutcome::NotFound(ActionState::message(UPDATE_NOT_FOUND))
            }
            Ok(_) => {
                tracing::info!(invoice_id = %id, "invoice updated");
                ActionOutcome::Success(Effects::revalidate_and_redirect(&self.list_path))
            }
            Err(e) => {
                tracing::error!(invoice_id = %id, error = %e, "failed to update invoice");
                ActionOutcome::StoreFailed(ActionState::message(UPDATE_FAILED))
            }
        }
    }
}

fn rejected(errors: FieldErrors, message: &str) -> ActionOutcome {
    tracing::debug!(fields = ?errors.fields().collect::<Vec<_>>(), "invoice form rejected");
    ActionOutcome::ValidationFailed(ActionState::invalid(errors, message))
}
