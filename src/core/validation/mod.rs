//! Invoice form validation
//!
//! A single entry point checks an [`InvoiceForm`] against the invoice rules and
//! narrows it into the create or update shape. The [`ValidationMode`] decides
//! whether the report stops at the first failing field or covers all of them.
//!
//! Fields are always examined in form order: `customerId`, `amount`, `status`.

pub mod form;

pub use form::InvoiceForm;

use crate::core::invoice::{InvoiceChanges, InvoiceDraft, InvoiceStatus};
use form::InvoiceInput;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// How failures are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Report only the first failing field
    FailFast,
    /// Report every failing field
    #[default]
    Collect,
}

/// Field name → messages, in form order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(IndexMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to a field, creating the entry if needed
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// First field and its first message
    pub fn first(&self) -> Option<(&str, &str)> {
        self.0
            .iter()
            .find_map(|(k, v)| v.first().map(|m| (k.as_str(), m.as_str())))
    }

    /// Keep only the first field
    fn truncate_to_first(&mut self) {
        self.0.truncate(1);
    }
}

// (form key, struct field) in report order
const FIELD_ORDER: [(&str, &str); 3] = [
    (form::CUSTOMER_ID, "customer_id"),
    (form::AMOUNT, "amount_cents"),
    (form::STATUS, "status"),
];

/// Checked fields shared by both narrowed shapes
struct Checked {
    customer_id: String,
    amount_cents: i64,
    status: InvoiceStatus,
}

fn check(form: &InvoiceForm, mode: ValidationMode) -> Result<Checked, FieldErrors> {
    let input = InvoiceInput::coerce(form);

    if let Err(report) = input.validate() {
        let by_field = report.field_errors();
        let mut errors = FieldErrors::new();
        for (form_key, struct_field) in FIELD_ORDER {
            let Some((_, failures)) = by_field.iter().find(|(name, _)| *name == struct_field)
            else {
                continue;
            };
            for failure in failures.iter() {
                let message = failure
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| failure.code.to_string());
                // one entry per distinct message
                if errors.get(form_key).is_some_and(|m| m.contains(&message)) {
                    continue;
                }
                errors.push(form_key, message);
            }
        }
        if mode == ValidationMode::FailFast {
            errors.truncate_to_first();
        }
        return Err(errors);
    }

    let InvoiceInput {
        customer_id: Some(customer_id),
        amount_cents: Some(amount_cents),
        status: Some(status),
    } = input
    else {
        // The derive's `required` rules rule this out; report like they would.
        let mut errors = FieldErrors::new();
        errors.push(form::CUSTOMER_ID, "select a customer");
        return Err(errors);
    };

    Ok(Checked {
        customer_id,
        amount_cents,
        status,
    })
}

/// Validate a create form (no identifier, no date)
pub fn validate_create(
    form: &InvoiceForm,
    mode: ValidationMode,
) -> Result<InvoiceDraft, FieldErrors> {
    check(form, mode).map(|c| InvoiceDraft {
        customer_id: c.customer_id,
        amount_cents: c.amount_cents,
        status: c.status,
    })
}

/// Validate an update form; the identifier is supplied by the caller
pub fn validate_update(
    form: &InvoiceForm,
    mode: ValidationMode,
) -> Result<InvoiceChanges, FieldErrors> {
    check(form, mode).map(|c| InvoiceChanges {
        customer_id: c.customer_id,
        amount_cents: c.amount_cents,
        status: c.status,
    })
}
