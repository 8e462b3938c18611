//! Raw invoice form and its coercion into a checkable shape

use crate::core::invoice::{InvoiceStatus, to_minor_units};
use serde::Deserialize;
use validator::Validate;

/// Form field carrying the customer reference
pub const CUSTOMER_ID: &str = "customerId";
/// Form field carrying the decimal amount
pub const AMOUNT: &str = "amount";
/// Form field carrying the status
pub const STATUS: &str = "status";

/// Untrusted invoice form as submitted by the browser
///
/// Each field is the raw string value, or `None` when the key was absent.
/// Keys other than the three invoice fields (`id`, `date`, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InvoiceForm {
    #[serde(rename = "customerId", default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl InvoiceForm {
    /// Build a form from `(key, value)` pairs, keeping only invoice fields
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::default();
        for (key, value) in pairs {
            match key.as_ref() {
                CUSTOMER_ID => form.customer_id = Some(value.into()),
                AMOUNT => form.amount = Some(value.into()),
                STATUS => form.status = Some(value.into()),
                _ => {}
            }
        }
        form
    }
}

/// Coerced form, checked by the `validator` derive
#[derive(Debug, Validate)]
pub(crate) struct InvoiceInput {
    #[validate(
        required(message = "select a customer"),
        length(min = 1, message = "select a customer")
    )]
    pub customer_id: Option<String>,

    /// Amount in minor units; at least one cent
    #[validate(
        required(message = "enter an amount"),
        range(min = 1, message = "enter an amount")
    )]
    pub amount_cents: Option<i64>,

    #[validate(required(message = "select a status"))]
    pub status: Option<InvoiceStatus>,
}

impl InvoiceInput {
    pub(crate) fn coerce(form: &InvoiceForm) -> Self {
        Self {
            customer_id: form.customer_id.clone(),
            amount_cents: form
                .amount
                .as_deref()
                .and_then(coerce_amount)
                .and_then(to_minor_units),
            status: form.status.as_deref().and_then(|s| s.parse().ok()),
        }
    }
}

/// Number coercion for a form amount
///
/// Surrounding whitespace is ignored and a blank value reads as zero.
/// Unparseable and non-finite values yield `None`.
pub(crate) fn coerce_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}
