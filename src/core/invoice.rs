//! Invoice record and the narrowed shapes written by the actions

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Payment status of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a raw string is neither `pending` nor `paid`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown invoice status: {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for InvoiceStatus {
    type Err = UnknownStatus;

    // Exact match only: "Paid" or " paid" are rejected like any other value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A persisted invoice row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub customer_id: String,
    /// Amount in minor currency units (cents)
    pub amount: i64,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// Validated create payload: no identity, no date
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    pub customer_id: String,
    pub amount_cents: i64,
    pub status: InvoiceStatus,
}

/// Validated update payload
///
/// The identifier travels next to this value, never inside it, and the date
/// is not part of the shape at all.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceChanges {
    pub customer_id: String,
    pub amount_cents: i64,
    pub status: InvoiceStatus,
}

/// The five columns written by a single insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub id: Uuid,
    pub customer_id: String,
    pub amount: i64,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

impl NewInvoice {
    /// Stamp a draft with a fresh identifier and the current UTC day
    pub fn from_draft(draft: InvoiceDraft) -> Self {
        Self::from_draft_on(draft, today_utc())
    }

    pub fn from_draft_on(draft: InvoiceDraft, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id: draft.customer_id,
            amount: draft.amount_cents,
            status: draft.status,
            date,
        }
    }

    pub fn into_invoice(self) -> Invoice {
        Invoice {
            id: self.id,
            customer_id: self.customer_id,
            amount: self.amount,
            status: self.status,
            date: self.date,
        }
    }
}

/// Convert a decimal amount to minor units, rounding half away from zero
///
/// Returns `None` when the rounded value is not finite or does not fit in an
/// `i64`.
pub fn to_minor_units(amount: f64) -> Option<i64> {
    let cents = (amount * 100.0).round();
    // `i64::MAX as f64` rounds up to 2^63, which is already out of range
    if cents.is_finite() && cents >= i64::MIN as f64 && cents < i64::MAX as f64 {
        Some(cents as i64)
    } else {
        None
    }
}

/// Current calendar day in UTC
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}
