//! Invoice model and invoice form parsing.
//!
//! # Responsibility
//! - Define invoice rows and their payment status.
//! - Coerce raw invoice form input into validated, cent-denominated values.
//!
//! # Invariants
//! - `amount_cents` is strictly positive.
//! - `date` is an ISO calendar date (`YYYY-MM-DD`) assigned on creation.

use crate::model::record::StoreRecord;
use crate::model::validation::{FieldErrors, ValidationError};
use serde::{Deserialize, Serialize};

/// Payment state of one invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }
}

/// Persisted invoice row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub id: String,
    pub customer_id: String,
    pub amount_cents: i64,
    pub status: InvoiceStatus,
    pub date: String,
}

impl StoreRecord for InvoiceRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Raw invoice form input. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InvoiceForm {
    pub customer_id: Option<String>,
    /// Dollar amount as typed, e.g. `"12.50"`.
    pub amount: Option<String>,
    pub status: Option<String>,
}

/// Invoice values that passed form validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidInvoice {
    pub customer_id: String,
    pub amount_cents: i64,
    pub status: InvoiceStatus,
}

impl InvoiceForm {
    /// Validates and coerces the form, reporting every bad field at once.
    pub fn parse(&self) -> Result<ValidInvoice, ValidationError> {
        let mut errors = FieldErrors::new();

        let customer_id = self
            .customer_id
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty());
        if customer_id.is_none() {
            errors.add("customer_id", "Please select a customer.");
        }

        let amount_cents = self.amount.as_deref().and_then(parse_amount_cents);
        if amount_cents.is_none() {
            errors.add("amount", "Please enter an amount greater than $0.");
        }

        let status = self.status.as_deref().and_then(InvoiceStatus::parse);
        if status.is_none() {
            errors.add("status", "Please select an invoice status.");
        }

        match (customer_id, amount_cents, status) {
            (Some(customer_id), Some(amount_cents), Some(status)) => Ok(ValidInvoice {
                customer_id: customer_id.to_string(),
                amount_cents,
                status,
            }),
            _ => Err(ValidationError(errors)),
        }
    }
}

/// Converts a typed dollar amount into whole cents.
///
/// Returns `None` for non-numeric, non-finite, or non-positive amounts and for
/// amounts that round to zero cents.
pub fn parse_amount_cents(raw: &str) -> Option<i64> {
    let amount: f64 = raw.trim().parse().ok()?;
    if !amount.is_finite() || amount <= 0.0 {
        return None;
    }
    let cents = (amount * 100.0).round();
    if cents < 1.0 || cents > i64::MAX as f64 {
        return None;
    }
    Some(cents as i64)
}
