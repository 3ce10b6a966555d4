//! Customer record model.
//!
//! # Responsibility
//! - Define the customer row shown in the dashboard table, including its
//!   invoice aggregates.
//! - Validate editable customer fields before persistence.
//!
//! # Invariants
//! - `id` is opaque to callers; an empty id means "not yet assigned".
//! - Aggregates are derived from invoices and are never written back.

use crate::model::record::StoreRecord;
use crate::model::validation::{check_email, check_text, check_url, FieldErrors, ValidationError};
use serde::{Deserialize, Serialize};

pub const CUSTOMER_NAME_MIN_CHARS: usize = 3;
pub const CUSTOMER_NAME_MAX_CHARS: usize = 50;

/// One customer as cached by the client store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    /// Number of invoices issued to this customer.
    pub total_invoices: u64,
    /// Sum of pending invoice amounts in cents.
    pub total_pending: u64,
    /// Sum of paid invoice amounts in cents.
    pub total_paid: u64,
}

impl CustomerRecord {
    /// Creates an unsaved customer with zeroed aggregates and no id.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self::with_id(String::new(), name, email, image_url)
    }

    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            image_url: image_url.into(),
            total_invoices: 0,
            total_pending: 0,
            total_paid: 0,
        }
    }

    /// Validates the editable fields (`name`, `email`, `image_url`).
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = FieldErrors::new();
        check_text(
            &mut errors,
            "name",
            "Name",
            &self.name,
            "Please enter a name.",
            CUSTOMER_NAME_MIN_CHARS,
            CUSTOMER_NAME_MAX_CHARS,
        );
        check_email(&mut errors, "email", &self.email);
        check_url(
            &mut errors,
            "image_url",
            &self.image_url,
            "Please enter an image URL.",
        );
        errors.into_result()
    }
}

impl StoreRecord for CustomerRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::CustomerRecord;

    #[test]
    fn new_customer_has_no_id_and_zero_totals() {
        let customer = CustomerRecord::new("Jane Doe", "john@mail.com", "https://i.pravatar.cc/300");
        assert!(customer.id.is_empty());
        assert_eq!(customer.total_invoices, 0);
        assert_eq!(customer.total_pending, 0);
        assert_eq!(customer.total_paid, 0);
        customer.validate().expect("valid customer");
    }

    #[test]
    fn validate_reports_every_bad_field() {
        let customer = CustomerRecord::new("Jo", "not-an-email", "");
        let err = customer.validate().expect_err("invalid customer");
        let fields = err.field_errors().fields().collect::<Vec<_>>();
        assert_eq!(fields, vec!["email", "image_url", "name"]);
    }
}
