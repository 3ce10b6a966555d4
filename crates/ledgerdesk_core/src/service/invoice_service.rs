//! Invoice use-cases.
//!
//! # Invariants
//! - Form input is coerced to cents before persistence.
//! - An invoice may only reference an existing customer.

use crate::model::invoice::{InvoiceForm, InvoiceRecord, ValidInvoice};
use crate::model::validation::FieldErrors;
use crate::repo::invoice_repo::InvoiceRepository;
use crate::repo::{ListQuery, RepoError};
use crate::service::{page_count, ActionResult, ServiceError, ServiceResult, DEFAULT_ITEMS_PER_PAGE};
use log::{error, info, warn};

const ENTITY: &str = "invoice";

/// Invoice Data Service over a repository implementation.
pub struct InvoiceService<R: InvoiceRepository> {
    repo: R,
    items_per_page: u32,
}

impl<R: InvoiceRepository> InvoiceService<R> {
    pub fn new(repo: R) -> Self {
        Self::with_page_size(repo, DEFAULT_ITEMS_PER_PAGE)
    }

    pub fn with_page_size(repo: R, items_per_page: u32) -> Self {
        Self {
            repo,
            items_per_page: items_per_page.max(1),
        }
    }

    pub fn create_invoice(&self, form: &InvoiceForm) -> ActionResult {
        let invoice = match self.checked(form, "Create") {
            Ok(invoice) => invoice,
            Err(result) => return result,
        };

        match self.repo.create_invoice(&invoice) {
            Ok(created) => {
                info!(
                    "event=invoice_create module=service status=ok id={} amount_cents={}",
                    created.id, created.amount_cents
                );
                ActionResult::ok("Created Invoice.")
            }
            Err(err) => {
                error!("event=invoice_create module=service status=error error={err}");
                ActionResult::failed("Database Error: Failed to Create Invoice.")
            }
        }
    }

    pub fn update_invoice(&self, id: &str, form: &InvoiceForm) -> ActionResult {
        let invoice = match self.checked(form, "Update") {
            Ok(invoice) => invoice,
            Err(result) => return result,
        };

        match self.repo.update_invoice(id, &invoice) {
            Ok(()) => {
                info!("event=invoice_update module=service status=ok id={id}");
                ActionResult::ok("Updated Invoice.")
            }
            Err(RepoError::NotFound(_)) => {
                warn!("event=invoice_update module=service status=error id={id} error_code=not_found");
                ActionResult::failed("Invoice not found. Failed to Update Invoice.")
            }
            Err(err) => {
                error!("event=invoice_update module=service status=error id={id} error={err}");
                ActionResult::failed("Database Error: Failed to Update Invoice.")
            }
        }
    }

    pub fn delete_invoice(&self, id: &str) -> ActionResult {
        match self.repo.delete_invoice(id) {
            Ok(()) | Err(RepoError::NotFound(_)) => {
                info!("event=invoice_delete module=service status=ok id={id}");
                ActionResult::ok("Deleted Invoice.")
            }
            Err(err) => {
                error!("event=invoice_delete module=service status=error id={id} error={err}");
                ActionResult::failed("Database Error: Failed to Delete Invoice.")
            }
        }
    }

    /// Loads one invoice or signals not-found.
    pub fn get_invoice(&self, id: &str) -> ServiceResult<InvoiceRecord> {
        self.repo
            .get_invoice(id)
            .map_err(ServiceError::fetch(ENTITY))?
            .ok_or_else(|| ServiceError::NotFound {
                entity: ENTITY,
                id: id.to_string(),
            })
    }

    /// One page of invoices matching `query` on customer, amount, date, or status.
    pub fn list_invoices(&self, query: &str, page: u32) -> ServiceResult<Vec<InvoiceRecord>> {
        self.repo
            .list_invoices(&ListQuery::page(query, page, self.items_per_page))
            .map_err(ServiceError::fetch(ENTITY))
    }

    pub fn invoice_pages(&self, query: &str) -> ServiceResult<u32> {
        let total = self
            .repo
            .count_invoices(&ListQuery::matching(query))
            .map_err(ServiceError::fetch(ENTITY))?;
        Ok(page_count(total, self.items_per_page))
    }

    /// Parses the form and checks the referenced customer.
    fn checked(&self, form: &InvoiceForm, verb: &str) -> Result<ValidInvoice, ActionResult> {
        let missing = format!("Missing Fields. Failed to {verb} Invoice.");
        let invoice = form
            .parse()
            .map_err(|err| ActionResult::invalid(err.into_field_errors(), missing.as_str()))?;

        match self.repo.customer_exists(&invoice.customer_id) {
            Ok(true) => Ok(invoice),
            Ok(false) => Err(ActionResult::invalid(
                FieldErrors::single("customer_id", "Please select a customer."),
                missing,
            )),
            Err(err) => {
                error!(
                    "event=invoice_{} module=service status=error error={err}",
                    verb.to_ascii_lowercase()
                );
                Err(ActionResult::failed(format!(
                    "Database Error: Failed to {verb} Invoice."
                )))
            }
        }
    }
}
