//! Customer use-cases behind the customers dashboard.
//!
//! # Invariants
//! - Deleting an absent customer succeeds; the end state is the one asked for.
//! - Updating an absent customer fails so optimistic copies get reverted.

use crate::model::customer::CustomerRecord;
use crate::repo::customer_repo::CustomerRepository;
use crate::repo::{ListQuery, RepoError};
use crate::service::{
    page_count, ActionResult, RecordService, ServiceError, ServiceResult, DEFAULT_ITEMS_PER_PAGE,
};
use log::{error, info, warn};

const ENTITY: &str = "customer";

/// Customer Data Service over a repository implementation.
pub struct CustomerService<R: CustomerRepository> {
    repo: R,
    items_per_page: u32,
}

impl<R: CustomerRepository> CustomerService<R> {
    pub fn new(repo: R) -> Self {
        Self::with_page_size(repo, DEFAULT_ITEMS_PER_PAGE)
    }

    pub fn with_page_size(repo: R, items_per_page: u32) -> Self {
        Self {
            repo,
            items_per_page: items_per_page.max(1),
        }
    }

    /// Every customer matching `query`, with invoice aggregates.
    pub fn fetch_filtered(&self, query: &str) -> ServiceResult<Vec<CustomerRecord>> {
        self.repo
            .list_customers(&ListQuery::matching(query))
            .map_err(ServiceError::fetch(ENTITY))
    }

    /// Number of pages `fetch_all` can return for `query`.
    pub fn fetch_pages(&self, query: &str) -> ServiceResult<u32> {
        let total = self
            .repo
            .count_customers(&ListQuery::matching(query))
            .map_err(ServiceError::fetch(ENTITY))?;
        Ok(page_count(total, self.items_per_page))
    }

    /// Loads one customer or signals not-found.
    pub fn get(&self, id: &str) -> ServiceResult<CustomerRecord> {
        self.repo
            .get_customer(id)
            .map_err(ServiceError::fetch(ENTITY))?
            .ok_or_else(|| ServiceError::NotFound {
                entity: ENTITY,
                id: id.to_string(),
            })
    }
}

impl<R: CustomerRepository> RecordService for CustomerService<R> {
    type Record = CustomerRecord;

    fn fetch_all(&self, query: &str, page: u32) -> ServiceResult<Vec<CustomerRecord>> {
        self.repo
            .list_customers(&ListQuery::page(query, page, self.items_per_page))
            .map_err(ServiceError::fetch(ENTITY))
    }

    fn create(&self, record: &CustomerRecord) -> ActionResult {
        match self.repo.create_customer(record) {
            Ok(id) => {
                info!("event=customer_create module=service status=ok id={id}");
                ActionResult::ok("Added Customer.")
            }
            Err(RepoError::Validation(err)) => {
                info!("event=customer_create module=service status=invalid error_code=validation");
                ActionResult::invalid(
                    err.into_field_errors(),
                    "Missing Fields. Failed to Add Customer.",
                )
            }
            Err(err) => {
                error!("event=customer_create module=service status=error error={err}");
                ActionResult::failed("Database Error: Failed to Add Customer.")
            }
        }
    }

    fn remove(&self, id: &str) -> ActionResult {
        match self.repo.delete_customer(id) {
            Ok(()) => {
                info!("event=customer_delete module=service status=ok id={id}");
                ActionResult::ok("Deleted Customer.")
            }
            Err(RepoError::NotFound(_)) => {
                warn!("event=customer_delete module=service status=ok id={id} existed=false");
                ActionResult::ok("Deleted Customer.")
            }
            Err(err) => {
                error!("event=customer_delete module=service status=error id={id} error={err}");
                ActionResult::failed("Database Error: Failed to Delete Customer.")
            }
        }
    }

    fn update(&self, record: &CustomerRecord) -> ActionResult {
        match self.repo.update_customer(record) {
            Ok(()) => {
                info!(
                    "event=customer_update module=service status=ok id={}",
                    record.id
                );
                ActionResult::ok("Updated Customer.")
            }
            Err(RepoError::Validation(err)) => ActionResult::invalid(
                err.into_field_errors(),
                "Missing Fields. Failed to Update Customer.",
            ),
            Err(RepoError::NotFound(id)) => {
                warn!("event=customer_update module=service status=error id={id} error_code=not_found");
                ActionResult::failed("Customer not found. Failed to Update Customer.")
            }
            Err(err) => {
                error!(
                    "event=customer_update module=service status=error id={} error={err}",
                    record.id
                );
                ActionResult::failed("Database Error: Failed to Update Customer.")
            }
        }
    }
}
