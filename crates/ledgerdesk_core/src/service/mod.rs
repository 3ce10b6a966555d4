//! Data Service: validated fetch and mutation use-cases.
//!
//! # Responsibility
//! - Orchestrate repository calls into dashboard actions.
//! - Fold validation and persistence failures into `ActionResult` values.
//!
//! # Invariants
//! - Mutations never return `Err`; failures become `ActionStatus::Invalid`
//!   (field errors) or `ActionStatus::Failed` (generic message).
//! - Persistence error detail is logged, never returned to callers.
//! - Single-record reads report absence as `ServiceError::NotFound`.

use crate::model::record::StoreRecord;
use crate::model::validation::FieldErrors;
use crate::repo::RepoError;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod customer_service;
pub mod invoice_service;
pub mod password;
pub mod user_service;

/// Rows per dashboard page unless configured otherwise.
pub const DEFAULT_ITEMS_PER_PAGE: u32 = 6;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Read-side failure of the Data Service.
#[derive(Debug)]
pub enum ServiceError {
    /// Requested entity does not exist. Terminal for the requesting view.
    NotFound { entity: &'static str, id: String },
    /// Storage failed while fetching.
    Fetch {
        entity: &'static str,
        source: RepoError,
    },
}

impl ServiceError {
    pub(crate) fn fetch(entity: &'static str) -> impl FnOnce(RepoError) -> Self {
        move |source| {
            log::error!(
                "event=fetch module=service status=error entity={entity} error={source}"
            );
            Self::Fetch { entity, source }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Fetch { entity, .. } => write!(f, "Database Error: Failed to fetch {entity} data."),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound { .. } => None,
            Self::Fetch { source, .. } => Some(source),
        }
    }
}

/// Coarse outcome of a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Ok,
    /// Input was rejected before any write.
    Invalid,
    /// The write was attempted and failed.
    Failed,
}

/// Structured outcome of a mutation, rendered by the Presentation Layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResult {
    pub status: ActionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: ActionStatus::Ok,
            errors: None,
            message: Some(message.into()),
        }
    }

    pub fn invalid(errors: FieldErrors, message: impl Into<String>) -> Self {
        Self {
            status: ActionStatus::Invalid,
            errors: Some(errors),
            message: Some(message.into()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: ActionStatus::Failed,
            errors: None,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ActionStatus::Ok
    }

    /// Messages for one form field, empty when the field is fine.
    pub fn field_errors(&self, field: &str) -> &[String] {
        self.errors
            .as_ref()
            .and_then(|errors| errors.get(field))
            .unwrap_or(&[])
    }
}

/// Data Service contract consumed by the optimistic dispatcher and views.
pub trait RecordService {
    type Record: StoreRecord;

    /// One page of records matching `query`. Pages are 1-based.
    fn fetch_all(&self, query: &str, page: u32) -> ServiceResult<Vec<Self::Record>>;
    fn create(&self, record: &Self::Record) -> ActionResult;
    fn remove(&self, id: &str) -> ActionResult;
    fn update(&self, record: &Self::Record) -> ActionResult;
}

/// Number of pages needed for `total` rows.
pub fn page_count(total: u64, per_page: u32) -> u32 {
    let per_page = u64::from(per_page.max(1));
    u32::try_from(total.div_ceil(per_page)).unwrap_or(u32::MAX)
}
