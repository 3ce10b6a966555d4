//! Core domain logic for the LedgerDesk dashboard.
//! Client record stores, their synchronization with persistence, and the
//! validating Data Service all live here.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod session;
pub mod store;

pub use config::{ConfigError, CoreConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::customer::CustomerRecord;
pub use model::invoice::{InvoiceForm, InvoiceRecord, InvoiceStatus, ValidInvoice};
pub use model::record::StoreRecord;
pub use model::user::{NewUser, UserRecord, UserUpdate};
pub use model::validation::{FieldErrors, ValidationError};
pub use repo::customer_repo::{CustomerRepository, SqliteCustomerRepository};
pub use repo::invoice_repo::{InvoiceRepository, SqliteInvoiceRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{ListQuery, RepoError, RepoResult};
pub use service::customer_service::CustomerService;
pub use service::invoice_service::InvoiceService;
pub use service::user_service::UserService;
pub use service::{
    ActionResult, ActionStatus, RecordService, ServiceError, ServiceResult,
    DEFAULT_ITEMS_PER_PAGE,
};
pub use session::ViewSession;
pub use store::{
    DispatchOutcome, HasStore, InitOutcome, InitState, MutationToken, OptimisticDispatcher,
    ReconcileStrategy, RecordStore, RollbackPolicy, Settlement, StoreContext, StoreInitializer,
    UpdateMode, UpdateOutcome,
};

/// Minimal health-check API for front ends.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
