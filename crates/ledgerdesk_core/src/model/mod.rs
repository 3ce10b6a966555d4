//! Dashboard domain model.
//!
//! # Responsibility
//! - Define the records cached by the client store and persisted by the
//!   Data Service (customers, users, invoices).
//! - Define raw form drafts and their field-level validation.
//!
//! # Invariants
//! - Every record is identified by an opaque string id, unique per store.
//! - Money amounts are integer cents.

pub mod customer;
pub mod invoice;
pub mod record;
pub mod user;
pub mod validation;
