//! Client-side record cache and its synchronization with the Data Service.
//!
//! # Responsibility
//! - Hold per-entity working copies (`RecordStore`).
//! - Seed them once per view mount (`StoreInitializer`).
//! - Apply mutation intents optimistically and reconcile them with
//!   persistence outcomes (`OptimisticDispatcher`).
//!
//! # Invariants
//! - Everything here runs on one thread; nothing blocks or performs I/O.
//! - Stores live in an explicit `StoreContext`, never in globals.

pub mod context;
pub mod dispatch;
pub mod id;
pub mod initializer;
pub mod record_store;

pub use context::{HasStore, StoreContext};
pub use dispatch::{DispatchOutcome, MutationToken, OptimisticDispatcher, RollbackPolicy, Settlement};
pub use id::{IdGenerator, SequenceIdGenerator, UuidIdGenerator};
pub use initializer::{InitOutcome, InitState, ReconcileStrategy, StoreInitializer};
pub use record_store::{ObserverId, RecordStore, UpdateMode, UpdateOutcome};
