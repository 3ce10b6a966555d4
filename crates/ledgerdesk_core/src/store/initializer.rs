//! One-shot seeding of a record store from a server snapshot.
//!
//! # Responsibility
//! - Reconcile the first snapshot a view receives into the shared store.
//! - Ignore later snapshots for the rest of that view's lifetime.
//!
//! # Invariants
//! - `Uninitialized -> Seeded` happens on the first render only.
//! - After the transition, renders never touch the store.

use crate::model::record::StoreRecord;
use crate::store::record_store::RecordStore;
use log::debug;
use serde::{Deserialize, Serialize};

/// Lifecycle of one initializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    Uninitialized,
    Seeded,
}

/// How the first snapshot is compared with the store's contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileStrategy {
    /// Seed when ids or contents differ from the snapshot.
    #[default]
    KeyDiff,
    /// Seed only when the record counts differ. Two edits with the same net
    /// count are indistinguishable under this strategy.
    LengthHeuristic,
}

/// Result of one `on_render` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// The store was overwritten with the snapshot.
    Seeded,
    /// First render, but the store already matched the snapshot.
    InSync,
    /// Not the first render; nothing was compared.
    Skipped,
}

/// Per-mount guard that seeds a store at most once.
#[derive(Debug, Clone)]
pub struct StoreInitializer {
    state: InitState,
    strategy: ReconcileStrategy,
}

impl Default for StoreInitializer {
    fn default() -> Self {
        Self::new(ReconcileStrategy::default())
    }
}

impl StoreInitializer {
    pub fn new(strategy: ReconcileStrategy) -> Self {
        Self {
            state: InitState::Uninitialized,
            strategy,
        }
    }

    pub fn state(&self) -> InitState {
        self.state
    }

    pub fn strategy(&self) -> ReconcileStrategy {
        self.strategy
    }

    /// Runs the seeding step for one render of the owning view.
    pub fn on_render<R>(&mut self, store: &mut RecordStore<R>, snapshot: &[R]) -> InitOutcome
    where
        R: StoreRecord + PartialEq,
    {
        if self.state == InitState::Seeded {
            return InitOutcome::Skipped;
        }
        self.state = InitState::Seeded;

        let differs = match self.strategy {
            ReconcileStrategy::LengthHeuristic => snapshot.len() != store.len(),
            ReconcileStrategy::KeyDiff => !same_records(store.all(), snapshot),
        };
        if !differs {
            debug!(
                "event=store_seed module=store status=ok outcome=in_sync records={}",
                store.len()
            );
            return InitOutcome::InSync;
        }

        store.seed(snapshot.iter().cloned());
        debug!(
            "event=store_seed module=store status=ok outcome=seeded records={}",
            snapshot.len()
        );
        InitOutcome::Seeded
    }
}

/// Same ids in the same order, with equal content.
fn same_records<R: StoreRecord + PartialEq>(current: &[R], snapshot: &[R]) -> bool {
    current.len() == snapshot.len()
        && current
            .iter()
            .zip(snapshot)
            .all(|(left, right)| left.id() == right.id() && left == right)
}
