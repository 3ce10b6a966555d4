//! Optimistic mutation dispatch with correlation tokens.
//!
//! # Responsibility
//! - Apply a mutation intent to the store before it is persisted.
//! - Match each persistence outcome to its optimistic mutation and revert
//!   the mutation when persistence fails.
//!
//! # Invariants
//! - The optimistic mutation is applied before `begin_*` returns, so it
//!   always precedes the persistence call.
//! - Each token settles at most once; settlements may arrive in any order.
//! - Reverting touches only the entries the mutation produced, located by
//!   id at settle time.
//! - A failed update never overwrites a newer update of the same record:
//!   its pre-image passes to the next pending mutation of that record, and
//!   is dropped once a later update of the record is confirmed.

use crate::model::record::StoreRecord;
use crate::service::{ActionResult, RecordService};
use crate::store::record_store::{RecordStore, RemovedEntry, UpdateMode};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Bound;

/// Correlates an optimistic mutation with its persistence outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MutationToken(u64);

impl MutationToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// What happens to an optimistic mutation whose persistence failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollbackPolicy {
    /// Apply the inverse mutation.
    #[default]
    Revert,
    /// Leave the store as is (legacy non-transactional behavior).
    KeepOptimistic,
}

/// How a token was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Settlement {
    /// Persistence succeeded; the optimistic state stands.
    Confirmed,
    /// Persistence failed and the mutation was reverted.
    RolledBack,
    /// Persistence failed but the policy keeps the optimistic state.
    KeptAfterFailure,
    /// The token was never issued or was already settled.
    UnknownToken,
}

/// Result of a one-shot dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub token: MutationToken,
    /// Id of the record the intent targeted.
    pub record_id: String,
    pub result: ActionResult,
    pub settlement: Settlement,
}

#[derive(Debug)]
enum PendingMutation<R> {
    Added {
        id: String,
    },
    Removed {
        id: String,
        entries: Vec<RemovedEntry<R>>,
    },
    Replaced {
        id: String,
        previous: Vec<R>,
        /// A later update of `id` was confirmed; reverting would resurrect
        /// stale data.
        superseded: bool,
    },
    Appended {
        id: String,
    },
}

impl<R: StoreRecord> PendingMutation<R> {
    fn kind(&self) -> &'static str {
        match self {
            Self::Added { .. } => "add",
            Self::Removed { .. } => "remove",
            Self::Replaced { .. } => "update",
            Self::Appended { .. } => "update_append",
        }
    }

    /// Whether reverting this mutation would write records with `id`.
    fn rewrites(&self, target: &str) -> bool {
        match self {
            Self::Removed { id, .. } | Self::Replaced { id, .. } => id == target,
            Self::Added { .. } | Self::Appended { .. } => false,
        }
    }

    /// Adopts the pre-image of an earlier failed update of the same record.
    fn inherit(&mut self, earlier: Vec<R>) {
        match self {
            Self::Replaced { previous, .. } => *previous = earlier,
            Self::Removed { entries, .. } => {
                for (entry, version) in entries.iter_mut().zip(earlier) {
                    entry.record = version;
                }
            }
            Self::Added { .. } | Self::Appended { .. } => {}
        }
    }
}

/// Tracks in-flight optimistic mutations for one store.
#[derive(Debug)]
pub struct OptimisticDispatcher<R> {
    policy: RollbackPolicy,
    next_token: u64,
    pending: BTreeMap<MutationToken, PendingMutation<R>>,
}

impl<R: StoreRecord> Default for OptimisticDispatcher<R> {
    fn default() -> Self {
        Self::new(RollbackPolicy::default())
    }
}

impl<R: StoreRecord> OptimisticDispatcher<R> {
    pub fn new(policy: RollbackPolicy) -> Self {
        Self {
            policy,
            next_token: 0,
            pending: BTreeMap::new(),
        }
    }

    pub fn policy(&self) -> RollbackPolicy {
        self.policy
    }

    /// Tokens still waiting for `settle`, oldest first.
    pub fn pending(&self) -> Vec<MutationToken> {
        self.pending.keys().copied().collect()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Adds `record` to the store and returns it as stored (id assigned).
    pub fn begin_add(&mut self, store: &mut RecordStore<R>, record: R) -> (MutationToken, R) {
        let stored = store.append(record);
        let token = self.track(PendingMutation::Added {
            id: stored.id().to_string(),
        });
        (token, stored)
    }

    /// Removes every record with `id` from the store.
    pub fn begin_remove(&mut self, store: &mut RecordStore<R>, id: &str) -> MutationToken {
        let entries = store.take(id);
        self.track(PendingMutation::Removed {
            id: id.to_string(),
            entries,
        })
    }

    /// Applies `record` as an update, following the store's `UpdateMode`.
    pub fn begin_update(&mut self, store: &mut RecordStore<R>, record: R) -> MutationToken {
        let pending = match store.update_mode() {
            UpdateMode::Replace => PendingMutation::Replaced {
                id: record.id().to_string(),
                previous: store.replace(record),
                superseded: false,
            },
            UpdateMode::AppendCompat => {
                let id = record.id().to_string();
                store.update(record);
                PendingMutation::Appended { id }
            }
        };
        self.track(pending)
    }

    /// Records the persistence outcome for `token`.
    pub fn settle(
        &mut self,
        store: &mut RecordStore<R>,
        token: MutationToken,
        result: &ActionResult,
    ) -> Settlement {
        let Some(mutation) = self.pending.remove(&token) else {
            warn!(
                "event=dispatch_settle module=store status=error token={} error_code=unknown_token",
                token.0
            );
            return Settlement::UnknownToken;
        };

        if result.is_success() {
            if let PendingMutation::Replaced { id, .. } = &mutation {
                self.supersede_before(token, id);
            }
            debug!(
                "event=dispatch_settle module=store status=ok token={} kind={}",
                token.0,
                mutation.kind()
            );
            return Settlement::Confirmed;
        }

        match self.policy {
            RollbackPolicy::Revert => {
                info!(
                    "event=dispatch_rollback module=store status=ok token={} kind={}",
                    token.0,
                    mutation.kind()
                );
                self.revert(store, token, mutation);
                Settlement::RolledBack
            }
            RollbackPolicy::KeepOptimistic => {
                warn!(
                    "event=dispatch_rollback module=store status=skipped token={} kind={}",
                    token.0,
                    mutation.kind()
                );
                Settlement::KeptAfterFailure
            }
        }
    }

    /// Optimistically adds `record`, persists it, and settles.
    pub fn add<S>(&mut self, store: &mut RecordStore<R>, service: &S, record: R) -> DispatchOutcome
    where
        S: RecordService<Record = R>,
    {
        let (token, stored) = self.begin_add(store, record);
        let result = service.create(&stored);
        self.finish(store, token, stored.id().to_string(), result)
    }

    /// Optimistically removes `id`, persists the removal, and settles.
    pub fn remove<S>(&mut self, store: &mut RecordStore<R>, service: &S, id: &str) -> DispatchOutcome
    where
        S: RecordService<Record = R>,
    {
        let token = self.begin_remove(store, id);
        let result = service.remove(id);
        self.finish(store, token, id.to_string(), result)
    }

    /// Optimistically updates `record`, persists it, and settles.
    pub fn update<S>(&mut self, store: &mut RecordStore<R>, service: &S, record: R) -> DispatchOutcome
    where
        S: RecordService<Record = R>,
    {
        let id = record.id().to_string();
        let token = self.begin_update(store, record.clone());
        let result = service.update(&record);
        self.finish(store, token, id, result)
    }

    fn finish(
        &mut self,
        store: &mut RecordStore<R>,
        token: MutationToken,
        record_id: String,
        result: ActionResult,
    ) -> DispatchOutcome {
        let settlement = self.settle(store, token, &result);
        DispatchOutcome {
            token,
            record_id,
            result,
            settlement,
        }
    }

    fn revert(
        &mut self,
        store: &mut RecordStore<R>,
        token: MutationToken,
        mutation: PendingMutation<R>,
    ) {
        match mutation {
            PendingMutation::Added { id } | PendingMutation::Appended { id } => {
                store.remove_last(&id);
            }
            PendingMutation::Removed { entries, .. } => store.restore(entries),
            PendingMutation::Replaced {
                superseded: true,
                id,
                ..
            } => {
                debug!(
                    "event=dispatch_rollback module=store status=skipped token={} id={id} reason=superseded",
                    token.0
                );
            }
            PendingMutation::Replaced { id, previous, .. } => {
                match self.next_pending_for(token, &id) {
                    Some(later) => later.inherit(previous),
                    None => {
                        store.reinstate(&id, previous);
                    }
                }
            }
        }
    }

    /// Oldest pending mutation issued after `token` whose revert would write
    /// records with `id`.
    fn next_pending_for(
        &mut self,
        token: MutationToken,
        id: &str,
    ) -> Option<&mut PendingMutation<R>> {
        self.pending
            .range_mut((Bound::Excluded(token), Bound::Unbounded))
            .map(|(_, mutation)| mutation)
            .find(|mutation| mutation.rewrites(id))
    }

    /// Marks pending updates of `id` issued before `token` as superseded.
    fn supersede_before(&mut self, token: MutationToken, id: &str) {
        for mutation in self.pending.range_mut(..token).map(|(_, mutation)| mutation) {
            if let PendingMutation::Replaced {
                id: target,
                superseded,
                ..
            } = mutation
            {
                if target.as_str() == id {
                    *superseded = true;
                }
            }
        }
    }

    fn track(&mut self, mutation: PendingMutation<R>) -> MutationToken {
        let token = MutationToken(self.next_token);
        self.next_token += 1;
        debug!(
            "event=dispatch_begin module=store status=ok token={} kind={}",
            token.0,
            mutation.kind()
        );
        self.pending.insert(token, mutation);
        token
    }
}
