//! In-memory working copy of one entity list.
//!
//! # Responsibility
//! - Hold the records a view renders, in insertion order.
//! - Apply add/remove/update/seed synchronously and notify observers.
//!
//! # Invariants
//! - Operations are total: no I/O, no error channel.
//! - Ids generated by `add` are never already present; caller-supplied ids
//!   are stored as given.
//! - Reverting helpers locate records by id, never by a saved index.
//! - Observers run once per state change, after the change is applied.
//! - The store is single-threaded; observers are not `Send`.

use crate::model::record::StoreRecord;
use crate::store::id::{IdGenerator, UuidIdGenerator};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

const MAX_FRESH_ID_ATTEMPTS: usize = 16;

/// How `update` treats its argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    /// Replace records with the same id; unknown ids are ignored.
    #[default]
    Replace,
    /// Legacy dashboard behavior: append the record even when its id exists,
    /// leaving two entries with one id.
    AppendCompat,
}

/// What `update` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// This many entries were replaced in place.
    Replaced(usize),
    /// The record was appended (compat mode).
    Appended,
    /// No entry had the id; nothing changed.
    Missing,
}

/// A record taken out by `take`, with the ids before it, nearest first.
#[derive(Debug, Clone)]
pub(crate) struct RemovedEntry<R> {
    pub(crate) record: R,
    predecessors: Vec<String>,
}

/// Handle returned by `subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer<R> = Box<dyn FnMut(&[R])>;

/// Ordered cache of records with a mutation surface.
pub struct RecordStore<R: StoreRecord> {
    records: Vec<R>,
    update_mode: UpdateMode,
    ids: Box<dyn IdGenerator>,
    observers: Vec<(ObserverId, Observer<R>)>,
    next_observer: u64,
}

impl<R: StoreRecord> Default for RecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: StoreRecord + Debug> Debug for RecordStore<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("records", &self.records)
            .field("update_mode", &self.update_mode)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<R: StoreRecord> RecordStore<R> {
    pub fn new() -> Self {
        Self::with_mode(UpdateMode::default())
    }

    pub fn with_mode(update_mode: UpdateMode) -> Self {
        Self {
            records: Vec::new(),
            update_mode,
            ids: Box::new(UuidIdGenerator),
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    /// Swaps the id source used by `add`.
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn update_mode(&self) -> UpdateMode {
        self.update_mode
    }

    /// Current cached state.
    pub fn all(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record with `id`.
    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Replaces the whole cached sequence. Records are trusted as given.
    pub fn seed(&mut self, records: impl IntoIterator<Item = R>) {
        self.records = records.into_iter().collect();
        self.notify();
    }

    /// Appends `record`, assigning a fresh id when it has none. Returns the
    /// id the record was stored under.
    pub fn add(&mut self, record: R) -> String {
        self.append(record).id().to_string()
    }

    /// Removes every record with `id` and returns how many were removed.
    /// Unknown ids are a no-op.
    pub fn remove(&mut self, id: &str) -> usize {
        self.take(id).len()
    }

    /// Applies `record` according to the store's `UpdateMode`.
    pub fn update(&mut self, record: R) -> UpdateOutcome {
        match self.update_mode {
            UpdateMode::Replace => match self.replace(record).len() {
                0 => UpdateOutcome::Missing,
                replaced => UpdateOutcome::Replaced(replaced),
            },
            UpdateMode::AppendCompat => {
                self.records.push(record);
                self.notify();
                UpdateOutcome::Appended
            }
        }
    }

    /// Registers a callback run with the new state after every change.
    pub fn subscribe(&mut self, observer: impl FnMut(&[R]) + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Drops a callback. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(current, _)| *current != id);
        self.observers.len() != before
    }

    /// `add` that hands back a copy of the stored record.
    pub(crate) fn append(&mut self, mut record: R) -> R {
        if !record.has_id() {
            let id = self.fresh_id();
            record.set_id(id);
        }
        self.records.push(record.clone());
        self.notify();
        record
    }

    /// Removes every record with `id`, returning each with the ids that
    /// preceded it.
    pub(crate) fn take(&mut self, id: &str) -> Vec<RemovedEntry<R>> {
        if !self.contains(id) {
            return Vec::new();
        }

        let mut removed = Vec::new();
        let mut kept: Vec<R> = Vec::with_capacity(self.records.len());
        for record in self.records.drain(..) {
            if record.id() == id {
                let predecessors = kept.iter().rev().map(|r| r.id().to_string()).collect();
                removed.push(RemovedEntry {
                    record,
                    predecessors,
                });
            } else {
                kept.push(record);
            }
        }
        self.records = kept;
        self.notify();
        removed
    }

    /// Reinserts entries produced by `take`, each right after its nearest
    /// predecessor that is still present, or at the front when none is.
    pub(crate) fn restore(&mut self, entries: Vec<RemovedEntry<R>>) {
        if entries.is_empty() {
            return;
        }
        // Reverse order keeps entries that share an anchor in their old order.
        for entry in entries.into_iter().rev() {
            let at = entry
                .predecessors
                .iter()
                .find_map(|id| self.records.iter().rposition(|record| record.id() == id))
                .map_or(0, |index| index + 1);
            self.records.insert(at, entry.record);
        }
        self.notify();
    }

    /// Replaces records with the same id in place, returning the old
    /// versions in store order.
    pub(crate) fn replace(&mut self, record: R) -> Vec<R> {
        let mut previous = Vec::new();
        for current in self.records.iter_mut() {
            if current.id() == record.id() {
                previous.push(std::mem::replace(current, record.clone()));
            }
        }
        if !previous.is_empty() {
            self.notify();
        }
        previous
    }

    /// Writes `versions` over the records that currently carry `id`, in store
    /// order. Returns `false` when no such record is left.
    pub(crate) fn reinstate(&mut self, id: &str, versions: Vec<R>) -> bool {
        let mut versions = versions.into_iter();
        let mut changed = false;
        for slot in self.records.iter_mut().filter(|record| record.id() == id) {
            let Some(version) = versions.next() else {
                break;
            };
            *slot = version;
            changed = true;
        }
        if changed {
            self.notify();
        }
        changed
    }

    /// Removes the last record with `id`.
    pub(crate) fn remove_last(&mut self, id: &str) -> Option<R> {
        let index = self.records.iter().rposition(|record| record.id() == id)?;
        let removed = self.records.remove(index);
        self.notify();
        Some(removed)
    }

    fn fresh_id(&mut self) -> String {
        let mut candidate = String::new();
        for _ in 0..MAX_FRESH_ID_ATTEMPTS {
            candidate = self.ids.next_id();
            if !candidate.is_empty() && !self.contains(&candidate) {
                return candidate;
            }
        }

        // The generator keeps colliding; derive a unique id from its last answer.
        let base = if candidate.is_empty() {
            UuidIdGenerator.next_id()
        } else {
            candidate
        };
        let mut suffix = 1usize;
        loop {
            let derived = format!("{base}-{suffix}");
            if !self.contains(&derived) {
                return derived;
            }
            suffix += 1;
        }
    }

    fn notify(&mut self) {
        for (_, observer) in &mut self.observers {
            observer(&self.records);
        }
    }
}
