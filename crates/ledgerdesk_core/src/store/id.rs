//! Client-side id generation for records added before the server sees them.

use uuid::Uuid;

/// Source of candidate record ids.
///
/// Candidates may collide; `RecordStore` retries until it gets an id that
/// is not already present.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random UUIDv4 ids. Their text form is also a valid server-side key.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Replays a fixed list of ids, then falls back to UUIDs. Useful when a
/// caller needs predictable ids.
#[derive(Debug, Default, Clone)]
pub struct SequenceIdGenerator {
    queued: std::collections::VecDeque<String>,
}

impl SequenceIdGenerator {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queued: ids.into_iter().map(Into::into).collect(),
        }
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn next_id(&mut self) -> String {
        self.queued
            .pop_front()
            .unwrap_or_else(|| UuidIdGenerator.next_id())
    }
}
