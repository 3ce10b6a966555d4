//! Dashboard database bootstrap.
//!
//! # Responsibility
//! - Hand out SQLite connections that carry the current dashboard schema.
//!
//! # Invariants
//! - A connection returned by `open_db*` is migrated to `latest_version()`
//!   and enforces foreign keys.
//! - Every failure names the bootstrap stage it came from.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or preparing the dashboard database.
#[derive(Debug)]
pub enum DbError {
    /// SQLite could not open or create the target.
    Open {
        target: String,
        source: rusqlite::Error,
    },
    /// Connection settings or schema inspection failed.
    Sqlite(rusqlite::Error),
    /// A migration script failed. The whole batch was rolled back.
    Migration { version: u32, source: rusqlite::Error },
    /// The file was written by a newer LedgerDesk schema.
    SchemaTooNew { found: u32, supported: u32 },
}

impl DbError {
    /// SQLite error underneath, when there is one.
    pub fn sqlite(&self) -> Option<&rusqlite::Error> {
        match self {
            Self::Open { source, .. } | Self::Migration { source, .. } => Some(source),
            Self::Sqlite(source) => Some(source),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { target, source } => write!(f, "cannot open database {target}: {source}"),
            Self::Sqlite(source) => write!(f, "database error: {source}"),
            Self::Migration { version, source } => {
                write!(f, "schema migration {version} failed: {source}")
            }
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "database schema {found} is newer than this build supports ({supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.sqlite().map(|err| err as &(dyn Error + 'static))
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
