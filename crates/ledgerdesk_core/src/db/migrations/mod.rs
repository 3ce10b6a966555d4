//! Ordered schema scripts for the dashboard tables.
//!
//! # Invariants
//! - Script versions start at 1 and increase by one.
//! - `PRAGMA user_version` equals the last script applied.
//! - Pending scripts commit together or not at all.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// `(version, script)` pairs in apply order.
const SCRIPTS: [(u32, &str); 2] = [
    (1, include_str!("0001_init.sql")),
    (2, include_str!("0002_lookup_indexes.sql")),
];

/// Newest schema this build can produce.
pub fn latest_version() -> u32 {
    SCRIPTS.last().map_or(0, |(version, _)| *version)
}

/// Schema version stamped on `conn`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Brings `conn` up to `latest_version()`, returning the version it started at.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<u32> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending: Vec<_> = SCRIPTS.iter().filter(|(version, _)| *version > found).collect();
    if pending.is_empty() {
        return Ok(found);
    }

    let tx = conn.transaction()?;
    for &&(version, script) in &pending {
        tx.execute_batch(script)
            .and_then(|()| tx.pragma_update(None, "user_version", version))
            .map_err(|source| DbError::Migration { version, source })?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={found} to_version={supported} scripts={}",
        pending.len()
    );
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::{apply_migrations, latest_version, schema_version, SCRIPTS};
    use rusqlite::Connection;

    #[test]
    fn script_versions_are_contiguous() {
        for (index, (version, script)) in SCRIPTS.iter().enumerate() {
            assert_eq!(*version as usize, index + 1);
            assert!(!script.trim().is_empty());
        }
    }

    #[test]
    fn second_run_applies_nothing() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(apply_migrations(&mut conn).unwrap(), 0);
        assert_eq!(apply_migrations(&mut conn).unwrap(), latest_version());
        assert_eq!(schema_version(&conn).unwrap(), latest_version());
    }
}
