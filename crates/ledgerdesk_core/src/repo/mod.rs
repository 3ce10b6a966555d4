//! Repository layer: SQL access for customers, users, and invoices.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per entity.
//! - Keep SQL text and row decoding inside the persistence boundary.
//!
//! # Invariants
//! - Repositories only accept connections migrated to the latest version.
//! - Missing rows on update/delete surface as `RepoError::NotFound`.

use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use crate::model::validation::ValidationError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod customer_repo;
pub mod invoice_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error shared by every repository.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound(String),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::UninitializedConnection { .. } => {
                None
            }
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Filter and window options for list queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Case-insensitive substring filter. Blank filters match everything.
    pub filter: Option<String>,
    pub limit: Option<u32>,
    pub offset: u32,
}

impl ListQuery {
    /// Query for one 1-based page. Page 0 is treated as page 1.
    pub fn page(filter: &str, page: u32, per_page: u32) -> Self {
        let page = page.max(1);
        Self {
            filter: Some(filter.to_string()),
            limit: Some(per_page),
            offset: (page - 1).saturating_mul(per_page),
        }
    }

    /// Query for every row matching `filter`.
    pub fn matching(filter: &str) -> Self {
        Self {
            filter: Some(filter.to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn like_pattern(&self) -> Option<String> {
        self.filter
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(like_pattern)
    }
}

/// Builds a `LIKE` pattern matching `value` anywhere, with `\` as escape.
pub(crate) fn like_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('%');
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Appends `LIMIT`/`OFFSET` clauses and their bind values.
pub(crate) fn push_window(
    sql: &mut String,
    bind_values: &mut Vec<rusqlite::types::Value>,
    query: &ListQuery,
) {
    use rusqlite::types::Value;

    if let Some(limit) = query.limit {
        sql.push_str(" LIMIT ?");
        bind_values.push(Value::Integer(i64::from(limit)));
        if query.offset > 0 {
            sql.push_str(" OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }
    } else if query.offset > 0 {
        sql.push_str(" LIMIT -1 OFFSET ?");
        bind_values.push(Value::Integer(i64::from(query.offset)));
    }
}

/// Rejects connections that have not been migrated by `open_db*`.
pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}

/// Returns the caller's id, or a fresh UUID when it is blank.
pub(crate) fn id_or_generate(id: &str) -> String {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        uuid::Uuid::new_v4().to_string()
    } else {
        trimmed.to_string()
    }
}

pub(crate) fn non_negative(value: i64, column: &str) -> RepoResult<u64> {
    u64::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("negative value `{value}` in {column}")))
}

#[cfg(test)]
mod tests {
    use super::{like_pattern, ListQuery};

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn page_zero_is_first_page() {
        let first = ListQuery::page("", 0, 6);
        assert_eq!(first.offset, 0);
        assert_eq!(first.limit, Some(6));
        assert_eq!(ListQuery::page("", 3, 6).offset, 12);
    }

    #[test]
    fn blank_filter_has_no_pattern() {
        assert_eq!(ListQuery::matching("  ").like_pattern(), None);
        assert_eq!(
            ListQuery::matching("ada").like_pattern().as_deref(),
            Some("%ada%")
        );
    }
}
