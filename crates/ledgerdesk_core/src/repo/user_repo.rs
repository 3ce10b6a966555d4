//! User repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Only password hashes are stored; reads never return them.
//! - `email` is unique across users (enforced by schema).

use crate::model::user::UserRecord;
use crate::repo::{
    ensure_connection_ready, id_or_generate, non_negative, push_window, ListQuery, RepoError,
    RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const USER_FILTER_SQL: &str = " WHERE (name LIKE ? ESCAPE '\\' OR email LIKE ? ESCAPE '\\')";

/// Repository interface for dashboard users.
pub trait UserRepository {
    /// Inserts a user with an already hashed password. Returns the id.
    fn create_user(&self, user: &UserRecord, password_hash: &str) -> RepoResult<String>;
    fn update_user(&self, user: &UserRecord) -> RepoResult<()>;
    fn delete_user(&self, id: &str) -> RepoResult<()>;
    fn get_user(&self, id: &str) -> RepoResult<Option<UserRecord>>;
    fn list_users(&self, query: &ListQuery) -> RepoResult<Vec<UserRecord>>;
    fn count_users(&self, query: &ListQuery) -> RepoResult<u64>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &UserRecord, password_hash: &str) -> RepoResult<String> {
        let id = id_or_generate(&user.id);
        self.conn.execute(
            "INSERT INTO users (id, name, email, password)
             VALUES (?1, ?2, ?3, ?4);",
            params![id, user.name.trim(), user.email.trim(), password_hash],
        )?;
        Ok(id)
    }

    fn update_user(&self, user: &UserRecord) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE users SET name = ?1, email = ?2 WHERE id = ?3;",
            params![user.name.trim(), user.email.trim(), user.id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(user.id.clone()));
        }
        Ok(())
    }

    fn delete_user(&self, id: &str) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM users WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn get_user(&self, id: &str) -> RepoResult<Option<UserRecord>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, name, email FROM users WHERE id = ?1;",
                [id],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }

    fn list_users(&self, query: &ListQuery) -> RepoResult<Vec<UserRecord>> {
        let mut sql = String::from("SELECT id, name, email FROM users");
        let mut bind_values: Vec<Value> = Vec::new();
        if let Some(pattern) = query.like_pattern() {
            sql.push_str(USER_FILTER_SQL);
            bind_values.push(Value::Text(pattern.clone()));
            bind_values.push(Value::Text(pattern));
        }
        sql.push_str(" ORDER BY name ASC, id ASC");
        push_window(&mut sql, &mut bind_values, query);

        let mut stmt = self.conn.prepare(&sql)?;
        let users = stmt
            .query_map(params_from_iter(bind_values), parse_user_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    fn count_users(&self, query: &ListQuery) -> RepoResult<u64> {
        let mut sql = String::from("SELECT COUNT(*) FROM users");
        let mut bind_values: Vec<Value> = Vec::new();
        if let Some(pattern) = query.like_pattern() {
            sql.push_str(USER_FILTER_SQL);
            bind_values.push(Value::Text(pattern.clone()));
            bind_values.push(Value::Text(pattern));
        }
        let count: i64 =
            self.conn
                .query_row(&sql, params_from_iter(bind_values), |row| row.get(0))?;
        non_negative(count, "COUNT(users)")
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
    })
}
