//! Customer repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over `customers`.
//! - Compute per-customer invoice aggregates at read time.
//!
//! # Invariants
//! - Write paths call `CustomerRecord::validate()` before SQL mutations.
//! - Aggregates come from `invoices`; stored customers carry none.
//! - Listing order is `name ASC, id ASC`.

use crate::model::customer::CustomerRecord;
use crate::repo::{
    ensure_connection_ready, id_or_generate, non_negative, push_window, ListQuery, RepoError,
    RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const CUSTOMER_SELECT_SQL: &str = "SELECT
    c.id AS id,
    c.name AS name,
    c.email AS email,
    c.image_url AS image_url,
    COUNT(i.id) AS total_invoices,
    COALESCE(SUM(CASE WHEN i.status = 'pending' THEN i.amount ELSE 0 END), 0) AS total_pending,
    COALESCE(SUM(CASE WHEN i.status = 'paid' THEN i.amount ELSE 0 END), 0) AS total_paid
FROM customers c
LEFT JOIN invoices i ON i.customer_id = c.id";

const CUSTOMER_FILTER_SQL: &str =
    " WHERE (c.name LIKE ? ESCAPE '\\' OR c.email LIKE ? ESCAPE '\\')";

/// Repository interface for customer persistence.
pub trait CustomerRepository {
    /// Inserts a customer, generating an id when the record has none.
    fn create_customer(&self, customer: &CustomerRecord) -> RepoResult<String>;
    /// Rewrites name, email, and image of an existing customer.
    fn update_customer(&self, customer: &CustomerRecord) -> RepoResult<()>;
    /// Deletes a customer and, by cascade, its invoices.
    fn delete_customer(&self, id: &str) -> RepoResult<()>;
    fn get_customer(&self, id: &str) -> RepoResult<Option<CustomerRecord>>;
    fn list_customers(&self, query: &ListQuery) -> RepoResult<Vec<CustomerRecord>>;
    fn count_customers(&self, query: &ListQuery) -> RepoResult<u64>;
}

/// SQLite-backed customer repository.
pub struct SqliteCustomerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCustomerRepository<'conn> {
    /// Creates a repository over a connection opened with `open_db*`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CustomerRepository for SqliteCustomerRepository<'_> {
    fn create_customer(&self, customer: &CustomerRecord) -> RepoResult<String> {
        customer.validate()?;
        let id = id_or_generate(&customer.id);

        self.conn.execute(
            "INSERT INTO customers (id, name, email, image_url)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                id,
                customer.name.trim(),
                customer.email.trim(),
                customer.image_url.trim(),
            ],
        )?;

        Ok(id)
    }

    fn update_customer(&self, customer: &CustomerRecord) -> RepoResult<()> {
        customer.validate()?;

        let changed = self.conn.execute(
            "UPDATE customers
             SET name = ?1, email = ?2, image_url = ?3
             WHERE id = ?4;",
            params![
                customer.name.trim(),
                customer.email.trim(),
                customer.image_url.trim(),
                customer.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(customer.id.clone()));
        }
        Ok(())
    }

    fn delete_customer(&self, id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM customers WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn get_customer(&self, id: &str) -> RepoResult<Option<CustomerRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CUSTOMER_SELECT_SQL}
             WHERE c.id = ?1
             GROUP BY c.id;"
        ))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_customer_row(row)?));
        }
        Ok(None)
    }

    fn list_customers(&self, query: &ListQuery) -> RepoResult<Vec<CustomerRecord>> {
        let mut sql = String::from(CUSTOMER_SELECT_SQL);
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(pattern) = query.like_pattern() {
            sql.push_str(CUSTOMER_FILTER_SQL);
            bind_values.push(Value::Text(pattern.clone()));
            bind_values.push(Value::Text(pattern));
        }
        sql.push_str(" GROUP BY c.id ORDER BY c.name ASC, c.id ASC");
        push_window(&mut sql, &mut bind_values, query);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut customers = Vec::new();
        while let Some(row) = rows.next()? {
            customers.push(parse_customer_row(row)?);
        }
        Ok(customers)
    }

    fn count_customers(&self, query: &ListQuery) -> RepoResult<u64> {
        let mut sql = String::from("SELECT COUNT(*) FROM customers c");
        let mut bind_values: Vec<Value> = Vec::new();
        if let Some(pattern) = query.like_pattern() {
            sql.push_str(CUSTOMER_FILTER_SQL);
            bind_values.push(Value::Text(pattern.clone()));
            bind_values.push(Value::Text(pattern));
        }

        let count: i64 =
            self.conn
                .query_row(&sql, params_from_iter(bind_values), |row| row.get(0))?;
        non_negative(count, "COUNT(customers)")
    }
}

fn parse_customer_row(row: &Row<'_>) -> RepoResult<CustomerRecord> {
    Ok(CustomerRecord {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        image_url: row.get("image_url")?,
        total_invoices: non_negative(row.get("total_invoices")?, "total_invoices")?,
        total_pending: non_negative(row.get("total_pending")?, "total_pending")?,
        total_paid: non_negative(row.get("total_paid")?, "total_paid")?,
    })
}
