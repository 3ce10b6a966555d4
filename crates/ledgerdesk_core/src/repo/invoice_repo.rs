//! Invoice repository contracts and SQLite implementation.
//!
//! # Invariants
//! - `amount` is stored in cents and is always positive.
//! - `date` is assigned by SQLite (`date('now')`) on insert and kept on update.
//! - Listing order is `date DESC, id ASC`.

use crate::model::invoice::{InvoiceRecord, InvoiceStatus, ValidInvoice};
use crate::repo::{
    ensure_connection_ready, non_negative, push_window, ListQuery, RepoError, RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use uuid::Uuid;

const INVOICE_SELECT_SQL: &str = "SELECT
    i.id AS id,
    i.customer_id AS customer_id,
    i.amount AS amount,
    i.status AS status,
    i.date AS date
FROM invoices i
JOIN customers c ON c.id = i.customer_id";

const INVOICE_FILTER_SQL: &str = " WHERE (
    c.name LIKE ? ESCAPE '\\'
    OR c.email LIKE ? ESCAPE '\\'
    OR CAST(i.amount AS TEXT) LIKE ? ESCAPE '\\'
    OR i.date LIKE ? ESCAPE '\\'
    OR i.status LIKE ? ESCAPE '\\'
)";
const INVOICE_FILTER_BINDS: usize = 5;

/// Repository interface for invoices.
pub trait InvoiceRepository {
    fn create_invoice(&self, invoice: &ValidInvoice) -> RepoResult<InvoiceRecord>;
    fn update_invoice(&self, id: &str, invoice: &ValidInvoice) -> RepoResult<()>;
    fn delete_invoice(&self, id: &str) -> RepoResult<()>;
    fn get_invoice(&self, id: &str) -> RepoResult<Option<InvoiceRecord>>;
    fn list_invoices(&self, query: &ListQuery) -> RepoResult<Vec<InvoiceRecord>>;
    fn count_invoices(&self, query: &ListQuery) -> RepoResult<u64>;
    /// Whether an invoice may reference `customer_id`.
    fn customer_exists(&self, customer_id: &str) -> RepoResult<bool>;
}

/// SQLite-backed invoice repository.
pub struct SqliteInvoiceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteInvoiceRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl InvoiceRepository for SqliteInvoiceRepository<'_> {
    fn create_invoice(&self, invoice: &ValidInvoice) -> RepoResult<InvoiceRecord> {
        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO invoices (id, customer_id, amount, status, date)
             VALUES (?1, ?2, ?3, ?4, date('now'));",
            params![
                id,
                invoice.customer_id,
                invoice.amount_cents,
                invoice.status.as_str(),
            ],
        )?;

        self.get_invoice(&id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("created invoice `{id}` missing in read-back"))
        })
    }

    fn update_invoice(&self, id: &str, invoice: &ValidInvoice) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE invoices
             SET customer_id = ?1, amount = ?2, status = ?3
             WHERE id = ?4;",
            params![
                invoice.customer_id,
                invoice.amount_cents,
                invoice.status.as_str(),
                id,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn delete_invoice(&self, id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM invoices WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn get_invoice(&self, id: &str) -> RepoResult<Option<InvoiceRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{INVOICE_SELECT_SQL} WHERE i.id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_invoice_row(row)?));
        }
        Ok(None)
    }

    fn list_invoices(&self, query: &ListQuery) -> RepoResult<Vec<InvoiceRecord>> {
        let mut sql = String::from(INVOICE_SELECT_SQL);
        let mut bind_values = filter_binds(&mut sql, query);
        sql.push_str(" ORDER BY i.date DESC, i.id ASC");
        push_window(&mut sql, &mut bind_values, query);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut invoices = Vec::new();
        while let Some(row) = rows.next()? {
            invoices.push(parse_invoice_row(row)?);
        }
        Ok(invoices)
    }

    fn count_invoices(&self, query: &ListQuery) -> RepoResult<u64> {
        let mut sql = String::from(
            "SELECT COUNT(*)
             FROM invoices i
             JOIN customers c ON c.id = i.customer_id",
        );
        let bind_values = filter_binds(&mut sql, query);
        let count: i64 =
            self.conn
                .query_row(&sql, params_from_iter(bind_values), |row| row.get(0))?;
        non_negative(count, "COUNT(invoices)")
    }

    fn customer_exists(&self, customer_id: &str) -> RepoResult<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM customers WHERE id = ?1;",
                [customer_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

fn filter_binds(sql: &mut String, query: &ListQuery) -> Vec<Value> {
    match query.like_pattern() {
        Some(pattern) => {
            sql.push_str(INVOICE_FILTER_SQL);
            vec![Value::Text(pattern); INVOICE_FILTER_BINDS]
        }
        None => Vec::new(),
    }
}

fn parse_invoice_row(row: &Row<'_>) -> RepoResult<InvoiceRecord> {
    let status_text: String = row.get("status")?;
    let status = InvoiceStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in invoices.status"))
    })?;
    let amount: i64 = row.get("amount")?;
    non_negative(amount, "invoices.amount")?;

    Ok(InvoiceRecord {
        id: row.get("id")?,
        customer_id: row.get("customer_id")?,
        amount_cents: amount,
        status,
        date: row.get("date")?,
    })
}
