//! Email store contract and SQLite implementation.

use crate::model::email::EmailEntry;
use crate::repo::{decode_column, StoreError, StoreResult};
use log::debug;
use rusqlite::{params, Connection};

const INSERT_EMAIL_SQL: &str =
    "INSERT INTO emails (id, source_name, email, created_at) VALUES (?1, ?2, ?3, ?4)";
const SELECT_EMAILS_SQL: &str = "SELECT id, source_name, email, created_at FROM emails";

/// Persistence contract used by the email flows.
pub trait EmailStore {
    /// Inserts one entry and returns the affected row count.
    fn save_email(&self, entry: &EmailEntry) -> StoreResult<usize>;
    /// Returns every stored entry in result-set order.
    fn list_emails(&self) -> StoreResult<Vec<EmailEntry>>;
}

/// SQLite-backed store for the `emails` table.
pub struct SqliteEmailStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmailStore<'conn> {
    /// Borrows a migrated connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EmailStore for SqliteEmailStore<'_> {
    fn save_email(&self, entry: &EmailEntry) -> StoreResult<usize> {
        let mut stmt = self
            .conn
            .prepare(INSERT_EMAIL_SQL)
            .map_err(StoreError::StatementPreparation)?;

        stmt.execute(params![
            entry.id,
            entry.source_name,
            entry.email,
            entry.created_at,
        ])
        .map_err(StoreError::StatementExecution)
    }

    fn list_emails(&self) -> StoreResult<Vec<EmailEntry>> {
        let mut stmt = self
            .conn
            .prepare(SELECT_EMAILS_SQL)
            .map_err(StoreError::StatementPreparation)?;
        let mut rows = stmt.query([]).map_err(StoreError::StatementExecution)?;

        let mut emails = Vec::new();
        while let Some(row) = rows.next().map_err(StoreError::StatementExecution)? {
            let entry = EmailEntry {
                id: decode_column(row, "id")?,
                source_name: decode_column(row, "source_name")?,
                email: decode_column(row, "email")?,
                created_at: decode_column(row, "created_at")?,
            };
            debug!(
                "event=email_scan module=repo id={} source={} created_at={}",
                entry.id, entry.source_name, entry.created_at
            );
            emails.push(entry);
        }

        Ok(emails)
    }
}
