//! Record store contract and SQLite implementation.
//!
//! # Responsibility
//! - Insert one record per call with all fields bound in column order.
//! - Run a resolved select and materialize rows in result-set order.
//!
//! # Invariants
//! - The store never generates ids or timestamps for token tables; callers do.
//! - A single undecodable row aborts the whole read.

use crate::model::record::{Record, RecordId, RecordInput};
use crate::repo::query::{IdKind, ResolvedQuery, TableSchema};
use crate::repo::{decode_column, StoreError, StoreResult};
use log::debug;
use rusqlite::{params, Connection, Row, Rows};

/// Values bound by one insert.
#[derive(Debug, Clone, Copy)]
pub struct NewRow<'a> {
    /// Token id; `None` lets serial tables assign one.
    pub id: Option<&'a str>,
    pub input: &'a RecordInput,
    pub created_at: &'a str,
}

/// Outcome of one insert statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inserted {
    /// Rows the database reports as written. Zero means a silent no-op.
    pub rows_affected: usize,
    /// Rowid of the last successful insert on the connection.
    pub row_id: i64,
}

/// Persistence contract used by the record flows.
pub trait RecordStore {
    fn schema(&self) -> &TableSchema;
    fn insert(&self, row: &NewRow<'_>) -> StoreResult<Inserted>;
    fn select_all(&self, query: &ResolvedQuery<'_>) -> StoreResult<Vec<Record>>;
}

/// SQLite-backed record store for one table variant.
pub struct SqliteRecordStore<'conn> {
    conn: &'conn Connection,
    schema: TableSchema,
}

impl<'conn> SqliteRecordStore<'conn> {
    /// Binds a migrated connection to one table variant.
    pub fn new(conn: &'conn Connection, schema: TableSchema) -> Self {
        Self { conn, schema }
    }
}

impl RecordStore for SqliteRecordStore<'_> {
    fn schema(&self) -> &TableSchema {
        &self.schema
    }

    fn insert(&self, row: &NewRow<'_>) -> StoreResult<Inserted> {
        let mut stmt = self
            .conn
            .prepare(self.schema.insert_sql)
            .map_err(StoreError::StatementPreparation)?;

        let input = row.input;
        let executed = if self.schema.has_feedback {
            stmt.execute(params![
                row.id,
                input.first_name,
                input.last_name,
                input.email,
                input.job_title,
                input.feedback,
                row.created_at,
            ])
        } else {
            stmt.execute(params![
                row.id,
                input.first_name,
                input.last_name,
                input.email,
                input.job_title,
                row.created_at,
            ])
        };
        let rows_affected = executed.map_err(StoreError::StatementExecution)?;

        Ok(Inserted {
            rows_affected,
            row_id: self.conn.last_insert_rowid(),
        })
    }

    fn select_all(&self, query: &ResolvedQuery<'_>) -> StoreResult<Vec<Record>> {
        let mut stmt = self
            .conn
            .prepare(query.sql)
            .map_err(StoreError::StatementPreparation)?;

        let mut rows = match query.argument {
            Some(argument) => stmt.query([argument]),
            None => stmt.query([]),
        }
        .map_err(StoreError::StatementExecution)?;

        scan(&self.schema, &mut rows)
    }
}

/// Materializes every remaining row into a [`Record`].
///
/// Stepping failures are execution errors; column conversion failures are
/// reported as [`StoreError::RowDecode`] naming the column.
pub fn scan(schema: &TableSchema, rows: &mut Rows<'_>) -> StoreResult<Vec<Record>> {
    let mut records = Vec::new();
    while let Some(row) = rows.next().map_err(StoreError::StatementExecution)? {
        records.push(decode_record(schema, row)?);
    }

    debug!(
        "event=record_scan module=repo status=ok table={} rows={}",
        schema.table,
        records.len()
    );
    Ok(records)
}

fn decode_record(schema: &TableSchema, row: &Row<'_>) -> StoreResult<Record> {
    let id = match schema.id_kind {
        IdKind::Token => RecordId::Token(decode_column(row, "id")?),
        IdKind::Serial => RecordId::Serial(decode_column(row, "id")?),
    };
    let feedback = if schema.has_feedback {
        decode_column(row, "feedback")?
    } else {
        None
    };

    Ok(Record {
        id,
        first_name: decode_column(row, "first_name")?,
        last_name: decode_column(row, "last_name")?,
        email: decode_column(row, "email")?,
        job_title: decode_column(row, "job_title")?,
        feedback,
        created_at: decode_column(row, "created_at")?,
    })
}
