//! Repository layer: canonical SQL, filter resolution and SQLite stores.
//!
//! # Responsibility
//! - Own every SQL statement the services execute.
//! - Report failures by step: preparation, execution or row decoding.
//!
//! # Invariants
//! - Each insert or select is one independently committed statement.
//! - Row cursors are released on every exit path, including decode errors.

pub mod email_repo;
pub mod query;
pub mod record_repo;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store failure, classified by the statement step that failed.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The statement could not be compiled (bad SQL, missing table, closed connection).
    #[error("failed to prepare statement: {0}")]
    StatementPreparation(#[source] rusqlite::Error),
    /// The bound statement failed while running (constraint violation, I/O).
    #[error("failed to execute statement: {0}")]
    StatementExecution(#[source] rusqlite::Error),
    /// A result column could not be converted to its target type.
    #[error("failed to decode column `{column}`: {source}")]
    RowDecode {
        column: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

impl StoreError {
    /// Column name for decode failures.
    pub fn column(&self) -> Option<&'static str> {
        match self {
            Self::RowDecode { column, .. } => Some(*column),
            Self::StatementPreparation(_) | Self::StatementExecution(_) => None,
        }
    }
}

pub(crate) fn decode_column<T: rusqlite::types::FromSql>(
    row: &rusqlite::Row<'_>,
    column: &'static str,
) -> StoreResult<T> {
    row.get(column)
        .map_err(|source| StoreError::RowDecode { column, source })
}
