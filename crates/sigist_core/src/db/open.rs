//! Opens the service database and prepares it for the stores.
//!
//! # Invariants
//! - A returned connection is fully migrated.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (creating when missing) the database file at `path`.
///
/// Emits one `db_open` event carrying the outcome and duration.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    open_with(&path.display().to_string(), || Connection::open(path))
}

/// Opens a private in-memory database; used by tests and throwaway runs.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with(":memory:", Connection::open_in_memory)
}

fn open_with(
    target: &str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();

    let opened: DbResult<Connection> = connect().map_err(DbError::from).and_then(|mut conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        apply_migrations(&mut conn)?;
        Ok(conn)
    });

    let duration_ms = started_at.elapsed().as_millis();
    match &opened {
        Ok(_) => info!(
            "event=db_open module=db status=ok target={target} duration_ms={duration_ms}"
        ),
        Err(err) => error!(
            "event=db_open module=db status=error target={target} duration_ms={duration_ms} error={err}"
        ),
    }
    opened
}
