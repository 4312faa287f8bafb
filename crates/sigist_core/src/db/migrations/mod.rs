//! Compiled-in schema scripts and the runner that applies them.
//!
//! Versions are mirrored to `PRAGMA user_version` and must stay monotonic.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::{Connection, Transaction};

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "user_feedback",
        sql: include_str!("0001_user_feedback.sql"),
    },
    Migration {
        version: 2,
        name: "users",
        sql: include_str!("0002_users.sql"),
    },
    Migration {
        version: 3,
        name: "emails",
        sql: include_str!("0003_emails.sql"),
    },
];

/// Schema version written by the newest script in this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings the database up to [`latest_version`].
///
/// Pending scripts share one transaction, so a failing script leaves
/// the database at its previous version.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let latest = latest_version();

    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }
    if from == latest {
        debug!("event=db_migrate module=db status=skipped version={from}");
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > from) {
        run(&tx, migration).map_err(|source| DbError::Migration {
            version: migration.version,
            source,
        })?;
        debug!(
            "event=db_migrate module=db status=applied version={} name={}",
            migration.version, migration.name
        );
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from={from} to={latest}");
    Ok(())
}

fn run(tx: &Transaction<'_>, migration: &Migration) -> rusqlite::Result<()> {
    tx.execute_batch(migration.sql)?;
    tx.pragma_update(None, "user_version", migration.version)
}
