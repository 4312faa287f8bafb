//! Save-and-notify and read flows for user records.
//!
//! # Invariants
//! - No event is published unless the insert wrote a row.
//! - A publish failure never hides the write: the persisted record travels
//!   with the error.
//! - The returned record is built from the input plus generated fields, not
//!   re-read from the database.

use crate::model::filter::Filter;
use crate::model::record::{Record, RecordId, RecordInput};
use crate::publish::{Notifier, PublishError, RecordEvent};
use crate::repo::query::{resolve, IdKind};
use crate::repo::record_repo::{NewRow, RecordStore};
use crate::repo::{StoreError, StoreResult};
use crate::service::created_at_now;
use log::{error, info, warn};
use std::time::Instant;

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// Nothing was written; no notification was attempted.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The insert succeeded but the database reported zero affected rows.
    #[error("insert into `{table}` wrote no rows")]
    NotPersisted { table: &'static str },
    /// The record is persisted but its event could not be published.
    #[error("record {} was saved but notification failed: {source}", .record.id)]
    Publish {
        record: Box<Record>,
        #[source]
        source: PublishError,
    },
}

impl SaveError {
    /// Returns the record that was written despite this error, if any.
    pub fn persisted_record(&self) -> Option<&Record> {
        match self {
            Self::Publish { record, .. } => Some(&**record),
            Self::Store(_) | Self::NotPersisted { .. } => None,
        }
    }
}

/// Record use cases bound to one store and one notification topic.
pub struct RecordService<S: RecordStore> {
    store: S,
    notifier: Notifier,
}

impl<S: RecordStore> RecordService<S> {
    pub fn new(store: S, notifier: Notifier) -> Self {
        Self { store, notifier }
    }

    /// Persists a new record, then publishes one `record_created` event.
    ///
    /// # Errors
    /// - [`SaveError::Store`] when the insert cannot be prepared or executed.
    /// - [`SaveError::NotPersisted`] when the insert affected no rows.
    /// - [`SaveError::Publish`] when the record was written but publishing
    ///   failed; the record is attached.
    pub fn save_record(&self, input: &RecordInput) -> Result<Record, SaveError> {
        let started_at = Instant::now();
        let schema = *self.store.schema();

        let token = match schema.id_kind {
            IdKind::Token => Some(RecordId::new_token().to_string()),
            IdKind::Serial => None,
        };
        let created_at = created_at_now();

        let inserted = self
            .store
            .insert(&NewRow {
                id: token.as_deref(),
                input,
                created_at: &created_at,
            })
            .map_err(|err| {
                error!(
                    "event=record_save module=service status=error table={} duration_ms={} error={}",
                    schema.table,
                    started_at.elapsed().as_millis(),
                    err
                );
                err
            })?;

        if inserted.rows_affected == 0 {
            warn!(
                "event=record_save module=service status=noop table={}",
                schema.table
            );
            return Err(SaveError::NotPersisted {
                table: schema.table,
            });
        }

        let id = match token {
            Some(token) => RecordId::Token(token),
            None => RecordId::Serial(inserted.row_id),
        };
        let mut record = Record::from_input(id, input, created_at);
        if !schema.has_feedback {
            record.feedback = None;
        }

        match self
            .notifier
            .notify(&RecordEvent::created(schema.table, &record))
        {
            Ok(()) => {
                info!(
                    "event=record_save module=service status=ok table={} id={} topic={} duration_ms={}",
                    schema.table,
                    record.id,
                    self.notifier.topic(),
                    started_at.elapsed().as_millis()
                );
                Ok(record)
            }
            Err(source) => {
                warn!(
                    "event=record_save module=service status=notify_failed table={} id={} topic={} error={}",
                    schema.table,
                    record.id,
                    self.notifier.topic(),
                    source
                );
                Err(SaveError::Publish {
                    record: Box::new(record),
                    source,
                })
            }
        }
    }

    /// Returns records matching `filter` in result-set order.
    ///
    /// The result is empty, not an error, when nothing matches. Store errors
    /// are returned unchanged.
    pub fn list_records(&self, filter: &Filter) -> StoreResult<Vec<Record>> {
        let query = resolve(self.store.schema(), filter);
        self.store.select_all(&query)
    }
}
