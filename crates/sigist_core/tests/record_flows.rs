use rusqlite::Connection;
use sigist_core::db::open_db_in_memory;
use sigist_core::{
    ChannelPublisher, EventPublisher, Filter, Inserted, NewRow, Notifier, PublishError, Record,
    RecordId, RecordInput, RecordService, RecordStore, ResolvedQuery, SaveError,
    SqliteRecordStore, StoreError, StoreResult, TableSchema, USERS, USER_FEEDBACK,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct FailingPublisher;

impl EventPublisher for FailingPublisher {
    fn publish(&self, topic: &str, _message: &[u8]) -> Result<(), PublishError> {
        Err(PublishError::Closed {
            topic: topic.to_string(),
        })
    }
}

#[derive(Default)]
struct CountingPublisher {
    calls: AtomicUsize,
}

impl EventPublisher for CountingPublisher {
    fn publish(&self, _topic: &str, _message: &[u8]) -> Result<(), PublishError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Store whose inserts succeed without writing anything.
struct NoopStore;

impl RecordStore for NoopStore {
    fn schema(&self) -> &TableSchema {
        &USER_FEEDBACK
    }

    fn insert(&self, _row: &NewRow<'_>) -> StoreResult<Inserted> {
        Ok(Inserted {
            rows_affected: 0,
            row_id: 0,
        })
    }

    fn select_all(&self, _query: &ResolvedQuery<'_>) -> StoreResult<Vec<Record>> {
        Ok(Vec::new())
    }
}

fn feedback_input() -> RecordInput {
    RecordInput::new("John", "Doe", "john@doe.com").with_feedback("great")
}

fn service<'conn>(
    conn: &'conn Connection,
    schema: TableSchema,
    publisher: Arc<dyn EventPublisher>,
) -> RecordService<SqliteRecordStore<'conn>> {
    RecordService::new(
        SqliteRecordStore::new(conn, schema),
        Notifier::new(publisher, "data-pipe"),
    )
}

#[test]
fn save_publishes_one_event_and_returns_generated_fields() {
    let conn = open_db_in_memory().unwrap();
    let (publisher, receiver) = ChannelPublisher::new();
    let service = service(&conn, USER_FEEDBACK, Arc::new(publisher));

    let record = service
        .save_record(&feedback_input().with_job_title("Software Engineer"))
        .unwrap();

    match &record.id {
        RecordId::Token(token) => assert!(uuid::Uuid::parse_str(token).is_ok()),
        other => panic!("expected token id, got {other:?}"),
    }
    assert!(chrono::DateTime::parse_from_rfc3339(&record.created_at).is_ok());
    assert_eq!(record.job_title.as_deref(), Some("Software Engineer"));

    let event = receiver.try_recv().unwrap();
    assert_eq!(event.topic, "data-pipe");
    let payload: serde_json::Value = serde_json::from_slice(&event.payload).unwrap();
    assert_eq!(payload["table"], "user_feedback");
    assert_eq!(payload["record"]["id"], record.id.to_string());
    assert!(receiver.try_recv().is_err());
}

#[test]
fn publish_failure_keeps_the_persisted_record() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn, USER_FEEDBACK, Arc::new(FailingPublisher));

    let err = service.save_record(&feedback_input()).unwrap_err();
    assert!(matches!(err, SaveError::Publish { .. }));
    let record = err.persisted_record().expect("record should be attached");
    assert_eq!(record.feedback.as_deref(), Some("great"));

    let stored = service
        .list_records(&Filter::ById(record.id.to_string()))
        .unwrap();
    assert_eq!(stored, vec![record.clone()]);
}

#[test]
fn store_failure_skips_notification() {
    let conn = Connection::open_in_memory().unwrap();
    let publisher = Arc::new(CountingPublisher::default());
    let service = service(&conn, USER_FEEDBACK, publisher.clone());

    let err = service.save_record(&feedback_input()).unwrap_err();
    assert!(matches!(
        err,
        SaveError::Store(StoreError::StatementPreparation(_))
    ));
    assert!(err.persisted_record().is_none());
    assert_eq!(publisher.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn zero_affected_rows_is_not_persisted_and_not_published() {
    let publisher = Arc::new(CountingPublisher::default());
    let service = RecordService::new(NoopStore, Notifier::new(publisher.clone(), "data-pipe"));

    let err = service.save_record(&feedback_input()).unwrap_err();
    assert!(matches!(
        err,
        SaveError::NotPersisted {
            table: "user_feedback"
        }
    ));
    assert_eq!(publisher.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn saved_record_reads_back_by_email() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn, USER_FEEDBACK, Arc::new(CountingPublisher::default()));

    let saved = service.save_record(&feedback_input()).unwrap();
    let loaded = service
        .list_records(&Filter::ByEmail("john@doe.com".to_string()))
        .unwrap();

    assert_eq!(loaded, vec![saved.clone()]);
    assert!(!saved.id.to_string().is_empty());
    assert!(!saved.created_at.is_empty());
}

#[test]
fn repeated_reads_are_identical() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn, USER_FEEDBACK, Arc::new(CountingPublisher::default()));
    service.save_record(&feedback_input()).unwrap();
    service
        .save_record(&RecordInput::new("Jane", "Roe", "jane@roe.com"))
        .unwrap();

    let first = service.list_records(&Filter::All).unwrap();
    let second = service.list_records(&Filter::All).unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}

#[test]
fn id_takes_precedence_over_email() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn, USER_FEEDBACK, Arc::new(CountingPublisher::default()));
    let john = service.save_record(&feedback_input()).unwrap();
    service
        .save_record(&RecordInput::new("Jane", "Roe", "jane@roe.com"))
        .unwrap();

    let filter = Filter::from_fields(
        Some(john.id.to_string()),
        Some("jane@roe.com".to_string()),
        Some("Jane".to_string()),
    );
    let records = service.list_records(&filter).unwrap();
    assert_eq!(records, vec![john]);
}

#[test]
fn users_variant_uses_database_ids() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn, USERS, Arc::new(CountingPublisher::default()));

    let first = service.save_record(&feedback_input()).unwrap();
    let second = service
        .save_record(&RecordInput::new("Jane", "Roe", "jane@roe.com"))
        .unwrap();

    assert_eq!(first.id, RecordId::Serial(1));
    assert_eq!(second.id, RecordId::Serial(2));
    assert_eq!(first.feedback, None);

    let loaded = service.list_records(&Filter::ById("2".to_string())).unwrap();
    assert_eq!(loaded, vec![second]);
}

#[test]
fn ignored_insert_is_not_persisted_and_sends_no_event() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TRIGGER skip_feedback BEFORE INSERT ON user_feedback
         BEGIN SELECT RAISE(IGNORE); END;",
    )
    .unwrap();
    let (publisher, receiver) = ChannelPublisher::new();
    let service = service(&conn, USER_FEEDBACK, Arc::new(publisher));

    let err = service.save_record(&feedback_input()).unwrap_err();

    assert!(matches!(
        err,
        SaveError::NotPersisted {
            table: "user_feedback"
        }
    ));
    assert!(err.persisted_record().is_none());
    assert!(receiver.try_recv().is_err());
    assert!(service.list_records(&Filter::All).unwrap().is_empty());
}
