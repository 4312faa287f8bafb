use rusqlite::Connection;
use sigist_core::db::open_db_in_memory;
use sigist_core::{EmailRequest, EmailService, SqliteEmailStore, StoreError};

#[test]
fn save_uses_default_source_and_generated_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = EmailService::new(SqliteEmailStore::new(&conn));

    let saved = service
        .save(&EmailRequest {
            email: "a@b.c".to_string(),
            sources: Vec::new(),
        })
        .unwrap();

    assert_eq!(saved.rows_affected, 1);
    assert_eq!(saved.entry.source_name, "default");
    assert!(uuid::Uuid::parse_str(&saved.entry.id).is_ok());
    assert!(chrono::DateTime::parse_from_rfc3339(&saved.entry.created_at).is_ok());
}

#[test]
fn list_returns_saved_emails_in_order() {
    let conn = open_db_in_memory().unwrap();
    let service = EmailService::new(SqliteEmailStore::new(&conn));

    let first = service
        .save(&EmailRequest {
            email: "first@b.c".to_string(),
            sources: vec!["web".to_string(), "app".to_string()],
        })
        .unwrap();
    let second = service
        .save(&EmailRequest {
            email: "second@b.c".to_string(),
            sources: vec!["pact".to_string()],
        })
        .unwrap();

    let emails = service.list().unwrap();
    assert_eq!(emails, vec![first.entry, second.entry]);
    assert_eq!(emails[0].source_name, "web,app");
}

#[test]
fn empty_table_lists_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = EmailService::new(SqliteEmailStore::new(&conn));
    assert!(service.list().unwrap().is_empty());
}

#[test]
fn missing_table_is_a_preparation_error() {
    let conn = Connection::open_in_memory().unwrap();
    let service = EmailService::new(SqliteEmailStore::new(&conn));

    assert!(matches!(
        service.list().unwrap_err(),
        StoreError::StatementPreparation(_)
    ));
    assert!(matches!(
        service.save(&EmailRequest::default()).unwrap_err(),
        StoreError::StatementPreparation(_)
    ));
}

#[test]
fn ignored_insert_reports_zero_rows() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TRIGGER skip_emails BEFORE INSERT ON emails BEGIN SELECT RAISE(IGNORE); END;",
    )
    .unwrap();
    let service = EmailService::new(SqliteEmailStore::new(&conn));

    let saved = service
        .save(&EmailRequest {
            email: "a@b.c".to_string(),
            sources: Vec::new(),
        })
        .unwrap();

    assert_eq!(saved.rows_affected, 0);
    assert!(service.list().unwrap().is_empty());
}
