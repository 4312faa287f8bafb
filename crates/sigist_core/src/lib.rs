//! Core data access and flows for the sigist feedback and email services.
//! This crate owns storage, filter precedence and save-then-notify semantics;
//! transports only parse input and render output.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod publish;
pub mod repo;
pub mod service;

pub use config::{ConfigError, Environment, ServiceConfig, ServiceKind};
pub use logging::{init_logging, logging_status, LoggingError};
pub use model::email::{EmailEntry, EmailRequest};
pub use model::filter::Filter;
pub use model::record::{Record, RecordId, RecordInput};
pub use publish::{
    build_publisher, ChannelPublisher, EventPublisher, JsonLinesPublisher, LogPublisher,
    Notifier, PublishError, PublishedEvent,
};
pub use repo::email_repo::{EmailStore, SqliteEmailStore};
pub use repo::query::{resolve, IdKind, ResolvedQuery, TableSchema, USERS, USER_FEEDBACK};
pub use repo::record_repo::{Inserted, NewRow, RecordStore, SqliteRecordStore};
pub use repo::{StoreError, StoreResult};
pub use service::email_service::{EmailService, SavedEmail};
pub use service::record_service::{RecordService, SaveError};

/// Minimal health-check probe.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Table schema served by a record service kind; `None` for email.
pub fn schema_for(kind: ServiceKind) -> Option<TableSchema> {
    match kind {
        ServiceKind::Feedback => Some(USER_FEEDBACK),
        ServiceKind::Users => Some(USERS),
        ServiceKind::Email => None,
    }
}
