use crate::error::{ApiError, StartupError};
use log::info;
use rusqlite::Connection;
use sigist_core::db::open_db;
use sigist_core::{build_publisher, Notifier, ServiceConfig, ServiceKind};
use std::sync::{Arc, Mutex};

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    conn: Mutex<Connection>,
    kind: ServiceKind,
    notifier: Notifier,
}

impl AppState {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection, kind: ServiceKind, notifier: Notifier) -> Self {
        Self {
            inner: Arc::new(Inner {
                conn: Mutex::new(conn),
                kind,
                notifier,
            }),
        }
    }

    /// Opens the configured database (running migrations) and publisher.
    pub fn open(config: &ServiceConfig) -> Result<Self, StartupError> {
        let conn = open_db(&config.db_file)?;
        let publisher = build_publisher(config.event_sink.as_deref())?;
        info!(
            "event=state_open module=http status=ok kind={} db_file={} topic={} sink={}",
            config.kind,
            config.db_file.display(),
            config.event_topic,
            config
                .event_sink
                .as_deref()
                .map_or_else(|| "log".to_string(), |path| path.display().to_string())
        );
        Ok(Self::new(
            conn,
            config.kind,
            Notifier::new(publisher, config.event_topic.clone()),
        ))
    }

    pub fn kind(&self) -> ServiceKind {
        self.inner.kind
    }

    /// Runs `task` on the blocking pool with exclusive access to the connection.
    pub(crate) async fn run_blocking<T, F>(&self, task: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Connection, &Notifier) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let conn = inner
                .conn
                .lock()
                .map_err(|_| ApiError::Internal("database connection lock poisoned".to_string()))?;
            task(&conn, &inner.notifier)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("blocking task failed: {err}")))?
    }
}
