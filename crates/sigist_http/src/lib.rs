//! HTTP surface for the sigist services.
//!
//! # Responsibility
//! - Parse requests into core inputs and render core results as JSON.
//! - Run blocking SQLite work off the async executor.
//!
//! # Invariants
//! - Handlers never touch SQL directly; they go through core services.
//! - A publish failure after a save is reported, never turned into a lost record.

mod error;
mod routes;
mod state;

pub use error::{ApiError, HttpError, StartupError, Success};
pub use routes::router;
pub use state::AppState;

use log::info;
use std::future::Future;
use tokio::net::TcpListener;

/// Serves the router for `state` on `listener` until `shutdown` resolves.
///
/// In-flight requests are allowed to finish after the shutdown signal.
pub async fn serve<F>(
    listener: TcpListener,
    state: AppState,
    shutdown: F,
) -> Result<(), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr().map_err(StartupError::Serve)?;
    info!(
        "event=http_serve module=http status=start addr={} kind={} version={}",
        addr,
        state.kind(),
        sigist_core::core_version()
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(StartupError::Serve)?;

    info!("event=http_serve module=http status=stopped addr={addr}");
    Ok(())
}
