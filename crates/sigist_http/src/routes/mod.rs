//! Route table per service kind.

mod emails;
mod records;

use crate::state::AppState;
use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use sigist_core::ServiceKind;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Builds the router for the service kind held by `state`.
///
/// - feedback: `POST /feedback`, `GET /feedback`
/// - users: `POST /users`, `GET /users`
/// - email: `POST /email`, `GET /emails`
/// - all kinds: `GET /health`
pub fn router(state: AppState) -> Router {
    let routes = match state.kind() {
        ServiceKind::Feedback => Router::new().route(
            "/feedback",
            post(records::save_record).get(records::list_records),
        ),
        ServiceKind::Users => Router::new().route(
            "/users",
            post(records::save_record).get(records::list_records),
        ),
        ServiceKind::Email => Router::new()
            .route("/email", post(emails::save_email))
            .route("/emails", get(emails::list_emails)),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    routes
        .route("/health", get(health))
        .layer(CatchPanicLayer::new())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: sigist_core::ping(),
        version: sigist_core::core_version(),
    })
}
