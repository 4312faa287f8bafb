use crate::error::{ApiError, Success};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use sigist_core::{EmailEntry, EmailRequest, EmailService, SqliteEmailStore};

pub(crate) async fn save_email(
    State(state): State<AppState>,
    payload: Result<Json<EmailRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) =
        payload.map_err(|rejection| ApiError::MalformedPayload(rejection.body_text()))?;

    let saved = state
        .run_blocking(move |conn, _| {
            EmailService::new(SqliteEmailStore::new(conn))
                .save(&request)
                .map_err(|source| ApiError::Store {
                    message: "failed to save email",
                    source,
                })
        })
        .await?;

    let status = if saved.rows_affected == 0 {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok(Success::response(status, "success"))
}

pub(crate) async fn list_emails(
    State(state): State<AppState>,
) -> Result<Json<Vec<EmailEntry>>, ApiError> {
    let emails = state
        .run_blocking(|conn, _| {
            EmailService::new(SqliteEmailStore::new(conn))
                .list()
                .map_err(|source| ApiError::Store {
                    message: "failed to fetch emails",
                    source,
                })
        })
        .await?;

    Ok(Json(emails))
}
