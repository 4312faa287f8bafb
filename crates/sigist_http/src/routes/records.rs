use crate::error::{ApiError, Success};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::warn;
use serde::{Deserialize, Serialize};
use sigist_core::{
    schema_for, Filter, Record, RecordInput, RecordService, SaveError, SqliteRecordStore,
    TableSchema,
};

/// Query string of `GET /feedback` and `GET /users`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct FilterParams {
    id: Option<String>,
    email: Option<String>,
    #[serde(rename = "firstName", alias = "first_name")]
    first_name: Option<String>,
}

impl From<FilterParams> for Filter {
    fn from(params: FilterParams) -> Self {
        Filter::from_fields(params.id, params.email, params.first_name)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SaveResponse {
    record: Record,
    #[serde(skip_serializing_if = "Option::is_none")]
    notification_error: Option<String>,
}

pub(crate) async fn save_record(
    State(state): State<AppState>,
    payload: Result<Json<RecordInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(input) =
        payload.map_err(|rejection| ApiError::MalformedPayload(rejection.body_text()))?;
    let schema = record_schema(&state)?;

    let outcome = state
        .run_blocking(move |conn, notifier| {
            let store = SqliteRecordStore::new(conn, schema);
            let service = RecordService::new(store, notifier.clone());
            Ok(service.save_record(&input))
        })
        .await?;

    match outcome {
        Ok(record) => Ok(created(record, None)),
        Err(SaveError::Publish { record, source }) => {
            warn!(
                "event=record_notify module=http status=error table={} id={} error={}",
                schema.table, record.id, source
            );
            Ok(created(*record, Some(source.to_string())))
        }
        Err(SaveError::NotPersisted { .. }) => {
            Ok(Success::response(StatusCode::OK, "no record saved"))
        }
        Err(SaveError::Store(source)) => Err(ApiError::Store {
            message: "failed to save record",
            source,
        }),
    }
}

pub(crate) async fn list_records(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let schema = record_schema(&state)?;
    let filter = Filter::from(params);

    let records = state
        .run_blocking(move |conn, notifier| {
            RecordService::new(SqliteRecordStore::new(conn, schema), notifier.clone())
                .list_records(&filter)
                .map_err(|source| ApiError::Store {
                    message: "failed to fetch records",
                    source,
                })
        })
        .await?;

    Ok(Json(records))
}

fn created(record: Record, notification_error: Option<String>) -> Response {
    let body = SaveResponse {
        record,
        notification_error,
    };
    (StatusCode::CREATED, Json(body)).into_response()
}

fn record_schema(state: &AppState) -> Result<TableSchema, ApiError> {
    schema_for(state.kind()).ok_or_else(|| {
        ApiError::Internal(format!("service kind `{}` has no record table", state.kind()))
    })
}
