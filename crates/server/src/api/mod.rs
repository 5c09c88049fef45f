//! HTTP handlers over the shared intake session.
//!
//! Every failure leaves as `(StatusCode, Json<ApiError>)`; validation
//! failures carry the form messages in `details`.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use intake_core::{
    export::NOTHING_TO_EXPORT, CancelOutcome, Criterion, RegistryError, RequestFilter,
    SessionError, SubmitError,
};
use shared::{
    catalog::CatalogError,
    domain::{Request, RequestId},
    error::{ApiError, ErrorCode},
    protocol::{CatalogResponse, RequestQuery, StatusUpdateBody, SubmitRequestBody},
};
use tracing::{error, info};

use crate::app_state::AppState;

pub(crate) type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

pub(crate) async fn healthz() -> &'static str {
    "ok"
}

pub(crate) async fn catalog() -> Json<CatalogResponse> {
    Json(CatalogResponse::current())
}

pub(crate) async fn list_requests(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RequestQuery>,
) -> ApiResult<Json<Vec<Request>>> {
    let filter = filter_from_query(&query).map_err(catalog_error)?;
    let session = state.session.lock().await;
    let requests = session.filter(&filter).into_iter().cloned().collect();
    Ok(Json(requests))
}

pub(crate) async fn submit_request(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SubmitRequestBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Request>)> {
    let Json(body) = body.map_err(|rejection| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(ErrorCode::Validation, rejection.body_text())),
        )
    })?;

    let mut session = state.session.lock().await;
    let request = session
        .submit_classified(&body.classification, &body.draft)
        .await
        .map_err(session_error)?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub(crate) async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    body: Result<Json<StatusUpdateBody>, JsonRejection>,
) -> ApiResult<Json<Request>> {
    let Json(body) = body.map_err(|rejection| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(ErrorCode::Validation, rejection.body_text())),
        )
    })?;

    let id = RequestId(id);
    let mut session = state.session.lock().await;
    session
        .set_status(id, body.status)
        .await
        .map_err(session_error)?;
    current(&session, id)
}

pub(crate) async fn cancel_request(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Request>> {
    let id = RequestId(id);
    let mut session = state.session.lock().await;
    if session.cancel(id).await.map_err(session_error)? == CancelOutcome::AlreadyCancelled {
        info!(request_id = %id, "cancel requested for an already cancelled request");
    }
    current(&session, id)
}

pub(crate) async fn export_requests(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RequestQuery>,
) -> ApiResult<Response> {
    let filter = filter_from_query(&query).map_err(catalog_error)?;
    let session = state.session.lock().await;
    let Some(export) = session
        .export(&filter, &state.export_prefix, Utc::now())
        .map_err(session_error)?
    else {
        info!("{NOTHING_TO_EXPORT}");
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(intake_core::CsvExport::MIME_TYPE),
    );
    if let Ok(value) =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", export.file_name))
    {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    info!(rows = export.row_count, file = %export.file_name, "exported requests");
    Ok((StatusCode::OK, headers, export.content).into_response())
}

pub(crate) fn filter_from_query(query: &RequestQuery) -> Result<RequestFilter, CatalogError> {
    Ok(RequestFilter {
        campus: Criterion::parse(query.campus.as_deref())?,
        main_category: Criterion::parse(query.category.as_deref())?,
        status: Criterion::parse(query.status.as_deref())?,
        search: query.q.clone().unwrap_or_default(),
    })
}

fn current(session: &intake_core::IntakeSession, id: RequestId) -> ApiResult<Json<Request>> {
    session
        .registry()
        .get(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| registry_error(&RegistryError::NotFound(id)))
}

fn catalog_error(err: CatalogError) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError::new(ErrorCode::Validation, err.to_string())),
    )
}

fn registry_error(err: &RegistryError) -> (StatusCode, Json<ApiError>) {
    let (status, code) = match err {
        RegistryError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
        RegistryError::DuplicateId(_) | RegistryError::CancelledIsTerminal(_) => {
            (StatusCode::CONFLICT, ErrorCode::Conflict)
        }
    };
    (status, Json(ApiError::new(code, err.to_string())))
}

pub(crate) fn session_error(err: SessionError) -> (StatusCode, Json<ApiError>) {
    match err {
        SessionError::Submit(SubmitError::Validation(errors)) => (
            StatusCode::BAD_REQUEST,
            Json(
                ApiError::new(ErrorCode::Validation, "request failed validation")
                    .with_details(errors.into_messages()),
            ),
        ),
        SessionError::Submit(SubmitError::Workflow(workflow)) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(ErrorCode::Validation, workflow.to_string())),
        ),
        SessionError::Submit(SubmitError::Registry(registry)) | SessionError::Registry(registry) => {
            registry_error(&registry)
        }
        SessionError::Export(_) | SessionError::Storage(_) => {
            error!(error = %err, "request handling failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new(ErrorCode::Internal, err.to_string())),
            )
        }
    }
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
