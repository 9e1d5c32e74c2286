use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use shared_types::{
    AddNoteRequest, AppError, AssignOfficerRequest, FirDraft, FirId, FirResponse,
    FirSearchParams, FirStatus, Paginated, ServerSettings, UpdateFirStatusRequest,
};

use crate::auth::extractors::{CitizenOnly, ResponderOnly};
use crate::repo::fir::{self as fir_repo, FirStore};

fn parse_id(id: &str) -> Result<FirId, AppError> {
    id.parse()
}

// ── Citizen ─────────────────────────────────────────────────────────

/// POST /api/fir
#[utoipa::path(
    post,
    path = "/api/fir",
    request_body = FirDraft,
    responses(
        (status = 201, description = "FIR filed", body = FirResponse),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 403, description = "Citizen role required", body = AppError),
        (status = 422, description = "Validation failed", body = AppError)
    ),
    tag = "fir",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(firs, auth, draft))]
pub async fn create_fir(
    State(firs): State<FirStore>,
    auth: CitizenOnly,
    Json(draft): Json<FirDraft>,
) -> Result<(StatusCode, Json<FirResponse>), AppError> {
    let fir = fir_repo::create(&firs, draft, &auth.0.sub, Utc::now()).await?;
    tracing::info!(fir_id = %fir.id, category = %fir.category, user_id = %auth.0.sub, "FIR filed");
    Ok((StatusCode::CREATED, Json(FirResponse::from(&fir))))
}

/// GET /api/fir/citizen
#[utoipa::path(
    get,
    path = "/api/fir/citizen",
    responses(
        (status = 200, description = "FIRs filed by the caller", body = Vec<FirResponse>),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 403, description = "Citizen role required", body = AppError)
    ),
    tag = "fir",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(firs, auth))]
pub async fn list_my_firs(
    State(firs): State<FirStore>,
    auth: CitizenOnly,
) -> Result<Json<Vec<FirResponse>>, AppError> {
    let records = fir_repo::list_by_reporter(&firs, &auth.0.sub).await;
    Ok(Json(records.iter().map(FirResponse::from).collect()))
}

/// GET /api/fir/citizen/{id}
#[utoipa::path(
    get,
    path = "/api/fir/citizen/{id}",
    params(("id" = String, Path, description = "FIR id, e.g. FIR00123")),
    responses(
        (status = 200, description = "FIR found", body = FirResponse),
        (status = 400, description = "Malformed id", body = AppError),
        (status = 404, description = "Not found or not filed by the caller", body = AppError)
    ),
    tag = "fir",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(firs, auth))]
pub async fn get_my_fir(
    State(firs): State<FirStore>,
    auth: CitizenOnly,
    Path(id): Path<String>,
) -> Result<Json<FirResponse>, AppError> {
    let fir_id = parse_id(&id)?;
    let fir = fir_repo::find_by_id(&firs, fir_id)
        .await
        .filter(|f| f.filed_by == auth.0.sub)
        .ok_or_else(|| AppError::not_found(format!("FIR {fir_id} not found")))?;
    Ok(Json(FirResponse::from(&fir)))
}

// ── Responder ───────────────────────────────────────────────────────

/// GET /api/fir
#[utoipa::path(
    get,
    path = "/api/fir",
    params(FirSearchParams),
    responses(
        (status = 200, description = "Matching FIRs", body = Paginated<FirResponse>),
        (status = 400, description = "Invalid filter value", body = AppError),
        (status = 403, description = "Responder role required", body = AppError)
    ),
    tag = "fir",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(firs, settings, _auth))]
pub async fn search_firs(
    State(firs): State<FirStore>,
    State(settings): State<Arc<ServerSettings>>,
    _auth: ResponderOnly,
    Query(params): Query<FirSearchParams>,
) -> Result<Json<Paginated<FirResponse>>, AppError> {
    let query = params.into_query(settings.page_size)?;
    let page = fir_repo::search(&firs, &query).await;
    let items = page.items.iter().map(FirResponse::from).collect();
    Ok(Json(Paginated::new(items, page.page, page.page_size, page.total)))
}

/// GET /api/fir/{id}
#[utoipa::path(
    get,
    path = "/api/fir/{id}",
    params(("id" = String, Path, description = "FIR id, e.g. FIR00123")),
    responses(
        (status = 200, description = "FIR found", body = FirResponse),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "fir",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(firs, _auth))]
pub async fn get_fir(
    State(firs): State<FirStore>,
    _auth: ResponderOnly,
    Path(id): Path<String>,
) -> Result<Json<FirResponse>, AppError> {
    let fir_id = parse_id(&id)?;
    let fir = fir_repo::find_by_id(&firs, fir_id)
        .await
        .ok_or_else(|| AppError::not_found(format!("FIR {fir_id} not found")))?;
    Ok(Json(FirResponse::from(&fir)))
}

/// PATCH /api/fir/{id}/status
#[utoipa::path(
    patch,
    path = "/api/fir/{id}/status",
    params(("id" = String, Path, description = "FIR id")),
    request_body = UpdateFirStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = FirResponse),
        (status = 400, description = "Unknown status", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "fir",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(firs, auth, body))]
pub async fn update_fir_status(
    State(firs): State<FirStore>,
    auth: ResponderOnly,
    Path(id): Path<String>,
    Json(body): Json<UpdateFirStatusRequest>,
) -> Result<Json<FirResponse>, AppError> {
    let fir_id = parse_id(&id)?;
    let status = FirStatus::parse(&body.status).ok_or_else(|| {
        AppError::bad_request(format!(
            "Invalid status: {}. Valid values: {}",
            body.status,
            FirStatus::ALL.map(|s| s.as_str()).join(", ")
        ))
    })?;

    let before = fir_repo::find_by_id(&firs, fir_id).await.map(|f| f.status());
    let fir = fir_repo::update_status(&firs, fir_id, status, body.comment, Utc::now()).await?;
    if let Some(previous) = before.filter(|p| !p.is_suggested_transition(status)) {
        tracing::debug!(fir_id = %fir_id, from = %previous, to = %status, "Status change outside the usual flow");
    }
    tracing::info!(fir_id = %fir_id, status = %status, officer = %auth.0.name, "FIR status changed");
    Ok(Json(FirResponse::from(&fir)))
}

/// PATCH /api/fir/{id}/assign
#[utoipa::path(
    patch,
    path = "/api/fir/{id}/assign",
    params(("id" = String, Path, description = "FIR id")),
    request_body = AssignOfficerRequest,
    responses(
        (status = 200, description = "Assignee updated", body = FirResponse),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "fir",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(firs, _auth, body))]
pub async fn assign_fir(
    State(firs): State<FirStore>,
    _auth: ResponderOnly,
    Path(id): Path<String>,
    Json(body): Json<AssignOfficerRequest>,
) -> Result<Json<FirResponse>, AppError> {
    let fir_id = parse_id(&id)?;
    let fir = fir_repo::assign(&firs, fir_id, body.officer).await?;
    match fir.assigned_officer() {
        Some(officer) => tracing::info!(fir_id = %fir_id, officer, "FIR assigned"),
        None => tracing::info!(fir_id = %fir_id, "FIR unassigned"),
    }
    Ok(Json(FirResponse::from(&fir)))
}

/// POST /api/fir/{id}/notes
#[utoipa::path(
    post,
    path = "/api/fir/{id}/notes",
    params(("id" = String, Path, description = "FIR id")),
    request_body = AddNoteRequest,
    responses(
        (status = 201, description = "Note appended", body = FirResponse),
        (status = 400, description = "Empty comment", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "fir",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(firs, _auth, body))]
pub async fn add_fir_note(
    State(firs): State<FirStore>,
    _auth: ResponderOnly,
    Path(id): Path<String>,
    Json(body): Json<AddNoteRequest>,
) -> Result<(StatusCode, Json<FirResponse>), AppError> {
    let fir_id = parse_id(&id)?;
    let comment = body.comment.trim();
    if comment.is_empty() {
        return Err(AppError::bad_request("comment must not be empty"));
    }
    let fir = fir_repo::add_note(&firs, fir_id, comment.to_string(), Utc::now()).await?;
    tracing::info!(fir_id = %fir_id, "Note added");
    Ok((StatusCode::CREATED, Json(FirResponse::from(&fir))))
}
