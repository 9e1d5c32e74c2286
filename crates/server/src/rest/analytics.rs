use axum::{extract::State, Json};

use shared_types::{heatmap_points, AppError, FirStatistics, HeatmapPoint};

use crate::auth::extractors::ResponderOnly;
use crate::repo::fir::{self as fir_repo, FirStore};

/// GET /api/analytics/statistics
#[utoipa::path(
    get,
    path = "/api/analytics/statistics",
    responses(
        (status = 200, description = "Aggregate counts over every FIR", body = FirStatistics),
        (status = 403, description = "Responder role required", body = AppError)
    ),
    tag = "analytics",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(firs, _auth))]
pub async fn fir_statistics(
    State(firs): State<FirStore>,
    _auth: ResponderOnly,
) -> Result<Json<FirStatistics>, AppError> {
    let records = fir_repo::list_all(&firs).await;
    Ok(Json(FirStatistics::from_records(&records)))
}

/// GET /api/analytics/heatmap
#[utoipa::path(
    get,
    path = "/api/analytics/heatmap",
    responses(
        (status = 200, description = "Coordinates of every located FIR", body = Vec<HeatmapPoint>),
        (status = 403, description = "Responder role required", body = AppError)
    ),
    tag = "analytics",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(firs, _auth))]
pub async fn fir_heatmap(
    State(firs): State<FirStore>,
    _auth: ResponderOnly,
) -> Result<Json<Vec<HeatmapPoint>>, AppError> {
    let records = fir_repo::list_all(&firs).await;
    Ok(Json(heatmap_points(&records)))
}
