use axum::{extract::State, Json};
use std::sync::Arc;

use shared_types::{
    suggest_categories, AppError, CategorizeRequest, CategorizeResponse, Officer, ServerSettings,
};

use crate::auth::extractors::{AuthRequired, ResponderOnly};

/// POST /api/utils/categorize
///
/// Keyword-based suggestions. Advisory only; the filer still picks the category.
#[utoipa::path(
    post,
    path = "/api/utils/categorize",
    request_body = CategorizeRequest,
    responses(
        (status = 200, description = "Suggested categories, most likely first", body = CategorizeResponse),
        (status = 401, description = "Not authenticated", body = AppError)
    ),
    tag = "utils",
    security(("bearer_auth" = []))
)]
pub async fn categorize(
    _auth: AuthRequired,
    Json(body): Json<CategorizeRequest>,
) -> Result<Json<CategorizeResponse>, AppError> {
    Ok(Json(CategorizeResponse {
        suggestions: suggest_categories(&body.description),
    }))
}

/// GET /api/officers
#[utoipa::path(
    get,
    path = "/api/officers",
    responses(
        (status = 200, description = "Officers available for assignment", body = Vec<Officer>),
        (status = 403, description = "Responder role required", body = AppError)
    ),
    tag = "utils",
    security(("bearer_auth" = []))
)]
pub async fn list_officers(
    State(settings): State<Arc<ServerSettings>>,
    _auth: ResponderOnly,
) -> Result<Json<Vec<Officer>>, AppError> {
    let officers = (1u32..)
        .zip(settings.officers.iter())
        .map(|(id, name)| Officer {
            id,
            name: name.clone(),
        })
        .collect();
    Ok(Json(officers))
}
