use axum::Router;
use shared_types::{
    AddNoteRequest, AppError, AppErrorKind, AssignOfficerRequest, AuthResponse, AuthUser,
    CategorizeRequest, CategorizeResponse, CategoryCount, Coordinates, EvidenceFile, FirCategory,
    FirDraft, FirReceipt, FirResponse, FirStatistics, FirStatus, HeatmapPoint, Location,
    LoginRequest, MessageResponse, Officer, OfficerWorkload, PaginationMeta, RegisterRequest,
    Reporter, StatusCount, StatusEntry, UpdateFirStatusRequest, UpdateProfileRequest, UserRole,
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::health;
use crate::rest;
use crate::state::AppState;
use crate::telemetry::OtelTraceLayer;

/// OpenAPI documentation for the API.
#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        rest::auth::register,
        rest::auth::login,
        rest::auth::logout,
        rest::auth::profile,
        rest::auth::update_profile,
        // FIRs
        rest::fir::create_fir,
        rest::fir::list_my_firs,
        rest::fir::get_my_fir,
        rest::fir::search_firs,
        rest::fir::get_fir,
        rest::fir::update_fir_status,
        rest::fir::assign_fir,
        rest::fir::add_fir_note,
        // Analytics
        rest::analytics::fir_statistics,
        rest::analytics::fir_heatmap,
        // Utilities
        rest::utils::categorize,
        rest::utils::list_officers,
        // Health
        health::health_check,
    ),
    components(schemas(
        AppError, AppErrorKind, MessageResponse, PaginationMeta,
        // Auth
        AuthUser, UserRole, LoginRequest, RegisterRequest, UpdateProfileRequest, AuthResponse,
        // FIR
        FirResponse, FirReceipt, FirDraft, FirCategory, FirStatus, StatusEntry, Reporter,
        Location, Coordinates, EvidenceFile, UpdateFirStatusRequest, AssignOfficerRequest,
        AddNoteRequest, Officer,
        // Analytics
        FirStatistics, StatusCount, CategoryCount, OfficerWorkload, HeatmapPoint,
        // Utilities
        CategorizeRequest, CategorizeResponse,
        health::HealthResponse,
    )),
    tags(
        (name = "auth", description = "Registration, login and session endpoints"),
        (name = "fir", description = "Filing, tracking and managing FIRs"),
        (name = "analytics", description = "Aggregate statistics for responders"),
        (name = "utils", description = "Category suggestions and the officer roster"),
        (name = "health", description = "Health check endpoint")
    ),
    info(
        title = "Smart FIR API",
        description = "Citizen complaint filing and police case management API",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

/// Build the full application: REST API, `/health`, and API docs at `/docs`,
/// wrapped in auth, request-id and tracing layers.
pub fn app_router(state: AppState, telemetry: bool) -> Router {
    let mut router = Router::new()
        .merge(rest::api_router())
        .route("/health", axum::routing::get(health::health_check));

    if telemetry {
        router = router.layer(OtelTraceLayer);
    }

    router
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
}
