pub mod analytics;
pub mod auth;
pub mod fir;
pub mod utils;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::state::AppState;

/// Build the REST API router. Role checks live in the handlers' extractors.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/profile", get(auth::profile).put(auth::update_profile))
        // FIRs (citizen)
        .route("/api/fir", get(fir::search_firs).post(fir::create_fir))
        .route("/api/fir/citizen", get(fir::list_my_firs))
        .route("/api/fir/citizen/{id}", get(fir::get_my_fir))
        // FIRs (responder)
        .route("/api/fir/{id}", get(fir::get_fir))
        .route("/api/fir/{id}/status", patch(fir::update_fir_status))
        .route("/api/fir/{id}/assign", patch(fir::assign_fir))
        .route("/api/fir/{id}/notes", post(fir::add_fir_note))
        // Analytics
        .route("/api/analytics/statistics", get(analytics::fir_statistics))
        .route("/api/analytics/heatmap", get(analytics::fir_heatmap))
        // Utilities
        .route("/api/officers", get(utils::list_officers))
        .route("/api/utils/categorize", post(utils::categorize))
}
