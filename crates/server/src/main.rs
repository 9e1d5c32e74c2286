use server::auth::jwt::AuthKeys;
use server::state::AppState;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let config = server::config::load_config();
    server::telemetry::init_logging(&config.log_level);
    if config.features.telemetry {
        server::telemetry::init_telemetry();
    }
    server::health::record_start_time();

    let auth = AuthKeys::from_env(config.auth.token_expiry_minutes);
    let state = AppState::new(config.server.clone(), auth);
    if config.features.demo_data {
        if let Err(e) = state.seed_demo().await {
            tracing::error!(error = %e, "Failed to seed demo data");
        }
    }

    let app = server::openapi::app_router(state, config.features.telemetry);

    let listener = match tokio::net::TcpListener::bind(&config.server.listen_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %config.server.listen_addr, error = %e, "Failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!(addr = %config.server.listen_addr, "Smart FIR API listening, docs at /docs");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server stopped");
        std::process::exit(1);
    }
}
