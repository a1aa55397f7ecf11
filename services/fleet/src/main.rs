use sea_orm::Database;
use tracing::info;

use armada_core::tracing::init_tracing;
use armada_fleet::config::FleetConfig;
use armada_fleet::domain::types::WorkflowPolicy;
use armada_fleet::router::build_router;
use armada_fleet::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = FleetConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        jwt_secret: config.jwt_secret,
        pair_token_secret: config.pair_token_secret,
        cookie_domain: config.cookie_domain,
        policy: WorkflowPolicy {
            lock_terminal: config.lock_terminal,
        },
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.fleet_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("fleet service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
