use sea_orm::Database;
use tracing::info;

use counterate_core::config::Config;
use counterate_core::tracing::init_tracing;

use counterate_signage::config::SignageConfig;
use counterate_signage::infra::notifier::BroadcastNotifier;
use counterate_signage::router::build_router;
use counterate_signage::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing("info,sqlx=warn");

    let config = SignageConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        notifier: BroadcastNotifier::new(config.notifier_capacity),
        defaults: config.unit_defaults(),
        repair_policy: config.pairing_repair,
    };
    info!(policy = ?state.repair_policy, "pairing repair policy");

    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.signage_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("signage service listening on {http_addr}");
    axum::serve(listener, router).await.expect("server error");
}
