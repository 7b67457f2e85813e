use points_ledger::api::{create_router, ApiState};
use points_ledger::config::AppConfig;
use points_ledger::observability::{metrics, tracing::init_tracing};
use points_ledger::{Ledger, PointsEngine, CONFIG_ENV_VAR};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env)?;

    init_tracing(&config.logging)?;
    metrics::register_metrics()?;

    let ledger = Ledger::with_records(config.ledger.seed_records.clone())
        .verify_invariants(config.ledger.verify_invariants);
    if let Err(e) = ledger.verify() {
        tracing::warn!(error = %e, "Seed records fail consistency checks");
    }

    let state = Arc::new(ApiState {
        engine: PointsEngine::new(ledger),
    });
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %config.server.bind_address, env = %env, "Points ledger listening");

    axum::serve(listener, router).await?;

    Ok(())
}
