use std::sync::Arc;

use recommendation_api::{
    config::Config,
    db::create_pool,
    routes::{create_router, AppState},
    services::{providers::PgStore, Recommender},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recommendation_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let db_pool = create_pool(&config.database_url, config.db_max_connections).await?;
    let store = Arc::new(PgStore::new(db_pool));

    let settings = config.engine_settings();
    tracing::info!(
        neighbor_count = settings.neighbor_count,
        worker_pool_size = settings.worker_pool_size,
        candidate_limit = settings.candidate_limit,
        "Recommendation engine configured"
    );

    let recommender = Recommender::new(store.clone(), store, settings);
    let app = create_router(AppState::new(recommender));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
