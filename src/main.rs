use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user_stats_report::{
    build_router, config::AppConfig, db, repositories::SqliteUserStatsRepository, AppState,
    RouterOptions,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "user_stats_report=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Database connection and migrations
    let pool = db::connect_and_migrate(&config.database_url).await?;

    let repository = Arc::new(SqliteUserStatsRepository::new(pool));
    let app_state = AppState::new(repository);

    let app = build_router(app_state, RouterOptions::from_config(&config));

    let addr = config.bind_addr();
    tracing::info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
