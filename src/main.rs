use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod services;

#[cfg(test)]
mod test;

use config::Config;
use handlers::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "food_order_server=debug,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!(port = config.port, "starting food ordering server");

    let pool = db::init_db_pool(&config.database_url, config.max_pool_size).await?;
    db::seed_sample_data(&pool).await?;

    let state = AppState {
        pool,
        config: Arc::new(config),
    };

    let addr = format!("0.0.0.0:{}", state.config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, handlers::app(state)).await?;

    Ok(())
}
