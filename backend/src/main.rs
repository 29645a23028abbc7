mod config;
mod error;
mod redis_store;
mod routes;
mod store;

use config::{Config, StoreKind};
use redis_store::RedisStore;
use routes::SharedStore;
use std::sync::Arc;
use store::MemoryStore;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let store: SharedStore = match config.store {
        StoreKind::Redis => {
            tracing::info!(redis_url = %config.redis_url, "using redis store");
            Arc::new(RedisStore::open(&config.redis_url)?)
        }
        StoreKind::Memory => {
            tracing::info!("using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let app = routes::api_router(store)
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "todo store listening");
    axum::serve(listener, app).await?;

    Ok(())
}
