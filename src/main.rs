//! AgroConnect Cart - shopping-cart service for the marketplace platform

use std::sync::Arc;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agroconnect_cart::engine::service::CartService;
use agroconnect_cart::http::{router, AppState};
use agroconnect_cart::store::{CartStore, MemoryCartStore, PgCartStore};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store: Arc<dyn CartStore> = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let db = PgPoolOptions::new().max_connections(10).connect(&url).await?;
            sqlx::migrate!("./migrations").run(&db).await?;
            Arc::new(PgCartStore::new(db))
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set, using in-memory store; carts will not survive restarts");
            Arc::new(MemoryCartStore::new())
        }
    };

    let nats = match std::env::var("NATS_URL") {
        Ok(url) => async_nats::connect(&url).await.ok(),
        Err(_) => None,
    };
    if nats.is_none() {
        tracing::info!("no NATS connection, cart events disabled");
    }

    let state = AppState { cart: Arc::new(CartService::new(store, nats)) };
    let app = router(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "8084".to_string());
    tracing::info!("🚀 AgroConnect cart service listening on 0.0.0.0:{}", port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?, app).await?;
    Ok(())
}
