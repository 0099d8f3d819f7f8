use std::sync::Arc;

use infra::indexes::INDEXES;
use infra::store::{DocumentStore, MemoryStore, MongoStore};
use infra::Db;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::app::build_router;
use api::config::StoreBackend;
use api::gql::build_schema;
use api::{AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let store: Arc<dyn DocumentStore> = match config.backend {
        StoreBackend::Mongo => Arc::new(MongoStore::connect(&config.mongo_options()?).await?),
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };
    let db = Db::new(store);

    // Index creation is idempotent (can be disabled with SKIP_INDEXES=true)
    if config.skip_indexes {
        tracing::info!("Skipping index creation (SKIP_INDEXES=true)");
    } else {
        db.ensure_indexes(INDEXES).await?;
        tracing::info!(count = INDEXES.len(), "Indexes ensured");
    }

    let port = config.port;
    let state = AppState::new(db, config);

    // Build GraphQL schema from the gql module
    let schema = build_schema(state.clone());

    let app = build_router(state, schema);

    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
