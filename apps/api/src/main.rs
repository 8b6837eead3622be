mod analysis;
mod config;
mod db;
mod errors;
mod journal;
mod llm_client;
mod models;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::{LlmClient, TextGenerator};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{JournalStore, MemoryStore, PgStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Journal API v{}", env!("CARGO_PKG_VERSION"));

    let settings = config.journal.clone();

    // Persistence: PostgreSQL when configured, process memory otherwise
    let store: Arc<dyn JournalStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url, config.db_max_connections, settings.store_timeout).await?;
            Arc::new(PgStore::new(pool, settings.store_timeout))
        }
        None => {
            warn!("DATABASE_URL not set; entries are kept in memory and lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    // Text generator for weekly summaries
    let generator: Option<Arc<dyn TextGenerator>> = match &config.anthropic_api_key {
        Some(key) => {
            let client = LlmClient::new(key.clone(), settings.generator_timeout)?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(Arc::new(client))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; weekly summaries will report unavailable");
            None
        }
    };

    info!(
        "Journal settings: top_k={} reflection_min_age={}m weekly_window={}h weekly_min_entries={}",
        settings.theme_top_k,
        settings.reflection_min_age.num_minutes(),
        settings.weekly_cache_window.num_hours(),
        settings.weekly_min_entries
    );

    let state = AppState {
        store,
        generator,
        settings,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
