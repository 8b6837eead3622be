use std::sync::Arc;

use crate::config::JournalSettings;
use crate::llm_client::TextGenerator;
use crate::store::JournalStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `PgStore` when `DATABASE_URL` is set, `MemoryStore` otherwise.
    pub store: Arc<dyn JournalStore>,
    /// Weekly digest writer. `None` when no API key is configured.
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub settings: JournalSettings,
}
