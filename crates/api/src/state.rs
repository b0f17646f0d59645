use std::sync::Arc;

use yanote_db::Store;

use crate::config::ServerConfig;
use crate::service::NoteService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend (PostgreSQL, or in-memory without `DATABASE_URL`).
    pub store: Arc<dyn Store>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: ServerConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn note_service(&self) -> NoteService<'_> {
        NoteService::new(&*self.store, &self.config.slug_warning_suffix)
    }
}
