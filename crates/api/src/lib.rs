//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes over the repositories
//! - The `X-Operator` request extractor
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use fundtrack_core::attachment::AttachmentService;
use fundtrack_core::storage::StorageService;
use fundtrack_db::AttachmentRepository;
use fundtrack_shared::AppConfig;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Room for multipart framing on top of the largest accepted file.
const BODY_OVERHEAD: u64 = 64 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DatabaseConnection,
    /// Attachment file storage.
    pub storage: Arc<StorageService>,
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Bundles the shared services.
    #[must_use]
    pub fn new(db: DatabaseConnection, storage: StorageService, config: AppConfig) -> Self {
        Self {
            db,
            storage: Arc::new(storage),
            config: Arc::new(config),
        }
    }

    /// Attachment service bound to this state's database and storage,
    /// acting for `operator`.
    #[must_use]
    pub fn attachments(&self, operator: &str) -> AttachmentService<AttachmentRepository> {
        AttachmentService::new(
            self.storage.clone(),
            Arc::new(AttachmentRepository::new(self.db.clone(), operator)),
        )
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.storage.config().max_file_size.saturating_add(BODY_OVERHEAD);
    let body_limit = usize::try_from(body_limit).unwrap_or(usize::MAX);

    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
