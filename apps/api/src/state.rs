use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::storage::DocumentUploader;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Document upload gateway. Production: S3/MinIO. Handlers only see the trait.
    pub uploader: Arc<dyn DocumentUploader>,
    pub config: Config,
}
