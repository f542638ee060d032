use std::sync::Arc;

use sejour_cache::Cache;
use sejour_storage::ObjectStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: sejour_db::DbPool,
    /// Best-effort Redis response cache. Disabled when `REDIS_URL` is absent.
    pub cache: Arc<Cache>,
    /// S3-compatible object storage, `None` when storage env vars are absent
    /// (image endpoints then reject uploads).
    pub store: Option<Arc<ObjectStore>>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
