//! Best-effort Redis cache layer.
//!
//! The cache is a pure accelerator: every failure path (no URL configured,
//! connection refused, serialization error, Redis command error) degrades to
//! "no cache" and is logged at warn level. Nothing in this crate can fail a
//! surrounding request: reads fall through to the source of truth, writes
//! and invalidations become no-ops.

use futures::StreamExt;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod keys;

/// TTL for cached property list pages, in seconds.
pub const PROPERTY_LIST_TTL_SECS: u64 = 300;

/// TTL for cached property detail reads, in seconds.
pub const PROPERTY_DETAIL_TTL_SECS: u64 = 600;

/// TTL for cached per-user conversation lists, in seconds.
pub const CONVERSATIONS_TTL_SECS: u64 = 120;

/// Handle to the cache backend. Cheaply cloneable; a `None` inner connection
/// means the cache is disabled and every operation is a no-op.
#[derive(Clone)]
pub struct Cache {
    conn: Option<ConnectionManager>,
}

impl Cache {
    /// Connect to Redis. `None` or an unreachable URL yields a disabled
    /// cache rather than an error.
    pub async fn connect(url: Option<&str>) -> Self {
        let Some(url) = url else {
            tracing::info!("REDIS_URL not set, cache disabled");
            return Self::disabled();
        };

        let client = match redis::Client::open(url) {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid Redis URL, cache disabled");
                return Self::disabled();
            }
        };

        match ConnectionManager::new(client).await {
            Ok(conn) => {
                tracing::info!("Redis cache connected");
                Self { conn: Some(conn) }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Redis unreachable, cache disabled");
                Self::disabled()
            }
        }
    }

    /// A cache that never stores anything. Used when no URL is configured
    /// and in tests.
    pub fn disabled() -> Self {
        Self { conn: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.conn.is_some()
    }

    /// Fetch and deserialize a cached value. Any failure reads as a miss.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut conn = self.conn.clone()?;
        let raw: Option<String> = match conn.get(key).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key, error = %e, "Cache get failed");
                return None;
            }
        };
        let raw = raw?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Cached value failed to deserialize");
                None
            }
        }
    }

    /// Serialize and store a value with a TTL. Failures are swallowed.
    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl_secs: u64) {
        let Some(mut conn) = self.conn.clone() else {
            return;
        };
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key, error = %e, "Cache value failed to serialize");
                return;
            }
        };
        if let Err(e) = conn.set_ex::<_, _, ()>(key, raw, ttl_secs).await {
            tracing::warn!(key, error = %e, "Cache set failed");
        }
    }

    /// Delete one key. No-op on failure.
    pub async fn delete(&self, key: &str) {
        let Some(mut conn) = self.conn.clone() else {
            return;
        };
        if let Err(e) = conn.del::<_, ()>(key).await {
            tracing::warn!(key, error = %e, "Cache delete failed");
        }
    }

    /// Delete every key matching a glob pattern, via SCAN so large keyspaces
    /// are not blocked.
    pub async fn delete_pattern(&self, pattern: &str) {
        let Some(conn) = self.conn.clone() else {
            return;
        };

        let mut scan_conn = conn.clone();
        let keys: Vec<String> = match scan_conn.scan_match::<_, String>(pattern).await {
            Ok(iter) => iter.collect().await,
            Err(e) => {
                tracing::warn!(pattern, error = %e, "Cache scan failed");
                return;
            }
        };

        if keys.is_empty() {
            return;
        }

        let mut del_conn = conn;
        if let Err(e) = del_conn.del::<_, ()>(keys).await {
            tracing::warn!(pattern, error = %e, "Cache pattern delete failed");
        }
    }

    /// Invalidate every cached property read (list pages and details).
    pub async fn invalidate_properties(&self) {
        self.delete_pattern(&keys::properties_pattern()).await;
    }

    /// Invalidate one user's cached conversation lists.
    pub async fn invalidate_conversations(&self, user_id: &str) {
        self.delete_pattern(&keys::conversations_pattern(user_id))
            .await;
    }
}
