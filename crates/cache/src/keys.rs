//! Cache key construction.
//!
//! All keys share the `cache:` prefix so a full flush can target the
//! namespace without touching anything else in the Redis instance.

/// Key for one page of the property search, derived from the canonical
/// query string of the request.
pub fn property_list(query: &str) -> String {
    format!("cache:/api/properties?{query}")
}

/// Key for a single property detail read.
pub fn property_detail(property_id: &str) -> String {
    format!("cache:/api/properties/{property_id}")
}

/// Pattern matching every property read (list pages and details).
pub fn properties_pattern() -> String {
    "cache:/api/properties*".to_string()
}

/// Key for one page of a user's conversation list.
pub fn conversations(user_id: &str, limit: i64, offset: i64) -> String {
    format!("cache:conversations:{user_id}:{limit}:{offset}")
}

/// Pattern matching all of one user's conversation pages.
pub fn conversations_pattern(user_id: &str) -> String {
    format!("cache:conversations:{user_id}:*")
}
