use crate::types::DbId;

/// Domain-level error taxonomy shared by all crates.
///
/// HTTP mapping happens in `sejour-api`: `NotFound` → 404, `Validation` and
/// `BusinessRule` → 400, `Unauthorized` → 401, `Forbidden` → 403,
/// `Conflict` → 409, `Internal` → 500.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Not-found where the lookup key is not an id (e.g. login by email).
    #[error("Not found: {0}")]
    NotFoundMsg(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A domain rule was violated (e.g. overlapping booking dates).
    /// Distinct from `Validation`: the input was well-formed but the
    /// operation is not allowed in the current state of the world.
    #[error("Business rule violated: {0}")]
    BusinessRule(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
