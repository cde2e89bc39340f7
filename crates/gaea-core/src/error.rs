use crate::entity::EntityId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by the content registry, the world arena, and save files.
///
/// Unknown-id variants are data-integrity errors: static content is expected
/// to be consistent, so callers treat them as fatal for the operation at hand.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// No object template with this id exists in the content registry.
    #[error("unknown object: {0}")]
    UnknownObject(u32),

    /// No resource kind with this id exists in the content registry.
    #[error("unknown resource: {0}")]
    UnknownResource(u32),

    /// No creature species with this id exists in the content registry.
    #[error("unknown creature: {0}")]
    UnknownCreature(u32),

    /// No plant template with this id exists in the content registry.
    #[error("unknown plant: {0}")]
    UnknownPlant(u32),

    /// A random object was requested for a kind that has no objects.
    #[error("no object of kind \"{0}\"")]
    NoObjectOfKind(String),

    /// The requested entity does not exist in the world.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// Two saved entries claimed the same entity id.
    #[error("duplicate entity id: {0}")]
    DuplicateEntity(EntityId),

    /// A content or save file could not be read or written.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A content or save file was not valid JSON for the expected shape.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A generic validation error with a descriptive message.
    #[error("validation error: {0}")]
    Validation(String),
}
