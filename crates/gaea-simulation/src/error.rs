use gaea_core::CoreError;
use gaea_core::entity::EntityId;

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised while running the simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Content or world data was inconsistent.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An entity expected by the caller does not exist.
    #[error("entity not found in simulation: {0}")]
    EntityNotFound(EntityId),

    /// The configuration cannot drive a simulation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
