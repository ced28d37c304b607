use thiserror::Error;

/// Errors surfaced by the ECS.
///
/// Most misuse (missing components, double frees, dependency cycles) is tolerated silently, so
/// this only covers conditions the caller must handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Every entity id below the configured limit is in use.
    #[error("no free entity id available (limit: {limit})")]
    EntitiesExhausted {
        /// The exclusive upper bound on entity ids for the world.
        limit: u32,
    },
}

/// Convenience result type for ECS operations.
pub type Result<T> = std::result::Result<T, Error>;
