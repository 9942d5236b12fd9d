use thiserror::Error;

/// Error taxonomy for bounding-box queries.
///
/// The first two variants are caller mistakes and must short-circuit
/// before any store access. `QueryTimeout` means the statement budget
/// was exceeded; the caller may retry with a narrower box. `Database`
/// carries the underlying message for logging only — the API layer
/// never forwards it to the caller.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("invalid bounds: {0}")]
    InvalidBounds(String),

    #[error("bounding box area {area:.4} exceeds maximum {max:.4}")]
    AreaTooLarge { area: f64, max: f64 },

    #[error("query timed out")]
    QueryTimeout,

    #[error("database error: {0}")]
    Database(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
