//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent malformed game data.
/// Missing region seeds and unresolved empires are not errors: they resolve to
/// "no region".
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("malformed region definition {definition}: {reason}")]
    MalformedRegionDefinition { definition: String, reason: String },

    #[error("invalid title file {name}: {message}")]
    InvalidTitleFile { name: String, message: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
