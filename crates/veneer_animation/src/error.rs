//! Animation error types

use thiserror::Error;

/// Errors from setting up the animation runtime
///
/// Running animations never fail; these cover configuration and global
/// registration only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// The process-wide scheduler handle was already installed
    #[error("global animation scheduler already set")]
    GlobalSchedulerAlreadySet,

    /// A scheduler configuration value is out of range
    #[error("invalid scheduler configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for animation setup operations
pub type Result<T> = std::result::Result<T, AnimationError>;
