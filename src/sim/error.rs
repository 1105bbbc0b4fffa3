//! Error types for wheel mutation.

use thiserror::Error;

/// Rejected bucket-count mutations. The wheel is left untouched when one of
/// these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WheelError {
    #[error("a wheel needs at least one bucket")]
    ZeroBuckets,

    #[error("cannot remove the last bucket")]
    LastBucket,
}

pub type Result<T> = std::result::Result<T, WheelError>;
