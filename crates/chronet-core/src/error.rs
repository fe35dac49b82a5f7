use crate::edge::Timestamp;
use thiserror::Error;

/// Errors that can occur in chronet-core.
#[derive(Error, Debug)]
pub enum Error {
    /// A string timestamp could not be parsed with the configured format.
    /// The network is left unmodified for the failing insertion.
    #[error("cannot parse timestamp {value:?} with format {format:?}: {source}")]
    MalformedTimestamp {
        /// The rejected input string.
        value: String,
        /// The format it was parsed against.
        format: String,
        /// Underlying chrono parse error.
        #[source]
        source: chrono::ParseError,
    },

    /// Maximum time difference must be non-negative.
    #[error("maximum time difference must be non-negative, got {0}")]
    InvalidDelta(Timestamp),

    /// Rescale factor must be positive.
    #[error("rescale factor must be positive, got {0}")]
    InvalidRescaleFactor(Timestamp),

    /// Exhaustive traversal aborted because it exceeded the configured
    /// visit budget. Recoverable: sample roots instead, or lower delta.
    #[error("traversal budget exceeded: visited {visited} unfolded nodes (limit {limit})")]
    ResourceExceeded {
        /// Unfolded nodes visited before aborting.
        visited: usize,
        /// The configured budget.
        limit: usize,
    },
}

/// Result type alias for chronet-core.
pub type Result<T> = std::result::Result<T, Error>;
