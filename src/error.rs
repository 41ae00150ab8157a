use core::fmt;

/// Result alias for `sift`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the clustering pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Input was empty.
    EmptyInput,

    /// Feature vector dimension mismatch.
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// Invalid number of clusters requested.
    InvalidClusterCount {
        /// Requested count.
        requested: usize,
    },

    /// Generic error with message.
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input provided"),
            Error::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            Error::InvalidClusterCount { requested } => {
                write!(f, "cluster count must be at least 1, requested {requested}")
            }
            Error::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {}
