use thiserror::Error;

/// Errors returned by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A row has a different number of coordinates than the first row.
    #[error("dimension mismatch at row {row}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Offending row.
        row: usize,
        /// Dimensionality of the first row.
        expected: usize,
        /// Dimensionality of the offending row.
        found: usize,
    },

    /// Points have zero coordinates.
    #[error("points must have at least one coordinate")]
    ZeroDimension,

    /// A flat coordinate buffer is not a whole number of rows.
    #[error("flat buffer of length {len} is not a multiple of dimension {dim}")]
    FlatLength {
        /// Buffer length.
        len: usize,
        /// Requested dimension.
        dim: usize,
    },

    /// A coordinate is NaN or infinite.
    #[error("non-finite coordinate at row {row}, column {column}")]
    NonFinite {
        /// Row of the coordinate.
        row: usize,
        /// Column of the coordinate.
        column: usize,
    },

    /// A textual coordinate could not be parsed as a number.
    #[error("non-numeric value {token:?} at row {row}, column {column}")]
    NonNumeric {
        /// Row of the token (0-based, counting data rows only).
        row: usize,
        /// Column of the token.
        column: usize,
        /// The raw token.
        token: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// The spatial index could not be built.
    #[error("spatial index construction failed: {message}")]
    IndexConstruction {
        /// Human-readable explanation.
        message: String,
    },

    /// A snapshot file is malformed.
    #[error("malformed snapshot: {message}")]
    Snapshot {
        /// Human-readable explanation.
        message: String,
    },

    /// I/O failure while reading input.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed points or parameters; reported before any clustering work.
    InvalidInput,
    /// The spatial index could not be built.
    IndexConstructionFailure,
    /// A snapshot file does not follow the expected layout.
    Snapshot,
    /// Underlying I/O failure.
    Io,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::DimensionMismatch { .. }
            | Error::ZeroDimension
            | Error::FlatLength { .. }
            | Error::NonFinite { .. }
            | Error::NonNumeric { .. }
            | Error::InvalidParameter { .. } => ErrorKind::InvalidInput,
            Error::IndexConstruction { .. } => ErrorKind::IndexConstructionFailure,
            Error::Snapshot { .. } => ErrorKind::Snapshot,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn snapshot(message: impl Into<String>) -> Self {
        Error::Snapshot {
            message: message.into(),
        }
    }
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
