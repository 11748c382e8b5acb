use thiserror::Error;

pub type Result<T> = std::result::Result<T, SpectralError>;

/// Externally visible failure classes. The CLI maps these onto its two messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    ComputationFailure,
}

impl ErrorKind {
    /// Line printed by the command line tool.
    pub fn message(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "Invalid Input!",
            ErrorKind::ComputationFailure => "An Error Has Occurred",
        }
    }

    /// Rejected input ends the process cleanly; only a failed computation is an error exit.
    pub fn exit_status(&self) -> u8 {
        match self {
            ErrorKind::InvalidInput => 0,
            ErrorKind::ComputationFailure => 1,
        }
    }
}

#[derive(Debug, Error)]
pub enum SpectralError {
    /// Arguments or data the pipeline refuses to run on
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Two matrices that have to agree on a dimension do not
    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// A stage reached a numerically degenerate state
    #[error("Computation failed: {0}")]
    ComputationFailure(String),

    #[error("Matrix shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SpectralError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn computation(message: impl Into<String>) -> Self {
        Self::ComputationFailure(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SpectralError::InvalidInput(_)
            | SpectralError::DimensionMismatch { .. }
            | SpectralError::Io(_)
            | SpectralError::Csv(_) => ErrorKind::InvalidInput,
            SpectralError::ComputationFailure(_) | SpectralError::Shape(_) => {
                ErrorKind::ComputationFailure
            }
        }
    }
}
