//! Error handling logic

use thiserror::Error;

/// Failures surfaced by analysis, measurement and instruction synthesis.
///
/// Every variant is recoverable at the request boundary; none of them is
/// fatal to the embedding process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QpulseError {
    /// Physically invalid or incomplete input: non-unitary matrix,
    /// zero-norm vector, missing field, bad qubit index.
    #[error("Validation Error: {message}")]
    Validation {
        /// Validation failure message
        message: String,
    },

    /// A requested configuration that is declared but not implemented,
    /// e.g. an entangling primitive other than iSwap.
    #[error("Unsupported Configuration: {message}")]
    UnsupportedConfiguration {
        /// UnsupportedConfiguration failure message
        message: String,
    },

    /// Malformed complex-expression text reported by the expression parser.
    #[error("Parse Error: {message}")]
    Parse {
        /// Parser message, passed through verbatim
        message: String,
    },

    /// The synthesis pipeline or one of its collaborators broke an invariant
    /// (reconstruction mismatch, impossible Euler sequence).
    #[error("Internal Inconsistency: {message}")]
    InternalInconsistency {
        /// InternalInconsistency failure message
        message: String,
    },

    /// Calibration data could not be read.
    #[error("Configuration Error: {message}")]
    Config {
        /// Config failure message
        message: String,
    },
}

impl QpulseError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        QpulseError::Validation { message: message.into() }
    }

    pub(crate) fn inconsistency(message: impl Into<String>) -> Self {
        QpulseError::InternalInconsistency { message: message.into() }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QpulseError>;
