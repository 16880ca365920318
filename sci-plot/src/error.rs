use envelope::EnvelopeError;
use thiserror::Error;

/// Everything that can go wrong while building or rendering a figure
#[derive(Debug, Error)]
pub enum PlotError {
    /// The band envelope could not be computed
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    /// Two inputs that must line up do not
    #[error("{what}: expected {expected} values, found {found}")]
    ShapeMismatch {
        /// What was being checked
        what: &'static str,
        /// The length implied by the other inputs
        expected: usize,
        /// The length that was passed
        found: usize,
    },

    /// A parameter is outside of its valid domain
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter
        name: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// The plotters backend failed to draw
    #[error("drawing backend: {0}")]
    Backend(String),

    /// A style sheet or output file could not be accessed
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A style sheet is not valid TOML or has unexpected keys
    #[error("style sheet: {0}")]
    Style(#[from] toml::de::Error),
}

impl PlotError {
    /// Stringify a plotters error, they are generic over the backend
    pub(crate) fn backend<E: std::fmt::Display>(err: E) -> Self {
        PlotError::Backend(err.to_string())
    }

    pub(crate) fn check_len(what: &'static str, expected: usize, found: usize) -> Result<()> {
        if expected != found {
            return Err(PlotError::ShapeMismatch {
                what,
                expected,
                found,
            });
        }
        Ok(())
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, PlotError>;
