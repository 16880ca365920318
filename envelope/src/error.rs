use thiserror::Error;

/// Reasons an envelope cannot be computed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvelopeError {
    /// The x and y samples have different lengths
    #[error("x has {x_len} samples but y has {y_len}")]
    ShapeMismatch {
        /// Number of x samples
        x_len: usize,
        /// Number of y samples
        y_len: usize,
    },

    /// A scalar parameter is out of its valid domain
    #[error("invalid value {value} for parameter `{name}`")]
    InvalidParameter {
        /// Name of the offending parameter
        name: &'static str,
        /// The value that was passed
        value: f64,
    },
}
