//! Envelope computation for uncertainty bands.
//!
//! Given a scatter of `(x, y)` samples and a horizontal tolerance, find for
//! every sample the smallest and largest `y` among all samples whose `x` lies
//! strictly within the tolerance of its own `x`.

#![warn(missing_docs)]

#[macro_use]
extern crate log;

mod envelope;
mod error;
mod scan;
mod sweep;

pub use envelope::{Bounds, Envelope};
pub use error::EnvelopeError;
pub use scan::compute_envelope;
pub use sweep::compute_envelope_sweep;

/// The algorithm used to compute an [`Envelope`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Method {
    /// Compare every sample against every other sample, O(N²)
    #[default]
    Scan,
    /// Sort by x and slide a window over the sorted samples, O(N log N)
    Sweep,
}

/// Compute the envelope using the given `method`.
/// Both methods produce identical output for all valid inputs.
pub fn compute_envelope_with(
    method: Method,
    x: &[f64],
    y: &[f64],
    width: f64,
) -> Result<Envelope, EnvelopeError> {
    match method {
        Method::Scan => compute_envelope(x, y, width),
        Method::Sweep => compute_envelope_sweep(x, y, width),
    }
}

/// Checks the preconditions shared by all methods
pub(crate) fn validate(x: &[f64], y: &[f64], width: f64) -> Result<(), EnvelopeError> {
    if x.len() != y.len() {
        return Err(EnvelopeError::ShapeMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    if width.is_nan() || width < 0.0 {
        return Err(EnvelopeError::InvalidParameter {
            name: "width",
            value: width,
        });
    }

    Ok(())
}

/// The membership test of the window, shared by both methods so they agree
/// bit for bit.
#[inline(always)]
pub(crate) fn within(a: f64, b: f64, width: f64) -> bool {
    (a - b).abs() < width
}
