use crate::{validate, within, Bounds, Envelope, EnvelopeError};

/// Compute the envelope by comparing every sample against every other one.
///
/// For each index `i`, every `j` (including `i` itself) with
/// `|x[i] - x[j]| < width` contributes `y[j]` to the bounds of `i`.
/// With `width == 0` no sample satisfies the strict test, not even the sample
/// itself, so every index ends up without bounds.
///
/// # Arguments:
/// x: sample positions, in any order
/// y: sample values, same length as `x`
/// width: half-width of the horizontal window, must be non-negative
pub fn compute_envelope(x: &[f64], y: &[f64], width: f64) -> Result<Envelope, EnvelopeError> {
    validate(x, y, width)?;

    let bounds: Vec<Option<Bounds>> = x
        .iter()
        .map(|xi| {
            let mut b: Option<Bounds> = None;
            for (xj, yj) in x.iter().zip(y) {
                if yj.is_nan() || !within(*xi, *xj, width) {
                    continue;
                }
                match b.as_mut() {
                    Some(b) => b.include(*yj),
                    None => b = Some(Bounds::new(*yj)),
                }
            }
            b
        })
        .collect();

    let envelope = Envelope::from_bounds(bounds);
    debug!(
        "scan envelope: n: {}, width: {}, without neighbours: {}",
        x.len(),
        width,
        envelope.missing().len()
    );

    Ok(envelope)
}
