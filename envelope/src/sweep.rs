use std::collections::VecDeque;

use crate::{validate, within, Bounds, Envelope, EnvelopeError};

/// Compute the envelope with a sorted sweep.
///
/// Samples are visited in ascending x. Since `|x_i - x_j| < width` holds on a
/// contiguous run of the sorted samples and both ends of that run only move
/// forward as `x_i` grows, the window is tracked with two pointers while
/// monotonic deques hold the candidates for the minimum and the maximum.
/// The membership test is the same one [`compute_envelope`](crate::compute_envelope)
/// uses, so both produce identical output.
pub fn compute_envelope_sweep(
    x: &[f64],
    y: &[f64],
    width: f64,
) -> Result<Envelope, EnvelopeError> {
    validate(x, y, width)?;

    // NaN positions are nobody's neighbour, not even their own
    let mut order: Vec<usize> = (0..x.len()).filter(|&i| !x[i].is_nan()).collect();
    order.sort_by(|&a, &b| x[a].total_cmp(&x[b]));

    let mut bounds: Vec<Option<Bounds>> = vec![None; x.len()];
    // positions into `order`, never indices into `x`
    let mut mins: VecDeque<usize> = VecDeque::new();
    let mut maxs: VecDeque<usize> = VecDeque::new();
    let mut lo = 0;
    let mut hi = 0;

    for &i in &order {
        let xi = x[i];

        // grow the window on the right; everything left of `xi` passes this
        // test, everything beyond `xi + width` fails it
        while hi < order.len() && x[order[hi]] - xi < width {
            let yj = y[order[hi]];
            if !yj.is_nan() {
                while maxs.back().map_or(false, |&k| y[order[k]] <= yj) {
                    maxs.pop_back();
                }
                maxs.push_back(hi);
                while mins.back().map_or(false, |&k| y[order[k]] >= yj) {
                    mins.pop_back();
                }
                mins.push_back(hi);
            }
            hi += 1;
        }

        // shrink the window on the left
        while lo < order.len() && !within(xi, x[order[lo]], width) && x[order[lo]] <= xi {
            lo += 1;
        }
        while mins.front().map_or(false, |&k| k < lo) {
            mins.pop_front();
        }
        while maxs.front().map_or(false, |&k| k < lo) {
            maxs.pop_front();
        }

        if let (Some(&min), Some(&max)) = (mins.front(), maxs.front()) {
            bounds[i] = Some(Bounds {
                lower: y[order[min]],
                upper: y[order[max]],
            });
        }
    }

    let envelope = Envelope::from_bounds(bounds);
    debug!(
        "sweep envelope: n: {}, width: {}, without neighbours: {}",
        x.len(),
        width,
        envelope.missing().len()
    );

    Ok(envelope)
}

#[cfg(test)]
mod tests {
    use nanorand::{Rng, WyRand};

    use super::*;
    use crate::compute_envelope;

    #[test]
    fn concrete_case() {
        if let Err(_) = pretty_env_logger::try_init() {}

        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [5.0, 1.0, 9.0, 3.0];
        let envelope = compute_envelope_sweep(&x, &y, 1.5).unwrap();

        assert_eq!(envelope.lower_values(), vec![Some(1.0), Some(1.0), Some(1.0), Some(3.0)]);
        assert_eq!(envelope.upper_values(), vec![Some(5.0), Some(9.0), Some(9.0), Some(9.0)]);
    }

    #[test]
    fn zero_width() {
        let envelope = compute_envelope_sweep(&[1.0, 1.0, 2.0], &[3.0, 4.0, 5.0], 0.0).unwrap();
        assert_eq!(envelope.missing(), vec![0, 1, 2]);
    }

    #[test]
    fn errors_match_scan() {
        assert_eq!(
            compute_envelope_sweep(&[0.0, 1.0, 2.0], &[0.0; 4], 1.0).unwrap_err(),
            compute_envelope(&[0.0, 1.0, 2.0], &[0.0; 4], 1.0).unwrap_err(),
        );
        assert_eq!(
            compute_envelope_sweep(&[0.0], &[0.0], -1.0).unwrap_err(),
            compute_envelope(&[0.0], &[0.0], -1.0).unwrap_err(),
        );
    }

    #[test]
    fn agrees_with_scan() {
        if let Err(_) = pretty_env_logger::try_init() {}

        let mut rng = WyRand::new_seed(42);
        let widths = [0.0, 0.1, 0.25, 0.5, 1.0, 3.7, 100.0];
        for round in 0..200 {
            let n = rng.generate_range(1_usize..60);
            let x: Vec<f64> = (0..n)
                .map(|_| (rng.generate_range(0_u32..30) as f64) * 0.25 - 3.0)
                .collect();
            let y: Vec<f64> = (0..n).map(|_| rng.generate::<f64>() * 2.0 - 1.0).collect();
            for &width in &widths {
                let scan = compute_envelope(&x, &y, width).unwrap();
                let sweep = compute_envelope_sweep(&x, &y, width).unwrap();
                assert_eq!(scan, sweep, "round {}, width {}, x: {:?}", round, width, x);
            }
        }
    }

    #[test]
    fn agrees_with_scan_on_irregular_positions() {
        let mut rng = WyRand::new_seed(7);
        for _ in 0..100 {
            let n = rng.generate_range(1_usize..40);
            let x: Vec<f64> = (0..n).map(|_| rng.generate::<f64>() * 10.0).collect();
            let y: Vec<f64> = (0..n).map(|_| rng.generate::<f64>()).collect();
            let width = rng.generate::<f64>() * 2.0;
            assert_eq!(
                compute_envelope(&x, &y, width).unwrap(),
                compute_envelope_sweep(&x, &y, width).unwrap()
            );
        }
    }

    #[test]
    fn nan_samples_match_scan() {
        let x = [0.0, f64::NAN, 0.5, 0.7];
        let y = [1.0, 2.0, f64::NAN, -4.0];
        assert_eq!(
            compute_envelope(&x, &y, 1.0).unwrap(),
            compute_envelope_sweep(&x, &y, 1.0).unwrap()
        );
    }
}
