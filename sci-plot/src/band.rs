//! Uncertainty bands around a curve.
//!
//! Vary x by ±width and find the variation in y, then fill between the
//! smallest and largest y for every x.

use envelope::{compute_envelope_with, Envelope, Method};
use plotters::style::RGBColor;

use crate::{AxisLimits, Canvas, Marker, Result, Scheme, Symbol};

/// Opacity of bands and filled contours
pub const BAND_ALPHA: f64 = 0.7;
/// Marker size of legend proxies
pub const PROXY_SIZE: u32 = 15;

/// Marker for a legend entry of a filled region, filled regions get no
/// legend entry of their own
pub(crate) fn legend_proxy(colour: RGBColor, label: Option<String>) -> Marker {
    Marker::new(Symbol::Square, colour)
        .label(label)
        .size(PROXY_SIZE)
        .alpha(BAND_ALPHA)
}

/// Plot a band around the curve given by `x` and `y`.
///
/// Issues one fill between the envelopes and one legend proxy point outside
/// of the visible domain. Samples without any neighbour within `width` are
/// left out of the fill, with a single warning.
pub fn draw_band<C: Canvas + ?Sized>(
    canvas: &mut C,
    x: &[f64],
    y: &[f64],
    width: f64,
    scheme: &Scheme,
) -> Result<()> {
    draw_band_with(canvas, Method::Scan, x, y, width, scheme)
}

/// Like [`draw_band`], computing the envelope with the given `method`
pub fn draw_band_with<C: Canvas + ?Sized>(
    canvas: &mut C,
    method: Method,
    x: &[f64],
    y: &[f64],
    width: f64,
    scheme: &Scheme,
) -> Result<()> {
    let envelope = compute_envelope_with(method, x, y, width)?;

    let (kept, dropped) = finite_samples(x, &envelope);
    if dropped > 0 {
        warn!(
            "band {:?}: left out {} of {} samples without a finite envelope within width {}",
            scheme.label.as_deref().unwrap_or(""),
            dropped,
            x.len(),
            width
        );
    }

    if !kept.is_empty() {
        let xs: Vec<f64> = kept.iter().map(|k| k.0).collect();
        let lower: Vec<f64> = kept.iter().map(|k| k.1).collect();
        let upper: Vec<f64> = kept.iter().map(|k| k.2).collect();
        canvas.fill_between(&xs, &lower, &upper, scheme.colour, BAND_ALPHA)?;
    }

    // whatever else is on the canvas widens the axes as well
    let mut visible = canvas.visible_domain();
    if let Some(extent) = AxisLimits::enclosing(kept.iter().flat_map(|k| [(k.0, k.1), (k.0, k.2)])) {
        visible = visible.union(&extent);
    }
    let (px, py) = visible.far_outside();
    canvas.draw_point(px, py, &legend_proxy(scheme.colour, scheme.label.clone()))
}

/// The `(x, lower, upper)` triples with a finite envelope, ordered by x, and
/// the number of samples left out
pub(crate) fn finite_samples(x: &[f64], envelope: &Envelope) -> (Vec<(f64, f64, f64)>, usize) {
    let mut kept: Vec<(f64, f64, f64)> = x
        .iter()
        .zip(envelope.iter())
        .filter_map(|(x, b)| b.map(|b| (*x, b.lower, b.upper)))
        .filter(|(x, lower, upper)| x.is_finite() && lower.is_finite() && upper.is_finite())
        .collect();
    kept.sort_by(|a, b| a.0.total_cmp(&b.0));
    let dropped = x.len() - kept.len();

    (kept, dropped)
}
