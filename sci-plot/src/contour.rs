//! Contour geometry over gridded data.
//!
//! Grid values sit on nodes spread evenly over the bin limits, node `(ix, iy)`
//! at `data[(ix, iy)]`. Lines are traced cell by cell with marching squares,
//! filled contours colour whole cells by the band their mean value falls in.

use nalgebra::DMatrix;

use crate::{AxisLimits, BinLimits};

/// A straight piece of a contour line in data coordinates
pub type Segment = [(f64, f64); 2];

/// `n` evenly spaced positions covering `min..=max`
pub fn node_positions(min: f64, max: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![(min + max) / 2.0],
        _ => (0..n)
            .map(|i| min + (max - min) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

// corner order: (x0, y0), (x1, y0), (x1, y1), (x0, y1)
// edge e joins corner e and corner (e + 1) % 4
fn crossing(edge: usize, corners: &[(f64, f64); 4], values: &[f64; 4], level: f64) -> (f64, f64) {
    let (a, b) = (edge, (edge + 1) % 4);
    let (va, vb) = (values[a], values[b]);
    let t = if vb == va {
        0.5
    } else {
        ((level - va) / (vb - va)).clamp(0.0, 1.0)
    };
    (
        corners[a].0 + (corners[b].0 - corners[a].0) * t,
        corners[a].1 + (corners[b].1 - corners[a].1) * t,
    )
}

/// Which edges the level crosses for one cell, as pairs to connect
fn edge_pairs(case: u8, centre_above: bool) -> &'static [(usize, usize)] {
    match case {
        0 | 15 => &[],
        1 | 14 => &[(3, 0)],
        2 | 13 => &[(0, 1)],
        3 | 12 => &[(3, 1)],
        4 | 11 => &[(1, 2)],
        6 | 9 => &[(0, 2)],
        7 | 8 => &[(2, 3)],
        5 if centre_above => &[(0, 1), (2, 3)],
        5 => &[(3, 0), (1, 2)],
        10 if centre_above => &[(3, 0), (1, 2)],
        10 => &[(0, 1), (2, 3)],
        _ => &[],
    }
}

/// Trace the contour of `data` at `level` with marching squares
pub fn trace(data: &DMatrix<f64>, extent: &BinLimits, level: f64) -> Vec<Segment> {
    let (nx, ny) = data.shape();
    if nx < 2 || ny < 2 {
        return Vec::new();
    }
    let xs = node_positions(extent.x.0, extent.x.1, nx);
    let ys = node_positions(extent.y.0, extent.y.1, ny);

    let mut segments = Vec::new();
    for ix in 0..nx - 1 {
        for iy in 0..ny - 1 {
            let values = [
                data[(ix, iy)],
                data[(ix + 1, iy)],
                data[(ix + 1, iy + 1)],
                data[(ix, iy + 1)],
            ];
            if values.iter().any(|v| v.is_nan()) {
                continue;
            }
            let corners = [
                (xs[ix], ys[iy]),
                (xs[ix + 1], ys[iy]),
                (xs[ix + 1], ys[iy + 1]),
                (xs[ix], ys[iy + 1]),
            ];
            let case = values
                .iter()
                .enumerate()
                .fold(0_u8, |acc, (bit, v)| acc | (((*v > level) as u8) << bit));
            let centre_above = values.iter().sum::<f64>() / 4.0 > level;

            for &(a, b) in edge_pairs(case, centre_above) {
                segments.push([
                    crossing(a, &corners, &values, level),
                    crossing(b, &corners, &values, level),
                ]);
            }
        }
    }
    segments
}

/// Index of the band `value` falls in, bands being `levels[i]..levels[i + 1]`.
/// The topmost band includes its upper level. `levels` must be ascending.
pub fn band_index(value: f64, levels: &[f64]) -> Option<usize> {
    if levels.len() < 2 || value.is_nan() {
        return None;
    }
    let last = levels.len() - 2;
    (0..=last).find(|&i| {
        let upper_ok = if i == last {
            value <= levels[i + 1]
        } else {
            value < levels[i + 1]
        };
        value >= levels[i] && upper_ok
    })
}

/// Every grid cell whose mean value falls inside one of the bands, with its
/// rectangle in data coordinates
pub fn filled_cells(data: &DMatrix<f64>, extent: &BinLimits, levels: &[f64]) -> Vec<(AxisLimits, usize)> {
    let (nx, ny) = data.shape();
    if nx < 2 || ny < 2 {
        return Vec::new();
    }
    let xs = node_positions(extent.x.0, extent.x.1, nx);
    let ys = node_positions(extent.y.0, extent.y.1, ny);

    let mut cells = Vec::new();
    for ix in 0..nx - 1 {
        for iy in 0..ny - 1 {
            let mean = (data[(ix, iy)] + data[(ix + 1, iy)] + data[(ix + 1, iy + 1)] + data[(ix, iy + 1)]) / 4.0;
            if let Some(band) = band_index(mean, levels) {
                cells.push((AxisLimits::new(xs[ix], xs[ix + 1], ys[iy], ys[iy + 1]), band));
            }
        }
    }
    cells
}

/// Where to put an inline label: the middle of the longest segment
pub fn label_anchor(segments: &[Segment]) -> Option<(f64, f64)> {
    let length = |s: &Segment| (s[1].0 - s[0].0).hypot(s[1].1 - s[0].1);
    segments
        .iter()
        .max_by(|a, b| length(a).total_cmp(&length(b)))
        .map(|s| ((s[0].0 + s[1].0) / 2.0, (s[0].1 + s[1].1) / 2.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> BinLimits {
        BinLimits::new((0.0, 1.0), (0.0, 1.0))
    }

    #[test]
    fn nodes_cover_the_extent() {
        assert_eq!(node_positions(0.0, 1.0, 3), vec![0.0, 0.5, 1.0]);
        assert_eq!(node_positions(2.0, 4.0, 1), vec![3.0]);
        assert!(node_positions(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn single_corner_above() {
        // only (x1, y0) is above the level
        let data = DMatrix::from_row_slice(2, 2, &[0.0, 0.0, 2.0, 0.0]);
        let segments = trace(&data, &unit(), 1.0);
        assert_eq!(segments, vec![[(0.5, 0.0), (1.0, 0.5)]]);
    }

    #[test]
    fn vertical_split() {
        // left column low, right column high: a vertical line at x = 0.5
        let data = DMatrix::from_row_slice(2, 2, &[0.0, 0.0, 2.0, 2.0]);
        let segments = trace(&data, &unit(), 1.0);
        assert_eq!(segments, vec![[(0.5, 0.0), (0.5, 1.0)]]);
    }

    #[test]
    fn saddle_yields_two_segments() {
        let data = DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 2.0]);
        let segments = trace(&data, &unit(), 1.0);
        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn flat_grid_has_no_contour() {
        let data = DMatrix::from_element(4, 3, 1.0);
        assert!(trace(&data, &unit(), 2.0).is_empty());
        assert!(trace(&DMatrix::from_element(1, 3, 0.0), &unit(), 0.5).is_empty());
    }

    #[test]
    fn bands() {
        let levels = [1.0, 2.0, 5.0];
        assert_eq!(band_index(0.5, &levels), None);
        assert_eq!(band_index(1.0, &levels), Some(0));
        assert_eq!(band_index(2.0, &levels), Some(1));
        assert_eq!(band_index(5.0, &levels), Some(1));
        assert_eq!(band_index(5.1, &levels), None);
        assert_eq!(band_index(1.0, &[1.0]), None);
    }

    #[test]
    fn cells_by_band() {
        let data = DMatrix::from_row_slice(3, 2, &[0.0, 0.0, 2.0, 2.0, 4.0, 4.0]);
        let cells = filled_cells(&data, &BinLimits::new((0.0, 2.0), (0.0, 1.0)), &[0.5, 2.5, 4.0]);
        assert_eq!(
            cells,
            vec![
                (AxisLimits::new(0.0, 1.0, 0.0, 1.0), 0),
                (AxisLimits::new(1.0, 2.0, 0.0, 1.0), 1),
            ]
        );
    }

    #[test]
    fn anchor_on_longest_segment() {
        let segments = vec![[(0.0, 0.0), (1.0, 0.0)], [(0.0, 1.0), (0.0, 5.0)]];
        assert_eq!(label_anchor(&segments), Some((0.0, 3.0)));
        assert_eq!(label_anchor(&[]), None);
    }
}
