//! Plotting functions, defined once so every figure is drawn consistently.
//!
//! Each function forwards a [`Scheme`] to the primitives of a [`Canvas`].

use nalgebra::DMatrix;

use crate::{
    band::{legend_proxy, BAND_ALPHA},
    AxisLimits, BinLimits, Canvas, Contours, LegendPosition, Marker, PlotError, Raster, Result,
    Scheme,
};

/// Plot `y` against `x` with the symbol, colour, label and size of `scheme`
pub fn plot_data<C: Canvas + ?Sized>(canvas: &mut C, x: &[f64], y: &[f64], scheme: &Scheme) -> Result<()> {
    let marker = Marker::new(scheme.symbol, scheme.colour)
        .label(scheme.label.clone())
        .size(scheme.size);
    canvas.draw_series(x, y, &marker)
}

/// Turn on the legend, unless the position is [`LegendPosition::NoLegend`]
pub fn legend<C: Canvas + ?Sized>(
    canvas: &mut C,
    leg_title: Option<&str>,
    leg_position: LegendPosition,
) -> Result<()> {
    if leg_position == LegendPosition::NoLegend {
        return Ok(());
    }
    canvas.draw_legend(leg_title, leg_position)
}

/// Fix the axis limits, if any are given
pub fn plot_limits<C: Canvas + ?Sized>(canvas: &mut C, limits: Option<AxisLimits>) -> Result<()> {
    match limits {
        Some(limits) => canvas.set_axis_limits(limits),
        None => Ok(()),
    }
}

/// Set the number of major ticks on each axis, minor ticks follow automatically
pub fn plot_ticks<C: Canvas + ?Sized>(canvas: &mut C, xticks: usize, yticks: usize) -> Result<()> {
    canvas.set_tick_density(xticks, yticks)
}

pub fn plot_labels<C: Canvas + ?Sized>(
    canvas: &mut C,
    xlabel: &str,
    ylabel: &str,
    plot_title: Option<&str>,
) -> Result<()> {
    canvas.set_labels(xlabel, ylabel, plot_title)
}

/// Plot gridded data as an image with a colour bar.
///
/// The aspect is chosen such that the plot limits come out square.
pub fn plot_image<C: Canvas + ?Sized>(
    canvas: &mut C,
    data: &DMatrix<f64>,
    bin_limits: BinLimits,
    plot_limits: AxisLimits,
    scheme: &Scheme,
) -> Result<()> {
    let y_span = plot_limits.y_span();
    if y_span == 0.0 || !y_span.is_finite() {
        return Err(PlotError::InvalidParameter {
            name: "plot_limits",
            reason: format!("cannot derive an aspect from a y span of {}", y_span),
        });
    }
    let aspect = plot_limits.x_span() / y_span;

    canvas.draw_raster_with_colorbar(Raster {
        data: data.clone(),
        extent: bin_limits,
        colour_map: scheme.colour_map,
        label: scheme.label.clone(),
        aspect: Some(aspect),
        colour_bar_title: scheme.colour_bar_title.clone(),
    })
}

/// Unfilled contours of `data` at `levels`, labelled inline with the level
/// names of `scheme`
pub fn plot_contour<C: Canvas + ?Sized>(
    canvas: &mut C,
    data: &DMatrix<f64>,
    levels: &[f64],
    scheme: &Scheme,
    bin_limits: BinLimits,
) -> Result<()> {
    canvas.draw_contours(Contours {
        data: data.clone(),
        levels: levels.to_vec(),
        colours: vec![scheme.colour],
        extent: bin_limits,
        level_names: scheme.level_names.clone(),
        filled: false,
        alpha: 1.0,
    })
}

/// Filled contours of `data`.
///
/// The levels are sorted and the data maximum is appended, so `n` levels
/// give `n` coloured intervals. Filled regions get no legend entry, so a
/// proxy point per named level is drawn outside of the visible area.
pub fn plot_filled_contour<C: Canvas + ?Sized>(
    canvas: &mut C,
    data: &DMatrix<f64>,
    levels: &[f64],
    scheme: &Scheme,
    bin_limits: BinLimits,
) -> Result<()> {
    let max = data
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return Err(PlotError::InvalidParameter {
            name: "data",
            reason: "filled contours need at least one finite value".to_string(),
        });
    }
    let mut levels = levels.to_vec();
    levels.sort_by(f64::total_cmp);
    levels.push(max);
    debug!("filled contour levels: {:?}", levels);

    canvas.draw_contours(Contours {
        data: data.clone(),
        levels,
        colours: scheme.colours.clone(),
        extent: bin_limits,
        level_names: scheme.level_names.clone(),
        filled: true,
        alpha: BAND_ALPHA,
    })?;

    let (x, y) = canvas.visible_domain().union(&bin_limits.flatten()).far_outside();
    for (name, colour) in scheme.level_names.iter().zip(&scheme.colours) {
        canvas.draw_point(x, y, &legend_proxy(*colour, Some(name.clone())))?;
    }
    Ok(())
}
