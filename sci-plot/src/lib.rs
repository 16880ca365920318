//! Plotting helpers for scientific 2D data on top of plotters.
//!
//! Everything draws onto an explicit [`Canvas`], usually a [`Figure`] which
//! is rendered to a file once complete.

#[macro_use]
extern crate log;

pub mod band;
mod canvas;
pub mod contour;
mod error;
mod figure;
pub mod plot;
mod render;
mod scheme;
pub mod style;

pub use band::{draw_band, draw_band_with};
pub use canvas::{AxisLimits, BinLimits, Canvas, Contours, LegendPosition, Marker, Raster};
pub use envelope::{Envelope, Method};
pub use error::{PlotError, Result};
pub use figure::{Figure, Labels, Mark};
pub use plot::{
    legend, plot_contour, plot_data, plot_filled_contour, plot_image, plot_labels, plot_limits,
    plot_ticks,
};
pub use plotters::style::RGBColor;
pub use scheme::{ColourMap, Scheme, Symbol};
pub use style::{appearance, Style, StyleSource};

pub type Series = Vec<(f64, f64)>;
