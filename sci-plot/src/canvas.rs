use std::str::FromStr;

use nalgebra::DMatrix;
use plotters::style::RGBColor;

use crate::{PlotError, Result, Symbol};

/// Visible range of both axes, `[xmin, xmax, ymin, ymax]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLimits {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl AxisLimits {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// The smallest limits enclosing all finite `points`, `None` if there are none
    pub fn enclosing(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        points
            .into_iter()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .fold(None, |acc: Option<AxisLimits>, (x, y)| {
                Some(match acc {
                    None => AxisLimits::new(x, x, y, y),
                    Some(l) => AxisLimits::new(l.x_min.min(x), l.x_max.max(x), l.y_min.min(y), l.y_max.max(y)),
                })
            })
    }

    /// The smallest limits enclosing both `self` and `other`
    pub fn union(&self, other: &AxisLimits) -> Self {
        AxisLimits::new(
            self.x_min.min(other.x_min),
            self.x_max.max(other.x_max),
            self.y_min.min(other.y_min),
            self.y_max.max(other.y_max),
        )
    }

    #[inline(always)]
    pub fn x_span(&self) -> f64 {
        self.x_max - self.x_min
    }

    #[inline(always)]
    pub fn y_span(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// A point guaranteed to lie outside of these limits, far away from them.
    /// Used to place legend proxies that must not show up in the plot.
    pub fn far_outside(&self) -> (f64, f64) {
        let reach = |min: f64, max: f64| 10.0 * (min.abs().max(max.abs()) + (max - min).abs() + 1.0);
        (-reach(self.x_min, self.x_max), -reach(self.y_min, self.y_max))
    }
}

/// Extent of a gridded data set, `[[xmin, xmax], [ymin, ymax]]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinLimits {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

impl BinLimits {
    pub fn new(x: (f64, f64), y: (f64, f64)) -> Self {
        Self { x, y }
    }

    /// Flattened to `[xmin, xmax, ymin, ymax]`
    pub fn flatten(&self) -> AxisLimits {
        AxisLimits::new(self.x.0, self.x.1, self.y.0, self.y.1)
    }
}

/// Where the legend goes inside the plotting area
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LegendPosition {
    #[default]
    Best,
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
    Right,
    CenterLeft,
    CenterRight,
    LowerCenter,
    UpperCenter,
    Center,
    /// Suppress the legend altogether
    NoLegend,
}

impl FromStr for LegendPosition {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self> {
        let pos = match s.trim().to_ascii_lowercase().as_str() {
            "best" => LegendPosition::Best,
            "upper right" => LegendPosition::UpperRight,
            "upper left" => LegendPosition::UpperLeft,
            "lower left" => LegendPosition::LowerLeft,
            "lower right" => LegendPosition::LowerRight,
            "right" => LegendPosition::Right,
            "center left" => LegendPosition::CenterLeft,
            "center right" => LegendPosition::CenterRight,
            "lower center" => LegendPosition::LowerCenter,
            "upper center" => LegendPosition::UpperCenter,
            "center" => LegendPosition::Center,
            "no legend" => LegendPosition::NoLegend,
            other => {
                return Err(PlotError::InvalidParameter {
                    name: "leg_position",
                    reason: format!("unknown legend position `{}`", other),
                })
            }
        };
        Ok(pos)
    }
}

/// How a series or a single point is drawn
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub symbol: Symbol,
    pub colour: RGBColor,
    /// Legend entry, `None` if the series should not appear in the legend
    pub label: Option<String>,
    /// Marker size in pixels, lines are drawn with the line width of the style
    pub size: u32,
    /// Opacity in `0.0..=1.0`
    pub alpha: f64,
}

impl Marker {
    pub fn new(symbol: Symbol, colour: RGBColor) -> Self {
        Self {
            symbol,
            colour,
            label: None,
            size: 5,
            alpha: 1.0,
        }
    }

    pub fn label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }
}

/// A gridded image with a colour bar.
/// `data[(ix, iy)]` is the value of the cell in column `ix` and row `iy`.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pub data: DMatrix<f64>,
    pub extent: BinLimits,
    pub colour_map: crate::ColourMap,
    pub label: Option<String>,
    /// Screen length of one y unit relative to one x unit, `None` to fill the area
    pub aspect: Option<f64>,
    pub colour_bar_title: Option<String>,
}

/// Contours of a gridded data set, laid out like [`Raster::data`]
#[derive(Debug, Clone, PartialEq)]
pub struct Contours {
    pub data: DMatrix<f64>,
    pub levels: Vec<f64>,
    /// Either one colour for all levels or one per level (per band when filled)
    pub colours: Vec<RGBColor>,
    pub extent: BinLimits,
    /// Inline label per level, empty for no labels
    pub level_names: Vec<String>,
    /// Fill the bands between consecutive levels instead of tracing lines
    pub filled: bool,
    pub alpha: f64,
}

/// The primitive operations of a 2D rendering backend.
///
/// A canvas is an explicit drawing context: every plotting helper receives
/// the canvas it draws on instead of reaching for implicit global state.
pub trait Canvas {
    /// Draw `y` against `x` with the given marker
    fn draw_series(&mut self, x: &[f64], y: &[f64], marker: &Marker) -> Result<()>;

    /// Show a legend of all labelled marks
    fn draw_legend(&mut self, title: Option<&str>, position: LegendPosition) -> Result<()>;

    /// Fix the visible range of both axes
    fn set_axis_limits(&mut self, limits: AxisLimits) -> Result<()>;

    /// The limits set with [`Canvas::set_axis_limits`], if any
    fn axis_limits(&self) -> Option<AxisLimits>;

    /// The range the axes cover with everything drawn so far, the explicit
    /// limits if set
    fn visible_domain(&self) -> AxisLimits;

    /// Maximum number of major ticks on each axis
    fn set_tick_density(&mut self, xticks: usize, yticks: usize) -> Result<()>;

    /// Axis descriptions and the optional caption above the plot
    fn set_labels(&mut self, xlabel: &str, ylabel: &str, title: Option<&str>) -> Result<()>;

    fn draw_raster_with_colorbar(&mut self, raster: Raster) -> Result<()>;

    fn draw_contours(&mut self, contours: Contours) -> Result<()>;

    /// Fill the region between `lower` and `upper` over `x`
    fn fill_between(
        &mut self,
        x: &[f64],
        lower: &[f64],
        upper: &[f64],
        colour: RGBColor,
        alpha: f64,
    ) -> Result<()>;

    /// Draw a single marker at `(x, y)`
    fn draw_point(&mut self, x: f64, y: f64, marker: &Marker) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legend_positions_parse() {
        assert_eq!("upper right".parse::<LegendPosition>().unwrap(), LegendPosition::UpperRight);
        assert_eq!("No Legend".parse::<LegendPosition>().unwrap(), LegendPosition::NoLegend);
        assert!("somewhere".parse::<LegendPosition>().is_err());
    }

    #[test]
    fn enclosing_skips_non_finite() {
        let limits = AxisLimits::enclosing(vec![(0.0, 1.0), (f64::INFINITY, 3.0), (2.0, -1.0)]).unwrap();
        assert_eq!(limits, AxisLimits::new(0.0, 2.0, -1.0, 1.0));
        assert!(AxisLimits::enclosing(Vec::new()).is_none());
    }

    #[test]
    fn far_outside_is_outside() {
        for limits in [
            AxisLimits::new(0.0, 1.0, 0.0, 1.0),
            AxisLimits::new(-50.0, -20.0, 100.0, 300.0),
            AxisLimits::new(-1e6, 1e6, -0.001, 0.001),
        ] {
            let (x, y) = limits.far_outside();
            assert!(x < limits.x_min);
            assert!(y < limits.y_min);
        }
    }

    #[test]
    fn bin_limits_flatten() {
        let bins = BinLimits::new((0.0, 2.0), (-1.0, 1.0));
        assert_eq!(bins.flatten(), AxisLimits::new(0.0, 2.0, -1.0, 1.0));
    }
}
