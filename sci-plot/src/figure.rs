use plotters::style::RGBColor;

use crate::{
    AxisLimits, Canvas, Contours, LegendPosition, Marker, PlotError, Raster, Result, Style,
};

/// One recorded drawing request
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Series {
        points: Vec<(f64, f64)>,
        marker: Marker,
    },
    Point {
        at: (f64, f64),
        marker: Marker,
    },
    Fill {
        x: Vec<f64>,
        lower: Vec<f64>,
        upper: Vec<f64>,
        colour: RGBColor,
        alpha: f64,
    },
    Raster(Raster),
    Contours(Contours),
}

impl Mark {
    /// Data extent used for autoscaling.
    /// Single points never count, they are legend proxies or annotations.
    fn extent(&self) -> Option<AxisLimits> {
        match self {
            Mark::Series { points, .. } => AxisLimits::enclosing(points.iter().copied()),
            Mark::Point { .. } => None,
            Mark::Fill { x, lower, upper, .. } => AxisLimits::enclosing(
                x.iter()
                    .copied()
                    .zip(lower.iter().copied())
                    .chain(x.iter().copied().zip(upper.iter().copied())),
            ),
            Mark::Raster(raster) => Some(raster.extent.flatten()),
            Mark::Contours(contours) => Some(contours.extent.flatten()),
        }
    }
}

/// Axis descriptions and plot caption
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Labels {
    pub x: String,
    pub y: String,
    pub title: Option<String>,
}

/// A figure under construction.
///
/// The figure records every request made through [`Canvas`] and draws them
/// in order once it is rendered or saved. It is owned by whoever builds the
/// plot, nothing about it is global.
#[derive(Debug, Clone)]
pub struct Figure {
    pub(crate) style: Style,
    pub(crate) marks: Vec<Mark>,
    pub(crate) limits: Option<AxisLimits>,
    pub(crate) ticks: Option<(usize, usize)>,
    pub(crate) labels: Labels,
    pub(crate) legend: Option<(Option<String>, LegendPosition)>,
}

impl Figure {
    /// Create a new, empty figure with the given appearance
    pub fn new(style: Style) -> Self {
        Self {
            style,
            marks: Vec::new(),
            limits: None,
            ticks: None,
            labels: Labels::default(),
            legend: None,
        }
    }

    #[inline(always)]
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Everything drawn so far, in request order
    #[inline(always)]
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    #[inline(always)]
    pub fn ticks(&self) -> Option<(usize, usize)> {
        self.ticks
    }

    #[inline(always)]
    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    #[inline(always)]
    pub fn legend(&self) -> Option<(Option<&str>, LegendPosition)> {
        self.legend.as_ref().map(|(title, pos)| (title.as_deref(), *pos))
    }

    /// The range the axes will cover: the explicit limits if set, otherwise
    /// everything drawn plus a small margin
    pub fn domain(&self) -> AxisLimits {
        if let Some(limits) = self.limits {
            return limits;
        }
        let extent = self
            .marks
            .iter()
            .filter_map(Mark::extent)
            .reduce(|a, b| a.union(&b));
        match extent {
            Some(extent) => {
                let (x_min, x_max) = pad(extent.x_min, extent.x_max);
                let (y_min, y_max) = pad(extent.y_min, extent.y_max);
                AxisLimits::new(x_min, x_max, y_min, y_max)
            }
            None => AxisLimits::new(0.0, 1.0, 0.0, 1.0),
        }
    }
}

const AUTOSCALE_MARGIN: f64 = 0.05;

fn pad(min: f64, max: f64) -> (f64, f64) {
    let span = max - min;
    if span > 0.0 && span.is_finite() {
        (min - span * AUTOSCALE_MARGIN, max + span * AUTOSCALE_MARGIN)
    } else {
        (min - 0.5, max + 0.5)
    }
}

fn check_alpha(alpha: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&alpha) {
        return Err(PlotError::InvalidParameter {
            name: "alpha",
            reason: format!("{} is not within 0..=1", alpha),
        });
    }
    Ok(())
}

impl Canvas for Figure {
    fn draw_series(&mut self, x: &[f64], y: &[f64], marker: &Marker) -> Result<()> {
        PlotError::check_len("y", x.len(), y.len())?;
        check_alpha(marker.alpha)?;
        trace!("series of {} points, {:?}", x.len(), marker);

        self.marks.push(Mark::Series {
            points: x.iter().copied().zip(y.iter().copied()).collect(),
            marker: marker.clone(),
        });
        Ok(())
    }

    fn draw_legend(&mut self, title: Option<&str>, position: LegendPosition) -> Result<()> {
        self.legend = Some((title.map(str::to_string), position));
        Ok(())
    }

    fn set_axis_limits(&mut self, limits: AxisLimits) -> Result<()> {
        let valid = [limits.x_min, limits.x_max, limits.y_min, limits.y_max]
            .iter()
            .all(|v| v.is_finite())
            && limits.x_span() != 0.0
            && limits.y_span() != 0.0;
        if !valid {
            return Err(PlotError::InvalidParameter {
                name: "limits",
                reason: format!("{:?} does not span a finite, non-empty area", limits),
            });
        }
        self.limits = Some(limits);
        Ok(())
    }

    fn axis_limits(&self) -> Option<AxisLimits> {
        self.limits
    }

    fn visible_domain(&self) -> AxisLimits {
        self.domain()
    }

    fn set_tick_density(&mut self, xticks: usize, yticks: usize) -> Result<()> {
        if xticks == 0 || yticks == 0 {
            return Err(PlotError::InvalidParameter {
                name: "ticks",
                reason: "at least one major tick per axis is required".to_string(),
            });
        }
        self.ticks = Some((xticks, yticks));
        Ok(())
    }

    fn set_labels(&mut self, xlabel: &str, ylabel: &str, title: Option<&str>) -> Result<()> {
        self.labels = Labels {
            x: xlabel.to_string(),
            y: ylabel.to_string(),
            title: title.map(str::to_string),
        };
        Ok(())
    }

    fn draw_raster_with_colorbar(&mut self, raster: Raster) -> Result<()> {
        if raster.data.is_empty() {
            return Err(PlotError::InvalidParameter {
                name: "data",
                reason: "an image needs at least one cell".to_string(),
            });
        }
        self.marks.push(Mark::Raster(raster));
        Ok(())
    }

    fn draw_contours(&mut self, contours: Contours) -> Result<()> {
        let (nx, ny) = contours.data.shape();
        if nx < 2 || ny < 2 {
            return Err(PlotError::InvalidParameter {
                name: "data",
                reason: format!("contours need at least a 2x2 grid, got {}x{}", nx, ny),
            });
        }
        if contours.levels.is_empty() || contours.colours.is_empty() {
            return Err(PlotError::InvalidParameter {
                name: "levels",
                reason: "contours need at least one level and one colour".to_string(),
            });
        }
        if contours.filled && contours.levels.windows(2).any(|w| w[0] > w[1]) {
            return Err(PlotError::InvalidParameter {
                name: "levels",
                reason: "filled contour levels must be ascending".to_string(),
            });
        }
        check_alpha(contours.alpha)?;

        self.marks.push(Mark::Contours(contours));
        Ok(())
    }

    fn fill_between(
        &mut self,
        x: &[f64],
        lower: &[f64],
        upper: &[f64],
        colour: RGBColor,
        alpha: f64,
    ) -> Result<()> {
        PlotError::check_len("lower", x.len(), lower.len())?;
        PlotError::check_len("upper", x.len(), upper.len())?;
        check_alpha(alpha)?;

        self.marks.push(Mark::Fill {
            x: x.to_vec(),
            lower: lower.to_vec(),
            upper: upper.to_vec(),
            colour,
            alpha,
        });
        Ok(())
    }

    fn draw_point(&mut self, x: f64, y: f64, marker: &Marker) -> Result<()> {
        check_alpha(marker.alpha)?;
        self.marks.push(Mark::Point {
            at: (x, y),
            marker: marker.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::DMatrix;

    use super::*;
    use crate::{BinLimits, ColourMap, Symbol};

    fn figure() -> Figure {
        Figure::new(Style::default())
    }

    #[test]
    fn empty_figure_has_unit_domain() {
        assert_eq!(figure().domain(), AxisLimits::new(0.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn autoscale_pads_and_ignores_points() {
        if let Err(_) = pretty_env_logger::try_init() {}

        let mut fig = figure();
        let marker = Marker::new(Symbol::Circle, RGBColor(0, 0, 0));
        fig.draw_series(&[0.0, 10.0], &[-1.0, 1.0], &marker).unwrap();
        fig.draw_point(1e6, 1e6, &marker).unwrap();

        assert_eq!(fig.domain(), AxisLimits::new(-0.5, 10.5, -1.1, 1.1));
    }

    #[test]
    fn degenerate_extent_is_widened() {
        let mut fig = figure();
        let marker = Marker::new(Symbol::Circle, RGBColor(0, 0, 0));
        fig.draw_series(&[2.0], &[3.0], &marker).unwrap();
        assert_eq!(fig.domain(), AxisLimits::new(1.5, 2.5, 2.5, 3.5));
    }

    #[test]
    fn explicit_limits_win() {
        let mut fig = figure();
        let marker = Marker::new(Symbol::Line, RGBColor(0, 0, 0));
        fig.draw_series(&[0.0, 100.0], &[0.0, 100.0], &marker).unwrap();
        let limits = AxisLimits::new(0.0, 1.0, 0.0, 2.0);
        fig.set_axis_limits(limits).unwrap();
        assert_eq!(fig.domain(), limits);
        assert_eq!(fig.axis_limits(), Some(limits));
    }

    #[test]
    fn rasters_and_fills_take_part_in_autoscale() {
        let mut fig = figure();
        fig.fill_between(&[0.0, 1.0], &[0.0, 0.0], &[2.0, 4.0], RGBColor(0, 0, 0), 0.5)
            .unwrap();
        fig.draw_raster_with_colorbar(Raster {
            data: DMatrix::from_element(2, 2, 1.0),
            extent: BinLimits::new((-1.0, 1.0), (0.0, 1.0)),
            colour_map: ColourMap::Viridis,
            label: None,
            aspect: None,
            colour_bar_title: None,
        })
        .unwrap();
        assert_eq!(fig.domain(), AxisLimits::new(-1.1, 1.1, -0.2, 4.2));
    }

    #[test]
    fn rejects_bad_input() {
        let mut fig = figure();
        let marker = Marker::new(Symbol::Line, RGBColor(0, 0, 0));
        assert!(matches!(
            fig.draw_series(&[0.0, 1.0], &[0.0], &marker),
            Err(PlotError::ShapeMismatch { what: "y", expected: 2, found: 1 })
        ));
        assert!(fig.fill_between(&[0.0], &[0.0], &[], RGBColor(0, 0, 0), 0.5).is_err());
        assert!(fig.draw_point(0.0, 0.0, &marker.clone().alpha(1.5)).is_err());
        assert!(fig.set_axis_limits(AxisLimits::new(0.0, 0.0, 0.0, 1.0)).is_err());
        assert!(fig.set_axis_limits(AxisLimits::new(0.0, f64::NAN, 0.0, 1.0)).is_err());
        assert!(fig.set_tick_density(0, 4).is_err());
        assert!(fig.marks().is_empty());
    }

    #[test]
    fn contour_validation() {
        let mut fig = figure();
        let contours = Contours {
            data: DMatrix::from_element(3, 3, 0.0),
            levels: vec![2.0, 1.0],
            colours: vec![RGBColor(0, 0, 0)],
            extent: BinLimits::new((0.0, 1.0), (0.0, 1.0)),
            level_names: Vec::new(),
            filled: true,
            alpha: 0.7,
        };
        assert!(fig.draw_contours(contours.clone()).is_err());

        let unfilled = Contours {
            filled: false,
            ..contours.clone()
        };
        assert!(fig.draw_contours(unfilled).is_ok());

        let tiny = Contours {
            data: DMatrix::from_element(1, 3, 0.0),
            levels: vec![1.0, 2.0],
            ..contours
        };
        assert!(fig.draw_contours(tiny).is_err());
        assert_eq!(fig.marks().len(), 1);
    }

    #[test]
    fn records_labels_ticks_and_legend() {
        let mut fig = figure();
        fig.set_labels("x", "y", Some("title")).unwrap();
        fig.set_tick_density(5, 3).unwrap();
        fig.draw_legend(Some("legend"), LegendPosition::LowerLeft).unwrap();

        assert_eq!(fig.labels().x, "x");
        assert_eq!(fig.labels().title.as_deref(), Some("title"));
        assert_eq!(fig.ticks(), Some((5, 3)));
        assert_eq!(fig.legend(), Some((Some("legend"), LegendPosition::LowerLeft)));
    }
}
