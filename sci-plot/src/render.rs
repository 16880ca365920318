use std::{fs, path::Path};

use plotters::{
    chart::SeriesAnno,
    coord::{types::RangedCoordf64, Shift},
    element::DashedPathElement,
    prelude::*,
};

use crate::{
    contour, figure::Mark, AxisLimits, Contours, Figure, LegendPosition, Marker, PlotError,
    Raster, Result, Symbol,
};

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

const LABEL_AREA: u32 = 60;
const MINOR_LINES: usize = 4;
const COLOUR_BAR_STEPS: usize = 128;
const COLOUR_BAR_TICKS: usize = 4;
// dash and gap length of dashed contours, in pixels
const DASH: i32 = 6;
const DASH_GAP: i32 = 4;

impl Figure {
    /// Draw the figure onto `root`
    pub fn render<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let style = &self.style;
        let family = style.text_family();
        let domain = self.domain();
        debug!("rendering {} marks over {:?}", self.marks.len(), domain);

        root.fill(&style.background).map_err(PlotError::backend)?;

        let raster = self.marks.iter().find_map(|m| match m {
            Mark::Raster(raster) => Some(raster),
            _ => None,
        });
        let (chart_area, bar_area) = match raster {
            Some(_) => {
                let (upper, lower) = root.split_vertically((85).percent_height());
                (upper, Some(lower))
            }
            None => (root.clone(), None),
        };
        let chart_area = match raster.and_then(|r| r.aspect) {
            Some(aspect) => fit_aspect(&chart_area, &domain, aspect),
            None => chart_area,
        };

        let mut builder = ChartBuilder::on(&chart_area);
        builder
            .margin(style.margin)
            .x_label_area_size(LABEL_AREA)
            .y_label_area_size(LABEL_AREA);
        if let Some(title) = &self.labels.title {
            builder.caption(title, (family, style.title_font_size).into_font());
        }
        let mut chart = builder
            .build_cartesian_2d(domain.x_min..domain.x_max, domain.y_min..domain.y_max)
            .map_err(PlotError::backend)?;

        let mut mesh = chart.configure_mesh();
        mesh.label_style((family, style.font_size).into_font())
            .axis_desc_style((family, style.label_font_size).into_font());
        if let Some((xticks, yticks)) = self.ticks {
            mesh.x_labels(xticks).y_labels(yticks).max_light_lines(MINOR_LINES);
        }
        if !style.grid {
            mesh.disable_mesh();
        }
        if !self.labels.x.is_empty() {
            mesh.x_desc(self.labels.x.as_str());
        }
        if !self.labels.y.is_empty() {
            mesh.y_desc(self.labels.y.as_str());
        }
        mesh.draw().map_err(PlotError::backend)?;

        // a legend title is an entry without a glyph, drawn first so it heads the legend
        if let Some((Some(title), position)) = &self.legend {
            if *position != LegendPosition::NoLegend {
                chart
                    .draw_series(LineSeries::new(Vec::<(f64, f64)>::new(), TRANSPARENT))
                    .map_err(PlotError::backend)?
                    .label(title.as_str())
                    .legend(|(x, y)| PathElement::new(vec![(x, y)], TRANSPARENT));
            }
        }

        for mark in &self.marks {
            match mark {
                Mark::Series { points, marker } => draw_markers(&mut chart, points, marker, style.line_width)?,
                Mark::Point { at, marker } => draw_markers(&mut chart, &[*at], marker, style.line_width)?,
                Mark::Fill {
                    x,
                    lower,
                    upper,
                    colour,
                    alpha,
                } => {
                    // upper edge left to right, lower edge back
                    let outline: Vec<(f64, f64)> = x
                        .iter()
                        .copied()
                        .zip(upper.iter().copied())
                        .chain(x.iter().copied().zip(lower.iter().copied()).rev())
                        .collect();
                    chart
                        .draw_series(std::iter::once(Polygon::new(outline, colour.mix(*alpha).filled())))
                        .map_err(PlotError::backend)?;
                }
                Mark::Raster(raster) => draw_raster(&mut chart, raster)?,
                Mark::Contours(contours) => draw_contours(&mut chart, contours, family, style.font_size, style.line_width)?,
            }
        }

        if let Some((_, position)) = &self.legend {
            if let Some(position) = series_label_position(*position) {
                chart
                    .configure_series_labels()
                    .position(position)
                    .label_font((family, style.legend_font_size).into_font())
                    .background_style(WHITE.mix(0.8))
                    .border_style(BLACK)
                    .draw()
                    .map_err(PlotError::backend)?;
            }
        }

        if let (Some(raster), Some(bar_area)) = (raster, bar_area) {
            draw_colour_bar(&bar_area, raster, family, style.font_size)?;
        }

        Ok(())
    }

    /// Render the figure into the file at `path` and release it.
    /// SVG output is chosen by the `.svg` extension, anything else is a bitmap.
    pub fn save<P: AsRef<Path>>(self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let dims = self.style.figure_size;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("svg") => {
                let root = SVGBackend::new(path, dims).into_drawing_area();
                self.render(&root)?;
                root.present().map_err(PlotError::backend)?;
            }
            _ => {
                let root = BitMapBackend::new(path, dims).into_drawing_area();
                self.render(&root)?;
                root.present().map_err(PlotError::backend)?;
            }
        }
        info!("successfully plotted to {}", path.display());

        Ok(())
    }
}

fn series_label_position(position: LegendPosition) -> Option<SeriesLabelPosition> {
    let position = match position {
        LegendPosition::NoLegend => return None,
        LegendPosition::Best | LegendPosition::UpperRight => SeriesLabelPosition::UpperRight,
        LegendPosition::UpperLeft => SeriesLabelPosition::UpperLeft,
        LegendPosition::LowerLeft => SeriesLabelPosition::LowerLeft,
        LegendPosition::LowerRight => SeriesLabelPosition::LowerRight,
        LegendPosition::Right | LegendPosition::CenterRight => SeriesLabelPosition::MiddleRight,
        LegendPosition::CenterLeft => SeriesLabelPosition::MiddleLeft,
        LegendPosition::LowerCenter => SeriesLabelPosition::LowerMiddle,
        LegendPosition::UpperCenter => SeriesLabelPosition::UpperMiddle,
        LegendPosition::Center => SeriesLabelPosition::MiddleMiddle,
    };
    Some(position)
}

/// Shrink `area` so that one y unit spans `aspect` x units on screen
fn fit_aspect<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    domain: &AxisLimits,
    aspect: f64,
) -> DrawingArea<DB, Shift> {
    let (w, h) = area.dim_in_pixel();
    let plot_w = w.saturating_sub(LABEL_AREA) as f64;
    let plot_h = h.saturating_sub(LABEL_AREA) as f64;
    // wanted plot width over plot height, in pixels
    let wanted = domain.x_span() / (domain.y_span() * aspect);
    if !wanted.is_finite() || wanted <= 0.0 || plot_w <= 0.0 || plot_h <= 0.0 {
        return area.clone();
    }

    if plot_w / plot_h > wanted {
        let excess = (plot_w - plot_h * wanted) as i32;
        area.margin(0, 0, excess / 2, excess - excess / 2)
    } else {
        let excess = (plot_h - plot_w / wanted) as i32;
        area.margin(excess / 2, excess - excess / 2, 0, 0)
    }
}

fn draw_markers<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    points: &[(f64, f64)],
    marker: &Marker,
    line_width: u32,
) -> Result<()> {
    let colour = marker.colour.mix(marker.alpha);
    let fill = colour.filled();
    let stroke = colour.stroke_width(line_width);
    let size = marker.size;
    let half = (size / 2).max(1) as i32;
    let coords = points.iter().copied();

    let anno = match marker.symbol {
        Symbol::Line => chart.draw_series(LineSeries::new(coords, stroke)),
        Symbol::Circle => chart.draw_series(coords.map(|c| Circle::new(c, half, fill))),
        Symbol::Square => chart.draw_series(
            coords.map(|c| EmptyElement::at(c) + Rectangle::new([(-half, -half), (half, half)], fill)),
        ),
        Symbol::Triangle => chart.draw_series(coords.map(|c| TriangleMarker::new(c, half, fill))),
        Symbol::Cross => chart.draw_series(coords.map(|c| Cross::new(c, half, stroke))),
        Symbol::Point => chart.draw_series(coords.map(|c| Circle::new(c, 1, fill))),
    }
    .map_err(PlotError::backend)?;

    if let Some(label) = &marker.label {
        anno.label(label.as_str());
        legend_glyph(anno, marker.symbol, stroke, fill);
    }
    Ok(())
}

fn legend_glyph<DB: DrawingBackend>(
    anno: &mut SeriesAnno<'_, DB>,
    symbol: Symbol,
    stroke: ShapeStyle,
    fill: ShapeStyle,
) {
    match symbol {
        Symbol::Line => {
            anno.legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], stroke));
        }
        Symbol::Square => {
            anno.legend(move |(x, y)| Rectangle::new([(x + 4, y - 6), (x + 16, y + 6)], fill));
        }
        Symbol::Triangle => {
            anno.legend(move |(x, y)| TriangleMarker::new((x + 10, y), 6, fill));
        }
        Symbol::Cross => {
            anno.legend(move |(x, y)| Cross::new((x + 10, y), 6, stroke));
        }
        Symbol::Circle | Symbol::Point => {
            anno.legend(move |(x, y)| Circle::new((x + 10, y), 5, fill));
        }
    }
}

/// Finite minimum and maximum of the data, widened if they coincide
fn value_range(data: &nalgebra::DMatrix<f64>) -> (f64, f64) {
    let (min, max) = data
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if min >= max {
        let centre = if min.is_finite() { min } else { 0.0 };
        return (centre - 0.5, centre + 0.5);
    }
    (min, max)
}

fn draw_raster<DB: DrawingBackend>(chart: &mut Chart<'_, DB>, raster: &Raster) -> Result<()> {
    let (nx, ny) = raster.data.shape();
    let (min, max) = value_range(&raster.data);
    // cells span the extent edge to edge
    let xs = contour::node_positions(raster.extent.x.0, raster.extent.x.1, nx + 1);
    let ys = contour::node_positions(raster.extent.y.0, raster.extent.y.1, ny + 1);

    let cells = (0..nx).flat_map(|ix| (0..ny).map(move |iy| (ix, iy))).filter_map(|(ix, iy)| {
        let v = raster.data[(ix, iy)];
        if v.is_nan() {
            return None;
        }
        let colour = raster.colour_map.map_range(v, min, max);
        Some(Rectangle::new([(xs[ix], ys[iy]), (xs[ix + 1], ys[iy + 1])], colour.filled()))
    });
    let anno = chart.draw_series(cells).map_err(PlotError::backend)?;

    if let Some(label) = &raster.label {
        let swatch = raster.colour_map.map(0.5).filled();
        anno.label(label.as_str())
            .legend(move |(x, y)| Rectangle::new([(x + 4, y - 6), (x + 16, y + 6)], swatch));
    }
    Ok(())
}

fn draw_colour_bar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    raster: &Raster,
    family: &str,
    font_size: u32,
) -> Result<()> {
    let (min, max) = value_range(&raster.data);
    // half the width of the figure, centred
    let (w, _) = area.dim_in_pixel();
    let side = (w / 4) as i32;
    let area = area.margin(5, 0, side, side);

    let mut bar = ChartBuilder::on(&area)
        .x_label_area_size(LABEL_AREA / 2)
        .build_cartesian_2d(min..max, 0.0..1.0)
        .map_err(PlotError::backend)?;

    let mut mesh = bar.configure_mesh();
    mesh.disable_mesh()
        .disable_y_axis()
        .x_labels(COLOUR_BAR_TICKS)
        .label_style((family, font_size).into_font());
    if let Some(title) = &raster.colour_bar_title {
        mesh.x_desc(title.as_str());
    }
    mesh.draw().map_err(PlotError::backend)?;

    let step = (max - min) / COLOUR_BAR_STEPS as f64;
    bar.draw_series((0..COLOUR_BAR_STEPS).map(|i| {
        let v = min + step * i as f64;
        let colour = raster.colour_map.map_range(v + step / 2.0, min, max);
        Rectangle::new([(v, 0.0), (v + step, 1.0)], colour.filled())
    }))
    .map_err(PlotError::backend)?;

    Ok(())
}

/// Contour levels alternate between dashed and solid, starting dashed
fn dashed_level(k: usize) -> bool {
    k % 2 == 0
}

fn draw_contours<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    contours: &Contours,
    family: &str,
    font_size: u32,
    line_width: u32,
) -> Result<()> {
    let colour_of = |k: usize| contours.colours[k % contours.colours.len()].mix(contours.alpha);

    if contours.filled {
        let cells = contour::filled_cells(&contours.data, &contours.extent, &contours.levels);
        trace!("{} filled contour cells", cells.len());
        chart
            .draw_series(cells.into_iter().map(|(cell, band)| {
                Rectangle::new(
                    [(cell.x_min, cell.y_min), (cell.x_max, cell.y_max)],
                    colour_of(band).filled(),
                )
            }))
            .map_err(PlotError::backend)?;
        return Ok(());
    }

    for (k, level) in contours.levels.iter().enumerate() {
        let segments = contour::trace(&contours.data, &contours.extent, *level);
        trace!("level {}: {} segments", level, segments.len());
        let stroke = colour_of(k).stroke_width(line_width);
        if dashed_level(k) {
            chart
                .draw_series(
                    segments
                        .iter()
                        .map(|s| DashedPathElement::new(vec![s[0], s[1]], DASH, DASH_GAP, stroke)),
                )
                .map_err(PlotError::backend)?;
        } else {
            chart
                .draw_series(segments.iter().map(|s| PathElement::new(vec![s[0], s[1]], stroke)))
                .map_err(PlotError::backend)?;
        }

        if let (Some(name), Some(anchor)) = (contours.level_names.get(k), contour::label_anchor(&segments)) {
            let font = (family, font_size).into_font().color(&colour_of(k));
            chart
                .draw_series(std::iter::once(Text::new(name.clone(), anchor, font)))
                .map_err(PlotError::backend)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use nalgebra::DMatrix;

    use super::*;
    use crate::{BinLimits, Canvas, ColourMap, Style};

    fn bumps() -> DMatrix<f64> {
        DMatrix::from_fn(12, 10, |ix, iy| {
            let (x, y) = (ix as f64 / 11.0 - 0.5, iy as f64 / 9.0 - 0.5);
            (-(x * x + y * y) * 8.0).exp()
        })
    }

    /// A figure holding every kind of mark
    fn busy_figure() -> Figure {
        let mut fig = Figure::new(Style::default());
        let colour = RGBColor(0x1f, 0x77, 0xb4);
        let bins = BinLimits::new((0.0, 2.0), (0.0, 1.0));

        fig.draw_raster_with_colorbar(Raster {
            data: bumps(),
            extent: bins,
            colour_map: ColourMap::Magma,
            label: Some("density".to_string()),
            aspect: Some(1.0),
            colour_bar_title: Some("counts".to_string()),
        })
        .unwrap();
        for (i, symbol) in [
            Symbol::Line,
            Symbol::Circle,
            Symbol::Square,
            Symbol::Triangle,
            Symbol::Cross,
            Symbol::Point,
        ]
        .into_iter()
        .enumerate()
        {
            let marker = Marker::new(symbol, colour).label(Some(format!("{:?}", symbol)));
            let y = i as f64 * 0.1;
            fig.draw_series(&[0.1, 0.5, 0.9], &[y, y + 0.05, y], &marker).unwrap();
        }
        fig.fill_between(&[0.0, 1.0, 2.0], &[0.1, 0.2, 0.1], &[0.3, 0.5, 0.4], colour, 0.7)
            .unwrap();
        fig.draw_point(-50.0, -50.0, &Marker::new(Symbol::Square, colour).label(Some("band".to_string())))
            .unwrap();
        fig.draw_contours(Contours {
            data: bumps(),
            levels: vec![0.2, 0.5, 0.8],
            colours: vec![RGBColor(0, 0, 0)],
            extent: bins,
            level_names: vec!["0.2".to_string(), "0.5".to_string(), "0.8".to_string()],
            filled: false,
            alpha: 1.0,
        })
        .unwrap();
        fig.draw_contours(Contours {
            data: bumps(),
            levels: vec![0.5, 1.0],
            colours: vec![RGBColor(200, 0, 0)],
            extent: bins,
            level_names: Vec::new(),
            filled: true,
            alpha: 0.5,
        })
        .unwrap();
        fig.set_labels("x", "y", Some("everything")).unwrap();
        fig.set_tick_density(5, 4).unwrap();
        fig.draw_legend(Some("legend"), LegendPosition::UpperLeft).unwrap();
        fig
    }

    #[test]
    fn renders_every_mark() {
        if let Err(_) = pretty_env_logger::try_init() {}

        let fig = busy_figure();
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (800, 600)).into_drawing_area();
            fig.render(&root).unwrap();
            root.present().unwrap();
        }
        assert!(svg.contains("<svg"));
        assert!(svg.contains("everything"));
    }

    #[test]
    fn renders_an_empty_figure() {
        let fig = Figure::new(Style::default());
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (320, 240)).into_drawing_area();
            fig.render(&root).unwrap();
            root.present().unwrap();
        }
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn saves_svg_files() {
        let dir = std::env::temp_dir().join(format!("sci-plot-render-{}", std::process::id()));
        let path = dir.join("nested").join("busy.svg");
        busy_figure().save(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        fs::remove_dir_all(&dir).unwrap();
        assert!(content.contains("<svg"));
    }

    #[test]
    fn contour_levels_alternate_dashes() {
        assert!(dashed_level(0));
        assert!(!dashed_level(1));
        assert!(dashed_level(2));
        assert!(!dashed_level(3));
    }

    #[test]
    fn legend_positions_map() {
        assert!(series_label_position(LegendPosition::NoLegend).is_none());
        assert!(matches!(
            series_label_position(LegendPosition::Best),
            Some(SeriesLabelPosition::UpperRight)
        ));
        assert!(matches!(
            series_label_position(LegendPosition::LowerCenter),
            Some(SeriesLabelPosition::LowerMiddle)
        ));
    }

    #[test]
    fn value_range_skips_non_finite() {
        let data = DMatrix::from_row_slice(2, 2, &[1.0, f64::NAN, f64::INFINITY, 3.0]);
        assert_eq!(value_range(&data), (1.0, 3.0));
        assert_eq!(value_range(&DMatrix::from_element(2, 2, 4.0)), (3.5, 4.5));
        assert_eq!(value_range(&DMatrix::from_element(1, 1, f64::NAN)), (-0.5, 0.5));
    }
}
