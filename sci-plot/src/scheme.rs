use std::str::FromStr;

use plotters::style::RGBColor;

use crate::{PlotError, Result};

/// The glyph used to draw a series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Symbol {
    /// Connect consecutive samples with a solid line
    #[default]
    Line,
    /// Filled circle per sample
    Circle,
    /// Filled square per sample
    Square,
    /// Filled triangle per sample
    Triangle,
    /// Diagonal cross per sample
    Cross,
    /// Single pixel sized dot per sample
    Point,
}

impl FromStr for Symbol {
    type Err = PlotError;

    /// Parse the usual one character format codes, e.g. `"o"` or `"-"`
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "-" | "line" => Ok(Symbol::Line),
            "o" | "circle" => Ok(Symbol::Circle),
            "s" | "square" => Ok(Symbol::Square),
            "^" | "triangle" => Ok(Symbol::Triangle),
            "x" | "cross" => Ok(Symbol::Cross),
            "." | "point" => Ok(Symbol::Point),
            other => Err(PlotError::InvalidParameter {
                name: "symbol",
                reason: format!("unknown symbol `{}`", other),
            }),
        }
    }
}

/// Sequential colour maps, linearly interpolated between fixed stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColourMap {
    /// Dark purple through teal to yellow
    #[default]
    Viridis,
    /// Black through purple and orange to pale yellow
    Magma,
    /// Black through red and yellow to white
    Hot,
    /// White to black
    Greys,
}

const VIRIDIS: &[(f64, RGBColor)] = &[
    (0.0, RGBColor(0x44, 0x01, 0x54)),
    (0.25, RGBColor(0x3b, 0x52, 0x8b)),
    (0.5, RGBColor(0x21, 0x91, 0x8c)),
    (0.75, RGBColor(0x5e, 0xc9, 0x62)),
    (1.0, RGBColor(0xfd, 0xe7, 0x25)),
];

const MAGMA: &[(f64, RGBColor)] = &[
    (0.0, RGBColor(0x00, 0x00, 0x04)),
    (0.25, RGBColor(0x51, 0x12, 0x7c)),
    (0.5, RGBColor(0xb7, 0x37, 0x79)),
    (0.75, RGBColor(0xfc, 0x89, 0x61)),
    (1.0, RGBColor(0xfc, 0xfd, 0xbf)),
];

const HOT: &[(f64, RGBColor)] = &[
    (0.0, RGBColor(0x0b, 0x00, 0x00)),
    (0.365, RGBColor(0xff, 0x00, 0x00)),
    (0.746, RGBColor(0xff, 0xff, 0x00)),
    (1.0, RGBColor(0xff, 0xff, 0xff)),
];

const GREYS: &[(f64, RGBColor)] = &[
    (0.0, RGBColor(0xff, 0xff, 0xff)),
    (1.0, RGBColor(0x00, 0x00, 0x00)),
];

impl ColourMap {
    /// The stops of the map, ascending in `0.0..=1.0`
    pub fn stops(self) -> &'static [(f64, RGBColor)] {
        match self {
            ColourMap::Viridis => VIRIDIS,
            ColourMap::Magma => MAGMA,
            ColourMap::Hot => HOT,
            ColourMap::Greys => GREYS,
        }
    }

    /// Map `t` in `0.0..=1.0` to a colour, values outside are clamped
    pub fn map(self, t: f64) -> RGBColor {
        let stops = self.stops();
        let (first, last) = (stops[0], stops[stops.len() - 1]);
        if t.is_nan() || t <= first.0 {
            return first.1;
        }
        if t >= last.0 {
            return last.1;
        }
        for pair in stops.windows(2) {
            let ((fa, ca), (fb, cb)) = (pair[0], pair[1]);
            if t <= fb {
                let frac = (t - fa) / (fb - fa);
                return RGBColor(lerp(ca.0, cb.0, frac), lerp(ca.1, cb.1, frac), lerp(ca.2, cb.2, frac));
            }
        }
        last.1
    }

    /// Map `value` from `min..=max` onto the colour map
    pub fn map_range(self, value: f64, min: f64, max: f64) -> RGBColor {
        let span = max - min;
        if span <= 0.0 || !span.is_finite() {
            return self.map(0.5);
        }
        self.map((value - min) / span)
    }
}

#[inline(always)]
fn lerp(a: u8, b: u8, frac: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * frac).round() as u8
}

impl FromStr for ColourMap {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "viridis" => Ok(ColourMap::Viridis),
            "magma" => Ok(ColourMap::Magma),
            "hot" => Ok(ColourMap::Hot),
            "greys" | "grays" => Ok(ColourMap::Greys),
            other => Err(PlotError::InvalidParameter {
                name: "colour_map",
                reason: format!("unknown colour map `{}`", other),
            }),
        }
    }
}

/// Appearance options shared by every plotting call.
/// Plain data, read but never modified by the drawing code.
#[derive(Debug, Clone)]
pub struct Scheme {
    /// Colour of series, bands and contour lines
    pub colour: RGBColor,
    /// One colour per filled contour level
    pub colours: Vec<RGBColor>,
    /// Legend entry, `None` keeps the series out of the legend
    pub label: Option<String>,
    /// One name per contour level
    pub level_names: Vec<String>,
    /// Glyph used by `plot_data`
    pub symbol: Symbol,
    /// Marker size in pixels
    pub size: u32,
    /// Colour map used for images
    pub colour_map: ColourMap,
    /// Caption under the colour bar of an image
    pub colour_bar_title: Option<String>,
}

impl Default for Scheme {
    fn default() -> Self {
        Self {
            colour: RGBColor(0x1f, 0x77, 0xb4),
            colours: Vec::new(),
            label: None,
            level_names: Vec::new(),
            symbol: Symbol::default(),
            size: 5,
            colour_map: ColourMap::default(),
            colour_bar_title: None,
        }
    }
}
