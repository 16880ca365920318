#[macro_use]
extern crate log;

use std::{path::PathBuf, time::Instant};

use dialoguer::{theme::ColorfulTheme, Select};
use envelope::{compute_envelope, compute_envelope_sweep};
use nalgebra::DMatrix;
use nanorand::{Rng, WyRand};
use sci_plot::{
    appearance, draw_band, legend, plot_contour, plot_data, plot_filled_contour, plot_image,
    plot_labels, plot_limits, plot_ticks, AxisLimits, BinLimits, ColourMap, Figure,
    LegendPosition, RGBColor, Result, Scheme, Series, StyleSource, Symbol,
};
use time_series_generator::generate_sine_wave;

const SEED: u64 = 0;
const BAND_WIDTH: f64 = 0.25;
const GRID: usize = 60;

pub(crate) fn main() -> Result<()> {
    pretty_env_logger::init();

    // an optional style sheet layered over the default one
    let sources: Vec<StyleSource> = std::env::args()
        .nth(1)
        .map(|p| StyleSource::Path(PathBuf::from(p)))
        .into_iter()
        .collect();
    let style = appearance(&sources)?;

    let plots = vec!["band", "image", "contours", "filled contours"];
    let e = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select plot")
        .items(&plots)
        .default(0)
        .interact()?;

    let mut fig = Figure::new(style);
    let filename = match e {
        0 => {
            band(&mut fig)?;
            "img/band.png"
        }
        1 => {
            image(&mut fig)?;
            "img/image.png"
        }
        2 => {
            contours(&mut fig)?;
            "img/contours.png"
        }
        3 => {
            filled_contours(&mut fig)?;
            "img/filled_contours.png"
        }
        _ => unreachable!(),
    };
    fig.save(filename)
}

/// A sine wave with noisy samples around it and a band over the samples
fn band(fig: &mut Figure) -> Result<()> {
    let values: Vec<f64> = generate_sine_wave(100);
    let x: Vec<f64> = (0..values.len()).map(|i| i as f64 / 10.0).collect();
    info!("got {} datapoints", values.len());

    let mut rng = WyRand::new_seed(SEED);
    let samples: Series = x
        .iter()
        .zip(&values)
        .map(|(x, y)| (*x, y + (rng.generate::<f64>() - 0.5) * 0.4))
        .collect();
    let (xs, ys): (Vec<f64>, Vec<f64>) = samples.iter().copied().unzip();

    let t0 = Instant::now();
    let scan = compute_envelope(&xs, &ys, BAND_WIDTH)?;
    let t_scan = t0.elapsed();
    let t0 = Instant::now();
    let sweep = compute_envelope_sweep(&xs, &ys, BAND_WIDTH)?;
    let t_sweep = t0.elapsed();
    info!(
        "envelope of {} samples: scan {}us, sweep {}us, identical: {}",
        xs.len(),
        t_scan.as_micros(),
        t_sweep.as_micros(),
        scan == sweep
    );

    let band_scheme = Scheme {
        colour: RGBColor(0xff, 0x7f, 0x0e),
        label: Some(format!("±{} band", BAND_WIDTH)),
        ..Scheme::default()
    };
    draw_band(fig, &xs, &ys, BAND_WIDTH, &band_scheme)?;

    let sample_scheme = Scheme {
        colour: RGBColor(0x1f, 0x77, 0xb4),
        label: Some("samples".to_string()),
        symbol: Symbol::Circle,
        size: 3,
        ..Scheme::default()
    };
    plot_data(fig, &xs, &ys, &sample_scheme)?;

    let truth_scheme = Scheme {
        colour: RGBColor(0, 0, 0),
        label: Some("sine".to_string()),
        ..Scheme::default()
    };
    plot_data(fig, &x, &values, &truth_scheme)?;

    plot_ticks(fig, 6, 5)?;
    plot_labels(fig, "x", "y", Some("Sine with uncertainty band"))?;
    legend(fig, Some("Legend"), LegendPosition::UpperRight)
}

/// Two overlapping gaussian bumps on a square grid
fn bumps() -> (DMatrix<f64>, BinLimits) {
    let bins = BinLimits::new((-3.0, 3.0), (-3.0, 3.0));
    let step = 6.0 / (GRID - 1) as f64;
    let data = DMatrix::from_fn(GRID, GRID, |ix, iy| {
        let x = -3.0 + ix as f64 * step;
        let y = -3.0 + iy as f64 * step;
        (-(x - 0.8).powi(2) - (y - 0.5).powi(2)).exp() + 0.6 * (-(x + 1.0).powi(2) / 0.5 - (y + 0.8).powi(2)).exp()
    });
    (data, bins)
}

fn image(fig: &mut Figure) -> Result<()> {
    let (data, bins) = bumps();
    let limits = bins.flatten();
    let scheme = Scheme {
        colour_map: ColourMap::Viridis,
        colour_bar_title: Some("density".to_string()),
        ..Scheme::default()
    };
    plot_limits(fig, Some(limits))?;
    plot_image(fig, &data, bins, limits, &scheme)?;
    plot_labels(fig, "x", "y", Some("Gaussian bumps"))
}

fn contours(fig: &mut Figure) -> Result<()> {
    let (data, bins) = bumps();
    let scheme = Scheme {
        colour: RGBColor(0x2c, 0xa0, 0x2c),
        level_names: vec!["0.2".to_string(), "0.5".to_string(), "0.8".to_string()],
        ..Scheme::default()
    };
    plot_limits(fig, Some(AxisLimits::new(-3.0, 3.0, -3.0, 3.0)))?;
    plot_contour(fig, &data, &[0.2, 0.5, 0.8], &scheme, bins)?;
    plot_labels(fig, "x", "y", Some("Contours"))
}

fn filled_contours(fig: &mut Figure) -> Result<()> {
    let (data, bins) = bumps();
    let scheme = Scheme {
        colours: vec![RGBColor(0x9e, 0xca, 0xe1), RGBColor(0x31, 0x82, 0xbd)],
        level_names: vec!["2σ".to_string(), "1σ".to_string()],
        ..Scheme::default()
    };
    plot_limits(fig, Some(AxisLimits::new(-3.0, 3.0, -3.0, 3.0)))?;
    plot_filled_contour(fig, &data, &[0.14, 0.61], &scheme, bins)?;
    plot_labels(fig, "x", "y", Some("Credible regions"))?;
    legend(fig, None, LegendPosition::LowerRight)
}
