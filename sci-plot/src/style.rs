//! Figure appearance from layered style sheets.
//!
//! A style sheet is a TOML file where every key is optional. Sheets are
//! applied on top of the built-in default in order, later sheets win key by
//! key.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    process::Command,
};

use plotters::style::RGBColor;
use serde::Deserialize;

use crate::Result;

const DEFAULT_SHEET: &str = include_str!("../styles/default.toml");

/// A partial appearance description, as read from one style sheet
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleSheet {
    pub font_family: Option<String>,
    pub font_size: Option<u32>,
    pub title_font_size: Option<u32>,
    pub label_font_size: Option<u32>,
    pub legend_font_size: Option<u32>,
    pub figure_size: Option<(u32, u32)>,
    pub margin: Option<u32>,
    pub line_width: Option<u32>,
    pub background: Option<[u8; 3]>,
    pub grid: Option<bool>,
    /// Render text through LaTeX, if it is installed
    pub usetex: Option<bool>,
}

impl StyleSheet {
    pub fn from_toml(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        debug!("read style sheet {}", path.display());
        Self::from_toml(&content)
    }

    /// Overwrite every key of `self` that is set in `other`
    pub fn merge(&mut self, other: StyleSheet) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() {
                    self.$field = other.$field;
                })*
            };
        }
        take!(
            font_family,
            font_size,
            title_font_size,
            label_font_size,
            legend_font_size,
            figure_size,
            margin,
            line_width,
            background,
            grid,
            usetex
        );
    }
}

/// Where a style sheet comes from
#[derive(Debug, Clone, PartialEq)]
pub enum StyleSource {
    /// The built-in default sheet
    Default,
    /// A TOML file on disk
    Path(PathBuf),
    /// TOML content held in memory
    Inline(String),
}

impl StyleSource {
    fn load(&self) -> Result<StyleSheet> {
        match self {
            StyleSource::Default => StyleSheet::from_toml(DEFAULT_SHEET),
            StyleSource::Path(path) => StyleSheet::from_path(path),
            StyleSource::Inline(content) => StyleSheet::from_toml(content),
        }
    }
}

/// Fully resolved appearance of a figure
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub font_family: String,
    pub font_size: u32,
    pub title_font_size: u32,
    pub label_font_size: u32,
    pub legend_font_size: u32,
    pub figure_size: (u32, u32),
    pub margin: u32,
    pub line_width: u32,
    pub background: RGBColor,
    pub grid: bool,
    pub usetex: bool,
}

impl Style {
    /// The font family text is drawn with, serif when typesetting is on
    pub fn text_family(&self) -> &str {
        if self.usetex {
            "serif"
        } else {
            &self.font_family
        }
    }

    fn resolve(sheet: StyleSheet) -> Self {
        // the default sheet sets every key, these only guard against a
        // trimmed-down default
        Self {
            font_family: sheet.font_family.unwrap_or_else(|| "sans-serif".to_string()),
            font_size: sheet.font_size.unwrap_or(16),
            title_font_size: sheet.title_font_size.unwrap_or(24),
            label_font_size: sheet.label_font_size.unwrap_or(20),
            legend_font_size: sheet.legend_font_size.unwrap_or(16),
            figure_size: sheet.figure_size.unwrap_or((1024, 768)),
            margin: sheet.margin.unwrap_or(10),
            line_width: sheet.line_width.unwrap_or(2),
            background: sheet
                .background
                .map(|[r, g, b]| RGBColor(r, g, b))
                .unwrap_or(RGBColor(255, 255, 255)),
            grid: sheet.grid.unwrap_or(true),
            usetex: sheet.usetex.unwrap_or(false),
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        let sheet = StyleSheet::from_toml(DEFAULT_SHEET).unwrap_or_default();
        Self::resolve(sheet)
    }
}

/// Whether `latex` can be started on this host
pub fn latex_available() -> bool {
    match Command::new("latex").arg("-version").output() {
        Ok(_) => true,
        Err(err) if err.kind() == ErrorKind::NotFound => false,
        Err(err) => {
            debug!("probing latex failed: {}", err);
            false
        }
    }
}

/// Resolve the appearance from the built-in default followed by `sources`.
///
/// If the result asks for LaTeX but the `latex` command cannot be found, a
/// warning is logged and the built-in text rendering is used instead.
pub fn appearance(sources: &[StyleSource]) -> Result<Style> {
    appearance_with_probe(sources, latex_available)
}

/// Like [`appearance`], with a custom check for LaTeX availability
pub fn appearance_with_probe<F>(sources: &[StyleSource], probe: F) -> Result<Style>
where
    F: FnOnce() -> bool,
{
    let mut sheet = StyleSource::Default.load()?;
    for source in sources {
        sheet.merge(source.load()?);
    }

    let mut style = Style::resolve(sheet);
    if style.usetex && !probe() {
        warn!("Cannot find `latex` command. Using the built-in text rendering.");
        style.usetex = false;
    }
    debug!("resolved style: {:?}", style);

    Ok(style)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlotError;

    #[test]
    fn default_sheet_sets_every_key() {
        let sheet = StyleSheet::from_toml(DEFAULT_SHEET).unwrap();
        assert!(sheet.font_family.is_some());
        assert!(sheet.font_size.is_some());
        assert!(sheet.title_font_size.is_some());
        assert!(sheet.label_font_size.is_some());
        assert!(sheet.legend_font_size.is_some());
        assert!(sheet.figure_size.is_some());
        assert!(sheet.margin.is_some());
        assert!(sheet.line_width.is_some());
        assert!(sheet.background.is_some());
        assert!(sheet.grid.is_some());
        assert!(sheet.usetex.is_some());
    }

    #[test]
    fn later_sheets_win() {
        if let Err(_) = pretty_env_logger::try_init() {}

        let style = appearance_with_probe(
            &[
                StyleSource::Inline("font_size = 10\ngrid = false".to_string()),
                StyleSource::Inline("font_size = 12".to_string()),
            ],
            || true,
        )
        .unwrap();
        assert_eq!(style.font_size, 12);
        assert!(!style.grid);
        assert_eq!(style.figure_size, Style::default().figure_size);
    }

    #[test]
    fn missing_latex_falls_back() {
        if let Err(_) = pretty_env_logger::try_init() {}

        let sources = [StyleSource::Inline("usetex = true".to_string())];
        let style = appearance_with_probe(&sources, || false).unwrap();
        assert!(!style.usetex);
        assert_eq!(style.text_family(), "sans-serif");

        let style = appearance_with_probe(&sources, || true).unwrap();
        assert!(style.usetex);
        assert_eq!(style.text_family(), "serif");
    }

    #[test]
    fn probe_only_runs_when_asked() {
        let style = appearance_with_probe(&[], || panic!("probe must not run")).unwrap();
        assert!(!style.usetex);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = appearance_with_probe(&[StyleSource::Inline("colour = 3".to_string())], || true)
            .unwrap_err();
        assert!(matches!(err, PlotError::Style(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = appearance_with_probe(
            &[StyleSource::Path(PathBuf::from("/nonexistent/sci-plot/style.toml"))],
            || true,
        )
        .unwrap_err();
        assert!(matches!(err, PlotError::Io(_)));
    }

    #[test]
    fn sheet_from_file() {
        let path = std::env::temp_dir().join(format!("sci-plot-style-{}.toml", std::process::id()));
        fs::write(&path, "background = [0, 0, 0]\nfigure_size = [640, 480]").unwrap();
        let style = appearance_with_probe(&[StyleSource::Path(path.clone())], || true).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(style.background, RGBColor(0, 0, 0));
        assert_eq!(style.figure_size, (640, 480));
    }
}
