//! Per-deployment settings.
//!
//! One dashboard binary serves every deployment; what used to differ between
//! copies of the report (title, palette, map style, input files) lives in a
//! small TOML file instead.
//!
//! ```toml
//! title = "Customer Success Dashboard"
//! data_path = "Data.csv"
//! geo_path = "states.geojson"
//! max_rows = 5781
//!
//! [theme]
//! bar_color = "#0083B8"
//! map_style = "stamen-terrain"
//! ```

use crate::error::DashboardError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Row extent of the customer-success sheet.
pub const DEFAULT_MAX_ROWS: usize = 5781;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChartTheme {
    pub bar_color: String,
    pub template: String,
    pub map_style: String,
    /// `[lat, lon]`
    pub map_center: [f64; 2],
    pub map_zoom: f64,
    pub color_scale: String,
    pub map_opacity: f64,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            bar_color: "#0083B8".to_string(),
            template: "plotly_white".to_string(),
            map_style: "stamen-terrain".to_string(),
            map_center: [31.15, -85.42],
            map_zoom: 3.7,
            color_scale: "blues".to_string(),
            map_opacity: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    pub data_path: PathBuf,
    pub geo_path: PathBuf,
    pub max_rows: Option<usize>,
    pub theme: ChartTheme,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Customer Success Dashboard".to_string(),
            data_path: PathBuf::from("Data.csv"),
            geo_path: PathBuf::from("states.geojson"),
            max_rows: Some(DEFAULT_MAX_ROWS),
            theme: ChartTheme::default(),
        }
    }
}

impl DashboardConfig {
    /// Read a TOML config; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// [`DashboardError::SourceUnavailable`] if the file cannot be read,
    /// [`DashboardError::Config`] if it is not valid TOML for this shape.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DashboardError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|source| DashboardError::SourceUnavailable {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_toml_str(&text)
    }

    /// # Errors
    ///
    /// [`DashboardError::Config`] on malformed TOML.
    pub fn from_toml_str(text: &str) -> Result<Self, DashboardError> {
        toml::from_str(text).map_err(|e| DashboardError::Config {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg = DashboardConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, DashboardConfig::default());
        assert_eq!(cfg.max_rows, Some(DEFAULT_MAX_ROWS));
    }

    #[test]
    fn partial_theme_keeps_other_defaults() {
        let cfg = DashboardConfig::from_toml_str(
            r##"
            title = "Regional Sales"
            data_path = "sales.csv"

            [theme]
            bar_color = "#FF0000"
            "##,
        )
        .unwrap();
        assert_eq!(cfg.title, "Regional Sales");
        assert_eq!(cfg.data_path, PathBuf::from("sales.csv"));
        assert_eq!(cfg.geo_path, PathBuf::from("states.geojson"));
        assert_eq!(cfg.theme.bar_color, "#FF0000");
        assert_eq!(cfg.theme.map_style, "stamen-terrain");
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let err = DashboardConfig::from_toml_str("max_rows = \"many\"").unwrap_err();
        assert!(matches!(err, DashboardError::Config { .. }));
    }
}
