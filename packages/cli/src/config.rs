//! Run configuration.
//!
//! Loaded from a TOML file, or from the defaults embedded at build time
//! (`storm_tracks.toml` at the package root) when no file is given.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use storm_tracks_dataset::StormSelection;
use storm_tracks_track::{DegeneratePolicy, TrackOptions};

/// Embedded default configuration (compiled into the binary).
const DEFAULT_CONFIG_TOML: &str = include_str!("../storm_tracks.toml");

/// Errors from loading the run configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has unexpected keys.
    #[error("Failed to parse {path}: {source}")]
    Parse {
        /// Path (or `<embedded>`) of the config that failed.
        path: String,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}

/// Settings for one run of the tool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Storms CSV to read.
    #[serde(default = "default_input")]
    pub input: PathBuf,
    /// Directory the `GeoJSON` outputs are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Treatment of single-fix storms.
    #[serde(default)]
    pub single_point: DegeneratePolicy,
    /// Storms to keep. Empty keeps every storm in the input.
    #[serde(default)]
    pub storms: StormSelection,
}

fn default_input() -> PathBuf {
    PathBuf::from("data/storms.csv")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data/generated")
}

impl RunConfig {
    /// Loads the configuration at `path`, or the embedded defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Self::parse(DEFAULT_CONFIG_TOML, "<embedded>");
        };

        let body = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let config = Self::parse(&body, &path.display().to_string())?;
        log::debug!("Loaded configuration from {}", path.display());

        Ok(config)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not a valid config.
    pub fn parse(body: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(body).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            source: e,
        })
    }

    #[must_use]
    pub fn track_options(&self) -> TrackOptions {
        TrackOptions {
            single_point: self.single_point,
            ..TrackOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use storm_tracks_dataset::StormFilter;

    use super::*;

    #[test]
    fn embedded_defaults_select_six_storms() {
        let config = RunConfig::load(None).unwrap();
        assert_eq!(config.storms.filters.len(), 6);
        assert!(
            config
                .storms
                .filters
                .contains(&StormFilter::new("Irma", Some(2017)))
        );
        assert_eq!(config.single_point, DegeneratePolicy::Skip);
        assert_eq!(config.input, PathBuf::from("data/storms.csv"));
    }

    #[test]
    fn missing_keys_use_defaults() {
        let config = RunConfig::parse("", "test").unwrap();
        assert!(config.storms.is_empty());
        assert_eq!(config.output_dir, PathBuf::from("data/generated"));
        assert_eq!(config.track_options().single_point, DegeneratePolicy::Skip);
    }

    #[test]
    fn parses_point_policy_and_yearless_filter() {
        let config = RunConfig::parse(
            r#"
            single_point = "point"

            [[storms]]
            name = "Irma"
            "#,
            "test",
        )
        .unwrap();

        assert_eq!(config.single_point, DegeneratePolicy::Point);
        assert_eq!(config.storms.filters, vec![StormFilter::new("Irma", None)]);
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = RunConfig::parse("colour = \"red\"", "test").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn reads_config_file() {
        let tmp = std::env::temp_dir().join("storm_tracks_config_test");
        let _ = std::fs::remove_dir_all(&tmp);
        std::fs::create_dir_all(&tmp).unwrap();

        let path = tmp.join("run.toml");
        std::fs::write(&path, "input = \"fixes.csv\"\n").unwrap();

        let config = RunConfig::load(Some(&path)).unwrap();
        assert_eq!(config.input, PathBuf::from("fixes.csv"));

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
