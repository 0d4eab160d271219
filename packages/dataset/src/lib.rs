#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loading and filtering of the Atlantic storms dataset.
//!
//! The dataset is a CSV table with one row per storm fix. [`read`] turns
//! the rows of the storms a [`StormSelection`] names into [`Observation`]s,
//! failing loudly on selected rows whose date, status or wind cannot be
//! interpreted. Rows of other storms are skipped unparsed.
//!
//! [`Observation`]: storm_tracks_storm_models::Observation

pub mod read;
pub mod selection;

pub use read::{load_observations, read_observations};
pub use selection::{StormFilter, StormSelection};

/// Errors that can occur while loading the storms dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The input file could not be opened.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// CSV framing or header error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A data row holds a value that cannot be normalized.
    #[error("Row {row}: {message}")]
    Row {
        /// 1-based data row number (header excluded).
        row: u64,
        /// Description of what went wrong.
        message: String,
    },
}
