#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Storm track geometry.
//!
//! Partitions storm observations into storm-year groups and turns each
//! group into:
//!
//! - a [`Track`]: one polyline through every fix in time order, and
//! - [`Segment`]s: one two-point polyline per consecutive pair of fixes,
//!   tagged with the leading fix so a renderer can color each piece by
//!   wind, status or category.
//!
//! Groups are built independently. A group that fails validation is
//! reported in [`TrackSet::failures`] without affecting the others.
//!
//! ## Features
//!
//! - **`parallel`** - Build groups concurrently with rayon
//!   ([`build_tracks_parallel`]).

pub mod build;
pub mod export;
pub mod group;
pub mod progress;
pub mod summary;

pub use build::{
    DegeneratePolicy, GroupFailure, GroupGeometry, Segment, Track, TrackGeometry, TrackOptions,
    TrackSet, build_group, build_segments, build_track, build_tracks, build_tracks_with_progress,
};
#[cfg(feature = "parallel")]
pub use build::build_tracks_parallel;
pub use group::{StormGroup, group_observations};
pub use summary::{TrackSummary, summarize_tracks};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use storm_tracks_storm_models::StormKey;

/// Coordinate reference system attached to every produced geometry.
///
/// Positions are taken as-is from the dataset; no reprojection happens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Crs {
    /// WGS84 geographic coordinates (EPSG:4326).
    #[default]
    #[serde(rename = "EPSG:4326")]
    Wgs84,
}

impl Crs {
    #[must_use]
    pub const fn epsg(self) -> u32 {
        match self {
            Self::Wgs84 => 4326,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wgs84 => "EPSG:4326",
        }
    }
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that abort the derivation of a single storm-year group.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrackError {
    /// A fix has a NaN or infinite coordinate.
    #[error("{key}: non-finite coordinate ({lon}, {lat}) at fix {index}")]
    NonFiniteCoordinate {
        /// Group the fix belongs to.
        key: StormKey,
        /// Position of the fix within the group.
        index: usize,
        lon: f64,
        lat: f64,
    },

    /// A fix is timestamped earlier than the fix before it.
    #[error("{key}: fix {index} at {timestamp} precedes the previous fix at {previous}")]
    OutOfOrder {
        /// Group the fix belongs to.
        key: StormKey,
        /// Position of the offending fix within the group.
        index: usize,
        timestamp: NaiveDateTime,
        previous: NaiveDateTime,
    },
}

impl TrackError {
    /// The storm-year group that failed.
    #[must_use]
    pub const fn key(&self) -> &StormKey {
        match self {
            Self::NonFiniteCoordinate { key, .. } | Self::OutOfOrder { key, .. } => key,
        }
    }
}
