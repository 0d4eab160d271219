//! Track and segment construction.
//!
//! For a group of n fixes the builder emits one Track visiting all n
//! positions and n-1 Segments, where Segment i runs from fix i to fix i+1
//! and carries fix i's attributes. The terminal fix starts no segment, so
//! its attributes appear in none.

use std::sync::Arc;

use geo::{Coord, LineString, Point};
use serde::{Deserialize, Serialize};
use storm_tracks_storm_models::{Observation, StormKey};

use crate::group::{StormGroup, group_observations};
use crate::progress::ProgressCallback;
use crate::{Crs, TrackError};

/// How a storm-year group with a single fix is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Emit neither a track nor segments.
    #[default]
    Skip,
    /// Emit a track whose geometry is the lone fix's point. No segments.
    Point,
}

/// Options controlling track construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackOptions {
    pub single_point: DegeneratePolicy,
    pub crs: Crs,
}

/// Geometry of a [`Track`].
#[derive(Debug, Clone, PartialEq)]
pub enum TrackGeometry {
    Line(LineString<f64>),
    /// Only produced for single-fix groups under [`DegeneratePolicy::Point`].
    Point(Point<f64>),
}

impl TrackGeometry {
    /// Vertices in visiting order.
    #[must_use]
    pub fn coords(&self) -> Vec<Coord<f64>> {
        match self {
            Self::Line(line) => line.0.clone(),
            Self::Point(point) => vec![point.0],
        }
    }

    #[must_use]
    pub fn to_geometry(&self) -> geo::Geometry<f64> {
        match self {
            Self::Line(line) => geo::Geometry::LineString(line.clone()),
            Self::Point(point) => geo::Geometry::Point(*point),
        }
    }
}

/// The full path of one storm-year group.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub key: StormKey,
    pub geometry: TrackGeometry,
    pub crs: Crs,
    /// Number of fixes the track was built from.
    pub observation_count: usize,
}

/// One leg of a track between two consecutive fixes.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub key: StormKey,
    /// Index of the leading fix within its group.
    pub index: usize,
    /// Exactly two vertices; zero length when the fixes coincide.
    pub geometry: LineString<f64>,
    pub crs: Crs,
    /// The leading fix.
    pub attributes: Observation,
}

/// Track and segments derived from a single group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupGeometry {
    pub track: Track,
    pub segments: Vec<Segment>,
}

/// A group whose derivation was aborted.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupFailure {
    pub key: StormKey,
    pub error: TrackError,
}

/// Combined output of building every group in a dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackSet {
    pub tracks: Vec<Track>,
    pub segments: Vec<Segment>,
    /// Groups that produced nothing (empty, or single-fix under
    /// [`DegeneratePolicy::Skip`]).
    pub skipped: Vec<StormKey>,
    pub failures: Vec<GroupFailure>,
}

impl TrackSet {
    fn push(&mut self, key: StormKey, result: Result<Option<GroupGeometry>, TrackError>) {
        match result {
            Ok(Some(geometry)) => {
                self.tracks.push(geometry.track);
                self.segments.extend(geometry.segments);
            }
            Ok(None) => {
                log::debug!("Skipping degenerate group {key}");
                self.skipped.push(key);
            }
            Err(error) => {
                log::warn!("Failed to build track: {error}");
                self.failures.push(GroupFailure { key, error });
            }
        }
    }

    /// Segments belonging to the given group, in order.
    pub fn segments_for<'a>(&'a self, key: &'a StormKey) -> impl Iterator<Item = &'a Segment> {
        self.segments.iter().filter(move |s| &s.key == key)
    }
}

const fn coord(observation: &Observation) -> Coord<f64> {
    Coord {
        x: observation.position.lon,
        y: observation.position.lat,
    }
}

/// Checks coordinates are finite and timestamps never go backwards.
fn validate(group: &StormGroup) -> Result<(), TrackError> {
    for (index, observation) in group.observations.iter().enumerate() {
        if !observation.position.is_finite() {
            return Err(TrackError::NonFiniteCoordinate {
                key: group.key.clone(),
                index,
                lon: observation.position.lon,
                lat: observation.position.lat,
            });
        }
    }

    for (index, pair) in group.observations.windows(2).enumerate() {
        if pair[1].timestamp < pair[0].timestamp {
            return Err(TrackError::OutOfOrder {
                key: group.key.clone(),
                index: index + 1,
                timestamp: pair[1].timestamp,
                previous: pair[0].timestamp,
            });
        }
    }

    Ok(())
}

fn track_unchecked(group: &StormGroup, options: &TrackOptions) -> Option<Track> {
    let geometry = match group.observations.as_slice() {
        [] => return None,
        [only] => match options.single_point {
            DegeneratePolicy::Skip => return None,
            DegeneratePolicy::Point => TrackGeometry::Point(Point(coord(only))),
        },
        many => TrackGeometry::Line(LineString::new(many.iter().map(coord).collect())),
    };

    Some(Track {
        key: group.key.clone(),
        geometry,
        crs: options.crs,
        observation_count: group.len(),
    })
}

fn segments_unchecked(group: &StormGroup, crs: Crs) -> Vec<Segment> {
    group
        .observations
        .windows(2)
        .enumerate()
        .map(|(index, pair)| Segment {
            key: group.key.clone(),
            index,
            geometry: LineString::new(vec![coord(&pair[0]), coord(&pair[1])]),
            crs,
            attributes: pair[0].clone(),
        })
        .collect()
}

/// Builds the track polyline for one group.
///
/// Returns `Ok(None)` for an empty group, and for a single-fix group under
/// [`DegeneratePolicy::Skip`].
///
/// # Errors
///
/// Returns [`TrackError`] if a coordinate is non-finite or the fixes are
/// not in time order.
pub fn build_track(group: &StormGroup, options: &TrackOptions) -> Result<Option<Track>, TrackError> {
    validate(group)?;
    Ok(track_unchecked(group, options))
}

/// Builds one two-point segment per consecutive pair of fixes.
///
/// # Errors
///
/// Returns [`TrackError`] if a coordinate is non-finite or the fixes are
/// not in time order.
pub fn build_segments(group: &StormGroup) -> Result<Vec<Segment>, TrackError> {
    validate(group)?;
    Ok(segments_unchecked(group, Crs::default()))
}

/// Builds the track and segments for one group.
///
/// # Errors
///
/// Returns [`TrackError`] if a coordinate is non-finite or the fixes are
/// not in time order.
pub fn build_group(
    group: &StormGroup,
    options: &TrackOptions,
) -> Result<Option<GroupGeometry>, TrackError> {
    validate(group)?;

    let Some(track) = track_unchecked(group, options) else {
        return Ok(None);
    };

    Ok(Some(GroupGeometry {
        track,
        segments: segments_unchecked(group, options.crs),
    }))
}

/// Groups observations and builds every group.
#[must_use]
pub fn build_tracks(observations: &[Observation], options: &TrackOptions) -> TrackSet {
    build_tracks_with_progress(observations, options, &crate::progress::null_progress())
}

/// Same as [`build_tracks`], reporting one unit of progress per group.
#[must_use]
pub fn build_tracks_with_progress(
    observations: &[Observation],
    options: &TrackOptions,
    progress: &Arc<dyn ProgressCallback>,
) -> TrackSet {
    let groups = group_observations(observations);
    progress.set_total(groups.len() as u64);

    let mut set = TrackSet::default();

    for group in groups {
        progress.set_message(format!("Building {}", group.key));
        let result = build_group(&group, options);
        set.push(group.key, result);
        progress.inc(1);
    }

    progress.finish(format!(
        "Built {} tracks, {} segments",
        set.tracks.len(),
        set.segments.len()
    ));

    set
}

/// Same as [`build_tracks`], building groups concurrently with rayon.
///
/// Results are merged in group order, so the output equals the sequential
/// builder's.
#[cfg(feature = "parallel")]
#[must_use]
pub fn build_tracks_parallel(observations: &[Observation], options: &TrackOptions) -> TrackSet {
    use rayon::prelude::*;

    let groups = group_observations(observations);

    let results: Vec<_> = groups
        .par_iter()
        .map(|group| (group.key.clone(), build_group(group, options)))
        .collect();

    let mut set = TrackSet::default();
    for (key, result) in results {
        set.push(key, result);
    }
    set
}
