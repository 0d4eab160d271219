//! Per-track summaries for legends, popups and commentary.

use chrono::NaiveDateTime;
use geo::{BoundingRect, Coord};
use serde::Serialize;
use storm_tracks_storm_models::{HurricaneCategory, Observation, StormKey, StormStatus};

use crate::build::Track;
use crate::group::{StormGroup, group_observations};

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Aggregate facts about one storm-year track.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSummary {
    pub key: StormKey,
    pub observations: usize,
    /// Fixes taken while the system was a tropical depression, storm or
    /// hurricane.
    pub tropical_fixes: usize,
    pub first_fix: NaiveDateTime,
    pub last_fix: NaiveDateTime,
    /// Highest sustained wind in knots.
    pub max_wind: u16,
    /// Lowest recorded central pressure in millibars.
    pub min_pressure: Option<u16>,
    /// Highest recorded category, falling back to the category implied by
    /// `max_wind` when the dataset records none.
    pub peak_category: Option<HurricaneCategory>,
    /// Distinct statuses in order of first appearance.
    pub statuses: Vec<StormStatus>,
    /// Great-circle length of the track.
    pub length_km: f64,
    /// `[min_lon, min_lat, max_lon, max_lat]`
    pub bbox: [f64; 4],
}

impl TrackSummary {
    /// Summarizes a built track together with the group it came from.
    ///
    /// Returns `None` if the group is empty.
    #[must_use]
    pub fn from_group(track: &Track, group: &StormGroup) -> Option<Self> {
        let first = group.observations.first()?;
        let last = group.observations.last()?;

        let max_wind = group.observations.iter().map(|o| o.wind).max().unwrap_or(0);
        let min_pressure = group.observations.iter().filter_map(|o| o.pressure).min();
        let peak_category = group
            .observations
            .iter()
            .filter_map(|o| o.category)
            .max()
            .or_else(|| HurricaneCategory::from_wind(max_wind));

        let tropical_fixes = group
            .observations
            .iter()
            .filter(|o| o.status.is_tropical_cyclone())
            .count();

        let mut statuses = Vec::new();
        for observation in &group.observations {
            if !statuses.contains(&observation.status) {
                statuses.push(observation.status);
            }
        }

        let coords = track.geometry.coords();
        let geometry = track.geometry.to_geometry();
        let bbox = geometry.bounding_rect().map_or(
            [first.position.lon, first.position.lat, first.position.lon, first.position.lat],
            |rect| [rect.min().x, rect.min().y, rect.max().x, rect.max().y],
        );

        Some(Self {
            key: track.key.clone(),
            observations: group.len(),
            tropical_fixes,
            first_fix: first.timestamp,
            last_fix: last.timestamp,
            max_wind,
            min_pressure,
            peak_category,
            statuses,
            length_km: path_length_km(&coords),
            bbox,
        })
    }

    /// Hours between the first and last fix.
    #[must_use]
    pub fn duration_hours(&self) -> i64 {
        (self.last_fix - self.first_fix).num_hours()
    }
}

/// Summarizes every track, pairing each with its group from `observations`.
///
/// Output follows the order of `tracks`.
#[must_use]
pub fn summarize_tracks(observations: &[Observation], tracks: &[Track]) -> Vec<TrackSummary> {
    let groups = group_observations(observations);

    tracks
        .iter()
        .filter_map(|track| {
            let group = groups.iter().find(|g| g.key == track.key)?;
            TrackSummary::from_group(track, group)
        })
        .collect()
}

/// Sum of haversine distances between consecutive vertices.
#[must_use]
pub fn path_length_km(coords: &[Coord<f64>]) -> f64 {
    coords
        .windows(2)
        .map(|pair| haversine_km(pair[0], pair[1]))
        .sum()
}

/// Great-circle distance between two lon/lat coordinates.
#[must_use]
pub fn haversine_km(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let lat1 = a.y.to_radians();
    let lat2 = b.y.to_radians();
    let d_lat = (b.y - a.y).to_radians();
    let d_lon = (b.x - a.x).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}
