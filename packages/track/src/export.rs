//! `GeoJSON` export of tracks and segments.
//!
//! Track features carry the group metadata (and summary fields when
//! available). Segment features carry the leading fix's attributes, which
//! map viewers use for gradient coloring and popups.

use std::collections::BTreeMap;
use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use serde_json::json;
use storm_tracks_storm_models::StormKey;

use crate::Crs;
use crate::build::{Segment, Track};
use crate::summary::TrackSummary;

/// Errors from writing `GeoJSON` output.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// I/O error writing the output file.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Builds a feature collection with one feature per track.
///
/// Summaries are matched to tracks by key; tracks without a summary get
/// only `name`, `year` and `observations`.
#[must_use]
pub fn tracks_to_feature_collection(
    tracks: &[Track],
    summaries: &[TrackSummary],
) -> FeatureCollection {
    let by_key: BTreeMap<&StormKey, &TrackSummary> =
        summaries.iter().map(|s| (&s.key, s)).collect();

    let features = tracks
        .iter()
        .map(|track| {
            let mut properties = JsonObject::new();
            properties.insert("name".to_string(), json!(track.key.name));
            properties.insert("year".to_string(), json!(track.key.year));
            properties.insert("observations".to_string(), json!(track.observation_count));

            if let Some(summary) = by_key.get(&track.key) {
                properties.insert("firstFix".to_string(), json!(summary.first_fix));
                properties.insert("lastFix".to_string(), json!(summary.last_fix));
                properties.insert("tropicalFixes".to_string(), json!(summary.tropical_fixes));
                properties.insert("maxWind".to_string(), json!(summary.max_wind));
                properties.insert("minPressure".to_string(), json!(summary.min_pressure));
                properties.insert(
                    "peakCategory".to_string(),
                    json!(summary.peak_category.map(u8::from)),
                );
                properties.insert("lengthKm".to_string(), json!(summary.length_km));
            }

            let geometry = track.geometry.to_geometry();
            feature(Geometry::new(geojson::Value::from(&geometry)), properties)
        })
        .collect();

    collection(features, tracks.first().map_or_else(Crs::default, |t| t.crs))
}

/// Builds a feature collection with one feature per segment.
#[must_use]
pub fn segments_to_feature_collection(segments: &[Segment]) -> FeatureCollection {
    let features = segments
        .iter()
        .map(|segment| {
            let fix = &segment.attributes;
            let mut properties = JsonObject::new();
            properties.insert("name".to_string(), json!(segment.key.name));
            properties.insert("year".to_string(), json!(segment.key.year));
            properties.insert("index".to_string(), json!(segment.index));
            properties.insert("timestamp".to_string(), json!(fix.timestamp));
            properties.insert("status".to_string(), json!(fix.status.as_ref()));
            properties.insert("category".to_string(), json!(fix.category.map(u8::from)));
            properties.insert("wind".to_string(), json!(fix.wind));
            properties.insert("pressure".to_string(), json!(fix.pressure));

            feature(
                Geometry::new(geojson::Value::from(&segment.geometry)),
                properties,
            )
        })
        .collect();

    collection(
        features,
        segments.first().map_or_else(Crs::default, |s| s.crs),
    )
}

/// Writes a feature collection as pretty-printed `GeoJSON`.
///
/// # Errors
///
/// Returns [`ExportError`] if serialization or the file write fails.
pub fn write_feature_collection(
    path: &Path,
    collection: &FeatureCollection,
) -> Result<(), ExportError> {
    let body = serde_json::to_string_pretty(collection)?;
    std::fs::write(path, body).map_err(|e| ExportError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    log::info!(
        "Wrote {} features to {}",
        collection.features.len(),
        path.display()
    );
    Ok(())
}

fn feature(geometry: Geometry, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Wraps features in a collection tagged with a named CRS member.
fn collection(features: Vec<Feature>, crs: Crs) -> FeatureCollection {
    let mut foreign_members = JsonObject::new();
    foreign_members.insert(
        "crs".to_string(),
        json!({ "type": "name", "properties": { "name": crs.as_str() } }),
    );

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(foreign_members),
    }
}
