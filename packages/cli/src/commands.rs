//! `build` and `summary` command implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use storm_tracks_dataset::load_observations;
use storm_tracks_storm_models::Observation;
use storm_tracks_track::export::{
    segments_to_feature_collection, tracks_to_feature_collection, write_feature_collection,
};
use storm_tracks_track::progress::ProgressCallback;
use storm_tracks_track::{TrackSet, TrackSummary, summarize_tracks};

use crate::config::RunConfig;

/// File name of the per-storm track collection.
pub const TRACKS_FILE: &str = "tracks.geojson";
/// File name of the per-leg segment collection.
pub const SEGMENTS_FILE: &str = "segments.geojson";

/// Paths written by [`run_build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutputs {
    pub tracks: PathBuf,
    pub segments: PathBuf,
}

/// Loads and filters observations, then builds every selected group.
fn prepare(
    config: &RunConfig,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<(Vec<Observation>, TrackSet), Box<dyn std::error::Error>> {
    let observations = load_observations(&config.input, &config.storms)?;
    if observations.is_empty() {
        return Err(format!("No observations selected from {}", config.input.display()).into());
    }

    let set = build_with(&observations, config, progress);

    for failure in &set.failures {
        log::warn!("Skipped {}: {}", failure.key, failure.error);
    }
    if set.tracks.is_empty() && !set.failures.is_empty() {
        return Err("Every selected storm failed to build".into());
    }

    Ok((observations, set))
}

#[cfg(not(feature = "parallel"))]
fn build_with(
    observations: &[Observation],
    config: &RunConfig,
    progress: &Arc<dyn ProgressCallback>,
) -> TrackSet {
    storm_tracks_track::build_tracks_with_progress(observations, &config.track_options(), progress)
}

#[cfg(feature = "parallel")]
fn build_with(
    observations: &[Observation],
    config: &RunConfig,
    progress: &Arc<dyn ProgressCallback>,
) -> TrackSet {
    let set = storm_tracks_track::build_tracks_parallel(observations, &config.track_options());
    progress.finish(format!(
        "Built {} tracks, {} segments",
        set.tracks.len(),
        set.segments.len()
    ));
    set
}

/// Builds tracks and segments and writes both `GeoJSON` files.
///
/// # Errors
///
/// Returns an error if loading fails, nothing is selected, every group
/// fails, or an output file cannot be written.
pub fn run_build(
    config: &RunConfig,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<BuildOutputs, Box<dyn std::error::Error>> {
    let (observations, set) = prepare(config, progress)?;

    log::info!(
        "Built {} tracks and {} segments ({} skipped, {} failed)",
        set.tracks.len(),
        set.segments.len(),
        set.skipped.len(),
        set.failures.len()
    );

    for track in &set.tracks {
        log::debug!(
            "{}: {} fixes, {} segments",
            track.key,
            track.observation_count,
            set.segments_for(&track.key).count()
        );
    }

    let summaries = summarize_tracks(&observations, &set.tracks);

    std::fs::create_dir_all(&config.output_dir)?;
    let outputs = BuildOutputs {
        tracks: config.output_dir.join(TRACKS_FILE),
        segments: config.output_dir.join(SEGMENTS_FILE),
    };

    write_feature_collection(
        &outputs.tracks,
        &tracks_to_feature_collection(&set.tracks, &summaries),
    )?;
    write_feature_collection(&outputs.segments, &segments_to_feature_collection(&set.segments))?;

    Ok(outputs)
}

/// Builds tracks and returns one summary per track.
///
/// # Errors
///
/// Same as [`run_build`], minus the file writes.
pub fn run_summary(
    config: &RunConfig,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<TrackSummary>, Box<dyn std::error::Error>> {
    let (observations, set) = prepare(config, progress)?;
    Ok(summarize_tracks(&observations, &set.tracks))
}

/// Formats a summary as a single human-readable line.
#[must_use]
pub fn format_summary(summary: &TrackSummary) -> String {
    let pressure = summary
        .min_pressure
        .map_or_else(|| "n/a".to_string(), |p| format!("{p} mb"));
    let category = summary
        .peak_category
        .map_or_else(|| "-".to_string(), |c| c.to_string());

    format!(
        "{}: {} fixes ({} tropical) over {}h, {} -> {}, max wind {} kt, min pressure {pressure}, peak category {category}, {:.0} km",
        summary.key,
        summary.observations,
        summary.tropical_fixes,
        summary.duration_hours(),
        summary.first_fix.format("%Y-%m-%d %H:%M"),
        summary.last_fix.format("%Y-%m-%d %H:%M"),
        summary.max_wind,
        summary.length_km,
    )
}

/// Resolves a CLI path override against the configured value.
#[must_use]
pub fn override_path(configured: &Path, cli: Option<PathBuf>) -> PathBuf {
    cli.unwrap_or_else(|| configured.to_path_buf())
}

#[cfg(test)]
mod tests {
    use storm_tracks_dataset::{StormFilter, StormSelection};
    use storm_tracks_track::DegeneratePolicy;
    use storm_tracks_track::progress::null_progress;

    use super::*;

    const CSV: &str = "name,year,month,day,hour,lat,long,status,category,wind,pressure\n\
        Irma,2017,9,1,0,15,-20,hurricane,1,80,980\n\
        Irma,2017,9,1,6,16,-25,hurricane,2,95,965\n\
        Irma,2017,9,1,12,17,-30,hurricane,3,110,950\n\
        Irma,2017,9,1,18,18,-35,hurricane,4,130,930\n\
        X,1999,7,4,0,20,-60,tropical depression,NA,30,1008\n\
        Maria,2017,9,16,12,12.2,-49.7,tropical storm,NA,45,1002\n";

    fn setup(name: &str) -> (PathBuf, RunConfig) {
        setup_with(name, CSV)
    }

    fn setup_with(name: &str, csv: &str) -> (PathBuf, RunConfig) {
        let tmp = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&tmp);
        std::fs::create_dir_all(&tmp).unwrap();

        let input = tmp.join("storms.csv");
        std::fs::write(&input, csv).unwrap();

        let config = RunConfig {
            input,
            output_dir: tmp.join("out"),
            single_point: DegeneratePolicy::Skip,
            storms: StormSelection::new(vec![
                StormFilter::new("Irma", Some(2017)),
                StormFilter::new("X", Some(1999)),
            ]),
        };
        (tmp, config)
    }

    #[test]
    fn build_writes_tracks_and_segments() {
        let (tmp, config) = setup("storm_tracks_cli_build_test");

        let outputs = run_build(&config, &null_progress()).unwrap();

        let tracks = std::fs::read_to_string(&outputs.tracks).unwrap();
        let segments = std::fs::read_to_string(&outputs.segments).unwrap();
        assert_eq!(tracks.matches("\"Feature\"").count(), 1);
        assert_eq!(segments.matches("\"Feature\"").count(), 3);
        assert!(!segments.contains("Maria"));
        assert!(!tracks.contains("\"X\""));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn summary_reports_selected_tracks() {
        let (tmp, config) = setup("storm_tracks_cli_summary_test");

        let summaries = run_summary(&config, &null_progress()).unwrap();
        assert_eq!(summaries.len(), 1);

        let line = format_summary(&summaries[0]);
        assert!(line.starts_with("Irma/2017: 4 fixes (4 tropical) over 18h"), "{line}");
        assert!(line.contains("max wind 130 kt"), "{line}");
        assert!(line.contains("min pressure 930 mb"), "{line}");
        assert!(line.contains("peak category 4"), "{line}");

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn bad_row_in_unselected_storm_is_ignored() {
        let csv = format!("{CSV}Bob,1991,8,16,0,NaN,-70,hurricane,1,NA,NA\n");
        let (tmp, config) = setup_with("storm_tracks_cli_unselected_bad_row_test", &csv);

        let outputs = run_build(&config, &null_progress()).unwrap();

        let segments = std::fs::read_to_string(&outputs.segments).unwrap();
        assert_eq!(segments.matches("\"Feature\"").count(), 3);
        assert!(!segments.contains("Bob"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn non_finite_fix_fails_only_its_storm() {
        let csv = format!(
            "{CSV}Bob,1991,8,16,0,NaN,-70,hurricane,1,70,990\n\
             Bob,1991,8,16,6,NA,-71,hurricane,1,75,985\n\
             Bob,1991,8,16,12,32.0,-72,hurricane,1,80,980\n"
        );
        let (tmp, mut config) = setup_with("storm_tracks_cli_non_finite_test", &csv);
        config.storms.filters.push(StormFilter::new("Bob", Some(1991)));

        let progress = null_progress();
        let observations = load_observations(&config.input, &config.storms).unwrap();
        let set = build_with(&observations, &config, &progress);
        assert_eq!(set.failures.len(), 1);
        assert_eq!(set.failures[0].key.name, "Bob");
        assert!(matches!(
            set.failures[0].error,
            storm_tracks_track::TrackError::NonFiniteCoordinate { index: 0, .. }
        ));

        let summaries = run_summary(&config, &progress).unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].key.name, "Irma");

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn every_group_failing_is_an_error() {
        let csv = "name,year,month,day,hour,lat,long,status,category,wind,pressure\n\
            Bob,1991,8,16,0,NaN,-70,hurricane,1,70,990\n\
            Bob,1991,8,16,6,31.0,-71,hurricane,1,75,985\n";
        let (tmp, mut config) = setup_with("storm_tracks_cli_all_failed_test", csv);
        config.storms = StormSelection::new(vec![StormFilter::new("Bob", None)]);

        assert!(run_build(&config, &null_progress()).is_err());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn empty_selection_is_an_error() {
        let (tmp, mut config) = setup("storm_tracks_cli_empty_test");
        config.storms = StormSelection::new(vec![StormFilter::new("Nobody", None)]);

        assert!(run_build(&config, &null_progress()).is_err());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn cli_override_wins() {
        let configured = Path::new("data/storms.csv");
        assert_eq!(override_path(configured, None), configured);
        assert_eq!(
            override_path(configured, Some(PathBuf::from("other.csv"))),
            PathBuf::from("other.csv")
        );
    }
}
