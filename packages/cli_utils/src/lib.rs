#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Console plumbing shared by the `storm_tracks` commands: a logger that
//! cooperates with progress bars, and a bar counting built storm groups.

use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use storm_tracks_track::progress::ProgressCallback;

pub use indicatif::MultiProgress;

const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg}";
const GROUPS_TEMPLATE: &str = "  {msg} {wide_bar:.cyan/dim} {pos}/{len} groups [{elapsed_precise}]";

/// Reports track building progress, one tick per storm-year group.
///
/// Spins until the builder announces how many groups it will build, then
/// switches to a counted bar.
pub struct IndicatifProgress {
    bar: ProgressBar,
    counted: ProgressStyle,
}

impl IndicatifProgress {
    /// Adds a group counter to `multi`, labelled with `message`.
    #[must_use]
    pub fn groups_bar(multi: &MultiProgress, message: &str) -> Arc<dyn ProgressCallback> {
        let spinner = ProgressStyle::with_template(SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let counted = ProgressStyle::with_template(GROUPS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");

        let bar = multi.add(ProgressBar::new_spinner().with_style(spinner));
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));

        Arc::new(Self { bar, counted })
    }
}

impl ProgressCallback for IndicatifProgress {
    fn set_total(&self, total: u64) {
        self.bar.set_style(self.counted.clone());
        self.bar.set_length(total);
        self.bar.reset();
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}

/// Installs `pretty_env_logger` behind `indicatif-log-bridge` and returns
/// the [`MultiProgress`] every bar of the run has to join.
///
/// The level is `info` unless `RUST_LOG` says otherwise. Calling this again
/// keeps the first logger and only hands back a fresh [`MultiProgress`].
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(log::LevelFilter::Info);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    let logger = builder.build();
    let level = logger.filter();

    if LogWrapper::new(multi.clone(), logger).try_init().is_ok() {
        log::set_max_level(level);
    } else {
        log::debug!("Logger already installed; keeping it");
    }

    multi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logger_can_be_initialized_twice() {
        let _first = init_logger();
        let second = init_logger();
        let progress = IndicatifProgress::groups_bar(&second, "Building tracks");
        progress.set_total(2);
        progress.inc(2);
        progress.finish("done".to_string());
    }
}
