//! Storms CSV reader.
//!
//! Expects the column layout of the public `storms` table:
//! `name,year,month,day,hour,lat,long,status,category,wind,pressure,...`.
//! Extra columns are ignored. `NA` and empty cells mark missing values.
//!
//! Rows are matched against a [`StormSelection`] on their name and year
//! before anything else is parsed, so a malformed row belonging to a storm
//! nobody asked for never stops a run.

use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use storm_tracks_storm_models::{
    HurricaneCategory, Observation, Position, StormKey, StormStatus,
};

use crate::{DatasetError, StormSelection};

/// A raw row from the storms CSV, before normalization.
///
/// Every field is kept as text so that `NA` cells reach [`RawStormRow::to_observation`]
/// instead of failing deserialization with an opaque type error.
#[derive(Debug, Deserialize)]
pub struct RawStormRow {
    pub name: String,
    pub year: String,
    pub month: String,
    pub day: String,
    pub hour: String,
    pub lat: String,
    /// Longitude. The dataset spells this column `long`.
    #[serde(rename = "long")]
    pub lon: String,
    pub status: String,
    #[serde(default)]
    pub category: String,
    pub wind: String,
    #[serde(default)]
    pub pressure: String,
}

impl RawStormRow {
    /// Parses the storm name and year of this row.
    ///
    /// # Errors
    ///
    /// Returns a message if the name is missing or the year is not a number.
    pub fn key(&self) -> Result<StormKey, String> {
        let name = self.name.trim();
        if is_missing(name) {
            return Err("missing storm name".to_string());
        }
        let year: i32 = required(&self.year, "year")?;
        Ok(StormKey::new(name, year))
    }

    /// Whether this row can belong to a storm the selection keeps.
    ///
    /// Rows whose year cannot be parsed are kept when the name matches, so
    /// that the bad year is reported instead of silently dropped.
    fn is_selected(&self, selection: &StormSelection) -> bool {
        self.key().map_or_else(
            |_| selection.matches_name(self.name.trim()),
            |key| selection.matches(&key),
        )
    }

    /// Converts this raw row into an [`Observation`].
    ///
    /// A missing coordinate becomes NaN rather than an error. The fix stays
    /// in its storm so that the track builder rejects that storm alone
    /// instead of building a path with a hole in it.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first field that is missing or
    /// cannot be parsed.
    pub fn to_observation(&self) -> Result<Observation, String> {
        let key = self.key()?;
        let year = key.year;
        let month: u32 = required(&self.month, "month")?;
        let day: u32 = required(&self.day, "day")?;
        let hour: u32 = required(&self.hour, "hour")?;

        let timestamp = to_timestamp(year, month, day, hour).ok_or_else(|| {
            format!("invalid date {year:04}-{month:02}-{day:02} {hour:02}:00")
        })?;

        let lat: f64 = optional(&self.lat, "lat")?.unwrap_or(f64::NAN);
        let lon: f64 = optional(&self.lon, "long")?.unwrap_or(f64::NAN);
        let position = Position::new(lon, lat);

        let status = StormStatus::from_str(self.status.trim())
            .map_err(|_| format!("unknown status {:?}", self.status.trim()))?;

        let wind: u16 = required(&self.wind, "wind")?;
        let pressure: Option<u16> = optional(&self.pressure, "pressure")?;
        let category = parse_category(&self.category)?;

        Ok(Observation {
            key,
            timestamp,
            position,
            wind,
            pressure,
            status,
            category,
        })
    }
}

/// Opens a storms CSV file and reads the selected storms' fixes.
///
/// # Errors
///
/// Returns [`DatasetError::Io`] if the file cannot be opened, and any error
/// from [`read_observations`].
pub fn load_observations(
    path: &Path,
    selection: &StormSelection,
) -> Result<Vec<Observation>, DatasetError> {
    let file = std::fs::File::open(path).map_err(|e| DatasetError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    let observations = read_observations(file, selection)?;
    log::info!(
        "Loaded {} observations from {}",
        observations.len(),
        path.display()
    );

    Ok(observations)
}

/// Reads the selected storms' fixes from any reader, preserving row order.
///
/// Rows of unselected storms are skipped before their remaining fields are
/// looked at. An empty selection keeps every row.
///
/// # Errors
///
/// Returns [`DatasetError::Csv`] for malformed CSV and [`DatasetError::Row`]
/// for the first selected row that cannot be normalized.
pub fn read_observations(
    reader: impl Read,
    selection: &StormSelection,
) -> Result<Vec<Observation>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut observations = Vec::new();
    let mut unselected = 0_usize;

    for (idx, result) in csv_reader.deserialize::<RawStormRow>().enumerate() {
        let row = idx as u64 + 1;
        let raw = result?;
        if !raw.is_selected(selection) {
            unselected += 1;
            continue;
        }
        let observation = raw
            .to_observation()
            .map_err(|message| DatasetError::Row { row, message })?;
        observations.push(observation);
    }

    if unselected > 0 {
        log::debug!("Skipped {unselected} rows of unselected storms");
    }
    for filter in selection.unmatched(&observations) {
        log::warn!("No observations found for selected storm {filter}");
    }

    Ok(observations)
}

fn is_missing(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("NA")
}

fn required<T: FromStr>(value: &str, field: &str) -> Result<T, String> {
    optional(value, field)?.ok_or_else(|| format!("missing {field}"))
}

fn optional<T: FromStr>(value: &str, field: &str) -> Result<Option<T>, String> {
    let value = value.trim();
    if is_missing(value) {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| format!("invalid {field} {value:?}"))
}

/// Older releases of the dataset encode tropical depressions as `-1` and
/// tropical storms as `0`; both mean "no hurricane category".
fn parse_category(value: &str) -> Result<Option<HurricaneCategory>, String> {
    let Some(raw) = optional::<i8>(value, "category")? else {
        return Ok(None);
    };
    if raw <= 0 {
        return Ok(None);
    }
    u8::try_from(raw)
        .ok()
        .and_then(|v| HurricaneCategory::from_value(v).ok())
        .map(Some)
        .ok_or_else(|| format!("invalid category {raw}"))
}

fn to_timestamp(year: i32, month: u32, day: u32, hour: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, 0, 0)
}
