#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Storm observation types, status taxonomy and hurricane categories.
//!
//! An [`Observation`] is a single fix of a storm at an instant. Fixes that
//! share a [`StormKey`] (storm name plus year) form one storm-year group,
//! which downstream crates turn into track geometry.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Identifies a storm-year group: a storm name plus the year it formed.
///
/// Atlantic storm names are recycled, so the name alone is not unique.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StormKey {
    /// Storm name as published (e.g. "Irma").
    pub name: String,
    /// Year of the storm.
    pub year: i32,
}

impl StormKey {
    #[must_use]
    pub fn new(name: impl Into<String>, year: i32) -> Self {
        Self {
            name: name.into(),
            year,
        }
    }
}

impl std::fmt::Display for StormKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.name, self.year)
    }
}

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Longitude, degrees east.
    pub lon: f64,
    /// Latitude, degrees north.
    pub lat: f64,
}

impl Position {
    #[must_use]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Returns `true` if both components are finite (not NaN or infinite).
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

/// Storm status as recorded for each fix.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum StormStatus {
    #[serde(rename = "disturbance")]
    #[strum(serialize = "disturbance")]
    Disturbance,
    #[serde(rename = "tropical wave")]
    #[strum(serialize = "tropical wave")]
    TropicalWave,
    #[serde(rename = "other low")]
    #[strum(serialize = "other low")]
    OtherLow,
    #[serde(rename = "subtropical depression")]
    #[strum(serialize = "subtropical depression")]
    SubtropicalDepression,
    #[serde(rename = "subtropical storm")]
    #[strum(serialize = "subtropical storm")]
    SubtropicalStorm,
    /// Closed circulation with sustained winds below 34 kt.
    #[serde(rename = "tropical depression")]
    #[strum(serialize = "tropical depression")]
    TropicalDepression,
    /// Sustained winds of 34-63 kt.
    #[serde(rename = "tropical storm")]
    #[strum(serialize = "tropical storm")]
    TropicalStorm,
    /// Sustained winds of 64 kt or more.
    #[serde(rename = "hurricane")]
    #[strum(serialize = "hurricane")]
    Hurricane,
    /// Storm has lost its tropical characteristics.
    #[serde(rename = "extratropical")]
    #[strum(serialize = "extratropical")]
    Extratropical,
}

impl StormStatus {
    /// Whether this status describes a tropical cyclone proper (depression,
    /// storm or hurricane).
    #[must_use]
    pub const fn is_tropical_cyclone(self) -> bool {
        matches!(
            self,
            Self::TropicalDepression | Self::TropicalStorm | Self::Hurricane
        )
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Disturbance,
            Self::TropicalWave,
            Self::OtherLow,
            Self::SubtropicalDepression,
            Self::SubtropicalStorm,
            Self::TropicalDepression,
            Self::TropicalStorm,
            Self::Hurricane,
            Self::Extratropical,
        ]
    }
}

/// Saffir-Simpson hurricane wind scale category.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum HurricaneCategory {
    /// 64-82 kt
    #[strum(serialize = "1")]
    One = 1,
    /// 83-95 kt
    #[strum(serialize = "2")]
    Two = 2,
    /// 96-112 kt
    #[strum(serialize = "3")]
    Three = 3,
    /// 113-136 kt
    #[strum(serialize = "4")]
    Four = 4,
    /// 137 kt or more
    #[strum(serialize = "5")]
    Five = 5,
}

impl HurricaneCategory {
    /// Returns the numeric value of this category.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a category from its numeric value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 1-5.
    pub const fn from_value(value: u8) -> Result<Self, InvalidCategoryError> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            4 => Ok(Self::Four),
            5 => Ok(Self::Five),
            _ => Err(InvalidCategoryError { value }),
        }
    }

    /// Classifies a sustained wind speed in knots.
    ///
    /// Returns `None` below hurricane strength (64 kt).
    #[must_use]
    pub const fn from_wind(knots: u16) -> Option<Self> {
        match knots {
            0..=63 => None,
            64..=82 => Some(Self::One),
            83..=95 => Some(Self::Two),
            96..=112 => Some(Self::Three),
            113..=136 => Some(Self::Four),
            _ => Some(Self::Five),
        }
    }
}

impl From<HurricaneCategory> for u8 {
    fn from(category: HurricaneCategory) -> Self {
        category.value()
    }
}

impl TryFrom<u8> for HurricaneCategory {
    type Error = InvalidCategoryError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

/// Error returned when attempting to create a [`HurricaneCategory`] from an
/// invalid numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCategoryError {
    /// The invalid category value that was provided.
    pub value: u8,
}

impl std::fmt::Display for InvalidCategoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid hurricane category {}: expected 1-5", self.value)
    }
}

impl std::error::Error for InvalidCategoryError {}

/// One recorded fix of a storm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    /// Storm-year group this fix belongs to.
    pub key: StormKey,
    /// Time of the fix (UTC).
    pub timestamp: NaiveDateTime,
    /// Storm center.
    pub position: Position,
    /// Maximum sustained wind in knots.
    pub wind: u16,
    /// Central pressure in millibars, when recorded.
    pub pressure: Option<u16>,
    pub status: StormStatus,
    /// Saffir-Simpson category; `None` below hurricane strength.
    pub category: Option<HurricaneCategory>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn status_parses_dataset_spelling() {
        assert_eq!(
            StormStatus::from_str("tropical depression").unwrap(),
            StormStatus::TropicalDepression
        );
        assert_eq!(
            StormStatus::from_str("Hurricane").unwrap(),
            StormStatus::Hurricane
        );
        assert!(StormStatus::from_str("typhoon").is_err());
    }

    #[test]
    fn tropical_cyclone_statuses() {
        let tropical: Vec<_> = StormStatus::all()
            .iter()
            .filter(|s| s.is_tropical_cyclone())
            .collect();
        assert_eq!(
            tropical,
            [
                &StormStatus::TropicalDepression,
                &StormStatus::TropicalStorm,
                &StormStatus::Hurricane
            ]
        );
    }

    #[test]
    fn status_display_matches_parse() {
        for status in StormStatus::all() {
            let parsed = StormStatus::from_str(&status.to_string()).unwrap();
            assert_eq!(parsed, *status);
        }
    }

    #[test]
    fn category_from_value_bounds() {
        assert_eq!(HurricaneCategory::from_value(3), Ok(HurricaneCategory::Three));
        assert!(HurricaneCategory::from_value(0).is_err());
        assert!(HurricaneCategory::from_value(6).is_err());
    }

    #[test]
    fn category_from_wind_thresholds() {
        assert_eq!(HurricaneCategory::from_wind(63), None);
        assert_eq!(HurricaneCategory::from_wind(64), Some(HurricaneCategory::One));
        assert_eq!(HurricaneCategory::from_wind(95), Some(HurricaneCategory::Two));
        assert_eq!(HurricaneCategory::from_wind(96), Some(HurricaneCategory::Three));
        assert_eq!(HurricaneCategory::from_wind(136), Some(HurricaneCategory::Four));
        assert_eq!(HurricaneCategory::from_wind(160), Some(HurricaneCategory::Five));
    }

    #[test]
    fn category_serializes_as_number() {
        let json = serde_json::to_string(&HurricaneCategory::Four).unwrap();
        assert_eq!(json, "4");
        let back: HurricaneCategory = serde_json::from_str("2").unwrap();
        assert_eq!(back, HurricaneCategory::Two);
    }

    #[test]
    fn storm_key_orders_by_name_then_year() {
        let mut keys = vec![
            StormKey::new("Irma", 2017),
            StormKey::new("Andrew", 1992),
            StormKey::new("Irma", 1978),
        ];
        keys.sort();
        assert_eq!(keys[0], StormKey::new("Andrew", 1992));
        assert_eq!(keys[1], StormKey::new("Irma", 1978));
        assert_eq!(keys[2].to_string(), "Irma/2017");
    }
}
