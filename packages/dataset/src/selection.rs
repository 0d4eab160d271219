//! Storm selection filter.

use serde::{Deserialize, Serialize};
use storm_tracks_storm_models::{Observation, StormKey};

/// One storm to keep: a name, optionally pinned to a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StormFilter {
    /// Storm name, compared case-insensitively.
    pub name: String,
    /// Year to match. `None` keeps every storm with this name.
    #[serde(default)]
    pub year: Option<i32>,
}

impl StormFilter {
    #[must_use]
    pub fn new(name: impl Into<String>, year: Option<i32>) -> Self {
        Self {
            name: name.into(),
            year,
        }
    }

    #[must_use]
    pub fn matches(&self, key: &StormKey) -> bool {
        self.name.eq_ignore_ascii_case(&key.name) && self.year.is_none_or(|y| y == key.year)
    }
}

impl std::fmt::Display for StormFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.year {
            Some(year) => write!(f, "{}/{year}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// The set of storms a run is restricted to.
///
/// An empty selection keeps every observation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StormSelection {
    pub filters: Vec<StormFilter>,
}

impl StormSelection {
    #[must_use]
    pub const fn new(filters: Vec<StormFilter>) -> Self {
        Self { filters }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    #[must_use]
    pub fn matches(&self, key: &StormKey) -> bool {
        self.filters.is_empty() || self.filters.iter().any(|f| f.matches(key))
    }

    /// Whether any filter names this storm, ignoring years.
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        self.filters.is_empty() || self.filters.iter().any(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Returns the filters that match none of the given observations.
    #[must_use]
    pub fn unmatched(&self, observations: &[Observation]) -> Vec<&StormFilter> {
        self.filters
            .iter()
            .filter(|f| !observations.iter().any(|o| f.matches(&o.key)))
            .collect()
    }
}
