//! Partitioning observations into storm-year groups.

use std::collections::BTreeMap;

use storm_tracks_storm_models::{Observation, StormKey};

/// All observations sharing one [`StormKey`], in their original order.
#[derive(Debug, Clone, PartialEq)]
pub struct StormGroup {
    pub key: StormKey,
    pub observations: Vec<Observation>,
}

impl StormGroup {
    #[must_use]
    pub const fn new(key: StormKey, observations: Vec<Observation>) -> Self {
        Self { key, observations }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Partitions observations by storm name and year.
///
/// Within a group, observations keep the order they had in the input; the
/// builder relies on that order and never sorts. Groups are returned ordered
/// by key (name, then year).
#[must_use]
pub fn group_observations(observations: &[Observation]) -> Vec<StormGroup> {
    let mut groups: BTreeMap<&StormKey, Vec<Observation>> = BTreeMap::new();

    for observation in observations {
        groups
            .entry(&observation.key)
            .or_default()
            .push(observation.clone());
    }

    groups
        .into_iter()
        .map(|(key, observations)| StormGroup::new(key.clone(), observations))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use storm_tracks_storm_models::{Position, StormStatus};

    use super::*;

    fn obs(name: &str, year: i32, lon: f64) -> Observation {
        Observation {
            key: StormKey::new(name, year),
            timestamp: NaiveDate::from_ymd_opt(year, 9, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            position: Position::new(lon, 20.0),
            wind: 50,
            pressure: None,
            status: StormStatus::TropicalStorm,
            category: None,
        }
    }

    #[test]
    fn groups_by_name_and_year() {
        let groups = group_observations(&[
            obs("Irma", 2017, -20.0),
            obs("Irma", 1978, -40.0),
            obs("Andrew", 1992, -50.0),
            obs("Irma", 2017, -25.0),
        ]);

        let keys: Vec<String> = groups.iter().map(|g| g.key.to_string()).collect();
        assert_eq!(keys, vec!["Andrew/1992", "Irma/1978", "Irma/2017"]);
        assert_eq!(groups[2].len(), 2);
    }

    #[test]
    fn preserves_intra_group_order() {
        let groups = group_observations(&[
            obs("Irma", 2017, -20.0),
            obs("Maria", 2017, -50.0),
            obs("Irma", 2017, -25.0),
            obs("Irma", 2017, -30.0),
        ]);

        let irma = groups.iter().find(|g| g.key.name == "Irma").unwrap();
        let lons: Vec<f64> = irma.observations.iter().map(|o| o.position.lon).collect();
        assert_eq!(lons, vec![-20.0, -25.0, -30.0]);
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(group_observations(&[]).is_empty());
    }
}
