use crate::domain::model::{Star, StarKey, DAY_COUNT};
use crate::utils::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// One curated "gave up" mark, as written in config files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForfeitEntry {
    pub participant: String,
    pub day: u8,
    pub star: u8,
}

/// Manually curated (participant, day, star) marks that remove a recorded
/// completion from ranking. Lookups are by display name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForfeitTable {
    by_participant: HashMap<String, HashSet<StarKey>>,
}

impl ForfeitTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, participant: impl Into<String>, key: StarKey) {
        self.by_participant
            .entry(participant.into())
            .or_default()
            .insert(key);
    }

    pub fn is_forfeited(&self, participant: &str, day: u8, star: Star) -> bool {
        self.by_participant
            .get(participant)
            .is_some_and(|keys| keys.contains(&StarKey::new(day, star)))
    }

    pub fn len(&self) -> usize {
        self.by_participant.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a ForfeitEntry>) -> Result<Self> {
        let mut table = Self::new();
        for entry in entries {
            let key = parse_key(&entry.participant, entry.day, entry.star)?;
            table.insert(entry.participant.clone(), key);
        }
        Ok(table)
    }

    /// Reads the nested form `{"name": {"13": {"2": true}}}`.
    ///
    /// Only `true` leaves mark a forfeit; `false` and other values are ignored.
    pub fn from_nested_json(value: &Value) -> Result<Self> {
        let participants = value.as_object().ok_or_else(|| BoardError::ConfigValidationError {
            field: "forfeits".to_string(),
            message: "expected an object keyed by participant name".to_string(),
        })?;

        let mut table = Self::new();
        for (participant, days) in participants {
            let Some(days) = days.as_object() else {
                continue;
            };
            for (day, stars) in days {
                let Some(stars) = stars.as_object() else {
                    continue;
                };
                for (star, marked) in stars {
                    if marked.as_bool() != Some(true) {
                        continue;
                    }
                    let day: u8 = day.parse().map_err(|_| invalid(participant, day))?;
                    let star: u8 = star.parse().map_err(|_| invalid(participant, star))?;
                    table.insert(participant.clone(), parse_key(participant, day, star)?);
                }
            }
        }
        Ok(table)
    }

    pub fn entries(&self) -> Vec<ForfeitEntry> {
        let mut entries: Vec<ForfeitEntry> = self
            .by_participant
            .iter()
            .flat_map(|(participant, keys)| {
                keys.iter().map(move |key| ForfeitEntry {
                    participant: participant.clone(),
                    day: key.day,
                    star: key.star.index(),
                })
            })
            .collect();
        entries.sort_by(|l, r| (&l.participant, l.day, l.star).cmp(&(&r.participant, r.day, r.star)));
        entries
    }
}

fn invalid(participant: &str, value: &str) -> BoardError {
    BoardError::InvalidConfigValueError {
        field: format!("forfeits.{}", participant),
        value: value.to_string(),
        reason: "day and star must be numbers".to_string(),
    }
}

fn parse_key(participant: &str, day: u8, star: u8) -> Result<StarKey> {
    if day == 0 || usize::from(day) > DAY_COUNT {
        return Err(BoardError::InvalidConfigValueError {
            field: format!("forfeits.{}", participant),
            value: day.to_string(),
            reason: format!("day must be between 1 and {}", DAY_COUNT),
        });
    }
    let star = Star::from_index(star).ok_or_else(|| BoardError::InvalidConfigValueError {
        field: format!("forfeits.{}", participant),
        value: star.to_string(),
        reason: "star must be 1 or 2".to_string(),
    })?;
    Ok(StarKey::new(day, star))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_means_not_forfeited() {
        let table = ForfeitTable::new();
        assert!(!table.is_forfeited("Chris Thomas", 13, Star::Second));
        assert!(table.is_empty());
    }

    #[test]
    fn test_nested_json_table() {
        let table = ForfeitTable::from_nested_json(&json!({
            "Chris Thomas": {"13": {"2": true}},
            "S. Sepehr": {"13": {"2": true, "1": false}}
        }))
        .unwrap();

        assert!(table.is_forfeited("Chris Thomas", 13, Star::Second));
        assert!(!table.is_forfeited("Chris Thomas", 13, Star::First));
        assert!(table.is_forfeited("S. Sepehr", 13, Star::Second));
        assert!(!table.is_forfeited("S. Sepehr", 13, Star::First));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_nested_json_rejects_bad_keys() {
        assert!(ForfeitTable::from_nested_json(&json!({"A": {"thirteen": {"2": true}}})).is_err());
        assert!(ForfeitTable::from_nested_json(&json!({"A": {"13": {"3": true}}})).is_err());
        assert!(ForfeitTable::from_nested_json(&json!({"A": {"26": {"1": true}}})).is_err());
        assert!(ForfeitTable::from_nested_json(&json!([])).is_err());
    }

    #[test]
    fn test_entries_round_trip_through_table() {
        let entries = vec![
            ForfeitEntry { participant: "B".into(), day: 2, star: 1 },
            ForfeitEntry { participant: "A".into(), day: 13, star: 2 },
        ];
        let table = ForfeitTable::from_entries(&entries).unwrap();
        assert_eq!(table.entries(), vec![entries[1].clone(), entries[0].clone()]);
    }
}
