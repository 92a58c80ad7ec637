//! Turns the raw leaderboard document into unscored participants.

use super::EventSettings;
use crate::domain::model::{DayRecord, Participant, Star, StarKey, StarRecord, DAY_COUNT};
use crate::domain::raw::{RawLeaderboard, RawMember};
use serde_json::{Map, Value};

/// Parses a completion timestamp given in (possibly fractional) epoch seconds,
/// either as a JSON number or a decimal string. Returns epoch milliseconds.
pub fn parse_star_timestamp(value: &Value) -> Option<i64> {
    let seconds = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Some((seconds * 1000.0).floor() as i64)
}

/// Parses a day-start override in epoch milliseconds. Zero counts as unset.
pub fn parse_start_override(value: &Value) -> Option<i64> {
    let millis = match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|v| v.is_finite()).map(|v| v.floor() as i64))?,
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| v.floor() as i64))?
        }
        _ => return None,
    };
    (millis > 0).then_some(millis)
}

/// Builds participants in document order.
///
/// Excluded members and members without a single recorded star are dropped.
pub fn collect_participants(raw: &RawLeaderboard, settings: &EventSettings) -> Vec<Participant> {
    let mut participants = Vec::with_capacity(raw.members.len());

    for (key, value) in &raw.members {
        let member: RawMember = match serde_json::from_value(value.clone()) {
            Ok(member) => member,
            Err(e) => {
                tracing::warn!(member = %key, "Skipping malformed member: {}", e);
                continue;
            }
        };

        let name = member.display_name(key);
        if settings.is_excluded(&name) {
            tracing::debug!(member = %name, "Member excluded by configuration");
            continue;
        }

        let participant = build_participant(key, &member, name, settings);
        if participant.last_attempted_day.is_none() {
            tracing::debug!(member = %participant.name, "Member has no recorded stars, skipping");
            continue;
        }
        participants.push(participant);
    }

    participants
}

fn build_participant(key: &str, member: &RawMember, name: String, settings: &EventSettings) -> Participant {
    let days: Vec<DayRecord> = (1..=DAY_COUNT as u8)
        .map(|day| build_day(member.completion_day_level.get(&day.to_string()), day, &name, settings))
        .collect();

    let last_attempted_day = days
        .iter()
        .filter(|record| record.is_attempted())
        .map(|record| record.day)
        .max();

    Participant {
        id: member.identifier(key),
        name,
        days,
        total_score: 0,
        last_attempted_day,
    }
}

fn build_day(raw_day: Option<&Value>, day: u8, name: &str, settings: &EventSettings) -> DayRecord {
    let mut record = DayRecord::empty(day);
    let Some(raw_day) = raw_day.and_then(Value::as_object) else {
        return record;
    };

    record.start_override_ms = raw_day.get("start_ts").and_then(parse_start_override);
    record.star1 = build_star(raw_day, StarKey::new(day, Star::First), record.start_override_ms, name, settings);
    record.star2 = build_star(raw_day, StarKey::new(day, Star::Second), record.start_override_ms, name, settings);
    record
}

fn build_star(
    raw_day: &Map<String, Value>,
    key: StarKey,
    day_override_ms: Option<i64>,
    name: &str,
    settings: &EventSettings,
) -> Option<StarRecord> {
    let raw_star = raw_day.get(&key.star.index().to_string())?.as_object()?;

    let Some(timestamp_ms) = raw_star.get("get_star_ts").and_then(parse_star_timestamp) else {
        tracing::debug!(
            member = %name,
            day = key.day,
            star = key.star.index(),
            "Unreadable completion timestamp, treating star as absent"
        );
        return None;
    };

    let override_ms = day_override_ms.or_else(|| raw_star.get("start_ts").and_then(parse_start_override));
    let duration_ms = settings.calendar.normalize(timestamp_ms, key, override_ms)?;

    let gave_up = settings.forfeits.is_forfeited(name, key.day, key.star);
    if gave_up {
        tracing::debug!(member = %name, day = key.day, star = key.star.index(), "Star marked as forfeited");
    }

    Some(StarRecord::new(timestamp_ms, duration_ms, gave_up))
}
