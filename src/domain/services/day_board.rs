use super::ReleaseCalendar;
use crate::domain::model::{DayBoard, DayEntry, Participant, StarRecord, DAY_COUNT};

/// Ordering key for day results: absent stars sort last, forfeits just
/// before them (still ordered by their recorded time).
pub fn sort_duration(star: Option<&StarRecord>) -> i64 {
    match star {
        None => i64::MAX,
        Some(star) if star.gave_up => (i64::MAX / 2).saturating_add(star.duration_ms),
        Some(star) => star.duration_ms,
    }
}

/// One board per day that anybody attempted, entries ordered by second star
/// then first star.
pub fn build_day_boards(participants: &[Participant], calendar: &ReleaseCalendar) -> Vec<DayBoard> {
    (1..=DAY_COUNT as u8)
        .filter_map(|day| {
            let release_ms = calendar.release_instant(day).map(|instant| instant.timestamp_millis());
            let mut entries: Vec<DayEntry> = participants
                .iter()
                .filter_map(|participant| {
                    let record = participant.day(day).filter(|record| record.is_attempted())?;
                    Some(DayEntry {
                        participant_id: participant.id.clone(),
                        name: participant.name.clone(),
                        star1: record.star1.clone(),
                        star2: record.star2.clone(),
                        split_ms: record.split_ms(),
                        start_ms: record.start_override_ms.or(release_ms),
                        overridden: record.start_override_ms.is_some(),
                    })
                })
                .collect();

            if entries.is_empty() {
                return None;
            }

            entries.sort_by_key(|entry| {
                (
                    sort_duration(entry.star2.as_ref()),
                    sort_duration(entry.star1.as_ref()),
                )
            });
            Some(DayBoard { day, entries })
        })
        .collect()
}
