use crate::domain::model::{Leaderboard, Placement, StarRecord, DAY_COUNT};
use crate::utils::error::{BoardError, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// `hh:mm:ss`; hours keep counting past 24.
pub fn format_duration(duration_ms: i64) -> String {
    let total_seconds = duration_ms.max(0) / 1000;
    format!(
        "{:02}:{:02}:{:02}",
        total_seconds / 3600,
        (total_seconds / 60) % 60,
        total_seconds % 60
    )
}

/// Blank for absent stars and zero durations.
pub fn format_star_time(star: Option<&StarRecord>) -> String {
    match star {
        Some(star) if star.duration_ms != 0 => format_duration(star.duration_ms),
        _ => String::new(),
    }
}

/// 1-based place, `DNF` for forfeits.
pub fn placement_label(star: Option<&StarRecord>) -> String {
    match star.and_then(|star| star.placement) {
        Some(Placement::Ranked { rank }) => (rank + 1).to_string(),
        Some(Placement::Forfeit { .. }) => "DNF".to_string(),
        None => String::new(),
    }
}

/// Local wall-clock `HH:MM:SS` of an instant in `zone`.
pub fn format_start(start_ms: Option<i64>, zone: Tz) -> String {
    start_ms
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|instant| instant.with_timezone(&zone).format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| BoardError::IoError(e.into_error()))
}

pub fn standings_csv(leaderboard: &Leaderboard) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header: Vec<String> = ["position", "name", "score", "gold", "silver", "bronze", "tin"]
        .iter()
        .map(|column| column.to_string())
        .collect();
    header.extend((1..=DAY_COUNT).map(|day| format!("day{}", day)));
    writer.write_record(&header)?;

    for standing in &leaderboard.standings {
        let mut row = vec![
            standing.position.to_string(),
            standing.name.clone(),
            standing.total_score.to_string(),
            standing.medals.gold.to_string(),
            standing.medals.silver.to_string(),
            standing.medals.bronze.to_string(),
            standing.medals.tin.to_string(),
        ];
        row.extend(standing.day_scores.iter().map(u32::to_string));
        writer.write_record(&row)?;
    }

    finish(writer)
}

pub fn day_results_csv(leaderboard: &Leaderboard) -> Result<Vec<u8>> {
    let zone: Tz = leaderboard.event.time_zone.parse().unwrap_or(Tz::UTC);
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "day",
        "place",
        "name",
        "star1",
        "star1_place",
        "star2",
        "star2_place",
        "split",
        "start",
        "start_overridden",
    ])?;

    for board in &leaderboard.days {
        for (index, entry) in board.entries.iter().enumerate() {
            writer.write_record([
                board.day.to_string(),
                (index + 1).to_string(),
                entry.name.clone(),
                format_star_time(entry.star1.as_ref()),
                placement_label(entry.star1.as_ref()),
                format_star_time(entry.star2.as_ref()),
                placement_label(entry.star2.as_ref()),
                entry.split_ms.map(format_duration).unwrap_or_default(),
                format_start(entry.start_ms, zone),
                entry.overridden.to_string(),
            ])?;
        }
    }

    finish(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DayBoard, DayEntry, EventSummary, MedalTally, Standing};

    fn leaderboard(standings: Vec<Standing>, days: Vec<DayBoard>) -> Leaderboard {
        Leaderboard {
            event: EventSummary {
                year: 2021,
                time_zone: "America/Toronto".to_string(),
                participant_count: standings.len(),
                rolling_window: 5,
            },
            participants: Vec::new(),
            standings,
            days,
            trajectories: Vec::new(),
        }
    }

    fn standing(position: usize, name: &str, day_scores: Vec<u32>) -> Standing {
        Standing {
            position,
            participant_id: "7".to_string(),
            name: name.to_string(),
            total_score: day_scores.iter().sum(),
            medals: MedalTally::default(),
            day_scores,
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "00:00:00");
        assert_eq!(format_duration(61_500), "00:01:01");
        assert_eq!(format_duration(26 * 3600 * 1000 + 5_000), "26:00:05");
        assert_eq!(format_duration(-10), "00:00:00");
    }

    #[test]
    fn test_star_labels() {
        let mut star = StarRecord::new(0, 0, false);
        assert_eq!(format_star_time(Some(&star)), "");
        assert_eq!(placement_label(Some(&star)), "");

        star.duration_ms = 90_000;
        star.placement = Some(Placement::Ranked { rank: 0 });
        assert_eq!(format_star_time(Some(&star)), "00:01:30");
        assert_eq!(placement_label(Some(&star)), "1");

        star.placement = Some(Placement::Forfeit { order: 3 });
        assert_eq!(placement_label(Some(&star)), "DNF");
        assert_eq!(placement_label(None), "");
    }

    #[test]
    fn test_standings_rows_with_shared_id_keep_their_own_days() {
        let mut fast = vec![0; DAY_COUNT];
        fast[0] = 2;
        let mut slow = vec![0; DAY_COUNT];
        slow[0] = 1;
        let board = leaderboard(vec![standing(1, "Fast", fast), standing(2, "Slow", slow)], Vec::new());

        let csv = String::from_utf8(standings_csv(&board).unwrap()).unwrap();
        let rows: Vec<&str> = csv.lines().collect();
        assert!(rows[0].ends_with(",day24,day25"));
        assert!(rows[1].starts_with("1,Fast,2,0,0,0,0,2,0,"));
        assert!(rows[2].starts_with("2,Slow,1,0,0,0,0,1,0,"));
    }

    #[test]
    fn test_day_rows_show_local_start_and_override_flag() {
        // 2021-12-03 05:00 UTC is local midnight; 15:00 UTC is 10:00 local.
        let release_ms = 1_638_507_600_000;
        let entry = |name: &str, start_ms: i64, overridden: bool| DayEntry {
            participant_id: name.to_string(),
            name: name.to_string(),
            star1: None,
            star2: None,
            split_ms: None,
            start_ms: Some(start_ms),
            overridden,
        };
        let board = leaderboard(
            Vec::new(),
            vec![DayBoard {
                day: 3,
                entries: vec![
                    entry("Late", release_ms + 10 * 3_600_000, true),
                    entry("OnTime", release_ms, false),
                ],
            }],
        );

        let csv = String::from_utf8(day_results_csv(&board).unwrap()).unwrap();
        let rows: Vec<&str> = csv.lines().collect();
        assert!(rows[0].ends_with(",split,start,start_overridden"));
        assert!(rows[1].ends_with(",10:00:00,true"));
        assert!(rows[2].ends_with(",00:00:00,false"));
        assert_eq!(format_start(None, Tz::UTC), "");
    }
}
