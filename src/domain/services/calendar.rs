//! Release calendar and timestamp normalization.
//!
//! Each day's puzzle unlocks at a fixed local wall-clock time in a named zone,
//! so the UTC instant moves when daylight saving changes during the event.
//! A second release window opens a fixed offset later in the day.

use crate::domain::model::{StarKey, DAY_COUNT};
use chrono::{DateTime, Days, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};
use chrono_tz::Tz;

pub const DEFAULT_TIME_ZONE: Tz = chrono_tz::America::Toronto;

pub fn default_second_release_offset() -> TimeDelta {
    TimeDelta::hours(9) + TimeDelta::minutes(30)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseCalendar {
    zone: Tz,
    first_day: NaiveDate,
    release_time: NaiveTime,
    second_release_offset: TimeDelta,
}

impl ReleaseCalendar {
    pub fn new(
        zone: Tz,
        first_day: NaiveDate,
        release_time: NaiveTime,
        second_release_offset: TimeDelta,
    ) -> Self {
        Self {
            zone,
            first_day,
            release_time,
            second_release_offset,
        }
    }

    /// Midnight on December 1st of `year` in `zone`, second window at 09:30.
    pub fn december(year: i32, zone: Tz) -> Option<Self> {
        let first_day = NaiveDate::from_ymd_opt(year, 12, 1)?;
        Some(Self::new(
            zone,
            first_day,
            NaiveTime::MIN,
            default_second_release_offset(),
        ))
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn release_time(&self) -> NaiveTime {
        self.release_time
    }

    pub fn second_release_offset(&self) -> TimeDelta {
        self.second_release_offset
    }

    /// Local wall-clock release of `day`, resolved in the calendar's zone.
    pub fn release_instant(&self, day: u8) -> Option<DateTime<Tz>> {
        if day == 0 || usize::from(day) > DAY_COUNT {
            return None;
        }
        let date = self.first_day.checked_add_days(Days::new(u64::from(day) - 1))?;
        self.resolve_local(date.and_time(self.release_time))
    }

    pub fn second_release_instant(&self, day: u8) -> Option<DateTime<Tz>> {
        self.release_instant(day)?
            .checked_add_signed(self.second_release_offset)
    }

    /// The instant a completion's duration is measured from.
    ///
    /// A day-start override wins outright. Otherwise a completion after the
    /// second window opened is assumed to have been solved in that window.
    pub fn baseline_ms(
        &self,
        key: StarKey,
        completed_at_ms: i64,
        day_start_override_ms: Option<i64>,
    ) -> Option<i64> {
        if let Some(start) = day_start_override_ms {
            return Some(start);
        }

        let primary = self.release_instant(key.day)?.timestamp_millis();
        let secondary = self.second_release_instant(key.day)?.timestamp_millis();

        if completed_at_ms > secondary {
            Some(secondary)
        } else {
            Some(primary)
        }
    }

    /// Milliseconds from the applicable release to `completed_at_ms`.
    ///
    /// `None` only when the day is outside the event. Completions stamped
    /// before their baseline are clamped to zero.
    pub fn normalize(
        &self,
        completed_at_ms: i64,
        key: StarKey,
        day_start_override_ms: Option<i64>,
    ) -> Option<i64> {
        let baseline = self.baseline_ms(key, completed_at_ms, day_start_override_ms)?;
        let elapsed = completed_at_ms.saturating_sub(baseline);
        if elapsed < 0 {
            tracing::warn!(
                day = key.day,
                star = key.star.index(),
                elapsed_ms = elapsed,
                "Completion precedes its release, clamping duration to zero"
            );
        }
        Some(elapsed.max(0))
    }

    fn resolve_local(&self, local: NaiveDateTime) -> Option<DateTime<Tz>> {
        match self.zone.from_local_datetime(&local) {
            LocalResult::Single(instant) => Some(instant),
            LocalResult::Ambiguous(earliest, _) => Some(earliest),
            // Wall-clock time skipped by a DST jump: the release happens once
            // the clocks reach it, an hour later.
            LocalResult::None => self
                .zone
                .from_local_datetime(&(local + TimeDelta::hours(1)))
                .earliest(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Star;

    const HOUR_MS: i64 = 60 * 60 * 1000;
    const MINUTE_MS: i64 = 60 * 1000;

    fn calendar() -> ReleaseCalendar {
        ReleaseCalendar::december(2021, DEFAULT_TIME_ZONE).unwrap()
    }

    #[test]
    fn test_release_instant_is_local_midnight() {
        let release = calendar().release_instant(1).unwrap();
        // Midnight EST is 05:00 UTC.
        assert_eq!(
            release.with_timezone(&chrono::Utc).to_rfc3339(),
            "2021-12-01T05:00:00+00:00"
        );

        let day_25 = calendar().release_instant(25).unwrap();
        assert_eq!(day_25.timestamp_millis() - release.timestamp_millis(), 24 * 24 * HOUR_MS);
    }

    #[test]
    fn test_release_instant_rejects_days_outside_event() {
        assert!(calendar().release_instant(0).is_none());
        assert!(calendar().release_instant(26).is_none());
    }

    #[test]
    fn test_release_follows_wall_clock_across_dst() {
        // Toronto leaves daylight time on 2021-11-07.
        let first_day = NaiveDate::from_ymd_opt(2021, 11, 1).unwrap();
        let calendar = ReleaseCalendar::new(
            DEFAULT_TIME_ZONE,
            first_day,
            NaiveTime::MIN,
            default_second_release_offset(),
        );
        let before = calendar.release_instant(7).unwrap().timestamp_millis();
        let after = calendar.release_instant(8).unwrap().timestamp_millis();
        assert_eq!(after - before, 25 * HOUR_MS);
    }

    fn single_day(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> ReleaseCalendar {
        ReleaseCalendar::new(
            DEFAULT_TIME_ZONE,
            NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            NaiveTime::from_hms_opt(hour, minute, 0).unwrap(),
            default_second_release_offset(),
        )
    }

    #[test]
    fn test_release_in_spring_forward_gap_moves_an_hour_later() {
        // 02:30 does not exist in Toronto on 2022-03-13.
        let release = single_day(2022, 3, 13, 2, 30).release_instant(1).unwrap();

        assert_eq!(release.time(), NaiveTime::from_hms_opt(3, 30, 0).unwrap());
        assert_eq!(
            release.with_timezone(&chrono::Utc).to_rfc3339(),
            "2022-03-13T07:30:00+00:00"
        );
    }

    #[test]
    fn test_ambiguous_fall_back_release_takes_earlier_instant() {
        // 01:30 happens twice in Toronto on 2021-11-07, first in EDT.
        let release = single_day(2021, 11, 7, 1, 30).release_instant(1).unwrap();

        assert_eq!(release.time(), NaiveTime::from_hms_opt(1, 30, 0).unwrap());
        assert_eq!(
            release.with_timezone(&chrono::Utc).to_rfc3339(),
            "2021-11-07T05:30:00+00:00"
        );
    }

    #[test]
    fn test_first_star_measured_from_primary_release() {
        let calendar = calendar();
        let release = calendar.release_instant(5).unwrap().timestamp_millis();
        let key = StarKey::new(5, Star::First);

        assert_eq!(calendar.normalize(release + 2 * HOUR_MS, key, None), Some(2 * HOUR_MS));
    }

    #[test]
    fn test_late_completion_measured_from_second_window() {
        let calendar = calendar();
        let release = calendar.release_instant(5).unwrap().timestamp_millis();
        let key = StarKey::new(5, Star::Second);

        assert_eq!(
            calendar.normalize(release + 11 * HOUR_MS, key, None),
            Some(HOUR_MS + 30 * MINUTE_MS)
        );
        // Exactly at the second release still counts against the primary one.
        let offset = 9 * HOUR_MS + 30 * MINUTE_MS;
        assert_eq!(calendar.normalize(release + offset, key, None), Some(offset));
    }

    #[test]
    fn test_override_wins_for_both_stars() {
        let calendar = calendar();
        let release = calendar.release_instant(3).unwrap().timestamp_millis();
        let start = release + 10 * HOUR_MS;

        for star in Star::ALL {
            let key = StarKey::new(3, star);
            assert_eq!(
                calendar.normalize(start + 45 * MINUTE_MS, key, Some(start)),
                Some(45 * MINUTE_MS)
            );
        }
    }

    #[test]
    fn test_completion_before_release_clamps_to_zero() {
        let calendar = calendar();
        let release = calendar.release_instant(2).unwrap().timestamp_millis();
        let key = StarKey::new(2, Star::First);

        assert_eq!(calendar.normalize(release - MINUTE_MS, key, None), Some(0));
    }
}
