//! Pure scoring pipeline: raw document in, scored leaderboard out.
//!
//! Stages run strictly in order, each over the complete output of the last:
//! intake (normalize + forfeits) → ranking → scoring → medals/trajectories.
//! Nothing here does I/O or keeps state between runs.

pub mod calendar;
pub mod day_board;
pub mod forfeits;
pub mod intake;
pub mod medals;
pub mod ranking;
pub mod scoring;
pub mod trajectory;

pub use calendar::ReleaseCalendar;
pub use forfeits::{ForfeitEntry, ForfeitTable};
pub use trajectory::TrajectorySettings;

use crate::domain::model::{EventSummary, Leaderboard};
use crate::domain::raw::RawLeaderboard;
use crate::utils::error::{BoardError, Result};

/// Static configuration of one event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSettings {
    pub year: i32,
    pub calendar: ReleaseCalendar,
    pub forfeits: ForfeitTable,
    pub excluded_members: Vec<String>,
    pub trajectory: TrajectorySettings,
}

impl EventSettings {
    /// December event in the default zone with no forfeits or exclusions.
    pub fn for_year(year: i32) -> Result<Self> {
        let calendar = ReleaseCalendar::december(year, calendar::DEFAULT_TIME_ZONE).ok_or_else(|| {
            BoardError::InvalidConfigValueError {
                field: "event.year".to_string(),
                value: year.to_string(),
                reason: "no such calendar year".to_string(),
            }
        })?;
        Ok(Self {
            year,
            calendar,
            forfeits: ForfeitTable::new(),
            excluded_members: Vec::new(),
            trajectory: TrajectorySettings::default(),
        })
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded_members.iter().any(|excluded| excluded == name)
    }
}

pub fn build_leaderboard(raw: &RawLeaderboard, settings: &EventSettings) -> Leaderboard {
    let mut participants = intake::collect_participants(raw, settings);
    tracing::debug!(
        members = raw.members.len(),
        participants = participants.len(),
        "Collected participants"
    );

    ranking::populate_ranks(&mut participants);
    scoring::score_participants(&mut participants);

    let standings = scoring::standings(&participants);
    let days = day_board::build_day_boards(&participants, &settings.calendar);
    let trajectories = trajectory::build_trajectories(&participants, &settings.trajectory);

    Leaderboard {
        event: EventSummary {
            year: settings.year,
            time_zone: settings.calendar.zone().name().to_string(),
            participant_count: participants.len(),
            rolling_window: settings.trajectory.rolling_window,
        },
        participants,
        standings,
        days,
        trajectories,
    }
}
