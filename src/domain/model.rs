use serde::{Deserialize, Serialize};

/// Days in one event.
pub const DAY_COUNT: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Star {
    First,
    Second,
}

impl Star {
    pub const ALL: [Star; 2] = [Star::First, Star::Second];

    pub fn index(self) -> u8 {
        match self {
            Star::First => 1,
            Star::Second => 2,
        }
    }

    pub fn from_index(index: u8) -> Option<Star> {
        match index {
            1 => Some(Star::First),
            2 => Some(Star::Second),
            _ => None,
        }
    }
}

impl From<Star> for u8 {
    fn from(star: Star) -> u8 {
        star.index()
    }
}

impl TryFrom<u8> for Star {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Star::from_index(value).ok_or_else(|| format!("star index must be 1 or 2, got {}", value))
    }
}

/// One (day, star) slot of the event. Days are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StarKey {
    pub day: u8,
    pub star: Star,
}

impl StarKey {
    pub fn new(day: u8, star: Star) -> Self {
        Self { day, star }
    }

    /// Every slot of the event, day-major.
    pub fn all() -> impl Iterator<Item = StarKey> {
        (1..=DAY_COUNT as u8).flat_map(|day| Star::ALL.into_iter().map(move |star| StarKey::new(day, star)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placement {
    /// Zero-based position among non-forfeited completions.
    Ranked { rank: u32 },
    /// Zero-based encounter order among forfeits of the same slot.
    Forfeit { order: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarRecord {
    pub timestamp_ms: i64,
    pub duration_ms: i64,
    pub gave_up: bool,
    pub placement: Option<Placement>,
    pub points: u32,
}

impl StarRecord {
    pub fn new(timestamp_ms: i64, duration_ms: i64, gave_up: bool) -> Self {
        Self {
            timestamp_ms,
            duration_ms,
            gave_up,
            placement: None,
            points: 0,
        }
    }

    /// Rank among non-forfeited completions; forfeits have none.
    pub fn rank(&self) -> Option<u32> {
        match self.placement {
            Some(Placement::Ranked { rank }) if !self.gave_up => Some(rank),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub day: u8,
    pub star1: Option<StarRecord>,
    pub star2: Option<StarRecord>,
    pub start_override_ms: Option<i64>,
    pub day_score: u32,
}

impl DayRecord {
    pub fn empty(day: u8) -> Self {
        Self {
            day,
            star1: None,
            star2: None,
            start_override_ms: None,
            day_score: 0,
        }
    }

    pub fn star(&self, star: Star) -> Option<&StarRecord> {
        match star {
            Star::First => self.star1.as_ref(),
            Star::Second => self.star2.as_ref(),
        }
    }

    pub fn star_mut(&mut self, star: Star) -> Option<&mut StarRecord> {
        match star {
            Star::First => self.star1.as_mut(),
            Star::Second => self.star2.as_mut(),
        }
    }

    pub fn is_attempted(&self) -> bool {
        self.star1.is_some() || self.star2.is_some()
    }

    /// Time between the two completions, when both exist.
    pub fn split_ms(&self) -> Option<i64> {
        match (&self.star1, &self.star2) {
            (Some(first), Some(second)) => Some(second.timestamp_ms - first.timestamp_ms),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub days: Vec<DayRecord>,
    pub total_score: u32,
    pub last_attempted_day: Option<u8>,
}

impl Participant {
    pub fn day(&self, day: u8) -> Option<&DayRecord> {
        self.days.get(usize::from(day).checked_sub(1)?)
    }

    pub fn day_mut(&mut self, day: u8) -> Option<&mut DayRecord> {
        self.days.get_mut(usize::from(day).checked_sub(1)?)
    }

    pub fn star(&self, key: StarKey) -> Option<&StarRecord> {
        self.day(key.day)?.star(key.star)
    }

    pub fn star_mut(&mut self, key: StarKey) -> Option<&mut StarRecord> {
        self.day_mut(key.day)?.star_mut(key.star)
    }

    /// Whether the participant was still playing on `day`.
    pub fn is_active_on(&self, day: u8) -> bool {
        self.last_attempted_day.is_some_and(|last| day <= last)
    }
}

/// One value per event day; `None` is a gap, never zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DaySeries<T>(pub [Option<T>; DAY_COUNT]);

impl<T: Copy> DaySeries<T> {
    /// Builds a series from a function of the 1-based day.
    pub fn from_fn(mut f: impl FnMut(u8) -> Option<T>) -> Self {
        DaySeries(std::array::from_fn(|index| f(index as u8 + 1)))
    }

    pub fn empty() -> Self {
        DaySeries([None; DAY_COUNT])
    }

    pub fn get(&self, day: u8) -> Option<T> {
        self.0.get(usize::from(day).checked_sub(1)?).copied().flatten()
    }

    pub fn values(&self) -> &[Option<T>; DAY_COUNT] {
        &self.0
    }

    pub fn defined_days(&self) -> usize {
        self.0.iter().filter(|v| v.is_some()).count()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalTally {
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
    pub tin: u32,
}

impl MedalTally {
    pub fn total(&self) -> u32 {
        self.gold + self.silver + self.bronze + self.tin
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub position: usize,
    pub participant_id: String,
    pub name: String,
    pub total_score: u32,
    pub medals: MedalTally,
    /// Day scores for days 1..=25, carried here so rows never need a lookup
    /// by participant id.
    pub day_scores: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayEntry {
    pub participant_id: String,
    pub name: String,
    pub star1: Option<StarRecord>,
    pub star2: Option<StarRecord>,
    pub split_ms: Option<i64>,
    /// Instant the day's durations are measured from: the member's own
    /// `start_ts` when present, otherwise the day's release.
    pub start_ms: Option<i64>,
    pub overridden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayBoard {
    pub day: u8,
    pub entries: Vec<DayEntry>,
}

impl DayBoard {
    pub fn winner(&self) -> Option<&DayEntry> {
        self.entries.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantTrajectory {
    pub participant_id: String,
    pub name: String,
    pub cumulative: DaySeries<u32>,
    pub rolling_average: DaySeries<f64>,
    pub rank: DaySeries<u32>,
    pub delta_from_minimum: DaySeries<u32>,
    pub points_per_day: DaySeries<f64>,
    pub split_points: DaySeries<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub year: i32,
    pub time_zone: String,
    pub participant_count: usize,
    pub rolling_window: usize,
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub event: EventSummary,
    pub participants: Vec<Participant>,
    pub standings: Vec<Standing>,
    pub days: Vec<DayBoard>,
    pub trajectories: Vec<ParticipantTrajectory>,
}
