//! Day-indexed series derived from scored participants, for charting.
//!
//! Every series has one slot per event day. `None` means "no value" and is
//! never replaced by zero: a participant who stopped playing has gaps, while
//! a participant still playing who scored nothing on a day has a zero.

use crate::domain::model::{DaySeries, Participant, ParticipantTrajectory, DAY_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrajectorySettings {
    /// Trailing window of the rolling average, in days.
    pub rolling_window: usize,
    /// Participants whose total is at or below this are left out of the
    /// difference series.
    pub active_score_threshold: u32,
}

impl Default for TrajectorySettings {
    fn default() -> Self {
        Self {
            rolling_window: 5,
            active_score_threshold: 0,
        }
    }
}

/// Day score while the participant is still playing.
pub fn day_points(participant: &Participant) -> DaySeries<u32> {
    DaySeries::from_fn(|day| {
        participant
            .is_active_on(day)
            .then(|| participant.day(day).map_or(0, |record| record.day_score))
    })
}

/// Running sum of `points`, with gaps wherever `points` has one.
pub fn running_total(points: &DaySeries<u32>) -> DaySeries<u32> {
    let mut sum = 0;
    DaySeries::from_fn(|day| {
        let value = points.get(day)?;
        sum += value;
        Some(sum)
    })
}

pub fn cumulative_score(participant: &Participant) -> DaySeries<u32> {
    running_total(&day_points(participant))
}

/// Cumulative score held at its last value once the participant stops, so
/// they still occupy their standing when others are compared to it.
fn carried_score(cumulative: &DaySeries<u32>) -> DaySeries<u32> {
    let mut last = None;
    DaySeries::from_fn(|day| {
        if let Some(value) = cumulative.get(day) {
            last = Some(value);
        }
        last
    })
}

/// Mean of the trailing `window` days, shrinking the window at the start of
/// the event. Days inside the window without a value count as zero.
pub fn rolling_average(points: &DaySeries<u32>, window: usize) -> DaySeries<f64> {
    let window = window.max(1);
    DaySeries::from_fn(|day| {
        points.get(day)?;
        let span = usize::from(day).min(window);
        let first = usize::from(day) + 1 - span;
        let sum: u32 = (first..=usize::from(day))
            .map(|d| points.get(d as u8).unwrap_or(0))
            .sum();
        Some(f64::from(sum) / span as f64)
    })
}

pub fn points_per_day(cumulative: &DaySeries<u32>) -> DaySeries<f64> {
    DaySeries::from_fn(|day| cumulative.get(day).map(|value| f64::from(value) / f64::from(day)))
}

/// 1-based position of `own` among `field`'s values for each day; equal
/// scores share the better position.
fn rank_against(own: &DaySeries<u32>, field: &[DaySeries<u32>]) -> DaySeries<u32> {
    DaySeries::from_fn(|day| {
        let value = own.get(day)?;
        let ahead = field
            .iter()
            .filter_map(|series| series.get(day))
            .filter(|other| *other > value)
            .count();
        Some(ahead as u32 + 1)
    })
}

fn minimum_of(field: &[&DaySeries<u32>]) -> DaySeries<u32> {
    DaySeries::from_fn(|day| field.iter().filter_map(|series| series.get(day)).min())
}

/// Per-day points for finishing the second star soonest after the first.
///
/// Participants with both stars are ordered by split, fastest first, and earn
/// `participant_count - position`. Everyone else earns zero.
pub fn split_day_points(participants: &[Participant]) -> Vec<[u32; DAY_COUNT]> {
    let participant_count = participants.len() as u32;
    let mut points = vec![[0u32; DAY_COUNT]; participants.len()];

    for day in 1..=DAY_COUNT as u8 {
        let mut splits: Vec<(usize, i64)> = participants
            .iter()
            .enumerate()
            .filter_map(|(index, p)| Some((index, p.day(day)?.split_ms()?)))
            .collect();
        splits.sort_by_key(|&(_, split)| split);

        for (position, (index, _)) in splits.into_iter().enumerate() {
            points[index][usize::from(day) - 1] = participant_count.saturating_sub(position as u32);
        }
    }

    points
}

pub fn build_trajectories(
    participants: &[Participant],
    settings: &TrajectorySettings,
) -> Vec<ParticipantTrajectory> {
    let daily: Vec<DaySeries<u32>> = participants.iter().map(day_points).collect();
    let cumulative: Vec<DaySeries<u32>> = daily.iter().map(running_total).collect();
    let carried: Vec<DaySeries<u32>> = cumulative.iter().map(carried_score).collect();

    let active: Vec<bool> = participants
        .iter()
        .map(|p| p.total_score > settings.active_score_threshold)
        .collect();
    let active_field: Vec<&DaySeries<u32>> = carried
        .iter()
        .zip(&active)
        .filter_map(|(series, is_active)| is_active.then_some(series))
        .collect();
    let minimum = minimum_of(&active_field);

    let split_points = split_day_points(participants);

    participants
        .iter()
        .enumerate()
        .map(|(index, participant)| {
            let own = &cumulative[index];

            let delta_from_minimum = if active[index] {
                DaySeries::from_fn(|day| Some(own.get(day)?.saturating_sub(minimum.get(day)?)))
            } else {
                DaySeries::empty()
            };

            let split_daily = DaySeries::from_fn(|day| {
                participant
                    .is_active_on(day)
                    .then(|| split_points[index][usize::from(day) - 1])
            });

            ParticipantTrajectory {
                participant_id: participant.id.clone(),
                name: participant.name.clone(),
                cumulative: *own,
                rolling_average: rolling_average(&daily[index], settings.rolling_window),
                rank: rank_against(own, &carried),
                delta_from_minimum,
                points_per_day: points_per_day(own),
                split_points: running_total(&split_daily),
            }
        })
        .collect()
}
