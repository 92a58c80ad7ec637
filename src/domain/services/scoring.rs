use super::medals;
use crate::domain::model::{Participant, StarRecord, Standing};

/// Points for one star: `participant_count - rank`, nothing for forfeits.
pub fn star_points(star: Option<&StarRecord>, participant_count: u32) -> u32 {
    star.filter(|star| !star.gave_up)
        .and_then(StarRecord::rank)
        .map_or(0, |rank| participant_count.saturating_sub(rank))
}

/// Fills in star points, day scores and totals. Expects ranks to be populated.
pub fn score_participants(participants: &mut [Participant]) {
    let participant_count = participants.len() as u32;

    for participant in participants.iter_mut() {
        let mut total = 0;
        for day in participant.days.iter_mut() {
            let first = star_points(day.star1.as_ref(), participant_count);
            let second = star_points(day.star2.as_ref(), participant_count);
            if let Some(star) = day.star1.as_mut() {
                star.points = first;
            }
            if let Some(star) = day.star2.as_mut() {
                star.points = second;
            }
            day.day_score = first + second;
            total += day.day_score;
        }
        participant.total_score = total;
    }
}

/// Participants by total score, highest first; ties keep input order.
pub fn standings(participants: &[Participant]) -> Vec<Standing> {
    let mut ordered: Vec<&Participant> = participants.iter().collect();
    ordered.sort_by(|l, r| r.total_score.cmp(&l.total_score));

    ordered
        .into_iter()
        .enumerate()
        .map(|(index, participant)| Standing {
            position: index + 1,
            participant_id: participant.id.clone(),
            name: participant.name.clone(),
            total_score: participant.total_score,
            medals: medals::tally(participant),
            day_scores: participant.days.iter().map(|day| day.day_score).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DayRecord, Placement, DAY_COUNT};

    fn ranked(rank: u32) -> StarRecord {
        let mut star = StarRecord::new(0, 1, false);
        star.placement = Some(Placement::Ranked { rank });
        star
    }

    fn forfeited() -> StarRecord {
        let mut star = StarRecord::new(0, 1, true);
        star.placement = Some(Placement::Forfeit { order: 0 });
        star
    }

    fn participant(name: &str, days: &[(u8, Option<StarRecord>, Option<StarRecord>)]) -> Participant {
        let mut records: Vec<DayRecord> = (1..=DAY_COUNT as u8).map(DayRecord::empty).collect();
        for (day, star1, star2) in days {
            let record = &mut records[usize::from(*day) - 1];
            record.star1 = star1.clone();
            record.star2 = star2.clone();
        }
        Participant {
            id: name.to_string(),
            name: name.to_string(),
            days: records,
            total_score: 0,
            last_attempted_day: days.iter().map(|(day, _, _)| *day).max(),
        }
    }

    #[test]
    fn test_star_points() {
        assert_eq!(star_points(Some(&ranked(0)), 3), 3);
        assert_eq!(star_points(Some(&ranked(2)), 3), 1);
        assert_eq!(star_points(Some(&forfeited()), 3), 0);
        assert_eq!(star_points(None, 3), 0);
    }

    #[test]
    fn test_day_and_total_scores() {
        let mut participants = vec![
            participant("a", &[(1, Some(ranked(0)), Some(ranked(1))), (2, Some(ranked(1)), None)]),
            participant("b", &[(1, Some(ranked(1)), Some(ranked(0))), (2, Some(ranked(0)), Some(forfeited()))]),
        ];

        score_participants(&mut participants);

        assert_eq!(participants[0].days[0].day_score, 2 + 1);
        assert_eq!(participants[0].days[1].day_score, 1);
        assert_eq!(participants[0].total_score, 4);
        assert_eq!(participants[1].days[1].day_score, 2);
        assert_eq!(participants[1].days[1].star2.as_ref().unwrap().points, 0);
        assert_eq!(participants[1].total_score, 5);

        for participant in &participants {
            let sum: u32 = participant.days.iter().map(|d| d.day_score).sum();
            assert_eq!(participant.total_score, sum);
        }
    }

    #[test]
    fn test_standings_order_by_total_then_input() {
        let mut participants = vec![
            participant("low", &[(1, Some(ranked(2)), None)]),
            participant("top", &[(1, Some(ranked(0)), None)]),
            participant("tie", &[(1, Some(ranked(2)), None)]),
        ];
        score_participants(&mut participants);

        let names: Vec<(usize, String)> = standings(&participants)
            .into_iter()
            .map(|s| (s.position, s.name))
            .collect();
        assert_eq!(
            names,
            vec![(1, "top".to_string()), (2, "low".to_string()), (3, "tie".to_string())]
        );
    }

    #[test]
    fn test_standings_carry_their_own_day_scores() {
        let mut same_id = participant("late", &[(1, Some(ranked(1)), None), (3, Some(ranked(0)), None)]);
        same_id.id = "7".to_string();
        let mut participants = vec![participant("early", &[(1, Some(ranked(0)), None)]), same_id];
        participants[0].id = "7".to_string();
        score_participants(&mut participants);

        let standings = standings(&participants);
        assert_eq!(standings[0].name, "late");
        assert_eq!(standings[0].day_scores.len(), DAY_COUNT);
        assert_eq!(&standings[0].day_scores[..3], &[1, 0, 2]);
        assert_eq!(&standings[1].day_scores[..3], &[2, 0, 0]);
    }
}
