use crate::domain::model::{MedalTally, Participant};

/// Counts rank 0..=3 finishes over every day and both stars.
pub fn tally(participant: &Participant) -> MedalTally {
    participant
        .days
        .iter()
        .flat_map(|day| [day.star1.as_ref(), day.star2.as_ref()])
        .flatten()
        .filter_map(|star| star.rank())
        .fold(MedalTally::default(), |mut medals, rank| {
            match rank {
                0 => medals.gold += 1,
                1 => medals.silver += 1,
                2 => medals.bronze += 1,
                3 => medals.tin += 1,
                _ => {}
            }
            medals
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DayRecord, Placement, StarRecord, DAY_COUNT};

    fn star(placement: Placement, gave_up: bool) -> Option<StarRecord> {
        let mut star = StarRecord::new(0, 1, gave_up);
        star.placement = Some(placement);
        Some(star)
    }

    #[test]
    fn test_tally_counts_both_stars() {
        let mut days: Vec<DayRecord> = (1..=DAY_COUNT as u8).map(DayRecord::empty).collect();
        days[0].star1 = star(Placement::Ranked { rank: 0 }, false);
        days[0].star2 = star(Placement::Ranked { rank: 0 }, false);
        days[1].star1 = star(Placement::Ranked { rank: 1 }, false);
        days[1].star2 = star(Placement::Ranked { rank: 3 }, false);
        days[2].star1 = star(Placement::Ranked { rank: 2 }, false);
        days[2].star2 = star(Placement::Ranked { rank: 7 }, false);
        days[3].star1 = star(Placement::Forfeit { order: 0 }, true);

        let participant = Participant {
            id: "1".into(),
            name: "a".into(),
            days,
            total_score: 0,
            last_attempted_day: Some(4),
        };

        assert_eq!(
            tally(&participant),
            MedalTally { gold: 2, silver: 1, bronze: 1, tin: 1 }
        );
    }
}
