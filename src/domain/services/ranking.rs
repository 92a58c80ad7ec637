use crate::domain::model::{Participant, Placement, StarKey};

/// Placement of one participant's completion of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPlacement {
    /// Index into the participant slice that was ranked.
    pub participant: usize,
    pub placement: Placement,
}

/// Ranks every recorded completion of one day/star slot.
///
/// Non-forfeited completions are ordered by duration, ties kept in input
/// order, and receive ranks `0..k`. Forfeits follow in encounter order.
/// Participants without a completion get no entry.
pub fn rank_slot(participants: &[Participant], key: StarKey) -> Vec<SlotPlacement> {
    let mut finishers: Vec<(usize, i64)> = Vec::new();
    let mut forfeits: Vec<usize> = Vec::new();

    for (index, participant) in participants.iter().enumerate() {
        match participant.star(key) {
            Some(star) if star.gave_up => forfeits.push(index),
            Some(star) => finishers.push((index, star.duration_ms)),
            None => {}
        }
    }

    finishers.sort_by_key(|&(_, duration)| duration);

    let ranked = finishers
        .into_iter()
        .enumerate()
        .map(|(rank, (participant, _))| SlotPlacement {
            participant,
            placement: Placement::Ranked { rank: rank as u32 },
        });
    let forfeited = forfeits
        .into_iter()
        .enumerate()
        .map(|(order, participant)| SlotPlacement {
            participant,
            placement: Placement::Forfeit { order: order as u32 },
        });

    ranked.chain(forfeited).collect()
}

/// Assigns placements for every slot of the event.
pub fn populate_ranks(participants: &mut [Participant]) {
    for key in StarKey::all() {
        let placements = rank_slot(participants, key);
        if placements.is_empty() {
            continue;
        }
        tracing::trace!(day = key.day, star = key.star.index(), attempts = placements.len(), "Ranked slot");

        for SlotPlacement { participant, placement } in placements {
            if let Some(star) = participants[participant].star_mut(key) {
                star.placement = Some(placement);
            }
        }
    }
}
