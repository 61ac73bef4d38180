//! Swiss-system round pairing
//!
//! Each round pairs neighbours in the current table who have not met yet:
//! walk the table from the top, give every team the first fresh opponent
//! below it. Teams for which no fresh opponent is left fall into a residue
//! that is paired consecutively, accepting a repeat rather than discarding
//! the round. An odd field leaves the last residue team unpaired for this
//! round; no bye match is generated.

use crate::{
    match_::Match,
    standings::StandingEntry,
    utils::ids::IdSource,
};
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

/// Pairings for round `round`. `standings` carries the current stats (any
/// order); `prior_matches` is the full match history used to avoid
/// rematches. Match numbering continues at `first_match_number`.
pub fn generate_swiss_round(
    standings: &[StandingEntry],
    prior_matches: &[&Match],
    round: u32,
    number_of_courts: u32,
    first_match_number: u32,
    ids: &mut dyn IdSource,
) -> Vec<Match> {
    // table order: points, set difference, point difference; stable on the
    // incoming order so round one pairs seed neighbours
    let mut table: Vec<&StandingEntry> = standings.iter().collect();
    table.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| b.set_diff().cmp(&a.set_diff()))
            .then_with(|| b.point_diff().cmp(&a.point_diff()))
    });

    let played = played_pairs(prior_matches);

    let mut queue: Vec<Uuid> = table.iter().map(|e| e.team_id).collect();
    let mut residue: Vec<Uuid> = Vec::new();
    let mut pairings: Vec<(Uuid, Uuid)> = Vec::new();
    while !queue.is_empty() {
        let top = queue.remove(0);
        match queue
            .iter()
            .position(|&other| !played.contains(&ordered(top, other)))
        {
            Some(i) => pairings.push((top, queue.remove(i))),
            None => residue.push(top),
        }
    }
    for chunk in residue.chunks(2) {
        if let [a, b] = chunk {
            debug!(round, "swiss residue accepts a repeated pairing");
            pairings.push((*a, *b));
        }
        // a lone residue team pauses this round
    }

    let mut matches = Vec::with_capacity(pairings.len());
    for (i, (a, b)) in pairings.into_iter().enumerate() {
        let match_number = first_match_number + i as u32;
        let mut m = Match::scheduled(ids.next_id(), round, match_number, a, b);
        m.court_number = Some(i as u32 % number_of_courts.max(1) + 1);
        matches.push(m);
    }
    matches
}

fn ordered(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    (a.min(b), a.max(b))
}

fn played_pairs(matches: &[&Match]) -> HashSet<(Uuid, Uuid)> {
    matches
        .iter()
        .filter_map(|m| match (m.team_a, m.team_b) {
            (Some(a), Some(b)) => Some(ordered(a, b)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ids::SequenceIdSource;

    fn entry(team: u128, points: u32) -> StandingEntry {
        let mut e = StandingEntry::new(Uuid::from_u128(team));
        e.points = points;
        e
    }

    #[test]
    fn first_round_pairs_neighbours() {
        let standings: Vec<StandingEntry> = (1..=7).map(|t| entry(t, 0)).collect();
        let mut ids = SequenceIdSource::new();
        let matches = generate_swiss_round(&standings, &[], 1, 2, 1, &mut ids);
        assert_eq!(matches.len(), 3);
        let pairs: Vec<(Uuid, Uuid)> = matches
            .iter()
            .map(|m| (m.team_a.unwrap(), m.team_b.unwrap()))
            .collect();
        assert_eq!(pairs[0], (Uuid::from_u128(1), Uuid::from_u128(2)));
        assert_eq!(pairs[1], (Uuid::from_u128(3), Uuid::from_u128(4)));
        assert_eq!(pairs[2], (Uuid::from_u128(5), Uuid::from_u128(6)));
        // team 7 pauses
    }

    #[test]
    fn avoids_rematches() {
        let standings = vec![entry(1, 1), entry(2, 1), entry(3, 0), entry(4, 0)];
        let prior = Match::scheduled(
            Uuid::from_u128(99),
            1,
            1,
            Uuid::from_u128(1),
            Uuid::from_u128(2),
        );
        let mut ids = SequenceIdSource::new();
        let matches = generate_swiss_round(&standings, &[&prior], 2, 1, 2, &mut ids);
        assert_eq!(matches.len(), 2);
        // 1 skips 2 (already played) and takes 3
        assert_eq!(matches[0].team_a, Some(Uuid::from_u128(1)));
        assert_eq!(matches[0].team_b, Some(Uuid::from_u128(3)));
        assert_eq!(matches[1].team_a, Some(Uuid::from_u128(2)));
        assert_eq!(matches[1].team_b, Some(Uuid::from_u128(4)));
    }

    #[test]
    fn residue_accepts_repeat_instead_of_dropping_round() {
        // two teams that already met and nobody else left
        let standings = vec![entry(1, 2), entry(2, 2)];
        let prior = Match::scheduled(
            Uuid::from_u128(99),
            1,
            1,
            Uuid::from_u128(1),
            Uuid::from_u128(2),
        );
        let mut ids = SequenceIdSource::new();
        let matches = generate_swiss_round(&standings, &[&prior], 2, 1, 2, &mut ids);
        assert_eq!(matches.len(), 1, "repeat is accepted");
    }

    #[test]
    fn numbering_continues() {
        let standings: Vec<StandingEntry> = (1..=4).map(|t| entry(t, 0)).collect();
        let mut ids = SequenceIdSource::new();
        let matches = generate_swiss_round(&standings, &[], 2, 4, 10, &mut ids);
        let numbers: Vec<u32> = matches.iter().map(|m| m.match_number).collect();
        assert_eq!(numbers, vec![10, 11]);
    }
}
