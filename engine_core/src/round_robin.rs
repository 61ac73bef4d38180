//! round robin fixtures via the circle method
//!
//! One slot stays fixed while the others rotate, which gives every pair
//! exactly one meeting and spreads each team's matches evenly over the
//! rounds. An odd team count adds a phantom slot; the team paired with it
//! pauses that round (no bye match is emitted).

use crate::{match_::Match, utils::ids::IdSource};
use uuid::Uuid;

/// Full round robin over `team_ids` (seed order): exactly n*(n-1)/2
/// matches, all `Scheduled`. `first_match_number` continues the
/// tournament-wide numbering; courts cycle `1..=number_of_courts`.
pub fn generate_round_robin(
    team_ids: &[Uuid],
    number_of_courts: u32,
    first_match_number: u32,
    ids: &mut dyn IdSource,
) -> Vec<Match> {
    let n = team_ids.len();
    if n < 2 {
        return Vec::new();
    }

    // circle arrangement; None is the phantom slot of an odd field
    let mut ring: Vec<Option<usize>> = (0..n).map(Some).collect();
    if n % 2 != 0 {
        ring.push(None);
    }
    let slots = ring.len();
    let rounds = slots - 1;

    let mut matches = Vec::with_capacity(n * (n - 1) / 2);
    let mut match_number = first_match_number;
    for round in 1..=rounds as u32 {
        for i in 0..slots / 2 {
            let (Some(a), Some(b)) = (ring[i], ring[slots - 1 - i]) else {
                continue;
            };
            let mut m = Match::scheduled(
                ids.next_id(),
                round,
                match_number,
                team_ids[a],
                team_ids[b],
            );
            m.court_number =
                Some((match_number - first_match_number) % number_of_courts.max(1) + 1);
            matches.push(m);
            match_number += 1;
        }
        // keep the first slot, rotate the rest one step
        ring[1..].rotate_right(1);
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ids::SequenceIdSource;
    use std::collections::HashSet;

    fn teams(n: u128) -> Vec<Uuid> {
        (1..=n).map(Uuid::from_u128).collect()
    }

    fn pairs(matches: &[Match]) -> HashSet<(Uuid, Uuid)> {
        matches
            .iter()
            .map(|m| {
                let (a, b) = (m.team_a.unwrap(), m.team_b.unwrap());
                (a.min(b), a.max(b))
            })
            .collect()
    }

    #[test]
    fn even_field_covers_every_pair_once() {
        let mut ids = SequenceIdSource::new();
        let team_ids = teams(6);
        let matches = generate_round_robin(&team_ids, 2, 1, &mut ids);
        assert_eq!(matches.len(), 15);
        assert_eq!(pairs(&matches).len(), 15);
        // each team plays once per round
        for round in 1..=5 {
            let in_round: Vec<_> = matches.iter().filter(|m| m.round == round).collect();
            assert_eq!(in_round.len(), 3);
            let mut seen = HashSet::new();
            for m in in_round {
                assert!(seen.insert(m.team_a.unwrap()));
                assert!(seen.insert(m.team_b.unwrap()));
            }
        }
    }

    #[test]
    fn odd_field_pauses_one_team_per_round() {
        let mut ids = SequenceIdSource::new();
        let team_ids = teams(11);
        let matches = generate_round_robin(&team_ids, 3, 1, &mut ids);
        assert_eq!(matches.len(), 55);
        assert_eq!(pairs(&matches).len(), 55);
        for round in 1..=11 {
            assert_eq!(matches.iter().filter(|m| m.round == round).count(), 5);
        }
    }

    #[test]
    fn numbering_and_courts_cycle() {
        let mut ids = SequenceIdSource::new();
        let matches = generate_round_robin(&teams(4), 2, 7, &mut ids);
        let numbers: Vec<u32> = matches.iter().map(|m| m.match_number).collect();
        assert_eq!(numbers, vec![7, 8, 9, 10, 11, 12]);
        let courts: Vec<u32> = matches.iter().map(|m| m.court_number.unwrap()).collect();
        assert_eq!(courts, vec![1, 2, 1, 2, 1, 2]);
    }
}
