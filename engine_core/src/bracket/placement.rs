//! full placement tree
//!
//! Every team plays every round; each match splits its placement interval
//! in half, winners moving to the upper half, losers to the lower. After
//! log2(N) rounds every interval has shrunk to a pair and its terminal
//! match decides two neighbouring places, so all placements 1..N are
//! played out uniquely. Total matches: (N/2) * log2(N).

use crate::{
    bracket::{set_dependency_parts, set_source},
    errors::{EngineError, EngineResult},
    match_::{DependencyResult, KnockoutRound, Match, PlacementInterval, TeamSource},
    utils::ids::IdSource,
};
use uuid::Uuid;

/// Where the tree's seed list comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedSource {
    /// seeds taken from group finishes: all group winners (in group
    /// order), then all runners-up, and so on
    Groups(usize),
    /// seeds taken from the flat standings
    Standings,
}

impl SeedSource {
    fn team_source(&self, seed: u32) -> TeamSource {
        match self {
            SeedSource::Groups(group_count) => TeamSource::Group {
                group: ((seed - 1) as usize) % group_count,
                rank: (seed - 1) / *group_count as u32 + 1,
            },
            SeedSource::Standings => TeamSource::Standing { rank: seed },
        }
    }
}

/// Feeder info carried from one round into the next.
struct Feeder {
    id: Uuid,
    match_number: u32,
    bracket_position: u32,
    winner_interval: PlacementInterval,
    loser_interval: PlacementInterval,
}

/// Generate the tree for `team_count` teams (power of two, 4..=32).
pub fn generate_placement_tree(
    team_count: usize,
    seed_source: SeedSource,
    ids: &mut dyn IdSource,
) -> EngineResult<Vec<Match>> {
    if !(4..=32).contains(&team_count) || !team_count.is_power_of_two() {
        return Err(EngineError::UnsupportedTeamCount(team_count));
    }
    let n = team_count as u32;
    let rounds = n.trailing_zeros();

    let mut matches: Vec<Match> = Vec::with_capacity((team_count / 2) * rounds as usize);
    let mut match_number = 1;

    // round one: seed i against seed N+1-i
    let mut feeders: Vec<Feeder> = Vec::with_capacity(team_count / 2);
    let winner_interval = PlacementInterval::new(1, n / 2);
    let loser_interval = PlacementInterval::new(n / 2 + 1, n);
    for i in 1..=n / 2 {
        let mut m = Match::new(ids.next_id(), 1, match_number);
        m.knockout_round = Some(KnockoutRound::placement_round(1));
        m.bracket_position = Some(i);
        m.placement_interval = Some(PlacementInterval::new(1, n));
        m.winner_interval = Some(winner_interval);
        m.loser_interval = Some(loser_interval);
        set_source(&mut m, true, seed_source.team_source(i));
        set_source(&mut m, false, seed_source.team_source(n + 1 - i));
        feeders.push(Feeder {
            id: m.id,
            match_number: m.match_number,
            bracket_position: i,
            winner_interval,
            loser_interval,
        });
        matches.push(m);
        match_number += 1;
    }

    for depth in 2..=rounds {
        let interval_size = n >> (depth - 1);
        let mut next_feeders = Vec::with_capacity(team_count / 2);
        let mut position = 1;
        for k in 0..(1u32 << (depth - 1)) {
            let start = k * interval_size + 1;
            let end = (k + 1) * interval_size;
            let interval = PlacementInterval::new(start, end);
            let round_matches = pair_interval(
                &feeders,
                interval,
                depth,
                &mut match_number,
                &mut position,
                ids,
            )?;
            // terminal matches feed nothing
            for m in &round_matches {
                if let (Some(w), Some(l)) = (m.winner_interval, m.loser_interval) {
                    next_feeders.push(Feeder {
                        id: m.id,
                        match_number: m.match_number,
                        bracket_position: m.bracket_position.unwrap_or(0),
                        winner_interval: w,
                        loser_interval: l,
                    });
                }
            }
            matches.extend(round_matches);
        }
        feeders = next_feeders;
    }

    Ok(matches)
}

/// Matches of one interval in one round: collect the feeders targeting the
/// interval (via winner or loser side), sort by bracket position, pair
/// first with last.
fn pair_interval(
    feeders: &[Feeder],
    interval: PlacementInterval,
    depth: u32,
    match_number: &mut u32,
    position: &mut u32,
    ids: &mut dyn IdSource,
) -> EngineResult<Vec<Match>> {
    let mut sources: Vec<(&Feeder, DependencyResult)> = feeders
        .iter()
        .filter_map(|f| {
            if f.winner_interval == interval {
                Some((f, DependencyResult::Winner))
            } else if f.loser_interval == interval {
                Some((f, DependencyResult::Loser))
            } else {
                None
            }
        })
        .collect();
    sources.sort_by_key(|(f, _)| f.bracket_position);
    for pair in sources.windows(2) {
        if pair[0].0.bracket_position == pair[1].0.bracket_position {
            return Err(EngineError::InvariantViolation(format!(
                "duplicate bracket position {} feeding placement interval {}-{}",
                pair[0].0.bracket_position, interval.start, interval.end
            )));
        }
    }

    let count = sources.len();
    let mid = interval.start + (interval.end - interval.start) / 2;
    let terminal = interval.end - interval.start == 1;
    let mut result = Vec::with_capacity(count / 2);
    for j in 0..count / 2 {
        let (first, take_first) = &sources[j];
        let (last, take_last) = &sources[count - 1 - j];
        let mut m = Match::new(ids.next_id(), depth, *match_number);
        m.bracket_position = Some(*position);
        m.placement_interval = Some(interval);
        if terminal {
            m.knockout_round = Some(KnockoutRound::PlacementFinal);
            m.playoff_for_place = Some(interval.start);
        } else {
            m.knockout_round = Some(KnockoutRound::placement_round(depth));
            m.winner_interval = Some(PlacementInterval::new(interval.start, mid));
            m.loser_interval = Some(PlacementInterval::new(mid + 1, interval.end));
        }
        set_dependency_parts(&mut m, true, first.id, first.match_number, *take_first);
        set_dependency_parts(&mut m, false, last.id, last.match_number, *take_last);
        result.push(m);
        *match_number += 1;
        *position += 1;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ids::SequenceIdSource;
    use std::collections::HashSet;

    #[test]
    fn sixteen_teams_build_thirty_two_matches() {
        let mut ids = SequenceIdSource::new();
        let matches = generate_placement_tree(16, SeedSource::Groups(4), &mut ids).unwrap();
        assert_eq!(matches.len(), 32);
        // eight terminal matches decide the sixteen places
        let finals: Vec<_> = matches
            .iter()
            .filter(|m| m.knockout_round == Some(KnockoutRound::PlacementFinal))
            .collect();
        assert_eq!(finals.len(), 8);
        let places: HashSet<u32> = finals.iter().map(|m| m.playoff_for_place.unwrap()).collect();
        assert_eq!(places, HashSet::from([1, 3, 5, 7, 9, 11, 13, 15]));
    }

    #[test]
    fn four_teams_build_four_matches() {
        let mut ids = SequenceIdSource::new();
        let matches = generate_placement_tree(4, SeedSource::Standings, &mut ids).unwrap();
        assert_eq!(matches.len(), 4);
        // round one pairs 1v4 and 2v3
        assert_eq!(matches[0].team_a_source, Some(TeamSource::Standing { rank: 1 }));
        assert_eq!(matches[0].team_b_source, Some(TeamSource::Standing { rank: 4 }));
        assert_eq!(matches[1].team_a_source, Some(TeamSource::Standing { rank: 2 }));
        assert_eq!(matches[1].team_b_source, Some(TeamSource::Standing { rank: 3 }));
        // the two round-two matches are terminal
        assert_eq!(matches[2].playoff_for_place, Some(1));
        assert_eq!(matches[3].playoff_for_place, Some(3));
    }

    #[test]
    fn intervals_halve_per_round() {
        let mut ids = SequenceIdSource::new();
        let matches = generate_placement_tree(8, SeedSource::Groups(4), &mut ids).unwrap();
        assert_eq!(matches.len(), 12);
        let round2: Vec<_> = matches.iter().filter(|m| m.round == 2).collect();
        assert_eq!(round2.len(), 4);
        let upper: Vec<_> = round2
            .iter()
            .filter(|m| m.placement_interval == Some(PlacementInterval::new(1, 4)))
            .collect();
        assert_eq!(upper.len(), 2);
        assert_eq!(upper[0].winner_interval, Some(PlacementInterval::new(1, 2)));
        assert_eq!(upper[0].loser_interval, Some(PlacementInterval::new(3, 4)));
    }

    #[test]
    fn group_seed_order_winners_first() {
        let mut ids = SequenceIdSource::new();
        let matches = generate_placement_tree(8, SeedSource::Groups(4), &mut ids).unwrap();
        // seed 1 = winner of group A, seed 8 = runner-up of group D
        assert_eq!(matches[0].team_a_source, Some(TeamSource::Group { group: 0, rank: 1 }));
        assert_eq!(matches[0].team_b_source, Some(TeamSource::Group { group: 3, rank: 2 }));
    }

    #[test]
    fn bracket_positions_unique_per_round() {
        let mut ids = SequenceIdSource::new();
        let matches = generate_placement_tree(16, SeedSource::Groups(4), &mut ids).unwrap();
        for round in 1..=4 {
            let positions: Vec<u32> = matches
                .iter()
                .filter(|m| m.round == round)
                .map(|m| m.bracket_position.unwrap())
                .collect();
            let unique: HashSet<u32> = positions.iter().copied().collect();
            assert_eq!(positions.len(), unique.len());
        }
    }

    #[test]
    fn rejects_non_power_of_two() {
        let mut ids = SequenceIdSource::new();
        assert_eq!(
            generate_placement_tree(12, SeedSource::Groups(4), &mut ids),
            Err(EngineError::UnsupportedTeamCount(12))
        );
        assert_eq!(
            generate_placement_tree(64, SeedSource::Standings, &mut ids),
            Err(EngineError::UnsupportedTeamCount(64))
        );
    }
}
