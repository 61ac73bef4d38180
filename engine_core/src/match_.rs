// match of tournament

use displaydoc::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// status of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[ignore_extra_doc_attributes]
pub enum MatchStatus {
    /// Pending
    ///
    /// At least one side is still unresolved and referenced through
    /// `depends_on` or a team source.
    #[default]
    Pending,
    /// Scheduled
    Scheduled,
    /// In Progress
    InProgress,
    /// Completed
    Completed,
}

/// knockout round discriminant of a bracket match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum KnockoutRound {
    /// Intermediate Round
    Intermediate,
    /// Quarterfinal
    Quarterfinal,
    /// Semifinal
    Semifinal,
    /// Third Place Match
    ThirdPlace,
    /// Final
    Final,
    /// Placement Round 1
    PlacementRound1,
    /// Placement Round 2
    PlacementRound2,
    /// Placement Round 3
    PlacementRound3,
    /// Placement Round 4
    PlacementRound4,
    /// Placement Final
    PlacementFinal,
    /// Qualification
    Qualification,
    /// Top Quarterfinal
    TopQuarterfinal,
    /// Top Semifinal
    TopSemifinal,
    /// Top Final
    TopFinal,
    /// Placement 13-16
    Placement13To16,
    /// Placement 9-12
    Placement9To12,
    /// Placement 5-8
    Placement5To8,
}

impl KnockoutRound {
    /// Non-terminal placement-tree round at the given depth (1-based).
    /// Depth is capped at four, which covers trees up to 32 teams.
    pub fn placement_round(depth: u32) -> Self {
        match depth {
            1 => KnockoutRound::PlacementRound1,
            2 => KnockoutRound::PlacementRound2,
            3 => KnockoutRound::PlacementRound3,
            _ => KnockoutRound::PlacementRound4,
        }
    }
}

/// score of one set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetScore {
    pub team_a: u16,
    pub team_b: u16,
}

impl SetScore {
    pub fn new(team_a: u16, team_b: u16) -> Self {
        SetScore { team_a, team_b }
    }
}

/// where an unresolved side of a match takes its team from once the
/// upstream phase is final
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamSource {
    /// rank within the final standings of a group; groups indexed from 0
    Group { group: usize, rank: u32 },
    /// rank within the final flat standings
    Standing { rank: u32 },
}

/// which result of the referenced match feeds a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyResult {
    Winner,
    Loser,
}

/// dynamic reference to a predecessor match within the same bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDependency {
    /// id of the predecessor match
    pub match_id: Uuid,
    /// take the winner or the loser of the predecessor
    pub take: DependencyResult,
}

/// per-side dynamic dependencies of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchDependencies {
    pub team_a: Option<MatchDependency>,
    pub team_b: Option<MatchDependency>,
}

/// inclusive placement range a bracket subtree plays out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementInterval {
    pub start: u32,
    pub end: u32,
}

impl PlacementInterval {
    pub fn new(start: u32, end: u32) -> Self {
        PlacementInterval { start, end }
    }
}

/// match of tournament
///
/// The central node of the engine. `team_a`/`team_b` stay `None` while a
/// side is unresolved; resolution happens either through `depends_on`
/// (incrementally, as predecessor matches complete) or through the team
/// source (once, when the upstream phase is populated into this one).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// id of match in tournament
    pub id: Uuid,
    /// round number, 1-indexed
    pub round: u32,
    /// number of match within tournament, 1-indexed
    pub match_number: u32,
    /// court the match is played on
    pub court_number: Option<u32>,
    /// side a; None until resolved
    pub team_a: Option<Uuid>,
    /// side b; None until resolved
    pub team_b: Option<Uuid>,
    /// per-set scores, empty until play
    pub scores: Vec<SetScore>,
    /// set on completion; stays None in a 2-set draw
    pub winner_id: Option<Uuid>,
    /// status of match
    pub status: MatchStatus,
    /// knockout round discriminant, None for group/round-robin matches
    pub knockout_round: Option<KnockoutRound>,
    /// position within a bracket round, strictly unique per round
    pub bracket_position: Option<u32>,
    /// the placement this match decides (winner takes it, loser the next)
    pub playoff_for_place: Option<u32>,
    /// placement range this match belongs to
    pub placement_interval: Option<PlacementInterval>,
    /// placement range the winner moves into
    pub winner_interval: Option<PlacementInterval>,
    /// placement range the loser moves into
    pub loser_interval: Option<PlacementInterval>,
    /// playoff ladder match
    pub is_playoff: bool,
    /// static source of side a, resolved at phase population
    pub team_a_source: Option<TeamSource>,
    /// static source of side b, resolved at phase population
    pub team_b_source: Option<TeamSource>,
    /// dynamic dependencies, resolved by propagation
    pub depends_on: Option<MatchDependencies>,
    /// referee team, assigned per round in refereed knockouts
    pub referee_team_id: Option<Uuid>,
    /// slot text rendered while side a is unknown
    pub placeholder_a: Option<String>,
    /// slot text rendered while side b is unknown
    pub placeholder_b: Option<String>,
    /// slot text rendered while the referee is unknown
    pub placeholder_referee: Option<String>,
}

impl Match {
    /// Fresh pending match; generators fill in the rest.
    pub fn new(id: Uuid, round: u32, match_number: u32) -> Self {
        Match {
            id,
            round,
            match_number,
            court_number: None,
            team_a: None,
            team_b: None,
            scores: Vec::new(),
            winner_id: None,
            status: MatchStatus::Pending,
            knockout_round: None,
            bracket_position: None,
            playoff_for_place: None,
            placement_interval: None,
            winner_interval: None,
            loser_interval: None,
            is_playoff: false,
            team_a_source: None,
            team_b_source: None,
            depends_on: None,
            referee_team_id: None,
            placeholder_a: None,
            placeholder_b: None,
            placeholder_referee: None,
        }
    }

    /// Fresh match between two known teams, ready to play.
    pub fn scheduled(id: Uuid, round: u32, match_number: u32, team_a: Uuid, team_b: Uuid) -> Self {
        let mut m = Match::new(id, round, match_number);
        m.team_a = Some(team_a);
        m.team_b = Some(team_b);
        m.status = MatchStatus::Scheduled;
        m
    }

    pub fn has_both_teams(&self) -> bool {
        self.team_a.is_some() && self.team_b.is_some()
    }

    pub fn contains_team(&self, team_id: Uuid) -> bool {
        self.team_a == Some(team_id) || self.team_b == Some(team_id)
    }

    /// The participant that is not `team_id`, if both sides are known.
    pub fn other_team(&self, team_id: Uuid) -> Option<Uuid> {
        match (self.team_a, self.team_b) {
            (Some(a), Some(b)) if a == team_id => Some(b),
            (Some(a), Some(b)) if b == team_id => Some(a),
            _ => None,
        }
    }

    /// Sets won per side; a set counts only when one side is strictly ahead.
    pub fn set_wins(&self) -> (u32, u32) {
        let mut a = 0;
        let mut b = 0;
        for set in &self.scores {
            if set.team_a > set.team_b {
                a += 1;
            } else if set.team_b > set.team_a {
                b += 1;
            }
        }
        (a, b)
    }

    /// Total points per side over all sets.
    pub fn point_totals(&self) -> (u32, u32) {
        self.scores.iter().fold((0, 0), |(a, b), set| {
            (a + u32::from(set.team_a), b + u32::from(set.team_b))
        })
    }

    /// Loser of a completed match, derived from `winner_id`.
    pub fn loser_id(&self) -> Option<Uuid> {
        self.winner_id.and_then(|w| self.other_team(w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Match {
        let mut m = Match::scheduled(
            Uuid::from_u128(1),
            1,
            1,
            Uuid::from_u128(10),
            Uuid::from_u128(11),
        );
        m.scores = vec![SetScore::new(21, 15), SetScore::new(19, 21), SetScore::new(15, 11)];
        m
    }

    #[test]
    fn set_wins_require_strict_lead() {
        let mut m = sample();
        m.scores.push(SetScore::new(7, 7));
        assert_eq!(m.set_wins(), (2, 1));
    }

    #[test]
    fn point_totals_sum_all_sets() {
        assert_eq!(sample().point_totals(), (55, 47));
    }

    #[test]
    fn other_team_resolves_both_directions() {
        let m = sample();
        assert_eq!(m.other_team(Uuid::from_u128(10)), Some(Uuid::from_u128(11)));
        assert_eq!(m.other_team(Uuid::from_u128(11)), Some(Uuid::from_u128(10)));
        assert_eq!(m.other_team(Uuid::from_u128(99)), None);
    }

    #[test]
    fn loser_follows_winner() {
        let mut m = sample();
        m.winner_id = Some(Uuid::from_u128(10));
        assert_eq!(m.loser_id(), Some(Uuid::from_u128(11)));
    }
}
