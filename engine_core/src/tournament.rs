//! tournament entity
//!
//! A `Tournament` is one phase of a competition: a round robin, a Swiss
//! field, a group phase, or one of the knockout shapes. Multi-phase
//! competitions chain tournaments through a container; a child phase
//! points back at its parent via `parent_phase_id` and is filled with
//! teams once the parent completes.

use crate::{
    group::GroupPhaseConfig,
    match_::{KnockoutRound, Match, MatchStatus},
    standings::{GroupStandingEntry, StandingEntry, StandingsOptions, TiebreakerOrder},
    team::Team,
};
use chrono::{DateTime, Utc};
use displaydoc::Display;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// competition system of a tournament phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum TournamentSystem {
    /// Round Robin
    RoundRobin,
    /// Swiss System
    Swiss,
    /// Group Phase
    GroupPhase,
    /// Group Phase with Full Placement Tree
    BeachlAllPlacements,
    /// Group Phase with Short Main Round
    BeachlShortMain,
    /// Knockout
    Knockout,
    /// Placement Tree
    PlacementTree,
    /// Short Main Knockout
    ShortMainKnockout,
    /// Playoff
    Playoff,
}

impl TournamentSystem {
    /// Systems that open with a group phase.
    pub fn is_group_based(&self) -> bool {
        matches!(
            self,
            TournamentSystem::GroupPhase
                | TournamentSystem::BeachlAllPlacements
                | TournamentSystem::BeachlShortMain
        )
    }

    /// Bracket systems driven by dependency propagation. These phases are
    /// populated from a parent, never started directly.
    pub fn is_bracket(&self) -> bool {
        matches!(
            self,
            TournamentSystem::Knockout
                | TournamentSystem::PlacementTree
                | TournamentSystem::ShortMainKnockout
                | TournamentSystem::Playoff
        )
    }

    /// Child mode baked into the system name itself.
    pub fn implied_knockout_mode(&self) -> Option<KnockoutMode> {
        match self {
            TournamentSystem::BeachlAllPlacements => Some(KnockoutMode::PlacementTree),
            TournamentSystem::BeachlShortMain => Some(KnockoutMode::ShortMain),
            _ => None,
        }
    }
}

/// status of tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
pub enum TournamentStatus {
    /// Configuration
    #[default]
    Configuration,
    /// In Progress
    InProgress,
    /// Completed
    Completed,
}

/// shape of the knockout phase a parent spawns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
pub enum KnockoutMode {
    /// SSVB Knockout
    #[default]
    Ssvb,
    /// Placement Tree
    PlacementTree,
    /// Short Main Round
    ShortMain,
    /// Playoff
    Playoff,
}

impl KnockoutMode {
    pub fn child_system(&self) -> TournamentSystem {
        match self {
            KnockoutMode::Ssvb => TournamentSystem::Knockout,
            KnockoutMode::PlacementTree => TournamentSystem::PlacementTree,
            KnockoutMode::ShortMain => TournamentSystem::ShortMainKnockout,
            KnockoutMode::Playoff => TournamentSystem::Playoff,
        }
    }

    pub fn phase_name(&self) -> &'static str {
        match self {
            KnockoutMode::Ssvb => "Knockout",
            KnockoutMode::PlacementTree => "Placement Matches",
            KnockoutMode::ShortMain => "Short Main Round",
            KnockoutMode::Playoff => "Playoffs",
        }
    }
}

/// direct-qualifier slot strategy for quarterfinals over 5-team groups
///
/// The classic shape sends every group winner straight into its
/// quarterfinal. With 5-team groups the source material alternates first
/// and second qualifiers instead; both variants stay available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
pub enum DirectSeedStrategy {
    /// Group Winner
    #[default]
    GroupWinner,
    /// Alternate First and Second
    AlternateFirstSecond,
}

/// knockout configuration carried by a parent phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnockoutSettings {
    pub mode: KnockoutMode,
    pub with_third_place: bool,
    pub use_referees: bool,
    pub qf_direct_seed: DirectSeedStrategy,
}

impl Default for KnockoutSettings {
    fn default() -> Self {
        KnockoutSettings {
            mode: KnockoutMode::Ssvb,
            with_third_place: true,
            use_referees: false,
            qf_direct_seed: DirectSeedStrategy::GroupWinner,
        }
    }
}

/// match rules of a tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRules {
    /// sets per match: 1, 2 or 3
    pub sets_per_match: u8,
    pub points_per_set: u16,
    /// shortened deciding set of a best-of-three
    pub points_per_third_set: u16,
    pub tiebreaker_order: TiebreakerOrder,
    pub number_of_courts: u32,
}

impl Default for MatchRules {
    fn default() -> Self {
        MatchRules {
            sets_per_match: 1,
            points_per_set: 21,
            points_per_third_set: 15,
            tiebreaker_order: TiebreakerOrder::HeadToHeadFirst,
            number_of_courts: 2,
        }
    }
}

impl MatchRules {
    pub fn standings_options(&self) -> StandingsOptions {
        StandingsOptions {
            sets_per_match: self.sets_per_match,
            tiebreaker_order: self.tiebreaker_order,
        }
    }
}

/// tournament phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    /// id of tournament
    pub id: Uuid,
    /// name of tournament
    pub name: String,
    pub system: TournamentSystem,
    pub rules: MatchRules,
    /// teams in seed order
    pub teams: Vec<Team>,
    /// matches keyed by id; ordered traversal goes through `match_number`
    pub matches: BTreeMap<Uuid, Match>,
    /// ranked flat table, refreshed after every completed match
    pub standings: Vec<StandingEntry>,
    /// per-group tables of group-based systems
    pub group_standings: Option<Vec<GroupStandingEntry>>,
    pub group_phase_config: Option<GroupPhaseConfig>,
    pub knockout_settings: Option<KnockoutSettings>,
    /// Swiss only: how many rounds are played in total
    pub number_of_rounds: Option<u32>,
    /// Swiss only: the round currently generated
    pub current_round: Option<u32>,
    pub status: TournamentStatus,
    /// teams whose group finish excludes them from the knockout
    pub eliminated_team_ids: Vec<Uuid>,
    /// container this phase belongs to
    pub container_id: Uuid,
    /// 1-based position within the container
    pub phase_order: u32,
    pub phase_name: String,
    /// set on child phases
    pub parent_phase_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tournament {
    pub fn team_by_id(&self, team_id: Uuid) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == team_id)
    }

    /// Matches sorted by `match_number`.
    pub fn matches_ordered(&self) -> Vec<&Match> {
        self.matches
            .values()
            .sorted_by_key(|m| m.match_number)
            .collect()
    }

    pub fn max_match_number(&self) -> u32 {
        self.matches.values().map(|m| m.match_number).max().unwrap_or(0)
    }

    /// Anything still playable? Completion requires this to be false.
    pub fn has_open_matches(&self) -> bool {
        self.matches.values().any(|m| {
            matches!(m.status, MatchStatus::Scheduled | MatchStatus::InProgress)
        })
    }

    pub fn knockout_matches(&self, round: KnockoutRound) -> Vec<&Match> {
        self.matches
            .values()
            .filter(|m| m.knockout_round == Some(round))
            .sorted_by_key(|m| m.match_number)
            .collect()
    }

    /// A knockout round counts as complete when it exists and every one of
    /// its matches is completed.
    pub fn knockout_round_complete(&self, round: KnockoutRound) -> bool {
        let matches = self.knockout_matches(round);
        !matches.is_empty() && matches.iter().all(|m| m.status == MatchStatus::Completed)
    }

    /// Losers of a completed knockout round, in match order.
    pub fn knockout_round_losers(&self, round: KnockoutRound) -> Vec<Uuid> {
        self.knockout_matches(round)
            .iter()
            .filter_map(|m| m.loser_id())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_classification() {
        assert!(TournamentSystem::GroupPhase.is_group_based());
        assert!(TournamentSystem::BeachlShortMain.is_group_based());
        assert!(!TournamentSystem::RoundRobin.is_group_based());
        assert!(TournamentSystem::PlacementTree.is_bracket());
        assert!(!TournamentSystem::Swiss.is_bracket());
        assert_eq!(
            TournamentSystem::BeachlAllPlacements.implied_knockout_mode(),
            Some(KnockoutMode::PlacementTree)
        );
    }

    #[test]
    fn serde_round_trip_of_settings() {
        let settings = KnockoutSettings {
            mode: KnockoutMode::ShortMain,
            with_third_place: false,
            use_referees: true,
            qf_direct_seed: DirectSeedStrategy::AlternateFirstSecond,
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: KnockoutSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, back);
    }
}
