//! command surface of the reducer
//!
//! The closed set of commands plus their payloads is the persistent
//! interface of the engine: everything here serializes, so a command log
//! replayed against the same id sequence rebuilds the identical state.

use crate::{
    match_::SetScore,
    state::ApplicationState,
    tournament::{KnockoutSettings, MatchRules, TournamentSystem},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// configuration record consumed by `CreateTournament`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub name: String,
    pub system: TournamentSystem,
    /// team names in seed order; seed positions are assigned 1..N
    pub team_names: Vec<String>,
    #[serde(default)]
    pub rules: MatchRules,
    /// group-based systems: target size of each group
    pub teams_per_group: Option<usize>,
    /// Swiss: total number of rounds
    pub number_of_rounds: Option<u32>,
    /// spawn a knockout/playoff phase when the main phase completes
    pub knockout: Option<KnockoutSettings>,
}

impl TournamentConfig {
    pub fn new(name: impl Into<String>, system: TournamentSystem, team_names: Vec<String>) -> Self {
        TournamentConfig {
            name: name.into(),
            system,
            team_names,
            rules: MatchRules::default(),
            teams_per_group: None,
            number_of_rounds: None,
            knockout: None,
        }
    }
}

/// updatable settings of a configured tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentSettings {
    pub rules: MatchRules,
    pub number_of_rounds: Option<u32>,
    pub knockout: Option<KnockoutSettings>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// replace the whole state with the payload
    LoadState(Box<ApplicationState>),
    CreateTournament(TournamentConfig),
    UpdateTeams {
        tournament_id: Uuid,
        team_names: Vec<String>,
    },
    UpdateTournamentSettings {
        tournament_id: Uuid,
        settings: TournamentSettings,
    },
    /// overwrite group membership; seeding becomes manual
    UpdateGroups {
        tournament_id: Uuid,
        groups: Vec<Vec<Uuid>>,
    },
    StartTournament {
        tournament_id: Uuid,
    },
    UpdateMatchScore {
        tournament_id: Uuid,
        match_id: Uuid,
        scores: Vec<SetScore>,
    },
    CompleteMatch {
        tournament_id: Uuid,
        match_id: Uuid,
    },
    GenerateNextSwissRound {
        tournament_id: Uuid,
    },
    ResetTournament {
        tournament_id: Uuid,
    },
    /// delete the competition the tournament belongs to, all phases included
    DeleteTournament {
        tournament_id: Uuid,
    },
    DeleteContainer {
        container_id: Uuid,
    },
    SetCurrentTournament {
        tournament_id: Option<Uuid>,
    },
    SetCurrentPhase {
        container_id: Uuid,
        phase_index: usize,
    },
    /// explicit playoff-phase materialization; no-op when a child exists
    CreateFinalsTournament {
        tournament_id: Uuid,
    },
    /// explicit knockout-phase materialization; no-op when a child exists
    CreateKnockoutTournament {
        tournament_id: Uuid,
    },
}
