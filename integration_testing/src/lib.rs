//! test support for driving the engine end to end
//!
//! The harness owns a state, a deterministic id sequence and a fixed
//! clock, so every scenario is fully reproducible and snapshots can be
//! compared byte for byte.

use engine_core::{
    ApplicationState, Command, EngineResult, Match, MatchStatus, ReduceCtx, SetScore, Tournament,
    TournamentConfig, TournamentSystem, reduce,
    utils::ids::{FixedTime, SequenceIdSource},
};
use uuid::Uuid;

/// Install a compact tracing subscriber for a test run; repeated calls are
/// fine.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_test_writer()
        .try_init();
}

/// Reducer harness with deterministic capabilities.
pub struct Harness {
    pub state: ApplicationState,
    ids: SequenceIdSource,
    clock: FixedTime,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    pub fn new() -> Self {
        Harness {
            state: ApplicationState::new(),
            ids: SequenceIdSource::new(),
            clock: FixedTime::default(),
        }
    }

    /// Apply a command, replacing the held state on success.
    pub fn apply(&mut self, command: Command) -> EngineResult<()> {
        let mut ctx = ReduceCtx::new(&mut self.ids, &self.clock);
        self.state = reduce(&self.state, command, &mut ctx)?;
        Ok(())
    }

    /// Apply a command that is expected to fail; the held state stays as
    /// it was. Returns the error.
    pub fn apply_err(&mut self, command: Command) -> engine_core::EngineError {
        let mut ctx = ReduceCtx::new(&mut self.ids, &self.clock);
        reduce(&self.state, command, &mut ctx).expect_err("command should fail")
    }

    pub fn tournament(&self, id: Uuid) -> &Tournament {
        self.state.tournaments.get(&id).expect("tournament exists")
    }

    pub fn current_id(&self) -> Uuid {
        self.state.current_tournament_id.expect("current tournament set")
    }

    pub fn current(&self) -> &Tournament {
        self.tournament(self.current_id())
    }

    pub fn child_of(&self, parent_id: Uuid) -> Option<&Tournament> {
        self.state.child_phase_of(parent_id)
    }

    /// Create and start a tournament, returning its id.
    pub fn start(&mut self, config: TournamentConfig) -> Uuid {
        self.apply(Command::CreateTournament(config)).unwrap();
        let id = self.current_id();
        self.apply(Command::StartTournament { tournament_id: id }).unwrap();
        id
    }

    /// Enter a score and complete the match.
    pub fn finish_match(&mut self, tournament_id: Uuid, match_id: Uuid, scores: Vec<SetScore>) {
        self.apply(Command::UpdateMatchScore {
            tournament_id,
            match_id,
            scores,
        })
        .unwrap();
        self.apply(Command::CompleteMatch {
            tournament_id,
            match_id,
        })
        .unwrap();
    }

    /// Next playable match in match-number order, if any.
    pub fn next_open_match(&self, tournament_id: Uuid) -> Option<Uuid> {
        self.tournament(tournament_id)
            .matches_ordered()
            .iter()
            .find(|m| {
                matches!(m.status, MatchStatus::Scheduled | MatchStatus::InProgress)
            })
            .map(|m| m.id)
    }

    /// Drive every playable match to completion with a deterministic score
    /// stream (side A always takes the match 21:15). Propagation may keep
    /// activating matches; the loop runs until nothing playable is left.
    pub fn simulate_all(&mut self, tournament_id: Uuid) {
        let mut completed = 0;
        while let Some(match_id) = self.next_open_match(tournament_id) {
            self.finish_match(tournament_id, match_id, vec![SetScore::new(21, 15)]);
            completed += 1;
        }
        tracing::debug!(%tournament_id, completed, "simulated all playable matches");
    }

    /// All matches of a tournament in match-number order.
    pub fn matches_of(&self, tournament_id: Uuid) -> Vec<Match> {
        self.tournament(tournament_id)
            .matches_ordered()
            .into_iter()
            .cloned()
            .collect()
    }
}

/// Short-hand for a team name list "Team 1".."Team n".
pub fn team_names(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("Team {i}")).collect()
}

/// Config for a plain system without extra settings.
pub fn config(system: TournamentSystem, teams: usize) -> TournamentConfig {
    TournamentConfig::new("Test Cup", system, team_names(teams))
}
