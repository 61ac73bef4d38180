//! universal invariants and lifecycle bookkeeping

use engine_core::{
    ApplicationState, Command, EngineError, KnockoutSettings, MatchStatus, TournamentStatus,
    TournamentSystem, validate_dependencies,
};
use integration_testing::{Harness, config, init_tracing, team_names};
use std::collections::HashSet;
use uuid::Uuid;

fn knockout_flow() -> (Harness, Uuid, Uuid) {
    let mut h = Harness::new();
    let mut c = config(TournamentSystem::GroupPhase, 16);
    c.teams_per_group = Some(4);
    c.knockout = Some(KnockoutSettings::default());
    let parent_id = h.start(c);
    h.simulate_all(parent_id);
    let child_id = h.child_of(parent_id).unwrap().id;
    (h, parent_id, child_id)
}

#[test]
fn every_match_and_dependency_stays_well_formed() {
    init_tracing();
    let (mut h, parent_id, child_id) = knockout_flow();
    h.simulate_all(child_id);

    for t in h.state.tournaments.values() {
        validate_dependencies(t).unwrap();
        for m in t.matches.values() {
            if let (Some(a), Some(b)) = (m.team_a, m.team_b) {
                assert_ne!(a, b, "self match");
            }
            if matches!(m.status, MatchStatus::Scheduled | MatchStatus::InProgress) {
                assert!(m.has_both_teams(), "playable match without both teams");
            }
        }
    }

    // every seeded team appears somewhere in the phase it qualified for;
    // in the knockout the eliminated teams only whistle, so the check
    // covers the group phase
    let t = h.tournament(parent_id);
    let mut seen: HashSet<Uuid> = HashSet::new();
    for m in t.matches.values() {
        seen.extend(m.team_a);
        seen.extend(m.team_b);
    }
    for team in &t.teams {
        assert!(seen.contains(&team.id), "{} never plays", team.name);
    }
}

#[test]
fn completion_follows_open_matches_exactly() {
    let (mut h, _parent_id, child_id) = knockout_flow();
    while let Some(match_id) = h.next_open_match(child_id) {
        assert_eq!(
            h.tournament(child_id).status,
            TournamentStatus::InProgress,
            "open matches left, no completion"
        );
        h.finish_match(child_id, match_id, vec![engine_core::SetScore::new(21, 15)]);
    }
    assert_eq!(h.tournament(child_id).status, TournamentStatus::Completed);
}

#[test]
fn state_snapshots_round_trip_through_serde() -> anyhow::Result<()> {
    let (h, _, _) = knockout_flow();
    let json = serde_json::to_string(&h.state)?;
    let back: ApplicationState = serde_json::from_str(&json)?;
    assert_eq!(h.state, back);

    // and a restored snapshot loads cleanly
    let mut h2 = Harness::new();
    h2.apply(Command::LoadState(Box::new(back)))?;
    assert_eq!(h.state, h2.state);
    Ok(())
}

#[test]
fn reset_drops_child_phases_and_match_data() {
    let (mut h, parent_id, child_id) = knockout_flow();
    h.apply(Command::ResetTournament { tournament_id: parent_id }).unwrap();

    let parent = h.tournament(parent_id);
    assert_eq!(parent.status, TournamentStatus::Configuration);
    assert!(parent.matches.is_empty());
    assert!(parent.standings.is_empty());
    assert!(!h.state.tournaments.contains_key(&child_id));
    let container = h.state.containers.get(&parent.container_id).unwrap();
    assert_eq!(container.phases.len(), 1);
    assert_eq!(container.current_phase_index, 0);
}

#[test]
fn delete_tournament_removes_the_whole_container() {
    let (mut h, parent_id, child_id) = knockout_flow();
    let container_id = h.tournament(parent_id).container_id;
    h.apply(Command::DeleteTournament { tournament_id: parent_id }).unwrap();
    assert!(h.state.tournaments.is_empty());
    assert!(!h.state.containers.contains_key(&container_id));
    assert!(!h.state.tournaments.contains_key(&child_id));
    assert_eq!(h.state.current_tournament_id, None);
}

#[test]
fn invalid_commands_are_no_ops_with_errors() {
    let mut h = Harness::new();
    let missing = Uuid::from_u128(404);
    assert_eq!(
        h.apply_err(Command::StartTournament { tournament_id: missing }),
        EngineError::TournamentNotFound(missing)
    );

    let id = h.start(config(TournamentSystem::RoundRobin, 4));
    let snapshot = serde_json::to_string(&h.state).unwrap();

    assert_eq!(
        h.apply_err(Command::CompleteMatch { tournament_id: id, match_id: missing }),
        EngineError::MatchNotFound(missing)
    );
    assert!(matches!(
        h.apply_err(Command::UpdateTeams { tournament_id: id, team_names: team_names(4) }),
        EngineError::InvalidStatus(_)
    ));
    assert!(matches!(
        h.apply_err(Command::GenerateNextSwissRound { tournament_id: id }),
        EngineError::InvalidStatus(_)
    ));
    assert_eq!(
        h.apply_err(Command::DeleteContainer { container_id: missing }),
        EngineError::ContainerNotFound(missing)
    );
    assert_eq!(snapshot, serde_json::to_string(&h.state).unwrap(), "all rejected commands were no-ops");
}

#[test]
fn invalid_scores_are_rejected() {
    let mut h = Harness::new();
    let id = h.start(config(TournamentSystem::RoundRobin, 4));
    let match_id = h.next_open_match(id).unwrap();
    // a drawn set is impossible
    assert!(matches!(
        h.apply_err(Command::UpdateMatchScore {
            tournament_id: id,
            match_id,
            scores: vec![engine_core::SetScore::new(15, 15)],
        }),
        EngineError::InvalidScore(_)
    ));
    // more sets than the rules allow
    assert!(matches!(
        h.apply_err(Command::UpdateMatchScore {
            tournament_id: id,
            match_id,
            scores: vec![
                engine_core::SetScore::new(21, 15),
                engine_core::SetScore::new(21, 15),
            ],
        }),
        EngineError::InvalidScore(_)
    ));
    // completing without any score entered
    assert!(matches!(
        h.apply_err(Command::CompleteMatch { tournament_id: id, match_id }),
        EngineError::InvalidScore(_)
    ));
}

#[test]
fn phase_navigation_bookkeeping() {
    let (mut h, parent_id, child_id) = knockout_flow();
    let container_id = h.tournament(parent_id).container_id;

    // population moved the cursor to the knockout phase
    let container = h.state.containers.get(&container_id).unwrap();
    assert_eq!(container.current_phase_index, 1);
    assert_eq!(h.state.current_tournament_id, Some(child_id));

    h.apply(Command::SetCurrentPhase { container_id, phase_index: 0 }).unwrap();
    assert_eq!(h.state.current_tournament_id, Some(parent_id));
    assert!(matches!(
        h.apply_err(Command::SetCurrentPhase { container_id, phase_index: 5 }),
        EngineError::InvalidStatus(_)
    ));

    h.apply(Command::SetCurrentTournament { tournament_id: Some(child_id) }).unwrap();
    assert_eq!(h.state.current_tournament_id, Some(child_id));
    assert_eq!(
        h.apply_err(Command::SetCurrentTournament { tournament_id: Some(Uuid::from_u128(404)) }),
        EngineError::TournamentNotFound(Uuid::from_u128(404))
    );
}
