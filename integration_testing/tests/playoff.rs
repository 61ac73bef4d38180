//! playoff ladder after a round robin: adjacent standings replay their order

use engine_core::{
    Command, KnockoutMode, KnockoutSettings, TournamentStatus, TournamentSystem,
};
use integration_testing::{Harness, config, init_tracing};

fn round_robin_with_playoffs(teams: usize) -> engine_core::TournamentConfig {
    let mut c = config(TournamentSystem::RoundRobin, teams);
    c.knockout = Some(KnockoutSettings {
        mode: KnockoutMode::Playoff,
        ..KnockoutSettings::default()
    });
    c
}

#[test]
fn playoffs_replay_the_standings_pairwise() {
    init_tracing();
    let mut h = Harness::new();
    let parent_id = h.start(round_robin_with_playoffs(6));

    let child = h.child_of(parent_id).expect("playoff child");
    let child_id = child.id;
    assert_eq!(child.system, TournamentSystem::Playoff);
    assert_eq!(child.matches.len(), 3);
    assert!(child.matches.values().all(|m| m.is_playoff));

    h.simulate_all(parent_id);
    let parent_standings: Vec<_> = h
        .tournament(parent_id)
        .standings
        .iter()
        .map(|e| h.tournament(parent_id).team_by_id(e.team_id).unwrap().name.clone())
        .collect();

    // the ladder pairs 1v2, 3v4, 5v6 of the final table
    let child = h.tournament(child_id);
    assert_eq!(child.status, TournamentStatus::InProgress);
    let first = child.matches_ordered()[0];
    let name = |id: Option<uuid::Uuid>| {
        child.team_by_id(id.unwrap()).unwrap().name.clone()
    };
    assert_eq!(name(first.team_a), parent_standings[0]);
    assert_eq!(name(first.team_b), parent_standings[1]);
    assert_eq!(first.playoff_for_place, Some(1));

    h.simulate_all(child_id);
    let child = h.tournament(child_id);
    assert_eq!(child.status, TournamentStatus::Completed);
    // side A won every playoff, so the table keeps the parent order
    let final_order: Vec<_> = child
        .standings
        .iter()
        .map(|e| child.team_by_id(e.team_id).unwrap().name.clone())
        .collect();
    assert_eq!(final_order, parent_standings);
}

#[test]
fn odd_field_leaves_the_last_standing_unplayed() {
    let mut h = Harness::new();
    let parent_id = h.start(round_robin_with_playoffs(5));
    let child = h.child_of(parent_id).unwrap();
    assert_eq!(child.matches.len(), 2);
}

#[test]
fn explicit_finals_creation_is_idempotent() {
    let mut h = Harness::new();
    let id = h.start(config(TournamentSystem::RoundRobin, 4));
    assert!(h.child_of(id).is_none(), "no playoff settings, no child");

    h.apply(Command::CreateFinalsTournament { tournament_id: id }).unwrap();
    let child_id = h.child_of(id).unwrap().id;
    let total = h.state.tournaments.len();

    // a second request leaves everything as it is
    h.apply(Command::CreateFinalsTournament { tournament_id: id }).unwrap();
    assert_eq!(h.state.tournaments.len(), total);
    assert_eq!(h.child_of(id).unwrap().id, child_id);

    // the parent was already running, completing it fills the ladder
    h.simulate_all(id);
    let child = h.tournament(child_id);
    assert_eq!(child.teams.len(), 4);
    assert_eq!(child.status, TournamentStatus::InProgress);
}
