//! group phase with a dropout field: 15 teams in four groups

use engine_core::{
    Command, KnockoutSettings, MatchStatus, Seeding, TournamentStatus, TournamentSystem,
};
use integration_testing::{Harness, config, init_tracing, team_names};

fn group_config(teams: usize) -> engine_core::TournamentConfig {
    let mut c = config(TournamentSystem::GroupPhase, teams);
    c.teams_per_group = Some(4);
    c.knockout = Some(KnockoutSettings::default());
    c
}

#[test]
fn fifteen_teams_build_ragged_groups_and_a_placeholder_child() {
    init_tracing();
    let mut h = Harness::new();
    let id = h.start(group_config(15));

    let t = h.tournament(id);
    let gpc = t.group_phase_config.as_ref().unwrap();
    assert_eq!(gpc.number_of_groups, 4);
    let sizes = gpc.group_sizes();
    assert_eq!(sizes.iter().filter(|&&s| s == 4).count(), 3);
    assert_eq!(sizes.iter().filter(|&&s| s == 3).count(), 1);

    // 3 * 6 + 1 * 3 matches, all inside their group
    assert_eq!(t.matches.len(), 21);
    for m in t.matches.values() {
        let a = m.team_a.unwrap();
        let b = m.team_b.unwrap();
        assert!(
            gpc.groups
                .iter()
                .any(|g| g.team_ids.contains(&a) && g.team_ids.contains(&b)),
            "match crosses group borders"
        );
    }

    // group standings initialized over every group member
    assert_eq!(t.group_standings.as_ref().unwrap().len(), 15);

    // placeholder knockout child in the same container
    let child = h.child_of(id).expect("child phase materialized at start");
    assert_eq!(child.system, TournamentSystem::Knockout);
    assert_eq!(child.status, TournamentStatus::Configuration);
    assert!(child.teams.is_empty());
    assert_eq!(child.phase_order, 2);
    assert_eq!(child.container_id, t.container_id);
    assert!(child.matches.values().all(|m| m.status == MatchStatus::Pending));
    let container = h.state.containers.get(&t.container_id).unwrap();
    assert_eq!(container.phases.len(), 2);
}

#[test]
fn manual_groups_override_snake_seeding() {
    let mut h = Harness::new();
    h.apply(Command::CreateTournament(group_config(8))).unwrap();
    let id = h.current_id();
    let team_ids: Vec<_> = h.tournament(id).teams.iter().map(|t| t.id).collect();
    h.apply(Command::UpdateGroups {
        tournament_id: id,
        groups: vec![team_ids[..4].to_vec(), team_ids[4..].to_vec()],
    })
    .unwrap();
    let gpc = h.tournament(id).group_phase_config.as_ref().unwrap();
    assert_eq!(gpc.seeding, Seeding::Manual);
    assert_eq!(gpc.groups[0].team_ids, team_ids[..4].to_vec());
}

#[test]
fn updating_teams_rebuilds_groups_in_configuration_only() {
    let mut h = Harness::new();
    h.apply(Command::CreateTournament(group_config(8))).unwrap();
    let id = h.current_id();
    h.apply(Command::UpdateTeams {
        tournament_id: id,
        team_names: team_names(12),
    })
    .unwrap();
    let t = h.tournament(id);
    assert_eq!(t.teams.len(), 12);
    assert_eq!(t.group_phase_config.as_ref().unwrap().number_of_groups, 3);

    h.apply(Command::StartTournament { tournament_id: id }).unwrap();
    let err = h.apply_err(Command::UpdateTeams {
        tournament_id: id,
        team_names: team_names(8),
    });
    assert!(matches!(err, engine_core::EngineError::InvalidStatus(_)));
}
