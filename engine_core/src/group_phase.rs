//! group phase: partition the field, round robin inside every group

use crate::{
    group::{Group, GroupPhaseConfig, Seeding, snake_groups},
    match_::Match,
    round_robin::generate_round_robin,
    utils::ids::IdSource,
};
use uuid::Uuid;

/// Derive the group layout for a seeded field: group count is the number
/// of `teams_per_group`-sized groups needed to hold everyone (the last
/// group may stay smaller on dropouts), membership via snake seeding.
pub fn derive_group_config(
    seeded_team_ids: &[Uuid],
    teams_per_group: usize,
    ids: &mut dyn IdSource,
) -> GroupPhaseConfig {
    let teams_per_group = teams_per_group.max(2);
    let number_of_groups = seeded_team_ids.len().div_ceil(teams_per_group).max(1);
    GroupPhaseConfig {
        number_of_groups,
        teams_per_group,
        seeding: Seeding::Snake,
        groups: snake_groups(seeded_team_ids, number_of_groups, ids),
    }
}

/// Round robin per group; match numbering runs through the groups in
/// group order, courts cycle over the whole phase.
pub fn generate_group_phase_matches(
    config: &GroupPhaseConfig,
    number_of_courts: u32,
    ids: &mut dyn IdSource,
) -> Vec<Match> {
    let mut matches = Vec::new();
    let mut next_number = 1;
    for group in &config.groups {
        let group_matches =
            generate_round_robin(&group.team_ids, number_of_courts, next_number, ids);
        next_number += group_matches.len() as u32;
        matches.extend(group_matches);
    }
    // keep the court cycle phase-wide instead of restarting per group
    for (i, m) in matches.iter_mut().enumerate() {
        m.court_number = Some(i as u32 % number_of_courts.max(1) + 1);
    }
    matches
}

/// Overwrite group membership with a manual assignment. Unknown layout
/// (ragged sizes, uneven counts) is accepted as-is; the caller is the
/// tournament director.
pub fn manual_groups(config: &GroupPhaseConfig, assignment: Vec<Vec<Uuid>>, ids: &mut dyn IdSource) -> GroupPhaseConfig {
    let groups: Vec<Group> = assignment
        .into_iter()
        .map(|team_ids| Group {
            id: ids.next_id(),
            team_ids,
        })
        .collect();
    GroupPhaseConfig {
        number_of_groups: groups.len(),
        teams_per_group: config.teams_per_group,
        seeding: Seeding::Manual,
        groups,
    }
}
