// groups of a group phase

use crate::utils::ids::IdSource;
use displaydoc::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// seeding mode for distributing teams over groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
pub enum Seeding {
    /// Snake
    #[default]
    Snake,
    /// Manual
    Manual,
}

/// group of a group phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// id of group in tournament
    pub id: Uuid,
    /// member teams; index 0 = seed rank 1 within the group
    pub team_ids: Vec<Uuid>,
}

/// configuration of a group phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPhaseConfig {
    pub number_of_groups: usize,
    pub teams_per_group: usize,
    pub seeding: Seeding,
    pub groups: Vec<Group>,
}

impl GroupPhaseConfig {
    /// Sizes of the groups in group order.
    pub fn group_sizes(&self) -> Vec<usize> {
        self.groups.iter().map(|g| g.team_ids.len()).collect()
    }

    pub fn total_teams(&self) -> usize {
        self.groups.iter().map(|g| g.team_ids.len()).sum()
    }
}

/// Display label of a group by index: A, B, C, ...
pub fn group_label(index: usize) -> char {
    (b'A' + (index as u8).min(25)) as char
}

/// Distribute seeds over groups in a serpentine pattern: the first pass
/// fills groups left to right, the next right to left, and so on, so that
/// every group's aggregate seed sum stays balanced. With a team count not
/// divisible by the group count the short pass simply stops, leaving one
/// group smaller (dropouts).
pub fn snake_groups(
    seeded_team_ids: &[Uuid],
    number_of_groups: usize,
    ids: &mut dyn IdSource,
) -> Vec<Group> {
    let mut buckets: Vec<Vec<Uuid>> = vec![Vec::new(); number_of_groups];
    for (pass, chunk) in seeded_team_ids.chunks(number_of_groups).enumerate() {
        for (offset, team_id) in chunk.iter().enumerate() {
            let group = if pass % 2 == 0 {
                offset
            } else {
                number_of_groups - 1 - offset
            };
            buckets[group].push(*team_id);
        }
    }
    buckets
        .into_iter()
        .map(|team_ids| Group {
            id: ids.next_id(),
            team_ids,
        })
        .collect()
}
