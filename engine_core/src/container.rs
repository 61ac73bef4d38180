// container grouping phase tournaments into one competition

use chrono::{DateTime, Utc};
use displaydoc::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// status of container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
pub enum ContainerStatus {
    /// Configuration
    #[default]
    Configuration,
    /// In Progress
    InProgress,
    /// Completed
    Completed,
}

/// ordered reference to one phase of the competition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseRef {
    pub tournament_id: Uuid,
    /// 1-based position
    pub order: u32,
    pub name: String,
}

/// linear sequence of tournament phases forming one competition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentContainer {
    pub id: Uuid,
    pub name: String,
    pub phases: Vec<PhaseRef>,
    pub current_phase_index: usize,
    pub status: ContainerStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TournamentContainer {
    pub fn phase_index_of(&self, tournament_id: Uuid) -> Option<usize> {
        self.phases.iter().position(|p| p.tournament_id == tournament_id)
    }

    /// Append a phase keeping `phases` sorted by order.
    pub fn push_phase(&mut self, phase: PhaseRef) {
        self.phases.push(phase);
        self.phases.sort_by_key(|p| p.order);
    }

    /// Drop a phase reference; the current index is clamped back into
    /// range afterwards.
    pub fn remove_phase(&mut self, tournament_id: Uuid) {
        self.phases.retain(|p| p.tournament_id != tournament_id);
        if self.current_phase_index >= self.phases.len() {
            self.current_phase_index = self.phases.len().saturating_sub(1);
        }
    }
}
