//! whole-application state
//!
//! Entities live in maps keyed by id; relations are id references, never
//! object references. `BTreeMap` keeps iteration and serialization order
//! deterministic, which is what makes a command replay reproduce
//! byte-identical snapshots.

use crate::{
    container::TournamentContainer,
    errors::{EngineError, EngineResult},
    tournament::Tournament,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApplicationState {
    pub tournaments: BTreeMap<Uuid, Tournament>,
    pub containers: BTreeMap<Uuid, TournamentContainer>,
    pub current_tournament_id: Option<Uuid>,
}

impl ApplicationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tournament(&self, id: Uuid) -> EngineResult<&Tournament> {
        self.tournaments
            .get(&id)
            .ok_or(EngineError::TournamentNotFound(id))
    }

    pub fn tournament_mut(&mut self, id: Uuid) -> EngineResult<&mut Tournament> {
        self.tournaments
            .get_mut(&id)
            .ok_or(EngineError::TournamentNotFound(id))
    }

    pub fn container(&self, id: Uuid) -> EngineResult<&TournamentContainer> {
        self.containers
            .get(&id)
            .ok_or(EngineError::ContainerNotFound(id))
    }

    pub fn container_mut(&mut self, id: Uuid) -> EngineResult<&mut TournamentContainer> {
        self.containers
            .get_mut(&id)
            .ok_or(EngineError::ContainerNotFound(id))
    }

    /// Child phase spawned by `parent_id`, if any.
    pub fn child_phase_of(&self, parent_id: Uuid) -> Option<&Tournament> {
        self.tournaments
            .values()
            .find(|t| t.parent_phase_id == Some(parent_id))
    }

    pub fn child_phase_id_of(&self, parent_id: Uuid) -> Option<Uuid> {
        self.child_phase_of(parent_id).map(|t| t.id)
    }
}
