//! resolving bracket dependencies when matches complete
//!
//! Propagation is single-step: completing one match resolves its direct
//! dependents only. Cascades happen naturally through subsequent commands,
//! never inside one reduce step.

use crate::{
    errors::{EngineError, EngineResult},
    match_::{DependencyResult, MatchStatus},
    tournament::Tournament,
};
use petgraph::{algo::is_cyclic_directed, graphmap::DiGraphMap};
use tracing::debug;
use uuid::Uuid;

/// Derived view of the `depends_on` edges, predecessor pointing at
/// dependent. Built on demand; the stored state keeps id references only.
pub fn dependency_graph(tournament: &Tournament) -> DiGraphMap<Uuid, ()> {
    let mut graph = DiGraphMap::new();
    for m in tournament.matches.values() {
        graph.add_node(m.id);
        if let Some(deps) = &m.depends_on {
            for dep in [deps.team_a, deps.team_b].into_iter().flatten() {
                graph.add_edge(dep.match_id, m.id, ());
            }
        }
    }
    graph
}

/// Check the structural invariants of the bracket: every dependency
/// points at an existing match and the graph stays acyclic.
pub fn validate_dependencies(tournament: &Tournament) -> EngineResult<()> {
    for m in tournament.matches.values() {
        if let Some(deps) = &m.depends_on {
            for dep in [deps.team_a, deps.team_b].into_iter().flatten() {
                if !tournament.matches.contains_key(&dep.match_id) {
                    return Err(EngineError::InvariantViolation(format!(
                        "match {} depends on unknown match {}",
                        m.match_number, dep.match_id
                    )));
                }
            }
        }
    }
    if is_cyclic_directed(&dependency_graph(tournament)) {
        return Err(EngineError::InvariantViolation(
            "dependency graph contains a cycle".into(),
        ));
    }
    Ok(())
}

/// Resolve the completed match into every dependent slot. Returns the ids
/// of matches that became `Scheduled`. A completed match without a winner
/// (2-set draw) resolves nothing; its dependents stay pending.
pub fn propagate_match_result(
    tournament: &mut Tournament,
    completed_id: Uuid,
) -> EngineResult<Vec<Uuid>> {
    let completed = tournament
        .matches
        .get(&completed_id)
        .ok_or(EngineError::MatchNotFound(completed_id))?;
    if completed.status != MatchStatus::Completed {
        return Ok(Vec::new());
    }
    let Some(winner) = completed.winner_id else {
        debug!(match_number = completed.match_number, "draw completed, dependents stay pending");
        return Ok(Vec::new());
    };
    let loser = completed.other_team(winner).ok_or_else(|| {
        EngineError::InvariantViolation(format!(
            "completed match {} has a winner but not two teams",
            completed.match_number
        ))
    })?;

    let mut activated = Vec::new();
    for m in tournament.matches.values_mut() {
        let Some(deps) = m.depends_on else {
            continue;
        };
        let mut touched = false;
        if let Some(dep) = deps.team_a
            && dep.match_id == completed_id
        {
            m.team_a = Some(resolve(dep.take, winner, loser));
            touched = true;
        }
        if let Some(dep) = deps.team_b
            && dep.match_id == completed_id
        {
            m.team_b = Some(resolve(dep.take, winner, loser));
            touched = true;
        }
        if touched && m.status == MatchStatus::Pending && m.has_both_teams() {
            m.status = MatchStatus::Scheduled;
            activated.push(m.id);
        }
    }
    if !activated.is_empty() {
        debug!(count = activated.len(), "dependent matches activated");
    }
    Ok(activated)
}

fn resolve(take: DependencyResult, winner: Uuid, loser: Uuid) -> Uuid {
    match take {
        DependencyResult::Winner => winner,
        DependencyResult::Loser => loser,
    }
}
