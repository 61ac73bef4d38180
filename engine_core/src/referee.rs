//! referee assignment for SSVB knockout rounds
//!
//! Pools per round: eliminated group-last teams whistle the intermediate
//! round and the quarterfinals, intermediate losers the semifinals,
//! quarterfinal losers the final and the third-place match. Within a pool
//! the first choice is a team that never met either participant during the
//! group phase; the prior-opponent map comes from the parent phase.
//! Greedy and deterministic, not optimal.

use crate::{
    match_::{KnockoutRound, MatchStatus},
    tournament::Tournament,
};
use std::collections::{HashMap, HashSet};
use tracing::debug;
use uuid::Uuid;

/// Round groups sharing one pool and one used-set. Third place and final
/// are whistled out of the same pool.
const ROUND_GROUPS: [&[KnockoutRound]; 4] = [
    &[KnockoutRound::Intermediate],
    &[KnockoutRound::Quarterfinal],
    &[KnockoutRound::Semifinal],
    &[KnockoutRound::ThirdPlace, KnockoutRound::Final],
];

/// Fill referee slots for every round whose pool is ready. Idempotent:
/// already-assigned matches keep their referee and block it for the rest
/// of the round.
pub fn update_referees(child: &mut Tournament, parent: &Tournament) {
    let opponents = prior_opponents(child, parent);
    for rounds in ROUND_GROUPS {
        let Some(pool) = pool_for(child, rounds[0]) else {
            continue;
        };
        assign_round_group(child, rounds, &pool, &opponents);
    }
}

/// Pool of referee teams for a round, `None` while not ready (feeding
/// round still running). Shapes without an intermediate or quarterfinal
/// round fall back to the eliminated teams.
fn pool_for(child: &Tournament, round: KnockoutRound) -> Option<Vec<Uuid>> {
    let losers_or_eliminated = |feeding: KnockoutRound| {
        if child.knockout_matches(feeding).is_empty() {
            Some(child.eliminated_team_ids.clone())
        } else if child.knockout_round_complete(feeding) {
            Some(child.knockout_round_losers(feeding))
        } else {
            None
        }
    };
    match round {
        KnockoutRound::Intermediate | KnockoutRound::Quarterfinal => {
            Some(child.eliminated_team_ids.clone())
        }
        KnockoutRound::Semifinal => losers_or_eliminated(KnockoutRound::Intermediate),
        KnockoutRound::ThirdPlace | KnockoutRound::Final => {
            losers_or_eliminated(KnockoutRound::Quarterfinal)
        }
        _ => None,
    }
}

fn assign_round_group(
    child: &mut Tournament,
    rounds: &[KnockoutRound],
    pool: &[Uuid],
    opponents: &HashMap<Uuid, HashSet<Uuid>>,
) {
    let mut match_ids: Vec<Uuid> = Vec::new();
    let mut used: HashSet<Uuid> = HashSet::new();
    for round in rounds {
        for m in child.knockout_matches(*round) {
            if let Some(referee) = m.referee_team_id {
                used.insert(referee);
            } else if m.status != MatchStatus::Completed {
                match_ids.push(m.id);
            }
        }
    }
    // keep deterministic match order across the group
    match_ids.sort_by_key(|id| child.matches.get(id).map(|m| m.match_number));

    for match_id in match_ids {
        let Some(m) = child.matches.get(&match_id) else {
            continue;
        };
        let participants: Vec<Uuid> = [m.team_a, m.team_b].into_iter().flatten().collect();
        let empty = HashSet::new();
        let candidate = pool
            .iter()
            .copied()
            .filter(|r| !used.contains(r) && !participants.contains(r))
            .find(|r| {
                let met = opponents.get(r).unwrap_or(&empty);
                participants.iter().all(|p| !met.contains(p))
            })
            .or_else(|| {
                // best effort: any unused pool team
                pool.iter()
                    .copied()
                    .find(|r| !used.contains(r) && !participants.contains(r))
            });
        match candidate {
            Some(referee) => {
                used.insert(referee);
                // unwrap is safe, the id was just collected from this map
                child.matches.get_mut(&match_id).unwrap().referee_team_id = Some(referee);
            }
            None => {
                debug!(match_number = ?child.matches.get(&match_id).map(|m| m.match_number),
                    "referee pool exhausted, slot stays open");
            }
        }
    }
}

/// Prior opponents in child-id space. Parent and child incarnations of a
/// team are linked by their seed position.
fn prior_opponents(child: &Tournament, parent: &Tournament) -> HashMap<Uuid, HashSet<Uuid>> {
    let parent_seed: HashMap<Uuid, u32> =
        parent.teams.iter().map(|t| (t.id, t.seed_position)).collect();
    let child_by_seed: HashMap<u32, Uuid> =
        child.teams.iter().map(|t| (t.seed_position, t.id)).collect();
    let to_child = |parent_id: Uuid| -> Option<Uuid> {
        parent_seed
            .get(&parent_id)
            .and_then(|seed| child_by_seed.get(seed))
            .copied()
    };

    let mut opponents: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
    for m in parent.matches.values() {
        let (Some(a), Some(b)) = (m.team_a, m.team_b) else {
            continue;
        };
        let (Some(ca), Some(cb)) = (to_child(a), to_child(b)) else {
            continue;
        };
        opponents.entry(ca).or_default().insert(cb);
        opponents.entry(cb).or_default().insert(ca);
    }
    opponents
}
