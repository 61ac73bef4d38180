//! standings calculation and tiebreakers
//!
//! Only completed matches with two known teams count. The primary ranking
//! score is stored in `points`: under 2-set rules a match can end drawn on
//! sets, so sets won rank the table; under 1- and 3-set rules match wins
//! do. Tiebreakers run inside tied subgroups, which keeps the comparison a
//! total order even when three teams beat each other in a cycle: such a
//! cycle simply falls through to the next criterion.

use crate::{
    errors::{EngineError, EngineResult},
    group::Group,
    match_::{Match, MatchStatus},
    team::Team,
};
use displaydoc::Display;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// order in which tied teams are separated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
pub enum TiebreakerOrder {
    /// Head-to-head first, then point difference
    #[default]
    HeadToHeadFirst,
    /// Point difference first, then head-to-head
    PointDiffFirst,
}

/// options of a standings calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsOptions {
    pub sets_per_match: u8,
    pub tiebreaker_order: TiebreakerOrder,
}

/// accumulated stats of one team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub team_id: Uuid,
    pub played: u32,
    pub won: u32,
    pub lost: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub points_won: u32,
    pub points_lost: u32,
    /// primary ranking score: sets won under 2-set rules, match wins otherwise
    pub points: u32,
}

impl StandingEntry {
    pub fn new(team_id: Uuid) -> Self {
        StandingEntry {
            team_id,
            played: 0,
            won: 0,
            lost: 0,
            sets_won: 0,
            sets_lost: 0,
            points_won: 0,
            points_lost: 0,
            points: 0,
        }
    }

    pub fn set_diff(&self) -> i64 {
        i64::from(self.sets_won) - i64::from(self.sets_lost)
    }

    pub fn point_diff(&self) -> i64 {
        i64::from(self.points_won) - i64::from(self.points_lost)
    }
}

/// standing entry within one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStandingEntry {
    pub group_id: Uuid,
    /// 1-based position within the group
    pub group_rank: u32,
    pub entry: StandingEntry,
}

/// final placement of one team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub place: u32,
    pub team_id: Uuid,
}

/// Compute the ranked table for `teams` over `matches`.
///
/// The initial entry order is the team order (seed order); all sorting is
/// stable, so teams still tied after every criterion keep that order.
/// Matches whose participants are not both in `teams` are ignored, which
/// lets the same function serve flat and per-group tables.
pub fn calculate_standings(
    teams: &[Team],
    matches: &[&Match],
    options: &StandingsOptions,
) -> Vec<StandingEntry> {
    let (mut entries, counted) = accumulate_table(teams, matches, options);
    apply_tiebreakers(&mut entries, &counted, options.tiebreaker_order);
    entries
}

/// Accumulate raw stats in team order; returns the entries plus the
/// matches that actually counted (needed for head-to-head lookups).
fn accumulate_table<'a>(
    teams: &[Team],
    matches: &[&'a Match],
    options: &StandingsOptions,
) -> (Vec<StandingEntry>, Vec<&'a Match>) {
    let mut entries: Vec<StandingEntry> =
        teams.iter().map(|t| StandingEntry::new(t.id)).collect();
    let index: HashMap<Uuid, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (e.team_id, i))
        .collect();

    let mut counted: Vec<&Match> = Vec::new();
    for m in matches {
        if m.status != MatchStatus::Completed {
            continue;
        }
        let (Some(a), Some(b)) = (m.team_a, m.team_b) else {
            continue;
        };
        let (Some(&ia), Some(&ib)) = (index.get(&a), index.get(&b)) else {
            continue;
        };
        counted.push(m);

        let (sets_a, sets_b) = m.set_wins();
        let (pts_a, pts_b) = m.point_totals();
        accumulate(&mut entries[ia], sets_a, sets_b, pts_a, pts_b);
        accumulate(&mut entries[ib], sets_b, sets_a, pts_b, pts_a);
        match m.winner_id {
            Some(w) if w == a => {
                entries[ia].won += 1;
                entries[ib].lost += 1;
            }
            Some(w) if w == b => {
                entries[ib].won += 1;
                entries[ia].lost += 1;
            }
            // a drawn 2-set match counts as played for both
            _ => {}
        }
    }

    for e in &mut entries {
        e.points = if options.sets_per_match == 2 {
            e.sets_won
        } else {
            e.won
        };
    }
    (entries, counted)
}

fn accumulate(entry: &mut StandingEntry, sets_won: u32, sets_lost: u32, pts_won: u32, pts_lost: u32) {
    entry.played += 1;
    entry.sets_won += sets_won;
    entry.sets_lost += sets_lost;
    entry.points_won += pts_won;
    entry.points_lost += pts_lost;
}

fn apply_tiebreakers(entries: &mut [StandingEntry], matches: &[&Match], order: TiebreakerOrder) {
    entries.sort_by(|a, b| b.points.cmp(&a.points));
    match order {
        TiebreakerOrder::HeadToHeadFirst => {
            for_each_tied_run(
                entries,
                |a, b| a.points == b.points,
                |run| {
                    let h2h = head_to_head(run, matches);
                    run.sort_by(|a, b| {
                        h2h[&b.team_id]
                            .cmp(&h2h[&a.team_id])
                            .then_with(|| b.point_diff().cmp(&a.point_diff()))
                    });
                },
            );
        }
        TiebreakerOrder::PointDiffFirst => {
            for_each_tied_run(
                entries,
                |a, b| a.points == b.points,
                |run| run.sort_by(|a, b| b.point_diff().cmp(&a.point_diff())),
            );
            for_each_tied_run(
                entries,
                |a, b| a.points == b.points && a.point_diff() == b.point_diff(),
                |run| {
                    let h2h = head_to_head(run, matches);
                    run.sort_by(|a, b| h2h[&b.team_id].cmp(&h2h[&a.team_id]));
                },
            );
        }
    }
}

/// Apply `reorder` to every maximal run of entries that `tied` groups
/// together. Sorting is stable, so runs are contiguous.
fn for_each_tied_run(
    entries: &mut [StandingEntry],
    tied: impl Fn(&StandingEntry, &StandingEntry) -> bool,
    mut reorder: impl FnMut(&mut [StandingEntry]),
) {
    let mut start = 0;
    while start < entries.len() {
        let mut end = start + 1;
        while end < entries.len() && tied(&entries[start], &entries[end]) {
            end += 1;
        }
        if end - start > 1 {
            reorder(&mut entries[start..end]);
        }
        start = end;
    }
}

/// Head-to-head score (wins minus losses) of every run member over the
/// direct encounters inside the run.
fn head_to_head(run: &[StandingEntry], matches: &[&Match]) -> HashMap<Uuid, i32> {
    let mut scores: HashMap<Uuid, i32> = run.iter().map(|e| (e.team_id, 0)).collect();
    for m in matches {
        let (Some(a), Some(b)) = (m.team_a, m.team_b) else {
            continue;
        };
        if !scores.contains_key(&a) || !scores.contains_key(&b) {
            continue;
        }
        if let Some(w) = m.winner_id {
            let l = if w == a { b } else { a };
            *scores.get_mut(&w).unwrap() += 1;
            *scores.get_mut(&l).unwrap() -= 1;
        }
    }
    scores
}

/// Per-group tables with `group_rank` assigned. Group member order decides
/// stability inside each group.
pub fn calculate_group_standings(
    teams: &[Team],
    groups: &[Group],
    matches: &[&Match],
    options: &StandingsOptions,
) -> EngineResult<Vec<GroupStandingEntry>> {
    let by_id: HashMap<Uuid, &Team> = teams.iter().map(|t| (t.id, t)).collect();
    let mut result = Vec::new();
    for group in groups {
        let members: Vec<Team> = group
            .team_ids
            .iter()
            .map(|id| {
                by_id
                    .get(id)
                    .map(|t| (*t).clone())
                    .ok_or_else(|| EngineError::InvariantViolation(format!("group references unknown team {id}")))
            })
            .collect::<EngineResult<_>>()?;
        let table = calculate_standings(&members, matches, options);
        result.extend(table.into_iter().enumerate().map(|(i, entry)| {
            GroupStandingEntry {
                group_id: group.id,
                group_rank: i as u32 + 1,
                entry,
            }
        }));
    }
    Ok(result)
}

/// Playoff ranking: places resolved by completed playoff matches come
/// first (winner takes the played-for place, loser the next one); teams
/// without a resolved place follow in seed order. Stats accumulate as
/// usual so the table still shows scores mid-playoff.
pub fn calculate_playoff_standings(
    teams: &[Team],
    matches: &[&Match],
    options: &StandingsOptions,
) -> Vec<StandingEntry> {
    let places = resolved_places(matches);
    let (mut entries, _) = accumulate_table(teams, matches, options);
    // stable: unresolved teams keep seed order behind every resolved place
    entries.sort_by_key(|e| places.get(&e.team_id).copied().unwrap_or(u32::MAX));
    entries
}

fn resolved_places(matches: &[&Match]) -> HashMap<Uuid, u32> {
    let mut places = HashMap::new();
    for m in matches {
        if m.status != MatchStatus::Completed {
            continue;
        }
        let Some(place) = m.playoff_for_place else {
            continue;
        };
        if let Some(w) = m.winner_id {
            places.insert(w, place);
            if let Some(l) = m.other_team(w) {
                places.insert(l, place + 1);
            }
        }
    }
    places
}

/// Final placement list: places decided by completed matches carrying
/// `playoff_for_place` come first; every remaining team fills the lowest
/// open place in standings order (seed order when no standings exist yet).
/// For a completed placement tree this emits each place 1..N exactly once.
pub fn calculate_placements(
    teams: &[Team],
    matches: &[&Match],
    standings: &[StandingEntry],
) -> Vec<Placement> {
    let decided = resolved_places(matches);
    let total = teams.len() as u32;

    let mut placements: Vec<Placement> = decided
        .iter()
        .filter(|&(_, &place)| place <= total)
        .map(|(&team_id, &place)| Placement { place, team_id })
        .collect();
    let mut taken: Vec<u32> = placements.iter().map(|p| p.place).collect();
    taken.sort_unstable();

    let fallback_order: Vec<Uuid> = if standings.is_empty() {
        teams.iter().map(|t| t.id).collect()
    } else {
        standings.iter().map(|e| e.team_id).collect()
    };
    let mut open_places = (1..=total).filter(|p| !taken.contains(p));
    for team_id in fallback_order {
        if decided.contains_key(&team_id) {
            continue;
        }
        let Some(place) = open_places.next() else {
            break;
        };
        placements.push(Placement { place, team_id });
    }
    placements.sort_by_key(|p| p.place);
    placements
}
