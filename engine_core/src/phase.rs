//! phase orchestration
//!
//! A parent phase that carries knockout settings spawns its child phase as
//! a placeholder the moment the parent starts: full match DAG, wired team
//! sources and dependencies, no teams. When the parent completes, the
//! populator copies the teams across under fresh ids, resolves every team
//! source against the final tables and activates the matches that became
//! playable.

use crate::{
    bracket::{
        placement::{SeedSource, generate_placement_tree},
        playoff::generate_playoff_ladder,
        short_main::generate_short_main_bracket,
        ssvb::generate_ssvb_bracket,
    },
    container::PhaseRef,
    errors::{EngineError, EngineResult},
    match_::{KnockoutRound, Match, MatchStatus, TeamSource},
    reducer::ReduceCtx,
    referee::update_referees,
    standings::{GroupStandingEntry, calculate_standings},
    state::ApplicationState,
    team::Team,
    tournament::{KnockoutMode, KnockoutSettings, Tournament, TournamentStatus, TournamentSystem},
};
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

/// Knockout settings that apply to a parent phase: explicit settings, with
/// the mode forced for systems that bake the child shape into their name.
pub fn effective_knockout_settings(tournament: &Tournament) -> Option<KnockoutSettings> {
    match tournament.system.implied_knockout_mode() {
        Some(mode) => {
            let mut settings = tournament.knockout_settings.unwrap_or_default();
            settings.mode = mode;
            Some(settings)
        }
        None => tournament.knockout_settings,
    }
}

/// Create the child placeholder phase for `parent_id` if its settings ask
/// for one and none exists yet. Idempotent; returns the child id on
/// creation.
pub fn materialize_child_phase(
    state: &mut ApplicationState,
    parent_id: Uuid,
    settings_override: Option<KnockoutSettings>,
    ctx: &mut ReduceCtx,
) -> EngineResult<Option<Uuid>> {
    let parent = state.tournament(parent_id)?;
    let Some(settings) = settings_override.or_else(|| effective_knockout_settings(parent)) else {
        return Ok(None);
    };
    if state.child_phase_of(parent_id).is_some() {
        debug!(%parent_id, "child phase exists, materialization skipped");
        return Ok(None);
    }
    let parent = state.tournament(parent_id)?;

    let child_id = ctx.ids.next_id();
    let matches = generate_child_matches(parent, &settings, ctx)?;
    let now = ctx.clock.now();
    let child = Tournament {
        id: child_id,
        name: parent.name.clone(),
        system: settings.mode.child_system(),
        rules: parent.rules,
        teams: Vec::new(),
        matches: matches.into_iter().map(|m| (m.id, m)).collect(),
        standings: Vec::new(),
        group_standings: None,
        group_phase_config: None,
        knockout_settings: Some(settings),
        number_of_rounds: None,
        current_round: None,
        status: TournamentStatus::Configuration,
        eliminated_team_ids: Vec::new(),
        container_id: parent.container_id,
        phase_order: parent.phase_order + 1,
        phase_name: settings.mode.phase_name().to_string(),
        parent_phase_id: Some(parent_id),
        created_at: now,
        updated_at: now,
    };

    let container = state.container_mut(child.container_id)?;
    container.push_phase(PhaseRef {
        tournament_id: child_id,
        order: child.phase_order,
        name: child.phase_name.clone(),
    });
    container.updated_at = now;
    info!(%parent_id, %child_id, mode = %settings.mode, "child phase materialized");
    state.tournaments.insert(child_id, child);
    Ok(Some(child_id))
}

fn generate_child_matches(
    parent: &Tournament,
    settings: &KnockoutSettings,
    ctx: &mut ReduceCtx,
) -> EngineResult<Vec<Match>> {
    match settings.mode {
        KnockoutMode::Ssvb => {
            let config = parent
                .group_phase_config
                .as_ref()
                .ok_or(EngineError::MissingGroupStandings)?;
            generate_ssvb_bracket(&config.group_sizes(), settings, ctx.ids)
        }
        KnockoutMode::ShortMain => {
            let config = parent
                .group_phase_config
                .as_ref()
                .ok_or(EngineError::MissingGroupStandings)?;
            generate_short_main_bracket(&config.group_sizes(), ctx.ids)
        }
        KnockoutMode::PlacementTree => {
            let seed_source = match &parent.group_phase_config {
                Some(config) => SeedSource::Groups(config.number_of_groups),
                None => SeedSource::Standings,
            };
            generate_placement_tree(parent.teams.len(), seed_source, ctx.ids)
        }
        KnockoutMode::Playoff => Ok(generate_playoff_ladder(parent.teams.len(), ctx.ids)),
    }
}

/// Fill the child phase of a completed parent with real teams. Idempotent:
/// does nothing while the parent is unfinished, no child exists, or the
/// child already has its roster.
pub fn populate_child_phase(
    state: &mut ApplicationState,
    parent_id: Uuid,
    ctx: &mut ReduceCtx,
) -> EngineResult<Option<Uuid>> {
    let parent = state.tournament(parent_id)?.clone();
    if parent.status != TournamentStatus::Completed {
        return Ok(None);
    }
    let Some(child_id) = state.child_phase_id_of(parent_id) else {
        return Ok(None);
    };
    if !state.tournament(child_id)?.teams.is_empty() {
        return Ok(None);
    }

    // copy teams under fresh ids, seed positions unchanged
    let mut mapping: HashMap<Uuid, Uuid> = HashMap::new();
    let mut teams = Vec::with_capacity(parent.teams.len());
    for team in &parent.teams {
        let new_id = ctx.ids.next_id();
        mapping.insert(team.id, new_id);
        teams.push(Team::new(new_id, team.name.clone(), team.seed_position));
    }

    let now = ctx.clock.now();
    let child = state.tournament_mut(child_id)?;
    child.teams = teams;
    child.eliminated_team_ids = if child.system == TournamentSystem::Knockout {
        eliminated_by_group_rank(&parent, &mapping)
    } else {
        Vec::new()
    };

    // static sources against the final tables
    for m in child.matches.values_mut() {
        if let Some(source) = m.team_a_source
            && m.team_a.is_none()
        {
            m.team_a = resolve_source(&source, &parent, &mapping);
        }
        if let Some(source) = m.team_b_source
            && m.team_b.is_none()
        {
            m.team_b = resolve_source(&source, &parent, &mapping);
        }
    }

    // slots whose seeding depends on comparing the final tables
    if child.system == TournamentSystem::Knockout {
        if let Some(config) = &parent.group_phase_config {
            match config.number_of_groups {
                3 => assign_three_group_slots(child, &parent, &mapping)?,
                5..=8 => assign_seeded_quarterfinal_slots(child, &parent, &mapping)?,
                _ => {}
            }
        }
    }

    for m in child.matches.values_mut() {
        if m.status == MatchStatus::Pending && m.has_both_teams() {
            m.status = MatchStatus::Scheduled;
        }
    }

    child.standings = calculate_standings(&child.teams, &[], &child.rules.standings_options());
    child.status = TournamentStatus::InProgress;
    child.updated_at = now;

    let use_referees = child
        .knockout_settings
        .is_some_and(|s| s.use_referees && s.mode == KnockoutMode::Ssvb);
    if use_referees {
        update_referees(child, &parent);
    }

    let container = state.container_mut(parent.container_id)?;
    if let Some(index) = container.phase_index_of(child_id) {
        container.current_phase_index = index;
    }
    container.updated_at = now;
    state.current_tournament_id = Some(child_id);
    info!(%parent_id, %child_id, "child phase populated");
    Ok(Some(child_id))
}

/// Group-last finishers that drop out of the knockout. Three-team groups
/// eliminate nobody; every other size eliminates its last rank.
fn eliminated_by_group_rank(parent: &Tournament, mapping: &HashMap<Uuid, Uuid>) -> Vec<Uuid> {
    let Some(config) = &parent.group_phase_config else {
        return Vec::new();
    };
    let Some(group_standings) = &parent.group_standings else {
        return Vec::new();
    };
    let mut eliminated = Vec::new();
    for group in &config.groups {
        let size = group.team_ids.len();
        if size == 3 {
            continue;
        }
        let last_rank = size as u32;
        if let Some(entry) = group_standings
            .iter()
            .find(|e| e.group_id == group.id && e.group_rank == last_rank)
            && let Some(new_id) = mapping.get(&entry.entry.team_id)
        {
            eliminated.push(*new_id);
        }
    }
    eliminated
}

fn resolve_source(
    source: &TeamSource,
    parent: &Tournament,
    mapping: &HashMap<Uuid, Uuid>,
) -> Option<Uuid> {
    let old_id = match source {
        TeamSource::Group { group, rank } => {
            let group_id = parent.group_phase_config.as_ref()?.groups.get(*group)?.id;
            parent
                .group_standings
                .as_ref()?
                .iter()
                .find(|e| e.group_id == group_id && e.group_rank == *rank)
                .map(|e| e.entry.team_id)?
        }
        TeamSource::Standing { rank } => {
            parent.standings.get(*rank as usize - 1).map(|e| e.team_id)?
        }
    };
    mapping.get(&old_id).copied()
}

/// Per-group entry of a given rank, in group order.
fn rank_entries<'a>(parent: &'a Tournament, rank: u32) -> EngineResult<Vec<&'a GroupStandingEntry>> {
    let config = parent
        .group_phase_config
        .as_ref()
        .ok_or(EngineError::MissingGroupStandings)?;
    let group_standings = parent
        .group_standings
        .as_ref()
        .ok_or(EngineError::MissingGroupStandings)?;
    Ok(config
        .groups
        .iter()
        .filter_map(|g| {
            group_standings
                .iter()
                .find(|e| e.group_id == g.id && e.group_rank == rank)
        })
        .collect())
}

/// Order group finishers of equal rank across groups: points, then point
/// difference, stable on group order.
fn order_across_groups(entries: &mut [&GroupStandingEntry]) {
    entries.sort_by(|a, b| {
        b.entry
            .points
            .cmp(&a.entry.points)
            .then_with(|| b.entry.point_diff().cmp(&a.entry.point_diff()))
    });
}

/// 3-group shape: the best runner-up meets its own group winner in the
/// first semifinal, the other two winners meet in the second.
fn assign_three_group_slots(
    child: &mut Tournament,
    parent: &Tournament,
    mapping: &HashMap<Uuid, Uuid>,
) -> EngineResult<()> {
    let winners = rank_entries(parent, 1)?;
    let mut seconds = rank_entries(parent, 2)?;
    if winners.len() != 3 || seconds.len() != 3 {
        return Err(EngineError::MissingGroupStandings);
    }
    order_across_groups(&mut seconds);
    let best_second = seconds[0];
    let its_winner = winners
        .iter()
        .find(|w| w.group_id == best_second.group_id)
        .ok_or(EngineError::MissingGroupStandings)?;
    let others: Vec<&&GroupStandingEntry> = winners
        .iter()
        .filter(|w| w.group_id != best_second.group_id)
        .collect();

    let semifinal_ids: Vec<Uuid> = child
        .knockout_matches(KnockoutRound::Semifinal)
        .iter()
        .map(|m| m.id)
        .collect();
    if semifinal_ids.len() != 2 {
        return Err(EngineError::InvariantViolation(
            "3-group bracket without two semifinals".into(),
        ));
    }
    let assign = |m: &mut Match, a: Uuid, b: Uuid| {
        m.team_a = mapping.get(&a).copied();
        m.team_b = mapping.get(&b).copied();
    };
    // unwrap is safe, the ids were just collected from this map
    let sf1 = child.matches.get_mut(&semifinal_ids[0]).unwrap();
    assign(sf1, its_winner.entry.team_id, best_second.entry.team_id);
    let sf2 = child.matches.get_mut(&semifinal_ids[1]).unwrap();
    assign(sf2, others[0].entry.team_id, others[1].entry.team_id);
    Ok(())
}

/// 5-8 group shape: quarterfinal slot list of the group winners followed
/// by the best runners-up, paired 1-8, 2-7, 3-6, 4-5.
fn assign_seeded_quarterfinal_slots(
    child: &mut Tournament,
    parent: &Tournament,
    mapping: &HashMap<Uuid, Uuid>,
) -> EngineResult<()> {
    let mut winners = rank_entries(parent, 1)?;
    let mut seconds = rank_entries(parent, 2)?;
    order_across_groups(&mut winners);
    order_across_groups(&mut seconds);
    let fill_count = 8usize.saturating_sub(winners.len());
    let mut slots: Vec<Uuid> = winners.iter().map(|e| e.entry.team_id).collect();
    slots.extend(seconds.iter().take(fill_count).map(|e| e.entry.team_id));
    if slots.len() != 8 {
        // a quarterfinal without both participants stays pending
        debug!(found = slots.len(), "quarterfinal slot list incomplete");
    }

    let quarterfinal_ids: Vec<Uuid> = child
        .knockout_matches(KnockoutRound::Quarterfinal)
        .iter()
        .map(|m| m.id)
        .collect();
    for (k, id) in quarterfinal_ids.iter().enumerate() {
        let high = slots.get(k).copied();
        let low = slots.get(7 - k).copied();
        // unwrap is safe, the ids were just collected from this map
        let m = child.matches.get_mut(id).unwrap();
        m.team_a = high.and_then(|t| mapping.get(&t).copied());
        m.team_b = low.and_then(|t| mapping.get(&t).copied());
    }
    Ok(())
}
