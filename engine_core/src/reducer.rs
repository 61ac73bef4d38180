//! the command reducer
//!
//! A pure total function from `(state, command)` to a new state. Every
//! handler works on a clone of the incoming state; on error the clone is
//! dropped and the caller keeps the prior state untouched, which makes all
//! invalid commands no-ops-with-error and repeated commands harmless.

use crate::{
    command::{Command, TournamentConfig, TournamentSettings},
    container::{ContainerStatus, PhaseRef, TournamentContainer},
    errors::{EngineError, EngineResult},
    group_phase::{derive_group_config, generate_group_phase_matches, manual_groups},
    match_::{Match, MatchStatus, SetScore},
    phase::{effective_knockout_settings, materialize_child_phase, populate_child_phase},
    propagation::{propagate_match_result, validate_dependencies},
    referee::update_referees,
    round_robin::generate_round_robin,
    standings::{calculate_group_standings, calculate_playoff_standings, calculate_standings},
    state::ApplicationState,
    swiss::generate_swiss_round,
    team::Team,
    tournament::{
        KnockoutMode, KnockoutSettings, Tournament, TournamentStatus, TournamentSystem,
    },
    utils::{
        ids::{IdSource, TimeSource},
        normalize::normalize_name,
    },
};
use tracing::{debug, info};
use uuid::Uuid;

/// Capabilities a reduce step runs against: the id mint and the clock,
/// both supplied by the host.
pub struct ReduceCtx<'a> {
    pub ids: &'a mut dyn IdSource,
    pub clock: &'a dyn TimeSource,
}

impl<'a> ReduceCtx<'a> {
    pub fn new(ids: &'a mut dyn IdSource, clock: &'a dyn TimeSource) -> Self {
        ReduceCtx { ids, clock }
    }
}

/// Apply one command. The incoming state is never mutated.
pub fn reduce(
    state: &ApplicationState,
    command: Command,
    ctx: &mut ReduceCtx,
) -> EngineResult<ApplicationState> {
    let mut next = state.clone();
    match command {
        Command::LoadState(payload) => {
            for tournament in payload.tournaments.values() {
                validate_dependencies(tournament)?;
            }
            next = *payload;
        }
        Command::CreateTournament(config) => {
            create_tournament(&mut next, config, ctx)?;
        }
        Command::UpdateTeams {
            tournament_id,
            team_names,
        } => update_teams(&mut next, tournament_id, team_names, ctx)?,
        Command::UpdateTournamentSettings {
            tournament_id,
            settings,
        } => update_settings(&mut next, tournament_id, settings, ctx)?,
        Command::UpdateGroups {
            tournament_id,
            groups,
        } => update_groups(&mut next, tournament_id, groups, ctx)?,
        Command::StartTournament { tournament_id } => {
            start_tournament(&mut next, tournament_id, ctx)?
        }
        Command::UpdateMatchScore {
            tournament_id,
            match_id,
            scores,
        } => update_match_score(&mut next, tournament_id, match_id, scores, ctx)?,
        Command::CompleteMatch {
            tournament_id,
            match_id,
        } => complete_match(&mut next, tournament_id, match_id, ctx)?,
        Command::GenerateNextSwissRound { tournament_id } => {
            generate_next_swiss_round(&mut next, tournament_id, ctx)?
        }
        Command::ResetTournament { tournament_id } => {
            reset_tournament(&mut next, tournament_id, ctx)?
        }
        Command::DeleteTournament { tournament_id } => {
            let container_id = next.tournament(tournament_id)?.container_id;
            delete_container(&mut next, container_id)?;
        }
        Command::DeleteContainer { container_id } => delete_container(&mut next, container_id)?,
        Command::SetCurrentTournament { tournament_id } => {
            if let Some(id) = tournament_id {
                next.tournament(id)?;
            }
            next.current_tournament_id = tournament_id;
        }
        Command::SetCurrentPhase {
            container_id,
            phase_index,
        } => set_current_phase(&mut next, container_id, phase_index)?,
        Command::CreateFinalsTournament { tournament_id } => {
            let mut settings = next
                .tournament(tournament_id)?
                .knockout_settings
                .unwrap_or_default();
            settings.mode = KnockoutMode::Playoff;
            create_child_explicitly(&mut next, tournament_id, settings, ctx)?;
        }
        Command::CreateKnockoutTournament { tournament_id } => {
            let settings = effective_knockout_settings(next.tournament(tournament_id)?)
                .unwrap_or_default();
            create_child_explicitly(&mut next, tournament_id, settings, ctx)?;
        }
    }
    Ok(next)
}

fn create_tournament(
    state: &mut ApplicationState,
    config: TournamentConfig,
    ctx: &mut ReduceCtx,
) -> EngineResult<Uuid> {
    if config.team_names.len() < 2 {
        return Err(EngineError::UnsupportedTeamCount(config.team_names.len()));
    }
    let container_id = ctx.ids.next_id();
    let tournament_id = ctx.ids.next_id();
    let teams: Vec<Team> = config
        .team_names
        .iter()
        .enumerate()
        .map(|(i, name)| Team::new(ctx.ids.next_id(), normalize_name(name.clone()), i as u32 + 1))
        .collect();

    let group_phase_config = if config.system.is_group_based() {
        let team_ids: Vec<Uuid> = teams.iter().map(|t| t.id).collect();
        Some(derive_group_config(
            &team_ids,
            config.teams_per_group.unwrap_or(4),
            ctx.ids,
        ))
    } else {
        None
    };
    let number_of_rounds = match config.system {
        TournamentSystem::Swiss => Some(
            config
                .number_of_rounds
                .unwrap_or_else(|| recommended_swiss_rounds(teams.len())),
        ),
        _ => config.number_of_rounds,
    };
    let phase_name = if config.system.is_group_based() {
        "Group Phase"
    } else {
        "Main Round"
    };

    let now = ctx.clock.now();
    let name = normalize_name(config.name);
    let tournament = Tournament {
        id: tournament_id,
        name: name.clone(),
        system: config.system,
        rules: config.rules,
        teams,
        matches: Default::default(),
        standings: Vec::new(),
        group_standings: None,
        group_phase_config,
        knockout_settings: config.knockout,
        number_of_rounds,
        current_round: None,
        status: TournamentStatus::Configuration,
        eliminated_team_ids: Vec::new(),
        container_id,
        phase_order: 1,
        phase_name: phase_name.to_string(),
        parent_phase_id: None,
        created_at: now,
        updated_at: now,
    };
    let container = TournamentContainer {
        id: container_id,
        name,
        phases: vec![PhaseRef {
            tournament_id,
            order: 1,
            name: phase_name.to_string(),
        }],
        current_phase_index: 0,
        status: ContainerStatus::Configuration,
        created_at: now,
        updated_at: now,
    };
    info!(%tournament_id, system = %tournament.system, teams = tournament.teams.len(),
        "tournament created");
    state.tournaments.insert(tournament_id, tournament);
    state.containers.insert(container_id, container);
    state.current_tournament_id = Some(tournament_id);
    Ok(tournament_id)
}

/// Recommended Swiss length: log2 of the field, rounded up, plus two.
fn recommended_swiss_rounds(team_count: usize) -> u32 {
    let mut rounds = 0;
    let mut capacity = 1;
    while capacity < team_count {
        capacity *= 2;
        rounds += 1;
    }
    rounds + 2
}

fn expect_configuration(tournament: &Tournament) -> EngineResult<()> {
    if tournament.status != TournamentStatus::Configuration {
        return Err(EngineError::InvalidStatus(format!(
            "tournament is {}, expected configuration",
            tournament.status
        )));
    }
    Ok(())
}

fn update_teams(
    state: &mut ApplicationState,
    tournament_id: Uuid,
    team_names: Vec<String>,
    ctx: &mut ReduceCtx,
) -> EngineResult<()> {
    if team_names.len() < 2 {
        return Err(EngineError::UnsupportedTeamCount(team_names.len()));
    }
    let tournament = state.tournament(tournament_id)?;
    expect_configuration(tournament)?;
    let teams: Vec<Team> = team_names
        .iter()
        .enumerate()
        .map(|(i, name)| Team::new(ctx.ids.next_id(), normalize_name(name.clone()), i as u32 + 1))
        .collect();
    let group_phase_config = if tournament.system.is_group_based() {
        let team_ids: Vec<Uuid> = teams.iter().map(|t| t.id).collect();
        let per_group = tournament
            .group_phase_config
            .as_ref()
            .map(|c| c.teams_per_group)
            .unwrap_or(4);
        Some(derive_group_config(&team_ids, per_group, ctx.ids))
    } else {
        None
    };
    let now = ctx.clock.now();
    let tournament = state.tournament_mut(tournament_id)?;
    tournament.teams = teams;
    tournament.group_phase_config = group_phase_config;
    tournament.updated_at = now;
    Ok(())
}

fn update_settings(
    state: &mut ApplicationState,
    tournament_id: Uuid,
    settings: TournamentSettings,
    ctx: &mut ReduceCtx,
) -> EngineResult<()> {
    let tournament = state.tournament_mut(tournament_id)?;
    expect_configuration(tournament)?;
    tournament.rules = settings.rules;
    tournament.number_of_rounds = settings.number_of_rounds;
    tournament.knockout_settings = settings.knockout;
    tournament.updated_at = ctx.clock.now();
    Ok(())
}

fn update_groups(
    state: &mut ApplicationState,
    tournament_id: Uuid,
    groups: Vec<Vec<Uuid>>,
    ctx: &mut ReduceCtx,
) -> EngineResult<()> {
    let tournament = state.tournament_mut(tournament_id)?;
    expect_configuration(tournament)?;
    let Some(config) = &tournament.group_phase_config else {
        return Err(EngineError::InvalidStatus(
            "tournament has no group phase".into(),
        ));
    };
    let reassigned = manual_groups(config, groups, ctx.ids);
    tournament.group_phase_config = Some(reassigned);
    tournament.updated_at = ctx.clock.now();
    Ok(())
}

fn start_tournament(
    state: &mut ApplicationState,
    tournament_id: Uuid,
    ctx: &mut ReduceCtx,
) -> EngineResult<()> {
    let tournament = state.tournament_mut(tournament_id)?;
    expect_configuration(tournament)?;
    if tournament.system.is_bracket() {
        return Err(EngineError::InvalidStatus(
            "bracket phases are populated from their parent phase".into(),
        ));
    }

    let courts = tournament.rules.number_of_courts;
    let options = tournament.rules.standings_options();
    let matches: Vec<Match> = match tournament.system {
        TournamentSystem::RoundRobin => {
            let team_ids: Vec<Uuid> = tournament.teams.iter().map(|t| t.id).collect();
            generate_round_robin(&team_ids, courts, 1, ctx.ids)
        }
        TournamentSystem::Swiss => {
            tournament.current_round = Some(1);
            if tournament.number_of_rounds.is_none() {
                tournament.number_of_rounds =
                    Some(recommended_swiss_rounds(tournament.teams.len()));
            }
            let standings = calculate_standings(&tournament.teams, &[], &options);
            generate_swiss_round(&standings, &[], 1, courts, 1, ctx.ids)
        }
        _ => {
            // group based; config derived at creation
            let config = tournament
                .group_phase_config
                .as_ref()
                .ok_or(EngineError::MissingGroupStandings)?;
            let matches = generate_group_phase_matches(config, courts, ctx.ids);
            let group_standings =
                calculate_group_standings(&tournament.teams, &config.groups, &[], &options)?;
            tournament.group_standings = Some(group_standings);
            matches
        }
    };
    tournament.matches = matches.into_iter().map(|m| (m.id, m)).collect();
    tournament.standings = calculate_standings(&tournament.teams, &[], &options);
    tournament.status = TournamentStatus::InProgress;
    tournament.updated_at = ctx.clock.now();
    let container_id = tournament.container_id;
    info!(%tournament_id, matches = tournament.matches.len(), "tournament started");

    let now = ctx.clock.now();
    let container = state.container_mut(container_id)?;
    container.status = ContainerStatus::InProgress;
    container.updated_at = now;

    // child placeholder for knockout or playoff settings
    materialize_child_phase(state, tournament_id, None, ctx)?;
    Ok(())
}

fn validate_scores(scores: &[SetScore], sets_per_match: u8) -> EngineResult<()> {
    if scores.len() > usize::from(sets_per_match) {
        return Err(EngineError::InvalidScore(format!(
            "{} sets entered, match plays at most {}",
            scores.len(),
            sets_per_match
        )));
    }
    if scores.iter().any(|s| s.team_a == s.team_b) {
        return Err(EngineError::InvalidScore("a set cannot end drawn".into()));
    }
    Ok(())
}

fn update_match_score(
    state: &mut ApplicationState,
    tournament_id: Uuid,
    match_id: Uuid,
    scores: Vec<SetScore>,
    ctx: &mut ReduceCtx,
) -> EngineResult<()> {
    let tournament = state.tournament_mut(tournament_id)?;
    if tournament.status != TournamentStatus::InProgress {
        return Err(EngineError::InvalidStatus(
            "tournament is not in progress".into(),
        ));
    }
    validate_scores(&scores, tournament.rules.sets_per_match)?;
    let m = tournament
        .matches
        .get_mut(&match_id)
        .ok_or(EngineError::MatchNotFound(match_id))?;
    match m.status {
        MatchStatus::Pending => {
            return Err(EngineError::InvalidStatus(
                "match participants are not resolved yet".into(),
            ));
        }
        MatchStatus::Completed => {
            return Err(EngineError::InvalidStatus("match already completed".into()));
        }
        MatchStatus::Scheduled | MatchStatus::InProgress => {}
    }
    m.scores = scores;
    m.status = MatchStatus::InProgress;
    tournament.updated_at = ctx.clock.now();
    Ok(())
}

fn complete_match(
    state: &mut ApplicationState,
    tournament_id: Uuid,
    match_id: Uuid,
    ctx: &mut ReduceCtx,
) -> EngineResult<()> {
    // the parent phase is needed read-only for referee updates
    let parent = {
        let t = state.tournament(tournament_id)?;
        t.parent_phase_id
            .and_then(|pid| state.tournaments.get(&pid).cloned())
    };

    let (container_id, became_completed) = {
        let tournament = state.tournament_mut(tournament_id)?;
        if tournament.status != TournamentStatus::InProgress {
            return Err(EngineError::InvalidStatus(
                "tournament is not in progress".into(),
            ));
        }
        let sets_per_match = tournament.rules.sets_per_match;
        let m = tournament
            .matches
            .get_mut(&match_id)
            .ok_or(EngineError::MatchNotFound(match_id))?;
        match m.status {
            MatchStatus::Pending => {
                return Err(EngineError::InvalidStatus(
                    "match participants are not resolved yet".into(),
                ));
            }
            MatchStatus::Completed => {
                return Err(EngineError::InvalidStatus("match already completed".into()));
            }
            MatchStatus::Scheduled | MatchStatus::InProgress => {}
        }
        if m.scores.is_empty() {
            return Err(EngineError::InvalidScore("no scores entered".into()));
        }
        let (sets_a, sets_b) = m.set_wins();
        m.winner_id = if sets_a > sets_b {
            m.team_a
        } else if sets_b > sets_a {
            m.team_b
        } else if sets_per_match == 2 {
            // 2-set matches may draw
            None
        } else {
            return Err(EngineError::InvalidScore(
                "set score does not determine a winner".into(),
            ));
        };
        m.status = MatchStatus::Completed;
        debug!(match_number = m.match_number, winner = ?m.winner_id, "match completed");

        if tournament.system.is_bracket() {
            propagate_match_result(tournament, match_id)?;
            let referees_on = tournament
                .knockout_settings
                .is_some_and(|s| s.use_referees && s.mode == KnockoutMode::Ssvb);
            if referees_on && tournament.system == TournamentSystem::Knockout {
                if let Some(parent) = &parent {
                    update_referees(tournament, parent);
                }
            }
        }

        refresh_standings(tournament)?;

        let finished = !tournament.has_open_matches()
            && match tournament.system {
                // a Swiss field rests between rounds; it only finishes
                // once the configured rounds are exhausted
                TournamentSystem::Swiss => {
                    tournament.current_round.unwrap_or(0)
                        >= tournament.number_of_rounds.unwrap_or(u32::MAX)
                }
                _ => true,
            };
        if finished {
            tournament.status = TournamentStatus::Completed;
            info!(%tournament_id, "tournament completed");
        }
        tournament.updated_at = ctx.clock.now();
        (tournament.container_id, finished)
    };

    refresh_container_status(state, container_id, ctx)?;
    if became_completed {
        populate_child_phase(state, tournament_id, ctx)?;
    }
    Ok(())
}

/// Recompute the tables of a tournament from its completed matches.
fn refresh_standings(tournament: &mut Tournament) -> EngineResult<()> {
    let options = tournament.rules.standings_options();
    let group_standings = match (&tournament.group_phase_config, tournament.system.is_group_based()) {
        (Some(config), true) => {
            let refs: Vec<&Match> = tournament.matches.values().collect();
            Some(calculate_group_standings(
                &tournament.teams,
                &config.groups,
                &refs,
                &options,
            )?)
        }
        _ => None,
    };
    let standings = {
        let refs: Vec<&Match> = tournament.matches.values().collect();
        if tournament.system == TournamentSystem::Playoff {
            calculate_playoff_standings(&tournament.teams, &refs, &options)
        } else {
            calculate_standings(&tournament.teams, &refs, &options)
        }
    };
    if group_standings.is_some() {
        tournament.group_standings = group_standings;
    }
    tournament.standings = standings;
    Ok(())
}

/// Container status follows its phases: completed when every phase is,
/// in progress as soon as any phase left configuration.
fn refresh_container_status(
    state: &mut ApplicationState,
    container_id: Uuid,
    ctx: &mut ReduceCtx,
) -> EngineResult<()> {
    let container = state.container(container_id)?;
    let statuses: Vec<TournamentStatus> = container
        .phases
        .iter()
        .filter_map(|p| state.tournaments.get(&p.tournament_id))
        .map(|t| t.status)
        .collect();
    let status = if !statuses.is_empty()
        && statuses.iter().all(|s| *s == TournamentStatus::Completed)
    {
        ContainerStatus::Completed
    } else if statuses.iter().any(|s| *s != TournamentStatus::Configuration) {
        ContainerStatus::InProgress
    } else {
        ContainerStatus::Configuration
    };
    let now = ctx.clock.now();
    let container = state.container_mut(container_id)?;
    if container.status != status {
        container.status = status;
        container.updated_at = now;
    }
    Ok(())
}

fn generate_next_swiss_round(
    state: &mut ApplicationState,
    tournament_id: Uuid,
    ctx: &mut ReduceCtx,
) -> EngineResult<()> {
    let tournament = state.tournament_mut(tournament_id)?;
    if tournament.system != TournamentSystem::Swiss {
        return Err(EngineError::InvalidStatus(
            "not a Swiss tournament".into(),
        ));
    }
    if tournament.status != TournamentStatus::InProgress {
        return Err(EngineError::InvalidStatus(
            "tournament is not in progress".into(),
        ));
    }
    if tournament.has_open_matches() {
        return Err(EngineError::InvalidStatus(
            "current round is not finished".into(),
        ));
    }

    let next_round = tournament.current_round.unwrap_or(0) + 1;
    let total_rounds = tournament
        .number_of_rounds
        .unwrap_or_else(|| recommended_swiss_rounds(tournament.teams.len()));
    if next_round > total_rounds {
        tournament.status = TournamentStatus::Completed;
        tournament.updated_at = ctx.clock.now();
        let container_id = tournament.container_id;
        info!(%tournament_id, "swiss rounds exhausted, tournament completed");
        return refresh_container_status(state, container_id, ctx);
    }

    let new_matches = {
        let refs: Vec<&Match> = tournament.matches.values().collect();
        generate_swiss_round(
            &tournament.standings,
            &refs,
            next_round,
            tournament.rules.number_of_courts,
            tournament.max_match_number() + 1,
            ctx.ids,
        )
    };
    if new_matches.is_empty() {
        tournament.status = TournamentStatus::Completed;
        tournament.updated_at = ctx.clock.now();
        let container_id = tournament.container_id;
        info!(%tournament_id, "no pairings left, tournament completed");
        return refresh_container_status(state, container_id, ctx);
    }
    debug!(round = next_round, matches = new_matches.len(), "swiss round generated");
    tournament
        .matches
        .extend(new_matches.into_iter().map(|m| (m.id, m)));
    tournament.current_round = Some(next_round);
    tournament.updated_at = ctx.clock.now();
    Ok(())
}

fn reset_tournament(
    state: &mut ApplicationState,
    tournament_id: Uuid,
    ctx: &mut ReduceCtx,
) -> EngineResult<()> {
    state.tournament(tournament_id)?;
    // drop child phases spawned by this tournament
    let child_ids: Vec<Uuid> = state
        .tournaments
        .values()
        .filter(|t| t.parent_phase_id == Some(tournament_id))
        .map(|t| t.id)
        .collect();
    for child_id in &child_ids {
        state.tournaments.remove(child_id);
    }

    let now = ctx.clock.now();
    let tournament = state.tournament_mut(tournament_id)?;
    tournament.matches.clear();
    tournament.standings.clear();
    tournament.group_standings = None;
    tournament.eliminated_team_ids.clear();
    tournament.current_round = None;
    tournament.status = TournamentStatus::Configuration;
    tournament.updated_at = now;
    let container_id = tournament.container_id;

    let container = state.container_mut(container_id)?;
    for child_id in &child_ids {
        container.remove_phase(*child_id);
    }
    container.status = ContainerStatus::Configuration;
    container.current_phase_index = 0;
    container.updated_at = now;
    state.current_tournament_id = Some(tournament_id);
    info!(%tournament_id, dropped_children = child_ids.len(), "tournament reset");
    Ok(())
}

fn delete_container(state: &mut ApplicationState, container_id: Uuid) -> EngineResult<()> {
    let container = state
        .containers
        .remove(&container_id)
        .ok_or(EngineError::ContainerNotFound(container_id))?;
    for phase in &container.phases {
        state.tournaments.remove(&phase.tournament_id);
    }
    if state
        .current_tournament_id
        .is_some_and(|id| !state.tournaments.contains_key(&id))
    {
        state.current_tournament_id = None;
    }
    info!(%container_id, phases = container.phases.len(), "container deleted");
    Ok(())
}

fn set_current_phase(
    state: &mut ApplicationState,
    container_id: Uuid,
    phase_index: usize,
) -> EngineResult<()> {
    let container = state.container_mut(container_id)?;
    if phase_index >= container.phases.len() {
        return Err(EngineError::InvalidStatus(format!(
            "phase index {} out of range",
            phase_index
        )));
    }
    container.current_phase_index = phase_index;
    let tournament_id = container.phases[phase_index].tournament_id;
    state.current_tournament_id = Some(tournament_id);
    Ok(())
}

/// Explicit child materialization; idempotent when a child already exists.
/// A parent that already finished populates the fresh child right away.
fn create_child_explicitly(
    state: &mut ApplicationState,
    tournament_id: Uuid,
    settings: KnockoutSettings,
    ctx: &mut ReduceCtx,
) -> EngineResult<()> {
    materialize_child_phase(state, tournament_id, Some(settings), ctx)?;
    populate_child_phase(state, tournament_id, ctx)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ids::{FixedTime, SequenceIdSource};

    #[test]
    fn swiss_round_recommendation() {
        assert_eq!(recommended_swiss_rounds(2), 3);
        assert_eq!(recommended_swiss_rounds(7), 5);
        assert_eq!(recommended_swiss_rounds(8), 5);
        assert_eq!(recommended_swiss_rounds(9), 6);
    }

    #[test]
    fn score_validation() {
        assert!(validate_scores(&[SetScore::new(21, 15)], 1).is_ok());
        assert!(matches!(
            validate_scores(&[SetScore::new(15, 15)], 1),
            Err(EngineError::InvalidScore(_))
        ));
        assert!(matches!(
            validate_scores(&[SetScore::new(21, 15), SetScore::new(21, 15)], 1),
            Err(EngineError::InvalidScore(_))
        ));
    }

    #[test]
    fn create_assigns_seeds_and_a_container() {
        let mut ids = SequenceIdSource::new();
        let clock = FixedTime::default();
        let mut ctx = ReduceCtx::new(&mut ids, &clock);
        let state = ApplicationState::new();
        let config = TournamentConfig::new(
            "  Beach   Open ",
            TournamentSystem::RoundRobin,
            vec!["A".into(), "B".into(), "C".into()],
        );
        let state = reduce(&state, Command::CreateTournament(config), &mut ctx).unwrap();

        let t = state.tournaments.values().next().unwrap();
        assert_eq!(t.name, "Beach Open");
        assert_eq!(t.status, TournamentStatus::Configuration);
        let seeds: Vec<u32> = t.teams.iter().map(|team| team.seed_position).collect();
        assert_eq!(seeds, vec![1, 2, 3]);
        let container = state.containers.get(&t.container_id).unwrap();
        assert_eq!(container.phases.len(), 1);
        assert_eq!(container.phases[0].tournament_id, t.id);
        assert_eq!(state.current_tournament_id, Some(t.id));
    }

    #[test]
    fn too_few_teams_are_rejected() {
        let mut ids = SequenceIdSource::new();
        let clock = FixedTime::default();
        let mut ctx = ReduceCtx::new(&mut ids, &clock);
        let state = ApplicationState::new();
        let config = TournamentConfig::new(
            "Tiny",
            TournamentSystem::RoundRobin,
            vec!["Solo".into()],
        );
        let err = reduce(&state, Command::CreateTournament(config), &mut ctx).unwrap_err();
        assert_eq!(err, EngineError::UnsupportedTeamCount(1));
    }
}
