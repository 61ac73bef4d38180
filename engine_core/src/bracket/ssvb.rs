//! SSVB-style knockout brackets
//!
//! The bracket shape follows the group count of the upstream phase. Slots
//! that depend only on a group's final rank get a static team source; the
//! 3-group and 5-8-group shapes additionally rank the runners-up across
//! groups, which is only known once the group phase is final, so those
//! slots stay sourceless and are filled by the phase populator.

use crate::{
    bracket::{set_dependency, set_source},
    errors::{EngineError, EngineResult},
    match_::{DependencyResult, KnockoutRound, Match, TeamSource},
    tournament::{DirectSeedStrategy, KnockoutSettings},
    utils::ids::IdSource,
};

/// Referee slot texts per round, rendered while no referee is assigned.
const REFEREE_GROUP_LAST: &str = "Group last-place team";
const REFEREE_INTERMEDIATE_LOSER: &str = "Loser of intermediate round";
const REFEREE_QF_LOSER: &str = "Loser of quarterfinal";

/// Generate the knockout bracket for `group_sizes.len()` groups.
pub fn generate_ssvb_bracket(
    group_sizes: &[usize],
    settings: &KnockoutSettings,
    ids: &mut dyn IdSource,
) -> EngineResult<Vec<Match>> {
    match group_sizes.len() {
        2 => Ok(two_groups(settings, ids)),
        3 => Ok(three_groups(settings, ids)),
        4 => Ok(four_groups(group_sizes, settings, ids)),
        5..=8 => Ok(seeded_quarterfinals(settings, ids)),
        n => Err(EngineError::UnsupportedGroupCount(n)),
    }
}

fn new_bracket_match(
    ids: &mut dyn IdSource,
    round: u32,
    number: u32,
    position: u32,
    knockout_round: KnockoutRound,
) -> Match {
    let mut m = Match::new(ids.next_id(), round, number);
    m.knockout_round = Some(knockout_round);
    m.bracket_position = Some(position);
    m
}

/// Third place (optional) and final on top of two semifinals.
fn finals_on_top(
    semifinals: &[Match],
    round: u32,
    mut number: u32,
    settings: &KnockoutSettings,
    referee_hint: &str,
    ids: &mut dyn IdSource,
) -> Vec<Match> {
    let mut matches = Vec::new();
    let mut position = 1;
    if settings.with_third_place {
        let mut third = new_bracket_match(ids, round, number, position, KnockoutRound::ThirdPlace);
        third.playoff_for_place = Some(3);
        set_dependency(&mut third, true, &semifinals[0], DependencyResult::Loser);
        set_dependency(&mut third, false, &semifinals[1], DependencyResult::Loser);
        if settings.use_referees {
            third.placeholder_referee = Some(referee_hint.into());
        }
        matches.push(third);
        number += 1;
        position += 1;
    }
    let mut final_match = new_bracket_match(ids, round, number, position, KnockoutRound::Final);
    final_match.playoff_for_place = Some(1);
    set_dependency(&mut final_match, true, &semifinals[0], DependencyResult::Winner);
    set_dependency(&mut final_match, false, &semifinals[1], DependencyResult::Winner);
    if settings.use_referees {
        final_match.placeholder_referee = Some(referee_hint.into());
    }
    matches.push(final_match);
    matches
}

/// 2 groups: crossed semifinals 1A-2B / 1B-2A.
fn two_groups(settings: &KnockoutSettings, ids: &mut dyn IdSource) -> Vec<Match> {
    let mut semifinals = Vec::new();
    for (position, (winner_group, runner_up_group)) in [(0usize, 1usize), (1, 0)].iter().enumerate()
    {
        let mut sf = new_bracket_match(
            ids,
            1,
            position as u32 + 1,
            position as u32 + 1,
            KnockoutRound::Semifinal,
        );
        set_source(
            &mut sf,
            true,
            TeamSource::Group {
                group: *winner_group,
                rank: 1,
            },
        );
        set_source(
            &mut sf,
            false,
            TeamSource::Group {
                group: *runner_up_group,
                rank: 2,
            },
        );
        if settings.use_referees {
            sf.placeholder_referee = Some(REFEREE_GROUP_LAST.into());
        }
        semifinals.push(sf);
    }
    let finals = finals_on_top(&semifinals, 2, 3, settings, REFEREE_GROUP_LAST, ids);
    semifinals.extend(finals);
    semifinals
}

/// 3 groups: the best runner-up earns a semifinal against its own group
/// winner; the other two winners meet. Which group that is depends on the
/// final tables, so the populator assigns the teams.
fn three_groups(settings: &KnockoutSettings, ids: &mut dyn IdSource) -> Vec<Match> {
    let mut sf1 = new_bracket_match(ids, 1, 1, 1, KnockoutRound::Semifinal);
    sf1.placeholder_a = Some("1st of best runner-up's group".into());
    sf1.placeholder_b = Some("Best runner-up".into());
    let mut sf2 = new_bracket_match(ids, 1, 2, 2, KnockoutRound::Semifinal);
    sf2.placeholder_a = Some("Group winner".into());
    sf2.placeholder_b = Some("Group winner".into());
    if settings.use_referees {
        sf1.placeholder_referee = Some(REFEREE_GROUP_LAST.into());
        sf2.placeholder_referee = Some(REFEREE_GROUP_LAST.into());
    }
    let mut matches = vec![sf1, sf2];
    let finals = finals_on_top(&matches, 2, 3, settings, REFEREE_GROUP_LAST, ids);
    matches.extend(finals);
    matches
}

/// Ranks feeding the intermediate round, by group size: the two direct
/// qualifiers above them advance straight to the quarterfinals.
fn intermediate_ranks(size: usize) -> (u32, u32) {
    if size == 5 { (3, 4) } else { (2, 3) }
}

/// 4 groups, the classic shape: intermediates pair the non-direct
/// qualifiers of opposite-indexed groups, quarterfinals pair each group's
/// direct qualifier with the winner of the next intermediate over.
fn four_groups(
    group_sizes: &[usize],
    settings: &KnockoutSettings,
    ids: &mut dyn IdSource,
) -> Vec<Match> {
    let mut number = 1;

    let mut intermediates = Vec::new();
    for i in 0..4usize {
        let opposite = 3 - i;
        let mut m =
            new_bracket_match(ids, 1, number, i as u32 + 1, KnockoutRound::Intermediate);
        set_source(
            &mut m,
            true,
            TeamSource::Group {
                group: i,
                rank: intermediate_ranks(group_sizes[i]).0,
            },
        );
        set_source(
            &mut m,
            false,
            TeamSource::Group {
                group: opposite,
                rank: intermediate_ranks(group_sizes[opposite]).1,
            },
        );
        if settings.use_referees {
            m.placeholder_referee = Some(REFEREE_GROUP_LAST.into());
        }
        intermediates.push(m);
        number += 1;
    }

    let mut quarterfinals = Vec::new();
    for i in 0..4usize {
        let mut m =
            new_bracket_match(ids, 2, number, i as u32 + 1, KnockoutRound::Quarterfinal);
        let direct_rank = match settings.qf_direct_seed {
            DirectSeedStrategy::AlternateFirstSecond if group_sizes[i] == 5 => 1 + (i as u32 % 2),
            _ => 1,
        };
        set_source(
            &mut m,
            true,
            TeamSource::Group {
                group: i,
                rank: direct_rank,
            },
        );
        set_dependency(&mut m, false, &intermediates[(i + 1) % 4], DependencyResult::Winner);
        if settings.use_referees {
            m.placeholder_referee = Some(REFEREE_GROUP_LAST.into());
        }
        quarterfinals.push(m);
        number += 1;
    }

    let mut semifinals = Vec::new();
    for (position, (x, y)) in [(0usize, 1usize), (2, 3)].iter().enumerate() {
        let mut m = new_bracket_match(
            ids,
            3,
            number,
            position as u32 + 1,
            KnockoutRound::Semifinal,
        );
        set_dependency(&mut m, true, &quarterfinals[*x], DependencyResult::Winner);
        set_dependency(&mut m, false, &quarterfinals[*y], DependencyResult::Winner);
        if settings.use_referees {
            m.placeholder_referee = Some(REFEREE_INTERMEDIATE_LOSER.into());
        }
        semifinals.push(m);
        number += 1;
    }

    let finals = finals_on_top(&semifinals, 4, number, settings, REFEREE_QF_LOSER, ids);

    let mut matches = intermediates;
    matches.extend(quarterfinals);
    matches.extend(semifinals);
    matches.extend(finals);
    matches
}

/// 5 to 8 groups: one 8-slot quarterfinal list seeded with the group
/// winners followed by the best runners-up, paired 1-8, 2-7, 3-6, 4-5.
/// The seed order needs the final tables, so the populator fills the
/// quarterfinal slots.
fn seeded_quarterfinals(settings: &KnockoutSettings, ids: &mut dyn IdSource) -> Vec<Match> {
    let mut number = 1;
    let mut quarterfinals = Vec::new();
    for (position, (high, low)) in [(1u32, 8u32), (2, 7), (3, 6), (4, 5)].iter().enumerate() {
        let mut m = new_bracket_match(
            ids,
            1,
            number,
            position as u32 + 1,
            KnockoutRound::Quarterfinal,
        );
        m.placeholder_a = Some(format!("Seed {high}"));
        m.placeholder_b = Some(format!("Seed {low}"));
        if settings.use_referees {
            m.placeholder_referee = Some(REFEREE_GROUP_LAST.into());
        }
        quarterfinals.push(m);
        number += 1;
    }

    let mut semifinals = Vec::new();
    // winner of 1-8 meets winner of 4-5, winner of 2-7 meets winner of 3-6
    for (position, (x, y)) in [(0usize, 3usize), (1, 2)].iter().enumerate() {
        let mut m = new_bracket_match(
            ids,
            2,
            number,
            position as u32 + 1,
            KnockoutRound::Semifinal,
        );
        set_dependency(&mut m, true, &quarterfinals[*x], DependencyResult::Winner);
        set_dependency(&mut m, false, &quarterfinals[*y], DependencyResult::Winner);
        if settings.use_referees {
            m.placeholder_referee = Some(REFEREE_GROUP_LAST.into());
        }
        semifinals.push(m);
        number += 1;
    }

    let finals = finals_on_top(&semifinals, 3, number, settings, REFEREE_QF_LOSER, ids);

    let mut matches = quarterfinals;
    matches.extend(semifinals);
    matches.extend(finals);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{match_::MatchStatus, utils::ids::SequenceIdSource};

    fn settings() -> KnockoutSettings {
        KnockoutSettings::default()
    }

    #[test]
    fn four_group_bracket_has_twelve_matches() {
        let mut ids = SequenceIdSource::new();
        let matches = generate_ssvb_bracket(&[4, 4, 4, 4], &settings(), &mut ids).unwrap();
        assert_eq!(matches.len(), 12);
        let count = |r: KnockoutRound| matches.iter().filter(|m| m.knockout_round == Some(r)).count();
        assert_eq!(count(KnockoutRound::Intermediate), 4);
        assert_eq!(count(KnockoutRound::Quarterfinal), 4);
        assert_eq!(count(KnockoutRound::Semifinal), 2);
        assert_eq!(count(KnockoutRound::ThirdPlace), 1);
        assert_eq!(count(KnockoutRound::Final), 1);
        assert!(matches.iter().all(|m| m.status == MatchStatus::Pending));
    }

    #[test]
    fn four_group_bracket_without_third_place() {
        let mut ids = SequenceIdSource::new();
        let mut s = settings();
        s.with_third_place = false;
        let matches = generate_ssvb_bracket(&[4, 4, 4, 4], &s, &mut ids).unwrap();
        assert_eq!(matches.len(), 11);
    }

    #[test]
    fn intermediates_pair_opposite_groups() {
        let mut ids = SequenceIdSource::new();
        let matches = generate_ssvb_bracket(&[4, 4, 4, 4], &settings(), &mut ids).unwrap();
        let first = &matches[0];
        assert_eq!(first.team_a_source, Some(TeamSource::Group { group: 0, rank: 2 }));
        assert_eq!(first.team_b_source, Some(TeamSource::Group { group: 3, rank: 3 }));
    }

    #[test]
    fn five_team_groups_use_lower_ranks() {
        let mut ids = SequenceIdSource::new();
        let matches = generate_ssvb_bracket(&[5, 5, 5, 5], &settings(), &mut ids).unwrap();
        let first = &matches[0];
        assert_eq!(first.team_a_source, Some(TeamSource::Group { group: 0, rank: 3 }));
        assert_eq!(first.team_b_source, Some(TeamSource::Group { group: 3, rank: 4 }));
    }

    #[test]
    fn quarterfinal_depends_on_next_intermediate() {
        let mut ids = SequenceIdSource::new();
        let matches = generate_ssvb_bracket(&[4, 4, 4, 4], &settings(), &mut ids).unwrap();
        let qf0 = &matches[4];
        let deps = qf0.depends_on.unwrap();
        assert_eq!(deps.team_b.unwrap().match_id, matches[1].id);
        assert_eq!(deps.team_b.unwrap().take, DependencyResult::Winner);
    }

    #[test]
    fn two_group_bracket_crosses_groups() {
        let mut ids = SequenceIdSource::new();
        let matches = generate_ssvb_bracket(&[4, 4], &settings(), &mut ids).unwrap();
        assert_eq!(matches.len(), 4);
        assert_eq!(matches[0].team_a_source, Some(TeamSource::Group { group: 0, rank: 1 }));
        assert_eq!(matches[0].team_b_source, Some(TeamSource::Group { group: 1, rank: 2 }));
    }

    #[test]
    fn rejects_unsupported_group_counts() {
        let mut ids = SequenceIdSource::new();
        assert_eq!(
            generate_ssvb_bracket(&[8], &settings(), &mut ids),
            Err(EngineError::UnsupportedGroupCount(1))
        );
        let nine = vec![4; 9];
        assert_eq!(
            generate_ssvb_bracket(&nine, &settings(), &mut ids),
            Err(EngineError::UnsupportedGroupCount(9))
        );
    }

    #[test]
    fn seeded_shape_for_six_groups() {
        let mut ids = SequenceIdSource::new();
        let matches = generate_ssvb_bracket(&[3; 6], &settings(), &mut ids).unwrap();
        // 4 QF + 2 SF + third place + final
        assert_eq!(matches.len(), 8);
        assert!(matches[0].team_a_source.is_none(), "slots resolved at populate time");
    }
}
