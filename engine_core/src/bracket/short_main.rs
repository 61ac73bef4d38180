//! short main round
//!
//! Hybrid of a cut-down main knockout and explicit placement brackets: a
//! qualification round feeds an 8-team upper bracket, while qualification
//! losers, quarterfinal losers and the group 4ths each play a 4-team mini
//! bracket for places 9-12, 5-8 and 13-16. Round numbering is fixed so
//! that every mini bracket progresses in lockstep with the main rounds.

use crate::{
    bracket::{set_dependency, set_source},
    errors::{EngineError, EngineResult},
    match_::{DependencyResult, KnockoutRound, Match, TeamSource},
    utils::ids::IdSource,
};

/// Generate the 24-match short-main bracket for four groups of four.
pub fn generate_short_main_bracket(
    group_sizes: &[usize],
    ids: &mut dyn IdSource,
) -> EngineResult<Vec<Match>> {
    if group_sizes.len() != 4 {
        return Err(EngineError::UnsupportedGroupCount(group_sizes.len()));
    }
    if group_sizes.iter().any(|&s| s != 4) {
        return Err(EngineError::UnsupportedTeamCount(group_sizes.iter().sum()));
    }

    let mut number = 1;

    // round 1: qualification, runners-up against opposite-group thirds
    let mut qualification = Vec::new();
    for i in 0..4usize {
        let mut m = next_match(1, i as u32 + 1, KnockoutRound::Qualification, &mut number, ids);
        set_source(&mut m, true, TeamSource::Group { group: i, rank: 2 });
        set_source(&mut m, false, TeamSource::Group { group: 3 - i, rank: 3 });
        qualification.push(m);
    }

    // round 1: the four group 4ths open the 13-16 bracket
    let mut p13_round1 = Vec::new();
    for (position, (x, y)) in [(0usize, 3usize), (1, 2)].iter().enumerate() {
        let mut m = next_match(1, position as u32 + 1, KnockoutRound::Placement13To16, &mut number, ids);
        set_source(&mut m, true, TeamSource::Group { group: *x, rank: 4 });
        set_source(&mut m, false, TeamSource::Group { group: *y, rank: 4 });
        p13_round1.push(m);
    }

    // round 2: top quarterfinals, group winners against qualification winners
    let mut quarterfinals = Vec::new();
    for i in 0..4usize {
        let mut m = next_match(2, i as u32 + 1, KnockoutRound::TopQuarterfinal, &mut number, ids);
        set_source(&mut m, true, TeamSource::Group { group: i, rank: 1 });
        set_dependency(&mut m, false, &qualification[(i + 1) % 4], DependencyResult::Winner);
        quarterfinals.push(m);
    }

    // round 2: 13-16 placement finals
    let p13_finals = mini_finals(&p13_round1, 2, 13, KnockoutRound::Placement13To16, &mut number, ids);

    // round 2: qualification losers open the 9-12 bracket
    let mut p9_round1 = Vec::new();
    for (position, (x, y)) in [(0usize, 3usize), (1, 2)].iter().enumerate() {
        let mut m = next_match(2, position as u32 + 1, KnockoutRound::Placement9To12, &mut number, ids);
        set_dependency(&mut m, true, &qualification[*x], DependencyResult::Loser);
        set_dependency(&mut m, false, &qualification[*y], DependencyResult::Loser);
        p9_round1.push(m);
    }

    // round 3: top semifinals crossing the quarterfinals
    let mut semifinals = Vec::new();
    for (position, (x, y)) in [(0usize, 1usize), (2, 3)].iter().enumerate() {
        let mut m = next_match(3, position as u32 + 1, KnockoutRound::TopSemifinal, &mut number, ids);
        set_dependency(&mut m, true, &quarterfinals[*x], DependencyResult::Winner);
        set_dependency(&mut m, false, &quarterfinals[*y], DependencyResult::Winner);
        semifinals.push(m);
    }

    // round 3: 9-12 placement finals
    let p9_finals = mini_finals(&p9_round1, 3, 9, KnockoutRound::Placement9To12, &mut number, ids);

    // round 3: quarterfinal losers open the 5-8 bracket
    let mut p5_round1 = Vec::new();
    for (position, (x, y)) in [(0usize, 3usize), (1, 2)].iter().enumerate() {
        let mut m = next_match(3, position as u32 + 1, KnockoutRound::Placement5To8, &mut number, ids);
        set_dependency(&mut m, true, &quarterfinals[*x], DependencyResult::Loser);
        set_dependency(&mut m, false, &quarterfinals[*y], DependencyResult::Loser);
        p5_round1.push(m);
    }

    // round 4: third place, final, 5-8 placement finals
    let mut third = next_match(4, 1, KnockoutRound::ThirdPlace, &mut number, ids);
    third.playoff_for_place = Some(3);
    set_dependency(&mut third, true, &semifinals[0], DependencyResult::Loser);
    set_dependency(&mut third, false, &semifinals[1], DependencyResult::Loser);
    let mut final_match = next_match(4, 2, KnockoutRound::TopFinal, &mut number, ids);
    final_match.playoff_for_place = Some(1);
    set_dependency(&mut final_match, true, &semifinals[0], DependencyResult::Winner);
    set_dependency(&mut final_match, false, &semifinals[1], DependencyResult::Winner);
    let p5_finals = mini_finals(&p5_round1, 4, 5, KnockoutRound::Placement5To8, &mut number, ids);

    let mut matches = qualification;
    matches.extend(p13_round1);
    matches.extend(quarterfinals);
    matches.extend(p13_finals);
    matches.extend(p9_round1);
    matches.extend(semifinals);
    matches.extend(p9_finals);
    matches.extend(p5_round1);
    matches.push(third);
    matches.push(final_match);
    matches.extend(p5_finals);
    Ok(matches)
}

/// Fresh pending bracket match, advancing the shared match numbering.
fn next_match(
    round: u32,
    position: u32,
    kind: KnockoutRound,
    number: &mut u32,
    ids: &mut dyn IdSource,
) -> Match {
    let mut m = Match::new(ids.next_id(), round, *number);
    m.knockout_round = Some(kind);
    m.bracket_position = Some(position);
    *number += 1;
    m
}

/// Closing pair of a 4-team mini bracket: winners play for `top_place`,
/// losers for `top_place + 2`.
fn mini_finals(
    openers: &[Match],
    round: u32,
    top_place: u32,
    kind: KnockoutRound,
    number: &mut u32,
    ids: &mut dyn IdSource,
) -> Vec<Match> {
    let mut upper = next_match(round, 3, kind, number, ids);
    upper.playoff_for_place = Some(top_place);
    set_dependency(&mut upper, true, &openers[0], DependencyResult::Winner);
    set_dependency(&mut upper, false, &openers[1], DependencyResult::Winner);
    let mut lower = next_match(round, 4, kind, number, ids);
    lower.playoff_for_place = Some(top_place + 2);
    set_dependency(&mut lower, true, &openers[0], DependencyResult::Loser);
    set_dependency(&mut lower, false, &openers[1], DependencyResult::Loser);
    vec![upper, lower]
}
