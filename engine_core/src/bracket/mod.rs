//! bracket generators
//!
//! All generators emit `Pending` matches whose sides are wired either to a
//! team source (resolved once, when the parent phase populates this one)
//! or to a `depends_on` edge (resolved incrementally as predecessors
//! complete). Matches carry placeholder texts so a bracket is renderable
//! before any team is known.

pub mod placement;
pub mod playoff;
pub mod short_main;
pub mod ssvb;

use crate::{
    group::group_label,
    match_::{DependencyResult, Match, MatchDependencies, MatchDependency, TeamSource},
};

/// English ordinal suffix: 1st, 2nd, 3rd, 4th, ... 11th, 12th, 13th, 21st.
pub(crate) fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (1, 11) | (2, 12) | (3, 13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

pub(crate) fn source_placeholder(source: &TeamSource) -> String {
    match source {
        TeamSource::Group { group, rank } => {
            format!("{} Group {}", ordinal(*rank), group_label(*group))
        }
        TeamSource::Standing { rank } => format!("{} of standings", ordinal(*rank)),
    }
}

/// Wire one side of `m` to a team source and render its placeholder.
pub(crate) fn set_source(m: &mut Match, side_a: bool, source: TeamSource) {
    let placeholder = source_placeholder(&source);
    if side_a {
        m.team_a_source = Some(source);
        m.placeholder_a = Some(placeholder);
    } else {
        m.team_b_source = Some(source);
        m.placeholder_b = Some(placeholder);
    }
}

/// Wire one side of `m` to the winner or loser of `predecessor`.
pub(crate) fn set_dependency(
    m: &mut Match,
    side_a: bool,
    predecessor: &Match,
    take: DependencyResult,
) {
    set_dependency_parts(m, side_a, predecessor.id, predecessor.match_number, take);
}

/// Same as [`set_dependency`], for callers that no longer hold the
/// predecessor `Match` itself.
pub(crate) fn set_dependency_parts(
    m: &mut Match,
    side_a: bool,
    predecessor_id: uuid::Uuid,
    predecessor_number: u32,
    take: DependencyResult,
) {
    let dependency = MatchDependency {
        match_id: predecessor_id,
        take,
    };
    let placeholder = match take {
        DependencyResult::Winner => format!("Winner Match {predecessor_number}"),
        DependencyResult::Loser => format!("Loser Match {predecessor_number}"),
    };
    let deps = m.depends_on.get_or_insert(MatchDependencies::default());
    if side_a {
        deps.team_a = Some(dependency);
        m.placeholder_a = Some(placeholder);
    } else {
        deps.team_b = Some(dependency);
        m.placeholder_b = Some(placeholder);
    }
}
