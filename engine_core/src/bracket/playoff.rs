//! playoff ladder after a round robin
//!
//! Adjacent pairs of the final standings replay their order: 1st against
//! 2nd for place 1, 3rd against 4th for place 3, and so on. An odd field
//! leaves the last team without a playoff; it keeps its standing place.

use crate::{
    bracket::set_source,
    match_::{Match, TeamSource},
    utils::ids::IdSource,
};

pub fn generate_playoff_ladder(team_count: usize, ids: &mut dyn IdSource) -> Vec<Match> {
    let mut matches = Vec::with_capacity(team_count / 2);
    for k in 0..team_count as u32 / 2 {
        let mut m = Match::new(ids.next_id(), 1, k + 1);
        m.bracket_position = Some(k + 1);
        m.is_playoff = true;
        m.playoff_for_place = Some(2 * k + 1);
        set_source(&mut m, true, TeamSource::Standing { rank: 2 * k + 1 });
        set_source(&mut m, false, TeamSource::Standing { rank: 2 * k + 2 });
        matches.push(m);
    }
    matches
}
