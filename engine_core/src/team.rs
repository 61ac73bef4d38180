// teams of a tournament

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// team entered into a tournament
///
/// Teams are owned by their tournament. Phase transitions copy teams into
/// the child phase under fresh ids; `seed_position` survives the copy and
/// is the stable link between a team's incarnations across phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// id of team in tournament
    pub id: Uuid,
    /// name of team
    pub name: String,
    /// initial seed position, 1 = top seed
    pub seed_position: u32,
}

impl Team {
    pub fn new(id: Uuid, name: impl Into<String>, seed_position: u32) -> Self {
        Team {
            id,
            name: name.into(),
            seed_position,
        }
    }
}
