use crate::state::{BodyPart, CharacterId, ItemId, Position};

/// Multi-turn work an actor hands to the character's driver.
///
/// Actors never suspend; they describe the remaining work here and return.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Activity {
    /// Long first-aid treatment, finished later by the heal actor.
    FirstAid(HealTask),
    /// Butchering a corpse into a zombie slave.
    MakeZlave {
        moves: i32,
        success: i32,
        corpse_position: Position,
        corpse_index: usize,
    },
}

/// Resumable record of a long heal.
///
/// Owned by the scheduler; cancelling it before completion must leave item
/// and patient untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HealTask {
    pub healer: CharacterId,
    pub patient: CharacterId,
    pub item: ItemId,
    pub body_part: BodyPart,
    /// Moves of work remaining.
    pub moves: u32,
}
