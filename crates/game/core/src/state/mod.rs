//! Value types describing items, bodies and positions.
//!
//! These types hold no behavior beyond small invariants (damage bounds,
//! hit-point clamping). Actors read and mutate them; collaborators own them.
pub mod types;

pub use types::{
    AmmoTypeId, BodyPart, BodyPartCategory, CharacterId, EffectData, EffectId, FieldId, HitPoints,
    Item, ItemId, ItemLocation, ItemSource, ItemTypeId, MaterialId, MonsterTypeId, Position,
    QualityId, RecipeId, SkillId, TerrainId, Tick, TrapId, VehicleProtoId, VitaminId,
};
