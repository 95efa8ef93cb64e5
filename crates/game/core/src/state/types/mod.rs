pub mod body;
pub mod common;
pub mod effect;
pub mod ids;
pub mod item;

pub use body::{BodyPart, BodyPartCategory, HitPoints};
pub use common::{CharacterId, ItemId, Position, Tick};
pub use effect::EffectData;
pub use ids::{
    AmmoTypeId, EffectId, FieldId, ItemTypeId, MaterialId, MonsterTypeId, QualityId, RecipeId,
    SkillId, TerrainId, TrapId, VehicleProtoId, VitaminId,
};
pub use item::{Item, ItemLocation, ItemSource};
