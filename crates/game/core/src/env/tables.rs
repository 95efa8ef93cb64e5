use std::collections::BTreeSet;

use crate::state::{EffectId, FieldId, MonsterTypeId, SkillId, TerrainId, TrapId, VehicleProtoId};

/// Rule tables for everything an actor may reference besides items.
///
/// Finalization uses these to reject records naming unknown ids; actors also
/// read monster stats when spawning or raising corpses.
pub trait TablesOracle: Send + Sync {
    fn skill(&self, id: &SkillId) -> Option<&SkillDef>;
    fn effect(&self, id: &EffectId) -> Option<&EffectDef>;
    fn monster(&self, id: &MonsterTypeId) -> Option<&MonsterDef>;
    fn trap(&self, id: &TrapId) -> Option<&TrapDef>;
    fn terrain(&self, id: &TerrainId) -> Option<&TerrainDef>;
    fn has_vehicle(&self, id: &VehicleProtoId) -> bool;
    fn has_field(&self, id: &FieldId) -> bool;
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkillDef {
    pub id: SkillId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EffectDef {
    pub id: EffectId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MonsterDef {
    pub id: MonsterTypeId,
    pub name: String,
    pub hp: i32,
    pub difficulty: i32,
    pub species: BTreeSet<String>,
    pub flags: BTreeSet<String>,
}

impl MonsterDef {
    pub fn in_species(&self, species: &str) -> bool {
        self.species.contains(species)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrapDef {
    pub id: TrapId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TerrainDef {
    pub id: TerrainId,
    pub name: String,
}
