//! In-memory oracle implementations.
//!
//! Snapshots hold plain collections of definitions and implement the oracle
//! traits directly. Content loaders fill them from data files; tests build
//! them by hand with the `with_*` helpers.

use std::collections::{BTreeMap, BTreeSet};

use super::{
    ActorEnv, EffectDef, Env, ItemOracle, ItemType, MaterialType, MonsterDef, Recipe,
    RecipeOracle, SkillDef, TablesOracle, TerrainDef, TrapDef,
};
use crate::state::{
    AmmoTypeId, EffectId, FieldId, ItemTypeId, MaterialId, MonsterTypeId, SkillId, TerrainId,
    TrapId, VehicleProtoId,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Complete snapshot of all content oracles.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OracleSnapshot {
    pub items: ItemsSnapshot,
    pub recipes: RecipesSnapshot,
    pub tables: TablesSnapshot,
}

impl OracleSnapshot {
    pub fn new(items: ItemsSnapshot, recipes: RecipesSnapshot, tables: TablesSnapshot) -> Self {
        Self {
            items,
            recipes,
            tables,
        }
    }

    /// Borrows every oracle as an [`ActorEnv`].
    pub fn env(&self) -> ActorEnv<'_> {
        Env::with_all(&self.items, &self.recipes, &self.tables).into_actor_env()
    }
}

/// Item types, materials and ammo defaults.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ItemsSnapshot {
    pub item_types: BTreeMap<ItemTypeId, ItemType>,
    pub materials: BTreeMap<MaterialId, MaterialType>,
    pub default_ammo: BTreeMap<AmmoTypeId, ItemTypeId>,
}

impl ItemsSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_item_type(&mut self, ty: ItemType) {
        self.item_types.insert(ty.id.clone(), ty);
    }

    pub fn insert_material(&mut self, material: MaterialType) {
        self.materials.insert(material.id.clone(), material);
    }

    pub fn with_item_type(mut self, ty: ItemType) -> Self {
        self.insert_item_type(ty);
        self
    }

    pub fn with_material(mut self, material: MaterialType) -> Self {
        self.insert_material(material);
        self
    }

    pub fn with_default_ammo(
        mut self,
        ammo: impl Into<AmmoTypeId>,
        item: impl Into<ItemTypeId>,
    ) -> Self {
        self.default_ammo.insert(ammo.into(), item.into());
        self
    }
}

impl ItemOracle for ItemsSnapshot {
    fn item_type(&self, id: &ItemTypeId) -> Option<&ItemType> {
        self.item_types.get(id)
    }

    fn material(&self, id: &MaterialId) -> Option<&MaterialType> {
        self.materials.get(id)
    }

    fn default_ammo(&self, ammo: &AmmoTypeId) -> Option<&ItemTypeId> {
        self.default_ammo.get(ammo)
    }

    fn all_item_types(&self) -> Vec<&ItemType> {
        self.item_types.values().collect()
    }
}

/// Recipe list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RecipesSnapshot {
    pub recipes: Vec<Recipe>,
}

impl RecipesSnapshot {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    pub fn with_recipe(mut self, recipe: Recipe) -> Self {
        self.recipes.push(recipe);
        self
    }
}

impl RecipeOracle for RecipesSnapshot {
    fn recipes_for(&self, item: &ItemTypeId) -> Vec<&Recipe> {
        self.recipes.iter().filter(|r| &r.result == item).collect()
    }
}

/// Skills, effects, monsters, traps, terrain, vehicles and fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TablesSnapshot {
    pub skills: BTreeMap<SkillId, SkillDef>,
    pub effects: BTreeMap<EffectId, EffectDef>,
    pub monsters: BTreeMap<MonsterTypeId, MonsterDef>,
    pub traps: BTreeMap<TrapId, TrapDef>,
    pub terrain: BTreeMap<TerrainId, TerrainDef>,
    pub vehicles: BTreeSet<VehicleProtoId>,
    pub fields: BTreeSet<FieldId>,
}

impl TablesSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skill(mut self, id: impl Into<SkillId>) -> Self {
        let id = id.into();
        let name = id.to_string();
        self.skills.insert(id.clone(), SkillDef { id, name });
        self
    }

    pub fn with_effect(mut self, id: impl Into<EffectId>) -> Self {
        let id = id.into();
        let name = id.to_string();
        self.effects.insert(id.clone(), EffectDef { id, name });
        self
    }

    pub fn with_monster(mut self, monster: MonsterDef) -> Self {
        self.monsters.insert(monster.id.clone(), monster);
        self
    }

    pub fn with_trap(mut self, id: impl Into<TrapId>, name: impl Into<String>) -> Self {
        let id = id.into();
        self.traps.insert(
            id.clone(),
            TrapDef {
                id,
                name: name.into(),
            },
        );
        self
    }

    pub fn with_terrain(mut self, id: impl Into<TerrainId>) -> Self {
        let id = id.into();
        let name = id.to_string();
        self.terrain.insert(id.clone(), TerrainDef { id, name });
        self
    }

    pub fn with_vehicle(mut self, id: impl Into<VehicleProtoId>) -> Self {
        self.vehicles.insert(id.into());
        self
    }

    pub fn with_field(mut self, id: impl Into<FieldId>) -> Self {
        self.fields.insert(id.into());
        self
    }
}

impl TablesOracle for TablesSnapshot {
    fn skill(&self, id: &SkillId) -> Option<&SkillDef> {
        self.skills.get(id)
    }

    fn effect(&self, id: &EffectId) -> Option<&EffectDef> {
        self.effects.get(id)
    }

    fn monster(&self, id: &MonsterTypeId) -> Option<&MonsterDef> {
        self.monsters.get(id)
    }

    fn trap(&self, id: &TrapId) -> Option<&TrapDef> {
        self.traps.get(id)
    }

    fn terrain(&self, id: &TerrainId) -> Option<&TerrainDef> {
        self.terrain.get(id)
    }

    fn has_vehicle(&self, id: &VehicleProtoId) -> bool {
        self.vehicles.contains(id)
    }

    fn has_field(&self, id: &FieldId) -> bool {
        self.fields.contains(id)
    }
}
