use std::collections::BTreeMap;

use crate::state::{ItemTypeId, QualityId, RecipeId, SkillId};

/// Crafting recipes, consulted to rate how hard an item is to repair.
pub trait RecipeOracle: Send + Sync {
    /// Every recipe whose result is `item`.
    fn recipes_for(&self, item: &ItemTypeId) -> Vec<&Recipe>;
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Recipe {
    pub id: RecipeId,
    pub result: ItemTypeId,
    pub difficulty: i32,
    pub skill_used: SkillId,
    /// Secondary skills and the level each requires.
    pub required_skills: BTreeMap<SkillId, i32>,
    /// Tools that must be present.
    pub tools: Vec<ItemTypeId>,
    /// Tool qualities that must be present, with minimum level.
    pub qualities: BTreeMap<QualityId, i32>,
}

impl Recipe {
    pub fn new(
        id: impl Into<RecipeId>,
        result: impl Into<ItemTypeId>,
        skill_used: impl Into<SkillId>,
        difficulty: i32,
    ) -> Self {
        Self {
            id: id.into(),
            result: result.into(),
            difficulty,
            skill_used: skill_used.into(),
            required_skills: BTreeMap::new(),
            tools: Vec::new(),
            qualities: BTreeMap::new(),
        }
    }
}
