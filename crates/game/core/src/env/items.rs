use std::collections::{BTreeMap, BTreeSet};

use crate::state::{AmmoTypeId, ItemTypeId, MaterialId, QualityId, SkillId};

/// Read-only access to item type and material definitions.
pub trait ItemOracle: Send + Sync {
    fn item_type(&self, id: &ItemTypeId) -> Option<&ItemType>;

    fn material(&self, id: &MaterialId) -> Option<&MaterialType>;

    /// Item loaded by default into things that use `ammo`.
    fn default_ammo(&self, ammo: &AmmoTypeId) -> Option<&ItemTypeId>;

    /// Returns all item types available in this oracle.
    fn all_item_types(&self) -> Vec<&ItemType>;
}

/// Broad classification of an item type.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ItemCategory {
    #[default]
    Generic,
    Tool,
    Comestible,
    Ammo,
    Gun,
    Armor,
    Book,
    Container,
}

/// Shared definition of an item kind.
///
/// Every field has a neutral default so content files only spell out what
/// differs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ItemType {
    pub id: ItemTypeId,
    pub name: String,
    pub category: ItemCategory,
    /// Volume in millilitres (per `stack_size` charges when counted by charges).
    pub volume: u32,
    /// Weight in grams (per charge when counted by charges).
    pub weight: u32,
    pub materials: Vec<MaterialId>,
    pub flags: BTreeSet<String>,
    pub qualities: BTreeMap<QualityId, i32>,
    /// Charge capacity; zero for items that hold no charges.
    pub max_charges: i64,
    /// Charges consumed by one activation.
    pub charges_to_use: u32,
    pub count_by_charges: bool,
    pub stack_size: u32,
    /// Countdown applied when the item becomes active.
    pub countdown_interval: u32,
    /// Set when this item *is* ammunition of that family.
    pub ammo: Option<AmmoTypeId>,
    /// Set when this item is loaded with / consumes that ammunition family.
    pub uses_ammo: Option<AmmoTypeId>,
    /// Skill used to wield this item as a weapon.
    pub gun_skill: Option<SkillId>,
    /// Type an active item reverts to when switched off.
    pub revert_to: Option<ItemTypeId>,
}

impl ItemType {
    pub fn new(id: impl Into<ItemTypeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: ItemCategory::Generic,
            volume: 0,
            weight: 0,
            materials: Vec::new(),
            flags: BTreeSet::new(),
            qualities: BTreeMap::new(),
            max_charges: 0,
            charges_to_use: 1,
            count_by_charges: false,
            stack_size: 1,
            countdown_interval: 0,
            ammo: None,
            uses_ammo: None,
            gun_skill: None,
            revert_to: None,
        }
    }

    pub fn is_tool(&self) -> bool {
        self.category == ItemCategory::Tool
    }

    /// True when the type tracks charges at all.
    pub fn has_charges(&self) -> bool {
        self.max_charges > 0 || self.count_by_charges
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    pub fn quality(&self, quality: &QualityId) -> i32 {
        self.qualities.get(quality).copied().unwrap_or(0)
    }

    pub fn made_of_any(&self, materials: &BTreeSet<MaterialId>) -> bool {
        self.materials.iter().any(|m| materials.contains(m))
    }
}

impl Default for ItemType {
    fn default() -> Self {
        Self::new("", "")
    }
}

/// Material definition.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MaterialType {
    pub id: MaterialId,
    pub name: String,
    /// Component consumed when repairing items of this material.
    pub repaired_with: Option<ItemTypeId>,
    /// Item yielded when salvaging items of this material.
    pub salvaged_into: Option<ItemTypeId>,
}

impl MaterialType {
    pub fn new(id: impl Into<MaterialId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            repaired_with: None,
            salvaged_into: None,
        }
    }

    pub fn repaired_with(mut self, item: impl Into<ItemTypeId>) -> Self {
        self.repaired_with = Some(item.into());
        self
    }

    pub fn salvaged_into(mut self, item: impl Into<ItemTypeId>) -> Self {
        self.salvaged_into = Some(item.into());
        self
    }
}
