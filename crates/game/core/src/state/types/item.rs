//! Item instances.
//!
//! An [`Item`] carries only per-instance state (charges, damage, age, flags);
//! everything shared by its kind lives in [`ItemType`] and is looked up
//! through the item oracle.

use std::collections::{BTreeMap, BTreeSet};

use super::{ItemId, ItemTypeId, MonsterTypeId, Tick};
use crate::config::SessionConfig;
use crate::env::ItemType;

/// A single item instance.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub type_id: ItemTypeId,
    /// Charges (ammo, fuel, uses) remaining, or the stack size for items
    /// counted by charges.
    pub charges: i64,
    /// Ammunition currently loaded, when the item holds charges of a
    /// specific ammo item.
    pub ammo_current: Option<ItemTypeId>,
    /// Damage level, from [`SessionConfig::MIN_DAMAGE`] (reinforced) up to
    /// [`SessionConfig::MAX_DAMAGE`]; anything above destroys the item.
    pub damage: i32,
    pub birthday: Tick,
    pub active: bool,
    /// Countdown in turns for active items.
    pub item_counter: u32,
    /// Per-instance flags (`FIT`, ...), added on top of the type's flags.
    pub flags: BTreeSet<String>,
    pub vars: BTreeMap<String, String>,
    pub contents: Vec<Item>,
    /// Monster type for corpse items.
    pub corpse: Option<MonsterTypeId>,
}

impl Item {
    pub fn new(type_id: impl Into<ItemTypeId>, birthday: Tick) -> Self {
        Self {
            type_id: type_id.into(),
            charges: 0,
            ammo_current: None,
            damage: 0,
            birthday,
            active: false,
            item_counter: 0,
            flags: BTreeSet::new(),
            vars: BTreeMap::new(),
            contents: Vec::new(),
            corpse: None,
        }
    }

    /// Corpse of the given monster type.
    pub fn corpse_of(monster: impl Into<MonsterTypeId>, birthday: Tick) -> Self {
        Self {
            corpse: Some(monster.into()),
            ..Self::new("corpse", birthday)
        }
    }

    pub fn with_charges(mut self, charges: i64) -> Self {
        self.charges = charges;
        self
    }

    pub fn with_damage(mut self, damage: i32) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.insert(flag.into());
        self
    }

    /// Changes the item's type in place, keeping charges, age and damage.
    pub fn convert(&mut self, type_id: ItemTypeId) {
        self.type_id = type_id;
    }

    /// True when either the instance or its type carries `flag`.
    pub fn has_flag(&self, flag: &str, ty: &ItemType) -> bool {
        self.flags.contains(flag) || ty.flags.contains(flag)
    }

    pub fn set_flag(&mut self, flag: impl Into<String>) {
        self.flags.insert(flag.into());
    }

    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn set_var(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn erase_var(&mut self, key: &str) -> bool {
        self.vars.remove(key).is_some()
    }

    /// Shifts damage by `delta`, never below the reinforced floor.
    /// Returns true when the item is now destroyed.
    pub fn mod_damage(&mut self, delta: i32) -> bool {
        self.damage = (self.damage + delta).max(SessionConfig::MIN_DAMAGE);
        self.is_destroyed()
    }

    pub fn is_destroyed(&self) -> bool {
        self.damage > SessionConfig::MAX_DAMAGE
    }

    /// Turns elapsed since the item was created.
    pub fn age(&self, now: Tick) -> i64 {
        now.since(self.birthday)
    }

    /// Volume in millilitres.
    pub fn volume(&self, ty: &ItemType) -> u32 {
        if ty.count_by_charges {
            let stack = u64::from(ty.stack_size.max(1));
            let charges = self.charges.max(0).unsigned_abs();
            let volume = u64::from(ty.volume).saturating_mul(charges).div_ceil(stack);
            u32::try_from(volume).unwrap_or(u32::MAX)
        } else {
            ty.volume
        }
    }

    /// Weight in grams.
    pub fn weight(&self, ty: &ItemType) -> u32 {
        if ty.count_by_charges {
            let charges = u32::try_from(self.charges.max(0)).unwrap_or(u32::MAX);
            ty.weight.saturating_mul(charges)
        } else {
            ty.weight
        }
    }
}

/// Where the activated item sits relative to the agent.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ItemLocation {
    Wielded,
    Worn,
    #[default]
    Carried,
    Ground,
}

/// Location of the activated item plus its inventory id, when it has one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ItemSource {
    pub location: ItemLocation,
    pub id: Option<ItemId>,
}

impl ItemSource {
    pub fn carried(id: ItemId) -> Self {
        Self {
            location: ItemLocation::Carried,
            id: Some(id),
        }
    }

    pub fn at(location: ItemLocation, id: ItemId) -> Self {
        Self {
            location,
            id: Some(id),
        }
    }
}
