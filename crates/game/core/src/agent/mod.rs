//! Contracts for the character performing an activation.
//!
//! Actors never see a concrete creature type. They query and mutate the
//! acting character through four narrow traits, combined into [`Agent`]:
//!
//! - [`Character`]: identity, position, moves, skills and stats
//! - [`Body`]: hit points, status effects, pain and morale
//! - [`Inventory`]: carried items, charges and tool qualities
//! - [`Prompt`]: messages, questions and activity assignment
mod activity;

pub use activity::{Activity, HealTask};

use crate::state::{
    BodyPart, CharacterId, EffectData, EffectId, HitPoints, Item, ItemId, ItemTypeId, Position,
    QualityId, RecipeId, SkillId, VitaminId,
};

/// Pseudo item type standing for "any fire source" in charge queries.
pub const FIRE_SOURCE: &str = "fire";

/// Pseudo item type standing for a universal power supply.
pub const UPS: &str = "UPS";

/// Primary and derived stats an actor may read or adjust.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Stat {
    #[strum(serialize = "str", serialize = "strength")]
    Strength,
    #[strum(serialize = "dex", serialize = "dexterity")]
    Dexterity,
    #[strum(serialize = "int", serialize = "intelligence")]
    Intelligence,
    #[strum(serialize = "per", serialize = "perception")]
    Perception,
    Speed,
}

/// Tone of a message shown to the acting character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum MessageKind {
    Info,
    Good,
    Bad,
    Warning,
    Neutral,
}

/// Identity, position, action budget, skills and stats.
pub trait Character {
    fn id(&self) -> CharacterId;
    fn name(&self) -> &str;
    fn is_npc(&self) -> bool;
    fn position(&self) -> Position;

    fn moves(&self) -> i32;
    fn set_moves(&mut self, moves: i32);
    fn mod_moves(&mut self, delta: i32) {
        let moves = self.moves();
        self.set_moves(moves + delta);
    }

    fn is_underwater(&self) -> bool;

    fn skill_level(&self, skill: &SkillId) -> i32;
    /// Grants `amount` experience in `skill`, never raising it past `cap`.
    fn practice(&mut self, skill: &SkillId, amount: i32, cap: i32);

    fn stat(&self, stat: Stat) -> i32;
    fn mod_stat(&mut self, stat: Stat, delta: i32);

    fn has_trait(&self, name: &str) -> bool;

    /// Hands a multi-turn activity to whoever drives this character.
    fn assign_activity(&mut self, activity: Activity);
    fn take_activity(&mut self) -> Option<Activity>;
}

/// Hit points, status effects, pain, morale and nutrition.
pub trait Body {
    fn hp(&self, bp: BodyPart) -> HitPoints;
    /// Restores up to `amount` hit points; returns the amount restored.
    fn heal(&mut self, bp: BodyPart, amount: i32) -> i32;
    /// Removes up to `amount` hit points; returns the amount removed.
    fn apply_damage(&mut self, bp: BodyPart, amount: i32) -> i32;

    fn has_effect(&self, id: &EffectId, bp: Option<BodyPart>) -> bool;
    /// True when the effect is present on any body part.
    fn has_effect_anywhere(&self, id: &EffectId) -> bool;
    fn effect_duration(&self, id: &EffectId, bp: Option<BodyPart>) -> u32;
    fn add_effect(&mut self, effect: &EffectData);
    fn remove_effect(&mut self, id: &EffectId, bp: Option<BodyPart>) -> bool;

    fn mod_pain(&mut self, amount: i32);
    fn morale_level(&self) -> i32;
    fn add_morale(&mut self, kind: &str, bonus: i32, max_bonus: i32, duration: u32);
    fn vitamin_mod(&mut self, vitamin: &VitaminId, amount: i32);
}

/// Carried, worn and wielded items.
pub trait Inventory {
    fn item_ids(&self) -> Vec<ItemId>;
    fn item(&self, id: ItemId) -> Option<&Item>;
    fn item_mut(&mut self, id: ItemId) -> Option<&mut Item>;
    fn take_item(&mut self, id: ItemId) -> Option<Item>;
    /// Lifts an item out for the duration of one use, so inventory scans no
    /// longer see it. The worn or wielded slot is kept; [`reattach_item`]
    /// puts the item back and [`take_item`] discards it for good.
    ///
    /// [`reattach_item`]: Inventory::reattach_item
    /// [`take_item`]: Inventory::take_item
    fn detach_item(&mut self, id: ItemId) -> Option<Item>;
    /// Puts `item` back under `id`, replacing whatever is stored there.
    fn reattach_item(&mut self, id: ItemId, item: Item);
    /// Stores an item (or drops it at the character's feet if it cannot be carried).
    fn add_item(&mut self, item: Item) -> ItemId;

    fn is_worn(&self, id: ItemId) -> bool;
    fn wielded(&self) -> Option<ItemId>;
    fn wield(&mut self, id: ItemId) -> bool;

    /// Number of whole items of type `id`.
    fn amount_of(&self, id: &ItemTypeId) -> i64;
    fn has_amount(&self, id: &ItemTypeId, quantity: i64) -> bool {
        self.amount_of(id) >= quantity
    }
    /// Total charges of type `id`, pseudo sources such as [`FIRE_SOURCE`] included.
    fn charges_of(&self, id: &ItemTypeId) -> i64;
    fn has_charges(&self, id: &ItemTypeId, quantity: i64) -> bool {
        self.charges_of(id) >= quantity
    }
    /// Removes up to `quantity` whole items; returns how many were removed.
    fn use_amount(&mut self, id: &ItemTypeId, quantity: i64) -> i64;
    /// Consumes up to `quantity` charges; returns how many were consumed.
    fn use_charges(&mut self, id: &ItemTypeId, quantity: i64) -> i64;
    /// Consumes exactly `quantity` charges if available, otherwise nothing.
    fn use_charges_if_avail(&mut self, id: &ItemTypeId, quantity: i64) -> bool {
        if !self.has_charges(id, quantity) {
            return false;
        }
        self.use_charges(id, quantity);
        true
    }

    /// Best level of `quality` among carried tools.
    fn max_quality(&self, quality: &QualityId) -> i32;
    fn knows_recipe(&self, recipe: &RecipeId) -> bool;
}

/// User interaction: messages, questions, choices.
///
/// NPC implementations answer without asking anyone.
pub trait Prompt {
    fn add_msg(&mut self, kind: MessageKind, text: &str);
    fn query_yn(&mut self, question: &str) -> bool;
    /// Picks a tile adjacent to (or under) the character.
    fn choose_direction(&mut self, prompt: &str) -> Option<Position>;
    fn choose_item(&mut self, prompt: &str, candidates: &[ItemId]) -> Option<ItemId>;
    fn choose_option(&mut self, prompt: &str, options: &[String]) -> Option<usize>;
    fn choose_body_part(&mut self, prompt: &str) -> Option<BodyPart>;
    fn input_text(&mut self, prompt: &str, initial: &str) -> Option<String>;
}

/// Everything an actor needs from the acting character.
pub trait Agent: Character + Body + Inventory + Prompt {}

impl<T: Character + Body + Inventory + Prompt + ?Sized> Agent for T {}
