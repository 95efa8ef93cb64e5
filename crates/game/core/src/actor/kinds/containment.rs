//! Worn containers: holsters and sheaths, bandoliers and quivers, and
//! linked ammunition belts.
//!
//! Capacity predicates (`can_holster`, `can_store`) are pure. The mutating
//! operations re-check capacity and leave everything untouched on refusal.

use std::collections::BTreeSet;

use crate::actor::{
    ConfigError, ConfigRecord, ItemInfo, ItemUseActor, UseContext, UseError, UseResult,
};
use crate::agent::MessageKind;
use crate::config::SessionConfig;
use crate::env::{ActorEnv, ItemType};
use crate::state::{AmmoTypeId, Item, ItemId, ItemLocation, ItemTypeId, Position, SkillId};

use super::known_item;

/// Default moves to store or draw one volume unit.
const VOLUME_MOVE_COST: i32 = 25;
/// Moves to link one round into a belt.
const LINK_MOVES: i32 = 10;

/// Moves to put an object of `volume_ml` into a container.
fn store_cost(draw_cost: i32, volume_ml: u32) -> i32 {
    draw_cost * (SessionConfig::volume_units(volume_ml) as i32).max(1)
}

fn refuse_if_wielded<T>(ctx: &mut UseContext<'_>, container: &Item) -> Option<Result<T, UseError>> {
    if ctx.source.location != ItemLocation::Wielded {
        return None;
    }
    let text = format!(
        "You need to unwield your {} before using it.",
        ctx.item_name(container)
    );
    Some(ctx.precondition(text))
}

/// Why an object does not fit a holster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HolsterMisfit {
    Active,
    TooBig,
    TooSmall,
    TooHeavy,
    WrongKind,
}

/// Holds a limited number of weapons or tools for quick drawing.
#[derive(Clone, Debug)]
pub struct HolsterActor {
    /// Item selection prompt; defaults to "Holster item".
    pub holster_prompt: String,
    /// Message on storing; `{item}` and `{holster}` are substituted.
    pub holster_msg: String,
    /// Largest object accepted, in millilitres.
    pub max_volume: u32,
    /// Smallest object accepted, in millilitres.
    pub min_volume: u32,
    /// Heaviest object accepted in grams; non-positive means no limit.
    pub max_weight: i64,
    /// Objects held at once.
    pub multi: usize,
    pub draw_cost: i32,
    /// Guns using one of these skills fit.
    pub skills: Vec<SkillId>,
    /// Objects with one of these flags fit.
    pub flags: Vec<String>,
}

impl Default for HolsterActor {
    fn default() -> Self {
        Self {
            holster_prompt: String::new(),
            holster_msg: String::new(),
            max_volume: 0,
            min_volume: 0,
            max_weight: -1,
            multi: 1,
            draw_cost: VOLUME_MOVE_COST,
            skills: Vec::new(),
            flags: Vec::new(),
        }
    }
}

impl HolsterActor {
    pub fn misfit(&self, ty: &ItemType, obj: &Item) -> Option<HolsterMisfit> {
        let volume = obj.volume(ty);
        if obj.active {
            return Some(HolsterMisfit::Active);
        }
        if volume > self.max_volume {
            return Some(HolsterMisfit::TooBig);
        }
        if volume < self.min_volume {
            return Some(HolsterMisfit::TooSmall);
        }
        if self.max_weight > 0 && i64::from(obj.weight(ty)) > self.max_weight {
            return Some(HolsterMisfit::TooHeavy);
        }
        let flagged = self.flags.iter().any(|flag| obj.has_flag(flag, ty));
        let skilled = ty
            .gun_skill
            .as_ref()
            .is_some_and(|skill| self.skills.contains(skill));
        if !flagged && !skilled {
            return Some(HolsterMisfit::WrongKind);
        }
        None
    }

    /// Whether `obj` could go in this holster, ignoring how full it is.
    pub fn can_holster(&self, env: ActorEnv<'_>, obj: &Item) -> bool {
        env.item_type(&obj.type_id)
            .is_ok_and(|ty| self.misfit(ty, obj).is_none())
    }

    /// Whether `obj` could go in `holster` as it is now, counting the slots
    /// already taken.
    pub fn can_holster_into(&self, env: ActorEnv<'_>, holster: &Item, obj: &Item) -> bool {
        holster.contents.len() < self.multi && self.can_holster(env, obj)
    }

    /// Moves the carried `obj` into `holster`.
    pub fn store(
        &self,
        ctx: &mut UseContext<'_>,
        holster: &mut Item,
        obj: ItemId,
    ) -> Result<(), UseError> {
        let holster_name = ctx.item_name(holster);
        if holster.contents.len() >= self.multi {
            return ctx.precondition(format!("Your {holster_name} is already full."));
        }
        let Some(object) = ctx.agent.item(obj) else {
            return ctx.precondition("You do not have that item.");
        };
        let ty = ctx.env.item_type(&object.type_id)?;
        let name = ctx.item_name(object);
        if let Some(misfit) = self.misfit(ty, object) {
            let text = match misfit {
                HolsterMisfit::Active => format!(
                    "You don't think putting your {name} in your {holster_name} is a good idea."
                ),
                HolsterMisfit::TooBig => {
                    format!("Your {name} is too big to fit in your {holster_name}.")
                }
                HolsterMisfit::TooSmall => {
                    format!("Your {name} is too small to fit in your {holster_name}.")
                }
                HolsterMisfit::TooHeavy => {
                    format!("Your {name} is too heavy to fit in your {holster_name}.")
                }
                HolsterMisfit::WrongKind => {
                    format!("You can't put your {name} in your {holster_name}.")
                }
            };
            return ctx.precondition(text);
        }
        let cost = store_cost(self.draw_cost, object.volume(ty));

        let Some(object) = ctx.agent.take_item(obj) else {
            return Err(UseError::unknown("item", obj.0));
        };
        let text = if self.holster_msg.is_empty() {
            format!("You holster your {name}.")
        } else {
            self.holster_msg
                .replace("{item}", &name)
                .replace("{holster}", &holster_name)
        };
        ctx.msg(MessageKind::Neutral, &text);
        ctx.agent.mod_moves(-cost);
        holster.contents.push(object);
        Ok(())
    }

    /// Takes the `index`th object out of `holster` and wields it.
    pub fn draw(
        &self,
        ctx: &mut UseContext<'_>,
        holster: &mut Item,
        index: usize,
    ) -> Result<ItemId, UseError> {
        if index >= holster.contents.len() {
            let text = format!("Your {} is empty.", ctx.item_name(holster));
            return ctx.precondition(text);
        }
        let object = holster.contents.remove(index);
        let name = ctx.item_name(&object);
        let id = ctx.agent.add_item(object);
        ctx.agent.wield(id);
        ctx.agent.mod_moves(-self.draw_cost);
        ctx.msg(MessageKind::Neutral, &format!("You draw your {name}."));
        Ok(id)
    }
}

impl ItemUseActor for HolsterActor {
    fn type_tag(&self) -> &'static str {
        "holster"
    }

    fn load(&mut self, record: &ConfigRecord) -> Result<(), ConfigError> {
        self.holster_prompt = record.get_string("holster_prompt", "")?;
        self.holster_msg = record.get_string("holster_msg", "")?;
        self.max_volume = record.require_i32("max_volume")?.max(0) as u32;
        self.min_volume = record.get_u32("min_volume", self.max_volume / 3)?;
        self.max_weight = record.get_int("max_weight", -1)?;
        self.multi = record.get_u32("multi", 1)? as usize;
        self.draw_cost = record.get_i32("draw_cost", VOLUME_MOVE_COST)?;
        self.skills = record.get_string_list("skills")?.into_iter().map(SkillId::new).collect();
        self.flags = record.get_string_list("flags")?;
        if self.min_volume > self.max_volume {
            return Err(ConfigError::invalid("min_volume", "at most `max_volume`"));
        }
        Ok(())
    }

    fn finalize(&mut self, _item_type: &ItemTypeId, env: ActorEnv<'_>) -> Result<(), ConfigError> {
        let tables = env.tables()?;
        match self.skills.iter().find(|s| tables.skill(s).is_none()) {
            Some(missing) => Err(ConfigError::unknown("skills", "skill", missing)),
            None => Ok(()),
        }
    }

    fn use_item(
        &self,
        ctx: &mut UseContext<'_>,
        item: &mut Item,
        _auto: bool,
        _pos: Position,
    ) -> UseResult {
        if let Some(refusal) = refuse_if_wielded(ctx, item) {
            return refusal;
        }
        let prompt = if self.holster_prompt.is_empty() {
            "Holster item".to_owned()
        } else {
            self.holster_prompt.clone()
        };

        let has_room = item.contents.len() < self.multi;
        let mut options = Vec::new();
        if has_room {
            options.push(prompt.clone());
        }
        options.extend(
            item.contents
                .iter()
                .map(|content| format!("Draw {}", ctx.item_name(content))),
        );

        let choice = match options.len() {
            0 => return ctx.precondition(format!("Your {} holds nothing.", ctx.item_name(item))),
            1 => 0,
            _ => {
                let title = format!("Use {}", ctx.item_name(item));
                let Some(choice) = ctx.agent.choose_option(&title, &options) else {
                    ctx.msg(MessageKind::Neutral, "Never mind.");
                    return Err(UseError::Cancelled);
                };
                choice
            }
        };

        if has_room && choice == 0 {
            let candidates: Vec<ItemId> = ctx
                .agent
                .item_ids()
                .into_iter()
                .filter(|id| Some(*id) != ctx.source.id)
                .filter(|id| {
                    ctx.agent
                        .item(*id)
                        .is_some_and(|obj| self.can_holster_into(ctx.env, item, obj))
                })
                .collect();
            if candidates.is_empty() {
                let text = format!("You have nothing that fits in your {}.", ctx.item_name(item));
                return ctx.precondition(text);
            }
            let Some(obj) = ctx.agent.choose_item(&prompt, &candidates) else {
                ctx.msg(MessageKind::Neutral, "Never mind.");
                return Err(UseError::Cancelled);
            };
            self.store(ctx, item, obj)?;
        } else {
            let index = if has_room { choice - 1 } else { choice };
            self.draw(ctx, item, index)?;
        }
        Ok(0)
    }

    fn clone_actor(&self) -> Box<dyn ItemUseActor> {
        Box::new(self.clone())
    }

    fn info(&self, _item: &Item, _env: ActorEnv<'_>) -> Vec<ItemInfo> {
        let mut lines = vec![
            ItemInfo::new(
                "Holds",
                format!("{} item(s) of {} to {} ml", self.multi, self.min_volume, self.max_volume),
            ),
        ];
        if self.max_weight > 0 {
            lines.push(ItemInfo::new("Weight limit", format!("{} g", self.max_weight)));
        }
        lines
    }

    fn name(&self) -> String {
        if self.holster_prompt.is_empty() {
            "Holster".to_owned()
        } else {
            self.holster_prompt.clone()
        }
    }
}

/// Stores a stack of one kind of ammunition.
#[derive(Clone, Debug)]
pub struct BandolierActor {
    /// Rounds held.
    pub capacity: i64,
    /// Ammunition families accepted.
    pub ammo: BTreeSet<AmmoTypeId>,
    pub draw_cost: i32,
}

impl Default for BandolierActor {
    fn default() -> Self {
        Self {
            capacity: 1,
            ammo: BTreeSet::new(),
            draw_cost: VOLUME_MOVE_COST,
        }
    }
}

impl BandolierActor {
    /// Whether `obj` could be added to what `bandolier` already holds.
    pub fn can_store(&self, env: ActorEnv<'_>, bandolier: &Item, obj: &Item) -> bool {
        if let Some(held) = bandolier.contents.first()
            && (held.type_id != obj.type_id || held.charges >= self.capacity)
        {
            return false;
        }
        env.item_type(&obj.type_id)
            .is_ok_and(|ty| ty.ammo.as_ref().is_some_and(|ammo| self.ammo.contains(ammo)))
    }

    /// Fills `bandolier` from a chosen stack of carried ammunition.
    pub fn reload(&self, ctx: &mut UseContext<'_>, bandolier: &mut Item) -> Result<(), UseError> {
        let bandolier_name = ctx.item_name(bandolier);
        let candidates: Vec<ItemId> = ctx
            .agent
            .item_ids()
            .into_iter()
            .filter(|id| Some(*id) != ctx.source.id)
            .filter(|id| {
                ctx.agent
                    .item(*id)
                    .is_some_and(|obj| obj.charges > 0 && self.can_store(ctx.env, bandolier, obj))
            })
            .collect();
        if candidates.is_empty() {
            return ctx.insufficient(format!("No matching ammo for the {bandolier_name}."));
        }
        let Some(source) = ctx.agent.choose_item("Store which ammo?", &candidates) else {
            return ctx.refuse(UseError::Cancelled);
        };
        let Some(ammo) = ctx.agent.item(source).cloned() else {
            return Err(UseError::unknown("item", source.0));
        };

        let held = bandolier.contents.first().map_or(0, |held| held.charges);
        let qty = (self.capacity - held).min(ammo.charges);
        if qty <= 0 {
            return ctx.precondition(format!("Your {bandolier_name} is full."));
        }
        let ty = ctx.env.item_type(&ammo.type_id)?;
        let stored = ammo.clone().with_charges(qty);
        let cost = store_cost(self.draw_cost, stored.volume(ty));

        if ammo.charges > qty {
            if let Some(stack) = ctx.agent.item_mut(source) {
                stack.charges -= qty;
            }
        } else {
            ctx.agent.take_item(source);
        }
        match bandolier.contents.first_mut() {
            Some(held) => held.charges += qty,
            None => bandolier.contents.push(stored),
        }
        ctx.agent.mod_moves(-cost);
        let text = format!(
            "You store the {} in your {bandolier_name}.",
            ctx.item_name(&ammo)
        );
        ctx.msg(MessageKind::Neutral, &text);
        Ok(())
    }

    /// Returns everything in `bandolier` to the agent's inventory.
    pub fn unload(&self, ctx: &mut UseContext<'_>, bandolier: &mut Item) -> Result<(), UseError> {
        if bandolier.contents.is_empty() {
            let text = format!("Your {} is empty.", ctx.item_name(bandolier));
            return ctx.precondition(text);
        }
        for content in bandolier.contents.drain(..) {
            ctx.agent.add_item(content);
        }
        ctx.agent.mod_moves(-self.draw_cost);
        let text = format!("You unload your {}.", ctx.item_name(bandolier));
        ctx.msg(MessageKind::Neutral, &text);
        Ok(())
    }
}

impl ItemUseActor for BandolierActor {
    fn type_tag(&self) -> &'static str {
        "bandolier"
    }

    fn load(&mut self, record: &ConfigRecord) -> Result<(), ConfigError> {
        self.capacity = record.get_int("capacity", 1)?;
        if self.capacity < 1 {
            return Err(ConfigError::invalid("capacity", "a positive integer"));
        }
        self.ammo = record.get_string_set("ammo")?;
        self.draw_cost = record.get_i32("draw_cost", VOLUME_MOVE_COST)?;
        Ok(())
    }

    fn use_item(
        &self,
        ctx: &mut UseContext<'_>,
        item: &mut Item,
        _auto: bool,
        _pos: Position,
    ) -> UseResult {
        if let Some(refusal) = refuse_if_wielded(ctx, item) {
            return refusal;
        }
        let name = ctx.item_name(item);
        let options = [format!("Store ammo in {name}"), format!("Unload {name}")];
        match ctx.agent.choose_option("Store ammo", &options) {
            Some(0) => self.reload(ctx, item)?,
            Some(_) => self.unload(ctx, item)?,
            None => return ctx.refuse(UseError::Cancelled),
        }
        Ok(0)
    }

    fn can_use(&self, ctx: &UseContext<'_>, _item: &Item, _auto: bool, _pos: Position) -> bool {
        ctx.source.location != ItemLocation::Wielded
    }

    fn clone_actor(&self) -> Box<dyn ItemUseActor> {
        Box::new(self.clone())
    }

    fn info(&self, _item: &Item, _env: ActorEnv<'_>) -> Vec<ItemInfo> {
        let ammo: Vec<&str> = self.ammo.iter().map(AmmoTypeId::as_str).collect();
        vec![ItemInfo::new(
            "Stores",
            format!("up to {} rounds of {}", self.capacity, ammo.join(", ")),
        )]
    }

    fn name(&self) -> String {
        "Store ammo".to_owned()
    }
}

/// Links loose rounds into a fresh ammunition belt.
#[derive(Clone, Debug, Default)]
pub struct AmmobeltActor {
    pub belt: ItemTypeId,
}

impl ItemUseActor for AmmobeltActor {
    fn type_tag(&self) -> &'static str {
        "ammobelt"
    }

    fn load(&mut self, record: &ConfigRecord) -> Result<(), ConfigError> {
        self.belt = ItemTypeId::new(record.require_str("belt")?);
        Ok(())
    }

    fn finalize(&mut self, _item_type: &ItemTypeId, env: ActorEnv<'_>) -> Result<(), ConfigError> {
        known_item(env, "belt", &self.belt)?;
        let belt = env.item_type(&self.belt)?;
        if belt.uses_ammo.is_none() || belt.max_charges <= 0 {
            return Err(ConfigError::invalid("belt", "an item that holds ammunition"));
        }
        Ok(())
    }

    fn use_item(
        &self,
        ctx: &mut UseContext<'_>,
        _item: &mut Item,
        _auto: bool,
        _pos: Position,
    ) -> UseResult {
        let belt = ctx.env.item_type(&self.belt)?;
        let Some(family) = belt.uses_ammo.as_ref() else {
            return Err(UseError::unknown("ammunition family of", &self.belt));
        };
        let candidates: Vec<ItemId> = ctx
            .agent
            .item_ids()
            .into_iter()
            .filter(|id| {
                ctx.agent.item(*id).is_some_and(|obj| {
                    obj.charges > 0
                        && ctx
                            .env
                            .item_type(&obj.type_id)
                            .is_ok_and(|ty| ty.ammo.as_ref() == Some(family))
                })
            })
            .collect();
        if candidates.is_empty() {
            let text = format!("Insufficient ammunition to assemble {}.", belt.name);
            return ctx.insufficient(text);
        }
        let Some(source) = ctx.agent.choose_item("Link which ammo?", &candidates) else {
            return ctx.refuse(UseError::Cancelled);
        };
        let Some(ammo) = ctx.agent.item(source).cloned() else {
            return Err(UseError::unknown("item", source.0));
        };

        let qty = belt.max_charges.min(ammo.charges);
        if ammo.charges > qty {
            if let Some(stack) = ctx.agent.item_mut(source) {
                stack.charges -= qty;
            }
        } else {
            ctx.agent.take_item(source);
        }
        let mut linked = Item::new(self.belt.clone(), ctx.turn).with_charges(qty);
        linked.ammo_current = Some(ammo.type_id.clone());
        ctx.agent.add_item(linked);
        ctx.agent.mod_moves(-LINK_MOVES * qty as i32);
        ctx.msg(
            MessageKind::Good,
            &format!("You link {qty} rounds into a {}.", belt.name),
        );
        Ok(0)
    }

    fn clone_actor(&self) -> Box<dyn ItemUseActor> {
        Box::new(self.clone())
    }

    fn name(&self) -> String {
        "Make ammo belt".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::kinds::testing::{Harness, actor};
    use crate::agent::Inventory;
    use crate::state::{ItemSource, Tick};

    fn pistol_holster(max_volume: i32, min_volume: u32) -> HolsterActor {
        let mut holster = HolsterActor::default();
        holster
            .load(
                &ConfigRecord::new("holster")
                    .with("max_volume", max_volume)
                    .with("min_volume", min_volume as i64)
                    .with("skills", vec!["pistol"]),
            )
            .unwrap();
        holster
    }

    fn glock() -> Item {
        Item::new("glock_19", Tick::ZERO)
    }

    #[test]
    fn volume_bounds_are_inclusive() {
        let h = Harness::new();
        let env = h.content.env();
        assert!(pistol_holster(500, 100).can_holster(env, &glock()));
        assert!(!pistol_holster(499, 100).can_holster(env, &glock()));
        assert!(pistol_holster(1000, 500).can_holster(env, &glock()));
        assert!(!pistol_holster(1000, 501).can_holster(env, &glock()));
    }

    #[test]
    fn full_holsters_take_nothing_more() {
        let h = Harness::new();
        let env = h.content.env();
        let holster = pistol_holster(500, 100);
        let mut rig = Item::new("holster", Tick::ZERO);
        assert!(holster.can_holster_into(env, &rig, &glock()));

        rig.contents.push(glock());
        assert!(!holster.can_holster_into(env, &rig, &glock()));
        assert!(holster.can_holster(env, &glock()));
    }

    #[test]
    fn only_matching_kinds_fit() {
        let h = Harness::new();
        let env = h.content.env();
        let holster = pistol_holster(3000, 0);
        assert!(!holster.can_holster(env, &Item::new("ar15", Tick::ZERO)));
        assert!(!holster.can_holster(env, &Item::new("knife_combat", Tick::ZERO)));

        let mut lit = glock();
        lit.active = true;
        assert!(!holster.can_holster(env, &lit));

        let sheath = actor(
            "sheath",
            ConfigRecord::new("holster")
                .with("max_volume", 500)
                .with("flags", vec!["SHEATH_KNIFE"]),
        );
        let mut h = Harness::new();
        let mut sheath_item = Item::new("sheath", Tick::ZERO);
        h.carry(sheath_item.clone());
        let knife = h.you.add_item(Item::new("knife_combat", Tick::ZERO));
        h.you.script_item(knife);
        assert_eq!(h.run(sheath.as_ref(), &mut sheath_item), Ok(0));
        assert_eq!(sheath_item.contents.len(), 1);
    }

    #[test]
    fn weight_limit_applies_when_set() {
        let mut holster = pistol_holster(500, 0);
        holster.max_weight = 500;
        let mut h = Harness::new();
        let gun = h.you.add_item(glock());
        let mut rig = Item::new("holster", Tick::ZERO);

        let stored = h.with_ctx(|ctx| holster.store(ctx, &mut rig, gun));
        assert!(matches!(stored, Err(UseError::Precondition(_))));
        assert!(h.you.said("too heavy"));
        assert!(rig.contents.is_empty());
        assert!(h.you.item(gun).is_some());
        assert_eq!(h.you.moves, 100);
    }

    #[test]
    fn holstering_and_drawing() {
        let holster = actor(
            "holster",
            ConfigRecord::new("holster")
                .with("max_volume", 500)
                .with("skills", vec!["pistol"]),
        );
        let mut h = Harness::new();
        let mut rig = Item::new("holster", Tick::ZERO);
        h.carry(rig.clone());
        let gun = h.you.add_item(glock());
        h.you.script_item(gun);

        assert_eq!(h.run(holster.as_ref(), &mut rig), Ok(0));
        assert_eq!(rig.contents, vec![glock()]);
        assert!(h.you.item(gun).is_none());
        assert_eq!(h.you.moves, 100 - 25 * 2);
        assert!(h.you.said("You holster your Glock 19."));

        assert_eq!(h.run(holster.as_ref(), &mut rig), Ok(0));
        assert!(rig.contents.is_empty());
        let drawn = h.you.wielded().unwrap();
        assert_eq!(h.you.item(drawn).map(|i| i.type_id.as_str()), Some("glock_19"));
        assert_eq!(h.you.moves, 50 - 25);
    }

    #[test]
    fn roomy_holsters_offer_a_menu() {
        let holster = actor(
            "holster",
            ConfigRecord::new("holster")
                .with("max_volume", 500)
                .with("multi", 2)
                .with("skills", vec!["pistol"]),
        );
        let mut h = Harness::new();
        let mut rig = Item::new("holster", Tick::ZERO);
        rig.contents.push(glock());
        h.you.script_option(1);

        assert_eq!(h.run(holster.as_ref(), &mut rig), Ok(0));
        assert!(rig.contents.is_empty());
        assert!(h.you.wielded().is_some());

        rig.contents.push(glock());
        assert_eq!(h.run(holster.as_ref(), &mut rig), Err(UseError::Cancelled));
        assert!(h.you.said("Never mind."));
    }

    #[test]
    fn wielded_containers_refuse() {
        let holster = actor(
            "holster",
            ConfigRecord::new("holster").with("max_volume", 500),
        );
        let mut h = Harness::new();
        let mut rig = Item::new("holster", Tick::ZERO);
        let id = h.you.add_item(rig.clone());
        h.source = ItemSource::at(ItemLocation::Wielded, id);
        assert!(matches!(
            h.run(holster.as_ref(), &mut rig),
            Err(UseError::Precondition(_))
        ));
        assert!(h.you.said("unwield"));
    }

    fn quiver() -> BandolierActor {
        let mut quiver = BandolierActor::default();
        quiver
            .load(
                &ConfigRecord::new("bandolier")
                    .with("capacity", 20)
                    .with("ammo", vec!["arrow"]),
            )
            .unwrap();
        quiver
    }

    #[test]
    fn bandolier_keeps_one_kind() {
        let h = Harness::new();
        let env = h.content.env();
        let quiver = quiver();
        let arrows = Item::new("arrow_wood", Tick::ZERO).with_charges(5);
        let bolts = Item::new("bolt_steel", Tick::ZERO).with_charges(5);
        let mut held = Item::new("quiver", Tick::ZERO);

        assert!(quiver.can_store(env, &held, &arrows));
        assert!(!quiver.can_store(env, &held, &bolts));
        held.contents.push(arrows.clone().with_charges(20));
        assert!(!quiver.can_store(env, &held, &arrows));
    }

    #[test]
    fn reload_fills_up_to_capacity() {
        let quiver = quiver();
        let mut h = Harness::new();
        let mut held = Item::new("quiver", Tick::ZERO);
        let first = h.you.add_item(Item::new("arrow_wood", Tick::ZERO).with_charges(15));
        let second = h.you.add_item(Item::new("arrow_wood", Tick::ZERO).with_charges(10));
        h.you.script_item(first).script_item(second);

        h.with_ctx(|ctx| quiver.reload(ctx, &mut held)).unwrap();
        assert_eq!(held.contents[0].charges, 15);
        assert!(h.you.item(first).is_none());
        assert_eq!(h.you.moves, 100 - 25);

        h.with_ctx(|ctx| quiver.reload(ctx, &mut held)).unwrap();
        assert_eq!(held.contents[0].charges, 20);
        assert_eq!(h.you.item(second).map(|a| a.charges), Some(5));

        let unloaded = h.with_ctx(|ctx| quiver.unload(ctx, &mut held));
        assert_eq!(unloaded, Ok(()));
        assert!(held.contents.is_empty());
        assert_eq!(h.you.charges_of(&ItemTypeId::new("arrow_wood")), 25);
    }

    #[test]
    fn bandolier_without_ammo() {
        let quiver = quiver();
        let mut h = Harness::new();
        h.you.add_item(Item::new("bolt_steel", Tick::ZERO).with_charges(10));
        let mut held = Item::new("quiver", Tick::ZERO);
        h.you.script_option(0);
        assert!(matches!(
            h.run(&quiver, &mut held),
            Err(UseError::Insufficient(_))
        ));
        assert!(h.you.said("No matching ammo"));
    }

    #[test]
    fn links_a_belt_from_loose_rounds() {
        let linker = actor("belt223", ConfigRecord::new("ammobelt").with("belt", "belt223"));
        let mut h = Harness::new();
        let rounds = h.you.add_item(Item::new("223", Tick::ZERO).with_charges(150));
        h.you.script_item(rounds);
        let mut tool = Item::new("belt223", Tick::ZERO);

        assert_eq!(h.run(linker.as_ref(), &mut tool), Ok(0));
        assert_eq!(h.you.item(rounds).map(|r| r.charges), Some(50));
        let belt = h
            .you
            .items
            .values()
            .find(|i| i.type_id.as_str() == "belt223")
            .unwrap();
        assert_eq!(belt.charges, 100);
        assert_eq!(belt.ammo_current, Some(ItemTypeId::new("223")));
        assert_eq!(h.you.moves, 100 - 10 * 100);

        h.you.take_item(rounds);
        assert!(matches!(
            h.run(linker.as_ref(), &mut tool),
            Err(UseError::Insufficient(_))
        ));
    }

    #[test]
    fn belt_must_hold_ammunition() {
        let mut linker = AmmobeltActor::default();
        linker
            .load(&ConfigRecord::new("ammobelt").with("belt", "holster"))
            .unwrap();
        let h = Harness::new();
        assert!(matches!(
            linker.finalize(&ItemTypeId::new("belt223"), h.content.env()),
            Err(ConfigError::InvalidField { .. })
        ));
    }
}
