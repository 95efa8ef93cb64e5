//! First aid: bandages, disinfectant, first aid kits.
//!
//! Healing runs in two steps. [`HealActor::use_healing_item`] resolves the
//! body part to treat; [`HealActor::finish_using`] applies the treatment.
//! Short actions run both at once. Long actions hand a [`HealTask`] to the
//! character's driver, which calls `finish_using` once the work is done.

use crate::actor::{
    ConfigError, ConfigRecord, ItemInfo, ItemUseActor, UseContext, UseError, UseResult,
};
use crate::agent::{Activity, Agent, Character, HealTask, MessageKind};
use crate::config::SessionConfig;
use crate::env::ActorEnv;
use crate::state::{
    BodyPart, BodyPartCategory, CharacterId, EffectData, EffectId, Item, ItemTypeId, Position,
    SkillId, Tick,
};
use crate::world::World;

use super::{known_effects, known_item};

const FIRST_AID: &str = "firstaid";
const BLEED: &str = "bleed";
const BITE: &str = "bite";
const INFECTED: &str = "infected";
const RECOVER: &str = "recover";

/// Experience the healer earns per treatment.
const PRACTICE_AMOUNT: i32 = 8;

#[derive(Clone, Debug)]
pub struct HealActor {
    pub limb_power: f32,
    pub head_power: f32,
    pub torso_power: f32,
    /// Chance in `[0, 1]` to stop bleeding on the treated part.
    pub bleed: f32,
    pub bite: f32,
    pub infect: f32,
    pub move_cost: i32,
    pub long_action: bool,
    /// Extra hit points per first aid level.
    pub limb_scaling: f32,
    pub head_scaling: f32,
    pub torso_scaling: f32,
    /// Applied to the patient once treatment finishes.
    pub effects: Vec<EffectData>,
    /// Tools turn into this; other items leave one behind.
    pub used_up_item: Option<ItemTypeId>,
}

impl Default for HealActor {
    fn default() -> Self {
        Self {
            limb_power: 0.0,
            head_power: 0.0,
            torso_power: 0.0,
            bleed: 0.0,
            bite: 0.0,
            infect: 0.0,
            move_cost: 100,
            long_action: false,
            limb_scaling: 0.0,
            head_scaling: 0.0,
            torso_scaling: 0.0,
            effects: Vec::new(),
            used_up_item: None,
        }
    }
}

/// The character being treated: the healer itself or someone in the world.
fn patient_of<'c>(
    healer: &'c mut dyn Agent,
    world: &'c mut dyn World,
    patient: Option<CharacterId>,
) -> Option<&'c mut dyn Agent> {
    match patient {
        Some(id) if id != healer.id() => world.character_mut(id),
        _ => Some(healer),
    }
}

impl HealActor {
    fn power(&self, category: BodyPartCategory) -> f32 {
        match category {
            BodyPartCategory::Limb => self.limb_power,
            BodyPartCategory::Head => self.head_power,
            BodyPartCategory::Torso => self.torso_power,
        }
    }

    fn scaling(&self, category: BodyPartCategory) -> f32 {
        match category {
            BodyPartCategory::Limb => self.limb_scaling,
            BodyPartCategory::Head => self.head_scaling,
            BodyPartCategory::Torso => self.torso_scaling,
        }
    }

    /// Hit points restored on `bp` by a healer with `level` in first aid.
    pub fn heal_value_at(&self, bp: BodyPart, level: i32) -> i32 {
        let category = bp.category();
        (self.power(category) + self.scaling(category) * level as f32) as i32
    }

    /// Hit points `healer` would restore on `bp`.
    pub fn get_heal_value<H>(&self, healer: &H, bp: BodyPart) -> i32
    where
        H: Character + ?Sized,
    {
        self.heal_value_at(bp, healer.skill_level(&SkillId::new(FIRST_AID)))
    }

    /// How much treating `bp` would help; zero when there is nothing to do.
    fn treatment_score(&self, patient: &dyn Agent, bp: BodyPart, heal: i32) -> i32 {
        let mut score = heal.clamp(0, patient.hp(bp).missing());
        let treats = |chance: f32, effect: &str| {
            chance > 0.0 && patient.has_effect(&EffectId::new(effect), Some(bp))
        };
        if treats(self.bleed, BLEED) {
            score += 15;
        }
        if treats(self.bite, BITE) {
            score += 20;
        }
        if treats(self.infect, INFECTED) {
            score += 30;
        }
        score
    }

    /// Picks the body part to treat.
    ///
    /// Players choose; NPCs take the part that benefits most. Unless `force`
    /// is set, an NPC with nothing worth treating is refused.
    pub fn use_healing_item(
        &self,
        ctx: &mut UseContext<'_>,
        patient: Option<CharacterId>,
        force: bool,
    ) -> Result<BodyPart, UseError> {
        if !ctx.agent.is_npc() {
            return match ctx.agent.choose_body_part("Treat which body part?") {
                Some(bp) => Ok(bp),
                None => ctx.refuse(UseError::Cancelled),
            };
        }

        let level = ctx.agent.skill_level(&SkillId::new(FIRST_AID));
        let Some(target) = patient_of(&mut *ctx.agent, &mut *ctx.world, patient) else {
            return Err(UseError::unknown("character", patient.map_or(0, |id| id.0)));
        };
        let best = BodyPart::ALL
            .into_iter()
            .map(|bp| (self.treatment_score(target, bp, self.heal_value_at(bp, level)), bp))
            .max_by_key(|(score, _)| *score);
        match best {
            Some((score, bp)) if score > 0 || force => Ok(bp),
            _ => ctx.precondition("There is nothing to treat."),
        }
    }

    /// Applies the treatment and returns the charges it used.
    ///
    /// The healed amount is bounded by the part's missing hit points. Bleed,
    /// bite and infection are each removed on an independent roll.
    pub fn finish_using(
        &self,
        ctx: &mut UseContext<'_>,
        item: &mut Item,
        patient: Option<CharacterId>,
        bp: BodyPart,
    ) -> UseResult {
        let first_aid = SkillId::new(FIRST_AID);
        let heal = self.get_heal_value(&*ctx.agent, bp);
        let turn = ctx.turn;
        let mut notes: Vec<(MessageKind, String)> = Vec::new();

        {
            let Some(target) = patient_of(&mut *ctx.agent, &mut *ctx.world, patient) else {
                return Err(UseError::unknown("character", patient.map_or(0, |id| id.0)));
            };
            let rng = &mut *ctx.rng;

            if heal >= 0 {
                let healed = target.heal(bp, heal);
                tracing::debug!(part = %bp, healed, "treatment applied");
            } else {
                target.apply_damage(bp, -heal);
            }

            let bleed = EffectId::new(BLEED);
            if self.bleed > 0.0 && target.has_effect(&bleed, Some(bp)) {
                if rng.x_in_y(f64::from(self.bleed), 1.0) {
                    target.remove_effect(&bleed, Some(bp));
                    notes.push((MessageKind::Good, "The bleeding stops.".to_owned()));
                } else {
                    notes.push((MessageKind::Bad, "The bleeding doesn't stop.".to_owned()));
                }
            }

            let bite = EffectId::new(BITE);
            if self.bite > 0.0 && target.has_effect(&bite, Some(bp)) {
                if rng.x_in_y(f64::from(self.bite), 1.0) {
                    target.remove_effect(&bite, Some(bp));
                    notes.push((MessageKind::Good, "The wound is cleaned.".to_owned()));
                } else {
                    notes.push((MessageKind::Bad, "The wound is still dirty.".to_owned()));
                }
            }

            let infected = EffectId::new(INFECTED);
            if self.infect > 0.0 && target.has_effect(&infected, Some(bp)) {
                if rng.x_in_y(f64::from(self.infect), 1.0) {
                    let duration = target.effect_duration(&infected, Some(bp));
                    target.remove_effect(&infected, Some(bp));
                    target.add_effect(&EffectData::new(RECOVER, duration).on(bp));
                    notes.push((MessageKind::Good, "The infection is treated.".to_owned()));
                } else {
                    notes.push((MessageKind::Bad, "The infection persists.".to_owned()));
                }
            }

            for effect in &self.effects {
                let bound = match effect.bp {
                    Some(_) => effect.clone(),
                    None => effect.clone().on(bp),
                };
                target.add_effect(&bound);
            }
        }

        for (kind, text) in notes {
            ctx.msg(kind, &text);
        }
        ctx.agent.practice(&first_aid, PRACTICE_AMOUNT, SessionConfig::MAX_SKILL_LEVEL);

        if let Some(used_up) = &self.used_up_item {
            self.leave_used_up(ctx, item, used_up.clone(), turn)?;
        }
        Ok(ctx.charges_to_use(item))
    }

    fn leave_used_up(
        &self,
        ctx: &mut UseContext<'_>,
        item: &mut Item,
        used_up: ItemTypeId,
        turn: Tick,
    ) -> Result<(), UseError> {
        if ctx.env.item_type(&item.type_id)?.is_tool() {
            item.convert(used_up);
        } else {
            ctx.agent.add_item(Item::new(used_up, turn));
        }
        Ok(())
    }
}

impl ItemUseActor for HealActor {
    fn type_tag(&self) -> &'static str {
        "heal"
    }

    fn load(&mut self, record: &ConfigRecord) -> Result<(), ConfigError> {
        self.move_cost = record.require_i32("move_cost")?;
        self.limb_power = record.get_float("limb_power", 0.0)?;
        self.head_power = record.get_float("head_power", 0.8 * self.limb_power)?;
        self.torso_power = record.get_float("torso_power", 1.5 * self.limb_power)?;
        self.bleed = record.get_float("bleed", 0.0)?;
        self.bite = record.get_float("bite", 0.0)?;
        self.infect = record.get_float("infect", 0.0)?;
        self.long_action = record.get_bool("long_action", false)?;

        self.limb_scaling = record.get_float("limb_scaling", 0.0)?;
        let ratio = if self.limb_power.abs() < 1e-4 {
            0.0
        } else {
            self.limb_scaling / self.limb_power
        };
        self.head_scaling = record.get_float("head_scaling", ratio * self.head_power)?;
        self.torso_scaling = record.get_float("torso_scaling", ratio * self.torso_power)?;

        self.effects = record.get_effects("effects")?;
        self.used_up_item = record.get_str("used_up_item")?.map(ItemTypeId::new);
        Ok(())
    }

    fn finalize(&mut self, _item_type: &ItemTypeId, env: ActorEnv<'_>) -> Result<(), ConfigError> {
        known_effects(env, "effects", &self.effects)?;
        match &self.used_up_item {
            Some(used_up) => known_item(env, "used_up_item", used_up),
            None => Ok(()),
        }
    }

    fn use_item(
        &self,
        ctx: &mut UseContext<'_>,
        item: &mut Item,
        _auto: bool,
        pos: Position,
    ) -> UseResult {
        if ctx.agent.is_underwater() {
            return ctx.precondition("You can't do that while underwater.");
        }
        if !ctx.has_enough_charges(item) {
            let text = format!("Your {} is used up.", ctx.item_name(item));
            return ctx.insufficient(text);
        }

        let patient = if pos == ctx.agent.position() {
            None
        } else {
            ctx.world.character_at_mut(pos).map(|c| c.id())
        };
        let bp = self.use_healing_item(ctx, patient, false)?;

        if self.long_action && !ctx.agent.is_npc() {
            let Some(item_id) = ctx.source.id else {
                return ctx.precondition("You need to hold the item to treat wounds with it.");
            };
            let healer = ctx.agent.id();
            let task = HealTask {
                healer,
                patient: patient.unwrap_or(healer),
                item: item_id,
                body_part: bp,
                moves: self.move_cost.max(0) as u32,
            };
            tracing::debug!(part = %bp, moves = task.moves, "first aid scheduled");
            ctx.agent.assign_activity(Activity::FirstAid(task));
            return Ok(0);
        }

        ctx.agent.mod_moves(-self.move_cost);
        self.finish_using(ctx, item, patient, bp)
    }

    fn can_use(&self, ctx: &UseContext<'_>, item: &Item, _auto: bool, _pos: Position) -> bool {
        !ctx.agent.is_underwater() && ctx.has_enough_charges(item)
    }

    fn clone_actor(&self) -> Box<dyn ItemUseActor> {
        Box::new(self.clone())
    }

    fn info(&self, _item: &Item, _env: ActorEnv<'_>) -> Vec<ItemInfo> {
        let mut lines = Vec::new();
        if self.head_power > 0.0 || self.torso_power > 0.0 || self.limb_power > 0.0 {
            lines.push(ItemInfo::new("Base healing", ""));
            lines.push(ItemInfo::new("Head", format!("{:.0}", self.head_power)));
            lines.push(ItemInfo::new("Torso", format!("{:.0}", self.torso_power)));
            lines.push(ItemInfo::new("Limbs", format!("{:.0}", self.limb_power)));
        }
        let chance = |value: f32| format!("{:.0}%", value * 100.0);
        if self.bleed > 0.0 {
            lines.push(ItemInfo::new("Chance to stop bleeding", chance(self.bleed)));
        }
        if self.bite > 0.0 {
            lines.push(ItemInfo::new("Chance to clean wound", chance(self.bite)));
        }
        if self.infect > 0.0 {
            lines.push(ItemInfo::new("Chance to cure infection", chance(self.infect)));
        }
        lines.push(ItemInfo::new("Moves to use", self.move_cost.to_string()));
        lines
    }

    fn name(&self) -> String {
        "Heal".to_owned()
    }

    fn as_heal(&self) -> Option<&HealActor> {
        Some(self)
    }
}
