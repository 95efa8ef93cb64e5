//! Repair kits: sewing kits, soldering irons, welders.
//!
//! One [`RepairItemActor::repair`] call is one attempt. Callers keep calling
//! while the outcome [`can_continue`](RepairOutcome::can_continue) and the
//! agent wants to go on.
//!
//! Attempt flow:
//!
//! 1. classify intent with [`default_action`](RepairItemActor::default_action)
//! 2. refuse blocked attempts without spending anything
//! 3. pay moves and components, grant practice
//! 4. roll once against [`repair_chance`](RepairItemActor::repair_chance)

use std::collections::BTreeSet;

use crate::actor::{
    ConfigError, ConfigRecord, ItemInfo, ItemUseActor, UseContext, UseError, UseResult,
};
use crate::agent::{Agent, MessageKind, Stat};
use crate::config::SessionConfig;
use crate::env::{ActorEnv, ItemType, OracleError};
use crate::state::{Item, ItemId, ItemTypeId, MaterialId, Position, SkillId};

use super::known_skill;

/// Tag an item gains once tailored to its wearer.
const FIT: &str = "FIT";
/// Items that can be tailored.
const VARSIZE: &str = "VARSIZE";
const NO_REPAIR: &str = "NO_REPAIR";
/// Difficulty assumed for items no recipe produces.
const UNCRAFTABLE_DIFFICULTY: i32 = 5;

/// What an attempt on an item would try to achieve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum RepairAction {
    /// Nothing left to improve.
    Nothing,
    /// Remove damage.
    Repair,
    /// Add the fit tag.
    Refit,
    /// Push damage below zero.
    Reinforce,
    /// Wanted to reinforce but lacks the skill; trains without changing the item.
    Practice,
}

impl RepairAction {
    fn verb(self) -> &'static str {
        match self {
            Self::Nothing => "improve",
            Self::Repair => "repair",
            Self::Refit => "refit",
            Self::Reinforce => "reinforce",
            Self::Practice => "practice on",
        }
    }
}

/// Result of one attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum RepairOutcome {
    /// Improved the item; more may be possible.
    Success,
    /// Nothing happened; trying again is fine.
    Retry,
    /// Damaged the item; stop.
    Failure,
    /// Damaged the item past repair; the caller removes it.
    Destroyed,
    /// The attempt could not be made.
    CannotAttempt,
    /// Not skilled enough to have any chance.
    SkillTooLow,
}

impl RepairOutcome {
    pub fn can_continue(self) -> bool {
        matches!(self, Self::Success | Self::Retry)
    }

    /// True when the attempt cost moves and components.
    pub fn was_attempted(self) -> bool {
        !matches!(self, Self::CannotAttempt | Self::SkillTooLow)
    }
}

/// Components an attempt would need.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ComponentPlan {
    needed: i64,
    /// Every component the target's repairable materials accept.
    accepted: Vec<ItemTypeId>,
    /// Accepted components the agent has enough of.
    available: Vec<ItemTypeId>,
}

enum Verdict {
    Ready(RepairAction),
    Blocked(RepairOutcome, String),
}

#[derive(Clone, Debug)]
pub struct RepairItemActor {
    /// Materials this tool can work.
    pub materials: BTreeSet<MaterialId>,
    pub used_skill: SkillId,
    /// Attempts train the skill only below this level.
    pub trains_skill_to: i32,
    /// Component volume per unit of target volume; 0 always takes one.
    pub cost_scaling: f32,
    /// Added to the success roll.
    pub tool_quality: i32,
    pub move_cost: i32,
    /// Reinforcing below this skill level only practices.
    pub reinforce_skill: i32,
}

impl Default for RepairItemActor {
    fn default() -> Self {
        Self {
            materials: BTreeSet::new(),
            used_skill: SkillId::default(),
            trains_skill_to: 5,
            cost_scaling: 1.0,
            tool_quality: 0,
            move_cost: 500,
            reinforce_skill: 0,
        }
    }
}

impl RepairItemActor {
    /// Most likely intent for `fix` at the given skill level.
    pub fn default_action(&self, fix: &Item, ty: &ItemType, skill_level: i32) -> RepairAction {
        if fix.damage > 0 {
            return RepairAction::Repair;
        }
        if fix.has_flag(VARSIZE, ty) && !fix.has_flag(FIT, ty) {
            return RepairAction::Refit;
        }
        if fix.damage > SessionConfig::MIN_DAMAGE {
            return if skill_level >= self.reinforce_skill {
                RepairAction::Reinforce
            } else {
                RepairAction::Practice
            };
        }
        RepairAction::Nothing
    }

    /// Difficulty of the easiest recipe producing `fix`.
    ///
    /// Each recipe costs one extra point per gap in the agent's knowledge:
    /// an unknown recipe, unmet skill requirements, missing tools. `training`
    /// ignores those gaps.
    pub fn repair_recipe_difficulty(
        &self,
        agent: &dyn Agent,
        env: ActorEnv<'_>,
        fix: &Item,
        training: bool,
    ) -> Result<i32, OracleError> {
        let recipes = env.recipes()?.recipes_for(&fix.type_id);
        let difficulty = recipes
            .iter()
            .map(|recipe| {
                if training {
                    return recipe.difficulty;
                }
                let mut difficulty = recipe.difficulty;
                if !agent.knows_recipe(&recipe.id) {
                    difficulty += 1;
                }
                if recipe
                    .required_skills
                    .iter()
                    .any(|(skill, level)| agent.skill_level(skill) < *level)
                {
                    difficulty += 1;
                }
                let missing_tool = recipe.tools.iter().any(|tool| !agent.has_amount(tool, 1));
                let missing_quality = recipe
                    .qualities
                    .iter()
                    .any(|(quality, level)| agent.max_quality(quality) < *level);
                if missing_tool || missing_quality {
                    difficulty += 1;
                }
                difficulty
            })
            .min();
        Ok(difficulty.unwrap_or(UNCRAFTABLE_DIFFICULTY))
    }

    /// `(success, damage)` probabilities for a given skill, dexterity and
    /// total difficulty. Success never overlaps the damage band.
    pub fn chances(&self, skill: i32, dex: i32, difficulty: i32) -> (f32, f32) {
        let skill = skill as f32;
        let difficulty = difficulty as f32;
        let quality = self.tool_quality as f32;
        let damage = ((difficulty - skill - (quality + dex as f32) / 5.0) / 100.0).clamp(0.0, 1.0);
        let success =
            ((10.0 + 2.0 * skill - 2.0 * difficulty + quality / 5.0) / 100.0).clamp(0.0, 1.0 - damage);
        (success, damage)
    }

    /// `(success, damage)` probabilities for `agent` attempting `action` on
    /// `fix`.
    pub fn repair_chance(
        &self,
        agent: &dyn Agent,
        env: ActorEnv<'_>,
        fix: &Item,
        action: RepairAction,
    ) -> Result<(f32, f32), OracleError> {
        let training = action == RepairAction::Practice;
        let recipe = self.repair_recipe_difficulty(agent, env, fix, training)?;
        let action_difficulty = match action {
            RepairAction::Nothing => 0,
            RepairAction::Repair => fix.damage,
            RepairAction::Refit => SessionConfig::MAX_DAMAGE,
            RepairAction::Reinforce => SessionConfig::MAX_DAMAGE.max(recipe),
            RepairAction::Practice => recipe,
        };
        let skill = agent.skill_level(&self.used_skill);
        let dex = agent.stat(Stat::Dexterity);
        Ok(self.chances(skill, dex, recipe + action_difficulty))
    }

    fn component_plan(
        &self,
        agent: &dyn Agent,
        env: ActorEnv<'_>,
        fix: &Item,
    ) -> Result<ComponentPlan, OracleError> {
        let items = env.items()?;
        let ty = env.item_type(&fix.type_id)?;

        let needed = if self.cost_scaling <= 0.0 {
            1
        } else {
            let units = SessionConfig::volume_units(fix.volume(ty)) as f32;
            ((units * self.cost_scaling).ceil() as i64).max(1)
        };

        let mut accepted: Vec<ItemTypeId> = Vec::new();
        for material in ty.materials.iter().filter(|m| self.materials.contains(*m)) {
            let component = items
                .material(material)
                .and_then(|m| m.repaired_with.clone());
            if let Some(component) = component
                && !accepted.contains(&component)
            {
                accepted.push(component);
            }
        }

        let available = accepted
            .iter()
            .filter(|component| {
                let by_charges = env.item_type(component).is_ok_and(|c| c.count_by_charges);
                if by_charges {
                    agent.has_charges(component, needed)
                } else {
                    agent.has_amount(component, needed)
                }
            })
            .cloned()
            .collect();

        Ok(ComponentPlan {
            needed,
            accepted,
            available,
        })
    }

    /// Checks for (and unless `just_check`, consumes) the components one
    /// attempt on `fix` needs.
    pub fn handle_components(
        &self,
        ctx: &mut UseContext<'_>,
        fix: &Item,
        print_msg: bool,
        just_check: bool,
    ) -> Result<bool, UseError> {
        let plan = self.component_plan(&*ctx.agent, ctx.env, fix)?;
        let Some(component) = plan.available.first() else {
            if print_msg {
                let names: Vec<String> =
                    plan.accepted.iter().map(|c| ctx.env.item_name(c)).collect();
                let text = if names.is_empty() {
                    "Nothing you carry can be used to repair that.".to_owned()
                } else {
                    format!(
                        "You don't have enough {} to do that. Need {}.",
                        names.join(" or "),
                        plan.needed
                    )
                };
                ctx.msg(MessageKind::Info, &text);
            }
            return Ok(false);
        };
        if just_check {
            return Ok(true);
        }

        if ctx.env.item_type(component)?.count_by_charges {
            ctx.agent.use_charges(component, plan.needed);
        } else {
            ctx.agent.use_amount(component, plan.needed);
        }
        Ok(true)
    }

    fn verdict(&self, ctx: &UseContext<'_>, tool: &Item, fix: &Item) -> Result<Verdict, UseError> {
        let ty = ctx.env.item_type(&fix.type_id)?;
        let fix_name = ty.name.as_str();
        let blocked = |text: String| Ok(Verdict::Blocked(RepairOutcome::CannotAttempt, text));

        if fix.has_flag(NO_REPAIR, ty) {
            return blocked(format!("You cannot repair this {fix_name}."));
        }
        if !ty.made_of_any(&self.materials) {
            let tool_name = ctx.item_name(tool);
            return blocked(format!("Your {tool_name} can not repair the {fix_name}."));
        }
        if ty.count_by_charges {
            return blocked("You cannot repair this type of item.".to_owned());
        }

        let skill = ctx.agent.skill_level(&self.used_skill);
        let action = self.default_action(fix, ty, skill);
        match action {
            RepairAction::Nothing => {
                return blocked(format!(
                    "Your {fix_name} is already enhanced to its maximum potential."
                ));
            }
            RepairAction::Practice if skill >= self.trains_skill_to => {
                return blocked(format!("You have nothing left to learn from the {fix_name}."));
            }
            _ => {}
        }

        if self.component_plan(&*ctx.agent, ctx.env, fix)?.available.is_empty() {
            return blocked("You don't have enough components to do that.".to_owned());
        }

        if action != RepairAction::Practice {
            let (success, _) = self.repair_chance(&*ctx.agent, ctx.env, fix, action)?;
            if success <= 0.0 {
                return Ok(Verdict::Blocked(
                    RepairOutcome::SkillTooLow,
                    format!(
                        "You don't know enough about the {fix_name} to {} it yet.",
                        action.verb()
                    ),
                ));
            }
        }
        Ok(Verdict::Ready(action))
    }

    /// Whether an attempt on `fix` with `tool` could be made now. Spends
    /// nothing; with `print_msg` it explains a refusal.
    pub fn can_repair(
        &self,
        ctx: &mut UseContext<'_>,
        tool: &Item,
        fix: &Item,
        print_msg: bool,
    ) -> bool {
        match self.verdict(ctx, tool, fix) {
            Ok(Verdict::Ready(_)) => true,
            Ok(Verdict::Blocked(_, text)) => {
                if print_msg {
                    ctx.msg(MessageKind::Info, &text);
                }
                false
            }
            Err(err) => {
                if print_msg {
                    ctx.msg(MessageKind::Warning, &err.to_string());
                }
                false
            }
        }
    }

    /// Makes one attempt at improving `fix`.
    ///
    /// `fix` must be detached from the agent's inventory for the call (see
    /// [`Inventory::detach_item`](crate::agent::Inventory::detach_item)), otherwise it can be
    /// spent as its own component. On [`RepairOutcome::Destroyed`] the caller
    /// must remove `fix`.
    pub fn repair(
        &self,
        ctx: &mut UseContext<'_>,
        tool: &Item,
        fix: &mut Item,
    ) -> Result<RepairOutcome, UseError> {
        let action = match self.verdict(ctx, tool, fix)? {
            Verdict::Ready(action) => action,
            Verdict::Blocked(outcome, text) => {
                ctx.msg(MessageKind::Info, &text);
                return Ok(outcome);
            }
        };

        let (success, damage) = self.repair_chance(&*ctx.agent, ctx.env, fix, action)?;
        ctx.agent.mod_moves(-self.move_cost);
        if !self.handle_components(ctx, fix, true, false)? {
            return Ok(RepairOutcome::CannotAttempt);
        }
        let recipe = self.repair_recipe_difficulty(&*ctx.agent, ctx.env, fix, true)?;
        ctx.agent
            .practice(&self.used_skill, recipe.max(1) + 1, self.trains_skill_to);

        let fix_name = ctx.item_name(fix);
        if action == RepairAction::Practice {
            ctx.msg(
                MessageKind::Neutral,
                &format!("You practice your skills on the {fix_name}."),
            );
            return Ok(RepairOutcome::Retry);
        }

        let roll = ctx.rng.unit() as f32;
        tracing::debug!(%action, roll, success, damage, "repair roll");

        if roll > 1.0 - damage {
            if fix.mod_damage(1) {
                ctx.msg(MessageKind::Bad, &format!("You destroy your {fix_name}!"));
                return Ok(RepairOutcome::Destroyed);
            }
            ctx.msg(MessageKind::Bad, &format!("You damage your {fix_name}!"));
            return Ok(RepairOutcome::Failure);
        }

        if roll < success {
            let text = match action {
                RepairAction::Refit => {
                    fix.set_flag(FIT);
                    format!("You take your {fix_name} in, improving the fit.")
                }
                RepairAction::Reinforce => {
                    fix.mod_damage(-1);
                    format!("You make your {fix_name} extra sturdy.")
                }
                _ => {
                    fix.mod_damage(-1);
                    if fix.damage == 0 {
                        format!("You repair your {fix_name} completely!")
                    } else {
                        format!("You repair your {fix_name}!")
                    }
                }
            };
            ctx.msg(MessageKind::Good, &text);
            return Ok(RepairOutcome::Success);
        }

        ctx.msg(
            MessageKind::Neutral,
            &format!("You fail to {} your {fix_name}.", action.verb()),
        );
        Ok(RepairOutcome::Retry)
    }

    /// Inventory items this tool could work on, minus the tool itself.
    pub fn candidates(&self, ctx: &UseContext<'_>) -> Vec<ItemId> {
        ctx.agent
            .item_ids()
            .into_iter()
            .filter(|id| Some(*id) != ctx.source.id)
            .filter(|id| {
                ctx.agent.item(*id).is_some_and(|item| {
                    ctx.env
                        .item_type(&item.type_id)
                        .is_ok_and(|ty| ty.made_of_any(&self.materials))
                })
            })
            .collect()
    }
}

impl ItemUseActor for RepairItemActor {
    fn type_tag(&self) -> &'static str {
        "repair_item"
    }

    fn load(&mut self, record: &ConfigRecord) -> Result<(), ConfigError> {
        self.materials = record.get_string_set("materials")?;
        if self.materials.is_empty() {
            return Err(ConfigError::MissingField {
                field: "materials".to_owned(),
            });
        }
        self.used_skill = SkillId::new(record.require_str("skill")?);
        self.cost_scaling = record.require_float("cost_scaling")?;
        self.tool_quality = record.get_i32("tool_quality", 0)?;
        self.move_cost = record.get_i32("move_cost", 500)?;
        self.trains_skill_to = record.get_i32("trains_skill_to", 5)?;
        self.reinforce_skill = record.get_i32("reinforce_skill", 0)?;
        Ok(())
    }

    fn finalize(&mut self, _item_type: &ItemTypeId, env: ActorEnv<'_>) -> Result<(), ConfigError> {
        known_skill(env, "skill", &self.used_skill)?;
        let items = env.items()?;
        match self.materials.iter().find(|m| items.material(m).is_none()) {
            Some(missing) => Err(ConfigError::unknown("materials", "material", missing)),
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
        if ctx.agent.is_underwater() {
            return ctx.precondition("You can't do that while underwater.");
        }
        if !ctx.has_enough_charges(item) {
            let text = format!("Your {} has run out of charges.", ctx.item_name(item));
            return ctx.insufficient(text);
        }
        let candidates = self.candidates(ctx);
        if candidates.is_empty() {
            return ctx.precondition("You have nothing this could repair.");
        }
        let Some(target) = ctx.agent.choose_item("Repair what?", &candidates) else {
            return ctx.refuse(UseError::Cancelled);
        };
        // Detached so the target never counts as its own component.
        let Some(mut fix) = ctx.agent.detach_item(target) else {
            return Err(UseError::unknown("item", target.0));
        };

        let outcome = self.repair(ctx, item, &mut fix);
        if matches!(outcome, Ok(RepairOutcome::Destroyed)) {
            ctx.agent.take_item(target);
        } else {
            ctx.agent.reattach_item(target, fix);
        }
        let outcome = outcome?;
        Ok(if outcome.was_attempted() {
            ctx.charges_to_use(item)
        } else {
            0
        })
    }

    fn can_use(&self, ctx: &UseContext<'_>, item: &Item, _auto: bool, _pos: Position) -> bool {
        !ctx.agent.is_underwater() && ctx.has_enough_charges(item)
    }

    fn clone_actor(&self) -> Box<dyn ItemUseActor> {
        Box::new(self.clone())
    }

    fn info(&self, _item: &Item, env: ActorEnv<'_>) -> Vec<ItemInfo> {
        let materials: Vec<String> = self
            .materials
            .iter()
            .map(|id| {
                env.items()
                    .ok()
                    .and_then(|items| items.material(id))
                    .map_or_else(|| id.to_string(), |m| m.name.clone())
            })
            .collect();
        vec![
            ItemInfo::new("Repairs", materials.join(", ")),
            ItemInfo::new("Skill used", self.used_skill.to_string()),
            ItemInfo::new("Trains up to", self.trains_skill_to.to_string()),
            ItemInfo::new("Tool quality", self.tool_quality.to_string()),
        ]
    }

    fn name(&self) -> String {
        "Repair".to_owned()
    }

    fn as_repair(&self) -> Option<&RepairItemActor> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::kinds::testing::{Harness, actor};
    use crate::agent::Inventory;
    use crate::sandbox::SandboxCharacter;
    use crate::state::Tick;

    const TAILOR: &str = "tailor";

    fn sewing_kit(cost_scaling: f64) -> RepairItemActor {
        let mut kit = RepairItemActor::default();
        kit.load(
            &ConfigRecord::new("repair_item")
                .with("materials", vec!["cotton", "leather"])
                .with("skill", TAILOR)
                .with("cost_scaling", cost_scaling),
        )
        .unwrap();
        kit
    }

    fn jacket(damage: i32) -> Item {
        Item::new("jacket_light", Tick::ZERO).with_damage(damage)
    }

    fn with_rags(you: SandboxCharacter, count: usize) -> SandboxCharacter {
        let mut you = you;
        for _ in 0..count {
            you.add_item(Item::new("rag", Tick::ZERO));
        }
        you
    }

    fn tool() -> Item {
        Item::new("sewing_kit", Tick::ZERO).with_charges(50)
    }

    #[test]
    fn intent_follows_item_state() {
        let kit = RepairItemActor {
            reinforce_skill: 3,
            ..sewing_kit(0.0)
        };
        let h = Harness::new();
        let ty = h.content.env().item_type(&ItemTypeId::new("jacket_light")).unwrap();

        assert_eq!(kit.default_action(&jacket(2), ty, 0), RepairAction::Repair);
        assert_eq!(kit.default_action(&jacket(0), ty, 0), RepairAction::Refit);
        let fitted = jacket(0).with_flag(FIT);
        assert_eq!(kit.default_action(&fitted, ty, 3), RepairAction::Reinforce);
        assert_eq!(kit.default_action(&fitted, ty, 2), RepairAction::Practice);
        let maxed = jacket(SessionConfig::MIN_DAMAGE).with_flag(FIT);
        assert_eq!(kit.default_action(&maxed, ty, 10), RepairAction::Nothing);
    }

    #[test]
    fn recipe_difficulty_counts_knowledge_gaps() {
        let kit = sewing_kit(0.0);
        let h = Harness::new();
        let env = h.content.env();
        let novice = SandboxCharacter::player();
        let expert = SandboxCharacter::player()
            .knowing("gloves_leather")
            .knowing("jacket_light")
            .with_skill("fabrication", 2)
            .with_quality("CUT", 2);
        let gloves = Item::new("gloves_leather", Tick::ZERO);

        assert_eq!(kit.repair_recipe_difficulty(&novice, env, &jacket(0), false), Ok(3));
        assert_eq!(kit.repair_recipe_difficulty(&expert, env, &jacket(0), false), Ok(2));
        assert_eq!(kit.repair_recipe_difficulty(&novice, env, &gloves, false), Ok(6));
        assert_eq!(kit.repair_recipe_difficulty(&novice, env, &gloves, true), Ok(3));
        assert_eq!(kit.repair_recipe_difficulty(&expert, env, &gloves, false), Ok(3));
        let knife = Item::new("knife_steak", Tick::ZERO);
        assert_eq!(
            kit.repair_recipe_difficulty(&novice, env, &knife, false),
            Ok(UNCRAFTABLE_DIFFICULTY)
        );
    }

    #[test]
    fn success_grows_with_skill_and_tool_quality() {
        for difficulty in [2, 6, 12] {
            let kit = sewing_kit(0.0);
            let mut last = 0.0;
            for skill in 0..=SessionConfig::MAX_SKILL_LEVEL {
                let (success, damage) = kit.chances(skill, 8, difficulty);
                assert!(success >= last);
                assert!(success + damage <= 1.0 + f32::EPSILON);
                last = success;
            }

            let mut last = 0.0;
            for quality in (0..=50).step_by(5) {
                let kit = RepairItemActor {
                    tool_quality: quality,
                    ..sewing_kit(0.0)
                };
                let (success, _) = kit.chances(4, 8, difficulty);
                assert!(success >= last);
                last = success;
            }
        }
    }

    #[test]
    fn zero_cost_scaling_takes_one_component() {
        let kit = sewing_kit(0.0);
        let mut h = Harness::new();
        h.you = with_rags(h.you.clone(), 5);
        let rag = ItemTypeId::new("rag");

        assert_eq!(h.with_ctx(|ctx| kit.handle_components(ctx, &jacket(3), false, true)), Ok(true));
        assert_eq!(h.you.amount_of(&rag), 5);
        assert_eq!(h.with_ctx(|ctx| kit.handle_components(ctx, &jacket(3), false, false)), Ok(true));
        assert_eq!(h.you.amount_of(&rag), 4);

        let gloves = Item::new("gloves_leather", Tick::ZERO);
        h.you.add_item(Item::new("leather", Tick::ZERO));
        assert_eq!(h.with_ctx(|ctx| kit.handle_components(ctx, &gloves, false, false)), Ok(true));
        assert_eq!(h.you.amount_of(&ItemTypeId::new("leather")), 0);
    }

    #[test]
    fn cost_scales_with_target_volume() {
        let kit = sewing_kit(0.5);
        let mut h = Harness::new();
        h.you = with_rags(h.you.clone(), 4);
        assert_eq!(h.with_ctx(|ctx| kit.handle_components(ctx, &jacket(3), true, false)), Ok(false));
        assert!(h.you.said("Need 5"));

        h.you.add_item(Item::new("rag", Tick::ZERO));
        assert_eq!(h.with_ctx(|ctx| kit.handle_components(ctx, &jacket(3), true, false)), Ok(true));
        assert_eq!(h.you.amount_of(&ItemTypeId::new("rag")), 0);
    }

    #[test]
    fn good_roll_repairs_through_use() {
        let actor = actor(
            "sewing_kit",
            ConfigRecord::new("repair_item")
                .with("materials", vec!["cotton"])
                .with("skill", TAILOR)
                .with("cost_scaling", 0.0)
                .with("tool_quality", 10),
        );
        let mut h = Harness::new().with_rolls([0.1]);
        h.you = with_rags(
            SandboxCharacter::player()
                .with_skill(TAILOR, 10)
                .knowing("jacket_light"),
            2,
        );
        let mut kit = tool();
        h.carry(kit.clone());
        let target = h.you.add_item(jacket(2));
        h.you.script_item(target);

        assert_eq!(h.run(actor.as_ref(), &mut kit), Ok(1));
        assert_eq!(h.you.item(target).map(|j| j.damage), Some(1));
        assert_eq!(h.you.moves, 100 - 500);
        assert_eq!(h.you.amount_of(&ItemTypeId::new("rag")), 1);
        assert!(h.you.said("You repair your light jacket!"));
    }

    #[test]
    fn bad_rolls_damage_then_destroy() {
        let kit = sewing_kit(0.0);
        let mut h = Harness::new().with_rolls([0.99, 0.5, 0.99]);
        h.you = with_rags(SandboxCharacter::player().with_skill(TAILOR, 3), 5);
        let sewing = tool();

        let mut worn = jacket(3);
        let outcome = h.with_ctx(|ctx| kit.repair(ctx, &sewing, &mut worn));
        assert_eq!(outcome, Ok(RepairOutcome::Failure));
        assert_eq!(worn.damage, 4);

        let outcome = h.with_ctx(|ctx| kit.repair(ctx, &sewing, &mut worn));
        assert_eq!(outcome, Ok(RepairOutcome::Retry));
        assert_eq!(worn.damage, 4);

        let outcome = h.with_ctx(|ctx| kit.repair(ctx, &sewing, &mut worn));
        assert_eq!(outcome, Ok(RepairOutcome::Destroyed));
        assert!(worn.is_destroyed());
        assert_eq!(h.you.amount_of(&ItemTypeId::new("rag")), 2);
    }

    fn leather_kit() -> Box<dyn ItemUseActor> {
        actor(
            "sewing_kit",
            ConfigRecord::new("repair_item")
                .with("materials", vec!["leather"])
                .with("skill", TAILOR)
                .with("cost_scaling", 0.0),
        )
    }

    #[test]
    fn target_is_never_its_own_component() {
        let actor = leather_kit();
        let mut h = Harness::new().with_rolls([0.1]);
        h.you = SandboxCharacter::player().with_skill(TAILOR, 10);
        let mut kit = tool();
        h.carry(kit.clone());
        let patch = h.you.add_item(Item::new("leather", Tick::ZERO).with_damage(2));
        h.you.script_item(patch);

        assert_eq!(h.run(actor.as_ref(), &mut kit), Ok(0));
        assert_eq!(h.you.item(patch).map(|p| p.damage), Some(2));
        assert_eq!(h.you.moves, 100);
        assert!(h.you.said("You don't have enough components to do that."));
    }

    #[test]
    fn spare_patch_is_spent_instead_of_the_target() {
        let actor = leather_kit();
        let mut h = Harness::new().with_rolls([0.1]);
        h.you = SandboxCharacter::player().with_skill(TAILOR, 10);
        let mut kit = tool();
        h.carry(kit.clone());
        let patch = h.you.add_item(Item::new("leather", Tick::ZERO).with_damage(2));
        h.you.add_item(Item::new("leather", Tick::ZERO));
        h.you.script_item(patch);

        assert_eq!(h.run(actor.as_ref(), &mut kit), Ok(1));
        assert_eq!(h.you.item(patch).map(|p| p.damage), Some(1));
        assert_eq!(h.you.amount_of(&ItemTypeId::new("leather")), 1);
    }

    #[test]
    fn destroyed_target_leaves_the_inventory() {
        let actor = actor(
            "sewing_kit",
            ConfigRecord::new("repair_item")
                .with("materials", vec!["cotton"])
                .with("skill", TAILOR)
                .with("cost_scaling", 0.0),
        );
        let mut h = Harness::new().with_rolls([0.99]);
        h.you = with_rags(SandboxCharacter::player().with_skill(TAILOR, 3), 1);
        let mut kit = tool();
        h.carry(kit.clone());
        let target = h.you.add_item(jacket(4));
        h.you.script_item(target);

        assert_eq!(h.run(actor.as_ref(), &mut kit), Ok(1));
        assert!(h.you.item(target).is_none());
    }

    #[test]
    fn practice_never_destroys() {
        let kit = RepairItemActor {
            reinforce_skill: 8,
            ..sewing_kit(0.0)
        };
        let mut h = Harness::new().with_rolls([0.999; 20]);
        h.you = with_rags(SandboxCharacter::player(), 20);
        let sewing = tool();
        let mut fitted = jacket(0).with_flag(FIT);

        for _ in 0..20 {
            let outcome = h.with_ctx(|ctx| kit.repair(ctx, &sewing, &mut fitted));
            assert_eq!(outcome, Ok(RepairOutcome::Retry));
        }
        assert_eq!(fitted.damage, 0);
        assert!(h.you.experience_in(TAILOR) > 0);
        assert_eq!(h.rng.remaining(), 20);
    }

    #[test]
    fn blocked_attempts_spend_nothing() {
        let kit = sewing_kit(0.0);
        let mut h = Harness::new();
        h.you = with_rags(SandboxCharacter::player(), 3);
        let sewing = tool();

        let mut shirt = Item::new("tshirt", Tick::ZERO).with_damage(2);
        let outcome = h.with_ctx(|ctx| kit.repair(ctx, &sewing, &mut shirt));
        assert_eq!(outcome, Ok(RepairOutcome::CannotAttempt));

        let mut knife = Item::new("knife_steak", Tick::ZERO).with_damage(2);
        assert!(!h.with_ctx(|ctx| kit.can_repair(ctx, &sewing, &knife, true)));
        assert!(h.you.said("can not repair"));
        let outcome = h.with_ctx(|ctx| kit.repair(ctx, &sewing, &mut knife));
        assert_eq!(outcome, Ok(RepairOutcome::CannotAttempt));

        let mut ruined = jacket(4);
        let outcome = h.with_ctx(|ctx| kit.repair(ctx, &sewing, &mut ruined));
        assert_eq!(outcome, Ok(RepairOutcome::SkillTooLow));
        assert!(!outcome.unwrap().can_continue());

        assert_eq!(h.you.moves, 100);
        assert_eq!(h.you.amount_of(&ItemTypeId::new("rag")), 3);
        assert_eq!(h.you.experience_in(TAILOR), 0);
    }

    #[test]
    fn missing_components_block_the_attempt() {
        let kit = sewing_kit(0.0);
        let mut h = Harness::new();
        h.you = SandboxCharacter::player().with_skill(TAILOR, 8);
        let sewing = tool();
        let mut torn = jacket(1);

        let outcome = h.with_ctx(|ctx| kit.repair(ctx, &sewing, &mut torn));
        assert_eq!(outcome, Ok(RepairOutcome::CannotAttempt));
        assert!(h.you.said("enough components"));
        assert_eq!(torn.damage, 1);
    }

    #[test]
    fn materials_and_skill_are_required() {
        let mut kit = RepairItemActor::default();
        let record = ConfigRecord::new("repair_item")
            .with("skill", TAILOR)
            .with("cost_scaling", 0.1);
        assert!(matches!(kit.load(&record), Err(ConfigError::MissingField { .. })));
        let record = ConfigRecord::new("repair_item")
            .with("materials", vec!["cotton"])
            .with("cost_scaling", 0.1);
        assert!(matches!(kit.load(&record), Err(ConfigError::MissingField { .. })));
    }
}
