//! Actors that put something new into the world: vehicles and monsters.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::actor::{
    ConfigError, ConfigRecord, ItemInfo, ItemUseActor, UseContext, UseError, UseResult,
};
use crate::agent::{MessageKind, Stat};
use crate::config::SessionConfig;
use crate::env::ActorEnv;
use crate::state::{Item, ItemTypeId, MonsterTypeId, Position, SkillId, VehicleProtoId};
use crate::world::{MonsterSpawn, World};

use super::{has_tools, known_item, known_skill, load_tools};

fn is_free(world: &dyn World, pos: Position) -> bool {
    world.is_empty(pos) && world.move_cost(pos) > 0
}

/// Unfolds a carried item into a vehicle.
#[derive(Clone, Debug, Default)]
pub struct UnfoldVehicleActor {
    pub vehicle_name: VehicleProtoId,
    pub unfold_msg: String,
    pub moves: i32,
    pub tools_needed: BTreeMap<ItemTypeId, i64>,
}

impl ItemUseActor for UnfoldVehicleActor {
    fn type_tag(&self) -> &'static str {
        "unfold_vehicle"
    }

    fn load(&mut self, record: &ConfigRecord) -> Result<(), ConfigError> {
        self.vehicle_name = VehicleProtoId::new(record.require_str("vehicle_name")?);
        self.unfold_msg = record.get_string("unfold_msg", "")?;
        self.moves = record.get_i32("moves", 0)?;
        self.tools_needed = load_tools(record, "tools_needed")?;
        Ok(())
    }

    fn finalize(&mut self, _item_type: &ItemTypeId, env: ActorEnv<'_>) -> Result<(), ConfigError> {
        if !env.tables()?.has_vehicle(&self.vehicle_name) {
            return Err(ConfigError::unknown(
                "vehicle_name",
                "vehicle",
                &self.vehicle_name,
            ));
        }
        for tool in self.tools_needed.keys() {
            known_item(env, "tools_needed", tool)?;
        }
        Ok(())
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
        if !has_tools(ctx, &self.tools_needed) {
            let names: Vec<String> = self
                .tools_needed
                .keys()
                .map(|tool| ctx.env.item_name(tool))
                .collect();
            return ctx.insufficient(format!(
                "You need {} to do that.",
                names.join(" and ")
            ));
        }
        let here = ctx.agent.position();
        if !ctx.world.add_vehicle(&self.vehicle_name, here) {
            let text = format!("There's no room to unfold the {}.", ctx.item_name(item));
            return ctx.precondition(text);
        }
        let text = if self.unfold_msg.is_empty() {
            format!("You unfold the {}.", ctx.item_name(item))
        } else {
            self.unfold_msg.clone()
        };
        ctx.msg(MessageKind::Neutral, &text);
        ctx.agent.mod_moves(-self.moves);
        ctx.consume_item();
        Ok(0)
    }

    fn can_use(&self, ctx: &UseContext<'_>, _item: &Item, _auto: bool, _pos: Position) -> bool {
        !ctx.agent.is_underwater() && has_tools(ctx, &self.tools_needed)
    }

    fn clone_actor(&self) -> Box<dyn ItemUseActor> {
        Box::new(self.clone())
    }

    fn name(&self) -> String {
        "Unfold".to_owned()
    }
}

/// Deploys a monster (turret, robot, tamed animal) next to the agent.
#[derive(Clone, Debug)]
pub struct PlaceMonsterActor {
    pub monster_id: MonsterTypeId,
    /// Upper bound of the hostility roll.
    pub difficulty: i32,
    pub moves: i32,
    pub place_randomly: bool,
    pub skill1: Option<SkillId>,
    pub skill2: Option<SkillId>,
    pub hostile_msg: String,
    pub friendly_msg: String,
}

impl Default for PlaceMonsterActor {
    fn default() -> Self {
        Self {
            monster_id: MonsterTypeId::default(),
            difficulty: 0,
            moves: 100,
            place_randomly: false,
            skill1: None,
            skill2: None,
            hostile_msg: String::new(),
            friendly_msg: String::new(),
        }
    }
}

impl PlaceMonsterActor {
    fn target(&self, ctx: &mut UseContext<'_>, name: &str) -> Result<Position, UseError> {
        let here = ctx.agent.position();

        if self.place_randomly {
            let candidates: ArrayVec<Position, 8> = here
                .neighbors()
                .into_iter()
                .filter(|pos| is_free(&*ctx.world, *pos))
                .collect();
            if candidates.is_empty() {
                return ctx.precondition(format!(
                    "There is no adjacent square to release the {name} in!"
                ));
            }
            let pick = ctx.rng.range(0, candidates.len() as i32 - 1);
            return Ok(candidates[pick as usize]);
        }

        let Some(target) = ctx
            .agent
            .choose_direction(&format!("Place the {name} where?"))
        else {
            return ctx.refuse(UseError::Cancelled);
        };
        if target == here || !is_free(&*ctx.world, target) {
            return ctx.precondition(format!("You cannot place a {name} there."));
        }
        Ok(target)
    }

    fn skill_offset(&self, ctx: &UseContext<'_>) -> i32 {
        let level = |skill: &Option<SkillId>| {
            skill
                .as_ref()
                .map_or(0, |skill| ctx.agent.skill_level(skill))
        };
        level(&self.skill1) / 2 + level(&self.skill2) + ctx.agent.stat(Stat::Intelligence) / 2
    }
}

impl ItemUseActor for PlaceMonsterActor {
    fn type_tag(&self) -> &'static str {
        "place_monster"
    }

    fn load(&mut self, record: &ConfigRecord) -> Result<(), ConfigError> {
        self.monster_id = MonsterTypeId::new(record.require_str("monster_id")?);
        self.difficulty = record.get_i32("difficulty", 0)?;
        self.moves = record.get_i32("moves", self.moves)?;
        self.place_randomly = record.get_bool("place_randomly", false)?;
        self.skill1 = record.get_str("skill1")?.map(SkillId::new);
        self.skill2 = record.get_str("skill2")?.map(SkillId::new);
        self.hostile_msg = record.get_string("hostile_msg", "")?;
        self.friendly_msg = record.get_string("friendly_msg", "")?;
        Ok(())
    }

    fn finalize(&mut self, _item_type: &ItemTypeId, env: ActorEnv<'_>) -> Result<(), ConfigError> {
        if env.tables()?.monster(&self.monster_id).is_none() {
            return Err(ConfigError::unknown("monster_id", "monster", &self.monster_id));
        }
        for (field, skill) in [("skill1", &self.skill1), ("skill2", &self.skill2)] {
            if let Some(skill) = skill {
                known_skill(env, field, skill)?;
            }
        }
        Ok(())
    }

    fn use_item(
        &self,
        ctx: &mut UseContext<'_>,
        item: &mut Item,
        _auto: bool,
        _pos: Position,
    ) -> UseResult {
        let def = ctx
            .env
            .tables()?
            .monster(&self.monster_id)
            .ok_or_else(|| UseError::unknown("monster", &self.monster_id))?;
        let name = def.name.clone();
        let target = self.target(ctx, &name)?;

        let scale = SessionConfig::MAX_DAMAGE + 1;
        let hp = (def.hp * (scale - item.damage.max(0)) / scale).max(1);
        let skill = self.skill_offset(ctx);
        let hostile = ctx.rng.range(0, self.difficulty) > ctx.rng.range(0, skill);

        let spawned = ctx.world.spawn_monster(MonsterSpawn {
            kind: self.monster_id.clone(),
            position: target,
            hp,
            friendly: !hostile,
        });
        if !spawned {
            return ctx.precondition(format!("You cannot place a {name} there."));
        }
        if hostile {
            let text = if self.hostile_msg.is_empty() {
                format!("The {name} doesn't recognize you as a friend!")
            } else {
                self.hostile_msg.clone()
            };
            ctx.msg(MessageKind::Bad, &text);
        } else {
            ctx.msg(MessageKind::Good, &self.friendly_msg);
        }
        ctx.agent.mod_moves(-self.moves);
        ctx.consume_item();
        Ok(0)
    }

    fn clone_actor(&self) -> Box<dyn ItemUseActor> {
        Box::new(self.clone())
    }

    fn info(&self, _item: &Item, env: ActorEnv<'_>) -> Vec<ItemInfo> {
        let name = env
            .tables()
            .ok()
            .and_then(|tables| tables.monster(&self.monster_id))
            .map_or_else(|| self.monster_id.to_string(), |def| def.name.clone());
        vec![ItemInfo::new("Deploys", name)]
    }

    fn name(&self) -> String {
        "Deploy".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::kinds::testing::{Harness, actor};
    use crate::agent::Inventory;
    use crate::sandbox::ScriptedRng;
    use crate::state::Tick;

    fn bicycle() -> Box<dyn ItemUseActor> {
        actor(
            "folded_bicycle",
            ConfigRecord::new("unfold_vehicle")
                .with("vehicle_name", "bicycle")
                .with("moves", 500)
                .with(
                    "tools_needed",
                    ConfigRecord::default().with("scissors", 1),
                ),
        )
    }

    #[test]
    fn unfold_requires_tools() {
        let actor = bicycle();
        let mut h = Harness::new();
        let mut folded = Item::new("folded_bicycle", Tick::ZERO);

        assert!(!h.can_use(actor.as_ref(), &folded));
        assert!(matches!(
            h.run(actor.as_ref(), &mut folded),
            Err(UseError::Insufficient(_))
        ));
        assert!(h.world.vehicles.is_empty());
    }

    #[test]
    fn unfold_places_vehicle_and_consumes_item() {
        let actor = bicycle();
        let mut h = Harness::new();
        h.you.add_item(Item::new("scissors", Tick::ZERO));
        let mut folded = Item::new("folded_bicycle", Tick::ZERO);

        assert_eq!(h.run(actor.as_ref(), &mut folded), Ok(0));
        assert_eq!(h.world.vehicles.len(), 1);
        assert_eq!(h.you.moves, -400);
        assert!(h.consumed);
        assert!(h.you.said("unfold the folded bicycle"));
    }

    #[test]
    fn unfold_refuses_underwater() {
        let actor = bicycle();
        let mut h = Harness::new();
        h.you.underwater = true;
        h.you.add_item(Item::new("scissors", Tick::ZERO));
        let mut folded = Item::new("folded_bicycle", Tick::ZERO);

        assert!(matches!(
            h.run(actor.as_ref(), &mut folded),
            Err(UseError::Precondition(_))
        ));
        assert!(!h.consumed);
    }

    fn manhack() -> Box<dyn ItemUseActor> {
        actor(
            "bot_manhack",
            ConfigRecord::new("place_monster")
                .with("monster_id", "mon_manhack")
                .with("difficulty", 4)
                .with("skill1", "mechanics")
                .with("hostile_msg", "It's hostile!"),
        )
    }

    #[test]
    fn friendly_deploy_scales_hp_by_damage() {
        let actor = manhack();
        let mut h = Harness::new().with_rolls([
            ScriptedRng::unit_for(0, 4, 0),
            ScriptedRng::unit_for(0, 4, 4),
        ]);
        let east = Position::new(1, 0, 0);
        h.you.script_direction(east);
        let mut bot = Item::new("bot_manhack", Tick::ZERO).with_damage(2);

        assert_eq!(h.run(actor.as_ref(), &mut bot), Ok(0));
        let spawn = &h.world.monsters[0];
        assert_eq!(spawn.position, east);
        assert!(spawn.friendly);
        assert_eq!(spawn.hp, 6);
        assert!(h.consumed);
    }

    #[test]
    fn hostile_roll_turns_the_bot() {
        let actor = manhack();
        let mut h = Harness::new().with_rolls([
            ScriptedRng::unit_for(0, 4, 4),
            ScriptedRng::unit_for(0, 4, 0),
        ]);
        h.you.script_direction(Position::new(0, 1, 0));
        let mut bot = Item::new("bot_manhack", Tick::ZERO);

        h.run(actor.as_ref(), &mut bot).unwrap();
        assert!(!h.world.monsters[0].friendly);
        assert!(h.you.said("It's hostile!"));
    }

    #[test]
    fn occupied_tile_is_refused() {
        let actor = manhack();
        let mut h = Harness::new();
        let blocked = Position::new(1, 1, 0);
        h.world = h.world.clone().with_move_cost(blocked, 0);
        h.you.script_direction(blocked);
        let mut bot = Item::new("bot_manhack", Tick::ZERO);

        assert!(matches!(
            h.run(actor.as_ref(), &mut bot),
            Err(UseError::Precondition(_))
        ));
        assert!(h.world.monsters.is_empty());
        assert!(!h.consumed);
    }

    #[test]
    fn random_placement_uses_a_free_neighbour() {
        let record = ConfigRecord::new("place_monster")
            .with("monster_id", "mon_wolf")
            .with("place_randomly", true);
        let actor = actor("bot_manhack", record);
        let mut h = Harness::new();
        let mut world = h.world.clone();
        for pos in Position::ORIGIN.neighbors().into_iter().skip(1) {
            world = world.with_move_cost(pos, 0);
        }
        h.world = world;
        let mut bot = Item::new("bot_manhack", Tick::ZERO);

        h.run(actor.as_ref(), &mut bot).unwrap();
        assert_eq!(h.world.monsters[0].position, Position::new(-1, -1, 0));
    }
}
