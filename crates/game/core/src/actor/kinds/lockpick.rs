use std::collections::{BTreeMap, BTreeSet};

use crate::actor::{
    ConfigError, ConfigRecord, ItemInfo, ItemUseActor, UseContext, UseError, UseResult,
};
use crate::agent::{MessageKind, Stat};
use crate::config::SessionConfig;
use crate::env::ActorEnv;
use crate::state::{Item, ItemTypeId, Position, SkillId, TerrainId};

const MECHANICS: &str = "mechanics";
/// Volume of the alarm a botched alarmed lock sets off.
const ALARM_VOLUME: i32 = 40;

/// Opens locked doors and gates.
#[derive(Clone, Debug)]
pub struct PicklockActor {
    pub pick_quality: i32,
    /// Locked terrain and the terrain it opens into.
    pub lock_transitions: BTreeMap<TerrainId, TerrainId>,
    /// Terrain that is already open, for a friendlier message.
    pub unlocked_terrain: BTreeSet<TerrainId>,
    /// Locks that may trip an alarm.
    pub alarm_terrain: BTreeSet<TerrainId>,
}

impl Default for PicklockActor {
    fn default() -> Self {
        let transition = |from: &str, to: &str| (TerrainId::new(from), TerrainId::new(to));
        Self {
            pick_quality: 0,
            lock_transitions: [
                transition("t_door_locked", "t_door_c"),
                transition("t_door_locked_alarm", "t_door_c"),
                transition("t_door_locked_interior", "t_door_c"),
                transition("t_chaingate_l", "t_chaingate_c"),
            ]
            .into_iter()
            .collect(),
            unlocked_terrain: [TerrainId::new("t_door_c"), TerrainId::new("t_chaingate_c")]
                .into_iter()
                .collect(),
            alarm_terrain: [TerrainId::new("t_door_locked_alarm")].into_iter().collect(),
        }
    }
}

impl PicklockActor {
    /// Moves a pick attempt costs; better tools and hands are faster.
    pub fn move_cost(&self, dex: i32, mechanics: i32) -> i32 {
        (1000 - self.pick_quality * 100 - (dex + mechanics) * 5).max(0)
    }
}

impl ItemUseActor for PicklockActor {
    fn type_tag(&self) -> &'static str {
        "picklock"
    }

    fn load(&mut self, record: &ConfigRecord) -> Result<(), ConfigError> {
        self.pick_quality = record.get_i32("pick_quality", 0)?;
        if record.has("lock_transitions") {
            self.lock_transitions = record
                .get_string_map("lock_transitions")?
                .into_iter()
                .map(|(from, to)| (TerrainId::new(from), TerrainId::new(to)))
                .collect();
        }
        if record.has("unlocked_terrain") {
            self.unlocked_terrain = record.get_string_set("unlocked_terrain")?;
        }
        if record.has("alarm_terrain") {
            self.alarm_terrain = record.get_string_set("alarm_terrain")?;
        }
        Ok(())
    }

    fn finalize(&mut self, _item_type: &ItemTypeId, env: ActorEnv<'_>) -> Result<(), ConfigError> {
        let tables = env.tables()?;
        let every = self
            .lock_transitions
            .iter()
            .flat_map(|(from, to)| [from, to])
            .chain(&self.unlocked_terrain)
            .chain(&self.alarm_terrain);
        for terrain in every {
            if tables.terrain(terrain).is_none() {
                return Err(ConfigError::unknown("lock_transitions", "terrain", terrain));
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
        if ctx.agent.is_npc() {
            return ctx.precondition("Picking locks is not something NPCs do.");
        }
        let Some(target) = ctx.agent.choose_direction("Use your lockpick where?") else {
            return ctx.refuse(UseError::Cancelled);
        };
        if target == ctx.agent.position() {
            return ctx.precondition(
                "You pick your nose and your sinuses swing open.  (but nothing happens)",
            );
        }
        let terrain = ctx.world.terrain(target);
        let Some(opened) = self.lock_transitions.get(&terrain) else {
            let text = if self.unlocked_terrain.contains(&terrain) {
                "That door isn't locked."
            } else {
                "That cannot be picked."
            };
            return ctx.precondition(text);
        };

        let mechanics = SkillId::new(MECHANICS);
        let skill = ctx.agent.skill_level(&mechanics);
        let dex = ctx.agent.stat(Stat::Dexterity);
        ctx.agent.practice(&mechanics, 1, SessionConfig::MAX_SKILL_LEVEL);
        ctx.agent.mod_moves(-self.move_cost(dex, skill));

        let pick_roll = (ctx.rng.dice(2, skill) + ctx.rng.dice(2, dex) - item.damage / 2)
            * self.pick_quality;
        let door_roll = ctx.rng.dice(4, 30);

        let mut destroyed = false;
        if door_roll <= pick_roll {
            ctx.world.set_terrain(target, opened.clone());
            ctx.msg(MessageKind::Good, "With a satisfying click, the lock opens.");
        } else if f64::from(door_roll) > 1.5 * f64::from(pick_roll) {
            destroyed = item.mod_damage(1);
            let text = if destroyed {
                format!("The lock stumps your efforts and destroys your {}!", ctx.item_name(item))
            } else {
                format!("The lock stumps your efforts and damages your {}.", ctx.item_name(item))
            };
            ctx.msg(MessageKind::Bad, &text);
        } else {
            ctx.msg(MessageKind::Bad, "The lock stumps your efforts to pick it.");
        }

        if self.alarm_terrain.contains(&terrain) && door_roll + ctx.rng.dice(1, 30) > pick_roll {
            let here = ctx.agent.position();
            ctx.world.sound(here, ALARM_VOLUME, "an alarm sound!");
        }

        if destroyed {
            Ok(0)
        } else {
            Ok(ctx.charges_to_use(item))
        }
    }

    fn can_use(&self, ctx: &UseContext<'_>, _item: &Item, _auto: bool, _pos: Position) -> bool {
        !ctx.agent.is_npc()
    }

    fn clone_actor(&self) -> Box<dyn ItemUseActor> {
        Box::new(self.clone())
    }

    fn info(&self, _item: &Item, _env: ActorEnv<'_>) -> Vec<ItemInfo> {
        vec![ItemInfo::new("Pick quality", self.pick_quality.to_string())]
    }

    fn name(&self) -> String {
        "Pick a lock".to_owned()
    }
}
