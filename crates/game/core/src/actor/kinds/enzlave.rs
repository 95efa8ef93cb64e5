use crate::actor::{ConfigError, ConfigRecord, ItemUseActor, UseContext, UseError, UseResult};
use crate::agent::{Activity, MessageKind, Stat};
use crate::env::ActorEnv;
use crate::state::{Item, Position, SkillId};
use crate::world::TileMap;

const SURVIVAL: &str = "survival";
const FIRSTAID: &str = "firstaid";
/// Item var marking a corpse already turned into a slave.
const ZLAVE_VAR: &str = "zlave";
const MUTILATE_MORALE: &str = "mutilate_corpse";

/// Morale tolerance for mutilating a corpse; lower is more callous.
fn tolerance_level(ctx: &UseContext<'_>) -> i32 {
    let agent = &*ctx.agent;
    if agent.has_trait("PSYCHOPATH") || agent.has_trait("SAPIOVORE") {
        0
    } else if agent.has_trait("PRED4") {
        5
    } else if agent.has_trait("PRED3") {
        7
    } else {
        9
    }
}

/// Butchers a downed human zombie into a docile zombie slave.
///
/// The actual work is handed to the agent as an [`Activity::MakeZlave`].
#[derive(Clone, Debug, Default)]
pub struct EnzlaveActor;

impl EnzlaveActor {
    /// Indices of the ground items at `pos` that can become slaves.
    pub fn corpses(env: ActorEnv<'_>, map: &dyn TileMap, pos: Position) -> Vec<usize> {
        let Ok(tables) = env.tables() else {
            return Vec::new();
        };
        map.ground_items(pos)
            .iter()
            .enumerate()
            .filter(|(_, item)| {
                let qualifies = item
                    .corpse
                    .as_ref()
                    .and_then(|monster| tables.monster(monster))
                    .is_some_and(|def| def.in_species("ZOMBIE") && def.in_species("HUMAN"));
                qualifies && item.var(ZLAVE_VAR) != Some(ZLAVE_VAR)
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// Work needed to turn `corpse` into a slave.
    pub fn difficulty(env: ActorEnv<'_>, corpse: &Item) -> i32 {
        let def = corpse
            .corpse
            .as_ref()
            .and_then(|monster| env.tables().ok()?.monster(monster));
        let (hp, threat) = def.map_or((0, 0), |def| (def.hp, def.difficulty));
        corpse.damage * 5 + hp / 10 + threat
    }

    fn apply_guilt(ctx: &mut UseContext<'_>, tolerance: i32) {
        if tolerance == 0 {
            return;
        }
        if tolerance <= 5 {
            ctx.msg(
                MessageKind::Neutral,
                "Well, it's more humane than just letting them wander around.",
            );
            return;
        }
        ctx.msg(
            MessageKind::Bad,
            "You feel horrible for mutilating and enslaving someone's corpse.",
        );
        let survival = ctx.agent.skill_level(&SkillId::new(SURVIVAL)).max(1);
        let scale = 5.0 / survival as f32;
        let mut malus = (-50.0 * scale) as i32;
        let mut max_malus = (-250.0 * scale) as i32;
        let duration = (300.0 * scale) as u32;
        if ctx.agent.has_trait("PACIFIST") {
            malus *= 5;
            max_malus *= 3;
        } else if ctx.agent.has_trait("PRED1") {
            malus /= 4;
        } else if ctx.agent.has_trait("PRED2") {
            malus /= 5;
        }
        ctx.agent.add_morale(MUTILATE_MORALE, malus, max_malus, duration);
    }
}

impl ItemUseActor for EnzlaveActor {
    fn type_tag(&self) -> &'static str {
        "enzlave"
    }

    fn cost(&self) -> Option<u32> {
        Some(0)
    }

    fn load(&mut self, _record: &ConfigRecord) -> Result<(), ConfigError> {
        Ok(())
    }

    fn use_item(
        &self,
        ctx: &mut UseContext<'_>,
        _item: &mut Item,
        _auto: bool,
        _pos: Position,
    ) -> UseResult {
        let here = ctx.agent.position();
        let corpses = Self::corpses(ctx.env, &*ctx.world, here);
        if corpses.is_empty() {
            return ctx.precondition("No suitable corpses");
        }

        let tolerance = tolerance_level(ctx);
        let survival = SkillId::new(SURVIVAL);
        let bar = 15 * (tolerance - ctx.agent.skill_level(&survival)) - 150;
        if ctx.agent.morale_level() <= bar {
            return ctx.precondition(
                "The prospect of cutting up the corpse and letting it rise again as a slave is too much for you to deal with right now.",
            );
        }

        let names: Vec<String> = corpses
            .iter()
            .filter_map(|index| ctx.world.ground_items(here).get(*index))
            .map(|corpse| ctx.item_name(corpse))
            .collect();
        let Some(choice) = ctx.agent.choose_option(
            "Selectively butcher the downed zombie into a zombie slave?",
            &names,
        ) else {
            ctx.msg(MessageKind::Neutral, "Make love, not zlave.");
            return Err(UseError::Cancelled);
        };
        let Some(&corpse_index) = corpses.get(choice) else {
            return ctx.refuse(UseError::Cancelled);
        };
        let Some(body) = ctx.world.ground_items(here).get(corpse_index) else {
            return Err(UseError::unknown("corpse", corpse_index));
        };
        let difficulty = Self::difficulty(ctx.env, body);

        Self::apply_guilt(ctx, tolerance);

        let firstaid = ctx.agent.skill_level(&SkillId::new(FIRSTAID));
        let skills = 2
            * (ctx.agent.skill_level(&survival) + firstaid + ctx.agent.stat(Stat::Dexterity) / 2);
        let success = ctx.rng.range(0, skills) - ctx.rng.range(0, difficulty);
        let moves = difficulty * 1200 / firstaid.max(1);
        tracing::debug!(difficulty, skills, success, moves, "zombie slave attempt");

        ctx.agent.assign_activity(Activity::MakeZlave {
            moves,
            success,
            corpse_position: here,
            corpse_index,
        });
        Ok(0)
    }

    fn can_use(&self, ctx: &UseContext<'_>, _item: &Item, _auto: bool, _pos: Position) -> bool {
        !Self::corpses(ctx.env, &*ctx.world, ctx.agent.position()).is_empty()
    }

    fn clone_actor(&self) -> Box<dyn ItemUseActor> {
        Box::new(self.clone())
    }

    fn name(&self) -> String {
        "Make a zombie slave".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::kinds::testing::Harness;
    use crate::sandbox::{SandboxCharacter, SandboxWorld, ScriptedRng};
    use crate::state::Tick;

    fn with_corpses(corpses: &[Item]) -> Harness {
        let mut h = Harness::new();
        let mut world = SandboxWorld::new();
        for corpse in corpses {
            world = world.with_ground_item(Position::ORIGIN, corpse.clone());
        }
        h.world = world;
        h.you = SandboxCharacter::player().with_skill(FIRSTAID, 2);
        h
    }

    fn zombie() -> Item {
        Item::corpse_of("mon_zombie", Tick::ZERO)
    }

    #[test]
    fn only_unclaimed_human_zombies_qualify() {
        let mut claimed = zombie();
        claimed.set_var(ZLAVE_VAR, ZLAVE_VAR);
        let h = with_corpses(&[
            Item::corpse_of("mon_wolf", Tick::ZERO),
            claimed,
            zombie(),
        ]);
        let corpses = EnzlaveActor::corpses(h.content.env(), &h.world, Position::ORIGIN);
        assert_eq!(corpses, vec![2]);
    }

    #[test]
    fn nothing_to_work_on() {
        let mut h = with_corpses(&[Item::corpse_of("mon_wolf", Tick::ZERO)]);
        let mut scalpel = Item::new("knife_butcher", Tick::ZERO);
        assert!(!h.can_use(&EnzlaveActor, &scalpel));
        assert!(matches!(
            h.run(&EnzlaveActor, &mut scalpel),
            Err(UseError::Precondition(_))
        ));
        assert!(h.you.activity.is_none());
    }

    #[test]
    fn starts_the_butchering_activity() {
        let mut h = with_corpses(&[zombie()]).with_rolls([
            ScriptedRng::unit_for(0, 12, 10),
            ScriptedRng::unit_for(0, 11, 3),
        ]);
        h.you.script_option(0);
        let mut scalpel = Item::new("knife_butcher", Tick::ZERO);

        assert_eq!(h.run(&EnzlaveActor, &mut scalpel), Ok(0));
        assert_eq!(
            h.you.activity,
            Some(Activity::MakeZlave {
                moves: 11 * 1200 / 2,
                success: 7,
                corpse_position: Position::ORIGIN,
                corpse_index: 0,
            })
        );
        assert_eq!(h.you.morale, -250);
        assert!(h.you.said("You feel horrible"));
    }

    #[test]
    fn psychopaths_feel_nothing() {
        let mut h = with_corpses(&[zombie()]);
        h.you.traits.insert("PSYCHOPATH".to_owned());
        h.you.script_option(0);
        let mut scalpel = Item::new("knife_butcher", Tick::ZERO);

        assert_eq!(h.run(&EnzlaveActor, &mut scalpel), Ok(0));
        assert_eq!(h.you.morale, 0);
        assert!(h.you.messages.is_empty());
    }

    #[test]
    fn low_morale_refuses() {
        let mut h = with_corpses(&[zombie()]);
        h.you.morale = -20;
        let mut scalpel = Item::new("knife_butcher", Tick::ZERO);
        assert!(matches!(
            h.run(&EnzlaveActor, &mut scalpel),
            Err(UseError::Precondition(_))
        ));
        assert!(h.you.questions.is_empty());
    }

    #[test]
    fn backing_out_leaves_the_corpse() {
        let mut h = with_corpses(&[zombie()]);
        let mut scalpel = Item::new("knife_butcher", Tick::ZERO);
        assert_eq!(h.run(&EnzlaveActor, &mut scalpel), Err(UseError::Cancelled));
        assert!(h.you.said("Make love, not zlave."));
        assert!(h.you.activity.is_none());
    }
}
