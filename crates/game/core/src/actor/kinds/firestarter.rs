use crate::actor::{
    ConfigError, ConfigRecord, ItemInfo, ItemUseActor, UseContext, UseError, UseResult,
};
use crate::agent::MessageKind;
use crate::config::SessionConfig;
use crate::env::ActorEnv;
use crate::state::{Item, Position, SkillId};
use crate::world::TileMap;

const SURVIVAL: &str = "survival";
/// Natural light below this is too dim to focus sunlight.
const MIN_FOCUS_LIGHT: f32 = 60.0;
/// Attempts longer than this ask for confirmation first.
const CONFIRM_MOVES: i32 = 6000;

/// Lights a fire on an adjacent tile.
///
/// The base cost slides between `moves_cost_fast` (perfect tinder) and
/// `moves_cost_slow` (barely burnable), then scales with survival skill and,
/// for sun-focused tools, with how bright it is.
#[derive(Clone, Debug)]
pub struct FirestarterActor {
    pub moves_cost_fast: i32,
    pub moves_cost_slow: i32,
    pub need_sunlight: bool,
}

impl Default for FirestarterActor {
    fn default() -> Self {
        Self {
            moves_cost_fast: 100,
            moves_cost_slow: 1000,
            need_sunlight: false,
        }
    }
}

impl FirestarterActor {
    /// Light multiplier in `[0, 1]`; 0 makes the tool unusable.
    pub fn light_mod(&self, map: &dyn TileMap, pos: Position) -> f32 {
        if !self.need_sunlight {
            return 1.0;
        }
        let light = map.natural_light_level(pos.z);
        if !map.is_in_sunlight(pos) || light < MIN_FOCUS_LIGHT {
            return 0.0;
        }
        ((light / 100.0) * (light / 100.0)).clamp(0.0, 1.0)
    }

    /// Base move cost from the tile's fuel quality, between the fast and slow
    /// bounds.
    pub fn moves_cost_by_fuel(&self, map: &dyn TileMap, pos: Position) -> i32 {
        let quality = i64::from(map.fuel_quality(pos).min(100));
        let fast = i64::from(self.moves_cost_fast);
        let slow = i64::from(self.moves_cost_slow);
        let cost = (slow + (fast - slow) * quality / 100).clamp(fast, slow);
        // Clamped between two i32 bounds, so the conversion cannot fail.
        i32::try_from(cost).unwrap_or(self.moves_cost_slow)
    }

    /// Full cost for an agent with the given survival level, or `None` when
    /// the light is too poor.
    pub fn attempt_cost(&self, map: &dyn TileMap, pos: Position, survival: i32) -> Option<i32> {
        let light = self.light_mod(map, pos);
        if light <= 0.0 {
            return None;
        }
        let base = self.moves_cost_by_fuel(map, pos) as f64;
        let skill_mod = 0.8_f64.powi(survival.clamp(0, 5));
        let min_moves = base.min((1.0 + base / 100.0).sqrt() * 100.0);
        let cost = (base * skill_mod).max(min_moves) / f64::from(light);
        Some(cost.round() as i32)
    }

    fn has_fire_source(map: &dyn TileMap, pos: Position) -> bool {
        map.fuel_quality(pos) > 0 || map.has_flag("FLAMMABLE", pos)
    }
}

impl ItemUseActor for FirestarterActor {
    fn type_tag(&self) -> &'static str {
        "firestarter"
    }

    fn load(&mut self, record: &ConfigRecord) -> Result<(), ConfigError> {
        self.moves_cost_fast = record.get_i32("moves", self.moves_cost_fast)?;
        self.moves_cost_slow = record.get_i32("moves_slow", self.moves_cost_fast.saturating_mul(10))?;
        if self.moves_cost_slow < self.moves_cost_fast {
            return Err(ConfigError::invalid("moves_slow", "at least `moves`"));
        }
        self.need_sunlight = record.get_bool("need_sunlight", false)?;
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
        if !ctx.has_enough_charges(item) {
            let text = format!("Your {} is out of fuel.", ctx.item_name(item));
            return ctx.insufficient(text);
        }
        let Some(target) = ctx.agent.choose_direction("Light where?") else {
            return ctx.refuse(UseError::Cancelled);
        };
        if target == ctx.agent.position() {
            return ctx.precondition("You would set yourself on fire.");
        }
        if !Self::has_fire_source(&*ctx.world, target) {
            return ctx.precondition("There's nothing to light there.");
        }

        let survival = SkillId::new(SURVIVAL);
        let level = ctx.agent.skill_level(&survival);
        let Some(cost) = self.attempt_cost(&*ctx.world, target, level) else {
            return ctx.precondition("You need direct sunlight to light a fire with this.");
        };
        if cost > CONFIRM_MOVES {
            let turns = cost / SessionConfig::DEFAULT_TURN_MOVES;
            let question = format!("Lighting a fire here may take {turns} turns. Continue?");
            if !ctx.agent.query_yn(&question) {
                return ctx.refuse(UseError::Cancelled);
            }
        }

        ctx.agent.mod_moves(-cost);
        if !ctx.world.ignite(target) {
            return ctx.failed("You fail to light a fire.");
        }
        ctx.msg(MessageKind::Good, "You successfully light a fire.");
        ctx.agent.practice(&survival, 5, SessionConfig::MAX_SKILL_LEVEL);
        Ok(ctx.charges_to_use(item))
    }

    fn can_use(&self, ctx: &UseContext<'_>, item: &Item, _auto: bool, pos: Position) -> bool {
        !ctx.agent.is_underwater()
            && ctx.has_enough_charges(item)
            && self.light_mod(&*ctx.world, pos) > 0.0
    }

    fn clone_actor(&self) -> Box<dyn ItemUseActor> {
        Box::new(self.clone())
    }

    fn info(&self, _item: &Item, _env: ActorEnv<'_>) -> Vec<ItemInfo> {
        let mut lines = vec![ItemInfo::new(
            "Lights fires in",
            format!("{} to {} moves", self.moves_cost_fast, self.moves_cost_slow),
        )];
        if self.need_sunlight {
            lines.push(ItemInfo::new("Requires", "bright sunlight"));
        }
        lines
    }

    fn name(&self) -> String {
        "Light fire".to_owned()
    }
}
