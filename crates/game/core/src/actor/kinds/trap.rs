use crate::actor::{
    ConfigError, ConfigRecord, ItemInfo, ItemUseActor, UseContext, UseError, UseResult,
};
use crate::agent::MessageKind;
use crate::config::SessionConfig;
use crate::env::ActorEnv;
use crate::state::{Item, ItemTypeId, Position, QualityId, SkillId, TerrainId, TrapId};

const TRAPS: &str = "traps";
const DIG: &str = "DIG";
const DIGGABLE: &str = "DIGGABLE";
/// Digging quality needed to bury a trap.
const BURY_QUALITY: i32 = 3;

/// How one variant of a trap (buried or not) gets placed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrapPlacementData {
    pub trap: TrapId,
    pub done_message: String,
    /// Experience granted in the traps skill.
    pub practice: i32,
    pub moves: i32,
}

impl Default for TrapPlacementData {
    fn default() -> Self {
        Self {
            trap: TrapId::default(),
            done_message: String::new(),
            practice: 0,
            moves: 100,
        }
    }
}

impl TrapPlacementData {
    fn load(record: &ConfigRecord) -> Result<Self, ConfigError> {
        Ok(Self {
            trap: TrapId::new(record.require_str("trap")?),
            done_message: record.get_string("done_message", "")?,
            practice: record.get_i32("practice", 0)?,
            moves: record.get_i32("moves", 100)?,
        })
    }
}

/// Sets a trap kit on an adjacent tile, optionally burying it.
#[derive(Clone, Debug, Default)]
pub struct PlaceTrapActor {
    pub allow_underwater: bool,
    pub allow_under_player: bool,
    /// Needs an impassable tile next to the target.
    pub needs_solid_neighbor: bool,
    /// Needs this terrain next to the target.
    pub needs_neighbor_terrain: Option<TerrainId>,
    /// Ring placed around an unburied trap, turning it into a 3x3 trap.
    pub outer_layer_trap: Option<TrapId>,
    pub bury_question: String,
    pub unburied: TrapPlacementData,
    pub buried: TrapPlacementData,
}

impl PlaceTrapActor {
    fn can_bury(&self) -> bool {
        !self.bury_question.is_empty() && self.buried != self.unburied
    }

    /// Why the kit `name` cannot go on `pos`, if it cannot. Ignores traps
    /// already on the tile.
    pub fn placement_refusal(&self, ctx: &UseContext<'_>, pos: Position, name: &str) -> Option<String> {
        if !self.allow_underwater && ctx.agent.is_underwater() {
            return Some("You can't do that while underwater.".to_owned());
        }
        if !self.allow_under_player && pos == ctx.agent.position() {
            return Some(format!(
                "Yeah.  Place the {name} at your feet.  Real damn smart move."
            ));
        }
        if ctx.world.move_cost(pos) <= 0 {
            return Some(format!("You can't place a {name} there."));
        }
        let neighbors = pos.neighbors();
        if self.needs_solid_neighbor && !neighbors.iter().any(|n| ctx.world.move_cost(*n) == 0) {
            return Some(format!("You must place the {name} between two solid tiles."));
        }
        if let Some(terrain) = &self.needs_neighbor_terrain
            && !neighbors.iter().any(|n| &ctx.world.terrain(*n) == terrain)
        {
            let terrain_name = ctx
                .env
                .tables()
                .ok()
                .and_then(|tables| tables.terrain(terrain))
                .map_or_else(|| terrain.to_string(), |def| def.name.clone());
            return Some(format!("The {name} needs a {terrain_name} adjacent to it."));
        }
        None
    }

    /// Checks `pos` and springs any hidden trap already there.
    pub fn is_allowed(&self, ctx: &mut UseContext<'_>, pos: Position, name: &str) -> Result<(), UseError> {
        if let Some(text) = self.placement_refusal(ctx, pos, name) {
            return ctx.precondition(text);
        }
        let Some(existing) = ctx.world.trap_at(pos) else {
            return Ok(());
        };
        let observer = ctx.agent.id();
        if ctx.world.trap_visible(pos, observer) {
            return ctx.precondition(format!(
                "You can't place a {name} there.  It contains a trap already."
            ));
        }
        let trap_name = trap_name(ctx.env, &existing);
        ctx.world.trigger_trap(pos, observer);
        tracing::debug!(%pos, trap = %existing, "hidden trap sprung while placing");
        ctx.refuse(UseError::Failed(format!("You trigger a {trap_name}!")))
    }
}

fn trap_name(env: ActorEnv<'_>, id: &TrapId) -> String {
    env.tables()
        .ok()
        .and_then(|tables| tables.trap(id))
        .map_or_else(|| id.to_string(), |def| def.name.clone())
}

impl ItemUseActor for PlaceTrapActor {
    fn type_tag(&self) -> &'static str {
        "place_trap"
    }

    fn load(&mut self, record: &ConfigRecord) -> Result<(), ConfigError> {
        self.allow_underwater = record.get_bool("allow_underwater", false)?;
        self.allow_under_player = record.get_bool("allow_under_player", false)?;
        self.needs_solid_neighbor = record.get_bool("needs_solid_neighbor", false)?;
        self.needs_neighbor_terrain = record
            .has("needs_neighbor_terrain")
            .then(|| record.require_str("needs_neighbor_terrain").map(TerrainId::new))
            .transpose()?;
        self.outer_layer_trap = record
            .has("outer_layer_trap")
            .then(|| record.require_str("outer_layer_trap").map(TrapId::new))
            .transpose()?;
        self.unburied = TrapPlacementData::load(record)?;
        self.buried = match record.get_record("bury")? {
            Some(bury) => {
                self.bury_question = record.require_str("bury_question")?;
                TrapPlacementData::load(&bury)?
            }
            None => self.unburied.clone(),
        };
        Ok(())
    }

    fn finalize(&mut self, _item_type: &ItemTypeId, env: ActorEnv<'_>) -> Result<(), ConfigError> {
        let tables = env.tables()?;
        let traps = [Some(&self.unburied.trap), Some(&self.buried.trap), self.outer_layer_trap.as_ref()];
        for trap in traps.into_iter().flatten() {
            if tables.trap(trap).is_none() {
                return Err(ConfigError::unknown("trap", "trap", trap));
            }
        }
        if let Some(terrain) = &self.needs_neighbor_terrain
            && tables.terrain(terrain).is_none()
        {
            return Err(ConfigError::unknown("needs_neighbor_terrain", "terrain", terrain));
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
        if !self.allow_underwater && ctx.agent.is_underwater() {
            return ctx.precondition("You can't do that while underwater.");
        }
        let name = ctx.item_name(item);
        let Some(target) = ctx.agent.choose_direction(&format!("Place {name} where?")) else {
            return ctx.refuse(UseError::Cancelled);
        };
        self.is_allowed(ctx, target, &name)?;

        let bury = self.can_bury()
            && ctx.world.has_flag(DIGGABLE, target)
            && ctx.agent.max_quality(&QualityId::new(DIG)) >= BURY_QUALITY
            && ctx.agent.query_yn(&self.bury_question);
        let data = if bury { &self.buried } else { &self.unburied };

        // A ring trap is centered one step further out so the ring clears the agent.
        let ring = self.outer_layer_trap.as_ref().filter(|_| !bury);
        let center = match ring {
            Some(_) => {
                let here = ctx.agent.position();
                let center = target.offset(target.x - here.x, target.y - here.y);
                self.is_allowed(ctx, center, &name)?;
                center
            }
            None => target,
        };

        ctx.agent.mod_moves(-data.moves);
        ctx.agent.practice(&SkillId::new(TRAPS), data.practice, SessionConfig::MAX_SKILL_LEVEL);
        ctx.world.set_trap(center, data.trap.clone());
        if let Some(outer) = ring {
            for tile in center.neighbors() {
                if ctx.world.move_cost(tile) > 0 && ctx.world.trap_at(tile).is_none() {
                    ctx.world.set_trap(tile, outer.clone());
                }
            }
        }
        tracing::debug!(%center, trap = %data.trap, bury, "trap placed");
        ctx.msg(MessageKind::Neutral, &data.done_message);
        ctx.consume_item();
        Ok(0)
    }

    fn can_use(&self, ctx: &UseContext<'_>, _item: &Item, _auto: bool, _pos: Position) -> bool {
        self.allow_underwater || !ctx.agent.is_underwater()
    }

    fn clone_actor(&self) -> Box<dyn ItemUseActor> {
        Box::new(self.clone())
    }

    fn info(&self, _item: &Item, env: ActorEnv<'_>) -> Vec<ItemInfo> {
        let mut lines = vec![ItemInfo::new("Sets", trap_name(env, &self.unburied.trap))];
        if self.can_bury() {
            lines.push(ItemInfo::new("Buried", trap_name(env, &self.buried.trap)));
        }
        lines
    }

    fn name(&self) -> String {
        "Place trap".to_owned()
    }
}
