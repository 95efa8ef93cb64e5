use std::collections::{BTreeMap, BTreeSet};

use crate::actor::{
    ConfigError, ConfigRecord, ItemInfo, ItemUseActor, UseContext, UseError, UseResult,
};
use crate::agent::{MessageKind, Stat};
use crate::config::SessionConfig;
use crate::env::ActorEnv;
use crate::state::{Item, ItemId, ItemTypeId, MaterialId, Position, SkillId};

const FABRICATION: &str = "fabrication";
const FILTHY: &str = "FILTHY";

fn default_whitelist() -> BTreeSet<MaterialId> {
    [
        "cotton", "leather", "fur", "nomex", "kevlar", "plastic", "wood", "wool", "neoprene",
    ]
    .into_iter()
    .map(MaterialId::new)
    .collect()
}

/// Cuts soft items into their raw materials.
#[derive(Clone, Debug)]
pub struct SalvageActor {
    /// Moves per volume unit of the item being cut.
    pub moves_per_part: i32,
    pub material_whitelist: BTreeSet<MaterialId>,
}

impl Default for SalvageActor {
    fn default() -> Self {
        Self {
            moves_per_part: 25,
            material_whitelist: default_whitelist(),
        }
    }
}

impl SalvageActor {
    /// Why `item` cannot be cut up, if it cannot.
    fn refusal(&self, env: ActorEnv<'_>, item: &Item) -> Option<String> {
        let name = env.item_name(&item.type_id);
        let Ok(ty) = env.item_type(&item.type_id) else {
            return Some(format!("You can't cut up the {name}."));
        };
        let salvageable = env.items().is_ok_and(|items| {
            ty.materials
                .iter()
                .any(|m| items.material(m).is_some_and(|m| m.salvaged_into.is_some()))
        });
        if !salvageable {
            return Some(format!("Can't salvage anything from the {name}."));
        }
        if !ty.materials.iter().all(|m| self.material_whitelist.contains(m)) {
            return Some(format!("The {name} is made of material that cannot be cut up."));
        }
        if !item.contents.is_empty() {
            return Some(format!("Please empty the {name} before cutting it up."));
        }
        if item.volume(ty) == 0 {
            return Some(format!("The {name} is too small to salvage material from."));
        }
        None
    }

    pub fn valid_to_cut_up(&self, env: ActorEnv<'_>, item: &Item) -> bool {
        self.refusal(env, item).is_none()
    }

    /// Checks the carried item `target` and confirms cutting anything the
    /// agent is wielding or wearing.
    pub fn try_to_cut_up(&self, ctx: &mut UseContext<'_>, target: ItemId) -> Result<(), UseError> {
        let Some(item) = ctx.agent.item(target) else {
            return ctx.precondition("You do not have that item.");
        };
        if let Some(text) = self.refusal(ctx.env, item) {
            return ctx.precondition(text);
        }
        let question = if ctx.agent.wielded() == Some(target) {
            Some("You are wielding that, are you sure?")
        } else if ctx.agent.is_worn(target) {
            Some("You're wearing that, are you sure?")
        } else {
            None
        };
        match question {
            Some(question) if !ctx.agent.query_yn(question) => ctx.refuse(UseError::Cancelled),
            _ => Ok(()),
        }
    }

    /// Destroys `cut` and hands its materials to the agent. Returns what was
    /// recovered per item type.
    pub fn cut_up(
        &self,
        ctx: &mut UseContext<'_>,
        cut: Item,
    ) -> Result<BTreeMap<ItemTypeId, i32>, UseError> {
        let ty = ctx.env.item_type(&cut.type_id)?;
        let items = ctx.env.items()?;
        let fabrication = SkillId::new(FABRICATION);

        let mut count = SessionConfig::volume_units(cut.volume(ty)) as i32;
        ctx.agent.mod_moves(-self.moves_per_part * count);
        let practice = ctx.rng.range(0, 5);
        ctx.agent.practice(&fabrication, practice, 1);

        let entropy_threshold = (10 - ctx.agent.skill_level(&fabrication)).max(5);
        if ctx.rng.range(1, 10) <= entropy_threshold {
            count -= 1;
        }
        if ctx.rng.dice(3, 4) > ctx.agent.stat(Stat::Dexterity) {
            count -= ctx.rng.range(0, 2);
        }
        if count > 0 && cut.damage > 0 {
            let keep_chance = 0.8_f32.powi(cut.damage).min(1.0);
            for _ in 0..count {
                if keep_chance < ctx.rng.range_f32(0.0, 1.0) {
                    count -= 1;
                }
            }
        }
        tracing::debug!(item = %cut.type_id, count, "salvage yield");

        let share = count.max(0) / ty.materials.len().max(1) as i32;
        let mut salvaged: BTreeMap<ItemTypeId, i32> = BTreeMap::new();
        for material in &ty.materials {
            if let Some(result) = items.material(material).and_then(|m| m.salvaged_into.clone()) {
                *salvaged.entry(result).or_default() += share;
            }
        }

        let cut_name = ctx.item_name(&cut);
        ctx.msg(
            MessageKind::Info,
            &format!("You try to salvage materials from the {cut_name}."),
        );
        let filthy = cut.flags.contains(FILTHY);
        for (result, amount) in &salvaged {
            let name = ctx.env.item_name(result);
            if *amount <= 0 {
                ctx.msg(MessageKind::Bad, &format!("Could not salvage a {name}."));
                continue;
            }
            ctx.msg(MessageKind::Good, &format!("Salvaged {amount} {name}."));
            let stacked = ctx.env.item_type(result).is_ok_and(|t| t.count_by_charges);
            let mut piece = Item::new(result.clone(), ctx.turn);
            if filthy {
                piece.set_flag(FILTHY);
            }
            if stacked {
                ctx.agent.add_item(piece.with_charges(i64::from(*amount)));
            } else {
                for _ in 0..*amount {
                    ctx.agent.add_item(piece.clone());
                }
            }
        }
        Ok(salvaged)
    }
}

impl ItemUseActor for SalvageActor {
    fn type_tag(&self) -> &'static str {
        "salvage"
    }

    fn cost(&self) -> Option<u32> {
        Some(0)
    }

    fn load(&mut self, record: &ConfigRecord) -> Result<(), ConfigError> {
        self.moves_per_part = record.get_i32("moves_per_part", 25)?;
        if record.has("material_whitelist") {
            self.material_whitelist = record.get_string_set("material_whitelist")?;
        }
        Ok(())
    }

    fn use_item(
        &self,
        ctx: &mut UseContext<'_>,
        _item: &mut Item,
        auto: bool,
        _pos: Position,
    ) -> UseResult {
        if auto {
            return Ok(0);
        }
        let candidates: Vec<ItemId> = ctx
            .agent
            .item_ids()
            .into_iter()
            .filter(|id| Some(*id) != ctx.source.id)
            .filter(|id| {
                ctx.agent
                    .item(*id)
                    .is_some_and(|item| self.valid_to_cut_up(ctx.env, item))
            })
            .collect();
        if candidates.is_empty() {
            return ctx.precondition("You have nothing you could cut up.");
        }
        let Some(target) = ctx.agent.choose_item("Cut up what?", &candidates) else {
            return ctx.refuse(UseError::Cancelled);
        };
        self.try_to_cut_up(ctx, target)?;
        let Some(cut) = ctx.agent.take_item(target) else {
            return Err(UseError::unknown("item", target.0));
        };
        self.cut_up(ctx, cut)?;
        Ok(0)
    }

    fn clone_actor(&self) -> Box<dyn ItemUseActor> {
        Box::new(self.clone())
    }

    fn info(&self, _item: &Item, _env: ActorEnv<'_>) -> Vec<ItemInfo> {
        let materials: Vec<&str> = self.material_whitelist.iter().map(MaterialId::as_str).collect();
        vec![ItemInfo::new("Cuts up", materials.join(", "))]
    }

    fn name(&self) -> String {
        "Cut up".to_owned()
    }
}
