//! Fire weapons that must be lit before use: torches, flaming swords,
//! chainsaws.

use crate::actor::{ConfigError, ConfigRecord, ItemUseActor, UseContext, UseResult};
use crate::agent::MessageKind;
use crate::env::ActorEnv;
use crate::state::{Item, ItemTypeId, Position};

use super::known_item;

/// Tries to light the weapon, turning it into its active form.
#[derive(Clone, Debug, Default)]
pub struct FireweaponOffActor {
    pub target_id: ItemTypeId,
    pub success_message: String,
    pub lacks_fuel_message: String,
    pub failure_message: String,
    pub noise: i32,
    pub moves: i32,
    /// Ignition succeeds when `rng(0, 10) - damage` exceeds this.
    pub success_chance: i32,
}

impl ItemUseActor for FireweaponOffActor {
    fn type_tag(&self) -> &'static str {
        "fireweapon_off"
    }

    fn load(&mut self, record: &ConfigRecord) -> Result<(), ConfigError> {
        self.target_id = ItemTypeId::new(record.require_str("target_id")?);
        self.success_message = record.get_string("success_message", "")?;
        self.lacks_fuel_message = record.get_string("lacks_fuel_message", "")?;
        self.failure_message = record.get_string("failure_message", "")?;
        self.noise = record.get_i32("noise", 0)?;
        self.moves = record.get_i32("moves", 0)?;
        self.success_chance = record.get_i32("success_chance", 0)?;
        Ok(())
    }

    fn finalize(&mut self, _item_type: &ItemTypeId, env: ActorEnv<'_>) -> Result<(), ConfigError> {
        known_item(env, "target_id", &self.target_id)
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
            let text = self.lacks_fuel_message.clone();
            return ctx.insufficient(text);
        }
        ctx.agent.mod_moves(-self.moves);
        if ctx.rng.range(0, 10) - item.damage > self.success_chance {
            item.convert(self.target_id.clone());
            item.active = true;
            if self.noise > 0 {
                ctx.world.sound(pos, self.noise, &self.success_message);
            } else {
                ctx.msg(MessageKind::Good, &self.success_message);
            }
        } else {
            ctx.msg(MessageKind::Bad, &self.failure_message);
        }
        Ok(ctx.charges_to_use(item))
    }

    fn can_use(&self, ctx: &UseContext<'_>, item: &Item, _auto: bool, _pos: Position) -> bool {
        ctx.has_enough_charges(item)
    }

    fn clone_actor(&self) -> Box<dyn ItemUseActor> {
        Box::new(self.clone())
    }

    fn name(&self) -> String {
        "Turn on".to_owned()
    }
}

/// Keeps a lit weapon burning and puts it out on demand.
#[derive(Clone, Debug, Default)]
pub struct FireweaponOnActor {
    pub noise_message: String,
    pub voluntary_extinguish_message: String,
    pub charges_extinguish_message: String,
    pub water_extinguish_message: String,
    pub auto_extinguish_message: String,
    pub noise: i32,
    pub noise_chance: i32,
    /// One in this many ticks the weapon goes out on its own; 0 disables.
    pub auto_extinguish_chance: i32,
}

impl ItemUseActor for FireweaponOnActor {
    fn type_tag(&self) -> &'static str {
        "fireweapon_on"
    }

    fn load(&mut self, record: &ConfigRecord) -> Result<(), ConfigError> {
        self.noise_message = record.get_string("noise_message", "")?;
        self.voluntary_extinguish_message =
            record.get_string("voluntary_extinguish_message", "")?;
        self.charges_extinguish_message = record.get_string("charges_extinguish_message", "")?;
        self.water_extinguish_message = record.get_string("water_extinguish_message", "")?;
        self.auto_extinguish_message = record.get_string("auto_extinguish_message", "")?;
        self.noise = record.get_i32("noise", 0)?;
        self.noise_chance = record.get_i32("noise_chance", 0)?;
        self.auto_extinguish_chance = record.get_i32("auto_extinguish_chance", 0)?;
        Ok(())
    }

    fn use_item(
        &self,
        ctx: &mut UseContext<'_>,
        item: &mut Item,
        auto: bool,
        pos: Position,
    ) -> UseResult {
        let extinguish = if !ctx.has_enough_charges(item) {
            Some((MessageKind::Bad, &self.charges_extinguish_message))
        } else if ctx.agent.is_underwater() {
            Some((MessageKind::Bad, &self.water_extinguish_message))
        } else if self.auto_extinguish_chance > 0 && ctx.rng.one_in(self.auto_extinguish_chance)
        {
            Some((MessageKind::Bad, &self.auto_extinguish_message))
        } else if !auto {
            Some((MessageKind::Info, &self.voluntary_extinguish_message))
        } else {
            None
        };

        match extinguish {
            Some((kind, text)) => {
                let revert = ctx.env.item_type(&item.type_id)?.revert_to.clone();
                if let Some(revert) = revert {
                    item.convert(revert);
                }
                item.active = false;
                ctx.msg(kind, text);
            }
            None => {
                if self.noise_chance > 0 && ctx.rng.one_in(self.noise_chance) {
                    if self.noise > 0 {
                        ctx.world.sound(pos, self.noise, &self.noise_message);
                    } else {
                        ctx.msg(MessageKind::Info, &self.noise_message);
                    }
                }
            }
        }
        Ok(ctx.charges_to_use(item))
    }

    fn clone_actor(&self) -> Box<dyn ItemUseActor> {
        Box::new(self.clone())
    }

    fn name(&self) -> String {
        "Turn off".to_owned()
    }
}
