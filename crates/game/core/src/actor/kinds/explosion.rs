use crate::actor::{ConfigError, ConfigRecord, ItemInfo, ItemUseActor, UseContext, UseResult};
use crate::agent::MessageKind;
use crate::env::ActorEnv;
use crate::state::{FieldId, Item, ItemTypeId, Position};
use crate::world::{ExplosionData, ShrapnelData};

/// Blows the item up: explosion, flashbang, fields, EMP and scrambler blasts.
///
/// Armed items tick through the active-item path with `auto` set; that only
/// plays the fuse sound. The blast itself runs on a manual call once the item
/// has no charges left.
#[derive(Clone, Debug)]
pub struct ExplosionActor {
    pub explosion: ExplosionData,
    pub flashbang: bool,
    pub flashbang_player_immune: bool,
    /// Negative disables field spawning.
    pub fields_radius: i32,
    pub fields_type: Option<FieldId>,
    pub fields_min_intensity: i32,
    pub fields_max_intensity: i32,
    pub emp_blast_radius: i32,
    pub scrambler_blast_radius: i32,
    pub sound_volume: i32,
    pub sound_msg: String,
    pub no_deactivate_msg: String,
}

impl Default for ExplosionActor {
    fn default() -> Self {
        Self {
            explosion: ExplosionData::default(),
            flashbang: false,
            flashbang_player_immune: false,
            fields_radius: -1,
            fields_type: None,
            fields_min_intensity: 1,
            fields_max_intensity: 3,
            emp_blast_radius: -1,
            scrambler_blast_radius: -1,
            sound_volume: -1,
            sound_msg: String::new(),
            no_deactivate_msg: String::new(),
        }
    }
}

fn load_explosion(record: &ConfigRecord) -> Result<ExplosionData, ConfigError> {
    let defaults = ExplosionData::default();
    let shrapnel = match record.get_record("shrapnel")? {
        Some(shrapnel) => ShrapnelData {
            count: shrapnel.get_i32("count", 0)?,
            mass: shrapnel.get_i32("mass", 0)?,
        },
        None => ShrapnelData::default(),
    };
    Ok(ExplosionData {
        power: record.get_float("power", defaults.power)?,
        distance_factor: record.get_float("distance_factor", defaults.distance_factor)?,
        fire: record.get_bool("fire", defaults.fire)?,
        shrapnel,
    })
}

impl ItemUseActor for ExplosionActor {
    fn type_tag(&self) -> &'static str {
        "explosion"
    }

    fn load(&mut self, record: &ConfigRecord) -> Result<(), ConfigError> {
        if let Some(explosion) = record.get_record("explosion")? {
            self.explosion = load_explosion(&explosion)?;
        }
        self.flashbang = record.get_bool("flashbang", false)?;
        self.flashbang_player_immune = record.get_bool("flashbang_player_immune", false)?;
        self.fields_radius = record.get_i32("fields_radius", self.fields_radius)?;
        if self.fields_radius >= 0 {
            self.fields_type = Some(FieldId::new(record.require_str("fields_type")?));
            self.fields_min_intensity =
                record.get_i32("fields_min_intensity", self.fields_min_intensity)?;
            self.fields_max_intensity =
                record.get_i32("fields_max_intensity", self.fields_max_intensity)?;
            if self.fields_min_intensity > self.fields_max_intensity {
                return Err(ConfigError::invalid(
                    "fields_min_intensity",
                    "no greater than fields_max_intensity",
                ));
            }
        }
        self.emp_blast_radius = record.get_i32("emp_blast_radius", self.emp_blast_radius)?;
        self.scrambler_blast_radius =
            record.get_i32("scrambler_blast_radius", self.scrambler_blast_radius)?;
        self.sound_volume = record.get_i32("sound_volume", self.sound_volume)?;
        self.sound_msg = record.get_string("sound_msg", "")?;
        self.no_deactivate_msg = record.get_string("no_deactivate_msg", "")?;
        Ok(())
    }

    fn finalize(&mut self, _item_type: &ItemTypeId, env: ActorEnv<'_>) -> Result<(), ConfigError> {
        if let Some(field) = &self.fields_type
            && !env.tables()?.has_field(field)
        {
            return Err(ConfigError::unknown("fields_type", "field", field));
        }
        Ok(())
    }

    fn use_item(
        &self,
        ctx: &mut UseContext<'_>,
        item: &mut Item,
        auto: bool,
        pos: Position,
    ) -> UseResult {
        if auto {
            if self.sound_volume >= 0 {
                ctx.world.sound(pos, self.sound_volume, &self.sound_msg);
            }
            return Ok(0);
        }
        if item.charges > 0 {
            let text = if self.no_deactivate_msg.is_empty() {
                format!("You've already armed the {}.", ctx.item_name(item))
            } else {
                self.no_deactivate_msg.clone()
            };
            return ctx.precondition(text);
        }

        if self.explosion.power >= 0.0 {
            ctx.world.explosion(pos, &self.explosion);
        }
        if self.flashbang {
            ctx.world.flashbang(pos, self.flashbang_player_immune);
        }
        if let Some(field) = &self.fields_type
            && self.fields_radius >= 0
        {
            for point in pos.points_in_radius(self.fields_radius) {
                let intensity = ctx
                    .rng
                    .range(self.fields_min_intensity, self.fields_max_intensity);
                ctx.world.add_field(point, field, intensity);
            }
        }
        if self.emp_blast_radius >= 0 {
            for point in pos.points_in_radius(self.emp_blast_radius) {
                ctx.world.emp_blast(point);
            }
        }
        if self.scrambler_blast_radius >= 0 {
            for point in pos.points_in_radius(self.scrambler_blast_radius) {
                ctx.world.scrambler_blast(point);
            }
        }
        ctx.msg(MessageKind::Warning, &format!("The {} explodes!", ctx.item_name(item)));
        ctx.consume_item();
        Ok(0)
    }

    fn clone_actor(&self) -> Box<dyn ItemUseActor> {
        Box::new(self.clone())
    }

    fn info(&self, _item: &Item, _env: ActorEnv<'_>) -> Vec<ItemInfo> {
        let mut lines = Vec::new();
        if self.explosion.power >= 0.0 {
            lines.push(ItemInfo::new(
                "Explosion",
                format!("power {:.0}", self.explosion.power),
            ));
            if self.explosion.shrapnel.count > 0 {
                lines.push(ItemInfo::new(
                    "Shrapnel",
                    format!("{} fragments", self.explosion.shrapnel.count),
                ));
            }
            if self.explosion.fire {
                lines.push(ItemInfo::new("Incendiary", "yes"));
            }
        }
        if self.flashbang {
            lines.push(ItemInfo::new("Flashbang", "blinds and deafens"));
        }
        if self.emp_blast_radius >= 0 {
            lines.push(ItemInfo::new("EMP radius", self.emp_blast_radius.to_string()));
        }
        lines
    }
}
