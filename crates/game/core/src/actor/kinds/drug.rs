use std::collections::BTreeMap;

use crate::actor::{ConfigError, ConfigRecord, ItemInfo, ItemUseActor, UseContext, UseResult};
use crate::agent::{MessageKind, Stat};
use crate::env::ActorEnv;
use crate::state::{EffectData, FieldId, Item, ItemTypeId, Position, VitaminId};

use super::{has_tools, known_effects, known_item, load_tools};

/// Duration multiplier for drug effects on agents with `TOLERANCE`.
const TOLERANCE_FACTOR: f32 = 0.8;
/// Duration multiplier for drug effects on agents with `LIGHTWEIGHT`.
const LIGHTWEIGHT_FACTOR: f32 = 1.2;

/// Consumable with status effects, stat changes, vitamins and side fields.
#[derive(Clone, Debug)]
pub struct ConsumeDrugActor {
    pub activation_message: String,
    /// Charges drawn from other carried items (a lighter, a syringe).
    pub charges_needed: BTreeMap<ItemTypeId, i64>,
    pub tools_needed: BTreeMap<ItemTypeId, i64>,
    pub effects: Vec<EffectData>,
    pub stat_adjustments: BTreeMap<Stat, i32>,
    pub fields_produced: BTreeMap<FieldId, i32>,
    /// Inclusive range rolled per vitamin.
    pub vitamins: BTreeMap<VitaminId, (i32, i32)>,
    pub moves: i32,
}

impl Default for ConsumeDrugActor {
    fn default() -> Self {
        Self {
            activation_message: String::new(),
            charges_needed: BTreeMap::new(),
            tools_needed: BTreeMap::new(),
            effects: Vec::new(),
            stat_adjustments: BTreeMap::new(),
            fields_produced: BTreeMap::new(),
            vitamins: BTreeMap::new(),
            moves: 100,
        }
    }
}

impl ConsumeDrugActor {
    fn duration_factor(ctx: &UseContext<'_>) -> f32 {
        if ctx.agent.has_trait("TOLERANCE") {
            TOLERANCE_FACTOR
        } else if ctx.agent.has_trait("LIGHTWEIGHT") {
            LIGHTWEIGHT_FACTOR
        } else {
            1.0
        }
    }

    fn missing_charges(&self, ctx: &UseContext<'_>) -> Option<(ItemTypeId, i64)> {
        self.charges_needed
            .iter()
            .find(|(id, count)| !ctx.agent.has_charges(id, **count))
            .map(|(id, count)| (id.clone(), *count))
    }
}

impl ItemUseActor for ConsumeDrugActor {
    fn type_tag(&self) -> &'static str {
        "consume_drug"
    }

    fn load(&mut self, record: &ConfigRecord) -> Result<(), ConfigError> {
        self.activation_message = record.get_string("activation_message", "")?;
        self.charges_needed = load_tools(record, "charges_needed")?;
        self.tools_needed = load_tools(record, "tools_needed")?;
        self.effects = record.get_effects("effects")?;
        self.stat_adjustments = record
            .get_int_map("stat_adjustments")?
            .into_iter()
            .map(|(name, amount)| {
                let stat = name
                    .parse::<Stat>()
                    .map_err(|_| ConfigError::invalid("stat_adjustments", "a map keyed by stat"))?;
                let amount = i32::try_from(amount)
                    .map_err(|_| ConfigError::invalid("stat_adjustments", "a 32-bit integer"))?;
                Ok((stat, amount))
            })
            .collect::<Result<_, ConfigError>>()?;
        self.fields_produced = record
            .get_int_map("fields_produced")?
            .into_iter()
            .map(|(field, intensity)| (FieldId::new(field), intensity as i32))
            .collect();
        self.vitamins = record
            .get_range_map("vitamins")?
            .into_iter()
            .map(|(id, range)| (VitaminId::new(id), range))
            .collect();
        self.moves = record.get_i32("moves", self.moves)?;
        Ok(())
    }

    fn finalize(&mut self, _item_type: &ItemTypeId, env: ActorEnv<'_>) -> Result<(), ConfigError> {
        known_effects(env, "effects", &self.effects)?;
        for id in self.tools_needed.keys() {
            known_item(env, "tools_needed", id)?;
        }
        for id in self.charges_needed.keys() {
            known_item(env, "charges_needed", id)?;
        }
        let tables = env.tables()?;
        if let Some(field) = self.fields_produced.keys().find(|f| !tables.has_field(f)) {
            return Err(ConfigError::unknown("fields_produced", "field", field));
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
        if !has_tools(ctx, &self.tools_needed) {
            let text = format!("You need the right tools to use the {}.", ctx.item_name(item));
            return ctx.insufficient(text);
        }
        if let Some((id, count)) = self.missing_charges(ctx) {
            let text = format!(
                "You need {count} charges of {} to use the {}.",
                ctx.env.item_name(&id),
                ctx.item_name(item)
            );
            return ctx.insufficient(text);
        }

        let factor = Self::duration_factor(ctx);
        for effect in &self.effects {
            ctx.agent.add_effect(&effect.scaled(factor));
        }
        for (stat, amount) in &self.stat_adjustments {
            ctx.agent.mod_stat(*stat, *amount);
        }
        let here = ctx.agent.position();
        for (field, intensity) in &self.fields_produced {
            ctx.world.add_field(here, field, *intensity);
        }
        for (id, count) in &self.charges_needed {
            ctx.agent.use_charges(id, *count);
        }
        for (vitamin, (lo, hi)) in &self.vitamins {
            let amount = ctx.rng.range(*lo, *hi);
            ctx.agent.vitamin_mod(vitamin, amount);
        }
        ctx.msg(MessageKind::Neutral, &self.activation_message);
        ctx.agent.mod_moves(-self.moves);
        Ok(ctx.charges_to_use(item))
    }

    fn can_use(&self, ctx: &UseContext<'_>, _item: &Item, _auto: bool, _pos: Position) -> bool {
        has_tools(ctx, &self.tools_needed) && self.missing_charges(ctx).is_none()
    }

    fn clone_actor(&self) -> Box<dyn ItemUseActor> {
        Box::new(self.clone())
    }

    fn info(&self, _item: &Item, _env: ActorEnv<'_>) -> Vec<ItemInfo> {
        self.stat_adjustments
            .iter()
            .map(|(stat, amount)| ItemInfo::new(stat.as_ref(), format!("{amount:+}")))
            .collect()
    }

    fn name(&self) -> String {
        "Consume".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ConfigValue, UseError};
    use crate::actor::kinds::testing::{Harness, actor};
    use crate::agent::{Body, Character, Inventory};
    use crate::sandbox::{ScriptedRng, WorldEvent};
    use crate::state::{EffectId, Tick};

    fn caffeine() -> Box<dyn ItemUseActor> {
        let stimulant = ConfigRecord::default()
            .with("id", "stimulant")
            .with("duration", 100);
        let vitamins = ConfigRecord::default().with("calcium", vec![2, 4]);
        actor(
            "caffeine",
            ConfigRecord::new("consume_drug")
                .with("activation_message", "You take some caffeine.")
                .with("effects", ConfigValue::List(vec![stimulant.into()]))
                .with("stat_adjustments", ConfigRecord::default().with("per", 1))
                .with("vitamins", vitamins),
        )
    }

    #[test]
    fn applies_effects_stats_and_vitamins() {
        let actor = caffeine();
        let mut h = Harness::new().with_rolls([ScriptedRng::unit_for(2, 4, 3)]);
        let mut pill = Item::new("caffeine", Tick::ZERO).with_charges(5);

        assert_eq!(h.run(actor.as_ref(), &mut pill), Ok(1));
        assert_eq!(h.you.effect_duration(&EffectId::new("stimulant"), None), 100);
        assert_eq!(h.you.stat(Stat::Perception), 9);
        assert_eq!(h.you.vitamins[&VitaminId::new("calcium")], 3);
        assert_eq!(h.you.moves, 0);
        assert!(h.you.said("caffeine"));
    }

    #[test]
    fn tolerance_shortens_effects() {
        let actor = caffeine();
        let mut h = Harness::new();
        h.you = h.you.clone().with_trait("TOLERANCE");
        let mut pill = Item::new("caffeine", Tick::ZERO).with_charges(5);

        h.run(actor.as_ref(), &mut pill).unwrap();
        assert_eq!(h.you.effect_duration(&EffectId::new("stimulant"), None), 80);
    }

    #[test]
    fn missing_fire_charges_block_use() {
        let record = ConfigRecord::new("consume_drug")
            .with("charges_needed", ConfigRecord::default().with("lighter", 1))
            .with("fields_produced", ConfigRecord::default().with("fd_smoke", 2));
        let actor = actor("caffeine", record);
        let mut h = Harness::new();
        let mut pill = Item::new("caffeine", Tick::ZERO).with_charges(5);

        assert!(!h.can_use(actor.as_ref(), &pill));
        assert!(matches!(
            h.run(actor.as_ref(), &mut pill),
            Err(UseError::Insufficient(_))
        ));
        assert!(h.world.events.is_empty());

        h.you.add_item(Item::new("lighter", Tick::ZERO).with_charges(3));
        h.run(actor.as_ref(), &mut pill).unwrap();
        assert!(matches!(
            h.world.events.as_slice(),
            [WorldEvent::Field { intensity: 2, .. }]
        ));
        assert_eq!(h.you.charges_of(&ItemTypeId::new("lighter")), 2);
    }

    #[test]
    fn unknown_stat_is_rejected() {
        let mut drug = ConsumeDrugActor::default();
        let record = ConfigRecord::new("consume_drug")
            .with("stat_adjustments", ConfigRecord::default().with("luck", 3));
        assert!(matches!(
            drug.load(&record),
            Err(ConfigError::InvalidField { .. })
        ));
    }
}
