//! Noise makers: whistles, horns and musical instruments.

use crate::actor::{ConfigError, ConfigRecord, ItemInfo, ItemUseActor, UseContext, UseResult};
use crate::agent::{MessageKind, Stat};
use crate::env::ActorEnv;
use crate::state::{EffectData, Item, ItemLocation, Position};

/// Makes a single noise on activation.
#[derive(Clone, Debug, Default)]
pub struct ManualNoiseActor {
    pub no_charges_message: String,
    pub use_message: String,
    pub noise_message: String,
    pub noise: i32,
    pub moves: i32,
}

impl ItemUseActor for ManualNoiseActor {
    fn type_tag(&self) -> &'static str {
        "manualnoise"
    }

    fn load(&mut self, record: &ConfigRecord) -> Result<(), ConfigError> {
        self.no_charges_message = record.get_string("no_charges_message", "")?;
        self.use_message = record.get_string("use_message", "")?;
        self.noise_message = record.get_string("noise_message", "")?;
        self.noise = record.get_i32("noise", 0)?;
        self.moves = record.get_i32("moves", 0)?;
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
            return Ok(0);
        }
        if !ctx.has_enough_charges(item) {
            let text = if self.no_charges_message.is_empty() {
                format!("The {} is empty.", ctx.item_name(item))
            } else {
                self.no_charges_message.clone()
            };
            return ctx.insufficient(text);
        }
        ctx.agent.mod_moves(-self.moves);
        if self.noise > 0 {
            let description = if self.noise_message.is_empty() {
                "hsss"
            } else {
                self.noise_message.as_str()
            };
            ctx.world.sound(pos, self.noise, description);
        }
        ctx.msg(MessageKind::Neutral, &self.use_message);
        Ok(ctx.charges_to_use(item))
    }

    fn can_use(&self, ctx: &UseContext<'_>, item: &Item, _auto: bool, _pos: Position) -> bool {
        ctx.has_enough_charges(item)
    }

    fn clone_actor(&self) -> Box<dyn ItemUseActor> {
        Box::new(self.clone())
    }

    fn name(&self) -> String {
        if self.use_message.is_empty() {
            "Use".to_owned()
        } else {
            "Make noise".to_owned()
        }
    }
}

/// Effect marking that a character heard music this turn.
const MUSIC_EFFECT: &str = "music";

/// Played while active; raises morale of the player and emits sound.
#[derive(Clone, Debug)]
pub struct MusicalInstrumentActor {
    /// Speed below `25 + speed_penalty` is too weak to play.
    pub speed_penalty: i32,
    pub volume: i32,
    pub fun: i32,
    /// Extra morale per point of perception.
    pub fun_bonus: i32,
    /// One in this many turns shows a description.
    pub description_frequency: i32,
    pub descriptions: Vec<String>,
}

impl Default for MusicalInstrumentActor {
    fn default() -> Self {
        Self {
            speed_penalty: 10,
            volume: 0,
            fun: 0,
            fun_bonus: 0,
            description_frequency: 0,
            descriptions: Vec::new(),
        }
    }
}

impl MusicalInstrumentActor {
    fn is_held(ctx: &UseContext<'_>) -> bool {
        matches!(
            ctx.source.location,
            ItemLocation::Wielded | ItemLocation::Worn
        ) || ctx
            .source
            .id
            .is_some_and(|id| ctx.agent.wielded() == Some(id) || ctx.agent.is_worn(id))
    }

    fn too_weak(&self, ctx: &UseContext<'_>) -> bool {
        ctx.agent.stat(Stat::Speed) <= 25 + self.speed_penalty
    }

    fn stop(ctx: &mut UseContext<'_>, item: &mut Item, text: String) -> UseResult {
        item.active = false;
        ctx.msg(MessageKind::Neutral, &text);
        Ok(0)
    }
}

impl ItemUseActor for MusicalInstrumentActor {
    fn type_tag(&self) -> &'static str {
        "musical_instrument"
    }

    fn load(&mut self, record: &ConfigRecord) -> Result<(), ConfigError> {
        self.speed_penalty = record.get_i32("speed_penalty", self.speed_penalty)?;
        self.volume = record.get_i32("volume", 0)?;
        self.fun = record.get_i32("fun", 0)?;
        self.fun_bonus = record.get_i32("fun_bonus", 0)?;
        self.description_frequency = record.get_i32("description_frequency", 0)?;
        self.descriptions = record.get_string_list("descriptions")?;
        Ok(())
    }

    fn use_item(
        &self,
        ctx: &mut UseContext<'_>,
        item: &mut Item,
        auto: bool,
        pos: Position,
    ) -> UseResult {
        let name = ctx.item_name(item);
        if !auto && item.active {
            return Self::stop(ctx, item, format!("You stop playing your {name}."));
        }
        if !Self::is_held(ctx) {
            if auto {
                return Self::stop(ctx, item, format!("You stop playing your {name}."));
            }
            return ctx.precondition(format!("You need to hold or wear the {name} to play it."));
        }
        if self.too_weak(ctx) {
            if auto {
                return Self::stop(ctx, item, format!("You feel too weak to play your {name}."));
            }
            return ctx.precondition(format!("You feel too weak to play your {name}."));
        }
        if !item.active {
            item.active = true;
            ctx.msg(MessageKind::Good, &format!("You start playing your {name}."));
        }

        let morale = self.fun + self.fun_bonus * ctx.agent.stat(Stat::Perception);
        let description = if morale < 0 {
            Some("You produce an annoying sound".to_owned())
        } else if self.description_frequency > 0
            && !self.descriptions.is_empty()
            && ctx.rng.one_in(self.description_frequency)
        {
            let pick = ctx.rng.range(0, self.descriptions.len() as i32 - 1);
            self.descriptions.get(pick as usize).cloned()
        } else {
            None
        };

        if self.volume > 0 {
            ctx.world
                .sound(pos, self.volume, description.as_deref().unwrap_or("music"));
        }
        ctx.agent.add_effect(&EffectData::new(MUSIC_EFFECT, 1));
        ctx.agent
            .add_morale(MUSIC_EFFECT, morale, (5 * morale).min(20), 5);
        if let Some(text) = description {
            ctx.msg(MessageKind::Info, &text);
        }
        Ok(0)
    }

    fn can_use(&self, ctx: &UseContext<'_>, item: &Item, _auto: bool, _pos: Position) -> bool {
        item.active || (Self::is_held(ctx) && !self.too_weak(ctx))
    }

    fn clone_actor(&self) -> Box<dyn ItemUseActor> {
        Box::new(self.clone())
    }

    fn info(&self, _item: &Item, _env: ActorEnv<'_>) -> Vec<ItemInfo> {
        vec![
            ItemInfo::new("Volume", self.volume.to_string()),
            ItemInfo::new("Speed penalty", self.speed_penalty.to_string()),
        ]
    }

    fn name(&self) -> String {
        "Play music".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::UseError;
    use crate::actor::kinds::testing::{Harness, actor};
    use crate::agent::Body;
    use crate::state::{EffectId, ItemSource, Tick};

    #[test]
    fn airhorn_honks_and_uses_charges() {
        let actor = actor(
            "airhorn",
            ConfigRecord::new("manualnoise")
                .with("noise", 80)
                .with("noise_message", "HOOOOONK!")
                .with("use_message", "You honk the horn.")
                .with("moves", 25),
        );
        let mut h = Harness::new();
        let mut horn = Item::new("airhorn", Tick::ZERO).with_charges(12);

        assert_eq!(h.run(actor.as_ref(), &mut horn), Ok(5));
        assert_eq!(h.world.sounds().next().map(|(_, v, d)| (v, d)), Some((80, "HOOOOONK!")));
        assert_eq!(h.you.moves, 75);

        let mut empty = Item::new("airhorn", Tick::ZERO).with_charges(4);
        assert!(!h.can_use(actor.as_ref(), &empty));
        assert!(matches!(
            h.run(actor.as_ref(), &mut empty),
            Err(UseError::Insufficient(_))
        ));
    }

    fn saxophone() -> Box<dyn ItemUseActor> {
        actor(
            "saxophone",
            ConfigRecord::new("musical_instrument")
                .with("volume", 12)
                .with("fun", 1)
                .with("fun_bonus", 1)
                .with("description_frequency", 1)
                .with("descriptions", vec!["You play a jazzy tune."]),
        )
    }

    #[test]
    fn playing_needs_the_instrument_in_hand() {
        let actor = saxophone();
        let mut h = Harness::new();
        let mut sax = Item::new("saxophone", Tick::ZERO);
        h.carry(sax.clone());

        assert!(matches!(
            h.run(actor.as_ref(), &mut sax),
            Err(UseError::Precondition(_))
        ));
        assert!(!sax.active);
    }

    #[test]
    fn playing_lifts_morale_until_stopped() {
        let actor = saxophone();
        let mut h = Harness::new();
        let mut sax = Item::new("saxophone", Tick::ZERO);
        let id = h.carry(sax.clone());
        h.source = ItemSource::at(ItemLocation::Wielded, id);

        assert_eq!(h.run(actor.as_ref(), &mut sax), Ok(0));
        assert!(sax.active);
        assert_eq!(h.you.morale, 9);
        assert!(h.you.has_effect(&EffectId::new(MUSIC_EFFECT), None));
        assert_eq!(h.world.sounds().next().map(|(_, _, d)| d), Some("You play a jazzy tune."));

        h.run(actor.as_ref(), &mut sax).unwrap();
        assert!(!sax.active);
        assert!(h.you.said("You stop playing"));
    }

    #[test]
    fn weak_players_cannot_play() {
        let actor = saxophone();
        let mut h = Harness::new();
        h.you = h.you.clone().with_stat(Stat::Speed, 30);
        let mut sax = Item::new("saxophone", Tick::ZERO);
        let id = h.carry(sax.clone());
        h.source = ItemSource::at(ItemLocation::Wielded, id);

        assert!(h.run(actor.as_ref(), &mut sax).is_err());
        assert!(h.you.said("too weak"));
    }
}
