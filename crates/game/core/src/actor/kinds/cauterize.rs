use crate::actor::{ConfigError, ConfigRecord, ItemUseActor, UseContext, UseError, UseResult};
use crate::agent::{FIRE_SOURCE, MessageKind};
use crate::state::{BodyPart, EffectData, EffectId, Item, ItemTypeId, Position};

use super::HealActor;

/// Fire charges one cauterization burns.
const FIRE_CHARGES: i64 = 4;
const BITE: &str = "bite";
const BLEED: &str = "bleed";
/// Turns a bite that survived cauterization keeps festering.
const SEARED_BITE_DURATION: u32 = 2600;

/// Heal profile of a cauterization: it hurts, but it stops bleeding.
fn cauterize_heal() -> HealActor {
    HealActor {
        limb_power: -2.0,
        head_power: -2.0,
        torso_power: -2.0,
        bleed: 1.0,
        bite: 0.5,
        move_cost: 0,
        ..Default::default()
    }
}

/// Sears a wound on the acting agent and returns the treated part.
///
/// With `force` the agent may pick a part with nothing to treat. Leaves the
/// agent with no moves left this turn.
pub fn cauterize_effect(
    ctx: &mut UseContext<'_>,
    item: &mut Item,
    force: bool,
) -> Result<BodyPart, UseError> {
    let heal = cauterize_heal();
    let bp = heal.use_healing_item(ctx, None, force)?;
    heal.finish_using(ctx, item, None, bp)?;

    ctx.msg(MessageKind::Neutral, "You cauterize yourself.");
    if ctx.agent.has_trait("NOPAIN") {
        ctx.msg(MessageKind::Neutral, "It itches a little.");
    } else {
        ctx.agent.mod_pain(15);
        ctx.msg(MessageKind::Bad, "It hurts like hell!");
    }
    let bite = EffectId::new(BITE);
    if ctx.agent.has_effect(&bite, Some(bp)) {
        let seared = EffectData::new(bite, SEARED_BITE_DURATION).on(bp).permanent();
        ctx.agent.add_effect(&seared);
    }
    ctx.agent.set_moves(0);
    Ok(bp)
}

/// Burns wounds shut with a heated item or a dedicated tool.
#[derive(Clone, Debug)]
pub struct CauterizeActor {
    /// Heat from a fire source; otherwise the item's own charges.
    pub flame: bool,
}

impl Default for CauterizeActor {
    fn default() -> Self {
        Self { flame: true }
    }
}

impl CauterizeActor {
    fn has_heat(&self, ctx: &UseContext<'_>, item: &Item) -> bool {
        if self.flame {
            ctx.agent.has_charges(&ItemTypeId::new(FIRE_SOURCE), FIRE_CHARGES)
        } else {
            ctx.has_enough_charges(item)
        }
    }

    fn has_wound(ctx: &UseContext<'_>) -> bool {
        ctx.agent.has_effect_anywhere(&EffectId::new(BITE))
            || ctx.agent.has_effect_anywhere(&EffectId::new(BLEED))
    }
}

impl ItemUseActor for CauterizeActor {
    fn type_tag(&self) -> &'static str {
        "cauterize"
    }

    fn load(&mut self, record: &ConfigRecord) -> Result<(), ConfigError> {
        self.flame = record.get_bool("flame", true)?;
        Ok(())
    }

    fn use_item(
        &self,
        ctx: &mut UseContext<'_>,
        item: &mut Item,
        _auto: bool,
        _pos: Position,
    ) -> UseResult {
        if !self.has_heat(ctx, item) {
            let text = if self.flame {
                format!(
                    "You need a source of flame ({FIRE_CHARGES} charges worth) before you can cauterize yourself."
                )
            } else {
                format!(
                    "You need at least {} charges to cauterize wounds.",
                    ctx.charges_to_use(item)
                )
            };
            return ctx.insufficient(text);
        }

        let wounded = Self::has_wound(ctx);
        if !wounded {
            if !ctx.agent.has_trait("MASOCHIST") {
                return ctx.precondition(
                    "You are not bleeding or bitten, there is no need to cauterize yourself.",
                );
            }
            if !ctx.agent.query_yn("Cauterize yourself for fun?") {
                return ctx.refuse(UseError::Cancelled);
            }
        }

        cauterize_effect(ctx, item, !wounded)?;
        if self.flame {
            ctx.agent.use_charges(&ItemTypeId::new(FIRE_SOURCE), FIRE_CHARGES);
            Ok(0)
        } else {
            Ok(ctx.charges_to_use(item))
        }
    }

    fn can_use(&self, ctx: &UseContext<'_>, item: &Item, _auto: bool, _pos: Position) -> bool {
        self.has_heat(ctx, item) && (Self::has_wound(ctx) || ctx.agent.has_trait("MASOCHIST"))
    }

    fn clone_actor(&self) -> Box<dyn ItemUseActor> {
        Box::new(self.clone())
    }

    fn name(&self) -> String {
        "Cauterize".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::kinds::testing::{Harness, actor};
    use crate::agent::{Body, Inventory};
    use crate::sandbox::SandboxCharacter;
    use crate::state::Tick;

    fn knife() -> Box<dyn ItemUseActor> {
        actor("knife_steak", ConfigRecord::new("cauterize"))
    }

    fn bleeding(bp: BodyPart) -> Harness {
        let mut h = Harness::new();
        h.you = SandboxCharacter::player().with_pseudo_charges(FIRE_SOURCE, 10);
        h.you.add_effect(&EffectData::new(BLEED, 40).on(bp));
        h.you.script_body_part(bp);
        h
    }

    #[test]
    fn needs_a_flame() {
        let actor = knife();
        let mut h = Harness::new();
        h.you.add_effect(&EffectData::new(BLEED, 40).on(BodyPart::ArmL));
        let mut blade = Item::new("knife_steak", Tick::ZERO);

        assert!(!h.can_use(actor.as_ref(), &blade));
        assert!(matches!(
            h.run(actor.as_ref(), &mut blade),
            Err(UseError::Insufficient(_))
        ));
    }

    #[test]
    fn searing_stops_bleeding_and_hurts() {
        let actor = knife();
        let mut h = bleeding(BodyPart::ArmL);
        let mut blade = Item::new("knife_steak", Tick::ZERO);

        assert_eq!(h.run(actor.as_ref(), &mut blade), Ok(0));
        assert!(!h.you.has_effect_anywhere(&EffectId::new(BLEED)));
        assert_eq!(h.you.hp(BodyPart::ArmL).current, SandboxCharacter::DEFAULT_HP - 2);
        assert_eq!(h.you.pain, 15);
        assert_eq!(h.you.moves, 0);
        assert_eq!(h.you.charges_of(&ItemTypeId::new(FIRE_SOURCE)), 6);
        assert!(h.you.said("hurts like hell"));
    }

    #[test]
    fn painless_characters_only_itch() {
        let actor = knife();
        let mut h = bleeding(BodyPart::Torso);
        h.you.traits.insert("NOPAIN".to_owned());
        let mut blade = Item::new("knife_steak", Tick::ZERO);

        h.run(actor.as_ref(), &mut blade).unwrap();
        assert_eq!(h.you.pain, 0);
        assert!(h.you.said("itches"));
    }

    #[test]
    fn healthy_characters_need_a_reason() {
        let actor = knife();
        let mut h = Harness::new();
        h.you = SandboxCharacter::player().with_pseudo_charges(FIRE_SOURCE, 10);
        let mut blade = Item::new("knife_steak", Tick::ZERO);
        assert!(matches!(
            h.run(actor.as_ref(), &mut blade),
            Err(UseError::Precondition(_))
        ));

        h.you.traits.insert("MASOCHIST".to_owned());
        assert!(h.can_use(actor.as_ref(), &blade));
        assert_eq!(h.run(actor.as_ref(), &mut blade), Err(UseError::Cancelled));
        assert_eq!(h.you.pain, 0);
    }

    #[test]
    fn surviving_bite_festers() {
        let mut h = Harness::new().with_rolls([0.9]);
        h.you.add_effect(&EffectData::new(BITE, 100).on(BodyPart::LegL));
        h.you.script_body_part(BodyPart::LegL);
        let mut blade = Item::new("knife_steak", Tick::ZERO);

        let bp = h
            .with_ctx(|ctx| cauterize_effect(ctx, &mut blade, false))
            .unwrap();
        assert_eq!(bp, BodyPart::LegL);
        let bite = h
            .you
            .effects
            .iter()
            .find(|e| e.id == EffectId::new(BITE))
            .cloned()
            .unwrap();
        assert_eq!(bite.duration, SEARED_BITE_DURATION);
        assert!(bite.permanent);
    }
}
