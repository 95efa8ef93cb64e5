use crate::actor::{ConfigError, ConfigRecord, ItemUseActor, UseContext, UseResult};
use crate::agent::{MessageKind, UPS};
use crate::state::{Item, ItemLocation, ItemTypeId, Position};

/// Worn armor that runs off a universal power supply while switched on.
#[derive(Clone, Debug, Default)]
pub struct UpsArmorActor {
    pub activate_msg: String,
    pub deactive_msg: String,
    pub out_of_power_msg: String,
}

impl UpsArmorActor {
    fn is_worn(ctx: &UseContext<'_>) -> bool {
        ctx.source.location == ItemLocation::Worn
            || ctx.source.id.is_some_and(|id| ctx.agent.is_worn(id))
    }

    fn has_power(ctx: &UseContext<'_>) -> bool {
        ctx.agent.has_charges(&ItemTypeId::new(UPS), 1)
    }
}

impl ItemUseActor for UpsArmorActor {
    fn type_tag(&self) -> &'static str {
        "ups_based_armor"
    }

    fn load(&mut self, record: &ConfigRecord) -> Result<(), ConfigError> {
        self.activate_msg = record.get_string("activate_msg", "")?;
        self.deactive_msg = record.get_string("deactive_msg", "")?;
        self.out_of_power_msg = record.get_string("out_of_power_msg", "")?;
        Ok(())
    }

    fn use_item(
        &self,
        ctx: &mut UseContext<'_>,
        item: &mut Item,
        auto: bool,
        _pos: Position,
    ) -> UseResult {
        let name = ctx.item_name(item);
        if auto {
            if item.active && !Self::has_power(ctx) {
                item.active = false;
                let text = if self.out_of_power_msg.is_empty() {
                    format!("Your {name} runs out of power and deactivates.")
                } else {
                    self.out_of_power_msg.clone()
                };
                ctx.msg(MessageKind::Warning, &text);
            }
            return Ok(0);
        }

        if !Self::is_worn(ctx) {
            return ctx.precondition(format!("You should wear the {name} before activating it."));
        }
        if !item.active && !Self::has_power(ctx) {
            return ctx.insufficient(format!(
                "You must have a UPS with charges to activate the {name}."
            ));
        }

        item.active = !item.active;
        if item.active {
            let text = if self.activate_msg.is_empty() {
                format!("Your {name} is now activated.")
            } else {
                self.activate_msg.clone()
            };
            ctx.msg(MessageKind::Info, &text);
        } else {
            let text = if self.deactive_msg.is_empty() {
                format!("Your {name} is now deactivated.")
            } else {
                self.deactive_msg.clone()
            };
            ctx.msg(MessageKind::Info, &text);
        }
        Ok(0)
    }

    fn can_use(&self, ctx: &UseContext<'_>, item: &Item, auto: bool, _pos: Position) -> bool {
        auto || (Self::is_worn(ctx) && (item.active || Self::has_power(ctx)))
    }

    fn clone_actor(&self) -> Box<dyn ItemUseActor> {
        Box::new(self.clone())
    }

    fn name(&self) -> String {
        "Toggle power".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::UseError;
    use crate::actor::kinds::testing::{Harness, actor};
    use crate::state::{ItemSource, Tick};

    fn power_armor() -> Box<dyn ItemUseActor> {
        actor(
            "power_armor",
            ConfigRecord::new("ups_based_armor").with("activate_msg", "Your armor hums."),
        )
    }

    #[test]
    fn must_be_worn() {
        let actor = power_armor();
        let mut h = Harness::new();
        h.you = h.you.clone().with_pseudo_charges(UPS, 50);
        let mut armor = Item::new("power_armor", Tick::ZERO);
        h.carry(armor.clone());

        assert!(matches!(
            h.run(actor.as_ref(), &mut armor),
            Err(UseError::Precondition(_))
        ));
        assert!(!armor.active);
    }

    #[test]
    fn toggles_when_worn_and_powered() {
        let actor = power_armor();
        let mut h = Harness::new();
        let mut armor = Item::new("power_armor", Tick::ZERO);
        let id = h.carry(armor.clone());
        h.source = ItemSource::at(ItemLocation::Worn, id);

        assert!(matches!(
            h.run(actor.as_ref(), &mut armor),
            Err(UseError::Insufficient(_))
        ));

        h.you = h.you.clone().with_pseudo_charges(UPS, 50);
        h.run(actor.as_ref(), &mut armor).unwrap();
        assert!(armor.active);
        assert!(h.you.said("Your armor hums."));

        h.run(actor.as_ref(), &mut armor).unwrap();
        assert!(!armor.active);
        assert!(h.you.said("now deactivated"));
    }

    #[test]
    fn ticking_without_power_switches_off() {
        let actor = power_armor();
        let mut h = Harness::new();
        let mut armor = Item::new("power_armor", Tick::ZERO);
        armor.active = true;

        assert_eq!(h.run_with(actor.as_ref(), &mut armor, true), Ok(0));
        assert!(!armor.active);
        assert!(h.you.said("runs out of power"));
    }
}
