use std::collections::BTreeSet;

use bitflags::bitflags;

use crate::actor::{ConfigError, ConfigRecord, ItemUseActor, UseContext, UseError, UseResult};
use crate::agent::MessageKind;
use crate::state::{Item, ItemId, MaterialId, Position};

/// Item var holding the inscription text.
pub const NOTE_VAR: &str = "item_note";
/// Item var holding how the inscription was made.
pub const NOTE_TYPE_VAR: &str = "item_note_type";
/// Entering this alone erases an existing inscription.
const ERASE: &str = ".";

bitflags! {
    /// Surfaces an inscribing tool can write on.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct InscribeSurface: u8 {
        const ITEMS   = 1 << 0;
        const TERRAIN = 1 << 1;
    }
}

fn default_whitelist() -> BTreeSet<MaterialId> {
    ["wood", "plastic", "glass", "chitin", "iron", "steel", "silver"]
        .into_iter()
        .map(MaterialId::new)
        .collect()
}

/// Carves, burns or writes text on items or on the ground.
#[derive(Clone, Debug)]
pub struct InscribeActor {
    pub surfaces: InscribeSurface,
    /// Items must be made of a whitelisted material.
    pub material_restricted: bool,
    pub material_whitelist: BTreeSet<MaterialId>,
    pub verb: String,
    pub gerund: String,
}

impl Default for InscribeActor {
    fn default() -> Self {
        Self {
            surfaces: InscribeSurface::ITEMS,
            material_restricted: true,
            material_whitelist: default_whitelist(),
            verb: "Carve".to_owned(),
            gerund: "Carved".to_owned(),
        }
    }
}

impl InscribeActor {
    fn lower_verb(&self) -> String {
        self.verb.to_lowercase()
    }

    /// Writes or erases the graffiti on the agent's tile.
    pub fn ground_graffiti(&self, ctx: &mut UseContext<'_>) -> Result<(), UseError> {
        let here = ctx.agent.position();
        let existing = ctx.world.graffiti(here);
        let prompt = format!("{} what?", self.verb);
        let text = ctx
            .agent
            .input_text(&prompt, existing.as_deref().unwrap_or_default())
            .unwrap_or_default();
        if text.is_empty() {
            return ctx.refuse(UseError::Cancelled);
        }

        if text == ERASE && existing.is_some() {
            ctx.world.set_graffiti(here, String::new());
            ctx.msg(
                MessageKind::Neutral,
                "You manage to get rid of the message on the ground.",
            );
        } else {
            let verb = self.lower_verb();
            ctx.msg(
                MessageKind::Neutral,
                &format!("You {verb} a message into the ground."),
            );
            ctx.agent.mod_moves(-2 * text.chars().count() as i32);
            ctx.world.set_graffiti(here, text);
        }
        Ok(())
    }

    /// Why the carried item `target` cannot take an inscription, if it cannot.
    fn item_refusal(&self, ctx: &UseContext<'_>, target: &Item) -> Option<String> {
        let verb = self.lower_verb();
        let name = ctx.item_name(target);
        let Ok(ty) = ctx.env.item_type(&target.type_id) else {
            return Some(format!("You can't {verb} the {name}."));
        };
        if ty.materials.is_empty() {
            return Some(format!("You can't {verb} an item that's not solid!"));
        }
        if self.material_restricted && !ty.made_of_any(&self.material_whitelist) {
            return Some(format!(
                "You can't {verb} the {name} because of the material it is made of."
            ));
        }
        None
    }

    /// Writes, replaces or erases the note on the carried item `target`.
    pub fn item_inscription(&self, ctx: &mut UseContext<'_>, target: ItemId) -> Result<(), UseError> {
        let Some(item) = ctx.agent.item(target) else {
            return ctx.precondition("You do not have that item!");
        };
        if let Some(text) = self.item_refusal(ctx, item) {
            return ctx.precondition(text);
        }
        let existing = item.var(NOTE_VAR).map(str::to_owned);
        let prompt = match &existing {
            Some(_) => format!(
                "(To delete, input one '{ERASE}')\n{} on the {} is:",
                self.gerund,
                ctx.item_name(item)
            ),
            None => format!("{} what?", self.verb),
        };

        let Some(text) = ctx
            .agent
            .input_text(&prompt, existing.as_deref().unwrap_or_default())
        else {
            return ctx.refuse(UseError::Cancelled);
        };
        let Some(item) = ctx.agent.item_mut(target) else {
            return Err(UseError::unknown("item", target.0));
        };
        if existing.is_some() && text == ERASE {
            item.erase_var(NOTE_VAR);
            item.erase_var(NOTE_TYPE_VAR);
        } else {
            item.set_var(NOTE_VAR, text);
            item.set_var(NOTE_TYPE_VAR, self.gerund.clone());
        }
        Ok(())
    }
}

impl ItemUseActor for InscribeActor {
    fn type_tag(&self) -> &'static str {
        "inscribe"
    }

    fn cost(&self) -> Option<u32> {
        Some(0)
    }

    fn load(&mut self, record: &ConfigRecord) -> Result<(), ConfigError> {
        self.surfaces.set(InscribeSurface::ITEMS, record.get_bool("on_items", true)?);
        self.surfaces
            .set(InscribeSurface::TERRAIN, record.get_bool("on_terrain", false)?);
        if self.surfaces.is_empty() {
            return Err(ConfigError::invalid(
                "on_items",
                "true when `on_terrain` is false",
            ));
        }
        self.material_restricted = record.get_bool("material_restricted", true)?;
        if record.has("material_whitelist") {
            self.material_whitelist = record.get_string_set("material_whitelist")?;
        }
        self.verb = record.get_string("verb", "Carve")?;
        self.gerund = record.get_string("gerund", "Carved")?;
        Ok(())
    }

    fn use_item(
        &self,
        ctx: &mut UseContext<'_>,
        item: &mut Item,
        _auto: bool,
        _pos: Position,
    ) -> UseResult {
        let on_ground = if self.surfaces.is_all() {
            let options = ["The ground".to_owned(), "An item".to_owned()];
            match ctx
                .agent
                .choose_option(&format!("{} on what?", self.verb), &options)
            {
                Some(choice) => choice == 0,
                None => return ctx.refuse(UseError::Cancelled),
            }
        } else {
            self.surfaces.contains(InscribeSurface::TERRAIN)
        };

        if on_ground {
            self.ground_graffiti(ctx)?;
            return Ok(0);
        }

        let candidates: Vec<ItemId> = ctx
            .agent
            .item_ids()
            .into_iter()
            .filter(|id| Some(*id) != ctx.source.id)
            .collect();
        let Some(target) = ctx.agent.choose_item("Inscribe which item?", &candidates) else {
            return ctx.refuse(UseError::Cancelled);
        };
        if Some(target) == ctx.source.id {
            let text = format!(
                "You can not {} the {} on itself.",
                self.lower_verb(),
                ctx.item_name(item)
            );
            return ctx.precondition(text);
        }
        self.item_inscription(ctx, target)?;
        Ok(0)
    }

    fn clone_actor(&self) -> Box<dyn ItemUseActor> {
        Box::new(self.clone())
    }

    fn name(&self) -> String {
        self.verb.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::kinds::testing::{Harness, actor};
    use crate::agent::Inventory;
    use crate::state::Tick;

    fn knife() -> Box<dyn ItemUseActor> {
        actor("knife_combat", ConfigRecord::new("inscribe"))
    }

    fn harness() -> (Harness, Item) {
        let mut h = Harness::new();
        let knife = Item::new("knife_combat", Tick::ZERO);
        h.carry(knife.clone());
        (h, knife)
    }

    #[test]
    fn carves_a_note_on_an_item() {
        let actor = knife();
        let (mut h, mut knife) = harness();
        let target = h.you.add_item(Item::new("knife_steak", Tick::ZERO));
        h.you.script_item(target).script_text("mine");

        assert_eq!(h.run(actor.as_ref(), &mut knife), Ok(0));
        let carved = h.you.item(target).unwrap();
        assert_eq!(carved.var(NOTE_VAR), Some("mine"));
        assert_eq!(carved.var(NOTE_TYPE_VAR), Some("Carved"));
    }

    #[test]
    fn dot_erases_an_existing_note() {
        let actor = knife();
        let (mut h, mut knife) = harness();
        let mut noted = Item::new("knife_steak", Tick::ZERO);
        noted.set_var(NOTE_VAR, "old");
        noted.set_var(NOTE_TYPE_VAR, "Carved");
        let target = h.you.add_item(noted);
        h.you.script_item(target).script_text(ERASE);

        assert_eq!(h.run(actor.as_ref(), &mut knife), Ok(0));
        let erased = h.you.item(target).unwrap();
        assert_eq!(erased.var(NOTE_VAR), None);
        assert_eq!(erased.var(NOTE_TYPE_VAR), None);
        assert!(h.you.questions.iter().any(|q| q.contains("To delete")));
    }

    #[test]
    fn soft_materials_are_refused() {
        let actor = knife();
        let (mut h, mut knife) = harness();
        let target = h.you.add_item(Item::new("jacket_light", Tick::ZERO));
        h.you.script_item(target);

        assert!(matches!(
            h.run(actor.as_ref(), &mut knife),
            Err(UseError::Precondition(_))
        ));
        assert!(h.you.said("because of the material"));
        assert_eq!(h.you.item(target).unwrap().var(NOTE_VAR), None);

        let unrestricted =
            actor_with(ConfigRecord::new("inscribe").with("material_restricted", false));
        h.you.script_item(target).script_text("fine");
        assert_eq!(h.run(unrestricted.as_ref(), &mut knife), Ok(0));
        assert_eq!(h.you.item(target).unwrap().var(NOTE_VAR), Some("fine"));
    }

    fn actor_with(record: ConfigRecord) -> Box<dyn ItemUseActor> {
        actor("knife_combat", record)
    }

    #[test]
    fn writes_on_the_ground() {
        let marker = actor_with(
            ConfigRecord::new("inscribe")
                .with("on_items", false)
                .with("on_terrain", true)
                .with("verb", "Write")
                .with("gerund", "Written"),
        );
        let (mut h, mut pen) = harness();
        h.you.script_text("hello");

        assert_eq!(h.run(marker.as_ref(), &mut pen), Ok(0));
        assert_eq!(
            h.world.graffiti.get(&Position::ORIGIN).map(String::as_str),
            Some("hello")
        );
        assert_eq!(h.you.moves, 100 - 10);
        assert!(h.you.said("You write a message into the ground."));

        h.you.script_text(ERASE);
        assert_eq!(h.run(marker.as_ref(), &mut pen), Ok(0));
        assert!(h.world.graffiti.is_empty());
    }

    #[test]
    fn both_surfaces_ask_first() {
        let actor = actor_with(ConfigRecord::new("inscribe").with("on_terrain", true));
        let (mut h, mut knife) = harness();
        h.you.script_option(0).script_text("here");

        assert_eq!(h.run(actor.as_ref(), &mut knife), Ok(0));
        assert!(h.world.graffiti.contains_key(&Position::ORIGIN));
        assert_eq!(h.you.questions[0], "Carve on what?");

        assert_eq!(h.run(actor.as_ref(), &mut knife), Err(UseError::Cancelled));
    }

    #[test]
    fn must_write_somewhere() {
        let mut inscribe = InscribeActor::default();
        let record = ConfigRecord::new("inscribe").with("on_items", false);
        assert!(matches!(
            inscribe.load(&record),
            Err(ConfigError::InvalidField { .. })
        ));
    }
}
