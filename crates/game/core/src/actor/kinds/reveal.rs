use crate::actor::{ConfigError, ConfigRecord, ItemInfo, ItemUseActor, UseContext, UseResult};
use crate::agent::MessageKind;
use crate::env::ActorEnv;
use crate::state::{Item, Position};

/// Item var listing the ids of characters who already read the map.
const READ_BY_VAR: &str = "read_by";

/// Map that reveals overmap terrain around the reader.
#[derive(Clone, Debug, Default)]
pub struct RevealMapActor {
    pub radius: i32,
    /// Overmap terrain kinds revealed.
    pub omt_types: Vec<String>,
    pub message: String,
}

fn has_read(item: &Item, reader: &str) -> bool {
    item.var(READ_BY_VAR)
        .is_some_and(|readers| readers.split(',').any(|r| r == reader))
}

impl ItemUseActor for RevealMapActor {
    fn type_tag(&self) -> &'static str {
        "reveal_map"
    }

    fn load(&mut self, record: &ConfigRecord) -> Result<(), ConfigError> {
        self.radius = record.get_i32("radius", 0)?;
        self.omt_types = record.get_string_list("terrain")?;
        if self.omt_types.is_empty() {
            return Err(ConfigError::MissingField {
                field: "terrain".to_owned(),
            });
        }
        self.message = record.get_string("message", "")?;
        Ok(())
    }

    fn use_item(
        &self,
        ctx: &mut UseContext<'_>,
        item: &mut Item,
        _auto: bool,
        _pos: Position,
    ) -> UseResult {
        let here = ctx.agent.position();
        if here.is_underground() {
            return ctx.precondition("You should read your map on the surface.");
        }
        let reader = ctx.agent.id().0.to_string();
        if has_read(item, &reader) {
            return ctx.precondition("There isn't anything new on the map.");
        }

        let revealed = ctx.world.reveal_overmap(here, self.radius, &self.omt_types);
        tracing::debug!(revealed, radius = self.radius, "map read");

        let readers = match item.var(READ_BY_VAR) {
            Some(existing) if !existing.is_empty() => format!("{existing},{reader}"),
            _ => reader,
        };
        item.set_var(READ_BY_VAR, readers);
        ctx.msg(MessageKind::Good, &self.message);
        Ok(0)
    }

    fn can_use(&self, ctx: &UseContext<'_>, item: &Item, _auto: bool, _pos: Position) -> bool {
        !ctx.agent.position().is_underground()
            && !has_read(item, &ctx.agent.id().0.to_string())
    }

    fn clone_actor(&self) -> Box<dyn ItemUseActor> {
        Box::new(self.clone())
    }

    fn info(&self, _item: &Item, _env: ActorEnv<'_>) -> Vec<ItemInfo> {
        vec![ItemInfo::new("Shows", self.omt_types.join(", "))]
    }

    fn name(&self) -> String {
        "Read".to_owned()
    }
}
