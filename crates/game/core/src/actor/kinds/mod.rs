//! Built-in actor kinds.
//!
//! One module per behavior family. Each actor is a plain struct whose fields
//! mirror its configuration record; `Default` yields the prototype the
//! registry clones before loading.
mod armor;
mod cauterize;
mod containment;
mod drug;
mod enzlave;
mod explosion;
mod firestarter;
mod fireweapon;
mod heal;
mod inscribe;
mod lockpick;
mod noise;
mod repair;
mod reveal;
mod salvage;
mod spawn;
mod transform;
mod trap;

pub use armor::UpsArmorActor;
pub use cauterize::{CauterizeActor, cauterize_effect};
pub use containment::{AmmobeltActor, BandolierActor, HolsterActor};
pub use drug::ConsumeDrugActor;
pub use enzlave::EnzlaveActor;
pub use explosion::ExplosionActor;
pub use firestarter::FirestarterActor;
pub use fireweapon::{FireweaponOffActor, FireweaponOnActor};
pub use heal::HealActor;
pub use inscribe::{InscribeActor, InscribeSurface};
pub use lockpick::PicklockActor;
pub use noise::{ManualNoiseActor, MusicalInstrumentActor};
pub use repair::{RepairAction, RepairItemActor, RepairOutcome};
pub use reveal::RevealMapActor;
pub use salvage::SalvageActor;
pub use spawn::{PlaceMonsterActor, UnfoldVehicleActor};
pub use transform::{CountdownActor, DelayedTransformActor, TransformActor};
pub use trap::{PlaceTrapActor, TrapPlacementData};

use std::collections::BTreeMap;

use super::{ConfigError, ConfigRecord, ItemUseActor, UseContext};
use crate::env::ActorEnv;
use crate::state::{EffectData, ItemTypeId, SkillId};

/// Default prototype of every built-in kind.
pub fn builtin() -> Vec<Box<dyn ItemUseActor>> {
    vec![
        Box::new(TransformActor::default()),
        Box::new(CountdownActor::default()),
        Box::new(ExplosionActor::default()),
        Box::new(UnfoldVehicleActor::default()),
        Box::new(ConsumeDrugActor::default()),
        Box::new(DelayedTransformActor::default()),
        Box::new(PlaceMonsterActor::default()),
        Box::new(UpsArmorActor::default()),
        Box::new(PicklockActor::default()),
        Box::new(RevealMapActor::default()),
        Box::new(FirestarterActor::default()),
        Box::new(SalvageActor::default()),
        Box::new(InscribeActor::default()),
        Box::new(CauterizeActor::default()),
        Box::new(EnzlaveActor::default()),
        Box::new(FireweaponOffActor::default()),
        Box::new(FireweaponOnActor::default()),
        Box::new(ManualNoiseActor::default()),
        Box::new(MusicalInstrumentActor::default()),
        Box::new(HolsterActor::default()),
        Box::new(BandolierActor::default()),
        Box::new(AmmobeltActor::default()),
        Box::new(RepairItemActor::default()),
        Box::new(HealActor::default()),
        Box::new(PlaceTrapActor::default()),
    ]
}

// ===== finalize helpers =====

fn known_item(env: ActorEnv<'_>, field: &str, id: &ItemTypeId) -> Result<(), ConfigError> {
    match env.items()?.item_type(id) {
        Some(_) => Ok(()),
        None => Err(ConfigError::unknown(field, "item type", id)),
    }
}

fn known_skill(env: ActorEnv<'_>, field: &str, id: &SkillId) -> Result<(), ConfigError> {
    match env.tables()?.skill(id) {
        Some(_) => Ok(()),
        None => Err(ConfigError::unknown(field, "skill", id)),
    }
}

fn known_effects(env: ActorEnv<'_>, field: &str, effects: &[EffectData]) -> Result<(), ConfigError> {
    let tables = env.tables()?;
    match effects.iter().find(|e| tables.effect(&e.id).is_none()) {
        Some(missing) => Err(ConfigError::unknown(field, "effect", &missing.id)),
        None => Ok(()),
    }
}

// ===== shared use helpers =====

/// Checks that every `(tool, count)` is carried, counting charges for
/// charge-stacked tools.
fn has_tools(ctx: &UseContext<'_>, tools: &BTreeMap<ItemTypeId, i64>) -> bool {
    tools.iter().all(|(tool, count)| {
        let by_charges = ctx
            .env
            .item_type(tool)
            .is_ok_and(|ty| ty.count_by_charges);
        if by_charges {
            ctx.agent.has_charges(tool, *count)
        } else {
            ctx.agent.has_amount(tool, *count)
        }
    })
}

fn load_tools(record: &ConfigRecord, key: &str) -> Result<BTreeMap<ItemTypeId, i64>, ConfigError> {
    Ok(record
        .get_int_map(key)?
        .into_iter()
        .map(|(id, count)| (ItemTypeId::new(id), count))
        .collect())
}

#[cfg(test)]
pub(crate) mod testing {
    //! Harness wiring sandbox collaborators into a `UseContext`.

    use crate::agent::Inventory;
    use super::super::{ActorRegistry, ConfigRecord, ItemUseActor, UseContext, UseResult};
    use crate::env::OracleSnapshot;
    use crate::sandbox::{SandboxCharacter, SandboxWorld, ScriptedRng, fixtures};
    use crate::state::{Item, ItemId, ItemSource, ItemTypeId, Position, Tick};

    /// Instantiates and finalizes an actor against the fixture content.
    pub fn actor(item_type: &str, record: ConfigRecord) -> Box<dyn ItemUseActor> {
        let content = fixtures::content();
        let mut actor = ActorRegistry::with_builtin()
            .instantiate(&record)
            .expect("record loads");
        actor
            .finalize(&ItemTypeId::new(item_type), content.env())
            .expect("record finalizes");
        actor
    }

    pub struct Harness {
        pub content: OracleSnapshot,
        pub you: SandboxCharacter,
        pub world: SandboxWorld,
        pub rng: ScriptedRng,
        pub turn: Tick,
        pub source: ItemSource,
        pub consumed: bool,
    }

    impl Harness {
        pub fn new() -> Self {
            Self {
                content: fixtures::content(),
                you: SandboxCharacter::player(),
                world: SandboxWorld::new(),
                rng: ScriptedRng::new(7),
                turn: Tick(1000),
                source: ItemSource::default(),
                consumed: false,
            }
        }

        pub fn with_rolls(mut self, units: impl IntoIterator<Item = f64>) -> Self {
            for unit in units {
                self.rng.push(unit);
            }
            self
        }

        /// Puts `item` in the inventory and marks it as the invoked item.
        pub fn carry(&mut self, item: Item) -> ItemId {
            let id = self.you.add_item(item);
            self.source = ItemSource::carried(id);
            id
        }

        pub fn run(&mut self, actor: &dyn ItemUseActor, item: &mut Item) -> UseResult {
            self.run_with(actor, item, false)
        }

        pub fn run_with(&mut self, actor: &dyn ItemUseActor, item: &mut Item, auto: bool) -> UseResult {
            let pos = self.you.position;
            let mut ctx = UseContext::new(
                &mut self.you,
                &mut self.world,
                self.content.env(),
                &mut self.rng,
                self.turn,
            )
            .with_source(self.source);
            let result = actor.use_item(&mut ctx, item, auto, pos);
            self.consumed = ctx.consumed;
            result
        }

        /// Runs `f` against a context built from the harness state.
        pub fn with_ctx<R>(&mut self, f: impl FnOnce(&mut UseContext<'_>) -> R) -> R {
            let mut ctx = UseContext::new(
                &mut self.you,
                &mut self.world,
                self.content.env(),
                &mut self.rng,
                self.turn,
            )
            .with_source(self.source);
            let result = f(&mut ctx);
            self.consumed = ctx.consumed;
            result
        }

        pub fn can_use(&mut self, actor: &dyn ItemUseActor, item: &Item) -> bool {
            let pos: Position = self.you.position;
            let ctx = UseContext::new(
                &mut self.you,
                &mut self.world,
                self.content.env(),
                &mut self.rng,
                self.turn,
            )
            .with_source(self.source);
            actor.can_use(&ctx, item, false, pos)
        }
    }
}
