//! Item activation dispatch.
//!
//! An inventory item is detached from its holder for the duration of the
//! call, so the actor never finds it among the holder's other items, and is
//! reattached afterwards minus the charges the actor reports. Ground items
//! are copied out and written back. Items that end up destroyed, used up or
//! flagged as consumed are removed instead.
use item_use_content::ActorCatalog;
use item_use_core::{
    Agent, CharacterId, HealTask, Item, ItemId, ItemLocation, ItemSource, ItemType, ItemTypeId,
    ItemUseActor, MessageKind, Position, Tick, UseContext, UseError, World,
};
use tracing::{debug, trace};

use crate::api::{Result, RuntimeError};
use crate::oracle::OracleManager;
use crate::scheduler::{LongActionScheduler, TickOutcome};
use crate::services::repair::{RepairReport, RepairSession};

/// Where the item to activate is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemRef {
    Inventory(ItemId),
    /// `index` into the ground pile at `pos`.
    Ground { pos: Position, index: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivationRequest {
    pub item: ItemRef,
    /// Type tag of the action to run; `None` picks the first one configured.
    pub action: Option<String>,
    /// Set for calls from active-item processing rather than the agent.
    pub auto: bool,
    /// Tile the activation aims at. Defaults to where the agent or item is.
    pub target: Option<Position>,
}

impl ActivationRequest {
    pub fn carried(id: ItemId) -> Self {
        Self {
            item: ItemRef::Inventory(id),
            action: None,
            auto: false,
            target: None,
        }
    }

    pub fn on_ground(pos: Position, index: usize) -> Self {
        Self {
            item: ItemRef::Ground { pos, index },
            ..Self::carried(ItemId(0))
        }
    }

    pub fn with_action(mut self, tag: impl Into<String>) -> Self {
        self.action = Some(tag.into());
        self
    }

    pub fn at(mut self, target: Position) -> Self {
        self.target = Some(target);
        self
    }

    pub fn autonomous(mut self) -> Self {
        self.auto = true;
        self
    }
}

/// What a successful activation did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Activation {
    pub tag: &'static str,
    /// Charges actually deducted from the item.
    pub charges: u32,
    /// The item no longer exists.
    pub used_up: bool,
    /// The work continues as a long action.
    pub scheduled: bool,
}

/// Charges taken and whether the item is gone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Settlement {
    pub charges: u32,
    pub used_up: bool,
}

/// Deducts up to `charges` from `item` and decides whether it survives.
pub(crate) fn settle(item: &mut Item, ty: &ItemType, charges: u32, consumed: bool) -> Settlement {
    let deducted = if ty.has_charges() || ty.count_by_charges {
        i64::from(charges).min(item.charges.max(0))
    } else {
        0
    };
    item.charges -= deducted;
    let used_up = consumed || item.is_destroyed() || (ty.count_by_charges && item.charges <= 0);
    Settlement {
        charges: u32::try_from(deducted).unwrap_or(charges),
        used_up,
    }
}

/// Location of inventory item `id` relative to `agent`.
pub(crate) fn inventory_source(agent: &dyn Agent, id: ItemId) -> ItemSource {
    let location = if agent.wielded() == Some(id) {
        ItemLocation::Wielded
    } else if agent.is_worn(id) {
        ItemLocation::Worn
    } else {
        ItemLocation::Carried
    };
    ItemSource::at(location, id)
}

/// Writes `item` back into slot `id`, or drops the slot when it is used up.
///
/// Works for detached items as well as ones still in the inventory.
pub(crate) fn restore_inventory_item(agent: &mut dyn Agent, id: ItemId, item: Item, used_up: bool) {
    if used_up {
        agent.take_item(id);
    } else {
        agent.reattach_item(id, item);
    }
}

fn restore(agent: &mut dyn Agent, world: &mut dyn World, at: ItemRef, item: Item, used_up: bool) {
    match at {
        ItemRef::Inventory(id) => restore_inventory_item(agent, id, item, used_up),
        ItemRef::Ground { pos, index } => {
            world.take_ground_item(pos, index);
            if !used_up {
                world.spawn_item(pos, item);
            }
        }
    }
}

/// Lifts an inventory item out of `agent` while an actor looks at it, so
/// inventory scans do not count the item being used.
fn detach(agent: &mut dyn Agent, at: ItemRef) -> Option<(ItemId, Item)> {
    match at {
        ItemRef::Inventory(id) => agent.detach_item(id).map(|item| (id, item)),
        ItemRef::Ground { .. } => None,
    }
}

fn fetch(
    agent: &dyn Agent,
    world: &dyn World,
    request: &ActivationRequest,
) -> Result<(ItemSource, Position, Item)> {
    match request.item {
        ItemRef::Inventory(id) => {
            let item = agent.item(id).cloned().ok_or(RuntimeError::ItemNotFound(id))?;
            let pos = request.target.unwrap_or_else(|| agent.position());
            Ok((inventory_source(agent, id), pos, item))
        }
        ItemRef::Ground { pos, index } => {
            let item = world
                .ground_items(pos)
                .get(index)
                .cloned()
                .ok_or(RuntimeError::GroundItemNotFound { pos, index })?;
            let source = ItemSource {
                location: ItemLocation::Ground,
                id: None,
            };
            Ok((source, request.target.unwrap_or(pos), item))
        }
    }
}

fn select<'c>(
    catalog: &'c ActorCatalog,
    item_type: &ItemTypeId,
    tag: Option<&str>,
) -> Result<&'c dyn ItemUseActor> {
    let actors = catalog.actors_for(item_type);
    let Some(first) = actors.first() else {
        return Err(RuntimeError::NoActors(item_type.clone()));
    };
    match tag {
        None => Ok(first.as_ref()),
        Some(tag) => catalog
            .find(item_type, tag)
            .ok_or_else(|| RuntimeError::UnknownAction {
                item_type: item_type.clone(),
                tag: tag.to_owned(),
            }),
    }
}

/// Front door for item activations.
///
/// Owns the oracles and the long-action scheduler, and tracks the current
/// turn handed to every actor.
#[derive(Debug)]
pub struct ActivationService {
    oracles: OracleManager,
    scheduler: LongActionScheduler,
    turn: Tick,
}

impl ActivationService {
    pub fn new(oracles: OracleManager) -> Self {
        let scheduler = LongActionScheduler::new(oracles.session().long_action_step);
        Self {
            oracles,
            scheduler,
            turn: Tick::default(),
        }
    }

    pub fn oracles(&self) -> &OracleManager {
        &self.oracles
    }

    pub fn scheduler(&self) -> &LongActionScheduler {
        &self.scheduler
    }

    pub fn turn(&self) -> Tick {
        self.turn
    }

    pub fn set_turn(&mut self, turn: Tick) {
        self.turn = turn;
    }

    /// Menu entries (tag, label) for every action of `item_type`.
    pub fn actions(&self, item_type: &ItemTypeId) -> Vec<(&'static str, String)> {
        self.oracles
            .catalog()
            .actors_for(item_type)
            .iter()
            .map(|actor| (actor.type_tag(), actor.name()))
            .collect()
    }

    /// Tags of the actions whose `can_use` passes right now.
    pub fn usable_actions(
        &mut self,
        agent: &mut dyn Agent,
        world: &mut dyn World,
        request: &ActivationRequest,
    ) -> Result<Vec<&'static str>> {
        let (source, pos, item) = fetch(&*agent, &*world, request)?;
        let turn = self.turn;
        let (env, catalog, rng) = self.oracles.parts_mut();
        let detached = detach(agent, request.item);
        let usable = {
            let ctx = UseContext::new(&mut *agent, &mut *world, env, rng, turn).with_source(source);
            catalog
                .actors_for(&item.type_id)
                .iter()
                .filter(|actor| actor.can_use(&ctx, &item, request.auto, pos))
                .map(|actor| actor.type_tag())
                .collect()
        };
        if let Some((id, original)) = detached {
            agent.reattach_item(id, original);
        }
        Ok(usable)
    }

    /// Runs one activation end to end.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::Use`] when the actor consumed nothing; the agent has
    /// already been told why. Lookup failures when the item or its action
    /// does not exist.
    pub fn activate(
        &mut self,
        agent: &mut dyn Agent,
        world: &mut dyn World,
        request: &ActivationRequest,
    ) -> Result<Activation> {
        let (source, pos, mut item) = fetch(&*agent, &*world, request)?;
        let item_type = item.type_id.clone();
        let turn = self.turn;
        let (env, catalog, rng) = self.oracles.parts_mut();
        let ty = env.item_type(&item_type)?;
        let actor = select(catalog, &item_type, request.action.as_deref())?;
        let tag = actor.type_tag();
        let required = actor.cost().unwrap_or(ty.charges_to_use);
        trace!(%item_type, tag, auto = request.auto, %pos, "dispatching item use");

        let detached = detach(agent, request.item).is_some();
        let dispatched = {
            let mut ctx =
                UseContext::new(&mut *agent, &mut *world, env, rng, turn).with_source(source);
            if !actor.can_use(&ctx, &item, request.auto, pos) {
                debug!(%item_type, tag, "action unavailable");
                Err(RuntimeError::Unavailable {
                    item_type: item_type.clone(),
                    tag: tag.to_owned(),
                })
            } else if ty.has_charges() && item.charges < i64::from(required) {
                let source = UseError::Insufficient(format!(
                    "Your {} doesn't have enough charges.",
                    ty.name
                ));
                ctx.msg(MessageKind::Info, &source.to_string());
                debug!(%item_type, tag, charges = item.charges, required, "not enough charges");
                Err(RuntimeError::Use { tag, source })
            } else {
                let result = actor.use_item(&mut ctx, &mut item, request.auto, pos);
                Ok((result, ctx.consumed))
            }
        };
        let (result, consumed) = match dispatched {
            Ok(dispatched) => dispatched,
            Err(err) => {
                if detached {
                    restore(agent, world, request.item, item, false);
                }
                return Err(err);
            }
        };

        let after = match env.item_type(&item.type_id) {
            Ok(after) => after,
            Err(err) => {
                restore(agent, world, request.item, item, false);
                return Err(err.into());
            }
        };
        let reported = result.as_ref().map_or(0, |charges| *charges);
        let settlement = settle(&mut item, after, reported, consumed);
        restore(agent, world, request.item, item, settlement.used_up);

        let scheduled = actor.as_heal().is_some() && self.scheduler.adopt(agent, &item_type);
        match result {
            Ok(_) => {
                debug!(
                    %item_type,
                    tag,
                    charges = settlement.charges,
                    used_up = settlement.used_up,
                    scheduled,
                    "item used"
                );
                Ok(Activation {
                    tag,
                    charges: settlement.charges,
                    used_up: settlement.used_up,
                    scheduled,
                })
            }
            Err(source) => {
                debug!(%item_type, tag, error = %source, "item use refused");
                Err(RuntimeError::Use { tag, source })
            }
        }
    }

    /// Advances `healer`'s long action by one scheduler step.
    pub fn advance_long_action(
        &mut self,
        healer: &mut dyn Agent,
        world: &mut dyn World,
    ) -> Result<TickOutcome> {
        self.scheduler
            .tick(healer, world, &mut self.oracles, self.turn)
    }

    /// Drops `healer`'s long action without applying any of it.
    pub fn cancel_long_action(&mut self, healer: CharacterId) -> Result<HealTask> {
        self.scheduler
            .cancel(healer)
            .ok_or(RuntimeError::NoPendingAction(healer))
    }

    /// Repairs `target` with `tool` until the agent stops or the outcome ends
    /// the session.
    pub fn repair(
        &mut self,
        agent: &mut dyn Agent,
        world: &mut dyn World,
        tool: ItemId,
        target: ItemId,
    ) -> Result<RepairReport> {
        let limit = self.oracles.session().max_repair_attempts;
        RepairSession::new(tool, target, limit).run(agent, world, &mut self.oracles, self.turn)
    }
}
