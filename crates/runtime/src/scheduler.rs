//! Long first-aid treatments resumed across ticks.
//!
//! A heal actor configured as a long action hands back a [`HealTask`] instead
//! of healing. The scheduler owns that record, burns the healer's moves a step
//! at a time and calls [`HealActor::finish_using`] once the work is done.
//! Cancelling drops the record; nothing was applied yet, so nothing is undone.
//!
//! [`HealActor::finish_using`]: item_use_core::HealActor::finish_using
use std::collections::BTreeMap;

use item_use_core::{Activity, Agent, CharacterId, HealTask, ItemTypeId, Tick, UseContext, World};
use tracing::{debug, info, trace, warn};

use crate::api::{Result, RuntimeError};
use crate::oracle::OracleManager;
use crate::services::{inventory_source, restore_inventory_item, settle};

/// A scheduled treatment and the item type that started it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingHeal {
    pub task: HealTask,
    pub item_type: ItemTypeId,
}

/// A treatment that ran to completion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HealCompletion {
    pub task: HealTask,
    pub charges: u32,
    pub used_up: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The healer has nothing scheduled.
    Idle,
    InProgress { remaining: u32 },
    Finished(HealCompletion),
    /// The treatment could not be finished; nothing was applied.
    Aborted { task: HealTask, reason: String },
}

#[derive(Clone, Debug)]
pub struct LongActionScheduler {
    step: u32,
    pending: BTreeMap<CharacterId, PendingHeal>,
}

impl LongActionScheduler {
    /// `step` is how many moves of work one tick performs.
    pub fn new(step: u32) -> Self {
        Self {
            step: step.max(1),
            pending: BTreeMap::new(),
        }
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn pending(&self, healer: CharacterId) -> Option<&PendingHeal> {
        self.pending.get(&healer)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queues `task`, replacing any treatment its healer had pending.
    pub fn schedule(&mut self, task: HealTask, item_type: ItemTypeId) {
        debug!(
            healer = %task.healer,
            part = %task.body_part,
            moves = task.moves,
            "long action scheduled"
        );
        if let Some(old) = self.pending.insert(task.healer, PendingHeal { task, item_type }) {
            warn!(healer = %old.task.healer, "replaced unfinished long action");
        }
    }

    /// Moves a first-aid activity assigned to `agent` into the queue.
    ///
    /// Other activities are left with the agent. Returns whether a task was
    /// taken.
    pub fn adopt(&mut self, agent: &mut dyn Agent, item_type: &ItemTypeId) -> bool {
        match agent.take_activity() {
            Some(Activity::FirstAid(task)) => {
                self.schedule(task, item_type.clone());
                true
            }
            Some(other) => {
                agent.assign_activity(other);
                false
            }
            None => false,
        }
    }

    /// Drops `healer`'s treatment without applying it.
    pub fn cancel(&mut self, healer: CharacterId) -> Option<HealTask> {
        let pending = self.pending.remove(&healer)?;
        warn!(
            %healer,
            remaining = pending.task.moves,
            "long action cancelled"
        );
        Some(pending.task)
    }

    /// Performs one step of `healer`'s treatment, finishing it when no work
    /// remains.
    pub fn tick(
        &mut self,
        healer: &mut dyn Agent,
        world: &mut dyn World,
        oracles: &mut OracleManager,
        turn: Tick,
    ) -> Result<TickOutcome> {
        let id = healer.id();
        let Some(pending) = self.pending.get_mut(&id) else {
            return Ok(TickOutcome::Idle);
        };
        let step = self.step.min(pending.task.moves);
        pending.task.moves -= step;
        healer.mod_moves(-i32::try_from(step).unwrap_or(i32::MAX));
        let remaining = pending.task.moves;
        if remaining > 0 {
            trace!(healer = %id, remaining, "long action progressed");
            return Ok(TickOutcome::InProgress { remaining });
        }

        let Some(PendingHeal { task, item_type }) = self.pending.remove(&id) else {
            return Ok(TickOutcome::Idle);
        };
        Self::finish(healer, world, oracles, turn, task, item_type)
    }

    fn finish(
        healer: &mut dyn Agent,
        world: &mut dyn World,
        oracles: &mut OracleManager,
        turn: Tick,
        task: HealTask,
        item_type: ItemTypeId,
    ) -> Result<TickOutcome> {
        let abort = |task: HealTask, reason: &str| -> Result<TickOutcome> {
            warn!(healer = %task.healer, reason, "long action aborted");
            Ok(TickOutcome::Aborted {
                task,
                reason: reason.to_owned(),
            })
        };
        let Some(mut item) = healer.item(task.item).cloned() else {
            return abort(task, "the item is gone");
        };
        if item.type_id != item_type {
            return abort(task, "the item has changed");
        }
        let source = inventory_source(&*healer, task.item);

        let (env, catalog, rng) = oracles.parts_mut();
        let heal = catalog
            .actors_for(&item_type)
            .iter()
            .find_map(|actor| actor.as_heal())
            .ok_or_else(|| RuntimeError::NoActors(item_type.clone()))?;
        let patient = (task.patient != task.healer).then_some(task.patient);

        let (result, consumed) = {
            let mut ctx =
                UseContext::new(&mut *healer, &mut *world, env, rng, turn).with_source(source);
            ctx.agent.detach_item(task.item);
            let result = heal.finish_using(&mut ctx, &mut item, patient, task.body_part);
            (result, ctx.consumed)
        };

        let after = match env.item_type(&item.type_id) {
            Ok(after) => after,
            Err(err) => {
                restore_inventory_item(healer, task.item, item, false);
                return Err(err.into());
            }
        };
        let reported = result.as_ref().map_or(0, |charges| *charges);
        let settlement = settle(&mut item, after, reported, consumed);
        restore_inventory_item(healer, task.item, item, settlement.used_up);
        result.map_err(|source| RuntimeError::Use { tag: "heal", source })?;

        info!(
            healer = %task.healer,
            patient = %task.patient,
            part = %task.body_part,
            charges = settlement.charges,
            "long action finished"
        );
        Ok(TickOutcome::Finished(HealCompletion {
            task,
            charges: settlement.charges,
            used_up: settlement.used_up,
        }))
    }
}
