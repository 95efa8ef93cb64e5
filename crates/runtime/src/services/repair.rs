//! Repair sessions.
//!
//! One session is one tool working one target. Attempts repeat while the
//! outcome allows it and the agent agrees to go on, up to an attempt limit.
use item_use_core::{Agent, ItemId, MessageKind, RepairOutcome, Tick, UseContext, World};
use tracing::{debug, info};

use crate::api::{Result, RuntimeError};
use crate::oracle::OracleManager;
use crate::services::{inventory_source, restore_inventory_item, settle};

/// Why a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepairStop {
    /// The last outcome ends the session.
    Outcome(RepairOutcome),
    /// The agent chose not to continue.
    Declined,
    AttemptLimit,
    /// The tool cannot pay for another attempt.
    OutOfCharges,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepairReport {
    pub outcomes: Vec<RepairOutcome>,
    pub stop: RepairStop,
}

impl RepairReport {
    pub fn attempts(&self) -> usize {
        self.outcomes.len()
    }

    pub fn last(&self) -> Option<RepairOutcome> {
        self.outcomes.last().copied()
    }
}

#[derive(Clone, Debug)]
pub struct RepairSession {
    tool: ItemId,
    target: ItemId,
    max_attempts: u32,
    outcomes: Vec<RepairOutcome>,
}

impl RepairSession {
    pub fn new(tool: ItemId, target: ItemId, max_attempts: u32) -> Self {
        Self {
            tool,
            target,
            max_attempts,
            outcomes: Vec::new(),
        }
    }

    /// Runs attempts until the session ends.
    ///
    /// Each attempt that was actually made costs the tool its
    /// `charges_to_use`. A destroyed target is removed from the inventory.
    pub fn run(
        mut self,
        agent: &mut dyn Agent,
        world: &mut dyn World,
        oracles: &mut OracleManager,
        turn: Tick,
    ) -> Result<RepairReport> {
        let stop = loop {
            if self.outcomes.len() >= self.max_attempts as usize {
                break RepairStop::AttemptLimit;
            }
            let outcome = match self.attempt(agent, world, oracles, turn)? {
                Some(outcome) => outcome,
                None => break RepairStop::OutOfCharges,
            };
            self.outcomes.push(outcome);
            if !outcome.can_continue() {
                break RepairStop::Outcome(outcome);
            }
            let Some(fix) = agent.item(self.target) else {
                break RepairStop::Outcome(outcome);
            };
            let name = oracles.env().item_name(&fix.type_id);
            if !agent.query_yn(&format!("Keep working on your {name}?")) {
                break RepairStop::Declined;
            }
        };

        info!(
            tool = %self.tool,
            target = %self.target,
            attempts = self.outcomes.len(),
            ?stop,
            "repair session finished"
        );
        Ok(RepairReport {
            outcomes: self.outcomes,
            stop,
        })
    }

    /// One attempt; `None` when the tool is out of charges.
    fn attempt(
        &self,
        agent: &mut dyn Agent,
        world: &mut dyn World,
        oracles: &mut OracleManager,
        turn: Tick,
    ) -> Result<Option<RepairOutcome>> {
        let mut tool = agent
            .item(self.tool)
            .cloned()
            .ok_or(RuntimeError::ItemNotFound(self.tool))?;
        if agent.item(self.target).is_none() {
            return Err(RuntimeError::ItemNotFound(self.target));
        }
        let source = inventory_source(&*agent, self.tool);

        let (env, catalog, rng) = oracles.parts_mut();
        let tool_type = env.item_type(&tool.type_id)?;
        let actor = catalog
            .actors_for(&tool.type_id)
            .iter()
            .find_map(|actor| actor.as_repair())
            .ok_or_else(|| RuntimeError::NotRepairTool(tool.type_id.clone()))?;

        if tool_type.has_charges() && tool.charges < i64::from(tool_type.charges_to_use) {
            agent.add_msg(
                MessageKind::Info,
                &format!("Your {} has run out of charges.", tool_type.name),
            );
            return Ok(None);
        }

        // Detached so the target never counts as its own component.
        let Some(mut fix) = agent.detach_item(self.target) else {
            return Err(RuntimeError::ItemNotFound(self.target));
        };
        let outcome = {
            let mut ctx =
                UseContext::new(&mut *agent, &mut *world, env, rng, turn).with_source(source);
            actor.repair(&mut ctx, &tool, &mut fix)
        };
        let destroyed = matches!(outcome, Ok(RepairOutcome::Destroyed));
        restore_inventory_item(agent, self.target, fix, destroyed);
        let outcome = outcome.map_err(|source| RuntimeError::Use {
            tag: "repair_item",
            source,
        })?;
        debug!(attempt = self.outcomes.len() + 1, %outcome, "repair attempt");

        if outcome.was_attempted() {
            let spent = settle(&mut tool, tool_type, tool_type.charges_to_use, false);
            restore_inventory_item(agent, self.tool, tool, spent.used_up);
        }
        Ok(Some(outcome))
    }
}
