//! The item-use actor contract.
//!
//! Every behavior an item can trigger implements [`ItemUseActor`]. Actors are
//! built once from configuration (prototype clone + [`load`]), resolved
//! against content in [`finalize`], then shared immutably: [`use_item`] and
//! [`can_use`] take `&self`.
//!
//! Call flow for one activation:
//!
//! 1. the caller resolves the actors attached to the item type
//! 2. [`can_use`] gates availability without side effects
//! 3. [`use_item`] runs the behavior and returns the charges to deduct, or an
//!    error meaning nothing was consumed
//!
//! [`load`]: ItemUseActor::load
//! [`finalize`]: ItemUseActor::finalize
//! [`use_item`]: ItemUseActor::use_item
//! [`can_use`]: ItemUseActor::can_use
pub mod kinds;
mod record;
mod registry;

use std::fmt;

pub use record::{ConfigError, ConfigRecord, ConfigValue};
pub use registry::ActorRegistry;

use crate::agent::{Agent, MessageKind};
use crate::env::{ActorEnv, OracleError, RngOracle};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{Item, ItemSource, ItemTypeId, Position, Tick};
use crate::world::World;
use kinds::{HealActor, RepairItemActor};

/// Charges to deduct from the invoked item, or why nothing was consumed.
pub type UseResult = Result<u32, UseError>;

/// Why an activation consumed nothing.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UseError {
    /// Location, state or target does not allow the action.
    #[error("{0}")]
    Precondition(String),

    /// Not enough charges, components or tools.
    #[error("{0}")]
    Insufficient(String),

    /// The attempt was made and did not work.
    #[error("{0}")]
    Failed(String),

    /// The agent backed out of a prompt.
    #[error("never mind")]
    Cancelled,

    /// An id that finalize should have resolved is unknown.
    #[error("unknown {kind} `{id}`")]
    UnknownReference { kind: &'static str, id: String },

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl UseError {
    pub fn unknown(kind: &'static str, id: impl ToString) -> Self {
        Self::UnknownReference {
            kind,
            id: id.to_string(),
        }
    }

    /// Tone used when the error is reported to the agent.
    pub fn message_kind(&self) -> MessageKind {
        match self {
            Self::Precondition(_) => MessageKind::Info,
            Self::Insufficient(_) => MessageKind::Info,
            Self::Failed(_) => MessageKind::Bad,
            Self::Cancelled => MessageKind::Neutral,
            Self::UnknownReference { .. } | Self::Oracle(_) => MessageKind::Warning,
        }
    }
}

impl GameError for UseError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Precondition(_) | Self::Insufficient(_) | Self::Failed(_) | Self::Cancelled => {
                ErrorSeverity::Recoverable
            }
            Self::UnknownReference { .. } | Self::Oracle(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Precondition(_) => "USE_PRECONDITION",
            Self::Insufficient(_) => "USE_INSUFFICIENT",
            Self::Failed(_) => "USE_FAILED",
            Self::Cancelled => "USE_CANCELLED",
            Self::UnknownReference { .. } => "USE_UNKNOWN_REFERENCE",
            Self::Oracle(_) => "USE_ORACLE",
        }
    }
}

/// One line of item description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemInfo {
    pub label: String,
    pub text: String,
}

impl ItemInfo {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

/// Everything an activation may read or mutate.
pub struct UseContext<'a> {
    pub agent: &'a mut dyn Agent,
    pub world: &'a mut dyn World,
    pub env: ActorEnv<'a>,
    pub rng: &'a mut dyn RngOracle,
    pub turn: Tick,
    pub source: ItemSource,
    /// Set by actors that use up the invoked item entirely.
    pub consumed: bool,
}

impl<'a> UseContext<'a> {
    pub fn new(
        agent: &'a mut dyn Agent,
        world: &'a mut dyn World,
        env: ActorEnv<'a>,
        rng: &'a mut dyn RngOracle,
        turn: Tick,
    ) -> Self {
        Self {
            agent,
            world,
            env,
            rng,
            turn,
            source: ItemSource::default(),
            consumed: false,
        }
    }

    pub fn with_source(mut self, source: ItemSource) -> Self {
        self.source = source;
        self
    }

    /// Marks the invoked item for removal once `use_item` returns.
    pub fn consume_item(&mut self) {
        self.consumed = true;
    }

    pub fn msg(&mut self, kind: MessageKind, text: &str) {
        if !text.is_empty() {
            self.agent.add_msg(kind, text);
        }
    }

    /// Reports `err` to the agent and returns it.
    pub fn refuse<T>(&mut self, err: UseError) -> Result<T, UseError> {
        if !matches!(err, UseError::Cancelled) {
            let kind = err.message_kind();
            self.msg(kind, &err.to_string());
        }
        Err(err)
    }

    pub fn precondition<T>(&mut self, text: impl Into<String>) -> Result<T, UseError> {
        self.refuse(UseError::Precondition(text.into()))
    }

    pub fn insufficient<T>(&mut self, text: impl Into<String>) -> Result<T, UseError> {
        self.refuse(UseError::Insufficient(text.into()))
    }

    pub fn failed<T>(&mut self, text: impl Into<String>) -> Result<T, UseError> {
        self.refuse(UseError::Failed(text.into()))
    }

    pub fn item_name(&self, item: &Item) -> String {
        self.env.item_name(&item.type_id)
    }

    pub fn charges_to_use(&self, item: &Item) -> u32 {
        self.env.charges_to_use(&item.type_id)
    }

    /// True when the item holds enough charges for one activation, or holds
    /// no charges at all.
    pub fn has_enough_charges(&self, item: &Item) -> bool {
        match self.env.item_type(&item.type_id) {
            Ok(ty) if ty.has_charges() => item.charges >= i64::from(ty.charges_to_use),
            _ => true,
        }
    }
}

/// Capability contract every item behavior implements.
pub trait ItemUseActor: Send + Sync + fmt::Debug {
    /// Configuration tag (`"transform"`, `"heal"`, ...).
    fn type_tag(&self) -> &'static str;

    /// Charges one activation costs; `None` defers to the item type's
    /// `charges_to_use`.
    fn cost(&self) -> Option<u32> {
        None
    }

    /// Reads this actor's fields from a record. Missing optional fields keep
    /// their defaults.
    fn load(&mut self, record: &ConfigRecord) -> Result<(), ConfigError>;

    /// Performs the behavior. `auto` marks a call from active-item processing
    /// rather than an explicit activation; `pos` is where the item is.
    fn use_item(
        &self,
        ctx: &mut UseContext<'_>,
        item: &mut Item,
        auto: bool,
        pos: Position,
    ) -> UseResult;

    /// Whether [`use_item`](Self::use_item) could currently succeed. Never mutates.
    fn can_use(&self, _ctx: &UseContext<'_>, _item: &Item, _auto: bool, _pos: Position) -> bool {
        true
    }

    fn clone_actor(&self) -> Box<dyn ItemUseActor>;

    /// Description lines for the item info screen.
    fn info(&self, _item: &Item, _env: ActorEnv<'_>) -> Vec<ItemInfo> {
        Vec::new()
    }

    /// Menu label for this action.
    fn name(&self) -> String {
        "Activate".to_owned()
    }

    /// Resolves cross references once all content is loaded.
    fn finalize(&mut self, _item_type: &ItemTypeId, _env: ActorEnv<'_>) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Access to the heal behavior for long-action completion.
    fn as_heal(&self) -> Option<&HealActor> {
        None
    }

    /// Access to the repair behavior for multi-attempt sessions.
    fn as_repair(&self) -> Option<&RepairItemActor> {
        None
    }
}

impl Clone for Box<dyn ItemUseActor> {
    fn clone(&self) -> Self {
        self.clone_actor()
    }
}
