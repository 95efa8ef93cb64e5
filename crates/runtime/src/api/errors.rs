//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from content loading, oracle lookups and actor dispatch so
//! clients can bubble them up with consistent context.
use item_use_core::{
    CharacterId, ErrorSeverity, GameError, ItemId, ItemTypeId, OracleError, Position, UseError,
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to load content: {0:#}")]
    Content(anyhow::Error),

    #[error("agent carries no item {0}")]
    ItemNotFound(ItemId),

    #[error("no item at index {index} on the ground at {pos}")]
    GroundItemNotFound { pos: Position, index: usize },

    #[error("item type `{0}` has no use actions")]
    NoActors(ItemTypeId),

    #[error("item type `{item_type}` has no `{tag}` action")]
    UnknownAction { item_type: ItemTypeId, tag: String },

    #[error("`{tag}` action of `{item_type}` cannot be used right now")]
    Unavailable { item_type: ItemTypeId, tag: String },

    #[error("item type `{0}` is not a repair tool")]
    NotRepairTool(ItemTypeId),

    #[error("`{tag}` action failed")]
    Use {
        tag: &'static str,
        #[source]
        source: UseError,
    },

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("character {0} has no pending long action")]
    NoPendingAction(CharacterId),

    #[error("failed to install log subscriber: {0}")]
    Logging(String),
}

impl RuntimeError {
    /// The actor error behind a failed activation, if any.
    pub fn use_error(&self) -> Option<&UseError> {
        match self {
            Self::Use { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Use { source, .. } => source.severity(),
            Self::Unavailable { .. } | Self::NoPendingAction(_) => ErrorSeverity::Recoverable,
            Self::ItemNotFound(_)
            | Self::GroundItemNotFound { .. }
            | Self::NoActors(_)
            | Self::UnknownAction { .. }
            | Self::NotRepairTool(_) => ErrorSeverity::Validation,
            Self::Oracle(_) | Self::Logging(_) => ErrorSeverity::Internal,
            Self::Content(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Content(_) => "RUNTIME_CONTENT",
            Self::ItemNotFound(_) => "RUNTIME_ITEM_NOT_FOUND",
            Self::GroundItemNotFound { .. } => "RUNTIME_GROUND_ITEM_NOT_FOUND",
            Self::NoActors(_) => "RUNTIME_NO_ACTORS",
            Self::UnknownAction { .. } => "RUNTIME_UNKNOWN_ACTION",
            Self::Unavailable { .. } => "RUNTIME_UNAVAILABLE",
            Self::NotRepairTool(_) => "RUNTIME_NOT_REPAIR_TOOL",
            Self::Use { source, .. } => source.error_code(),
            Self::Oracle(_) => "RUNTIME_ORACLE",
            Self::NoPendingAction(_) => "RUNTIME_NO_PENDING_ACTION",
            Self::Logging(_) => "RUNTIME_LOGGING",
        }
    }
}
