//! Oracle access errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::ItemTypeId;

/// Errors raised when an oracle is missing or lacks a definition.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("ItemOracle not available")]
    ItemsNotAvailable,

    #[error("RecipeOracle not available")]
    RecipesNotAvailable,

    #[error("TablesOracle not available")]
    TablesNotAvailable,

    #[error("item type {0} not found")]
    UnknownItemType(ItemTypeId),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ItemsNotAvailable => "ORACLE_ITEMS_NOT_AVAILABLE",
            Self::RecipesNotAvailable => "ORACLE_RECIPES_NOT_AVAILABLE",
            Self::TablesNotAvailable => "ORACLE_TABLES_NOT_AVAILABLE",
            Self::UnknownItemType(_) => "ORACLE_UNKNOWN_ITEM_TYPE",
        }
    }
}
