//! Data-driven item-use content and loaders.
//!
//! This crate reads static content from RON/TOML data files:
//! - Item catalogs with each type's `use_action` records
//! - Materials and crafting recipes
//! - Rule tables (skills, effects, monsters, traps, terrain)
//! - Session configuration
//!
//! Loaded data fills the core crate's snapshot oracles. The [`ActorCatalog`]
//! then turns the raw records into finalized actors.

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{ActorCatalog, RejectedRecord};

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentBundle, ContentFactory, ItemCatalog, ItemDefinition, ItemLoader,
    LoadResult, MaterialLoader, RecipeLoader, TablesFile, TablesLoader,
};
