//! Content loaders for reading item-use data from files.
//!
//! Each loader turns one RON/TOML file into the snapshot type the oracles
//! serve from; [`ContentFactory`] ties them to a data directory.

pub mod config;
pub mod factory;
pub mod item;
pub mod recipes;
pub mod tables;

pub use config::ConfigLoader;
pub use factory::{ContentBundle, ContentFactory};
pub use item::{ItemCatalog, ItemDefinition, ItemLoader, MaterialLoader};
pub use recipes::RecipeLoader;
pub use tables::{TablesFile, TablesLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
