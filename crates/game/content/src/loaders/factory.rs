//! Content factory for building oracles from data files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use item_use_core::{
    ActorRegistry, ConfigRecord, ItemTypeId, OracleSnapshot, RecipesSnapshot, SessionConfig,
    TablesSnapshot,
};
use tracing::{debug, info};

use crate::catalog::ActorCatalog;
use crate::loaders::{
    ConfigLoader, ItemCatalog, ItemLoader, LoadResult, MaterialLoader, RecipeLoader, TablesLoader,
};

/// Everything loaded from one data directory.
#[derive(Debug, Clone, Default)]
pub struct ContentBundle {
    pub snapshot: OracleSnapshot,
    /// `use_action` records per item type, not yet instantiated.
    pub use_actions: BTreeMap<ItemTypeId, Vec<ConfigRecord>>,
    pub session: SessionConfig,
}

impl ContentBundle {
    /// Runs the finalization pass over every `use_action` record.
    pub fn build_catalog(&self, registry: &ActorRegistry) -> ActorCatalog {
        ActorCatalog::build(
            registry,
            self.use_actions
                .iter()
                .map(|(id, records)| (id, records.as_slice())),
            self.snapshot.env(),
        )
    }
}

/// Content factory that loads all item-use content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── items.ron       (required)
/// ├── materials.ron
/// ├── recipes.ron
/// ├── tables.ron
/// └── session.toml
/// ```
///
/// Every file but `items.ron` is optional; a missing one loads as empty (or
/// as the default session).
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load session configuration from `session.toml`.
    pub fn load_session(&self) -> LoadResult<SessionConfig> {
        self.optional("session.toml", ConfigLoader::load)
    }

    /// Load the item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<ItemCatalog> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    /// Load materials from `materials.ron`.
    pub fn load_materials(&self) -> LoadResult<Vec<item_use_core::MaterialType>> {
        self.optional("materials.ron", MaterialLoader::load)
    }

    /// Load recipes from `recipes.ron`.
    pub fn load_recipes(&self) -> LoadResult<RecipesSnapshot> {
        self.optional("recipes.ron", RecipeLoader::load)
    }

    /// Load rule tables from `tables.ron`.
    pub fn load_tables(&self) -> LoadResult<TablesSnapshot> {
        self.optional("tables.ron", TablesLoader::load)
    }

    /// Load every file into one bundle.
    pub fn load_bundle(&self) -> LoadResult<ContentBundle> {
        let (mut items, use_actions) = self.load_items()?.into_parts();
        for material in self.load_materials()? {
            items.insert_material(material);
        }
        let recipes = self.load_recipes()?;
        let tables = self.load_tables()?;
        let session = self.load_session()?;

        info!(
            data_dir = %self.data_dir.display(),
            item_types = items.item_types.len(),
            materials = items.materials.len(),
            recipes = recipes.recipes.len(),
            "content loaded"
        );
        Ok(ContentBundle {
            snapshot: OracleSnapshot::new(items, recipes, tables),
            use_actions,
            session,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn optional<T: Default>(
        &self,
        file: &str,
        load: impl FnOnce(&Path) -> LoadResult<T>,
    ) -> LoadResult<T> {
        let path = self.data_dir.join(file);
        if !path.exists() {
            debug!(path = %path.display(), "optional content file missing");
            return Ok(T::default());
        }
        load(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn test_only_items_are_required() {
        let temp_dir = TempDir::new().unwrap();
        let factory = ContentFactory::new(temp_dir.path());
        assert!(factory.load_bundle().is_err());

        fs::write(
            temp_dir.path().join("items.ron"),
            r#"(items: [(item: (id: "rag", name: "rag"))])"#,
        )
        .unwrap();
        let bundle = factory.load_bundle().unwrap();
        assert_eq!(bundle.snapshot.items.item_types.len(), 1);
        assert!(bundle.use_actions.is_empty());
        assert_eq!(bundle.session, SessionConfig::default());
    }

    #[test]
    fn test_bad_files_fail_loudly() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("items.ron"), "(items: [])").unwrap();
        fs::write(temp_dir.path().join("session.toml"), "seed = \"many\"").unwrap();
        let err = ContentFactory::new(temp_dir.path())
            .load_bundle()
            .unwrap_err();
        assert!(err.to_string().contains("session TOML"));
    }

    #[test]
    fn test_bundled_content_finalizes() {
        let factory = ContentFactory::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"));
        let bundle = factory.load_bundle().unwrap();
        assert_eq!(bundle.session.seed, Some(20240917));

        let catalog = bundle.build_catalog(&ActorRegistry::with_builtin());
        assert!(catalog.rejected().is_empty(), "{:?}", catalog.rejected());
        assert_eq!(catalog.len(), bundle.use_actions.values().map(Vec::len).sum::<usize>());

        let kit = ItemTypeId::new("sewing_kit");
        let repair = catalog.find(&kit, "repair_item").unwrap();
        assert!(repair.as_repair().is_some());
        assert!(catalog.find(&ItemTypeId::new("first_aid"), "heal").unwrap().as_heal().is_some());
        assert!(catalog.find(&ItemTypeId::new("beartrap"), "place_trap").is_some());
        assert!(catalog.actors_for(&ItemTypeId::new("rag")).is_empty());
    }
}
