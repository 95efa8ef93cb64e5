//! Item catalog and material loaders.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use item_use_core::{AmmoTypeId, ConfigRecord, ItemType, ItemTypeId, ItemsSnapshot, MaterialType};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One item type plus the `use_action` records attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub item: ItemType,
    #[serde(default)]
    pub use_action: Vec<ConfigRecord>,
}

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemCatalog {
    pub items: Vec<ItemDefinition>,
    /// Item spawned when something asks for the default round of an ammo type.
    pub default_ammo: BTreeMap<AmmoTypeId, ItemTypeId>,
}

impl ItemCatalog {
    /// Splits the catalog into the item oracle's data and the actor records.
    pub fn into_parts(self) -> (ItemsSnapshot, BTreeMap<ItemTypeId, Vec<ConfigRecord>>) {
        let mut snapshot = ItemsSnapshot::new();
        let mut use_actions = BTreeMap::new();
        for definition in self.items {
            if !definition.use_action.is_empty() {
                use_actions.insert(definition.item.id.clone(), definition.use_action);
            }
            snapshot.insert_item_type(definition.item);
        }
        snapshot.default_ammo = self.default_ammo;
        (snapshot, use_actions)
    }
}

/// Loader for item catalogs from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load an item catalog from a RON file.
    ///
    /// Item ids must be non-empty and unique.
    pub fn load(path: &Path) -> LoadResult<ItemCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ItemCatalog> {
        let catalog: ItemCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        let mut seen = BTreeSet::new();
        for definition in &catalog.items {
            let id = &definition.item.id;
            if id.is_empty() {
                anyhow::bail!("Item '{}' has an empty id", definition.item.name);
            }
            if !seen.insert(id) {
                anyhow::bail!("Duplicate item type '{}'", id);
            }
        }
        Ok(catalog)
    }
}

/// Loader for material lists from RON files.
pub struct MaterialLoader;

impl MaterialLoader {
    /// Load materials from a RON file holding a list of material definitions.
    pub fn load(path: &Path) -> LoadResult<Vec<MaterialType>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<MaterialType>> {
        let materials: Vec<MaterialType> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse material list RON: {}", e))?;

        let mut seen = BTreeSet::new();
        for material in &materials {
            if !seen.insert(&material.id) {
                anyhow::bail!("Duplicate material '{}'", material.id);
            }
        }
        Ok(materials)
    }
}
