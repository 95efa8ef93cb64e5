//! Configured actors per item type.
//!
//! The catalog is the finalization pass over loaded content: every
//! `use_action` record is instantiated through the [`ActorRegistry`] and
//! finalized against the oracles. A record that fails either step is logged
//! and skipped; the rest of the catalog still loads.

use std::collections::BTreeMap;

use item_use_core::{ActorEnv, ActorRegistry, ConfigError, ConfigRecord, ItemTypeId, ItemUseActor};
use tracing::{debug, warn};

/// A `use_action` record that did not produce an actor.
#[derive(Clone, Debug, PartialEq)]
pub struct RejectedRecord {
    pub item_type: ItemTypeId,
    /// Position within the item type's `use_action` list.
    pub index: usize,
    pub error: ConfigError,
}

/// Finalized actors keyed by item type, in configuration order.
#[derive(Debug, Default)]
pub struct ActorCatalog {
    actors: BTreeMap<ItemTypeId, Vec<Box<dyn ItemUseActor>>>,
    rejected: Vec<RejectedRecord>,
}

impl ActorCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiates and finalizes every record in `use_actions`.
    pub fn build<'r>(
        registry: &ActorRegistry,
        use_actions: impl IntoIterator<Item = (&'r ItemTypeId, &'r [ConfigRecord])>,
        env: ActorEnv<'_>,
    ) -> Self {
        let mut catalog = Self::new();
        for (item_type, records) in use_actions {
            for (index, record) in records.iter().enumerate() {
                if let Err(error) = catalog.add(registry, item_type, record, env) {
                    warn!(
                        item_type = %item_type,
                        index,
                        error = %error,
                        "skipping item-use record"
                    );
                    catalog.rejected.push(RejectedRecord {
                        item_type: item_type.clone(),
                        index,
                        error,
                    });
                }
            }
        }
        debug!(
            item_types = catalog.actors.len(),
            rejected = catalog.rejected.len(),
            "actor catalog built"
        );
        catalog
    }

    /// Builds one actor from `record` and appends it to `item_type`'s list.
    ///
    /// # Errors
    ///
    /// Whatever instantiation or finalization rejects; the catalog is left
    /// unchanged.
    pub fn add(
        &mut self,
        registry: &ActorRegistry,
        item_type: &ItemTypeId,
        record: &ConfigRecord,
        env: ActorEnv<'_>,
    ) -> Result<(), ConfigError> {
        let mut actor = registry.instantiate(record)?;
        actor.finalize(item_type, env)?;
        self.actors.entry(item_type.clone()).or_default().push(actor);
        Ok(())
    }

    /// Actors configured for `item_type`; empty when it has none.
    pub fn actors_for(&self, item_type: &ItemTypeId) -> &[Box<dyn ItemUseActor>] {
        self.actors.get(item_type).map_or(&[], Vec::as_slice)
    }

    /// The first actor of `item_type` with the given type tag.
    pub fn find(&self, item_type: &ItemTypeId, tag: &str) -> Option<&dyn ItemUseActor> {
        self.actors_for(item_type)
            .iter()
            .find(|actor| actor.type_tag() == tag)
            .map(AsRef::as_ref)
    }

    pub fn item_types(&self) -> impl Iterator<Item = &ItemTypeId> {
        self.actors.keys()
    }

    /// Number of configured actors across all item types.
    pub fn len(&self) -> usize {
        self.actors.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn rejected(&self) -> &[RejectedRecord] {
        &self.rejected
    }
}
