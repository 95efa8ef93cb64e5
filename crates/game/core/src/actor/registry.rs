//! Prototype registry mapping type tags to actor builders.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use super::{ConfigError, ConfigRecord, ItemUseActor, kinds};

/// One default-constructed prototype per type tag.
///
/// Instantiating clones the prototype and loads the record into the copy, so
/// defaults (such as whitelists) are built once and never shared mutably
/// between item types.
#[derive(Debug, Default)]
pub struct ActorRegistry {
    prototypes: BTreeMap<&'static str, Box<dyn ItemUseActor>>,
}

impl ActorRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in actor kind.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for prototype in kinds::builtin() {
            registry.register(prototype);
        }
        registry
    }

    /// Adds (or replaces) the prototype for its type tag.
    pub fn register(&mut self, prototype: Box<dyn ItemUseActor>) {
        let tag = prototype.type_tag();
        debug!(tag, "registering item-use actor");
        self.prototypes.insert(tag, prototype);
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.prototypes.contains_key(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.prototypes.keys().copied()
    }

    /// Builds a configured actor from a record.
    ///
    /// # Errors
    ///
    /// `UnknownActorType` for unregistered tags, or whatever the actor's
    /// `load` rejects.
    pub fn instantiate(&self, record: &ConfigRecord) -> Result<Box<dyn ItemUseActor>, ConfigError> {
        let tag = record.type_tag()?;
        let prototype = self
            .prototypes
            .get(tag)
            .ok_or_else(|| ConfigError::UnknownActorType(tag.to_owned()))?;
        let mut actor = prototype.clone_actor();
        actor.load(record)?;
        trace!(tag, "instantiated item-use actor");
        Ok(actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_kind() {
        let registry = ActorRegistry::with_builtin();
        for tag in [
            "transform",
            "countdown",
            "explosion",
            "unfold_vehicle",
            "consume_drug",
            "delayed_transform",
            "place_monster",
            "ups_based_armor",
            "picklock",
            "reveal_map",
            "firestarter",
            "salvage",
            "inscribe",
            "cauterize",
            "enzlave",
            "fireweapon_off",
            "fireweapon_on",
            "manualnoise",
            "musical_instrument",
            "holster",
            "bandolier",
            "ammobelt",
            "repair_item",
            "heal",
            "place_trap",
        ] {
            assert!(registry.contains(tag), "missing {tag}");
        }
        assert_eq!(registry.tags().count(), 25);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let registry = ActorRegistry::with_builtin();
        let err = registry
            .instantiate(&ConfigRecord::new("teleport"))
            .unwrap_err();
        assert_eq!(err, ConfigError::UnknownActorType("teleport".to_owned()));
    }

    #[test]
    fn instances_do_not_share_state() {
        let registry = ActorRegistry::with_builtin();
        let a = registry
            .instantiate(&ConfigRecord::new("salvage").with("material_whitelist", vec!["bone"]))
            .unwrap();
        let b = registry.instantiate(&ConfigRecord::new("salvage")).unwrap();
        assert_ne!(format!("{a:?}"), format!("{b:?}"));
    }

    #[test]
    fn load_errors_surface() {
        let registry = ActorRegistry::with_builtin();
        let err = registry
            .instantiate(&ConfigRecord::new("transform"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { .. }));
    }
}
