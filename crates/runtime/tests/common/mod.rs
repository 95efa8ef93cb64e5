#![allow(dead_code)]

use std::collections::BTreeMap;

use item_use_content::ContentBundle;
use item_use_core::sandbox::{ScriptedRng, fixtures};
use item_use_core::{ActorRegistry, ConfigRecord, ItemTypeId, SessionConfig};
use item_use_runtime::{ActivationService, OracleManager};

/// Session used by most tests: fixed seed, 100-move long-action steps.
pub fn session() -> SessionConfig {
    SessionConfig {
        long_action_step: 100,
        ..SessionConfig::with_seed(7)
    }
}

/// Oracles over the fixture content with the given `use_action` records.
///
/// Random draws return `rolls` first, then fall back to a seeded generator.
pub fn oracles(
    records: &[(&str, ConfigRecord)],
    session: SessionConfig,
    rolls: &[f64],
) -> OracleManager {
    let mut use_actions: BTreeMap<ItemTypeId, Vec<ConfigRecord>> = BTreeMap::new();
    for (item_type, record) in records {
        use_actions
            .entry(ItemTypeId::new(*item_type))
            .or_default()
            .push(record.clone());
    }
    let bundle = ContentBundle {
        snapshot: fixtures::content(),
        use_actions,
        session,
    };
    let oracles = OracleManager::new(bundle, &ActorRegistry::with_builtin());
    assert!(
        oracles.catalog().rejected().is_empty(),
        "fixture records must finalize: {:?}",
        oracles.catalog().rejected()
    );
    oracles.with_rng(ScriptedRng::with_units(rolls.iter().copied()))
}

pub fn service(records: &[(&str, ConfigRecord)], rolls: &[f64]) -> ActivationService {
    ActivationService::new(oracles(records, session(), rolls))
}
