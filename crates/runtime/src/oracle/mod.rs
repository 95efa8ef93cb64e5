//! Content oracles, configured actors and the shared RNG.
//!
//! [`OracleManager`] is built once per session from a content bundle. The
//! snapshot and catalog are immutable for the rest of the session; the RNG is
//! the single mutable source every activation draws from, seeded from
//! [`SessionConfig`] so runs replay exactly.
use std::path::Path;
use std::sync::Arc;

use item_use_content::{ActorCatalog, ContentBundle, ContentFactory};
use item_use_core::{ActorEnv, ActorRegistry, OracleSnapshot, PcgRng, RngOracle, SessionConfig};
use tracing::{info, warn};

use crate::api::{Result, RuntimeError};

/// Owns everything an activation reads, plus the RNG it draws from.
pub struct OracleManager {
    snapshot: Arc<OracleSnapshot>,
    catalog: Arc<ActorCatalog>,
    session: SessionConfig,
    seed: u64,
    rng: Box<dyn RngOracle>,
}

impl OracleManager {
    /// Finalizes the bundle's actors and seeds the RNG.
    ///
    /// Records that fail to finalize are skipped with a warning; the rest of
    /// the catalog is still usable.
    pub fn new(bundle: ContentBundle, registry: &ActorRegistry) -> Self {
        let catalog = bundle.build_catalog(registry);
        for rejected in catalog.rejected() {
            warn!(
                item_type = %rejected.item_type,
                index = rejected.index,
                error = %rejected.error,
                "use action unavailable"
            );
        }
        let seed = bundle.session.seed.unwrap_or_else(rand::random);
        info!(
            seed,
            actors = catalog.len(),
            rejected = catalog.rejected().len(),
            "oracles ready"
        );
        Self {
            snapshot: Arc::new(bundle.snapshot),
            catalog: Arc::new(catalog),
            session: bundle.session,
            seed,
            rng: Box::new(PcgRng::new(seed)),
        }
    }

    /// Loads a data directory with the built-in actor set.
    pub fn from_data_dir(data_dir: impl AsRef<Path>) -> Result<Self> {
        let bundle = ContentFactory::new(data_dir.as_ref())
            .load_bundle()
            .map_err(RuntimeError::Content)?;
        Ok(Self::new(bundle, &ActorRegistry::with_builtin()))
    }

    /// Replaces the RNG, e.g. with a scripted one in tests.
    pub fn with_rng(mut self, rng: impl RngOracle + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn env(&self) -> ActorEnv<'_> {
        self.snapshot.env()
    }

    pub fn snapshot(&self) -> Arc<OracleSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn catalog(&self) -> &ActorCatalog {
        &self.catalog
    }

    pub fn session(&self) -> &SessionConfig {
        &self.session
    }

    /// Seed the RNG was started from; reuse it to replay a session.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Borrows the read-only oracles, the catalog and the RNG at once.
    pub(crate) fn parts_mut(&mut self) -> (ActorEnv<'_>, &ActorCatalog, &mut dyn RngOracle) {
        (self.snapshot.env(), &self.catalog, self.rng.as_mut())
    }
}

impl std::fmt::Debug for OracleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleManager")
            .field("seed", &self.seed)
            .field("session", &self.session)
            .field("actors", &self.catalog.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use item_use_core::ItemTypeId;

    fn data_dir() -> &'static str {
        concat!(env!("CARGO_MANIFEST_DIR"), "/../game/content/data")
    }

    #[test]
    fn bundled_content_builds_every_actor() {
        let oracles = OracleManager::from_data_dir(data_dir()).unwrap();
        assert!(oracles.catalog().rejected().is_empty());
        assert!(
            oracles
                .catalog()
                .find(&ItemTypeId::new("sewing_kit"), "repair_item")
                .is_some()
        );
        assert_eq!(oracles.seed(), 20240917);
    }

    #[test]
    fn same_seed_same_rolls() {
        let mut a = OracleManager::from_data_dir(data_dir()).unwrap();
        let mut b = OracleManager::from_data_dir(data_dir()).unwrap();
        let rolls_a: Vec<u32> = (0..8).map(|_| a.parts_mut().2.next_u32()).collect();
        let rolls_b: Vec<u32> = (0..8).map(|_| b.parts_mut().2.next_u32()).collect();
        assert_eq!(rolls_a, rolls_b);
    }

    #[test]
    fn missing_items_file_is_a_content_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = OracleManager::from_data_dir(dir.path()).unwrap_err();
        assert!(matches!(err, RuntimeError::Content(_)));
    }

    #[test]
    fn missing_seed_picks_one() {
        let bundle = ContentBundle::default();
        let oracles = OracleManager::new(bundle, &ActorRegistry::with_builtin());
        assert!(oracles.catalog().is_empty());
        assert_eq!(oracles.session().seed, None);
    }
}
