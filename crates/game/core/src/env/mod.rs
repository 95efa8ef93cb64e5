//! Traits describing read-only content data.
//!
//! Oracles expose item types, materials, recipes and rule tables. The [`Env`]
//! aggregate bundles them so actors can resolve ids without hard coupling to
//! concrete implementations; [`RngOracle`] is the one mutable source and is
//! passed alongside rather than inside.
mod error;
mod items;
mod recipes;
mod rng;
mod snapshot;
mod tables;

pub use error::OracleError;
pub use items::{ItemCategory, ItemOracle, ItemType, MaterialType};
pub use recipes::{Recipe, RecipeOracle};
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use snapshot::{ItemsSnapshot, OracleSnapshot, RecipesSnapshot, TablesSnapshot};
pub use tables::{EffectDef, MonsterDef, SkillDef, TablesOracle, TerrainDef, TrapDef};

use crate::state::ItemTypeId;

/// Aggregates the read-only oracles an actor may consult.
pub struct Env<'a, I, R, T>
where
    I: ItemOracle + ?Sized,
    R: RecipeOracle + ?Sized,
    T: TablesOracle + ?Sized,
{
    items: Option<&'a I>,
    recipes: Option<&'a R>,
    tables: Option<&'a T>,
}

/// Trait-object flavour of [`Env`] used across the actor interface.
pub type ActorEnv<'a> = Env<'a, dyn ItemOracle + 'a, dyn RecipeOracle + 'a, dyn TablesOracle + 'a>;

impl<I, R, T> Clone for Env<'_, I, R, T>
where
    I: ItemOracle + ?Sized,
    R: RecipeOracle + ?Sized,
    T: TablesOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<I, R, T> Copy for Env<'_, I, R, T>
where
    I: ItemOracle + ?Sized,
    R: RecipeOracle + ?Sized,
    T: TablesOracle + ?Sized,
{
}

impl<'a, I, R, T> Env<'a, I, R, T>
where
    I: ItemOracle + ?Sized,
    R: RecipeOracle + ?Sized,
    T: TablesOracle + ?Sized,
{
    pub fn new(items: Option<&'a I>, recipes: Option<&'a R>, tables: Option<&'a T>) -> Self {
        Self {
            items,
            recipes,
            tables,
        }
    }

    pub fn with_all(items: &'a I, recipes: &'a R, tables: &'a T) -> Self {
        Self::new(Some(items), Some(recipes), Some(tables))
    }

    pub fn empty() -> Self {
        Self {
            items: None,
            recipes: None,
            tables: None,
        }
    }

    /// Returns the ItemOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::ItemsNotAvailable` if no items oracle was provided.
    pub fn items(&self) -> Result<&'a I, OracleError> {
        self.items.ok_or(OracleError::ItemsNotAvailable)
    }

    /// Returns the RecipeOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::RecipesNotAvailable` if no recipe oracle was provided.
    pub fn recipes(&self) -> Result<&'a R, OracleError> {
        self.recipes.ok_or(OracleError::RecipesNotAvailable)
    }

    /// Returns the TablesOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::TablesNotAvailable` if no tables oracle was provided.
    pub fn tables(&self) -> Result<&'a T, OracleError> {
        self.tables.ok_or(OracleError::TablesNotAvailable)
    }

    /// Looks up an item type.
    ///
    /// # Errors
    ///
    /// Fails when the items oracle is missing or does not know `id`.
    pub fn item_type(&self, id: &ItemTypeId) -> Result<&'a ItemType, OracleError> {
        self.items()?
            .item_type(id)
            .ok_or_else(|| OracleError::UnknownItemType(id.clone()))
    }

    /// Display name of an item type, falling back to its id.
    pub fn item_name(&self, id: &ItemTypeId) -> String {
        self.item_type(id)
            .map(|ty| ty.name.clone())
            .unwrap_or_else(|_| id.to_string())
    }

    /// Charges one activation of `id` consumes; 1 when the type is unknown.
    pub fn charges_to_use(&self, id: &ItemTypeId) -> u32 {
        self.item_type(id).map(|ty| ty.charges_to_use).unwrap_or(1)
    }
}

impl<'a, I, R, T> Env<'a, I, R, T>
where
    I: ItemOracle + 'a,
    R: RecipeOracle + 'a,
    T: TablesOracle + 'a,
{
    /// Converts this environment into the trait-object based [`ActorEnv`].
    pub fn into_actor_env(self) -> ActorEnv<'a> {
        let items: Option<&'a dyn ItemOracle> = self.items.map(|items| items as _);
        let recipes: Option<&'a dyn RecipeOracle> = self.recipes.map(|recipes| recipes as _);
        let tables: Option<&'a dyn TablesOracle> = self.tables.map(|tables| tables as _);
        Env::new(items, recipes, tables)
    }
}
