//! Item-use actors and the collaborator contracts they act through.
//!
//! `item-use-core` defines what happens when an agent activates an item: every
//! configured behavior implements [`actor::ItemUseActor`], is built from a
//! [`actor::ConfigRecord`] through the [`actor::ActorRegistry`], and touches
//! the simulation only via the [`agent::Agent`] and [`world::World`] traits and
//! the read-only oracles bundled in [`env::ActorEnv`].
//!
//! Randomness flows through a single [`env::RngOracle`] handed to each call so
//! outcomes replay exactly from a seed.
pub mod actor;
pub mod agent;
pub mod config;
pub mod env;
pub mod error;
pub mod state;
pub mod world;

#[cfg(any(test, feature = "sandbox"))]
pub mod sandbox;

pub use actor::{
    ActorRegistry, ConfigError, ConfigRecord, ConfigValue, ItemInfo, ItemUseActor, UseContext,
    UseError, UseResult,
};
pub use actor::kinds::{HealActor, RepairAction, RepairItemActor, RepairOutcome};
pub use agent::{Activity, Agent, Body, Character, HealTask, Inventory, MessageKind, Prompt, Stat};
pub use config::SessionConfig;
pub use env::{
    ActorEnv, EffectDef, Env, ItemCategory, ItemOracle, ItemType, ItemsSnapshot, MaterialType,
    MonsterDef, OracleError, OracleSnapshot, PcgRng, Recipe, RecipeOracle, RecipesSnapshot,
    RngOracle, SkillDef, TablesOracle, TablesSnapshot, TerrainDef, TrapDef,
};
pub use error::{ErrorSeverity, GameError};
pub use state::{
    AmmoTypeId, BodyPart, BodyPartCategory, CharacterId, EffectData, EffectId, FieldId, HitPoints,
    Item, ItemId, ItemLocation, ItemSource, ItemTypeId, MaterialId, MonsterTypeId, Position,
    QualityId, RecipeId, SkillId, TerrainId, Tick, TrapId, VehicleProtoId, VitaminId,
};
pub use world::{Emissions, ExplosionData, MonsterSpawn, Population, ShrapnelData, TileMap, World};
