//! Contracts for the map and everything living on it.
//!
//! Split like the agent traits: [`TileMap`] for terrain, traps and ground
//! items, [`Population`] for creatures and vehicles, [`Emissions`] for sound,
//! explosions and fields. [`World`] is the union actors receive.

use crate::agent::Agent;
use crate::state::{
    CharacterId, FieldId, Item, MonsterTypeId, Position, TerrainId, TrapId, VehicleProtoId,
};

/// Explosion parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExplosionData {
    /// Power at the epicenter; negative disables the explosion.
    pub power: f32,
    pub distance_factor: f32,
    pub fire: bool,
    pub shrapnel: ShrapnelData,
}

impl Default for ExplosionData {
    fn default() -> Self {
        Self {
            power: -1.0,
            distance_factor: 0.8,
            fire: false,
            shrapnel: ShrapnelData::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShrapnelData {
    pub count: i32,
    pub mass: i32,
}

/// Request to place a monster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonsterSpawn {
    pub kind: MonsterTypeId,
    pub position: Position,
    pub hp: i32,
    pub friendly: bool,
}

/// Terrain, traps, light and ground items.
pub trait TileMap {
    fn terrain(&self, pos: Position) -> TerrainId;
    fn set_terrain(&mut self, pos: Position, terrain: TerrainId);
    /// Terrain or furniture flag such as `DIGGABLE` or `FLAMMABLE`.
    fn has_flag(&self, flag: &str, pos: Position) -> bool;
    /// 2 is flat walkable ground, 0 is impassable.
    fn move_cost(&self, pos: Position) -> i32;

    fn trap_at(&self, pos: Position) -> Option<TrapId>;
    fn trap_visible(&self, pos: Position, observer: CharacterId) -> bool;
    fn set_trap(&mut self, pos: Position, trap: TrapId);
    fn trigger_trap(&mut self, pos: Position, victim: CharacterId);

    /// Natural light at the given level, 0 (night) to 100+ (full sun).
    fn natural_light_level(&self, z: i32) -> f32;
    fn is_in_sunlight(&self, pos: Position) -> bool;
    /// How well the tile's fuel burns, 0 (nothing) to 100 (dry tinder).
    fn fuel_quality(&self, pos: Position) -> u32;
    /// Starts a fire; false when nothing at the tile can burn.
    fn ignite(&mut self, pos: Position) -> bool;

    fn graffiti(&self, pos: Position) -> Option<String>;
    /// Replaces the tile's graffiti; empty text erases it.
    fn set_graffiti(&mut self, pos: Position, text: String);

    fn ground_items(&self, pos: Position) -> &[Item];
    fn take_ground_item(&mut self, pos: Position, index: usize) -> Option<Item>;
    fn spawn_item(&mut self, pos: Position, item: Item);
}

/// Creatures, vehicles and the overmap.
pub trait Population {
    /// True when no creature occupies the tile.
    fn is_empty(&self, pos: Position) -> bool;
    fn character_at_mut(&mut self, pos: Position) -> Option<&mut dyn Agent>;
    fn character_mut(&mut self, id: CharacterId) -> Option<&mut dyn Agent>;
    fn spawn_monster(&mut self, spawn: MonsterSpawn) -> bool;
    fn add_vehicle(&mut self, proto: &VehicleProtoId, pos: Position) -> bool;
    /// Reveals overmap tiles of the given kinds; returns how many were revealed.
    fn reveal_overmap(&mut self, center: Position, radius: i32, kinds: &[String]) -> u32;
}

/// Sound, blasts and fields.
pub trait Emissions {
    fn sound(&mut self, pos: Position, volume: i32, description: &str);
    fn explosion(&mut self, pos: Position, data: &ExplosionData);
    fn flashbang(&mut self, pos: Position, player_immune: bool);
    fn emp_blast(&mut self, pos: Position);
    fn scrambler_blast(&mut self, pos: Position);
    fn add_field(&mut self, pos: Position, field: &FieldId, intensity: i32);
}

pub trait World: TileMap + Population + Emissions {}

impl<T: TileMap + Population + Emissions + ?Sized> World for T {}
