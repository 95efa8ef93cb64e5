use std::collections::{BTreeMap, BTreeSet};

use crate::agent::{Agent, Character};
use crate::config::SessionConfig;
use crate::state::{
    CharacterId, FieldId, Item, Position, TerrainId, TrapId, VehicleProtoId,
};
use crate::world::{Emissions, ExplosionData, MonsterSpawn, Population, TileMap};

use super::SandboxCharacter;

/// Side effect recorded by [`SandboxWorld`].
#[derive(Clone, Debug, PartialEq)]
pub enum WorldEvent {
    Sound {
        pos: Position,
        volume: i32,
        description: String,
    },
    Explosion {
        pos: Position,
        data: ExplosionData,
    },
    Flashbang {
        pos: Position,
        player_immune: bool,
    },
    Emp(Position),
    Scrambler(Position),
    Field {
        pos: Position,
        field: FieldId,
        intensity: i32,
    },
    TrapTriggered {
        pos: Position,
        trap: TrapId,
        victim: CharacterId,
    },
    Ignited(Position),
}

#[derive(Clone, Debug)]
struct PlacedTrap {
    id: TrapId,
    visible: bool,
}

/// Flat map with uniform default terrain plus per-tile overrides.
#[derive(Clone, Debug)]
pub struct SandboxWorld {
    pub default_terrain: TerrainId,
    pub terrain: BTreeMap<Position, TerrainId>,
    pub flags: BTreeMap<Position, BTreeSet<String>>,
    pub move_costs: BTreeMap<Position, i32>,
    /// Natural light level for every z level.
    pub light: f32,
    pub sunlit: bool,
    pub fuel: BTreeMap<Position, u32>,
    pub fires: BTreeSet<Position>,
    pub graffiti: BTreeMap<Position, String>,
    pub ground: BTreeMap<Position, Vec<Item>>,
    pub characters: Vec<SandboxCharacter>,
    pub monsters: Vec<MonsterSpawn>,
    pub vehicles: Vec<(VehicleProtoId, Position)>,
    pub revealed: Vec<(Position, i32, Vec<String>)>,
    pub events: Vec<WorldEvent>,
    traps: BTreeMap<Position, PlacedTrap>,
}

impl Default for SandboxWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SandboxWorld {
    pub fn new() -> Self {
        Self {
            default_terrain: TerrainId::new("t_dirt"),
            terrain: BTreeMap::new(),
            flags: BTreeMap::new(),
            move_costs: BTreeMap::new(),
            light: 100.0,
            sunlit: true,
            fuel: BTreeMap::new(),
            fires: BTreeSet::new(),
            graffiti: BTreeMap::new(),
            ground: BTreeMap::new(),
            characters: Vec::new(),
            monsters: Vec::new(),
            vehicles: Vec::new(),
            revealed: Vec::new(),
            events: Vec::new(),
            traps: BTreeMap::new(),
        }
    }

    pub fn with_terrain(mut self, pos: Position, terrain: &str) -> Self {
        self.terrain.insert(pos, TerrainId::new(terrain));
        self
    }

    pub fn with_flag(mut self, pos: Position, flag: &str) -> Self {
        self.flags.entry(pos).or_default().insert(flag.to_owned());
        self
    }

    pub fn with_move_cost(mut self, pos: Position, cost: i32) -> Self {
        self.move_costs.insert(pos, cost);
        self
    }

    pub fn with_light(mut self, light: f32, sunlit: bool) -> Self {
        self.light = light;
        self.sunlit = sunlit;
        self
    }

    pub fn with_fuel(mut self, pos: Position, quality: u32) -> Self {
        self.fuel.insert(pos, quality);
        self
    }

    pub fn with_ground_item(mut self, pos: Position, item: Item) -> Self {
        self.ground.entry(pos).or_default().push(item);
        self
    }

    pub fn with_character(mut self, character: SandboxCharacter) -> Self {
        self.characters.push(character);
        self
    }

    /// Places a trap nobody has spotted yet.
    pub fn with_hidden_trap(mut self, pos: Position, trap: &str) -> Self {
        self.traps.insert(
            pos,
            PlacedTrap {
                id: TrapId::new(trap),
                visible: false,
            },
        );
        self
    }

    pub fn character(&self, id: CharacterId) -> Option<&SandboxCharacter> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn sounds(&self) -> impl Iterator<Item = (&Position, i32, &str)> {
        self.events.iter().filter_map(|event| match event {
            WorldEvent::Sound {
                pos,
                volume,
                description,
            } => Some((pos, *volume, description.as_str())),
            _ => None,
        })
    }
}

impl TileMap for SandboxWorld {
    fn terrain(&self, pos: Position) -> TerrainId {
        self.terrain
            .get(&pos)
            .cloned()
            .unwrap_or_else(|| self.default_terrain.clone())
    }

    fn set_terrain(&mut self, pos: Position, terrain: TerrainId) {
        self.terrain.insert(pos, terrain);
    }

    fn has_flag(&self, flag: &str, pos: Position) -> bool {
        self.flags.get(&pos).is_some_and(|flags| flags.contains(flag))
    }

    fn move_cost(&self, pos: Position) -> i32 {
        self.move_costs
            .get(&pos)
            .copied()
            .unwrap_or(SessionConfig::FLAT_MOVE_COST)
    }

    fn trap_at(&self, pos: Position) -> Option<TrapId> {
        self.traps.get(&pos).map(|trap| trap.id.clone())
    }

    fn trap_visible(&self, pos: Position, _observer: CharacterId) -> bool {
        self.traps.get(&pos).is_some_and(|trap| trap.visible)
    }

    fn set_trap(&mut self, pos: Position, trap: TrapId) {
        self.traps.insert(
            pos,
            PlacedTrap {
                id: trap,
                visible: true,
            },
        );
    }

    fn trigger_trap(&mut self, pos: Position, victim: CharacterId) {
        if let Some(trap) = self.traps.get(&pos) {
            let trap = trap.id.clone();
            self.events.push(WorldEvent::TrapTriggered { pos, trap, victim });
        }
    }

    fn natural_light_level(&self, _z: i32) -> f32 {
        self.light
    }

    fn is_in_sunlight(&self, pos: Position) -> bool {
        self.sunlit && !pos.is_underground()
    }

    fn fuel_quality(&self, pos: Position) -> u32 {
        self.fuel.get(&pos).copied().unwrap_or(0).min(100)
    }

    fn ignite(&mut self, pos: Position) -> bool {
        if self.fuel_quality(pos) == 0 && !self.has_flag("FLAMMABLE", pos) {
            return false;
        }
        self.fires.insert(pos);
        self.events.push(WorldEvent::Ignited(pos));
        true
    }

    fn graffiti(&self, pos: Position) -> Option<String> {
        self.graffiti.get(&pos).cloned()
    }

    fn set_graffiti(&mut self, pos: Position, text: String) {
        if text.is_empty() {
            self.graffiti.remove(&pos);
        } else {
            self.graffiti.insert(pos, text);
        }
    }

    fn ground_items(&self, pos: Position) -> &[Item] {
        self.ground.get(&pos).map(Vec::as_slice).unwrap_or(&[])
    }

    fn take_ground_item(&mut self, pos: Position, index: usize) -> Option<Item> {
        let items = self.ground.get_mut(&pos)?;
        (index < items.len()).then(|| items.remove(index))
    }

    fn spawn_item(&mut self, pos: Position, item: Item) {
        self.ground.entry(pos).or_default().push(item);
    }
}

impl Population for SandboxWorld {
    fn is_empty(&self, pos: Position) -> bool {
        self.characters.iter().all(|c| c.position != pos)
            && self.monsters.iter().all(|m| m.position != pos)
    }

    fn character_at_mut(&mut self, pos: Position) -> Option<&mut dyn Agent> {
        self.characters
            .iter_mut()
            .find(|c| c.position() == pos)
            .map(|c| c as &mut dyn Agent)
    }

    fn character_mut(&mut self, id: CharacterId) -> Option<&mut dyn Agent> {
        self.characters
            .iter_mut()
            .find(|c| c.id == id)
            .map(|c| c as &mut dyn Agent)
    }

    fn spawn_monster(&mut self, spawn: MonsterSpawn) -> bool {
        if !self.is_empty(spawn.position) || self.move_cost(spawn.position) == 0 {
            return false;
        }
        self.monsters.push(spawn);
        true
    }

    fn add_vehicle(&mut self, proto: &VehicleProtoId, pos: Position) -> bool {
        if self.move_cost(pos) == 0 || self.vehicles.iter().any(|(_, at)| *at == pos) {
            return false;
        }
        self.vehicles.push((proto.clone(), pos));
        true
    }

    fn reveal_overmap(&mut self, center: Position, radius: i32, kinds: &[String]) -> u32 {
        self.revealed.push((center, radius, kinds.to_vec()));
        kinds.len() as u32
    }
}

impl Emissions for SandboxWorld {
    fn sound(&mut self, pos: Position, volume: i32, description: &str) {
        self.events.push(WorldEvent::Sound {
            pos,
            volume,
            description: description.to_owned(),
        });
    }

    fn explosion(&mut self, pos: Position, data: &ExplosionData) {
        self.events.push(WorldEvent::Explosion {
            pos,
            data: data.clone(),
        });
    }

    fn flashbang(&mut self, pos: Position, player_immune: bool) {
        self.events.push(WorldEvent::Flashbang { pos, player_immune });
    }

    fn emp_blast(&mut self, pos: Position) {
        self.events.push(WorldEvent::Emp(pos));
    }

    fn scrambler_blast(&mut self, pos: Position) {
        self.events.push(WorldEvent::Scrambler(pos));
    }

    fn add_field(&mut self, pos: Position, field: &FieldId, intensity: i32) {
        self.events.push(WorldEvent::Field {
            pos,
            field: field.clone(),
            intensity,
        });
    }
}
