//! Rule tables loader: skills, effects, monsters, traps, terrain, vehicles
//! and fields.

use std::path::Path;

use item_use_core::{
    EffectDef, EffectId, FieldId, MonsterDef, SkillDef, SkillId, TablesSnapshot, TerrainDef,
    TerrainId, TrapDef, VehicleProtoId,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Tables as written in RON: plain lists, names optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TablesFile {
    pub skills: Vec<SkillId>,
    pub effects: Vec<EffectId>,
    pub monsters: Vec<MonsterDef>,
    pub traps: Vec<TrapDef>,
    pub terrain: Vec<TerrainDef>,
    pub vehicles: Vec<VehicleProtoId>,
    pub fields: Vec<FieldId>,
}

impl TablesFile {
    pub fn into_snapshot(self) -> TablesSnapshot {
        let mut tables = TablesSnapshot::new();
        for id in self.skills {
            let name = id.to_string();
            tables.skills.insert(id.clone(), SkillDef { id, name });
        }
        for id in self.effects {
            let name = id.to_string();
            tables.effects.insert(id.clone(), EffectDef { id, name });
        }
        for monster in self.monsters {
            tables.monsters.insert(monster.id.clone(), monster);
        }
        for mut trap in self.traps {
            if trap.name.is_empty() {
                trap.name = trap.id.to_string();
            }
            tables.traps.insert(trap.id.clone(), trap);
        }
        for mut terrain in self.terrain {
            if terrain.name.is_empty() {
                terrain.name = terrain.id.to_string();
            }
            tables.terrain.insert(terrain.id.clone(), terrain);
        }
        tables.vehicles.extend(self.vehicles);
        tables.fields.extend(self.fields);
        tables
    }
}

/// Loader for rule tables from RON files.
pub struct TablesLoader;

impl TablesLoader {
    pub fn load(path: &Path) -> LoadResult<TablesSnapshot> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<TablesSnapshot> {
        let file: TablesFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse tables RON: {}", e))?;
        if let Some(terrain) = file.terrain.iter().find(|t| t.id == TerrainId::default()) {
            anyhow::bail!("Terrain '{}' has an empty id", terrain.name);
        }
        Ok(file.into_snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use item_use_core::{MonsterTypeId, TablesOracle, TrapId};

    #[test]
    fn parses_tables() {
        let tables = TablesLoader::parse(
            r#"(
                skills: ["traps", "survival"],
                monsters: [(
                    id: "mon_zombie",
                    name: "zombie",
                    hp: 80,
                    difficulty: 3,
                    species: ["ZOMBIE", "HUMAN"],
                )],
                traps: [(id: "tr_beartrap", name: "bear trap"), (id: "tr_tripwire")],
                terrain: [(id: "t_tree", name: "tree")],
            )"#,
        )
        .unwrap();

        assert!(tables.skill(&SkillId::new("traps")).is_some());
        let zombie = tables.monster(&MonsterTypeId::new("mon_zombie")).unwrap();
        assert!(zombie.in_species("HUMAN"));
        assert_eq!(
            tables.trap(&TrapId::new("tr_tripwire")).map(|t| t.name.as_str()),
            Some("tr_tripwire")
        );
        assert!(tables.vehicles.is_empty());
    }
}
