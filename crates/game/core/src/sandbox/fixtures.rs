//! A small, self-consistent content set for tests.

use std::collections::BTreeSet;

use crate::env::{
    ItemCategory, ItemType, ItemsSnapshot, MaterialType, MonsterDef, OracleSnapshot, Recipe,
    RecipesSnapshot, TablesSnapshot,
};
use crate::state::{AmmoTypeId, MaterialId, QualityId, SkillId};

/// Item types, materials, recipes and tables used throughout the tests.
pub fn content() -> OracleSnapshot {
    OracleSnapshot::new(items(), recipes(), tables())
}

fn item(id: &str, name: &str, category: ItemCategory, volume: u32, weight: u32) -> ItemType {
    ItemType {
        category,
        volume,
        weight,
        ..ItemType::new(id, name)
    }
}

fn made_of(mut ty: ItemType, materials: &[&str]) -> ItemType {
    ty.materials = materials.iter().map(|m| MaterialId::new(*m)).collect();
    ty
}

fn flagged(mut ty: ItemType, flags: &[&str]) -> ItemType {
    ty.flags.extend(flags.iter().map(|f| (*f).to_owned()));
    ty
}

fn charged(mut ty: ItemType, max_charges: i64, per_use: u32) -> ItemType {
    ty.max_charges = max_charges;
    ty.charges_to_use = per_use;
    ty
}

fn stacked(mut ty: ItemType, stack_size: u32) -> ItemType {
    ty.count_by_charges = true;
    ty.stack_size = stack_size;
    ty
}

fn ammo_of(mut ty: ItemType, ammo: &str) -> ItemType {
    ty.ammo = Some(AmmoTypeId::new(ammo));
    ty
}

fn loads(mut ty: ItemType, ammo: &str) -> ItemType {
    ty.uses_ammo = Some(AmmoTypeId::new(ammo));
    ty
}

fn items() -> ItemsSnapshot {
    use ItemCategory::*;

    let mut grenade_act = charged(item("grenade_act", "active grenade", Tool, 250, 400), 5, 1);
    grenade_act.countdown_interval = 5;
    let mut pistol = item("glock_19", "Glock 19", Gun, 500, 600);
    pistol.gun_skill = Some(SkillId::new("pistol"));
    let mut rifle = item("ar15", "AR-15", Gun, 2750, 3000);
    rifle.gun_skill = Some(SkillId::new("rifle"));
    let mut shovel = item("shovel", "shovel", Tool, 2500, 1800);
    shovel.qualities.insert(QualityId::new("DIG"), 3);
    let mut flashlight_on = loads(
        charged(item("flashlight_on", "flashlight (on)", Tool, 250, 200), 100, 1),
        "battery",
    );
    flashlight_on.revert_to = Some("flashlight".into());
    let mut torch_lit = charged(item("torch_lit", "torch (lit)", Tool, 750, 500), 25, 1);
    torch_lit.revert_to = Some("torch".into());

    ItemsSnapshot::new()
        .with_material(
            MaterialType::new("cotton", "Cotton")
                .repaired_with("rag")
                .salvaged_into("rag"),
        )
        .with_material(
            MaterialType::new("leather", "Leather")
                .repaired_with("leather")
                .salvaged_into("leather"),
        )
        .with_material(MaterialType::new("plastic", "Plastic"))
        .with_material(MaterialType::new("steel", "Steel").repaired_with("scrap"))
        .with_material(MaterialType::new("wood", "Wood"))
        // components
        .with_item_type(made_of(item("rag", "rag", Generic, 250, 80), &["cotton"]))
        .with_item_type(made_of(
            item("leather", "leather patch", Generic, 250, 150),
            &["leather"],
        ))
        .with_item_type(made_of(item("scrap", "scrap metal", Generic, 250, 500), &["steel"]))
        .with_item_type(made_of(
            stacked(item("thread", "thread", Generic, 250, 1), 100),
            &["cotton"],
        ))
        // repair tools and targets
        .with_item_type(made_of(
            charged(item("sewing_kit", "sewing kit", Tool, 500, 100), 200, 1),
            &["plastic", "steel"],
        ))
        .with_item_type(made_of(
            flagged(item("jacket_light", "light jacket", Armor, 2500, 500), &["VARSIZE"]),
            &["cotton"],
        ))
        .with_item_type(made_of(
            item("gloves_leather", "leather gloves", Armor, 250, 160),
            &["leather"],
        ))
        .with_item_type(made_of(
            flagged(item("tshirt", "t-shirt", Armor, 250, 100), &["NO_REPAIR"]),
            &["cotton"],
        ))
        .with_item_type(made_of(item("knife_steak", "steak knife", Generic, 250, 80), &["steel"]))
        // fire
        .with_item_type(made_of(
            charged(item("lighter", "lighter", Tool, 250, 15), 100, 1),
            &["plastic"],
        ))
        .with_item_type(charged(item("magnifying_lens", "magnifying lens", Tool, 250, 50), 0, 0))
        .with_item_type(made_of(item("torch", "torch", Tool, 750, 500), &["wood"]))
        .with_item_type(torch_lit)
        // transforms and explosives
        .with_item_type(item("grenade", "grenade", Tool, 250, 400))
        .with_item_type(grenade_act)
        .with_item_type(loads(
            charged(item("flashlight", "flashlight (off)", Tool, 250, 200), 100, 1),
            "battery",
        ))
        .with_item_type(flashlight_on)
        .with_item_type(ammo_of(
            stacked(item("battery", "battery", Ammo, 250, 1), 100),
            "battery",
        ))
        .with_item_type(item("can_food_sealed", "sealed can", Comestible, 250, 400))
        .with_item_type(item("can_food", "open can", Comestible, 250, 400))
        .with_item_type(item("tin_can", "empty can", Container, 250, 50))
        .with_item_type(item("meat_smoked", "smoked meat", Comestible, 250, 150))
        .with_item_type(item("meat_raw", "raw meat", Comestible, 250, 150))
        // medical
        .with_item_type(made_of(
            stacked(item("bandages", "bandages", Generic, 250, 10), 10),
            &["cotton"],
        ))
        .with_item_type(charged(item("1st_aid", "first aid kit", Tool, 1000, 500), 5, 1))
        .with_item_type(item("rag_bloody", "blood-soaked rag", Generic, 250, 80))
        .with_item_type(stacked(item("caffeine", "caffeine pill", Comestible, 250, 1), 20))
        .with_item_type(made_of(
            flagged(
                charged(item("power_armor", "power armor", Armor, 10000, 40000), 0, 5),
                &["USE_UPS"],
            ),
            &["steel"],
        ))
        // tools
        .with_item_type(shovel)
        .with_item_type(made_of(item("lockpick", "lock pick", Tool, 250, 10), &["steel"]))
        .with_item_type(made_of(item("scissors", "scissors", Tool, 250, 70), &["steel"]))
        .with_item_type(made_of(item("knife_butcher", "butcher knife", Tool, 250, 250), &["steel"]))
        .with_item_type(item("road_map", "road map", Book, 250, 30))
        .with_item_type(made_of(item("whistle", "whistle", Tool, 250, 20), &["plastic"]))
        .with_item_type(made_of(
            charged(item("airhorn", "airhorn", Tool, 250, 200), 50, 5),
            &["plastic"],
        ))
        .with_item_type(made_of(item("saxophone", "saxophone", Tool, 2000, 3000), &["steel"]))
        .with_item_type(item("folded_bicycle", "folded bicycle", Tool, 7500, 12000))
        .with_item_type(item("bot_manhack", "inactive manhack", Tool, 750, 2000))
        .with_item_type(made_of(item("beartrap", "bear trap", Tool, 750, 8000), &["steel"]))
        .with_item_type(item("tripwire", "tripwire trap", Tool, 250, 50))
        .with_item_type(item("landmine", "land mine", Tool, 500, 2000))
        // weapons and containers
        .with_item_type(pistol)
        .with_item_type(rifle)
        .with_item_type(made_of(
            flagged(item("knife_combat", "combat knife", Generic, 250, 300), &["SHEATH_KNIFE"]),
            &["steel"],
        ))
        .with_item_type(made_of(item("holster", "holster", Armor, 250, 200), &["leather"]))
        .with_item_type(made_of(item("sheath", "sheath", Armor, 250, 100), &["leather"]))
        .with_item_type(made_of(item("quiver", "quiver", Armor, 1000, 300), &["leather"]))
        .with_item_type(ammo_of(
            stacked(item("arrow_wood", "wooden arrow", Ammo, 250, 40), 10),
            "arrow",
        ))
        .with_item_type(ammo_of(
            stacked(item("bolt_steel", "steel bolt", Ammo, 250, 30), 10),
            "bolt",
        ))
        .with_item_type(ammo_of(stacked(item("223", ".223 Remington", Ammo, 250, 12), 20), "223"))
        .with_item_type(loads(charged(item("belt223", "ammo belt", Generic, 250, 20), 100, 1), "223"))
        .with_item_type(made_of(item("corpse", "corpse", Generic, 62500, 80000), &["leather"]))
        .with_default_ammo("battery", "battery")
        .with_default_ammo("223", "223")
}

fn recipes() -> RecipesSnapshot {
    let mut gloves = Recipe::new("gloves_leather", "gloves_leather", "tailor", 3);
    gloves.required_skills.insert(SkillId::new("fabrication"), 1);
    gloves.qualities.insert(QualityId::new("CUT"), 1);
    RecipesSnapshot::new(Vec::new())
        .with_recipe(Recipe::new("jacket_light", "jacket_light", "tailor", 2))
        .with_recipe(gloves)
}

fn species(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| (*s).to_owned()).collect()
}

fn tables() -> TablesSnapshot {
    let zombie = MonsterDef {
        id: "mon_zombie".into(),
        name: "zombie".to_owned(),
        hp: 80,
        difficulty: 3,
        species: species(&["ZOMBIE", "HUMAN"]),
        flags: BTreeSet::new(),
    };
    let manhack = MonsterDef {
        id: "mon_manhack".into(),
        name: "manhack".to_owned(),
        hp: 10,
        difficulty: 4,
        species: species(&["ROBOT"]),
        flags: BTreeSet::new(),
    };
    let wolf = MonsterDef {
        id: "mon_wolf".into(),
        name: "wolf".to_owned(),
        hp: 40,
        difficulty: 5,
        species: species(&["MAMMAL"]),
        flags: BTreeSet::new(),
    };
    let mut tables = TablesSnapshot::new();
    for skill in [
        "tailor",
        "fabrication",
        "firstaid",
        "mechanics",
        "traps",
        "survival",
        "pistol",
        "rifle",
        "melee",
    ] {
        tables = tables.with_skill(skill);
    }
    for effect in [
        "bleed",
        "bite",
        "infected",
        "recover",
        "bandaged",
        "disinfected",
        "stimulant",
        "map_read",
        "music",
    ] {
        tables = tables.with_effect(effect);
    }
    for terrain in [
        "t_dirt",
        "t_rock",
        "t_water_sh",
        "t_door_locked",
        "t_door_c",
        "t_door_locked_alarm",
        "t_door_locked_interior",
        "t_chaingate_l",
        "t_chaingate_c",
        "t_tree",
    ] {
        tables = tables.with_terrain(terrain);
    }
    tables
        .with_monster(zombie)
        .with_monster(manhack)
        .with_monster(wolf)
        .with_trap("tr_beartrap", "bear trap")
        .with_trap("tr_beartrap_buried", "buried bear trap")
        .with_trap("tr_tripwire", "tripwire")
        .with_trap("tr_landmine", "land mine")
        .with_trap("tr_landmine_buried", "buried land mine")
        .with_vehicle("bicycle")
        .with_field("fd_smoke")
        .with_field("fd_fire")
        .with_field("fd_tear_gas")
}
