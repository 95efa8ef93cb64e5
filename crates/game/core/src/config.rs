/// Session configuration and rule constants shared by every actor.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    /// Seed for the shared RNG. `None` asks the runtime to pick one.
    pub seed: Option<u64>,
    /// Moves granted to an agent per turn.
    pub turn_moves: i32,
    /// Moves a long action advances per scheduler tick.
    pub long_action_step: u32,
    /// Upper bound on attempts within one repair session.
    pub max_repair_attempts: u32,
}

impl SessionConfig {
    // ===== item damage scale =====
    /// Lowest damage an item can reach (fully reinforced).
    pub const MIN_DAMAGE: i32 = -1;
    /// Damage above this destroys the item.
    pub const MAX_DAMAGE: i32 = 4;

    // ===== volume and moves =====
    /// Millilitres per legacy volume unit.
    pub const VOLUME_UNIT_ML: u32 = 250;
    /// Moves an agent normally gets per turn.
    pub const DEFAULT_TURN_MOVES: i32 = 100;
    /// Move cost of a flat, walkable tile.
    pub const FLAT_MOVE_COST: i32 = 2;

    // ===== skills =====
    /// Highest level any skill can be trained to.
    pub const MAX_SKILL_LEVEL: i32 = 10;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_LONG_ACTION_STEP: u32 = 100;
    pub const DEFAULT_MAX_REPAIR_ATTEMPTS: u32 = 20;

    pub fn new() -> Self {
        Self {
            seed: None,
            turn_moves: Self::DEFAULT_TURN_MOVES,
            long_action_step: Self::DEFAULT_LONG_ACTION_STEP,
            max_repair_attempts: Self::DEFAULT_MAX_REPAIR_ATTEMPTS,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::new()
        }
    }

    /// Converts a volume in millilitres to whole legacy units, rounding down.
    pub const fn volume_units(volume_ml: u32) -> u32 {
        volume_ml / Self::VOLUME_UNIT_ML
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}
