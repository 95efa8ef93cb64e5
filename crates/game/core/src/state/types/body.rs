//! Body parts and their hit points.

/// Body part that can be healed, damaged or carry a localized effect.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BodyPart {
    Head,
    Torso,
    ArmL,
    ArmR,
    LegL,
    LegR,
}

impl BodyPart {
    pub const ALL: [BodyPart; 6] = [
        BodyPart::Head,
        BodyPart::Torso,
        BodyPart::ArmL,
        BodyPart::ArmR,
        BodyPart::LegL,
        BodyPart::LegR,
    ];

    pub const fn category(self) -> BodyPartCategory {
        match self {
            BodyPart::Head => BodyPartCategory::Head,
            BodyPart::Torso => BodyPartCategory::Torso,
            BodyPart::ArmL | BodyPart::ArmR | BodyPart::LegL | BodyPart::LegR => {
                BodyPartCategory::Limb
            }
        }
    }

    /// Display name used in messages ("left arm").
    pub const fn label(self) -> &'static str {
        match self {
            BodyPart::Head => "head",
            BodyPart::Torso => "torso",
            BodyPart::ArmL => "left arm",
            BodyPart::ArmR => "right arm",
            BodyPart::LegL => "left leg",
            BodyPart::LegR => "right leg",
        }
    }
}

/// Healing power is tuned per category, never per individual part.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BodyPartCategory {
    Head,
    Torso,
    Limb,
}

/// Current and maximum hit points of one body part.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitPoints {
    pub current: i32,
    pub max: i32,
}

impl HitPoints {
    pub const fn new(current: i32, max: i32) -> Self {
        Self { current, max }
    }

    pub const fn full(max: i32) -> Self {
        Self { current: max, max }
    }

    pub const fn missing(&self) -> i32 {
        let missing = self.max - self.current;
        if missing < 0 { 0 } else { missing }
    }

    /// Restores up to `amount`, bounded by the missing hit points.
    /// Returns the amount actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let restored = amount.clamp(0, self.missing());
        self.current += restored;
        restored
    }

    /// Removes up to `amount`, never dropping below zero.
    pub fn damage(&mut self, amount: i32) -> i32 {
        let removed = amount.clamp(0, self.current.max(0));
        self.current -= removed;
        removed
    }
}
