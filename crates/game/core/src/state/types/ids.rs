//! String identifiers referring to content definitions.
//!
//! Content is keyed by stable string ids (`"rag"`, `"mon_zombie"`), each wrapped
//! in its own newtype so an effect id can never be passed where a skill is
//! expected.

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Item type definition id.
    ItemTypeId
);
string_id!(MaterialId);
string_id!(SkillId);
string_id!(
    /// Status effect id (`bleed`, `bite`, `infected`, ...).
    EffectId
);
string_id!(MonsterTypeId);
string_id!(TrapId);
string_id!(TerrainId);
string_id!(FieldId);
string_id!(VehicleProtoId);
string_id!(
    /// Ammunition family shared by ammo items and the things that load them.
    AmmoTypeId
);
string_id!(VitaminId);
string_id!(
    /// Tool quality (`DIG`, `SCREW`, ...).
    QualityId
);
string_id!(RecipeId);
