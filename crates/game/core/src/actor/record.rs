//! Configuration records feeding [`ItemUseActor::load`](super::ItemUseActor::load).
//!
//! A record is a flat key/value document. Accessors come in two flavours:
//! `get_*` with a default for optional fields, and `require_*` for fields an
//! actor cannot work without. Unknown keys are ignored; a present key of the
//! wrong shape is always an error.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{BodyPart, EffectData, EffectId};

/// Errors raised while loading or finalizing an actor.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("record has no `type` field")]
    MissingType,

    #[error("unknown actor type `{0}`")]
    UnknownActorType(String),

    #[error("missing required field `{field}`")]
    MissingField { field: String },

    #[error("field `{field}` must be {expected}")]
    InvalidField {
        field: String,
        expected: &'static str,
    },

    #[error("field `{field}` refers to unknown {kind} `{id}`")]
    UnknownReference {
        field: String,
        kind: &'static str,
        id: String,
    },

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl ConfigError {
    pub fn invalid(field: &str, expected: &'static str) -> Self {
        Self::InvalidField {
            field: field.to_owned(),
            expected,
        }
    }

    pub fn unknown(field: &str, kind: &'static str, id: impl ToString) -> Self {
        Self::UnknownReference {
            field: field.to_owned(),
            kind,
            id: id.to_string(),
        }
    }
}

impl GameError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingType => "CONFIG_MISSING_TYPE",
            Self::UnknownActorType(_) => "CONFIG_UNKNOWN_ACTOR_TYPE",
            Self::MissingField { .. } => "CONFIG_MISSING_FIELD",
            Self::InvalidField { .. } => "CONFIG_INVALID_FIELD",
            Self::UnknownReference { .. } => "CONFIG_UNKNOWN_REFERENCE",
            Self::Oracle(_) => "CONFIG_ORACLE",
        }
    }
}

/// A single configuration value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<ConfigValue>),
    Map(BTreeMap<String, ConfigValue>),
}

impl ConfigValue {
    fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for ConfigValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for ConfigValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for ConfigValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<ConfigRecord> for ConfigValue {
    fn from(record: ConfigRecord) -> Self {
        Self::Map(record.fields)
    }
}

/// Flat key/value document describing one actor.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ConfigRecord {
    fields: BTreeMap<String, ConfigValue>,
}

impl ConfigRecord {
    /// Empty record tagged with an actor type.
    pub fn new(type_tag: &str) -> Self {
        Self::default().with("type", type_tag)
    }

    pub fn from_fields(fields: BTreeMap<String, ConfigValue>) -> Self {
        Self { fields }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<ConfigValue>) -> Self {
        self.fields.insert(key.to_owned(), value.into());
        self
    }

    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.fields.get(key)
    }

    /// The actor type tag.
    ///
    /// # Errors
    ///
    /// `MissingType` when absent, `InvalidField` when not a string.
    pub fn type_tag(&self) -> Result<&str, ConfigError> {
        match self.fields.get("type") {
            None => Err(ConfigError::MissingType),
            Some(value) => value
                .as_str()
                .ok_or_else(|| ConfigError::invalid("type", "a string")),
        }
    }

    // ===== scalars =====

    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.fields.get(key) {
            None => Ok(default),
            Some(ConfigValue::Bool(v)) => Ok(*v),
            Some(_) => Err(ConfigError::invalid(key, "a boolean")),
        }
    }

    pub fn get_int(&self, key: &str, default: i64) -> Result<i64, ConfigError> {
        match self.fields.get(key) {
            None => Ok(default),
            Some(value) => value
                .as_int()
                .ok_or_else(|| ConfigError::invalid(key, "an integer")),
        }
    }

    pub fn get_i32(&self, key: &str, default: i32) -> Result<i32, ConfigError> {
        let value = self.get_int(key, default.into())?;
        i32::try_from(value).map_err(|_| ConfigError::invalid(key, "a 32-bit integer"))
    }

    /// Non-negative integer.
    pub fn get_u32(&self, key: &str, default: u32) -> Result<u32, ConfigError> {
        let value = self.get_int(key, default.into())?;
        u32::try_from(value).map_err(|_| ConfigError::invalid(key, "a non-negative integer"))
    }

    pub fn get_float(&self, key: &str, default: f32) -> Result<f32, ConfigError> {
        match self.fields.get(key) {
            None => Ok(default),
            Some(value) => value
                .as_float()
                .map(|v| v as f32)
                .ok_or_else(|| ConfigError::invalid(key, "a number")),
        }
    }

    pub fn get_str(&self, key: &str) -> Result<Option<String>, ConfigError> {
        match self.fields.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(|s| Some(s.to_owned()))
                .ok_or_else(|| ConfigError::invalid(key, "a string")),
        }
    }

    pub fn get_string(&self, key: &str, default: &str) -> Result<String, ConfigError> {
        Ok(self.get_str(key)?.unwrap_or_else(|| default.to_owned()))
    }

    /// Parses a string field through `FromStr` (enum names, ids).
    pub fn get_parsed<T: FromStr>(
        &self,
        key: &str,
        expected: &'static str,
    ) -> Result<Option<T>, ConfigError> {
        match self.get_str(key)? {
            None => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::invalid(key, expected)),
        }
    }

    pub fn require_str(&self, key: &str) -> Result<String, ConfigError> {
        self.get_str(key)?.ok_or_else(|| missing(key))
    }

    pub fn require_i32(&self, key: &str) -> Result<i32, ConfigError> {
        if !self.has(key) {
            return Err(missing(key));
        }
        self.get_i32(key, 0)
    }

    pub fn require_float(&self, key: &str) -> Result<f32, ConfigError> {
        if !self.has(key) {
            return Err(missing(key));
        }
        self.get_float(key, 0.0)
    }

    // ===== collections =====

    /// List of strings; a single string is accepted as a one-element list.
    pub fn get_string_list(&self, key: &str) -> Result<Vec<String>, ConfigError> {
        match self.fields.get(key) {
            None => Ok(Vec::new()),
            Some(ConfigValue::Str(s)) => Ok(vec![s.clone()]),
            Some(ConfigValue::List(values)) => values
                .iter()
                .map(|v| {
                    v.as_str()
                        .map(str::to_owned)
                        .ok_or_else(|| ConfigError::invalid(key, "a list of strings"))
                })
                .collect(),
            Some(_) => Err(ConfigError::invalid(key, "a list of strings")),
        }
    }

    pub fn get_string_set<T: From<String> + Ord>(
        &self,
        key: &str,
    ) -> Result<BTreeSet<T>, ConfigError> {
        Ok(self
            .get_string_list(key)?
            .into_iter()
            .map(T::from)
            .collect())
    }

    /// Nested record.
    pub fn get_record(&self, key: &str) -> Result<Option<ConfigRecord>, ConfigError> {
        match self.fields.get(key) {
            None => Ok(None),
            Some(ConfigValue::Map(fields)) => Ok(Some(ConfigRecord::from_fields(fields.clone()))),
            Some(_) => Err(ConfigError::invalid(key, "an object")),
        }
    }

    pub fn get_record_list(&self, key: &str) -> Result<Vec<ConfigRecord>, ConfigError> {
        match self.fields.get(key) {
            None => Ok(Vec::new()),
            Some(ConfigValue::List(values)) => values
                .iter()
                .map(|v| match v {
                    ConfigValue::Map(fields) => Ok(ConfigRecord::from_fields(fields.clone())),
                    _ => Err(ConfigError::invalid(key, "a list of objects")),
                })
                .collect(),
            Some(_) => Err(ConfigError::invalid(key, "a list of objects")),
        }
    }

    /// Map of name to integer, written either as an object or as a list of
    /// `[name, value]` pairs.
    pub fn get_int_map(&self, key: &str) -> Result<BTreeMap<String, i64>, ConfigError> {
        let invalid = || ConfigError::invalid(key, "a map of integers");
        match self.fields.get(key) {
            None => Ok(BTreeMap::new()),
            Some(ConfigValue::Map(fields)) => fields
                .iter()
                .map(|(k, v)| v.as_int().map(|v| (k.clone(), v)).ok_or_else(invalid))
                .collect(),
            Some(ConfigValue::List(pairs)) => pairs
                .iter()
                .map(|pair| match pair {
                    ConfigValue::List(kv) if kv.len() == 2 => {
                        let name = kv[0].as_str().ok_or_else(invalid)?;
                        let value = kv[1].as_int().ok_or_else(invalid)?;
                        Ok((name.to_owned(), value))
                    }
                    _ => Err(invalid()),
                })
                .collect(),
            Some(_) => Err(invalid()),
        }
    }

    /// Map of name to string.
    pub fn get_string_map(&self, key: &str) -> Result<BTreeMap<String, String>, ConfigError> {
        let invalid = || ConfigError::invalid(key, "a map of strings");
        match self.fields.get(key) {
            None => Ok(BTreeMap::new()),
            Some(ConfigValue::Map(fields)) => fields
                .iter()
                .map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_owned())).ok_or_else(invalid))
                .collect(),
            Some(_) => Err(invalid()),
        }
    }

    /// Map of name to `[min, max]` range.
    pub fn get_range_map(&self, key: &str) -> Result<BTreeMap<String, (i32, i32)>, ConfigError> {
        let invalid = || ConfigError::invalid(key, "a map of [min, max] ranges");
        let fields = match self.fields.get(key) {
            None => return Ok(BTreeMap::new()),
            Some(ConfigValue::Map(fields)) => fields,
            Some(_) => return Err(invalid()),
        };
        fields
            .iter()
            .map(|(name, value)| match value {
                ConfigValue::List(bounds) if bounds.len() == 2 => {
                    let lo = bounds[0].as_int().ok_or_else(invalid)?;
                    let hi = bounds[1].as_int().ok_or_else(invalid)?;
                    let lo = i32::try_from(lo).map_err(|_| invalid())?;
                    let hi = i32::try_from(hi).map_err(|_| invalid())?;
                    Ok((name.clone(), (lo, hi)))
                }
                _ => Err(invalid()),
            })
            .collect()
    }

    /// Effect list: objects with `id`, `duration`, optional `bp` and `permanent`.
    pub fn get_effects(&self, key: &str) -> Result<Vec<EffectData>, ConfigError> {
        self.get_record_list(key)?
            .iter()
            .map(|record| {
                let id = record.require_str("id")?;
                let bp = record.get_parsed::<BodyPart>("bp", "a body part name")?;
                Ok(EffectData {
                    id: EffectId::new(id),
                    duration: record.get_u32("duration", 0)?,
                    bp,
                    permanent: record.get_bool("permanent", false)?,
                })
            })
            .collect()
    }
}

fn missing(key: &str) -> ConfigError {
    ConfigError::MissingField {
        field: key.to_owned(),
    }
}
