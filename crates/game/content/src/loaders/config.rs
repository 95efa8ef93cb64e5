//! Session configuration loader.

use std::path::Path;

use item_use_core::SessionConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for session configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a [`SessionConfig`] from a TOML file. Keys left out keep their
    /// defaults.
    pub fn load(path: &Path) -> LoadResult<SessionConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<SessionConfig> {
        let config: SessionConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse session TOML: {}", e))?;
        if config.long_action_step == 0 {
            anyhow::bail!("Invalid session config: long_action_step must be positive");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_keep_defaults() {
        let config = ConfigLoader::parse("seed = 7\n").unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.turn_moves, SessionConfig::DEFAULT_TURN_MOVES);
        assert_eq!(
            config.max_repair_attempts,
            SessionConfig::DEFAULT_MAX_REPAIR_ATTEMPTS
        );
    }

    #[test]
    fn rejects_a_zero_step() {
        let err = ConfigLoader::parse("long_action_step = 0\n").unwrap_err();
        assert!(err.to_string().contains("long_action_step"));
    }
}
