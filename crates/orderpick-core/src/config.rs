//! Engine configuration for orderpick
//!
//! Configuration is read from `orderpick.toml`. A missing file yields the
//! defaults so a fresh checkout works without any setup.

pub mod types;

use std::fs;
use std::path::Path;

use crate::error::{OrderpickError, Result};

pub use types::{EngineConfig, IdentifierConfig, SelectionConfig, CONFIG_FORMAT_VERSION};

/// Default config file name, resolved against the working directory
pub const CONFIG_FILE: &str = "orderpick.toml";

/// Largest suffix width whose numeric space still fits in a `u64`
pub const MAX_SUFFIX_WIDTH: u32 = 18;

impl EngineConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file absent, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| OrderpickError::Other(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the generator or session cannot work with
    pub fn validate(&self) -> Result<()> {
        let width = self.identifier.suffix_width;
        if width == 0 || width > MAX_SUFFIX_WIDTH {
            crate::bail_invalid!("identifier.suffix_width", width);
        }
        if self.identifier.max_oracle_failures == 0 {
            crate::bail_invalid!("identifier.max_oracle_failures", 0);
        }
        if self.selection.page_size == 0 {
            crate::bail_invalid!("selection.page_size", 0);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::ActionMode;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.version, CONFIG_FORMAT_VERSION);
        assert_eq!(config.identifier.prefix, "LI");
        assert_eq!(config.identifier.suffix_width, 6);
        assert_eq!(config.identifier.max_oracle_failures, 3);
        assert_eq!(config.selection.action_mode, ActionMode::Create);
        assert!(config.selection.show_only_bookable);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let mut config = EngineConfig::default();
        config.identifier.prefix = "LOC".to_string();
        config.selection.action_mode = ActionMode::Edit;
        config.save(&path).unwrap();

        let loaded = EngineConfig::load(&path).unwrap();
        assert_eq!(loaded.identifier.prefix, "LOC");
        assert_eq!(loaded.selection.action_mode, ActionMode::Edit);
        assert_eq!(loaded.selection.page_size, 10);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[identifier]\nmax_collisions = 5\n").unwrap();

        let loaded = EngineConfig::load(&path).unwrap();
        assert_eq!(loaded.identifier.max_collisions, 5);
        assert_eq!(loaded.identifier.prefix, "LI");
        assert_eq!(loaded.identifier.suffix_width, 6);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let loaded = EngineConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded.identifier.max_collisions, 1000);
    }

    #[test]
    fn test_zero_width_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[identifier]\nsuffix_width = 0\n").unwrap();

        let err = EngineConfig::load(&path).unwrap_err();
        assert!(matches!(err, OrderpickError::InvalidValue { .. }));
    }
}
