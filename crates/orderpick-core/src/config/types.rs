//! Configuration type definitions

use crate::guard::ActionMode;
use serde::{Deserialize, Serialize};

/// Current config format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Top-level engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Config format version for compatibility checking
    #[serde(default = "default_version")]
    pub version: u32,

    /// Identifier generation settings
    #[serde(default)]
    pub identifier: IdentifierConfig,

    /// Selection session settings
    #[serde(default)]
    pub selection: SelectionConfig,
}

/// Settings for location identifier generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierConfig {
    /// Fixed prefix placed before the organization id
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Number of digits in the random suffix
    #[serde(default = "default_suffix_width")]
    pub suffix_width: u32,

    /// Collisions tolerated before giving up
    #[serde(default = "default_max_collisions")]
    pub max_collisions: u32,

    /// Consecutive oracle failures tolerated before giving up
    #[serde(default = "default_max_oracle_failures")]
    pub max_oracle_failures: u32,
}

/// Settings for order line-item selection sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Whether sessions start in create or edit mode
    #[serde(default)]
    pub action_mode: ActionMode,

    /// Restrict listings to orders that are ready for booking
    #[serde(default = "default_show_only_bookable")]
    pub show_only_bookable: bool,

    /// Orders per fetched page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_version() -> u32 {
    CONFIG_FORMAT_VERSION
}

fn default_prefix() -> String {
    "LI".to_string()
}

fn default_suffix_width() -> u32 {
    6
}

fn default_max_collisions() -> u32 {
    1000
}

fn default_max_oracle_failures() -> u32 {
    3
}

fn default_show_only_bookable() -> bool {
    true
}

fn default_page_size() -> usize {
    10
}

impl Default for IdentifierConfig {
    fn default() -> Self {
        IdentifierConfig {
            prefix: default_prefix(),
            suffix_width: default_suffix_width(),
            max_collisions: default_max_collisions(),
            max_oracle_failures: default_max_oracle_failures(),
        }
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        SelectionConfig {
            action_mode: ActionMode::default(),
            show_only_bookable: default_show_only_bookable(),
            page_size: default_page_size(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            version: CONFIG_FORMAT_VERSION,
            identifier: IdentifierConfig::default(),
            selection: SelectionConfig::default(),
        }
    }
}
