//! Follow mode configuration
//!
//! Stored in `~/.config/follow-mode/config.yaml`:
//!
//! ```yaml
//! enabled: true
//! toggle_key: "f"
//! toggle_scope: global      # or: session
//! missing_resolver: notice  # or: fatal
//! resolvers:
//!   occurrences: grep-line
//! heights:
//!   occurrences: 10
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::follow::FollowError;
use crate::host::ViewKind;

/// What to do when a view has no resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingResolver {
    /// Refuse to enable and return the error
    Fatal,
    /// Show a warning and leave the view inactive
    #[default]
    Notice,
}

/// Reach of the enable/disable toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleScope {
    /// One flag for every followed view
    #[default]
    Global,
    /// Each session has its own flag
    Session,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowConfig {
    /// Whether following starts enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Key string bound to the toggle in followed views (e.g. "f", "ctrl+shift+f")
    #[serde(default = "default_toggle_key")]
    pub toggle_key: String,

    #[serde(default)]
    pub toggle_scope: ToggleScope,

    #[serde(default)]
    pub missing_resolver: MissingResolver,

    /// View kind -> name of a resolver offered by the host
    #[serde(default)]
    pub resolvers: BTreeMap<ViewKind, String>,

    /// View kind -> output view height (lines) after a match
    #[serde(default)]
    pub heights: BTreeMap<ViewKind, usize>,
}

fn default_enabled() -> bool {
    true
}

fn default_toggle_key() -> String {
    "f".to_string()
}

impl Default for FollowConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            toggle_key: default_toggle_key(),
            toggle_scope: ToggleScope::default(),
            missing_resolver: MissingResolver::default(),
            resolvers: BTreeMap::new(),
            heights: BTreeMap::new(),
        }
    }
}

impl FollowConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{}", e);
                Self::default()
            }
        }
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self, FollowError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FollowError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content).map_err(|e| match e {
            FollowError::Config(msg) => {
                FollowError::Config(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, FollowError> {
        serde_yaml::from_str(yaml).map_err(|e| FollowError::Config(e.to_string()))
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn height_for(&self, kind: &ViewKind) -> Option<usize> {
        self.heights.get(kind).copied()
    }
}
