//! Configuration for the recipe finder
//!
//! Loaded from YAML. Every section and field has a default, so an empty
//! document (or no file at all) yields a working configuration.
//!
//! ```yaml
//! server:
//!   bind_addr: "0.0.0.0:5000"
//! knowledge:
//!   path: data/knowledge.json
//!   format: json          # or: snapshot
//!   recipe_class: FoodRecipes
//! matching:
//!   threshold: 80
//!   unresolved_ingredient: fail_open   # or: fail_closed
//! ```

use crate::entity_linking::MATCH_THRESHOLD;
use crate::error::ConfigError;
use crate::search::UnresolvedPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration path
pub const DEFAULT_CONFIG_PATH: &str = "config/recipe_finder.yaml";

/// Env var naming the configuration file
pub const CONFIG_PATH_ENV: &str = "RECIPE_FINDER_CONFIG";

/// Env var overriding `server.bind_addr`
pub const BIND_ADDR_ENV: &str = "RECIPE_FINDER_ADDR";

/// Env var overriding `knowledge.path`
pub const KNOWLEDGE_PATH_ENV: &str = "RECIPE_FINDER_KNOWLEDGE";

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub server: ServerConfig,
    pub knowledge: KnowledgeConfig,
    pub matching: MatchingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
        }
    }
}

/// Knowledge source format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeFormat {
    /// JSON export of the knowledge base
    #[default]
    Json,
    /// Compiled bincode snapshot
    Snapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    pub path: PathBuf,
    pub format: KnowledgeFormat,
    /// Class whose members are recipes; `null` treats every entity as one
    pub recipe_class: Option<String>,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/knowledge.json"),
            format: KnowledgeFormat::Json,
            recipe_class: Some("FoodRecipes".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Partial-ratio score a comparison must exceed (0-100)
    pub threshold: u8,
    pub unresolved_ingredient: UnresolvedPolicy,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: MATCH_THRESHOLD,
            unresolved_ingredient: UnresolvedPolicy::FailOpen,
        }
    }
}

impl SearchConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // serde_yaml reads an empty document as unit, not an empty map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: SearchConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::warn!(path = %path.display(), "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Apply `RECIPE_FINDER_ADDR` / `RECIPE_FINDER_KNOWLEDGE` overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup(BIND_ADDR_ENV).filter(|v| !v.trim().is_empty()) {
            self.server.bind_addr = addr;
        }
        if let Some(path) = lookup(KNOWLEDGE_PATH_ENV).filter(|v| !v.trim().is_empty()) {
            self.knowledge.path = PathBuf::from(path);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.matching.threshold > 100 {
            return Err(ConfigError::Invalid {
                field: "matching.threshold",
                message: format!("{} is outside 0..=100", self.matching.threshold),
            });
        }
        if self.server.bind_addr.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "server.bind_addr",
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
