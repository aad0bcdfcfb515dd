//! magnetboard.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default store file, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = "magnetboard.redb";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardConfig {
    pub store: Option<StoreConfig>,
    pub placement: Option<PlacementConfig>,
    pub seed: Option<SeedConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementConfig {
    pub occupied_cell: Option<OccupiedCell>,
    pub teacher_conflicts: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    pub starter_catalog: Option<bool>,
}

/// What `place` does when the target cell already holds a unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupiedCell {
    /// Evict the current occupant.
    #[default]
    Overwrite,
    /// Refuse the placement.
    Reject,
}

impl BoardConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: BoardConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Every section filled with its default value.
    pub fn scaffold() -> Self {
        BoardConfig {
            store: Some(StoreConfig {
                path: Some(PathBuf::from(DEFAULT_STORE_PATH)),
            }),
            placement: Some(PlacementConfig {
                occupied_cell: Some(OccupiedCell::Overwrite),
                teacher_conflicts: Some(false),
            }),
            seed: Some(SeedConfig {
                starter_catalog: Some(true),
            }),
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.store
            .as_ref()
            .and_then(|s| s.path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH))
    }

    pub fn occupied_cell(&self) -> OccupiedCell {
        self.placement
            .as_ref()
            .and_then(|p| p.occupied_cell)
            .unwrap_or_default()
    }

    pub fn teacher_conflicts(&self) -> bool {
        self.placement
            .as_ref()
            .and_then(|p| p.teacher_conflicts)
            .unwrap_or(false)
    }

    pub fn seed_starter_catalog(&self) -> bool {
        self.seed
            .as_ref()
            .and_then(|s| s.starter_catalog)
            .unwrap_or(true)
    }
}
