pub mod config;
pub mod grid;
pub mod units;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use magnetboard_core::BoardConfig;
use magnetboard_placement::{Board, Rejection};
use magnetboard_state::StateStore;

/// Config file looked up in the working directory when `--config` is absent.
const DEFAULT_CONFIG: &str = "magnetboard.toml";

/// Global flags shared by every command.
pub struct Context {
    config: Option<PathBuf>,
    store: Option<PathBuf>,
}

impl Context {
    pub fn new(config: Option<PathBuf>, store: Option<PathBuf>) -> Self {
        Self { config, store }
    }

    pub fn load_config(&self) -> anyhow::Result<BoardConfig> {
        match &self.config {
            Some(path) => BoardConfig::from_file(path),
            None if Path::new(DEFAULT_CONFIG).exists() => {
                BoardConfig::from_file(Path::new(DEFAULT_CONFIG))
            }
            None => Ok(BoardConfig::default()),
        }
    }

    pub fn open_board(&self) -> anyhow::Result<Board> {
        let config = self.load_config()?;
        let path = self.store.clone().unwrap_or_else(|| config.store_path());
        debug!(path = %path.display(), "opening board store");
        let store = StateStore::open(&path)?;
        Ok(Board::open(store, &config)?)
    }
}

/// Log a refused operation and turn it into the command's error.
pub fn rejected(rejection: Rejection) -> anyhow::Error {
    warn!(reason = %rejection, "operation rejected");
    rejection.into()
}
