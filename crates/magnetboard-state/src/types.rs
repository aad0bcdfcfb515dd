use serde::{Deserialize, Serialize};

use magnetboard_core::{Placement, Unit};

/// Everything the board persists: the unit catalog and the live placements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    #[serde(default)]
    pub units: Vec<Unit>,
    #[serde(default)]
    pub placements: Vec<Placement>,
}
