//! Rejection reasons for board operations.
//!
//! Every mutating operation returns an [`Outcome`]. A rejected operation
//! leaves the board exactly as it was.

use magnetboard_core::{CellKey, UnitId, YearGroup};
use thiserror::Error;

/// Result of a board operation.
pub type Outcome<T = ()> = Result<T, Rejection>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("unit does not exist: {0}")]
    UnitNotFound(UnitId),

    #[error("wrong year: {unit} belongs to {unit_year}, not {target_year}")]
    WrongYear {
        unit: UnitId,
        unit_year: YearGroup,
        target_year: YearGroup,
    },

    #[error("capacity exhausted: {unit} already used its {module_count} module(s)")]
    CapacityExhausted { unit: String, module_count: u32 },

    #[error("cell {0} is already occupied")]
    CellOccupied(CellKey),

    #[error("no unit at source cell {0}")]
    NoUnitAtSource(CellKey),

    #[error("cannot move between year groups ({from} to {to})")]
    CrossYearMove { from: YearGroup, to: YearGroup },

    #[error("teacher conflict: {teacher} is already at {other}")]
    TeacherConflict {
        teacher: String,
        cell: CellKey,
        other: CellKey,
    },

    #[error("{unit} has {used} placement(s); module count {module_count} is too low")]
    CapacityBelowUsage {
        unit: UnitId,
        module_count: u32,
        used: usize,
    },

    #[error("{unit} has {used} placement(s); remove them before changing its year")]
    YearChangeWhilePlaced { unit: UnitId, used: usize },
}

impl Rejection {
    /// User-facing reason text.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}
