//! Optional placement checks layered on top of the grid's own rules.
//!
//! A policy inspects the state an operation *would* produce and may veto
//! it. The board runs every registered policy before committing, so a
//! vetoed operation leaves no trace.

use magnetboard_core::{CellKey, YearGroup};

use crate::grid::Grid;
use crate::registry::Registry;
use crate::rejection::{Outcome, Rejection};

/// A veto over proposed board states.
pub trait PlacementPolicy: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Check the proposed `grid` (with `registry`) around the `touched`
    /// cells, i.e. the cells the operation wrote.
    fn check(&self, registry: &Registry, grid: &Grid, touched: &[CellKey]) -> Outcome;
}

/// Rejects states where one teacher would be in two year groups at the
/// same day and block.
///
/// Names are compared trimmed and case-insensitively. Both primary and
/// secondary teachers count.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeacherConflictPolicy;

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl PlacementPolicy for TeacherConflictPolicy {
    fn name(&self) -> &'static str {
        "teacher-conflict"
    }

    fn check(&self, registry: &Registry, grid: &Grid, touched: &[CellKey]) -> Outcome {
        for &cell in touched {
            let Some(unit) = grid.occupant(cell).and_then(|id| registry.get(id)) else {
                continue;
            };
            let teachers: Vec<(String, &str)> = unit
                .teachers()
                .filter(|t| !t.trim().is_empty())
                .map(|t| (normalize(t), t))
                .collect();

            for year in YearGroup::all().filter(|y| *y != cell.year_group) {
                let other = cell.slot().in_year(year);
                let Some(neighbour) = grid.occupant(other).and_then(|id| registry.get(id)) else {
                    continue;
                };
                let clash = teachers.iter().find(|(key, _)| {
                    neighbour.teachers().any(|t| normalize(t) == *key)
                });
                if let Some((_, teacher)) = clash {
                    return Err(Rejection::TeacherConflict {
                        teacher: teacher.to_string(),
                        cell,
                        other,
                    });
                }
            }
        }
        Ok(())
    }
}
