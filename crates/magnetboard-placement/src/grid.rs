//! Placement grid — cell occupancy and capacity accounting.
//!
//! Cells are keyed by [`CellKey`] in a `BTreeMap`, so a cell can never hold
//! two units and iteration runs year → day → block.
//!
//! Every cell is either empty or occupied by one unit:
//!
//! ```text
//! Empty ──place/move-in──▶ Occupied(A) ──overwrite/swap──▶ Occupied(B)
//!   ▲                          │
//!   └───────remove/move-out────┘
//! ```

use std::collections::BTreeMap;
use std::ops::Bound::Included;

use tracing::debug;

use magnetboard_core::{
    CellKey, Day, OccupiedCell, Placement, Slot, TimeBlock, UnitId, YearGroup,
};

use crate::registry::Registry;
use crate::rejection::{Outcome, Rejection};

/// What a successful move did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// Source and destination were the same cell.
    Unchanged,
    /// The unit went to an empty cell.
    Moved,
    /// The two cells exchanged occupants.
    Swapped,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    cells: BTreeMap<CellKey, UnitId>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn occupant(&self, cell: CellKey) -> Option<&str> {
        self.cells.get(&cell).map(String::as_str)
    }

    /// Number of cells referencing `unit_id`, across every year.
    pub fn used_count(&self, unit_id: &str) -> usize {
        self.cells.values().filter(|id| *id == unit_id).count()
    }

    /// Cells currently holding `unit_id`.
    pub fn cells_of(&self, unit_id: &str) -> Vec<CellKey> {
        self.cells
            .iter()
            .filter(|(_, id)| *id == unit_id)
            .map(|(cell, _)| *cell)
            .collect()
    }

    pub fn placements(&self) -> Vec<Placement> {
        self.cells.iter().map(to_placement).collect()
    }

    /// Placements of one year, in day/block order.
    pub fn year_layout(&self, year_group: YearGroup) -> Vec<Placement> {
        let first = CellKey::new(year_group, Day::Monday, TimeBlock::First);
        let last = CellKey::new(year_group, Day::Friday, TimeBlock::Sixth);
        self.cells
            .range((Included(first), Included(last)))
            .map(to_placement)
            .collect()
    }

    /// Put `unit_id` into `cell`.
    ///
    /// Checks, in order: the unit exists, it belongs to the cell's year, it
    /// has capacity left. An occupied cell is then either overwritten
    /// (the previous occupant is returned) or refused, per `occupied`.
    pub fn place(
        &mut self,
        registry: &Registry,
        unit_id: &str,
        cell: CellKey,
        occupied: OccupiedCell,
    ) -> Outcome<Option<UnitId>> {
        let unit = registry
            .get(unit_id)
            .ok_or_else(|| Rejection::UnitNotFound(unit_id.to_string()))?;

        if unit.year_group != cell.year_group {
            return Err(Rejection::WrongYear {
                unit: unit.id.clone(),
                unit_year: unit.year_group,
                target_year: cell.year_group,
            });
        }

        let used = self.used_count(unit_id);
        if used >= unit.module_count as usize {
            return Err(Rejection::CapacityExhausted {
                unit: unit.display_name(),
                module_count: unit.module_count,
            });
        }

        if occupied == OccupiedCell::Reject && self.cells.contains_key(&cell) {
            return Err(Rejection::CellOccupied(cell));
        }

        // Re-placing a unit onto its own cell evicts nobody.
        let evicted = self
            .cells
            .insert(cell, unit.id.clone())
            .filter(|previous| *previous != unit.id);
        debug!(unit = %unit.id, %cell, evicted = ?evicted, "unit placed");
        Ok(evicted)
    }

    /// Move the unit at `from` to `to` inside one year's grid, swapping
    /// when `to` is occupied. Capacity is unaffected and not re-checked.
    pub fn move_unit(&mut self, year_group: YearGroup, from: Slot, to: Slot) -> Outcome<MoveKind> {
        let source = from.in_year(year_group);
        let destination = to.in_year(year_group);

        if !self.cells.contains_key(&source) {
            return Err(Rejection::NoUnitAtSource(source));
        }
        if source == destination {
            return Ok(MoveKind::Unchanged);
        }

        let Some(moving) = self.cells.remove(&source) else {
            return Err(Rejection::NoUnitAtSource(source));
        };
        let kind = match self.cells.insert(destination, moving) {
            Some(displaced) => {
                self.cells.insert(source, displaced);
                MoveKind::Swapped
            }
            None => MoveKind::Moved,
        };
        debug!(from = %source, to = %destination, ?kind, "unit moved");
        Ok(kind)
    }

    /// Empty a cell, returning its former occupant.
    pub fn remove(&mut self, cell: CellKey) -> Option<UnitId> {
        let removed = self.cells.remove(&cell);
        if let Some(id) = &removed {
            debug!(unit = %id, %cell, "unit removed from cell");
        }
        removed
    }

    /// Drop every placement of `unit_id`. Returns how many were removed.
    pub fn remove_unit(&mut self, unit_id: &str) -> usize {
        let before = self.cells.len();
        self.cells.retain(|_, id| id.as_str() != unit_id);
        before - self.cells.len()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Insert without any checks. Only for rebuilding from validated data.
    pub(crate) fn insert_unchecked(&mut self, cell: CellKey, unit_id: UnitId) -> Option<UnitId> {
        self.cells.insert(cell, unit_id)
    }
}

fn to_placement((cell, unit_id): (&CellKey, &UnitId)) -> Placement {
    Placement {
        unit_id: unit_id.clone(),
        year_group: cell.year_group,
        day: cell.day,
        block: cell.block,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magnetboard_core::{NewUnit, PrimaryRole};

    fn year(n: u8) -> YearGroup {
        YearGroup::new(n).unwrap()
    }

    fn cell(y: u8, day: Day, block: TimeBlock) -> CellKey {
        CellKey::new(year(y), day, block)
    }

    fn registry_with(units: &[(&str, u32, u8)]) -> Registry {
        Registry::from_units(units.iter().map(|(id, modules, y)| {
            NewUnit {
                subject: id.to_string(),
                primary_teacher: format!("Teacher {id}"),
                primary_role: PrimaryRole::Titular,
                secondary_teacher: None,
                module_count: *modules,
                year_group: year(*y),
                color: None,
            }
            .into_unit(id.to_string())
        }))
    }

    #[test]
    fn place_until_capacity_exhausted() {
        let registry = registry_with(&[("a", 2, 3)]);
        let mut grid = Grid::new();

        grid.place(&registry, "a", cell(3, Day::Monday, TimeBlock::First), OccupiedCell::Overwrite)
            .unwrap();
        grid.place(&registry, "a", cell(3, Day::Monday, TimeBlock::Second), OccupiedCell::Overwrite)
            .unwrap();
        assert_eq!(grid.used_count("a"), 2);

        let err = grid
            .place(&registry, "a", cell(3, Day::Monday, TimeBlock::Third), OccupiedCell::Overwrite)
            .unwrap_err();
        assert!(matches!(err, Rejection::CapacityExhausted { module_count: 2, .. }));
        assert_eq!(grid.used_count("a"), 2);
    }

    #[test]
    fn place_rejects_unknown_unit() {
        let registry = registry_with(&[]);
        let mut grid = Grid::new();
        let err = grid
            .place(&registry, "ghost", cell(1, Day::Monday, TimeBlock::First), OccupiedCell::Overwrite)
            .unwrap_err();
        assert_eq!(err, Rejection::UnitNotFound("ghost".to_string()));
        assert!(grid.is_empty());
    }

    #[test]
    fn place_rejects_wrong_year() {
        let registry = registry_with(&[("a", 2, 3)]);
        let mut grid = Grid::new();
        let err = grid
            .place(&registry, "a", cell(4, Day::Monday, TimeBlock::First), OccupiedCell::Overwrite)
            .unwrap_err();
        assert!(matches!(err, Rejection::WrongYear { .. }));
    }

    #[test]
    fn zero_capacity_unit_never_placed() {
        let registry = registry_with(&[("z", 0, 1)]);
        let mut grid = Grid::new();
        let err = grid
            .place(&registry, "z", cell(1, Day::Friday, TimeBlock::Sixth), OccupiedCell::Overwrite)
            .unwrap_err();
        assert!(matches!(err, Rejection::CapacityExhausted { .. }));
    }

    #[test]
    fn place_overwrites_occupied_cell() {
        let registry = registry_with(&[("a", 1, 2), ("b", 1, 2)]);
        let mut grid = Grid::new();
        let target = cell(2, Day::Tuesday, TimeBlock::Fourth);

        grid.place(&registry, "a", target, OccupiedCell::Overwrite).unwrap();
        let evicted = grid.place(&registry, "b", target, OccupiedCell::Overwrite).unwrap();

        assert_eq!(evicted.as_deref(), Some("a"));
        assert_eq!(grid.occupant(target), Some("b"));
        assert_eq!(grid.used_count("a"), 0);
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn replacing_own_cell_evicts_nobody() {
        let registry = registry_with(&[("a", 3, 2)]);
        let mut grid = Grid::new();
        let target = cell(2, Day::Thursday, TimeBlock::Second);

        assert_eq!(grid.place(&registry, "a", target, OccupiedCell::Overwrite).unwrap(), None);
        assert_eq!(grid.place(&registry, "a", target, OccupiedCell::Overwrite).unwrap(), None);
        assert_eq!(grid.occupant(target), Some("a"));
        assert_eq!(grid.used_count("a"), 1);
    }

    #[test]
    fn reject_policy_refuses_occupied_cell() {
        let registry = registry_with(&[("a", 1, 2), ("b", 1, 2)]);
        let mut grid = Grid::new();
        let target = cell(2, Day::Tuesday, TimeBlock::Fourth);

        grid.place(&registry, "a", target, OccupiedCell::Reject).unwrap();
        let err = grid.place(&registry, "b", target, OccupiedCell::Reject).unwrap_err();

        assert_eq!(err, Rejection::CellOccupied(target));
        assert_eq!(grid.occupant(target), Some("a"));
    }

    #[test]
    fn capacity_counts_across_all_years() {
        // Seeded inconsistently on purpose: a year-3 unit also sits on year 4.
        let registry = registry_with(&[("a", 1, 3)]);
        let mut grid = Grid::new();
        grid.insert_unchecked(cell(4, Day::Monday, TimeBlock::First), "a".to_string());

        let err = grid
            .place(&registry, "a", cell(3, Day::Monday, TimeBlock::First), OccupiedCell::Overwrite)
            .unwrap_err();
        assert!(matches!(err, Rejection::CapacityExhausted { .. }));
    }

    #[test]
    fn move_to_empty_cell_relocates() {
        let registry = registry_with(&[("a", 1, 1)]);
        let mut grid = Grid::new();
        let from = Slot::new(Day::Monday, TimeBlock::First);
        let to = Slot::new(Day::Thursday, TimeBlock::Fifth);
        grid.place(&registry, "a", from.in_year(year(1)), OccupiedCell::Overwrite).unwrap();

        assert_eq!(grid.move_unit(year(1), from, to).unwrap(), MoveKind::Moved);
        assert_eq!(grid.occupant(from.in_year(year(1))), None);
        assert_eq!(grid.occupant(to.in_year(year(1))), Some("a"));
        assert_eq!(grid.used_count("a"), 1);
    }

    #[test]
    fn move_onto_occupied_cell_swaps() {
        let registry = registry_with(&[("a", 1, 1), ("b", 1, 1)]);
        let mut grid = Grid::new();
        let mon1 = Slot::new(Day::Monday, TimeBlock::First);
        let mon2 = Slot::new(Day::Monday, TimeBlock::Second);
        grid.place(&registry, "a", mon1.in_year(year(1)), OccupiedCell::Overwrite).unwrap();
        grid.place(&registry, "b", mon2.in_year(year(1)), OccupiedCell::Overwrite).unwrap();

        assert_eq!(grid.move_unit(year(1), mon1, mon2).unwrap(), MoveKind::Swapped);
        assert_eq!(grid.occupant(mon1.in_year(year(1))), Some("b"));
        assert_eq!(grid.occupant(mon2.in_year(year(1))), Some("a"));
    }

    #[test]
    fn move_onto_same_cell_is_noop() {
        let registry = registry_with(&[("a", 1, 1)]);
        let mut grid = Grid::new();
        let slot = Slot::new(Day::Friday, TimeBlock::Third);
        grid.place(&registry, "a", slot.in_year(year(1)), OccupiedCell::Overwrite).unwrap();
        let before = grid.clone();

        assert_eq!(grid.move_unit(year(1), slot, slot).unwrap(), MoveKind::Unchanged);
        assert_eq!(grid, before);
    }

    #[test]
    fn move_from_empty_source_fails() {
        let mut grid = Grid::new();
        let from = Slot::new(Day::Monday, TimeBlock::First);
        let err = grid
            .move_unit(year(2), from, Slot::new(Day::Monday, TimeBlock::Second))
            .unwrap_err();
        assert_eq!(err, Rejection::NoUnitAtSource(from.in_year(year(2))));
    }

    #[test]
    fn move_is_scoped_to_one_year() {
        let registry = registry_with(&[("a", 1, 1), ("b", 1, 2)]);
        let mut grid = Grid::new();
        let slot = Slot::new(Day::Monday, TimeBlock::First);
        grid.place(&registry, "a", slot.in_year(year(1)), OccupiedCell::Overwrite).unwrap();
        grid.place(&registry, "b", slot.in_year(year(2)), OccupiedCell::Overwrite).unwrap();

        let to = Slot::new(Day::Monday, TimeBlock::Second);
        grid.move_unit(year(1), slot, to).unwrap();
        assert_eq!(grid.occupant(slot.in_year(year(2))), Some("b"));
        assert_eq!(grid.occupant(to.in_year(year(2))), None);
    }

    #[test]
    fn remove_and_remove_unit() {
        let registry = registry_with(&[("a", 3, 5)]);
        let mut grid = Grid::new();
        for block in [TimeBlock::First, TimeBlock::Second, TimeBlock::Third] {
            grid.place(&registry, "a", cell(5, Day::Wednesday, block), OccupiedCell::Overwrite)
                .unwrap();
        }

        assert_eq!(
            grid.remove(cell(5, Day::Wednesday, TimeBlock::First)).as_deref(),
            Some("a")
        );
        assert_eq!(grid.remove(cell(5, Day::Wednesday, TimeBlock::First)), None);
        assert_eq!(grid.remove_unit("a"), 2);
        assert!(grid.is_empty());
    }

    #[test]
    fn year_layout_only_returns_that_year_in_order() {
        let registry = registry_with(&[("a", 2, 2), ("b", 1, 3)]);
        let mut grid = Grid::new();
        grid.place(&registry, "a", cell(2, Day::Friday, TimeBlock::First), OccupiedCell::Overwrite)
            .unwrap();
        grid.place(&registry, "a", cell(2, Day::Monday, TimeBlock::Sixth), OccupiedCell::Overwrite)
            .unwrap();
        grid.place(&registry, "b", cell(3, Day::Monday, TimeBlock::First), OccupiedCell::Overwrite)
            .unwrap();

        let layout = grid.year_layout(year(2));
        assert_eq!(layout.len(), 2);
        assert_eq!(layout[0].day, Day::Monday);
        assert_eq!(layout[1].day, Day::Friday);
        assert_eq!(grid.placements().len(), 3);
    }
}
