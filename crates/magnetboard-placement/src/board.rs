//! Board — the single owner of the unit registry and the placement grid.
//!
//! Every mutation follows the same shape:
//!
//! 1. build the next registry/grid from the current one,
//! 2. run the grid's own checks, then every registered [`PlacementPolicy`],
//! 3. commit by assignment,
//! 4. write a snapshot to the [`StateStore`], if one is attached.
//!
//! A rejection at step 2 leaves the board untouched. A failure at step 4 is
//! logged and ignored: the in-memory board stays authoritative.

use tracing::{debug, info, warn};

use magnetboard_core::seed::starter_catalog;
use magnetboard_core::{
    BoardConfig, CellKey, NewUnit, OccupiedCell, Placement, Slot, Unit, UnitId, UnitPatch,
    YearGroup,
};
use magnetboard_state::{BoardSnapshot, StateResult, StateStore};

use crate::grid::{Grid, MoveKind};
use crate::policy::{PlacementPolicy, TeacherConflictPolicy};
use crate::registry::Registry;
use crate::rejection::{Outcome, Rejection};

pub struct Board {
    registry: Registry,
    grid: Grid,
    occupied_cell: OccupiedCell,
    policies: Vec<Box<dyn PlacementPolicy>>,
    store: Option<StateStore>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// An empty, unpersisted board with overwrite-on-place.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            grid: Grid::new(),
            occupied_cell: OccupiedCell::default(),
            policies: Vec::new(),
            store: None,
        }
    }

    /// An unpersisted board holding the starter catalog.
    pub fn with_starter_catalog() -> Self {
        Self::from_snapshot(BoardSnapshot {
            units: starter_catalog(),
            placements: Vec::new(),
        })
    }

    /// Rebuild a board from stored data.
    ///
    /// Placements that break an invariant (unknown unit, wrong year, over
    /// capacity, duplicate cell) are dropped with a warning; the first
    /// placement seen for a cell wins.
    pub fn from_snapshot(snapshot: BoardSnapshot) -> Self {
        let registry = Registry::from_units(snapshot.units);
        let mut grid = Grid::new();
        for placement in snapshot.placements {
            let cell = placement.cell();
            let Some(unit) = registry.get(&placement.unit_id) else {
                warn!(unit = %placement.unit_id, %cell, "dropping placement of unknown unit");
                continue;
            };
            if unit.year_group != placement.year_group {
                warn!(unit = %unit.id, %cell, "dropping placement on another year's grid");
                continue;
            }
            if grid.occupant(cell).is_some() {
                warn!(unit = %unit.id, %cell, "dropping placement on an occupied cell");
                continue;
            }
            if grid.used_count(&unit.id) >= unit.module_count as usize {
                warn!(unit = %unit.id, %cell, "dropping placement beyond module count");
                continue;
            }
            grid.insert_unchecked(cell, placement.unit_id);
        }
        Self {
            registry,
            grid,
            ..Self::new()
        }
    }

    /// Open the board stored in `store`, applying `config`'s placement
    /// policies. An empty store is seeded with the starter catalog when the
    /// config asks for it.
    ///
    /// The store is only written when opening changed the board: a fresh
    /// seed, or stored placements dropped while rebuilding.
    pub fn open(store: StateStore, config: &BoardConfig) -> StateResult<Self> {
        let (board, changed) = match store.load_board()? {
            Some(snapshot) => {
                let board = Self::from_snapshot(snapshot.clone());
                info!(
                    units = board.registry.len(),
                    placements = board.grid.len(),
                    "board loaded"
                );
                let changed = board.snapshot() != snapshot;
                (board, changed)
            }
            None if config.seed_starter_catalog() => {
                info!("empty store, seeding starter catalog");
                (Self::with_starter_catalog(), true)
            }
            None => (Self::new(), false),
        };

        let mut board = board.with_occupied_cell(config.occupied_cell());
        if config.teacher_conflicts() {
            board = board.with_policy(Box::new(TeacherConflictPolicy));
        }
        board.store = Some(store);
        if changed {
            board.persist();
        }
        Ok(board)
    }

    pub fn with_occupied_cell(mut self, occupied_cell: OccupiedCell) -> Self {
        self.occupied_cell = occupied_cell;
        self
    }

    pub fn with_policy(mut self, policy: Box<dyn PlacementPolicy>) -> Self {
        debug!(policy = policy.name(), "placement policy enabled");
        self.policies.push(policy);
        self
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            units: self.registry.iter().cloned().collect(),
            placements: self.grid.placements(),
        }
    }

    // ── Queries ────────────────────────────────────────────────────

    pub fn list_units(&self) -> impl Iterator<Item = &Unit> {
        self.registry.iter()
    }

    pub fn unit(&self, id: &str) -> Option<&Unit> {
        self.registry.get(id)
    }

    pub fn list_placements(&self) -> Vec<Placement> {
        self.grid.placements()
    }

    /// One year's placements in day/block order.
    pub fn year_layout(&self, year_group: YearGroup) -> Vec<Placement> {
        self.grid.year_layout(year_group)
    }

    pub fn occupant(&self, cell: CellKey) -> Option<&Unit> {
        self.grid.occupant(cell).and_then(|id| self.registry.get(id))
    }

    pub fn used_count(&self, unit_id: &str) -> usize {
        self.grid.used_count(unit_id)
    }

    /// `module_count - used_count`, floored at zero. Unknown units have none.
    pub fn remaining_capacity(&self, unit_id: &str) -> u32 {
        self.registry.get(unit_id).map_or(0, |unit| {
            let used = u32::try_from(self.grid.used_count(unit_id)).unwrap_or(u32::MAX);
            unit.module_count.saturating_sub(used)
        })
    }

    /// Units of `year_group` that can still be placed, in catalog order.
    pub fn tray(&self, year_group: YearGroup) -> Vec<&Unit> {
        self.registry
            .iter()
            .filter(|u| u.year_group == year_group && self.remaining_capacity(&u.id) > 0)
            .collect()
    }

    // ── Unit mutations ─────────────────────────────────────────────

    pub fn create_unit(&mut self, data: NewUnit) -> UnitId {
        let id = self.registry.create(data);
        self.persist();
        id
    }

    /// Patch a unit.
    ///
    /// Lowering `module_count` below the unit's current usage, or changing
    /// `year_group` while it has placements, is rejected.
    pub fn update_unit(&mut self, id: &str, patch: &UnitPatch) -> Outcome {
        let mut registry = self.registry.clone();
        let updated = registry.update(id, patch)?;

        let used = self.grid.used_count(id);
        if (updated.module_count as usize) < used {
            return Err(Rejection::CapacityBelowUsage {
                unit: id.to_string(),
                module_count: updated.module_count,
                used,
            });
        }
        let previous_year = self.registry.get(id).map(|u| u.year_group);
        if used > 0 && previous_year != Some(updated.year_group) {
            return Err(Rejection::YearChangeWhilePlaced {
                unit: id.to_string(),
                used,
            });
        }

        let touched = self.grid.cells_of(id);
        self.check_policies(&registry, &self.grid, &touched)?;
        self.registry = registry;
        self.persist();
        Ok(())
    }

    /// Delete a unit and every placement referencing it. Returns how many
    /// placements went with it.
    pub fn delete_unit(&mut self, id: &str) -> Outcome<usize> {
        self.registry.delete(id)?;
        let removed = self.grid.remove_unit(id);
        debug!(unit = id, placements = removed, "unit deleted with placements");
        self.persist();
        Ok(removed)
    }

    // ── Placement mutations ────────────────────────────────────────

    /// Place a unit. Returns the unit evicted from the cell, if any.
    pub fn place(&mut self, unit_id: &str, cell: CellKey) -> Outcome<Option<UnitId>> {
        let mut grid = self.grid.clone();
        let evicted = grid.place(&self.registry, unit_id, cell, self.occupied_cell)?;
        self.check_policies(&self.registry, &grid, &[cell])?;
        self.grid = grid;
        self.persist();
        Ok(evicted)
    }

    /// Move within one year's grid; an occupied destination swaps.
    pub fn move_unit(&mut self, year_group: YearGroup, from: Slot, to: Slot) -> Outcome<MoveKind> {
        let mut grid = self.grid.clone();
        let kind = grid.move_unit(year_group, from, to)?;
        if kind == MoveKind::Unchanged {
            return Ok(kind);
        }
        let touched = [from.in_year(year_group), to.in_year(year_group)];
        self.check_policies(&self.registry, &grid, &touched)?;
        self.grid = grid;
        self.persist();
        Ok(kind)
    }

    /// Move between two full cell keys, refusing to cross year groups.
    pub fn move_between(&mut self, from: CellKey, to: CellKey) -> Outcome<MoveKind> {
        if from.year_group != to.year_group {
            return Err(Rejection::CrossYearMove {
                from: from.year_group,
                to: to.year_group,
            });
        }
        self.move_unit(from.year_group, from.slot(), to.slot())
    }

    /// Empty a cell. Never fails; returns the former occupant.
    pub fn remove(&mut self, cell: CellKey) -> Option<UnitId> {
        let removed = self.grid.remove(cell);
        if removed.is_some() {
            self.persist();
        }
        removed
    }

    /// Clear every placement, keeping the units.
    pub fn reset_placements(&mut self) {
        let cleared = self.grid.len();
        self.grid.clear();
        info!(cleared, "placements reset");
        self.persist();
    }

    fn check_policies(&self, registry: &Registry, grid: &Grid, touched: &[CellKey]) -> Outcome {
        for policy in &self.policies {
            if let Err(rejection) = policy.check(registry, grid, touched) {
                debug!(policy = policy.name(), %rejection, "policy vetoed operation");
                return Err(rejection);
            }
        }
        Ok(())
    }

    fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.save_board(&self.snapshot()) {
            warn!(error = %e, "failed to persist board; keeping in-memory state");
        }
    }
}
