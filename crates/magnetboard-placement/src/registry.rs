//! Unit registry — the catalog of schedulable units.
//!
//! The registry is a leaf: it knows nothing about placements. Cascading a
//! delete into the grid is the board's job.

use tracing::debug;

use magnetboard_core::id::{now_millis, unit_id};
use magnetboard_core::{NewUnit, Unit, UnitId, UnitPatch};

use crate::rejection::{Outcome, Rejection};

/// Ordered unit catalog. Iteration follows creation order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    units: Vec<Unit>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored units. Later duplicates of an id are dropped, and
    /// each unit's secondary role is re-derived.
    pub fn from_units(units: impl IntoIterator<Item = Unit>) -> Self {
        let mut registry = Self::new();
        for mut unit in units {
            if registry.contains(&unit.id) {
                debug!(id = %unit.id, "duplicate unit id dropped");
                continue;
            }
            unit.normalize_secondary();
            registry.units.push(unit);
        }
        registry
    }

    pub fn get(&self, id: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Add a unit, salting its id with the current time.
    pub fn create(&mut self, data: NewUnit) -> UnitId {
        self.create_with_salt(data, now_millis())
    }

    /// Add a unit with id `{slug(subject)}-{salt}`. If that id is taken the
    /// salt is bumped until it is free.
    pub fn create_with_salt(&mut self, data: NewUnit, salt: u128) -> UnitId {
        let mut salt = salt;
        let mut id = unit_id(&data.subject, salt);
        while self.contains(&id) {
            salt = salt.wrapping_add(1);
            id = unit_id(&data.subject, salt);
        }
        self.units.push(data.into_unit(id.clone()));
        debug!(%id, "unit created");
        id
    }

    /// Merge `patch` into the unit. The secondary role follows the merged
    /// secondary teacher.
    pub fn update(&mut self, id: &str, patch: &UnitPatch) -> Outcome<&Unit> {
        let unit = self
            .units
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| Rejection::UnitNotFound(id.to_string()))?;
        *unit = patch.applied_to(unit);
        debug!(%id, "unit updated");
        Ok(&*unit)
    }

    /// Remove a unit and return it.
    pub fn delete(&mut self, id: &str) -> Outcome<Unit> {
        let index = self
            .units
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| Rejection::UnitNotFound(id.to_string()))?;
        debug!(%id, "unit deleted");
        Ok(self.units.remove(index))
    }
}
