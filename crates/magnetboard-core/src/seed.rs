//! Starter catalog used to populate an empty board.

use crate::types::{PrimaryRole, Unit, YearGroup};

/// Year the starter units belong to.
pub const STARTER_YEAR: u8 = 3;

fn starter(
    id: &str,
    subject: &str,
    teacher: &str,
    role: PrimaryRole,
    color: &str,
    module_count: u32,
    year_group: YearGroup,
) -> Unit {
    Unit {
        id: id.to_string(),
        subject: subject.to_string(),
        primary_teacher: teacher.to_string(),
        primary_role: role,
        secondary_teacher: None,
        secondary_role: None,
        module_count,
        year_group,
        color: Some(color.to_string()),
    }
}

/// Four year-3 units with fixed ids.
pub fn starter_catalog() -> Vec<Unit> {
    let Some(year) = YearGroup::new(STARTER_YEAR) else {
        return Vec::new();
    };
    vec![
        starter("hist-lago", "Historia", "Luciano Lago", PrimaryRole::Titular, "#F59E0B", 2, year),
        starter("mat-garcia", "Matemática", "Ana García", PrimaryRole::Titular, "#3B82F6", 3, year),
        starter("leng-perez", "Lengua", "Sofía Pérez", PrimaryRole::Provisional, "#10B981", 2, year),
        starter("geo-ruiz", "Geografía", "Marcos Ruiz", PrimaryRole::Provisional, "#EC4899", 1, year),
    ]
}
