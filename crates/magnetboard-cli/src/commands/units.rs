use magnetboard_core::{NewUnit, Unit, UnitPatch, YearGroup};
use magnetboard_placement::Board;

use super::{Context, rejected};

fn describe(board: &Board, unit: &Unit) -> String {
    let mut line = format!(
        "{:<24} {} {} ({})",
        unit.id,
        unit.year_group,
        unit.display_name(),
        unit.primary_role.abbreviation()
    );
    if let (Some(teacher), Some(role)) = (&unit.secondary_teacher, unit.secondary_role) {
        line.push_str(&format!(" / {teacher} ({})", role.abbreviation()));
    }
    line.push_str(&format!(
        "  {}/{} left",
        board.remaining_capacity(&unit.id),
        unit.module_count
    ));
    line
}

pub fn list(ctx: &Context, year: Option<YearGroup>, format: &str) -> anyhow::Result<()> {
    let board = ctx.open_board()?;
    let units: Vec<&Unit> = board
        .list_units()
        .filter(|u| year.is_none_or(|y| u.year_group == y))
        .collect();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&units)?),
        _ => {
            for unit in units {
                println!("{}", describe(&board, unit));
            }
        }
    }
    Ok(())
}

pub fn add(ctx: &Context, data: NewUnit) -> anyhow::Result<()> {
    let mut board = ctx.open_board()?;
    let id = board.create_unit(data);
    println!("✓ Created {id}");
    Ok(())
}

pub fn edit(ctx: &Context, id: &str, patch: UnitPatch) -> anyhow::Result<()> {
    let mut board = ctx.open_board()?;
    board.update_unit(id, &patch).map_err(rejected)?;
    if let Some(unit) = board.unit(id) {
        println!("✓ {}", describe(&board, unit));
    }
    Ok(())
}

pub fn delete(ctx: &Context, id: &str) -> anyhow::Result<()> {
    let mut board = ctx.open_board()?;
    let removed = board.delete_unit(id).map_err(rejected)?;
    println!("✓ Deleted {id} ({removed} placement(s) removed)");
    Ok(())
}
