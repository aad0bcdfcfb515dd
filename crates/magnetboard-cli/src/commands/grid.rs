use magnetboard_core::{CellKey, Day, Slot, TimeBlock, YearGroup};
use magnetboard_placement::{Board, MoveKind};

use super::{Context, rejected};

const CELL_WIDTH: usize = 18;

pub fn place(
    ctx: &Context,
    unit: &str,
    year: YearGroup,
    day: Day,
    block: TimeBlock,
) -> anyhow::Result<()> {
    let mut board = ctx.open_board()?;
    let cell = CellKey::new(year, day, block);
    let evicted = board.place(unit, cell).map_err(rejected)?;
    match evicted {
        Some(previous) => println!("✓ Placed {unit} at {cell} (replaced {previous})"),
        None => println!("✓ Placed {unit} at {cell}"),
    }
    Ok(())
}

pub fn move_unit(
    ctx: &Context,
    from_year: YearGroup,
    from: (Day, TimeBlock),
    to_year: YearGroup,
    to: (Day, TimeBlock),
) -> anyhow::Result<()> {
    let mut board = ctx.open_board()?;
    let source = CellKey::new(from_year, from.0, from.1);
    let destination = CellKey::new(to_year, to.0, to.1);
    let kind = board.move_between(source, destination).map_err(rejected)?;
    match kind {
        MoveKind::Unchanged => println!("✓ Nothing to do"),
        MoveKind::Moved => println!("✓ Moved {source} → {destination}"),
        MoveKind::Swapped => println!("✓ Swapped {source} ↔ {destination}"),
    }
    Ok(())
}

pub fn remove(ctx: &Context, year: YearGroup, day: Day, block: TimeBlock) -> anyhow::Result<()> {
    let mut board = ctx.open_board()?;
    let cell = CellKey::new(year, day, block);
    match board.remove(cell) {
        Some(unit) => println!("✓ Removed {unit} from {cell}"),
        None => println!("✓ {cell} was already empty"),
    }
    Ok(())
}

pub fn reset(ctx: &Context) -> anyhow::Result<()> {
    let mut board = ctx.open_board()?;
    board.reset_placements();
    println!("✓ All placements cleared");
    Ok(())
}

pub fn show(ctx: &Context, year: YearGroup) -> anyhow::Result<()> {
    let board = ctx.open_board()?;
    print!("{}", render(&board, year));
    Ok(())
}

pub fn tray(ctx: &Context, year: YearGroup) -> anyhow::Result<()> {
    let board = ctx.open_board()?;
    for unit in board.tray(year) {
        println!(
            "{:<24} {}  {} left",
            unit.id,
            unit.display_name(),
            board.remaining_capacity(&unit.id)
        );
    }
    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
        short.push('…');
        short
    }
}

/// Plain-text table: one row per block, one column per day.
fn render(board: &Board, year: YearGroup) -> String {
    let mut out = format!("{year}\n{:<14}", "Bloque");
    for day in Day::ALL {
        out.push_str(&format!("{:<CELL_WIDTH$}", day.label()));
    }
    out.push('\n');

    for block in TimeBlock::ALL {
        out.push_str(&format!("{:<14}", block.label()));
        for day in Day::ALL {
            let label = board
                .occupant(Slot::new(day, block).in_year(year))
                .map(|u| truncate(&u.subject, CELL_WIDTH - 2))
                .unwrap_or_else(|| "·".to_string());
            out.push_str(&format!("{label:<CELL_WIDTH$}"));
        }
        out.push('\n');
    }
    out
}
