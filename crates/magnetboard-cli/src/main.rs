use std::path::PathBuf;

use clap::{Parser, Subcommand};

use magnetboard_core::{Day, PrimaryRole, TimeBlock, YearGroup};

mod commands;

#[derive(Parser)]
#[command(
    name = "magnetboard",
    about = "Magnetboard — weekly class grids built from magnets",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Config file (default: ./magnetboard.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Store file, overriding [store].path from the config
    #[arg(short, long, global = true)]
    store: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List units with their remaining capacity
    Units {
        /// Only units of this year group
        #[arg(short, long)]
        year: Option<YearGroup>,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Create a unit
    Add {
        subject: String,
        #[arg(short, long)]
        teacher: String,
        /// tit | prov
        #[arg(short, long, default_value = "tit")]
        role: PrimaryRole,
        /// Substitute teacher
        #[arg(long)]
        secondary: Option<String>,
        #[arg(short, long)]
        modules: u32,
        #[arg(short, long)]
        year: YearGroup,
        #[arg(long)]
        color: Option<String>,
    },
    /// Patch a unit. Pass an empty --secondary to clear the substitute.
    Edit {
        id: String,
        #[arg(long)]
        subject: Option<String>,
        #[arg(short, long)]
        teacher: Option<String>,
        #[arg(short, long)]
        role: Option<PrimaryRole>,
        #[arg(long)]
        secondary: Option<String>,
        #[arg(short, long)]
        modules: Option<u32>,
        #[arg(short, long)]
        year: Option<YearGroup>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a unit and all of its placements
    Delete { id: String },
    /// Put a unit into a cell
    Place {
        unit: String,
        #[arg(short, long)]
        year: YearGroup,
        #[arg(short, long)]
        day: Day,
        #[arg(short, long)]
        block: TimeBlock,
    },
    /// Move the unit in a cell; an occupied destination swaps
    Move {
        #[arg(short, long)]
        year: YearGroup,
        #[arg(long)]
        from_day: Day,
        #[arg(long)]
        from_block: TimeBlock,
        #[arg(long)]
        to_day: Day,
        #[arg(long)]
        to_block: TimeBlock,
        /// Destination year, when it differs (always rejected)
        #[arg(long)]
        to_year: Option<YearGroup>,
    },
    /// Empty a cell
    Remove {
        #[arg(short, long)]
        year: YearGroup,
        #[arg(short, long)]
        day: Day,
        #[arg(short, long)]
        block: TimeBlock,
    },
    /// Clear every placement, keeping the units
    Reset,
    /// Print one year's grid
    Grid {
        #[arg(short, long)]
        year: YearGroup,
    },
    /// List the units of a year that can still be placed
    Tray {
        #[arg(short, long)]
        year: YearGroup,
    },
    /// Configuration helpers
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a magnetboard.toml with every default spelled out
    Init {
        #[arg(short, long, default_value = "magnetboard.toml")]
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("magnetboard=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = commands::Context::new(cli.config, cli.store);

    match cli.command {
        Commands::Units { year, format } => commands::units::list(&ctx, year, &format),
        Commands::Add {
            subject,
            teacher,
            role,
            secondary,
            modules,
            year,
            color,
        } => commands::units::add(
            &ctx,
            magnetboard_core::NewUnit {
                subject,
                primary_teacher: teacher,
                primary_role: role,
                secondary_teacher: secondary,
                module_count: modules,
                year_group: year,
                color,
            },
        ),
        Commands::Edit {
            id,
            subject,
            teacher,
            role,
            secondary,
            modules,
            year,
            color,
        } => commands::units::edit(
            &ctx,
            &id,
            magnetboard_core::UnitPatch {
                subject,
                primary_teacher: teacher,
                primary_role: role,
                secondary_teacher: secondary,
                module_count: modules,
                year_group: year,
                color,
            },
        ),
        Commands::Delete { id } => commands::units::delete(&ctx, &id),
        Commands::Place {
            unit,
            year,
            day,
            block,
        } => commands::grid::place(&ctx, &unit, year, day, block),
        Commands::Move {
            year,
            from_day,
            from_block,
            to_day,
            to_block,
            to_year,
        } => commands::grid::move_unit(
            &ctx,
            year,
            (from_day, from_block),
            to_year.unwrap_or(year),
            (to_day, to_block),
        ),
        Commands::Remove { year, day, block } => commands::grid::remove(&ctx, year, day, block),
        Commands::Reset => commands::grid::reset(&ctx),
        Commands::Grid { year } => commands::grid::show(&ctx, year),
        Commands::Tray { year } => commands::grid::tray(&ctx, year),
        Commands::Config { action } => match action {
            ConfigAction::Init { path } => commands::config::init(&path),
        },
    }
}
