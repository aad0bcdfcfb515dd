//! Shared types used across Magnetboard crates.
//!
//! A [`Unit`] (a "magnet") is a subject/teacher pairing with a capacity of
//! `module_count` grid slots. A [`Placement`] pins one unit to one
//! [`CellKey`], which is the `(year_group, day, block)` triple of a weekly
//! grid.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Unique identifier for a unit.
pub type UnitId = String;

// ── Grid axes ─────────────────────────────────────────────────────

/// School day. Declaration order is the column order of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    /// Short label as printed on the board header.
    pub fn label(self) -> &'static str {
        match self {
            Day::Monday => "Lun",
            Day::Tuesday => "Mar",
            Day::Wednesday => "Mié",
            Day::Thursday => "Jue",
            Day::Friday => "Vie",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Day {
    type Err = ParseAxisError;

    /// Accepts the board label (`Lun`, `Mié`, `mie`), the English name, or
    /// the 1-based column number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let day = match lowered.as_str() {
            "lun" | "lunes" | "mon" | "monday" | "1" => Day::Monday,
            "mar" | "martes" | "tue" | "tuesday" | "2" => Day::Tuesday,
            "mié" | "mie" | "miércoles" | "miercoles" | "wed" | "wednesday" | "3" => {
                Day::Wednesday
            }
            "jue" | "jueves" | "thu" | "thursday" | "4" => Day::Thursday,
            "vie" | "viernes" | "fri" | "friday" | "5" => Day::Friday,
            _ => return Err(ParseAxisError::new("day", s)),
        };
        Ok(day)
    }
}

/// Time range of a grid row. Declaration order is the row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBlock {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
}

impl TimeBlock {
    pub const ALL: [TimeBlock; 6] = [
        TimeBlock::First,
        TimeBlock::Second,
        TimeBlock::Third,
        TimeBlock::Fourth,
        TimeBlock::Fifth,
        TimeBlock::Sixth,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimeBlock::First => "7:20 a 8:20",
            TimeBlock::Second => "8:30 a 9:30",
            TimeBlock::Third => "9:40 a 10:40",
            TimeBlock::Fourth => "10:50 a 11:50",
            TimeBlock::Fifth => "12:00 a 13:00",
            TimeBlock::Sixth => "13:00 a 14:00",
        }
    }
}

impl fmt::Display for TimeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeBlock {
    type Err = ParseAxisError;

    /// Accepts the 1-based row number, the full label, or its start time
    /// (`"9:40"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<usize>() {
            return n
                .checked_sub(1)
                .and_then(|i| TimeBlock::ALL.get(i).copied())
                .ok_or_else(|| ParseAxisError::new("time block", s));
        }
        TimeBlock::ALL
            .into_iter()
            .find(|b| {
                let label = b.label();
                label == trimmed || label.split(' ').next() == Some(trimmed)
            })
            .ok_or_else(|| ParseAxisError::new("time block", s))
    }
}

/// Year group (1° to 6°). Each year has its own grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct YearGroup(u8);

impl YearGroup {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    pub fn new(year: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&year).then_some(Self(year))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = YearGroup> {
        (Self::MIN..=Self::MAX).map(YearGroup)
    }
}

impl TryFrom<u8> for YearGroup {
    type Error = ParseAxisError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        YearGroup::new(value).ok_or_else(|| ParseAxisError::new("year group", value))
    }
}

impl From<YearGroup> for u8 {
    fn from(year: YearGroup) -> u8 {
        year.0
    }
}

impl fmt::Display for YearGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

impl FromStr for YearGroup {
    type Err = ParseAxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_end_matches('°');
        digits
            .parse::<u8>()
            .ok()
            .and_then(YearGroup::new)
            .ok_or_else(|| ParseAxisError::new("year group", s))
    }
}

/// A day/block value could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAxisError {
    pub axis: &'static str,
    pub input: String,
}

impl ParseAxisError {
    fn new(axis: &'static str, input: impl ToString) -> Self {
        Self {
            axis,
            input: input.to_string(),
        }
    }
}

impl fmt::Display for ParseAxisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {:?}", self.axis, self.input)
    }
}

impl std::error::Error for ParseAxisError {}

// ── Cells ─────────────────────────────────────────────────────────

/// A `(day, block)` position inside one year's grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub day: Day,
    pub block: TimeBlock,
}

impl Slot {
    pub fn new(day: Day, block: TimeBlock) -> Self {
        Self { day, block }
    }

    pub fn in_year(self, year_group: YearGroup) -> CellKey {
        CellKey {
            year_group,
            day: self.day,
            block: self.block,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day, self.block)
    }
}

/// A grid cell, the unit of occupancy. Orders by year, then day, then block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellKey {
    pub year_group: YearGroup,
    pub day: Day,
    pub block: TimeBlock,
}

impl CellKey {
    pub fn new(year_group: YearGroup, day: Day, block: TimeBlock) -> Self {
        Self {
            year_group,
            day,
            block,
        }
    }

    pub fn slot(self) -> Slot {
        Slot::new(self.day, self.block)
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.year_group, self.day, self.block)
    }
}

// ── Units ─────────────────────────────────────────────────────────

/// Staffing status of a unit's primary teacher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryRole {
    Titular,
    Provisional,
}

impl PrimaryRole {
    pub fn abbreviation(self) -> &'static str {
        match self {
            PrimaryRole::Titular => "Tit",
            PrimaryRole::Provisional => "Prov",
        }
    }
}

impl FromStr for PrimaryRole {
    type Err = ParseAxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tit" | "titular" => Ok(PrimaryRole::Titular),
            "prov" | "provisional" => Ok(PrimaryRole::Provisional),
            _ => Err(ParseAxisError::new("primary role", s)),
        }
    }
}

/// Staffing status of a unit's secondary teacher. A secondary teacher is
/// always a substitute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryRole {
    Suplente,
}

impl SecondaryRole {
    pub fn abbreviation(self) -> &'static str {
        "Sup"
    }
}

/// A schedulable unit ("magnet").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub subject: String,
    pub primary_teacher: String,
    pub primary_role: PrimaryRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_teacher: Option<String>,
    /// `Some(Suplente)` exactly when `secondary_teacher` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_role: Option<SecondaryRole>,
    /// Maximum number of simultaneous placements across all grids.
    pub module_count: u32,
    pub year_group: YearGroup,
    /// Display hint only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Unit {
    /// "Historia – Luciano Lago"
    pub fn display_name(&self) -> String {
        format!("{} – {}", self.subject, self.primary_teacher)
    }

    /// Primary and (if any) secondary teacher names.
    pub fn teachers(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary_teacher.as_str()).chain(self.secondary_teacher.as_deref())
    }

    /// Re-derive `secondary_role` from `secondary_teacher`, dropping a
    /// blank secondary teacher.
    pub fn normalize_secondary(&mut self) {
        let teacher = self
            .secondary_teacher
            .take()
            .filter(|t| !t.trim().is_empty());
        self.secondary_role = teacher.as_ref().map(|_| SecondaryRole::Suplente);
        self.secondary_teacher = teacher;
    }
}

/// Input for creating a unit: every field except the id. The secondary
/// role is derived, never supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUnit {
    pub subject: String,
    pub primary_teacher: String,
    pub primary_role: PrimaryRole,
    #[serde(default)]
    pub secondary_teacher: Option<String>,
    pub module_count: u32,
    pub year_group: YearGroup,
    #[serde(default)]
    pub color: Option<String>,
}

impl NewUnit {
    pub fn into_unit(self, id: UnitId) -> Unit {
        let mut unit = Unit {
            id,
            subject: self.subject,
            primary_teacher: self.primary_teacher,
            primary_role: self.primary_role,
            secondary_teacher: self.secondary_teacher,
            secondary_role: None,
            module_count: self.module_count,
            year_group: self.year_group,
            color: self.color,
        };
        unit.normalize_secondary();
        unit
    }
}

/// Partial update for a unit. `None` leaves a field as is.
///
/// `secondary_teacher: Some("")` and `color: Some("")` clear the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPatch {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub primary_teacher: Option<String>,
    #[serde(default)]
    pub primary_role: Option<PrimaryRole>,
    #[serde(default)]
    pub secondary_teacher: Option<String>,
    #[serde(default)]
    pub module_count: Option<u32>,
    #[serde(default)]
    pub year_group: Option<YearGroup>,
    #[serde(default)]
    pub color: Option<String>,
}

impl UnitPatch {
    pub fn is_empty(&self) -> bool {
        *self == UnitPatch::default()
    }

    /// Merge into a copy of `unit` and return it. The id never changes.
    pub fn applied_to(&self, unit: &Unit) -> Unit {
        let mut next = unit.clone();
        if let Some(subject) = &self.subject {
            next.subject = subject.clone();
        }
        if let Some(teacher) = &self.primary_teacher {
            next.primary_teacher = teacher.clone();
        }
        if let Some(role) = self.primary_role {
            next.primary_role = role;
        }
        if let Some(teacher) = &self.secondary_teacher {
            next.secondary_teacher = Some(teacher.clone());
        }
        if let Some(count) = self.module_count {
            next.module_count = count;
        }
        if let Some(year) = self.year_group {
            next.year_group = year;
        }
        if let Some(color) = &self.color {
            next.color = (!color.trim().is_empty()).then(|| color.clone());
        }
        next.normalize_secondary();
        next
    }
}

/// One unit pinned to one grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub unit_id: UnitId,
    pub year_group: YearGroup,
    pub day: Day,
    pub block: TimeBlock,
}

impl Placement {
    pub fn cell(&self) -> CellKey {
        CellKey::new(self.year_group, self.day, self.block)
    }
}
