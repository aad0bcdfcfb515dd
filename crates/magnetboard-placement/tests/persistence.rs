//! Board ↔ store round trips, including legacy snapshots.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use magnetboard_core::{
    BoardConfig, CellKey, Day, NewUnit, OccupiedCell, PrimaryRole, SecondaryRole, Slot,
    TimeBlock, UnitPatch, YearGroup,
};
use magnetboard_placement::{Board, MoveKind, Rejection};
use magnetboard_state::StateStore;
use magnetboard_state::tables::board_key;
use redb::StorageBackend;
use redb::backends::InMemoryBackend;

fn year(n: u8) -> YearGroup {
    YearGroup::new(n).unwrap()
}

fn config(toml_str: &str) -> BoardConfig {
    toml::from_str(toml_str).unwrap()
}

#[test]
fn board_survives_reopen_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.redb");
    let cell = CellKey::new(year(2), Day::Wednesday, TimeBlock::Third);

    let id = {
        let store = StateStore::open(&path).unwrap();
        let mut board = Board::open(store, &config("[seed]\nstarter_catalog = false\n")).unwrap();
        let id = board.create_unit(NewUnit {
            subject: "Química".to_string(),
            primary_teacher: "Marta Sosa".to_string(),
            primary_role: PrimaryRole::Provisional,
            secondary_teacher: Some("Jane".to_string()),
            module_count: 2,
            year_group: year(2),
            color: Some("#8B5CF6".to_string()),
        });
        board.place(&id, cell).unwrap();
        id
    };

    let store = StateStore::open(&path).unwrap();
    let board = Board::open(store, &BoardConfig::default()).unwrap();
    let unit = board.unit(&id).unwrap();
    assert_eq!(unit.subject, "Química");
    assert_eq!(unit.secondary_role, Some(SecondaryRole::Suplente));
    assert_eq!(board.occupant(cell).unwrap().id, id);
    assert_eq!(board.remaining_capacity(&id), 1);
    // Non-empty store: no starter units were added.
    assert_eq!(board.list_units().count(), 1);
}

#[test]
fn legacy_single_grid_store_opens_on_year_three() {
    let store = StateStore::open_in_memory().unwrap();
    let legacy = serde_json::json!({
        "units": [
            { "id": "hist-lago", "subject": "Historia", "teacher": "Luciano Lago",
              "role": "tit", "module_count": 2, "color": "#F59E0B" },
            { "id": "leng-perez", "subject": "Lengua", "teacher": "Sofía Pérez",
              "role": "sup", "module_count": 2 }
        ],
        "placements": [
            { "unit_id": "hist-lago", "day": "monday", "block": "first" },
            { "unit_id": "leng-perez", "day": "monday", "block": "second" }
        ]
    });
    store
        .put_raw(&board_key(1), &serde_json::to_vec(&legacy).unwrap())
        .unwrap();

    let mut board = Board::open(store.clone(), &BoardConfig::default()).unwrap();
    assert_eq!(board.list_units().count(), 2);
    assert_eq!(board.unit("leng-perez").unwrap().primary_role, PrimaryRole::Provisional);
    assert_eq!(board.year_layout(year(3)).len(), 2);

    let mon1 = Slot::new(Day::Monday, TimeBlock::First);
    let mon2 = Slot::new(Day::Monday, TimeBlock::Second);
    assert_eq!(board.move_unit(year(3), mon1, mon2).unwrap(), MoveKind::Swapped);

    let stored = store.load_board().unwrap().unwrap();
    assert_eq!(stored, board.snapshot());
    assert_eq!(store.stored_version().unwrap(), Some(magnetboard_state::SCHEMA_VERSION));
}

#[test]
fn config_policies_are_applied_on_open() {
    let store = StateStore::open_in_memory().unwrap();
    let mut board = Board::open(
        store,
        &config("[placement]\noccupied_cell = \"reject\"\nteacher_conflicts = true\n"),
    )
    .unwrap();
    assert_eq!(board.list_units().count(), 4);

    let cell = CellKey::new(year(3), Day::Friday, TimeBlock::First);
    board.place("hist-lago", cell).unwrap();
    assert_eq!(
        board.place("mat-garcia", cell).unwrap_err(),
        Rejection::CellOccupied(cell)
    );

    let id = board.create_unit(NewUnit {
        subject: "Historia".to_string(),
        primary_teacher: "LUCIANO LAGO".to_string(),
        primary_role: PrimaryRole::Titular,
        secondary_teacher: None,
        module_count: 1,
        year_group: year(5),
        color: None,
    });
    let err = board
        .place(&id, CellKey::new(year(5), Day::Friday, TimeBlock::First))
        .unwrap_err();
    assert!(matches!(err, Rejection::TeacherConflict { .. }));
}

#[test]
fn default_config_overwrites() {
    let store = StateStore::open_in_memory().unwrap();
    let mut board = Board::open(store, &BoardConfig::default()).unwrap();
    let cell = CellKey::new(year(3), Day::Friday, TimeBlock::First);
    board.place("hist-lago", cell).unwrap();
    assert_eq!(board.place("mat-garcia", cell).unwrap().as_deref(), Some("hist-lago"));
}

#[test]
fn teacher_rename_into_conflict_is_rejected() {
    let mut board = Board::with_starter_catalog()
        .with_occupied_cell(OccupiedCell::Overwrite)
        .with_policy(Box::new(magnetboard_placement::TeacherConflictPolicy));
    let other = board.create_unit(NewUnit {
        subject: "Física".to_string(),
        primary_teacher: "Pablo Díaz".to_string(),
        primary_role: PrimaryRole::Titular,
        secondary_teacher: None,
        module_count: 1,
        year_group: year(4),
        color: None,
    });
    board
        .place("geo-ruiz", CellKey::new(year(3), Day::Tuesday, TimeBlock::Fifth))
        .unwrap();
    board
        .place(&other, CellKey::new(year(4), Day::Tuesday, TimeBlock::Fifth))
        .unwrap();

    let rename = UnitPatch {
        secondary_teacher: Some("Marcos Ruiz".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        board.update_unit(&other, &rename),
        Err(Rejection::TeacherConflict { .. })
    ));
    assert_eq!(board.unit(&other).unwrap().secondary_teacher, None);
}

/// In-memory redb backend that starts refusing writes once `failing` is set.
#[derive(Debug, Default)]
struct FailingBackend {
    inner: InMemoryBackend,
    failing: Arc<AtomicBool>,
}

impl FailingBackend {
    fn check(&self) -> io::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(io::Error::other("disk full"));
        }
        Ok(())
    }
}

impl StorageBackend for FailingBackend {
    fn len(&self) -> io::Result<u64> {
        self.inner.len()
    }

    fn read(&self, offset: u64, out: &mut [u8]) -> io::Result<()> {
        self.inner.read(offset, out)
    }

    fn set_len(&self, len: u64) -> io::Result<()> {
        self.check()?;
        self.inner.set_len(len)
    }

    fn sync_data(&self) -> io::Result<()> {
        self.check()?;
        self.inner.sync_data()
    }

    fn write(&self, offset: u64, data: &[u8]) -> io::Result<()> {
        self.check()?;
        self.inner.write(offset, data)
    }
}

#[test]
fn failed_save_keeps_in_memory_state() {
    let backend = FailingBackend::default();
    let failing = backend.failing.clone();
    let store = StateStore::open_with_backend(backend).unwrap();
    let mut board = Board::open(store.clone(), &BoardConfig::default()).unwrap();
    assert_eq!(store.stored_version().unwrap(), Some(magnetboard_state::SCHEMA_VERSION));

    failing.store(true, Ordering::SeqCst);
    let cell = CellKey::new(year(3), Day::Thursday, TimeBlock::Fourth);
    assert_eq!(board.place("mat-garcia", cell).unwrap(), None);

    assert_eq!(board.used_count("mat-garcia"), 1);
    assert_eq!(board.occupant(cell).unwrap().id, "mat-garcia");
    assert_eq!(board.remaining_capacity("mat-garcia"), 2);
    // The store never received the placement.
    assert!(!matches!(
        store.load_board(),
        Ok(Some(stored)) if !stored.placements.is_empty()
    ));

    // Later mutations keep working against the in-memory board.
    let to = Slot::new(Day::Friday, TimeBlock::Fourth);
    assert_eq!(
        board.move_unit(year(3), cell.slot(), to).unwrap(),
        MoveKind::Moved
    );
    assert_eq!(board.occupant(to.in_year(year(3))).unwrap().id, "mat-garcia");
}
