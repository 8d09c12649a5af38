//! Save/load integration tests.

use chrono::{NaiveDate, NaiveDateTime};
use waitlist_core::store::Collection;
use waitlist_core::table::COLUMNS;
use waitlist_core::{
    Intake, PatientRecord, SlotGrant, Specialty, TimeSlot, Waitlist, WaitlistError,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn stamp(day: NaiveDate, hour: u32) -> NaiveDateTime {
    day.and_hms_opt(hour, 45, 0).unwrap()
}

fn populated_store() -> Waitlist {
    let mut store = Waitlist::new();

    let mut first = Intake::new(
        "Otávio Ramos",
        date(2024, 2, 10),
        Specialty::GlobalPosturalReeducation,
    );
    first.membership_id = "8812-3".into();
    first.phone = "(31) 3222-1100".into();
    first.preferred_time_slot = TimeSlot::Morning;
    first.professional_preference = Some("Dra. Beatriz".into());
    let first = store.add_to_waiting(first, "user1", stamp(date(2024, 2, 10), 8)).unwrap();

    let mut second = Intake::new(
        "Paula \"Pepa\" Nunes",
        date(2024, 3, 1),
        Specialty::TemporomandibularDysfunction,
    );
    second.phone = "(31) 9 9000-0000".into();
    store.add_to_waiting(second, "user1", stamp(date(2024, 3, 1), 14)).unwrap();

    store
        .grant_slot(
            first,
            SlotGrant::new("Dra. Beatriz", "Seg/Qua 07:30", date(2024, 3, 18)),
            "admin",
            stamp(date(2024, 3, 11), 16),
        )
        .unwrap();

    store
}

fn records(store: &Waitlist, collection: Collection) -> Vec<PatientRecord> {
    store.records(collection).cloned().collect()
}

#[test]
fn test_save_then_load_reproduces_records() {
    let tmp = tempfile::tempdir().unwrap();
    let waiting_path = tmp.path().join("data_espera.csv");
    let served_path = tmp.path().join("data_atendidos.csv");

    let store = populated_store();
    store.save(&waiting_path, &served_path, date(2024, 3, 20)).unwrap();

    let loaded = Waitlist::load(&waiting_path, &served_path).unwrap();
    assert_eq!(records(&loaded, Collection::Waiting), records(&store, Collection::Waiting));
    assert_eq!(records(&loaded, Collection::Served), records(&store, Collection::Served));
}

#[test]
fn test_days_waited_recomputed_after_load() {
    let tmp = tempfile::tempdir().unwrap();
    let waiting_path = tmp.path().join("data_espera.csv");
    let served_path = tmp.path().join("data_atendidos.csv");

    // Snapshot written on 2024-03-05: 4 days for the waiting patient
    populated_store()
        .save(&waiting_path, &served_path, date(2024, 3, 5))
        .unwrap();
    let written = std::fs::read_to_string(&waiting_path).unwrap();
    assert!(written.contains(",2024-03-01,4,"));

    let loaded = Waitlist::load(&waiting_path, &served_path).unwrap();
    let rows = loaded.rows(Collection::Waiting, date(2024, 4, 5));
    assert_eq!(rows[0].days_waited, 35);
}

#[test]
fn test_load_absent_files_gives_empty_store() {
    let tmp = tempfile::tempdir().unwrap();
    let store = Waitlist::load(&tmp.path().join("a.csv"), &tmp.path().join("b.csv")).unwrap();

    assert!(store.waiting().is_empty());
    assert!(store.served().is_empty());
}

#[test]
fn test_empty_store_saves_full_header() {
    let tmp = tempfile::tempdir().unwrap();
    let waiting_path = tmp.path().join("nested").join("data_espera.csv");
    let served_path = tmp.path().join("nested").join("data_atendidos.csv");

    Waitlist::new()
        .save(&waiting_path, &served_path, date(2024, 3, 5))
        .unwrap();

    for path in [&waiting_path, &served_path] {
        let content = std::fs::read_to_string(path).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(header.split(',').collect::<Vec<_>>(), COLUMNS.to_vec());
    }
}

#[test]
fn test_in_memory_round_trip() {
    let store = populated_store();
    let mut waiting = Vec::new();
    let mut served = Vec::new();
    store.write_to(&mut waiting, &mut served, date(2024, 3, 20)).unwrap();

    let loaded = Waitlist::read_from(waiting.as_slice(), served.as_slice()).unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded.waiting()[0].record.name, "Paula \"Pepa\" Nunes");
    assert_eq!(
        loaded.served()[0].record.grant().unwrap().assigned_time_slot,
        "Seg/Qua 07:30"
    );
}

#[test]
fn test_files_swapped_are_rejected() {
    let store = populated_store();
    let mut waiting = Vec::new();
    let mut served = Vec::new();
    store.write_to(&mut waiting, &mut served, date(2024, 3, 20)).unwrap();

    let err = Waitlist::read_from(served.as_slice(), waiting.as_slice()).unwrap_err();
    assert!(matches!(err, WaitlistError::Validation(_)));
}

#[test]
fn test_unreadable_row_surfaces_error() {
    let tmp = tempfile::tempdir().unwrap();
    let waiting_path = tmp.path().join("data_espera.csv");
    std::fs::write(
        &waiting_path,
        format!(
            "{}\nRui,1,2024-01-01,0,Quiropraxia,5,Manhã,Não,,user1,02/01/2024 10:00,Não,,,\n",
            COLUMNS.join(",")
        ),
    )
    .unwrap();

    let err = Waitlist::load(&waiting_path, &tmp.path().join("b.csv")).unwrap_err();
    assert!(matches!(err, WaitlistError::Table(_)));
}

#[test]
fn test_round_trip_with_seconds_in_stamps() {
    let tmp = tempfile::tempdir().unwrap();
    let waiting_path = tmp.path().join("data_espera.csv");
    let served_path = tmp.path().join("data_atendidos.csv");

    let mut store = Waitlist::new();
    let registered_at = date(2024, 1, 1).and_hms_opt(9, 0, 37).unwrap();
    let id = store
        .add_to_waiting(
            Intake::new("Sara Melo", date(2024, 1, 1), Specialty::Psychology),
            "user1",
            registered_at,
        )
        .unwrap();
    store
        .add_to_waiting(
            Intake::new("Tiago Melo", date(2024, 1, 2), Specialty::Psychology),
            "user1",
            date(2024, 1, 2).and_hms_nano_opt(17, 59, 59, 999_000_000).unwrap(),
        )
        .unwrap();
    store
        .grant_slot(
            id,
            SlotGrant::new("Dra. Lia", "Sex 11:00", date(2024, 1, 19)),
            "admin",
            date(2024, 1, 8).and_hms_opt(12, 30, 12).unwrap(),
        )
        .unwrap();

    store.save(&waiting_path, &served_path, date(2024, 1, 10)).unwrap();
    let loaded = Waitlist::load(&waiting_path, &served_path).unwrap();

    assert_eq!(records(&loaded, Collection::Waiting), records(&store, Collection::Waiting));
    assert_eq!(records(&loaded, Collection::Served), records(&store, Collection::Served));
    assert_eq!(
        loaded.served()[0].record.registered_at,
        date(2024, 1, 8).and_hms_opt(12, 30, 0).unwrap()
    );
}

#[test]
fn test_failed_save_keeps_granted_record_on_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let waiting_path = tmp.path().join("data_espera.csv");
    let served_path = tmp.path().join("data_atendidos.csv");

    let mut store = Waitlist::new();
    let id = store
        .add_to_waiting(
            Intake::new("Vera Dias", date(2024, 5, 2), Specialty::Acupuncture),
            "user1",
            stamp(date(2024, 5, 2), 10),
        )
        .unwrap();
    store.save(&waiting_path, &served_path, date(2024, 5, 2)).unwrap();

    store
        .grant_slot(
            id,
            SlotGrant::new("Dr. Caio", "Ter 10:00", date(2024, 5, 14)),
            "admin",
            stamp(date(2024, 5, 9), 15),
        )
        .unwrap();

    // A directory where the served file belongs makes its replacement fail
    std::fs::remove_file(&served_path).unwrap();
    std::fs::create_dir(&served_path).unwrap();

    let err = store.save(&waiting_path, &served_path, date(2024, 5, 9)).unwrap_err();
    assert!(matches!(err, WaitlistError::Table(_)));

    // No temporary files left behind
    let entries = std::fs::read_dir(tmp.path()).unwrap().count();
    assert_eq!(entries, 2);

    std::fs::remove_dir(&served_path).unwrap();
    let loaded = Waitlist::load(&waiting_path, &served_path).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.waiting()[0].record.name, "Vera Dias");
}

#[test]
fn test_save_replaces_previous_contents() {
    let tmp = tempfile::tempdir().unwrap();
    let waiting_path = tmp.path().join("data_espera.csv");
    let served_path = tmp.path().join("data_atendidos.csv");

    populated_store().save(&waiting_path, &served_path, date(2024, 3, 20)).unwrap();
    Waitlist::new().save(&waiting_path, &served_path, date(2024, 3, 21)).unwrap();

    let loaded = Waitlist::load(&waiting_path, &served_path).unwrap();
    assert!(loaded.is_empty());
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 2);
}
