use chrono::NaiveDate;
use gymlog::{Database, WorkoutStore};
use tempfile::TempDir;

fn temp_db_path() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("workouts.db");
    (dir, path)
}

#[test]
fn entries_survive_reopen() {
    let (_dir, path) = temp_db_path();
    let day = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();

    {
        let store = WorkoutStore::new(Database::open(&path).unwrap());
        let outcome = store
            .record_on(11, "Жим лежа 3х8 75кг\nsquat 4x10 90kg\nnot a workout!", day)
            .unwrap();
        assert!(outcome.ok);
        assert_eq!(outcome.saved, 2);
    }

    let store = WorkoutStore::new(Database::open(&path).unwrap());
    let entries = store.database().entries_for_user(11).unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.date == day));

    let report = store.stats(11).unwrap();
    assert_eq!(
        report,
        "📊 Statistics (top 5):\n\
         • Squat: 360 kg total • max 90.0 kg • 1 times\n\
         • Жим Лежа: 225 kg total • max 75.0 kg • 1 times"
    );
}

#[test]
fn two_stores_share_one_file() {
    let (_dir, path) = temp_db_path();
    let day = NaiveDate::from_ymd_opt(2024, 9, 3).unwrap();

    let first = WorkoutStore::new(Database::open(&path).unwrap());
    let second = WorkoutStore::new(Database::open(&path).unwrap());

    first.record_on(1, "deadlift 1x5 140", day).unwrap();
    second.record_on(2, "bench 3x8 75", day).unwrap();

    assert!(second.stats(1).unwrap().contains("Deadlift: 140 kg total"));
    assert!(first.stats(2).unwrap().contains("Bench: 225 kg total"));
}

#[test]
fn stats_for_unknown_user() {
    let (_dir, path) = temp_db_path();
    let store = WorkoutStore::new(Database::open(&path).unwrap());
    assert_eq!(store.stats(999).unwrap(), "No records yet. Add a workout!");
}
