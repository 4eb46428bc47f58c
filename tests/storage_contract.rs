// The storage contract, run against both backends.

use movie_catalog::error::StoreError;
use movie_catalog::movie::{Catalog, Movie};
use movie_catalog::storage::{self, BackendKind, MovieStorage, Recovery};
use tempfile::TempDir;

const BACKENDS: [BackendKind; 2] = [BackendKind::Json, BackendKind::Csv];

fn open(dir: &TempDir, kind: BackendKind) -> Box<dyn MovieStorage> {
    let file = match kind {
        BackendKind::Json => "john.json",
        BackendKind::Csv => "john.csv",
    };
    storage::open(kind, dir.path().join(file), Recovery::Strict).unwrap()
}

fn matrix() -> Movie {
    Movie::new("The Matrix", 1999, 8.7, "p1")
}

fn inception() -> Movie {
    Movie::new("Inception", 2010, 8.8, "p2")
}

fn raw(store: &dyn MovieStorage) -> Vec<u8> {
    std::fs::read(store.path()).unwrap_or_default()
}

#[test]
fn test_walkthrough_on_every_backend() {
    for kind in BACKENDS {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir, kind);

        store.add(matrix()).unwrap();
        store.add(inception()).unwrap();
        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 2, "{kind}");
        assert_eq!(listed.get("The Matrix"), Some(&matrix()), "{kind}");
        assert_eq!(listed.get("Inception"), Some(&inception()), "{kind}");

        store.update("The Matrix", 9.0).unwrap();
        let updated = store.list().unwrap();
        assert_eq!(
            updated.get("The Matrix"),
            Some(&Movie::new("The Matrix", 1999, 9.0, "p1")),
            "{kind}"
        );
        assert_eq!(updated.get("Inception"), Some(&inception()), "{kind}");

        store.delete("Inception").unwrap();
        let remaining = store.list().unwrap();
        let titles: Vec<&str> = remaining.titles().collect();
        assert_eq!(titles, vec!["The Matrix"], "{kind}");
    }
}

#[test]
fn test_duplicate_add_leaves_store_unchanged() {
    for kind in BACKENDS {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir, kind);
        store.add(matrix()).unwrap();
        let before = raw(store.as_ref());

        let err = store.add(Movie::new("The Matrix", 2003, 7.2, "p3")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateTitle(ref t) if t == "The Matrix"), "{kind}");
        assert_eq!(raw(store.as_ref()), before, "{kind}");
    }
}

#[test]
fn test_absent_title_is_not_found_and_unchanged() {
    for kind in BACKENDS {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir, kind);
        store.add(matrix()).unwrap();
        let before = raw(store.as_ref());

        assert!(matches!(store.delete("Inception"), Err(StoreError::NotFound(_))), "{kind}");
        assert!(matches!(store.update("Inception", 5.0), Err(StoreError::NotFound(_))), "{kind}");
        assert!(matches!(store.delete("the matrix"), Err(StoreError::NotFound(_))), "{kind}");
        assert_eq!(raw(store.as_ref()), before, "{kind}");
    }
}

#[test]
fn test_invalid_records_are_rejected() {
    for kind in BACKENDS {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir, kind);
        store.add(matrix()).unwrap();
        let before = raw(store.as_ref());

        assert!(matches!(
            store.add(Movie::new("Too Good", 2000, 10.5, "p")),
            Err(StoreError::InvalidRating(_))
        ));
        assert!(matches!(store.add(Movie::new("", 2000, 5.0, "p")), Err(StoreError::EmptyTitle)));
        assert!(matches!(store.update("The Matrix", -1.0), Err(StoreError::InvalidRating(_))));
        assert_eq!(raw(store.as_ref()), before, "{kind}");
    }
}

#[test]
fn test_missing_or_empty_file_lists_empty() {
    for kind in BACKENDS {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir, kind);
        assert!(store.list().unwrap().is_empty(), "{kind}");

        std::fs::write(store.path(), "").unwrap();
        assert!(store.list().unwrap().is_empty(), "{kind}");

        // An empty file is a valid starting point for writes.
        store.add(matrix()).unwrap();
        assert_eq!(store.list().unwrap().len(), 1, "{kind}");
    }
}

#[test]
fn test_backends_are_observationally_equivalent() {
    let dir = tempfile::tempdir().unwrap();
    let json = open(&dir, BackendKind::Json);
    let csv = open(&dir, BackendKind::Csv);

    let seeds = [
        matrix(),
        inception(),
        Movie::new("Amélie", 2001, 8.3, "https://img/amelie.jpg"),
        Movie::new("Se7en, the \"director's\" cut", 1995, 8.6, "se7en.png"),
        Movie::new("Plan 9", 1957, 0.0, ""),
    ];

    let mut results: Vec<Catalog> = Vec::new();
    for store in [&json, &csv] {
        for movie in &seeds {
            store.add(movie.clone()).unwrap();
        }
        store.update("Plan 9", 10.0).unwrap();
        store.delete("Inception").unwrap();
        store.update("Amélie", 7.25).unwrap();
        assert!(store.add(matrix()).is_err());
        assert!(store.delete("Inception").is_err());
        results.push(store.list().unwrap());
    }

    assert_eq!(results[0], results[1]);
    let titles: Vec<&str> = results[0].titles().collect();
    assert_eq!(
        titles,
        vec!["The Matrix", "Amélie", "Se7en, the \"director's\" cut", "Plan 9"]
    );
}

#[test]
fn test_reopening_sees_previous_writes() {
    for kind in BACKENDS {
        let dir = tempfile::tempdir().unwrap();
        open(&dir, kind).add(matrix()).unwrap();
        let reopened = open(&dir, kind);
        assert_eq!(reopened.list().unwrap().get("The Matrix"), Some(&matrix()), "{kind}");
    }
}

#[test]
fn test_strict_store_never_overwrites_corrupt_file() {
    for kind in BACKENDS {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir, kind);
        let garbage = b"title,year\n\"unterminated\n{{{".to_vec();
        std::fs::write(store.path(), &garbage).unwrap();

        assert!(matches!(store.list(), Err(StoreError::Malformed { .. })), "{kind}");
        assert!(store.add(inception()).is_err(), "{kind}");
        assert!(store.delete("x").is_err(), "{kind}");
        assert_eq!(raw(store.as_ref()), garbage, "{kind}");
    }
}

#[test]
fn test_lenient_store_reads_corrupt_file_as_empty() {
    for kind in BACKENDS {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(format!("john.{kind}"));
        std::fs::write(&path, "{ this is not a catalog").unwrap();
        let store = storage::open(kind, &path, Recovery::Lenient).unwrap();
        assert!(store.list().unwrap().is_empty(), "{kind}");
    }
}

#[test]
fn test_store_in_missing_directory_is_created_on_first_write() {
    for kind in BACKENDS {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join(format!("john.{kind}"));
        let store = storage::open(kind, &path, Recovery::Strict).unwrap();
        store.add(matrix()).unwrap();
        assert!(path.exists(), "{kind}");
        assert_eq!(store.list().unwrap().get("The Matrix"), Some(&matrix()), "{kind}");
    }
}
