use std::fs;

use tempfile::TempDir;
use todo::{Item, Store, StoreError};

fn setup() -> (TempDir, Store) {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path().join("todo.json")).unwrap();
    (dir, store)
}

#[test]
fn restore_makes_db_byte_identical_to_backup() {
    let (_dir, store) = setup();
    store
        .add_item(Item { id: 99, title: "to be wiped".into(), done: false })
        .unwrap();

    let backup_bytes = br#"[{"id":1,"title":"Learn","done":false}]"#;
    fs::write(store.backup_path(), backup_bytes).unwrap();

    store.restore().unwrap();
    assert_eq!(fs::read(store.path()).unwrap(), backup_bytes);
}

#[test]
fn restore_copies_backup_verbatim_without_validation() {
    let (_dir, store) = setup();
    fs::write(store.backup_path(), "not json at all").unwrap();

    store.restore().unwrap();
    assert_eq!(fs::read_to_string(store.path()).unwrap(), "not json at all");

    // The copy succeeded; the damage only shows on the next load.
    let err = store.get_all_items().unwrap_err();
    assert!(matches!(err, StoreError::Parse(_)));
}

#[test]
fn restore_without_backup_file_is_an_io_error() {
    let (_dir, store) = setup();
    let err = store.restore().unwrap_err();
    assert!(matches!(err, StoreError::Io(_)));
}

#[test]
fn restore_then_crud_scenario() {
    let (_dir, store) = setup();
    fs::write(
        store.backup_path(),
        r#"[{"id":1,"title":"Learn","done":false}]"#,
    )
    .unwrap();

    store.restore().unwrap();
    assert_eq!(
        store.get_item(1).unwrap(),
        Item { id: 1, title: "Learn".into(), done: false }
    );

    store
        .add_item(Item { id: 2, title: "X".into(), done: true })
        .unwrap();
    assert_eq!(store.get_all_items().unwrap().len(), 2);

    store.delete_item(1).unwrap();
    let remaining = store.get_all_items().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, 2);
}
