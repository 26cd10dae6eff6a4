use entity_store::{Entity, EntityId, FsBackend, JsonStore};
use serde_json::{json, Value};
use std::sync::Arc;

fn entity(value: Value) -> Entity {
    Entity::try_from(value).expect("valid entity")
}

#[tokio::test]
async fn full_crud_cycle_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::new(Arc::new(FsBackend::rooted(dir.path())));
    let file = dir.path().join("reps.json");

    // Create on a missing file leaves exactly [entity].
    let receipt = store
        .create("reps.json", entity(json!({ "ID": 1, "name": "Ann" })))
        .await
        .unwrap();
    assert_eq!(receipt.path, file.display().to_string());
    let on_disk: Value = serde_json::from_str(&std::fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(on_disk, json!([{ "ID": 1, "name": "Ann" }]));

    store
        .create("reps.json", entity(json!({ "ID": 2, "name": "Bob" })))
        .await
        .unwrap();

    let replacement = json!({ "name": "Ann B." });
    store
        .update("reps.json", &EntityId::from(1_i64), replacement.as_object().unwrap().clone())
        .await
        .unwrap();

    let found = store.get("reps.json", &EntityId::from(1_i64)).await.unwrap();
    assert_eq!(found, Some(json!({ "name": "Ann B.", "ID": 1 })));

    store.delete("reps.json", &EntityId::from(2_i64)).await.unwrap();
    assert_eq!(
        store.read("reps.json").await.unwrap(),
        json!([{ "name": "Ann B.", "ID": 1 }])
    );
}

#[tokio::test]
async fn absolute_locators_bypass_root() {
    let dir = tempfile::tempdir().unwrap();
    let other = tempfile::tempdir().unwrap();
    let store = JsonStore::new(Arc::new(FsBackend::rooted(dir.path())));
    let target = other.path().join("abs.json");
    let locator = target.display().to_string();

    let receipt = store
        .create(&locator, entity(json!({ "ID": "x" })))
        .await
        .unwrap();
    assert_eq!(receipt.path, locator);
    assert!(target.exists());
}

#[tokio::test]
async fn malformed_file_reports_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.json"), "[{\"ID\": 1,}]").unwrap();
    let store = JsonStore::new(Arc::new(FsBackend::rooted(dir.path())));

    let err = store.read("broken.json").await.unwrap_err();
    assert!(err.is_parse());

    let err = store.delete("broken.json", &EntityId::from(1_i64)).await.unwrap_err();
    assert!(err.is_parse());
}
