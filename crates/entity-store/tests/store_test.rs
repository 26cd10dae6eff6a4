use entity_store::mock::MemoryBackend;
use entity_store::{Entity, EntityId, JsonStore, StoreError, WriteReceipt};
use serde_json::{json, Map, Value};
use std::io::ErrorKind;
use std::sync::Arc;

const REPS: &str = "mock/mock-reps.json";

fn jb() -> Value {
    json!({
        "name": "JB Pruett",
        "phone": "(111) 111-1111",
        "email": "jb@jb.com",
        "ID": 999
    })
}

fn entity(value: Value) -> Entity {
    Entity::try_from(value).expect("valid entity")
}

fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap()
}

fn setup(contents: &str) -> (Arc<MemoryBackend>, JsonStore<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new().with_file(REPS, contents));
    (backend.clone(), JsonStore::new(backend))
}

// --- Read ---

#[tokio::test]
async fn read_returns_parsed_content() {
    let (_, store) = setup(r#"[{"id":1,"name":"John Doe"},{"id":2,"name":"Jane Doe"}]"#);
    let content = store.read(REPS).await.unwrap();
    assert_eq!(
        content,
        json!([{ "id": 1, "name": "John Doe" }, { "id": 2, "name": "Jane Doe" }])
    );
}

#[tokio::test]
async fn read_accepts_any_json_value() {
    let (_, store) = setup("[]");
    assert_eq!(store.read(REPS).await.unwrap(), json!([]));

    let (_, store) = setup(r#"{"single":true}"#);
    assert_eq!(store.read(REPS).await.unwrap(), json!({ "single": true }));
}

#[tokio::test]
async fn read_failure_propagates_as_io_error() {
    let backend = Arc::new(MemoryBackend::new());
    let store = JsonStore::new(backend);

    let err = store.read("nonexistentfile.json").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(!err.is_parse());
}

#[tokio::test]
async fn malformed_json_is_a_parse_error() {
    let (_, store) = setup("{ not json");
    let err = store.read(REPS).await.unwrap_err();
    assert!(err.is_parse());
    assert!(matches!(err, StoreError::Parse { .. }));
}

// --- Create ---

#[tokio::test]
async fn create_appends_entity_to_existing_array() {
    let existing = json!([{ "name": "Existing", "phone": "(000)", "email": "ex@ex.com", "ID": 1 }]);
    let (backend, store) = setup(&existing.to_string());

    let receipt = store.create(REPS, entity(jb())).await.unwrap();

    assert_eq!(backend.probes(), vec![REPS.to_string()]);
    let expected = json!([existing[0].clone(), jb()]);
    assert_eq!(backend.writes(), vec![(REPS.to_string(), pretty(&expected))]);
    assert_eq!(receipt, WriteReceipt::new("/memory/mock/mock-reps.json"));
}

#[tokio::test]
async fn create_bootstraps_missing_resource() {
    let backend = Arc::new(MemoryBackend::new());
    let store = JsonStore::new(backend.clone());

    let receipt = store.create(REPS, entity(jb())).await.unwrap();

    let writes = backend.writes();
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[0], (REPS.to_string(), "[]".to_string()));
    assert_eq!(writes[1], (REPS.to_string(), pretty(&json!([jb()]))));
    assert!(receipt.ok);
}

#[tokio::test]
async fn create_persists_with_two_space_indent() {
    let (backend, store) = setup("[]");
    store.create(REPS, entity(json!({ "ID": 1 }))).await.unwrap();
    assert_eq!(backend.contents(REPS).unwrap(), "[\n  {\n    \"ID\": 1\n  }\n]");
}

#[tokio::test]
async fn create_keeps_existing_order() {
    let (backend, store) = setup(r#"[{"ID":3},{"ID":1},{"ID":2}]"#);
    store.create(REPS, entity(json!({ "ID": 0 }))).await.unwrap();

    let written: Value = serde_json::from_str(&backend.contents(REPS).unwrap()).unwrap();
    assert_eq!(written, json!([{ "ID": 3 }, { "ID": 1 }, { "ID": 2 }, { "ID": 0 }]));
}

#[tokio::test]
async fn create_allows_duplicate_ids_by_default() {
    let (backend, store) = setup(r#"[{"ID":999}]"#);
    store.create(REPS, entity(jb())).await.unwrap();

    let written: Value = serde_json::from_str(&backend.contents(REPS).unwrap()).unwrap();
    assert_eq!(written.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn create_write_failure_propagates() {
    let existing = json!([{ "name": "Existing2", "ID": 2 }]);
    let (backend, store) = setup(&existing.to_string());
    backend.fail_writes(ErrorKind::PermissionDenied, "Write failed");

    let err = store.create(REPS, entity(jb())).await.unwrap_err();

    assert!(err.to_string().contains("Write failed"));
    let expected = json!([existing[0].clone(), jb()]);
    assert_eq!(backend.writes(), vec![(REPS.to_string(), pretty(&expected))]);
    // Original content is untouched when the only write fails.
    assert_eq!(backend.contents(REPS).unwrap(), existing.to_string());
}

#[tokio::test]
async fn create_leaves_empty_array_when_content_write_fails_after_bootstrap() {
    let backend = Arc::new(MemoryBackend::new());
    let store = JsonStore::new(backend.clone());
    backend.fail_writes_after(1, ErrorKind::Other, "Disk full");

    let err = store.create(REPS, entity(jb())).await.unwrap_err();

    assert!(err.to_string().contains("Disk full"));
    assert_eq!(backend.writes().len(), 2);
    assert_eq!(backend.contents(REPS).unwrap(), "[]");
}

#[tokio::test]
async fn create_bootstraps_over_existing_resource_when_probe_fails() {
    let (backend, store) = setup(r#"[{"ID":1}]"#);
    backend.fail_probes(ErrorKind::PermissionDenied, "stat denied");

    store.create(REPS, entity(jb())).await.unwrap();

    let writes = backend.writes();
    assert_eq!(writes[0], (REPS.to_string(), "[]".to_string()));
    let written: Value = serde_json::from_str(&backend.contents(REPS).unwrap()).unwrap();
    assert_eq!(written, json!([jb()]));
}

#[tokio::test]
async fn create_on_malformed_resource_fails_without_writing() {
    let (backend, store) = setup("[{]");
    let err = store.create(REPS, entity(jb())).await.unwrap_err();
    assert!(err.is_parse());
    assert!(backend.writes().is_empty());
}

// --- Update ---

#[tokio::test]
async fn update_replaces_fields_and_preserves_id() {
    let (backend, store) = setup(
        &json!([
            { "name": "Keep", "ID": 1 },
            { "name": "JB", "phone": "(111)", "email": "old@jb.com", "ID": 999 }
        ])
        .to_string(),
    );

    let replacement = fields(json!({ "name": "JB Updated", "email": "new@jb.com", "ID": 12345 }));
    let receipt = store
        .update(REPS, &EntityId::from(999_i64), replacement)
        .await
        .unwrap();

    let written: Value = serde_json::from_str(&backend.contents(REPS).unwrap()).unwrap();
    assert_eq!(
        written,
        json!([
            { "name": "Keep", "ID": 1 },
            { "name": "JB Updated", "email": "new@jb.com", "ID": 999 }
        ])
    );
    assert_eq!(receipt.path, "/memory/mock/mock-reps.json");
}

#[tokio::test]
async fn update_adds_id_when_replacement_omits_it() {
    let (backend, store) = setup(r#"[{"ID":"abc","name":"Old"}]"#);
    store
        .update(REPS, &EntityId::from("abc"), fields(json!({ "name": "New" })))
        .await
        .unwrap();

    let written: Value = serde_json::from_str(&backend.contents(REPS).unwrap()).unwrap();
    assert_eq!(written, json!([{ "name": "New", "ID": "abc" }]));
}

#[tokio::test]
async fn update_missing_entity_is_not_found() {
    let (backend, store) = setup(r#"[{"ID":1}]"#);
    let err = store
        .update(REPS, &EntityId::from(999_i64), fields(json!({ "name": "x" })))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::NotFound { .. }));
    assert_eq!(err.to_string(), "Entity with ID 999 not found.");
    assert!(backend.writes().is_empty());
}

#[tokio::test]
async fn update_does_not_coerce_identifier_types() {
    let (_, store) = setup(r#"[{"ID":"999"}]"#);
    let err = store
        .update(REPS, &EntityId::from(999_i64), fields(json!({})))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[tokio::test]
async fn update_requires_array() {
    let (_, store) = setup(r#"{"ID":999}"#);
    let err = store
        .update(REPS, &EntityId::from(999_i64), fields(json!({})))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Shape { .. }));
    assert_eq!(err.to_string(), "JSON file does not contain an array of entities.");
}

#[tokio::test]
async fn update_read_failure_propagates() {
    let (backend, store) = setup("[]");
    backend.fail_reads(ErrorKind::Other, "Read failed");

    let err = store
        .update(REPS, &EntityId::from(999_i64), fields(json!({})))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
    assert!(err.to_string().contains("Read failed"));
}

// --- Delete ---

#[tokio::test]
async fn delete_removes_exactly_one_entity() {
    let (backend, store) = setup(r#"[{"ID":1},{"ID":999,"name":"JB"},{"ID":2}]"#);

    let receipt = store.delete(REPS, &EntityId::from(999_i64)).await.unwrap();

    assert_eq!(
        backend.contents(REPS).unwrap(),
        pretty(&json!([{ "ID": 1 }, { "ID": 2 }]))
    );
    assert_eq!(receipt, WriteReceipt::new(REPS));
}

#[tokio::test]
async fn delete_removes_first_of_duplicates() {
    let (backend, store) = setup(r#"[{"ID":7,"n":"a"},{"ID":7,"n":"b"}]"#);
    store.delete(REPS, &EntityId::from(7_i64)).await.unwrap();

    let written: Value = serde_json::from_str(&backend.contents(REPS).unwrap()).unwrap();
    assert_eq!(written, json!([{ "ID": 7, "n": "b" }]));
}

#[tokio::test]
async fn delete_missing_entity_is_not_found() {
    let (_, store) = setup(r#"[{"ID":1}]"#);
    let err = store.delete(REPS, &EntityId::from(999_i64)).await.unwrap_err();
    assert_eq!(err.to_string(), "Entity with ID 999 not found.");
}

#[tokio::test]
async fn delete_requires_array() {
    let (_, store) = setup(r#"{"ID":999}"#);
    let err = store.delete(REPS, &EntityId::from(999_i64)).await.unwrap_err();
    assert!(matches!(err, StoreError::Shape { .. }));
}

#[tokio::test]
async fn delete_on_missing_resource_fails_probe() {
    let backend = Arc::new(MemoryBackend::new());
    let store = JsonStore::new(backend.clone());

    let err = store.delete(REPS, &EntityId::from(1_i64)).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(backend.probes(), vec![REPS.to_string()]);
    assert!(backend.writes().is_empty());
}

#[tokio::test]
async fn delete_propagates_probe_failure() {
    let (backend, store) = setup(r#"[{"ID":1}]"#);
    backend.fail_probes(ErrorKind::PermissionDenied, "stat denied");

    let err = store.delete(REPS, &EntityId::from(1_i64)).await.unwrap_err();

    assert!(err.to_string().contains("stat denied"));
    assert!(!err.is_not_found());
    assert!(backend.writes().is_empty());
    assert_eq!(backend.contents(REPS).unwrap(), r#"[{"ID":1}]"#);
}
