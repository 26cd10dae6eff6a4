use serde_json::{json, Value};
use std::path::Path;
use territory_service::commands::{execute, CommandError, EntityArgs, EntityCommand};

fn args(command: EntityCommand) -> EntityArgs {
    EntityArgs {
        reject_duplicates: false,
        command,
    }
}

fn on_disk(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn entity_commands_round_trip_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("reps.json");

    let receipt = execute(&args(EntityCommand::Create {
        file: file.clone(),
        json: r#"{"ID":999,"name":"JB"}"#.into(),
    }))
    .await
    .unwrap();
    assert_eq!(receipt["ok"], true);
    assert_eq!(on_disk(&file), json!([{ "ID": 999, "name": "JB" }]));

    let found = execute(&args(EntityCommand::Get {
        file: file.clone(),
        id: "999".into(),
    }))
    .await
    .unwrap();
    assert_eq!(found["name"], "JB");

    execute(&args(EntityCommand::Update {
        file: file.clone(),
        id: "999".into(),
        json: r#"{"name":"JB Smith","ID":1}"#.into(),
    }))
    .await
    .unwrap();
    assert_eq!(on_disk(&file), json!([{ "name": "JB Smith", "ID": 999 }]));

    let receipt = execute(&args(EntityCommand::Delete {
        file: file.clone(),
        id: "999".into(),
    }))
    .await
    .unwrap();
    assert_eq!(receipt["path"], file.display().to_string());
    assert_eq!(on_disk(&file), json!([]));

    let all = execute(&args(EntityCommand::Read { file })).await.unwrap();
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn reject_duplicates_flag_guards_create() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("reps.json");
    std::fs::write(&file, r#"[{"ID":1}]"#).unwrap();

    let err = execute(&EntityArgs {
        reject_duplicates: true,
        command: EntityCommand::Create {
            file: file.clone(),
            json: r#"{"ID":1}"#.into(),
        },
    })
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "Entity with ID 1 already exists.");
    assert_eq!(on_disk(&file), json!([{ "ID": 1 }]));
}

#[tokio::test]
async fn delete_on_missing_file_reports_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = execute(&args(EntityCommand::Delete {
        file: dir.path().join("missing.json"),
        id: "1".into(),
    }))
    .await
    .unwrap_err();
    assert!(matches!(err, CommandError::Store(ref e) if e.is_not_found()));
}

#[tokio::test]
async fn malformed_json_argument_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = execute(&args(EntityCommand::Create {
        file: dir.path().join("reps.json"),
        json: "{".into(),
    }))
    .await
    .unwrap_err();
    assert!(matches!(err, CommandError::InvalidJson(_)));
}
