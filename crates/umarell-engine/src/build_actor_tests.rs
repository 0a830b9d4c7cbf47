use super::*;
use std::time::Duration as StdDuration;
use umarell_core::{BuildAct, Notification};
use umarell_store::MemoryStore;

fn test_config() -> Config {
    Config::parse(
        r#"
    {
      "workspaces_dir": "/tmp",
      "commands": {
        "create": ["sh", "-c", "echo created-{BRANCH}"],
        "change": ["sh", "-c", "echo changed-{BRANCH}"],
        "update": ["sh", "-c", "echo updated-{BRANCH}"]
      },
      "environments": {
        "app": { "branches": { "__default__": ["{ENV}.t{TICKET}"] } }
      }
    }
    "#,
    )
    .unwrap()
}

fn spawn_info(dir: &std::path::Path, store: Arc<dyn ResultStore>) -> BuildSpawnInfo {
    BuildSpawnInfo {
        project: "app".to_string(),
        stage: StageName::from("app.t42"),
        workspaces_dir: dir.to_path_buf(),
        command_timeout: StdDuration::from_secs(5),
        config: Arc::new(test_config()),
        store,
        semaphore: None,
    }
}

#[tokio::test]
async fn create_runs_configured_command_and_persists_result() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn ResultStore> = Arc::new(MemoryStore::new());
    let info = spawn_info(dir.path(), store.clone());
    let handle = spawn(info, "feature/42-x".to_string(), Some(42));

    handle
        .request(BuildAct::Create, Notification::push("app", "feature/42-x", "sha1"))
        .await;

    let results = store.get("app.t42").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].act, BuildAct::Create);
    assert!(results[0].stdout.contains("created-feature/42-x"));
}

#[tokio::test]
async fn change_to_same_branch_normalizes_to_update() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn ResultStore> = Arc::new(MemoryStore::new());
    let info = spawn_info(dir.path(), store.clone());
    let handle = spawn(info, "feature/42-x".to_string(), Some(42));

    handle
        .request(BuildAct::Create, Notification::push("app", "feature/42-x", "sha1"))
        .await;
    handle
        .request(BuildAct::Change, Notification::push("app", "feature/42-x", "sha2"))
        .await;

    let results = store.get("app.t42").await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[1].act, BuildAct::Update);
}

#[tokio::test]
async fn change_to_different_branch_stays_change() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn ResultStore> = Arc::new(MemoryStore::new());
    let info = spawn_info(dir.path(), store.clone());
    let handle = spawn(info, "feature/42-x".to_string(), Some(42));

    handle
        .request(BuildAct::Create, Notification::push("app", "feature/42-x", "sha1"))
        .await;
    handle
        .request(BuildAct::Change, Notification::push("app", "feature/42-y", "sha2"))
        .await;

    let results = store.get("app.t42").await.unwrap();
    assert_eq!(results[1].act, BuildAct::Change);
    assert!(results[1].stdout.contains("changed-feature/42-y"));
}

#[tokio::test]
async fn missing_command_template_still_signals_done() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn ResultStore> = Arc::new(MemoryStore::new());
    let mut info = spawn_info(dir.path(), store.clone());
    info.config = Arc::new(
        Config::parse(
            r#"{"workspaces_dir": "/tmp", "commands": {}, "environments": {"app": {"branches": {"__default__": ["x"]}}}}"#,
        )
        .unwrap(),
    );
    let handle = spawn(info, "feature/1".to_string(), Some(1));
    handle
        .request(BuildAct::Destroy, Notification::delete("app", "feature/1"))
        .await;
    assert!(store.get("app.t42").await.unwrap().is_empty());
}
