use super::*;
use chrono::Duration;

fn sample(stage: &str, end: DateTime<Utc>) -> BuildResult {
    BuildResult {
        stage: stage.into(),
        start: end - Duration::seconds(1),
        end,
        act: BuildAct::Update,
        ticket: Some(7),
        sha1: "b".repeat(40),
        branch: "release/9".to_string(),
        cmd: vec!["deploy.sh".to_string()],
        stdout: "ok".to_string(),
        stderr: String::new(),
        exit_code: Some(0),
    }
}

#[tokio::test]
async fn add_and_get_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("builds.sqlite"), None).unwrap();
    store.add(sample("app.t7", Utc::now())).await.unwrap();
    let rows = store.get("app.t7").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].ticket, Some(7));
    assert_eq!(rows[0].cmd, vec!["deploy.sh".to_string()]);
}

#[tokio::test]
async fn clean_purges_old_rows() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("builds.sqlite"), None).unwrap();
    let old = Utc::now() - Duration::days(30);
    store.add(sample("app.t7", old)).await.unwrap();
    let removed = store.clean(Utc::now()).await.unwrap();
    assert_eq!(removed, 1);
    assert!(store.get("app.t7").await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_removes_stage_rows() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("builds.sqlite"), None).unwrap();
    store.add(sample("app.t7", Utc::now())).await.unwrap();
    store.delete("app.t7").await.unwrap();
    assert!(store.get("app.t7").await.unwrap().is_empty());
}
