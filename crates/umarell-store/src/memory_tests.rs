use super::*;
use chrono::Duration;
use umarell_core::BuildAct;

fn sample(stage: &str, end: DateTime<Utc>) -> BuildResult {
    BuildResult {
        stage: stage.into(),
        start: end - Duration::seconds(1),
        end,
        act: BuildAct::Create,
        ticket: Some(42),
        sha1: "a".repeat(40),
        branch: "feature/42-x".to_string(),
        cmd: vec!["echo".to_string(), "hi".to_string()],
        stdout: "hi\n".to_string(),
        stderr: String::new(),
        exit_code: Some(0),
    }
}

#[tokio::test]
async fn add_and_get_round_trip() {
    let store = MemoryStore::new();
    let now = Utc::now();
    store.add(sample("app.t42", now)).await.unwrap();
    let results = store.get("app.t42").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].ticket, Some(42));
}

#[tokio::test]
async fn delete_removes_all_results_for_stage() {
    let store = MemoryStore::new();
    let now = Utc::now();
    store.add(sample("app.t42", now)).await.unwrap();
    store.delete("app.t42").await.unwrap();
    assert!(store.get("app.t42").await.unwrap().is_empty());
}

#[tokio::test]
async fn clean_removes_only_records_ending_before_cutoff() {
    let store = MemoryStore::new();
    let old = Utc::now() - Duration::days(2);
    let recent = Utc::now();
    store.add(sample("app.t1", old)).await.unwrap();
    store.add(sample("app.t1", recent)).await.unwrap();

    let cutoff = Utc::now() - Duration::days(1);
    let removed = store.clean(cutoff).await.unwrap();
    assert_eq!(removed, 1);
    let remaining = store.get("app.t1").await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].end, recent);
}
