use crate::callback_registry::CallbackRegistry;
use crate::merge_detector::MergeCheckMode;
use crate::project::spawn_project;
use std::sync::Arc;
use std::time::Duration;
use umarell_config::Config;
use umarell_core::{Notification, StageName};
use umarell_store::MemoryStore;
use umarell_vcs::fake::FakeVcsAdapter;
use umarell_vcs::Commit;

fn config() -> Arc<Config> {
    Arc::new(
        Config::parse(
            r#"
    {
      "workspaces_dir": "/tmp",
      "commands": { "create": ["true"], "change": ["true"], "update": ["true"], "destroy": ["true"] },
      "environments": { "app": { "branches": { "__default__": ["{ENV}.t{TICKET}"] } } }
    }
    "#,
        )
        .unwrap(),
    )
}

fn spawn_info(store: Arc<dyn umarell_store::ResultStore>, stage: StageName) -> crate::BuildSpawnInfo {
    crate::BuildSpawnInfo {
        project: "app".to_string(),
        stage,
        workspaces_dir: "/tmp".into(),
        command_timeout: Duration::from_secs(5),
        config: config(),
        store,
        semaphore: None,
    }
}

/// Reproduces concrete scenario 2 from the specification: a push to the
/// tracked master checkout whose new ancestry contains a feature
/// stage's last-known sha triggers that stage's destruction.
#[tokio::test]
async fn push_to_checkout_retires_merged_feature_stage() {
    let registry = Arc::new(CallbackRegistry::new());
    let vcs = Arc::new(FakeVcsAdapter::new());
    let repo_dir = std::path::PathBuf::from("/srv/app");
    vcs.push_commits(
        &repo_dir,
        [
            Commit { hash: "AAA".into(), parents: vec![] },
            Commit { hash: "BBB".into(), parents: vec!["AAA".into()] },
            Commit { hash: "CCC".into(), parents: vec!["BBB".into()] },
        ],
    );

    let engine = spawn_project(
        "app".to_string(),
        vec![(StageName::from("app.master"), repo_dir.clone(), "AAA".to_string())],
        vcs,
        registry.clone(),
        MergeCheckMode::CommitsOnly,
    );
    let store: Arc<dyn umarell_store::ResultStore> = Arc::new(MemoryStore::new());

    // feature stage created from a push with sha BBB
    engine
        .coordinator
        .push(
            StageName::from("app.t42"),
            spawn_info(store.clone(), StageName::from("app.t42")),
            "feature/42-x".to_string(),
            Some(42),
            "http://cb/app.t42".to_string(),
            Notification::push("app", "feature/42-x", "BBB"),
        )
        .await;
    assert!(registry.list().contains(&"http://cb/app.t42".to_string()));

    // push to master (the tracked checkout) whose new history contains BBB
    engine
        .coordinator
        .push(
            StageName::from("app.master"),
            spawn_info(store, StageName::from("app.master")),
            "master".to_string(),
            None,
            "http://cb/app.master".to_string(),
            Notification::push("app", "master", "CCC"),
        )
        .await;

    // the destroy the detector schedules is fire-and-forget; give it a
    // moment to land before asserting.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let urls = registry.list();
    assert!(!urls.contains(&"http://cb/app.t42".to_string()));
    assert!(urls.contains(&"http://cb/app.master".to_string()));
}

#[tokio::test]
async fn unremovable_checkout_stage_is_never_registered_as_a_version() {
    let registry = Arc::new(CallbackRegistry::new());
    let vcs = Arc::new(FakeVcsAdapter::new());
    let repo_dir = std::path::PathBuf::from("/srv/app");
    let engine = spawn_project(
        "app".to_string(),
        vec![(StageName::from("app.master"), repo_dir, "AAA".to_string())],
        vcs,
        registry.clone(),
        MergeCheckMode::CommitsOnly,
    );
    let store: Arc<dyn umarell_store::ResultStore> = Arc::new(MemoryStore::new());

    // a push addressed at the checkout stage itself must never be
    // treated as a candidate for merge-triggered destruction of itself
    engine
        .coordinator
        .push(
            StageName::from("app.master"),
            spawn_info(store, StageName::from("app.master")),
            "master".to_string(),
            None,
            "http://cb/app.master".to_string(),
            Notification::push("app", "master", "AAA"),
        )
        .await;

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(registry.list().contains(&"http://cb/app.master".to_string()));
}
