use super::*;
use umarell_core::BuildAct;
use umarell_vcs::Commit;

fn config_json(workspaces_dir: &str, merges_dir: &str) -> String {
    format!(
        r#"{{
            "workspaces_dir": "{workspaces_dir}",
            "limit_builds": 0,
            "environments": {{
                "app": {{
                    "branches": {{ "main": ["app.prod"] }},
                    "staticBranches": ["main"],
                    "merges": {{ "main": "{merges_dir}" }}
                }}
            }}
        }}"#
    )
}

#[tokio::test]
async fn static_branch_is_pre_deployed_and_checkout_tracked() {
    let dir = tempfile::tempdir().unwrap();
    let merges_dir = dir.path().join("repo");
    let config: Arc<Config> = Arc::new(
        Config::parse(&config_json(
            dir.path().to_str().unwrap(),
            merges_dir.to_str().unwrap(),
        ))
        .unwrap(),
    );

    let state = build_from_config_inner(config, Arc::new(fake_vcs(&merges_dir))).await.unwrap();

    let engine = state.projects.get("app").unwrap();
    let results = state.store.get("app.prod").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].act, BuildAct::Create);
    assert_eq!(results[0].sha1, "c2");

    // the merges-tracked checkout was registered too; pushing a merge
    // commit onto main would need to find stage "app.prod" live, which
    // we can't observe directly here without driving the detector, so
    // we just confirm the engine came up without error.
    let _ = engine;
}

fn fake_vcs(dir: &std::path::Path) -> umarell_vcs::fake::FakeVcsAdapter {
    let vcs = umarell_vcs::fake::FakeVcsAdapter::new();
    vcs.push_commits(
        dir,
        vec![
            Commit { hash: "c1".to_string(), parents: vec![] },
            Commit { hash: "c2".to_string(), parents: vec!["c1".to_string()] },
        ],
    );
    vcs
}
