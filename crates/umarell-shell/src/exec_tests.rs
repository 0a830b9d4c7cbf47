use super::*;
use std::time::Duration;

#[tokio::test]
async fn captures_stdout_and_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let argv = vec!["echo".to_string(), "hello".to_string()];
    let out = run_with_timeout(&argv, dir.path(), Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(out.stdout.trim(), "hello");
    assert_eq!(out.exit_code, Some(0));
    assert!(!out.timed_out);
}

#[tokio::test]
async fn nonzero_exit_is_reported_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let argv = vec!["sh".to_string(), "-c".to_string(), "exit 3".to_string()];
    let out = run_with_timeout(&argv, dir.path(), Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(out.exit_code, Some(3));
}

#[tokio::test]
async fn timeout_kills_the_process() {
    let dir = tempfile::tempdir().unwrap();
    let argv = vec!["sleep".to_string(), "5".to_string()];
    let out = run_with_timeout(&argv, dir.path(), Duration::from_millis(50))
        .await
        .unwrap();
    assert!(out.timed_out);
    assert_eq!(out.exit_code, None);
}

#[tokio::test]
async fn empty_command_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_with_timeout(&[], dir.path(), Duration::from_secs(1))
        .await
        .unwrap_err();
    assert!(matches!(err, ExecError::EmptyCommand { .. }));
}
