use super::*;

#[test]
fn push_carries_sha1() {
    let n = Notification::push("proj", "main", "abc123");
    assert_eq!(n.kind, NotificationKind::Push);
    assert_eq!(n.sha1, "abc123");
}

#[test]
fn delete_has_empty_sha1() {
    let n = Notification::delete("proj", "feature/x");
    assert_eq!(n.kind, NotificationKind::Delete);
    assert!(n.sha1.is_empty());
}
