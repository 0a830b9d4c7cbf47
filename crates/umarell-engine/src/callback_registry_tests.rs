use super::*;

#[test]
fn list_is_sorted_and_reflects_set_and_remove() {
    let reg = CallbackRegistry::new();
    reg.set(StageName::from("b-stage"), "http://x/b");
    reg.set(StageName::from("a-stage"), "http://x/a");
    assert_eq!(reg.list(), vec!["http://x/a".to_string(), "http://x/b".to_string()]);

    reg.remove(&StageName::from("a-stage"));
    assert_eq!(reg.list(), vec!["http://x/b".to_string()]);
}
