use super::*;
use yare::parameterized;

#[parameterized(
    plain = { "{ENV}.t{TICKET}", "staging", "42", "staging.t42" },
    unknown_token_preserved = { "{ENV}-{MISSING}", "prod", "1", "prod-{MISSING}" },
    no_tokens = { "static-stage", "prod", "1", "static-stage" },
)]
fn substitutes_known_tokens(template: &str, env: &str, ticket: &str, expected: &str) {
    let mut vars = Vars::new();
    vars.set("ENV", env);
    vars.set("TICKET", ticket);
    assert_eq!(vars.substitute(template), expected);
}

#[test]
fn substitution_is_idempotent_when_values_have_no_braces() {
    let mut vars = Vars::new();
    vars.set("BRANCH", "feature/42-foo");
    let once = vars.substitute("{BRANCH}");
    let twice = vars.substitute(&once);
    assert_eq!(once, twice);
}

#[test]
fn substitute_all_maps_over_templates() {
    let mut vars = Vars::new();
    vars.set("STAGE", "app.t1");
    let out = vars.substitute_all(["echo", "{STAGE}"]);
    assert_eq!(out, vec!["echo".to_string(), "app.t1".to_string()]);
}
