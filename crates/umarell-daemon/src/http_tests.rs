use super::*;

#[test]
fn required_param_rejects_missing_and_empty() {
    let mut params = HashMap::new();
    assert!(required_param(&params, "sha1").is_err());
    params.insert("sha1".to_string(), String::new());
    assert!(required_param(&params, "sha1").is_err());
    params.insert("sha1".to_string(), "abc123".to_string());
    assert_eq!(required_param(&params, "sha1").unwrap(), "abc123");
}

#[test]
fn render_text_sorts_and_newline_terminates() {
    let body = render_text(vec!["b/url".to_string(), "a/url".to_string()]);
    assert_eq!(body, "a/url\nb/url\n");
}

#[test]
fn render_html_wraps_each_url_in_an_anchor() {
    let body = render_html(vec!["a/url".to_string()]);
    assert_eq!(body, "<a href=\"a/url\">a/url</a><br />\n");
}

#[test]
fn render_text_of_empty_list_is_empty() {
    assert_eq!(render_text(vec![]), "");
}
