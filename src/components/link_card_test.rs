use super::*;

#[test]
fn short_urls_are_untouched() {
    assert_eq!(elide_url("https://example.com", 60), "https://example.com");
}

#[test]
fn long_urls_keep_head_and_tail() {
    let url = "https://example.com/a/very/long/path/that/goes/on/forever?with=query";
    let shown = elide_url(url, 20);
    assert_eq!(shown.chars().count(), 20);
    assert!(shown.starts_with("https://"));
    assert!(shown.ends_with("query"));
    assert!(shown.contains("..."));
}

#[test]
fn tiny_limits_disable_elision() {
    assert_eq!(elide_url("https://example.com", 3), "https://example.com");
}

#[test]
fn clicks_label_pluralizes() {
    assert_eq!(clicks_label(0), "0 clicks");
    assert_eq!(clicks_label(1), "1 click");
    assert_eq!(clicks_label(42), "42 clicks");
}
