// tests/tracker_tests.rs
use encrypted_attrs::AttributeState;
use serde_json::json;

#[test]
fn test_untouched_attribute_has_nothing_to_write_back() {
    let state = AttributeState::new();
    assert!(!state.has_changed("email").unwrap());
    assert!(!state.is_dirty("email"));
    assert!(state.cached("email").is_none());
}

#[test]
fn test_touch_caches_and_marks_dirty() {
    let mut state = AttributeState::new();
    state.touch("email", Some(json!("a@b.c"))).unwrap();

    assert_eq!(state.cached("email"), Some(&json!("a@b.c")));
    assert!(state.is_dirty("email"));
    assert!(state.has_changed("email").unwrap());
}

#[test]
fn test_in_place_mutation_until_marked_clean() {
    let mut state = AttributeState::new();
    state
        .touch("prefs", Some(json!({ "theme": "dark" })))
        .unwrap();
    state.mark_clean("prefs").unwrap();
    assert!(!state.has_changed("prefs").unwrap());

    // Re-touching without a new value keeps the cached plaintext
    let prefs = state.touch("prefs", None).unwrap();
    prefs["theme"] = json!("light");
    assert!(state.has_changed("prefs").unwrap());

    state.mark_clean("prefs").unwrap();
    assert_eq!(state.cached("prefs"), Some(&json!({ "theme": "light" })));
    assert!(!state.has_changed("prefs").unwrap());
}

#[test]
fn test_equal_content_has_equal_fingerprint() {
    let mut state = AttributeState::new();
    state
        .touch("prefs", Some(json!({ "a": 1, "b": [1, 2] })))
        .unwrap();
    state.mark_clean("prefs").unwrap();

    // Same content rebuilt in a different key order is not a change
    state.touch("prefs", Some(json!({ "b": [1, 2], "a": 1 }))).unwrap();
    state.mark_clean("prefs").unwrap();
    assert!(!state.has_changed("prefs").unwrap());
}

#[test]
fn test_forget_drops_cache_and_tracking() {
    let mut state = AttributeState::new();
    state.touch("email", Some(json!("x"))).unwrap();
    state.forget("email");

    assert!(state.cached("email").is_none());
    assert!(!state.is_dirty("email"));
    assert_eq!(state.tracked().count(), 0);
}

#[test]
fn test_diverged_ignores_dirty_flag() {
    let mut state = AttributeState::new();
    state.touch("email", Some(json!(null))).unwrap();
    assert!(state.has_changed("email").unwrap());
    assert!(!state.has_diverged("email").unwrap());

    *state.touch("email", None).unwrap() = json!("x");
    assert!(state.has_diverged("email").unwrap());
}
