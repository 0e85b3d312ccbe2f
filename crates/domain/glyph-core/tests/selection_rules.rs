use glyph_core::{resolve_selection, Profile};

// --- Helpers ---

fn collection(ids: &[&str]) -> Vec<Profile> {
    ids.iter()
        .map(|id| Profile::new(*id, format!("Player {id}")))
        .collect()
}

// --- Tests ---

#[test]
fn selection_survives_refresh_when_id_still_present() {
    let next = collection(&["b", "c"]);
    let selected = resolve_selection(&next, Some("b"), None);
    assert_eq!(selected.as_deref(), Some("b"));
}

#[test]
fn selection_is_preserved_for_every_position_of_the_id() {
    for ids in [&["x", "a", "y"][..], &["a", "y"], &["y", "z", "a"]] {
        let next = collection(ids);
        assert_eq!(
            resolve_selection(&next, Some("a"), None).as_deref(),
            Some("a"),
            "collection {ids:?}"
        );
    }
}

#[test]
fn selection_falls_back_to_first_when_id_disappears() {
    let next = collection(&["c", "d"]);
    let selected = resolve_selection(&next, Some("a"), None);
    assert_eq!(selected.as_deref(), Some("c"));
}

#[test]
fn unset_selection_defaults_to_first() {
    let next = collection(&["q", "r"]);
    assert_eq!(resolve_selection(&next, None, None).as_deref(), Some("q"));
}

#[test]
fn empty_collection_always_clears_selection() {
    let next = collection(&[]);
    assert_eq!(resolve_selection(&next, Some("a"), None), None);
    assert_eq!(resolve_selection(&next, None, Some("a")), None);
    assert_eq!(resolve_selection(&next, None, None), None);
}

#[test]
fn rule_is_idempotent() {
    let next = collection(&["a", "b", "c"]);
    let once = resolve_selection(&next, Some("b"), None);
    let twice = resolve_selection(&next, once.as_deref(), None);
    assert_eq!(once, twice);
}

#[test]
fn login_hint_is_used_ahead_of_first_element() {
    let next = collection(&["a", "new"]);
    assert_eq!(
        resolve_selection(&next, None, Some("new")).as_deref(),
        Some("new")
    );
}
