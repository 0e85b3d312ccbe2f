use crate::{Profile, ProfileId};

/// Picks the profile id that should be selected after `profiles` replaced the
/// previous collection.
///
/// Priority: `hint` (a freshly logged-in profile), then the `previous`
/// selection, then the first profile. An empty collection always yields `None`.
pub fn resolve_selection(
    profiles: &[Profile],
    previous: Option<&str>,
    hint: Option<&str>,
) -> Option<ProfileId> {
    let find = |id: Option<&str>| id.and_then(|id| profiles.iter().find(|p| p.id == id));

    find(hint)
        .or_else(|| find(previous))
        .or_else(|| profiles.first())
        .map(|p| p.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profiles(ids: &[&str]) -> Vec<Profile> {
        ids.iter().map(|id| Profile::new(*id, id.to_uppercase())).collect()
    }

    #[test]
    fn hint_wins_over_previous_selection() {
        let ps = profiles(&["a", "b", "c"]);
        assert_eq!(
            resolve_selection(&ps, Some("a"), Some("c")).as_deref(),
            Some("c")
        );
    }

    #[test]
    fn missing_hint_falls_through_to_previous() {
        let ps = profiles(&["a", "b"]);
        assert_eq!(
            resolve_selection(&ps, Some("b"), Some("zz")).as_deref(),
            Some("b")
        );
    }
}
