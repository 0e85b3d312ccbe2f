use glyph_core::{is_blocked, Readiness, WizardStep};

fn all_readiness() -> Vec<Readiness> {
    let mut out = Vec::new();
    for profile_selected in [false, true] {
        for has_profiles in [false, true] {
            for runtime_ready in [false, true] {
                out.push(Readiness {
                    profile_selected,
                    has_profiles,
                    runtime_ready,
                });
            }
        }
    }
    out
}

#[test]
fn gating_table_holds_for_every_combination() {
    for r in all_readiness() {
        assert!(!is_blocked(Some(WizardStep::Welcome), r), "{r:?}");
        assert!(!is_blocked(Some(WizardStep::Theme), r), "{r:?}");
        assert!(!is_blocked(Some(WizardStep::Complete), r), "{r:?}");
        assert_eq!(
            is_blocked(Some(WizardStep::Account), r),
            !(r.profile_selected && r.has_profiles),
            "{r:?}"
        );
        assert_eq!(
            is_blocked(Some(WizardStep::Runtime), r),
            !r.runtime_ready,
            "{r:?}"
        );
        assert!(is_blocked(None, r), "{r:?}");
    }
}

#[test]
fn locations_round_trip_through_step_lookup() {
    for step in WizardStep::ALL {
        assert_eq!(WizardStep::from_location(step.location()), Ok(step));
    }
}

#[test]
fn unmatched_location_is_an_explicit_error() {
    let err = WizardStep::from_location("#/onboarding/unknown").unwrap_err();
    assert_eq!(err.0, "#/onboarding/unknown");
    assert!(WizardStep::from_location("").is_err());
    assert!(WizardStep::from_location("#/onboarding/").is_err());
}

#[test]
fn sequence_boundaries() {
    assert_eq!(WizardStep::Welcome.previous(), None);
    assert_eq!(WizardStep::Complete.next(), None);
    assert_eq!(WizardStep::Account.next(), Some(WizardStep::Runtime));
    assert_eq!(WizardStep::Account.previous(), Some(WizardStep::Theme));
    assert!(WizardStep::Welcome.is_first());
    assert!(WizardStep::Complete.is_last());
}
