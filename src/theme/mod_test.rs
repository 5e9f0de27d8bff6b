use super::*;

// =============================================================
// ThemePreference
// =============================================================

#[test]
fn default_preference_is_system() {
    assert_eq!(ThemePreference::default(), ThemePreference::System);
}

#[test]
fn wire_strings_parse_back() {
    for pref in ThemePreference::ALL {
        assert_eq!(pref.as_str().parse::<ThemePreference>().unwrap(), pref);
    }
}

#[test]
fn display_matches_wire_form() {
    assert_eq!(ThemePreference::Dark.to_string(), "dark");
    assert_eq!(ThemePreference::System.to_string(), "system");
}

#[test]
fn unknown_strings_are_rejected() {
    for raw in ["", "Dark", "LIGHT", "auto", " dark", "null"] {
        let err = raw.parse::<ThemePreference>().unwrap_err();
        assert_eq!(err, ParsePreferenceError(raw.to_string()));
    }
}

#[test]
fn serde_uses_lowercase_tags() {
    assert_eq!(serde_json::to_string(&ThemePreference::Light).unwrap(), "\"light\"");
    let parsed: ThemePreference = serde_json::from_str("\"system\"").unwrap();
    assert_eq!(parsed, ThemePreference::System);
}

// =============================================================
// is_dark
// =============================================================

#[test]
fn dark_preference_is_always_dark() {
    assert!(is_dark(ThemePreference::Dark, HostColorScheme::Light));
    assert!(is_dark(ThemePreference::Dark, HostColorScheme::Dark));
}

#[test]
fn light_preference_is_never_dark() {
    assert!(!is_dark(ThemePreference::Light, HostColorScheme::Light));
    assert!(!is_dark(ThemePreference::Light, HostColorScheme::Dark));
}

#[test]
fn system_preference_follows_host() {
    assert!(!is_dark(ThemePreference::System, HostColorScheme::Light));
    assert!(is_dark(ThemePreference::System, HostColorScheme::Dark));
}

#[test]
fn appearance_new_derives_flag() {
    let a = Appearance::new(ThemePreference::System, HostColorScheme::Dark);
    assert!(a.is_dark);
    assert_eq!(a.preference, ThemePreference::System);
    assert_eq!(a.host, HostColorScheme::Dark);
}

// =============================================================
// ThemeStoreError
// =============================================================

#[test]
fn corrupt_error_mentions_value() {
    let e = ThemeStoreError::StorageCorrupt { value: "purple".into() };
    assert!(e.to_string().contains("purple"));
}

#[test]
fn backend_corruption_converts_to_corrupt() {
    let e = ThemeStoreError::from(StorageError::Corrupt("storage.json: EOF".into()));
    assert!(matches!(e, ThemeStoreError::StorageCorrupt { .. }));
    let e = ThemeStoreError::from(StorageError::Io(std::io::Error::other("gone")));
    assert!(matches!(e, ThemeStoreError::StorageUnavailable(_)));
}

#[test]
fn timeout_error_mentions_duration() {
    let e = ThemeStoreError::SuspendTimeout { waited_ms: 250 };
    assert!(e.to_string().contains("250ms"));
}
