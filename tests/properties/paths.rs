//! Property tests for relative path derivation.

use proptest::prelude::*;

use refsync::paths::{normalize, resolve_entry, root_relative};

fn dir_segments() -> impl Strategy<Value = String> {
    let segment = proptest::string::string_regex("[a-z][a-z0-9-]{0,8}").unwrap();
    proptest::collection::vec(segment, 1..=4).prop_map(|segments| segments.join("/"))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: normalization never panics on arbitrary input.
    #[test]
    fn property_normalize_never_panics(s in "(?s).{0,256}") {
        let _ = normalize(&s);
    }

    /// PROPERTY: a rendered relative entry resolves back to its target.
    #[test]
    fn property_relative_entry_round_trips(
        from in dir_segments(),
        to in dir_segments(),
    ) {
        let entry = root_relative(&from, &to);
        prop_assert_eq!(resolve_entry(&from, &entry), Some(to));
    }

    /// PROPERTY: resolution never panics, whatever the entry looks like.
    #[test]
    fn property_resolve_never_panics(
        from in dir_segments(),
        entry in "(?s).{0,128}",
    ) {
        let _ = resolve_entry(&from, &entry);
    }

    /// PROPERTY: clean root-relative directories normalize to themselves.
    #[test]
    fn property_clean_dirs_are_fixed_points(dir in dir_segments()) {
        prop_assert_eq!(normalize(&dir), Some(dir));
    }
}
