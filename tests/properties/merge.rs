//! Property tests for the reference merge policy.

use proptest::prelude::*;

use refsync::paths::root_relative;
use refsync::sync::profile::merge;

fn dir_segments() -> impl Strategy<Value = String> {
    let segment = proptest::string::string_regex("[a-z][a-z0-9-]{0,8}").unwrap();
    proptest::collection::vec(segment, 1..=3).prop_map(|segments| segments.join("/"))
}

/// Canonical reference entries rendered from a fixed source directory
fn computed_entries(from: &'static str) -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(dir_segments(), 0..4)
        .prop_map(move |targets| targets.iter().map(|t| root_relative(from, t)).collect())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: merging never panics, whatever is on disk.
    #[test]
    fn property_merge_never_panics(
        computed in computed_entries("packages/core"),
        current in proptest::collection::vec("(?s).{0,64}", 0..6),
    ) {
        let _ = merge("packages/core", &computed, &current);
    }

    /// PROPERTY: the computed list is always a prefix of the result.
    #[test]
    fn property_computed_entries_lead(
        computed in computed_entries("packages/core"),
        current in proptest::collection::vec("[a-z./-]{1,32}", 0..6),
    ) {
        let (desired, extras) = merge("packages/core", &computed, &current);
        prop_assert_eq!(&desired[..computed.len()], &computed[..]);
        prop_assert_eq!(&desired[computed.len()..], &extras[..]);
    }

    /// PROPERTY: merging is idempotent - a merged list merges to itself.
    #[test]
    fn property_merge_is_idempotent(
        computed in computed_entries("packages/core"),
        current in proptest::collection::vec("[a-z./-]{1,32}", 0..6),
    ) {
        let (desired, _) = merge("packages/core", &computed, &current);
        let (again, _) = merge("packages/core", &computed, &desired);
        prop_assert_eq!(again, desired);
    }

    /// PROPERTY: extras are sorted and deduplicated.
    #[test]
    fn property_extras_sorted_and_unique(
        computed in computed_entries("packages/core"),
        current in proptest::collection::vec("[a-z./-]{1,32}", 0..6),
    ) {
        let (_, extras) = merge("packages/core", &computed, &current);
        let mut expected = extras.clone();
        expected.sort();
        expected.dedup();
        prop_assert_eq!(extras, expected);
    }
}
