// tests/exclusion_properties.rs

use proptest::prelude::*;
use watcher_daemon::scan::ExclusionMatcher;

// Path segments built from a small alphabet so rules and paths collide often.
fn segment() -> impl Strategy<Value = String> {
    "[a-c]{1,3}"
}

fn path_strategy() -> impl Strategy<Value = (String, String)> {
    (proptest::collection::vec(segment(), 0..3), segment()).prop_map(|(dirs, stem)| {
        let name = format!("{stem}.go");
        let mut parts = dirs;
        parts.push(name.clone());
        (parts.join("/"), name)
    })
}

// Literal rules plus a few always-valid patterns.
fn rule_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        segment(),
        segment().prop_map(|s| format!("{s}.go")),
        segment().prop_map(|s| format!("{s}/.*")),
        segment().prop_map(|s| format!("^{s}[a-c]*/")),
    ]
}

proptest! {
    #[test]
    fn evaluation_is_idempotent(
        rules in proptest::collection::vec(rule_strategy(), 0..5),
        (path, name) in path_strategy(),
    ) {
        let matcher = ExclusionMatcher::new(&rules);
        let first = matcher.is_excluded(&path, &name).unwrap();
        let second = matcher.is_excluded(&path, &name).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn rule_order_does_not_matter(
        rules in proptest::collection::vec(rule_strategy(), 0..5),
        (path, name) in path_strategy(),
    ) {
        let forward = ExclusionMatcher::new(&rules);
        let mut reversed_rules = rules.clone();
        reversed_rules.reverse();
        let reversed = ExclusionMatcher::new(&reversed_rules);

        prop_assert_eq!(
            forward.is_excluded(&path, &name).unwrap(),
            reversed.is_excluded(&path, &name).unwrap()
        );
    }

    #[test]
    fn excluded_iff_some_single_rule_excludes(
        rules in proptest::collection::vec(rule_strategy(), 0..5),
        (path, name) in path_strategy(),
    ) {
        let combined = ExclusionMatcher::new(&rules).is_excluded(&path, &name).unwrap();
        let any_single = rules
            .iter()
            .any(|r| ExclusionMatcher::new([r]).is_excluded(&path, &name).unwrap());
        prop_assert_eq!(combined, any_single);
    }

    #[test]
    fn file_name_rule_always_excludes_its_file((path, name) in path_strategy()) {
        let matcher = ExclusionMatcher::new([name.as_str()]);
        prop_assert!(matcher.is_excluded(&path, &name).unwrap());
    }
}
