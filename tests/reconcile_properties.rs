use proptest::collection::btree_map;
use proptest::prelude::*;
use rask_logger_control::{InMemoryRegistry, Level, LevelMap};
use std::collections::BTreeMap;

fn logger_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("root".to_string()),
        "[a-d]{1,2}",
        "[a-d]{1,2}\\.[a-d]{1,2}",
    ]
}

fn level() -> impl Strategy<Value = Level> {
    prop_oneof![Just(Level::UNSET), (1u16..60).prop_map(Level::new)]
}

fn level_map() -> impl Strategy<Value = LevelMap> {
    btree_map(logger_name(), level(), 0..8).prop_map(|levels| LevelMap::try_from(levels).unwrap())
}

fn registry() -> impl Strategy<Value = InMemoryRegistry> {
    btree_map(logger_name(), level(), 0..8).prop_map(InMemoryRegistry::with_loggers)
}

proptest! {
    #[test]
    fn diff_round_trips_over_a_shared_name_universe(
        pairs in btree_map(logger_name(), (level(), level()), 0..10)
    ) {
        let base: BTreeMap<String, Level> = pairs.iter().map(|(n, (b, _))| (n.clone(), *b)).collect();
        let target: BTreeMap<String, Level> = pairs.iter().map(|(n, (_, t))| (n.clone(), *t)).collect();
        let base = LevelMap::try_from(base).unwrap();
        let target = LevelMap::try_from(target).unwrap();

        prop_assert_eq!(base.apply_diff(&target.diff(&base)), target);
    }

    #[test]
    fn apply_diff_resolves_every_target_name(base in level_map(), target in level_map()) {
        let rebuilt = base.apply_diff(&target.diff(&base));
        for (name, level) in target.iter() {
            prop_assert_eq!(rebuilt.resolve(name), level);
        }
    }

    #[test]
    fn diff_against_self_is_empty(target in level_map()) {
        prop_assert!(target.diff(&target).is_empty());
    }

    #[test]
    fn diff_entries_all_differ_from_base(base in level_map(), target in level_map()) {
        let diff = target.diff(&base);
        for (name, level) in diff.iter() {
            prop_assert_eq!(target.explicit(name), Some(level));
            prop_assert_ne!(base.resolve(name), level);
        }
    }

    #[test]
    fn chained_diffs_compose(base in level_map(), first in level_map(), target in level_map()) {
        let intermediate = base.apply_diff(&first);
        let second = target.diff(&intermediate);

        prop_assert_eq!(
            intermediate.apply_diff(&second),
            base.apply_diff(&first.apply_diff(&second))
        );
    }

    #[test]
    fn apply_diff_leaves_inputs_untouched(base in level_map(), diff in level_map()) {
        let (base_before, diff_before) = (base.clone(), diff.clone());
        let _ = base.apply_diff(&diff);
        prop_assert_eq!(base, base_before);
        prop_assert_eq!(diff, diff_before);
    }

    #[test]
    fn apply_is_idempotent(mut live in registry(), candidate in level_map()) {
        candidate.apply(&mut live).unwrap();
        let once = LevelMap::from_registry(&live);

        let report = candidate.apply(&mut live).unwrap();
        prop_assert!(report.is_noop());
        prop_assert_eq!(LevelMap::from_registry(&live), once);
    }

    #[test]
    fn would_change_is_false_exactly_when_apply_is_a_noop(
        live in registry(),
        candidate in level_map()
    ) {
        let predicted = candidate.would_make_changes(&live);

        let mut applied = live.clone();
        let before = LevelMap::from_registry(&applied);
        candidate.apply(&mut applied).unwrap();
        let after = LevelMap::from_registry(&applied);

        prop_assert_eq!(predicted, before != after);
    }

    #[test]
    fn applied_map_is_reflected_by_snapshot(mut live in registry(), candidate in level_map()) {
        candidate.apply(&mut live).unwrap();
        let snapshot = LevelMap::from_registry(&live);

        prop_assert!(snapshot.contains("root"));
        for (name, level) in snapshot.iter() {
            prop_assert_eq!(candidate.resolve(name), level);
        }
        for name in candidate.names() {
            prop_assert!(snapshot.contains(name));
        }
    }
}
