// tests/core_tests.rs
use inspect_core::{
    aggregate, reconcile_at, resolve_base_names, Conformance, ConfusionMatrix, Contribution,
    ExpectationModel, SnapshotRecord,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn board_totals() -> BTreeMap<String, i64> {
    BTreeMap::from([
        ("cap_b".to_string(), 2),
        ("fuse".to_string(), 1),
        ("MOV".to_string(), 6),
    ])
}

fn scenario_b_record() -> SnapshotRecord {
    let model = ExpectationModel::from_counts([("cap_b", 2)], &board_totals()).unwrap();
    reconcile_at(["cap_b", "cap_b", "cap_b_w"], &model, "20250601_101500")
}

#[test]
fn test_scenario_resolve_vocabulary() {
    let bases = resolve_base_names(["cap_b", "cap_b_w", "cap_b_n", "fuse"]).unwrap();
    assert_eq!(bases, vec!["cap_b", "fuse"]);
}

#[test]
fn test_scenario_reconcile() {
    let record = scenario_b_record();
    assert_eq!(record.ok_detected(), &BTreeMap::from([("cap_b".to_string(), 2)]));
    assert_eq!(record.not_ok_detected(), &BTreeMap::from([("cap_b".to_string(), 1)]));
    assert_eq!(record.expected_not_ok(), &BTreeMap::from([("cap_b".to_string(), 0)]));
}

#[test]
fn test_scenario_aggregate_single_record() {
    let matrix = aggregate([&scenario_b_record()]).unwrap();
    assert_eq!(matrix.as_rows(), [[2, 0], [1, 0]]);
    assert_eq!(matrix.get(Conformance::NotOk, Conformance::Ok), 1);
}

#[test]
fn test_scenario_empty_batch() {
    let matrix = aggregate(std::iter::empty::<&SnapshotRecord>()).unwrap();
    assert_eq!(matrix, ConfusionMatrix::default());
    assert_eq!(matrix.as_rows(), [[0, 0], [0, 0]]);
}

#[test]
fn test_aggregate_rejects_malformed_record() {
    let good = scenario_b_record();
    let bad: SnapshotRecord = serde_json::from_str(
        r#"{"timestamp": "bad", "expected": {"fuse": 1}, "expected_not_ok": {"fuse": 0},
            "ok_detected": {"fuse": 1, "MOV": 1}, "not_ok_detected": {"fuse": 0}}"#,
    )
    .unwrap();
    let err = aggregate([&good, &bad]).unwrap_err();
    assert!(err.to_string().contains("bad"));
}

#[test]
fn test_aggregate_rejects_overflowing_sums() {
    let record = |timestamp: &str| -> SnapshotRecord {
        serde_json::from_str(&format!(
            r#"{{"timestamp": "{}", "expected": {{"fuse": {}}}, "expected_not_ok": {{"fuse": 0}},
                "ok_detected": {{"fuse": 0}}, "not_ok_detected": {{"fuse": 0}}}}"#,
            timestamp,
            i64::MAX
        ))
        .unwrap()
    };
    let err = aggregate([&record("first"), &record("second")]).unwrap_err();
    assert!(err.to_string().contains("second"));
    assert!(err.to_string().contains("overflows"));
}

#[test]
fn test_overlapping_keys_are_summed_before_clipping() {
    let totals = BTreeMap::from([("fuse".to_string(), 1)]);
    // Over-detected in the first snapshot, under-detected in the second
    let first = reconcile_at(
        ["fuse", "fuse"],
        &ExpectationModel::from_counts([("fuse", 1)], &totals).unwrap(),
        "a",
    );
    let second = reconcile_at(
        Vec::<&str>::new(),
        &ExpectationModel::from_counts([("fuse", 1)], &totals).unwrap(),
        "b",
    );

    let together = aggregate([&first, &second]).unwrap();
    assert_eq!(together.true_positive(), 2);
    assert_eq!(together.false_negative(), 0);

    let separately = aggregate([&first]).unwrap() + aggregate([&second]).unwrap();
    assert_eq!(separately.true_positive(), 1);
    assert_eq!(separately.false_negative(), 1);
}

fn base_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9]{0,5}"
}

fn label_for(base: String) -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), Just("_w".to_string()), Just("_n".to_string())]
        .prop_map(move |suffix| format!("{}{}", base, suffix))
}

fn label() -> impl Strategy<Value = String> {
    base_name().prop_flat_map(label_for)
}

fn model_with_prefix(prefix: &'static str) -> impl Strategy<Value = ExpectationModel> {
    prop::collection::btree_map(base_name(), (0i64..10, 0i64..10), 0..5).prop_map(move |entries| {
        let totals: BTreeMap<String, i64> = entries
            .iter()
            .map(|(name, (_, total))| (format!("{}{}", prefix, name), *total))
            .collect();
        ExpectationModel::from_counts(
            entries
                .iter()
                .map(|(name, (ok, _))| (format!("{}{}", prefix, name), *ok)),
            &totals,
        )
        .unwrap()
    })
}

/// A model plus a frame that mixes tracked and untracked labels.
fn session(prefix: &'static str) -> impl Strategy<Value = (ExpectationModel, Vec<String>)> {
    model_with_prefix(prefix).prop_flat_map(|model| {
        let names: Vec<String> = model.names().map(str::to_string).collect();
        let tracked = if names.is_empty() {
            label().boxed()
        } else {
            prop::sample::select(names).prop_flat_map(label_for).boxed()
        };
        let frame = prop::collection::vec(prop_oneof![3 => tracked, 1 => label()], 0..20);
        (Just(model), frame)
    })
}

proptest! {
    #[test]
    fn prop_resolution_is_deterministic(vocabulary in prop::collection::vec(label(), 0..30)) {
        let first = resolve_base_names(&vocabulary).unwrap();
        let second = resolve_base_names(&vocabulary).unwrap();
        prop_assert_eq!(&first, &second);

        let mut sorted = first.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(&first, &sorted);

        for label in &vocabulary {
            let base = label.trim_end_matches("_w").trim_end_matches("_n");
            prop_assert_eq!(first.iter().filter(|b| b.as_str() == base).count(), 1);
        }
    }

    #[test]
    fn prop_record_keys_match_model((model, frame) in session("")) {
        let record = reconcile_at(&frame, &model, "t");
        let keys: Vec<&str> = model.names().collect();
        prop_assert_eq!(record.expected().keys().map(String::as_str).collect::<Vec<_>>(), keys.clone());
        prop_assert_eq!(record.expected_not_ok().keys().map(String::as_str).collect::<Vec<_>>(), keys.clone());
        prop_assert_eq!(record.ok_detected().keys().map(String::as_str).collect::<Vec<_>>(), keys.clone());
        prop_assert_eq!(record.not_ok_detected().keys().map(String::as_str).collect::<Vec<_>>(), keys);
        prop_assert!(record.validate().is_ok());
    }

    #[test]
    fn prop_ok_counts_are_exact((model, frame) in session("")) {
        let record = reconcile_at(&frame, &model, "t");
        for (name, count) in record.ok_detected() {
            let seen = frame.iter().filter(|label| *label == name).count() as i64;
            prop_assert_eq!(*count, seen);
        }
    }

    #[test]
    fn prop_contributions_follow_clipping_rule(
        expected_ok in -50i64..50,
        expected_not_ok in -50i64..50,
        detected_ok in -50i64..50,
        detected_not_ok in -50i64..50,
    ) {
        let c = Contribution::clip(expected_ok, expected_not_ok, detected_ok, detected_not_ok);
        prop_assert_eq!(c.true_positive as i64, detected_ok.min(expected_ok).max(0));
        prop_assert_eq!(c.false_negative as i64, (expected_ok - detected_ok).max(0));
        prop_assert_eq!(c.false_positive as i64, (detected_not_ok - expected_not_ok).max(0));
        prop_assert_eq!(c.true_negative as i64, detected_not_ok.min(expected_not_ok).max(0));
    }

    #[test]
    fn prop_aggregation_is_additive_over_disjoint_keys(
        (left_model, left_frame) in session("L"),
        (right_model, right_frame) in session("R"),
    ) {
        let left = reconcile_at(&left_frame, &left_model, "l");
        let right = reconcile_at(&right_frame, &right_model, "r");

        let combined = aggregate([&left, &right]).unwrap();
        let summed = aggregate([&left]).unwrap() + aggregate([&right]).unwrap();
        prop_assert_eq!(combined, summed);
    }
}
