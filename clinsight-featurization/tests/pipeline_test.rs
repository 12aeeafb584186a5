//! Feature generation over the hospital demo dataset.
//!
//! Target entity is ADMISSIONS with cutoffs at admit-time + 48h unless a
//! test sets its own.

use std::sync::Arc;

use chrono::Duration;

use clinsight_core::cancel::CancelToken;
use clinsight_core::config::FeaturizationConfig;
use clinsight_core::errors::{ClinsightError, FeaturizationError};
use clinsight_core::models::{AggregationKind, CutoffTimes, EntitySchema, RelationshipSpec};
use clinsight_core::table::{Column, ColumnType, Table, Value};
use clinsight_featurization::{FeaturizationEngine, SelectionPreset, SourceSpec};
use clinsight_graph::builder;
use test_fixtures::{
    admission_cutoffs, base_admit_time, hospital_demo_store, hours_after, InMemoryStore,
};

fn engine() -> FeaturizationEngine {
    engine_with(FeaturizationConfig::default())
}

fn engine_with(config: FeaturizationConfig) -> FeaturizationEngine {
    let store = hospital_demo_store();
    let graph = builder::build(&store).unwrap();
    FeaturizationEngine::new(Arc::new(store), Arc::new(graph), config)
}

fn mean_only(entity: &str) -> SourceSpec {
    SourceSpec {
        entity: entity.to_string(),
        aggregations: vec![AggregationKind::Mean],
        where_aggregations: Vec::new(),
    }
}

fn num(v: Option<&Value>) -> f64 {
    match v {
        Some(Value::Number(n)) => *n,
        other => panic!("expected a number, got {other:?}"),
    }
}

// ==== leakage invariant and the 48h scenario ====

#[test]
fn rows_after_the_cutoff_never_reach_an_aggregate() {
    let engine = engine();
    let cancel = CancelToken::new();
    let sources = [mean_only("LABEVENTS")];

    // At +48h the +49h lab row (value 9.0) is invisible for a1.
    let at_48 = engine
        .generate_features(
            "ADMISSIONS",
            &sources,
            &admission_cutoffs(48),
            SelectionPreset::Permissive,
            &cancel,
        )
        .unwrap();
    let mean_48 = num(at_48.matrix.get("a1", "MEAN(LABEVENTS.VALUENUM)"));
    assert!((mean_48 - (1.0 + 2.0 + 100.0) / 3.0).abs() < 1e-9);

    // At +49h it becomes visible and shifts the mean.
    let at_49 = engine
        .generate_features(
            "ADMISSIONS",
            &sources,
            &admission_cutoffs(49),
            SelectionPreset::Permissive,
            &cancel,
        )
        .unwrap();
    let mean_49 = num(at_49.matrix.get("a1", "MEAN(LABEVENTS.VALUENUM)"));
    assert!((mean_49 - 28.0).abs() < 1e-9);
}

#[test]
fn cutoff_boundary_is_inclusive_and_one_second_matters() {
    let engine = engine();
    let cancel = CancelToken::new();
    let sources = [mean_only("LABEVENTS")];
    let first_lab_time = hours_after(base_admit_time(), 1);

    // Cutoff exactly at the first lab row's charttime: that row counts.
    let mut at_boundary = CutoffTimes::new();
    at_boundary.insert("a1", first_lab_time);
    let generated = engine
        .generate_features(
            "ADMISSIONS",
            &sources,
            &at_boundary,
            SelectionPreset::Permissive,
            &cancel,
        )
        .unwrap();
    assert_eq!(
        generated.matrix.get("a1", "MEAN(LABEVENTS.VALUENUM)"),
        Some(&Value::Number(1.0))
    );

    // One second earlier: empty window, mean undefined for every instance,
    // so the all-null column is pruned by selection.
    let mut just_before = CutoffTimes::new();
    just_before.insert("a1", first_lab_time - Duration::seconds(1));
    let generated = engine
        .generate_features(
            "ADMISSIONS",
            &sources,
            &just_before,
            SelectionPreset::Permissive,
            &cancel,
        )
        .unwrap();
    assert!(!generated.matrix.contains_column("MEAN(LABEVENTS.VALUENUM)"));
}

#[test]
fn sibling_cutoffs_never_widen_an_instances_window() {
    // A patient-level vitals table makes the path climb from ADMISSIONS to
    // PATIENTS before fanning back out, so the reduced patient cutoff is the
    // later admission's. The earlier admission must still be bounded by its
    // own cutoff.
    let mut store = hospital_demo_store();
    let t1 = base_admit_time();
    let vitals = Table::new(
        "VITALS",
        vec![
            Column::new(
                "ROW_ID",
                ColumnType::Categorical,
                vec![Value::Text("v1".to_string())],
            ),
            Column::new(
                "SUBJECT_ID",
                ColumnType::Categorical,
                vec![Value::Text("p1".to_string())],
            ),
            Column::new(
                "CHARTTIME",
                ColumnType::Datetime,
                vec![Value::Timestamp(t1 + Duration::days(10))],
            ),
            Column::new("HEARTRATE", ColumnType::Numeric, vec![Value::Number(120.0)]),
        ],
    )
    .unwrap();
    store.add_entity(
        EntitySchema {
            name: "VITALS".to_string(),
            index_column: "ROW_ID".to_string(),
            time_index: Some("CHARTTIME".to_string()),
            item_index: None,
            value_columns: vec!["HEARTRATE".to_string()],
            categorical_columns: Vec::new(),
        },
        vitals,
    );
    store.add_relationship(RelationshipSpec::new(
        "PATIENTS",
        "SUBJECT_ID",
        "VITALS",
        "SUBJECT_ID",
    ));
    let graph = builder::build(&store).unwrap();
    let engine = FeaturizationEngine::new(
        Arc::new(store),
        Arc::new(graph),
        FeaturizationConfig::default(),
    );

    // a1's +48h cutoff predates the +10d vitals row; a2's does not.
    let generated = engine
        .generate_features(
            "ADMISSIONS",
            &[mean_only("VITALS")],
            &admission_cutoffs(48),
            SelectionPreset::Permissive,
            &CancelToken::new(),
        )
        .unwrap();
    assert_eq!(
        generated.matrix.get("a1", "MEAN(VITALS.HEARTRATE)"),
        Some(&Value::Null)
    );
    let a2_mean = num(generated.matrix.get("a2", "MEAN(VITALS.HEARTRATE)"));
    assert!((a2_mean - 120.0).abs() < 1e-9);
}

// ==== WHERE variants and redundancy pruning ====

#[test]
fn unfiltered_feature_shadowed_by_where_variants_is_pruned() {
    let engine = engine();
    let cancel = CancelToken::new();
    let sources = [SourceSpec::new(
        "LABEVENTS",
        vec![AggregationKind::Mean],
    )];

    let generated = engine
        .generate_features(
            "ADMISSIONS",
            &sources,
            &admission_cutoffs(48),
            SelectionPreset::Permissive,
            &cancel,
        )
        .unwrap();

    assert!(!generated.matrix.contains_column("MEAN(LABEVENTS.VALUENUM)"));
    assert!(generated
        .matrix
        .contains_column("MEAN(LABEVENTS.VALUENUM) WHERE ITEMID = CREAT"));
    assert!(generated
        .matrix
        .contains_column("MEAN(LABEVENTS.VALUENUM) WHERE ITEMID = GLUC"));
    // Descriptors track the matrix exactly.
    let ids: Vec<&str> = generated.descriptors.iter().map(|d| d.id.as_str()).collect();
    assert!(!ids.contains(&"MEAN(LABEVENTS.VALUENUM)"));
    assert!(ids.contains(&"MEAN(LABEVENTS.VALUENUM) WHERE ITEMID = CREAT"));

    let creat_mean = num(
        generated
            .matrix
            .get("a1", "MEAN(LABEVENTS.VALUENUM) WHERE ITEMID = CREAT"),
    );
    assert!((creat_mean - 1.5).abs() < 1e-9);
}

#[test]
fn where_items_truncate_by_frequency_then_item_id() {
    let t0 = base_admit_time();
    let encounters = Table::new(
        "ENCOUNTERS",
        vec![
            Column::new(
                "ENC_ID",
                ColumnType::Categorical,
                vec![Value::Text("e1".to_string())],
            ),
            Column::new("START", ColumnType::Datetime, vec![Value::Timestamp(t0)]),
        ],
    )
    .unwrap();
    let items = ["ZZZ", "ZZZ", "ZZZ", "MMM", "MMM", "NNN", "NNN", "AAA"];
    let events = Table::new(
        "EVENTS",
        vec![
            Column::new(
                "ROW_ID",
                ColumnType::Categorical,
                (1..=8).map(|i| Value::Text(format!("r{i}"))).collect(),
            ),
            Column::new(
                "ENC_ID",
                ColumnType::Categorical,
                vec![Value::Text("e1".to_string()); 8],
            ),
            Column::new(
                "CHARTTIME",
                ColumnType::Datetime,
                vec![Value::Timestamp(hours_after(t0, 1)); 8],
            ),
            Column::new(
                "ITEMID",
                ColumnType::Categorical,
                items.iter().map(|i| Value::Text((*i).to_string())).collect(),
            ),
            Column::new(
                "VAL",
                ColumnType::Numeric,
                (1..=8).map(|i| Value::Number(i as f64)).collect(),
            ),
        ],
    )
    .unwrap();

    let mut store = InMemoryStore::new();
    store.add_entity(
        EntitySchema {
            name: "ENCOUNTERS".to_string(),
            index_column: "ENC_ID".to_string(),
            time_index: Some("START".to_string()),
            item_index: None,
            value_columns: Vec::new(),
            categorical_columns: Vec::new(),
        },
        encounters,
    );
    store.add_entity(
        EntitySchema {
            name: "EVENTS".to_string(),
            index_column: "ROW_ID".to_string(),
            time_index: Some("CHARTTIME".to_string()),
            item_index: Some("ITEMID".to_string()),
            value_columns: vec!["VAL".to_string()],
            categorical_columns: Vec::new(),
        },
        events,
    );
    store.add_relationship(RelationshipSpec::new(
        "ENCOUNTERS", "ENC_ID", "EVENTS", "ENC_ID",
    ));
    let graph = builder::build(&store).unwrap();
    let engine = FeaturizationEngine::new(
        Arc::new(store),
        Arc::new(graph),
        FeaturizationConfig {
            max_features: 2,
            ..FeaturizationConfig::default()
        },
    );

    let mut cutoffs = CutoffTimes::new();
    cutoffs.insert("e1", hours_after(t0, 48));
    let generated = engine
        .generate_features(
            "ENCOUNTERS",
            &[SourceSpec::new("EVENTS", vec![AggregationKind::Mean])],
            &cutoffs,
            SelectionPreset::Permissive,
            &CancelToken::new(),
        )
        .unwrap();

    // ZZZ (3 rows) outranks both 2-row items; MMM beats NNN on the id tie;
    // NNN and AAA fall past the 2-item limit.
    let columns: Vec<&str> = generated.matrix.column_names().collect();
    let zzz = columns
        .iter()
        .position(|c| *c == "MEAN(EVENTS.VAL) WHERE ITEMID = ZZZ")
        .unwrap();
    let mmm = columns
        .iter()
        .position(|c| *c == "MEAN(EVENTS.VAL) WHERE ITEMID = MMM")
        .unwrap();
    assert!(zzz < mmm);
    assert!(!generated
        .matrix
        .contains_column("MEAN(EVENTS.VAL) WHERE ITEMID = NNN"));
    assert!(!generated
        .matrix
        .contains_column("MEAN(EVENTS.VAL) WHERE ITEMID = AAA"));
}

// ==== direct features over forward paths ====

#[test]
fn forward_paths_copy_parent_attributes_directly() {
    let engine = engine();
    let cancel = CancelToken::new();
    let sources = [mean_only("PATIENTS")];

    let generated = engine
        .generate_features(
            "ADMISSIONS",
            &sources,
            &admission_cutoffs(48),
            SelectionPreset::Default,
            &cancel,
        )
        .unwrap();

    assert_eq!(
        generated.matrix.get("a1", "PATIENTS.GENDER"),
        Some(&Value::Text("F".to_string()))
    );
    assert_eq!(
        generated.matrix.get("a2", "PATIENTS.AGE"),
        Some(&Value::Number(63.0))
    );
    assert_eq!(
        generated.matrix.get("a3", "PATIENTS.GENDER"),
        Some(&Value::Text("M".to_string()))
    );
    // Direct features carry no primitive.
    let gender = generated
        .descriptors
        .iter()
        .find(|d| d.id == "PATIENTS.GENDER")
        .unwrap();
    assert_eq!(gender.primitive, None);
}

// ==== failure policy ====

#[test]
fn unknown_source_entity_fails_the_whole_request() {
    let engine = engine();
    let cancel = CancelToken::new();
    let sources = [mean_only("LABEVENTS"), mean_only("ICUSTAYS")];

    let err = engine
        .generate_features(
            "ADMISSIONS",
            &sources,
            &admission_cutoffs(48),
            SelectionPreset::Default,
            &cancel,
        )
        .unwrap_err();

    assert!(matches!(
        err,
        ClinsightError::Featurization(FeaturizationError::UnreachableEntity { .. })
    ));
}

#[test]
fn paths_beyond_max_depth_are_rejected() {
    let engine = engine_with(FeaturizationConfig {
        max_depth: 1,
        ..FeaturizationConfig::default()
    });
    let cancel = CancelToken::new();

    // PATIENTS -> ADMISSIONS -> LABEVENTS is two hops.
    let mut cutoffs = CutoffTimes::new();
    cutoffs.insert("p1", hours_after(base_admit_time(), 48));
    let err = engine
        .generate_features(
            "PATIENTS",
            &[mean_only("LABEVENTS")],
            &cutoffs,
            SelectionPreset::Default,
            &cancel,
        )
        .unwrap_err();

    assert!(matches!(
        err,
        ClinsightError::Featurization(FeaturizationError::PathTooDeep { .. })
    ));
}

#[test]
fn empty_source_list_is_rejected() {
    let engine = engine();
    let err = engine
        .generate_features(
            "ADMISSIONS",
            &[],
            &admission_cutoffs(48),
            SelectionPreset::Default,
            &CancelToken::new(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ClinsightError::Featurization(FeaturizationError::EmptySourceList)
    ));
}

#[test]
fn cancelled_token_aborts_before_any_work() {
    let engine = engine();
    let cancel = CancelToken::new();
    cancel.cancel();

    let err = engine
        .generate_features(
            "ADMISSIONS",
            &[mean_only("LABEVENTS")],
            &admission_cutoffs(48),
            SelectionPreset::Default,
            &cancel,
        )
        .unwrap_err();
    assert!(matches!(err, ClinsightError::Cancelled));
}
