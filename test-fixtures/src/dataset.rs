//! A small synthetic hospital dataset: PATIENTS -> ADMISSIONS -> LABEVENTS.
//!
//! Laid out for prediction-time windows measured from admission: every
//! admission has lab events inside its first 48 hours, and two admissions
//! also carry an event at +49h that must stay invisible under a 48h cutoff.

use chrono::{DateTime, Duration, TimeZone, Utc};

use clinsight_core::models::{CutoffTimes, EntitySchema, RelationshipSpec};
use clinsight_core::table::{Column, ColumnType, Table, Value};

use crate::store::InMemoryStore;

/// Admission time of `a1`; `a2` and `a3` follow at one-month steps.
pub fn base_admit_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub fn hours_after(base: DateTime<Utc>, hours: i64) -> DateTime<Utc> {
    base + Duration::hours(hours)
}

fn admit_times() -> [DateTime<Utc>; 3] {
    let base = base_admit_time();
    [
        base,
        base + Duration::days(31),
        base + Duration::days(60),
    ]
}

fn text(values: &[&str]) -> Vec<Value> {
    values.iter().map(|v| Value::Text((*v).to_string())).collect()
}

fn numbers(values: &[f64]) -> Vec<Value> {
    values.iter().map(|v| Value::Number(*v)).collect()
}

/// Two patients, three admissions, eight lab events.
///
/// `p1` owns admissions `a1` and `a2`; `p2` owns `a3`. Lab events per
/// admission (offsets from that admission's admit time):
///
/// | row | admission | offset | item  | value |
/// |-----|-----------|--------|-------|-------|
/// | l1  | a1        | +1h    | CREAT | 1.0   |
/// | l2  | a1        | +47h   | CREAT | 2.0   |
/// | l3  | a1        | +2h    | GLUC  | 100.0 |
/// | l4  | a1        | +49h   | CREAT | 9.0   |
/// | l5  | a2        | +1h    | CREAT | 3.0   |
/// | l6  | a2        | +2h    | GLUC  | 110.0 |
/// | l7  | a3        | +1h    | GLUC  | 120.0 |
/// | l8  | a3        | +49h   | GLUC  | 999.0 |
pub fn hospital_demo_store() -> InMemoryStore {
    let [t1, t2, t3] = admit_times();

    let patients = Table::new(
        "PATIENTS",
        vec![
            Column::new("SUBJECT_ID", ColumnType::Categorical, text(&["p1", "p2"])),
            Column::new("GENDER", ColumnType::Categorical, text(&["F", "M"])),
            Column::new("AGE", ColumnType::Numeric, numbers(&[63.0, 71.0])),
        ],
    )
    .unwrap();

    let admissions = Table::new(
        "ADMISSIONS",
        vec![
            Column::new("HADM_ID", ColumnType::Categorical, text(&["a1", "a2", "a3"])),
            Column::new("SUBJECT_ID", ColumnType::Categorical, text(&["p1", "p1", "p2"])),
            Column::new(
                "ADMITTIME",
                ColumnType::Datetime,
                vec![
                    Value::Timestamp(t1),
                    Value::Timestamp(t2),
                    Value::Timestamp(t3),
                ],
            ),
        ],
    )
    .unwrap();

    let lab_times = vec![
        Value::Timestamp(hours_after(t1, 1)),
        Value::Timestamp(hours_after(t1, 47)),
        Value::Timestamp(hours_after(t1, 2)),
        Value::Timestamp(hours_after(t1, 49)),
        Value::Timestamp(hours_after(t2, 1)),
        Value::Timestamp(hours_after(t2, 2)),
        Value::Timestamp(hours_after(t3, 1)),
        Value::Timestamp(hours_after(t3, 49)),
    ];
    let labevents = Table::new(
        "LABEVENTS",
        vec![
            Column::new(
                "ROW_ID",
                ColumnType::Categorical,
                text(&["l1", "l2", "l3", "l4", "l5", "l6", "l7", "l8"]),
            ),
            Column::new(
                "HADM_ID",
                ColumnType::Categorical,
                text(&["a1", "a1", "a1", "a1", "a2", "a2", "a3", "a3"]),
            ),
            Column::new("CHARTTIME", ColumnType::Datetime, lab_times),
            Column::new(
                "ITEMID",
                ColumnType::Categorical,
                text(&[
                    "CREAT", "CREAT", "GLUC", "CREAT", "CREAT", "GLUC", "GLUC", "GLUC",
                ]),
            ),
            Column::new(
                "VALUENUM",
                ColumnType::Numeric,
                numbers(&[1.0, 2.0, 100.0, 9.0, 3.0, 110.0, 120.0, 999.0]),
            ),
        ],
    )
    .unwrap();

    let mut store = InMemoryStore::new();
    store.add_entity(
        EntitySchema {
            name: "PATIENTS".to_string(),
            index_column: "SUBJECT_ID".to_string(),
            time_index: None,
            item_index: None,
            value_columns: vec!["AGE".to_string()],
            categorical_columns: vec!["GENDER".to_string()],
        },
        patients,
    );
    store.add_entity(
        EntitySchema {
            name: "ADMISSIONS".to_string(),
            index_column: "HADM_ID".to_string(),
            time_index: Some("ADMITTIME".to_string()),
            item_index: None,
            value_columns: Vec::new(),
            categorical_columns: Vec::new(),
        },
        admissions,
    );
    store.add_entity(
        EntitySchema {
            name: "LABEVENTS".to_string(),
            index_column: "ROW_ID".to_string(),
            time_index: Some("CHARTTIME".to_string()),
            item_index: Some("ITEMID".to_string()),
            value_columns: vec!["VALUENUM".to_string()],
            categorical_columns: Vec::new(),
        },
        labevents,
    );
    store.add_relationship(RelationshipSpec::new(
        "PATIENTS",
        "SUBJECT_ID",
        "ADMISSIONS",
        "SUBJECT_ID",
    ));
    store.add_relationship(RelationshipSpec::new(
        "ADMISSIONS",
        "HADM_ID",
        "LABEVENTS",
        "HADM_ID",
    ));
    store
}

/// Cutoff times for all three admissions at `hours` past each admit time.
pub fn admission_cutoffs(hours: i64) -> CutoffTimes {
    let [t1, t2, t3] = admit_times();
    [("a1", t1), ("a2", t2), ("a3", t3)]
        .into_iter()
        .map(|(id, t)| (id.to_string(), hours_after(t, hours)))
        .collect()
}
