//! Feature expression trees.
//!
//! A feature resolves to leaf columns of exactly one entity; spanning more
//! than one entity is an error, never silently resolved by picking the first.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::FeaturizationError;

/// Aggregation primitive applied over an instance's observable rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregationKind {
    Mean,
    Std,
    Trend,
    Count,
}

impl AggregationKind {
    pub const ALL: [AggregationKind; 4] = [
        AggregationKind::Mean,
        AggregationKind::Std,
        AggregationKind::Trend,
        AggregationKind::Count,
    ];

    /// Upper-case label used in canonical feature names.
    pub fn label(&self) -> &'static str {
        match self {
            AggregationKind::Mean => "MEAN",
            AggregationKind::Std => "STD",
            AggregationKind::Trend => "TREND",
            AggregationKind::Count => "COUNT",
        }
    }
}

impl fmt::Display for AggregationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AggregationKind {
    type Err = FeaturizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mean" => Ok(AggregationKind::Mean),
            "std" => Ok(AggregationKind::Std),
            "trend" => Ok(AggregationKind::Trend),
            "count" => Ok(AggregationKind::Count),
            other => Err(FeaturizationError::UnknownAggregation {
                value: other.to_string(),
            }),
        }
    }
}

/// Tagged feature-expression tree: leaf column reference, aggregation over
/// leaves, or item-filtered aggregation over leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureExpr {
    Leaf {
        entity: String,
        column: String,
    },
    Aggregate {
        kind: AggregationKind,
        bases: Vec<FeatureExpr>,
    },
    FilteredAggregate {
        kind: AggregationKind,
        bases: Vec<FeatureExpr>,
        item_column: String,
        item_value: String,
    },
}

impl FeatureExpr {
    /// All `(entity, column)` leaves, collected by iterative traversal.
    pub fn leaves(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            match expr {
                FeatureExpr::Leaf { entity, column } => {
                    out.push((entity.as_str(), column.as_str()))
                }
                FeatureExpr::Aggregate { bases, .. }
                | FeatureExpr::FilteredAggregate { bases, .. } => {
                    // Reverse so leaves come out in declaration order.
                    stack.extend(bases.iter().rev());
                }
            }
        }
        out
    }
}

/// A named derived column with its resolved expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub expr: FeatureExpr,
}

impl Feature {
    /// Direct (unaggregated) copy of one column, e.g. `PATIENTS.GENDER`.
    pub fn direct(entity: &str, column: &str) -> Self {
        Self {
            name: format!("{entity}.{column}"),
            expr: FeatureExpr::Leaf {
                entity: entity.to_string(),
                column: column.to_string(),
            },
        }
    }

    /// Aggregation over one column, e.g. `MEAN(LABEVENTS.VALUE)`.
    ///
    /// Trend-style primitives pass the entity's time index as `time_column`,
    /// which joins the base list but not the display name.
    pub fn aggregate(
        kind: AggregationKind,
        entity: &str,
        column: &str,
        time_column: Option<&str>,
    ) -> Self {
        Self {
            name: format!("{kind}({entity}.{column})"),
            expr: FeatureExpr::Aggregate {
                kind,
                bases: Self::bases(entity, column, time_column),
            },
        }
    }

    /// Item-filtered aggregation, e.g.
    /// `MEAN(LABEVENTS.VALUE) WHERE ITEMID = 50912`.
    pub fn filtered(
        kind: AggregationKind,
        entity: &str,
        column: &str,
        time_column: Option<&str>,
        item_column: &str,
        item_value: &str,
    ) -> Self {
        Self {
            name: format!("{kind}({entity}.{column}) WHERE {item_column} = {item_value}"),
            expr: FeatureExpr::FilteredAggregate {
                kind,
                bases: Self::bases(entity, column, time_column),
                item_column: item_column.to_string(),
                item_value: item_value.to_string(),
            },
        }
    }

    fn bases(entity: &str, column: &str, time_column: Option<&str>) -> Vec<FeatureExpr> {
        let mut bases = vec![FeatureExpr::Leaf {
            entity: entity.to_string(),
            column: column.to_string(),
        }];
        if let Some(time_col) = time_column {
            bases.push(FeatureExpr::Leaf {
                entity: entity.to_string(),
                column: time_col.to_string(),
            });
        }
        bases
    }

    pub fn kind(&self) -> Option<AggregationKind> {
        match &self.expr {
            FeatureExpr::Leaf { .. } => None,
            FeatureExpr::Aggregate { kind, .. } | FeatureExpr::FilteredAggregate { kind, .. } => {
                Some(*kind)
            }
        }
    }

    pub fn is_filtered(&self) -> bool {
        matches!(self.expr, FeatureExpr::FilteredAggregate { .. })
    }

    /// `(item_column, item_value)` of the WHERE filter, if any.
    pub fn filter_item(&self) -> Option<(&str, &str)> {
        match &self.expr {
            FeatureExpr::FilteredAggregate {
                item_column,
                item_value,
                ..
            } => Some((item_column, item_value)),
            _ => None,
        }
    }

    /// The single entity all leaves belong to.
    pub fn owning_entity(&self) -> Result<&str, FeaturizationError> {
        let entities: BTreeSet<&str> = self.expr.leaves().iter().map(|(e, _)| *e).collect();
        let mut iter = entities.iter();
        match (iter.next(), iter.next()) {
            (Some(entity), None) => Ok(entity),
            _ => Err(FeaturizationError::MultiEntityFeature {
                feature: self.name.clone(),
                entities: entities.iter().map(|e| e.to_string()).collect(),
            }),
        }
    }

    /// The single base column, after dropping `ignore` columns (typically the
    /// entity's time index).
    pub fn base_column(&self, ignore: &[&str]) -> Result<&str, FeaturizationError> {
        let columns: BTreeSet<&str> = self
            .expr
            .leaves()
            .iter()
            .map(|(_, c)| *c)
            .filter(|c| !ignore.contains(c))
            .collect();
        let mut iter = columns.iter();
        match (iter.next(), iter.next()) {
            (Some(column), None) => Ok(column),
            _ => Err(FeaturizationError::AmbiguousBaseColumn {
                feature: self.name.clone(),
                columns: columns.iter().map(|c| c.to_string()).collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names() {
        assert_eq!(Feature::direct("PATIENTS", "GENDER").name, "PATIENTS.GENDER");
        assert_eq!(
            Feature::aggregate(AggregationKind::Mean, "LABEVENTS", "VALUE", None).name,
            "MEAN(LABEVENTS.VALUE)"
        );
        assert_eq!(
            Feature::filtered(
                AggregationKind::Mean,
                "LABEVENTS",
                "VALUE",
                None,
                "ITEMID",
                "50912"
            )
            .name,
            "MEAN(LABEVENTS.VALUE) WHERE ITEMID = 50912"
        );
    }

    #[test]
    fn trend_time_base_is_ignored_for_base_column() {
        let f = Feature::aggregate(AggregationKind::Trend, "CHARTEVENTS", "VALUE", Some("CHARTTIME"));
        assert_eq!(f.owning_entity().unwrap(), "CHARTEVENTS");
        assert_eq!(f.base_column(&["CHARTTIME"]).unwrap(), "VALUE");
        assert!(matches!(
            f.base_column(&[]),
            Err(FeaturizationError::AmbiguousBaseColumn { .. })
        ));
    }

    #[test]
    fn multi_entity_feature_is_rejected() {
        let f = Feature {
            name: "MEAN(mixed)".to_string(),
            expr: FeatureExpr::Aggregate {
                kind: AggregationKind::Mean,
                bases: vec![
                    FeatureExpr::Leaf {
                        entity: "A".into(),
                        column: "x".into(),
                    },
                    FeatureExpr::Leaf {
                        entity: "B".into(),
                        column: "y".into(),
                    },
                ],
            },
        };
        assert!(matches!(
            f.owning_entity(),
            Err(FeaturizationError::MultiEntityFeature { .. })
        ));
    }
}
