//! Structured feature descriptions for display surfaces.

use clinsight_core::errors::ClinsightResult;
use clinsight_core::models::{EntitySchema, Feature, FeatureDescriptor, ItemRef};
use clinsight_core::traits::IItemDictionary;

/// Describe one feature for display. When an item dictionary is supplied,
/// filtered features carry the item's human label instead of its raw code.
pub fn describe(
    feature: &Feature,
    schema: &EntitySchema,
    dictionary: Option<&dyn IItemDictionary>,
) -> ClinsightResult<FeatureDescriptor> {
    let entity = feature.owning_entity()?.to_string();
    let ignore: Vec<&str> = schema.time_index.as_deref().into_iter().collect();
    let column = feature.base_column(&ignore)?.to_string();

    let item = feature.filter_item().map(|(item_column, item_value)| ItemRef {
        column: item_column.to_string(),
        value: item_value.to_string(),
        alias: dictionary.and_then(|d| d.lookup(&entity, item_value)),
    });

    let primitive = feature.kind().map(|k| k.label().to_string());
    let alias = match &item {
        Some(i) => i.alias.clone().unwrap_or_else(|| i.value.clone()),
        None => column.clone(),
    };
    let description = match (&primitive, &item) {
        (None, _) => format!("{column} attribute of {entity}"),
        (Some(p), None) => format!(
            "{} of {entity}.{column} over the observable window",
            title(p)
        ),
        (Some(p), Some(i)) => format!(
            "{} of {entity}.{column} for {} over the observable window",
            title(p),
            i.alias.as_deref().unwrap_or(&i.value)
        ),
    };

    Ok(FeatureDescriptor {
        id: feature.name.clone(),
        primitive,
        entity,
        column: Some(column),
        item,
        alias,
        description,
    })
}

/// "MEAN" -> "Mean".
fn title(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_string() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinsight_core::models::AggregationKind;

    fn lab_schema() -> EntitySchema {
        EntitySchema {
            name: "LABEVENTS".to_string(),
            index_column: "ROW_ID".to_string(),
            time_index: Some("CHARTTIME".to_string()),
            item_index: Some("ITEMID".to_string()),
            value_columns: vec!["VALUENUM".to_string()],
            categorical_columns: Vec::new(),
        }
    }

    struct OneLabel;

    impl IItemDictionary for OneLabel {
        fn lookup(&self, entity: &str, item_code: &str) -> Option<String> {
            (entity == "LABEVENTS" && item_code == "50912").then(|| "Creatinine".to_string())
        }
    }

    #[test]
    fn filtered_feature_interpolates_the_item_label() {
        let feature = Feature::filtered(
            AggregationKind::Mean,
            "LABEVENTS",
            "VALUENUM",
            None,
            "ITEMID",
            "50912",
        );
        let d = describe(&feature, &lab_schema(), Some(&OneLabel)).unwrap();
        assert_eq!(d.alias, "Creatinine");
        assert_eq!(d.item.as_ref().unwrap().alias.as_deref(), Some("Creatinine"));
        assert!(d.description.contains("Mean of LABEVENTS.VALUENUM for Creatinine"));
    }

    #[test]
    fn filtered_feature_without_dictionary_keeps_the_raw_code() {
        let feature = Feature::filtered(
            AggregationKind::Std,
            "LABEVENTS",
            "VALUENUM",
            None,
            "ITEMID",
            "50912",
        );
        let d = describe(&feature, &lab_schema(), None).unwrap();
        assert_eq!(d.alias, "50912");
        assert_eq!(d.item.as_ref().unwrap().alias, None);
    }

    #[test]
    fn trend_base_column_ignores_the_time_index() {
        let feature = Feature::aggregate(
            AggregationKind::Trend,
            "LABEVENTS",
            "VALUENUM",
            Some("CHARTTIME"),
        );
        let d = describe(&feature, &lab_schema(), None).unwrap();
        assert_eq!(d.column.as_deref(), Some("VALUENUM"));
        assert_eq!(d.primitive.as_deref(), Some("TREND"));
    }
}
