//! Field remapping between paired schemas.
//!
//! Paired schemas share field aliases, so a field is carried over exactly
//! when the target defines the same alias. Anything else is dropped.

use crate::catalog::{ContentNode, Schema};
use crate::storage::PropertyMapping;
use std::collections::{BTreeMap, BTreeSet};

/// Map each source field alias that exists on the target to itself.
pub fn remap_fields(
    source: &BTreeSet<String>,
    target: &BTreeSet<String>,
) -> BTreeMap<String, String> {
    source
        .intersection(target)
        .map(|alias| (alias.clone(), alias.clone()))
        .collect()
}

/// Build the property list of a schema change for a node.
///
/// Every field of the node is listed; dropped fields have no new alias.
pub fn property_mappings(node: &ContentNode, target: &Schema) -> Vec<PropertyMapping> {
    let mapped = remap_fields(&node.field_aliases(), &target.fields);
    node.fields
        .keys()
        .map(|alias| PropertyMapping {
            alias: alias.clone(),
            new_alias: mapped.get(alias).cloned(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_drops_fields_missing_on_target() {
        let mapped = remap_fields(&set(&["title", "body", "legacyField"]), &set(&["title", "body"]));
        let expected: BTreeMap<String, String> = [("title", "title"), ("body", "body")]
            .into_iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect();
        assert_eq!(mapped, expected);
    }

    #[test]
    fn test_target_only_fields_are_ignored() {
        let mapped = remap_fields(&set(&["title"]), &set(&["title", "seoTitle"]));
        assert_eq!(mapped.len(), 1);
        assert!(!mapped.contains_key("seoTitle"));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(remap_fields(&set(&[]), &set(&["title"])).is_empty());
        assert!(remap_fields(&set(&["title"]), &set(&[])).is_empty());
    }

    #[test]
    fn test_property_mappings_lists_every_field() {
        let node = ContentNode::new(1, "About", "page")
            .with_field("title", "About")
            .with_field("legacyField", 3);
        let target = Schema::new(2, "pageNew", "Page").with_fields(["title", "body"]);

        let mappings = property_mappings(&node, &target);
        assert_eq!(
            mappings,
            vec![
                PropertyMapping {
                    alias: "legacyField".to_string(),
                    new_alias: None,
                },
                PropertyMapping {
                    alias: "title".to_string(),
                    new_alias: Some("title".to_string()),
                },
            ]
        );
    }
}
