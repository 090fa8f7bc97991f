//! Layer 2: Object Strategy
//!
//! All object semantics live here and only here: field presence tracking,
//! nullability determination, independent field merging.

use std::collections::HashMap;

use tracing::debug;

use crate::merge::executor::execute_merge;
use crate::merge::merger::Merger;
use crate::merge::plan::MergePlan;
use crate::path::encode_path;
use crate::types::{DetectedType, FieldInfo};

/// Merge a group of sibling objects into one Merger node at `path`.
///
/// A field that does not appear in every sibling gets `null` added to its
/// kinds under `label`.
pub(crate) fn merge_objects(
    path: Vec<String>,
    label: &str,
    plan_fields: &HashMap<String, MergePlan>,
    fields: &[&FieldInfo],
) -> Merger {
    let mut merger = Merger::new(path.clone());
    merger.add_types(label, [DetectedType::Object]);

    let groups = group_object_fields(fields);
    let total_elements = fields.len();

    debug!(
        path = %encode_path(&path),
        total_elements,
        unique_fields = groups.len(),
        "merging object fields"
    );

    for (field_name, occurrences) in groups {
        let default_plan = MergePlan::Primitive;
        let child_plan = plan_fields.get(&field_name).unwrap_or(&default_plan);

        let mut child_path = path.clone();
        child_path.push(field_name.clone());

        let mut child = execute_merge(child_plan, label, &occurrences, child_path);

        // nullability: at least one sibling is missing the field
        if occurrences.len() < total_elements {
            debug!(
                path = %encode_path(&path),
                field = %field_name,
                appearances = occurrences.len(),
                total_elements,
                "marking field as nullable"
            );
            child.add_types(label, [DetectedType::Null]);
        }

        merger.add_child(field_name, label, child);
    }

    merger
}

/// Group the children of all sibling objects by their trailing key,
/// preserving first-appearance order.
fn group_object_fields<'a>(fields: &[&'a FieldInfo]) -> Vec<(String, Vec<&'a FieldInfo>)> {
    let mut groups: Vec<(String, Vec<&FieldInfo>)> = Vec::new();

    for field in fields {
        if field.kind != DetectedType::Object {
            debug!(
                path = %encode_path(&field.path),
                kind = %field.kind,
                "skipping non-object sibling"
            );
            continue;
        }

        for child in &field.children {
            let name = child.key();
            match groups.iter().position(|(key, _)| key == name) {
                Some(i) => groups[i].1.push(child),
                None => groups.push((name.to_string(), vec![child])),
            }
        }
    }

    groups
}
