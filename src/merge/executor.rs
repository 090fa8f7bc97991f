//! Layer 3: Plan Executor
//!
//! Mechanical execution of a MergePlan over concrete FieldInfo data. This
//! layer does not inspect container mixedness, infer nullability or
//! normalize paths; it obeys the plan and delegates object semantics to
//! the object strategy.

use tracing::debug;

use crate::merge::merger::Merger;
use crate::merge::object::merge_objects;
use crate::merge::plan::{plan_shape, ArrayStrategy, MergePlan};
use crate::path::encode_path;
use crate::types::{DetectedType, FieldInfo};

/// Execute `plan` over `fields`, building the Merger node at `path`.
pub fn execute_merge(
    plan: &MergePlan,
    label: &str,
    fields: &[&FieldInfo],
    path: Vec<String>,
) -> Merger {
    if fields.is_empty() {
        return Merger::new(path);
    }

    debug!(
        path = %encode_path(&path),
        fields = fields.len(),
        "executing merge"
    );

    match plan {
        MergePlan::Primitive => {
            let mut merger = Merger::new(path);
            for field in fields {
                merger.add_types(label, [field.kind]);
            }
            merger
        }

        MergePlan::Array { strategy, element } => {
            let mut merger = Merger::new(path.clone());

            // the container kind comes from the first field
            let container = if fields[0].kind == DetectedType::ObjectInt {
                DetectedType::ObjectInt
            } else {
                DetectedType::Array
            };
            merger.add_types(label, [container]);

            let buckets = group_array_elements(fields, *strategy);
            debug!(
                path = %encode_path(&path),
                buckets = buckets.len(),
                ?strategy,
                "grouped array elements"
            );

            for (key, elements) in buckets {
                let mut child_path = path.clone();
                child_path.push(key.clone());
                let child = execute_merge(element, label, &elements, child_path);
                merger.add_child(key, label, child);
            }
            merger
        }

        MergePlan::Object { fields: plan_fields } => {
            merge_objects(path, label, plan_fields, fields)
        }
    }
}

/// Bucket array children by position key: `""` under Collapse, the child's
/// trailing segment under KeepIndices. Buckets keep first-seen order so
/// `children_order` reflects the input.
fn group_array_elements<'a>(
    fields: &[&'a FieldInfo],
    strategy: ArrayStrategy,
) -> Vec<(String, Vec<&'a FieldInfo>)> {
    let mut buckets: Vec<(String, Vec<&FieldInfo>)> = Vec::new();

    for field in fields {
        if !matches!(field.kind, DetectedType::Array | DetectedType::ObjectInt) {
            debug!(
                path = %encode_path(&field.path),
                kind = %field.kind,
                "skipping non-array sibling"
            );
            continue;
        }

        for child in &field.children {
            let key = match strategy {
                ArrayStrategy::Collapse => String::new(),
                ArrayStrategy::KeepIndices => child.key().to_string(),
            };
            match buckets.iter().position(|(k, _)| *k == key) {
                Some(i) => buckets[i].1.push(child),
                None => buckets.push((key, vec![child])),
            }
        }
    }

    buckets
}

impl Merger {
    /// Main entry point: plan one document's FieldInfo tree, execute the
    /// plan, and fold the result into this accumulator under `label`.
    pub fn merge_field(&mut self, label: &str, field: &FieldInfo) {
        debug!(
            path = %encode_path(&field.path),
            label,
            kind = %field.kind,
            "starting merge"
        );

        let plan = plan_shape(field);
        debug!("merge plan:\n{}", plan.render_tree());

        let result = execute_merge(&plan, label, &[field], field.path.clone());

        let Merger {
            types,
            mut children,
            children_order,
            ..
        } = result;
        self.add_types(label, types);
        for key in children_order {
            if let Some(child) = children.remove(&key) {
                self.add_child(key, label, child);
            }
        }
    }
}
