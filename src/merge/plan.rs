//! Layer 1: Shape Planner
//!
//! Pure, side-effect-free planning phase. Answers one question: given this
//! FieldInfo subtree, how should paths be structured in the merged result?

use std::collections::HashMap;

use crate::types::{DetectedType, FieldInfo};

/// Whether array positions are identified with the `""` wildcard or kept
/// as per-index paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayStrategy {
    /// All positions share the `""` wildcard segment.
    Collapse,
    /// Positions keep `"0"`, `"1"`, ... segments.
    KeepIndices,
}

/// The shape of the merged result. Pure structure: no types, counts or
/// labels.
#[derive(Debug, Clone, PartialEq)]
pub enum MergePlan {
    Primitive,
    Array {
        strategy: ArrayStrategy,
        /// The unified shape of every position.
        element: Box<MergePlan>,
    },
    Object {
        fields: HashMap<String, MergePlan>,
    },
}

/// Determine the merge shape for a FieldInfo tree. Deterministic and
/// re-entrant; same input, same plan.
pub fn plan_shape(field: &FieldInfo) -> MergePlan {
    match field.kind {
        DetectedType::Array | DetectedType::ObjectInt => {
            let strategy = if field.is_mixed_container() {
                ArrayStrategy::KeepIndices
            } else {
                ArrayStrategy::Collapse
            };

            // Arrays always have exactly one element plan
            let element = unify_plans(field.children.iter().map(plan_shape));
            MergePlan::Array {
                strategy,
                element: Box::new(element),
            }
        }

        DetectedType::Object => {
            // Objects never collapse keys. Nested under arrays, non-mixed,
            // generalized: the field names are always preserved.
            let mut fields: HashMap<String, MergePlan> = HashMap::new();
            for child in &field.children {
                let key = child.key().to_string();
                let plan = plan_shape(child);
                // a repeated key (malformed input) unifies both plans
                let merged = match fields.remove(&key) {
                    Some(existing) => unify_two(existing, plan),
                    None => plan,
                };
                fields.insert(key, merged);
            }
            MergePlan::Object { fields }
        }

        _ => MergePlan::Primitive,
    }
}

/// Reduce a sequence of plans by pairwise unification; empty → Primitive.
pub fn unify_plans(plans: impl IntoIterator<Item = MergePlan>) -> MergePlan {
    plans
        .into_iter()
        .reduce(unify_two)
        .unwrap_or(MergePlan::Primitive)
}

fn unify_two(a: MergePlan, b: MergePlan) -> MergePlan {
    match (a, b) {
        (MergePlan::Primitive, MergePlan::Primitive) => MergePlan::Primitive,

        (
            MergePlan::Array {
                strategy: sa,
                element: ea,
            },
            MergePlan::Array {
                strategy: sb,
                element: eb,
            },
        ) => MergePlan::Array {
            // the conservative choice: either side keeping indices wins
            strategy: if sa == ArrayStrategy::KeepIndices || sb == ArrayStrategy::KeepIndices {
                ArrayStrategy::KeepIndices
            } else {
                ArrayStrategy::Collapse
            },
            element: Box::new(unify_two(*ea, *eb)),
        },

        (MergePlan::Object { fields: mut fa }, MergePlan::Object { fields: fb }) => {
            for (key, plan) in fb {
                let merged = match fa.remove(&key) {
                    Some(existing) => unify_two(existing, plan),
                    None => plan,
                };
                fa.insert(key, merged);
            }
            MergePlan::Object { fields: fa }
        }

        // mixed kinds fall back to a primitive leaf
        _ => MergePlan::Primitive,
    }
}

impl MergePlan {
    /// Human-readable ASCII tree, for diagnostics and test failures.
    pub fn render_tree(&self) -> String {
        self.render("", true)
    }

    fn render(&self, indent: &str, is_last: bool) -> String {
        let prefix = if indent.is_empty() {
            indent.to_string()
        } else if is_last {
            format!("{indent}└─ ")
        } else {
            format!("{indent}├─ ")
        };

        let next_indent = if indent.is_empty() {
            indent.to_string()
        } else if is_last {
            format!("{indent}   ")
        } else {
            format!("{indent}│  ")
        };

        match self {
            MergePlan::Primitive => format!("{prefix}Primitive\n"),

            MergePlan::Array { strategy, element } => {
                let strategy_str = match strategy {
                    ArrayStrategy::Collapse => "Collapse",
                    ArrayStrategy::KeepIndices => "KeepIndices",
                };
                let mut out = format!("{prefix}Array({strategy_str})\n");
                out.push_str(&element.render(&next_indent, true));
                out
            }

            MergePlan::Object { fields } => {
                let mut out = format!("{prefix}Object{{{} fields}}\n", fields.len());
                let mut names: Vec<&String> = fields.keys().collect();
                names.sort();
                for (i, name) in names.iter().enumerate() {
                    let is_last_field = i == names.len() - 1;
                    let field_prefix = if is_last_field {
                        format!("{next_indent}└─ ")
                    } else {
                        format!("{next_indent}├─ ")
                    };
                    out.push_str(&format!("{field_prefix}{name}:\n"));

                    let field_indent = if is_last_field {
                        format!("{next_indent}   ")
                    } else {
                        format!("{next_indent}│  ")
                    };
                    out.push_str(&fields[*name].render(&field_indent, true));
                }
                out
            }
        }
    }
}
