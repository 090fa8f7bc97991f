//! The cross-document accumulator
//!
//! A `Merger` holds, for one unified path, the set of kinds observed under
//! each source label, the union of those sets, and the ordered children of
//! the node. Invariants: `types` is always the union of the per-label
//! sets, and a key appears in `children` iff it appears in
//! `children_order` exactly once.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::path::encode_path;
use crate::types::DetectedType;

/// Aggregated information for a single unified JSON path.
#[derive(Debug, Clone)]
pub struct Merger {
    /// Full path of this node, with `""` for collapsed array positions.
    pub path: Vec<String>,
    /// label → set of kinds contributed by that source.
    pub types_by_label: HashMap<String, HashSet<DetectedType>>,
    /// Union of all per-label sets.
    pub types: HashSet<DetectedType>,
    /// Children keyed by the immediate child segment.
    pub children: HashMap<String, Merger>,
    /// Insertion order of `children` keys (first-observed wins).
    pub children_order: Vec<String>,
}

impl Merger {
    pub fn new(path: Vec<String>) -> Self {
        Merger {
            path,
            types_by_label: HashMap::new(),
            types: HashSet::new(),
            children: HashMap::new(),
            children_order: Vec::new(),
        }
    }

    /// Record kinds under `label`, keeping `types` in sync.
    pub fn add_types(&mut self, label: &str, types: impl IntoIterator<Item = DetectedType>) {
        let labeled = self.types_by_label.entry(label.to_string()).or_default();
        for t in types {
            labeled.insert(t);
            self.types.insert(t);
        }
    }

    /// Attach `child` under `key`, or fold it into the existing child:
    /// types union under `label`, children folded recursively.
    pub fn add_child(&mut self, key: String, label: &str, child: Merger) {
        match self.children.entry(key) {
            Entry::Vacant(slot) => {
                self.children_order.push(slot.key().clone());
                slot.insert(child);
            }
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                let Merger {
                    types,
                    mut children,
                    children_order,
                    ..
                } = child;
                existing.add_types(label, types);
                for sub_key in children_order {
                    if let Some(sub) = children.remove(&sub_key) {
                        existing.add_child(sub_key, label, sub);
                    }
                }
            }
        }
    }

    pub fn child(&self, key: &str) -> Option<&Merger> {
        self.children.get(key)
    }

    /// Sorted view of the kind union, for stable output.
    pub fn sorted_types(&self) -> Vec<DetectedType> {
        let mut types: Vec<DetectedType> = self.types.iter().copied().collect();
        types.sort_by_key(|t| t.as_str());
        types
    }

    /// Box-drawing diagnostic dump of the merged tree.
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

        let types: Vec<&str> = self.sorted_types().iter().map(|t| t.as_str()).collect();
        let mut out = format!(
            "{prefix}{} => [{}]\n",
            encode_path(&self.path),
            types.join(", ")
        );

        let next_indent = if indent.is_empty() {
            indent.to_string()
        } else if is_last {
            format!("{indent}   ")
        } else {
            format!("{indent}│  ")
        };

        for (i, key) in self.children_order.iter().enumerate() {
            if let Some(child) = self.children.get(key) {
                out.push_str(&child.render(&next_indent, i == self.children_order.len() - 1));
            }
        }

        out
    }
}
