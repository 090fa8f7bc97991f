//! Line-oriented rendering of a merged tree
//!
//! One line per node: `<indent><canonical-path> => <union>`. Containers
//! render as `kind<inner>` where `inner` is the union of the immediate
//! children's kinds; primitive nodes split into one line per label when
//! both multiple labels and multiple primitive kinds are present.

use std::collections::HashSet;
use std::io::{self, Write};

use crate::merge::Merger;
use crate::path::encode_path;
use crate::types::DetectedType;

/// Render the merged tree, following `children_order`.
pub fn print_merger_tree<W: Write>(merger: &Merger, prefix: &str, w: &mut W) -> io::Result<()> {
    print_node(merger, prefix, w)?;

    for key in &merger.children_order {
        if let Some(child) = merger.children.get(key) {
            print_merger_tree(child, &format!("{prefix}  "), w)?;
        }
    }

    Ok(())
}

fn print_node<W: Write>(merger: &Merger, prefix: &str, w: &mut W) -> io::Result<()> {
    if merger.types.is_empty() {
        return Ok(());
    }

    let path = encode_path(&merger.path);
    let types = merger.sorted_types();

    let (containers, primitives): (Vec<DetectedType>, Vec<DetectedType>) =
        types.into_iter().partition(|t| t.is_container());

    if !containers.is_empty() {
        let inner = collect_child_types(merger);
        let inner = if inner.is_empty() {
            "unknown".to_string()
        } else {
            join_types(&inner)
        };

        let rendered: Vec<String> = containers
            .iter()
            .map(|container| format!("{container}<{inner}>"))
            .collect();

        writeln!(w, "{prefix}{path} => {}", rendered.join(" | "))?;
        return Ok(());
    }

    let mut labels: Vec<&String> = merger.types_by_label.keys().collect();
    labels.sort();

    if labels.len() > 1 && primitives.len() > 1 {
        for label in labels {
            let mut label_types: Vec<DetectedType> =
                merger.types_by_label[label].iter().copied().collect();
            label_types.sort_by_key(|t| t.as_str());
            writeln!(w, "{prefix}{path} @ {label} => {}", join_types(&label_types))?;
        }
        return Ok(());
    }

    writeln!(w, "{prefix}{path} => {}", join_types(&primitives))
}

/// Union of the immediate children's kinds, sorted.
fn collect_child_types(merger: &Merger) -> Vec<DetectedType> {
    let mut seen: HashSet<DetectedType> = HashSet::new();
    for child in merger.children.values() {
        seen.extend(child.types.iter().copied());
    }
    let mut out: Vec<DetectedType> = seen.into_iter().collect();
    out.sort_by_key(|t| t.as_str());
    out
}

fn join_types(types: &[DetectedType]) -> String {
    types
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_stream, ParseOptions};
    use crate::stream::JsonTokenizer;
    use crate::types::FieldInfo;

    fn parse(input: &str) -> FieldInfo {
        parse_stream(JsonTokenizer::new(input.as_bytes()), &ParseOptions::default()).unwrap()
    }

    fn render(merger: &Merger) -> String {
        let mut out = Vec::new();
        print_merger_tree(merger, "", &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_simple_tree() {
        let mut merger = Merger::new(Vec::new());
        merger.merge_field("test", &parse(r#"{"arr": [{"x": 1}, {"x": 2, "y": 3}]}"#));

        let text = render(&merger);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "$ => object<array>");
        assert_eq!(lines[1], "  $.arr => array<object>");
        assert_eq!(lines[2], "    $.arr[] => object<int32 | null>");
        assert!(lines.contains(&"      $.arr[].x => int32"));
        assert!(lines.contains(&"      $.arr[].y => int32 | null"));
    }

    #[test]
    fn test_container_with_no_children_renders_unknown() {
        let mut merger = Merger::new(Vec::new());
        merger.merge_field("test", &parse("[]"));
        assert_eq!(render(&merger), "$ => array<unknown>\n");
    }

    #[test]
    fn test_per_label_lines_only_when_ambiguous() {
        // two labels but a single primitive kind: one line
        let mut merger = Merger::new(Vec::new());
        merger.merge_field("a", &parse("1"));
        merger.merge_field("b", &parse("2"));
        assert_eq!(render(&merger), "$ => int32\n");

        // two labels and two primitive kinds: one line per label
        let mut merger = Merger::new(Vec::new());
        merger.merge_field("a", &parse("1"));
        merger.merge_field("b", &parse("\"s\""));
        let text = render(&merger);
        assert!(text.contains("$ @ a => int32"), "got: {text}");
        assert!(text.contains("$ @ b => string"), "got: {text}");

        // one label with two kinds: still a single line
        let mut merger = Merger::new(Vec::new());
        merger.merge_field("a", &parse("1"));
        merger.merge_field("a", &parse("\"s\""));
        assert_eq!(render(&merger), "$ => int32 | string\n");
    }

    #[test]
    fn test_mixed_array_renders_per_index() {
        let mut merger = Merger::new(Vec::new());
        merger.merge_field("test", &parse(r#"[1, "a"]"#));

        let text = render(&merger);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "$ => array<int32 | string>");
        assert_eq!(lines[1], "  $[0] => int32");
        assert_eq!(lines[2], "  $[1] => string");
    }

    #[test]
    fn test_string_refinements_render_by_name() {
        let mut merger = Merger::new(Vec::new());
        merger.merge_field(
            "test",
            &parse(r#"{"id": "550e8400-e29b-41d4-a716-446655440074", "ip": "10.0.0.1"}"#),
        );

        let text = render(&merger);
        assert!(text.contains("$.id => uuid"), "got: {text}");
        assert!(text.contains("$.ip => ipv4"), "got: {text}");
    }
}
