//! Token stream → FieldInfo tree
//!
//! Reads exactly one top-level JSON value, honoring include/exclude path
//! filters and a maximum depth, and classifies every leaf primitive.
//! Pruned subtrees are consumed with `skip_value` and emit nothing.

use tracing::{debug, info};

use crate::detect::detect_str_type;
use crate::error::{Error, Result};
use crate::path::{encode_path, is_decimal, is_path_prefix, paths_overlap};
use crate::stream::{Token, TokenStream};
use crate::types::{DetectedType, FieldInfo};

/// Filtering and classification switches for one parse.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Whitelist of paths; empty means parse everything not excluded.
    pub include: Vec<Vec<String>>,
    /// Paths whose subtrees are pruned.
    pub exclude: Vec<Vec<String>>,
    /// Prune paths longer than this; 0 = unlimited.
    pub max_depth: usize,
    /// Refine string leaves through the detector cascade.
    pub analyze_strings: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            include: Vec::new(),
            exclude: Vec::new(),
            max_depth: 0,
            analyze_strings: true,
        }
    }
}

/// Parse one JSON document from the stream into its FieldInfo tree.
pub fn parse_stream<S: TokenStream>(stream: S, options: &ParseOptions) -> Result<FieldInfo> {
    info!(
        max_depth = options.max_depth,
        include = options.include.len(),
        exclude = options.exclude.len(),
        "starting JSON stream parsing"
    );

    let mut parser = Parser { stream, options };
    let mut path = Vec::new();
    let root = parser
        .parse_value(&mut path)?
        .ok_or_else(|| Error::malformed(&[], "top-level value is excluded by the path filters"))?;

    info!("completed JSON stream parsing");
    Ok(root)
}

struct Parser<'a, S: TokenStream> {
    stream: S,
    options: &'a ParseOptions,
}

impl<S: TokenStream> Parser<'_, S> {
    /// Parse the value at `path`, or skip it when the filters exclude it.
    fn parse_value(&mut self, path: &mut Vec<String>) -> Result<Option<FieldInfo>> {
        if !self.should_parse(path) {
            debug!(path = %encode_path(path), "skipping value");
            self.stream
                .skip_value()
                .map_err(|e| Error::from_stream(e, path))?;
            return Ok(None);
        }

        let token = self
            .stream
            .next_token()
            .map_err(|e| Error::from_stream(e, path))?;
        self.parse_token(token, path).map(Some)
    }

    /// Dispatch on a token that has already been read.
    fn parse_token(&mut self, token: Token, path: &mut Vec<String>) -> Result<FieldInfo> {
        match token {
            Token::BeginObject => self.parse_object(path),
            Token::BeginArray => self.parse_array(path),
            Token::Null => Ok(self.record(path, DetectedType::Null)),
            Token::Bool(_) => Ok(self.record(path, DetectedType::Bool)),
            Token::Number(raw) => {
                let kind = classify_number(&raw);
                debug!(path = %encode_path(path), %kind, value = %raw, "detected number");
                Ok(self.record(path, kind))
            }
            Token::String(s) => {
                let kind = if self.options.analyze_strings {
                    detect_str_type(&s)
                } else {
                    DetectedType::String
                };
                debug!(path = %encode_path(path), %kind, length = s.len(), "detected string");
                Ok(self.record(path, kind))
            }
            Token::EndObject | Token::EndArray => Err(Error::malformed(
                path,
                "unexpected closing delimiter where a value was expected",
            )),
        }
    }

    fn parse_object(&mut self, path: &mut Vec<String>) -> Result<FieldInfo> {
        debug!(path = %encode_path(path), "entering object");
        let mut obj = self.record(path, DetectedType::Object);
        let mut saw_key = false;
        let mut all_keys_decimal = true;

        loop {
            if !self
                .stream
                .has_more()
                .map_err(|e| Error::from_stream(e, path))?
            {
                let token = self
                    .stream
                    .next_token()
                    .map_err(|e| Error::from_stream(e, path))?;
                if token != Token::EndObject {
                    return Err(Error::malformed(
                        path,
                        format!("expected '}}' to close object, got {token:?}"),
                    ));
                }
                break;
            }

            let token = self
                .stream
                .next_token()
                .map_err(|e| Error::from_stream(e, path))?;
            let key = match token {
                Token::String(k) => k,
                other => {
                    return Err(Error::malformed(
                        path,
                        format!("object key must be a string, got {other:?}"),
                    ))
                }
            };
            saw_key = true;
            // Keys of pruned values still count toward the classification
            if !is_decimal(&key) {
                all_keys_decimal = false;
            }

            path.push(key);
            let child = self.parse_value(path)?;
            let key = path.pop().unwrap_or_default();
            if let Some(child) = child {
                obj.push_child(key, child);
            }
        }

        if saw_key && all_keys_decimal {
            debug!(path = %encode_path(path), "all keys decimal, treating as object_int");
            obj.kind = DetectedType::ObjectInt;
        }
        debug!(path = %encode_path(path), children = obj.children.len(), "closing object");
        Ok(obj)
    }

    fn parse_array(&mut self, path: &mut Vec<String>) -> Result<FieldInfo> {
        debug!(path = %encode_path(path), "entering array");
        let mut arr = self.record(path, DetectedType::Array);
        let mut index = 0usize;

        loop {
            if !self
                .stream
                .has_more()
                .map_err(|e| Error::from_stream(e, path))?
            {
                let token = self
                    .stream
                    .next_token()
                    .map_err(|e| Error::from_stream(e, path))?;
                if token != Token::EndArray {
                    return Err(Error::malformed(
                        path,
                        format!("expected ']' to close array, got {token:?}"),
                    ));
                }
                break;
            }

            path.push(index.to_string());
            let child = self.parse_value(path)?;
            let key = path.pop().unwrap_or_default();
            if let Some(child) = child {
                arr.push_child(key, child);
            }
            index += 1;
        }

        debug!(path = %encode_path(path), elements = index, "closing array");
        Ok(arr)
    }

    fn record(&self, path: &[String], kind: DetectedType) -> FieldInfo {
        FieldInfo::new(path.to_vec(), kind)
    }

    fn should_parse(&self, path: &[String]) -> bool {
        let o = self.options;
        if o.max_depth > 0 && path.len() > o.max_depth {
            return false;
        }
        if o.include.is_empty() {
            // blacklist scenario
            return !o.exclude.iter().any(|ex| is_path_prefix(ex, path));
        }
        // whitelist scenario: the walk must lie on the route to, or inside,
        // every included subtree
        for inc in &o.include {
            if !paths_overlap(path, inc) {
                return false;
            }
        }
        !o.exclude.iter().any(|ex| is_path_prefix(ex, path))
    }
}

/// Classify a raw decimal number literal.
///
/// Integer text that fits `i32` → int32, fits `i64` → int64; anything with
/// a fraction or exponent, or beyond the `i64` range, → float64.
pub(crate) fn classify_number(raw: &str) -> DetectedType {
    if raw.bytes().any(|b| matches!(b, b'.' | b'e' | b'E')) {
        return DetectedType::Float64;
    }
    match raw.parse::<i64>() {
        Ok(n) => {
            if i32::try_from(n).is_ok() {
                DetectedType::Int32
            } else {
                DetectedType::Int64
            }
        }
        Err(_) => DetectedType::Float64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::JsonTokenizer;

    fn parse(input: &str) -> FieldInfo {
        parse_with(input, &ParseOptions::default())
    }

    fn parse_with(input: &str, options: &ParseOptions) -> FieldInfo {
        parse_stream(JsonTokenizer::new(input.as_bytes()), options).unwrap()
    }

    fn paths(parts: &[&str]) -> Vec<Vec<String>> {
        parts
            .iter()
            .map(|p| crate::path::parse_path(p).unwrap())
            .collect()
    }

    #[test]
    fn test_classify_number() {
        assert_eq!(classify_number("0"), DetectedType::Int32);
        assert_eq!(classify_number("-42"), DetectedType::Int32);
        assert_eq!(classify_number("2147483647"), DetectedType::Int32);
        assert_eq!(classify_number("-2147483648"), DetectedType::Int32);
        assert_eq!(classify_number("2147483648"), DetectedType::Int64);
        assert_eq!(classify_number("-2147483649"), DetectedType::Int64);
        assert_eq!(classify_number("9223372036854775807"), DetectedType::Int64);
        // loses integer precision, so it is not reported as an integer
        assert_eq!(classify_number("9223372036854775808"), DetectedType::Float64);
        assert_eq!(classify_number("1.5"), DetectedType::Float64);
        assert_eq!(classify_number("1e3"), DetectedType::Float64);
        assert_eq!(classify_number("1E-2"), DetectedType::Float64);
    }

    #[test]
    fn test_primitives() {
        assert_eq!(parse("true").kind, DetectedType::Bool);
        assert_eq!(parse("null").kind, DetectedType::Null);
        assert_eq!(parse("12").kind, DetectedType::Int32);
        assert_eq!(parse("\"plain\"").kind, DetectedType::String);
        assert_eq!(
            parse("\"550e8400-e29b-41d4-a716-446655440074\"").kind,
            DetectedType::Uuid
        );
    }

    #[test]
    fn test_analyze_strings_off() {
        let options = ParseOptions {
            analyze_strings: false,
            ..ParseOptions::default()
        };
        let root = parse_with("\"550e8400-e29b-41d4-a716-446655440074\"", &options);
        assert_eq!(root.kind, DetectedType::String);
    }

    #[test]
    fn test_object_structure() {
        let root = parse(r#"{"name": "x", "meta": {"count": 3}}"#);
        assert_eq!(root.kind, DetectedType::Object);
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.child("name").unwrap().kind, DetectedType::String);

        let meta = root.child("meta").unwrap();
        assert_eq!(meta.kind, DetectedType::Object);
        assert_eq!(meta.child("count").unwrap().path, vec!["meta", "count"]);
    }

    #[test]
    fn test_empty_object() {
        let root = parse("{}");
        assert_eq!(root.kind, DetectedType::Object);
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_object_int_requires_all_decimal_keys() {
        assert_eq!(parse(r#"{"0": "a", "1": "b"}"#).kind, DetectedType::ObjectInt);
        assert_eq!(parse(r#"{"12": 1, "5": 2}"#).kind, DetectedType::ObjectInt);
        // one non-decimal key disqualifies the whole object
        assert_eq!(parse(r#"{"0": "a", "one": "b"}"#).kind, DetectedType::Object);
        assert_eq!(parse(r#"{"one": "a", "0": "b"}"#).kind, DetectedType::Object);
    }

    #[test]
    fn test_array_structure() {
        let root = parse(r#"[10, "x", false]"#);
        assert_eq!(root.kind, DetectedType::Array);
        assert_eq!(root.children.len(), 3);
        assert_eq!(root.children[0].path, vec!["0"]);
        assert_eq!(root.children[2].path, vec!["2"]);
        assert_eq!(root.child("1").unwrap().kind, DetectedType::String);
        assert!(root.is_mixed_container());
    }

    #[test]
    fn test_duplicate_keys_keep_both_children() {
        let root = parse(r#"{"a": 1, "a": "x"}"#);
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].kind, DetectedType::Int32);
        assert_eq!(root.children[1].kind, DetectedType::String);
    }

    #[test]
    fn test_max_depth_prunes() {
        let options = ParseOptions {
            max_depth: 2,
            ..ParseOptions::default()
        };
        let root = parse_with(r#"{"a": {"b": {"c": {"d": 1}}}}"#, &options);
        let a = root.child("a").unwrap();
        let b = a.child("b").unwrap();
        assert_eq!(b.kind, DetectedType::Object);
        // everything past depth 2 is skipped, not recorded
        assert!(b.children.is_empty());
    }

    #[test]
    fn test_max_depth_prunes_array_elements() {
        let options = ParseOptions {
            max_depth: 1,
            ..ParseOptions::default()
        };
        let root = parse_with(r#"{"arr": [1, [2, 3], {"x": 4}], "n": 5}"#, &options);
        let arr = root.child("arr").unwrap();
        assert_eq!(arr.kind, DetectedType::Array);
        assert!(arr.children.is_empty());
        assert_eq!(root.child("n").unwrap().kind, DetectedType::Int32);
    }

    #[test]
    fn test_blacklist_filter() {
        let options = ParseOptions {
            exclude: paths(&["$.meta"]),
            ..ParseOptions::default()
        };
        let root = parse_with(r#"{"meta": {"x": 1}, "data": [1]}"#, &options);
        assert!(root.child("meta").is_none());
        assert!(root.child("data").is_some());
    }

    #[test]
    fn test_whitelist_filter() {
        let options = ParseOptions {
            include: paths(&["$.a.b"]),
            ..ParseOptions::default()
        };
        let root = parse_with(r#"{"a": {"b": {"c": 1}, "z": 2}, "other": 3}"#, &options);
        let a = root.child("a").unwrap();
        // on the route to the include entry
        assert!(a.child("b").is_some());
        // inside the included subtree
        assert!(a.child("b").unwrap().child("c").is_some());
        // off the route
        assert!(a.child("z").is_none());
        assert!(root.child("other").is_none());
    }

    #[test]
    fn test_whitelist_with_exclude() {
        let options = ParseOptions {
            include: paths(&["$.a"]),
            exclude: paths(&["$.a.secret"]),
            ..ParseOptions::default()
        };
        let root = parse_with(r#"{"a": {"keep": 1, "secret": {"k": 2}}}"#, &options);
        let a = root.child("a").unwrap();
        assert!(a.child("keep").is_some());
        assert!(a.child("secret").is_none());
    }

    #[test]
    fn test_error_carries_path() {
        let err = parse_stream(
            JsonTokenizer::new(r#"{"a": [1, }"#.as_bytes()),
            &ParseOptions::default(),
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("$.a"), "got: {message}");
    }

    #[test]
    fn test_error_on_non_string_key() {
        let err = parse_stream(
            JsonTokenizer::new(r#"{1: 2}"#.as_bytes()),
            &ParseOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Malformed { .. }));
    }

    #[test]
    fn test_error_on_truncated_input() {
        let err = parse_stream(
            JsonTokenizer::new(r#"{"a": "#.as_bytes()),
            &ParseOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnexpectedEnd { .. }));
    }
}
