//! Canonical path expressions
//!
//! A path is an ordered sequence of segments: object keys, decimal index
//! strings, or the empty string (the array wildcard introduced when the
//! merge collapses indices). The canonical textual form is `$` for the
//! root, `.key` for object keys, `[n]` for decimal segments and `[]` for
//! the wildcard. `encode_path` and `parse_path` are inverses on
//! well-formed paths.

use crate::error::{Error, Result};

/// Render a path in canonical form (`$`, `$.user.tags[]`, `$[0].id`, ...).
pub fn encode_path(path: &[String]) -> String {
    if path.is_empty() {
        return "$".to_string();
    }

    let mut out = String::with_capacity(path.len() * 8);
    out.push('$');

    for segment in path {
        if segment.is_empty() {
            // array wildcard
            out.push_str("[]");
        } else if is_decimal(segment) {
            out.push('[');
            out.push_str(segment);
            out.push(']');
        } else {
            out.push('.');
            out.push_str(segment);
        }
    }

    out
}

/// Parse a canonical path expression. The leading `$` is optional; the
/// empty string or `$` alone denotes the root.
pub fn parse_path(expr: &str) -> Result<Vec<String>> {
    if expr.is_empty() || expr == "$" {
        return Ok(Vec::new());
    }

    let body = expr.strip_prefix('$').unwrap_or(expr);
    let bytes = body.as_bytes();

    let mut out = Vec::new();
    let mut buf = String::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'.' => {
                if !buf.is_empty() {
                    out.push(std::mem::take(&mut buf));
                }
                i += 1;
            }
            b'[' => {
                if !buf.is_empty() {
                    out.push(std::mem::take(&mut buf));
                }
                let close = body[i + 1..]
                    .find(']')
                    .ok_or_else(|| Error::path_parse(expr, "unterminated '['"))?;
                let inner = &body[i + 1..i + 1 + close];
                if !inner.is_empty() && !is_decimal(inner) {
                    return Err(Error::path_parse(
                        expr,
                        format!("expected decimal index or empty wildcard in brackets, got {inner:?}"),
                    ));
                }
                // [] is the wildcard, [n] an index
                out.push(inner.to_string());
                i += close + 2;
            }
            b']' => {
                return Err(Error::path_parse(expr, "unexpected ']'"));
            }
            _ => {
                // keys are arbitrary strings; copy the whole UTF-8 character
                let ch = body[i..]
                    .chars()
                    .next()
                    .ok_or_else(|| Error::path_parse(expr, "invalid UTF-8"))?;
                buf.push(ch);
                i += ch.len_utf8();
            }
        }
    }

    if !buf.is_empty() {
        out.push(buf);
    }

    Ok(out)
}

/// True for non-empty strings of ASCII decimal digits.
pub(crate) fn is_decimal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// True if `prefix` is a (non-strict) prefix of `path`.
pub(crate) fn is_path_prefix(prefix: &[String], path: &[String]) -> bool {
    prefix.len() <= path.len() && prefix.iter().zip(path).all(|(a, b)| a == b)
}

/// True if either path is a prefix of the other (they lie on one route).
pub(crate) fn paths_overlap(a: &[String], b: &[String]) -> bool {
    a.iter().zip(b).all(|(x, y)| x == y)
}
