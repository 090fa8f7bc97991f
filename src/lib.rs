//! # jsonshape - JSON schema-shape inference
//!
//! Infers a unified *schema-shape* from one or more JSON documents. For
//! each distinct logical path in the combined input it reports the set of
//! observed value kinds, refining strings into sub-kinds (UUID, email,
//! IPv4, base64, ...). Documents merge under textual labels, so callers
//! can see which sources contributed which kinds at every path.
//!
//! ## Pipeline
//!
//! - **stream/parser**: a token stream is parsed into a per-document
//!   `FieldInfo` tree, honoring path filters and max-depth.
//! - **merge**: a pure planner decides which array indices collapse, an
//!   executor applies the plan, and an object strategy tracks field
//!   presence and nullability. The result accumulates in a `Merger`.
//! - **print**: the merged tree renders as `path => kind-union` lines.
//!
//! ## Quick Start
//!
//! ```rust
//! use jsonshape::{merge_document, print_merger_tree, Merger, ParseOptions};
//!
//! # fn main() -> jsonshape::Result<()> {
//! let doc = r#"{"id": "550e8400-e29b-41d4-a716-446655440074", "tags": ["a", "b"]}"#;
//!
//! let mut merger = Merger::new(Vec::new());
//! merge_document(doc.as_bytes(), "example", &ParseOptions::default(), &mut merger)?;
//!
//! let mut out = Vec::new();
//! print_merger_tree(&merger, "", &mut out).expect("write to Vec");
//! let text = String::from_utf8(out).expect("utf-8");
//! assert!(text.contains("$.id => uuid"));
//! assert!(text.contains("$.tags => array<string>"));
//! # Ok(())
//! # }
//! ```

use std::io::BufRead;

pub mod detect;
pub mod error;
pub mod merge;
pub mod parser;
pub mod path;
pub mod print;
pub mod stream;
pub mod types;

// Re-export commonly used items for convenience
pub use detect::detect_str_type;
pub use error::{Error, Result, StreamError};
pub use merge::{execute_merge, plan_shape, unify_plans, ArrayStrategy, MergePlan, Merger};
pub use parser::{parse_stream, ParseOptions};
pub use path::{encode_path, parse_path};
pub use print::print_merger_tree;
pub use stream::{JsonTokenizer, Token, TokenStream};
pub use types::{DetectedType, FieldInfo};

use tracing::debug;

/// Parse one JSON document from `reader` and fold its shape into `merger`
/// under `label`.
pub fn merge_document<R: BufRead>(
    reader: R,
    label: &str,
    options: &ParseOptions,
    merger: &mut Merger,
) -> Result<()> {
    let root = parse_stream(JsonTokenizer::new(reader), options)?;
    debug!(label, "parsed document:\n{}", root.render_tree());
    merger.merge_field(label, &root);
    Ok(())
}
