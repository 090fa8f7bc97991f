use std::collections::HashMap;
use std::fmt;

use crate::path::encode_path;

/// The kind observed for a JSON value at some path.
///
/// Container kinds are mutually exclusive with primitive and refined kinds
/// at recording time; a merged node may still accumulate both (a field that
/// is an array in one document and null in another).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectedType {
    Unknown,
    Null,
    Bool,
    Int32,
    Int64,
    Float64,
    String,

    // Containers
    Object,
    /// An object whose keys are all decimal integers; planned like an array.
    ObjectInt,
    Array,

    // String refinements, see `detect`
    Uuid,
    FilepathWindows,
    Email,
    Phone,
    Link,
    Domain,
    Hex,
    Base64Std,
    Base64Url,
    Base64RawStd,
    Base64RawUrl,
    Ipv4,
    Ipv4WithMask,
    Ipv6,
    Ipv4PortPair,
    Ipv6PortPair,
    Mac,
}

impl DetectedType {
    pub fn as_str(self) -> &'static str {
        match self {
            DetectedType::Unknown => "unknown",
            DetectedType::Null => "null",
            DetectedType::Bool => "bool",
            DetectedType::Int32 => "int32",
            DetectedType::Int64 => "int64",
            DetectedType::Float64 => "float64",
            DetectedType::String => "string",
            DetectedType::Object => "object",
            DetectedType::ObjectInt => "object_int",
            DetectedType::Array => "array",
            DetectedType::Uuid => "uuid",
            DetectedType::FilepathWindows => "filepath-windows",
            DetectedType::Email => "email",
            DetectedType::Phone => "phone",
            DetectedType::Link => "link",
            DetectedType::Domain => "domain",
            DetectedType::Hex => "hex",
            DetectedType::Base64Std => "base64-std",
            DetectedType::Base64Url => "base64-url",
            DetectedType::Base64RawStd => "base64-raw-std",
            DetectedType::Base64RawUrl => "base64-raw-url",
            DetectedType::Ipv4 => "ipv4",
            DetectedType::Ipv4WithMask => "ipv4-with-mask",
            DetectedType::Ipv6 => "ipv6",
            DetectedType::Ipv4PortPair => "ipv4-port-pair",
            DetectedType::Ipv6PortPair => "ipv6-port-pair",
            DetectedType::Mac => "mac",
        }
    }

    pub fn is_container(self) -> bool {
        matches!(
            self,
            DetectedType::Object | DetectedType::ObjectInt | DetectedType::Array
        )
    }
}

impl fmt::Display for DetectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One document's structural record of a single JSON path.
///
/// Built once by the parser and read-only thereafter. Ownership is strictly
/// parent→children; there is no parent back-reference (callers that need
/// the parent reconstruct it from the walk).
#[derive(Debug, Clone)]
pub struct FieldInfo {
    /// Full path like `["obj1", "obj2", "field"]`; empty for the root.
    pub path: Vec<String>,
    pub kind: DetectedType,
    /// Ordered children for containers; empty for primitives.
    pub children: Vec<FieldInfo>,
    /// Lookup index into `children` by trailing key.
    pub children_by_key: HashMap<String, usize>,
}

impl FieldInfo {
    pub fn new(path: Vec<String>, kind: DetectedType) -> Self {
        FieldInfo {
            path,
            kind,
            children: Vec::new(),
            children_by_key: HashMap::new(),
        }
    }

    /// The trailing path segment; `""` for the root.
    pub fn key(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or("")
    }

    pub fn push_child(&mut self, key: String, child: FieldInfo) {
        self.children_by_key.insert(key, self.children.len());
        self.children.push(child);
    }

    pub fn child(&self, key: &str) -> Option<&FieldInfo> {
        self.children_by_key.get(key).map(|&i| &self.children[i])
    }

    /// True if the container's immediate children have more than one
    /// distinct kind.
    pub fn is_mixed_container(&self) -> bool {
        let mut kinds = self.children.iter().map(|c| c.kind);
        match kinds.next() {
            Some(first) => kinds.any(|k| k != first),
            None => false,
        }
    }

    /// Indented diagnostic dump of the tree.
    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        self.render(&mut out, "");
        out
    }

    fn render(&self, out: &mut String, indent: &str) {
        out.push_str(&format!("{indent}Path: {}\n", encode_path(&self.path)));
        out.push_str(&format!("{indent}Type: {}\n", self.kind));
        out.push_str(&format!("{indent}Children: {}\n", self.children.len()));
        for (i, child) in self.children.iter().enumerate() {
            out.push_str(&format!("{indent}  Child {i}:\n"));
            child.render(out, &format!("{indent}    "));
        }
    }
}
