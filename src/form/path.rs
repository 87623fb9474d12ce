//! Bracketed field name parsing (`a[b][0]`, `list[]`)

use std::fmt;

use crate::error::{CodecError, CodecResult};

const PATH_ITEM_OPEN: char = '[';
const PATH_ITEM_CLOSE: char = ']';

/// One element of a decomposed field name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object key
    Key(String),

    /// Explicit array index (`[3]`)
    Index(usize),

    /// Empty brackets (`[]`): index 0 in isolation, appended by tree insertion
    Append,
}

impl PathSegment {
    /// Build a segment from the text between a pair of brackets
    pub fn from_body(body: &str) -> Self {
        match classify_segment(body) {
            (_, true) if body.is_empty() => PathSegment::Append,
            (index, true) => PathSegment::Index(index),
            (_, false) => PathSegment::Key(body.to_string()),
        }
    }

    /// Array index of this segment, `None` for object keys
    pub fn index(&self) -> Option<usize> {
        match self {
            PathSegment::Key(_) => None,
            PathSegment::Index(index) => Some(*index),
            PathSegment::Append => Some(0),
        }
    }

    /// Whether this segment addresses an array element
    pub fn is_array_index(&self) -> bool {
        self.index().is_some()
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{}", index),
            PathSegment::Append => Ok(()),
        }
    }
}

/// Split a field name into path segments
///
/// The text before the first `[` is always a key (possibly empty). Every following
/// piece must be closed by `]`.
pub fn parse_path(name: &str) -> CodecResult<Vec<PathSegment>> {
    let mut parts = name.split(PATH_ITEM_OPEN);

    // split always yields at least one piece
    let head = parts.next().unwrap_or_default();
    let mut path = vec![PathSegment::Key(head.to_string())];

    for part in parts {
        let body = part
            .strip_suffix(PATH_ITEM_CLOSE)
            .ok_or_else(|| CodecError::MalformedFieldName {
                name: name.to_string(),
            })?;
        path.push(PathSegment::from_body(body));
    }

    Ok(path)
}

/// Classify the text between brackets
///
/// Returns `(index, true)` for array indices, where empty brackets count as index 0.
/// Returns `(_, false)` for object keys; the index is meaningless in that case.
pub fn classify_segment(body: &str) -> (usize, bool) {
    if body.is_empty() {
        return (0, true);
    }
    match body.parse::<usize>() {
        Ok(index) => (index, true),
        Err(_) => (0, false),
    }
}

/// Render a path back into bracket notation
pub fn format_path(path: &[PathSegment]) -> String {
    let mut name = String::new();
    for (i, segment) in path.iter().enumerate() {
        if i == 0 {
            name.push_str(&segment.to_string());
        } else {
            name.push(PATH_ITEM_OPEN);
            name.push_str(&segment.to_string());
            name.push(PATH_ITEM_CLOSE);
        }
    }
    name
}
