//! Structured form field paths
//!
//! Form encodings have no syntax for nesting, so field names carry it in bracket
//! notation: `user[tags][0]` addresses the first tag of the user object. This module
//! parses such names, coerces raw values to JSON, and rebuilds the nested value.

pub mod path;
pub mod tree;
pub mod value;

pub use path::{classify_segment, format_path, parse_path, PathSegment};
pub use tree::{flatten, insert, insert_field};
pub use value::{coerce_value, render_value};
