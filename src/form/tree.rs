//! Rebuilding nested values from flat form fields and back

use serde_json::{Map, Value};

use crate::{
    error::{CodecError, CodecResult},
    form::{
        path::{format_path, parse_path, PathSegment},
        value::{coerce_value, render_value},
    },
};

/// Place `value` into `root` at `path`
///
/// Keys create objects and indices create arrays, padding missing elements with
/// `null`. [`PathSegment::Append`] adds a new element at the end. Leaves overwrite
/// whatever was there before. `name` is only used for error reporting.
pub fn insert(
    root: &mut Value,
    name: &str,
    path: &[PathSegment],
    value: Value,
    max_index: usize,
) -> CodecResult<()> {
    let Some((segment, rest)) = path.split_first() else {
        *root = value;
        return Ok(());
    };

    let conflict = || CodecError::FieldConflict {
        name: name.to_string(),
    };

    match segment {
        PathSegment::Key(key) => {
            if root.is_null() {
                *root = Value::Object(Map::new());
            }
            let map = root.as_object_mut().ok_or_else(conflict)?;
            let child = map.entry(key.clone()).or_insert(Value::Null);
            insert(child, name, rest, value, max_index)
        }
        PathSegment::Index(index) => {
            if *index > max_index {
                return Err(CodecError::IndexOutOfRange {
                    name: name.to_string(),
                    index: *index,
                    max: max_index,
                });
            }
            if root.is_null() {
                *root = Value::Array(Vec::new());
            }
            let items = root.as_array_mut().ok_or_else(conflict)?;
            if items.len() <= *index {
                items.resize(index + 1, Value::Null);
            }
            insert(&mut items[*index], name, rest, value, max_index)
        }
        PathSegment::Append => {
            if root.is_null() {
                *root = Value::Array(Vec::new());
            }
            let items = root.as_array_mut().ok_or_else(conflict)?;
            if items.len() > max_index {
                return Err(CodecError::IndexOutOfRange {
                    name: name.to_string(),
                    index: items.len(),
                    max: max_index,
                });
            }
            items.push(Value::Null);
            let last = items.len() - 1;
            insert(&mut items[last], name, rest, value, max_index)
        }
    }
}

/// Parse `name`, coerce `raw` and insert the result into `root`
pub fn insert_field(root: &mut Value, name: &str, raw: &str, max_index: usize) -> CodecResult<()> {
    let path = parse_path(name)?;
    let value = coerce_value(raw)?;
    insert(root, name, &path, value, max_index)
}

/// Flatten a JSON object into `(field name, raw value)` pairs in bracket notation
///
/// Empty nested objects and arrays produce no fields.
pub fn flatten(value: &Value) -> CodecResult<Vec<(String, String)>> {
    let map = value.as_object().ok_or_else(|| {
        CodecError::Unsupported(format!(
            "form data must be an object, got {}",
            kind_of(value)
        ))
    })?;

    let mut fields = Vec::new();
    let mut path = Vec::new();
    for (key, child) in map {
        path.push(PathSegment::Key(key.clone()));
        flatten_into(child, &mut path, &mut fields);
        path.pop();
    }
    Ok(fields)
}

fn flatten_into(value: &Value, path: &mut Vec<PathSegment>, fields: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                path.push(PathSegment::Key(key.clone()));
                flatten_into(child, path, fields);
                path.pop();
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                path.push(PathSegment::Index(index));
                flatten_into(child, path, fields);
                path.pop();
            }
        }
        leaf => fields.push((format_path(path), render_value(leaf))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
