//! Writing values back into a tree at previously extracted paths.

use serde_json::Value;
use thiserror::Error;

use super::path::{LeafPath, PathSegment};

/// Why a path segment failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Mismatch {
    #[error("key {0:?} is missing")]
    MissingKey(String),
    #[error("index {index} is out of bounds for an array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("expected an object, found {0}")]
    NotAnObject(&'static str),
    #[error("expected an array, found {0}")]
    NotAnArray(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The path does not describe the shape of the tree it was applied to.
    #[error("path {path} does not resolve at segment {depth}: {reason}")]
    StructuralMismatch {
        path: LeafPath,
        depth: usize,
        reason: Mismatch,
    },
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Object(_) => "an object",
        Value::Array(_) => "an array",
        Value::String(_) => "a string",
        Value::Number(_) => "a number",
        Value::Bool(_) => "a boolean",
        Value::Null => "null",
    }
}

fn child_mut<'a>(node: &'a mut Value, segment: &PathSegment) -> Result<&'a mut Value, Mismatch> {
    match (segment, node) {
        (PathSegment::Key(key), Value::Object(members)) => members
            .get_mut(key)
            .ok_or_else(|| Mismatch::MissingKey(key.clone())),
        (PathSegment::Index(index), Value::Array(items)) => {
            let len = items.len();
            items
                .get_mut(*index)
                .ok_or(Mismatch::IndexOutOfBounds { index: *index, len })
        }
        (PathSegment::Key(_), other) => Err(Mismatch::NotAnObject(kind(other))),
        (PathSegment::Index(_), other) => Err(Mismatch::NotAnArray(kind(other))),
    }
}

/// Overwrites the value at `path` with the string `value`.
///
/// The root path replaces the whole tree. Every segment, including the last,
/// must already exist: nothing is inserted and arrays never grow.
pub fn rehydrate(tree: &mut Value, path: &LeafPath, value: String) -> Result<(), TreeError> {
    let mismatch = |depth: usize, reason: Mismatch| TreeError::StructuralMismatch {
        path: path.clone(),
        depth,
        reason,
    };

    let Some((last, parents)) = path.split_last() else {
        *tree = Value::String(value);
        return Ok(());
    };

    let mut node = tree;
    for (depth, segment) in parents.iter().enumerate() {
        node = child_mut(node, segment).map_err(|reason| mismatch(depth, reason))?;
    }

    let slot = child_mut(node, last).map_err(|reason| mismatch(parents.len(), reason))?;
    *slot = Value::String(value);

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::tree::extract;

    fn path(segments: Vec<PathSegment>) -> LeafPath {
        LeafPath::from(segments)
    }

    fn key(k: &str) -> PathSegment {
        PathSegment::Key(k.to_string())
    }

    #[test]
    fn test_rehydrate_nested_key() {
        let mut tree = json!({"a": "Hello", "b": {"c": "World", "n": 3}});
        rehydrate(&mut tree, &path(vec![key("b"), key("c")]), "Monde".into()).unwrap();

        assert_eq!(tree, json!({"a": "Hello", "b": {"c": "Monde", "n": 3}}));
    }

    #[test]
    fn test_rehydrate_bare_array_root() {
        let original = json!(["x", "y"]);
        let mut copy = original.clone();
        let leaves = extract(&original);

        rehydrate(&mut copy, &leaves[0].0, "X".into()).unwrap();
        rehydrate(&mut copy, &leaves[1].0, "Y".into()).unwrap();

        assert_eq!(copy, json!(["X", "Y"]));
        assert_eq!(original, json!(["x", "y"]));
    }

    #[test]
    fn test_rehydrate_root_path_replaces_everything() {
        let mut tree = json!("hi");
        rehydrate(&mut tree, &LeafPath::root(), "salut".into()).unwrap();

        assert_eq!(tree, json!("salut"));
    }

    #[test]
    fn test_rehydrate_keeps_key_order() {
        let mut tree: Value = serde_json::from_str(r#"{"z": "1", "a": "2", "m": "3"}"#).unwrap();
        rehydrate(&mut tree, &path(vec![key("a")]), "deux".into()).unwrap();

        assert_eq!(tree.to_string(), r#"{"z":"1","a":"deux","m":"3"}"#);
    }

    #[test]
    fn test_rehydrate_missing_intermediate_key() {
        let mut tree = json!({"a": {"b": "x"}});
        let err = rehydrate(&mut tree, &path(vec![key("q"), key("b")]), "y".into()).unwrap_err();

        assert_eq!(
            err,
            TreeError::StructuralMismatch {
                path: path(vec![key("q"), key("b")]),
                depth: 0,
                reason: Mismatch::MissingKey("q".to_string()),
            }
        );
        assert_eq!(tree, json!({"a": {"b": "x"}}));
    }

    #[test]
    fn test_rehydrate_missing_final_key_is_not_inserted() {
        let mut tree = json!({"a": {}});
        let err = rehydrate(&mut tree, &path(vec![key("a"), key("new")]), "y".into()).unwrap_err();

        assert!(matches!(
            err,
            TreeError::StructuralMismatch { depth: 1, reason: Mismatch::MissingKey(_), .. }
        ));
        assert_eq!(tree, json!({"a": {}}));
    }

    #[test]
    fn test_rehydrate_index_out_of_bounds() {
        let mut tree = json!({"list": ["only"]});
        let err = rehydrate(
            &mut tree,
            &path(vec![key("list"), PathSegment::Index(4)]),
            "y".into(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            TreeError::StructuralMismatch {
                reason: Mismatch::IndexOutOfBounds { index: 4, len: 1 },
                ..
            }
        ));
    }

    #[test]
    fn test_rehydrate_wrong_container_kind() {
        let mut tree = json!({"a": ["x"]});
        let err = rehydrate(&mut tree, &path(vec![key("a"), key("b")]), "y".into()).unwrap_err();
        assert!(matches!(
            err,
            TreeError::StructuralMismatch { reason: Mismatch::NotAnObject("an array"), .. }
        ));

        let mut tree = json!({"a": "scalar"});
        let err = rehydrate(
            &mut tree,
            &path(vec![key("a"), PathSegment::Index(0)]),
            "y".into(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TreeError::StructuralMismatch { reason: Mismatch::NotAnArray("a string"), .. }
        ));
    }

    #[test]
    fn test_structural_mismatch_message() {
        let mut tree = json!({});
        let err = rehydrate(&mut tree, &path(vec![key("menu"), key("title")]), "y".into())
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            r#"path $.menu.title does not resolve at segment 0: key "menu" is missing"#
        );
    }
}
