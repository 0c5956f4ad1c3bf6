//! Flattening a JSON tree into its string leaves.

use serde_json::Value;

use super::path::LeafPath;

/// Collects every string leaf with its path, in depth-first pre-order.
///
/// Object members are visited in insertion order and array elements in index
/// order. Numbers, booleans and nulls are skipped. A bare string root yields a
/// single leaf with the root path.
pub fn extract(tree: &Value) -> Vec<(LeafPath, String)> {
    let mut leaves = Vec::new();
    collect(tree, LeafPath::root(), &mut leaves);
    leaves
}

fn collect(node: &Value, path: LeafPath, leaves: &mut Vec<(LeafPath, String)>) {
    match node {
        Value::Object(members) => {
            for (key, child) in members {
                collect(child, path.child(key.as_str()), leaves);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                collect(child, path.child(index), leaves);
            }
        }
        Value::String(text) => leaves.push((path, text.clone())),
        Value::Number(_) | Value::Bool(_) | Value::Null => {}
    }
}

/// The extracted leaves of one document, stored as two index-aligned lists.
///
/// `texts()[i]` is the original string found at `paths()[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeafIndex {
    paths: Vec<LeafPath>,
    texts: Vec<String>,
}

impl LeafIndex {
    pub fn build(tree: &Value) -> Self {
        let (paths, texts) = extract(tree).into_iter().unzip();
        Self { paths, texts }
    }

    pub const fn len(&self) -> usize {
        self.paths.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn paths(&self) -> &[LeafPath] {
        &self.paths
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LeafPath, &str)> {
        self.paths
            .iter()
            .zip(self.texts.iter().map(String::as_str))
    }

    /// Splits both lists at the same boundaries into chunks of `size`.
    ///
    /// The last batch may be shorter. A `size` of zero is treated as one.
    pub fn batches(&self, size: usize) -> impl Iterator<Item = Batch<'_>> {
        let size = size.max(1);
        self.paths
            .chunks(size)
            .zip(self.texts.chunks(size))
            .enumerate()
            .map(move |(number, (paths, texts))| Batch {
                start: number * size,
                paths,
                texts,
            })
    }
}

/// A contiguous window of a [`LeafIndex`].
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    /// Position of the first leaf of this batch in the whole index.
    pub start: usize,
    pub paths: &'a [LeafPath],
    pub texts: &'a [String],
}

impl Batch<'_> {
    pub const fn len(&self) -> usize {
        self.texts.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}
