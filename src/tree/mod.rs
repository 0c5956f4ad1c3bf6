//! Path-preserving flatten and rehydrate of JSON trees.
//!
//! [`extract`] walks a document and lists every string leaf with the path
//! that reaches it; [`rehydrate`] writes a new string back at one of those
//! paths in a clone of the same document. Paths only ever come from the tree
//! they are applied to, so a [`TreeError`] means the two are out of sync.

mod leaves;
mod path;
mod rehydrate;

pub use leaves::{Batch, LeafIndex, extract};
pub use path::{LeafPath, PathSegment};
pub use rehydrate::{Mismatch, TreeError, rehydrate};
