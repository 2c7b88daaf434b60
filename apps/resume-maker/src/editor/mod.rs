// Path-addressed editing of the resume Document.
// Form fields parse their dotted address into a selector once, then every
// edit goes through the copy-on-write mutator.

pub mod lens;
pub mod mutator;

use thiserror::Error;

pub use lens::{FieldPath, FieldValue, ListItem, ListPath};
pub use mutator::{add_array_item, remove_array_item, update};

/// A selector that does not resolve against the Document, or a value of the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("unknown path `{0}`")]
    Unknown(String),

    #[error("`{segment}` in `{path}` is not an index")]
    BadIndex { path: String, segment: String },

    #[error("index {index} out of range for `{path}` (len {len})")]
    OutOfRange {
        path: String,
        index: usize,
        len: usize,
    },

    #[error("`{path}` expects {expected}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
    },
}
