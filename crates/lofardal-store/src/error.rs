use std::io;

use crate::types::{AttrType, DType};

/// Errors raised by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid container format: {0}")]
    Format(String),

    #[error("unexpected end of container image at offset {offset}: need {needed} bytes, have {available}")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("object not found: {0}")]
    NotFound(String),

    #[error("not a group: {0}")]
    NotAGroup(String),

    #[error("not a dataset: {0}")]
    NotADataset(String),

    #[error("object already exists: {0}")]
    AlreadyExists(String),

    #[error("container opened read-only: cannot modify {0}")]
    ReadOnly(String),

    #[error("attribute {name} on {path}: expected {expected}, found {found}")]
    AttrTypeMismatch {
        path: String,
        name: String,
        expected: AttrType,
        found: AttrType,
    },

    #[error("dataset {path} holds {actual} elements, request was for {requested}")]
    DTypeMismatch {
        path: String,
        requested: DType,
        actual: DType,
    },

    #[error("rank mismatch on {path}: dataset rank {expected}, selection rank {got}")]
    RankMismatch {
        path: String,
        expected: usize,
        got: usize,
    },

    #[error("extent {requested:?} exceeds maximum {max:?} on {path}")]
    ExtentExceeded {
        path: String,
        requested: Vec<u64>,
        max: Vec<u64>,
    },

    #[error("selection start {start:?} count {count:?} outside extent {extent:?}")]
    OutOfBounds {
        start: Vec<u64>,
        count: Vec<u64>,
        extent: Vec<u64>,
    },

    #[error("buffer holds {got} bytes, selection needs {expected}")]
    BufferSize { expected: usize, got: usize },

    #[error("dataset {0} is not resizable without an external raw data file")]
    UnsupportedResize(String),

    #[error("invalid object path: {0:?}")]
    InvalidPath(String),

    #[error("operation not supported by backend: {0}")]
    Unsupported(String),

    #[error("file already exists: {0}")]
    FileExists(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert_and_keep_source() {
        use std::error::Error as _;
        let err: StoreError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, StoreError::Io(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn messages_name_the_object() {
        let err = StoreError::NotFound("/SUB_ARRAY_POINTING_000".into());
        assert_eq!(err.to_string(), "object not found: /SUB_ARRAY_POINTING_000");
    }
}
