use lofardal_store::{AttrType, DType, StoreError};

/// Errors raised by the access layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The attribute or node does not exist.
    #[error("{path} does not exist")]
    Absent { path: String },

    /// A stored type conflicts with the declared type.
    #[error("{path}: stored type {found} conflicts with declared type {expected}")]
    SchemaMismatch {
        path: String,
        expected: String,
        found: String,
    },

    #[error("{path}: a maximum extent larger than the initial extent needs an external raw data file")]
    UnsupportedResize { path: String },

    #[error("{path}: extent {requested:?} exceeds maximum {max:?}")]
    ExtentExceeded {
        path: String,
        requested: Vec<u64>,
        max: Vec<u64>,
    },

    #[error("{path}: slice at {origin:?} of shape {shape:?} exceeds extent {extent:?}")]
    OutOfBounds {
        path: String,
        origin: Vec<u64>,
        shape: Vec<u64>,
        extent: Vec<u64>,
    },

    #[error("{path}: dataset rank is {expected}, got {got}")]
    RankMismatch {
        path: String,
        expected: usize,
        got: usize,
    },

    #[error("{path}: file is opened read-only")]
    ReadOnly { path: String },

    #[error("file has been closed")]
    Closed,

    #[error("the root group cannot be removed")]
    RootRemoval,

    #[error("invalid selector {input:?}: {reason}")]
    InvalidSelector { input: String, reason: String },

    #[error("invalid version string {0:?}")]
    InvalidVersion(String),

    #[error("invalid station name {0:?}")]
    InvalidStationName(String),

    #[error("{path}: cannot parse {literal:?} as {ty}")]
    InvalidLiteral {
        path: String,
        literal: String,
        ty: AttrType,
    },

    /// Writing a report failed.
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure in the storage backend.
    #[error("{context}: {source}")]
    Store {
        context: String,
        #[source]
        source: StoreError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn attr_mismatch(path: &str, expected: AttrType, found: AttrType) -> Self {
        Error::SchemaMismatch {
            path: path.to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub(crate) fn dtype_mismatch(path: &str, expected: DType, found: DType) -> Self {
        Error::SchemaMismatch {
            path: path.to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Map a backend error, naming the object the operation was on.
    pub(crate) fn store(path: &str, err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Error::Absent {
                path: path.to_string(),
            },
            StoreError::ReadOnly(_) => Error::ReadOnly {
                path: path.to_string(),
            },
            StoreError::UnsupportedResize(_) => Error::UnsupportedResize {
                path: path.to_string(),
            },
            StoreError::ExtentExceeded { requested, max, .. } => Error::ExtentExceeded {
                path: path.to_string(),
                requested,
                max,
            },
            StoreError::OutOfBounds {
                start,
                count,
                extent,
            } => Error::OutOfBounds {
                path: path.to_string(),
                origin: start,
                shape: count,
                extent,
            },
            StoreError::RankMismatch { expected, got, .. } => Error::RankMismatch {
                path: path.to_string(),
                expected,
                got,
            },
            StoreError::AttrTypeMismatch {
                expected, found, ..
            } => Error::attr_mismatch(path, expected, found),
            StoreError::DTypeMismatch {
                requested, actual, ..
            } => Error::dtype_mismatch(path, actual, requested),
            StoreError::NotADataset(_) => Error::SchemaMismatch {
                path: path.to_string(),
                expected: "dataset".into(),
                found: "group".into(),
            },
            StoreError::NotAGroup(_) => Error::SchemaMismatch {
                path: path.to_string(),
                expected: "group".into(),
                found: "dataset".into(),
            },
            source => Error::Store {
                context: path.to_string(),
                source,
            },
        }
    }

    /// True for [`Error::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Error::Absent { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_absent() {
        let err = Error::store("/X:NAME", StoreError::NotFound("/X".into()));
        assert!(err.is_absent());
        assert_eq!(err.to_string(), "/X:NAME does not exist");
    }

    #[test]
    fn io_errors_keep_context_and_source() {
        use std::error::Error as _;
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::store("/data.h5", StoreError::Io(io));
        assert!(matches!(err, Error::Store { .. }));
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("/data.h5: "));
    }

    #[test]
    fn contract_violations_keep_their_kind() {
        let err = Error::store(
            "/D",
            StoreError::ExtentExceeded {
                path: "/D".into(),
                requested: vec![9],
                max: vec![8],
            },
        );
        assert!(matches!(err, Error::ExtentExceeded { .. }));
        let err = Error::store("/D", StoreError::UnsupportedResize("/D".into()));
        assert!(matches!(err, Error::UnsupportedResize { .. }));
    }
}
