//! Property lists for opening containers and creating datasets.
//!
//! Property lists group related configuration into reusable bundles that are
//! handed to the backend in one piece.

use std::path::PathBuf;

use crate::types::{ByteOrder, DType};

/// Marker for an unlimited maximum dimension.
pub const UNLIMITED: u64 = u64::MAX;

/// How a container is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Open an existing container read-only.
    #[default]
    Read,
    /// Open an existing container for modification.
    ReadWrite,
    /// Create a container, truncating any existing file.
    Create,
    /// Create a container, failing if the file already exists.
    CreateExclusive,
}

impl Mode {
    pub fn is_writable(self) -> bool {
        !matches!(self, Mode::Read)
    }

    pub fn is_create(self) -> bool {
        matches!(self, Mode::Create | Mode::CreateExclusive)
    }
}

/// Container access properties.
#[derive(Debug, Clone)]
pub struct FileAccessProps {
    pub mode: Mode,
    /// Flush pending changes when the container is dropped.
    pub flush_on_drop: bool,
    /// Directory relative external raw data paths resolve against.
    /// Defaults to the directory holding the container.
    pub external_base: Option<PathBuf>,
}

impl Default for FileAccessProps {
    fn default() -> Self {
        Self {
            mode: Mode::Read,
            flush_on_drop: true,
            external_base: None,
        }
    }
}

impl FileAccessProps {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Keep pending changes unless [`flush`](crate::StorageBackend::flush) is called.
    pub fn no_flush_on_drop(mut self) -> Self {
        self.flush_on_drop = false;
        self
    }

    pub fn external_base(mut self, dir: impl Into<PathBuf>) -> Self {
        self.external_base = Some(dir.into());
        self
    }
}

/// Dataset creation properties.
///
/// A dataset whose maximum extent differs from its initial extent must name
/// an external raw data file; inline storage is fixed-extent.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetCreateProps {
    pub dtype: DType,
    pub dims: Vec<u64>,
    /// Maximum extent; `None` means equal to `dims`.
    pub max_dims: Option<Vec<u64>>,
    /// Raw data file, relative to the container directory unless absolute.
    pub external_file: Option<PathBuf>,
    pub byte_order: ByteOrder,
}

impl DatasetCreateProps {
    pub fn new(dtype: DType, dims: &[u64]) -> Self {
        Self {
            dtype,
            dims: dims.to_vec(),
            max_dims: None,
            external_file: None,
            byte_order: ByteOrder::native(),
        }
    }

    pub fn max_dims(mut self, max: &[u64]) -> Self {
        self.max_dims = Some(max.to_vec());
        self
    }

    pub fn external_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.external_file = Some(path.into());
        self
    }

    pub fn byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = order;
        self
    }

    /// The effective maximum extent.
    pub fn effective_max_dims(&self) -> Vec<u64> {
        self.max_dims.clone().unwrap_or_else(|| self.dims.clone())
    }

    /// True when the maximum extent differs from the initial one.
    pub fn is_resizable(&self) -> bool {
        self.max_dims.as_ref().map_or(false, |max| *max != self.dims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let props = FileAccessProps::default();
        assert_eq!(props.mode, Mode::Read);
        assert!(props.flush_on_drop);
        assert!(props.external_base.is_none());
    }

    #[test]
    fn modes() {
        assert!(!Mode::Read.is_writable());
        assert!(Mode::ReadWrite.is_writable());
        assert!(Mode::CreateExclusive.is_create());
        assert!(!Mode::ReadWrite.is_create());
    }

    #[test]
    fn dataset_builder() {
        let props = DatasetCreateProps::new(DType::F32, &[10, 4])
            .max_dims(&[UNLIMITED, 4])
            .external_file("data.raw")
            .byte_order(ByteOrder::Big);
        assert!(props.is_resizable());
        assert_eq!(props.effective_max_dims(), vec![UNLIMITED, 4]);
        assert_eq!(props.byte_order, ByteOrder::Big);

        let fixed = DatasetCreateProps::new(DType::U8, &[3]).max_dims(&[3]);
        assert!(!fixed.is_resizable());
    }
}
