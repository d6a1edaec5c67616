//! Pluggable storage backend abstraction.
//!
//! The access layer talks to hierarchical containers only through
//! [`StorageBackend`]:
//!
//! ```text
//! ┌──────────────────────────────┐
//! │  lofardal access layer       │
//! ├──────────────────────────────┤
//! │  StorageBackend              │  ← trait defined here
//! ├──────────────┬───────────────┤
//! │ NativeStore  │  (others)     │
//! └──────────────┴───────────────┘
//! ```
//!
//! Paths are absolute and slash-delimited; `/` is the root group.

use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};
use crate::hyperslab::Hyperslab;
use crate::property_list::{DatasetCreateProps, Mode};
use crate::types::{AttrType, AttrValue, ByteOrder, DType};

/// Capabilities a backend may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Can modify containers.
    Write,
    /// Can resize datasets.
    Resize,
    /// Can back datasets with external raw data files.
    ExternalStorage,
}

/// Kind of object at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Group,
    Dataset,
}

/// Shape and storage description of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetInfo {
    pub path: String,
    pub dtype: DType,
    pub byte_order: ByteOrder,
    pub dims: Vec<u64>,
    pub max_dims: Vec<u64>,
    /// Raw data files, resolved against the container's directory.
    pub external_files: Vec<PathBuf>,
}

impl DatasetInfo {
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn num_elements(&self) -> u64 {
        self.dims.iter().product()
    }
}

/// Storage backend for hierarchical containers.
///
/// Slice buffers cross this boundary as packed little-endian element bytes
/// regardless of the dataset's on-disk byte order.
pub trait StorageBackend {
    /// Backend name, e.g. `"native"`.
    fn name(&self) -> &str;

    fn capabilities(&self) -> Vec<Capability>;

    fn supports(&self, cap: Capability) -> bool {
        self.capabilities().contains(&cap)
    }

    fn mode(&self) -> Mode;

    /// Filesystem location of the container, if it has one.
    fn location(&self) -> Option<&Path>;

    /// Kind of object at `path`, or `None` if nothing is there.
    fn object_kind(&self, path: &str) -> Result<Option<ObjectKind>>;

    /// Create a group and any missing ancestors. Existing groups are left alone.
    fn create_group(&mut self, path: &str) -> Result<()>;

    /// Remove an object and everything below it.
    fn remove_object(&mut self, path: &str) -> Result<()>;

    /// Names of the child objects of a group, sorted.
    fn child_names(&self, path: &str) -> Result<Vec<String>>;

    /// Names of the attributes of an object, sorted.
    fn attr_names(&self, path: &str) -> Result<Vec<String>>;

    fn attr_type(&self, path: &str, name: &str) -> Result<Option<AttrType>>;

    fn read_attr(&self, path: &str, name: &str) -> Result<Option<AttrValue>>;

    /// Write an attribute. An existing attribute keeps its type: writing a
    /// value of another type fails.
    fn write_attr(&mut self, path: &str, name: &str, value: AttrValue) -> Result<()>;

    /// Remove an attribute; returns whether it existed.
    fn remove_attr(&mut self, path: &str, name: &str) -> Result<bool>;

    fn create_dataset(&mut self, path: &str, props: &DatasetCreateProps) -> Result<()>;

    fn dataset_info(&self, path: &str) -> Result<DatasetInfo>;

    fn resize_dataset(&mut self, path: &str, dims: &[u64]) -> Result<()> {
        let _ = dims;
        Err(StoreError::Unsupported(format!(
            "{}: resize of {path}",
            self.name()
        )))
    }

    fn read_slice(&self, path: &str, slab: &Hyperslab) -> Result<Vec<u8>>;

    fn write_slice(&mut self, path: &str, slab: &Hyperslab, data: &[u8]) -> Result<()>;

    /// Force pending changes to stable storage. Idempotent.
    fn flush(&mut self) -> Result<()>;
}
