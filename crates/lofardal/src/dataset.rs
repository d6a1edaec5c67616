//! N-dimensional array datasets.
//!
//! Slices move as [`ndarray`] arrays in row-major order. The element type
//! `T` must equal the stored element type exactly.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use lofardal_store::{
    from_le_bytes, to_le_bytes, ByteOrder, DType, DatasetCreateProps, DatasetInfo, Element,
    Hyperslab, ObjectKind, StoreError,
};
use ndarray::{ArrayD, ArrayViewD, IxDyn};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::node::Node;

/// Handle on a dataset of element type `T`.
pub struct Dataset<T> {
    node: Node,
    _elem: PhantomData<fn() -> T>,
}

impl<T> Clone for Dataset<T> {
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
            _elem: PhantomData,
        }
    }
}

impl<T: Element> fmt::Debug for Dataset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dataset")
            .field("path", &self.node.path())
            .field("dtype", &T::DTYPE)
            .finish()
    }
}

impl<T> From<Node> for Dataset<T> {
    fn from(node: Node) -> Self {
        Self {
            node,
            _elem: PhantomData,
        }
    }
}

impl<T> Deref for Dataset<T> {
    type Target = Node;

    fn deref(&self) -> &Node {
        &self.node
    }
}

impl<T: Element> Dataset<T> {
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// True iff a dataset is stored at this path. Never fails.
    pub fn exists(&self) -> bool {
        self.node.object_kind() == Some(ObjectKind::Dataset)
    }

    /// Create the dataset with extent `dims`.
    ///
    /// A `max_dims` larger than `dims` in any dimension needs an `external`
    /// raw data file; without one this fails with
    /// [`Error::UnsupportedResize`].
    pub fn create(&self, dims: &[u64], max_dims: &[u64], external: Option<&Path>) -> Result<()> {
        let mut props = DatasetCreateProps::new(T::DTYPE, dims).max_dims(max_dims);
        if let Some(file) = external {
            props = props.external_file(file);
        }
        self.create_with(&props)
    }

    /// Create the dataset from explicit creation properties.
    pub fn create_with(&self, props: &DatasetCreateProps) -> Result<()> {
        let path = self.node.path();
        if props.dtype != T::DTYPE {
            return Err(Error::dtype_mismatch(path, T::DTYPE, props.dtype));
        }
        let max = props.effective_max_dims();
        if max.len() != props.dims.len() {
            return Err(Error::RankMismatch {
                path: path.to_string(),
                expected: props.dims.len(),
                got: max.len(),
            });
        }
        if props.dims.iter().zip(&max).any(|(d, m)| m < d) {
            return Err(Error::ExtentExceeded {
                path: path.to_string(),
                requested: props.dims.clone(),
                max,
            });
        }
        if props.is_resizable() && props.external_file.is_none() {
            return Err(Error::UnsupportedResize {
                path: path.to_string(),
            });
        }
        self.node.with_store_mut(|s| s.create_dataset(path, props))?;
        debug!(path, dtype = %T::DTYPE, dims = ?props.dims, max_dims = ?max, "created dataset");
        Ok(())
    }

    /// Stored shape description, checked against `T`.
    pub fn info(&self) -> Result<DatasetInfo> {
        let info = self.node.with_store(|s| s.dataset_info(self.node.path()))?;
        if info.dtype != T::DTYPE {
            return Err(Error::dtype_mismatch(self.node.path(), T::DTYPE, info.dtype));
        }
        Ok(info)
    }

    pub fn dims(&self) -> Result<Vec<u64>> {
        Ok(self.info()?.dims)
    }

    pub fn max_dims(&self) -> Result<Vec<u64>> {
        Ok(self.info()?.max_dims)
    }

    pub fn ndims(&self) -> Result<usize> {
        Ok(self.info()?.rank())
    }

    /// Raw data files backing the dataset; empty when stored inline.
    pub fn external_files(&self) -> Result<Vec<PathBuf>> {
        Ok(self.info()?.external_files)
    }

    /// Stored element type, whatever `T` is.
    pub fn dtype(&self) -> Result<DType> {
        Ok(self
            .node
            .with_store(|s| s.dataset_info(self.node.path()))?
            .dtype)
    }

    pub fn byte_order(&self) -> Result<ByteOrder> {
        Ok(self.info()?.byte_order)
    }

    /// Change the extent within the maximum extent, growing or shrinking.
    ///
    /// Elements keep their coordinates; new space reads as zero.
    pub fn resize(&self, dims: &[u64]) -> Result<()> {
        let info = self.info()?;
        let rank = info.rank();
        if dims.len() != rank {
            return Err(Error::RankMismatch {
                path: info.path,
                expected: rank,
                got: dims.len(),
            });
        }
        if dims.iter().zip(&info.max_dims).any(|(d, m)| d > m) {
            return Err(Error::ExtentExceeded {
                path: info.path,
                requested: dims.to_vec(),
                max: info.max_dims,
            });
        }
        self.node
            .with_store_mut(|s| s.resize_dataset(self.node.path(), dims))?;
        debug!(path = self.node.path(), from = ?info.dims, to = ?dims, "resized dataset");
        Ok(())
    }

    fn slab(&self, origin: &[u64], shape: &[u64]) -> Result<Hyperslab> {
        let rank = self.info()?.rank();
        if origin.len() != rank || shape.len() != rank {
            return Err(Error::RankMismatch {
                path: self.node.path().to_string(),
                expected: rank,
                got: if origin.len() != rank {
                    origin.len()
                } else {
                    shape.len()
                },
            });
        }
        Ok(Hyperslab::new(origin.to_vec(), shape.to_vec()))
    }

    /// Read the block of `shape` elements starting at `origin`.
    pub fn read_slice(&self, origin: &[u64], shape: &[usize]) -> Result<ArrayD<T>> {
        let count: Vec<u64> = shape.iter().map(|&n| n as u64).collect();
        let slab = self.slab(origin, &count)?;
        let bytes = self
            .node
            .with_store(|s| s.read_slice(self.node.path(), &slab))?;
        trace!(path = self.node.path(), ?origin, ?shape, "read slice");
        let values: Vec<T> = from_le_bytes(&bytes);
        let got = values.len();
        ArrayD::from_shape_vec(IxDyn(shape), values).map_err(|_| Error::Store {
            context: self.node.path().to_string(),
            source: StoreError::BufferSize {
                expected: shape.iter().product(),
                got,
            },
        })
    }

    /// Write `data` as the block starting at `origin`.
    pub fn write_slice(&self, origin: &[u64], data: &ArrayViewD<'_, T>) -> Result<()> {
        let count: Vec<u64> = data.shape().iter().map(|&n| n as u64).collect();
        let slab = self.slab(origin, &count)?;
        let values: Vec<T> = data.iter().copied().collect();
        self.node
            .with_store_mut(|s| s.write_slice(self.node.path(), &slab, &to_le_bytes(&values)))?;
        trace!(path = self.node.path(), ?origin, shape = ?data.shape(), "wrote slice");
        Ok(())
    }

    /// Read the single element at `pos`.
    pub fn get_scalar(&self, pos: &[u64]) -> Result<T> {
        let block = self.read_slice(pos, &vec![1; pos.len()])?;
        block.iter().next().copied().ok_or_else(|| Error::Store {
            context: self.node.path().to_string(),
            source: StoreError::BufferSize {
                expected: 1,
                got: 0,
            },
        })
    }

    /// Write the single element at `pos`.
    pub fn set_scalar(&self, pos: &[u64], value: T) -> Result<()> {
        let slab = self.slab(pos, &vec![1; pos.len()])?;
        self.node
            .with_store_mut(|s| s.write_slice(self.node.path(), &slab, &to_le_bytes(&[value])))
    }

    /// Read `count` elements of a 1-D dataset starting at `offset`.
    pub fn get_1d(&self, offset: u64, count: usize) -> Result<Vec<T>> {
        Ok(self.read_slice(&[offset], &[count])?.into_raw_vec())
    }

    /// Write `values` into a 1-D dataset starting at `offset`.
    pub fn set_1d(&self, offset: u64, values: &[T]) -> Result<()> {
        let view = ArrayViewD::from_shape(IxDyn(&[values.len()]), values).map_err(|_| {
            Error::RankMismatch {
                path: self.node.path().to_string(),
                expected: 1,
                got: 0,
            }
        })?;
        self.write_slice(&[offset], &view)
    }
}
