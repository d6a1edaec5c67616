//! Hierarchical container storage for the LOFAR data access layer.
//!
//! A container is a tree of groups and datasets, each carrying named, typed
//! attributes. Datasets are N-dimensional arrays of a numeric element type,
//! stored inline in the container or in an external raw data file when they
//! need to be resizable.
//!
//! The access layer only sees the [`StorageBackend`] trait; [`NativeStore`]
//! is the file-backed implementation shipped here.
//!
//! # Quick start
//!
//! ```no_run
//! use lofardal_store::{
//!     AttrValue, DType, DatasetCreateProps, FileAccessProps, Hyperslab, Mode, NativeStore,
//!     StorageBackend,
//! };
//!
//! let mut store = NativeStore::open("obs.h5", FileAccessProps::new(Mode::Create))?;
//! store.write_attr("/", "TELESCOPE", AttrValue::String("LOFAR".into()))?;
//! store.create_dataset("/DATA", &DatasetCreateProps::new(DType::F32, &[16]))?;
//! store.write_slice("/DATA", &Hyperslab::new(vec![0], vec![1]), &1.0f32.to_le_bytes())?;
//! store.flush()?;
//! # Ok::<(), lofardal_store::StoreError>(())
//! ```

pub mod backend;
pub mod codec;
pub mod element;
pub mod error;
pub mod hyperslab;
pub mod native;
pub mod property_list;
pub mod types;

mod external;
mod tree;

pub use backend::{Capability, DatasetInfo, ObjectKind, StorageBackend};
pub use element::{from_le_bytes, to_le_bytes, Element};
pub use error::{Result, StoreError};
pub use hyperslab::{Hyperslab, Run};
pub use native::NativeStore;
pub use property_list::{DatasetCreateProps, FileAccessProps, Mode, UNLIMITED};
pub use types::{AttrType, AttrValue, ByteOrder, DType, Range};
