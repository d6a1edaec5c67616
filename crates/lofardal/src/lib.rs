//! Schema-driven access to LOFAR beam-formed and transient buffer board files.
//!
//! A file is a tree of groups and datasets. Every node kind has a table of
//! recognized attributes in [`schema`], with their types, defaults and the
//! format version that introduced them. Handles are cheap path arithmetic;
//! nothing is read until an accessor asks for it, and nothing is cached.
//!
//! # Reading
//!
//! ```no_run
//! use lofardal::lofar::{BfFile, CommonAttributes};
//! use lofardal::Mode;
//!
//! let file = BfFile::open("L123_SAP000_B000_S0_P000_bf.h5", Mode::Read)?;
//! println!("telescope: {}", file.telescope().get()?);
//! for sap in file.sub_array_pointings() {
//!     for beam in sap.beams() {
//!         println!("{} RA={}", beam.path(), beam.point_ra().get_or_default()?);
//!     }
//! }
//! # Ok::<(), lofardal::Error>(())
//! ```
//!
//! # Writing
//!
//! ```no_run
//! use lofardal::lofar::BfFile;
//! use lofardal::{FileCreateOptions, UNLIMITED};
//! use std::path::Path;
//!
//! let file = BfFile::create("obs_bf.h5", &FileCreateOptions::new())?;
//! let stokes = file.sub_array_pointing(0).beam(0).stokes(0);
//! file.sub_array_pointing(0).beam(0).create()?;
//! stokes.create(&[0, 16], &[UNLIMITED, 16], Some(Path::new("obs_S0.raw")))?;
//! stokes.resize(&[128, 16])?;
//! file.flush()?;
//! # Ok::<(), lofardal::Error>(())
//! ```

pub mod attribute;
pub mod dataset;
pub mod error;
pub mod file;
pub mod introspect;
pub mod lofar;
pub mod naming;
pub mod node;
pub mod schema;
pub mod selector;
pub mod traverse;
pub mod version;

pub use attribute::{AttrData, AttrHandle, Attribute};
pub use dataset::Dataset;
pub use error::{Error, Result};
pub use file::{File, FileCreateOptions};
pub use introspect::{introspect, AttributeReport, FormatContext, HeaderPrinter};
pub use node::{Group, Node};
pub use schema::NodeKind;
pub use selector::{build_paths, parse as parse_selector, Request, Selection};
pub use traverse::children;
pub use version::{Version, CURRENT_FORMAT_VERSION};

pub use lofardal_store::{
    AttrType, AttrValue, ByteOrder, DType, FileAccessProps, Mode, Range, UNLIMITED,
};
