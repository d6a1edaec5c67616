//! Typed attribute marshaling.
//!
//! An [`Attribute<T>`] is a name on a node plus the Rust type its value is
//! read and written as. The stored value is optional: an absent attribute is
//! reported as [`Error::Absent`], never silently replaced by a default,
//! unless [`Attribute::get_or_default`] is asked for.

use std::fmt;
use std::marker::PhantomData;

use lofardal_store::{AttrType, AttrValue, Range};
use num_complex::Complex64;

use crate::error::{Error, Result};
use crate::naming;
use crate::node::Node;
use crate::schema::{self, SchemaEntry};

// ---------------------------------------------------------------------------
// AttrData
// ---------------------------------------------------------------------------

/// A Rust type an attribute can be marshaled as.
///
/// Each type maps to exactly one stored type class; there is no widening.
pub trait AttrData: Clone + Default + fmt::Debug + Sized {
    const TYPE: AttrType;

    fn from_value(value: AttrValue) -> Option<Self>;

    fn into_value(self) -> AttrValue;
}

macro_rules! impl_attr_data {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl AttrData for $ty {
                const TYPE: AttrType = AttrType::$variant;

                fn from_value(value: AttrValue) -> Option<Self> {
                    match value {
                        AttrValue::$variant(v) => Some(v),
                        _ => None,
                    }
                }

                fn into_value(self) -> AttrValue {
                    AttrValue::$variant(self)
                }
            }
        )*
    };
}

impl_attr_data! {
    bool => Bool,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f64 => Float64,
    String => String,
    Vec<i32> => Int32Array,
    Vec<u32> => UInt32Array,
    Vec<f64> => Float64Array,
    Vec<String> => StringArray,
    Vec<Complex64> => Complex64Array,
    Vec<Range> => RangeArray,
}

// ---------------------------------------------------------------------------
// Attribute<T>
// ---------------------------------------------------------------------------

/// Typed handle on one attribute of a node.
pub struct Attribute<T> {
    node: Node,
    name: String,
    _type: PhantomData<fn() -> T>,
}

impl<T> Clone for Attribute<T> {
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
            name: self.name.clone(),
            _type: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Attribute<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("node", &self.node.path())
            .field("name", &self.name)
            .finish()
    }
}

impl<T: AttrData> Attribute<T> {
    pub(crate) fn new(node: Node, name: &str) -> Self {
        Self {
            node,
            name: name.to_string(),
            _type: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the attribute as if it were a child of its node.
    pub fn path(&self) -> String {
        naming::join(self.node.path(), &self.name)
    }

    /// Schema definition, if the name is known for the node's kind.
    pub fn definition(&self) -> Option<&'static SchemaEntry> {
        schema::definition_for(self.node.kind(), &self.name)
    }

    /// True iff the attribute is stored. Never fails.
    pub fn exists(&self) -> bool {
        self.stored_type().is_some()
    }

    fn stored_type(&self) -> Option<AttrType> {
        self.node
            .with_store(|s| s.attr_type(self.node.path(), &self.name))
            .ok()
            .flatten()
    }

    /// Stored value; [`Error::Absent`] when it is not stored.
    pub fn get(&self) -> Result<T> {
        let value = self
            .node
            .with_store(|s| s.read_attr(self.node.path(), &self.name))
            .map_err(|e| self.relabel(e))?;
        let Some(value) = value else {
            return Err(Error::Absent { path: self.path() });
        };
        let found = value.attr_type();
        T::from_value(value).ok_or_else(|| Error::attr_mismatch(&self.path(), T::TYPE, found))
    }

    /// Stored value, else the schema default, else the type's zero value.
    pub fn get_or_default(&self) -> Result<T> {
        match self.get() {
            Err(e) if e.is_absent() => Ok(self.default_value()),
            other => other,
        }
    }

    /// The schema default converted to `T`, or `T::default()`.
    pub fn default_value(&self) -> T {
        self.definition()
            .and_then(SchemaEntry::default_value)
            .and_then(T::from_value)
            .unwrap_or_default()
    }

    /// Store `value`. An existing attribute keeps its stored type class.
    pub fn set(&self, value: T) -> Result<()> {
        if let Some(def) = self.definition() {
            if def.ty != T::TYPE {
                return Err(Error::attr_mismatch(&self.path(), def.ty, T::TYPE));
            }
        }
        self.node
            .with_store_mut(|s| s.write_attr(self.node.path(), &self.name, value.into_value()))
            .map_err(|e| self.relabel(e))
    }

    /// Write the default value unless the attribute is already stored.
    pub fn create(&self) -> Result<()> {
        match self.stored_type() {
            Some(found) if found == T::TYPE => Ok(()),
            Some(found) => Err(Error::attr_mismatch(&self.path(), T::TYPE, found)),
            None => self.set(self.default_value()),
        }
    }

    /// Remove the attribute; returns whether it was stored.
    pub fn remove(&self) -> Result<bool> {
        self.node
            .with_store_mut(|s| s.remove_attr(self.node.path(), &self.name))
            .map_err(|e| self.relabel(e))
    }

    /// Stored with the declared type class.
    pub fn valid(&self) -> bool {
        let declared = self.definition().map_or(T::TYPE, |d| d.ty);
        self.stored_type() == Some(declared)
    }

    /// Defined by the schema at the file's format version.
    pub fn supported(&self) -> bool {
        schema::is_supported(self.node.kind(), &self.name, self.node.file_version())
    }

    fn relabel(&self, err: Error) -> Error {
        relabel(err, self.node.path(), &self.path())
    }
}

/// Name the attribute rather than its node in errors raised on the node path.
fn relabel(err: Error, node_path: &str, attr_path: &str) -> Error {
    match err {
        Error::Absent { path } if path == node_path => Error::Absent {
            path: attr_path.to_string(),
        },
        Error::SchemaMismatch {
            path,
            expected,
            found,
        } if path == node_path => Error::SchemaMismatch {
            path: attr_path.to_string(),
            expected,
            found,
        },
        other => other,
    }
}

// ---------------------------------------------------------------------------
// AttrHandle
// ---------------------------------------------------------------------------

/// Attribute handle whose type is only known at run time.
///
/// Used for introspection and for editing values given as text.
#[derive(Clone, Debug)]
pub struct AttrHandle {
    node: Node,
    name: String,
}

impl AttrHandle {
    pub(crate) fn new(node: Node, name: &str) -> Self {
        Self {
            node,
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> String {
        naming::join(self.node.path(), &self.name)
    }

    pub fn definition(&self) -> Option<&'static SchemaEntry> {
        schema::definition_for(self.node.kind(), &self.name)
    }

    pub fn exists(&self) -> bool {
        self.stored_type().ok().flatten().is_some()
    }

    pub fn stored_type(&self) -> Result<Option<AttrType>> {
        self.node
            .with_store(|s| s.attr_type(self.node.path(), &self.name))
    }

    /// Stored value, or `None` when absent.
    pub fn value(&self) -> Result<Option<AttrValue>> {
        self.node
            .with_store(|s| s.read_attr(self.node.path(), &self.name))
    }

    pub fn set_value(&self, value: AttrValue) -> Result<()> {
        if let Some(def) = self.definition() {
            if def.ty != value.attr_type() {
                return Err(Error::attr_mismatch(&self.path(), def.ty, value.attr_type()));
            }
        }
        self.node
            .with_store_mut(|s| s.write_attr(self.node.path(), &self.name, value))
            .map_err(|e| relabel(e, self.node.path(), &self.path()))
    }

    /// Parse `literal` as the stored type, else the declared type, else a
    /// string, and store it.
    pub fn set_literal(&self, literal: &str) -> Result<()> {
        let ty = match self.stored_type()? {
            Some(ty) => ty,
            None => self.definition().map_or(AttrType::String, |d| d.ty),
        };
        let value = AttrValue::parse(ty, literal).ok_or_else(|| Error::InvalidLiteral {
            path: self.path(),
            literal: literal.to_string(),
            ty,
        })?;
        self.set_value(value)
    }

    pub fn remove(&self) -> Result<bool> {
        self.node
            .with_store_mut(|s| s.remove_attr(self.node.path(), &self.name))
    }
}
