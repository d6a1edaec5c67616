//! Path-addressed handles onto the open container.
//!
//! A handle is nothing more than a weak reference to the file plus a
//! canonical path and the schema kind of the node at that path. Building a
//! handle never touches storage; the node is materialized only by
//! [`Group::create`] or a dataset create.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use lofardal_store::{Mode, ObjectKind, StorageBackend, StoreError};

use crate::attribute::{AttrData, AttrHandle, Attribute};
use crate::error::{Error, Result};
use crate::naming;
use crate::schema::{self, NodeKind};
use crate::version::Version;

// ---------------------------------------------------------------------------
// FileContext
// ---------------------------------------------------------------------------

/// State shared by a [`File`](crate::File) and every handle derived from it.
pub(crate) struct FileContext {
    pub(crate) store: RefCell<Box<dyn StorageBackend>>,
    pub(crate) filename: String,
    pub(crate) mode: Mode,
    pub(crate) version: Cell<Version>,
}

impl FileContext {
    pub(crate) fn new(store: Box<dyn StorageBackend>, filename: String) -> Self {
        let mode = store.mode();
        Self {
            store: RefCell::new(store),
            filename,
            mode,
            version: Cell::new(Version::default()),
        }
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A node of any kind: group, dataset or something not yet created.
#[derive(Clone)]
pub struct Node {
    ctx: Weak<FileContext>,
    path: String,
    kind: NodeKind,
}

impl Node {
    pub(crate) fn new(ctx: Weak<FileContext>, path: String, kind: NodeKind) -> Self {
        Self { ctx, path, kind }
    }

    fn context(&self) -> Result<Rc<FileContext>> {
        self.ctx.upgrade().ok_or(Error::Closed)
    }

    /// Run a read-only backend operation, mapping its error onto this node.
    pub(crate) fn with_store<R>(
        &self,
        op: impl FnOnce(&dyn StorageBackend) -> std::result::Result<R, StoreError>,
    ) -> Result<R> {
        let ctx = self.context()?;
        let store = ctx.store.borrow();
        op(store.as_ref()).map_err(|e| Error::store(&self.path, e))
    }

    /// Run a modifying backend operation. Fails up front on a read-only file.
    pub(crate) fn with_store_mut<R>(
        &self,
        op: impl FnOnce(&mut dyn StorageBackend) -> std::result::Result<R, StoreError>,
    ) -> Result<R> {
        let ctx = self.context()?;
        if !ctx.mode.is_writable() {
            return Err(Error::ReadOnly {
                path: self.path.clone(),
            });
        }
        let mut store = ctx.store.borrow_mut();
        op(store.as_mut()).map_err(|e| Error::store(&self.path, e))
    }

    /// Canonical slash-delimited path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last path component; empty for the root.
    pub fn name(&self) -> &str {
        naming::base_name(&self.path)
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_root(&self) -> bool {
        self.path == "/"
    }

    /// Kind of object stored at this path, if any. Never fails.
    pub fn object_kind(&self) -> Option<ObjectKind> {
        self.with_store(|s| s.object_kind(&self.path)).ok().flatten()
    }

    /// True iff something is stored at this path.
    pub fn exists(&self) -> bool {
        self.object_kind().is_some()
    }

    /// True iff the file is open for writing and still open.
    pub fn can_write(&self) -> bool {
        self.ctx.upgrade().map_or(false, |ctx| ctx.mode.is_writable())
    }

    /// Format version of the file this node belongs to.
    pub fn file_version(&self) -> Version {
        self.ctx
            .upgrade()
            .map_or_else(Version::default, |ctx| ctx.version.get())
    }

    /// Typed handle on the attribute `name`. No I/O.
    pub fn attribute<T: AttrData>(&self, name: &str) -> Attribute<T> {
        Attribute::new(self.clone(), name)
    }

    /// Untyped handle on the attribute `name`. No I/O.
    pub fn attr(&self, name: &str) -> AttrHandle {
        AttrHandle::new(self.clone(), name)
    }

    /// Stored attribute names, sorted.
    pub fn attribute_names(&self) -> Result<Vec<String>> {
        self.with_store(|s| s.attr_names(&self.path))
    }

    /// Child handle by name. Pure path arithmetic.
    pub fn child_node(&self, name: &str, kind: NodeKind) -> Node {
        Node::new(self.ctx.clone(), naming::join(&self.path, name), kind)
    }

    /// True iff a child object called `name` exists.
    pub fn has_child(&self, name: &str) -> bool {
        self.with_store(|s| s.object_kind(&naming::join(&self.path, name)))
            .ok()
            .flatten()
            .is_some()
    }

    /// Names of the stored child objects, sorted. Empty for datasets.
    pub fn child_names(&self) -> Result<Vec<String>> {
        match self.object_kind() {
            Some(ObjectKind::Group) => self.with_store(|s| s.child_names(&self.path)),
            Some(ObjectKind::Dataset) => Ok(Vec::new()),
            None => Err(Error::Absent {
                path: self.path.clone(),
            }),
        }
    }

    /// Raw attribute names followed by raw child names, each sorted.
    pub fn node_names(&self) -> Result<Vec<String>> {
        let mut names = self.attribute_names()?;
        names.extend(self.child_names()?);
        Ok(names)
    }

    /// Remove this node and everything below it.
    pub fn remove(&self) -> Result<()> {
        if self.is_root() {
            return Err(Error::RootRemoval);
        }
        self.with_store_mut(|s| s.remove_object(&self.path))
    }

    /// Write the schema's `GROUPTYPE` default when the node lacks one.
    pub(crate) fn write_group_type(&self) -> Result<()> {
        let Some(entry) = schema::definition_for(self.kind, "GROUPTYPE") else {
            return Ok(());
        };
        if entry.default.is_some() {
            self.attribute::<String>(entry.name).create()?;
        }
        Ok(())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("path", &self.path)
            .field("kind", &self.kind)
            .field("open", &(self.ctx.strong_count() > 0))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Group
// ---------------------------------------------------------------------------

/// Handle on a group.
#[derive(Clone, Debug)]
pub struct Group {
    node: Node,
}

impl Group {
    /// True iff a group is stored at this path. Never fails.
    pub fn exists(&self) -> bool {
        self.node.object_kind() == Some(ObjectKind::Group)
    }

    /// Create this group and any missing ancestors. Idempotent.
    pub fn create(&self) -> Result<()> {
        match self.node.object_kind() {
            Some(ObjectKind::Dataset) => {
                return Err(Error::SchemaMismatch {
                    path: self.path().to_string(),
                    expected: "group".into(),
                    found: "dataset".into(),
                })
            }
            Some(ObjectKind::Group) => {}
            None => self.with_store_mut(|s| s.create_group(self.path()))?,
        }
        self.write_group_type()
    }

    /// Child group `kind[index]`, e.g. `SUB_ARRAY_POINTING_003`.
    ///
    /// Kinds without an indexed naming rule fall back to the decimal index.
    pub fn child(&self, kind: NodeKind, index: usize) -> Group {
        let name = naming::indexed_name(kind, index).unwrap_or_else(|| index.to_string());
        self.child_named(&name, kind)
    }

    /// Child group by name. Pure path arithmetic.
    pub fn child_named(&self, name: &str, kind: NodeKind) -> Group {
        Group::from(self.node.child_node(name, kind))
    }

    pub fn node(&self) -> &Node {
        &self.node
    }
}

impl From<Node> for Group {
    fn from(node: Node) -> Self {
        Self { node }
    }
}

impl Deref for Group {
    type Target = Node;

    fn deref(&self) -> &Node {
        &self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lofardal_store::NativeStore;

    fn context() -> Rc<FileContext> {
        Rc::new(FileContext::new(
            Box::new(NativeStore::in_memory()),
            "mem.h5".into(),
        ))
    }

    fn root(ctx: &Rc<FileContext>) -> Group {
        Group::from(Node::new(Rc::downgrade(ctx), "/".into(), NodeKind::BfRoot))
    }

    #[test]
    fn handles_do_no_io_until_create() {
        let ctx = context();
        let sap = root(&ctx).child(NodeKind::SubArrayPointing, 3);
        assert_eq!(sap.path(), "/SUB_ARRAY_POINTING_003");
        assert!(!sap.exists());
        sap.create().unwrap();
        assert!(sap.exists());
        assert_eq!(
            sap.attribute::<String>("GROUPTYPE").get().unwrap(),
            "SubArrayPointing"
        );
    }

    #[test]
    fn create_is_idempotent_and_builds_ancestors() {
        let ctx = context();
        let beam = root(&ctx)
            .child(NodeKind::SubArrayPointing, 0)
            .child(NodeKind::Beam, 2);
        beam.create().unwrap();
        beam.create().unwrap();
        assert!(root(&ctx).child(NodeKind::SubArrayPointing, 0).exists());
        assert_eq!(beam.path(), "/SUB_ARRAY_POINTING_000/BEAM_002");
    }

    #[test]
    fn closed_file_reads_as_absent() {
        let ctx = context();
        let g = root(&ctx).child_named("G", NodeKind::Generic);
        g.create().unwrap();
        drop(ctx);
        assert!(!g.exists());
        assert!(!g.can_write());
        assert!(matches!(g.create(), Err(Error::Closed)));
    }

    #[test]
    fn root_cannot_be_removed() {
        let ctx = context();
        assert!(matches!(root(&ctx).remove(), Err(Error::RootRemoval)));
    }

    #[test]
    fn node_names_lists_attributes_then_children() {
        let ctx = context();
        let r = root(&ctx);
        r.child_named("B", NodeKind::Generic).create().unwrap();
        r.child_named("A", NodeKind::Generic).create().unwrap();
        r.attribute::<u32>("Z_ATTR").set(1).unwrap();
        r.attribute::<u32>("ANOTHER").set(2).unwrap();
        assert_eq!(r.node_names().unwrap(), vec!["ANOTHER", "Z_ATTR", "A", "B"]);
    }
}
