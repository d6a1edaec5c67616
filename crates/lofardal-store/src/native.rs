//! Native file-backed container.
//!
//! The object tree and inline dataset bytes live in memory while the
//! container is open and are written back on [`flush`](StorageBackend::flush).
//! External raw data files are read and written directly, except that a
//! resize is staged in a copy of the raw file that replaces it on flush.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, error, trace};

use crate::backend::{Capability, DatasetInfo, ObjectKind, StorageBackend};
use crate::codec;
use crate::element::swap_components;
use crate::error::{Result, StoreError};
use crate::external;
use crate::hyperslab::Hyperslab;
use crate::property_list::{DatasetCreateProps, FileAccessProps, Mode};
use crate::tree::{
    extent_bytes, is_append_only_change, relayout, split_path, DatasetNode, GroupNode, Object,
    Storage,
};
use crate::types::{AttrType, AttrValue, ByteOrder};

#[derive(Debug)]
pub struct NativeStore {
    root: GroupNode,
    location: Option<PathBuf>,
    props: FileAccessProps,
    dirty: bool,
    /// Raw files with a pending relayout, mapped to their staging copy.
    staged: BTreeMap<PathBuf, PathBuf>,
}

impl NativeStore {
    /// Open or create the container at `path` according to `props.mode`.
    pub fn open(path: impl AsRef<Path>, props: FileAccessProps) -> Result<Self> {
        let path = path.as_ref();
        let root = match props.mode {
            Mode::Read | Mode::ReadWrite => {
                let data = fs::read(path)?;
                codec::decode(&data)?
            }
            Mode::CreateExclusive if path.exists() => {
                return Err(StoreError::FileExists(path.display().to_string()));
            }
            Mode::Create | Mode::CreateExclusive => GroupNode::default(),
        };
        let mut store = Self {
            root,
            location: Some(path.to_path_buf()),
            dirty: props.mode.is_create(),
            props,
            staged: BTreeMap::new(),
        };
        if store.props.mode.is_create() {
            store.save()?;
        }
        debug!(path = %path.display(), mode = ?store.props.mode, "opened container");
        Ok(store)
    }

    /// A writable container with no backing file.
    pub fn in_memory() -> Self {
        Self {
            root: GroupNode::default(),
            location: None,
            props: FileAccessProps::new(Mode::Create),
            dirty: false,
            staged: BTreeMap::new(),
        }
    }

    /// Load a container image already in memory.
    pub fn from_bytes(data: &[u8], mode: Mode) -> Result<Self> {
        Ok(Self {
            root: codec::decode(data)?,
            location: None,
            props: FileAccessProps::new(mode),
            dirty: false,
            staged: BTreeMap::new(),
        })
    }

    /// Serialize the current object tree.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        codec::encode(&self.root)
    }

    /// True if there are changes not yet flushed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn check_writable(&self, path: &str) -> Result<()> {
        if self.props.mode.is_writable() {
            Ok(())
        } else {
            Err(StoreError::ReadOnly(path.to_string()))
        }
    }

    fn object(&self, path: &str) -> Result<&Object> {
        let parts = split_path(path)?;
        self.root
            .lookup(&parts)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    fn attrs(&self, path: &str) -> Result<&std::collections::BTreeMap<String, AttrValue>> {
        let parts = split_path(path)?;
        if parts.is_empty() {
            return Ok(&self.root.attrs);
        }
        Ok(self.object(path)?.attrs())
    }

    fn dataset(&self, path: &str) -> Result<&DatasetNode> {
        match self.object(path)? {
            Object::Dataset(ds) => Ok(ds),
            Object::Group(_) => Err(StoreError::NotADataset(path.to_string())),
        }
    }

    fn dataset_mut(&mut self, path: &str) -> Result<&mut DatasetNode> {
        let parts = split_path(path)?;
        match self.root.lookup_mut(&parts) {
            Some(Object::Dataset(ds)) => Ok(ds),
            Some(Object::Group(_)) => Err(StoreError::NotADataset(path.to_string())),
            None => Err(StoreError::NotFound(path.to_string())),
        }
    }

    /// Resolve a raw data file name against the external base directory.
    fn external_path(&self, file: &Path) -> Result<PathBuf> {
        if file.is_absolute() {
            return Ok(file.to_path_buf());
        }
        let base = match (&self.props.external_base, &self.location) {
            (Some(base), _) => base.clone(),
            (None, Some(loc)) => loc
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
            (None, None) => {
                return Err(StoreError::Unsupported(format!(
                    "relative external file {} without a container location",
                    file.display()
                )));
            }
        };
        Ok(base.join(file))
    }

    /// The file currently holding a dataset's raw data: the staging copy
    /// while a resize is pending, the raw file otherwise.
    fn raw_data_path(&self, file: &Path) -> Result<PathBuf> {
        let path = self.external_path(file)?;
        Ok(self.staged.get(&path).cloned().unwrap_or(path))
    }

    /// Stage a raw file for relayout, copying it on first use.
    fn stage(&mut self, path: PathBuf) -> Result<PathBuf> {
        if let Some(copy) = self.staged.get(&path) {
            return Ok(copy.clone());
        }
        let mut name = path.as_os_str().to_owned();
        name.push(".resize");
        let copy = PathBuf::from(name);
        fs::copy(&path, &copy)?;
        trace!(path = %path.display(), "staged raw file for resize");
        self.staged.insert(path, copy.clone());
        Ok(copy)
    }

    /// Move staged raw files over their originals.
    fn commit_staged(&mut self) -> Result<()> {
        while let Some((path, copy)) = self.staged.pop_first() {
            external::sync(&copy)?;
            if let Err(e) = fs::rename(&copy, &path) {
                self.staged.insert(path, copy);
                return Err(e.into());
            }
        }
        Ok(())
    }

    fn discard_staged(&mut self) {
        for (path, copy) in std::mem::take(&mut self.staged) {
            if let Err(e) = fs::remove_file(&copy) {
                error!(path = %path.display(), error = %e, "failed to discard staged raw file");
            }
        }
    }

    /// Write the container image atomically: temp file, sync, rename.
    fn save(&mut self) -> Result<()> {
        let Some(location) = self.location.clone() else {
            self.dirty = false;
            return Ok(());
        };
        let bytes = codec::encode(&self.root)?;
        let mut tmp_name = location.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp = PathBuf::from(tmp_name);
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &location)?;
        self.dirty = false;
        debug!(path = %location.display(), bytes = bytes.len(), "flushed container");
        Ok(())
    }

    fn external_files(&self, group: &GroupNode, out: &mut Vec<PathBuf>) {
        for child in group.children.values() {
            match child {
                Object::Group(g) => self.external_files(g, out),
                Object::Dataset(DatasetNode {
                    storage: Storage::External(file),
                    ..
                }) => {
                    if let Ok(path) = self.external_path(file) {
                        out.push(path);
                    }
                }
                Object::Dataset(_) => {}
            }
        }
    }
}

fn too_large(path: &str, dims: &[u64]) -> StoreError {
    StoreError::Unsupported(format!("{path}: extent {dims:?} does not fit in memory"))
}

impl StorageBackend for NativeStore {
    fn name(&self) -> &str {
        "native"
    }

    fn capabilities(&self) -> Vec<Capability> {
        let mut caps = vec![Capability::Resize, Capability::ExternalStorage];
        if self.props.mode.is_writable() {
            caps.push(Capability::Write);
        }
        caps
    }

    fn mode(&self) -> Mode {
        self.props.mode
    }

    fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    fn object_kind(&self, path: &str) -> Result<Option<ObjectKind>> {
        let parts = split_path(path)?;
        if parts.is_empty() {
            return Ok(Some(ObjectKind::Group));
        }
        Ok(self.root.lookup(&parts).map(|obj| match obj {
            Object::Group(_) => ObjectKind::Group,
            Object::Dataset(_) => ObjectKind::Dataset,
        }))
    }

    fn create_group(&mut self, path: &str) -> Result<()> {
        self.check_writable(path)?;
        let parts = split_path(path)?;
        let existed = self.root.lookup(&parts).is_some() || parts.is_empty();
        self.root.ensure_groups(&parts, path)?;
        if !existed {
            self.dirty = true;
            trace!(path, "created group");
        }
        Ok(())
    }

    fn remove_object(&mut self, path: &str) -> Result<()> {
        self.check_writable(path)?;
        let parts = split_path(path)?;
        let Some((name, parent)) = parts.split_last() else {
            return Err(StoreError::InvalidPath(path.to_string()));
        };
        let group = self.root.group_mut(parent, path)?;
        group
            .children
            .remove(*name)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        self.dirty = true;
        Ok(())
    }

    fn child_names(&self, path: &str) -> Result<Vec<String>> {
        let parts = split_path(path)?;
        let group = if parts.is_empty() {
            &self.root
        } else {
            match self.object(path)? {
                Object::Group(g) => g,
                Object::Dataset(_) => return Err(StoreError::NotAGroup(path.to_string())),
            }
        };
        Ok(group.children.keys().cloned().collect())
    }

    fn attr_names(&self, path: &str) -> Result<Vec<String>> {
        Ok(self.attrs(path)?.keys().cloned().collect())
    }

    fn attr_type(&self, path: &str, name: &str) -> Result<Option<AttrType>> {
        Ok(self.attrs(path)?.get(name).map(AttrValue::attr_type))
    }

    fn read_attr(&self, path: &str, name: &str) -> Result<Option<AttrValue>> {
        Ok(self.attrs(path)?.get(name).cloned())
    }

    fn write_attr(&mut self, path: &str, name: &str, value: AttrValue) -> Result<()> {
        self.check_writable(path)?;
        let parts = split_path(path)?;
        let attrs = if parts.is_empty() {
            &mut self.root.attrs
        } else {
            self.root
                .lookup_mut(&parts)
                .ok_or_else(|| StoreError::NotFound(path.to_string()))?
                .attrs_mut()
        };
        if let Some(existing) = attrs.get(name) {
            if existing.attr_type() != value.attr_type() {
                return Err(StoreError::AttrTypeMismatch {
                    path: path.to_string(),
                    name: name.to_string(),
                    expected: existing.attr_type(),
                    found: value.attr_type(),
                });
            }
        }
        attrs.insert(name.to_string(), value);
        self.dirty = true;
        Ok(())
    }

    fn remove_attr(&mut self, path: &str, name: &str) -> Result<bool> {
        self.check_writable(path)?;
        let parts = split_path(path)?;
        let attrs = if parts.is_empty() {
            &mut self.root.attrs
        } else {
            self.root
                .lookup_mut(&parts)
                .ok_or_else(|| StoreError::NotFound(path.to_string()))?
                .attrs_mut()
        };
        let removed = attrs.remove(name).is_some();
        self.dirty |= removed;
        Ok(removed)
    }

    fn create_dataset(&mut self, path: &str, props: &DatasetCreateProps) -> Result<()> {
        self.check_writable(path)?;
        let parts = split_path(path)?;
        let Some((name, parent)) = parts.split_last() else {
            return Err(StoreError::InvalidPath(path.to_string()));
        };
        if self.root.lookup(&parts).is_some() {
            return Err(StoreError::AlreadyExists(path.to_string()));
        }

        let max_dims = props.effective_max_dims();
        if max_dims.len() != props.dims.len() {
            return Err(StoreError::RankMismatch {
                path: path.to_string(),
                expected: props.dims.len(),
                got: max_dims.len(),
            });
        }
        if props.dims.iter().zip(&max_dims).any(|(d, m)| d > m) {
            return Err(StoreError::ExtentExceeded {
                path: path.to_string(),
                requested: props.dims.clone(),
                max: max_dims,
            });
        }
        if props.is_resizable() && props.external_file.is_none() {
            return Err(StoreError::UnsupportedResize(path.to_string()));
        }

        let mut node = DatasetNode {
            attrs: Default::default(),
            dtype: props.dtype,
            byte_order: props.byte_order,
            dims: props.dims.clone(),
            max_dims,
            storage: Storage::Inline(Vec::new()),
        };
        let nbytes = node
            .nbytes()
            .ok_or_else(|| too_large(path, &props.dims))?;
        node.storage = match &props.external_file {
            Some(file) => {
                external::create(&self.external_path(file)?, nbytes)?;
                Storage::External(file.clone())
            }
            None => {
                let n = usize::try_from(nbytes).map_err(|_| too_large(path, &props.dims))?;
                Storage::Inline(vec![0u8; n])
            }
        };

        let parent_path = format!("/{}", parent.join("/"));
        let group = self.root.ensure_groups(parent, &parent_path)?;
        group
            .children
            .insert((*name).to_string(), Object::Dataset(node));
        self.dirty = true;
        debug!(path, dtype = %props.dtype, dims = ?props.dims, "created dataset");
        Ok(())
    }

    fn dataset_info(&self, path: &str) -> Result<DatasetInfo> {
        let ds = self.dataset(path)?;
        let external_files = match &ds.storage {
            Storage::External(file) => vec![self.external_path(file)?],
            Storage::Inline(_) => Vec::new(),
        };
        Ok(DatasetInfo {
            path: path.to_string(),
            dtype: ds.dtype,
            byte_order: ds.byte_order,
            dims: ds.dims.clone(),
            max_dims: ds.max_dims.clone(),
            external_files,
        })
    }

    fn resize_dataset(&mut self, path: &str, dims: &[u64]) -> Result<()> {
        self.check_writable(path)?;
        let ds = self.dataset(path)?;
        if dims.len() != ds.dims.len() {
            return Err(StoreError::RankMismatch {
                path: path.to_string(),
                expected: ds.dims.len(),
                got: dims.len(),
            });
        }
        if dims.iter().zip(&ds.max_dims).any(|(d, m)| d > m) {
            return Err(StoreError::ExtentExceeded {
                path: path.to_string(),
                requested: dims.to_vec(),
                max: ds.max_dims.clone(),
            });
        }
        if ds.dims == dims {
            return Ok(());
        }
        let elem_size = ds.dtype.size();
        let new_len = extent_bytes(dims, elem_size)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| too_large(path, dims))?;
        let old_dims = ds.dims.clone();
        let external_file = match &ds.storage {
            Storage::External(file) => Some(self.external_path(file)?),
            Storage::Inline(_) => None,
        };
        if let Some(file) = external_file {
            let staged = self.stage(file)?;
            external::resize(&staged, &old_dims, dims, elem_size)?;
        }

        let ds = self.dataset_mut(path)?;
        if let Storage::Inline(bytes) = &mut ds.storage {
            if is_append_only_change(&old_dims, dims) {
                bytes.resize(new_len, 0);
            } else {
                *bytes = relayout(bytes, &old_dims, dims, elem_size);
            }
        }
        ds.dims = dims.to_vec();
        self.dirty = true;
        debug!(path, from = ?old_dims, to = ?dims, "resized dataset");
        Ok(())
    }

    fn read_slice(&self, path: &str, slab: &Hyperslab) -> Result<Vec<u8>> {
        let ds = self.dataset(path)?;
        slab.check(path, &ds.dims)?;
        let elem_size = ds.dtype.size();
        let mut out = match &ds.storage {
            Storage::Inline(bytes) => {
                let mut out = vec![0u8; slab.num_elements() as usize * elem_size];
                for run in slab.runs(&ds.dims) {
                    let n = run.len as usize * elem_size;
                    let src = run.dataset_offset as usize * elem_size;
                    let dst = run.buffer_offset as usize * elem_size;
                    out[dst..dst + n].copy_from_slice(&bytes[src..src + n]);
                }
                out
            }
            Storage::External(file) => {
                external::read(&self.raw_data_path(file)?, &ds.dims, slab, elem_size)?
            }
        };
        if ds.byte_order == ByteOrder::Big {
            swap_components(&mut out, ds.dtype.component_size());
        }
        Ok(out)
    }

    fn write_slice(&mut self, path: &str, slab: &Hyperslab, data: &[u8]) -> Result<()> {
        self.check_writable(path)?;
        let ds = self.dataset(path)?;
        slab.check(path, &ds.dims)?;
        let elem_size = ds.dtype.size();
        let expected = slab.num_elements() as usize * elem_size;
        if data.len() != expected {
            return Err(StoreError::BufferSize {
                expected,
                got: data.len(),
            });
        }
        let mut stored = data.to_vec();
        if ds.byte_order == ByteOrder::Big {
            swap_components(&mut stored, ds.dtype.component_size());
        }
        if let Storage::External(file) = &ds.storage {
            let file = self.raw_data_path(file)?;
            return external::write(&file, &ds.dims, slab, elem_size, &stored);
        }

        let ds = self.dataset_mut(path)?;
        let dims = ds.dims.clone();
        if let Storage::Inline(bytes) = &mut ds.storage {
            for run in slab.runs(&dims) {
                let n = run.len as usize * elem_size;
                let dst = run.dataset_offset as usize * elem_size;
                let src = run.buffer_offset as usize * elem_size;
                bytes[dst..dst + n].copy_from_slice(&stored[src..src + n]);
            }
        }
        self.dirty = true;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if !self.props.mode.is_writable() {
            return Ok(());
        }
        self.commit_staged()?;
        let mut files = Vec::new();
        self.external_files(&self.root, &mut files);
        for file in &files {
            external::sync(file)?;
        }
        if self.dirty {
            self.save()?;
        }
        Ok(())
    }
}

impl Drop for NativeStore {
    fn drop(&mut self) {
        if self.props.flush_on_drop && self.dirty && self.props.mode.is_writable() {
            if let Err(e) = self.flush() {
                error!(
                    path = ?self.location,
                    error = %e,
                    "failed to flush container on close"
                );
            }
        }
        self.discard_staged();
    }
}
