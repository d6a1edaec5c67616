//! In-memory object tree of a container.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{Result, StoreError};
use crate::hyperslab::Hyperslab;
use crate::types::{AttrValue, ByteOrder, DType};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Object {
    Group(GroupNode),
    Dataset(DatasetNode),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct GroupNode {
    pub attrs: BTreeMap<String, AttrValue>,
    pub children: BTreeMap<String, Object>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DatasetNode {
    pub attrs: BTreeMap<String, AttrValue>,
    pub dtype: DType,
    pub byte_order: ByteOrder,
    pub dims: Vec<u64>,
    pub max_dims: Vec<u64>,
    pub storage: Storage,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Storage {
    /// Element bytes in dataset byte order, row-major.
    Inline(Vec<u8>),
    /// Raw data file holding the elements, row-major at offset 0.
    External(PathBuf),
}

impl Object {
    pub fn attrs(&self) -> &BTreeMap<String, AttrValue> {
        match self {
            Object::Group(g) => &g.attrs,
            Object::Dataset(d) => &d.attrs,
        }
    }

    pub fn attrs_mut(&mut self) -> &mut BTreeMap<String, AttrValue> {
        match self {
            Object::Group(g) => &mut g.attrs,
            Object::Dataset(d) => &mut d.attrs,
        }
    }
}

impl DatasetNode {
    /// Size of the full extent in bytes, `None` if it overflows.
    pub fn nbytes(&self) -> Option<u64> {
        extent_bytes(&self.dims, self.dtype.size())
    }
}

pub(crate) fn extent_bytes(dims: &[u64], elem_size: usize) -> Option<u64> {
    dims.iter()
        .try_fold(elem_size as u64, |acc, &d| acc.checked_mul(d))
}

/// Split an absolute object path into its components. `/` is the root.
pub(crate) fn split_path(path: &str) -> Result<Vec<&str>> {
    let rest = path
        .strip_prefix('/')
        .ok_or_else(|| StoreError::InvalidPath(path.to_string()))?;
    if rest.is_empty() {
        return Ok(Vec::new());
    }
    let parts: Vec<&str> = rest.split('/').collect();
    if parts.iter().any(|p| p.is_empty() || *p == "." || *p == "..") {
        return Err(StoreError::InvalidPath(path.to_string()));
    }
    Ok(parts)
}

impl GroupNode {
    pub fn lookup(&self, parts: &[&str]) -> Option<&Object> {
        let (first, rest) = parts.split_first()?;
        let child = self.children.get(*first)?;
        if rest.is_empty() {
            return Some(child);
        }
        match child {
            Object::Group(g) => g.lookup(rest),
            Object::Dataset(_) => None,
        }
    }

    pub fn lookup_mut(&mut self, parts: &[&str]) -> Option<&mut Object> {
        let (first, rest) = parts.split_first()?;
        let child = self.children.get_mut(*first)?;
        if rest.is_empty() {
            return Some(child);
        }
        match child {
            Object::Group(g) => g.lookup_mut(rest),
            Object::Dataset(_) => None,
        }
    }

    /// The group at `parts`, which must exist and be a group.
    pub fn group_mut(&mut self, parts: &[&str], path: &str) -> Result<&mut GroupNode> {
        if parts.is_empty() {
            return Ok(self);
        }
        match self.lookup_mut(parts) {
            Some(Object::Group(g)) => Ok(g),
            Some(Object::Dataset(_)) => Err(StoreError::NotAGroup(path.to_string())),
            None => Err(StoreError::NotFound(path.to_string())),
        }
    }

    /// Create every missing group along `parts`. Fails if a component is a dataset.
    pub fn ensure_groups(&mut self, parts: &[&str], path: &str) -> Result<&mut GroupNode> {
        let Some((first, rest)) = parts.split_first() else {
            return Ok(self);
        };
        let child = self
            .children
            .entry((*first).to_string())
            .or_insert_with(|| Object::Group(GroupNode::default()));
        match child {
            Object::Group(g) => g.ensure_groups(rest, path),
            Object::Dataset(_) => Err(StoreError::NotAGroup(path.to_string())),
        }
    }
}

/// Copy the overlap of an old extent into a zero-filled buffer of the new extent.
///
/// Element coordinates are preserved; space outside the old extent is zero.
pub(crate) fn relayout(old: &[u8], old_dims: &[u64], new_dims: &[u64], elem_size: usize) -> Vec<u8> {
    let new_len = new_dims.iter().product::<u64>() as usize * elem_size;
    let mut out = vec![0u8; new_len];
    let overlap: Vec<u64> = old_dims
        .iter()
        .zip(new_dims)
        .map(|(&a, &b)| a.min(b))
        .collect();
    let slab = Hyperslab::new(vec![0; overlap.len()], overlap);
    for (src, dst) in slab.runs(old_dims).zip(slab.runs(new_dims)) {
        let n = src.len as usize * elem_size;
        let s = src.dataset_offset as usize * elem_size;
        let d = dst.dataset_offset as usize * elem_size;
        out[d..d + n].copy_from_slice(&old[s..s + n]);
    }
    out
}

/// True when only the slowest-varying dimension changes, so the existing
/// bytes stay in place and the buffer is simply truncated or extended.
pub(crate) fn is_append_only_change(old_dims: &[u64], new_dims: &[u64]) -> bool {
    old_dims.len() == new_dims.len() && old_dims.get(1..) == new_dims.get(1..)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_paths() {
        assert_eq!(split_path("/").unwrap(), Vec::<&str>::new());
        assert_eq!(split_path("/A/B").unwrap(), vec!["A", "B"]);
        assert!(split_path("A").is_err());
        assert!(split_path("/A//B").is_err());
        assert!(split_path("/A/..").is_err());
    }

    #[test]
    fn ensure_groups_creates_ancestors() {
        let mut root = GroupNode::default();
        root.ensure_groups(&["A", "B"], "/A/B").unwrap();
        assert!(matches!(root.lookup(&["A", "B"]), Some(Object::Group(_))));
        assert!(root.lookup(&["A", "C"]).is_none());
    }

    #[test]
    fn relayout_grows_columns() {
        // 2x2 -> 3x3, values keep their coordinates
        let old = vec![1u8, 2, 3, 4];
        let new = relayout(&old, &[2, 2], &[3, 3], 1);
        assert_eq!(new, vec![1, 2, 0, 3, 4, 0, 0, 0, 0]);
    }

    #[test]
    fn relayout_shrinks() {
        let old = vec![1u8, 2, 3, 4, 5, 6];
        let new = relayout(&old, &[2, 3], &[2, 1], 1);
        assert_eq!(new, vec![1, 4]);
    }

    #[test]
    fn append_only_detection() {
        assert!(is_append_only_change(&[10, 4], &[20, 4]));
        assert!(is_append_only_change(&[10], &[3]));
        assert!(!is_append_only_change(&[10, 4], &[10, 5]));
    }
}
