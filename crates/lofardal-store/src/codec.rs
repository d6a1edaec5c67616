//! Binary image of a container's object tree.
//!
//! Layout (all integers little-endian):
//!
//! ```text
//! signature   8 bytes   \x89 L D A L \r \n \x1a
//! version     u8
//! root        group
//!
//! group       attrs, u32 child count, { str name, u8 kind, group | dataset }*
//! dataset     attrs, u8 dtype, u8 byte order, u8 rank, u64 dims[rank],
//!             u64 max_dims[rank], u8 storage, (u64 len, bytes | str path)
//! attrs       u32 count, { str name, u8 type, payload }*
//! str         u32 length, UTF-8 bytes
//! ```

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use byteorder::{ByteOrder as _, LittleEndian, WriteBytesExt};
use num_complex::Complex64;

use crate::error::{Result, StoreError};
use crate::tree::{DatasetNode, GroupNode, Object, Storage};
use crate::types::{AttrType, AttrValue, ByteOrder, DType, Range};

/// Magic bytes at the start of every container image.
pub const SIGNATURE: [u8; 8] = [0x89, b'L', b'D', b'A', b'L', b'\r', b'\n', 0x1A];

/// Current image format version.
pub const FORMAT_VERSION: u8 = 1;

const KIND_GROUP: u8 = 0;
const KIND_DATASET: u8 = 1;
const STORAGE_INLINE: u8 = 0;
const STORAGE_EXTERNAL: u8 = 1;

/// True if `data` starts with the container signature.
pub fn has_signature(data: &[u8]) -> bool {
    data.len() >= SIGNATURE.len() && data[..SIGNATURE.len()] == SIGNATURE
}

pub(crate) fn encode(root: &GroupNode) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(256);
    out.write_all(&SIGNATURE)?;
    out.write_u8(FORMAT_VERSION)?;
    write_group(&mut out, root)?;
    Ok(out)
}

pub(crate) fn decode(data: &[u8]) -> Result<GroupNode> {
    if !has_signature(data) {
        return Err(StoreError::Format("container signature not found".into()));
    }
    let mut r = Reader {
        data,
        pos: SIGNATURE.len(),
    };
    let version = r.u8()?;
    if version != FORMAT_VERSION {
        return Err(StoreError::Format(format!(
            "unsupported container version {version}"
        )));
    }
    let root = r.group()?;
    if r.pos != data.len() {
        return Err(StoreError::Format(format!(
            "{} trailing bytes after root group",
            data.len() - r.pos
        )));
    }
    Ok(root)
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

fn write_len(out: &mut Vec<u8>, len: usize) -> Result<()> {
    let len = u32::try_from(len)
        .map_err(|_| StoreError::Format(format!("length {len} does not fit in u32")))?;
    out.write_u32::<LittleEndian>(len)?;
    Ok(())
}

fn write_str(out: &mut Vec<u8>, s: &str) -> Result<()> {
    write_len(out, s.len())?;
    out.write_all(s.as_bytes())?;
    Ok(())
}

fn write_group(out: &mut Vec<u8>, group: &GroupNode) -> Result<()> {
    write_attrs(out, &group.attrs)?;
    write_len(out, group.children.len())?;
    for (name, child) in &group.children {
        write_str(out, name)?;
        match child {
            Object::Group(g) => {
                out.write_u8(KIND_GROUP)?;
                write_group(out, g)?;
            }
            Object::Dataset(d) => {
                out.write_u8(KIND_DATASET)?;
                write_dataset(out, d)?;
            }
        }
    }
    Ok(())
}

fn write_dataset(out: &mut Vec<u8>, ds: &DatasetNode) -> Result<()> {
    write_attrs(out, &ds.attrs)?;
    out.write_u8(ds.dtype.code())?;
    out.write_u8(match ds.byte_order {
        ByteOrder::Little => 0,
        ByteOrder::Big => 1,
    })?;
    let rank = u8::try_from(ds.dims.len())
        .map_err(|_| StoreError::Format(format!("rank {} too large", ds.dims.len())))?;
    out.write_u8(rank)?;
    for &d in ds.dims.iter().chain(&ds.max_dims) {
        out.write_u64::<LittleEndian>(d)?;
    }
    match &ds.storage {
        Storage::Inline(bytes) => {
            out.write_u8(STORAGE_INLINE)?;
            out.write_u64::<LittleEndian>(bytes.len() as u64)?;
            out.write_all(bytes)?;
        }
        Storage::External(path) => {
            out.write_u8(STORAGE_EXTERNAL)?;
            let text = path
                .to_str()
                .ok_or_else(|| StoreError::Format(format!("non UTF-8 path {path:?}")))?;
            write_str(out, text)?;
        }
    }
    Ok(())
}

fn write_attrs(out: &mut Vec<u8>, attrs: &BTreeMap<String, AttrValue>) -> Result<()> {
    write_len(out, attrs.len())?;
    for (name, value) in attrs {
        write_str(out, name)?;
        out.write_u8(value.attr_type().code())?;
        write_value(out, value)?;
    }
    Ok(())
}

fn write_value(out: &mut Vec<u8>, value: &AttrValue) -> Result<()> {
    match value {
        AttrValue::Bool(v) => out.write_u8(u8::from(*v))?,
        AttrValue::Int32(v) => out.write_i32::<LittleEndian>(*v)?,
        AttrValue::UInt32(v) => out.write_u32::<LittleEndian>(*v)?,
        AttrValue::Int64(v) => out.write_i64::<LittleEndian>(*v)?,
        AttrValue::UInt64(v) => out.write_u64::<LittleEndian>(*v)?,
        AttrValue::Float64(v) => out.write_f64::<LittleEndian>(*v)?,
        AttrValue::String(v) => write_str(out, v)?,
        AttrValue::Int32Array(v) => {
            write_len(out, v.len())?;
            for x in v {
                out.write_i32::<LittleEndian>(*x)?;
            }
        }
        AttrValue::UInt32Array(v) => {
            write_len(out, v.len())?;
            for x in v {
                out.write_u32::<LittleEndian>(*x)?;
            }
        }
        AttrValue::Float64Array(v) => {
            write_len(out, v.len())?;
            for x in v {
                out.write_f64::<LittleEndian>(*x)?;
            }
        }
        AttrValue::StringArray(v) => {
            write_len(out, v.len())?;
            for s in v {
                write_str(out, s)?;
            }
        }
        AttrValue::Complex64Array(v) => {
            write_len(out, v.len())?;
            for c in v {
                out.write_f64::<LittleEndian>(c.re)?;
                out.write_f64::<LittleEndian>(c.im)?;
            }
        }
        AttrValue::RangeArray(v) => {
            write_len(out, v.len())?;
            for r in v {
                out.write_u64::<LittleEndian>(r.begin)?;
                out.write_u64::<LittleEndian>(r.end)?;
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).filter(|&end| end <= self.data.len());
        let Some(end) = end else {
            return Err(StoreError::UnexpectedEof {
                offset: self.pos,
                needed: n,
                available: self.data.len() - self.pos,
            });
        };
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    fn i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    fn u64(&mut self) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.take(8)?))
    }

    fn i64(&mut self) -> Result<i64> {
        Ok(LittleEndian::read_i64(self.take(8)?))
    }

    fn f64(&mut self) -> Result<f64> {
        Ok(LittleEndian::read_f64(self.take(8)?))
    }

    /// A length prefix for items of at least `min_item` bytes each.
    fn len(&mut self, min_item: usize) -> Result<usize> {
        let n = self.u32()? as usize;
        let remaining = self.data.len() - self.pos;
        if n.saturating_mul(min_item) > remaining {
            return Err(StoreError::UnexpectedEof {
                offset: self.pos,
                needed: n.saturating_mul(min_item),
                available: remaining,
            });
        }
        Ok(n)
    }

    fn str(&mut self) -> Result<String> {
        let n = self.len(1)?;
        let bytes = self.take(n)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| StoreError::Format(format!("invalid UTF-8 name: {e}")))
    }

    fn group(&mut self) -> Result<GroupNode> {
        let attrs = self.attrs()?;
        let n = self.len(5)?;
        let mut children = BTreeMap::new();
        for _ in 0..n {
            let name = self.str()?;
            let child = match self.u8()? {
                KIND_GROUP => Object::Group(self.group()?),
                KIND_DATASET => Object::Dataset(self.dataset()?),
                other => {
                    return Err(StoreError::Format(format!("unknown object kind {other}")));
                }
            };
            children.insert(name, child);
        }
        Ok(GroupNode { attrs, children })
    }

    fn dataset(&mut self) -> Result<DatasetNode> {
        let attrs = self.attrs()?;
        let code = self.u8()?;
        let dtype = DType::from_code(code)
            .ok_or_else(|| StoreError::Format(format!("unknown element type {code}")))?;
        let byte_order = match self.u8()? {
            0 => ByteOrder::Little,
            1 => ByteOrder::Big,
            other => return Err(StoreError::Format(format!("unknown byte order {other}"))),
        };
        let rank = self.u8()? as usize;
        let mut dims = Vec::with_capacity(rank);
        for _ in 0..rank {
            dims.push(self.u64()?);
        }
        let mut max_dims = Vec::with_capacity(rank);
        for _ in 0..rank {
            max_dims.push(self.u64()?);
        }
        let storage = match self.u8()? {
            STORAGE_INLINE => {
                let n = usize::try_from(self.u64()?)
                    .map_err(|_| StoreError::Format("inline data too large".into()))?;
                Storage::Inline(self.take(n)?.to_vec())
            }
            STORAGE_EXTERNAL => Storage::External(PathBuf::from(self.str()?)),
            other => return Err(StoreError::Format(format!("unknown storage kind {other}"))),
        };
        let ds = DatasetNode {
            attrs,
            dtype,
            byte_order,
            dims,
            max_dims,
            storage,
        };
        let nbytes = ds
            .nbytes()
            .ok_or_else(|| StoreError::Format(format!("extent {:?} is too large", ds.dims)))?;
        if let Storage::Inline(bytes) = &ds.storage {
            if bytes.len() as u64 != nbytes {
                return Err(StoreError::Format(format!(
                    "inline dataset holds {} bytes, extent needs {nbytes}",
                    bytes.len()
                )));
            }
        }
        Ok(ds)
    }

    fn attrs(&mut self) -> Result<BTreeMap<String, AttrValue>> {
        let n = self.len(6)?;
        let mut attrs = BTreeMap::new();
        for _ in 0..n {
            let name = self.str()?;
            let code = self.u8()?;
            let ty = AttrType::from_code(code)
                .ok_or_else(|| StoreError::Format(format!("unknown attribute type {code}")))?;
            let value = self.value(ty)?;
            attrs.insert(name, value);
        }
        Ok(attrs)
    }

    fn value(&mut self, ty: AttrType) -> Result<AttrValue> {
        Ok(match ty {
            AttrType::Bool => AttrValue::Bool(self.u8()? != 0),
            AttrType::Int32 => AttrValue::Int32(self.i32()?),
            AttrType::UInt32 => AttrValue::UInt32(self.u32()?),
            AttrType::Int64 => AttrValue::Int64(self.i64()?),
            AttrType::UInt64 => AttrValue::UInt64(self.u64()?),
            AttrType::Float64 => AttrValue::Float64(self.f64()?),
            AttrType::String => AttrValue::String(self.str()?),
            AttrType::Int32Array => {
                let n = self.len(4)?;
                AttrValue::Int32Array((0..n).map(|_| self.i32()).collect::<Result<_>>()?)
            }
            AttrType::UInt32Array => {
                let n = self.len(4)?;
                AttrValue::UInt32Array((0..n).map(|_| self.u32()).collect::<Result<_>>()?)
            }
            AttrType::Float64Array => {
                let n = self.len(8)?;
                AttrValue::Float64Array((0..n).map(|_| self.f64()).collect::<Result<_>>()?)
            }
            AttrType::StringArray => {
                let n = self.len(4)?;
                AttrValue::StringArray((0..n).map(|_| self.str()).collect::<Result<_>>()?)
            }
            AttrType::Complex64Array => {
                let n = self.len(16)?;
                let mut v = Vec::with_capacity(n);
                for _ in 0..n {
                    let re = self.f64()?;
                    let im = self.f64()?;
                    v.push(Complex64::new(re, im));
                }
                AttrValue::Complex64Array(v)
            }
            AttrType::RangeArray => {
                let n = self.len(16)?;
                let mut v = Vec::with_capacity(n);
                for _ in 0..n {
                    let begin = self.u64()?;
                    let end = self.u64()?;
                    v.push(Range { begin, end });
                }
                AttrValue::RangeArray(v)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> GroupNode {
        let mut root = GroupNode::default();
        root.attrs
            .insert("TELESCOPE".into(), AttrValue::String("LOFAR".into()));
        root.attrs.insert(
            "WEATHER_TEMPERATURE".into(),
            AttrValue::Float64Array(vec![280.5, 281.0]),
        );
        let mut sap = GroupNode::default();
        sap.attrs.insert("NOF_BEAMS".into(), AttrValue::UInt32(2));
        sap.children.insert(
            "DATA".into(),
            Object::Dataset(DatasetNode {
                attrs: BTreeMap::new(),
                dtype: DType::I16,
                byte_order: ByteOrder::Big,
                dims: vec![2],
                max_dims: vec![2],
                storage: Storage::Inline(vec![0, 1, 0, 2]),
            }),
        );
        root.children
            .insert("SUB_ARRAY_POINTING_000".into(), Object::Group(sap));
        root.children.insert(
            "EXT".into(),
            Object::Dataset(DatasetNode {
                attrs: BTreeMap::new(),
                dtype: DType::F32,
                byte_order: ByteOrder::Little,
                dims: vec![0, 4],
                max_dims: vec![u64::MAX, 4],
                storage: Storage::External(PathBuf::from("ext.raw")),
            }),
        );
        root
    }

    #[test]
    fn image_starts_with_signature() {
        let bytes = encode(&GroupNode::default()).unwrap();
        assert!(has_signature(&bytes));
        assert_eq!(bytes[8], FORMAT_VERSION);
    }

    #[test]
    fn tree_survives_encoding() {
        let tree = sample_tree();
        let bytes = encode(&tree).unwrap();
        assert_eq!(decode(&bytes).unwrap(), tree);
    }

    #[test]
    fn rejects_foreign_data() {
        assert!(matches!(
            decode(b"\x89HDF\r\n\x1a\n\0\0\0"),
            Err(StoreError::Format(_))
        ));
    }

    #[test]
    fn rejects_truncated_image() {
        let bytes = encode(&sample_tree()).unwrap();
        let err = decode(&bytes[..bytes.len() - 3]).unwrap_err();
        assert!(matches!(err, StoreError::UnexpectedEof { .. }));
    }

    #[test]
    fn rejects_wrong_version() {
        let mut bytes = encode(&GroupNode::default()).unwrap();
        bytes[8] = 99;
        assert!(matches!(decode(&bytes), Err(StoreError::Format(_))));
    }

    #[test]
    fn rejects_inline_size_mismatch() {
        let mut root = GroupNode::default();
        root.children.insert(
            "D".into(),
            Object::Dataset(DatasetNode {
                attrs: BTreeMap::new(),
                dtype: DType::U32,
                byte_order: ByteOrder::Little,
                dims: vec![3],
                max_dims: vec![3],
                storage: Storage::Inline(vec![0; 4]),
            }),
        );
        let bytes = encode(&root).unwrap();
        assert!(matches!(decode(&bytes), Err(StoreError::Format(_))));
    }

    #[test]
    fn rejects_extent_overflow() {
        let mut root = GroupNode::default();
        root.children.insert(
            "D".into(),
            Object::Dataset(DatasetNode {
                attrs: BTreeMap::new(),
                dtype: DType::F64,
                byte_order: ByteOrder::Little,
                dims: vec![u64::MAX / 2, 3],
                max_dims: vec![u64::MAX, 3],
                storage: Storage::External(PathBuf::from("huge.raw")),
            }),
        );
        let bytes = encode(&root).unwrap();
        assert!(matches!(decode(&bytes), Err(StoreError::Format(_))));
    }
}
