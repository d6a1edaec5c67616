//! External raw data files backing resizable datasets.
//!
//! The file holds the dataset's elements row-major from offset 0 in the
//! dataset's byte order, with no header.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::trace;

use crate::error::Result;
use crate::hyperslab::Hyperslab;
use crate::tree::{is_append_only_change, relayout};

/// Create (or truncate) the raw file and size it for `nbytes` zero bytes.
pub(crate) fn create(path: &Path, nbytes: u64) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    file.set_len(nbytes)?;
    Ok(())
}

/// Read the selected elements into a packed buffer.
///
/// Bytes past the end of a short file read as zero.
pub(crate) fn read(path: &Path, dims: &[u64], slab: &Hyperslab, elem_size: usize) -> Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let file_len = file.metadata()?.len();
    let mut out = vec![0u8; slab.num_elements() as usize * elem_size];
    for run in slab.runs(dims) {
        let offset = run.dataset_offset * elem_size as u64;
        let len = run.len as usize * elem_size;
        let dst = run.buffer_offset as usize * elem_size;
        if offset >= file_len {
            continue;
        }
        let avail = ((file_len - offset) as usize).min(len);
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(&mut out[dst..dst + avail])?;
    }
    trace!(path = %path.display(), elements = slab.num_elements(), "external read");
    Ok(out)
}

/// Write a packed buffer into the selected elements.
pub(crate) fn write(
    path: &Path,
    dims: &[u64],
    slab: &Hyperslab,
    elem_size: usize,
    data: &[u8],
) -> Result<()> {
    let mut file = OpenOptions::new().write(true).open(path)?;
    for run in slab.runs(dims) {
        let offset = run.dataset_offset * elem_size as u64;
        let len = run.len as usize * elem_size;
        let src = run.buffer_offset as usize * elem_size;
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(&data[src..src + len])?;
    }
    trace!(path = %path.display(), elements = slab.num_elements(), "external write");
    Ok(())
}

/// Change the extent of the data in the raw file.
///
/// When only the slowest dimension changes the file is truncated or
/// extended in place; otherwise its contents are relaid out.
pub(crate) fn resize(path: &Path, old_dims: &[u64], new_dims: &[u64], elem_size: usize) -> Result<()> {
    let new_len = new_dims.iter().product::<u64>() * elem_size as u64;
    if is_append_only_change(old_dims, new_dims) {
        let file = OpenOptions::new().write(true).open(path)?;
        file.set_len(new_len)?;
        return Ok(());
    }
    let old = read(path, old_dims, &Hyperslab::all(old_dims), elem_size)?;
    let new = relayout(&old, old_dims, new_dims, elem_size);
    let mut file = OpenOptions::new().write(true).truncate(true).open(path)?;
    file.write_all(&new)?;
    Ok(())
}

/// Force the raw file's contents to stable storage.
pub(crate) fn sync(path: &Path) -> Result<()> {
    if path.exists() {
        OpenOptions::new().write(true).open(path)?.sync_data()?;
    }
    Ok(())
}
