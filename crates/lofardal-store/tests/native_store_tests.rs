//! File-backed container tests: persistence, external raw data and modes.

use std::path::Path;

use lofardal_store::{
    from_le_bytes, to_le_bytes, AttrValue, ByteOrder, DType, DatasetCreateProps,
    FileAccessProps, Hyperslab, Mode, NativeStore, ObjectKind, Range, StorageBackend, StoreError,
    UNLIMITED,
};
use proptest::prelude::*;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn create(path: &Path) -> NativeStore {
    NativeStore::open(path, FileAccessProps::new(Mode::Create)).unwrap()
}

fn reopen(path: &Path, mode: Mode) -> NativeStore {
    NativeStore::open(path, FileAccessProps::new(mode)).unwrap()
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn create_writes_file_immediately() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("new.h5");
    let _store = create(&path);
    assert!(path.exists());
    let data = std::fs::read(&path).unwrap();
    assert!(lofardal_store::codec::has_signature(&data));
}

#[test]
fn attributes_and_groups_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("attrs.h5");
    {
        let mut store = create(&path);
        store
            .write_attr("/", "TELESCOPE", AttrValue::String("LOFAR".into()))
            .unwrap();
        store.create_group("/SUB_ARRAY_POINTING_000/BEAM_000").unwrap();
        store
            .write_attr(
                "/SUB_ARRAY_POINTING_000",
                "STATIONS_LIST",
                AttrValue::StringArray(vec!["CS001".into(), "RS106".into()]),
            )
            .unwrap();
        store
            .write_attr(
                "/SUB_ARRAY_POINTING_000",
                "FLAGS",
                AttrValue::RangeArray(vec![Range::new(0, 10)]),
            )
            .unwrap();
    }

    let store = reopen(&path, Mode::Read);
    assert_eq!(
        store.read_attr("/", "TELESCOPE").unwrap(),
        Some(AttrValue::String("LOFAR".into()))
    );
    assert_eq!(
        store.object_kind("/SUB_ARRAY_POINTING_000/BEAM_000").unwrap(),
        Some(ObjectKind::Group)
    );
    assert_eq!(
        store.attr_names("/SUB_ARRAY_POINTING_000").unwrap(),
        vec!["FLAGS", "STATIONS_LIST"]
    );
}

#[test]
fn empty_strings_and_vectors_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.h5");
    {
        let mut store = create(&path);
        store
            .write_attr("/", "ATTR_STR_EMPTY", AttrValue::String(String::new()))
            .unwrap();
        store
            .write_attr("/", "ATTR_VEC_EMPTY", AttrValue::Int32Array(Vec::new()))
            .unwrap();
        store
            .write_attr(
                "/",
                "ATTR_VEC_STR_EMPTY_STR",
                AttrValue::StringArray(vec![String::new(), String::new()]),
            )
            .unwrap();
    }
    let store = reopen(&path, Mode::Read);
    assert_eq!(
        store.read_attr("/", "ATTR_STR_EMPTY").unwrap(),
        Some(AttrValue::String(String::new()))
    );
    assert_eq!(
        store.read_attr("/", "ATTR_VEC_EMPTY").unwrap(),
        Some(AttrValue::Int32Array(Vec::new()))
    );
    assert_eq!(
        store.read_attr("/", "ATTR_VEC_STR_EMPTY_STR").unwrap(),
        Some(AttrValue::StringArray(vec![String::new(), String::new()]))
    );
}

#[test]
fn no_flush_on_drop_discards_changes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("discard.h5");
    drop(create(&path));
    {
        let props = FileAccessProps::new(Mode::ReadWrite).no_flush_on_drop();
        let mut store = NativeStore::open(&path, props).unwrap();
        store.create_group("/LOST").unwrap();
        assert!(store.is_dirty());
    }
    let store = reopen(&path, Mode::Read);
    assert_eq!(store.object_kind("/LOST").unwrap(), None);
}

#[test]
fn flush_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flush.h5");
    let mut store = create(&path);
    store.create_group("/A").unwrap();
    store.flush().unwrap();
    assert!(!store.is_dirty());
    store.flush().unwrap();
    assert!(!dir.path().join("flush.h5.tmp").exists());
}

#[test]
fn exclusive_create_refuses_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("excl.h5");
    drop(create(&path));
    let err = NativeStore::open(&path, FileAccessProps::new(Mode::CreateExclusive)).unwrap_err();
    assert!(matches!(err, StoreError::FileExists(_)));
}

#[test]
fn opening_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = NativeStore::open(dir.path().join("nope.h5"), FileAccessProps::new(Mode::Read))
        .unwrap_err();
    assert!(matches!(err, StoreError::Io(_)));
}

#[test]
fn foreign_file_is_format_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("foreign.h5");
    std::fs::write(&path, b"\x89HDF\r\n\x1a\n0000000000").unwrap();
    let err = NativeStore::open(&path, FileAccessProps::new(Mode::Read)).unwrap_err();
    assert!(matches!(err, StoreError::Format(_)));
}

// ---------------------------------------------------------------------------
// External raw data
// ---------------------------------------------------------------------------

#[test]
fn external_dataset_lives_next_to_container() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ext.h5");
    let mut store = create(&path);
    let props = DatasetCreateProps::new(DType::F32, &[4, 2])
        .max_dims(&[UNLIMITED, 2])
        .external_file("ext.raw");
    store.create_dataset("/S/DATA", &props).unwrap();

    let info = store.dataset_info("/S/DATA").unwrap();
    assert_eq!(info.external_files, vec![dir.path().join("ext.raw")]);
    assert_eq!(std::fs::metadata(dir.path().join("ext.raw")).unwrap().len(), 32);

    store
        .write_slice(
            "/S/DATA",
            &Hyperslab::new(vec![3, 0], vec![1, 2]),
            &to_le_bytes(&[7.5f32, 8.5]),
        )
        .unwrap();
    store.resize_dataset("/S/DATA", &[6, 2]).unwrap();
    let all: Vec<f32> = from_le_bytes(
        &store
            .read_slice("/S/DATA", &Hyperslab::all(&[6, 2]))
            .unwrap(),
    );
    assert_eq!(all, vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 7.5, 8.5, 0.0, 0.0, 0.0, 0.0]);

    store.resize_dataset("/S/DATA", &[2, 2]).unwrap();
    assert_eq!(std::fs::metadata(dir.path().join("ext.raw")).unwrap().len(), 32);
    drop(store);

    assert_eq!(std::fs::metadata(dir.path().join("ext.raw")).unwrap().len(), 16);
    assert!(!dir.path().join("ext.raw.resize").exists());
    let store = reopen(&path, Mode::Read);
    assert_eq!(store.dataset_info("/S/DATA").unwrap().dims, vec![2, 2]);
}

fn external_2x2(path: &Path) {
    let mut store = create(path);
    let props = DatasetCreateProps::new(DType::F32, &[2, 2])
        .max_dims(&[UNLIMITED, UNLIMITED])
        .external_file("grid.raw");
    store.create_dataset("/S/DATA", &props).unwrap();
    store
        .write_slice(
            "/S/DATA",
            &Hyperslab::all(&[2, 2]),
            &to_le_bytes(&[1.0f32, 2.0, 3.0, 4.0]),
        )
        .unwrap();
}

fn read_all_f32(store: &NativeStore, path: &str) -> Vec<f32> {
    let dims = store.dataset_info(path).unwrap().dims;
    from_le_bytes(&store.read_slice(path, &Hyperslab::all(&dims)).unwrap())
}

#[test]
fn unflushed_resize_leaves_raw_file_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("grid.h5");
    external_2x2(&path);
    {
        let props = FileAccessProps::new(Mode::ReadWrite).no_flush_on_drop();
        let mut store = NativeStore::open(&path, props).unwrap();
        store.resize_dataset("/S/DATA", &[2, 3]).unwrap();
        assert_eq!(
            read_all_f32(&store, "/S/DATA"),
            vec![1.0, 2.0, 0.0, 3.0, 4.0, 0.0]
        );
        store.resize_dataset("/S/DATA", &[1, 3]).unwrap();
    }
    assert!(!dir.path().join("grid.raw.resize").exists());
    let store = reopen(&path, Mode::Read);
    assert_eq!(store.dataset_info("/S/DATA").unwrap().dims, vec![2, 2]);
    assert_eq!(read_all_f32(&store, "/S/DATA"), vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn flushed_resize_commits_relayout() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("grid.h5");
    external_2x2(&path);
    {
        let props = FileAccessProps::new(Mode::ReadWrite).no_flush_on_drop();
        let mut store = NativeStore::open(&path, props).unwrap();
        store.resize_dataset("/S/DATA", &[2, 3]).unwrap();
        store
            .write_slice(
                "/S/DATA",
                &Hyperslab::new(vec![1, 2], vec![1, 1]),
                &to_le_bytes(&[6.0f32]),
            )
            .unwrap();
        store.flush().unwrap();
    }
    assert!(!dir.path().join("grid.raw.resize").exists());
    let store = reopen(&path, Mode::Read);
    assert_eq!(store.dataset_info("/S/DATA").unwrap().dims, vec![2, 3]);
    assert_eq!(
        read_all_f32(&store, "/S/DATA"),
        vec![1.0, 2.0, 0.0, 3.0, 4.0, 6.0]
    );
}

#[test]
fn resize_beyond_max_leaves_extent() {
    let dir = TempDir::new().unwrap();
    let mut store = create(&dir.path().join("max.h5"));
    let props = DatasetCreateProps::new(DType::U8, &[4])
        .max_dims(&[8])
        .external_file("max.raw");
    store.create_dataset("/D", &props).unwrap();
    let err = store.resize_dataset("/D", &[9]).unwrap_err();
    assert!(matches!(err, StoreError::ExtentExceeded { .. }));
    assert_eq!(store.dataset_info("/D").unwrap().dims, vec![4]);
}

#[test]
fn external_big_endian_on_disk() {
    let dir = TempDir::new().unwrap();
    let mut store = create(&dir.path().join("be.h5"));
    let props = DatasetCreateProps::new(DType::U16, &[1])
        .max_dims(&[4])
        .external_file("be.raw")
        .byte_order(ByteOrder::Big);
    store.create_dataset("/D", &props).unwrap();
    store
        .write_slice("/D", &Hyperslab::all(&[1]), &to_le_bytes(&[0x0102u16]))
        .unwrap();
    assert_eq!(std::fs::read(dir.path().join("be.raw")).unwrap(), vec![1, 2]);
}

// ---------------------------------------------------------------------------
// Property tests
// ---------------------------------------------------------------------------

fn slab_in(dims: (u64, u64)) -> impl Strategy<Value = Hyperslab> {
    (0..dims.0, 0..dims.1).prop_flat_map(move |(r, c)| {
        (1..=dims.0 - r, 1..=dims.1 - c)
            .prop_map(move |(nr, nc)| Hyperslab::new(vec![r, c], vec![nr, nc]))
    })
}

proptest! {
    #[test]
    fn slice_write_then_read_is_identity(
        slab in slab_in((6, 5)),
        seed in any::<i32>(),
        big in any::<bool>(),
    ) {
        let order = if big { ByteOrder::Big } else { ByteOrder::Little };
        let mut store = NativeStore::in_memory();
        store
            .create_dataset("/D", &DatasetCreateProps::new(DType::I32, &[6, 5]).byte_order(order))
            .unwrap();
        let n = slab.num_elements() as i32;
        let values: Vec<i32> = (0..n).map(|i| seed.wrapping_add(i)).collect();
        store.write_slice("/D", &slab, &to_le_bytes(&values)).unwrap();
        let back: Vec<i32> = from_le_bytes(&store.read_slice("/D", &slab).unwrap());
        prop_assert_eq!(back, values);
    }
}
