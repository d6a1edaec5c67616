//! End-to-end tests: file creation and reopening, typed attributes across
//! sessions, resizable datasets, enumeration, selectors, header printing and
//! the lost-frame scan.

use std::path::{Path, PathBuf};

use lofardal::lofar::{
    open_any, scan_lost_frames, BfFile, CommonAttributes, LofarFile, TbbFile,
};
use lofardal::{
    build_paths, introspect, parse_selector, Error, File, FileCreateOptions, FormatContext,
    HeaderPrinter, Mode, Selection, Version, CURRENT_FORMAT_VERSION, UNLIMITED,
};
use ndarray::{Array2, ArrayD, IxDyn};
use num_complex::Complex64;
use proptest::prelude::*;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn bf_path(dir: &TempDir) -> PathBuf {
    dir.path().join("L42_SAP000_B000_S0_P000_bf.h5")
}

fn new_bf(path: &Path) -> BfFile {
    BfFile::create(path, &FileCreateOptions::new()).unwrap()
}

// ---------------------------------------------------------------------------
// Creation and reopening
// ---------------------------------------------------------------------------

#[test]
fn create_populates_root_attributes() {
    let dir = TempDir::new().unwrap();
    let path = bf_path(&dir);
    new_bf(&path).into_file().close().unwrap();

    let file = BfFile::open(&path, Mode::Read).unwrap();
    assert_eq!(file.telescope().get().unwrap(), "LOFAR");
    assert_eq!(file.file_type().get().unwrap(), "bf");
    assert_eq!(file.group_type().get().unwrap(), "Root");
    assert_eq!(
        file.file_name().get().unwrap(),
        "L42_SAP000_B000_S0_P000_bf.h5"
    );
    assert_eq!(
        file.doc_version().get().unwrap(),
        CURRENT_FORMAT_VERSION.to_string()
    );
    assert!(file.file_date().get().unwrap().ends_with('Z'));
    assert_eq!(file.file_version(), CURRENT_FORMAT_VERSION);
}

#[test]
fn attributes_persist_across_sessions() {
    let dir = TempDir::new().unwrap();
    let path = bf_path(&dir);
    new_bf(&path).into_file().close().unwrap();

    let file = BfFile::open(&path, Mode::ReadWrite).unwrap();
    file.clock_frequency().set(160.0).unwrap();
    file.into_file().close().unwrap();

    let file = BfFile::open(&path, Mode::ReadWrite).unwrap();
    file.clock_frequency_unit().set("MHz".into()).unwrap();
    file.into_file().close().unwrap();

    let file = BfFile::open(&path, Mode::Read).unwrap();
    assert_eq!(file.clock_frequency().get().unwrap(), 160.0);
    assert_eq!(file.clock_frequency_unit().get().unwrap(), "MHz");
    assert!(matches!(
        file.observer().set("x".into()),
        Err(Error::ReadOnly { .. })
    ));
}

#[test]
fn dropped_file_flushes() {
    let dir = TempDir::new().unwrap();
    let path = bf_path(&dir);
    {
        let file = new_bf(&path);
        file.observer().set("night shift".into()).unwrap();
    }
    let file = BfFile::open(&path, Mode::Read).unwrap();
    assert_eq!(file.observer().get().unwrap(), "night shift");
}

#[test]
fn exclusive_create_refuses_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = bf_path(&dir);
    new_bf(&path);
    let err = BfFile::create(&path, &FileCreateOptions::new().exclusive()).unwrap_err();
    assert!(matches!(err, Error::Store { .. }));
    // The original is untouched.
    assert_eq!(
        BfFile::open(&path, Mode::Read).unwrap().file_type().get().unwrap(),
        "bf"
    );
}

#[test]
fn older_version_hides_newer_attributes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("old.h5");
    let options = FileCreateOptions::new().version(Version::new(2, 3, 0));
    let file = TbbFile::create(&path, &options).unwrap();
    let station = file.station("CS004");
    station.create().unwrap();
    let dipole = station.dipole(0, 0).unwrap();
    assert!(!dipole.flag_offsets().supported());
    assert!(dipole.data_length().supported());
}

#[test]
fn unparsable_doc_version_reads_as_zero() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("odd.h5");
    let file = File::create(&path, &FileCreateOptions::new()).unwrap();
    file.doc_version().set("two point five".into()).unwrap();
    file.close().unwrap();

    let file = File::open(&path, Mode::Read).unwrap();
    assert_eq!(file.file_version(), Version::default());
}

// ---------------------------------------------------------------------------
// Defaults and absence
// ---------------------------------------------------------------------------

#[test]
fn absent_attributes_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let file = new_bf(&bf_path(&dir));
    let beam = file.sub_array_pointing(0).beam(0);
    beam.create().unwrap();

    assert!(beam.point_ra().get().unwrap_err().is_absent());
    assert_eq!(beam.point_ra().get_or_default().unwrap(), 0.0);
    assert_eq!(beam.group_type().get().unwrap(), "Beam");
    assert_eq!(
        beam.coordinates().group_type().get_or_default().unwrap(),
        "Coordinates"
    );
}

#[test]
fn wrong_type_is_schema_mismatch() {
    let dir = TempDir::new().unwrap();
    let file = new_bf(&bf_path(&dir));
    let root = file.root();
    let err = root.attribute::<u32>("TELESCOPE").get().unwrap_err();
    assert!(matches!(err, Error::SchemaMismatch { .. }));
    assert!(root.attribute::<String>("TELESCOPE").valid());
    root.attr("OBSERVER").set_literal("7").unwrap();
    assert!(root.attribute::<String>("OBSERVER").valid());
}

// ---------------------------------------------------------------------------
// Datasets
// ---------------------------------------------------------------------------

#[test]
fn resizable_stokes_needs_external_file() {
    let dir = TempDir::new().unwrap();
    let file = new_bf(&bf_path(&dir));
    let beam = file.sub_array_pointing(0).beam(0);
    beam.create().unwrap();

    let err = beam.stokes(0).create(&[4, 8], &[UNLIMITED, 8], None).unwrap_err();
    assert!(matches!(err, Error::UnsupportedResize { .. }));
    assert!(!beam.stokes(0).exists());

    let stokes = beam.stokes(0);
    stokes
        .create(&[4, 8], &[UNLIMITED, 8], Some(Path::new("S0.raw")))
        .unwrap();
    assert_eq!(stokes.data_type().get().unwrap(), "float");
    assert_eq!(stokes.external_files().unwrap(), vec![dir.path().join("S0.raw")]);
}

#[test]
fn resize_keeps_coordinates_and_respects_max() {
    let dir = TempDir::new().unwrap();
    let file = new_bf(&bf_path(&dir));
    let beam = file.sub_array_pointing(0).beam(0);
    beam.create().unwrap();
    let stokes = beam.stokes(0);
    stokes
        .create(&[2, 3], &[10, 3], Some(Path::new("S0.raw")))
        .unwrap();

    let block = Array2::from_shape_vec((2, 3), vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0])
        .unwrap()
        .into_dyn();
    stokes.write_slice(&[0, 0], &block.view()).unwrap();

    stokes.resize(&[5, 3]).unwrap();
    let grown = stokes.read_slice(&[0, 0], &[5, 3]).unwrap();
    assert_eq!(grown[IxDyn(&[1, 2])], 6.0);
    assert_eq!(grown[IxDyn(&[4, 0])], 0.0);

    let err = stokes.resize(&[11, 3]).unwrap_err();
    assert!(matches!(err, Error::ExtentExceeded { .. }));
    assert_eq!(stokes.dims().unwrap(), vec![5, 3]);

    stokes.resize(&[1, 3]).unwrap();
    let row = stokes.read_slice(&[0, 0], &[1, 3]).unwrap();
    assert_eq!(row.into_raw_vec(), vec![1.0, 2.0, 3.0]);
}

#[test]
fn out_of_bounds_slice_is_rejected() {
    let dir = TempDir::new().unwrap();
    let file = new_bf(&bf_path(&dir));
    let beam = file.sub_array_pointing(0).beam(0);
    beam.create().unwrap();
    let stokes = beam.stokes(1);
    stokes.create(&[4, 2], &[4, 2], None).unwrap();
    let err = stokes.read_slice(&[3, 0], &[2, 2]).unwrap_err();
    assert!(matches!(err, Error::OutOfBounds { .. }));
}

#[test]
fn complex_gain_curve_round_trips() {
    let dir = TempDir::new().unwrap();
    let file = TbbFile::create(dir.path().join("gain.h5"), &FileCreateOptions::new()).unwrap();
    let station = file.station("RS305");
    station.create().unwrap();
    let dipole = station.dipole(3, 6).unwrap();
    dipole.create(16, 16, None).unwrap();
    let curve = vec![Complex64::new(1.0, -0.5), Complex64::new(0.25, 2.0)];
    dipole.dipole_calibration_gain_curve().set(curve.clone()).unwrap();
    assert_eq!(dipole.dipole_calibration_gain_curve().get().unwrap(), curve);
}

proptest! {
    #[test]
    fn stokes_slices_round_trip(
        rows in 1usize..6,
        cols in 1usize..6,
        seed in any::<u32>(),
    ) {
        let dir = TempDir::new().unwrap();
        let file = new_bf(&bf_path(&dir));
        let beam = file.sub_array_pointing(0).beam(0);
        beam.create().unwrap();
        let stokes = beam.stokes(0);
        stokes.create(&[rows as u64, cols as u64], &[rows as u64, cols as u64], None).unwrap();

        let values: Vec<f32> = (0..rows * cols)
            .map(|i| f32::from_bits(seed.wrapping_add(i as u32) & 0x7f7f_ffff))
            .collect();
        let data = ArrayD::from_shape_vec(IxDyn(&[rows, cols]), values).unwrap();
        stokes.write_slice(&[0, 0], &data.view()).unwrap();
        let back = stokes.read_slice(&[0, 0], &[rows, cols]).unwrap();
        let bits = |a: &ArrayD<f32>| a.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        prop_assert_eq!(bits(&back), bits(&data));
    }
}

// ---------------------------------------------------------------------------
// Enumeration
// ---------------------------------------------------------------------------

#[test]
fn enumeration_stops_at_first_gap() {
    let dir = TempDir::new().unwrap();
    let file = new_bf(&bf_path(&dir));
    for nr in [0, 1, 2, 5] {
        file.sub_array_pointing(nr).create().unwrap();
    }
    file.nof_sub_array_pointings().set(4).unwrap();

    let names: Vec<String> = file
        .sub_array_pointings()
        .map(|sap| sap.name().to_string())
        .collect();
    assert_eq!(
        names,
        [
            "SUB_ARRAY_POINTING_000",
            "SUB_ARRAY_POINTING_001",
            "SUB_ARRAY_POINTING_002"
        ]
    );
    // The gap is visible only through explicit addressing.
    assert!(file.sub_array_pointing(5).exists());
}

#[test]
fn node_names_list_unknown_entries() {
    let dir = TempDir::new().unwrap();
    let file = new_bf(&bf_path(&dir));
    let root = file.root();
    root.child_named("EXTRA", lofardal::NodeKind::Generic)
        .create()
        .unwrap();
    let names = root.node_names().unwrap();
    assert!(names.contains(&"TELESCOPE".to_string()));
    assert_eq!(names.last().map(String::as_str), Some("EXTRA"));
}

// ---------------------------------------------------------------------------
// Selectors
// ---------------------------------------------------------------------------

#[test]
fn selector_resolves_canonical_attribute_path() {
    let dir = TempDir::new().unwrap();
    let file = new_bf(&bf_path(&dir));
    let request = parse_selector("SAP1/BEAM2:pointRA").unwrap();
    assert_eq!(request.sap, Some(Selection::One(1)));
    assert_eq!(request.beam, Some(Selection::One(2)));
    assert_eq!(request.attribute.as_deref(), Some("pointRA"));
    assert_eq!(
        build_paths(&request, &file.root()).unwrap(),
        ["/SUB_ARRAY_POINTING_001/BEAM_002/POINT_RA"]
    );
}

#[test]
fn selector_value_edits_attribute() {
    let dir = TempDir::new().unwrap();
    let file = new_bf(&bf_path(&dir));
    let sap = file.sub_array_pointing(0);
    sap.create().unwrap();

    let request = parse_selector("/sap0:pointDEC=52.25").unwrap();
    let literal = request.value.as_deref().unwrap();
    let attr = lofardal::selector::resolve_attribute(request.target_kind(), "pointDEC");
    sap.attr(&attr).set_literal(literal).unwrap();
    assert_eq!(sap.point_dec().get().unwrap(), 52.25);

    let err = sap.attr(&attr).set_literal("north").unwrap_err();
    assert!(matches!(err, Error::InvalidLiteral { .. }));
}

// ---------------------------------------------------------------------------
// Printing and introspection
// ---------------------------------------------------------------------------

#[test]
fn header_of_any_file() {
    let dir = TempDir::new().unwrap();
    let path = bf_path(&dir);
    {
        let file = new_bf(&path);
        let sap = file.sub_array_pointing(0);
        sap.create().unwrap();
        sap.beam(0).create().unwrap();
        sap.nof_beams().set(3).unwrap();
    }

    let file = open_any(&path, Mode::Read).unwrap();
    assert!(matches!(file, LofarFile::Bf(_)));
    let mut printer = HeaderPrinter::new(Vec::new());
    printer
        .print_file(&file, None, &FormatContext::default())
        .unwrap();
    let text = String::from_utf8(printer.into_inner()).unwrap();
    assert!(text.starts_with("/\n"));
    assert!(text.contains("  TELESCOPE = LOFAR\n"));
    assert!(text.contains("  /SUB_ARRAY_POINTING_000\n"));
    assert!(text.contains("    /SUB_ARRAY_POINTING_000/BEAM_000\n"));
}

#[test]
fn introspection_marks_unsupported_names() {
    let dir = TempDir::new().unwrap();
    let file = new_bf(&bf_path(&dir));
    file.root().attr("LEGACY_FLAG").set_literal("yes").unwrap();
    let reports = introspect(&file.root()).unwrap();
    let legacy = reports.iter().find(|r| r.name == "LEGACY_FLAG").unwrap();
    assert!(!legacy.supported);
    assert_eq!(legacy.value.as_deref(), Some("yes"));
    assert!(reports.iter().any(|r| r.name == "OBSERVATION_ID" && !r.exists));
}

// ---------------------------------------------------------------------------
// TBB lost frames
// ---------------------------------------------------------------------------

#[test]
fn lost_frame_scan_over_external_dipole() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("L7_tbb.h5");
    {
        let file = TbbFile::create(&path, &FileCreateOptions::new()).unwrap();
        let station = file.station("CS002");
        station.create().unwrap();
        let dipole = station.dipole(0, 5).unwrap();
        dipole
            .create(10_000, UNLIMITED, Some(Path::new("dipole.raw")))
            .unwrap();
        let mut samples: Vec<i16> = (0..10_000).map(|i| (i % 11) as i16 - 5).collect();
        for (i, s) in samples.iter_mut().enumerate() {
            if *s == 0 {
                *s = (i % 3) as i16 + 1;
            }
        }
        samples[2048..3072].fill(0);
        samples[5000..5500].fill(0);
        dipole.set_1d(0, &samples).unwrap();
    }

    let file = TbbFile::open(&path, Mode::Read).unwrap();
    let report = scan_lost_frames(&file).unwrap();
    assert_eq!(report.dipoles.len(), 1);
    let dipole = &report.dipoles[0];
    assert_eq!(dipole.station, "CS002");
    assert_eq!(dipole.dipole, "DIPOLE_002000005");
    assert_eq!(dipole.samples_per_frame, 1024);
    assert_eq!(dipole.lost_frames, vec![2]);
    assert_eq!(report.total_samples, 10_000);
    assert_eq!(report.lost_samples, 1024);
}
