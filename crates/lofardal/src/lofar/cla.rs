//! Common LOFAR attributes and file type detection.

use std::path::Path;

use lofardal_store::Mode;

use crate::error::Result;
use crate::file::File;
use crate::node::Group;

use super::bf::BfFile;
use super::tbb::TbbFile;

/// Attributes every LOFAR file carries on its root group.
pub trait CommonAttributes {
    fn root(&self) -> Group;

    attributes!(via root {
        group_type: String = "GROUPTYPE";
        file_name: String = "FILENAME";
        file_date: String = "FILEDATE";
        file_type: String = "FILETYPE";
        telescope: String = "TELESCOPE";
        observer: String = "OBSERVER";
        project_id: String = "PROJECT_ID";
        project_title: String = "PROJECT_TITLE";
        project_pi: String = "PROJECT_PI";
        project_co_i: String = "PROJECT_CO_I";
        project_contact: String = "PROJECT_CONTACT";
        observation_id: String = "OBSERVATION_ID";
        observation_start_utc: String = "OBSERVATION_START_UTC";
        observation_start_mjd: f64 = "OBSERVATION_START_MJD";
        observation_start_tai: String = "OBSERVATION_START_TAI";
        observation_end_utc: String = "OBSERVATION_END_UTC";
        observation_end_mjd: f64 = "OBSERVATION_END_MJD";
        observation_end_tai: String = "OBSERVATION_END_TAI";
        observation_nof_stations: u32 = "OBSERVATION_NOF_STATIONS";
        observation_stations_list: Vec<String> = "OBSERVATION_STATIONS_LIST";
        observation_frequency_max: f64 = "OBSERVATION_FREQUENCY_MAX";
        observation_frequency_min: f64 = "OBSERVATION_FREQUENCY_MIN";
        observation_frequency_center: f64 = "OBSERVATION_FREQUENCY_CENTER";
        observation_frequency_unit: String = "OBSERVATION_FREQUENCY_UNIT";
        observation_nof_bits_per_sample: u32 = "OBSERVATION_NOF_BITS_PER_SAMPLE";
        clock_frequency: f64 = "CLOCK_FREQUENCY";
        clock_frequency_unit: String = "CLOCK_FREQUENCY_UNIT";
        antenna_set: String = "ANTENNA_SET";
        filter_selection: String = "FILTER_SELECTION";
        targets: Vec<String> = "TARGETS";
        system_version: String = "SYSTEM_VERSION";
        pipeline_name: String = "PIPELINE_NAME";
        pipeline_version: String = "PIPELINE_VERSION";
        doc_name: String = "DOC_NAME";
        doc_version: String = "DOC_VERSION";
        notes: String = "NOTES";
    });
}

impl CommonAttributes for File {
    fn root(&self) -> Group {
        File::root(self)
    }
}

/// Value of the root `FILETYPE` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileType {
    Bf,
    Tbb,
    Other(String),
}

impl FileType {
    pub fn from_tag(tag: &str) -> FileType {
        match tag {
            "bf" => FileType::Bf,
            "tbb" => FileType::Tbb,
            other => FileType::Other(other.to_string()),
        }
    }
}

/// A file opened as the type its root says it is.
#[derive(Debug)]
pub enum LofarFile {
    Bf(BfFile),
    Tbb(TbbFile),
    Other(File),
}

impl LofarFile {
    pub fn file(&self) -> &File {
        match self {
            LofarFile::Bf(f) => f,
            LofarFile::Tbb(f) => f,
            LofarFile::Other(f) => f,
        }
    }
}

/// Read `FILETYPE` from the file at `path`. A missing tag is `Other("")`.
pub fn detect_file_type(path: impl AsRef<Path>) -> Result<FileType> {
    let file = File::open(path, Mode::Read)?;
    match file.file_type().get() {
        Ok(tag) => Ok(FileType::from_tag(&tag)),
        Err(e) if e.is_absent() => Ok(FileType::Other(String::new())),
        Err(e) => Err(e),
    }
}

/// Open `path` as a beam-formed, TBB or plain LOFAR file.
pub fn open_any(path: impl AsRef<Path>, mode: Mode) -> Result<LofarFile> {
    let path = path.as_ref();
    Ok(match detect_file_type(path)? {
        FileType::Bf => LofarFile::Bf(BfFile::open(path, mode)?),
        FileType::Tbb => LofarFile::Tbb(TbbFile::open(path, mode)?),
        FileType::Other(_) => LofarFile::Other(File::open(path, mode)?),
    })
}
