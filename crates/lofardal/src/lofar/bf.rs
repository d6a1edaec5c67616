//! Beam-formed files: sub-array pointings, beams and Stokes datasets.

use std::ops::Deref;
use std::path::Path;

use lofardal_store::{FileAccessProps, Mode};

use crate::dataset::Dataset;
use crate::error::Result;
use crate::file::{File, FileCreateOptions};
use crate::naming;
use crate::node::{Group, Node};
use crate::schema::NodeKind;
use crate::traverse::children;

use super::cla::CommonAttributes;
use super::coordinates::CoordinatesGroup;

// ---------------------------------------------------------------------------
// BfFile
// ---------------------------------------------------------------------------

/// A beam-formed data file.
#[derive(Debug)]
pub struct BfFile {
    file: File,
}

impl BfFile {
    pub fn open(path: impl AsRef<Path>, mode: Mode) -> Result<BfFile> {
        Self::open_with(path, FileAccessProps::new(mode))
    }

    pub fn open_with(path: impl AsRef<Path>, props: FileAccessProps) -> Result<BfFile> {
        let file = File::open_as(path.as_ref(), props, NodeKind::BfRoot)?;
        Ok(BfFile { file })
    }

    /// Create a file with `FILETYPE = "bf"` and the common root attributes.
    pub fn create(path: impl AsRef<Path>, options: &FileCreateOptions) -> Result<BfFile> {
        let file = File::create_as(path.as_ref(), options, NodeKind::BfRoot)?;
        Ok(BfFile { file })
    }

    pub fn into_file(self) -> File {
        self.file
    }

    pub fn sys_log(&self) -> SysLog {
        SysLog {
            group: self.root().child_named(naming::SYS_LOG, NodeKind::SysLog),
        }
    }

    pub fn sub_array_pointing(&self, nr: usize) -> SubArrayPointing {
        SubArrayPointing {
            group: self.root().child(NodeKind::SubArrayPointing, nr),
        }
    }

    /// Stored sub-array pointings from index 0 up to the first gap.
    pub fn sub_array_pointings(&self) -> impl Iterator<Item = SubArrayPointing> {
        children(&self.root(), NodeKind::SubArrayPointing).map(SubArrayPointing::from)
    }

    attributes!(pub via root {
        create_offline_online: String = "CREATE_OFFLINE_ONLINE";
        bf_format: String = "BF_FORMAT";
        bf_version: String = "BF_VERSION";
        exp_time_start_utc: String = "EXPTIME_START_UTC";
        exp_time_start_mjd: f64 = "EXPTIME_START_MJD";
        exp_time_start_tai: String = "EXPTIME_START_TAI";
        exp_time_end_utc: String = "EXPTIME_END_UTC";
        exp_time_end_mjd: f64 = "EXPTIME_END_MJD";
        exp_time_end_tai: String = "EXPTIME_END_TAI";
        total_integration_time: f64 = "TOTAL_INTEGRATION_TIME";
        total_integration_time_unit: String = "TOTAL_INTEGRATION_TIME_UNIT";
        observation_datatype: String = "OBSERVATION_DATATYPE";
        sub_array_pointing_diameter: f64 = "SUB_ARRAY_POINTING_DIAMETER";
        sub_array_pointing_diameter_unit: String = "SUB_ARRAY_POINTING_DIAMETER_UNIT";
        bandwidth: f64 = "BANDWIDTH";
        bandwidth_unit: String = "BANDWIDTH_UNIT";
        beam_diameter: f64 = "BEAM_DIAMETER";
        beam_diameter_unit: String = "BEAM_DIAMETER_UNIT";
        weather_temperature: Vec<f64> = "WEATHER_TEMPERATURE";
        weather_temperature_unit: String = "WEATHER_TEMPERATURE_UNIT";
        weather_humidity: Vec<f64> = "WEATHER_HUMIDITY";
        weather_humidity_unit: String = "WEATHER_HUMIDITY_UNIT";
        system_temperature: Vec<f64> = "SYSTEM_TEMPERATURE";
        system_temperature_unit: String = "SYSTEM_TEMPERATURE_UNIT";
        observation_nof_sub_array_pointings: u32 = "OBSERVATION_NOF_SUB_ARRAY_POINTINGS";
        nof_sub_array_pointings: u32 = "NOF_SUB_ARRAY_POINTINGS";
    });
}

impl CommonAttributes for BfFile {
    fn root(&self) -> Group {
        self.file.root()
    }
}

impl Deref for BfFile {
    type Target = File;

    fn deref(&self) -> &File {
        &self.file
    }
}

group_view!(SysLog, SubArrayPointing, ProcessHistory, Beam);

// ---------------------------------------------------------------------------
// SysLog / ProcessHistory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SysLog {
    group: Group,
}

impl SysLog {
    attributes!(pub via group {
        group_type: String = "GROUPTYPE";
    });
}

#[derive(Debug, Clone)]
pub struct ProcessHistory {
    group: Group,
}

impl ProcessHistory {
    attributes!(pub via group {
        group_type: String = "GROUPTYPE";
        observation_parset: String = "OBSERVATION_PARSET";
        observation_log: String = "OBSERVATION_LOG";
        presto_parset: String = "PRESTO_PARSET";
        presto_log: String = "PRESTO_LOG";
    });
}

fn process_history(parent: &Group) -> ProcessHistory {
    ProcessHistory {
        group: parent.child_named(naming::PROCESS_HISTORY, NodeKind::ProcessHistory),
    }
}

// ---------------------------------------------------------------------------
// SubArrayPointing
// ---------------------------------------------------------------------------

/// One station-beam pointing: `/SUB_ARRAY_POINTING_nnn`.
#[derive(Debug, Clone)]
pub struct SubArrayPointing {
    group: Group,
}

impl SubArrayPointing {
    pub fn beam(&self, nr: usize) -> Beam {
        Beam {
            group: self.group.child(NodeKind::Beam, nr),
        }
    }

    pub fn beams(&self) -> impl Iterator<Item = Beam> {
        children(&self.group, NodeKind::Beam).map(Beam::from)
    }

    pub fn process_history(&self) -> ProcessHistory {
        process_history(&self.group)
    }

    attributes!(pub via group {
        group_type: String = "GROUPTYPE";
        target: String = "TARGET";
        exp_time_start_utc: String = "EXPTIME_START_UTC";
        exp_time_start_mjd: f64 = "EXPTIME_START_MJD";
        exp_time_start_tai: String = "EXPTIME_START_TAI";
        exp_time_end_utc: String = "EXPTIME_END_UTC";
        exp_time_end_mjd: f64 = "EXPTIME_END_MJD";
        exp_time_end_tai: String = "EXPTIME_END_TAI";
        point_ra: f64 = "POINT_RA";
        point_ra_unit: String = "POINT_RA_UNIT";
        point_dec: f64 = "POINT_DEC";
        point_dec_unit: String = "POINT_DEC_UNIT";
        subband_width: f64 = "SUBBAND_WIDTH";
        subband_width_unit: String = "SUBBAND_WIDTH_UNIT";
        observation_nof_beams: u32 = "OBSERVATION_NOF_BEAMS";
        nof_beams: u32 = "NOF_BEAMS";
        nof_stations: u32 = "NOF_STATIONS";
        stations_list: Vec<String> = "STATIONS_LIST";
        clock_rate: f64 = "CLOCK_RATE";
        clock_rate_unit: String = "CLOCK_RATE_UNIT";
        nof_samples: u32 = "NOF_SAMPLES";
        sampling_rate: f64 = "SAMPLING_RATE";
        sampling_rate_unit: String = "SAMPLING_RATE_UNIT";
        sampling_time: f64 = "SAMPLING_TIME";
        sampling_time_unit: String = "SAMPLING_TIME_UNIT";
        channels_per_subband: u32 = "CHANNELS_PER_SUBBAND";
        channel_width: f64 = "CHANNEL_WIDTH";
        channel_width_unit: String = "CHANNEL_WIDTH_UNIT";
    });
}

// ---------------------------------------------------------------------------
// Beam
// ---------------------------------------------------------------------------

/// A tied-array beam: `/SUB_ARRAY_POINTING_nnn/BEAM_nnn`.
#[derive(Debug, Clone)]
pub struct Beam {
    group: Group,
}

impl Beam {
    pub fn stokes(&self, nr: usize) -> Stokes {
        let name = format!("STOKES_{nr}");
        Stokes::from(self.group.child_node(&name, NodeKind::Stokes))
    }

    /// Stored Stokes datasets from `STOKES_0` up to the first gap.
    pub fn all_stokes(&self) -> impl Iterator<Item = Stokes> {
        children(&self.group, NodeKind::Stokes).map(Stokes::from)
    }

    pub fn coordinates(&self) -> CoordinatesGroup {
        CoordinatesGroup::from(
            self.group
                .child_node(naming::COORDINATES, NodeKind::Coordinates),
        )
    }

    pub fn process_history(&self) -> ProcessHistory {
        process_history(&self.group)
    }

    attributes!(pub via group {
        group_type: String = "GROUPTYPE";
        target: String = "TARGET";
        nof_stations: u32 = "NOF_STATIONS";
        stations_list: Vec<String> = "STATIONS_LIST";
        nof_samples: u32 = "NOF_SAMPLES";
        sampling_rate: f64 = "SAMPLING_RATE";
        sampling_rate_unit: String = "SAMPLING_RATE_UNIT";
        sampling_time: f64 = "SAMPLING_TIME";
        sampling_time_unit: String = "SAMPLING_TIME_UNIT";
        channels_per_subband: u32 = "CHANNELS_PER_SUBBAND";
        channel_width: f64 = "CHANNEL_WIDTH";
        channel_width_unit: String = "CHANNEL_WIDTH_UNIT";
        point_ra: f64 = "POINT_RA";
        point_ra_unit: String = "POINT_RA_UNIT";
        point_dec: f64 = "POINT_DEC";
        point_dec_unit: String = "POINT_DEC_UNIT";
        point_offset_ra: f64 = "POINT_OFFSET_RA";
        point_offset_ra_unit: String = "POINT_OFFSET_RA_UNIT";
        point_offset_dec: f64 = "POINT_OFFSET_DEC";
        point_offset_dec_unit: String = "POINT_OFFSET_DEC_UNIT";
        beam_diameter_ra: f64 = "BEAM_DIAMETER_RA";
        beam_diameter_ra_unit: String = "BEAM_DIAMETER_RA_UNIT";
        beam_diameter_dec: f64 = "BEAM_DIAMETER_DEC";
        beam_diameter_dec_unit: String = "BEAM_DIAMETER_DEC_UNIT";
        beam_frequency_center: f64 = "BEAM_FREQUENCY_CENTER";
        beam_frequency_center_unit: String = "BEAM_FREQUENCY_CENTER_UNIT";
        folded_data: bool = "FOLDED_DATA";
        fold_period: f64 = "FOLD_PERIOD";
        fold_period_unit: String = "FOLD_PERIOD_UNIT";
        dedispersion: String = "DEDISPERSION";
        dedispersion_measure: f64 = "DEDISPERSION_MEASURE";
        dedispersion_measure_unit: String = "DEDISPERSION_MEASURE_UNIT";
        barycentered: bool = "BARYCENTERED";
        observation_nof_stokes: u32 = "OBSERVATION_NOF_STOKES";
        nof_stokes: u32 = "NOF_STOKES";
        stokes_components: Vec<String> = "STOKES_COMPONENTS";
        complex_voltages: bool = "COMPLEX_VOLTAGES";
        signal_sum: String = "SIGNAL_SUM";
    });
}

// ---------------------------------------------------------------------------
// Stokes
// ---------------------------------------------------------------------------

/// A `[samples][channels]` float32 Stokes dataset: `.../BEAM_nnn/STOKES_n`.
#[derive(Debug, Clone)]
pub struct Stokes {
    dataset: Dataset<f32>,
}

impl From<Node> for Stokes {
    fn from(node: Node) -> Self {
        Self {
            dataset: Dataset::from(node),
        }
    }
}

impl Deref for Stokes {
    type Target = Dataset<f32>;

    fn deref(&self) -> &Dataset<f32> {
        &self.dataset
    }
}

impl Stokes {
    /// Create the dataset and its `DATATYPE` attribute.
    pub fn create(&self, dims: &[u64], max_dims: &[u64], external: Option<&Path>) -> Result<()> {
        self.dataset.create(dims, max_dims, external)?;
        self.data_type().create()
    }

    attributes!(pub via node {
        data_type: String = "DATATYPE";
        stokes_component: String = "STOKES_COMPONENT";
        nof_channels: Vec<u32> = "NOF_CHANNELS";
        nof_subbands: u32 = "NOF_SUBBANDS";
        nof_samples: u32 = "NOF_SAMPLES";
    });
}
