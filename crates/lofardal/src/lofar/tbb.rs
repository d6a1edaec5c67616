//! Transient buffer board files: stations and dipole time series.

use std::ops::Deref;
use std::path::Path;

use lofardal_store::{FileAccessProps, Mode, Range};
use num_complex::Complex64;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::file::{File, FileCreateOptions};
use crate::naming;
use crate::node::{Group, Node};
use crate::schema::NodeKind;
use crate::traverse::children;

use super::cla::CommonAttributes;
use super::station_names::station_name_to_id;

// ---------------------------------------------------------------------------
// TbbFile
// ---------------------------------------------------------------------------

/// A transient buffer board dump.
#[derive(Debug)]
pub struct TbbFile {
    file: File,
}

impl TbbFile {
    pub fn open(path: impl AsRef<Path>, mode: Mode) -> Result<TbbFile> {
        Self::open_with(path, FileAccessProps::new(mode))
    }

    pub fn open_with(path: impl AsRef<Path>, props: FileAccessProps) -> Result<TbbFile> {
        let file = File::open_as(path.as_ref(), props, NodeKind::TbbRoot)?;
        Ok(TbbFile { file })
    }

    /// Create a file with `FILETYPE = "tbb"` and the common root attributes.
    pub fn create(path: impl AsRef<Path>, options: &FileCreateOptions) -> Result<TbbFile> {
        let file = File::create_as(path.as_ref(), options, NodeKind::TbbRoot)?;
        Ok(TbbFile { file })
    }

    pub fn into_file(self) -> File {
        self.file
    }

    pub fn trigger(&self) -> Trigger {
        Trigger::from(self.root().child_node(naming::TRIGGER, NodeKind::Trigger))
    }

    /// Handle on `STATION_<name>`.
    pub fn station(&self, name: &str) -> Station {
        Station::from(
            self.root()
                .child_node(&naming::station_group_name(name), NodeKind::Station),
        )
    }

    /// Stored station groups, by name.
    pub fn stations(&self) -> impl Iterator<Item = Station> {
        children(&self.root(), NodeKind::Station).map(Station::from)
    }

    attributes!(pub via root {
        operating_mode: String = "OPERATING_MODE";
        nof_stations: u32 = "NOF_STATIONS";
    });
}

impl CommonAttributes for TbbFile {
    fn root(&self) -> Group {
        self.file.root()
    }
}

impl Deref for TbbFile {
    type Target = File;

    fn deref(&self) -> &File {
        &self.file
    }
}

group_view!(Trigger, Station);

// ---------------------------------------------------------------------------
// Trigger
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Trigger {
    group: Group,
}

impl Trigger {
    attributes!(pub via group {
        group_type: String = "GROUPTYPE";
        trigger_type: String = "TRIGGER_TYPE";
        trigger_version: i32 = "TRIGGER_VERSION";
        param_coincidence_channels: i32 = "PARAM_COINCIDENCE_CHANNELS";
        param_coincidence_time: f64 = "PARAM_COINCIDENCE_TIME";
        param_direction_fit: String = "PARAM_DIRECTION_FIT";
        param_elevation_min: f64 = "PARAM_ELEVATION_MIN";
        param_fit_variance_max: f64 = "PARAM_FIT_VARIANCE_MAX";
    });
}

// ---------------------------------------------------------------------------
// Station
// ---------------------------------------------------------------------------

/// A station group: `/STATION_<name>`.
#[derive(Debug, Clone)]
pub struct Station {
    group: Group,
}

impl Station {
    /// Station name taken from the group name.
    pub fn station_name(&self) -> &str {
        self.group
            .name()
            .strip_prefix(naming::STATION_PREFIX)
            .unwrap_or_else(|| self.group.name())
    }

    /// Dipole `rsp`/`rcu` of this station; the station id comes from the name.
    pub fn dipole(&self, rsp_id: u32, rcu_id: u32) -> Result<Dipole> {
        let station_id = station_name_to_id(self.station_name())?;
        Ok(self.dipole_with_id(station_id, rsp_id, rcu_id))
    }

    pub fn dipole_with_id(&self, station_id: u32, rsp_id: u32, rcu_id: u32) -> Dipole {
        let name = naming::dipole_name(station_id, rsp_id, rcu_id);
        Dipole::from(self.group.child_node(&name, NodeKind::Dipole))
    }

    /// Stored dipole datasets, by name.
    pub fn dipoles(&self) -> impl Iterator<Item = Dipole> {
        children(&self.group, NodeKind::Dipole).map(Dipole::from)
    }

    attributes!(pub via group {
        group_type: String = "GROUPTYPE";
        station_name_attr: String = "STATION_NAME";
        station_position: Vec<f64> = "STATION_POSITION";
        station_position_unit: String = "STATION_POSITION_UNIT";
        station_position_frame: String = "STATION_POSITION_FRAME";
        beam_direction: Vec<f64> = "BEAM_DIRECTION";
        beam_direction_unit: String = "BEAM_DIRECTION_UNIT";
        beam_direction_frame: String = "BEAM_DIRECTION_FRAME";
        clock_offset: f64 = "CLOCK_OFFSET";
        clock_offset_unit: String = "CLOCK_OFFSET_UNIT";
        nof_dipoles: u32 = "NOF_DIPOLES";
    });
}

// ---------------------------------------------------------------------------
// Dipole
// ---------------------------------------------------------------------------

/// Raw int16 time series of one dipole: `.../DIPOLE_SSSRRRCCC`.
#[derive(Debug, Clone)]
pub struct Dipole {
    dataset: Dataset<i16>,
}

impl From<Node> for Dipole {
    fn from(node: Node) -> Self {
        Self {
            dataset: Dataset::from(node),
        }
    }
}

impl Deref for Dipole {
    type Target = Dataset<i16>;

    fn deref(&self) -> &Dataset<i16> {
        &self.dataset
    }
}

impl Dipole {
    /// `(station, rsp, rcu)` ids encoded in the dataset name.
    pub fn ids(&self) -> Option<(u32, u32, u32)> {
        let digits = self.dataset.name().strip_prefix(naming::DIPOLE_PREFIX)?;
        if digits.len() != 9 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let field = |r: std::ops::Range<usize>| digits[r].parse::<u32>().ok();
        Some((field(0..3)?, field(3..6)?, field(6..9)?))
    }

    /// Create the dataset and record its ids as attributes.
    pub fn create(&self, len: u64, max_len: u64, external: Option<&Path>) -> Result<()> {
        self.dataset.create(&[len], &[max_len], external)?;
        if let Some((station, rsp, rcu)) = self.ids() {
            self.station_id().set(station)?;
            self.rsp_id().set(rsp)?;
            self.rcu_id().set(rcu)?;
        }
        self.data_length().set(len)
    }

    attributes!(pub via node {
        station_id: u32 = "STATION_ID";
        rsp_id: u32 = "RSP_ID";
        rcu_id: u32 = "RCU_ID";
        sample_frequency: f64 = "SAMPLE_FREQUENCY";
        sample_frequency_unit: String = "SAMPLE_FREQUENCY_UNIT";
        time: u32 = "TIME";
        sample_number: u32 = "SAMPLE_NUMBER";
        samples_per_frame: u32 = "SAMPLES_PER_FRAME";
        data_length: u64 = "DATA_LENGTH";
        flag_offsets: Vec<Range> = "FLAG_OFFSETS";
        nyquist_zone: u32 = "NYQUIST_ZONE";
        cable_delay: f64 = "CABLE_DELAY";
        cable_delay_unit: String = "CABLE_DELAY_UNIT";
        dipole_calibration_delay: f64 = "DIPOLE_CALIBRATION_DELAY";
        dipole_calibration_delay_unit: String = "DIPOLE_CALIBRATION_DELAY_UNIT";
        dipole_calibration_gain_curve: Vec<Complex64> = "DIPOLE_CALIBRATION_DELAY_GAIN_CURVE";
        antenna_position: Vec<f64> = "ANTENNA_POSITION";
        antenna_position_unit: String = "ANTENNA_POSITION_UNIT";
        antenna_position_frame: String = "ANTENNA_POSITION_FRAME";
        antenna_normal_vector: Vec<f64> = "ANTENNA_NORMAL_VECTOR";
        antenna_rotation_matrix: Vec<f64> = "ANTENNA_ROTATION_MATRIX";
        tile_beam: Vec<f64> = "TILE_BEAM";
        tile_beam_unit: String = "TILE_BEAM_UNIT";
        tile_beam_frame: String = "TILE_BEAM_FRAME";
        dispersion_measure: f64 = "DISPERSION_MEASURE";
        dispersion_measure_unit: String = "DISPERSION_MEASURE_UNIT";
    });
}
