//! Canonical node names.

use crate::schema::NodeKind;

pub const SYS_LOG: &str = "SYS_LOG";
pub const PROCESS_HISTORY: &str = "PROCESS_HISTORY";
pub const COORDINATES: &str = "COORDINATES";
pub const TRIGGER: &str = "TRIGGER";

pub const STATION_PREFIX: &str = "STATION_";
pub const DIPOLE_PREFIX: &str = "DIPOLE_";

/// Name of the `index`-th child of an indexed kind.
///
/// Sub-array pointings and beams are zero-padded to three digits, stokes and
/// coordinates are not padded.
pub fn indexed_name(kind: NodeKind, index: usize) -> Option<String> {
    match kind {
        NodeKind::SubArrayPointing => Some(format!("SUB_ARRAY_POINTING_{index:03}")),
        NodeKind::Beam => Some(format!("BEAM_{index:03}")),
        NodeKind::Stokes => Some(format!("STOKES_{index}")),
        NodeKind::Coordinate
        | NodeKind::NumericalCoordinate
        | NodeKind::DirectionCoordinate
        | NodeKind::TimeCoordinate
        | NodeKind::SpectralCoordinate
        | NodeKind::StringCoordinate
        | NodeKind::PolarizationCoordinate => Some(format!("COORDINATE_{index}")),
        _ => None,
    }
}

/// Name prefix of keyed children (stations, dipoles).
pub fn key_prefix(kind: NodeKind) -> Option<&'static str> {
    match kind {
        NodeKind::Station => Some(STATION_PREFIX),
        NodeKind::Dipole => Some(DIPOLE_PREFIX),
        _ => None,
    }
}

pub fn station_group_name(station_name: &str) -> String {
    format!("{STATION_PREFIX}{station_name}")
}

/// `DIPOLE_SSSRRRCCC` from station, RSP and RCU ids.
pub fn dipole_name(station_id: u32, rsp_id: u32, rcu_id: u32) -> String {
    format!("{DIPOLE_PREFIX}{station_id:03}{rsp_id:03}{rcu_id:03}")
}

/// Append `name` to `parent`.
pub fn join(parent: &str, name: &str) -> String {
    if parent.ends_with('/') {
        format!("{parent}{name}")
    } else {
        format!("{parent}/{name}")
    }
}

pub fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
