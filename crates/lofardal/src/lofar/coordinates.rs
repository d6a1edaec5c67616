//! World coordinate metadata of a beam: `.../BEAM_nnn/COORDINATES`.

use std::fmt;

use tracing::warn;

use crate::error::Result;
use crate::node::{Group, Node};
use crate::schema::NodeKind;
use crate::traverse::children;

// ---------------------------------------------------------------------------
// CoordinatesGroup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CoordinatesGroup {
    group: Group,
}

group_view!(CoordinatesGroup);

impl CoordinatesGroup {
    /// Handle on `COORDINATE_<nr>` typed after `COORDINATE_TYPES[nr]`.
    ///
    /// Falls back to the coordinate's own `COORDINATE_TYPE`, then to a
    /// generic coordinate.
    pub fn coordinate(&self, nr: usize) -> Coordinate {
        let generic = self.group.child(NodeKind::Coordinate, nr);
        let declared = self
            .coordinate_types()
            .get()
            .ok()
            .and_then(|types| types.into_iter().nth(nr))
            .or_else(|| {
                generic
                    .attribute::<String>("COORDINATE_TYPE")
                    .get()
                    .ok()
            });
        let Some(name) = declared else {
            return Coordinate::Generic(GenericCoordinate { group: generic });
        };
        match CoordinateType::from_name(&name) {
            Some(ty) => self.typed(nr, ty),
            None => {
                warn!(
                    path = generic.path(),
                    coordinate_type = %name,
                    "unknown coordinate type, using a generic coordinate"
                );
                Coordinate::Generic(GenericCoordinate { group: generic })
            }
        }
    }

    /// Handle on `COORDINATE_<nr>` as the given type, without looking at
    /// the file. Used when writing coordinates.
    pub fn typed(&self, nr: usize, ty: CoordinateType) -> Coordinate {
        let group = self.group.child(ty.node_kind(), nr);
        match ty {
            CoordinateType::Time => Coordinate::Time(TimeCoordinate { group }),
            CoordinateType::Spectral => Coordinate::Spectral(SpectralCoordinate { group }),
            CoordinateType::Direction => Coordinate::Direction(DirectionCoordinate { group }),
            CoordinateType::Polarization => {
                Coordinate::Polarization(PolarizationCoordinate { group })
            }
        }
    }

    /// Stored coordinates from `COORDINATE_0` up to the first gap.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        children(&self.group, NodeKind::Coordinate)
            .enumerate()
            .map(|(nr, _)| self.coordinate(nr))
    }

    attributes!(pub via group {
        group_type: String = "GROUPTYPE";
        ref_location_value: Vec<f64> = "REF_LOCATION_VALUE";
        ref_location_unit: Vec<String> = "REF_LOCATION_UNIT";
        ref_location_frame: String = "REF_LOCATION_FRAME";
        ref_time_value: f64 = "REF_TIME_VALUE";
        ref_time_unit: String = "REF_TIME_UNIT";
        ref_time_frame: String = "REF_TIME_FRAME";
        nof_coordinates: u32 = "NOF_COORDINATES";
        nof_axes: u32 = "NOF_AXES";
        coordinate_types: Vec<String> = "COORDINATE_TYPES";
    });
}

// ---------------------------------------------------------------------------
// CoordinateType
// ---------------------------------------------------------------------------

/// Coordinate types with a dedicated view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinateType {
    Time,
    Spectral,
    Direction,
    Polarization,
}

impl CoordinateType {
    pub fn as_str(self) -> &'static str {
        match self {
            CoordinateType::Time => "Time",
            CoordinateType::Spectral => "Spectral",
            CoordinateType::Direction => "Direction",
            CoordinateType::Polarization => "Polarization",
        }
    }

    /// Parse a `COORDINATE_TYPE` value. Matching is exact.
    pub fn from_name(name: &str) -> Option<CoordinateType> {
        match name {
            "Time" => Some(CoordinateType::Time),
            "Spectral" => Some(CoordinateType::Spectral),
            "Direction" => Some(CoordinateType::Direction),
            "Polarization" => Some(CoordinateType::Polarization),
            _ => None,
        }
    }

    pub fn node_kind(self) -> NodeKind {
        match self {
            CoordinateType::Time => NodeKind::TimeCoordinate,
            CoordinateType::Spectral => NodeKind::SpectralCoordinate,
            CoordinateType::Direction => NodeKind::DirectionCoordinate,
            CoordinateType::Polarization => NodeKind::PolarizationCoordinate,
        }
    }
}

impl fmt::Display for CoordinateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Coordinate views
// ---------------------------------------------------------------------------

/// Attributes every coordinate carries.
pub trait CoordinateAttributes {
    fn group(&self) -> &Group;

    attributes!(via group {
        group_type: String = "GROUPTYPE";
        coordinate_type: String = "COORDINATE_TYPE";
        storage_type: Vec<String> = "STORAGE_TYPE";
        nof_axes: u32 = "NOF_AXES";
        axis_names: Vec<String> = "AXIS_NAMES";
        axis_units: Vec<String> = "AXIS_UNITS";
    });
}

/// Attributes of single-axis numerical coordinates.
pub trait NumericalAttributes: CoordinateAttributes {
    attributes!(via group {
        reference_value: f64 = "REFERENCE_VALUE";
        reference_pixel: f64 = "REFERENCE_PIXEL";
        increment: f64 = "INCREMENT";
        pc: f64 = "PC";
        axis_length: u32 = "AXIS_LENGTH";
        axis_values_pixel: Vec<u32> = "AXIS_VALUES_PIXEL";
        axis_values_world: Vec<f64> = "AXIS_VALUES_WORLD";
    });
}

macro_rules! coordinate_view {
    ($($view:ident),* $(,)?) => {
        $(
            impl CoordinateAttributes for $view {
                fn group(&self) -> &Group {
                    &self.group
                }
            }

            impl std::ops::Deref for $view {
                type Target = Group;

                fn deref(&self) -> &Group {
                    &self.group
                }
            }
        )*
    };
}

#[derive(Debug, Clone)]
pub struct TimeCoordinate {
    group: Group,
}

#[derive(Debug, Clone)]
pub struct SpectralCoordinate {
    group: Group,
}

#[derive(Debug, Clone)]
pub struct DirectionCoordinate {
    group: Group,
}

#[derive(Debug, Clone)]
pub struct PolarizationCoordinate {
    group: Group,
}

/// A coordinate of a type without a dedicated view.
#[derive(Debug, Clone)]
pub struct GenericCoordinate {
    group: Group,
}

coordinate_view!(
    TimeCoordinate,
    SpectralCoordinate,
    DirectionCoordinate,
    PolarizationCoordinate,
    GenericCoordinate,
);

impl NumericalAttributes for TimeCoordinate {}
impl NumericalAttributes for SpectralCoordinate {}

impl TimeCoordinate {
    attributes!(pub via group {
        reference_frame: String = "REFERENCE_FRAME";
    });
}

impl SpectralCoordinate {
    attributes!(pub via group {
        reference_frame: String = "REFERENCE_FRAME";
        rest_frequency: f64 = "REST_FREQUENCY";
        rest_frequency_unit: String = "REST_FREQUENCY_UNIT";
        rest_wavelength: f64 = "REST_WAVELENGTH";
        rest_wavelength_unit: String = "REST_WAVELENGTH_UNIT";
    });
}

impl DirectionCoordinate {
    attributes!(pub via group {
        reference_value: Vec<f64> = "REFERENCE_VALUE";
        reference_pixel: Vec<f64> = "REFERENCE_PIXEL";
        increment: Vec<f64> = "INCREMENT";
        pc: Vec<f64> = "PC";
        equinox: String = "EQUINOX";
        radec_sys: String = "RADEC_SYS";
        projection: String = "PROJECTION";
        projection_param: Vec<f64> = "PROJECTION_PARAM";
        lon_pole: f64 = "LONPOLE";
        lat_pole: f64 = "LATPOLE";
    });
}

impl PolarizationCoordinate {
    attributes!(pub via group {
        axis_length: u32 = "AXIS_LENGTH";
        axis_values_pixel: Vec<u32> = "AXIS_VALUES_PIXEL";
        axis_values_world: Vec<String> = "AXIS_VALUES_WORLD";
    });
}

/// A coordinate typed after its declared coordinate type.
#[derive(Debug, Clone)]
pub enum Coordinate {
    Time(TimeCoordinate),
    Spectral(SpectralCoordinate),
    Direction(DirectionCoordinate),
    Polarization(PolarizationCoordinate),
    Generic(GenericCoordinate),
}

impl Coordinate {
    pub fn group(&self) -> &Group {
        match self {
            Coordinate::Time(c) => &c.group,
            Coordinate::Spectral(c) => &c.group,
            Coordinate::Direction(c) => &c.group,
            Coordinate::Polarization(c) => &c.group,
            Coordinate::Generic(c) => &c.group,
        }
    }

    pub fn node(&self) -> &Node {
        self.group()
    }

    /// The dedicated type, `None` for generic coordinates.
    pub fn coordinate_type(&self) -> Option<CoordinateType> {
        match self {
            Coordinate::Time(_) => Some(CoordinateType::Time),
            Coordinate::Spectral(_) => Some(CoordinateType::Spectral),
            Coordinate::Direction(_) => Some(CoordinateType::Direction),
            Coordinate::Polarization(_) => Some(CoordinateType::Polarization),
            Coordinate::Generic(_) => None,
        }
    }

    /// Create the coordinate group with its `GROUPTYPE` and `COORDINATE_TYPE`.
    pub fn create(&self) -> Result<()> {
        self.group().create()?;
        if self.coordinate_type().is_some() {
            self.group()
                .attribute::<String>("COORDINATE_TYPE")
                .create()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::FileCreateOptions;
    use crate::lofar::BfFile;
    use tempfile::TempDir;

    fn coordinates(dir: &TempDir) -> (BfFile, CoordinatesGroup) {
        let file = BfFile::create(dir.path().join("c.h5"), &FileCreateOptions::new()).unwrap();
        let coords = file.sub_array_pointing(0).beam(0).coordinates();
        coords.create().unwrap();
        (file, coords)
    }

    #[test]
    fn typed_by_coordinate_types() {
        let dir = TempDir::new().unwrap();
        let (_file, coords) = coordinates(&dir);
        coords
            .coordinate_types()
            .set(vec!["Time".into(), "Spectral".into()])
            .unwrap();
        for ty in [CoordinateType::Time, CoordinateType::Spectral] {
            let nr = if ty == CoordinateType::Time { 0 } else { 1 };
            coords.typed(nr, ty).create().unwrap();
        }

        let Coordinate::Time(time) = coords.coordinate(0) else {
            panic!("expected a time coordinate");
        };
        assert_eq!(time.group_type().get().unwrap(), "TimeCoord");
        assert_eq!(time.coordinate_type().get().unwrap(), "Time");
        time.reference_value().set(55000.5).unwrap();
        assert_eq!(time.reference_value().get().unwrap(), 55000.5);

        let Coordinate::Spectral(spectral) = coords.coordinate(1) else {
            panic!("expected a spectral coordinate");
        };
        assert_eq!(spectral.rest_frequency_unit().get_or_default().unwrap(), "MHz");
        assert_eq!(coords.coordinates().count(), 2);
    }

    #[test]
    fn direction_uses_vector_attributes() {
        let dir = TempDir::new().unwrap();
        let (_file, coords) = coordinates(&dir);
        let c = coords.typed(0, CoordinateType::Direction);
        c.create().unwrap();
        let Coordinate::Direction(d) = coords.coordinate(0) else {
            panic!("expected a direction coordinate");
        };
        d.reference_value().set(vec![1.0, 2.0]).unwrap();
        assert_eq!(d.reference_value().get().unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn unknown_type_is_generic() {
        let dir = TempDir::new().unwrap();
        let (_file, coords) = coordinates(&dir);
        coords
            .coordinate_types()
            .set(vec!["Tabular".into()])
            .unwrap();
        coords.group().child(NodeKind::Coordinate, 0).create().unwrap();
        let c = coords.coordinate(0);
        assert!(matches!(c, Coordinate::Generic(_)));
        assert_eq!(c.coordinate_type(), None);
        assert!(matches!(coords.coordinate(5), Coordinate::Generic(_)));
    }

    #[test]
    fn parse_coordinate_types() {
        assert_eq!(
            CoordinateType::from_name("Polarization"),
            Some(CoordinateType::Polarization)
        );
        assert_eq!(CoordinateType::from_name("time"), None);
        for ty in [CoordinateType::Time, CoordinateType::Direction] {
            assert_eq!(CoordinateType::from_name(ty.as_str()), Some(ty));
        }
    }
}
