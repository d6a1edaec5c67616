//! Typed views of the LOFAR file formats.
//!
//! Every view is a thin wrapper around a [`Group`](crate::Group) or
//! [`Dataset`](crate::Dataset) of the matching [`NodeKind`](crate::NodeKind);
//! its accessors only name attributes, the schema does the rest.

/// Generate attribute accessor methods.
///
/// `via root` makes each accessor call `self.root()` for the node whose
/// attribute it returns.
macro_rules! attributes {
    ($vis:vis via $node:ident {
        $( $(#[$meta:meta])* $method:ident: $ty:ty = $name:literal; )*
    }) => {
        $(
            $(#[$meta])*
            $vis fn $method(&self) -> $crate::attribute::Attribute<$ty> {
                self.$node().attribute($name)
            }
        )*
    };
}

/// `From<Node>`, `Deref<Target = Group>` and a `group()` getter for views
/// wrapping a `group` field.
macro_rules! group_view {
    ($($view:ident),* $(,)?) => {
        $(
            impl $view {
                pub fn group(&self) -> &$crate::node::Group {
                    &self.group
                }
            }

            impl From<$crate::node::Node> for $view {
                fn from(node: $crate::node::Node) -> Self {
                    Self {
                        group: $crate::node::Group::from(node),
                    }
                }
            }

            impl std::ops::Deref for $view {
                type Target = $crate::node::Group;

                fn deref(&self) -> &$crate::node::Group {
                    &self.group
                }
            }
        )*
    };
}

pub mod bf;
pub mod cla;
pub mod coordinates;
pub mod lost_frames;
pub mod station_names;
pub mod tbb;

pub use bf::{Beam, BfFile, ProcessHistory, Stokes, SubArrayPointing, SysLog};
pub use cla::{detect_file_type, open_any, CommonAttributes, FileType, LofarFile};
pub use coordinates::{
    Coordinate, CoordinateAttributes, CoordinateType, CoordinatesGroup, DirectionCoordinate,
    GenericCoordinate, NumericalAttributes, PolarizationCoordinate, SpectralCoordinate,
    TimeCoordinate,
};
pub use lost_frames::{lost_frames, scan_lost_frames, DipoleFrames, LostFrameReport};
pub use station_names::{station_id_to_name, station_name_to_id};
pub use tbb::{Dipole, Station, TbbFile, Trigger};
