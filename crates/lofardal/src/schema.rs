//! Versioned schema of the LOFAR attribute tables.
//!
//! Every recognized attribute has one [`SchemaEntry`] per node kind it may
//! appear on. Kinds inherit from one another (a beam-formed root is also a
//! common-attributes root, a time coordinate is also a numerical
//! coordinate), so lookups walk [`NodeKind::lineage`] most-specific first.
//!
//! The tables are static data; supporting a new format version means adding
//! rows, not code.

use std::fmt;

use lofardal_store::{AttrType, AttrValue};

use crate::version::Version;

mod tables;

pub use tables::ENTRIES;

/// Kind of node an attribute belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Root of any LOFAR file: the common LOFAR attributes.
    Root,
    /// Root of a beam-formed file.
    BfRoot,
    /// Root of a transient buffer board file.
    TbbRoot,
    SysLog,
    SubArrayPointing,
    ProcessHistory,
    Beam,
    Stokes,
    Coordinates,
    Coordinate,
    NumericalCoordinate,
    DirectionCoordinate,
    TimeCoordinate,
    SpectralCoordinate,
    StringCoordinate,
    PolarizationCoordinate,
    Trigger,
    Station,
    Dipole,
    /// A node the schema knows nothing about.
    Generic,
}

impl NodeKind {
    /// This kind followed by the kinds it inherits attributes from.
    pub fn lineage(self) -> &'static [NodeKind] {
        use NodeKind::*;
        match self {
            Root => &[Root],
            BfRoot => &[BfRoot, Root],
            TbbRoot => &[TbbRoot, Root],
            SysLog => &[SysLog],
            SubArrayPointing => &[SubArrayPointing],
            ProcessHistory => &[ProcessHistory],
            Beam => &[Beam],
            Stokes => &[Stokes],
            Coordinates => &[Coordinates],
            Coordinate => &[Coordinate],
            NumericalCoordinate => &[NumericalCoordinate, Coordinate],
            DirectionCoordinate => &[DirectionCoordinate, Coordinate],
            TimeCoordinate => &[TimeCoordinate, NumericalCoordinate, Coordinate],
            SpectralCoordinate => &[SpectralCoordinate, NumericalCoordinate, Coordinate],
            StringCoordinate => &[StringCoordinate, Coordinate],
            PolarizationCoordinate => &[PolarizationCoordinate, StringCoordinate, Coordinate],
            Trigger => &[Trigger],
            Station => &[Station],
            Dipole => &[Dipole],
            Generic => &[Generic],
        }
    }

    /// True for kinds stored as datasets rather than groups.
    pub fn is_dataset(self) -> bool {
        matches!(self, NodeKind::Stokes | NodeKind::Dipole)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeKind::Root => "File",
            NodeKind::BfRoot => "BF File",
            NodeKind::TbbRoot => "TBB File",
            NodeKind::SysLog => "SysLog",
            NodeKind::SubArrayPointing => "SubArrayPointing",
            NodeKind::ProcessHistory => "ProcessHistory",
            NodeKind::Beam => "Beam",
            NodeKind::Stokes => "Stokes",
            NodeKind::Coordinates => "Coordinates",
            NodeKind::Coordinate => "Coordinate",
            NodeKind::NumericalCoordinate => "NumericalCoordinate",
            NodeKind::DirectionCoordinate => "DirectionCoordinate",
            NodeKind::TimeCoordinate => "TimeCoordinate",
            NodeKind::SpectralCoordinate => "SpectralCoordinate",
            NodeKind::StringCoordinate => "StringCoordinate",
            NodeKind::PolarizationCoordinate => "PolarizationCoordinate",
            NodeKind::Trigger => "Trigger",
            NodeKind::Station => "Station",
            NodeKind::Dipole => "Dipole",
            NodeKind::Generic => "Node",
        };
        f.write_str(s)
    }
}

/// A default value in the static tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Bool(bool),
    UInt32(u32),
    Float64(f64),
    Str(&'static str),
}

impl DefaultValue {
    pub fn to_value(self) -> AttrValue {
        match self {
            DefaultValue::Bool(v) => AttrValue::Bool(v),
            DefaultValue::UInt32(v) => AttrValue::UInt32(v),
            DefaultValue::Float64(v) => AttrValue::Float64(v),
            DefaultValue::Str(v) => AttrValue::String(v.to_string()),
        }
    }
}

/// One attribute definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchemaEntry {
    /// On-disk attribute name, e.g. `POINT_RA`.
    pub name: &'static str,
    /// Accessor-style name, e.g. `pointRA`.
    pub alias: &'static str,
    pub ty: AttrType,
    pub kind: NodeKind,
    pub default: Option<DefaultValue>,
    /// First format version carrying this attribute.
    pub since: Version,
}

impl SchemaEntry {
    pub const fn new(kind: NodeKind, name: &'static str, alias: &'static str, ty: AttrType) -> Self {
        Self {
            name,
            alias,
            ty,
            kind,
            default: None,
            since: Version::new(0, 0, 0),
        }
    }

    pub const fn with_default(self, default: DefaultValue) -> Self {
        Self {
            default: Some(default),
            ..self
        }
    }

    pub const fn since(self, major: u32, minor: u32, release: u32) -> Self {
        Self {
            since: Version::new(major, minor, release),
            ..self
        }
    }

    pub fn default_value(&self) -> Option<AttrValue> {
        self.default.map(DefaultValue::to_value)
    }
}

/// The definition of `name` as seen from a node of `kind`.
pub fn definition_for(kind: NodeKind, name: &str) -> Option<&'static SchemaEntry> {
    kind.lineage()
        .iter()
        .find_map(|k| ENTRIES.iter().find(|e| e.kind == *k && e.name == name))
}

/// The definition whose accessor name matches `alias`, ignoring case.
///
/// Canonical names are accepted as well.
pub fn definition_for_alias(kind: NodeKind, alias: &str) -> Option<&'static SchemaEntry> {
    kind.lineage().iter().find_map(|k| {
        ENTRIES.iter().find(|e| {
            e.kind == *k
                && (e.alias.eq_ignore_ascii_case(alias) || e.name.eq_ignore_ascii_case(alias))
        })
    })
}

/// True iff `name` is defined for `kind` at format `version`.
pub fn is_supported(kind: NodeKind, name: &str, version: Version) -> bool {
    definition_for(kind, name).map_or(false, |e| e.since <= version)
}

pub fn default_value(kind: NodeKind, name: &str) -> Option<AttrValue> {
    definition_for(kind, name).and_then(SchemaEntry::default_value)
}

/// All entries visible on `kind`, most specific kind first, shadowed names removed.
pub fn entries_for(kind: NodeKind) -> impl Iterator<Item = &'static SchemaEntry> {
    let lineage = kind.lineage();
    lineage.iter().enumerate().flat_map(move |(depth, k)| {
        ENTRIES.iter().filter(move |e| {
            e.kind == *k
                && !lineage[..depth]
                    .iter()
                    .any(|closer| ENTRIES.iter().any(|o| o.kind == *closer && o.name == e.name))
        })
    })
}

/// Turn an accessor-style name into an on-disk name: `pointRA` → `POINT_RA`.
///
/// Used for names the schema does not know.
pub fn to_canonical_name(alias: &str) -> String {
    let chars: Vec<char> = alias.chars().collect();
    let mut out = String::with_capacity(alias.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).map_or(false, |n| n.is_ascii_lowercase());
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_lower)
            {
                out.push('_');
            }
        }
        out.push(c.to_ascii_uppercase());
    }
    out
}
