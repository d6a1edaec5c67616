//! Element and attribute type representations.

use std::fmt;

use num_complex::Complex64;

/// Numeric element type of a dataset.
///
/// Complex types are stored as a two-wide record of their real component
/// type, real part first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    C32,
    C64,
}

impl DType {
    /// Size of one element in bytes.
    pub fn size(self) -> usize {
        match self {
            DType::I8 | DType::U8 => 1,
            DType::I16 | DType::U16 => 2,
            DType::I32 | DType::U32 | DType::F32 => 4,
            DType::I64 | DType::U64 | DType::F64 | DType::C32 => 8,
            DType::C64 => 16,
        }
    }

    /// Size of one scalar component; the unit of byte swapping.
    pub fn component_size(self) -> usize {
        match self {
            DType::C32 => 4,
            DType::C64 => 8,
            other => other.size(),
        }
    }

    pub fn is_complex(self) -> bool {
        matches!(self, DType::C32 | DType::C64)
    }

    pub(crate) fn code(self) -> u8 {
        match self {
            DType::I8 => 0,
            DType::I16 => 1,
            DType::I32 => 2,
            DType::I64 => 3,
            DType::U8 => 4,
            DType::U16 => 5,
            DType::U32 => 6,
            DType::U64 => 7,
            DType::F32 => 8,
            DType::F64 => 9,
            DType::C32 => 10,
            DType::C64 => 11,
        }
    }

    pub(crate) fn from_code(code: u8) -> Option<DType> {
        Some(match code {
            0 => DType::I8,
            1 => DType::I16,
            2 => DType::I32,
            3 => DType::I64,
            4 => DType::U8,
            5 => DType::U16,
            6 => DType::U32,
            7 => DType::U64,
            8 => DType::F32,
            9 => DType::F64,
            10 => DType::C32,
            11 => DType::C64,
            _ => return None,
        })
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DType::I8 => "int8",
            DType::I16 => "int16",
            DType::I32 => "int32",
            DType::I64 => "int64",
            DType::U8 => "uint8",
            DType::U16 => "uint16",
            DType::U32 => "uint32",
            DType::U64 => "uint64",
            DType::F32 => "float32",
            DType::F64 => "float64",
            DType::C32 => "complex64",
            DType::C64 => "complex128",
        };
        f.write_str(s)
    }
}

/// On-disk byte order of dataset elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
}

impl ByteOrder {
    pub fn native() -> ByteOrder {
        if cfg!(target_endian = "big") {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        }
    }
}

/// A half-open `[begin, end)` index range, stored as a two-field tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    pub begin: u64,
    pub end: u64,
}

impl Range {
    pub fn new(begin: u64, end: u64) -> Self {
        Self { begin, end }
    }

    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.begin)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.begin
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{})", self.begin, self.end)
    }
}

/// Type class of a stored attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrType {
    Bool,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float64,
    String,
    Int32Array,
    UInt32Array,
    Float64Array,
    StringArray,
    Complex64Array,
    RangeArray,
}

impl AttrType {
    pub(crate) fn code(self) -> u8 {
        match self {
            AttrType::Bool => 1,
            AttrType::Int32 => 2,
            AttrType::UInt32 => 3,
            AttrType::Int64 => 4,
            AttrType::UInt64 => 5,
            AttrType::Float64 => 6,
            AttrType::String => 7,
            AttrType::Int32Array => 8,
            AttrType::UInt32Array => 9,
            AttrType::Float64Array => 10,
            AttrType::StringArray => 11,
            AttrType::Complex64Array => 12,
            AttrType::RangeArray => 13,
        }
    }

    pub(crate) fn from_code(code: u8) -> Option<AttrType> {
        Some(match code {
            1 => AttrType::Bool,
            2 => AttrType::Int32,
            3 => AttrType::UInt32,
            4 => AttrType::Int64,
            5 => AttrType::UInt64,
            6 => AttrType::Float64,
            7 => AttrType::String,
            8 => AttrType::Int32Array,
            9 => AttrType::UInt32Array,
            10 => AttrType::Float64Array,
            11 => AttrType::StringArray,
            12 => AttrType::Complex64Array,
            13 => AttrType::RangeArray,
            _ => return None,
        })
    }

    /// The zero value of this type: `false`, `0`, empty string or empty array.
    pub fn zero_value(self) -> AttrValue {
        match self {
            AttrType::Bool => AttrValue::Bool(false),
            AttrType::Int32 => AttrValue::Int32(0),
            AttrType::UInt32 => AttrValue::UInt32(0),
            AttrType::Int64 => AttrValue::Int64(0),
            AttrType::UInt64 => AttrValue::UInt64(0),
            AttrType::Float64 => AttrValue::Float64(0.0),
            AttrType::String => AttrValue::String(String::new()),
            AttrType::Int32Array => AttrValue::Int32Array(Vec::new()),
            AttrType::UInt32Array => AttrValue::UInt32Array(Vec::new()),
            AttrType::Float64Array => AttrValue::Float64Array(Vec::new()),
            AttrType::StringArray => AttrValue::StringArray(Vec::new()),
            AttrType::Complex64Array => AttrValue::Complex64Array(Vec::new()),
            AttrType::RangeArray => AttrValue::RangeArray(Vec::new()),
        }
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AttrType::Bool => "bool",
            AttrType::Int32 => "int32",
            AttrType::UInt32 => "uint32",
            AttrType::Int64 => "int64",
            AttrType::UInt64 => "uint64",
            AttrType::Float64 => "float64",
            AttrType::String => "string",
            AttrType::Int32Array => "int32[]",
            AttrType::UInt32Array => "uint32[]",
            AttrType::Float64Array => "float64[]",
            AttrType::StringArray => "string[]",
            AttrType::Complex64Array => "complex128[]",
            AttrType::RangeArray => "range[]",
        };
        f.write_str(s)
    }
}

/// A stored attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float64(f64),
    String(String),
    Int32Array(Vec<i32>),
    UInt32Array(Vec<u32>),
    Float64Array(Vec<f64>),
    StringArray(Vec<String>),
    Complex64Array(Vec<Complex64>),
    RangeArray(Vec<Range>),
}

impl AttrValue {
    pub fn attr_type(&self) -> AttrType {
        match self {
            AttrValue::Bool(_) => AttrType::Bool,
            AttrValue::Int32(_) => AttrType::Int32,
            AttrValue::UInt32(_) => AttrType::UInt32,
            AttrValue::Int64(_) => AttrType::Int64,
            AttrValue::UInt64(_) => AttrType::UInt64,
            AttrValue::Float64(_) => AttrType::Float64,
            AttrValue::String(_) => AttrType::String,
            AttrValue::Int32Array(_) => AttrType::Int32Array,
            AttrValue::UInt32Array(_) => AttrType::UInt32Array,
            AttrValue::Float64Array(_) => AttrType::Float64Array,
            AttrValue::StringArray(_) => AttrType::StringArray,
            AttrValue::Complex64Array(_) => AttrType::Complex64Array,
            AttrValue::RangeArray(_) => AttrType::RangeArray,
        }
    }

    /// Parse a textual literal as a value of type `ty`.
    ///
    /// Arrays accept comma-separated items, optionally in brackets.
    /// Complex and range arrays have no literal form.
    pub fn parse(ty: AttrType, literal: &str) -> Option<AttrValue> {
        let s = literal.trim();
        Some(match ty {
            AttrType::Bool => match s.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => AttrValue::Bool(true),
                "false" | "0" | "no" => AttrValue::Bool(false),
                _ => return None,
            },
            AttrType::Int32 => AttrValue::Int32(s.parse().ok()?),
            AttrType::UInt32 => AttrValue::UInt32(s.parse().ok()?),
            AttrType::Int64 => AttrValue::Int64(s.parse().ok()?),
            AttrType::UInt64 => AttrValue::UInt64(s.parse().ok()?),
            AttrType::Float64 => AttrValue::Float64(s.parse().ok()?),
            AttrType::String => AttrValue::String(literal.to_string()),
            AttrType::Int32Array => AttrValue::Int32Array(parse_list(s)?),
            AttrType::UInt32Array => AttrValue::UInt32Array(parse_list(s)?),
            AttrType::Float64Array => AttrValue::Float64Array(parse_list(s)?),
            AttrType::StringArray => AttrValue::StringArray(
                list_items(s).map(|item| item.to_string()).collect(),
            ),
            AttrType::Complex64Array | AttrType::RangeArray => return None,
        })
    }
}

fn list_items(s: &str) -> impl Iterator<Item = &str> {
    let inner = s
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(s)
        .trim();
    inner
        .split(',')
        .map(str::trim)
        .filter(move |_| !inner.is_empty())
}

fn parse_list<T: std::str::FromStr>(s: &str) -> Option<Vec<T>> {
    list_items(s).map(|item| item.parse().ok()).collect()
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    write!(f, "[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "]")
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(v) => write!(f, "{v}"),
            AttrValue::Int32(v) => write!(f, "{v}"),
            AttrValue::UInt32(v) => write!(f, "{v}"),
            AttrValue::Int64(v) => write!(f, "{v}"),
            AttrValue::UInt64(v) => write!(f, "{v}"),
            AttrValue::Float64(v) => write!(f, "{v}"),
            AttrValue::String(v) => f.write_str(v),
            AttrValue::Int32Array(v) => write_list(f, v),
            AttrValue::UInt32Array(v) => write_list(f, v),
            AttrValue::Float64Array(v) => write_list(f, v),
            AttrValue::StringArray(v) => write_list(f, v),
            AttrValue::Complex64Array(v) => write_list(f, v),
            AttrValue::RangeArray(v) => write_list(f, v),
        }
    }
}
