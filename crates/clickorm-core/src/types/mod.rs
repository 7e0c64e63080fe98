//! Column type model.
//!
//! [`ColumnType`] describes how a column is stored. Wrapper variants
//! (`Nullable`, `Array`, `LowCardinality`) nest to any depth. Rendering
//! produces the canonical declaration and [`ColumnType::parse`] reads it
//! back, so `parse(render(t)) == t` for every value.
//!
//! ```rust
//! use clickorm_core::types::ColumnType;
//!
//! let t = ColumnType::Decimal { precision: 10, scale: 2 }.array().nullable();
//! assert_eq!(t.to_string(), "Nullable(Array(Decimal(10,2)))");
//! assert_eq!(ColumnType::parse("nullable(array(decimal(10, 2)))"), t);
//! ```

mod parser;

use core::convert::Infallible;
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

pub use parser::{parse_type, ParsedType};

/// Column types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnType {
    // Signed integers
    /// 8-bit signed integer.
    Int8,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,

    // Unsigned integers
    /// 8-bit unsigned integer.
    UInt8,
    /// 16-bit unsigned integer.
    UInt16,
    /// 32-bit unsigned integer.
    UInt32,
    /// 64-bit unsigned integer.
    UInt64,

    // Floating point
    /// 4-byte float.
    Float32,
    /// 8-byte float.
    Float64,

    // Text
    /// UTF-8 text of any length. Also the fallback for unknown types.
    #[default]
    String,
    /// Text of exactly `n` bytes.
    FixedString(u32),

    /// Universally unique identifier.
    Uuid,
    /// Boolean.
    Bool,

    // Date/time
    /// Calendar date.
    Date,
    /// Calendar date with an extended range.
    Date32,
    /// Timestamp with one-second resolution.
    DateTime,
    /// Timestamp with `10^-precision` second resolution.
    DateTime64(u8),

    /// Fixed-point decimal.
    Decimal {
        /// Total number of digits.
        precision: u8,
        /// Number of digits after the decimal point.
        scale: u8,
    },

    // Wrappers
    /// Value that may be NULL.
    Nullable(Box<ColumnType>),
    /// Array of values.
    Array(Box<ColumnType>),
    /// Dictionary-encoded value.
    LowCardinality(Box<ColumnType>),
}

impl ColumnType {
    /// Parses a type declaration, falling back to [`ColumnType::String`]
    /// for anything unrecognized.
    ///
    /// Use [`parse_type`] to tell the fallback apart from a real `String`.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        parse_type(text).into_type()
    }

    /// Renders the canonical type declaration.
    #[must_use]
    pub fn to_sql(&self) -> String {
        self.to_string()
    }

    /// Wraps this type in `Nullable(..)`.
    #[must_use]
    pub fn nullable(self) -> Self {
        Self::Nullable(Box::new(self))
    }

    /// Wraps this type in `Array(..)`.
    #[must_use]
    pub fn array(self) -> Self {
        Self::Array(Box::new(self))
    }

    /// Wraps this type in `LowCardinality(..)`.
    #[must_use]
    pub fn low_cardinality(self) -> Self {
        Self::LowCardinality(Box::new(self))
    }

    /// Returns the wrapped type of a wrapper variant.
    #[must_use]
    pub fn inner(&self) -> Option<&Self> {
        match self {
            Self::Nullable(inner) | Self::Array(inner) | Self::LowCardinality(inner) => {
                Some(inner)
            }
            _ => None,
        }
    }

    /// Returns true for `Nullable`, `Array` and `LowCardinality`.
    #[must_use]
    pub fn is_wrapper(&self) -> bool {
        self.inner().is_some()
    }

    /// Returns true if the outermost non-dictionary layer is `Nullable`.
    ///
    /// `LowCardinality(Nullable(String))` is nullable,
    /// `Array(Nullable(String))` is not.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Nullable(_) => true,
            Self::LowCardinality(inner) => inner.is_nullable(),
            _ => false,
        }
    }

    /// Renders an optional type, treating `None` as `String`.
    #[must_use]
    pub fn render_or_default(column_type: Option<&Self>) -> String {
        column_type.map_or_else(|| Self::String.to_sql(), Self::to_sql)
    }

    fn keyword(&self) -> &'static str {
        match self {
            Self::Int8 => "Int8",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::UInt8 => "UInt8",
            Self::UInt16 => "UInt16",
            Self::UInt32 => "UInt32",
            Self::UInt64 => "UInt64",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
            Self::String => "String",
            Self::FixedString(_) => "FixedString",
            Self::Uuid => "UUID",
            Self::Bool => "Bool",
            Self::Date => "Date",
            Self::Date32 => "Date32",
            Self::DateTime => "DateTime",
            Self::DateTime64(_) => "DateTime64",
            Self::Decimal { .. } => "Decimal",
            Self::Nullable(_) => "Nullable",
            Self::Array(_) => "Array",
            Self::LowCardinality(_) => "LowCardinality",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Wrappers are written in a loop, not by recursion.
        let mut leaf = self;
        let mut depth = 0_usize;
        while let Some(inner) = leaf.inner() {
            write!(f, "{}(", leaf.keyword())?;
            leaf = inner;
            depth += 1;
        }

        let keyword = leaf.keyword();
        match leaf {
            Self::FixedString(n) => write!(f, "{keyword}({n})")?,
            Self::DateTime64(precision) => write!(f, "{keyword}({precision})")?,
            Self::Decimal { precision, scale } => write!(f, "{keyword}({precision},{scale})")?,
            _ => f.write_str(keyword)?,
        }
        f.write_str(&")".repeat(depth))
    }
}

impl FromStr for ColumnType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for ColumnType {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for ColumnType {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<ColumnType> for String {
    fn from(t: ColumnType) -> Self {
        t.to_string()
    }
}
