//! Recursive descent parser for type declarations.
//!
//! The grammar is small:
//!
//! ```text
//! type    := wrapper "(" type ")" | param | keyword
//! wrapper := Nullable | Array | LowCardinality
//! param   := Decimal "(" uint "," uint ")"
//!          | FixedString "(" uint ")"
//!          | DateTime64 "(" uint ")"
//! keyword := Int8 | Int16 | ... | DateTime
//! ```
//!
//! Keywords are case-insensitive and whitespace is tolerated around every
//! token. A wrapper's argument list always extends to the final `)`.
//! Wrappers are unwrapped iteratively, so nesting depth is unbounded. Input outside the grammar is never an error:
//! it degrades to `String`.

use super::ColumnType;

/// Outcome of parsing a type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedType {
    /// Every part of the declaration was understood.
    Recognized(ColumnType),
    /// Some part of the declaration was not understood.
    Unrecognized {
        /// The declaration as given.
        raw: String,
        /// The type used in its place: `String` substituted for each
        /// unknown part, keeping any wrappers around it.
        fallback: ColumnType,
    },
}

impl ParsedType {
    /// Collapses the outcome to a usable type.
    #[must_use]
    pub fn into_type(self) -> ColumnType {
        match self {
            Self::Recognized(t) | Self::Unrecognized { fallback: t, .. } => t,
        }
    }

    /// Returns true if the whole declaration was understood.
    #[must_use]
    pub const fn is_recognized(&self) -> bool {
        matches!(self, Self::Recognized(_))
    }
}

/// Parses a type declaration, reporting whether a fallback was used.
///
/// ```rust
/// use clickorm_core::types::{parse_type, ColumnType, ParsedType};
///
/// assert_eq!(
///     parse_type("LowCardinality(String)"),
///     ParsedType::Recognized(ColumnType::String.low_cardinality()),
/// );
/// assert!(!parse_type("Enum8('a' = 1)").is_recognized());
/// ```
#[must_use]
pub fn parse_type(text: &str) -> ParsedType {
    let mut recognized = true;
    let t = parse_decl(text, &mut recognized);
    if recognized {
        ParsedType::Recognized(t)
    } else {
        ParsedType::Unrecognized {
            raw: String::from(text),
            fallback: t,
        }
    }
}

fn parse_decl(text: &str, recognized: &mut bool) -> ColumnType {
    // Wrappers are peeled in a loop so nesting depth is not bounded by the
    // call stack.
    let mut wrappers: Vec<fn(ColumnType) -> ColumnType> = Vec::new();
    let mut s = text.trim();
    while let Some((name, args)) = split_call(s) {
        let wrap: fn(ColumnType) -> ColumnType = match name.to_ascii_lowercase().as_str() {
            "nullable" => ColumnType::nullable,
            "array" => ColumnType::array,
            "lowcardinality" => ColumnType::low_cardinality,
            _ => break,
        };
        wrappers.push(wrap);
        s = args.trim();
    }

    let leaf = parse_leaf(s).unwrap_or_else(|| {
        *recognized = false;
        ColumnType::String
    });
    wrappers.into_iter().rev().fold(leaf, |t, wrap| wrap(t))
}

fn parse_leaf(s: &str) -> Option<ColumnType> {
    if let Some((name, args)) = split_call(s) {
        let parsed = match name.to_ascii_lowercase().as_str() {
            "decimal" => uint_args::<u8, 2>(args)
                .map(|[precision, scale]| ColumnType::Decimal { precision, scale }),
            "fixedstring" => uint_args::<u32, 1>(args).map(|[n]| ColumnType::FixedString(n)),
            "datetime64" => {
                uint_args::<u8, 1>(args).map(|[precision]| ColumnType::DateTime64(precision))
            }
            _ => None,
        };
        if parsed.is_some() {
            return parsed;
        }
    }
    s.split_whitespace().next().and_then(keyword)
}

/// Splits `name(args)` into its name and the text between the first `(`
/// and the final `)`.
fn split_call(s: &str) -> Option<(&str, &str)> {
    let open = s.find('(')?;
    let body = s.strip_suffix(')')?;
    if body.len() <= open {
        return None;
    }
    let name = s[..open].trim_end();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some((name, &body[open + 1..]))
}

/// Parses exactly `N` comma-separated unsigned integers.
fn uint_args<T: core::str::FromStr, const N: usize>(args: &str) -> Option<[T; N]> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != N {
        return None;
    }
    let mut values = Vec::with_capacity(N);
    for part in parts {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        values.push(part.parse::<T>().ok()?);
    }
    values.try_into().ok()
}

fn keyword(word: &str) -> Option<ColumnType> {
    let t = match word.to_ascii_lowercase().as_str() {
        "int8" => ColumnType::Int8,
        "int16" => ColumnType::Int16,
        "int32" => ColumnType::Int32,
        "int64" => ColumnType::Int64,
        "uint8" => ColumnType::UInt8,
        "uint16" => ColumnType::UInt16,
        "uint32" => ColumnType::UInt32,
        "uint64" => ColumnType::UInt64,
        "float32" => ColumnType::Float32,
        "float64" => ColumnType::Float64,
        "string" => ColumnType::String,
        "uuid" => ColumnType::Uuid,
        "bool" | "boolean" => ColumnType::Bool,
        "date" => ColumnType::Date,
        "date32" => ColumnType::Date32,
        "datetime" => ColumnType::DateTime,
        _ => return None,
    };
    Some(t)
}
