//! Engine settings and secondary index definitions.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::dialect::{quote_ident, quote_string};

/// Value of a table engine setting.
///
/// Booleans render as `1`/`0`, numbers bare and text as an escaped string
/// literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// Boolean flag.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    Text(String),
}

impl SettingValue {
    /// Returns false for floats that are NaN or infinite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Float(x) => x.is_finite(),
            _ => true,
        }
    }

    /// Renders the value as it appears after `key=`.
    #[must_use]
    pub fn to_sql(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", u8::from(*b)),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(&quote_string(s)),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for SettingValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for SettingValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Text(String::from(value))
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A data-skipping index declared inside CREATE TABLE.
///
/// The name is quoted. The expression and index type are raw SQL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDef {
    /// Index name.
    pub name: String,
    /// Indexed expression.
    pub expr: String,
    /// Index type, e.g. `minmax` or `bloom_filter(0.01)`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Granularity, omitted from the SQL when unset or zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granularity: Option<u32>,
}

impl IndexDef {
    /// Creates an index without granularity.
    #[must_use]
    pub fn new(name: &str, expr: &str, kind: &str) -> Self {
        Self {
            name: String::from(name),
            expr: String::from(expr),
            kind: String::from(kind),
            granularity: None,
        }
    }

    /// Sets the granularity.
    #[must_use]
    pub const fn granularity(mut self, granularity: u32) -> Self {
        self.granularity = Some(granularity);
        self
    }

    /// Renders the index clause.
    #[must_use]
    pub fn to_sql(&self) -> String {
        let mut sql = format!(
            "INDEX {} {} TYPE {}",
            quote_ident(&self.name),
            self.expr,
            self.kind
        );
        if let Some(g) = self.granularity.filter(|g| *g > 0) {
            sql.push_str(&format!(" GRANULARITY {g}"));
        }
        sql
    }
}
