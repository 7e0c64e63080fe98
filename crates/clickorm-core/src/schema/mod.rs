//! Table schema descriptors.
//!
//! A [`TableSchema`] names a table, lists its columns in declaration order
//! and carries the optional ClickHouse DDL directives (engine, partitioning,
//! keys, TTL, indexes, settings and comment). Schemas are plain data: they
//! can be built in code with [`TableSchema::builder`], converted from
//! `DESCRIBE TABLE` rows with [`TableSchema::from_description`], or loaded
//! from JSON through serde.

mod registry;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub use registry::SchemaRegistry;

use crate::builder::Column;
use crate::ddl::{IndexDef, SettingValue};
use crate::types::{parse_type, ColumnType, ParsedType};

/// Engine used when a schema does not name one.
pub const DEFAULT_ENGINE: &str = "MergeTree";

fn default_engine() -> String {
    String::from(DEFAULT_ENGINE)
}

/// One column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Column type.
    #[serde(rename = "type", default)]
    pub column_type: ColumnType,
    /// Whether the column is part of the primary key.
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    pub primary_key: bool,
}

impl ColumnDef {
    /// Creates a non-key column.
    #[must_use]
    pub fn new(name: &str, column_type: ColumnType) -> Self {
        Self {
            name: String::from(name),
            column_type,
            primary_key: false,
        }
    }

    /// Marks the column as part of the primary key.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }
}

/// Description of a ClickHouse table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) columns: Vec<ColumnDef>,
    #[serde(default = "default_engine")]
    pub(crate) engine: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) partition_by: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) primary_key: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) order_by: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) ttl: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) indexes: Vec<IndexDef>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub(crate) settings: BTreeMap<String, SettingValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) comment: Option<String>,
}

impl TableSchema {
    /// Starts building a schema for `name` (optionally `db.table`).
    #[must_use]
    pub fn builder(name: &str) -> TableSchemaBuilder {
        TableSchemaBuilder::new(name)
    }

    /// Builds a schema from `DESCRIBE TABLE` style `(name, type)` rows.
    ///
    /// Type text that cannot be understood degrades to `String` and is
    /// reported through a `warn` event.
    pub fn from_description<I, N, T>(name: &str, rows: I) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        N: AsRef<str>,
        T: AsRef<str>,
    {
        let mut builder = Self::builder(name);
        for (column, type_text) in rows {
            let column = column.as_ref();
            let column_type = match parse_type(type_text.as_ref()) {
                ParsedType::Recognized(t) => t,
                ParsedType::Unrecognized { raw, fallback } => {
                    warn!(table = name, column, %raw, %fallback, "unrecognized column type");
                    fallback
                }
            };
            builder = builder.column(column, column_type);
        }
        builder.build()
    }

    /// Returns the table name as given.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Returns the column names in declaration order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns a column reference qualified with this table's name.
    #[must_use]
    pub fn col(&self, name: &str) -> Column {
        Column::qualified(&self.name, name)
    }

    /// Returns the table engine.
    #[must_use]
    pub fn engine(&self) -> &str {
        &self.engine
    }

    /// Returns the PARTITION BY expression.
    #[must_use]
    pub fn partition_by(&self) -> Option<&str> {
        self.partition_by.as_deref()
    }

    /// Returns the explicit PRIMARY KEY columns.
    #[must_use]
    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    /// Returns the explicit ORDER BY columns.
    #[must_use]
    pub fn order_by(&self) -> &[String] {
        &self.order_by
    }

    /// Returns the TTL expression.
    #[must_use]
    pub fn ttl(&self) -> Option<&str> {
        self.ttl.as_deref()
    }

    /// Returns the secondary indexes.
    #[must_use]
    pub fn indexes(&self) -> &[IndexDef] {
        &self.indexes
    }

    /// Returns the engine settings, sorted by key.
    #[must_use]
    pub const fn settings(&self) -> &BTreeMap<String, SettingValue> {
        &self.settings
    }

    /// Returns the table comment.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns the ordering key, falling back to a heuristic when none is
    /// configured: a column named `id` (any case), else the first column.
    /// Primary-key flags on columns do not take part.
    #[must_use]
    pub fn ordering_key(&self) -> Vec<String> {
        if !self.order_by.is_empty() {
            return self.order_by.clone();
        }
        default_ordering_key(&self.columns)
    }
}

/// Picks an ordering key for columns without an explicit one.
fn default_ordering_key(columns: &[ColumnDef]) -> Vec<String> {
    columns
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case("id"))
        .or_else(|| columns.first())
        .map(|c| vec![c.name.clone()])
        .unwrap_or_default()
}

/// Builder for [`TableSchema`].
///
/// # Example
///
/// ```rust
/// use clickorm_core::schema::TableSchema;
/// use clickorm_core::types::ColumnType;
///
/// let events = TableSchema::builder("analytics.events")
///     .column("ts", ColumnType::DateTime64(3))
///     .column("id", ColumnType::UInt64)
///     .partition_by("toYYYYMM(ts)")
///     .ttl("ts + INTERVAL 30 DAY")
///     .build();
///
/// assert_eq!(events.ordering_key(), vec![String::from("id")]);
/// assert_eq!(events.engine(), "MergeTree");
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct TableSchemaBuilder {
    schema: TableSchema,
}

impl TableSchemaBuilder {
    fn new(name: &str) -> Self {
        Self {
            schema: TableSchema {
                name: String::from(name),
                columns: Vec::new(),
                engine: default_engine(),
                partition_by: None,
                primary_key: Vec::new(),
                order_by: Vec::new(),
                ttl: None,
                indexes: Vec::new(),
                settings: BTreeMap::new(),
                comment: None,
            },
        }
    }

    /// Adds a column.
    pub fn column(mut self, name: &str, column_type: impl Into<ColumnType>) -> Self {
        self.schema
            .columns
            .push(ColumnDef::new(name, column_type.into()));
        self
    }

    /// Adds a column flagged as part of the primary key.
    pub fn primary_key_column(mut self, name: &str, column_type: impl Into<ColumnType>) -> Self {
        self.schema
            .columns
            .push(ColumnDef::new(name, column_type.into()).primary_key());
        self
    }

    /// Sets the table engine.
    pub fn engine(mut self, engine: &str) -> Self {
        self.schema.engine = String::from(engine);
        self
    }

    /// Sets the PARTITION BY expression.
    pub fn partition_by(mut self, expr: &str) -> Self {
        self.schema.partition_by = Some(String::from(expr));
        self
    }

    /// Sets the explicit PRIMARY KEY columns.
    pub fn primary_key(mut self, columns: &[&str]) -> Self {
        self.schema.primary_key = columns.iter().map(|c| String::from(*c)).collect();
        self
    }

    /// Sets the explicit ORDER BY columns.
    pub fn order_by(mut self, columns: &[&str]) -> Self {
        self.schema.order_by = columns.iter().map(|c| String::from(*c)).collect();
        self
    }

    /// Sets the TTL expression.
    pub fn ttl(mut self, expr: &str) -> Self {
        self.schema.ttl = Some(String::from(expr));
        self
    }

    /// Adds a secondary index.
    pub fn index(mut self, index: IndexDef) -> Self {
        self.schema.indexes.push(index);
        self
    }

    /// Sets an engine setting.
    pub fn setting(mut self, key: &str, value: impl Into<SettingValue>) -> Self {
        self.schema.settings.insert(String::from(key), value.into());
        self
    }

    /// Sets the table comment.
    pub fn comment(mut self, comment: &str) -> Self {
        self.schema.comment = Some(String::from(comment));
        self
    }

    /// Finishes the schema.
    pub fn build(self) -> TableSchema {
        self.schema
    }
}
