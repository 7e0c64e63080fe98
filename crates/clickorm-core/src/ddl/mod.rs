//! ClickHouse DDL rendering.
//!
//! [`CreateTable`] and [`DropTable`] render complete statements from a
//! [`TableSchema`] or from an explicit column list. Identifiers are quoted,
//! string literals (text settings and the comment) are escaped. Engine,
//! partition, TTL and index expressions are raw SQL and emitted verbatim.

mod settings;

pub use settings::{IndexDef, SettingValue};

use tracing::debug;

use crate::dialect::{quote_ident, quote_string, render_table_name};
use crate::error::{Error, Result};
use crate::schema::{ColumnDef, TableSchema};
use crate::types::ColumnType;

fn ident_list(names: &[String]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| quote_ident(n)).collect();
    quoted.join(", ")
}

/// A CREATE TABLE statement.
///
/// # Example
///
/// ```rust
/// use clickorm_core::ddl::CreateTable;
/// use clickorm_core::types::ColumnType;
///
/// let sql = CreateTable::new("events", [("id", ColumnType::UInt64), ("ts", ColumnType::DateTime64(3))])
///     .build()
///     .unwrap();
///
/// assert_eq!(
///     sql,
///     "CREATE TABLE IF NOT EXISTS \"events\" (\n    \"id\" UInt64,\n    \"ts\" DateTime64(3)\n)\n\
///      ENGINE = MergeTree\nORDER BY (\"id\")"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct CreateTable {
    schema: TableSchema,
    if_not_exists: bool,
}

impl CreateTable {
    /// Creates a statement from an explicit `(column, type)` list.
    ///
    /// Type text given as `&str` is parsed; text outside the type grammar
    /// becomes `String`.
    pub fn new<I, N, T>(name: &str, columns: I) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        N: AsRef<str>,
        T: Into<ColumnType>,
    {
        let schema = columns
            .into_iter()
            .fold(TableSchema::builder(name), |b, (column, t)| {
                b.column(column.as_ref(), t)
            })
            .build();
        Self {
            schema,
            if_not_exists: true,
        }
    }

    /// Creates a statement for a schema, taking over all its directives.
    pub fn from_schema(schema: &TableSchema) -> Self {
        Self {
            schema: schema.clone(),
            if_not_exists: true,
        }
    }

    /// Toggles `IF NOT EXISTS` (on by default).
    pub const fn if_not_exists(mut self, yes: bool) -> Self {
        self.if_not_exists = yes;
        self
    }

    /// Sets the engine clause, e.g. `ReplacingMergeTree(version)`.
    pub fn engine(mut self, engine: &str) -> Self {
        self.schema.engine = String::from(engine);
        self
    }

    /// Sets the PARTITION BY expression.
    pub fn partition_by(mut self, expr: &str) -> Self {
        self.schema.partition_by = Some(String::from(expr));
        self
    }

    /// Sets the PRIMARY KEY columns.
    pub fn primary_key(mut self, columns: &[&str]) -> Self {
        self.schema.primary_key = columns.iter().map(|c| String::from(*c)).collect();
        self
    }

    /// Sets the ORDER BY columns, replacing the default key.
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

    /// Sets an engine setting. Keys are emitted verbatim.
    pub fn setting(mut self, key: &str, value: impl Into<SettingValue>) -> Self {
        self.schema.settings.insert(String::from(key), value.into());
        self
    }

    /// Sets the table comment.
    pub fn comment(mut self, comment: &str) -> Self {
        self.schema.comment = Some(String::from(comment));
        self
    }

    /// Renders the statement.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoColumns`] when the table has no columns and
    /// [`Error::InvalidSetting`] when a float setting is NaN or infinite.
    pub fn build(&self) -> Result<String> {
        let schema = &self.schema;
        if schema.columns.is_empty() {
            return Err(Error::NoColumns {
                table: schema.name.clone(),
            });
        }
        if let Some(key) = schema
            .settings
            .iter()
            .find_map(|(k, v)| (!v.is_finite()).then_some(k))
        {
            return Err(Error::InvalidSetting {
                table: schema.name.clone(),
                key: key.clone(),
            });
        }

        let mut sql = String::from("CREATE TABLE ");
        if self.if_not_exists {
            sql.push_str("IF NOT EXISTS ");
        }
        sql.push_str(&render_table_name(&schema.name));
        sql.push_str(" (\n");

        let mut defs: Vec<String> = schema
            .columns
            .iter()
            .map(|c| format!("    {}", column_definition(c)))
            .collect();
        defs.extend(schema.indexes.iter().map(|ix| format!("    {}", ix.to_sql())));
        sql.push_str(&defs.join(",\n"));
        sql.push_str("\n)");

        sql.push_str("\nENGINE = ");
        sql.push_str(&schema.engine);

        if let Some(partition) = &schema.partition_by {
            sql.push_str("\nPARTITION BY ");
            sql.push_str(partition);
        }
        if !schema.primary_key.is_empty() {
            sql.push_str(&format!("\nPRIMARY KEY ({})", ident_list(&schema.primary_key)));
        }
        sql.push_str(&format!("\nORDER BY ({})", ident_list(&schema.ordering_key())));
        if let Some(ttl) = &schema.ttl {
            sql.push_str("\nTTL ");
            sql.push_str(ttl);
        }
        if !schema.settings.is_empty() {
            let items: Vec<String> = schema
                .settings
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            sql.push_str("\nSETTINGS ");
            sql.push_str(&items.join(", "));
        }
        if let Some(comment) = &schema.comment {
            sql.push_str("\nCOMMENT ");
            sql.push_str(&quote_string(comment));
        }

        debug!(table = %schema.name, %sql, "rendered create table");
        Ok(sql)
    }
}

fn column_definition(column: &ColumnDef) -> String {
    format!("{} {}", quote_ident(&column.name), column.column_type)
}

/// A DROP TABLE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct DropTable {
    name: String,
    if_exists: bool,
}

impl DropTable {
    /// Creates a DROP for `name` (optionally `db.table`).
    pub fn new(name: &str) -> Self {
        Self {
            name: String::from(name),
            if_exists: true,
        }
    }

    /// Toggles `IF EXISTS` (on by default).
    pub const fn if_exists(mut self, yes: bool) -> Self {
        self.if_exists = yes;
        self
    }

    /// Renders the statement.
    #[must_use]
    pub fn build(&self) -> String {
        let mut sql = String::from("DROP TABLE ");
        if self.if_exists {
            sql.push_str("IF EXISTS ");
        }
        sql.push_str(&render_table_name(&self.name));
        sql
    }
}

/// Renders `EXISTS TABLE tbl`.
#[must_use]
pub fn exists_table_sql(name: &str) -> String {
    format!("EXISTS TABLE {}", render_table_name(name))
}

/// Renders `DESCRIBE TABLE tbl`, whose `(name, type)` rows feed
/// [`TableSchema::from_description`].
#[must_use]
pub fn describe_table_sql(name: &str) -> String {
    format!("DESCRIBE TABLE {}", render_table_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ordering_key_prefers_id() {
        let sql = CreateTable::new("t", [("name", "String"), ("Id", "UInt64")])
            .if_not_exists(false)
            .build()
            .unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE \"t\" (\n    \"name\" String,\n    \"Id\" UInt64\n)\n\
             ENGINE = MergeTree\nORDER BY (\"Id\")"
        );
    }

    #[test]
    fn test_unknown_type_text_degrades() {
        let sql = CreateTable::new("t", [("kind", "Enum8('a' = 1)")])
            .build()
            .unwrap();
        assert!(sql.contains("\"kind\" String\n"));
    }

    #[test]
    fn test_full_statement() {
        let schema = TableSchema::builder("analytics.events")
            .primary_key_column("id", ColumnType::UInt64)
            .column("ts", ColumnType::DateTime64(3))
            .column("tags", ColumnType::String.low_cardinality().array())
            .engine("ReplacingMergeTree")
            .partition_by("toYYYYMM(ts)")
            .primary_key(&["id"])
            .order_by(&["id", "ts"])
            .ttl("ts + INTERVAL 30 DAY")
            .index(IndexDef::new("idx_ts", "ts", "minmax").granularity(4))
            .setting("index_granularity", 8192)
            .setting("allow_nullable_key", true)
            .setting("storage_policy", "hot")
            .comment("user's events")
            .build();

        let sql = CreateTable::from_schema(&schema).build().unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS \"analytics\".\"events\" (\n\
             \x20   \"id\" UInt64,\n\
             \x20   \"ts\" DateTime64(3),\n\
             \x20   \"tags\" Array(LowCardinality(String)),\n\
             \x20   INDEX \"idx_ts\" ts TYPE minmax GRANULARITY 4\n\
             )\n\
             ENGINE = ReplacingMergeTree\n\
             PARTITION BY toYYYYMM(ts)\n\
             PRIMARY KEY (\"id\")\n\
             ORDER BY (\"id\", \"ts\")\n\
             TTL ts + INTERVAL 30 DAY\n\
             SETTINGS allow_nullable_key=1, index_granularity=8192, storage_policy='hot'\n\
             COMMENT 'user\\'s events'"
        );
    }

    #[test]
    fn test_builder_directives_override_schema() {
        let schema = TableSchema::builder("t")
            .column("ts", ColumnType::DateTime)
            .build();
        let sql = CreateTable::from_schema(&schema)
            .engine("Memory")
            .order_by(&["ts"])
            .build()
            .unwrap();
        assert!(sql.ends_with("ENGINE = Memory\nORDER BY (\"ts\")"));
    }

    #[test]
    fn test_no_columns_fails() {
        let empty: [(&str, ColumnType); 0] = [];
        assert_eq!(
            CreateTable::new("t", empty).build(),
            Err(Error::NoColumns {
                table: String::from("t")
            })
        );
    }

    #[test]
    fn test_non_finite_setting_fails() {
        let result = CreateTable::new("t", [("id", ColumnType::UInt64)])
            .setting("ratio", f64::NAN)
            .build();
        assert_eq!(
            result,
            Err(Error::InvalidSetting {
                table: String::from("t"),
                key: String::from("ratio")
            })
        );
    }

    #[test]
    fn test_zero_granularity_is_omitted() {
        let sql = CreateTable::new("t", [("ts", ColumnType::DateTime)])
            .index(IndexDef::new("idx_ts", "ts", "minmax").granularity(0))
            .build()
            .unwrap();
        assert!(sql.contains("    INDEX \"idx_ts\" ts TYPE minmax\n)"));
    }

    #[test]
    fn test_drop_table() {
        assert_eq!(DropTable::new("db.t").build(), "DROP TABLE IF EXISTS \"db\".\"t\"");
        assert_eq!(
            DropTable::new("t").if_exists(false).build(),
            "DROP TABLE \"t\""
        );
    }

    #[test]
    fn test_table_probes() {
        assert_eq!(exists_table_sql("db.t"), "EXISTS TABLE \"db\".\"t\"");
        assert_eq!(describe_table_sql("`t`"), "DESCRIBE TABLE \"t\"");
    }
}
