//! Command implementations.
//!
//! Each command returns the text to print so it can be tested without
//! capturing stdout.

use clickorm_core::builder::{OrderBy, Params, Query};
use clickorm_core::ddl::{CreateTable, DropTable};
use clickorm_core::{parse_type, ParsedType, SchemaRegistry};
use tracing::warn;

use crate::error::Result;

/// Renders a type declaration in canonical form.
///
/// Unrecognized declarations print their `String` fallback and log a
/// warning.
#[must_use]
pub fn parse_type_command(text: &str) -> String {
    match parse_type(text) {
        ParsedType::Recognized(t) => t.to_string(),
        ParsedType::Unrecognized { raw, fallback } => {
            warn!(%raw, %fallback, "unrecognized type, using fallback");
            fallback.to_string()
        }
    }
}

/// Renders CREATE statements for one table or all of them.
///
/// # Errors
///
/// Fails when the table is not in the registry or has no columns.
pub fn create_command(
    registry: &SchemaRegistry,
    table: Option<&str>,
    if_not_exists: bool,
) -> Result<Vec<String>> {
    match table {
        Some(name) => {
            let schema = registry.require(name)?;
            let sql = CreateTable::from_schema(schema)
                .if_not_exists(if_not_exists)
                .build()?;
            Ok(vec![sql])
        }
        None => Ok(registry.create_all(if_not_exists)?),
    }
}

/// Renders DROP statements for one table or every registered one.
///
/// A named table does not have to be in the registry.
#[must_use]
pub fn drop_command(registry: &SchemaRegistry, table: Option<&str>) -> Vec<String> {
    match table {
        Some(name) => vec![DropTable::new(name).build()],
        None => registry.drop_all(),
    }
}

/// Options of the `select` command.
#[derive(Debug, Clone, Default)]
pub struct SelectOptions {
    /// Table to read from.
    pub table: String,
    /// Raw WHERE condition.
    pub filter: Option<String>,
    /// Ordering columns, `-` prefix meaning descending.
    pub order: Vec<String>,
    /// Row limit.
    pub limit: Option<u64>,
    /// Row offset.
    pub offset: Option<u64>,
    /// Render the COUNT statement instead.
    pub count: bool,
}

/// A compiled statement ready to print.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// SQL text.
    pub sql: String,
    /// Parameters referenced by the SQL.
    pub params: Params,
}

impl Statement {
    /// Formats the statement as SQL followed by the JSON parameter map.
    ///
    /// # Errors
    ///
    /// Fails if the parameters cannot be encoded.
    pub fn render(&self) -> Result<String> {
        let params = serde_json::to_string_pretty(&self.params)?;
        Ok(format!("{}\n{params}", self.sql))
    }
}

/// Compiles a SELECT (or COUNT) over a registered table.
///
/// # Errors
///
/// Fails when the table is not in the registry.
pub fn select_command(registry: &SchemaRegistry, options: &SelectOptions) -> Result<Statement> {
    let schema = registry.require(&options.table)?;
    let mut query = Query::new(schema);
    if let Some(filter) = &options.filter {
        query = query.filter_raw(filter);
    }
    for spec in &options.order {
        let order = OrderBy::parse(spec);
        query = query.order_by(&order.column, order.direction);
    }
    if let Some(limit) = options.limit {
        query = query.limit(limit);
    }
    if let Some(offset) = options.offset {
        query = query.offset(offset);
    }

    let (sql, params) = if options.count {
        query.count_sql()
    } else {
        query.to_sql()
    };
    Ok(Statement { sql, params })
}
