//! INSERT statement compilation.
//!
//! Three shapes are supported:
//! - [`InsertRows`]: literal rows, every value bound as a parameter;
//! - [`insert_from_select`]: rows produced by a compiled [`Query`];
//! - [`InsertSelect`]: a hand-assembled `INSERT ... SELECT` over several
//!   joined sources, written with raw SQL fragments.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::select::{Compiler, Query};
use super::value::{Params, SqlValue, ToSqlValue};
use crate::dialect::{quote_ident, render_table_name};
use crate::error::{Error, Result};
use crate::schema::TableSchema;

fn column_list<S: AsRef<str>>(columns: &[S]) -> String {
    let quoted: Vec<String> = columns.iter().map(|c| quote_ident(c.as_ref())).collect();
    quoted.join(", ")
}

/// An INSERT of literal rows.
///
/// # Example
///
/// ```rust
/// use clickorm_core::builder::{InsertRows, SqlValue};
///
/// let (sql, params) = InsertRows::new("users")
///     .columns(&["id", "name"])
///     .row(vec![SqlValue::UInt(1), SqlValue::Text("Alice".into())])
///     .build()
///     .unwrap();
///
/// assert_eq!(sql, r#"INSERT INTO "users" ("id", "name") VALUES (%(p0)s, %(p1)s)"#);
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct InsertRows {
    table: String,
    columns: Vec<String>,
    rows: Vec<Vec<SqlValue>>,
}

impl InsertRows {
    /// Creates an INSERT into `table` with no columns or rows yet.
    #[must_use]
    pub fn new(table: &str) -> Self {
        Self {
            table: String::from(table),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Creates an INSERT covering every column of `table`.
    #[must_use]
    pub fn for_table(table: &TableSchema) -> Self {
        Self {
            table: String::from(table.name()),
            columns: table.column_names().map(String::from).collect(),
            rows: Vec::new(),
        }
    }

    /// Creates an INSERT from name → value maps.
    ///
    /// The column list is the sorted union of all keys. Keys missing from
    /// an item are inserted as NULL.
    #[must_use]
    pub fn from_maps(table: &str, items: &[BTreeMap<String, SqlValue>]) -> Self {
        let columns: BTreeSet<&String> = items.iter().flat_map(BTreeMap::keys).collect();
        let columns: Vec<String> = columns.into_iter().cloned().collect();
        let rows = items
            .iter()
            .map(|item| {
                columns
                    .iter()
                    .map(|c| item.get(c).cloned().unwrap_or(SqlValue::Null))
                    .collect()
            })
            .collect();
        Self {
            table: String::from(table),
            columns,
            rows,
        }
    }

    /// Specifies the columns to insert into.
    #[must_use]
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns = cols.iter().map(|s| String::from(*s)).collect();
        self
    }

    /// Adds a row of values.
    #[must_use]
    pub fn row<T: ToSqlValue>(mut self, values: Vec<T>) -> Self {
        self.rows
            .push(values.into_iter().map(ToSqlValue::to_sql_value).collect());
        self
    }

    /// Builds the INSERT statement and returns SQL with parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoColumns`] or [`Error::NoRows`] when either list is
    /// empty, and [`Error::RowArity`] when a row does not have exactly one
    /// value per column.
    pub fn build(self) -> Result<(String, Params)> {
        if self.columns.is_empty() {
            return Err(Error::NoColumns { table: self.table });
        }
        if self.rows.is_empty() {
            return Err(Error::NoRows { table: self.table });
        }
        if let Some((row, values)) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != self.columns.len())
        {
            return Err(Error::RowArity {
                table: self.table.clone(),
                expected: self.columns.len(),
                found: values.len(),
                row,
            });
        }

        let mut compiler = Compiler::new();
        let tuples: Vec<String> = self
            .rows
            .into_iter()
            .map(|row| {
                let placeholders: Vec<String> =
                    row.into_iter().map(|value| compiler.bind(value)).collect();
                format!("({})", placeholders.join(", "))
            })
            .collect();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            render_table_name(&self.table),
            column_list(&self.columns),
            tuples.join(", ")
        );
        let params = compiler.params().clone();
        debug!(%sql, params = params.len(), "compiled insert");
        Ok((sql, params))
    }
}

/// Compiles `INSERT INTO table (columns) SELECT ...` from a query.
///
/// An empty `columns` slice means every column of the query's table.
///
/// # Errors
///
/// Returns [`Error::NoColumns`] when no columns are given and the query's
/// table declares none.
pub fn insert_from_select(table: &str, columns: &[&str], query: &Query<'_>) -> Result<(String, Params)> {
    let columns: Vec<&str> = if columns.is_empty() {
        query.table().column_names().collect()
    } else {
        columns.to_vec()
    };
    if columns.is_empty() {
        return Err(Error::NoColumns {
            table: String::from(table),
        });
    }

    let (select_sql, params) = query.to_sql();
    let sql = format!(
        "INSERT INTO {} ({}) {select_sql}",
        render_table_name(table),
        column_list(&columns)
    );
    debug!(%sql, params = params.len(), "compiled insert-select");
    Ok((sql, params))
}

/// A source table in an [`InsertSelect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Alias used to refer to the table in expressions.
    pub alias: String,
    /// Table name, optionally `db.table`.
    pub table: String,
}

impl Source {
    fn to_sql(&self) -> String {
        format!("{} AS {}", render_table_name(&self.table), quote_ident(&self.alias))
    }
}

/// Output of [`InsertSelect::compile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInsertSelect {
    /// The full `INSERT INTO ... SELECT ...` statement.
    pub insert_sql: String,
    /// The SELECT part on its own.
    pub select_sql: String,
}

/// An `INSERT ... SELECT` assembled from several joined sources.
///
/// Target and source names and the aliases are quoted. Mapping expressions,
/// join conditions, filters, grouping and ordering are raw SQL and are
/// emitted verbatim: callers are responsible for their safety.
///
/// # Example
///
/// ```rust
/// use clickorm_core::builder::InsertSelect;
///
/// let compiled = InsertSelect::new("daily")
///     .source("e", "events")
///     .map("day", "toDate(e.ts)")
///     .map("hits", "count()")
///     .group_by("day")
///     .compile()
///     .unwrap();
///
/// assert_eq!(
///     compiled.select_sql,
///     r#"SELECT toDate(e.ts) AS "day", count() AS "hits" FROM "events" AS "e" GROUP BY day"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertSelect {
    target: String,
    sources: Vec<Source>,
    mapping: Vec<(String, String)>,
    joins: Vec<String>,
    filters: Vec<String>,
    group_by: Vec<String>,
    order_by: Vec<String>,
}

impl InsertSelect {
    /// Creates an INSERT ... SELECT into `target`.
    #[must_use]
    pub fn new(target: &str) -> Self {
        Self {
            target: String::from(target),
            ..Self::default()
        }
    }

    /// Adds a source table. The first source is the FROM table, every
    /// following one is joined.
    #[must_use]
    pub fn source(mut self, alias: &str, table: &str) -> Self {
        self.sources.push(Source {
            alias: String::from(alias),
            table: String::from(table),
        });
        self
    }

    /// Maps a target column to a SELECT expression.
    ///
    /// Mapping a column again replaces its expression in place.
    #[must_use]
    pub fn map(mut self, column: &str, expr: &str) -> Self {
        match self.mapping.iter_mut().find(|(c, _)| c == column) {
            Some(entry) => entry.1 = String::from(expr),
            None => self
                .mapping
                .push((String::from(column), String::from(expr))),
        }
        self
    }

    /// Adds the ON condition for the next joined source.
    #[must_use]
    pub fn join_on(mut self, condition: &str) -> Self {
        self.joins.push(String::from(condition));
        self
    }

    /// Adds a WHERE condition. Conditions combine with AND.
    #[must_use]
    pub fn filter(mut self, condition: &str) -> Self {
        self.filters.push(String::from(condition));
        self
    }

    /// Adds a GROUP BY expression.
    #[must_use]
    pub fn group_by(mut self, expr: &str) -> Self {
        self.group_by.push(String::from(expr));
        self
    }

    /// Adds an ORDER BY expression.
    #[must_use]
    pub fn order_by(mut self, expr: &str) -> Self {
        self.order_by.push(String::from(expr));
        self
    }

    /// Compiles the statement.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSources`] without a source table and
    /// [`Error::NoMapping`] without a column mapping.
    pub fn compile(&self) -> Result<CompiledInsertSelect> {
        let (first, joined) = self.sources.split_first().ok_or(Error::NoSources)?;
        if self.mapping.is_empty() {
            return Err(Error::NoMapping);
        }

        let items: Vec<String> = self
            .mapping
            .iter()
            .map(|(column, expr)| format!("{expr} AS {}", quote_ident(column)))
            .collect();

        let mut select_sql = format!("SELECT {} FROM {}", items.join(", "), first.to_sql());
        for (i, source) in joined.iter().enumerate() {
            select_sql.push_str(" JOIN ");
            select_sql.push_str(&source.to_sql());
            if let Some(on) = self.joins.get(i).filter(|on| !on.trim().is_empty()) {
                select_sql.push_str(" ON ");
                select_sql.push_str(on);
            }
        }

        match self.filters.as_slice() {
            [] => {}
            [only] => {
                select_sql.push_str(" WHERE ");
                select_sql.push_str(only);
            }
            many => {
                let parts: Vec<String> = many.iter().map(|f| format!("({f})")).collect();
                select_sql.push_str(" WHERE ");
                select_sql.push_str(&parts.join(" AND "));
            }
        }
        if !self.group_by.is_empty() {
            select_sql.push_str(" GROUP BY ");
            select_sql.push_str(&self.group_by.join(", "));
        }
        if !self.order_by.is_empty() {
            select_sql.push_str(" ORDER BY ");
            select_sql.push_str(&self.order_by.join(", "));
        }

        let columns: Vec<&str> = self.mapping.iter().map(|(c, _)| c.as_str()).collect();
        let insert_sql = format!(
            "INSERT INTO {} ({}) {select_sql}",
            render_table_name(&self.target),
            column_list(&columns)
        );
        debug!(sql = %insert_sql, "compiled insert-select");

        Ok(CompiledInsertSelect {
            insert_sql,
            select_sql,
        })
    }
}
