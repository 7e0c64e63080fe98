//! SELECT statement compilation.
//!
//! [`Compiler`] owns the parameter counter for one statement and assembles
//! SELECT and COUNT text from a [`TableSchema`]. [`Query`] is the chainable
//! front end: it collects filters, ordering and paging, and builds a fresh
//! compiler every time it is rendered.

use core::fmt;

use tracing::debug;

use super::expr::{Expr, ParamAllocator};
use super::value::{Params, SqlValue};
use crate::dialect::{placeholder, quote_ident, render_table_name};
use crate::schema::TableSchema;

/// Order direction for sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Ascending order (ASC)
    #[default]
    Asc,
    /// Descending order (DESC)
    Desc,
}

impl OrderDirection {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// An ordering specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Column to order by
    pub column: String,
    /// Order direction
    pub direction: OrderDirection,
}

impl OrderBy {
    /// Creates a new ascending order specification.
    #[must_use]
    pub fn asc(column: &str) -> Self {
        Self {
            column: String::from(column),
            direction: OrderDirection::Asc,
        }
    }

    /// Creates a new descending order specification.
    #[must_use]
    pub fn desc(column: &str) -> Self {
        Self {
            column: String::from(column),
            direction: OrderDirection::Desc,
        }
    }

    /// Parses an order specification, `-` prefix meaning descending.
    ///
    /// Example: `"-created_at"` for descending, `"name"` for ascending.
    #[must_use]
    pub fn parse(spec: &str) -> Self {
        if let Some(column) = spec.strip_prefix('-') {
            Self::desc(column)
        } else {
            Self::asc(spec)
        }
    }

    /// Returns the SQL representation.
    #[must_use]
    pub fn to_sql(&self) -> String {
        format!("{} {}", quote_ident(&self.column), self.direction)
    }
}

/// Per-statement compiler and parameter allocator.
///
/// Parameter names run `p0, p1, …` in the order literals are met. A
/// compiler belongs to one statement; start a new one (or [`reset`] this
/// one) for the next statement.
///
/// [`reset`]: Compiler::reset
#[derive(Debug, Default)]
pub struct Compiler {
    next: usize,
    params: Params,
}

impl Compiler {
    /// Creates a compiler with an empty parameter table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every binding issued so far.
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// Forgets all bindings and restarts numbering at `p0`.
    pub fn reset(&mut self) {
        self.next = 0;
        self.params.clear();
    }

    /// Binds a value and returns its placeholder.
    pub fn bind(&mut self, value: SqlValue) -> String {
        let name = self.add_param(value);
        placeholder(&name)
    }

    /// Compiles a SELECT over `table`.
    ///
    /// Columns are listed in declaration order (`*` when the schema has
    /// none). LIMIT and OFFSET are bound as parameters.
    pub fn select(
        &mut self,
        table: &TableSchema,
        filter: Option<&Expr>,
        order_by: &[OrderBy],
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> (String, Params) {
        let columns: Vec<String> = table.column_names().map(quote_ident).collect();
        let columns = if columns.is_empty() {
            String::from("*")
        } else {
            columns.join(", ")
        };

        let mut sql = format!("SELECT {columns} FROM {}", render_table_name(table.name()));
        let mut params = Params::new();

        if let Some(expr) = filter {
            let (where_sql, where_params) = expr.to_sql(self).into_parts();
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
            params.extend(where_params);
        }

        if !order_by.is_empty() {
            let parts: Vec<String> = order_by.iter().map(OrderBy::to_sql).collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&parts.join(", "));
        }

        for (keyword, value) in [("LIMIT", limit), ("OFFSET", offset)] {
            if let Some(n) = value {
                let name = self.add_param(SqlValue::UInt(n));
                sql.push_str(&format!(" {keyword} {}", placeholder(&name)));
                params.insert(name, SqlValue::UInt(n));
            }
        }

        (sql, params)
    }

    /// Compiles a row count over the matching SELECT.
    ///
    /// The SELECT is wrapped as a subquery and its parameter map is returned
    /// unchanged. Paging does not apply to a count.
    pub fn count(
        &mut self,
        table: &TableSchema,
        filter: Option<&Expr>,
        order_by: &[OrderBy],
    ) -> (String, Params) {
        let (inner, params) = self.select(table, filter, order_by, None, None);
        (format!("SELECT count() FROM ({inner}) AS \"sub\""), params)
    }
}

impl ParamAllocator for Compiler {
    fn add_param(&mut self, value: SqlValue) -> String {
        let name = format!("p{}", self.next);
        self.next += 1;
        self.params.insert(name.clone(), value);
        name
    }
}

/// A chainable SELECT over one table.
///
/// # Example
///
/// ```rust
/// use clickorm_core::builder::{col, OrderDirection, Query};
/// use clickorm_core::schema::TableSchema;
/// use clickorm_core::types::ColumnType;
///
/// let users = TableSchema::builder("users")
///     .column("id", ColumnType::UInt64)
///     .column("name", ColumnType::String)
///     .build();
///
/// let (sql, params) = Query::new(&users)
///     .filter(col("id").gt(10))
///     .order_by("name", OrderDirection::Desc)
///     .limit(5)
///     .to_sql();
///
/// assert_eq!(
///     sql,
///     r#"SELECT "id", "name" FROM "users" WHERE ("id" > %(p0)s) ORDER BY "name" DESC LIMIT %(p1)s"#
/// );
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Query<'a> {
    table: &'a TableSchema,
    filter: Option<Expr>,
    order_by: Vec<OrderBy>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl<'a> Query<'a> {
    /// Creates an unfiltered query over `table`.
    #[must_use]
    pub const fn new(table: &'a TableSchema) -> Self {
        Self {
            table,
            filter: None,
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Adds a filter.
    ///
    /// Filters combine with AND, left to right: three calls produce
    /// `((a AND b) AND c)`.
    #[must_use]
    pub fn filter(mut self, expr: Expr) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(expr),
            None => expr,
        });
        self
    }

    /// Adds a raw SQL filter.
    ///
    /// **Warning**: the text is emitted verbatim. Never pass user input here.
    #[must_use]
    pub fn filter_raw(self, sql: &str) -> Self {
        self.filter(Expr::raw(sql))
    }

    /// Appends an ordering column.
    #[must_use]
    pub fn order_by(mut self, column: &str, direction: OrderDirection) -> Self {
        self.order_by.push(OrderBy {
            column: String::from(column),
            direction,
        });
        self
    }

    /// Limits the number of results.
    #[must_use]
    pub const fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Sets the offset for pagination.
    #[must_use]
    pub const fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Restricts the query to at most one row.
    #[must_use]
    pub const fn first(mut self) -> Self {
        match self.limit {
            Some(n) if n <= 1 => {}
            _ => self.limit = Some(1),
        }
        self
    }

    /// Returns the table this query reads from.
    #[must_use]
    pub const fn table(&self) -> &'a TableSchema {
        self.table
    }

    /// Returns the combined filter, if any.
    #[must_use]
    pub const fn filter_expr(&self) -> Option<&Expr> {
        self.filter.as_ref()
    }

    /// Compiles the SELECT statement.
    #[must_use]
    pub fn to_sql(&self) -> (String, Params) {
        let (sql, params) = Compiler::new().select(
            self.table,
            self.filter.as_ref(),
            &self.order_by,
            self.limit,
            self.offset,
        );
        debug!(%sql, params = params.len(), "compiled select");
        (sql, params)
    }

    /// Compiles the COUNT statement.
    #[must_use]
    pub fn count_sql(&self) -> (String, Params) {
        let (sql, params) =
            Compiler::new().count(self.table, self.filter.as_ref(), &self.order_by);
        debug!(%sql, params = params.len(), "compiled count");
        (sql, params)
    }
}
