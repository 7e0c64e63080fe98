//! Expression trees for filters.
//!
//! An [`Expr`] owns its children, so trees are immutable and acyclic by
//! construction. Compiling a tree walks it left to right, quoting column
//! references and binding every literal through a [`ParamAllocator`].
//!
//! ```rust
//! use clickorm_core::builder::{col, Compiler};
//!
//! let filter = col("id").eq(5).and(col("name").like("a%"));
//! let mut compiler = Compiler::new();
//! let fragment = filter.to_sql(&mut compiler);
//!
//! assert_eq!(fragment.sql(), r#"(("id" = %(p0)s) AND ("name" LIKE %(p1)s))"#);
//! assert_eq!(fragment.params().len(), 2);
//! ```

use core::fmt;

use super::value::{Params, SqlValue, ToSqlValue};
use crate::dialect::{placeholder, quote_ident};

/// Issues parameter names for literal values.
///
/// One allocator serves exactly one statement; names are unique within it.
pub trait ParamAllocator {
    /// Records `value` and returns the fresh name it is bound under.
    fn add_param(&mut self, value: SqlValue) -> String;
}

/// Creates a column reference.
#[must_use]
pub fn col(name: &str) -> Column {
    Column {
        table: None,
        name: String::from(name),
    }
}

/// A column reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Table the column belongs to, if known.
    pub table: Option<String>,
    /// Column name.
    pub name: String,
}

impl Column {
    /// Creates a column reference scoped to a table.
    #[must_use]
    pub fn qualified(table: &str, name: &str) -> Self {
        Self {
            table: Some(String::from(table)),
            name: String::from(name),
        }
    }

    /// Returns the quoted column name.
    ///
    /// Statements here read from a single table, so the owning table is not
    /// part of the rendered reference.
    #[must_use]
    pub fn to_sql(&self) -> String {
        quote_ident(&self.name)
    }

    fn compare<T: ToSqlValue>(self, op: BinaryOp, value: T) -> Expr {
        Expr::binary(self.into(), op, Expr::value(value))
    }

    /// Creates an equality expression.
    #[must_use]
    pub fn eq<T: ToSqlValue>(self, value: T) -> Expr {
        self.compare(BinaryOp::Eq, value)
    }

    /// Creates an inequality expression.
    #[must_use]
    pub fn not_eq<T: ToSqlValue>(self, value: T) -> Expr {
        self.compare(BinaryOp::NotEq, value)
    }

    /// Creates a greater-than expression.
    #[must_use]
    pub fn gt<T: ToSqlValue>(self, value: T) -> Expr {
        self.compare(BinaryOp::Gt, value)
    }

    /// Creates a greater-than-or-equal expression.
    #[must_use]
    pub fn gt_eq<T: ToSqlValue>(self, value: T) -> Expr {
        self.compare(BinaryOp::GtEq, value)
    }

    /// Creates a less-than expression.
    #[must_use]
    pub fn lt<T: ToSqlValue>(self, value: T) -> Expr {
        self.compare(BinaryOp::Lt, value)
    }

    /// Creates a less-than-or-equal expression.
    #[must_use]
    pub fn lt_eq<T: ToSqlValue>(self, value: T) -> Expr {
        self.compare(BinaryOp::LtEq, value)
    }

    /// Creates an IN expression.
    ///
    /// The whole list is bound as a single parameter.
    #[must_use]
    pub fn in_list<T: ToSqlValue>(self, values: Vec<T>) -> Expr {
        self.compare(BinaryOp::In, values)
    }

    /// Creates a LIKE expression.
    ///
    /// The pattern is bound verbatim; `%` and `_` keep their wildcard
    /// meaning and are not escaped.
    #[must_use]
    pub fn like(self, pattern: &str) -> Expr {
        self.compare(BinaryOp::Like, pattern)
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// Equal (=)
    Eq,
    /// Not equal (!=)
    NotEq,
    /// Greater than (>)
    Gt,
    /// Less than (<)
    Lt,
    /// Greater than or equal (>=)
    GtEq,
    /// Less than or equal (<=)
    LtEq,
    /// Membership (IN)
    In,
    /// Pattern match (LIKE)
    Like,
}

impl BinaryOp {
    /// Returns the SQL operator.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::GtEq => ">=",
            Self::LtEq => "<=",
            Self::In => "IN",
            Self::Like => "LIKE",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Logical connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    /// Both sides hold (AND)
    And,
    /// Either side holds (OR)
    Or,
}

impl LogicalOp {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A filter expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference.
    Column(Column),
    /// Literal value, always bound as a parameter.
    Value(SqlValue),
    /// Comparison of two sub-expressions.
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
    },
    /// AND/OR of two sub-expressions.
    Logical {
        /// Left operand.
        left: Box<Expr>,
        /// Connective.
        op: LogicalOp,
        /// Right operand.
        right: Box<Expr>,
    },
    /// SQL emitted verbatim.
    Raw(String),
}

impl Expr {
    /// Creates a raw SQL fragment.
    ///
    /// **Warning**: the text is emitted as-is, without quoting or parameter
    /// binding. Never pass user input here.
    #[must_use]
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::Raw(sql.into())
    }

    /// Creates a column reference expression.
    #[must_use]
    pub fn column(name: &str) -> Self {
        Self::Column(col(name))
    }

    /// Creates a literal expression.
    #[must_use]
    pub fn value<T: ToSqlValue>(value: T) -> Self {
        Self::Value(value.to_sql_value())
    }

    /// Creates a comparison expression.
    #[must_use]
    pub fn binary(left: Self, op: BinaryOp, right: Self) -> Self {
        Self::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Creates a logical expression.
    #[must_use]
    pub fn logical(left: Self, op: LogicalOp, right: Self) -> Self {
        Self::Logical {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Creates an AND expression.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self::logical(self, LogicalOp::And, other)
    }

    /// Creates an OR expression.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::logical(self, LogicalOp::Or, other)
    }

    /// Compiles the expression, binding literals through `params`.
    pub fn to_sql<A: ParamAllocator + ?Sized>(&self, params: &mut A) -> SqlFragment {
        match self {
            Self::Column(column) => SqlFragment::new(column.to_sql()),
            Self::Value(value) => {
                let name = params.add_param(value.clone());
                let mut fragment = SqlFragment::new(placeholder(&name));
                fragment.params.insert(name, value.clone());
                fragment
            }
            Self::Binary { left, op, right } => {
                Self::combine(left.to_sql(params), op.as_sql(), right.to_sql(params))
            }
            Self::Logical { left, op, right } => {
                Self::combine(left.to_sql(params), op.as_sql(), right.to_sql(params))
            }
            Self::Raw(sql) => SqlFragment::new(sql.clone()),
        }
    }

    fn combine(left: SqlFragment, op: &str, right: SqlFragment) -> SqlFragment {
        let mut params = left.params;
        params.extend(right.params);
        SqlFragment {
            sql: format!("({} {op} {})", left.sql, right.sql),
            params,
        }
    }
}

impl From<Column> for Expr {
    fn from(column: Column) -> Self {
        Self::Column(column)
    }
}

impl From<SqlValue> for Expr {
    fn from(value: SqlValue) -> Self {
        Self::Value(value)
    }
}

/// Compiled SQL text with the parameters it references.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFragment {
    sql: String,
    params: Params,
}

impl SqlFragment {
    fn new(sql: String) -> Self {
        Self {
            sql,
            params: Params::new(),
        }
    }

    /// Returns the SQL string.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the parameters.
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// Consumes the fragment and returns the SQL and parameters.
    #[must_use]
    pub fn into_parts(self) -> (String, Params) {
        (self.sql, self.params)
    }
}
