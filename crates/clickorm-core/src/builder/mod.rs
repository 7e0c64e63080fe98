//! Parameterized statement builder
//!
//! Filters are expression trees built from [`col`] and combined with
//! [`Expr::and`] / [`Expr::or`]. Compiling a tree binds every literal as a
//! named parameter, so caller-supplied values never reach the SQL text.
//!
//! # Example
//!
//! ```rust
//! use clickorm_core::builder::{col, Query, SqlValue};
//! use clickorm_core::schema::TableSchema;
//! use clickorm_core::types::ColumnType;
//!
//! let users = TableSchema::builder("users")
//!     .column("id", ColumnType::UInt64)
//!     .column("name", ColumnType::String)
//!     .build();
//!
//! let (sql, params) = Query::new(&users)
//!     .filter(col("id").eq(5).and(col("name").like("a%")))
//!     .limit(10)
//!     .to_sql();
//!
//! assert_eq!(
//!     sql,
//!     r#"SELECT "id", "name" FROM "users" WHERE (("id" = %(p0)s) AND ("name" LIKE %(p1)s)) LIMIT %(p2)s"#
//! );
//! assert_eq!(params["p1"], SqlValue::Text(String::from("a%")));
//! ```

mod expr;
mod insert;
mod select;
pub mod value;

pub use expr::{col, BinaryOp, Column, Expr, LogicalOp, ParamAllocator, SqlFragment};
pub use insert::{insert_from_select, CompiledInsertSelect, InsertRows, InsertSelect, Source};
pub use select::{Compiler, OrderBy, OrderDirection, Query};
pub use value::{Params, SqlValue, ToSqlValue};
