//! # clickorm-core
//!
//! Safe SQL text generation for ClickHouse.
//!
//! This crate provides:
//! - A column type model with a total, recursive type parser
//! - Identifier quoting that neutralizes hostile table and column names
//! - Expression trees compiled to SQL with every literal bound as a named
//!   `%(pN)s` parameter
//! - SELECT, COUNT and INSERT compilation
//! - CREATE / DROP TABLE rendering from table schemas
//!
//! The crate performs no I/O. Compiled statements are handed to whatever
//! client executes them, together with their parameter map.
//!
//! ## Querying
//!
//! ```rust
//! use clickorm_core::builder::{col, OrderDirection, Query};
//! use clickorm_core::schema::TableSchema;
//! use clickorm_core::types::ColumnType;
//!
//! let events = TableSchema::builder("analytics.events")
//!     .column("id", ColumnType::UInt64)
//!     .column("kind", ColumnType::String.low_cardinality())
//!     .build();
//!
//! let (sql, params) = Query::new(&events)
//!     .filter(col("kind").in_list(vec!["click", "view"]))
//!     .order_by("id", OrderDirection::Desc)
//!     .first()
//!     .to_sql();
//!
//! assert_eq!(
//!     sql,
//!     r#"SELECT "id", "kind" FROM "analytics"."events" WHERE ("kind" IN %(p0)s) ORDER BY "id" DESC LIMIT %(p1)s"#
//! );
//! assert_eq!(params.len(), 2);
//! ```
//!
//! ## SQL Injection Prevention
//!
//! Values travel as parameters and identifiers are always quoted:
//!
//! ```rust
//! use clickorm_core::builder::{col, Query, SqlValue};
//! use clickorm_core::schema::TableSchema;
//!
//! let table = TableSchema::builder("users\"; DROP TABLE users; --").build();
//! let user_input = "'; DROP TABLE users; --";
//! let (sql, params) = Query::new(&table).filter(col("name").eq(user_input)).to_sql();
//!
//! assert_eq!(
//!     sql,
//!     r#"SELECT * FROM "users""; DROP TABLE users; --" WHERE ("name" = %(p0)s)"#
//! );
//! assert_eq!(params["p0"], SqlValue::Text(String::from(user_input)));
//! ```
//!
//! ## Table DDL
//!
//! ```rust
//! use clickorm_core::ddl::CreateTable;
//! use clickorm_core::schema::TableSchema;
//! use clickorm_core::types::ColumnType;
//!
//! let users = TableSchema::builder("users")
//!     .column("email", ColumnType::String.nullable())
//!     .column("id", ColumnType::UInt64)
//!     .build();
//!
//! let sql = CreateTable::from_schema(&users).build().unwrap();
//! assert!(sql.ends_with("ENGINE = MergeTree\nORDER BY (\"id\")"));
//! ```

pub mod builder;
pub mod ddl;
pub mod dialect;
pub mod error;
pub mod schema;
pub mod types;

pub use builder::{col, Compiler, Expr, Params, Query, SqlValue};
pub use ddl::{CreateTable, DropTable};
pub use error::{Error, Result};
pub use schema::{SchemaRegistry, TableSchema};
pub use types::{parse_type, ColumnType, ParsedType};
