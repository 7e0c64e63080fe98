//! Hostile identifiers and values never escape their tokens.

mod common;
use common::*;

use clickorm_core::builder::{col, InsertRows, Query, SqlValue};
use clickorm_core::ddl::{CreateTable, DropTable};
use clickorm_core::dialect::{quote_ident, quote_string, render_table_name};
use clickorm_core::types::ColumnType;
use clickorm_core::TableSchema;

const HOSTILE: &[&str] = &[
    "'; DROP TABLE users; --",
    "\" OR 1=1 --",
    "a\"b\"\"c",
    "back\\slash'quote",
    "%(p0)s",
    "Robert'); DELETE FROM students;--",
    "\n\t",
    "Անուն",
];

#[test]
fn values_only_travel_as_params() {
    let table = users();
    for value in HOSTILE {
        let (sql, params) = Query::new(&table).filter(col("name").eq(*value)).to_sql();
        assert_eq!(
            sql,
            r#"SELECT "id", "name" FROM "users" WHERE ("name" = %(p0)s)"#
        );
        assert_eq!(params["p0"], SqlValue::Text(String::from(*value)));

        let (sql, params) = InsertRows::new("users")
            .columns(&["name"])
            .row(vec![*value])
            .build()
            .unwrap();
        assert_eq!(sql, r#"INSERT INTO "users" ("name") VALUES (%(p0)s)"#);
        assert_eq!(params.len(), 1);
    }
}

#[test]
fn identifiers_stay_one_token() {
    for name in HOSTILE {
        let quoted = quote_ident(name);
        assert!(quoted.starts_with('"') && quoted.ends_with('"'), "{quoted}");
        let inner = &quoted[1..quoted.len() - 1];
        // Every quote inside the token is doubled.
        assert!(
            inner.replace("\"\"", "").find('"').is_none(),
            "Unescaped quote in {quoted}"
        );
    }
}

#[test]
fn quoted_table_name() {
    assert_eq!(quote_ident("My \"Table\""), r#""My ""Table""""#);
    assert_eq!(render_table_name("My \"Table\""), r#""My ""Table""""#);
    assert_eq!(render_table_name("`db`.`t`"), r#""db"."t""#);
}

#[test]
fn hostile_names_in_statements() {
    let schema = TableSchema::builder("db.evil\"; DROP TABLE x; --")
        .column("col\" UInt8, \"x", ColumnType::UInt8)
        .comment("it's -- fine")
        .setting("storage_policy", "a', evil='1")
        .build();

    let create = CreateTable::from_schema(&schema).build().unwrap();
    assert!(create.starts_with(
        "CREATE TABLE IF NOT EXISTS \"db\".\"evil\"\"; DROP TABLE x; --\" (\n    \"col\"\" UInt8, \"\"x\" UInt8\n)"
    ));
    assert!(create.contains("SETTINGS storage_policy='a\\', evil=\\'1'"));
    assert!(create.ends_with("COMMENT 'it\\'s -- fine'"));

    assert_eq!(
        DropTable::new(schema.name()).build(),
        "DROP TABLE IF EXISTS \"db\".\"evil\"\"; DROP TABLE x; --\""
    );
}

#[test]
fn string_literals_escape_backslash_first() {
    assert_eq!(quote_string("a\\'b"), "'a\\\\\\'b'");
    assert_eq!(quote_string(""), "''");
}
