//! Table DDL, bulk registry output and INSERT statements.

mod common;
use common::*;

use std::collections::BTreeMap;

use clickorm_core::builder::{col, insert_from_select, InsertRows, InsertSelect, Query, SqlValue};
use clickorm_core::ddl::{describe_table_sql, exists_table_sql, CreateTable, IndexDef};
use clickorm_core::types::ColumnType;
use clickorm_core::{Error, SchemaRegistry, TableSchema};

// =============================================================================
// CREATE / DROP
// =============================================================================

#[test]
fn events_default_ordering_key() {
    let sql = CreateTable::from_schema(&events()).build().unwrap();
    assert_eq!(
        sql,
        "CREATE TABLE IF NOT EXISTS \"events\" (\n    \"id\" UInt64,\n    \"ts\" DateTime64(3)\n)\n\
         ENGINE = MergeTree\nORDER BY (\"id\")"
    );
}

#[test]
fn key_flag_does_not_override_id_ordering() {
    let schema = TableSchema::builder("t")
        .column("id", ColumnType::UInt64)
        .primary_key_column("ts", ColumnType::DateTime)
        .build();
    let sql = CreateTable::from_schema(&schema).build().unwrap();
    assert!(sql.ends_with("ENGINE = MergeTree\nORDER BY (\"id\")"));
}

#[test]
fn explicit_columns_with_directives() {
    let sql = CreateTable::new(
        "logs.requests",
        [
            ("ts", ColumnType::DateTime),
            ("path", ColumnType::String.low_cardinality()),
            ("status", ColumnType::UInt16),
        ],
    )
    .engine("ReplacingMergeTree")
    .partition_by("toDate(ts)")
    .order_by(&["path", "ts"])
    .ttl("ts + INTERVAL 7 DAY")
    .index(IndexDef::new("idx_status", "status", "set(100)").granularity(2))
    .setting("index_granularity", 4096)
    .comment("HTTP requests")
    .if_not_exists(false)
    .build()
    .unwrap();

    assert_eq!(
        sql,
        "CREATE TABLE \"logs\".\"requests\" (\n\
         \x20   \"ts\" DateTime,\n\
         \x20   \"path\" LowCardinality(String),\n\
         \x20   \"status\" UInt16,\n\
         \x20   INDEX \"idx_status\" status TYPE set(100) GRANULARITY 2\n\
         )\n\
         ENGINE = ReplacingMergeTree\n\
         PARTITION BY toDate(ts)\n\
         ORDER BY (\"path\", \"ts\")\n\
         TTL ts + INTERVAL 7 DAY\n\
         SETTINGS index_granularity=4096\n\
         COMMENT 'HTTP requests'"
    );
}

#[test]
fn schema_from_json_renders() {
    let json = r#"{
        "name": "metrics",
        "columns": [
            {"name": "host", "type": "lowcardinality(string)", "primary_key": true},
            {"name": "value", "type": "Float64"},
            {"name": "labels", "type": "Map(String, String)"}
        ],
        "settings": {"allow_nullable_key": true}
    }"#;
    let schema: TableSchema = serde_json::from_str(json).unwrap();
    let sql = CreateTable::from_schema(&schema).build().unwrap();
    assert_eq!(
        sql,
        "CREATE TABLE IF NOT EXISTS \"metrics\" (\n    \"host\" LowCardinality(String),\n    \
         \"value\" Float64,\n    \"labels\" String\n)\nENGINE = MergeTree\nORDER BY (\"host\")\n\
         SETTINGS allow_nullable_key=1"
    );
}

#[test]
fn describe_rows_feed_schema() {
    assert_eq!(describe_table_sql("db.t"), "DESCRIBE TABLE \"db\".\"t\"");
    assert_eq!(exists_table_sql("t"), "EXISTS TABLE \"t\"");

    let rows = vec![
        (String::from("id"), String::from("UInt64")),
        (String::from("payload"), String::from("JSON")),
    ];
    let schema = TableSchema::from_description("db.t", rows);
    let types: Vec<&ColumnType> = schema.columns().iter().map(|c| &c.column_type).collect();
    assert_eq!(types, vec![&ColumnType::UInt64, &ColumnType::String]);
}

#[test]
fn registry_bulk_statements() {
    let mut registry = SchemaRegistry::new();
    registry.register(users()).unwrap();
    registry.register(events()).unwrap();
    assert_eq!(
        registry.register(users()),
        Err(Error::DuplicateTable(String::from("users")))
    );

    let creates = registry.create_all(true).unwrap();
    assert_eq!(creates.len(), 2);
    assert!(creates[0].starts_with("CREATE TABLE IF NOT EXISTS \"users\""));
    assert!(creates[1].starts_with("CREATE TABLE IF NOT EXISTS \"events\""));
    assert_eq!(
        registry.drop_all(),
        vec!["DROP TABLE IF EXISTS \"users\"", "DROP TABLE IF EXISTS \"events\""]
    );
}

// =============================================================================
// INSERT
// =============================================================================

#[test]
fn insert_rows_for_schema() {
    let table = users();
    let (sql, params) = InsertRows::for_table(&table)
        .row(vec![SqlValue::UInt(1), SqlValue::Text(String::from("a"))])
        .row(vec![SqlValue::UInt(2), SqlValue::Null])
        .build()
        .unwrap();
    assert_eq!(
        sql,
        r#"INSERT INTO "users" ("id", "name") VALUES (%(p0)s, %(p1)s), (%(p2)s, %(p3)s)"#
    );
    assert_params_match(&sql, &params);
    assert_eq!(params["p3"], SqlValue::Null);
}

#[test]
fn insert_from_maps_sorted_union() {
    let rows: Vec<BTreeMap<String, SqlValue>> = vec![
        BTreeMap::from([(String::from("name"), SqlValue::Text(String::from("x")))]),
        BTreeMap::from([(String::from("id"), SqlValue::UInt(7))]),
    ];
    let (sql, params) = InsertRows::from_maps("users", &rows).build().unwrap();
    assert_eq!(
        sql,
        r#"INSERT INTO "users" ("id", "name") VALUES (%(p0)s, %(p1)s), (%(p2)s, %(p3)s)"#
    );
    assert_eq!(params["p0"], SqlValue::Null);
    assert_eq!(params["p2"], SqlValue::UInt(7));
    assert_eq!(params["p3"], SqlValue::Null);

    assert_eq!(
        InsertRows::from_maps("users", &[]).build(),
        Err(Error::NoColumns {
            table: String::from("users")
        })
    );
}

#[test]
fn insert_from_query() {
    let table = events();
    let query = Query::new(&table).filter(col("id").lt(10)).limit(100);
    let (sql, params) = insert_from_select("events_copy", &["id", "ts"], &query).unwrap();
    assert_eq!(
        sql,
        r#"INSERT INTO "events_copy" ("id", "ts") SELECT "id", "ts" FROM "events" WHERE ("id" < %(p0)s) LIMIT %(p1)s"#
    );
    assert_params_match(&sql, &params);
}

#[test]
fn aggregate_insert_select() {
    let compiled = InsertSelect::new("stats.daily")
        .source("e", "events")
        .source("u", "users")
        .join_on("e.user_id = u.id")
        .map("day", "toDate(e.ts)")
        .map("user", "u.name")
        .map("hits", "count()")
        .filter("e.ts >= today() - 7")
        .group_by("day")
        .group_by("user")
        .order_by("day")
        .compile()
        .unwrap();

    assert_eq!(
        compiled.select_sql,
        "SELECT toDate(e.ts) AS \"day\", u.name AS \"user\", count() AS \"hits\" \
         FROM \"events\" AS \"e\" JOIN \"users\" AS \"u\" ON e.user_id = u.id \
         WHERE e.ts >= today() - 7 GROUP BY day, user ORDER BY day"
    );
    assert_eq!(
        compiled.insert_sql,
        format!(
            "INSERT INTO \"stats\".\"daily\" (\"day\", \"user\", \"hits\") {}",
            compiled.select_sql
        )
    );
}
