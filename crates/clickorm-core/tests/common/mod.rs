#![allow(dead_code)]

use clickorm_core::builder::Params;
use clickorm_core::types::ColumnType;
use clickorm_core::TableSchema;

pub fn users() -> TableSchema {
    TableSchema::builder("users")
        .column("id", ColumnType::UInt64)
        .column("name", ColumnType::String)
        .build()
}

pub fn events() -> TableSchema {
    TableSchema::builder("events")
        .column("id", ColumnType::UInt64)
        .column("ts", ColumnType::DateTime64(3))
        .build()
}

/// One value of every leaf type plus nested wrappers.
pub fn sample_types() -> Vec<ColumnType> {
    let leaves = vec![
        ColumnType::Int8,
        ColumnType::Int16,
        ColumnType::Int32,
        ColumnType::Int64,
        ColumnType::UInt8,
        ColumnType::UInt16,
        ColumnType::UInt32,
        ColumnType::UInt64,
        ColumnType::Float32,
        ColumnType::Float64,
        ColumnType::String,
        ColumnType::FixedString(16),
        ColumnType::Uuid,
        ColumnType::Bool,
        ColumnType::Date,
        ColumnType::Date32,
        ColumnType::DateTime,
        ColumnType::DateTime64(9),
        ColumnType::Decimal {
            precision: 38,
            scale: 10,
        },
    ];
    let mut all = leaves.clone();
    for leaf in leaves {
        all.push(leaf.clone().nullable());
        all.push(leaf.clone().array());
        all.push(leaf.clone().nullable().low_cardinality());
        all.push(leaf.nullable().array().array());
    }
    all
}

/// Asserts that every `%(name)s` placeholder in `sql` has a binding and
/// every binding is referenced.
pub fn assert_params_match(sql: &str, params: &Params) {
    let mut referenced = Vec::new();
    let mut rest = sql;
    while let Some(start) = rest.find("%(") {
        let tail = &rest[start + 2..];
        let end = tail
            .find(")s")
            .unwrap_or_else(|| panic!("Unterminated placeholder in: {sql}"));
        referenced.push(String::from(&tail[..end]));
        rest = &tail[end + 2..];
    }
    for name in &referenced {
        assert!(params.contains_key(name), "No binding for {name} in: {sql}");
    }
    assert_eq!(
        referenced.len(),
        params.len(),
        "Bindings and placeholders differ.\n  SQL:    {sql}\n  Params: {params:?}"
    );
}
