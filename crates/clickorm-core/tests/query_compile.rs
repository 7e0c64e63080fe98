//! SELECT and COUNT compilation through `Query` and `Compiler`.

mod common;
use common::*;

use clickorm_core::builder::{col, Compiler, Expr, OrderBy, OrderDirection, Query, SqlValue};

// =============================================================================
// Filters
// =============================================================================

#[test]
fn filter_and_limit() {
    let table = users();
    let (sql, params) = Query::new(&table)
        .filter(col("id").eq(5).and(col("name").like("a%")))
        .limit(10)
        .to_sql();

    assert_eq!(
        sql,
        r#"SELECT "id", "name" FROM "users" WHERE (("id" = %(p0)s) AND ("name" LIKE %(p1)s)) LIMIT %(p2)s"#
    );
    assert_eq!(params.len(), 3);
    assert_eq!(params["p0"], SqlValue::Int(5));
    assert_eq!(params["p1"], SqlValue::Text(String::from("a%")));
    assert_eq!(params["p2"], SqlValue::UInt(10));
}

#[test]
fn chained_filters_nest_left() {
    let table = users();
    for n in 1..=6 {
        let query = (0..n).fold(Query::new(&table), |q, i| q.filter(col("id").gt(i)));
        let (sql, params) = query.to_sql();

        assert_eq!(params.len(), n as usize, "{sql}");
        assert_params_match(&sql, &params);

        let where_sql = sql.split(" WHERE ").nth(1).unwrap();
        assert_eq!(where_sql.matches(" AND ").count(), n as usize - 1);
        let leading = where_sql.chars().take_while(|c| *c == '(').count();
        assert_eq!(leading, n as usize, "{where_sql}");
        for i in 0..n {
            assert_eq!(params[&format!("p{i}")], SqlValue::Int(i64::from(i)));
        }
    }
}

#[test]
fn or_and_in_list() {
    let table = users();
    let (sql, params) = Query::new(&table)
        .filter(col("id").in_list(vec![1_u64, 2, 3]).or(col("name").not_eq("root")))
        .to_sql();

    assert_eq!(
        sql,
        r#"SELECT "id", "name" FROM "users" WHERE (("id" IN %(p0)s) OR ("name" != %(p1)s))"#
    );
    assert_eq!(
        params["p0"],
        SqlValue::Array(vec![SqlValue::UInt(1), SqlValue::UInt(2), SqlValue::UInt(3)])
    );
}

#[test]
fn raw_filter_is_verbatim() {
    let table = users();
    let (sql, params) = Query::new(&table)
        .filter_raw("has(tags, 'x')")
        .filter(col("id").lt_eq(3))
        .to_sql();
    assert_eq!(
        sql,
        r#"SELECT "id", "name" FROM "users" WHERE (has(tags, 'x') AND ("id" <= %(p0)s))"#
    );
    assert_params_match(&sql, &params);
}

#[test]
fn expressions_compile_against_any_allocator() {
    let expr = Expr::column("a").and(Expr::raw("1 = 1"));
    let mut compiler = Compiler::new();
    let fragment = expr.to_sql(&mut compiler);
    assert_eq!(fragment.sql(), r#"("a" AND 1 = 1)"#);
    assert!(fragment.params().is_empty());
    assert!(compiler.params().is_empty());
}

// =============================================================================
// Ordering and paging
// =============================================================================

#[test]
fn ordering_and_paging() {
    let table = events();
    let (sql, params) = Query::new(&table)
        .order_by("ts", OrderDirection::Desc)
        .order_by("id", OrderDirection::Asc)
        .limit(50)
        .offset(100)
        .to_sql();

    assert_eq!(
        sql,
        r#"SELECT "id", "ts" FROM "events" ORDER BY "ts" DESC, "id" ASC LIMIT %(p0)s OFFSET %(p1)s"#
    );
    assert_eq!(params["p0"], SqlValue::UInt(50));
    assert_eq!(params["p1"], SqlValue::UInt(100));
}

#[test]
fn compiler_select_with_order_specs() {
    let table = events();
    let order = [OrderBy::parse("-ts"), OrderBy::asc("id")];
    let (sql, params) = Compiler::new().select(&table, None, &order, None, Some(5));
    assert_eq!(
        sql,
        r#"SELECT "id", "ts" FROM "events" ORDER BY "ts" DESC, "id" ASC OFFSET %(p0)s"#
    );
    assert_eq!(params.len(), 1);
}

#[test]
fn count_drops_paging_and_keeps_filter() {
    let table = users();
    let (sql, params) = Query::new(&table)
        .filter(col("id").gt(5))
        .limit(10)
        .offset(20)
        .count_sql();
    assert_eq!(
        sql,
        r#"SELECT count() FROM (SELECT "id", "name" FROM "users" WHERE ("id" > %(p0)s)) AS "sub""#
    );
    assert_eq!(params.len(), 1);
    assert_params_match(&sql, &params);
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn compiling_twice_is_identical() {
    let table = users();
    let query = Query::new(&table)
        .filter(col("name").like("%x%"))
        .filter(col("id").gt_eq(1))
        .order_by("name", OrderDirection::Asc)
        .limit(3);

    let first = query.to_sql();
    let second = query.to_sql();
    assert_eq!(first, second);

    let other_table = users();
    let rebuilt = Query::new(&other_table)
        .filter(col("name").like("%x%"))
        .filter(col("id").gt_eq(1))
        .order_by("name", OrderDirection::Asc)
        .limit(3)
        .to_sql();
    assert_eq!(first, rebuilt);
}

#[test]
fn params_serialize_for_drivers() {
    let table = users();
    let (_, params) = Query::new(&table)
        .filter(col("id").eq(5).and(col("name").like("a%")))
        .limit(10)
        .to_sql();
    assert_eq!(
        serde_json::to_string(&params).unwrap(),
        r#"{"p0":5,"p1":"a%","p2":10}"#
    );
}
