//! End-to-end pagination against an in-memory SQLite database.
//!
//! Every strategy is driven through `SqlQuery<Sqlite, _>`, so these tests
//! exercise the rendered SQL as well as the paginator logic.

use anyhow::Result;
use mik_paginate::prelude::*;
use mik_paginate::{Sqlite, Statement};
use rusqlite::types::{Value as SqlValue, ValueRef};

/// `Connection` over a rusqlite handle.
#[derive(Debug)]
struct Db(rusqlite::Connection);

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Int(i) => SqlValue::Integer(*i),
        Value::Float(f) => SqlValue::Real(*f),
        Value::String(s) => SqlValue::Text(s.clone()),
    }
}

fn from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null | ValueRef::Blob(_) => Value::Null,
        ValueRef::Integer(i) => Value::Int(i),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
    }
}

impl Connection for Db {
    type Error = rusqlite::Error;

    fn fetch_all(&self, statement: &Statement) -> Result<Vec<Row>, Self::Error> {
        let mut stmt = self.0.prepare(&statement.sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let params = rusqlite::params_from_iter(statement.params.iter().map(to_sql));
        let rows = stmt.query_map(params, |row| {
            let mut out = Row::new();
            for (idx, name) in columns.iter().enumerate() {
                out.insert(name.as_str(), from_sql(row.get_ref(idx)?));
            }
            Ok(out)
        })?;
        rows.collect()
    }
}

/// uniqueCol 1..=11, nonUniqueCol = uniqueCol rounded up to even.
fn fixture() -> Result<Db> {
    let conn = rusqlite::Connection::open_in_memory()?;
    conn.execute_batch(
        "CREATE TABLE test (uniqueCol INTEGER PRIMARY KEY, nonUniqueCol INTEGER NOT NULL);",
    )?;
    for i in 1..=11_i64 {
        conn.execute(
            "INSERT INTO test (uniqueCol, nonUniqueCol) VALUES (?1, ?2)",
            [i, i + i % 2],
        )?;
    }
    Ok(Db(conn))
}

fn base(db: &Db) -> SqlQuery<Sqlite, &Db> {
    sqlite(db, "test")
}

fn cursor() -> CursorConfig {
    CursorConfig::new()
        .primary_sort("nonUniqueCol", "asc")
        .backup_sort("uniqueCol", "asc")
        .limit(3)
        .encode_tokens(false)
}

fn ids(page: &Page<impl Sized>) -> Vec<i64> {
    page.items()
        .filter_map(|row| match row.get("uniqueCol") {
            Some(Value::Int(i)) => Some(*i),
            _ => None,
        })
        .collect()
}

fn markers(result: &PaginationResult<String>) -> (Option<&str>, Option<&str>) {
    (
        result.previous().map(String::as_str),
        result.next().map(String::as_str),
    )
}

// =============================================================================
// Cursor strategy
// =============================================================================

#[test]
fn cursor_forward_walk() -> Result<()> {
    let db = fixture()?;
    let query = base(&db);

    let cases: [(Option<&str>, &[i64], Option<&str>, Option<&str>); 4] = [
        (None, &[1, 2, 3], None, Some("4|3")),
        (Some("4|3"), &[4, 5, 6], Some("4|4"), Some("6|6")),
        (Some("6|6"), &[7, 8, 9], Some("8|7"), Some("10|9")),
        (Some("10|9"), &[10, 11], Some("10|10"), None),
    ];

    for (after, expected, previous, next) in cases {
        let config = match after {
            Some(token) => cursor().after(token),
            None => cursor(),
        };
        let page = paginate_cursor(&query, &config)?;
        assert_eq!(ids(&page), expected, "after {after:?}");
        assert_eq!(markers(&page.result), (previous, next), "after {after:?}");
        assert_eq!(page.result.current().map(String::as_str), after);
    }
    Ok(())
}

#[test]
fn cursor_backward_walk() -> Result<()> {
    let db = fixture()?;
    let query = base(&db);

    let cases: [(&str, &[i64], Option<&str>, Option<&str>); 4] = [
        ("100|100", &[9, 10, 11], Some("10|9"), None),
        ("10|9", &[6, 7, 8], Some("6|6"), Some("8|8")),
        ("6|6", &[3, 4, 5], Some("4|3"), Some("6|5")),
        ("4|3", &[1, 2], None, Some("2|2")),
    ];

    for (before, expected, previous, next) in cases {
        let page = paginate_cursor(&query, &cursor().before(before))?;
        assert_eq!(ids(&page), expected, "before {before}");
        assert_eq!(markers(&page.result), (previous, next), "before {before}");
    }
    Ok(())
}

#[test]
fn cursor_reverse_results_keeps_markers() -> Result<()> {
    let db = fixture()?;
    let query = base(&db);

    let page = paginate_cursor(&query, &cursor().after("4|3").reverse_results())?;
    assert_eq!(ids(&page), [6, 5, 4]);
    assert_eq!(markers(&page.result), (Some("4|4"), Some("6|6")));
    Ok(())
}

#[test]
fn cursor_descending_walk_covers_table() -> Result<()> {
    let db = fixture()?;
    let query = base(&db);
    let config = CursorConfig::new()
        .primary_sort("nonUniqueCol", "desc")
        .backup_sort("uniqueCol", "desc")
        .limit(4);

    let mut seen = Vec::new();
    let mut page = paginate_cursor(&query, &config)?;
    loop {
        seen.extend(ids(&page));
        let Some(token) = page.result.next().cloned() else {
            break;
        };
        page = paginate_cursor(&query, &config.clone().after(token))?;
    }
    assert_eq!(seen, [11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1]);
    Ok(())
}

#[test]
fn cursor_encoded_tokens_round_trip() -> Result<()> {
    let db = fixture()?;
    let query = base(&db);
    let config = cursor().encode_tokens(true);

    let first = paginate_cursor(&query, &config)?;
    let next = first.result.next().cloned().unwrap_or_default();
    assert_eq!(next, "AUjm");

    let second = paginate_cursor(&query, &config.after(next))?;
    assert_eq!(ids(&second), [4, 5, 6]);
    Ok(())
}

#[test]
fn cursor_respects_base_filters() -> Result<()> {
    let db = fixture()?;
    let query = base(&db)
        .filter(Predicate::compare("uniqueCol", Comparison::Lte, "ceiling"))
        .bind("ceiling", 7);

    let page = paginate_cursor(&query, &cursor().after("6|6"))?;
    assert_eq!(ids(&page), [7]);
    assert_eq!(markers(&page.result), (Some("8|7"), None));
    Ok(())
}

/// Follow `next` markers from the first page, collecting every `id`.
fn walk(query: &SqlQuery<Sqlite, &Db>, config: &CursorConfig) -> Result<Vec<Value>> {
    let mut seen = Vec::new();
    let mut page = paginate_cursor(query, config)?;
    loop {
        seen.extend(page.items().filter_map(|row| row.get("id").cloned()));
        let Some(token) = page.result.next().cloned() else {
            return Ok(seen);
        };
        page = paginate_cursor(query, &config.clone().after(token))?;
    }
}

fn id_values(range: std::ops::RangeInclusive<i64>) -> Vec<Value> {
    range.map(Value::Int).collect()
}

#[test]
fn cursor_walks_zero_padded_text_keys() -> Result<()> {
    let conn = rusqlite::Connection::open_in_memory()?;
    conn.execute_batch("CREATE TABLE codes (id INTEGER PRIMARY KEY, code TEXT NOT NULL);")?;
    for i in 1..=11_i64 {
        conn.execute(
            "INSERT INTO codes (id, code) VALUES (?1, ?2)",
            rusqlite::params![i, format!("{i:03}")],
        )?;
    }
    let db = Db(conn);
    let query = sqlite(&db, "codes");
    let config = CursorConfig::new()
        .primary_sort("code", "asc")
        .backup_sort("id", "asc")
        .limit(4);

    assert_eq!(walk(&query, &config)?, id_values(1..=11));

    let first = paginate_cursor(&query, &config.clone().encode_tokens(false))?;
    assert_eq!(first.result.next().map(String::as_str), Some("004|4"));
    Ok(())
}

#[test]
fn cursor_keys_processor_restores_integer_keys() -> Result<()> {
    fn to_int(value: Value) -> Value {
        match value {
            Value::String(s) => s.parse().map_or(Value::String(s), Value::Int),
            other => other,
        }
    }

    // no declared type, so bound text is never converted to a number
    let conn = rusqlite::Connection::open_in_memory()?;
    conn.execute_batch("CREATE TABLE seqs (id INTEGER PRIMARY KEY, seq);")?;
    for i in 1..=11_i64 {
        conn.execute("INSERT INTO seqs (id, seq) VALUES (?1, ?2)", [i, i + i % 2])?;
    }
    let db = Db(conn);
    let query = sqlite(&db, "seqs");
    let config = CursorConfig::new()
        .primary_sort("seq", "asc")
        .backup_sort("id", "asc")
        .limit(4);

    let raw = paginate_cursor(&query, &config.clone().encode_tokens(false).after("4|4"))?;
    assert_eq!(raw.result.results_count(), 0);

    let typed = config.keys_processor(|primary, backup| (to_int(primary), to_int(backup)));
    assert_eq!(walk(&query, &typed)?, id_values(1..=11));
    Ok(())
}

#[test]
fn cursor_connection_errors_propagate() -> Result<()> {
    let db = fixture()?;
    let query = sqlite(&db, "missing_table");

    let err = paginate_cursor(&query, &cursor()).unwrap_err();
    assert!(matches!(err, PaginationError::Execution(_)));
    assert!(!err.is_client_error());
    Ok(())
}

#[test]
fn cursor_bad_token_is_client_error() -> Result<()> {
    let db = fixture()?;
    let err = paginate_cursor(&base(&db), &cursor().after("no-delimiter")).unwrap_err();
    assert_eq!(err.as_token(), Some(&TokenError::MissingDelimiter));
    assert!(err.is_client_error());
    Ok(())
}

// =============================================================================
// Offset and null strategies
// =============================================================================

#[test]
fn offset_walk() -> Result<()> {
    let db = fixture()?;
    let query = base(&db);
    let config = OffsetConfig::new()
        .primary_sort("nonUniqueCol", "asc")
        .backup_sort("uniqueCol", "asc")
        .per_page(3);

    let first = paginate_offset(&query, &config.clone().page(1))?;
    assert_eq!(ids(&first), [1, 2, 3]);
    assert_eq!((first.result.previous(), first.result.next()), (None, Some(&2)));

    let last = paginate_offset(&query, &config.page(4))?;
    assert_eq!(ids(&last), [10, 11]);
    assert_eq!((last.result.previous(), last.result.next()), (Some(&3), None));
    assert_eq!(last.result.results_count(), 2);
    Ok(())
}

#[test]
fn null_strategy_caps_rows() -> Result<()> {
    let db = fixture()?;
    let query = base(&db);

    let all = paginate_null(&query, &NullConfig::new())?;
    assert_eq!(all.result.results_count(), 11);

    let mut paginator = NullPaginator::new(query, NullConfig::new().limit(Some(5)));
    let result = paginator.paginate()?;
    assert_eq!(result.results_count(), 5);
    assert_eq!(result.previous(), None);
    assert_eq!(paginator.take_items().len(), 5);
    Ok(())
}
