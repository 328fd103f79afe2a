//! Glue between sea-query built statements and rusqlite.

use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, OptionalExtension, Row, params_from_iter};
use sea_query::Value;
use teamroster_api::db::Built;

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Bool(v) => v.map_or(SqlValue::Null, |b| SqlValue::Integer(b.into())),
        Value::TinyInt(v) => v.map_or(SqlValue::Null, |n| SqlValue::Integer(n.into())),
        Value::SmallInt(v) => v.map_or(SqlValue::Null, |n| SqlValue::Integer(n.into())),
        Value::Int(v) => v.map_or(SqlValue::Null, |n| SqlValue::Integer(n.into())),
        Value::BigInt(v) => v.map_or(SqlValue::Null, SqlValue::Integer),
        Value::TinyUnsigned(v) => v.map_or(SqlValue::Null, |n| SqlValue::Integer(n.into())),
        Value::SmallUnsigned(v) => v.map_or(SqlValue::Null, |n| SqlValue::Integer(n.into())),
        Value::Unsigned(v) => v.map_or(SqlValue::Null, |n| SqlValue::Integer(n.into())),
        Value::BigUnsigned(v) => v.map_or(SqlValue::Null, |n| SqlValue::Integer(n as i64)),
        Value::Float(v) => v.map_or(SqlValue::Null, |f| SqlValue::Real(f.into())),
        Value::Double(v) => v.map_or(SqlValue::Null, SqlValue::Real),
        Value::String(v) => v
            .as_ref()
            .map_or(SqlValue::Null, |s| SqlValue::Text(s.to_string())),
        Value::Char(v) => v.map_or(SqlValue::Null, |c| SqlValue::Text(c.to_string())),
        Value::Bytes(v) => v
            .as_ref()
            .map_or(SqlValue::Null, |b| SqlValue::Blob(b.to_vec())),
        #[allow(unreachable_patterns)]
        _ => SqlValue::Null,
    }
}

fn bind(values: &sea_query::Values) -> impl rusqlite::Params + '_ {
    params_from_iter(values.0.iter().map(to_sql_value))
}

/// Run a write statement, returning the number of affected rows.
pub(crate) fn execute(conn: &Connection, (sql, values): &Built) -> rusqlite::Result<usize> {
    conn.execute(sql, bind(values))
}

/// Fetch at most one row.
pub(crate) fn query_opt<T>(
    conn: &Connection,
    (sql, values): &Built,
    f: impl FnOnce(&Row<'_>) -> rusqlite::Result<T>,
) -> rusqlite::Result<Option<T>> {
    conn.query_row(sql, bind(values), f).optional()
}

/// Fetch every row.
pub(crate) fn query_all<T>(
    conn: &Connection,
    (sql, values): &Built,
    f: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
) -> rusqlite::Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(bind(values), f)?;
    rows.collect()
}

/// Run a `SELECT COUNT(*)` statement.
pub(crate) fn count(conn: &Connection, (sql, values): &Built) -> rusqlite::Result<i64> {
    conn.query_row(sql, bind(values), |row| row.get(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_mapping() {
        assert_eq!(to_sql_value(&Value::BigInt(Some(5))), SqlValue::Integer(5));
        assert_eq!(to_sql_value(&Value::Bool(Some(true))), SqlValue::Integer(1));
        assert_eq!(to_sql_value(&Value::String(None)), SqlValue::Null);
        assert_eq!(
            to_sql_value(&Value::String(Some(Box::new("Alpha".into())))),
            SqlValue::Text("Alpha".into())
        );
    }

    #[test]
    fn test_roundtrip_through_connection() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, label TEXT)")
            .unwrap();
        let insert: Built = (
            "INSERT INTO t (label) VALUES (?)".into(),
            sea_query::Values(vec![Value::String(Some(Box::new("x".into())))]),
        );
        assert_eq!(execute(&conn, &insert).unwrap(), 1);

        let select: Built = (
            "SELECT label FROM t WHERE id = ?".into(),
            sea_query::Values(vec![Value::BigInt(Some(1))]),
        );
        let label: Option<String> = query_opt(&conn, &select, |row| row.get(0)).unwrap();
        assert_eq!(label.as_deref(), Some("x"));

        let missing: Built = (
            "SELECT label FROM t WHERE id = ?".into(),
            sea_query::Values(vec![Value::BigInt(Some(2))]),
        );
        let none: Option<String> = query_opt(&conn, &missing, |row| row.get(0)).unwrap();
        assert_eq!(none, None);
    }
}
