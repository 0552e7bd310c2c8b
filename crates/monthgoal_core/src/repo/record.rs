//! Generic row mapping shared by the entity gateways.
//!
//! Every entity describes itself through a [`TableSchema`] and binds its
//! fields in schema column order; the helpers here build and run the SQL.

use super::{RepoError, RepoResult};
use crate::db::schema::TableSchema;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use uuid::Uuid;

pub(crate) trait Record: Sized {
    const SCHEMA: TableSchema;

    fn id(&self) -> Uuid;

    /// Field values in `SCHEMA.columns` order.
    fn to_values(&self) -> Vec<Value>;

    fn from_row(row: &Row<'_>) -> RepoResult<Self>;

    fn validate(&self) -> RepoResult<()> {
        Ok(())
    }
}

pub(crate) fn insert<R: Record>(conn: &Connection, record: &R) -> RepoResult<Uuid> {
    record.validate()?;
    conn.execute(&R::SCHEMA.insert_sql(), params_from_iter(record.to_values()))?;
    Ok(record.id())
}

pub(crate) fn upsert<R: Record>(conn: &Connection, record: &R) -> RepoResult<Uuid> {
    record.validate()?;
    conn.execute(&R::SCHEMA.upsert_sql(), params_from_iter(record.to_values()))?;
    Ok(record.id())
}

pub(crate) fn update<R: Record>(conn: &Connection, record: &R) -> RepoResult<()> {
    record.validate()?;
    let changed = conn.execute(&R::SCHEMA.update_sql(), params_from_iter(record.to_values()))?;
    if changed == 0 {
        return Err(RepoError::NotFound(record.id()));
    }
    Ok(())
}

pub(crate) fn delete<R: Record>(conn: &Connection, id: Uuid) -> RepoResult<()> {
    let changed = conn.execute(&R::SCHEMA.delete_sql(), [id.to_string()])?;
    if changed == 0 {
        return Err(RepoError::NotFound(id));
    }
    Ok(())
}

pub(crate) fn get<R: Record>(conn: &Connection, id: Uuid) -> RepoResult<Option<R>> {
    let clause = format!("WHERE {} = ?1", R::SCHEMA.key_column);
    let mut found = select_where::<R>(conn, &clause, vec![Value::Text(id.to_string())])?;
    Ok(found.pop())
}

/// Runs `SELECT <columns> FROM <table> <clause>` and maps every row.
pub(crate) fn select_where<R: Record>(
    conn: &Connection,
    clause: &str,
    bind_values: Vec<Value>,
) -> RepoResult<Vec<R>> {
    let sql = format!("{} {clause};", R::SCHEMA.select_sql());
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params_from_iter(bind_values))?;
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        records.push(R::from_row(row)?);
    }
    Ok(records)
}

/// Deletes rows matching `column = id`, returning the number removed.
pub(crate) fn delete_by_column<R: Record>(
    conn: &Connection,
    column: &str,
    id: Uuid,
) -> RepoResult<usize> {
    let sql = format!("DELETE FROM {} WHERE {column} = ?1;", R::SCHEMA.table);
    Ok(conn.execute(&sql, [id.to_string()])?)
}

pub(crate) fn uuid_value(id: Uuid) -> Value {
    Value::Text(id.to_string())
}

pub(crate) fn opt_uuid_value(id: Option<Uuid>) -> Value {
    id.map_or(Value::Null, uuid_value)
}

pub(crate) fn text_value(value: &str) -> Value {
    Value::Text(value.to_string())
}

pub(crate) fn opt_text_value(value: Option<&str>) -> Value {
    value.map_or(Value::Null, text_value)
}

pub(crate) fn bool_value(value: bool) -> Value {
    Value::Integer(if value { 1 } else { 0 })
}

pub(crate) fn read_uuid(row: &Row<'_>, column: &str, table: &str) -> RepoResult<Uuid> {
    let text: String = row.get(column)?;
    parse_uuid(&text, column, table)
}

pub(crate) fn read_opt_uuid(row: &Row<'_>, column: &str, table: &str) -> RepoResult<Option<Uuid>> {
    match row.get::<_, Option<String>>(column)? {
        Some(text) => parse_uuid(&text, column, table).map(Some),
        None => Ok(None),
    }
}

pub(crate) fn read_bool(row: &Row<'_>, column: &str, table: &str) -> RepoResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {table}.{column}"
        ))),
    }
}

fn parse_uuid(text: &str, column: &str, table: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{text}` in {table}.{column}"))
    })
}
