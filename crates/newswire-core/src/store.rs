//! Positional rows for the bulk-insert [`Store`] contract.
//!
//! A [`Row`] is an ordered tuple of primitive values bound to an adjacent
//! column list. Per-table structs implement [`Record`] so that column names
//! and value order are declared once, next to each other.

use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::traits::Store;

/// A primitive column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    BigInt(i64),
    Text(Option<String>),
    Timestamp(DateTime<Utc>),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::BigInt(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(Some(v))
    }
}

impl From<Option<String>> for Value {
    fn from(v: Option<String>) -> Self {
        Value::Text(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

/// One store entry. Column identity is positional.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row(Vec<Value>);

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn arity(&self) -> usize {
        self.0.len()
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

/// A typed row for one table.
pub trait Record {
    const TABLE: &'static str;
    /// Column names in insertion order. Reordering is a breaking change.
    const COLUMNS: &'static [&'static str];

    fn into_row(self) -> Row;
}

/// Submit `records` to `store` as one bulk insert. Empty batches are skipped.
pub async fn insert_records<S, R>(store: &S, records: Vec<R>) -> Result<(), AppError>
where
    S: Store,
    R: Record,
{
    if records.is_empty() {
        return Ok(());
    }
    let rows = records.into_iter().map(Record::into_row).collect();
    store.create(R::TABLE, R::COLUMNS, rows).await
}

/// Reject batches whose rows do not match the column list.
pub fn check_arity(table: &str, columns: &[&str], rows: &[Row]) -> Result<(), AppError> {
    if columns.is_empty() {
        return Err(AppError::DatabaseError(format!(
            "no columns given for table {table}"
        )));
    }
    match rows.iter().position(|row| row.arity() != columns.len()) {
        Some(index) => Err(AppError::DatabaseError(format!(
            "row {index} for table {table} has {} values, expected {} columns",
            rows[index].arity(),
            columns.len()
        ))),
        None => Ok(()),
    }
}
