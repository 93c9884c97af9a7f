use newswire_core::error::AppError;
use newswire_core::store::{Row, Value, check_arity};
use newswire_core::traits::Store;
use sqlx::{PgPool, Pool, Postgres, QueryBuilder};

/// PostgreSQL caps a single statement at this many bind parameters.
const MAX_BIND_PARAMS: usize = 65_535;

/// Bulk-insert store over a PostgreSQL pool.
///
/// Each [`create`](Store::create) call runs in one transaction: rows are
/// split into multi-row `INSERT ... VALUES` statements that fit the bind
/// parameter limit, and any failure rolls the whole batch back.
#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl Store for PgStore {
    async fn create(&self, table: &str, columns: &[&str], rows: Vec<Row>) -> Result<(), AppError> {
        check_arity(table, columns, &rows)?;
        let table = quote_ident(table)?;
        let columns = columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Result<Vec<_>, _>>()?;

        if rows.is_empty() {
            return Ok(());
        }

        let rows_per_statement = (MAX_BIND_PARAMS / columns.len()).max(1);
        let insert = format!("INSERT INTO {table} ({}) ", columns.join(", "));

        // Dropping the transaction without commit rolls it back.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(format!("begin: {e}")))?;

        for chunk in rows.chunks(rows_per_statement) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(&insert);
            builder.push_values(chunk, |mut values, row| {
                for value in row.values() {
                    match value {
                        Value::BigInt(v) => {
                            values.push_bind(*v);
                        }
                        Value::Text(v) => {
                            values.push_bind(v.clone());
                        }
                        Value::Timestamp(v) => {
                            values.push_bind(*v);
                        }
                    }
                }
            });
            builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::DatabaseError(format!("insert into {table}: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(format!("commit: {e}")))?;

        tracing::debug!(table = %table, rows = rows.len(), "Bulk insert committed");
        Ok(())
    }

    /// Check database connectivity.
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

/// Double-quote a plain SQL identifier, rejecting anything else.
fn quote_ident(name: &str) -> Result<String, AppError> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid && name.len() <= 63 {
        Ok(format!("\"{name}\""))
    } else {
        Err(AppError::DatabaseError(format!(
            "invalid identifier `{name}`"
        )))
    }
}
