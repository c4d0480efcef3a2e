use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::ports::Database;
use crate::record::RecordSet;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::{debug, info};

/// Postgres-backed `Database` over a sqlx pool.
///
/// Table and column names are interpolated unquoted, as the original loader
/// does; they derive from controlled object keys, and unquoted identifiers
/// fold to lower case server-side.
pub struct PostgresDatabase {
    pool: PgPool,
}

impl PostgresDatabase {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(&config.connection_url())
            .await?;
        info!("Connected to PostgreSQL at {}:{}", config.host, config.port);
        Ok(Self { pool })
    }
}

#[async_trait]
impl Database for PostgresDatabase {
    async fn replace_table(&self, table: &str, records: &RecordSet) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(&mut *tx)
            .await?;

        let column_defs = records
            .columns
            .iter()
            .map(|col| format!("{} TEXT", col))
            .collect::<Vec<_>>()
            .join(", ");
        sqlx::query(&format!("CREATE TABLE {} ({})", table, column_defs))
            .execute(&mut *tx)
            .await?;
        debug!("Created table: {}", table);

        let mut inserted = 0;
        if !records.rows.is_empty() {
            // One multi-row VALUES statement with bind parameters
            let width = records.columns.len();
            let mut placeholder = 1;
            let tuples = records
                .rows
                .iter()
                .map(|_| {
                    let tuple = (0..width)
                        .map(|_| {
                            let p = format!("${}", placeholder);
                            placeholder += 1;
                            p
                        })
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!("({})", tuple)
                })
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "INSERT INTO {} ({}) VALUES {}",
                table,
                records.columns.join(", "),
                tuples
            );

            let mut query = sqlx::query(&sql);
            for row in &records.rows {
                for cell in row {
                    query = query.bind(cell);
                }
            }
            inserted = query.execute(&mut *tx).await?.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn list_base_tables(&self) -> Result<Vec<String>> {
        let rows = sqlx::query(
            "SELECT table_name \
             FROM information_schema.tables \
             WHERE table_schema = 'public' AND table_type = 'BASE TABLE'",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .iter()
            .map(|row| row.get::<String, _>("table_name"))
            .collect())
    }

    async fn read_table(&self, table: &str) -> Result<RecordSet> {
        let column_rows = sqlx::query(
            "SELECT column_name \
             FROM information_schema.columns \
             WHERE table_name = $1 \
             ORDER BY ordinal_position",
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?;
        let columns: Vec<String> = column_rows
            .iter()
            .map(|row| row.get::<String, _>("column_name"))
            .collect();

        let sql = format!("SELECT {} FROM {}", columns.join(", "), table);
        let data_rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        let mut rows = Vec::with_capacity(data_rows.len());
        for data_row in &data_rows {
            let row = (0..columns.len())
                .map(|i| {
                    data_row
                        .try_get::<Option<String>, _>(i)
                        .map(Option::unwrap_or_default)
                })
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows.push(row);
        }

        Ok(RecordSet::new(columns, rows))
    }
}

/// In-memory `Database` for development and testing. Mirrors Postgres
/// identifier folding by lower-casing table and column names on write.
#[derive(Default)]
pub struct InMemoryDatabase {
    tables: Mutex<BTreeMap<String, RecordSet>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Database for InMemoryDatabase {
    async fn replace_table(&self, table: &str, records: &RecordSet) -> Result<u64> {
        let columns = records
            .columns
            .iter()
            .map(|col| col.to_lowercase())
            .collect();
        let stored = RecordSet::new(columns, records.rows.clone());
        let inserted = stored.len() as u64;
        self.tables
            .lock()
            .unwrap()
            .insert(table.to_lowercase(), stored);
        debug!("Replaced in-memory table '{}'", table);
        Ok(inserted)
    }

    async fn list_base_tables(&self) -> Result<Vec<String>> {
        Ok(self.tables.lock().unwrap().keys().cloned().collect())
    }

    async fn read_table(&self, table: &str) -> Result<RecordSet> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .ok_or_else(|| sqlx::Error::RowNotFound.into())
    }
}
