//! `SQLite` implementation of [`SchemaSeeder`].
//!
//! Every statement is safe to re-run: tables use `IF NOT EXISTS`, columns
//! added after the first release are checked through `pragma_table_info`
//! before `ALTER TABLE`, and default rows use `ON CONFLICT DO NOTHING`.
//! Statements run in autocommit mode, one at a time.

use std::future::Future;

use sqlx::SqlitePool;

use smarthome_app::ports::{SchemaSeeder, SeedOptions, SeedReport};
use smarthome_domain::device_state::Status;
use smarthome_domain::error::SmartHomeError;
use smarthome_domain::time::now;

use crate::error::StorageError;

const DEVICE_STATES: &str = "device_states";

const CREATE_DEVICE_STATES: &str = r"
    CREATE TABLE IF NOT EXISTS device_states (
        id TEXT PRIMARY KEY NOT NULL,
        status BOOLEAN NOT NULL DEFAULT 0,
        last_updated TEXT NOT NULL DEFAULT '1970-01-01T00:00:00+00:00'
    )
";

/// Columns that older databases may lack, with the DDL that adds them.
const GUARDED_COLUMNS: &[(&str, &str, &str)] = &[(
    DEVICE_STATES,
    "last_updated",
    "ALTER TABLE device_states ADD COLUMN last_updated TEXT NOT NULL DEFAULT '1970-01-01T00:00:00+00:00'",
)];

const COLUMN_EXISTS: &str = "SELECT COUNT(*) FROM pragma_table_info(?) WHERE name = ?";

const INSERT_DEFAULT_DEVICE: &str = r"
    INSERT INTO device_states (id, status, last_updated)
    VALUES (?, ?, ?)
    ON CONFLICT (id) DO NOTHING
";

const DROP_DEVICE_STATES: &str = "DROP TABLE IF EXISTS device_states";

/// `SQLite`-backed schema seeder.
pub struct SqliteSeeder {
    pool: SqlitePool,
}

impl SqliteSeeder {
    /// Create a new seeder using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

async fn ensure_column(
    pool: &SqlitePool,
    table: &str,
    column: &str,
    ddl: &str,
) -> Result<(), StorageError> {
    let (count,): (i64,) = sqlx::query_as(COLUMN_EXISTS)
        .bind(table)
        .bind(column)
        .fetch_one(pool)
        .await?;
    if count == 0 {
        tracing::info!(table, column, "adding missing column");
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}

impl SchemaSeeder for SqliteSeeder {
    fn seed(
        &self,
        options: SeedOptions,
    ) -> impl Future<Output = Result<SeedReport, SmartHomeError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(CREATE_DEVICE_STATES)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            for (table, column, ddl) in GUARDED_COLUMNS {
                ensure_column(&pool, table, column, ddl).await?;
            }

            let mut inserted = 0;
            if let Some(id) = options.default_device {
                inserted += sqlx::query(INSERT_DEFAULT_DEVICE)
                    .bind(id.to_string())
                    .bind(Status::Off.is_on())
                    .bind(now().to_rfc3339())
                    .execute(&pool)
                    .await
                    .map_err(StorageError::from)?
                    .rows_affected();
            }

            Ok(SeedReport::seeded(vec![DEVICE_STATES.to_string()], inserted))
        }
    }

    fn reset(&self) -> impl Future<Output = Result<(), SmartHomeError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(DROP_DEVICE_STATES)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use smarthome_domain::id::DeviceId;

    async fn setup() -> SqlitePool {
        Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap()
        .pool()
        .clone()
    }

    async fn row_count(pool: &SqlitePool) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM device_states")
            .fetch_one(pool)
            .await
            .unwrap();
        count
    }

    async fn table_names(pool: &SqlitePool) -> Vec<String> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .unwrap();
        rows.into_iter().map(|row| row.0).collect()
    }

    #[tokio::test]
    async fn should_create_device_states_table() {
        let pool = setup().await;
        let report = SqliteSeeder::new(pool.clone())
            .seed(SeedOptions::default())
            .await
            .unwrap();

        assert_eq!(report.status, "seeded");
        assert_eq!(table_names(&pool).await, vec!["device_states"]);
    }

    #[tokio::test]
    async fn should_not_duplicate_rows_when_seeded_twice() {
        let pool = setup().await;
        let seeder = SqliteSeeder::new(pool.clone());
        let options = SeedOptions {
            default_device: Some(DeviceId::new()),
        };

        let first = seeder.seed(options).await.unwrap();
        let second = seeder.seed(options).await.unwrap();

        assert_eq!(first.inserted, 1);
        assert_eq!(second.inserted, 0);
        assert_eq!(row_count(&pool).await, 1);
    }

    #[tokio::test]
    async fn should_add_missing_column_to_legacy_table() {
        let pool = setup().await;
        sqlx::query("CREATE TABLE device_states (id TEXT PRIMARY KEY NOT NULL, status BOOLEAN NOT NULL DEFAULT 0)")
            .execute(&pool)
            .await
            .unwrap();

        SqliteSeeder::new(pool.clone())
            .seed(SeedOptions::default())
            .await
            .unwrap();

        let (count,): (i64,) = sqlx::query_as(COLUMN_EXISTS)
            .bind(DEVICE_STATES)
            .bind("last_updated")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn should_drop_tables_when_reset() {
        let pool = setup().await;
        let seeder = SqliteSeeder::new(pool.clone());
        seeder.seed(SeedOptions::default()).await.unwrap();

        seeder.reset().await.unwrap();

        assert!(table_names(&pool).await.is_empty());
    }

    #[tokio::test]
    async fn should_tolerate_reset_on_empty_database() {
        let pool = setup().await;
        assert!(SqliteSeeder::new(pool).reset().await.is_ok());
    }
}
