//! `SQLite` implementation of [`HealthProbe`].

use std::future::Future;

use sqlx::SqlitePool;

use smarthome_app::ports::HealthProbe;
use smarthome_domain::error::SmartHomeError;

use crate::error::StorageError;

pub struct SqliteHealthProbe {
    pool: SqlitePool,
}

impl SqliteHealthProbe {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl HealthProbe for SqliteHealthProbe {
    fn ping(&self) -> impl Future<Output = Result<(), SmartHomeError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query("SELECT 1")
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;
            Ok(())
        }
    }
}
