//! `SQLite` implementation of [`DeviceStateRepository`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use smarthome_app::ports::DeviceStateRepository;
use smarthome_domain::device_state::{DeviceState, Status};
use smarthome_domain::error::SmartHomeError;
use smarthome_domain::id::DeviceId;
use smarthome_domain::time::{Timestamp, parse_rfc3339};

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`DeviceState`].
struct Wrapper(DeviceState);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<DeviceState> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let status: bool = row.try_get("status")?;
        let last_updated: String = row.try_get("last_updated")?;

        let id = DeviceId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let last_updated =
            parse_rfc3339(&last_updated).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(DeviceState {
            id,
            status: Status::from(status),
            last_updated,
        }))
    }
}

const INSERT: &str = "INSERT INTO device_states (id, status, last_updated) VALUES (?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT id, status, last_updated FROM device_states WHERE id = ?";
const SELECT_ALL: &str = "SELECT id, status, last_updated FROM device_states ORDER BY id";

const UPSERT: &str = r"
    INSERT INTO device_states (id, status, last_updated)
    VALUES (?, ?, ?)
    ON CONFLICT (id) DO UPDATE
        SET status = excluded.status,
            last_updated = excluded.last_updated
    RETURNING id, status, last_updated
";

// Single statement: concurrent toggles serialize on the row write.
const TOGGLE: &str = r"
    UPDATE device_states
    SET status = NOT status, last_updated = ?
    WHERE id = ?
    RETURNING id, status, last_updated
";

/// `SQLite`-backed device state repository.
#[derive(Clone)]
pub struct SqliteDeviceStateRepository {
    pool: SqlitePool,
}

impl SqliteDeviceStateRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl DeviceStateRepository for SqliteDeviceStateRepository {
    fn create(
        &self,
        state: DeviceState,
    ) -> impl Future<Output = Result<DeviceState, SmartHomeError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(state.id.to_string())
                .bind(state.status.is_on())
                .bind(state.last_updated.to_rfc3339())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(state)
        }
    }

    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<DeviceState>, SmartHomeError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<DeviceState>, SmartHomeError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn upsert(
        &self,
        state: DeviceState,
    ) -> impl Future<Output = Result<DeviceState, SmartHomeError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Wrapper = sqlx::query_as(UPSERT)
                .bind(state.id.to_string())
                .bind(state.status.is_on())
                .bind(state.last_updated.to_rfc3339())
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.0)
        }
    }

    fn toggle(
        &self,
        id: DeviceId,
        at: Timestamp,
    ) -> impl Future<Output = Result<Option<DeviceState>, SmartHomeError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(TOGGLE)
                .bind(at.to_rfc3339())
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }
}
