//! [`JsonFileStore`] — one device state persisted in one JSON file.
//!
//! The file holds only the status/timestamp pair; the device id is implicit
//! and supplied at construction. Clones share the same lock, so the
//! repository, seeder, and health probe can be handed out separately.

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use smarthome_app::ports::{
    DeviceStateRepository, HealthProbe, SchemaSeeder, SeedOptions, SeedReport,
};
use smarthome_domain::device_state::{DeviceState, Status};
use smarthome_domain::error::{ConflictError, SmartHomeError};
use smarthome_domain::id::DeviceId;
use smarthome_domain::time::{Timestamp, now};

use crate::error::StorageError;

/// On-disk layout of the state file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct StateFile {
    status: bool,
    last_updated: Timestamp,
}

impl StateFile {
    fn into_state(self, id: DeviceId) -> DeviceState {
        DeviceState {
            id,
            status: Status::from(self.status),
            last_updated: self.last_updated,
        }
    }
}

impl From<&DeviceState> for StateFile {
    fn from(state: &DeviceState) -> Self {
        Self {
            status: state.status.is_on(),
            last_updated: state.last_updated,
        }
    }
}

struct Inner {
    path: PathBuf,
    device: DeviceId,
    write_lock: Mutex<()>,
}

/// File-backed store holding a single global device state.
#[derive(Clone)]
pub struct JsonFileStore {
    inner: Arc<Inner>,
}

impl JsonFileStore {
    /// Create a store for `device` persisted at `path`.
    ///
    /// Nothing touches the disk until the first operation.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, device: DeviceId) -> Self {
        Self {
            inner: Arc::new(Inner {
                path: path.into(),
                device,
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// Location of the state file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// The only device this store manages.
    #[must_use]
    pub fn device(&self) -> DeviceId {
        self.inner.device
    }

    fn file_name(&self) -> String {
        let path = &self.inner.path;
        path.file_name().map_or_else(
            || path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        )
    }

    async fn read(&self) -> Result<Option<StateFile>, StorageError> {
        match tokio::fs::read(&self.inner.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn write(&self, file: StateFile) -> Result<(), StorageError> {
        let path = &self.inner.path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let payload = serde_json::to_vec_pretty(&file)?;
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, payload).await?;
        tokio::fs::rename(&temp_path, path).await?;

        tracing::debug!(path = %path.display(), status = file.status, "state file written");
        Ok(())
    }

    fn foreign(&self, requested: DeviceId) -> SmartHomeError {
        ConflictError::ForeignDevice {
            requested: requested.to_string(),
            managed: self.inner.device.to_string(),
        }
        .into()
    }
}

impl DeviceStateRepository for JsonFileStore {
    /// Writes the single state; the generated id is replaced by the managed one.
    fn create(
        &self,
        state: DeviceState,
    ) -> impl Future<Output = Result<DeviceState, SmartHomeError>> + Send {
        let store = self.clone();
        async move {
            let _guard = store.inner.write_lock.lock().await;
            if store.read().await?.is_some() {
                return Err(ConflictError::AlreadyExists.into());
            }

            let file = StateFile::from(&state);
            store.write(file).await?;
            Ok(file.into_state(store.inner.device))
        }
    }

    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<DeviceState>, SmartHomeError>> + Send {
        let store = self.clone();
        async move {
            if id != store.inner.device {
                return Ok(None);
            }
            let file = store.read().await?;
            Ok(file.map(|f| f.into_state(id)))
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<DeviceState>, SmartHomeError>> + Send {
        let store = self.clone();
        async move {
            let file = store.read().await?;
            Ok(file
                .map(|f| f.into_state(store.inner.device))
                .into_iter()
                .collect())
        }
    }

    fn upsert(
        &self,
        state: DeviceState,
    ) -> impl Future<Output = Result<DeviceState, SmartHomeError>> + Send {
        let store = self.clone();
        async move {
            if state.id != store.inner.device {
                return Err(store.foreign(state.id));
            }

            let _guard = store.inner.write_lock.lock().await;
            store.write(StateFile::from(&state)).await?;
            Ok(state)
        }
    }

    fn toggle(
        &self,
        id: DeviceId,
        at: Timestamp,
    ) -> impl Future<Output = Result<Option<DeviceState>, SmartHomeError>> + Send {
        let store = self.clone();
        async move {
            if id != store.inner.device {
                return Ok(None);
            }

            let _guard = store.inner.write_lock.lock().await;
            let Some(current) = store.read().await? else {
                return Ok(None);
            };

            let mut state = current.into_state(id);
            state.toggle(at);
            store.write(StateFile::from(&state)).await?;
            Ok(Some(state))
        }
    }
}

impl SchemaSeeder for JsonFileStore {
    /// Writes the default state (off) when requested and the file is missing.
    fn seed(
        &self,
        options: SeedOptions,
    ) -> impl Future<Output = Result<SeedReport, SmartHomeError>> + Send {
        let store = self.clone();
        async move {
            let _guard = store.inner.write_lock.lock().await;

            let mut inserted = 0;
            if let Some(requested) = options.default_device {
                if requested != store.inner.device {
                    tracing::warn!(
                        %requested,
                        managed = %store.inner.device,
                        "state file only holds its managed device, seeding that one"
                    );
                }
                if store.read().await?.is_none() {
                    store
                        .write(StateFile {
                            status: Status::Off.is_on(),
                            last_updated: now(),
                        })
                        .await?;
                    inserted = 1;
                }
            }

            Ok(SeedReport::seeded(vec![store.file_name()], inserted))
        }
    }

    fn reset(&self) -> impl Future<Output = Result<(), SmartHomeError>> + Send {
        let store = self.clone();
        async move {
            let _guard = store.inner.write_lock.lock().await;
            match tokio::fs::remove_file(&store.inner.path).await {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(err) => Err(StorageError::from(err).into()),
            }
        }
    }
}

impl HealthProbe for JsonFileStore {
    /// Parses the file when present, otherwise checks its directory exists.
    fn ping(&self) -> impl Future<Output = Result<(), SmartHomeError>> + Send {
        let store = self.clone();
        async move {
            if store.read().await?.is_some() {
                return Ok(());
            }
            let dir = store
                .inner
                .path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            tokio::fs::metadata(dir).await.map_err(StorageError::from)?;
            Ok(())
        }
    }
}
