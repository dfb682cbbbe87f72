//! Device state — the on/off value tracked for a single device.

use serde::{Deserialize, Serialize};

use crate::id::DeviceId;
use crate::time::{Timestamp, now};

/// Binary power status of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    On,
    #[default]
    Off,
}

impl Status {
    /// Whether the device is switched on.
    #[must_use]
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    /// The opposite status.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::On => Self::Off,
            Self::Off => Self::On,
        }
    }
}

impl From<bool> for Status {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

impl From<Status> for bool {
    fn from(value: Status) -> Self {
        value.is_on()
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
        }
    }
}

/// The persisted state of one device.
///
/// Exactly one state exists per [`DeviceId`]; storage adapters enforce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceState {
    pub id: DeviceId,
    pub status: Status,
    pub last_updated: Timestamp,
}

impl DeviceState {
    /// Build a state for `id` stamped with the current time.
    #[must_use]
    pub fn new(id: DeviceId, status: Status) -> Self {
        Self {
            id,
            status,
            last_updated: now(),
        }
    }

    /// Overwrite the status and refresh `last_updated`.
    pub fn set(&mut self, status: Status, at: Timestamp) {
        self.status = status;
        self.last_updated = at;
    }

    /// Flip the status and refresh `last_updated`.
    pub fn toggle(&mut self, at: Timestamp) {
        self.set(self.status.toggled(), at);
    }
}
