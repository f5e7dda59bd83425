//! Shared vehicle sightings reported by users and listed globally.

use super::{EntityId, EpochMillis, Lifecycle, OwnerId};
use serde::{Deserialize, Serialize};

/// Kind of shared vehicle, persisted as a stable integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Bicycle,
    Scooter,
    Car,
    Motorcycle,
}

impl VehicleType {
    pub fn code(self) -> i64 {
        match self {
            Self::Bicycle => 0,
            Self::Scooter => 1,
            Self::Car => 2,
            Self::Motorcycle => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Bicycle),
            1 => Some(Self::Scooter),
            2 => Some(Self::Car),
            3 => Some(Self::Motorcycle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedVehicle {
    #[serde(default)]
    pub id: EntityId,
    /// Reporting user; the owner key for mutations.
    pub user_id: OwnerId,
    pub latitude: f64,
    pub longitude: f64,
    pub vehicle_type: VehicleType,
    /// Refreshed by the engine on every location report.
    #[serde(default)]
    pub reported_at: EpochMillis,
    #[serde(default)]
    pub lifecycle: Lifecycle,
}

impl SharedVehicle {
    pub fn new(user_id: OwnerId, latitude: f64, longitude: f64, vehicle_type: VehicleType) -> Self {
        Self {
            id: 0,
            user_id,
            latitude,
            longitude,
            vehicle_type,
            reported_at: 0,
            lifecycle: Lifecycle::default(),
        }
    }
}
