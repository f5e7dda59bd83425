//! Entity model for accounts, personal data, shared vehicles and bus lines.
//!
//! # Responsibility
//! - Define the data structures persisted by the repository layer.
//! - Model the soft-delete lifecycle explicitly instead of bare nullables.
//!
//! # Invariants
//! - Surrogate id `0` means "not yet persisted".
//! - Lifecycle timestamps are assigned by the engine, never by callers.
//! - Deletion is a tombstone (`deleted_at`), never a physical removal.

pub mod address;
pub mod bus;
pub mod contact;
pub mod shared_vehicle;
pub mod user;
pub mod validation;

use serde::{Deserialize, Serialize};

/// Engine-assigned surrogate key. `0` marks an entity that was never stored.
pub type EntityId = i64;

/// Surrogate key of the user owning an entity.
pub type OwnerId = i64;

/// Unix epoch milliseconds as evaluated by the database engine.
pub type EpochMillis = i64;

/// Visibility state derived from the deletion timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityStatus {
    Active,
    Deleted,
}

/// Audit timestamps shared by every entity family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifecycle {
    /// Set once on insert.
    pub created_at: EpochMillis,
    /// `None` until the first mutation.
    pub updated_at: Option<EpochMillis>,
    /// Tombstone. `Some` means the row is invisible to every store operation.
    pub deleted_at: Option<EpochMillis>,
}

impl Lifecycle {
    pub fn status(&self) -> EntityStatus {
        match self.deleted_at {
            None => EntityStatus::Active,
            Some(_) => EntityStatus::Deleted,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status() == EntityStatus::Active
    }
}
