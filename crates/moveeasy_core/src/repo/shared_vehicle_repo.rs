//! Shared vehicle store: sightings reported by users, listed globally.
//!
//! # Invariants
//! - `reported_at` is engine time, set on insert and on every location update.
//! - The global listing runs through the bounded executor.
//! - Location updates and soft-deletes match `(id, user_id)` of the reporter.

use crate::db::Database;
use crate::model::shared_vehicle::{SharedVehicle, VehicleType};
use crate::model::{EntityId, OwnerId};
use crate::repo::bounded::{BoundedExecutor, Deadline};
use crate::repo::soft_delete::{self, found, read_lifecycle};
use crate::repo::{StoreError, StoreResult};
use rusqlite::{params, Connection, Row};

const VEHICLE_TABLE: &str = "shared_vehicle";
const VEHICLE_COLUMNS: &[&str] = &[
    "id",
    "user_id",
    "latitude",
    "longitude",
    "vehicle_type",
    "reported_at",
];

/// Store contract for shared vehicles.
pub trait SharedVehicleRepository {
    fn create_shared_vehicle(&self, vehicle: &SharedVehicle) -> StoreResult<EntityId>;
    fn get_shared_vehicle(&self, id: EntityId) -> StoreResult<Option<SharedVehicle>>;
    /// Lists every active vehicle, failing with `Timeout` past `deadline`.
    fn list_shared_vehicles(&self, deadline: Deadline) -> StoreResult<Vec<SharedVehicle>>;
    /// Moves the vehicle and refreshes `reported_at`.
    fn update_shared_vehicle_location(&self, vehicle: &SharedVehicle) -> StoreResult<bool>;
    fn soft_delete_shared_vehicle(&self, user_id: OwnerId, id: EntityId) -> StoreResult<bool>;
}

/// SQLite-backed shared vehicle store.
#[derive(Clone)]
pub struct SqliteSharedVehicleRepository {
    db: Database,
    bounded: BoundedExecutor,
}

impl SqliteSharedVehicleRepository {
    pub fn new(db: Database) -> Self {
        let bounded = BoundedExecutor::new(db.clone());
        Self { db, bounded }
    }
}

impl SharedVehicleRepository for SqliteSharedVehicleRepository {
    fn create_shared_vehicle(&self, vehicle: &SharedVehicle) -> StoreResult<EntityId> {
        let conn = self.db.conn()?;
        conn.execute(
            &soft_delete::insert_active(
                VEHICLE_TABLE,
                &["user_id", "latitude", "longitude", "vehicle_type"],
                &["reported_at"],
            ),
            params![
                vehicle.user_id,
                vehicle.latitude,
                vehicle.longitude,
                vehicle.vehicle_type.code(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_shared_vehicle(&self, id: EntityId) -> StoreResult<Option<SharedVehicle>> {
        let conn = self.db.conn()?;
        let mut stmt =
            conn.prepare(&soft_delete::select_active(VEHICLE_TABLE, VEHICLE_COLUMNS, &["id"]))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_vehicle_row(row)?));
        }

        Ok(None)
    }

    fn list_shared_vehicles(&self, deadline: Deadline) -> StoreResult<Vec<SharedVehicle>> {
        self.bounded
            .execute("list_shared_vehicles", deadline, query_vehicles)
    }

    fn update_shared_vehicle_location(&self, vehicle: &SharedVehicle) -> StoreResult<bool> {
        let conn = self.db.conn()?;
        let changed = conn.execute(
            &soft_delete::update_active(
                VEHICLE_TABLE,
                &["latitude", "longitude", "vehicle_type"],
                &["reported_at"],
                &["id", "user_id"],
            ),
            params![
                vehicle.latitude,
                vehicle.longitude,
                vehicle.vehicle_type.code(),
                vehicle.id,
                vehicle.user_id,
            ],
        )?;
        Ok(found(changed))
    }

    fn soft_delete_shared_vehicle(&self, user_id: OwnerId, id: EntityId) -> StoreResult<bool> {
        let conn = self.db.conn()?;
        let changed = conn.execute(
            &soft_delete::soft_delete(VEHICLE_TABLE, &["id", "user_id"]),
            params![id, user_id],
        )?;
        Ok(found(changed))
    }
}

fn query_vehicles(conn: &Connection) -> StoreResult<Vec<SharedVehicle>> {
    let sql = format!(
        "{} ORDER BY reported_at DESC, id ASC",
        soft_delete::select_active(VEHICLE_TABLE, VEHICLE_COLUMNS, &[])
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    let mut vehicles = Vec::new();

    while let Some(row) = rows.next()? {
        vehicles.push(parse_vehicle_row(row)?);
    }

    Ok(vehicles)
}

fn parse_vehicle_row(row: &Row<'_>) -> StoreResult<SharedVehicle> {
    let code: i64 = row.get("vehicle_type")?;
    let vehicle_type = VehicleType::from_code(code).ok_or_else(|| {
        StoreError::InvalidData(format!(
            "invalid vehicle type `{code}` in shared_vehicle.vehicle_type"
        ))
    })?;

    Ok(SharedVehicle {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        vehicle_type,
        reported_at: row.get("reported_at")?,
        lifecycle: read_lifecycle(row)?,
    })
}
