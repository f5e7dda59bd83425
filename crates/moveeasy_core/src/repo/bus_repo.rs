//! Bus reference-data store: stops and the lines connecting two stops.
//!
//! # Invariants
//! - Reference rows have no owner key; mutations match on `id` only.
//! - A line is visible only while the line and both terminal stops are active.
//! - Listings run through the bounded executor.

use crate::db::Database;
use crate::model::bus::{BusLine, BusStop, NewBusLine};
use crate::model::{EntityId, Lifecycle};
use crate::repo::bounded::{BoundedExecutor, Deadline};
use crate::repo::soft_delete::{self, active_on, found, read_lifecycle};
use crate::repo::StoreResult;
use rusqlite::{params, Connection, OptionalExtension, Row};

const STOP_TABLE: &str = "bus_stop";
const LINE_TABLE: &str = "bus_line";
const STOP_FIELDS: &[&str] = &["name", "latitude", "longitude"];
const STOP_COLUMNS: &[&str] = &["id", "name", "latitude", "longitude"];

/// Store contract for bus stops and lines.
pub trait BusRepository {
    fn create_bus_stop(&self, stop: &BusStop) -> StoreResult<EntityId>;
    fn get_bus_stop(&self, id: EntityId) -> StoreResult<Option<BusStop>>;
    fn list_bus_stops(&self, deadline: Deadline) -> StoreResult<Vec<BusStop>>;
    fn update_bus_stop(&self, stop: &BusStop) -> StoreResult<bool>;
    fn soft_delete_bus_stop(&self, id: EntityId) -> StoreResult<bool>;

    fn create_bus_line(&self, line: &NewBusLine) -> StoreResult<EntityId>;
    /// Returns the line with both stops resolved, or `None` when the line or
    /// either stop is missing or deleted.
    fn get_bus_line(&self, id: EntityId) -> StoreResult<Option<BusLine>>;
    fn list_bus_lines(&self, deadline: Deadline) -> StoreResult<Vec<BusLine>>;
    fn soft_delete_bus_line(&self, id: EntityId) -> StoreResult<bool>;
}

/// SQLite-backed bus store.
#[derive(Clone)]
pub struct SqliteBusRepository {
    db: Database,
    bounded: BoundedExecutor,
}

impl SqliteBusRepository {
    pub fn new(db: Database) -> Self {
        let bounded = BoundedExecutor::new(db.clone());
        Self { db, bounded }
    }
}

impl BusRepository for SqliteBusRepository {
    fn create_bus_stop(&self, stop: &BusStop) -> StoreResult<EntityId> {
        let conn = self.db.conn()?;
        conn.execute(
            &soft_delete::insert_active(STOP_TABLE, STOP_FIELDS, &[]),
            params![stop.name, stop.latitude, stop.longitude],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_bus_stop(&self, id: EntityId) -> StoreResult<Option<BusStop>> {
        let conn = self.db.conn()?;
        let stop = conn
            .query_row(
                &soft_delete::select_active(STOP_TABLE, STOP_COLUMNS, &["id"]),
                [id],
                parse_stop_row,
            )
            .optional()?;
        Ok(stop)
    }

    fn list_bus_stops(&self, deadline: Deadline) -> StoreResult<Vec<BusStop>> {
        self.bounded.execute("list_bus_stops", deadline, query_stops)
    }

    fn update_bus_stop(&self, stop: &BusStop) -> StoreResult<bool> {
        let conn = self.db.conn()?;
        let changed = conn.execute(
            &soft_delete::update_active(STOP_TABLE, STOP_FIELDS, &[], &["id"]),
            params![stop.name, stop.latitude, stop.longitude, stop.id],
        )?;
        Ok(found(changed))
    }

    fn soft_delete_bus_stop(&self, id: EntityId) -> StoreResult<bool> {
        let conn = self.db.conn()?;
        let changed = conn.execute(&soft_delete::soft_delete(STOP_TABLE, &["id"]), [id])?;
        Ok(found(changed))
    }

    fn create_bus_line(&self, line: &NewBusLine) -> StoreResult<EntityId> {
        let conn = self.db.conn()?;
        conn.execute(
            &soft_delete::insert_active(LINE_TABLE, &["name", "bus_init", "bus_end"], &[]),
            params![line.name, line.bus_init, line.bus_end],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_bus_line(&self, id: EntityId) -> StoreResult<Option<BusLine>> {
        let conn = self.db.conn()?;
        let sql = format!("{} AND l.id = ?1", line_select_sql());
        let line = conn.query_row(&sql, [id], parse_line_row).optional()?;
        Ok(line)
    }

    fn list_bus_lines(&self, deadline: Deadline) -> StoreResult<Vec<BusLine>> {
        self.bounded.execute("list_bus_lines", deadline, query_lines)
    }

    fn soft_delete_bus_line(&self, id: EntityId) -> StoreResult<bool> {
        let conn = self.db.conn()?;
        let changed = conn.execute(&soft_delete::soft_delete(LINE_TABLE, &["id"]), [id])?;
        Ok(found(changed))
    }
}

fn query_stops(conn: &Connection) -> StoreResult<Vec<BusStop>> {
    let sql = format!(
        "{} ORDER BY name ASC, id ASC",
        soft_delete::select_active(STOP_TABLE, STOP_COLUMNS, &[])
    );
    let mut stmt = conn.prepare(&sql)?;
    let stops = stmt
        .query_map([], parse_stop_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(stops)
}

fn query_lines(conn: &Connection) -> StoreResult<Vec<BusLine>> {
    let sql = format!("{} ORDER BY l.name ASC, l.id ASC", line_select_sql());
    let mut stmt = conn.prepare(&sql)?;
    let lines = stmt
        .query_map([], parse_line_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(lines)
}

/// Line joined with both terminal stops; every alias carries the active filter.
fn line_select_sql() -> String {
    let stop_columns = |alias: &str| {
        format!(
            "{alias}.id, {alias}.name, {alias}.latitude, {alias}.longitude, \
             {alias}.created_at, {alias}.updated_at, {alias}.deleted_at"
        )
    };

    format!(
        "SELECT l.id, l.name, l.created_at, l.updated_at, l.deleted_at, {}, {} \
         FROM {LINE_TABLE} l \
         JOIN {STOP_TABLE} a ON a.id = l.bus_init AND {} \
         JOIN {STOP_TABLE} b ON b.id = l.bus_end AND {} \
         WHERE {}",
        stop_columns("a"),
        stop_columns("b"),
        active_on("a"),
        active_on("b"),
        active_on("l"),
    )
}

fn parse_stop_row(row: &Row<'_>) -> rusqlite::Result<BusStop> {
    Ok(BusStop {
        id: row.get("id")?,
        name: row.get("name")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        lifecycle: read_lifecycle(row)?,
    })
}

fn parse_line_row(row: &Row<'_>) -> rusqlite::Result<BusLine> {
    Ok(BusLine {
        id: row.get(0)?,
        name: row.get(1)?,
        lifecycle: lifecycle_at(row, 2)?,
        bus_init: stop_at(row, 5)?,
        bus_end: stop_at(row, 12)?,
    })
}

fn stop_at(row: &Row<'_>, offset: usize) -> rusqlite::Result<BusStop> {
    Ok(BusStop {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        latitude: row.get(offset + 2)?,
        longitude: row.get(offset + 3)?,
        lifecycle: lifecycle_at(row, offset + 4)?,
    })
}

fn lifecycle_at(row: &Row<'_>, offset: usize) -> rusqlite::Result<Lifecycle> {
    Ok(Lifecycle {
        created_at: row.get(offset)?,
        updated_at: row.get(offset + 1)?,
        deleted_at: row.get(offset + 2)?,
    })
}
