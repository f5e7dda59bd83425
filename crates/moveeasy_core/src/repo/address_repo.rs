//! Address store: one active address per user, written through the upsert
//! coordinator.
//!
//! # Invariants
//! - Every statement goes through the soft-delete filter.
//! - Update and soft-delete match `(id, user_id)` among active rows.
//! - `get_address` returns `None` (not an error) when the user has none.

use crate::db::Database;
use crate::model::address::Address;
use crate::model::{EntityId, OwnerId};
use crate::repo::soft_delete::{self, found, read_lifecycle};
use crate::repo::upsert::{add_or_update, OwnerScoped, SingletonStore, UpsertOutcome};
use crate::repo::StoreResult;
use rusqlite::{params, OptionalExtension, Row};

const ADDRESS_TABLE: &str = "address";
const ADDRESS_FIELDS: &[&str] = &[
    "street",
    "number",
    "postal_code",
    "neighborhood",
    "city",
    "state",
];

/// Store contract for addresses.
pub trait AddressRepository {
    fn create_address(&self, address: &Address) -> StoreResult<EntityId>;
    fn get_address(&self, user_id: OwnerId) -> StoreResult<Option<Address>>;
    fn update_address(&self, address: &Address) -> StoreResult<bool>;
    fn soft_delete_address(&self, user_id: OwnerId, id: EntityId) -> StoreResult<bool>;
    /// Inserts the user's address or overwrites the active one.
    fn add_or_update_address(&self, address: &Address) -> StoreResult<UpsertOutcome>;
}

/// SQLite-backed address store.
#[derive(Clone)]
pub struct SqliteAddressRepository {
    db: Database,
}

impl SqliteAddressRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn update_row(&self, id: EntityId, address: &Address) -> StoreResult<bool> {
        let conn = self.db.conn()?;
        let changed = conn.execute(
            &soft_delete::update_active(ADDRESS_TABLE, ADDRESS_FIELDS, &[], &["id", "user_id"]),
            params![
                address.street,
                address.number,
                address.postal_code,
                address.neighborhood,
                address.city,
                address.state,
                id,
                address.user_id,
            ],
        )?;
        Ok(found(changed))
    }
}

impl AddressRepository for SqliteAddressRepository {
    fn create_address(&self, address: &Address) -> StoreResult<EntityId> {
        let conn = self.db.conn()?;
        let mut columns = vec!["user_id"];
        columns.extend_from_slice(ADDRESS_FIELDS);
        conn.execute(
            &soft_delete::insert_active(ADDRESS_TABLE, &columns, &[]),
            params![
                address.user_id,
                address.street,
                address.number,
                address.postal_code,
                address.neighborhood,
                address.city,
                address.state,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_address(&self, user_id: OwnerId) -> StoreResult<Option<Address>> {
        let conn = self.db.conn()?;
        let mut columns = vec!["id", "user_id"];
        columns.extend_from_slice(ADDRESS_FIELDS);
        let sql = format!(
            "{} ORDER BY id ASC LIMIT 1",
            soft_delete::select_active(ADDRESS_TABLE, &columns, &["user_id"])
        );

        let address = conn
            .query_row(&sql, [user_id], parse_address_row)
            .optional()?;
        Ok(address)
    }

    fn update_address(&self, address: &Address) -> StoreResult<bool> {
        self.update_row(address.id, address)
    }

    fn soft_delete_address(&self, user_id: OwnerId, id: EntityId) -> StoreResult<bool> {
        let conn = self.db.conn()?;
        let changed = conn.execute(
            &soft_delete::soft_delete(ADDRESS_TABLE, &["id", "user_id"]),
            params![id, user_id],
        )?;
        Ok(found(changed))
    }

    fn add_or_update_address(&self, address: &Address) -> StoreResult<UpsertOutcome> {
        add_or_update(self, address)
    }
}

impl OwnerScoped for Address {
    fn owner(&self) -> OwnerId {
        self.user_id
    }
}

impl SingletonStore for SqliteAddressRepository {
    type Entity = Address;
    const KIND: &'static str = "address";

    fn find_active(&self, owner: OwnerId) -> StoreResult<Option<(EntityId, Address)>> {
        Ok(self
            .get_address(owner)?
            .map(|existing| (existing.id, existing)))
    }

    fn insert(&self, entity: &Address) -> StoreResult<EntityId> {
        self.create_address(entity)
    }

    fn update_matched(&self, id: EntityId, entity: &Address) -> StoreResult<bool> {
        self.update_row(id, entity)
    }
}

fn parse_address_row(row: &Row<'_>) -> rusqlite::Result<Address> {
    Ok(Address {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        street: row.get("street")?,
        number: row.get("number")?,
        postal_code: row.get("postal_code")?,
        neighborhood: row.get("neighborhood")?,
        city: row.get("city")?,
        state: row.get("state")?,
        lifecycle: read_lifecycle(row)?,
    })
}
