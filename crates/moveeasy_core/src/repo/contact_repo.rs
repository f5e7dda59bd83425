//! Contact store: any number of phone contacts per user.
//!
//! # Invariants
//! - Listing runs through the bounded executor under the caller's deadline.
//! - Update and soft-delete match `(id, user_id)` among active rows.

use crate::db::Database;
use crate::model::contact::Contact;
use crate::model::{EntityId, OwnerId};
use crate::repo::bounded::{BoundedExecutor, Deadline};
use crate::repo::soft_delete::{self, found, read_lifecycle};
use crate::repo::StoreResult;
use rusqlite::{params, Connection, OptionalExtension, Row};

const CONTACT_TABLE: &str = "contacts";
const CONTACT_FIELDS: &[&str] = &["name", "country_code", "area_code", "phone_number"];
const CONTACT_COLUMNS: &[&str] = &[
    "id",
    "user_id",
    "name",
    "country_code",
    "area_code",
    "phone_number",
];

/// Store contract for contacts.
pub trait ContactRepository {
    fn create_contact(&self, contact: &Contact) -> StoreResult<EntityId>;
    fn get_contact(&self, user_id: OwnerId, id: EntityId) -> StoreResult<Option<Contact>>;
    /// Lists the user's active contacts, failing with `Timeout` past `deadline`.
    fn list_contacts(&self, user_id: OwnerId, deadline: Deadline) -> StoreResult<Vec<Contact>>;
    fn update_contact(&self, contact: &Contact) -> StoreResult<bool>;
    fn soft_delete_contact(&self, user_id: OwnerId, id: EntityId) -> StoreResult<bool>;
}

/// SQLite-backed contact store.
#[derive(Clone)]
pub struct SqliteContactRepository {
    db: Database,
    bounded: BoundedExecutor,
}

impl SqliteContactRepository {
    pub fn new(db: Database) -> Self {
        let bounded = BoundedExecutor::new(db.clone());
        Self { db, bounded }
    }
}

impl ContactRepository for SqliteContactRepository {
    fn create_contact(&self, contact: &Contact) -> StoreResult<EntityId> {
        let conn = self.db.conn()?;
        conn.execute(
            &soft_delete::insert_active(
                CONTACT_TABLE,
                &["user_id", "name", "country_code", "area_code", "phone_number"],
                &[],
            ),
            params![
                contact.user_id,
                contact.name,
                contact.country_code,
                contact.area_code,
                contact.phone_number,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_contact(&self, user_id: OwnerId, id: EntityId) -> StoreResult<Option<Contact>> {
        let conn = self.db.conn()?;
        let contact = conn
            .query_row(
                &soft_delete::select_active(CONTACT_TABLE, CONTACT_COLUMNS, &["user_id", "id"]),
                params![user_id, id],
                parse_contact_row,
            )
            .optional()?;
        Ok(contact)
    }

    fn list_contacts(&self, user_id: OwnerId, deadline: Deadline) -> StoreResult<Vec<Contact>> {
        self.bounded
            .execute("list_contacts", deadline, move |conn| {
                query_contacts(conn, user_id)
            })
    }

    fn update_contact(&self, contact: &Contact) -> StoreResult<bool> {
        let conn = self.db.conn()?;
        let changed = conn.execute(
            &soft_delete::update_active(CONTACT_TABLE, CONTACT_FIELDS, &[], &["id", "user_id"]),
            params![
                contact.name,
                contact.country_code,
                contact.area_code,
                contact.phone_number,
                contact.id,
                contact.user_id,
            ],
        )?;
        Ok(found(changed))
    }

    fn soft_delete_contact(&self, user_id: OwnerId, id: EntityId) -> StoreResult<bool> {
        let conn = self.db.conn()?;
        let changed = conn.execute(
            &soft_delete::soft_delete(CONTACT_TABLE, &["id", "user_id"]),
            params![id, user_id],
        )?;
        Ok(found(changed))
    }
}

fn query_contacts(conn: &Connection, user_id: OwnerId) -> StoreResult<Vec<Contact>> {
    let sql = format!(
        "{} ORDER BY id ASC",
        soft_delete::select_active(CONTACT_TABLE, CONTACT_COLUMNS, &["user_id"])
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([user_id])?;
    let mut contacts = Vec::new();

    while let Some(row) = rows.next()? {
        contacts.push(parse_contact_row(row)?);
    }

    Ok(contacts)
}

fn parse_contact_row(row: &Row<'_>) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        name: row.get("name")?,
        country_code: row.get("country_code")?,
        area_code: row.get("area_code")?,
        phone_number: row.get("phone_number")?,
        lifecycle: read_lifecycle(row)?,
    })
}
