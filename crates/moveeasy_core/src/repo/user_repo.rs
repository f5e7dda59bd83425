//! User account store.
//!
//! Users are the owner table for addresses, contacts and vehicle reports.
//! Credential checks and token issuance belong to callers; this store only
//! persists and looks up the opaque password hash.

use crate::db::Database;
use crate::model::user::User;
use crate::model::EntityId;
use crate::repo::soft_delete::{self, found, read_lifecycle};
use crate::repo::StoreResult;
use rusqlite::{params, OptionalExtension, Row};

const USER_TABLE: &str = "users";
const USER_COLUMNS: &[&str] = &["id", "first_name", "last_name", "email", "password_hash"];

/// Store contract for users.
pub trait UserRepository {
    /// Fails with `StoreError::Constraint` when the email is already taken.
    fn create_user(&self, user: &User) -> StoreResult<EntityId>;
    fn get_user(&self, id: EntityId) -> StoreResult<Option<User>>;
    fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    fn soft_delete_user(&self, id: EntityId) -> StoreResult<bool>;
}

/// SQLite-backed user store.
#[derive(Clone)]
pub struct SqliteUserRepository {
    db: Database,
}

impl SqliteUserRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn find_one(&self, key: &str, value: &dyn rusqlite::ToSql) -> StoreResult<Option<User>> {
        let conn = self.db.conn()?;
        let user = conn
            .query_row(
                &soft_delete::select_active(USER_TABLE, USER_COLUMNS, &[key]),
                [value],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }
}

impl UserRepository for SqliteUserRepository {
    fn create_user(&self, user: &User) -> StoreResult<EntityId> {
        let conn = self.db.conn()?;
        conn.execute(
            &soft_delete::insert_active(
                USER_TABLE,
                &["first_name", "last_name", "email", "password_hash"],
                &[],
            ),
            params![
                user.first_name,
                user.last_name,
                user.email,
                user.password_hash,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_user(&self, id: EntityId) -> StoreResult<Option<User>> {
        self.find_one("id", &id)
    }

    fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.find_one("email", &email)
    }

    fn soft_delete_user(&self, id: EntityId) -> StoreResult<bool> {
        let conn = self.db.conn()?;
        let changed = conn.execute(&soft_delete::soft_delete(USER_TABLE, &["id"]), [id])?;
        Ok(found(changed))
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        password_hash: row.get("password_hash")?,
        lifecycle: read_lifecycle(row)?,
    })
}
