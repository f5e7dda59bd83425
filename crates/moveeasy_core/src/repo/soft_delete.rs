//! Soft-delete filter shared by every generated statement.
//!
//! # Responsibility
//! - Produce the read/insert/update/delete SQL shapes used by all stores.
//! - Attach `deleted_at IS NULL` to every read and every mutation.
//!
//! # Invariants
//! - A tombstoned row is invisible to reads and never matched by writes, so a
//!   second soft-delete or an update of a deleted row affects zero rows.
//! - Soft-delete is an `UPDATE`, never a `DELETE`.
//! - Lifecycle timestamps are evaluated by the engine inside the statement.
//!
//! Placeholders are numbered: assigned values first, then match keys.

use crate::model::Lifecycle;
use rusqlite::Row;

/// Predicate selecting active rows.
pub const ACTIVE_PREDICATE: &str = "deleted_at IS NULL";

/// Engine-side "now" in epoch milliseconds.
pub const NOW_MS_SQL: &str = "CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)";

const LIFECYCLE_COLUMNS: &str = "created_at, updated_at, deleted_at";

/// `k1 = ?n AND k2 = ?n+1 ... AND deleted_at IS NULL`.
pub fn active_match(keys: &[&str], first_placeholder: usize) -> String {
    let mut predicate = String::new();
    for (offset, key) in keys.iter().enumerate() {
        predicate.push_str(&format!("{key} = ?{} AND ", first_placeholder + offset));
    }
    predicate.push_str(ACTIVE_PREDICATE);
    predicate
}

/// Active-row predicate for a table alias in joins.
pub fn active_on(alias: &str) -> String {
    format!("{alias}.{ACTIVE_PREDICATE}")
}

/// `SELECT <columns>, <lifecycle> FROM <table> WHERE <keys> AND active`.
pub fn select_active(table: &str, columns: &[&str], keys: &[&str]) -> String {
    format!(
        "SELECT {}, {LIFECYCLE_COLUMNS} FROM {table} WHERE {}",
        columns.join(", "),
        active_match(keys, 1)
    )
}

/// Insert of a new active row.
///
/// `columns` bind to `?1..`; `server_now` columns and `created_at` are set to
/// engine time. `deleted_at` and `updated_at` stay `NULL`.
pub fn insert_active(table: &str, columns: &[&str], server_now: &[&str]) -> String {
    let mut names: Vec<&str> = columns.to_vec();
    names.extend_from_slice(server_now);
    names.push("created_at");

    let mut values: Vec<String> = (1..=columns.len()).map(|index| format!("?{index}")).collect();
    values.extend(std::iter::repeat(NOW_MS_SQL.to_string()).take(server_now.len() + 1));

    format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        names.join(", "),
        values.join(", ")
    )
}

/// Update of an active row matched on `keys`.
///
/// `assignments` bind to `?1..`, keys follow. `updated_at` and every
/// `server_now` column are refreshed to engine time.
pub fn update_active(table: &str, assignments: &[&str], server_now: &[&str], keys: &[&str]) -> String {
    let mut set_clause: Vec<String> = assignments
        .iter()
        .enumerate()
        .map(|(offset, column)| format!("{column} = ?{}", offset + 1))
        .collect();
    set_clause.extend(server_now.iter().map(|column| format!("{column} = {NOW_MS_SQL}")));
    set_clause.push(format!("updated_at = {NOW_MS_SQL}"));

    format!(
        "UPDATE {table} SET {} WHERE {}",
        set_clause.join(", "),
        active_match(keys, assignments.len() + 1)
    )
}

/// Tombstones an active row matched on `keys` (`?1..`).
pub fn soft_delete(table: &str, keys: &[&str]) -> String {
    format!(
        "UPDATE {table} SET deleted_at = {NOW_MS_SQL}, updated_at = {NOW_MS_SQL} WHERE {}",
        active_match(keys, 1)
    )
}

/// Reads the lifecycle columns appended by [`select_active`].
pub fn read_lifecycle(row: &Row<'_>) -> rusqlite::Result<Lifecycle> {
    Ok(Lifecycle {
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        deleted_at: row.get("deleted_at")?,
    })
}

/// Maps an affected-row count to the `found` flag.
pub fn found(changed: usize) -> bool {
    changed > 0
}
