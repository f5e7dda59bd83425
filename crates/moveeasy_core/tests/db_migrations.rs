use moveeasy_core::db::migrations::latest_version;
use moveeasy_core::{Database, DbConfig, DbError};
use rusqlite::Connection;
use std::time::{Duration, Instant};

#[test]
fn open_in_memory_applies_all_migrations() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.schema_version().unwrap(), latest_version());

    let conn = db.conn().unwrap();
    for table in [
        "users",
        "address",
        "contacts",
        "shared_vehicle",
        "bus_stop",
        "bus_line",
    ] {
        assert_object_exists(&conn, "table", table);
    }
    assert_object_exists(&conn, "index", "idx_address_active_user");
}

#[test]
fn every_entity_table_carries_lifecycle_columns() {
    let db = Database::open_in_memory().unwrap();
    let conn = db.conn().unwrap();

    for table in ["users", "address", "contacts", "shared_vehicle", "bus_stop", "bus_line"] {
        let columns = column_names(&conn, table);
        for lifecycle in ["created_at", "updated_at", "deleted_at"] {
            assert!(
                columns.iter().any(|column| column == lifecycle),
                "{table} is missing {lifecycle}"
            );
        }
    }
}

#[test]
fn opening_same_file_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let config = DbConfig::with_path(dir.path().join("moveeasy.db"));

    let first = Database::open(&config).unwrap();
    assert_eq!(first.schema_version().unwrap(), latest_version());
    drop(first);

    let second = Database::open(&config).unwrap();
    assert_eq!(second.schema_version().unwrap(), latest_version());
}

#[test]
fn file_pool_enables_foreign_keys_on_every_connection() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = DbConfig::with_path(dir.path().join("pool.db"));
    config.max_pool_size = 3;
    let db = Database::open(&config).unwrap();

    let held: Vec<_> = (0..3).map(|_| db.conn().unwrap()).collect();
    for conn in &held {
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }
}

#[test]
fn second_in_memory_checkout_fails_fast_while_connection_is_held() {
    let db = Database::open_in_memory().unwrap();
    let held = db.conn().unwrap();

    let started = Instant::now();
    assert!(matches!(db.conn(), Err(DbError::Pool(_))));
    assert!(started.elapsed() < Duration::from_secs(10));

    drop(held);
    assert_eq!(db.schema_version().unwrap(), latest_version());
}

#[test]
fn zero_checkout_timeout_opens_instead_of_panicking() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = DbConfig::with_path(dir.path().join("zero-timeout.db"));
    config.connection_timeout_sec = 0;

    let db = Database::open(&config).unwrap();
    assert_eq!(db.schema_version().unwrap(), latest_version());
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let Err(err) = Database::open(&DbConfig::with_path(&path)) else {
        panic!("newer schema must be rejected");
    };
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn column_names(conn: &Connection, table: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table});"))
        .unwrap();
    stmt.query_map([], |row| row.get::<_, String>(1))
        .unwrap()
        .collect::<rusqlite::Result<Vec<_>>>()
        .unwrap()
}

fn assert_object_exists(conn: &Connection, kind: &str, name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "{kind} {name} does not exist");
}
