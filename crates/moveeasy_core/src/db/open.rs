//! Pool bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Build file-backed or in-memory connection pools.
//! - Configure per-connection pragmas required by core behavior.
//! - Trigger schema migrations before returning a usable pool.
//!
//! # Invariants
//! - Pooled connections have `foreign_keys=ON`.
//! - Returned pools have migrations fully applied.

use super::migrations::{apply_migrations, current_user_version};
use super::{DbResult, PooledConn};
use crate::config::DbConfig;
use log::{error, info};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::time::{Duration, Instant};

const IN_MEMORY_BUSY_TIMEOUT: Duration = Duration::from_secs(5);
/// A second checkout on the single in-memory connection fails after this.
const IN_MEMORY_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(2);

/// Shared handle to the migrated connection pool.
///
/// Cloning is cheap; all clones check out connections from the same pool.
#[derive(Clone)]
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Opens (or creates) the database file named by `config` and applies
    /// pending migrations.
    ///
    /// # Side effects
    /// - Emits `db_open` logging events with duration and status.
    pub fn open(config: &DbConfig) -> DbResult<Self> {
        let started_at = Instant::now();
        info!(
            "event=db_open module=db status=start mode=file pool_max={}",
            config.max_pool_size
        );

        let busy_timeout = Duration::from_millis(config.busy_timeout_ms);
        let manager = SqliteConnectionManager::file(&config.path).with_init(move |conn| {
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
            configure_connection(conn, busy_timeout)
        });

        let max_size = config.max_pool_size.max(1);
        let pool = Pool::builder()
            .max_size(max_size)
            .min_idle(Some(config.min_idle.min(max_size)))
            .connection_timeout(config.checkout_timeout())
            .build(manager);

        Self::finish_open(pool, "file", started_at)
    }

    /// Opens a private in-memory database backed by a single pooled connection.
    ///
    /// The connection is never recycled, so the database lives as long as the
    /// returned handle (and its clones).
    pub fn open_in_memory() -> DbResult<Self> {
        let started_at = Instant::now();
        info!("event=db_open module=db status=start mode=memory");

        let manager = SqliteConnectionManager::memory()
            .with_init(|conn| configure_connection(conn, IN_MEMORY_BUSY_TIMEOUT));
        let pool = Pool::builder()
            .max_size(1)
            .min_idle(Some(1))
            .connection_timeout(IN_MEMORY_CHECKOUT_TIMEOUT)
            .idle_timeout(None)
            .max_lifetime(None)
            .build(manager);

        Self::finish_open(pool, "memory", started_at)
    }

    /// Checks out one connection, blocking up to the pool checkout timeout.
    pub fn conn(&self) -> DbResult<PooledConn> {
        Ok(self.pool.get()?)
    }

    /// Returns the applied schema version.
    pub fn schema_version(&self) -> DbResult<u32> {
        let conn = self.conn()?;
        current_user_version(&conn)
    }

    /// Returns `(connections, idle_connections)` for the pool.
    pub fn pool_state(&self) -> (u32, u32) {
        let state = self.pool.state();
        (state.connections, state.idle_connections)
    }

    fn finish_open(
        pool: Result<Pool<SqliteConnectionManager>, r2d2::Error>,
        mode: &'static str,
        started_at: Instant,
    ) -> DbResult<Self> {
        let pool = match pool {
            Ok(pool) => pool,
            Err(err) => {
                error!(
                    "event=db_open module=db status=error mode={} duration_ms={} error_code=pool_build_failed error={}",
                    mode,
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };

        match migrate(&pool) {
            Ok(version) => {
                info!(
                    "event=db_open module=db status=ok mode={} duration_ms={} schema_version={}",
                    mode,
                    started_at.elapsed().as_millis(),
                    version
                );
                Ok(Self { pool })
            }
            Err(err) => {
                error!(
                    "event=db_open module=db status=error mode={} duration_ms={} error_code=db_migrate_failed error={}",
                    mode,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

fn migrate(pool: &Pool<SqliteConnectionManager>) -> DbResult<u32> {
    let mut conn = pool.get()?;
    apply_migrations(&mut conn)?;
    current_user_version(&conn)
}

fn configure_connection(conn: &mut Connection, busy_timeout: Duration) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(busy_timeout)?;
    Ok(())
}
