//! Bounded query executor: runs a read on a background worker under a deadline.
//!
//! # Responsibility
//! - Race one background query against a caller-supplied deadline.
//! - Deliver exactly one outcome: completed, failed or timed out.
//! - Cancel the in-flight engine statement when the caller gives up.
//!
//! # Invariants
//! - An already-elapsed deadline returns `TimedOut` without spawning a worker.
//! - The worker's connection polls the cancel token for the whole time it runs
//!   statements, so a timeout aborts the engine call wherever it is.
//! - Late outcomes are dropped; the worker never blocks on delivery.
//! - No retries happen here.

use crate::db::Database;
use crate::repo::{StoreError, StoreResult};
use log::{debug, warn};
use rusqlite::Connection;
use std::os::raw::c_int;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Fixed point in time by which a bounded read must finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Deadline(Instant);

impl Deadline {
    pub fn at(instant: Instant) -> Self {
        Self(instant)
    }

    /// Deadline `span` from now.
    pub fn after(span: Duration) -> Self {
        Self(Instant::now() + span)
    }

    /// Time left, or `None` once the deadline has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.0
            .checked_duration_since(Instant::now())
            .filter(|left| !left.is_zero())
    }

    pub fn is_elapsed(&self) -> bool {
        self.remaining().is_none()
    }
}

/// VM instructions between two cancellation checks on a bound connection.
const CANCEL_CHECK_INTERVAL: c_int = 1_000;

/// Cancellation token shared by a caller and its background worker.
///
/// Cancelling flips a flag the worker checks before starting; while a
/// connection is bound, the engine polls the same flag and aborts the running
/// statement with `SQLITE_INTERRUPT` once it is set.
#[derive(Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Makes statements on `conn` abort on cancellation until the returned
    /// guard drops.
    ///
    /// Returns `None` when the token was already cancelled; the caller must
    /// not start any statement in that case.
    pub fn bind<'c>(&self, conn: &'c Connection) -> Option<EngineBinding<'c>> {
        let cancelled = Arc::clone(&self.cancelled);
        conn.progress_handler(
            CANCEL_CHECK_INTERVAL,
            Some(move || cancelled.load(Ordering::SeqCst)),
        );
        let binding = EngineBinding { conn };
        if self.is_cancelled() {
            return None;
        }
        Some(binding)
    }
}

/// Keeps a connection cancellable through its [`CancelToken`].
pub struct EngineBinding<'c> {
    conn: &'c Connection,
}

impl Drop for EngineBinding<'_> {
    fn drop(&mut self) {
        self.conn.progress_handler(0, None::<fn() -> bool>);
    }
}

/// Tagged result of one bounded query.
#[derive(Debug)]
pub enum QueryOutcome<T> {
    Completed(T),
    Failed(StoreError),
    TimedOut { waited: Duration },
}

impl<T> QueryOutcome<T> {
    /// Folds the outcome into the store error taxonomy.
    pub fn into_result(self, label: &'static str) -> StoreResult<T> {
        match self {
            Self::Completed(value) => Ok(value),
            Self::Failed(err) => Err(err),
            Self::TimedOut { waited } => Err(StoreError::Timeout {
                label,
                waited_ms: waited.as_millis(),
            }),
        }
    }
}

/// Runs reads on pooled connections under a deadline.
#[derive(Clone)]
pub struct BoundedExecutor {
    db: Database,
}

impl BoundedExecutor {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Runs `query` and returns its value, its error, or `StoreError::Timeout`.
    pub fn execute<T, F>(&self, label: &'static str, deadline: Deadline, query: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        self.run(label, deadline, query).into_result(label)
    }

    /// Runs `query` on a background worker and waits for the first of:
    /// completion, failure, or `deadline`.
    ///
    /// # Side effects
    /// - Spawns one worker thread per call (none when the deadline has passed).
    /// - On timeout, cancels the worker's running statement.
    pub fn run<T, F>(&self, label: &'static str, deadline: Deadline, query: F) -> QueryOutcome<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let started_at = Instant::now();
        if deadline.is_elapsed() {
            debug!("event=bounded_query module=repo status=timeout label={label} reason=deadline_elapsed_before_start");
            return QueryOutcome::TimedOut {
                waited: Duration::ZERO,
            };
        }

        debug!(
            "event=bounded_query module=repo status=start label={label} budget_ms={}",
            deadline.remaining().unwrap_or(Duration::ZERO).as_millis()
        );
        let token = CancelToken::new();
        let worker_token = token.clone();
        let db = self.db.clone();
        let (sender, receiver) = mpsc::sync_channel::<StoreResult<T>>(1);

        let spawned = thread::Builder::new()
            .name(format!("bounded-{label}"))
            .spawn(move || {
                let outcome = run_on_worker(&db, &worker_token, label, started_at, query);
                // The caller may have stopped listening; late outcomes are dropped.
                let _ = sender.send(outcome);
            });
        if let Err(err) = spawned {
            warn!("event=bounded_query module=repo status=error label={label} error_code=spawn_failed error={err}");
            return QueryOutcome::Failed(StoreError::Worker(format!("spawn failed: {err}")));
        }

        let wait = deadline.remaining().unwrap_or(Duration::ZERO);
        match receiver.recv_timeout(wait) {
            Ok(Ok(value)) => {
                debug!(
                    "event=bounded_query module=repo status=ok label={label} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                QueryOutcome::Completed(value)
            }
            Ok(Err(err)) => {
                warn!(
                    "event=bounded_query module=repo status=error label={label} duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                QueryOutcome::Failed(err)
            }
            Err(RecvTimeoutError::Timeout) => {
                token.cancel();
                let waited = started_at.elapsed();
                warn!(
                    "event=bounded_query module=repo status=timeout label={label} duration_ms={}",
                    waited.as_millis()
                );
                QueryOutcome::TimedOut { waited }
            }
            Err(RecvTimeoutError::Disconnected) => {
                warn!("event=bounded_query module=repo status=error label={label} error_code=worker_lost");
                QueryOutcome::Failed(StoreError::Worker(
                    "worker exited without reporting an outcome".to_string(),
                ))
            }
        }
    }
}

fn run_on_worker<T, F>(
    db: &Database,
    token: &CancelToken,
    label: &'static str,
    started_at: Instant,
    query: F,
) -> StoreResult<T>
where
    F: FnOnce(&Connection) -> StoreResult<T>,
{
    let pooled = db.conn()?;
    let conn: &Connection = &pooled;
    let Some(_binding) = token.bind(conn) else {
        return Err(StoreError::Timeout {
            label,
            waited_ms: started_at.elapsed().as_millis(),
        });
    };
    query(conn)
}

#[cfg(test)]
mod tests {
    use super::{CancelToken, Deadline};
    use rusqlite::Connection;
    use std::time::{Duration, Instant};

    #[test]
    fn deadline_in_the_past_is_elapsed() {
        let deadline = Deadline::at(Instant::now());
        assert!(deadline.is_elapsed());
        assert!(Deadline::after(Duration::from_secs(60)).remaining().is_some());
    }

    #[test]
    fn cancelled_token_refuses_binding() {
        let conn = Connection::open_in_memory().unwrap();
        let token = CancelToken::new();
        token.cancel();
        assert!(token.is_cancelled());
        assert!(token.bind(&conn).is_none());
        conn.execute_batch("SELECT 1;").unwrap();
    }

    #[test]
    fn cancellation_aborts_a_bound_statement() {
        let conn = Connection::open_in_memory().unwrap();
        let token = CancelToken::new();
        let _binding = token.bind(&conn).unwrap();
        token.cancel();

        let err = conn
            .query_row(
                "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c) \
                 SELECT count(*) FROM c",
                [],
                |row| row.get::<_, i64>(0),
            )
            .unwrap_err();
        assert_eq!(err.sqlite_error_code(), Some(rusqlite::ErrorCode::OperationInterrupted));
    }

    #[test]
    fn binding_is_released_on_drop() {
        let conn = Connection::open_in_memory().unwrap();
        let token = CancelToken::new();
        drop(token.bind(&conn).unwrap());
        token.cancel();
        let count: i64 = conn
            .query_row(
                "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c WHERE x < 50000) \
                 SELECT count(*) FROM c",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 50_000);
    }
}
