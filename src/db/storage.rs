//! Per-call SQLite connection accessor.
//!
//! Every operation opens its own connection, runs one closure against it on the
//! driver thread, and closes it again. There is no pooling: two requests never
//! share a connection.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio_rusqlite::Connection;
use tracing::{debug, warn};

use crate::error::StorageError;

/// How long a statement waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the database file. Cheap to clone; holds no open connection.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    /// Create an accessor for the database at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Database file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a connection, run `f` against it, then release the connection.
    ///
    /// The connection is closed on every exit path, including when `f` fails.
    pub async fn with_connection<F, R>(&self, f: F) -> Result<R, StorageError>
    where
        F: FnOnce(&mut rusqlite::Connection) -> rusqlite::Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let conn = Connection::open(self.path.clone())
            .await
            .map_err(|e| StorageError::Open {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?;

        let result = conn
            .call(move |conn| {
                conn.busy_timeout(BUSY_TIMEOUT)?;
                Ok(f(conn)?)
            })
            .await;

        if let Err(e) = conn.close().await {
            warn!(path = %self.path.display(), error = %e, "failed to close database connection");
        }

        debug!(path = %self.path.display(), ok = result.is_ok(), "database call finished");
        result.map_err(StorageError::from)
    }

    /// Run a trivial statement to prove the database is reachable.
    pub async fn ping(&self) -> Result<(), StorageError> {
        self.with_connection(|conn| conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0)))
            .await
            .map(|_| ())
    }
}
