//! Process-wide engine runtime.

use std::path::Path;

use libsql::Builder;
use tokio::sync::OnceCell;

use crate::error::{EngineError, engine_message};
use crate::handle::DatabaseHandle;

/// Prefix for every scratch directory the engine creates.
pub(crate) const SCRATCH_PREFIX: &str = "querygem-";

/// Process-scoped runtime. Created on first use and reused afterwards; never
/// torn down.
static RUNTIME: OnceCell<EngineRuntime> = OnceCell::const_new();

/// The initialized embedded engine. Acts as the factory for
/// [`DatabaseHandle`]s.
#[derive(Debug)]
pub struct EngineRuntime {
    version: String,
}

impl EngineRuntime {
    /// Initialize the engine once per process and return the cached runtime.
    ///
    /// The first call probes an in-memory database and checks that scratch
    /// space for database images can be created. Later calls return the same
    /// instance without touching the engine. A failed initialization is not
    /// cached, so a later call tries again.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Init`] if the engine or its scratch space is
    /// unusable.
    pub async fn initialize() -> Result<&'static Self, EngineError> {
        RUNTIME.get_or_try_init(Self::boot).await
    }

    /// The runtime, if [`EngineRuntime::initialize`] already succeeded.
    #[must_use]
    pub fn get() -> Option<&'static Self> {
        RUNTIME.get()
    }

    async fn boot() -> Result<Self, EngineError> {
        let scratch = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir()
            .map_err(|e| EngineError::Init(format!("scratch directory unavailable: {e}")))?;
        drop(scratch);

        let probe = Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| EngineError::Init(engine_message(&e)))?;
        let conn = probe
            .connect()
            .map_err(|e| EngineError::Init(engine_message(&e)))?;
        let mut rows = conn
            .query("SELECT sqlite_version()", ())
            .await
            .map_err(|e| EngineError::Init(engine_message(&e)))?;
        let version = match rows
            .next()
            .await
            .map_err(|e| EngineError::Init(engine_message(&e)))?
        {
            Some(row) => row
                .get::<String>(0)
                .map_err(|e| EngineError::Init(engine_message(&e)))?,
            None => return Err(EngineError::Init("engine version probe returned no row".into())),
        };

        tracing::info!(%version, "embedded SQL engine initialized");
        Ok(Self { version })
    }

    /// SQLite version reported by the embedded engine.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Open a database image from raw bytes.
    ///
    /// `name` is only used for display and logging.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Open`] if the bytes are not a database image.
    pub async fn open(&self, name: &str, bytes: &[u8]) -> Result<DatabaseHandle, EngineError> {
        DatabaseHandle::from_bytes(name, bytes).await
    }

    /// Read a database file from disk and open its bytes.
    ///
    /// Only the main file is read. Pages still sitting in a `-wal` file next to
    /// it are not part of the image.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Open`] if the file cannot be read or is not a
    /// database image.
    pub async fn open_path(&self, path: &Path) -> Result<DatabaseHandle, EngineError> {
        if !has_database_extension(path) {
            tracing::warn!(
                path = %path.display(),
                "file does not use a .db/.sqlite/.sqlite3 extension; opening anyway"
            );
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| EngineError::Open(format!("{}: {e}", path.display())))?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        self.open(&name, &bytes).await
    }
}

fn has_database_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            gem_core::defaults::DATABASE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[tokio::test]
    async fn initialize_is_cached() {
        let first = EngineRuntime::initialize().await.unwrap();
        let second = EngineRuntime::initialize().await.unwrap();
        assert!(std::ptr::eq(first, second));
        assert!(EngineRuntime::get().is_some());
    }

    #[tokio::test]
    async fn reports_engine_version() {
        let runtime = EngineRuntime::initialize().await.unwrap();
        assert!(runtime.version().starts_with('3'), "got {}", runtime.version());
    }

    #[test]
    fn extension_hint() {
        assert!(has_database_extension(Path::new("app.db")));
        assert!(has_database_extension(Path::new("app.SQLite3")));
        assert!(!has_database_extension(Path::new("app.txt")));
        assert!(!has_database_extension(Path::new("app")));
    }
}
