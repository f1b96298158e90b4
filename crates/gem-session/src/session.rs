//! The session state machine.

use std::path::Path;
use std::sync::Arc;

use gem_ai::SqlTranslator;
use gem_config::GemConfig;
use gem_core::defaults::{NO_TABLES_QUERY, default_query_for};
use gem_core::QueryResult;
use gem_engine::{DatabaseHandle, EngineError, EngineRuntime};
use tokio::sync::watch;

use crate::error::SessionError;
use crate::view::{Outcome, SessionView};

/// Controller settings taken from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Let AI-generated SQL modify the database.
    pub allow_ai_writes: bool,
}

impl SessionOptions {
    #[must_use]
    pub const fn from_config(config: &GemConfig) -> Self {
        Self {
            allow_ai_writes: config.ai.allow_writes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    ReadWrite,
    ReadOnly,
}

/// One user's workflow: at most one open database, its schema, the editor
/// buffer and the last outcome.
///
/// Every method takes `&mut self`, so two operations can never overlap on the
/// same session. Each transition publishes a fresh [`SessionView`] to
/// subscribers.
pub struct Session<T> {
    translator: T,
    options: SessionOptions,
    database: Option<DatabaseHandle>,
    view: SessionView,
    tx: watch::Sender<SessionView>,
}

impl<T: SqlTranslator> Session<T> {
    pub fn new(translator: T, options: SessionOptions) -> Self {
        let view = SessionView::initial(translator.is_configured());
        let (tx, _rx) = watch::channel(view.clone());
        Self {
            translator,
            options,
            database: None,
            view,
            tx,
        }
    }

    /// Receive a snapshot after every transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.tx.subscribe()
    }

    /// Current state.
    pub const fn view(&self) -> &SessionView {
        &self.view
    }

    pub const fn is_connected(&self) -> bool {
        self.view.connected
    }

    pub const fn translator(&self) -> &T {
        &self.translator
    }

    fn publish(&self) {
        self.tx.send_replace(self.view.clone());
    }

    fn fail(&mut self, error: SessionError) -> SessionError {
        self.view.outcome = Some(Outcome::Failure(error.clone()));
        self.publish();
        error
    }

    /// Release any open database and return every field to its initial value.
    ///
    /// Used before loading a new file and when disconnecting.
    pub fn reset_session(&mut self) {
        if let Some(mut handle) = self.database.take() {
            handle.close();
        }
        self.view = SessionView::initial(self.translator.is_configured());
        self.publish();
    }

    /// Load a database file and read its schema.
    ///
    /// A database without user tables still loads; the view then carries the
    /// [`SessionError::SchemaEmpty`] notice.
    ///
    /// # Errors
    ///
    /// [`SessionError::Init`] or [`SessionError::Open`] when the file cannot be
    /// loaded, [`SessionError::SchemaRead`] when its catalog cannot be read.
    /// The same error is also stored in the view.
    pub async fn select_file(&mut self, path: &Path) -> Result<(), SessionError> {
        self.begin_load();
        let opened = match EngineRuntime::initialize().await {
            Ok(runtime) => runtime.open_path(path).await,
            Err(error) => Err(error),
        };
        self.finish_load(opened).await
    }

    /// Like [`Session::select_file`], for an image already held in memory.
    ///
    /// # Errors
    ///
    /// Same as [`Session::select_file`].
    pub async fn select_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<(), SessionError> {
        self.begin_load();
        let opened = match EngineRuntime::initialize().await {
            Ok(runtime) => runtime.open(name, bytes).await,
            Err(error) => Err(error),
        };
        self.finish_load(opened).await
    }

    fn begin_load(&mut self) {
        self.reset_session();
        self.view.is_loading_database = true;
        self.publish();
    }

    async fn finish_load(
        &mut self,
        opened: Result<DatabaseHandle, EngineError>,
    ) -> Result<(), SessionError> {
        self.view.is_loading_database = false;
        let handle = match opened {
            Ok(handle) => handle,
            Err(error) => {
                tracing::warn!(%error, "database load failed");
                return Err(self.fail(SessionError::from(error)));
            }
        };

        self.view.file_name = Some(handle.name().to_string());
        self.view.connected = true;
        self.view.sidebar_open = true;
        self.database = Some(handle);
        self.publish();

        self.load_schema().await
    }

    /// Read the schema of the active database and seed the editor from it.
    /// Only a successful load triggers this.
    async fn load_schema(&mut self) -> Result<(), SessionError> {
        let Some(database) = self.database.as_ref() else {
            return Err(self.fail(SessionError::NoDatabase));
        };

        match database.read_schema().await {
            Ok(schema) => {
                if let Some(first) = schema.first_table() {
                    self.view.query_text = default_query_for(&first.name);
                    self.view.outcome = None;
                } else {
                    tracing::info!(name = %database.name(), "database has no user tables");
                    self.view.query_text = NO_TABLES_QUERY.to_string();
                    self.view.outcome = Some(Outcome::Failure(SessionError::SchemaEmpty));
                }
                self.view.schema = Some(Arc::new(schema));
                self.publish();
                Ok(())
            }
            Err(error) => {
                self.view.schema = None;
                Err(self.fail(SessionError::SchemaRead(error.to_string())))
            }
        }
    }

    /// Replace the editor buffer.
    pub fn set_query_text(&mut self, text: impl Into<String>) {
        self.view.query_text = text.into();
        self.publish();
    }

    pub fn toggle_sidebar(&mut self) {
        self.view.sidebar_open = !self.view.sidebar_open;
        self.publish();
    }

    /// Run `sql` against the active database without restrictions.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoDatabase`] without an active database,
    /// [`SessionError::Query`] with the engine diagnostic otherwise.
    pub async fn run_query(&mut self, sql: &str) -> Result<Arc<QueryResult>, SessionError> {
        self.execute(sql, Access::ReadWrite).await
    }

    /// Run whatever is in the editor buffer.
    ///
    /// # Errors
    ///
    /// Same as [`Session::run_query`].
    pub async fn run_editor(&mut self) -> Result<Arc<QueryResult>, SessionError> {
        let sql = self.view.query_text.clone();
        self.run_query(&sql).await
    }

    async fn execute(&mut self, sql: &str, access: Access) -> Result<Arc<QueryResult>, SessionError> {
        if !self.view.connected {
            return Err(self.fail(SessionError::NoDatabase));
        }
        let Some(database) = self.database.as_ref() else {
            return Err(self.fail(SessionError::NoDatabase));
        };

        self.view.outcome = None;
        self.view.is_executing_query = true;
        self.publish();
        // Let observers paint the busy state before the engine call.
        tokio::task::yield_now().await;

        let executed = match access {
            Access::ReadWrite => database.execute(sql).await,
            Access::ReadOnly => database.execute_read_only(sql).await,
        };
        self.view.is_executing_query = false;

        match executed {
            Ok(result) => {
                tracing::debug!(sets = result.sets().len(), rows = result.total_rows(), "query finished");
                let result = Arc::new(result);
                self.view.outcome = Some(Outcome::Success(Arc::clone(&result)));
                self.publish();
                Ok(result)
            }
            Err(error) => {
                tracing::debug!(%error, "query failed");
                let error = match error {
                    EngineError::Closed => SessionError::NoDatabase,
                    other => SessionError::Query(other.to_string()),
                };
                Err(self.fail(error))
            }
        }
    }

    /// Translate a question into SQL, put it in the editor and run it.
    ///
    /// Generated SQL runs read-only unless AI writes are enabled.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoSchema`] without a loaded, non-empty schema;
    /// [`SessionError::Config`] without an AI credential;
    /// [`SessionError::Translation`] when the service call fails. Execution
    /// errors are the same as for [`Session::run_query`].
    pub async fn ask_ai(&mut self, question: &str) -> Result<Arc<QueryResult>, SessionError> {
        let schema = self
            .view
            .schema
            .as_ref()
            .filter(|schema| self.view.connected && !schema.is_empty())
            .map(Arc::clone);
        let Some(schema) = schema else {
            return Err(self.fail(SessionError::NoSchema));
        };
        if !self.translator.is_configured() {
            return Err(self.fail(SessionError::from(gem_ai::TranslateError::NotConfigured)));
        }

        if matches!(self.view.outcome, Some(Outcome::Failure(_))) {
            self.view.outcome = None;
        }
        self.view.is_translating = true;
        self.publish();

        let translated = self.translator.translate(&schema, question).await;
        self.view.is_translating = false;

        let sql = match translated {
            Ok(sql) => sql,
            Err(error) => {
                tracing::warn!(%error, "translation failed");
                return Err(self.fail(SessionError::from(error)));
            }
        };

        tracing::debug!(%sql, "translated question");
        self.view.query_text.clone_from(&sql);
        self.publish();

        let access = if self.options.allow_ai_writes {
            Access::ReadWrite
        } else {
            Access::ReadOnly
        };
        self.execute(&sql, access).await
    }

    /// Disconnect after the user confirms.
    ///
    /// `confirm` receives the question to ask and is only called while a
    /// database is active. Returns whether a reset happened.
    pub fn close_connection(&mut self, confirm: impl FnOnce(&str) -> bool) -> bool {
        if self.database.is_some() && !confirm(CLOSE_PROMPT) {
            return false;
        }
        self.reset_session();
        true
    }
}

/// Question asked before disconnecting.
pub const CLOSE_PROMPT: &str = "Are you sure you want to close the connection to this database?";
