pub mod feedback;
pub mod habit;
pub mod metrics;
pub mod planning;
pub mod settings;
pub mod slot;
pub mod task;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::db::DbPool;
use crate::error::AppError;
use crate::services::clock::{Clock, SystemClock};

/// Shared Tauri-managed state: one sqlite-backed pool plus the clock the
/// planner reads "now" through (spec.md C1; swapped for a `FixedClock` in
/// tests, never in production).
#[derive(Clone)]
pub struct AppState {
    db_pool: DbPool,
    clock: std::sync::Arc<dyn Clock>,
}

impl AppState {
    pub fn new(db_pool: DbPool) -> crate::error::AppResult<Self> {
        Ok(Self {
            db_pool,
            clock: std::sync::Arc::new(SystemClock),
        })
    }

    pub fn with_clock(db_pool: DbPool, clock: std::sync::Arc<dyn Clock>) -> Self {
        Self { db_pool, clock }
    }

    pub fn db(&self) -> DbPool {
        self.db_pool.clone()
    }

    pub fn clock(&self) -> std::sync::Arc<dyn Clock> {
        self.clock.clone()
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

/// Wire-shape error (spec.md §7): `{code, message, details}` camelCase JSON.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

impl CommandError {
    pub fn new(code: impl Into<String>, message: impl Into<String>, details: Option<JsonValue>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details,
        }
    }
}

impl From<AppError> for CommandError {
    fn from(error: AppError) -> Self {
        match error {
            AppError::Validation { message, details } => {
                CommandError::new("VALIDATION_ERROR", message, details)
            }
            AppError::NotFound => {
                CommandError::new("NOT_FOUND", "the requested resource does not exist", None)
            }
            AppError::Conflict { message } => CommandError::new("CONFLICT", message, None),
            AppError::Database { message } => CommandError::new("UNKNOWN", message, None),
            AppError::Serialization(error) => {
                CommandError::new("UNKNOWN", format!("serialization failed: {error}"), None)
            }
            AppError::Io(error) => {
                CommandError::new("UNKNOWN", format!("io failure: {error}"), None)
            }
            AppError::Other(message) => CommandError::new("UNKNOWN", message, None),
        }
    }
}

pub(crate) async fn run_blocking<T: Send + 'static>(
    task: impl FnOnce() -> Result<T, AppError> + Send + 'static,
) -> CommandResult<T> {
    tauri::async_runtime::spawn_blocking(task)
        .await
        .map_err(|err| CommandError::new("UNKNOWN", format!("background task failed: {err}"), None))?
        .map_err(CommandError::from)
}
