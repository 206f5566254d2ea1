use super::entities::{JournalQuery, ServiceStatus, ServiceUnit};
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Failed to run {program}: {message}")]
    SpawnFailed { program: String, message: String },

    #[error("{command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Unit {0} does not exist")]
    UnitNotFound(String),

    #[error("File system error: {0}")]
    FileSystemError(#[from] std::io::Error),
}

pub trait ServiceManager: Send + Sync {
    /// Write the unit file. Does not reload the daemon.
    fn install_unit(&self, unit: &ServiceUnit) -> Result<(), ServiceError>;
    /// Delete the unit file if present. Returns whether a file was removed.
    fn remove_unit(&self, name: &str) -> Result<bool, ServiceError>;
    fn daemon_reload(&self) -> Result<(), ServiceError>;
    fn enable(&self, name: &str) -> Result<(), ServiceError>;
    fn disable(&self, name: &str) -> Result<(), ServiceError>;
    fn start(&self, name: &str) -> Result<(), ServiceError>;
    fn stop(&self, name: &str) -> Result<(), ServiceError>;
    fn restart(&self, name: &str) -> Result<(), ServiceError>;
    fn status(&self, name: &str) -> Result<ServiceStatus, ServiceError>;
}

/// Journal lines, followed by an `Err` if the reader failed.
pub type JournalLines = mpsc::Receiver<Result<String, ServiceError>>;

#[async_trait]
pub trait JournalReader: Send + Sync {
    /// Start reading journal lines; the stream ends when the reader process exits.
    /// A failed exit is delivered as a final `Err`. Dropping the receiver stops the reader.
    async fn open(&self, query: &JournalQuery) -> Result<JournalLines, ServiceError>;
}
