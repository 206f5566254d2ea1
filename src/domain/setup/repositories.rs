use super::entities::VendorSource;
use crate::domain::service::ServiceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Failed to install packages: {0}")]
    PackageInstallFailed(String),

    #[error("Failed to update groups of {user}: {message}")]
    UserGroupFailed { user: String, message: String },

    #[error("Failed to build vendor tools: {0}")]
    VendorBuildFailed(String),

    #[error("Cannot determine the service user: {0}")]
    UserResolutionFailed(String),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("File system error: {0}")]
    FileSystemError(#[from] std::io::Error),
}

pub trait PrivilegeChecker: Send + Sync {
    fn is_root(&self) -> bool;
}

pub trait PackageInstaller: Send + Sync {
    fn update_index(&self) -> Result<(), SetupError>;
    fn install(&self, packages: &[String]) -> Result<(), SetupError>;
}

pub trait UserGroupManager: Send + Sync {
    fn add_to_groups(&self, user: &str, groups: &[String]) -> Result<(), SetupError>;
}

pub trait VendorToolBuilder: Send + Sync {
    /// Whether the vendor CLI is already reachable on `PATH`.
    fn is_installed(&self) -> bool;
    /// Clone the sources unless a checkout already exists.
    fn fetch(&self, source: &VendorSource) -> Result<(), SetupError>;
    fn build_and_install(&self, source: &VendorSource) -> Result<(), SetupError>;
}
