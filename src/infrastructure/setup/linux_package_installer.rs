use crate::domain::setup::{PackageInstaller, SetupError};
use crate::infrastructure::command;
use std::path::PathBuf;
use std::process::Command;
use tracing::info;

pub struct LinuxPackageInstaller {
    apt_get: PathBuf,
}

impl Default for LinuxPackageInstaller {
    fn default() -> Self {
        Self::new("apt-get")
    }
}

impl LinuxPackageInstaller {
    pub fn new(apt_get: impl Into<PathBuf>) -> Self {
        Self {
            apt_get: apt_get.into(),
        }
    }

    fn apt(&self) -> Command {
        let mut cmd = Command::new(&self.apt_get);
        cmd.env("DEBIAN_FRONTEND", "noninteractive");
        cmd
    }
}

impl PackageInstaller for LinuxPackageInstaller {
    fn update_index(&self) -> Result<(), SetupError> {
        info!("Updating package index...");
        command::run_inherited(self.apt().arg("update"))
            .map_err(|e| SetupError::PackageInstallFailed(e.to_string()))
    }

    fn install(&self, packages: &[String]) -> Result<(), SetupError> {
        if packages.is_empty() {
            return Ok(());
        }
        info!("Installing packages: {}", packages.join(" "));
        command::run_inherited(self.apt().args(["install", "-y"]).args(packages))
            .map_err(|e| SetupError::PackageInstallFailed(e.to_string()))
    }
}
