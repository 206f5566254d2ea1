use crate::domain::setup::{SetupError, VendorSource, VendorToolBuilder};
use crate::infrastructure::command;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, info};

/// git と make で LiFePO4wered-Pi のソースを取得・ビルドする
pub struct LinuxVendorBuilder {
    cli: PathBuf,
    git: PathBuf,
    make: PathBuf,
}

impl Default for LinuxVendorBuilder {
    fn default() -> Self {
        Self::new("lifepo4wered-cli", "git", "make")
    }
}

impl LinuxVendorBuilder {
    pub fn new(cli: impl Into<PathBuf>, git: impl Into<PathBuf>, make: impl Into<PathBuf>) -> Self {
        Self {
            cli: cli.into(),
            git: git.into(),
            make: make.into(),
        }
    }

    fn make(&self, source: &VendorSource, target: &str) -> Result<(), SetupError> {
        info!("Running make {} in {}", target, source.checkout_dir.display());
        command::run_inherited(
            Command::new(&self.make)
                .arg("-C")
                .arg(&source.checkout_dir)
                .arg(target),
        )
        .map_err(|e| SetupError::VendorBuildFailed(e.to_string()))
    }
}

impl VendorToolBuilder for LinuxVendorBuilder {
    fn is_installed(&self) -> bool {
        let found = command::find_in_path(&self.cli);
        debug!("{} resolved to {:?}", self.cli.display(), found);
        found.is_some()
    }

    fn fetch(&self, source: &VendorSource) -> Result<(), SetupError> {
        if source.checkout_dir.join(".git").exists() {
            info!(
                "Using existing checkout at {}",
                source.checkout_dir.display()
            );
            return Ok(());
        }

        if let Some(parent) = source.checkout_dir.parent() {
            fs::create_dir_all(parent)?;
        }

        info!("Cloning {}...", source.repo_url);
        command::run_inherited(
            Command::new(&self.git)
                .args(["clone", "--depth", "1"])
                .arg(&source.repo_url)
                .arg(&source.checkout_dir),
        )
        .map_err(|e| SetupError::VendorBuildFailed(e.to_string()))
    }

    fn build_and_install(&self, source: &VendorSource) -> Result<(), SetupError> {
        self.make(source, "all")?;
        self.make(source, "user-install")?;
        info!("Installed LiFePO4wered tools");
        Ok(())
    }
}
