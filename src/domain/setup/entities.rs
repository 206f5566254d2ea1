use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// LiFePO4wered ツールの取得元とビルド先
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorSource {
    pub repo_url: String,
    pub checkout_dir: PathBuf,
}

impl Default for VendorSource {
    fn default() -> Self {
        Self {
            repo_url: "https://github.com/xorbit/LiFePO4wered-Pi.git".to_string(),
            checkout_dir: PathBuf::from("/opt/LiFePO4wered-Pi"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    pub packages: Vec<String>,
    pub groups: Vec<String>,
    pub user: String,
    pub vendor: VendorSource,
    /// Vendor daemon unit enabled and started next to the monitor service.
    pub vendor_daemon: String,
}

pub fn default_packages() -> Vec<String> {
    [
        "python3-opencv",
        "python3-picamera2",
        "git",
        "build-essential",
        "libsystemd-dev",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn default_groups() -> Vec<String> {
    ["video", "i2c", "gpio"].iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallOptions {
    pub skip_packages: bool,
    pub skip_vendor: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallStep {
    PackagesInstalled(usize),
    GroupsUpdated { user: String, groups: Vec<String> },
    VendorToolPresent,
    VendorToolBuilt,
    UnitWritten(String),
    ServiceStarted(String),
}

impl fmt::Display for InstallStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallStep::PackagesInstalled(n) => write!(f, "installed {n} packages"),
            InstallStep::GroupsUpdated { user, groups } => {
                write!(f, "added {user} to {}", groups.join(","))
            }
            InstallStep::VendorToolPresent => write!(f, "lifepo4wered-cli already installed"),
            InstallStep::VendorToolBuilt => write!(f, "built and installed lifepo4wered tools"),
            InstallStep::UnitWritten(name) => write!(f, "wrote {name}"),
            InstallStep::ServiceStarted(name) => write!(f, "enabled and started {name}"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    pub steps: Vec<InstallStep>,
}

impl InstallReport {
    pub fn record(&mut self, step: InstallStep) {
        self.steps.push(step);
    }

    /// Group changes only apply to new login sessions.
    pub fn needs_relogin(&self) -> bool {
        self.steps
            .iter()
            .any(|s| matches!(s, InstallStep::GroupsUpdated { .. }))
    }
}
