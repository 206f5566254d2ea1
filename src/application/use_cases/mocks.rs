//! Recording test doubles shared by the use case tests.

use crate::domain::meter::{Frame, FrameLoader, MeterError, Reading, ReadingLog};
use crate::domain::monitor::{LaunchError, MonitorInvocation, MonitorLauncher};
use crate::domain::power_board::{PowerBoardCli, PowerBoardError, Register, RegisterValue};
use crate::domain::service::{ActiveState, ServiceError, ServiceManager, ServiceStatus, ServiceUnit};
use crate::domain::setup::{
    PackageInstaller, PrivilegeChecker, SetupError, UserGroupManager, VendorSource,
    VendorToolBuilder,
};
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Ordered log of calls made across several doubles.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, call: impl Into<String>) {
        self.0.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

pub struct RecordingBoard {
    pub log: CallLog,
    pub fail_on: Option<Register>,
}

impl RecordingBoard {
    pub fn new(log: CallLog) -> Self {
        Self { log, fail_on: None }
    }

    fn check(&self, register: Register, command: String) -> Result<(), PowerBoardError> {
        self.log.push(command.clone());
        if self.fail_on == Some(register) {
            return Err(PowerBoardError::CommandFailed {
                command,
                stderr: "i2c error".to_string(),
            });
        }
        Ok(())
    }
}

impl PowerBoardCli for RecordingBoard {
    fn set(&self, register: Register, value: RegisterValue) -> Result<(), PowerBoardError> {
        self.check(register, format!("set {register} {value}"))
    }

    fn get(&self, register: Register) -> Result<String, PowerBoardError> {
        self.check(register, format!("get {register}"))?;
        Ok("42".to_string())
    }
}

pub struct RecordingServices {
    pub log: CallLog,
    pub failing: Vec<&'static str>,
    pub units: Mutex<HashMap<String, String>>,
}

impl RecordingServices {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            failing: Vec::new(),
            units: Mutex::new(HashMap::new()),
        }
    }

    pub fn failing(mut self, verbs: &[&'static str]) -> Self {
        self.failing = verbs.to_vec();
        self
    }

    fn call(&self, verb: &'static str, name: &str) -> Result<(), ServiceError> {
        self.log.push(format!("systemctl {verb} {name}"));
        if self.failing.contains(&verb) {
            return Err(ServiceError::CommandFailed {
                command: format!("systemctl {verb} {name}.service"),
                stderr: format!("Unit {name}.service not loaded."),
            });
        }
        Ok(())
    }
}

impl ServiceManager for RecordingServices {
    fn install_unit(&self, unit: &ServiceUnit) -> Result<(), ServiceError> {
        self.call("write-unit", &unit.name)?;
        self.units
            .lock()
            .unwrap()
            .insert(unit.name.clone(), unit.render());
        Ok(())
    }

    fn remove_unit(&self, name: &str) -> Result<bool, ServiceError> {
        self.call("remove-unit", name)?;
        Ok(self.units.lock().unwrap().remove(name).is_some())
    }

    fn daemon_reload(&self) -> Result<(), ServiceError> {
        self.call("daemon-reload", "")
    }

    fn enable(&self, name: &str) -> Result<(), ServiceError> {
        self.call("enable", name)
    }

    fn disable(&self, name: &str) -> Result<(), ServiceError> {
        self.call("disable", name)
    }

    fn start(&self, name: &str) -> Result<(), ServiceError> {
        self.call("start", name)
    }

    fn stop(&self, name: &str) -> Result<(), ServiceError> {
        self.call("stop", name)
    }

    fn restart(&self, name: &str) -> Result<(), ServiceError> {
        self.call("restart", name)
    }

    fn status(&self, name: &str) -> Result<ServiceStatus, ServiceError> {
        self.call("status", name)?;
        Ok(ServiceStatus {
            name: name.to_string(),
            active: ActiveState::Inactive,
            enabled: true,
            details: format!("○ {name}.service"),
        })
    }
}

pub struct RecordingLauncher {
    pub log: CallLog,
    pub launched: Mutex<Option<(MonitorInvocation, Vec<(String, String)>)>>,
}

impl RecordingLauncher {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            launched: Mutex::new(None),
        }
    }
}

impl MonitorLauncher for RecordingLauncher {
    fn launch(
        &self,
        invocation: &MonitorInvocation,
        environment: &[(String, String)],
    ) -> Result<(), LaunchError> {
        self.log.push(format!("exec {}", invocation.command_line()));
        *self.launched.lock().unwrap() = Some((invocation.clone(), environment.to_vec()));
        Ok(())
    }
}

/// Installer side: privileges, apt, usermod and the vendor build in one double.
pub struct FakeSystem {
    pub log: CallLog,
    pub root: bool,
    pub vendor_installed: bool,
    pub fail_packages: bool,
}

impl FakeSystem {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            root: true,
            vendor_installed: false,
            fail_packages: false,
        }
    }
}

impl PrivilegeChecker for FakeSystem {
    fn is_root(&self) -> bool {
        self.root
    }
}

impl PackageInstaller for FakeSystem {
    fn update_index(&self) -> Result<(), SetupError> {
        self.log.push("apt-get update");
        Ok(())
    }

    fn install(&self, packages: &[String]) -> Result<(), SetupError> {
        self.log.push(format!("apt-get install -y {}", packages.join(" ")));
        if self.fail_packages {
            return Err(SetupError::PackageInstallFailed("E: Unable to locate package".to_string()));
        }
        Ok(())
    }
}

impl UserGroupManager for FakeSystem {
    fn add_to_groups(&self, user: &str, groups: &[String]) -> Result<(), SetupError> {
        self.log.push(format!("usermod -aG {} {}", groups.join(","), user));
        Ok(())
    }
}

impl VendorToolBuilder for FakeSystem {
    fn is_installed(&self) -> bool {
        self.vendor_installed
    }

    fn fetch(&self, source: &VendorSource) -> Result<(), SetupError> {
        self.log.push(format!("git clone {}", source.repo_url));
        Ok(())
    }

    fn build_and_install(&self, _source: &VendorSource) -> Result<(), SetupError> {
        self.log.push("make all");
        self.log.push("make user-install");
        Ok(())
    }
}

/// Serves frames from memory by path.
pub struct MemoryFrames(pub HashMap<PathBuf, Frame>);

impl FrameLoader for MemoryFrames {
    fn load(&self, path: &Path) -> Result<Frame, MeterError> {
        self.0
            .get(path)
            .cloned()
            .ok_or_else(|| MeterError::FrameRead {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
    }
}

#[derive(Default)]
pub struct MemoryLog {
    pub rows: Vec<(NaiveDateTime, Reading)>,
}

impl ReadingLog for MemoryLog {
    fn append(&mut self, at: NaiveDateTime, reading: &Reading) -> Result<(), MeterError> {
        self.rows.push((at, reading.clone()));
        Ok(())
    }

    fn path(&self) -> &Path {
        Path::new("memory.csv")
    }
}
