use crate::domain::service::{ActiveState, ServiceError, ServiceManager, ServiceStatus, ServiceUnit};
use crate::infrastructure::command::{self, CommandFailure};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, info};

/// Exit code of `systemctl status` for a unit systemd has never heard of.
const STATUS_NO_SUCH_UNIT: i32 = 4;

pub struct LinuxSystemdManager {
    systemctl: PathBuf,
    unit_dir: PathBuf,
}

impl Default for LinuxSystemdManager {
    fn default() -> Self {
        Self::new("systemctl", "/etc/systemd/system")
    }
}

impl LinuxSystemdManager {
    pub fn new(systemctl: impl Into<PathBuf>, unit_dir: impl Into<PathBuf>) -> Self {
        Self {
            systemctl: systemctl.into(),
            unit_dir: unit_dir.into(),
        }
    }

    fn unit_path(&self, name: &str) -> PathBuf {
        self.unit_dir.join(format!("{name}.service"))
    }

    fn systemctl(&self) -> Command {
        Command::new(&self.systemctl)
    }

    fn run(&self, args: &[&str]) -> Result<std::process::Output, ServiceError> {
        command::run(self.systemctl().args(args)).map_err(map_failure)
    }

    fn unit_action(&self, verb: &str, name: &str) -> Result<(), ServiceError> {
        let unit = format!("{name}.service");
        self.run(&[verb, &unit])?;
        info!("systemctl {} {}", verb, unit);
        Ok(())
    }
}

fn map_failure(failure: CommandFailure) -> ServiceError {
    match failure {
        CommandFailure::Spawn { command, source } => ServiceError::SpawnFailed {
            program: command,
            message: source.to_string(),
        },
        failure @ CommandFailure::Exit { .. } => ServiceError::CommandFailed {
            command: failure.command().to_string(),
            stderr: failure.message(),
        },
    }
}

impl ServiceManager for LinuxSystemdManager {
    fn install_unit(&self, unit: &ServiceUnit) -> Result<(), ServiceError> {
        let path = self.unit_path(&unit.name);
        info!("Writing systemd unit {}", path.display());

        fs::create_dir_all(&self.unit_dir)?;
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        file.write_all(unit.render().as_bytes())?;
        file.sync_all()?;

        info!("Created systemd service file at {}", path.display());
        Ok(())
    }

    fn remove_unit(&self, name: &str) -> Result<bool, ServiceError> {
        let path = self.unit_path(name);
        if !path.exists() {
            debug!("No unit file at {}", path.display());
            return Ok(false);
        }
        fs::remove_file(&path)?;
        info!("Removed service file: {}", path.display());
        Ok(true)
    }

    fn daemon_reload(&self) -> Result<(), ServiceError> {
        self.run(&["daemon-reload"])?;
        info!("Reloaded systemd daemon");
        Ok(())
    }

    fn enable(&self, name: &str) -> Result<(), ServiceError> {
        self.unit_action("enable", name)
    }

    fn disable(&self, name: &str) -> Result<(), ServiceError> {
        self.unit_action("disable", name)
    }

    fn start(&self, name: &str) -> Result<(), ServiceError> {
        self.unit_action("start", name)
    }

    fn stop(&self, name: &str) -> Result<(), ServiceError> {
        self.unit_action("stop", name)
    }

    fn restart(&self, name: &str) -> Result<(), ServiceError> {
        self.unit_action("restart", name)
    }

    fn status(&self, name: &str) -> Result<ServiceStatus, ServiceError> {
        let unit = format!("{name}.service");

        // 0 = running, 1-3 = dead / inactive; anything else is an error.
        let output = command::run_unchecked(self.systemctl().args(["status", "--no-pager", &unit]))
            .map_err(map_failure)?;
        match output.status.code() {
            Some(0..=3) => {}
            Some(STATUS_NO_SUCH_UNIT) => return Err(ServiceError::UnitNotFound(unit)),
            _ => {
                return Err(ServiceError::CommandFailed {
                    command: format!("{} status {}", self.systemctl.display(), unit),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }
        }
        let details = String::from_utf8_lossy(&output.stdout).to_string();

        let active = command::run_unchecked(self.systemctl().args(["is-active", &unit]))
            .map_err(map_failure)?;
        let active = ActiveState::parse(&String::from_utf8_lossy(&active.stdout));

        let enabled = command::run_unchecked(self.systemctl().args(["is-enabled", &unit]))
            .map_err(map_failure)?;
        let enabled = String::from_utf8_lossy(&enabled.stdout).trim().to_string();
        debug!("Service {} is-enabled result: {}", unit, enabled);

        Ok(ServiceStatus {
            name: name.to_string(),
            active,
            enabled: enabled == "enabled",
            details,
        })
    }
}
