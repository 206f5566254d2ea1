//! Configuration loading.
//!
//! Every field has a default, so the tool works without a configuration
//! file. A file at [`DEFAULT_CONFIG_PATH`] (or passed with `--config`)
//! overrides individual values:
//!
//! ```toml
//! [service]
//! user = "pi"
//! repo_dir = "/home/pi/power-ocr-meter"
//!
//! [monitor]
//! interval = 5.0
//! resolution = "800x600"
//!
//! [power_board]
//! persist = true
//! ```

use crate::debug::DebugConfig;
use crate::domain::meter::{MeterLayout, SevenSegmentDecoder};
use crate::domain::monitor::{MonitorInvocation, Resolution};
use crate::domain::power_board::PowerPolicy;
use crate::domain::service::ServiceUnit;
use crate::domain::setup::entities::{default_groups, default_packages};
use crate::domain::setup::{InstallPlan, VendorSource};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/power-ocr-meter/config.toml";

#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub monitor: MonitorConfig,
    pub power_board: PowerBoardConfig,
    pub install: InstallConfig,
    pub tools: ToolsConfig,
    pub meter: MeterConfig,
    pub logging: DebugConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub description: String,
    pub unit_dir: PathBuf,
    /// Account the monitor runs as. Falls back to `$SUDO_USER`, then the caller.
    pub user: Option<String>,
    /// Checkout holding the monitor script. Falls back to the working directory.
    pub repo_dir: Option<PathBuf>,
    pub start_delay_secs: u32,
    pub restart_sec: u32,
    pub timeout_stop_sec: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "power-ocr-meter".to_string(),
            description: "Power OCR Meter (PiCam -> 7-seg -> CSV)".to_string(),
            unit_dir: PathBuf::from("/etc/systemd/system"),
            user: None,
            repo_dir: None,
            start_delay_secs: 5,
            restart_sec: 2,
            timeout_stop_sec: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub python: PathBuf,
    /// Script path, relative to the repository directory unless absolute.
    pub script: PathBuf,
    pub interval: f64,
    pub resolution: Resolution,
    pub log_dir: String,
    pub libcamera_log_levels: String,
    pub opencv_log_level: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            python: PathBuf::from("/usr/bin/python3"),
            script: PathBuf::from("power_meter_ocr_monitor.py"),
            interval: 5.0,
            resolution: Resolution::default(),
            log_dir: "logs".to_string(),
            libcamera_log_levels: "*:ERROR".to_string(),
            opencv_log_level: "ERROR".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerBoardConfig {
    pub cli: PathBuf,
    pub daemon_service: String,
    #[serde(flatten)]
    pub policy: PowerPolicy,
}

impl Default for PowerBoardConfig {
    fn default() -> Self {
        Self {
            cli: PathBuf::from("lifepo4wered-cli"),
            daemon_service: "lifepo4wered-daemon".to_string(),
            policy: PowerPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    pub packages: Vec<String>,
    pub groups: Vec<String>,
    pub vendor: VendorSource,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            packages: default_packages(),
            groups: default_groups(),
            vendor: VendorSource::default(),
        }
    }
}

/// External programs, overridable so they can be pinned or stubbed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub systemctl: PathBuf,
    pub journalctl: PathBuf,
    pub apt_get: PathBuf,
    pub usermod: PathBuf,
    pub git: PathBuf,
    pub make: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            systemctl: PathBuf::from("systemctl"),
            journalctl: PathBuf::from("journalctl"),
            apt_get: PathBuf::from("apt-get"),
            usermod: PathBuf::from("usermod"),
            git: PathBuf::from("git"),
            make: PathBuf::from("make"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterConfig {
    /// Gray level above which a pixel counts as background.
    pub binary_threshold: u8,
    /// Black pixels needed inside a box for the element to be lit.
    pub on_threshold: usize,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            binary_threshold: 160,
            on_threshold: 100,
        }
    }
}

impl AppConfig {
    /// Load from `path`, or from [`DEFAULT_CONFIG_PATH`] when it exists.
    ///
    /// An explicitly given file must exist; a missing default file yields
    /// the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    debug!("No configuration at {}, using defaults", DEFAULT_CONFIG_PATH);
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound(path.to_path_buf())
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "service.name cannot be empty".to_string(),
            ));
        }
        if !(self.monitor.interval.is_finite() && self.monitor.interval > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "monitor.interval must be positive, got {}",
                self.monitor.interval
            )));
        }
        if self.power_board.policy.vin_threshold > u32::from(u16::MAX) {
            return Err(ConfigError::ValidationError(format!(
                "power_board.vin_threshold {} does not fit a 16-bit register",
                self.power_board.policy.vin_threshold
            )));
        }
        if let Some(user) = &self.service.user {
            if user.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "service.user cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Account the daemon runs as and that gets the device groups.
    pub fn service_user(&self) -> Result<String, ConfigError> {
        if let Some(user) = &self.service.user {
            return Ok(user.clone());
        }
        if let Ok(user) = std::env::var("SUDO_USER") {
            if !user.is_empty() {
                return Ok(user);
            }
        }
        nix::unistd::User::from_uid(nix::unistd::getuid())
            .ok()
            .flatten()
            .map(|u| u.name)
            .ok_or_else(|| {
                ConfigError::ValidationError(
                    "cannot determine the current user; set service.user".to_string(),
                )
            })
    }

    pub fn repo_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.service.repo_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().map_err(|e| {
                ConfigError::ValidationError(format!("cannot read working directory: {e}"))
            }),
        }
    }

    /// Foreground invocation with the preview window on.
    pub fn monitor_invocation(&self, repo_dir: &Path) -> MonitorInvocation {
        MonitorInvocation {
            python: self.monitor.python.clone(),
            script: repo_dir.join(&self.monitor.script),
            interval_secs: self.monitor.interval,
            resolution: self.monitor.resolution,
            log_dir: self.monitor.log_dir.clone(),
            preview: true,
            extra_args: Vec::new(),
        }
    }

    /// Variables that quiet the camera and OpenCV stacks.
    pub fn monitor_environment(&self) -> Vec<(String, String)> {
        vec![
            (
                "LIBCAMERA_LOG_LEVELS".to_string(),
                self.monitor.libcamera_log_levels.clone(),
            ),
            (
                "OPENCV_LOG_LEVEL".to_string(),
                self.monitor.opencv_log_level.clone(),
            ),
        ]
    }

    pub fn service_unit(&self, user: &str, repo_dir: &Path) -> ServiceUnit {
        let mut environment = vec![("PYTHONUNBUFFERED".to_string(), "1".to_string())];
        environment.extend(self.monitor_environment());

        ServiceUnit {
            name: self.service.name.clone(),
            description: self.service.description.clone(),
            user: user.to_string(),
            group: user.to_string(),
            working_directory: repo_dir.to_path_buf(),
            environment,
            start_delay_secs: self.service.start_delay_secs,
            exec_start: self.monitor_invocation(repo_dir).headless().command_line(),
            restart_sec: self.service.restart_sec,
            timeout_stop_sec: self.service.timeout_stop_sec,
        }
    }

    pub fn install_plan(&self, user: &str) -> InstallPlan {
        InstallPlan {
            packages: self.install.packages.clone(),
            groups: self.install.groups.clone(),
            user: user.to_string(),
            vendor: self.install.vendor.clone(),
            vendor_daemon: self.power_board.daemon_service.clone(),
        }
    }

    pub fn decoder(&self) -> SevenSegmentDecoder {
        let layout = MeterLayout {
            on_threshold: self.meter.on_threshold,
            ..MeterLayout::default()
        };
        SevenSegmentDecoder::new(layout, self.meter.binary_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_render_headless_exec_start() {
        let config = AppConfig::default();
        let unit = config.service_unit("pi", Path::new("/home/pi/power-ocr-meter"));
        assert_eq!(
            unit.exec_start,
            "/usr/bin/python3 /home/pi/power-ocr-meter/power_meter_ocr_monitor.py --no-preview --interval 5 --resolution 800x600 --log-dir logs"
        );
        let text = unit.render();
        assert!(text.contains("User=pi\n"));
        assert!(text.contains("Environment=\"PYTHONUNBUFFERED=1\"\n"));
        assert!(text.contains("Environment=\"OPENCV_LOG_LEVEL=ERROR\"\n"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
[service]
user = "meter"

[monitor]
interval = 0.35
resolution = "640x480"

[power_board]
persist = true
vin_threshold = 4700
"#,
        )
        .unwrap();

        assert_eq!(config.service.name, "power-ocr-meter");
        assert_eq!(config.service_user().unwrap(), "meter");
        assert_eq!(config.monitor.resolution, Resolution::new(640, 480));
        assert_eq!(config.monitor.log_dir, "logs");
        assert!(config.power_board.policy.persist);
        assert_eq!(config.power_board.policy.vin_threshold, 4700);
        assert_eq!(config.power_board.policy.auto_boot, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_resolution_is_parse_error() {
        let err = AppConfig::from_toml("[monitor]\nresolution = \"wide\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.monitor.interval = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        let mut config = AppConfig::default();
        config.power_board.policy.vin_threshold = 70_000;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.service.name = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[service]\nname = \"meter-test\"").unwrap();
        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.service.name, "meter-test");

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            AppConfig::load(Some(&missing)),
            Err(ConfigError::FileNotFound(_))
        ));
    }
}
