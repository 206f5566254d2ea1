use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;

/// A `Type=simple` unit that keeps one long-running program alive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUnit {
    pub name: String,
    pub description: String,
    pub user: String,
    pub group: String,
    pub working_directory: PathBuf,
    pub environment: Vec<(String, String)>,
    /// Seconds to sleep before each start; gives the camera stack time to settle after boot.
    pub start_delay_secs: u32,
    pub exec_start: String,
    pub restart_sec: u32,
    pub timeout_stop_sec: u32,
}

impl ServiceUnit {
    pub fn file_name(&self) -> String {
        format!("{}.service", self.name)
    }

    /// ユニットファイルの内容を生成
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("[Unit]\n");
        let _ = writeln!(out, "Description={}", self.description);
        out.push_str("After=network-online.target\n");
        out.push_str("Wants=network-online.target\n");
        out.push('\n');

        out.push_str("[Service]\n");
        out.push_str("Type=simple\n");
        let _ = writeln!(out, "User={}", self.user);
        let _ = writeln!(out, "Group={}", self.group);
        let _ = writeln!(out, "WorkingDirectory={}", self.working_directory.display());
        for (key, value) in &self.environment {
            let _ = writeln!(out, "Environment=\"{key}={value}\"");
        }
        if self.start_delay_secs > 0 {
            let _ = writeln!(out, "ExecStartPre=/bin/sleep {}", self.start_delay_secs);
        }
        let _ = writeln!(out, "ExecStart={}", self.exec_start);
        out.push_str("Restart=always\n");
        let _ = writeln!(out, "RestartSec={}", self.restart_sec);
        out.push_str("KillSignal=SIGTERM\n");
        let _ = writeln!(out, "TimeoutStopSec={}", self.timeout_stop_sec);
        out.push_str("StandardOutput=journal\n");
        out.push_str("StandardError=journal\n");
        out.push('\n');

        out.push_str("[Install]\n");
        out.push_str("WantedBy=multi-user.target\n");
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    Start,
    Stop,
    Restart,
    Status,
}

impl ServiceAction {
    pub fn verb(&self) -> &'static str {
        match self {
            ServiceAction::Start => "start",
            ServiceAction::Stop => "stop",
            ServiceAction::Restart => "restart",
            ServiceAction::Status => "status",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveState {
    Active,
    Activating,
    Deactivating,
    Inactive,
    Failed,
    Unknown,
}

impl ActiveState {
    /// Parse the single word printed by `systemctl is-active`.
    pub fn parse(word: &str) -> Self {
        match word.trim() {
            "active" | "reloading" => ActiveState::Active,
            "activating" => ActiveState::Activating,
            "deactivating" => ActiveState::Deactivating,
            "inactive" => ActiveState::Inactive,
            "failed" => ActiveState::Failed,
            _ => ActiveState::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStatus {
    pub name: String,
    pub active: ActiveState,
    pub enabled: bool,
    /// Human readable `systemctl status` output.
    pub details: String,
}

impl ServiceStatus {
    pub fn is_running(&self) -> bool {
        matches!(self.active, ActiveState::Active | ActiveState::Activating)
    }
}

/// ユニットのジャーナルをどう読むかの指定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalQuery {
    pub unit: String,
    pub lines: u32,
    pub follow: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_unit() -> ServiceUnit {
        ServiceUnit {
            name: "power-ocr-meter".to_string(),
            description: "Power OCR Meter".to_string(),
            user: "pi".to_string(),
            group: "pi".to_string(),
            working_directory: PathBuf::from("/home/pi/power-ocr-meter"),
            environment: vec![
                ("PYTHONUNBUFFERED".to_string(), "1".to_string()),
                ("LIBCAMERA_LOG_LEVELS".to_string(), "*:ERROR".to_string()),
            ],
            start_delay_secs: 5,
            exec_start: "/usr/bin/python3 /home/pi/power-ocr-meter/power_meter_ocr_monitor.py"
                .to_string(),
            restart_sec: 2,
            timeout_stop_sec: 10,
        }
    }

    #[test]
    fn test_render_service_section() {
        let text = sample_unit().render();
        assert!(text.starts_with("[Unit]\n"));
        assert!(text.contains("Type=simple\n"));
        assert!(text.contains("User=pi\nGroup=pi\n"));
        assert!(text.contains("WorkingDirectory=/home/pi/power-ocr-meter\n"));
        assert!(text.contains("Environment=\"PYTHONUNBUFFERED=1\"\n"));
        assert!(text.contains("Environment=\"LIBCAMERA_LOG_LEVELS=*:ERROR\"\n"));
        assert!(text.contains("ExecStartPre=/bin/sleep 5\n"));
        assert!(text.contains("Restart=always\nRestartSec=2\n"));
        assert!(text.contains("TimeoutStopSec=10\n"));
        assert!(text.ends_with("WantedBy=multi-user.target\n"));
    }

    #[test]
    fn test_render_without_start_delay() {
        let unit = ServiceUnit {
            start_delay_secs: 0,
            ..sample_unit()
        };
        assert!(!unit.render().contains("ExecStartPre"));
        assert_eq!(unit.file_name(), "power-ocr-meter.service");
    }

    #[test]
    fn test_active_state_parse() {
        assert_eq!(ActiveState::parse("active\n"), ActiveState::Active);
        assert_eq!(ActiveState::parse("inactive"), ActiveState::Inactive);
        assert_eq!(ActiveState::parse("failed"), ActiveState::Failed);
        assert_eq!(ActiveState::parse(""), ActiveState::Unknown);
    }
}
