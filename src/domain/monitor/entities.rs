use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Camera resolution written as `WxH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let (w, h) = lower
            .split_once('x')
            .ok_or_else(|| format!("resolution {s:?} is not in WxH form"))?;
        let width: u32 = w
            .parse()
            .map_err(|_| format!("invalid width in resolution {s:?}"))?;
        let height: u32 = h
            .parse()
            .map_err(|_| format!("invalid height in resolution {s:?}"))?;
        if width == 0 || height == 0 {
            return Err(format!("resolution {s:?} has a zero side"));
        }
        Ok(Self::new(width, height))
    }
}

impl TryFrom<String> for Resolution {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Resolution> for String {
    fn from(value: Resolution) -> Self {
        value.to_string()
    }
}

/// How to start the OCR monitor program.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorInvocation {
    pub python: PathBuf,
    pub script: PathBuf,
    pub interval_secs: f64,
    pub resolution: Resolution,
    pub log_dir: String,
    /// Show the OpenCV preview window. The daemon always runs headless.
    pub preview: bool,
    pub extra_args: Vec<String>,
}

impl MonitorInvocation {
    /// Arguments passed to the monitor script, without the interpreter and script path.
    pub fn script_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(7 + self.extra_args.len());
        if !self.preview {
            args.push("--no-preview".to_string());
        }
        args.push("--interval".to_string());
        args.push(self.interval_secs.to_string());
        args.push("--resolution".to_string());
        args.push(self.resolution.to_string());
        args.push("--log-dir".to_string());
        args.push(self.log_dir.clone());
        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// ユニットの `ExecStart=` にそのまま書けるコマンドラインを返します。
    ///
    /// 空白や引用符を含む引数は systemd の規則に従ってクォートされます。
    pub fn command_line(&self) -> String {
        let mut parts = vec![
            exec_quote(&self.python.display().to_string()),
            exec_quote(&self.script.display().to_string()),
        ];
        parts.extend(self.script_args().iter().map(|arg| exec_quote(arg)));
        parts.join(" ")
    }

    pub fn headless(mut self) -> Self {
        self.preview = false;
        self
    }
}

/// Quote one `ExecStart=` word. `%` and `$` are doubled so systemd does not
/// expand them as specifiers or variables.
fn exec_quote(arg: &str) -> String {
    let escaped = arg.replace('%', "%%").replace('$', "$$");
    let needs_quotes = escaped.is_empty()
        || escaped
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\' | ';'));
    if !needs_quotes {
        return escaped;
    }
    format!("\"{}\"", escaped.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation() -> MonitorInvocation {
        MonitorInvocation {
            python: PathBuf::from("/usr/bin/python3"),
            script: PathBuf::from("/home/pi/meter/power_meter_ocr_monitor.py"),
            interval_secs: 5.0,
            resolution: Resolution::default(),
            log_dir: "logs".to_string(),
            preview: true,
            extra_args: Vec::new(),
        }
    }

    #[test]
    fn test_resolution_parse() {
        assert_eq!("800x600".parse::<Resolution>(), Ok(Resolution::new(800, 600)));
        assert_eq!("1920X1080".parse::<Resolution>(), Ok(Resolution::new(1920, 1080)));
        assert!("800".parse::<Resolution>().is_err());
        assert!("0x600".parse::<Resolution>().is_err());
        assert!("axb".parse::<Resolution>().is_err());
    }

    #[test]
    fn test_headless_command_line() {
        assert_eq!(
            invocation().headless().command_line(),
            "/usr/bin/python3 /home/pi/meter/power_meter_ocr_monitor.py --no-preview --interval 5 --resolution 800x600 --log-dir logs"
        );
    }

    #[test]
    fn test_preview_args_keep_extra_args_last() {
        let mut inv = invocation();
        inv.interval_secs = 0.35;
        inv.extra_args = vec!["--foo".to_string()];
        assert_eq!(
            inv.script_args(),
            vec![
                "--interval",
                "0.35",
                "--resolution",
                "800x600",
                "--log-dir",
                "logs",
                "--foo"
            ]
        );
    }

    #[test]
    fn test_command_line_quotes_paths_with_spaces() {
        let mut inv = invocation().headless();
        inv.script = PathBuf::from("/home/pi/My Meter/power_meter_ocr_monitor.py");
        inv.log_dir = "logs 2025".to_string();
        inv.extra_args = vec![String::new(), "say \"hi\"".to_string()];
        assert_eq!(
            inv.command_line(),
            r#"/usr/bin/python3 "/home/pi/My Meter/power_meter_ocr_monitor.py" --no-preview --interval 5 --resolution 800x600 --log-dir "logs 2025" "" "say \"hi\"""#
        );
    }

    #[test]
    fn test_command_line_escapes_specifiers() {
        let mut inv = invocation().headless();
        inv.log_dir = "/var/log/%i".to_string();
        inv.extra_args = vec!["C:\\tmp".to_string(), "$HOME".to_string()];
        assert!(inv
            .command_line()
            .ends_with(r#"--log-dir /var/log/%%i "C:\\tmp" $$HOME"#));
    }
}
