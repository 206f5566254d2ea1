use crate::domain::service::{JournalLines, JournalQuery, JournalReader, ServiceError};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, warn};

const CHANNEL_CAPACITY: usize = 256;

/// `journalctl -u <unit>` を実行してユニットのログを読み取る
pub struct JournalctlReader {
    journalctl: PathBuf,
}

impl Default for JournalctlReader {
    fn default() -> Self {
        Self::new("journalctl")
    }
}

impl JournalctlReader {
    pub fn new(journalctl: impl Into<PathBuf>) -> Self {
        Self {
            journalctl: journalctl.into(),
        }
    }

    fn args(query: &JournalQuery) -> Vec<String> {
        let mut args = vec![
            "-u".to_string(),
            format!("{}.service", query.unit),
            "-n".to_string(),
            query.lines.to_string(),
            "--no-pager".to_string(),
        ];
        if query.follow {
            args.push("-f".to_string());
        }
        args
    }
}

#[async_trait]
impl JournalReader for JournalctlReader {
    async fn open(&self, query: &JournalQuery) -> Result<JournalLines, ServiceError> {
        let args = Self::args(query);
        let command = format!("{} {}", self.journalctl.display(), args.join(" "));
        debug!("Running: {}", command);

        let mut child = Command::new(&self.journalctl)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ServiceError::SpawnFailed {
                program: self.journalctl.display().to_string(),
                message: e.to_string(),
            })?;

        let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
            (Some(stdout), Some(stderr)) => (stdout, stderr),
            _ => {
                return Err(ServiceError::SpawnFailed {
                    program: self.journalctl.display().to_string(),
                    message: "output was not captured".to_string(),
                });
            }
        };

        // journalctl prints hints and errors on stderr; keep them for the failure report.
        let stderr_task = tokio::spawn(async move {
            let mut collected = Vec::new();
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                warn!("journalctl: {}", line);
                collected.push(line);
            }
            collected.join("\n")
        });

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if tx.send(Ok(line)).await.is_err() {
                            // receiver gone; dropping the child kills journalctl
                            return;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        warn!("Failed to read journal output: {}", e);
                        break;
                    }
                }
            }

            let failure = match child.wait().await {
                Ok(status) if status.success() => {
                    debug!("journalctl exited with {}", status);
                    None
                }
                Ok(status) => {
                    let stderr = stderr_task.await.unwrap_or_default();
                    let stderr = if stderr.trim().is_empty() {
                        match status.code() {
                            Some(code) => format!("exit status {code}"),
                            None => "terminated by signal".to_string(),
                        }
                    } else {
                        stderr.trim().to_string()
                    };
                    Some(ServiceError::CommandFailed { command, stderr })
                }
                Err(e) => Some(ServiceError::SpawnFailed {
                    program: command,
                    message: e.to_string(),
                }),
            };
            if let Some(error) = failure {
                let _ = tx.send(Err(error)).await;
            }
        });

        Ok(rx)
    }
}
