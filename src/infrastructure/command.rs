//! Helpers shared by every adapter that shells out.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum CommandFailure {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with {code:?}: {stderr}")]
    Exit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl CommandFailure {
    pub fn command(&self) -> &str {
        match self {
            CommandFailure::Spawn { command, .. } | CommandFailure::Exit { command, .. } => {
                command
            }
        }
    }

    /// プログラム自体が見つからなかった
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CommandFailure::Spawn { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// 失敗した実行の標準エラー出力、または起動エラーの内容
    pub fn message(&self) -> String {
        match self {
            CommandFailure::Spawn { source, .. } => source.to_string(),
            CommandFailure::Exit { stderr, code, .. } if stderr.is_empty() => match code {
                Some(code) => format!("exit status {code}"),
                None => "terminated by signal".to_string(),
            },
            CommandFailure::Exit { stderr, .. } => stderr.clone(),
        }
    }
}

/// シェルで入力する形式でコマンドを表示用に整形
pub fn describe(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(OsStr::to_string_lossy)
        .collect::<Vec<_>>()
        .join(" ")
}

/// 出力を取得しつつ完了まで実行する。起動エラーと非ゼロ終了は失敗として扱う
pub fn run(cmd: &mut Command) -> Result<Output, CommandFailure> {
    let output = run_unchecked(cmd)?;
    if output.status.success() {
        Ok(output)
    } else {
        Err(CommandFailure::Exit {
            command: describe(cmd),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// 出力を取得しつつ完了まで実行する。終了ステータスの判定は呼び出し側に任せる
pub fn run_unchecked(cmd: &mut Command) -> Result<Output, CommandFailure> {
    let command = describe(cmd);
    debug!("Running: {}", command);
    cmd.output()
        .map_err(|source| CommandFailure::Spawn { command, source })
}

/// 標準入出力を引き継いで実行（apt や make の進捗をそのまま表示）
pub fn run_inherited(cmd: &mut Command) -> Result<(), CommandFailure> {
    let command = describe(cmd);
    debug!("Running: {}", command);
    let status = cmd.status().map_err(|source| CommandFailure::Spawn {
        command: command.clone(),
        source,
    })?;
    if status.success() {
        Ok(())
    } else {
        Err(CommandFailure::Exit {
            command,
            code: status.code(),
            stderr: String::new(),
        })
    }
}

/// `command -v` と同様に `PATH` から `program` を探す
pub fn find_in_path(program: &Path) -> Option<PathBuf> {
    if program.components().count() > 1 {
        return is_executable(program).then(|| program.to_path_buf());
    }
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let mut cmd = Command::new("systemctl");
        cmd.args(["status", "--no-pager", "power-ocr-meter.service"]);
        assert_eq!(
            describe(&cmd),
            "systemctl status --no-pager power-ocr-meter.service"
        );
    }

    #[test]
    fn test_failures() {
        let err = run(Command::new("false").arg("x")).unwrap_err();
        assert!(matches!(err, CommandFailure::Exit { code: Some(1), .. }));
        assert_eq!(err.command(), "false x");
        assert_eq!(err.message(), "exit status 1");

        let err = run(&mut Command::new("/nonexistent/definitely-not-here")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_find_in_path() {
        assert!(find_in_path(Path::new("sh")).is_some());
        assert!(find_in_path(Path::new("definitely-not-a-real-tool-xyz")).is_none());
        assert!(find_in_path(Path::new("/nonexistent/tool")).is_none());
    }
}
