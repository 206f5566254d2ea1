use crate::domain::power_board::{PowerBoardCli, PowerBoardError, Register, RegisterValue};
use crate::infrastructure::command::{self, CommandFailure};
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, info};

/// `lifepo4wered-cli get|set` を介して電源ボードと通信する
pub struct LifepoCli {
    program: PathBuf,
}

impl Default for LifepoCli {
    fn default() -> Self {
        Self::new("lifepo4wered-cli")
    }
}

impl LifepoCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn map_failure(&self, failure: CommandFailure) -> PowerBoardError {
        if failure.is_not_found() {
            PowerBoardError::NotInstalled(format!(
                "{} not found; run `power-ocr-meter install` first",
                self.program.display()
            ))
        } else {
            PowerBoardError::CommandFailed {
                command: failure.command().to_string(),
                stderr: failure.message(),
            }
        }
    }
}

/// The CLI prints either the bare value or `NAME = value`.
fn parse_value(register: Register, stdout: &str) -> Result<String, PowerBoardError> {
    let line = stdout.lines().map(str::trim).find(|l| !l.is_empty());
    let value = line.map(|l| match l.rsplit_once('=') {
        Some((_, v)) => v.trim(),
        None => l,
    });
    match value {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(PowerBoardError::UnexpectedOutput {
            register,
            output: stdout.to_string(),
        }),
    }
}

impl PowerBoardCli for LifepoCli {
    fn set(&self, register: Register, value: RegisterValue) -> Result<(), PowerBoardError> {
        if !register.is_writable() {
            return Err(PowerBoardError::ReadOnlyRegister(register));
        }

        info!("Setting {} to {}", register, value);
        command::run(
            Command::new(&self.program)
                .arg("set")
                .arg(register.name())
                .arg(value.to_string()),
        )
        .map_err(|e| self.map_failure(e))?;

        Ok(())
    }

    fn get(&self, register: Register) -> Result<String, PowerBoardError> {
        let output = command::run(Command::new(&self.program).arg("get").arg(register.name()))
            .map_err(|e| self.map_failure(e))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let value = parse_value(register, &stdout)?;
        debug!("{} = {}", register, value);
        Ok(value)
    }
}
