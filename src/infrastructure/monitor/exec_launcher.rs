use crate::domain::monitor::{LaunchError, MonitorInvocation, MonitorLauncher};
use crate::infrastructure::command;
use std::os::unix::process::CommandExt;
use std::process::Command;
use tracing::info;

/// Replaces the current process with the monitor, like `exec` in a shell.
pub struct ExecMonitorLauncher;

impl Default for ExecMonitorLauncher {
    fn default() -> Self {
        Self
    }
}

impl ExecMonitorLauncher {
    pub fn new() -> Self {
        Self
    }

    fn command(invocation: &MonitorInvocation, environment: &[(String, String)]) -> Command {
        let mut cmd = Command::new(&invocation.python);
        cmd.arg(&invocation.script)
            .args(invocation.script_args())
            .envs(environment.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        cmd
    }
}

impl MonitorLauncher for ExecMonitorLauncher {
    fn launch(
        &self,
        invocation: &MonitorInvocation,
        environment: &[(String, String)],
    ) -> Result<(), LaunchError> {
        if !invocation.script.is_file() {
            return Err(LaunchError::ScriptNotFound(
                invocation.script.display().to_string(),
            ));
        }

        let mut cmd = Self::command(invocation, environment);
        info!("Executing {}", command::describe(&cmd));

        // Only returns on failure.
        let err = cmd.exec();
        Err(LaunchError::ExecFailed {
            program: invocation.python.display().to_string(),
            message: err.to_string(),
        })
    }
}
