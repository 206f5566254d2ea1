use super::entities::MonitorInvocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Monitor script not found: {0}")]
    ScriptNotFound(String),

    #[error("Failed to execute {program}: {message}")]
    ExecFailed { program: String, message: String },
}

pub trait MonitorLauncher: Send + Sync {
    /// Run the monitor in the foreground with the given extra environment.
    ///
    /// The Linux implementation replaces the current process, so a successful
    /// call does not return there.
    fn launch(
        &self,
        invocation: &MonitorInvocation,
        environment: &[(String, String)],
    ) -> Result<(), LaunchError>;
}
