use crate::domain::setup::{SetupError, UserGroupManager};
use crate::infrastructure::command;
use std::path::PathBuf;
use std::process::Command;
use tracing::info;

pub struct LinuxGroupManager {
    usermod: PathBuf,
}

impl Default for LinuxGroupManager {
    fn default() -> Self {
        Self::new("usermod")
    }
}

impl LinuxGroupManager {
    pub fn new(usermod: impl Into<PathBuf>) -> Self {
        Self {
            usermod: usermod.into(),
        }
    }
}

impl UserGroupManager for LinuxGroupManager {
    fn add_to_groups(&self, user: &str, groups: &[String]) -> Result<(), SetupError> {
        if groups.is_empty() {
            return Ok(());
        }
        let joined = groups.join(",");
        command::run(Command::new(&self.usermod).args(["-aG", &joined, user])).map_err(|e| {
            SetupError::UserGroupFailed {
                user: user.to_string(),
                message: e.message(),
            }
        })?;

        info!("Added {} to groups {}", user, joined);
        Ok(())
    }
}
