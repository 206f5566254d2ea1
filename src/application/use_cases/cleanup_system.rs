use crate::domain::service::ServiceManager;
use crate::domain::setup::{PrivilegeChecker, SetupError};
use std::sync::Arc;
use tracing::{info, warn};

/// モニターサービスを削除するユースケース
pub struct CleanupSystemUseCase {
    privileges: Arc<dyn PrivilegeChecker>,
    services: Arc<dyn ServiceManager>,
}

impl CleanupSystemUseCase {
    pub fn new(privileges: Arc<dyn PrivilegeChecker>, services: Arc<dyn ServiceManager>) -> Self {
        Self {
            privileges,
            services,
        }
    }

    /// Stop, disable and delete the monitor unit. Packages, group membership
    /// and the vendor tools are left in place.
    pub fn execute(&self, service_name: &str) -> Result<bool, SetupError> {
        info!("Starting system cleanup...");

        // Check if running as root
        if !self.privileges.is_root() {
            return Err(SetupError::PermissionDenied(
                "This command requires root privileges. Please run with sudo.".to_string(),
            ));
        }

        if let Err(e) = self.services.stop(service_name) {
            warn!("Could not stop {}: {}", service_name, e);
        }
        if let Err(e) = self.services.disable(service_name) {
            warn!("Could not disable {}: {}", service_name, e);
        }

        let removed = self.services.remove_unit(service_name)?;
        if removed {
            info!("Removed {}.service", service_name);
        } else {
            info!("{}.service was not installed", service_name);
        }
        self.services.daemon_reload()?;

        info!("System cleanup completed successfully!");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::mocks::{CallLog, FakeSystem, RecordingServices};
    use crate::config::AppConfig;
    use std::path::Path;
    use tracing_test::traced_test;

    #[test]
    fn test_removes_installed_unit() {
        let log = CallLog::default();
        let services = Arc::new(RecordingServices::new(log.clone()));
        let unit = AppConfig::default().service_unit("pi", Path::new("/srv/meter"));
        services.install_unit(&unit).unwrap();

        let use_case =
            CleanupSystemUseCase::new(Arc::new(FakeSystem::new(log.clone())), services.clone());
        assert!(use_case.execute("power-ocr-meter").unwrap());

        assert_eq!(
            &log.calls()[1..],
            &[
                "systemctl stop power-ocr-meter",
                "systemctl disable power-ocr-meter",
                "systemctl remove-unit power-ocr-meter",
                "systemctl daemon-reload ",
            ]
        );
        assert!(services.units.lock().unwrap().is_empty());
    }

    #[traced_test]
    #[test]
    fn test_stop_and_disable_failures_are_tolerated() {
        let log = CallLog::default();
        let services = RecordingServices::new(log.clone()).failing(&["stop", "disable"]);
        let use_case =
            CleanupSystemUseCase::new(Arc::new(FakeSystem::new(log.clone())), Arc::new(services));

        assert!(!use_case.execute("meter").unwrap());
        assert_eq!(log.calls().len(), 4);
        assert!(logs_contain("Could not stop meter"));
        assert!(logs_contain("Could not disable meter"));
    }

    #[test]
    fn test_requires_root() {
        let log = CallLog::default();
        let mut system = FakeSystem::new(log.clone());
        system.root = false;
        let use_case =
            CleanupSystemUseCase::new(Arc::new(system), Arc::new(RecordingServices::new(log.clone())));

        assert!(matches!(
            use_case.execute("meter"),
            Err(SetupError::PermissionDenied(_))
        ));
        assert!(log.calls().is_empty());
    }
}
