use crate::domain::monitor::{LaunchError, MonitorInvocation, MonitorLauncher};
use crate::domain::service::ServiceManager;
use std::sync::Arc;
use tracing::{info, warn};

/// カメラを解放するためにデーモンを停止し、モニターをフォアグラウンドで実行するユースケース
pub struct RunInteractiveUseCase {
    services: Arc<dyn ServiceManager>,
    launcher: Arc<dyn MonitorLauncher>,
}

impl RunInteractiveUseCase {
    pub fn new(services: Arc<dyn ServiceManager>, launcher: Arc<dyn MonitorLauncher>) -> Self {
        Self { services, launcher }
    }

    pub fn execute(
        &self,
        service_name: &str,
        invocation: &MonitorInvocation,
        environment: &[(String, String)],
    ) -> Result<(), LaunchError> {
        info!("Stopping {} to release the camera...", service_name);
        // The service may be missing or already stopped.
        if let Err(e) = self.services.stop(service_name) {
            warn!("Could not stop {} (continuing): {}", service_name, e);
        }

        info!("Launching monitor in the foreground");
        self.launcher.launch(invocation, environment)
    }
}
