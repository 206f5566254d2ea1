use crate::domain::service::{ServiceAction, ServiceError, ServiceManager, ServiceStatus};
use std::sync::Arc;
use tracing::info;

/// モニターサービスを起動・停止し、状態を返すユースケース
pub struct ControlServiceUseCase {
    services: Arc<dyn ServiceManager>,
}

impl ControlServiceUseCase {
    pub fn new(services: Arc<dyn ServiceManager>) -> Self {
        Self { services }
    }

    /// Run `action` on the unit and report its status afterwards.
    pub fn execute(&self, action: ServiceAction, name: &str) -> Result<ServiceStatus, ServiceError> {
        match action {
            ServiceAction::Start => {
                info!("Starting {}...", name);
                self.services.start(name)?;
            }
            ServiceAction::Stop => {
                info!("Stopping {}...", name);
                self.services.stop(name)?;
            }
            ServiceAction::Restart => {
                info!("Restarting {}...", name);
                self.services.restart(name)?;
            }
            ServiceAction::Status => {}
        }

        self.services.status(name)
    }
}
