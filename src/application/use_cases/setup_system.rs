use crate::domain::service::{ServiceManager, ServiceUnit};
use crate::domain::setup::{
    InstallOptions, InstallPlan, InstallReport, InstallStep, PackageInstaller, PrivilegeChecker,
    SetupError, UserGroupManager, VendorToolBuilder,
};
use std::sync::Arc;
use tracing::info;

/// パッケージ・電源ボードツール・サービスを導入するユースケース
pub struct SetupSystemUseCase {
    privileges: Arc<dyn PrivilegeChecker>,
    packages: Arc<dyn PackageInstaller>,
    groups: Arc<dyn UserGroupManager>,
    vendor: Arc<dyn VendorToolBuilder>,
    services: Arc<dyn ServiceManager>,
}

impl SetupSystemUseCase {
    pub fn new(
        privileges: Arc<dyn PrivilegeChecker>,
        packages: Arc<dyn PackageInstaller>,
        groups: Arc<dyn UserGroupManager>,
        vendor: Arc<dyn VendorToolBuilder>,
        services: Arc<dyn ServiceManager>,
    ) -> Self {
        Self {
            privileges,
            packages,
            groups,
            vendor,
            services,
        }
    }

    pub fn execute(
        &self,
        plan: &InstallPlan,
        unit: &ServiceUnit,
        options: InstallOptions,
    ) -> Result<InstallReport, SetupError> {
        info!("Starting system setup...");
        let mut report = InstallReport::default();

        // Check if running as root
        if !self.privileges.is_root() {
            return Err(SetupError::PermissionDenied(
                "This command requires root privileges. Please run with sudo.".to_string(),
            ));
        }

        if options.skip_packages {
            info!("Skipping OS packages");
        } else {
            self.packages.update_index()?;
            self.packages.install(&plan.packages)?;
            report.record(InstallStep::PackagesInstalled(plan.packages.len()));
        }

        info!("Adding {} to groups {}", plan.user, plan.groups.join(","));
        self.groups.add_to_groups(&plan.user, &plan.groups)?;
        report.record(InstallStep::GroupsUpdated {
            user: plan.user.clone(),
            groups: plan.groups.clone(),
        });

        if options.skip_vendor {
            info!("Skipping LiFePO4wered tools");
        } else if self.vendor.is_installed() {
            info!("lifepo4wered-cli already installed");
            report.record(InstallStep::VendorToolPresent);
        } else {
            crate::measure_time!("vendor_build", {
                self.vendor.fetch(&plan.vendor)?;
                self.vendor.build_and_install(&plan.vendor)?;
            });
            report.record(InstallStep::VendorToolBuilt);
        }

        info!("Creating {}...", unit.file_name());
        self.services.install_unit(unit)?;
        report.record(InstallStep::UnitWritten(unit.file_name()));
        self.services.daemon_reload()?;

        for name in [plan.vendor_daemon.as_str(), unit.name.as_str()] {
            info!("Enabling and starting {}...", name);
            self.services.enable(name)?;
            self.services.start(name)?;
            report.record(InstallStep::ServiceStarted(name.to_string()));
        }

        info!("System setup completed successfully!");
        Ok(report)
    }
}
