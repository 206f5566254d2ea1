mod cli;

use crate::cli::{Cli, Commands, Lp4wCommand, ServiceCommand};
use anyhow::Context;
use chrono::Local;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

use power_ocr_meter::application::use_cases::{
    ApplyPowerPolicyUseCase, CleanupSystemUseCase, ControlServiceUseCase, DecodeFramesUseCase,
    DumpPowerRegistersUseCase, FollowLogsUseCase, RunInteractiveUseCase, SetupSystemUseCase,
};
use power_ocr_meter::config::AppConfig;
use power_ocr_meter::debug::{debug_helpers::log_error_details, init_logging};
use power_ocr_meter::domain::meter::ReadingLog;
use power_ocr_meter::domain::power_board::RegisterReading;
use power_ocr_meter::domain::service::{JournalQuery, ServiceAction};
use power_ocr_meter::domain::setup::InstallOptions;
use power_ocr_meter::infrastructure::meter::{CsvReadingLog, PgmFrameLoader};
use power_ocr_meter::infrastructure::monitor::ExecMonitorLauncher;
use power_ocr_meter::infrastructure::power_board::LifepoCli;
use power_ocr_meter::infrastructure::service::{JournalctlReader, LinuxSystemdManager};
use power_ocr_meter::infrastructure::setup::{
    LinuxGroupManager, LinuxPackageInstaller, LinuxPrivilegeChecker, LinuxVendorBuilder,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let debug_config = config.logging.clone().with_verbosity(cli.verbose);
    if let Err(e) = init_logging(&debug_config) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if let Err(e) = run(cli.command, config).await {
        log_error_details(&*e, "command failed");
        error!("{:#}", e);
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(command: Commands, mut config: AppConfig) -> anyhow::Result<()> {
    let tools = config.tools.clone();

    // Dependency injection
    let systemd_manager = Arc::new(LinuxSystemdManager::new(
        tools.systemctl.clone(),
        config.service.unit_dir.clone(),
    ));
    let board = Arc::new(LifepoCli::new(config.power_board.cli.clone()));

    match command {
        Commands::Install {
            skip_packages,
            skip_vendor,
        } => {
            info!("Executing install command...");
            let user = config.service_user()?;
            let repo_dir = config.repo_dir()?;
            let plan = config.install_plan(&user);
            let unit = config.service_unit(&user, &repo_dir);

            let privileges = Arc::new(LinuxPrivilegeChecker::new());
            let use_case = SetupSystemUseCase::new(
                privileges,
                Arc::new(LinuxPackageInstaller::new(tools.apt_get.clone())),
                Arc::new(LinuxGroupManager::new(tools.usermod.clone())),
                Arc::new(LinuxVendorBuilder::new(
                    config.power_board.cli.clone(),
                    tools.git.clone(),
                    tools.make.clone(),
                )),
                systemd_manager,
            );

            let report = use_case
                .execute(&plan, &unit, InstallOptions { skip_packages, skip_vendor })
                .context("Install failed")?;
            for step in &report.steps {
                println!("✅ {}", step);
            }
            println!("✅ Installation completed successfully!");
            if report.needs_relogin() {
                println!("⚠️  Log out and back in (or reboot) for {} to pick up the new groups.", user);
            }
        }
        Commands::Uninstall => {
            info!("Executing uninstall command...");
            let use_case =
                CleanupSystemUseCase::new(Arc::new(LinuxPrivilegeChecker::new()), systemd_manager);
            let removed = use_case
                .execute(&config.service.name)
                .context("Uninstall failed")?;
            if removed {
                println!("✅ {}.service removed", config.service.name);
            } else {
                println!("✅ {}.service was not installed", config.service.name);
            }
        }
        Commands::Service { action } => {
            let action = match action {
                ServiceCommand::Start => ServiceAction::Start,
                ServiceCommand::Stop => ServiceAction::Stop,
                ServiceCommand::Restart => ServiceAction::Restart,
                ServiceCommand::Status => ServiceAction::Status,
            };
            let use_case = ControlServiceUseCase::new(systemd_manager);
            let status = use_case
                .execute(action, &config.service.name)
                .with_context(|| format!("systemctl {} failed", action.verb()))?;
            println!("{}", status.details.trim_end());
            if status.is_running() {
                println!("✅ {} is running", status.name);
            } else {
                println!("⚠️  {} is {:?}", status.name, status.active);
            }
        }
        Commands::Interactive { args } => {
            let repo_dir = config.repo_dir()?;
            let mut invocation = config.monitor_invocation(&repo_dir);
            invocation.extra_args = args;

            let use_case =
                RunInteractiveUseCase::new(systemd_manager, Arc::new(ExecMonitorLauncher::new()));
            use_case.execute(
                &config.service.name,
                &invocation,
                &config.monitor_environment(),
            )?;
        }
        Commands::Lp4w { action } => match action {
            Lp4wCommand::Set { persist } => {
                let mut policy = config.power_board.policy.clone();
                policy.persist |= persist;
                let readings = ApplyPowerPolicyUseCase::new(board)
                    .execute(&policy)
                    .context("Failed to apply power policy")?;
                println!("✅ Power policy applied");
                print_readings(&readings);
            }
            Lp4wCommand::Dump { json } => {
                let readings = DumpPowerRegistersUseCase::new(board).execute()?;
                if json {
                    let object: serde_json::Map<String, serde_json::Value> = readings
                        .iter()
                        .map(|r| (r.register.to_string(), serde_json::Value::from(r.value.clone())))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&object)?);
                } else {
                    print_readings(&readings);
                }
            }
        },
        Commands::Logs { follow, lines } => {
            let query = JournalQuery {
                unit: config.service.name.clone(),
                lines,
                follow,
            };
            let use_case = FollowLogsUseCase::new(Arc::new(JournalctlReader::new(
                tools.journalctl.clone(),
            )));
            use_case.execute(&query, |line| println!("{}", line)).await?;
        }
        Commands::Decode {
            frames,
            threshold,
            log_dir,
        } => {
            if let Some(threshold) = threshold {
                config.meter.binary_threshold = threshold;
            }
            let mut log = log_dir
                .map(|dir| CsvReadingLog::create(&dir, Local::now().naive_local()))
                .transpose()?;

            let use_case = DecodeFramesUseCase::new(Arc::new(PgmFrameLoader::new()), config.decoder());
            let readings = use_case.execute(
                &frames,
                log.as_mut().map(|l| l as &mut dyn ReadingLog),
            )?;

            for (path, reading) in &readings {
                if reading.is_valid() {
                    println!("{}: {}", path.display(), reading);
                } else {
                    println!("{}: {} ({})", path.display(), reading, reading.error);
                }
            }
            if let Some(log) = &log {
                println!("📝 Readings written to {}", log.path().display());
            }
        }
    }

    Ok(())
}

fn print_readings(readings: &[RegisterReading]) {
    for reading in readings {
        println!("  {}", reading);
    }
}
