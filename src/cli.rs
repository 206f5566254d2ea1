use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "power-ocr-meter",
    author = "Power OCR Meter Team",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_TIMESTAMP"), ")"),
    about = "Operate the camera-based power meter OCR monitor",
    long_about = "Install, control and inspect the power meter OCR monitor on a Raspberry Pi \
                  with a LiFePO4wered UPS board"
)]
pub struct Cli {
    /// Configuration file (defaults to /etc/power-ocr-meter/config.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install packages, vendor tools and the systemd service (requires root privileges)
    Install {
        /// Skip apt-get update/install
        #[arg(long)]
        skip_packages: bool,
        /// Skip fetching and building the LiFePO4wered tools
        #[arg(long)]
        skip_vendor: bool,
    },
    /// Stop, disable and remove the systemd service (requires root privileges)
    Uninstall,
    /// Control the monitor service
    Service {
        #[command(subcommand)]
        action: ServiceCommand,
    },
    /// Stop the service and run the monitor in the foreground with preview
    Interactive {
        /// Extra arguments passed to the monitor script
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Configure or inspect the LiFePO4wered board
    #[command(name = "lp4w")]
    Lp4w {
        #[command(subcommand)]
        action: Lp4wCommand,
    },
    /// Show the service journal
    Logs {
        /// Keep following new lines
        #[arg(short, long)]
        follow: bool,
        /// Number of lines to show
        #[arg(short = 'n', long, default_value = "50")]
        lines: u32,
    },
    /// Decode captured grayscale PGM frames
    Decode {
        /// Frame files or glob patterns
        #[arg(required = true)]
        frames: Vec<String>,
        /// Binary threshold (0-255)
        #[arg(short, long)]
        threshold: Option<u8>,
        /// Append readings to a new CSV file in this directory
        #[arg(short, long)]
        log_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ServiceCommand {
    Start,
    Stop,
    Restart,
    Status,
}

#[derive(Subcommand, Debug)]
pub enum Lp4wCommand {
    /// Apply the power policy, then dump the registers
    Set {
        /// Write the settings to flash
        #[arg(long)]
        persist: bool,
    },
    /// Print all registers
    Dump {
        /// Print as a JSON object
        #[arg(long)]
        json: bool,
    },
}
