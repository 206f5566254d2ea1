//! systemd サービス管理とジャーナル参照の実装

mod journalctl_reader;
mod linux_systemd_manager;

pub use journalctl_reader::JournalctlReader;
pub use linux_systemd_manager::LinuxSystemdManager;
