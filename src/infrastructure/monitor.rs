//! OCR モニターの起動実装

mod exec_launcher;

pub use exec_launcher::ExecMonitorLauncher;
