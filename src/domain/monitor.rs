//! モニタードメイン
//!
//! 外部の OCR モニタープログラム（Python）の起動方法を表現します。
//! デーモン用のユニットと対話モードの両方が同じ起動定義を共有します。

pub mod entities;
pub mod repositories;

// 主要な型の再エクスポート
pub use entities::{MonitorInvocation, Resolution};
pub use repositories::{LaunchError, MonitorLauncher};
