//! サービスドメイン
//!
//! モニターを常駐させる systemd ユニットの内容と、
//! サービスの起動・停止・状態確認・ジャーナル参照の抽象を提供します。

pub mod entities;
pub mod repositories;

// 主要な型の再エクスポート
pub use entities::{ActiveState, JournalQuery, ServiceAction, ServiceStatus, ServiceUnit};
pub use repositories::{JournalLines, JournalReader, ServiceError, ServiceManager};
