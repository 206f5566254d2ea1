//! 電源ボードドメイン
//!
//! LiFePO4wered バッテリーバックアップボードのレジスタと、
//! ベンダー CLI を通じて適用する電源ポリシーを表現します。
//! レジスタの意味はベンダーファームウェアが決めるため、
//! ここでは名前・単位・書き込む値だけを扱います。

pub mod entities;
pub mod repositories;

// 主要な型の再エクスポート
pub use entities::{PowerPolicy, Register, RegisterReading, RegisterUnit, RegisterValue};
pub use repositories::{PowerBoardCli, PowerBoardError};
