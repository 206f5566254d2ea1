//! インフラストラクチャ層
//!
//! ドメイン層のトレイトを Linux 上の外部コマンドとファイルで実装します。

pub mod command;
pub mod meter;
pub mod monitor;
pub mod power_board;
pub mod service;
pub mod setup;
