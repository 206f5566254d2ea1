//! ドメイン層
//! 
//! 電源ボード、サービス、モニター起動、インストール、メーター読み取りの
//! ドメインモデルを含む層

pub mod meter;
pub mod monitor;
pub mod power_board;
pub mod service;
pub mod setup;
