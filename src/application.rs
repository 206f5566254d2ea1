//! アプリケーション層
//!
//! サブコマンドごとのユースケースを提供します。

pub mod use_cases;
