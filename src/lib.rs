//! # Power OCR Meter
//!
//! Raspberry Pi のカメラで電力計の 7 セグメント LCD を読み取り、CSV に記録する
//! モニターを運用するためのツール群です。LiFePO4wered 電源ボードの設定、
//! systemd サービスの導入と制御、対話実行、撮影済みフレームのオフライン復号を
//! 提供します。
//!
//! このクレートは Domain-Driven Design (DDD) 原則に基づいて設計されており、
//! 以下の層に分かれています：
//!
//! - **Domain Layer**: ビジネスロジックとドメインモデル
//! - **Application Layer**: ユースケース
//! - **Infrastructure Layer**: 外部コマンドやファイルとの統合

pub mod application;
pub mod config;
pub mod debug;
pub mod domain;
pub mod infrastructure;
