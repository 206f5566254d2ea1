//! デバッグとログ機能
//!
//! プロジェクト全体のログ初期化とエラー出力の補助を提供

use serde::{Deserialize, Serialize};
use std::fs;
use tracing::{debug, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// ログレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Raise the level by `steps` (one per `-v`).
    pub fn raised(self, steps: u8) -> Self {
        let order = [
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ];
        let current = order.iter().position(|l| *l == self).unwrap_or(2);
        order[(current + steps as usize).min(order.len() - 1)]
    }
}

/// デバッグ設定
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// ログレベル
    pub level: LogLevel,
    /// ファイルログを有効にするか
    pub enable_file_logging: bool,
    /// ログファイルのディレクトリ
    pub log_directory: String,
    /// コンソールログを有効にするか（標準エラー出力）
    pub enable_console_logging: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            enable_file_logging: false,
            log_directory: "/var/log/power-ocr-meter".to_string(),
            enable_console_logging: true,
        }
    }
}

impl DebugConfig {
    /// テスト環境用の設定
    pub fn test() -> Self {
        Self {
            level: LogLevel::Warn,
            enable_file_logging: false,
            log_directory: "test_logs".to_string(),
            enable_console_logging: true,
        }
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.level = self.level.raised(verbosity);
        self
    }
}

/// ログシステムを初期化
pub fn init_logging(config: &DebugConfig) -> Result<(), Box<dyn std::error::Error>> {
    // ログディレクトリを作成
    if config.enable_file_logging {
        fs::create_dir_all(&config.log_directory)?;
    }

    // 環境変数からのフィルター設定
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(format!("power_ocr_meter={}", config.level.as_str()))?,
    };

    let console_layer = config.enable_console_logging.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
    });

    let file_layer = config.enable_file_logging.then(|| {
        let file_appender = RollingFileAppender::new(
            Rotation::DAILY,
            &config.log_directory,
            "power-ocr-meter.log",
        );
        fmt::layer().json().with_writer(file_appender)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    info!("ログシステムが初期化されました");
    debug!("デバッグ設定: {:?}", config);

    Ok(())
}

/// パフォーマンス測定用のマクロ
#[macro_export]
macro_rules! measure_time {
    ($name:expr, $block:block) => {{
        let start = std::time::Instant::now();
        let result = $block;
        let duration = start.elapsed();
        tracing::info!(
            operation = $name,
            duration_ms = duration.as_millis(),
            "操作完了"
        );
        result
    }};
}

/// デバッグ用のヘルパー関数
pub mod debug_helpers {
    use tracing::error;

    /// エラーの詳細情報をログに出力
    pub fn log_error_details(error: &dyn std::error::Error, context: &str) {
        error!(
            context = context,
            error = %error,
            "エラーが発生しました"
        );

        // エラーチェーンをログに出力
        let mut source = error.source();
        let mut level = 1;
        while let Some(err) = source {
            error!(
                context = context,
                level = level,
                source_error = %err,
                "エラーの原因"
            );
            source = err.source();
            level += 1;
        }
    }
}
