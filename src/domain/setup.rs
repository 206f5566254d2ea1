//! セットアップドメイン
//!
//! OS パッケージの導入、ユーザーのグループ追加、ベンダーツールのビルド、
//! systemd サービスの登録といったインストール関連の概念を表現します。

pub mod entities;
pub mod repositories;

// 主要な型の再エクスポート
pub use entities::{InstallOptions, InstallPlan, InstallReport, InstallStep, VendorSource};
pub use repositories::{
    PackageInstaller, PrivilegeChecker, SetupError, UserGroupManager, VendorToolBuilder,
};
