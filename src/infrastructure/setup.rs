//! セットアップインフラストラクチャの実装
//! 
//! ドメイン層で定義されたセットアップ関連のトレイトの具体的な実装を提供します。
//! apt によるパッケージ導入、usermod によるグループ追加、
//! ベンダーツールのビルド、root 権限の確認が含まれます。

mod linux_group_manager;
mod linux_package_installer;
mod linux_privilege_checker;
mod linux_vendor_builder;

// 公開APIの再エクスポート
pub use linux_group_manager::LinuxGroupManager;
pub use linux_package_installer::LinuxPackageInstaller;
pub use linux_privilege_checker::LinuxPrivilegeChecker;
pub use linux_vendor_builder::LinuxVendorBuilder;
