//! LiFePO4wered ボードへのアクセス実装

mod lifepo_cli;

pub use lifepo_cli::LifepoCli;
