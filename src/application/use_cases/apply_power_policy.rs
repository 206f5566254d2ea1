use super::DumpPowerRegistersUseCase;
use crate::domain::power_board::{PowerBoardCli, PowerBoardError, PowerPolicy, RegisterReading};
use std::sync::Arc;
use tracing::info;

/// 電源ボードに電源ポリシーを適用するユースケース
pub struct ApplyPowerPolicyUseCase {
    board: Arc<dyn PowerBoardCli>,
}

impl ApplyPowerPolicyUseCase {
    pub fn new(board: Arc<dyn PowerBoardCli>) -> Self {
        Self { board }
    }

    /// ポリシーのレジスタを順に書き込み、その後ボードの値を読み戻す
    pub fn execute(&self, policy: &PowerPolicy) -> Result<Vec<RegisterReading>, PowerBoardError> {
        info!("Applying power policy: {:?}", policy);

        for (register, value) in policy.writes() {
            self.board.set(register, value)?;
        }

        if policy.persist {
            info!("Settings written to flash");
        } else {
            info!("Settings not persisted; they reset when the board loses power");
        }

        DumpPowerRegistersUseCase::new(self.board.clone()).execute()
    }
}
