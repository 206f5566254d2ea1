use crate::domain::power_board::{PowerBoardCli, PowerBoardError, Register, RegisterReading};
use std::sync::Arc;
use tracing::info;

/// 電源ボードのレジスタを一覧表示するユースケース
pub struct DumpPowerRegistersUseCase {
    board: Arc<dyn PowerBoardCli>,
}

impl DumpPowerRegistersUseCase {
    pub fn new(board: Arc<dyn PowerBoardCli>) -> Self {
        Self { board }
    }

    /// 設定レジスタとテレメトリレジスタをすべて読み取る（最初の失敗で中断）
    pub fn execute(&self) -> Result<Vec<RegisterReading>, PowerBoardError> {
        info!("Reading LiFePO4wered registers...");
        Register::DUMPABLE
            .iter()
            .map(|&register| {
                self.board
                    .get(register)
                    .map(|value| RegisterReading::new(register, value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::mocks::{CallLog, RecordingBoard};

    #[test]
    fn test_reads_all_registers_in_order() {
        let log = CallLog::default();
        let use_case = DumpPowerRegistersUseCase::new(Arc::new(RecordingBoard::new(log.clone())));

        let readings = use_case.execute().unwrap();
        assert_eq!(readings.len(), Register::DUMPABLE.len());
        assert_eq!(readings[0].to_string(), "AUTO_BOOT = 42");
        assert_eq!(
            log.calls(),
            vec![
                "get AUTO_BOOT",
                "get AUTO_SHDN_TIME",
                "get VIN_THRESHOLD",
                "get VBAT_BOOT",
                "get PI_BOOT_TO",
                "get PI_SHDN_TO",
                "get VIN",
                "get VOUT",
                "get VBAT",
                "get IOUT",
            ]
        );
    }

    #[test]
    fn test_first_failure_aborts() {
        let log = CallLog::default();
        let board = RecordingBoard {
            fail_on: Some(Register::VbatBoot),
            ..RecordingBoard::new(log.clone())
        };
        let use_case = DumpPowerRegistersUseCase::new(Arc::new(board));

        assert!(use_case.execute().is_err());
        assert_eq!(log.calls().last().map(String::as_str), Some("get VBAT_BOOT"));
        assert_eq!(log.calls().len(), 4);
    }
}
