pub mod apply_power_policy;
pub mod cleanup_system;
pub mod control_service;
pub mod decode_frames;
pub mod dump_power_registers;
pub mod follow_logs;
pub mod run_interactive;
pub mod setup_system;

#[cfg(test)]
mod mocks;

pub use apply_power_policy::ApplyPowerPolicyUseCase;
pub use cleanup_system::CleanupSystemUseCase;
pub use control_service::ControlServiceUseCase;
pub use decode_frames::DecodeFramesUseCase;
pub use dump_power_registers::DumpPowerRegistersUseCase;
pub use follow_logs::FollowLogsUseCase;
pub use run_interactive::RunInteractiveUseCase;
pub use setup_system::SetupSystemUseCase;
