use super::entities::{Register, RegisterValue};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PowerBoardError {
    #[error("lifepo4wered-cli is not available: {0}")]
    NotInstalled(String),

    #[error("{command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Register {0} is read-only")]
    ReadOnlyRegister(Register),

    #[error("Unexpected output for {register}: {output:?}")]
    UnexpectedOutput { register: Register, output: String },
}

/// Access to the board's registers through the vendor command line tool.
pub trait PowerBoardCli: Send + Sync {
    fn set(&self, register: Register, value: RegisterValue) -> Result<(), PowerBoardError>;
    fn get(&self, register: Register) -> Result<String, PowerBoardError>;
}
