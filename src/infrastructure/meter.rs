//! メーター読み取りのファイル入出力実装

mod csv_reading_log;
mod pgm_frame_loader;

pub use csv_reading_log::CsvReadingLog;
pub use pgm_frame_loader::{PgmFrameLoader, parse_pgm};
