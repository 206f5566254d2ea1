use crate::domain::meter::{MeterError, Reading, ReadingLog};
use chrono::{NaiveDateTime, Timelike};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

const HEADER: &str = "date,time,mode,value,error";
// CRLF terminated, same as the CSV files the monitor writes.
const ROW_END: &str = "\r\n";

/// 読み取り結果の CSV ファイル（実行ごとに 1 ファイル、1 行ごとにフラッシュ）
pub struct CsvReadingLog {
    path: PathBuf,
    file: File,
}

impl CsvReadingLog {
    /// Create `<dir>/<YYYYmmdd_HHMMSS>.csv` and write the header.
    pub fn create(dir: &Path, started: NaiveDateTime) -> Result<Self, MeterError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.csv", started.format("%Y%m%d_%H%M%S")));
        let mut file = File::create(&path)?;
        write!(file, "{HEADER}{ROW_END}")?;
        file.flush()?;
        info!("Logging readings to {}", path.display());
        Ok(Self { path, file })
    }
}

/// Quote a field when it would otherwise break the row.
fn field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub(crate) fn format_row(at: NaiveDateTime, reading: &Reading) -> String {
    let tenth = at.nanosecond() / 100_000_000;
    format!(
        "{},{}.{},{},{:.4},{}",
        at.format("%Y-%m-%d"),
        at.format("%H:%M:%S"),
        tenth.min(9),
        field(&reading.mode),
        reading.value,
        field(&reading.error)
    )
}

impl ReadingLog for CsvReadingLog {
    fn append(&mut self, at: NaiveDateTime, reading: &Reading) -> Result<(), MeterError> {
        write!(self.file, "{}{ROW_END}", format_row(at, reading))?;
        self.file.flush()?;
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
