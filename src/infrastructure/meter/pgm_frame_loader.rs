use crate::domain::meter::{Frame, FrameLoader, MeterError};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Loads binary (`P5`) portable graymaps.
pub struct PgmFrameLoader;

impl Default for PgmFrameLoader {
    fn default() -> Self {
        Self
    }
}

impl PgmFrameLoader {
    pub fn new() -> Self {
        Self
    }
}

impl FrameLoader for PgmFrameLoader {
    fn load(&self, path: &Path) -> Result<Frame, MeterError> {
        let bytes = fs::read(path).map_err(|source| MeterError::FrameRead {
            path: path.to_path_buf(),
            source,
        })?;
        let frame = parse_pgm(&bytes).map_err(|reason| MeterError::InvalidFrame {
            path: path.to_path_buf(),
            reason,
        })?;
        debug!(
            "Loaded {} ({}x{})",
            path.display(),
            frame.width(),
            frame.height()
        );
        Ok(frame)
    }
}

struct Header<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Header<'a> {
    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if b == b'#' {
                while let Some(&c) = self.bytes.get(self.pos) {
                    self.pos += 1;
                    if c == b'\n' {
                        break;
                    }
                }
            } else if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn token(&mut self) -> Option<&'a [u8]> {
        self.skip_whitespace_and_comments();
        let start = self.pos;
        while let Some(&b) = self.bytes.get(self.pos) {
            if b.is_ascii_whitespace() || b == b'#' {
                break;
            }
            self.pos += 1;
        }
        let bytes: &'a [u8] = self.bytes;
        if self.pos > start {
            Some(&bytes[start..self.pos])
        } else {
            None
        }
    }

    fn number(&mut self, what: &str) -> Result<usize, String> {
        let token = self.token().ok_or_else(|| format!("missing {what}"))?;
        std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| format!("invalid {what}"))
    }
}

/// Decode a binary PGM image into an 8-bit frame, rescaling when maxval < 255.
pub fn parse_pgm(bytes: &[u8]) -> Result<Frame, String> {
    let mut header = Header { bytes, pos: 0 };
    if header.token() != Some(b"P5".as_slice()) {
        return Err("not a binary PGM (missing P5 magic)".to_string());
    }
    let width = header.number("width")?;
    let height = header.number("height")?;
    let maxval = header.number("maxval")?;
    if maxval == 0 || maxval > 255 {
        return Err(format!("unsupported maxval {maxval}"));
    }
    if width == 0 || height == 0 {
        return Err("empty image".to_string());
    }

    // exactly one whitespace byte separates the header from the raster
    let start = header.pos + 1;
    let len = width
        .checked_mul(height)
        .ok_or_else(|| "image too large".to_string())?;
    let end = start
        .checked_add(len)
        .ok_or_else(|| "image too large".to_string())?;
    let raster = bytes
        .get(start..end)
        .ok_or_else(|| format!("raster truncated, expected {len} bytes"))?;

    let pixels = if maxval == 255 {
        raster.to_vec()
    } else {
        raster
            .iter()
            .map(|&p| ((usize::from(p).min(maxval) * 255) / maxval) as u8)
            .collect()
    };

    Frame::new(width, height, pixels).ok_or_else(|| "raster size mismatch".to_string())
}
