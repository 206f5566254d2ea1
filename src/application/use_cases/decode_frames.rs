use crate::domain::meter::{FrameLoader, MeterError, Reading, ReadingLog, SevenSegmentDecoder};
use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 撮影済みフレームを復号するユースケース
pub struct DecodeFramesUseCase {
    frames: Arc<dyn FrameLoader>,
    decoder: SevenSegmentDecoder,
}

impl DecodeFramesUseCase {
    pub fn new(frames: Arc<dyn FrameLoader>, decoder: SevenSegmentDecoder) -> Self {
        Self { frames, decoder }
    }

    /// Decode every frame matched by `patterns`, in order, appending each
    /// reading to `log` when one is given. An unreadable frame aborts.
    pub fn execute(
        &self,
        patterns: &[String],
        mut log: Option<&mut dyn ReadingLog>,
    ) -> Result<Vec<(PathBuf, Reading)>, MeterError> {
        let paths = expand_patterns(patterns)?;
        info!("Decoding {} frame(s)", paths.len());

        let mut readings = Vec::with_capacity(paths.len());
        for path in paths {
            let frame = self.frames.load(&path)?;
            let reading = crate::measure_time!("decode_frame", { self.decoder.read(&frame) });
            if !reading.is_valid() {
                warn!("{}: {}", path.display(), reading.error);
            }
            if let Some(log) = log.as_deref_mut() {
                log.append(Local::now().naive_local(), &reading)?;
            }
            readings.push((path, reading));
        }

        Ok(readings)
    }
}

/// Expand glob patterns, keeping plain paths as given.
///
/// Matches of one pattern are sorted; patterns keep their order.
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>, MeterError> {
    let mut paths = Vec::new();
    for pattern in patterns {
        if !pattern.contains(['*', '?', '[']) {
            paths.push(PathBuf::from(pattern));
            continue;
        }

        let entries = glob::glob(pattern).map_err(|e| MeterError::InvalidPattern {
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;
        let mut matched = entries
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| MeterError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
        matched.sort();
        debug!("{} matched {} file(s)", pattern, matched.len());
        paths.extend(matched);
    }

    if paths.is_empty() {
        return Err(MeterError::NoFrames(patterns.to_vec()));
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::mocks::{MemoryFrames, MemoryLog};
    use crate::domain::meter::{Frame, MeterLayout, SegmentSet};
    use std::collections::HashMap;

    fn frame_showing(digits: [&str; 5], deci_dot: bool, mode: usize) -> Frame {
        let layout = MeterLayout::default();
        let mut frame = Frame::filled(800, 600, 230);
        for (pattern, digit) in digits.iter().zip(layout.digits.iter()) {
            let set = SegmentSet::from_letters(pattern);
            for (segment, roi) in MeterLayout::segment_rois(digit) {
                if set.contains(segment) {
                    frame.fill_roi(&roi, 10);
                }
            }
        }
        if deci_dot {
            frame.fill_roi(&layout.dots[2], 10);
        }
        frame.fill_roi(&layout.modes[mode], 10);
        frame
    }

    fn use_case(frames: Vec<(&str, Frame)>) -> DecodeFramesUseCase {
        let frames = frames
            .into_iter()
            .map(|(p, f)| (PathBuf::from(p), f))
            .collect::<HashMap<_, _>>();
        DecodeFramesUseCase::new(Arc::new(MemoryFrames(frames)), SevenSegmentDecoder::default())
    }

    #[test]
    fn test_decodes_and_logs_in_order() {
        let use_case = use_case(vec![
            ("a.pgm", frame_showing(["", "bc", "abdeg", "abcdg", "fgbc"], true, 0)),
            ("b.pgm", frame_showing(["", "", "abc", "abcdefg", "abcdef"], false, 2)),
        ]);
        let mut log = MemoryLog::default();

        let readings = use_case
            .execute(
                &["a.pgm".to_string(), "b.pgm".to_string()],
                Some(&mut log),
            )
            .unwrap();

        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].0, PathBuf::from("a.pgm"));
        assert_eq!(readings[0].1.mode, "watt");
        assert!((readings[0].1.value - 123.4).abs() < 1e-9);
        assert_eq!(readings[1].1.to_string(), "volt, 780.0000");
        assert_eq!(log.rows.len(), 2);
        assert_eq!(log.rows[1].1, readings[1].1);
    }

    #[test]
    fn test_unknown_pattern_is_reported_not_fatal() {
        let use_case = use_case(vec![(
            "bad.pgm",
            frame_showing(["", "", "", "ab", "bc"], false, 1),
        )]);

        let readings = use_case.execute(&["bad.pgm".to_string()], None).unwrap();
        let reading = &readings[0].1;
        assert_eq!(reading.value, 0.0);
        assert_eq!(
            reading.error,
            "Warning: decode_digit got unrecognized segment pattern: ['a', 'b']"
        );
    }

    #[test]
    fn test_missing_frame_aborts() {
        let use_case = use_case(vec![]);
        let err = use_case
            .execute(&["missing.pgm".to_string()], None)
            .unwrap_err();
        assert!(matches!(err, MeterError::FrameRead { .. }));
    }

    #[test]
    fn test_expand_patterns() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["frame_2.pgm", "frame_1.pgm", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let pattern = format!("{}/*.pgm", dir.path().display());

        let paths = expand_patterns(&[pattern.clone(), "literal.pgm".to_string()]).unwrap();
        assert_eq!(
            paths,
            vec![
                dir.path().join("frame_1.pgm"),
                dir.path().join("frame_2.pgm"),
                PathBuf::from("literal.pgm"),
            ]
        );

        let nothing = format!("{}/*.png", dir.path().display());
        assert!(matches!(
            expand_patterns(&[nothing]),
            Err(MeterError::NoFrames(_))
        ));
        assert!(matches!(
            expand_patterns(&["[".to_string()]),
            Err(MeterError::InvalidPattern { .. })
        ));
    }
}
