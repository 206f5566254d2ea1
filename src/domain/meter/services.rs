use super::value_objects::{Frame, LcdState, Reading, Roi, Segment, SegmentSet};
use tracing::{debug, warn};

const DIGIT_WIDTH: i32 = 115;
const DIGIT_HEIGHT: i32 = 200;
const DOT_SIZE: i32 = 24;

// Segment sampling geometry relative to the digit centre.
const SHORT_SIDE: f64 = 20.0;
const LONG_SIDE: f64 = 40.0;
const LATERAL_OFFSET: f64 = 36.0;
const TOP_OFFSET: f64 = -80.0;
const UPPER_SIDE_OFFSET: f64 = -42.0;
const LOWER_SIDE_OFFSET: f64 = 46.0;
const BOTTOM_OFFSET: f64 = 87.0;

/// 800x600 のカメラフレーム内での LCD 各要素の位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeterLayout {
    /// モード表示の領域（[`super::Mode::ALL`] と同じ順序）
    pub modes: [Roi; 7],
    /// Digit boxes from the 1E4 position down to 1E0.
    pub digits: [Roi; 5],
    /// Decimal dots for 0.001, 0.01 and 0.1.
    pub dots: [Roi; 3],
    /// 点灯とみなす黒ピクセル数の下限
    pub on_threshold: usize,
}

impl Default for MeterLayout {
    fn default() -> Self {
        Self {
            modes: [
                Roi::new(22, 196, 112, 232),
                Roi::new(22, 237, 93, 276),
                Roi::new(22, 280, 107, 317),
                Roi::new(22, 367, 111, 401),
                Roi::new(112, 68, 178, 117),
                Roi::new(418, 73, 485, 125),
                Roi::new(151, 132, 210, 177),
            ],
            digits: [
                Roi::new(115, 200, 115 + DIGIT_WIDTH, 207 + DIGIT_HEIGHT),
                Roi::new(236, 200, 236 + DIGIT_WIDTH, 207 + DIGIT_HEIGHT),
                Roi::new(361, 200, 361 + DIGIT_WIDTH, 207 + DIGIT_HEIGHT),
                Roi::new(491, 200, 491 + DIGIT_WIDTH, 209 + DIGIT_HEIGHT),
                Roi::new(618, 200, 618 + DIGIT_WIDTH, 210 + DIGIT_HEIGHT),
            ],
            dots: [
                Roi::new(341, 378, 341 + DOT_SIZE, 378 + DOT_SIZE),
                Roi::new(464, 379, 464 + DOT_SIZE, 379 + DOT_SIZE),
                Roi::new(592, 382, 592 + DOT_SIZE, 382 + DOT_SIZE),
            ],
            on_threshold: 100,
        }
    }
}

impl MeterLayout {
    /// `digit` 内のセグメント a..g を判定するための領域を返します。
    pub fn segment_rois(digit: &Roi) -> [(Segment, Roi); 7] {
        let (xm, ym) = digit.center();
        let sample_box = |cx: f64, cy: f64, half_w: f64, half_h: f64| {
            Roi::new(
                (cx - half_w).floor() as i32,
                (cy - half_h).floor() as i32,
                (cx + half_w).floor() as i32,
                (cy + half_h).floor() as i32,
            )
        };
        let vertical = |cy: f64| sample_box(xm, cy, SHORT_SIDE / 2.0, LONG_SIDE / 2.0);
        let lateral =
            |cx: f64, cy: f64| sample_box(cx, cy, LONG_SIDE / 2.0, SHORT_SIDE / 2.0);

        [
            (Segment::A, vertical(ym + TOP_OFFSET)),
            (Segment::B, lateral(xm + LATERAL_OFFSET, ym + UPPER_SIDE_OFFSET)),
            (Segment::C, lateral(xm + LATERAL_OFFSET, ym + LOWER_SIDE_OFFSET)),
            (Segment::D, vertical(ym + BOTTOM_OFFSET)),
            (Segment::E, lateral(xm - LATERAL_OFFSET, ym + LOWER_SIDE_OFFSET)),
            (Segment::F, lateral(xm - LATERAL_OFFSET, ym + UPPER_SIDE_OFFSET)),
            (Segment::G, vertical(ym)),
        ]
    }
}

/// カメラフレームから LCD の表示を読み取る
#[derive(Debug, Clone)]
pub struct SevenSegmentDecoder {
    layout: MeterLayout,
    binary_threshold: u8,
}

impl Default for SevenSegmentDecoder {
    fn default() -> Self {
        Self::new(MeterLayout::default(), 160)
    }
}

impl SevenSegmentDecoder {
    pub fn new(layout: MeterLayout, binary_threshold: u8) -> Self {
        Self {
            layout,
            binary_threshold,
        }
    }

    pub fn layout(&self) -> &MeterLayout {
        &self.layout
    }

    /// グレースケール画像を二値化し、LCD の各要素の点灯状態を取得
    pub fn read_lcd(&self, frame: &Frame) -> LcdState {
        let binary = frame.threshold(self.binary_threshold);
        let lit = |roi: &Roi| binary.count_black(roi) >= self.layout.on_threshold;

        let mut state = LcdState::default();
        for (slot, roi) in state.dots.iter_mut().zip(self.layout.dots.iter()) {
            *slot = lit(roi);
        }
        for (slot, roi) in state.modes.iter_mut().zip(self.layout.modes.iter()) {
            *slot = lit(roi);
        }
        for (slot, digit) in state.digits.iter_mut().zip(self.layout.digits.iter()) {
            let mut segments = SegmentSet::empty();
            for (segment, roi) in MeterLayout::segment_rois(digit) {
                if lit(&roi) {
                    segments.insert(segment);
                }
            }
            *slot = segments;
        }
        debug!(?state, "sampled LCD");
        state
    }

    /// Turn sampled LCD state into a reading.
    ///
    /// Any undecodable digit yields a value of 0 with the offending
    /// patterns described in `error`.
    pub fn decode(&self, state: &LcdState) -> Reading {
        let mut errors = Vec::new();
        let mut number: Option<u32> = Some(0);
        for segments in &state.digits {
            match segments.digit() {
                Some(d) => number = number.map(|n| n * 10 + u32::from(d)),
                None => {
                    let message = format!(
                        "Warning: decode_digit got unrecognized segment pattern: {segments}"
                    );
                    warn!("{message}");
                    errors.push(message);
                    number = None;
                }
            }
        }

        let value = match number {
            Some(n) => f64::from(n) * state.dot_multiplier(),
            None => 0.0,
        };

        Reading {
            mode: state.mode_label(),
            value,
            error: errors.join(" | "),
        }
    }

    pub fn read(&self, frame: &Frame) -> Reading {
        let state = self.read_lcd(frame);
        self.decode(&state)
    }
}
