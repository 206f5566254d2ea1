use serde::Serialize;
use std::fmt;

/// Axis-aligned rectangle `[x1, x2) × [y1, y2)` in frame pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roi {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Roi {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> i32 {
        (self.x2 - self.x1).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.y2 - self.y1).max(0)
    }

    pub fn center(&self) -> (f64, f64) {
        (
            self.x1 as f64 + (self.x2 - self.x1) as f64 / 2.0,
            self.y1 as f64 + (self.y2 - self.y1) as f64 / 2.0,
        )
    }
}

impl fmt::Display for Roi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})-({}, {})", self.x1, self.y1, self.x2, self.y2)
    }
}

/// 8-bit grayscale image, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Frame {
    /// Returns `None` when the buffer does not hold exactly `width * height` pixels.
    pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> Option<Self> {
        if width.checked_mul(height)? != pixels.len() {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            pixels: vec![value; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Binary threshold: pixels brighter than `threshold` become 255, the rest 0.
    pub fn threshold(&self, threshold: u8) -> Frame {
        Frame {
            width: self.width,
            height: self.height,
            pixels: self
                .pixels
                .iter()
                .map(|&p| if p > threshold { 255 } else { 0 })
                .collect(),
        }
    }

    /// Set every pixel inside `roi` (clipped to the frame) to `value`.
    pub fn fill_roi(&mut self, roi: &Roi, value: u8) {
        let (xs, ys) = self.clip(roi);
        for y in ys {
            let row = y * self.width;
            self.pixels[row + xs.start..row + xs.end].fill(value);
        }
    }

    /// Number of zero-valued pixels inside `roi` (clipped to the frame).
    pub fn count_black(&self, roi: &Roi) -> usize {
        let (xs, ys) = self.clip(roi);
        ys.map(|y| {
            let row = y * self.width;
            self.pixels[row + xs.start..row + xs.end]
                .iter()
                .filter(|&&p| p == 0)
                .count()
        })
        .sum()
    }

    fn clip(&self, roi: &Roi) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
        let clamp = |v: i32, max: usize| (v.max(0) as usize).min(max);
        let x1 = clamp(roi.x1, self.width);
        let x2 = clamp(roi.x2, self.width).max(x1);
        let y1 = clamp(roi.y1, self.height);
        let y2 = clamp(roi.y2, self.height).max(y1);
        (x1..x2, y1..y2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Segment {
    pub const ALL: [Segment; 7] = [
        Segment::A,
        Segment::B,
        Segment::C,
        Segment::D,
        Segment::E,
        Segment::F,
        Segment::G,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }

    pub fn letter(self) -> char {
        (b'a' + self as u8) as char
    }
}

/// 1 桁分の点灯セグメントの集合
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SegmentSet(u8);

impl SegmentSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Parse a string of segment letters such as `"abged"`.
    pub fn from_letters(letters: &str) -> Self {
        let mut set = Self::empty();
        for c in letters.chars() {
            if let Some(s) = Segment::ALL.iter().find(|s| s.letter() == c) {
                set.insert(*s);
            }
        }
        set
    }

    pub fn insert(&mut self, segment: Segment) {
        self.0 |= segment.bit();
    }

    pub fn contains(&self, segment: Segment) -> bool {
        self.0 & segment.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Decode the digit shown by this pattern. A dark digit reads as 0.
    pub fn digit(&self) -> Option<u8> {
        const A: u8 = 1 << 0;
        const B: u8 = 1 << 1;
        const C: u8 = 1 << 2;
        const D: u8 = 1 << 3;
        const E: u8 = 1 << 4;
        const F: u8 = 1 << 5;
        const G: u8 = 1 << 6;

        match self.0 {
            0 => Some(0),
            x if x == A | B | C | D | E | F => Some(0),
            x if x == B | C => Some(1),
            x if x == A | B | G | E | D => Some(2),
            x if x == A | B | C | D | G => Some(3),
            x if x == F | G | B | C => Some(4),
            x if x == A | F | G | C | D => Some(5),
            x if x == A | F | E | D | C | G => Some(6),
            x if x == A | B | C => Some(7),
            x if x == A | B | C | D | E | F | G => Some(8),
            x if x == A | B | C | D | F | G => Some(9),
            _ => None,
        }
    }
}

impl fmt::Display for SegmentSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters: Vec<String> = Segment::ALL
            .iter()
            .filter(|s| self.contains(**s))
            .map(|s| format!("'{}'", s.letter()))
            .collect();
        write!(f, "[{}]", letters.join(", "))
    }
}

/// Measurement mode indicators printed on the meter's LCD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Watt,
    Curr,
    Volt,
    Freq,
    Ct,
    Ec,
    Pf,
}

impl Mode {
    pub const ALL: [Mode; 7] = [
        Mode::Watt,
        Mode::Curr,
        Mode::Volt,
        Mode::Freq,
        Mode::Ct,
        Mode::Ec,
        Mode::Pf,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Watt => "watt",
            Mode::Curr => "curr",
            Mode::Volt => "volt",
            Mode::Freq => "freq",
            Mode::Ct => "ct",
            Mode::Ec => "ec",
            Mode::Pf => "pf",
        }
    }
}

/// Everything lit on the LCD in one frame.
///
/// Digits run from the 1E4 position down to 1E0; dots are 0.001, 0.01, 0.1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LcdState {
    pub digits: [SegmentSet; 5],
    pub dots: [bool; 3],
    pub modes: [bool; 7],
}

impl LcdState {
    /// Scale applied by the lit decimal dot; 0.1 wins over 0.01 over 0.001.
    pub fn dot_multiplier(&self) -> f64 {
        let [milli, centi, deci] = self.dots;
        if deci {
            0.1
        } else if centi {
            0.01
        } else if milli {
            0.001
        } else {
            1.0
        }
    }

    /// Active modes joined with `+`, or `unknown` when none is lit.
    pub fn mode_label(&self) -> String {
        let active: Vec<&str> = Mode::ALL
            .iter()
            .zip(self.modes.iter())
            .filter(|(_, on)| **on)
            .map(|(mode, _)| mode.name())
            .collect();
        if active.is_empty() {
            "unknown".to_string()
        } else {
            active.join("+")
        }
    }
}

/// 復号した 1 回分の読み取り結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub mode: String,
    pub value: f64,
    /// Empty when every digit decoded.
    pub error: String,
}

impl Reading {
    pub fn is_valid(&self) -> bool {
        self.error.is_empty()
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {:.4}", self.mode, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_table() {
        let cases = [
            ("", 0),
            ("abcdef", 0),
            ("bc", 1),
            ("abged", 2),
            ("abcdg", 3),
            ("fgbc", 4),
            ("afgcd", 5),
            ("afedcg", 6),
            ("abc", 7),
            ("abcdefg", 8),
            ("abcdfg", 9),
        ];
        for (letters, digit) in cases {
            assert_eq!(SegmentSet::from_letters(letters).digit(), Some(digit), "{letters}");
        }
        assert_eq!(SegmentSet::from_letters("ab").digit(), None);
        assert_eq!(SegmentSet::from_letters("ga").to_string(), "['a', 'g']");
    }

    #[test]
    fn test_dot_multiplier_priority() {
        let mut state = LcdState::default();
        assert_eq!(state.dot_multiplier(), 1.0);
        state.dots = [true, false, false];
        assert_eq!(state.dot_multiplier(), 0.001);
        state.dots = [true, true, false];
        assert_eq!(state.dot_multiplier(), 0.01);
        state.dots = [true, true, true];
        assert_eq!(state.dot_multiplier(), 0.1);
    }

    #[test]
    fn test_mode_label() {
        let mut state = LcdState::default();
        assert_eq!(state.mode_label(), "unknown");
        state.modes[0] = true;
        assert_eq!(state.mode_label(), "watt");
        state.modes[5] = true;
        state.modes[6] = true;
        assert_eq!(state.mode_label(), "watt+ec+pf");
    }

    #[test]
    fn test_frame_roi_clipping() {
        let mut frame = Frame::filled(10, 10, 255);
        frame.fill_roi(&Roi::new(-5, -5, 2, 3), 0);
        assert_eq!(frame.count_black(&Roi::new(0, 0, 10, 10)), 6);
        assert_eq!(frame.count_black(&Roi::new(8, 8, 20, 20)), 0);
        assert_eq!(frame.count_black(&Roi::new(5, 5, 2, 2)), 0);
        assert_eq!(frame.pixel(0, 0), Some(0));
        assert_eq!(frame.pixel(10, 0), None);
    }

    #[test]
    fn test_threshold_is_strictly_greater() {
        let frame = Frame::new(3, 1, vec![160, 161, 0]).unwrap();
        let binary = frame.threshold(160);
        assert_eq!(binary.pixel(0, 0), Some(0));
        assert_eq!(binary.pixel(1, 0), Some(255));
        assert_eq!(binary.pixel(2, 0), Some(0));
        assert!(Frame::new(2, 2, vec![0; 3]).is_none());
    }
}
