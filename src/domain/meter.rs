//! メーター読み取りドメイン
//!
//! 電力計の 7 セグメント LCD をカメラ画像から読み取るためのモデルです。
//! ROI（関心領域）の幾何、セグメントの点灯判定、数字と小数点・モード表示の
//! 復号を扱います。画像の取得とログの保存はリポジトリトレイトの背後にあります。

pub mod repositories;
pub mod services;
pub mod value_objects;

// 主要な型の再エクスポート
pub use repositories::{FrameLoader, MeterError, ReadingLog};
pub use services::{MeterLayout, SevenSegmentDecoder};
pub use value_objects::{Frame, LcdState, Mode, Reading, Roi, Segment, SegmentSet};
