//! Ports - 抽象化レイヤー
//!
//! Coordinator が外部に依存する部分（時刻、イベント出力）を trait として切り出します。
//! 実装は `impls` にあります。

pub mod clock;
pub mod event_sink;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::event_sink::EventSink;
