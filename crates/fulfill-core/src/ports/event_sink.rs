//! EventSink port - イベント出力の抽象化
//!
//! Sink は整形済みの 1 行を受け取るだけで、整形ロジックは持ちません。

use crate::error::Result;

/// Consumer of timestamped, pre-formatted event lines.
///
/// # Contract
/// - The coordinator calls `emit` while holding its lock, from runtime worker
///   threads, so the sink sees lines in the order the events happened. Every
///   submitter and worker waits on a slow `emit`: keep it to a short synchronous
///   write, and hand lines to a writer task if the target can stall.
/// - Lines emitted after `close` are dropped, not errors: workers may still be
///   winding down when the coordinator releases the sink.
pub trait EventSink: Send + Sync {
    fn emit(&self, line: &str) -> Result<()>;

    /// Flush and release the underlying resource. Idempotent.
    fn close(&self) -> Result<()>;
}
