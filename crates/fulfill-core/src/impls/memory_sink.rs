//! MemoryEventSink - メモリ上に行を溜めるだけの Sink（テスト・組み込み用）

use std::sync::{Mutex, PoisonError};

use crate::error::Result;
use crate::ports::EventSink;

#[derive(Default)]
pub struct MemoryEventSink {
    inner: Mutex<MemorySinkState>,
}

#[derive(Default)]
struct MemorySinkState {
    lines: Vec<String>,
    closed: bool,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything emitted before `close`, in order.
    pub fn lines(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .lines
            .clone()
    }

    pub fn is_closed(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .closed
    }

    /// Lines containing `needle`. Handy for asserting on one kind of event.
    pub fn matching(&self, needle: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.contains(needle))
            .collect()
    }
}

impl EventSink for MemoryEventSink {
    fn emit(&self, line: &str) -> Result<()> {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if !state.closed {
            state.lines.push(line.to_string());
        }
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_lines_until_closed() {
        let sink = MemoryEventSink::new();
        sink.emit("a").unwrap();
        sink.emit("b").unwrap();
        sink.close().unwrap();
        sink.emit("c").unwrap();

        assert!(sink.is_closed());
        assert_eq!(sink.lines(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(sink.matching("b"), vec!["b".to_string()]);
    }
}
