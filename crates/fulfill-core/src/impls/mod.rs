//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **FileEventSink**: ファイル + stdout（デモ・本番用）
//! - **MemoryEventSink**: メモリに溜める（テスト・組み込み用）

pub mod file_sink;
pub mod memory_sink;

pub use self::file_sink::FileEventSink;
pub use self::memory_sink::MemoryEventSink;
