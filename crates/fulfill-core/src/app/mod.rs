//! App - アプリケーション層
//!
//! # 主要コンポーネント
//! - **Coordinator**: キュー・worker 集合・ID 連番の所有者
//! - **Worker**: worker 1 つ分の共有状態（processing / active / stop signal）
//! - **WorkerLoop**: 取り出し→処理→完了 のループ
//! - **Status**: スナップショットと集計

pub mod coordinator;
pub mod status;
mod worker;
mod worker_loop;

pub use self::coordinator::{Coordinator, Removal};
pub use self::status::{ItemView, Snapshot, StatusCounts, WorkerStatus};
