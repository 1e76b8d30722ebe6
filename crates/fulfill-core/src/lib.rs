//! fulfill-core
//!
//! Concurrency core of a fulfillment center: a priority-ordered pending queue
//! drained by a resizable pool of workers.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, item, events）
//! - **queue**: PRIORITY 優先・クラス内 FIFO の待ち行列
//! - **ports**: 抽象化レイヤー（Clock, EventSink）
//! - **impls**: ports の実装（FileEventSink, MemoryEventSink）
//! - **app**: Coordinator と worker ループ
//! - **config** / **error**

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod impls;
pub mod ports;
pub mod queue;

pub use app::{Coordinator, Removal, Snapshot, StatusCounts};
pub use config::CoordinatorConfig;
pub use domain::{ItemClass, ItemId, WorkerId};
pub use error::{FulfillError, Result};
