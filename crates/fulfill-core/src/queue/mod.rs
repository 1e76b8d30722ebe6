//! Queue module: the class-partitioned pending queue.

mod pending;

pub use pending::PendingQueue;
