//! Coordinator - queue, worker set and id allocation behind a single lock
//!
//! # ロック規律
//! - coordinator lock: pending / completed / workers / 両方の ID 連番 / closed
//! - worker lock: その worker の processing と active（`Worker` 内部）
//! - 取得順は必ず coordinator → worker
//! - critical section 内で時間待ちはしない（sleep は worker_loop 側だけ）

use std::fmt::Display;
use std::sync::Arc;

use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, warn};

use super::status::{ItemView, Snapshot, WorkerStatus};
use super::worker::Worker;
use super::worker_loop;
use crate::config::CoordinatorConfig;
use crate::domain::ids;
use crate::domain::{DomainEvent, IdSequence, Item, ItemClass, ItemId, WorkerId};
use crate::error::{FulfillError, Result};
use crate::impls::FileEventSink;
use crate::ports::{Clock, EventSink, SystemClock};
use crate::queue::PendingQueue;

/// Outcome of `remove_worker`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Removal {
    /// The worker that was removed; `None` when the pool was empty.
    pub worker: Option<WorkerId>,
    /// The item it was processing, now back at the front of the queue.
    pub reassigned: Option<ItemId>,
}

impl Removal {
    pub fn removed(&self) -> bool {
        self.worker.is_some()
    }
}

/// Owner of the pending queue, the completed list and the worker pool.
///
/// Cheap to clone; every clone drives the same center. Call [`Coordinator::shutdown`]
/// when done: dropping the last handle also signals every worker, but skips the
/// requeue and leaves the sink open.
#[derive(Clone)]
pub struct Coordinator {
    shared: Arc<Shared>,
}

/// State reachable from both the coordinator handle and worker loops.
pub(crate) struct Shared {
    state: Mutex<CoordinatorState>,
    pub(crate) config: CoordinatorConfig,
    sink: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
    /// Wakes idle workers on submission; the poll interval stays as the fallback.
    /// Worker loops keep their own clone so an idle worker holds no strong `Shared`.
    submitted: Arc<Notify>,
}

struct CoordinatorState {
    pending: PendingQueue,
    completed: Vec<Item>,
    workers: Vec<WorkerEntry>,
    item_ids: IdSequence<ids::Item>,
    worker_ids: IdSequence<ids::Worker>,
    closed: bool,
}

struct WorkerEntry {
    worker: Arc<Worker>,
    join: JoinHandle<()>,
}

impl Coordinator {
    /// Coordinator writing to the file named in `config` (and stdout).
    ///
    /// Fails with [`FulfillError::SinkUnavailable`] if the file cannot be created.
    pub fn open(config: CoordinatorConfig) -> Result<Self> {
        let sink = FileEventSink::create(&config.output_path)?;
        Self::new(config, Arc::new(sink))
    }

    pub fn new(config: CoordinatorConfig, sink: Arc<dyn EventSink>) -> Result<Self> {
        Self::with_clock(config, sink, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: CoordinatorConfig,
        sink: Arc<dyn EventSink>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        let state = CoordinatorState {
            pending: PendingQueue::new(),
            completed: Vec::new(),
            workers: Vec::new(),
            item_ids: IdSequence::new(),
            worker_ids: IdSequence::new(),
            closed: false,
        };
        Ok(Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                config,
                sink,
                clock,
                submitted: Arc::new(Notify::new()),
            }),
        })
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.shared.config
    }

    #[cfg(test)]
    pub(crate) fn shared_for_tests(&self) -> Arc<Shared> {
        Arc::clone(&self.shared)
    }

    #[cfg(test)]
    pub(crate) async fn workers_for_tests(&self) -> Vec<Arc<Worker>> {
        let state = self.shared.state.lock().await;
        state.workers.iter().map(|e| Arc::clone(&e.worker)).collect()
    }

    /// Append a STANDARD item to the end of the queue.
    pub async fn submit_standard(&self) -> ItemId {
        self.submit(ItemClass::Standard).await
    }

    /// Insert a PRIORITY item behind the queued PRIORITY items, ahead of every
    /// STANDARD one.
    pub async fn submit_priority(&self) -> ItemId {
        self.submit(ItemClass::Priority).await
    }

    async fn submit(&self, class: ItemClass) -> ItemId {
        let id = {
            let mut state = self.shared.state.lock().await;
            let id = state.item_ids.next_id();
            state.pending.push(Item::new(id, class));
            self.shared.emit(DomainEvent::ItemSubmitted { item: id, class });
            id
        };
        debug!(item = id.get(), %class, "item submitted");
        self.shared.submitted.notify_waiters();
        id
    }

    /// Start a new worker. It begins polling asynchronously.
    pub async fn add_worker(&self) -> Result<WorkerId> {
        let mut state = self.shared.state.lock().await;
        if state.closed {
            return Err(FulfillError::Closed);
        }
        let id = state.worker_ids.next_id();
        let (worker, stop_rx) = Worker::new(id);
        let worker = Arc::new(worker);

        let span = tracing::info_span!("worker", id = id.get());
        let join = tokio::spawn(
            worker_loop::run(
                Arc::downgrade(&self.shared),
                Arc::clone(&self.shared.submitted),
                Arc::clone(&worker),
                stop_rx,
            )
            .instrument(span),
        );
        state.workers.push(WorkerEntry { worker, join });
        self.shared.emit(DomainEvent::WorkerCreated { worker: id });
        info!(worker = id.get(), "worker started");
        Ok(id)
    }

    /// Remove the most recently added worker.
    ///
    /// Its in-flight item (if any) goes back to the very front of the queue.
    /// An empty pool is reported as a no-op event, not an error.
    pub async fn remove_worker(&self) -> Removal {
        let mut state = self.shared.state.lock().await;
        let Some(entry) = state.workers.pop() else {
            self.shared.emit(DomainEvent::NoWorkerToRemove);
            return Removal::default();
        };
        let reassigned = self.shared.retire(&mut state, &entry.worker).await;
        Removal {
            worker: Some(entry.worker.id()),
            reassigned,
        }
    }

    /// Atomic view of workers, pending and completed items.
    pub async fn snapshot(&self) -> Snapshot {
        let state = self.shared.state.lock().await;
        Self::snapshot_of(&state).await
    }

    async fn snapshot_of(state: &CoordinatorState) -> Snapshot {
        let mut workers = Vec::with_capacity(state.workers.len());
        for entry in &state.workers {
            workers.push(WorkerStatus {
                id: entry.worker.id(),
                processing: entry.worker.processing().await.map(|(id, _)| id),
            });
        }
        Snapshot {
            workers,
            pending: state
                .pending
                .entries()
                .map(|(id, class)| ItemView { id, class })
                .collect(),
            completed: state
                .completed
                .iter()
                .map(|item| ItemView {
                    id: item.id(),
                    class: item.class(),
                })
                .collect(),
        }
    }

    /// Write the current status block to the sink.
    ///
    /// The block is emitted under the coordinator lock, so no other event line
    /// lands in the middle of it.
    pub async fn report_status(&self) {
        let state = self.shared.state.lock().await;
        for line in Self::snapshot_of(&state).await.report_lines() {
            self.shared.emit(line);
        }
    }

    /// Timestamp and emit a free-form line (banners, scenario headers).
    pub fn log(&self, message: impl Display) {
        self.shared.emit(message);
    }

    /// Stop every worker and release the sink.
    ///
    /// Workers are removed newest-first exactly as [`Coordinator::remove_worker`]
    /// does, so in-flight items return to the queue. The sink is closed after all
    /// workers have been signaled, without waiting for them to exit.
    pub async fn shutdown(&self) {
        self.stop_all().await;
        self.shared.close_sink();
    }

    /// Like [`Coordinator::shutdown`], then wait for every worker task to finish.
    pub async fn shutdown_and_join(&self) {
        let joins = self.stop_all().await;
        self.shared.close_sink();
        for join in joins {
            if let Err(e) = join.await {
                warn!("worker task ended abnormally: {e}");
            }
        }
    }

    async fn stop_all(&self) -> Vec<JoinHandle<()>> {
        let mut state = self.shared.state.lock().await;
        state.closed = true;
        let mut joins = Vec::with_capacity(state.workers.len());
        while let Some(entry) = state.workers.pop() {
            self.shared.retire(&mut state, &entry.worker).await;
            joins.push(entry.join);
        }
        info!(workers = joins.len(), "coordinator shut down");
        joins
    }
}

impl Shared {
    /// Pop the queue head into `worker`'s slot. `None` when the queue is empty or
    /// the worker has been deactivated.
    pub(crate) async fn pick_up(&self, worker: &Worker) -> Option<(ItemId, ItemClass)> {
        let mut state = self.state.lock().await;
        let item = state.pending.pop_front()?;
        match worker.assign(item).await {
            Ok((item, class)) => {
                self.emit(DomainEvent::ProcessingStarted {
                    worker: worker.id(),
                    item,
                    class,
                });
                Some((item, class))
            }
            Err(item) => {
                // worker は既に外されている。元の位置に戻す
                state.pending.push_front(item);
                None
            }
        }
    }

    /// Move `worker`'s in-flight item to the completed list.
    pub(crate) async fn complete(&self, worker: &Worker) {
        let mut state = self.state.lock().await;
        let Some(mut item) = worker.take_processing().await else {
            debug!(worker = worker.id().get(), "item was reassigned before completion");
            return;
        };
        item.mark_completed();
        self.emit(DomainEvent::ProcessingCompleted {
            worker: worker.id(),
            item: item.id(),
            class: item.class(),
        });
        state.completed.push(item);
    }

    /// Deactivate, signal, and requeue the captured item at the front.
    /// The caller has already taken the worker out of the set.
    async fn retire(&self, state: &mut CoordinatorState, worker: &Worker) -> Option<ItemId> {
        let captured = worker.deactivate().await;
        worker.stop();

        let reassigned = captured.map(|mut item| {
            item.requeue();
            let id = item.id();
            state.pending.push_front(item);
            id
        });
        self.emit(DomainEvent::WorkerRemoved {
            worker: worker.id(),
            reassigned,
        });
        info!(
            worker = worker.id().get(),
            reassigned = ?reassigned.map(|id| id.get()),
            "worker removed"
        );
        reassigned
    }

    pub(crate) fn emit(&self, message: impl Display) {
        let line = format!("[{}] {}", self.clock.now().format("%H:%M:%S"), message);
        if let Err(e) = self.sink.emit(&line) {
            warn!("event sink rejected line: {e}");
        }
    }

    fn close_sink(&self) {
        if let Err(e) = self.sink.close() {
            warn!("closing event sink failed: {e}");
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        // 最後のハンドルが消えたら worker を止める（loop 側は Weak なので次の wake-up で抜ける）
        for entry in self.state.get_mut().workers.drain(..) {
            entry.worker.stop();
        }
    }
}
