//! Worker handle: per-worker state plus its stop signal.
//!
//! ロック順序: coordinator lock → worker lock。worker lock を持ったまま
//! coordinator lock を取りに行くコードは存在しません。

use tokio::sync::{Mutex, watch};

use crate::domain::{Item, ItemClass, ItemId, WorkerId};

/// One worker as the coordinator sees it.
///
/// The control loop itself lives in `worker_loop`; this is the shared half that
/// both the loop and the coordinator touch.
#[derive(Debug)]
pub(crate) struct Worker {
    id: WorkerId,
    slot: Mutex<WorkerSlot>,
    stop_tx: watch::Sender<bool>,
}

#[derive(Debug)]
struct WorkerSlot {
    processing: Option<Item>,
    active: bool,
}

impl Worker {
    /// New idle, active worker and the receiving end of its stop signal.
    pub(crate) fn new(id: WorkerId) -> (Self, watch::Receiver<bool>) {
        let (stop_tx, stop_rx) = watch::channel(false);
        let worker = Self {
            id,
            slot: Mutex::new(WorkerSlot {
                processing: None,
                active: true,
            }),
            stop_tx,
        };
        (worker, stop_rx)
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    pub async fn is_active(&self) -> bool {
        self.slot.lock().await.active
    }

    /// (id, class) of the item in flight, if any.
    pub async fn processing(&self) -> Option<(ItemId, ItemClass)> {
        self.slot
            .lock()
            .await
            .processing
            .as_ref()
            .map(|item| (item.id(), item.class()))
    }

    /// Attach `item` as the in-flight item. Hands it back when the worker has
    /// already been deactivated.
    pub(crate) async fn assign(&self, item: Item) -> Result<(ItemId, ItemClass), Item> {
        let mut slot = self.slot.lock().await;
        if !slot.active {
            return Err(item);
        }
        debug_assert!(slot.processing.is_none(), "worker already holds an item");
        let picked = (item.id(), item.class());
        slot.processing = Some(item);
        Ok(picked)
    }

    /// Detach the in-flight item for completion. `None` when a remover got there first.
    pub(crate) async fn take_processing(&self) -> Option<Item> {
        self.slot.lock().await.processing.take()
    }

    /// Clear `active` and capture whatever was in flight.
    pub(crate) async fn deactivate(&self) -> Option<Item> {
        let mut slot = self.slot.lock().await;
        slot.active = false;
        slot.processing.take()
    }

    /// Fire the stop signal. Never blocks; repeated calls are harmless.
    pub(crate) fn stop(&self) {
        // ignore send error: the loop may already have exited and dropped its receiver
        let _ = self.stop_tx.send(true);
    }
}
