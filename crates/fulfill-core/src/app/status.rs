//! Status - 状態のスナップショット
//!
//! Coordinator lock の下で一度に取るので、同じ Item が二箇所に現れることはありません。

use serde::Serialize;

use crate::domain::{ItemClass, ItemId, WorkerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkerStatus {
    pub id: WorkerId,
    /// `None` means idle.
    pub processing: Option<ItemId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemView {
    pub id: ItemId,
    pub class: ItemClass,
}

/// Point-in-time view of workers, pending and completed items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Creation order.
    pub workers: Vec<WorkerStatus>,
    /// Queue order.
    pub pending: Vec<ItemView>,
    /// Completion order.
    pub completed: Vec<ItemView>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub workers: usize,
    pub pending: usize,
    pub in_flight: usize,
    pub completed: usize,
}

impl Snapshot {
    pub fn counts(&self) -> StatusCounts {
        StatusCounts {
            workers: self.workers.len(),
            pending: self.pending.len(),
            in_flight: self.in_flight().count(),
            completed: self.completed.len(),
        }
    }

    /// Items currently held by a worker.
    pub fn in_flight(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.workers.iter().filter_map(|w| w.processing)
    }

    /// pending + in flight + completed.
    pub fn total_items(&self) -> usize {
        let counts = self.counts();
        counts.pending + counts.in_flight + counts.completed
    }

    pub fn pending_ids(&self) -> Vec<ItemId> {
        self.pending.iter().map(|item| item.id).collect()
    }

    pub fn completed_ids(&self) -> Vec<ItemId> {
        self.completed.iter().map(|item| item.id).collect()
    }

    pub fn worker_ids(&self) -> Vec<WorkerId> {
        self.workers.iter().map(|w| w.id).collect()
    }

    /// Human-readable status block, one entry per line.
    pub fn report_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(4 + self.workers.len() + self.pending.len() + self.completed.len());
        lines.push("=== Fulfillment Status ===".to_string());

        lines.push(format!("Active Workers: {}", self.workers.len()));
        for worker in &self.workers {
            match worker.processing {
                Some(item) => lines.push(format!("  {}: Processing {}", worker.id, item)),
                None => lines.push(format!("  {}: IDLE", worker.id)),
            }
        }

        lines.push(format!("PENDING Items: {}", self.pending.len()));
        lines.extend(self.pending.iter().map(|item| format!("  {} ({})", item.id, item.class)));

        lines.push(format!("COMPLETE Items: {}", self.completed.len()));
        lines.extend(self.completed.iter().map(|item| format!("  {} ({})", item.id, item.class)));

        lines
    }
}
