//! Events - ドメインイベント
//!
//! Coordinator が EventSink に渡す行の中身。タイムスタンプは Coordinator 側で付与します。

use std::fmt;

use super::{ItemClass, ItemId, WorkerId};

/// Something that happened in the fulfillment center.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    ItemSubmitted {
        item: ItemId,
        class: ItemClass,
    },
    WorkerCreated {
        worker: WorkerId,
    },
    WorkerRemoved {
        worker: WorkerId,
        reassigned: Option<ItemId>,
    },
    NoWorkerToRemove,
    ProcessingStarted {
        worker: WorkerId,
        item: ItemId,
        class: ItemClass,
    },
    ProcessingCompleted {
        worker: WorkerId,
        item: ItemId,
        class: ItemClass,
    },
}

impl fmt::Display for DomainEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainEvent::ItemSubmitted { item, class } => {
                write!(f, "New {class} {item} added to PENDING")
            }
            DomainEvent::WorkerCreated { worker } => write!(f, "{worker} created"),
            DomainEvent::WorkerRemoved {
                worker,
                reassigned: Some(item),
            } => write!(f, "{worker} removed, {item} returned to PENDING"),
            DomainEvent::WorkerRemoved {
                worker,
                reassigned: None,
            } => write!(f, "{worker} removed"),
            DomainEvent::NoWorkerToRemove => f.write_str("No workers to remove"),
            DomainEvent::ProcessingStarted {
                worker,
                item,
                class,
            } => write!(f, "{worker} processing {item} ({class})"),
            DomainEvent::ProcessingCompleted {
                worker,
                item,
                class,
            } => write!(f, "{worker} completed {item} ({class}) - moved to COMPLETE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_removal_with_and_without_item() {
        let plain = DomainEvent::WorkerRemoved {
            worker: WorkerId::new(3),
            reassigned: None,
        };
        assert_eq!(plain.to_string(), "Worker #3 removed");

        let with_item = DomainEvent::WorkerRemoved {
            worker: WorkerId::new(3),
            reassigned: Some(ItemId::new(9)),
        };
        assert_eq!(
            with_item.to_string(),
            "Worker #3 removed, Item #9 returned to PENDING"
        );
    }

    #[test]
    fn renders_processing_lines() {
        let started = DomainEvent::ProcessingStarted {
            worker: WorkerId::new(1),
            item: ItemId::new(4),
            class: ItemClass::Priority,
        };
        assert_eq!(started.to_string(), "Worker #1 processing Item #4 (PRIORITY)");

        let done = DomainEvent::ProcessingCompleted {
            worker: WorkerId::new(1),
            item: ItemId::new(4),
            class: ItemClass::Priority,
        };
        assert_eq!(
            done.to_string(),
            "Worker #1 completed Item #4 (PRIORITY) - moved to COMPLETE"
        );
    }

    #[test]
    fn renders_submission() {
        let ev = DomainEvent::ItemSubmitted {
            item: ItemId::new(2),
            class: ItemClass::Standard,
        };
        assert_eq!(ev.to_string(), "New STANDARD Item #2 added to PENDING");
    }
}
