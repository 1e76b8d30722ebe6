//! Pending queue: PRIORITY items first, STANDARD after, FIFO within each class.

use std::collections::VecDeque;

use crate::domain::{Item, ItemClass, ItemId};

/// Ordered pending items.
///
/// Not synchronized: it lives inside the coordinator state and is only touched
/// under the coordinator lock.
#[derive(Debug, Default)]
pub struct PendingQueue {
    items: VecDeque<Item>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert according to the item's class.
    pub fn push(&mut self, item: Item) {
        match item.class() {
            ItemClass::Standard => self.items.push_back(item),
            ItemClass::Priority => {
                let at = self.priority_insert_index();
                self.items.insert(at, item);
            }
        }
    }

    /// Put an interrupted item back at the very front, ahead of everything,
    /// PRIORITY items included.
    pub fn push_front(&mut self, item: Item) {
        self.items.push_front(item);
    }

    pub fn pop_front(&mut self) -> Option<Item> {
        self.items.pop_front()
    }

    /// (id, class) in queue order.
    pub fn entries(&self) -> impl Iterator<Item = (ItemId, ItemClass)> + '_ {
        self.items.iter().map(|item| (item.id(), item.class()))
    }

    /// Index of the first STANDARD item, or the end of the queue.
    ///
    /// Linear on purpose: an interrupted STANDARD item can sit at index 0, so a
    /// cached "priority count" would not describe the boundary.
    fn priority_insert_index(&self) -> usize {
        self.items
            .iter()
            .position(|item| item.class() == ItemClass::Standard)
            .unwrap_or(self.items.len())
    }
}
