//! Work items and their lifecycle.

use serde::Serialize;
use std::fmt;

use super::ItemId;

/// Service class of an item. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemClass {
    /// Plain FIFO.
    Standard,
    /// Jumps ahead of every STANDARD item, stays behind earlier PRIORITY items.
    Priority,
}

impl ItemClass {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemClass::Standard => "STANDARD",
            ItemClass::Priority => "PRIORITY",
        }
    }
}

impl fmt::Display for ItemClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Item state.
///
/// State transitions:
/// - Pending -> Completed
/// - 処理中に worker が外された場合は Pending のまま（"処理中" という状態は持たない）
///
/// Whether an item is in flight is told only by which worker slot holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemState {
    Pending,
    Completed,
}

impl ItemState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ItemState::Completed)
    }
}

/// A unit of work.
///
/// Not `Clone`: an item is moved between the pending queue, one worker slot and
/// the completed list, and lives in exactly one of them.
#[derive(Debug, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    class: ItemClass,
    state: ItemState,
}

impl Item {
    pub fn new(id: ItemId, class: ItemClass) -> Self {
        Self {
            id,
            class,
            state: ItemState::Pending,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn class(&self) -> ItemClass {
        self.class
    }

    pub fn state(&self) -> ItemState {
        self.state
    }

    pub fn mark_completed(&mut self) {
        self.state = ItemState::Completed;
    }

    /// Back to pending after its worker was removed mid-processing.
    pub fn requeue(&mut self) {
        debug_assert!(!self.state.is_terminal(), "completed items are never requeued");
        self.state = ItemState::Pending;
    }
}
