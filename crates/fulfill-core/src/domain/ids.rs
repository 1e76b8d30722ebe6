//! Domain identifiers (strongly-typed IDs).
//!
//! # 連番 ID + ジェネリック実装
//! Item と Worker の ID はどちらも 1 から始まる連番で、一度払い出した値は再利用しません。
//! Phantom type パターンで `Id<T>` の実装を共有しつつ、
//! `ItemId` と `WorkerId` をコンパイル時に区別します。

use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;

/// IdMarker は各 ID 型のマーカー trait
///
/// Display で使うラベル（"Item", "Worker"）を提供します。
pub trait IdMarker: Send + Sync + 'static {
    fn label() -> &'static str;
}

/// ジェネリック ID 型
///
/// `T` は PhantomData なので実行時のサイズは `u64` と同じです。
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Id<T: IdMarker> {
    value: u64,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn new(value: u64) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    pub fn get(&self) -> u64 {
        self.value
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", T::label(), self.value)
    }
}

/// Monotonic id source. Post-increments; never hands out the same value twice.
///
/// Not synchronized on its own: the coordinator keeps both sequences behind its lock.
#[derive(Debug)]
pub struct IdSequence<T: IdMarker> {
    next: u64,
    _marker: PhantomData<T>,
}

impl<T: IdMarker> IdSequence<T> {
    pub fn new() -> Self {
        Self {
            next: 1,
            _marker: PhantomData,
        }
    }

    pub fn next_id(&mut self) -> Id<T> {
        let id = Id::new(self.next);
        self.next += 1;
        id
    }
}

impl<T: IdMarker> Default for IdSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ========================================
// マーカー型の定義
// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Item {}

impl IdMarker for Item {
    fn label() -> &'static str {
        "Item"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Worker {}

impl IdMarker for Worker {
    fn label() -> &'static str {
        "Worker"
    }
}

/// Identifier of a work item.
pub type ItemId = Id<Item>;

/// Identifier of a worker.
pub type WorkerId = Id<Worker>;
