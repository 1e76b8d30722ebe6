//! Domain model (IDs, items, events).

pub mod events;
pub mod ids;
pub mod item;

pub use self::events::DomainEvent;
pub use self::ids::{IdSequence, ItemId, WorkerId};
pub use self::item::{Item, ItemClass, ItemState};
