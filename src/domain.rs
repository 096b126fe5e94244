//! Domain models for inventory tracking.
//!
//! This module contains the item record, its identifier, and the inventory
//! store that owns the collection.

/// Item record and identifier types.
pub mod item;
pub use item::{Item, ItemId, ValidationError};

/// The inventory store.
pub mod store;
pub use store::{Confirmation, DeleteOutcome, Error, Inventory, ItemPatch};
