//! Canteen inventory tracking
//!
//! Items are records with a name, a quantity on hand, a unit price, and a
//! low-stock threshold, persisted together in a single JSON file.

pub mod domain;
pub use domain::{Confirmation, DeleteOutcome, Error, Inventory, Item, ItemId, ItemPatch};

/// File persistence for the inventory collection.
pub mod storage;
pub use storage::DataFile;
