//! The inventory store.
//!
//! [`Inventory`] owns the in-memory collection of items and is the only
//! component that mutates it. Every mutating operation is immediately
//! followed by a full save of the collection through the [`DataFile`]
//! persistence adapter (there are no partial writes and no transactions;
//! last writer wins).

use crate::{
    domain::item::{
        Item, ItemId, ValidationError, round_price, validate_name, validate_price,
        validate_quantity, validate_threshold,
    },
    storage::{DataFile, SaveError},
};

/// The inventory store.
///
/// Constructed by the caller (typically a CLI command handler) and passed
/// wherever item access is needed; there is no global instance.
///
/// A failed save after a mutation leaves the in-memory change applied but
/// unsaved. The error is surfaced to the caller; the collection and the
/// storage file are then out of sync until the next successful save.
#[derive(Debug)]
pub struct Inventory {
    file: DataFile,
    items: Vec<Item>,
}

/// An inventory operation failed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A field of the supplied item data is invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No item in the collection has the given id.
    #[error("no item with id {0}")]
    NotFound(ItemId),

    /// A quantity adjustment would drive the stock level below zero.
    #[error("cannot adjust item {id} by {delta}: only {quantity} in stock")]
    InsufficientStock {
        /// The item that was being adjusted.
        id: ItemId,
        /// The stock level at the time of the adjustment.
        quantity: i64,
        /// The rejected adjustment.
        delta: i64,
    },

    /// The collection could not be written to storage.
    #[error("failed to save inventory: {0}")]
    Save(#[from] SaveError),
}

/// Caller-supplied token for the delete operation.
///
/// The store holds no transient confirmation state: the presentation layer
/// asks the operator first and then calls [`Inventory::delete`] with the
/// resolved answer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Confirmation {
    /// The operator confirmed the deletion.
    Confirmed,
    /// The operator declined; the collection must be left unchanged.
    Declined,
}

/// Result of a [`Inventory::delete`] call.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The item was removed and the collection saved.
    Deleted,
    /// The confirmation was declined; nothing changed.
    Cancelled,
}

/// Optional new values for [`Inventory::edit`].
///
/// Unset fields retain their prior value. Provided fields are validated
/// under the same constraints as [`Inventory::add`]; nothing is mutated
/// unless every provided field validates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement quantity.
    pub quantity: Option<i64>,
    /// Replacement unit price.
    pub price: Option<f64>,
    /// Replacement low-stock threshold.
    pub threshold: Option<i64>,
}

impl Inventory {
    /// Open the inventory backed by the given data file.
    ///
    /// An absent or unreadable file yields an empty collection (see
    /// [`DataFile::load`]).
    #[must_use]
    pub fn open(file: DataFile) -> Self {
        let items = file.load();
        Self { file, items }
    }

    /// Add a new item to the collection and save.
    ///
    /// A unique id is assigned and the price is rounded to 2 decimal
    /// places before the item is appended.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] (collection unchanged) if the name is
    /// empty, the quantity is negative, the price is negative or not
    /// finite, or the threshold is below 1, and [`Error::Save`] if the
    /// collection cannot be written.
    pub fn add(
        &mut self,
        name: &str,
        quantity: i64,
        price: f64,
        threshold: i64,
    ) -> Result<&Item, Error> {
        let item = Item::new(self.next_id(), name, quantity, price, threshold)?;

        tracing::info!("Added item {} ({})", item.id, item.name);
        self.items.push(item);
        self.save()?;

        Ok(self.items.last().expect("collection cannot be empty after push"))
    }

    /// Change an item's quantity by `delta` and save.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no item has `id`,
    /// [`Error::InsufficientStock`] (quantity unchanged) if the adjustment
    /// would drive the quantity below zero, and [`Error::Save`] if the
    /// collection cannot be written.
    pub fn adjust_quantity(&mut self, id: ItemId, delta: i64) -> Result<&Item, Error> {
        let index = self.index_of(id)?;
        let quantity = self.items[index].quantity;

        let adjusted = quantity.saturating_add(delta);
        if adjusted < 0 {
            return Err(Error::InsufficientStock {
                id,
                quantity,
                delta,
            });
        }

        self.items[index].quantity = adjusted;
        self.save()?;

        Ok(&self.items[index])
    }

    /// Apply a [`ItemPatch`] to an item and save.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no item has `id`,
    /// [`Error::Validation`] (item unchanged) if any provided field fails
    /// validation, and [`Error::Save`] if the collection cannot be written.
    pub fn edit(&mut self, id: ItemId, patch: ItemPatch) -> Result<&Item, Error> {
        let index = self.index_of(id)?;

        // Validate every provided field before mutating any of them.
        let name = patch.name.as_deref().map(validate_name).transpose()?;
        if let Some(quantity) = patch.quantity {
            validate_quantity(quantity)?;
        }
        if let Some(price) = patch.price {
            validate_price(price)?;
        }
        if let Some(threshold) = patch.threshold {
            validate_threshold(threshold)?;
        }

        let item = &mut self.items[index];
        if let Some(name) = name {
            item.name = name;
        }
        if let Some(quantity) = patch.quantity {
            item.quantity = quantity;
        }
        if let Some(price) = patch.price {
            item.price = round_price(price);
        }
        if let Some(threshold) = patch.threshold {
            item.threshold = threshold;
        }

        tracing::info!("Updated item {}", id);
        self.save()?;

        Ok(&self.items[index])
    }

    /// Remove an item from the collection and save.
    ///
    /// Requires an affirmative [`Confirmation`] token from the caller;
    /// with [`Confirmation::Declined`] the collection is left untouched
    /// and [`DeleteOutcome::Cancelled`] is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no item has `id` (whether or not the
    /// deletion was confirmed), and [`Error::Save`] if the collection
    /// cannot be written.
    pub fn delete(&mut self, id: ItemId, confirmation: Confirmation) -> Result<DeleteOutcome, Error> {
        let index = self.index_of(id)?;

        if confirmation == Confirmation::Declined {
            return Ok(DeleteOutcome::Cancelled);
        }

        let removed = self.items.remove(index);
        tracing::info!("Deleted item {} ({})", removed.id, removed.name);
        self.save()?;

        Ok(DeleteOutcome::Deleted)
    }

    /// Look up an item by id.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// The items in display order.
    ///
    /// Low-stock items sort before the rest; within each group items are
    /// ordered by name, ascending. The sort is stable.
    #[must_use]
    pub fn list(&self) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.items.iter().collect();
        items.sort_by(|a, b| {
            (!a.is_low_stock())
                .cmp(&!b.is_low_stock())
                .then_with(|| a.name.cmp(&b.name))
        });
        items
    }

    /// The total value of the inventory: the sum of `quantity * price`
    /// over all items.
    #[must_use]
    pub fn total_value(&self) -> f64 {
        self.items.iter().map(Item::value).sum()
    }

    /// The number of items at or below their low-stock threshold.
    #[must_use]
    pub fn low_stock_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_low_stock()).count()
    }

    /// The number of items in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn index_of(&self, id: ItemId) -> Result<usize, Error> {
        self.items
            .iter()
            .position(|item| item.id == id)
            .ok_or(Error::NotFound(id))
    }

    fn next_id(&self) -> ItemId {
        let max = self.items.iter().map(|item| item.id.0).max().unwrap_or(0);
        ItemId(max + 1)
    }

    fn save(&self) -> Result<(), SaveError> {
        self.file.save(&self.items)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn setup() -> (TempDir, Inventory) {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let file = DataFile::new(tmp.path().join("inventory.json"));
        (tmp, Inventory::open(file))
    }

    #[test]
    fn add_assigns_sequential_ids() {
        let (_tmp, mut inventory) = setup();
        let first = inventory.add("Rice", 10, 2.5, 5).unwrap().id();
        let second = inventory.add("Juice", 20, 1.0, 5).unwrap().id();

        assert_eq!(first, ItemId(1));
        assert_eq!(second, ItemId(2));
    }

    #[test]
    fn added_item_is_retrievable_by_id() {
        let (_tmp, mut inventory) = setup();
        let id = inventory.add("Rice", 10, 2.5, 5).unwrap().id();

        assert_eq!(inventory.len(), 1);
        let item = inventory.get(id).expect("item should be retrievable");
        assert_eq!(item.name(), "Rice");
        assert_eq!(item.quantity(), 10);
    }

    #[test]
    fn invalid_add_leaves_collection_unchanged() {
        let (_tmp, mut inventory) = setup();

        assert!(matches!(
            inventory.add("", 1, 1.0, 1),
            Err(Error::Validation(ValidationError::EmptyName))
        ));
        assert!(matches!(
            inventory.add("Rice", -1, 1.0, 1),
            Err(Error::Validation(ValidationError::NegativeQuantity(-1)))
        ));
        assert!(matches!(
            inventory.add("Rice", 1, -1.0, 1),
            Err(Error::Validation(ValidationError::InvalidPrice(_)))
        ));
        assert!(matches!(
            inventory.add("Rice", 1, 1.0, 0),
            Err(Error::Validation(ValidationError::ThresholdTooLow(0)))
        ));

        assert!(inventory.is_empty());
    }

    #[test]
    fn adjust_quantity_increments_and_decrements() {
        let (_tmp, mut inventory) = setup();
        let id = inventory.add("Rice", 10, 2.5, 5).unwrap().id();

        assert_eq!(inventory.adjust_quantity(id, 1).unwrap().quantity(), 11);
        assert_eq!(inventory.adjust_quantity(id, -4).unwrap().quantity(), 7);
    }

    #[test]
    fn adjust_quantity_cannot_go_negative() {
        let (_tmp, mut inventory) = setup();
        let id = inventory.add("Rice", 3, 2.5, 5).unwrap().id();

        let err = inventory.adjust_quantity(id, -4).unwrap_err();
        assert!(matches!(err, Error::InsufficientStock { quantity: 3, delta: -4, .. }));

        // Unchanged after the failed adjustment.
        assert_eq!(inventory.get(id).unwrap().quantity(), 3);
    }

    #[test]
    fn adjust_quantity_unknown_id_is_not_found() {
        let (_tmp, mut inventory) = setup();
        inventory.add("Rice", 3, 2.5, 5).unwrap();

        let err = inventory.adjust_quantity(ItemId(99), 1).unwrap_err();
        assert!(matches!(err, Error::NotFound(ItemId(99))));
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn list_puts_low_stock_first_then_sorts_by_name() {
        let (_tmp, mut inventory) = setup();
        inventory.add("Rice", 5, 1.0, 10).unwrap(); // low stock
        inventory.add("Juice", 20, 1.0, 5).unwrap(); // ok
        inventory.add("Apple", 3, 1.0, 5).unwrap(); // low stock

        let names: Vec<&str> = inventory.list().iter().map(|item| item.name()).collect();
        assert_eq!(names, ["Apple", "Rice", "Juice"]);
    }

    #[test]
    fn total_value_sums_quantity_times_price() {
        let (_tmp, mut inventory) = setup();
        inventory.add("Rice", 2, 10.0, 1).unwrap();
        inventory.add("Juice", 3, 5.5, 1).unwrap();

        assert!((inventory.total_value() - 36.5).abs() < f64::EPSILON);
    }

    #[test]
    fn low_stock_count_counts_items_at_or_below_threshold() {
        let (_tmp, mut inventory) = setup();
        inventory.add("Rice", 5, 1.0, 10).unwrap();
        inventory.add("Juice", 20, 1.0, 5).unwrap();
        inventory.add("Apple", 5, 1.0, 5).unwrap();

        assert_eq!(inventory.low_stock_count(), 2);
    }

    #[test]
    fn edit_replaces_only_provided_fields() {
        let (_tmp, mut inventory) = setup();
        let id = inventory.add("Rice", 10, 2.5, 5).unwrap().id();

        let patch = ItemPatch {
            price: Some(3.456),
            ..ItemPatch::default()
        };
        let item = inventory.edit(id, patch).unwrap();

        assert_eq!(item.name(), "Rice");
        assert_eq!(item.quantity(), 10);
        assert_eq!(item.price(), 3.46);
        assert_eq!(item.threshold(), 5);
    }

    #[test]
    fn edit_with_invalid_field_changes_nothing() {
        let (_tmp, mut inventory) = setup();
        let id = inventory.add("Rice", 10, 2.5, 5).unwrap().id();

        let patch = ItemPatch {
            name: Some("Brown Rice".to_string()),
            threshold: Some(0),
            ..ItemPatch::default()
        };
        assert!(matches!(
            inventory.edit(id, patch),
            Err(Error::Validation(ValidationError::ThresholdTooLow(0)))
        ));

        // The valid name change must not have been applied either.
        assert_eq!(inventory.get(id).unwrap().name(), "Rice");
    }

    #[test]
    fn edit_unknown_id_is_not_found() {
        let (_tmp, mut inventory) = setup();
        let err = inventory.edit(ItemId(7), ItemPatch::default()).unwrap_err();
        assert!(matches!(err, Error::NotFound(ItemId(7))));
    }

    #[test]
    fn delete_removes_exactly_the_named_item() {
        let (_tmp, mut inventory) = setup();
        let keep = inventory.add("Rice", 10, 2.5, 5).unwrap().id();
        let remove = inventory.add("Juice", 20, 1.0, 5).unwrap().id();

        let outcome = inventory.delete(remove, Confirmation::Confirmed).unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(inventory.len(), 1);
        assert!(inventory.get(keep).is_some());
        assert!(inventory.get(remove).is_none());
    }

    #[test]
    fn declined_delete_changes_nothing() {
        let (_tmp, mut inventory) = setup();
        let id = inventory.add("Rice", 10, 2.5, 5).unwrap().id();

        let outcome = inventory.delete(id, Confirmation::Declined).unwrap();
        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert!(inventory.get(id).is_some());
    }

    #[test]
    fn delete_unknown_id_is_not_found() {
        let (_tmp, mut inventory) = setup();
        let err = inventory.delete(ItemId(3), Confirmation::Confirmed).unwrap_err();
        assert!(matches!(err, Error::NotFound(ItemId(3))));
    }

    #[test]
    fn mutations_survive_a_reload() {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let path = tmp.path().join("inventory.json");

        let mut inventory = Inventory::open(DataFile::new(path.clone()));
        let id = inventory.add("Rice", 10, 2.5, 5).unwrap().id();
        inventory.adjust_quantity(id, -3).unwrap();

        let reloaded = Inventory::open(DataFile::new(path));
        let item = reloaded.get(id).expect("item should survive a reload");
        assert_eq!(item.name(), "Rice");
        assert_eq!(item.quantity(), 7);
        assert_eq!(item.price(), 2.5);
        assert_eq!(item.threshold(), 5);
    }

    #[test]
    fn id_of_highest_deleted_item_may_be_reused() {
        let (_tmp, mut inventory) = setup();
        inventory.add("Rice", 1, 1.0, 1).unwrap();
        let last = inventory.add("Juice", 1, 1.0, 1).unwrap().id();

        inventory.delete(last, Confirmation::Confirmed).unwrap();
        let next = inventory.add("Apple", 1, 1.0, 1).unwrap().id();

        assert_eq!(next, last);
    }
}
