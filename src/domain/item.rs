use std::{fmt, num::ParseIntError, str::FromStr};

/// An item tracked by the inventory.
///
/// An item records how much of a product is on the shelf, what a unit of it
/// costs, and below which quantity the operator wants to be alerted.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub(crate) id: ItemId,
    pub(crate) name: String,
    pub(crate) quantity: i64,
    pub(crate) price: f64,
    pub(crate) threshold: i64,
}

/// Identifier of an [`Item`], unique within a collection.
///
/// Ids are assigned by the store as one greater than the largest existing
/// id, starting from 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for ItemId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// An item field failed validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The item name is empty (or whitespace only).
    #[error("item name cannot be empty")]
    EmptyName,

    /// The quantity is below zero.
    #[error("quantity must be zero or greater (got {0})")]
    NegativeQuantity(i64),

    /// The price is negative, NaN, or infinite.
    #[error("price must be a non-negative number (got {0})")]
    InvalidPrice(f64),

    /// The low-stock threshold is below one.
    #[error("threshold must be at least 1 (got {0})")]
    ThresholdTooLow(i64),
}

impl Item {
    /// Construct a validated item.
    ///
    /// The name is trimmed and the price rounded to 2 decimal places.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the name is empty, the quantity is
    /// negative, the price is negative or not finite, or the threshold is
    /// below 1.
    pub fn new(
        id: ItemId,
        name: &str,
        quantity: i64,
        price: f64,
        threshold: i64,
    ) -> Result<Self, ValidationError> {
        let name = validate_name(name)?;
        validate_quantity(quantity)?;
        validate_price(price)?;
        validate_threshold(threshold)?;

        Ok(Self {
            id,
            name,
            quantity,
            price: round_price(price),
            threshold,
        })
    }

    /// The item's identifier.
    #[must_use]
    pub const fn id(&self) -> ItemId {
        self.id
    }

    /// The item's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Units currently on hand. Never negative.
    #[must_use]
    pub const fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Price of a single unit, rounded to 2 decimal places.
    #[must_use]
    pub const fn price(&self) -> f64 {
        self.price
    }

    /// The low-stock threshold. At least 1.
    #[must_use]
    pub const fn threshold(&self) -> i64 {
        self.threshold
    }

    /// Whether the item needs restocking.
    ///
    /// An item is low on stock when its quantity is less than or equal to
    /// its threshold.
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.quantity <= self.threshold
    }

    /// The total value of the units on hand (`quantity * price`).
    #[must_use]
    pub fn value(&self) -> f64 {
        self.quantity as f64 * self.price
    }
}

pub(crate) fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

pub(crate) const fn validate_quantity(quantity: i64) -> Result<(), ValidationError> {
    if quantity < 0 {
        return Err(ValidationError::NegativeQuantity(quantity));
    }
    Ok(())
}

pub(crate) fn validate_price(price: f64) -> Result<(), ValidationError> {
    // `!(>= 0)` rather than `< 0` so that NaN is rejected too.
    if !price.is_finite() || !(price >= 0.0) {
        return Err(ValidationError::InvalidPrice(price));
    }
    Ok(())
}

pub(crate) const fn validate_threshold(threshold: i64) -> Result<(), ValidationError> {
    if threshold < 1 {
        return Err(ValidationError::ThresholdTooLow(threshold));
    }
    Ok(())
}

/// Round a price to 2 decimal places.
pub(crate) fn round_price(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_item_is_constructed() {
        let item = Item::new(ItemId(1), "Bottled Water", 50, 15.0, 10).unwrap();
        assert_eq!(item.id(), ItemId(1));
        assert_eq!(item.name(), "Bottled Water");
        assert_eq!(item.quantity(), 50);
        assert_eq!(item.price(), 15.0);
        assert_eq!(item.threshold(), 10);
    }

    #[test]
    fn name_is_trimmed() {
        let item = Item::new(ItemId(1), "  Rice  ", 1, 1.0, 1).unwrap();
        assert_eq!(item.name(), "Rice");
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = Item::new(ItemId(1), "   ", 1, 1.0, 1).unwrap_err();
        assert_eq!(err, ValidationError::EmptyName);
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let err = Item::new(ItemId(1), "Rice", -1, 1.0, 1).unwrap_err();
        assert_eq!(err, ValidationError::NegativeQuantity(-1));
    }

    #[test]
    fn negative_price_is_rejected() {
        let err = Item::new(ItemId(1), "Rice", 1, -0.5, 1).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPrice(_)));
    }

    #[test]
    fn nan_price_is_rejected() {
        let err = Item::new(ItemId(1), "Rice", 1, f64::NAN, 1).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPrice(_)));
    }

    #[test]
    fn threshold_below_one_is_rejected() {
        let err = Item::new(ItemId(1), "Rice", 1, 1.0, 0).unwrap_err();
        assert_eq!(err, ValidationError::ThresholdTooLow(0));
    }

    #[test]
    fn price_is_rounded_to_two_decimals() {
        let item = Item::new(ItemId(1), "Rice", 1, 12.345, 1).unwrap();
        assert_eq!(item.price(), 12.35);
    }

    #[test]
    fn low_stock_boundary_is_inclusive() {
        let at = Item::new(ItemId(1), "Rice", 5, 1.0, 5).unwrap();
        let above = Item::new(ItemId(2), "Rice", 6, 1.0, 5).unwrap();
        assert!(at.is_low_stock());
        assert!(!above.is_low_stock());
    }

    #[test]
    fn item_id_parses_from_string() {
        assert_eq!(" 42 ".parse::<ItemId>().unwrap(), ItemId(42));
        assert!("abc".parse::<ItemId>().is_err());
    }
}
