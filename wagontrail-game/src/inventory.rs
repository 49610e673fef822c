//! Supplies carried by the wagon.
//!
//! Every mutation goes through [`SimItem`] so quantities never drop below zero
//! and never exceed the item's carrying limit. Rejected operations leave the
//! inventory untouched.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Kinds of supplies the party can own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Animal,
    Food,
    Clothes,
    Ammo,
    Wheel,
    Axle,
    Tongue,
}

impl Entity {
    pub const ALL: [Self; 7] = [
        Self::Animal,
        Self::Food,
        Self::Clothes,
        Self::Ammo,
        Self::Wheel,
        Self::Axle,
        Self::Tongue,
    ];

    /// Spare parts the wagon can break and replace.
    pub const PARTS: [Self; 3] = [Self::Wheel, Self::Axle, Self::Tongue];

    /// Stable menu command identifier used by the store.
    #[must_use]
    pub const fn buy_command(self) -> &'static str {
        match self {
            Self::Animal => "BuyOxen",
            Self::Food => "BuyFood",
            Self::Clothes => "BuyClothing",
            Self::Ammo => "BuyAmmunition",
            Self::Wheel => "BuyWheel",
            Self::Axle => "BuyAxle",
            Self::Tongue => "BuyTongue",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Animal => "oxen",
            Self::Food => "food",
            Self::Clothes => "clothing",
            Self::Ammo => "ammunition",
            Self::Wheel => "wagon wheel",
            Self::Axle => "wagon axle",
            Self::Tongue => "wagon tongue",
        }
    }

    #[must_use]
    pub const fn is_part(self) -> bool {
        matches!(self, Self::Wheel | Self::Axle | Self::Tongue)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rejections raised at the inventory mutation boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("{entity} must have a positive minimum quantity (got {min})")]
    NonPositiveMinimum { entity: Entity, min: i32 },
    #[error("{entity} maximum {max} is below its minimum {min}")]
    MaximumBelowMinimum { entity: Entity, min: i32, max: i32 },
    #[error("{entity} cannot hold {requested} (limit {max})")]
    AboveMaximum {
        entity: Entity,
        requested: i32,
        max: i32,
    },
    #[error("quantity must be positive (got {0})")]
    NonPositiveQuantity(i32),
    #[error("purchase costs {cost_cents} cents but only {available_cents} remain")]
    Unaffordable {
        cost_cents: i64,
        available_cents: i64,
    },
    #[error("{0} is not carried")]
    NotCarried(Entity),
}

/// A stack of one kind of supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimItem {
    entity: Entity,
    name: String,
    quantity: i32,
    min_quantity: i32,
    max_quantity: i32,
    weight: i32,
}

impl SimItem {
    /// Create an empty stack.
    ///
    /// # Errors
    ///
    /// Returns an error if `min_quantity` is not positive or `max_quantity` is below it.
    pub fn new(
        entity: Entity,
        name: impl Into<String>,
        min_quantity: i32,
        max_quantity: i32,
        weight: i32,
    ) -> Result<Self, InventoryError> {
        if min_quantity <= 0 {
            return Err(InventoryError::NonPositiveMinimum {
                entity,
                min: min_quantity,
            });
        }
        if max_quantity < min_quantity {
            return Err(InventoryError::MaximumBelowMinimum {
                entity,
                min: min_quantity,
                max: max_quantity,
            });
        }
        Ok(Self {
            entity,
            name: name.into(),
            quantity: 0,
            min_quantity,
            max_quantity,
            weight,
        })
    }

    #[must_use]
    pub const fn entity(&self) -> Entity {
        self.entity
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn quantity(&self) -> i32 {
        self.quantity
    }

    #[must_use]
    pub const fn min_quantity(&self) -> i32 {
        self.min_quantity
    }

    #[must_use]
    pub const fn max_quantity(&self) -> i32 {
        self.max_quantity
    }

    #[must_use]
    pub const fn total_weight(&self) -> i32 {
        self.quantity.saturating_mul(self.weight)
    }

    /// Add to the stack, returning the new quantity.
    ///
    /// # Errors
    ///
    /// Rejects non-positive amounts and amounts that would pass the maximum.
    pub fn add(&mut self, amount: i32) -> Result<i32, InventoryError> {
        if amount <= 0 {
            return Err(InventoryError::NonPositiveQuantity(amount));
        }
        let requested = self.quantity.saturating_add(amount);
        if requested > self.max_quantity {
            return Err(InventoryError::AboveMaximum {
                entity: self.entity,
                requested,
                max: self.max_quantity,
            });
        }
        self.quantity = requested;
        Ok(self.quantity)
    }

    /// Remove up to `amount`, clamping at zero. Returns how much was actually removed.
    pub fn remove(&mut self, amount: i32) -> i32 {
        if amount <= 0 {
            return 0;
        }
        let removed = amount.min(self.quantity);
        self.quantity -= removed;
        removed
    }
}

/// Supplies plus cash on hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: BTreeMap<Entity, SimItem>,
    cash_cents: i64,
}

impl Inventory {
    #[must_use]
    pub fn new(items: impl IntoIterator<Item = SimItem>) -> Self {
        Self {
            items: items.into_iter().map(|item| (item.entity, item)).collect(),
            cash_cents: 0,
        }
    }

    #[must_use]
    pub fn quantity(&self, entity: Entity) -> i32 {
        self.items.get(&entity).map_or(0, SimItem::quantity)
    }

    #[must_use]
    pub fn item(&self, entity: Entity) -> Option<&SimItem> {
        self.items.get(&entity)
    }

    pub fn items(&self) -> impl Iterator<Item = &SimItem> {
        self.items.values()
    }

    /// Add supplies to an existing stack.
    ///
    /// # Errors
    ///
    /// Propagates the stack's rejection, or `NotCarried` for an unknown entity.
    pub fn add(&mut self, entity: Entity, amount: i32) -> Result<i32, InventoryError> {
        self.items
            .get_mut(&entity)
            .ok_or(InventoryError::NotCarried(entity))?
            .add(amount)
    }

    /// Remove supplies, never going below zero.
    pub fn remove(&mut self, entity: Entity, amount: i32) -> i32 {
        self.items
            .get_mut(&entity)
            .map_or(0, |item| item.remove(amount))
    }

    /// Remove a fraction of a stack, rounding down. Returns the amount removed.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn remove_fraction(&mut self, entity: Entity, fraction: f32) -> i32 {
        let amount = (self.quantity(entity) as f32 * fraction.clamp(0.0, 1.0)).floor() as i32;
        self.remove(entity, amount)
    }

    #[must_use]
    pub const fn cash_cents(&self) -> i64 {
        self.cash_cents
    }

    pub fn set_cash_cents(&mut self, cents: i64) {
        self.cash_cents = cents.max(0);
    }

    /// Deduct cash for a purchase.
    ///
    /// # Errors
    ///
    /// Returns `Unaffordable` and leaves cash untouched when funds are short.
    pub fn spend(&mut self, cost_cents: i64) -> Result<i64, InventoryError> {
        if cost_cents > self.cash_cents {
            return Err(InventoryError::Unaffordable {
                cost_cents,
                available_cents: self.cash_cents,
            });
        }
        self.cash_cents -= cost_cents.max(0);
        Ok(self.cash_cents)
    }

    #[must_use]
    pub fn total_weight(&self) -> i32 {
        self.items.values().map(SimItem::total_weight).sum()
    }
}

/// Format cents as dollars for display.
#[must_use]
pub fn format_cents(cents: i64) -> String {
    format!("${}.{:02}", cents / 100, (cents % 100).abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food() -> SimItem {
        SimItem::new(Entity::Food, "Food", 1, 2000, 1).unwrap()
    }

    #[test]
    fn construction_rejects_non_positive_minimum() {
        assert_eq!(
            SimItem::new(Entity::Ammo, "Bullets", 0, 99, 1),
            Err(InventoryError::NonPositiveMinimum {
                entity: Entity::Ammo,
                min: 0
            })
        );
        assert!(SimItem::new(Entity::Ammo, "Bullets", -3, 99, 1).is_err());
        assert!(SimItem::new(Entity::Ammo, "Bullets", 5, 2, 1).is_err());
    }

    #[test]
    fn removal_clamps_at_zero() {
        let mut item = food();
        item.add(10).unwrap();
        assert_eq!(item.remove(25), 10);
        assert_eq!(item.quantity(), 0);
        assert_eq!(item.remove(5), 0);
    }

    #[test]
    fn add_above_maximum_is_rejected_without_change() {
        let mut item = food();
        item.add(1990).unwrap();
        assert!(matches!(
            item.add(20),
            Err(InventoryError::AboveMaximum { max: 2000, .. })
        ));
        assert_eq!(item.quantity(), 1990);
        assert!(item.add(0).is_err());
    }

    #[test]
    fn spending_beyond_cash_is_a_no_op() {
        let mut inventory = Inventory::new([food()]);
        inventory.set_cash_cents(1_000);
        assert!(inventory.spend(1_500).is_err());
        assert_eq!(inventory.cash_cents(), 1_000);
        assert_eq!(inventory.spend(400), Ok(600));
    }

    #[test]
    fn unknown_entities_are_not_carried() {
        let mut inventory = Inventory::new([food()]);
        assert_eq!(
            inventory.add(Entity::Axle, 1),
            Err(InventoryError::NotCarried(Entity::Axle))
        );
        assert_eq!(inventory.remove(Entity::Axle, 1), 0);
        assert_eq!(inventory.quantity(Entity::Axle), 0);
    }

    #[test]
    fn fractional_loss_rounds_down() {
        let mut inventory = Inventory::new([food()]);
        inventory.add(Entity::Food, 55).unwrap();
        assert_eq!(inventory.remove_fraction(Entity::Food, 0.5), 27);
        assert_eq!(inventory.quantity(Entity::Food), 28);
    }

    #[test]
    fn cents_format_as_dollars() {
        assert_eq!(format_cents(160_000), "$1600.00");
        assert_eq!(format_cents(1_005), "$10.05");
    }
}
