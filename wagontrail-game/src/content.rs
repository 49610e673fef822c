//! Replaceable content tables: trail stops, store prices, advice and names.
//!
//! The simulation only looks these up; swapping the JSON changes the flavor of
//! the game without touching the state machine.
use rand::Rng;
use serde::Deserialize;
use std::sync::OnceLock;
use thiserror::Error;

use crate::inventory::{Entity, Inventory, InventoryError, SimItem};
use crate::trail::{Location, Trail};

const DEFAULT_TRAIL_DATA: &str = include_str!("../data/trail.json");
const DEFAULT_STORE_DATA: &str = include_str!("../data/store.json");
const DEFAULT_ADVICE_DATA: &str = include_str!("../data/advice.json");
const DEFAULT_NAMES_DATA: &str = include_str!("../data/names.json");

/// Malformed content tables.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("the trail has no locations")]
    EmptyTrail,
    #[error("no price listed for {0}")]
    MissingPrice(Entity),
    #[error(transparent)]
    Item(#[from] InventoryError),
    #[error("bundled content is corrupt: {0}")]
    Bundled(String),
}

/// One purchasable supply as listed by the store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PriceEntry {
    pub entity: Entity,
    pub name: String,
    /// Unit word used in prompts, e.g. "yoke" or "pound".
    pub unit: String,
    pub price_cents: i64,
    /// Number of inventory units one purchased unit adds.
    #[serde(default = "PriceEntry::default_bundle")]
    pub bundle: i32,
    #[serde(default = "PriceEntry::default_min_quantity")]
    pub min_quantity: i32,
    pub max_quantity: i32,
    #[serde(default)]
    pub weight: i32,
}

impl PriceEntry {
    const fn default_bundle() -> i32 {
        1
    }

    const fn default_min_quantity() -> i32 {
        1
    }

    /// Most purchasable units before the wagon's stack is full.
    #[must_use]
    pub fn max_purchase(&self, carried: i32) -> i32 {
        ((self.max_quantity - carried).max(0)) / self.bundle.max(1)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct TrailTable {
    locations: Vec<Location>,
}

#[derive(Debug, Clone, Deserialize)]
struct StoreTable {
    items: Vec<PriceEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct AdviceTable {
    advice: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct NamesTable {
    names: Vec<String>,
}

/// Every content table the core consumes.
#[derive(Debug, Clone)]
pub struct Content {
    pub locations: Vec<Location>,
    pub prices: Vec<PriceEntry>,
    pub advice: Vec<String>,
    pub names: Vec<String>,
}

impl Content {
    /// Parse the four tables from JSON documents.
    ///
    /// # Errors
    ///
    /// Returns an error if any document is malformed or the trail is empty.
    pub fn from_json(
        trail: &str,
        store: &str,
        advice: &str,
        names: &str,
    ) -> Result<Self, ContentError> {
        let trail: TrailTable = serde_json::from_str(trail)?;
        if trail.locations.is_empty() {
            return Err(ContentError::EmptyTrail);
        }
        let store: StoreTable = serde_json::from_str(store)?;
        let advice: AdviceTable = serde_json::from_str(advice)?;
        let names: NamesTable = serde_json::from_str(names)?;
        let content = Self {
            locations: trail.locations,
            prices: store.items,
            advice: advice.advice,
            names: names.names,
        };
        content.empty_inventory()?;
        if let Some(entity) = Entity::ALL.into_iter().find(|e| content.price(*e).is_none()) {
            return Err(ContentError::MissingPrice(entity));
        }
        Ok(content)
    }

    /// Tables compiled into the crate.
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled data is corrupt.
    pub fn bundled() -> Result<Self, ContentError> {
        Self::from_json(
            DEFAULT_TRAIL_DATA,
            DEFAULT_STORE_DATA,
            DEFAULT_ADVICE_DATA,
            DEFAULT_NAMES_DATA,
        )
    }

    /// Build a fresh trail from the location table.
    ///
    /// # Errors
    ///
    /// Returns an error if the table has no locations.
    pub fn trail(&self) -> Result<Trail, ContentError> {
        Trail::new(self.locations.clone())
    }

    /// An inventory with one empty stack per listed supply.
    ///
    /// # Errors
    ///
    /// Returns an error if a price entry describes an invalid stack.
    pub fn empty_inventory(&self) -> Result<Inventory, ContentError> {
        let items = self
            .prices
            .iter()
            .map(|entry| {
                SimItem::new(
                    entry.entity,
                    entry.name.clone(),
                    entry.min_quantity,
                    entry.max_quantity,
                    entry.weight,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Inventory::new(items))
    }

    #[must_use]
    pub fn price(&self, entity: Entity) -> Option<&PriceEntry> {
        self.prices.iter().find(|entry| entry.entity == entity)
    }

    /// Pick a line of advice; empty tables yield a stock remark.
    pub fn random_advice<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        if self.advice.is_empty() {
            return String::from("Nobody has anything to say.");
        }
        self.advice[rng.gen_range(0..self.advice.len())].clone()
    }

    /// Default name for the party member in `slot`.
    #[must_use]
    pub fn default_name(&self, slot: usize) -> String {
        self.names
            .get(slot)
            .cloned()
            .unwrap_or_else(|| format!("Traveler {}", slot + 1))
    }
}

/// Trait for abstracting content loading.
/// Front-ends with their own tables provide an implementation.
pub trait ContentLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load every content table.
    ///
    /// # Errors
    ///
    /// Returns an error if the tables cannot be loaded.
    fn load_content(&self) -> Result<Content, Self::Error>;
}

/// Loader for the tables compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticContent;

impl ContentLoader for StaticContent {
    type Error = ContentError;

    fn load_content(&self) -> Result<Content, Self::Error> {
        static CONTENT: OnceLock<Result<Content, String>> = OnceLock::new();
        CONTENT
            .get_or_init(|| Content::bundled().map_err(|err| err.to_string()))
            .clone()
            .map_err(ContentError::Bundled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_tables_parse_and_cover_every_supply() {
        let content = StaticContent.load_content().expect("bundled content");
        for entity in Entity::ALL {
            assert!(content.price(entity).is_some(), "missing price for {entity}");
        }
        assert!(content.locations.len() > 10);
        assert!(!content.advice.is_empty());
        assert!(content.names.len() >= 4);
        let trail = content.trail().unwrap();
        assert!(trail.locations().last().unwrap().last);
    }

    #[test]
    fn invalid_price_entry_is_rejected() {
        let store = r#"{ "items": [ { "entity": "food", "name": "Food", "unit": "pound",
            "price_cents": 20, "min_quantity": 0, "max_quantity": 2000 } ] }"#;
        let err = Content::from_json(
            r#"{ "locations": [ { "name": "A", "kind": "landmark" } ] }"#,
            store,
            r#"{ "advice": [] }"#,
            r#"{ "names": [] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ContentError::Item(_)));
    }

    #[test]
    fn empty_trail_is_rejected() {
        let err = Content::from_json(
            r#"{ "locations": [] }"#,
            r#"{ "items": [] }"#,
            r#"{ "advice": [] }"#,
            r#"{ "names": [] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ContentError::EmptyTrail));
    }

    #[test]
    fn max_purchase_respects_bundles() {
        let entry = PriceEntry {
            entity: Entity::Animal,
            name: String::from("Oxen"),
            unit: String::from("yoke"),
            price_cents: 4_000,
            bundle: 2,
            min_quantity: 1,
            max_quantity: 20,
            weight: 0,
        };
        assert_eq!(entry.max_purchase(0), 10);
        assert_eq!(entry.max_purchase(15), 2);
        assert_eq!(entry.max_purchase(25), 0);
        assert_eq!(Content::bundled().unwrap().default_name(40), "Traveler 41");
    }
}
