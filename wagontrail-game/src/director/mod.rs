//! Random event catalog and trigger engine.
//!
//! The director owns every registered event type, rolls odds per category,
//! counts executions and keeps a diagnostic history. Fired events are queued
//! as [`EventNotice`]s; the window manager drains that queue within the same
//! pulse and hands each notice to the random event window.

pub mod catalog;
pub mod events;
mod item;

pub use item::{EventItem, RegisteredEvent};
pub(crate) use item::{expect_vehicle, living_person_at, person_at, target_name};

use chrono::NaiveDate;
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;

use crate::config::{ConfigError, SimConfig};
use crate::error::GameError;
use crate::world::World;
use events::person::Death;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Person,
    Vehicle,
    Weather,
    Wild,
    RiverCross,
}

impl EventCategory {
    pub const ALL: [Self; 5] = [
        Self::Person,
        Self::Vehicle,
        Self::Weather,
        Self::Wild,
        Self::RiverCross,
    ];
}

/// Whether the odds roll may pick an event or only explicit triggers can.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPolicy {
    Automatic,
    ManualOnly,
}

/// Entity an event acts upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTarget {
    Vehicle,
    /// Index into the wagon's passenger list.
    Person(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKey {
    pub category: EventCategory,
    pub name: &'static str,
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{}", self.category, self.name)
    }
}

/// One catalog entry: how to build an event and how often it may fire.
#[derive(Debug, Clone, Copy)]
pub struct EventRegistration {
    pub key: EventKey,
    pub policy: ExecutionPolicy,
    pub odds: u32,
    pub construct: fn() -> Box<dyn EventItem>,
}

impl EventRegistration {
    #[must_use]
    pub fn of<E: RegisteredEvent>() -> Self {
        Self {
            key: E::key(),
            policy: E::POLICY,
            odds: E::ODDS,
            construct: E::construct,
        }
    }
}

/// Diagnostic record of a fired event. Gameplay never reads this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub target: EventTarget,
    pub key: EventKey,
}

/// A fired event waiting to be shown to the player.
#[derive(Debug)]
pub struct EventNotice {
    pub key: EventKey,
    pub target: EventTarget,
    pub item: Box<dyn EventItem>,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct EventDirector {
    catalog: Vec<EventRegistration>,
    counters: HashMap<EventKey, u64>,
    history: Vec<HistoryEntry>,
    notices: VecDeque<EventNotice>,
}

impl EventDirector {
    /// An empty director; see [`catalog::standard`] for the shipped events.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a catalog entry and seed its counter at zero.
    ///
    /// # Errors
    ///
    /// Rejects a second registration under the same category and name, leaving
    /// the first entry and its counter untouched.
    pub fn register(&mut self, registration: EventRegistration) -> Result<(), GameError> {
        let key = registration.key;
        if self.counters.contains_key(&key) {
            return Err(GameError::DuplicateEvent {
                category: key.category,
                name: key.name,
            });
        }
        self.counters.insert(key, 0);
        self.catalog.push(registration);
        Ok(())
    }

    /// Register an event type by its compile-time identity.
    ///
    /// # Errors
    ///
    /// See [`EventDirector::register`].
    pub fn register_event<E: RegisteredEvent>(&mut self) -> Result<(), GameError> {
        self.register(EventRegistration::of::<E>())
    }

    /// Check that automatic odds fit inside each category's draw space.
    ///
    /// # Errors
    ///
    /// Returns the first category whose odds overflow its draw space.
    pub fn validate_odds(&self, cfg: &SimConfig) -> Result<(), ConfigError> {
        for category in EventCategory::ALL {
            let odds: u32 = self.automatic(category).map(|(_, reg)| reg.odds).sum();
            let space = cfg.draw_space(category);
            if odds > space {
                return Err(ConfigError::OddsExceedDrawSpace {
                    category,
                    odds,
                    space,
                });
            }
        }
        Ok(())
    }

    fn automatic(
        &self,
        category: EventCategory,
    ) -> impl Iterator<Item = (usize, &EventRegistration)> {
        self.catalog.iter().enumerate().filter(move |(_, reg)| {
            reg.key.category == category && reg.policy == ExecutionPolicy::Automatic
        })
    }

    /// Roll the category's odds and fire whatever the roll lands on.
    ///
    /// Most rolls land outside every entry and nothing happens.
    ///
    /// # Errors
    ///
    /// Propagates execution defects from the chosen event.
    pub fn trigger_by_category(
        &mut self,
        world: &mut World,
        target: EventTarget,
        category: EventCategory,
    ) -> Result<Option<EventKey>, GameError> {
        let space = world.config().draw_space(category);
        let roll = world.rng.gen_range(0..space);
        let mut cumulative = 0_u32;
        let mut chosen = None;
        for (index, reg) in self.automatic(category) {
            cumulative = cumulative.saturating_add(reg.odds);
            if roll < cumulative {
                chosen = Some(index);
                break;
            }
        }
        let Some(index) = chosen else {
            return Ok(None);
        };
        let key = self.catalog[index].key;
        self.execute(world, target, index)?;
        Ok(Some(key))
    }

    /// Fire a specific event type, bypassing the odds roll.
    ///
    /// Anyone the event kills gets a [`Death`] of their own, so a catalog
    /// holding harmful events must register `Death` as well.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEvent` if the type was never registered, or an execution defect.
    pub fn trigger_event<E: RegisteredEvent>(
        &mut self,
        world: &mut World,
        target: EventTarget,
    ) -> Result<(), GameError> {
        self.trigger_key(world, target, E::key())
    }

    /// Fire a catalog entry by key, bypassing the odds roll.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEvent` if no entry matches, or an execution defect.
    pub fn trigger_key(
        &mut self,
        world: &mut World,
        target: EventTarget,
        key: EventKey,
    ) -> Result<(), GameError> {
        let index = self
            .catalog
            .iter()
            .position(|reg| reg.key == key)
            .ok_or(GameError::UnknownEvent {
                category: key.category,
                name: key.name,
            })?;
        self.execute(world, target, index)
    }

    fn execute(
        &mut self,
        world: &mut World,
        target: EventTarget,
        index: usize,
    ) -> Result<(), GameError> {
        let registration = self.catalog[index];
        let key = registration.key;
        let mut item = (registration.construct)();
        *self.counters.entry(key).or_insert(0) += 1;

        item.execute(target, world)?;
        let text = item.render(target, world);
        if text.trim().is_empty() {
            return Err(GameError::EmptyEventRender { name: key.name });
        }

        self.history.push(HistoryEntry {
            date: world.calendar.date(),
            target,
            key,
        });
        info!("event {key} fired against {target:?}");
        debug!("event {key} rendered: {text}");
        self.notices.push_back(EventNotice {
            key,
            target,
            item,
            text,
        });

        // Passengers this event killed are announced right after it.
        for index in world.take_pending_deaths() {
            self.trigger_event::<Death>(world, EventTarget::Person(index))?;
        }
        Ok(())
    }

    #[must_use]
    pub fn execution_count(&self, key: EventKey) -> u64 {
        self.counters.get(&key).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn registrations(&self) -> impl Iterator<Item = &EventRegistration> {
        self.catalog.iter()
    }

    #[must_use]
    pub fn has_pending_notices(&self) -> bool {
        !self.notices.is_empty()
    }

    /// Pop the oldest fired event that has not been shown yet.
    pub fn take_notice(&mut self) -> Option<EventNotice> {
        self.notices.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentLoader, StaticContent};
    use crate::director::events::vehicle::OxenDied;
    use crate::inventory::Entity;

    #[derive(Debug, Default)]
    struct Silent;

    impl EventItem for Silent {
        fn execute(&mut self, _target: EventTarget, _world: &mut World) -> Result<(), GameError> {
            Ok(())
        }

        fn render(&self, _target: EventTarget, _world: &World) -> String {
            String::from("   ")
        }
    }

    impl RegisteredEvent for Silent {
        const NAME: &'static str = "Silent";
        const CATEGORY: EventCategory = EventCategory::Wild;
        const ODDS: u32 = 100;
    }

    fn world() -> World {
        let content = StaticContent.load_content().unwrap();
        let mut world = World::new(&content, SimConfig::default(), 11).unwrap();
        world.vehicle.inventory.add(Entity::Animal, 4).unwrap();
        world
    }

    #[test]
    fn duplicate_registration_is_rejected_and_keeps_counter() {
        let mut director = EventDirector::new();
        director.register_event::<OxenDied>().unwrap();
        let mut world = world();
        director
            .trigger_event::<OxenDied>(&mut world, EventTarget::Vehicle)
            .unwrap();

        let err = director.register_event::<OxenDied>().unwrap_err();
        assert!(matches!(err, GameError::DuplicateEvent { name: "OxenDied", .. }));
        assert_eq!(director.registrations().count(), 1);
        assert_eq!(director.execution_count(OxenDied::key()), 1);
    }

    #[test]
    fn unknown_explicit_trigger_is_a_defect() {
        let mut director = EventDirector::new();
        let mut world = world();
        let err = director
            .trigger_event::<OxenDied>(&mut world, EventTarget::Vehicle)
            .unwrap_err();
        assert!(matches!(err, GameError::UnknownEvent { .. }));
        assert!(director.history().is_empty());
    }

    #[test]
    fn empty_render_is_fatal() {
        let mut director = EventDirector::new();
        director.register_event::<Silent>().unwrap();
        let mut world = world();
        let err = director
            .trigger_by_category(&mut world, EventTarget::Vehicle, EventCategory::Wild)
            .unwrap_err();
        assert!(matches!(err, GameError::EmptyEventRender { name: "Silent" }));
        assert!(!director.has_pending_notices());
    }

    #[test]
    fn odds_filling_the_draw_space_always_fire() {
        let mut director = EventDirector::new();
        director.register_event::<OxenDied>().unwrap();
        let mut cfg = SimConfig::default();
        cfg.draw_space.insert(EventCategory::Vehicle, OxenDied::ODDS);
        let content = StaticContent.load_content().unwrap();
        let mut world = World::new(&content, cfg, 11).unwrap();
        world.vehicle.inventory.add(Entity::Animal, 4).unwrap();
        for _ in 0..3 {
            let fired = director
                .trigger_by_category(&mut world, EventTarget::Vehicle, EventCategory::Vehicle)
                .unwrap();
            assert_eq!(fired, Some(OxenDied::key()));
        }
        assert_eq!(director.history().len(), 3);
        assert_eq!(world.vehicle.inventory.quantity(Entity::Animal), 1);
        let notice = director.take_notice().unwrap();
        assert_eq!(notice.key, OxenDied::key());
        assert!(!notice.text.is_empty());
    }

    #[test]
    fn other_categories_never_fire() {
        let mut director = EventDirector::new();
        director.register_event::<OxenDied>().unwrap();
        let mut world = world();
        for _ in 0..50 {
            let fired = director
                .trigger_by_category(&mut world, EventTarget::Vehicle, EventCategory::Weather)
                .unwrap();
            assert_eq!(fired, None);
        }
        assert_eq!(director.execution_count(OxenDied::key()), 0);
    }

    #[test]
    fn fatal_affliction_fires_a_death() {
        use crate::director::events::person::Illness;
        use crate::party::{Ailment, Profession};
        use crate::world::PartySetup;

        let content = StaticContent.load_content().unwrap();
        let mut world = World::new(&content, SimConfig::default(), 11).unwrap();
        world.outfit(&content, &PartySetup::new(Profession::Banker, 3));
        let person = world.vehicle.passenger_mut(0).unwrap();
        assert!(!person.afflict(Ailment::Typhoid));
        person.damage(person.health() - 5);

        let mut director = catalog::standard().unwrap();
        director
            .trigger_key(&mut world, EventTarget::Person(0), Illness::key())
            .unwrap();

        assert!(!world.vehicle.passenger(0).unwrap().is_alive());
        assert_eq!(director.execution_count(Death::key()), 1);
        let keys: Vec<EventKey> = std::iter::from_fn(|| director.take_notice())
            .map(|notice| notice.key)
            .collect();
        assert_eq!(keys, [Illness::key(), Death::key()]);
        assert!(world.take_pending_deaths().is_empty());
    }

    #[test]
    fn odds_must_fit_draw_space() {
        let mut director = EventDirector::new();
        director.register_event::<Silent>().unwrap();
        let mut cfg = SimConfig::default();
        assert_eq!(director.validate_odds(&cfg), Ok(()));
        cfg.draw_space.insert(EventCategory::Wild, 50);
        assert_eq!(
            director.validate_odds(&cfg),
            Err(ConfigError::OddsExceedDrawSpace {
                category: EventCategory::Wild,
                odds: 100,
                space: 50
            })
        );
    }
}
