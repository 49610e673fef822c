use std::fmt;

use crate::director::{EventCategory, EventKey, EventTarget, ExecutionPolicy};
use crate::error::GameError;
use crate::party::Person;
use crate::screens::RandomEventInfo;
use crate::window::WindowContext;
use crate::world::World;

/// A single executable event.
///
/// Items are constructed fresh for every trigger and dropped once the player
/// has acknowledged the outcome; none of the hooks are ever retried.
pub trait EventItem: fmt::Debug {
    /// Apply the event to the world.
    ///
    /// # Errors
    ///
    /// Returns an error when the target does not fit the event; this is a
    /// catalog defect, never a player mistake.
    fn execute(&mut self, target: EventTarget, world: &mut World) -> Result<(), GameError>;

    /// Text shown to the player after execution. Must not mutate anything.
    fn render(&self, target: EventTarget, world: &World) -> String;

    /// Called when the player acknowledges the outcome. Returning true means
    /// the item already chose the next form for the random event window.
    ///
    /// # Errors
    ///
    /// Propagates form construction defects.
    fn on_post_execute(
        &mut self,
        _window: &mut WindowContext<'_, RandomEventInfo>,
    ) -> Result<bool, GameError> {
        Ok(false)
    }

    /// Side effects that must wait until the player has read the outcome.
    fn on_close(&mut self, _world: &mut World) {}
}

/// Compile-time identity of an event type, used for registration and for
/// explicit triggers that bypass the odds roll.
pub trait RegisteredEvent: EventItem + Default + 'static {
    const NAME: &'static str;
    const CATEGORY: EventCategory;
    const POLICY: ExecutionPolicy = ExecutionPolicy::Automatic;
    /// Chances out of the category's draw space.
    const ODDS: u32 = 1;

    #[must_use]
    fn key() -> EventKey {
        EventKey {
            category: Self::CATEGORY,
            name: Self::NAME,
        }
    }

    #[must_use]
    fn construct() -> Box<dyn EventItem> {
        Box::<Self>::default()
    }
}

/// Resolve a person target, dead or alive.
pub(crate) fn person_at<'w>(
    name: &'static str,
    target: EventTarget,
    world: &'w mut World,
) -> Result<&'w mut Person, GameError> {
    let EventTarget::Person(index) = target else {
        return Err(GameError::EventTarget { name, target });
    };
    world
        .vehicle
        .passenger_mut(index)
        .ok_or(GameError::EventTarget { name, target })
}

/// Resolve a person target that must still be alive.
pub(crate) fn living_person_at<'w>(
    name: &'static str,
    target: EventTarget,
    world: &'w mut World,
) -> Result<&'w mut Person, GameError> {
    let person = person_at(name, target, world)?;
    if person.is_alive() {
        Ok(person)
    } else {
        Err(GameError::EventTarget { name, target })
    }
}

/// Reject anything but the wagon as a target.
pub(crate) fn expect_vehicle(name: &'static str, target: EventTarget) -> Result<(), GameError> {
    match target {
        EventTarget::Vehicle => Ok(()),
        EventTarget::Person(_) => Err(GameError::EventTarget { name, target }),
    }
}

/// Name of the targeted passenger, for rendering.
pub(crate) fn target_name(target: EventTarget, world: &World) -> &str {
    match target {
        EventTarget::Person(index) => world.vehicle.passenger(index).map_or("", Person::name),
        EventTarget::Vehicle => "",
    }
}
