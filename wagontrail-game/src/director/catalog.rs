//! Explicit registration table for the shipped events.
use crate::director::EventDirector;
use crate::director::events::person::{Death, Illness, Injury};
use crate::director::events::river::{SuppliesLost, VehicleFloods};
use crate::director::events::vehicle::{BrokenPart, LostTrail, NoRepair, OxenDied, PartRepaired};
use crate::director::events::weather::{Blizzard, HeavyFog, SevereStorm};
use crate::director::events::wild::{Snakebite, Thief};
use crate::error::GameError;

/// Populate `director` with every event the core ships.
///
/// # Errors
///
/// Fails if any event was already registered.
pub fn register_all(director: &mut EventDirector) -> Result<(), GameError> {
    director.register_event::<Illness>()?;
    director.register_event::<Injury>()?;
    director.register_event::<Death>()?;

    director.register_event::<OxenDied>()?;
    director.register_event::<BrokenPart>()?;
    director.register_event::<PartRepaired>()?;
    director.register_event::<NoRepair>()?;
    director.register_event::<LostTrail>()?;

    director.register_event::<HeavyFog>()?;
    director.register_event::<SevereStorm>()?;
    director.register_event::<Blizzard>()?;

    director.register_event::<Thief>()?;
    director.register_event::<Snakebite>()?;

    director.register_event::<SuppliesLost>()?;
    director.register_event::<VehicleFloods>()?;
    Ok(())
}

/// A director holding the shipped catalog.
///
/// # Errors
///
/// Fails only if the table above registers an event twice.
pub fn standard() -> Result<EventDirector, GameError> {
    let mut director = EventDirector::new();
    register_all(&mut director)?;
    Ok(director)
}
