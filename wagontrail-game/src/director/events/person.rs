use rand::Rng;

use crate::director::{
    EventCategory, EventItem, EventTarget, ExecutionPolicy, RegisteredEvent, living_person_at,
    person_at, target_name,
};
use crate::error::GameError;
use crate::party::Ailment;
use crate::world::World;

fn pick(ailments: &[Ailment], world: &mut World) -> Ailment {
    ailments[world.rng.gen_range(0..ailments.len())]
}

fn afflict(
    name: &'static str,
    target: EventTarget,
    ailment: Ailment,
    world: &mut World,
) -> Result<(), GameError> {
    if living_person_at(name, target, world)?.afflict(ailment)
        && let EventTarget::Person(index) = target
    {
        world.record_death(index);
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct Illness {
    ailment: Option<Ailment>,
}

impl EventItem for Illness {
    fn execute(&mut self, target: EventTarget, world: &mut World) -> Result<(), GameError> {
        let ailment = pick(&Ailment::ILLNESSES, world);
        afflict(Self::NAME, target, ailment, world)?;
        self.ailment = Some(ailment);
        Ok(())
    }

    fn render(&self, target: EventTarget, world: &World) -> String {
        let name = target_name(target, world);
        self.ailment.map_or_else(
            || format!("{name} feels unwell."),
            |ailment| format!("{name} has {ailment}."),
        )
    }
}

impl RegisteredEvent for Illness {
    const NAME: &'static str = "Illness";
    const CATEGORY: EventCategory = EventCategory::Person;
    const ODDS: u32 = 4;
}

#[derive(Debug, Default)]
pub struct Injury {
    ailment: Option<Ailment>,
}

impl EventItem for Injury {
    fn execute(&mut self, target: EventTarget, world: &mut World) -> Result<(), GameError> {
        let ailment = pick(&Ailment::INJURIES, world);
        afflict(Self::NAME, target, ailment, world)?;
        self.ailment = Some(ailment);
        Ok(())
    }

    fn render(&self, target: EventTarget, world: &World) -> String {
        let name = target_name(target, world);
        self.ailment.map_or_else(
            || format!("{name} took a fall."),
            |ailment| format!("{name} has {ailment}."),
        )
    }
}

impl RegisteredEvent for Injury {
    const NAME: &'static str = "Injury";
    const CATEGORY: EventCategory = EventCategory::Person;
    const ODDS: u32 = 1;
}

/// Announces a death. Fired by the orchestrator when health reaches zero.
#[derive(Debug, Default)]
pub struct Death;

impl EventItem for Death {
    fn execute(&mut self, target: EventTarget, world: &mut World) -> Result<(), GameError> {
        person_at(Self::NAME, target, world)?.kill();
        Ok(())
    }

    fn render(&self, target: EventTarget, world: &World) -> String {
        format!("{} has died.", target_name(target, world))
    }
}

impl RegisteredEvent for Death {
    const NAME: &'static str = "Death";
    const CATEGORY: EventCategory = EventCategory::Person;
    const POLICY: ExecutionPolicy = ExecutionPolicy::ManualOnly;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::content::{ContentLoader, StaticContent};
    use crate::party::Profession;
    use crate::world::PartySetup;

    fn world() -> World {
        let content = StaticContent.load_content().unwrap();
        let mut world = World::new(&content, SimConfig::default(), 8).unwrap();
        world.outfit(&content, &PartySetup::new(Profession::Farmer, 4));
        world
    }

    #[test]
    fn illness_afflicts_the_target() {
        let mut world = world();
        let mut event = Illness::default();
        event.execute(EventTarget::Person(2), &mut world).unwrap();
        let person = world.vehicle.passenger(2).unwrap();
        assert!(person.ailment().is_some());
        assert!(event.render(EventTarget::Person(2), &world).starts_with("Jed has "));
    }

    #[test]
    fn injuries_skip_the_dead() {
        let mut world = world();
        world.vehicle.passenger_mut(1).unwrap().kill();
        let err = Injury::default()
            .execute(EventTarget::Person(1), &mut world)
            .unwrap_err();
        assert!(matches!(err, GameError::EventTarget { name: "Injury", .. }));
    }

    #[test]
    fn death_names_the_deceased() {
        let mut world = world();
        let mut event = Death;
        event.execute(EventTarget::Person(0), &mut world).unwrap();
        assert!(!world.vehicle.passenger(0).unwrap().is_alive());
        assert_eq!(event.render(EventTarget::Person(0), &world), "Ezra has died.");
        assert!(Death.execute(EventTarget::Person(9), &mut world).is_err());
    }

    #[test]
    fn fatal_illness_records_the_death() {
        let mut world = world();
        let person = world.vehicle.passenger_mut(0).unwrap();
        assert!(!person.afflict(Ailment::Measles));
        person.damage(person.health() - 1);

        Illness::default()
            .execute(EventTarget::Person(0), &mut world)
            .unwrap();
        assert!(!world.vehicle.passenger(0).unwrap().is_alive());
        assert_eq!(world.take_pending_deaths(), [0]);
    }
}
