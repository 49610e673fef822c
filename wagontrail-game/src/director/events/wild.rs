use rand::Rng;

use crate::director::{EventCategory, EventItem, EventTarget, RegisteredEvent, expect_vehicle};
use crate::error::GameError;
use crate::inventory::Entity;
use crate::party::Ailment;
use crate::world::World;

const THIEF_ARRIVES: &str = "A thief comes during the night";

#[derive(Debug, Default)]
pub struct Thief {
    food: i32,
    ammo: i32,
}

impl EventItem for Thief {
    fn execute(&mut self, target: EventTarget, world: &mut World) -> Result<(), GameError> {
        expect_vehicle(Self::NAME, target)?;
        let fraction = world.rng.gen_range(0.1..0.3);
        self.food = world.vehicle.inventory.remove_fraction(Entity::Food, fraction);
        if world.rng.gen_bool(0.5) {
            self.ammo = world.vehicle.inventory.remove_fraction(Entity::Ammo, fraction);
        }
        Ok(())
    }

    fn render(&self, _target: EventTarget, _world: &World) -> String {
        match (self.food, self.ammo) {
            (0, 0) => format!("{THIEF_ARRIVES} but finds nothing worth taking."),
            (food, 0) => format!("{THIEF_ARRIVES} and steals {food} pounds of food."),
            (0, ammo) => format!("{THIEF_ARRIVES} and steals {ammo} bullets."),
            (food, ammo) => {
                format!("{THIEF_ARRIVES} and steals {food} pounds of food and {ammo} bullets.")
            }
        }
    }
}

impl RegisteredEvent for Thief {
    const NAME: &'static str = "Thief";
    const CATEGORY: EventCategory = EventCategory::Wild;
    const ODDS: u32 = 2;
}

/// Bites whoever happens to be nearest; the target is always the wagon.
#[derive(Debug, Default)]
pub struct Snakebite {
    victim: Option<usize>,
}

impl EventItem for Snakebite {
    fn execute(&mut self, target: EventTarget, world: &mut World) -> Result<(), GameError> {
        expect_vehicle(Self::NAME, target)?;
        self.victim = world.vehicle.random_living(&mut world.rng);
        if let Some(index) = self.victim
            && let Some(person) = world.vehicle.passenger_mut(index)
            && person.afflict(Ailment::Snakebite)
        {
            world.record_death(index);
        }
        Ok(())
    }

    fn render(&self, _target: EventTarget, world: &World) -> String {
        self.victim
            .and_then(|idx| world.vehicle.passenger(idx))
            .map_or_else(
                || String::from("A rattlesnake slithers past the wagon."),
                |person| format!("{} was bitten by a snake.", person.name()),
            )
    }
}

impl RegisteredEvent for Snakebite {
    const NAME: &'static str = "Snakebite";
    const CATEGORY: EventCategory = EventCategory::Wild;
    const ODDS: u32 = 1;
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
        let mut world = World::new(&content, SimConfig::default(), 21).unwrap();
        world.outfit(&content, &PartySetup::new(Profession::Farmer, 3));
        world
    }

    #[test]
    fn thief_with_empty_wagon_takes_nothing() {
        let mut world = world();
        let mut event = Thief::default();
        event.execute(EventTarget::Vehicle, &mut world).unwrap();
        assert_eq!(
            event.render(EventTarget::Vehicle, &world),
            "A thief comes during the night but finds nothing worth taking."
        );
    }

    #[test]
    fn thief_never_empties_more_than_a_third() {
        let mut world = world();
        world.vehicle.inventory.add(Entity::Food, 1_000).unwrap();
        Thief::default()
            .execute(EventTarget::Vehicle, &mut world)
            .unwrap();
        let left = world.vehicle.inventory.quantity(Entity::Food);
        assert!((700..=900).contains(&left), "left {left}");
    }

    #[test]
    fn snakebite_hits_a_living_member() {
        let mut world = world();
        let mut event = Snakebite::default();
        event.execute(EventTarget::Vehicle, &mut world).unwrap();
        let bitten = world
            .vehicle
            .passengers()
            .iter()
            .filter(|p| p.ailment() == Some(Ailment::Snakebite))
            .count();
        assert_eq!(bitten, 1);
        assert!(event.render(EventTarget::Vehicle, &world).ends_with("bitten by a snake."));
    }
}
