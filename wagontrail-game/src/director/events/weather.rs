use rand::Rng;

use crate::director::{EventCategory, EventItem, EventTarget, RegisteredEvent, expect_vehicle};
use crate::error::GameError;
use crate::inventory::Entity;
use crate::world::World;

fn lose_days(days: u32) -> String {
    if days == 1 {
        String::from("Lose 1 day.")
    } else {
        format!("Lose {days} days.")
    }
}

#[derive(Debug, Default)]
pub struct HeavyFog {
    days: u32,
}

impl EventItem for HeavyFog {
    fn execute(&mut self, target: EventTarget, _world: &mut World) -> Result<(), GameError> {
        expect_vehicle(Self::NAME, target)?;
        self.days = 1;
        Ok(())
    }

    fn render(&self, _target: EventTarget, _world: &World) -> String {
        format!("Heavy fog. {}", lose_days(self.days))
    }

    fn on_close(&mut self, world: &mut World) {
        world.schedule_skip(self.days);
    }
}

impl RegisteredEvent for HeavyFog {
    const NAME: &'static str = "HeavyFog";
    const CATEGORY: EventCategory = EventCategory::Weather;
    const ODDS: u32 = 2;
}

#[derive(Debug, Default)]
pub struct SevereStorm {
    days: u32,
    food_lost: i32,
}

impl EventItem for SevereStorm {
    fn execute(&mut self, target: EventTarget, world: &mut World) -> Result<(), GameError> {
        expect_vehicle(Self::NAME, target)?;
        self.days = world.rng.gen_range(1..=2);
        let fraction = world.rng.gen_range(0.0..0.1);
        self.food_lost = world.vehicle.inventory.remove_fraction(Entity::Food, fraction);
        Ok(())
    }

    fn render(&self, _target: EventTarget, _world: &World) -> String {
        if self.food_lost > 0 {
            format!(
                "Severe thunderstorm. {} pounds of food spoiled. {}",
                self.food_lost,
                lose_days(self.days)
            )
        } else {
            format!("Severe thunderstorm. {}", lose_days(self.days))
        }
    }

    fn on_close(&mut self, world: &mut World) {
        world.schedule_skip(self.days);
    }
}

impl RegisteredEvent for SevereStorm {
    const NAME: &'static str = "SevereStorm";
    const CATEGORY: EventCategory = EventCategory::Weather;
    const ODDS: u32 = 2;
}

/// Deep snow; worse for a party short on clothing.
#[derive(Debug, Default)]
pub struct Blizzard {
    days: u32,
    underdressed: bool,
}

impl EventItem for Blizzard {
    fn execute(&mut self, target: EventTarget, world: &mut World) -> Result<(), GameError> {
        expect_vehicle(Self::NAME, target)?;
        let living = i32::try_from(world.vehicle.living_passengers()).unwrap_or(i32::MAX);
        self.underdressed = world.vehicle.inventory.quantity(Entity::Clothes) < living * 2;
        self.days = world.rng.gen_range(2..=4);
        if self.underdressed {
            for index in world.vehicle.living_indices() {
                if let Some(person) = world.vehicle.passenger_mut(index)
                    && person.damage(5)
                {
                    world.record_death(index);
                }
            }
        }
        Ok(())
    }

    fn render(&self, _target: EventTarget, _world: &World) -> String {
        let mut text = format!("Blizzard. {}", lose_days(self.days));
        if self.underdressed {
            text.push_str(" The party suffers from the cold.");
        }
        text
    }

    fn on_close(&mut self, world: &mut World) {
        world.schedule_skip(self.days);
    }
}

impl RegisteredEvent for Blizzard {
    const NAME: &'static str = "Blizzard";
    const CATEGORY: EventCategory = EventCategory::Weather;
    const ODDS: u32 = 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::content::{ContentLoader, StaticContent};
    use crate::party::Profession;
    use crate::world::PartySetup;

    #[test]
    fn blizzard_hurts_an_underdressed_party() {
        let content = StaticContent.load_content().unwrap();
        let mut world = World::new(&content, SimConfig::default(), 2).unwrap();
        world.outfit(&content, &PartySetup::new(Profession::Banker, 3));
        let mut event = Blizzard::default();
        event.execute(EventTarget::Vehicle, &mut world).unwrap();
        assert!(world.vehicle.passengers().iter().all(|p| p.health() == 95));
        assert!(event.render(EventTarget::Vehicle, &world).contains("cold"));

        event.on_close(&mut world);
        assert!((2..=4).contains(&world.pending_skip_days()));
    }

    #[test]
    fn fog_costs_one_day() {
        let content = StaticContent.load_content().unwrap();
        let mut world = World::new(&content, SimConfig::default(), 2).unwrap();
        let mut event = HeavyFog::default();
        event.execute(EventTarget::Vehicle, &mut world).unwrap();
        assert_eq!(event.render(EventTarget::Vehicle, &world), "Heavy fog. Lose 1 day.");
        event.on_close(&mut world);
        assert_eq!(world.pending_skip_days(), 1);
    }
}
