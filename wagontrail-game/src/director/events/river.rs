//! Mishaps during a river crossing. Fired explicitly by the crossing form.
use rand::Rng;

use crate::director::{
    EventCategory, EventItem, EventTarget, ExecutionPolicy, RegisteredEvent, expect_vehicle,
};
use crate::error::GameError;
use crate::inventory::Entity;
use crate::world::World;

const SWEPT: [Entity; 3] = [Entity::Food, Entity::Clothes, Entity::Ammo];

fn describe(losses: &[(Entity, i32)]) -> String {
    losses
        .iter()
        .filter(|(_, amount)| *amount > 0)
        .map(|(entity, amount)| format!("{amount} {}", entity.label()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Default)]
pub struct SuppliesLost {
    losses: Vec<(Entity, i32)>,
}

impl EventItem for SuppliesLost {
    fn execute(&mut self, target: EventTarget, world: &mut World) -> Result<(), GameError> {
        expect_vehicle(Self::NAME, target)?;
        self.losses = SWEPT
            .iter()
            .map(|entity| {
                let fraction = world.rng.gen_range(0.05..0.2);
                (*entity, world.vehicle.inventory.remove_fraction(*entity, fraction))
            })
            .collect();
        Ok(())
    }

    fn render(&self, _target: EventTarget, _world: &World) -> String {
        let lost = describe(&self.losses);
        if lost.is_empty() {
            String::from("The wagon tipped, but nothing was lost.")
        } else {
            format!("The wagon tipped while crossing. You lost: {lost}.")
        }
    }
}

impl RegisteredEvent for SuppliesLost {
    const NAME: &'static str = "SuppliesLost";
    const CATEGORY: EventCategory = EventCategory::RiverCross;
    const POLICY: ExecutionPolicy = ExecutionPolicy::ManualOnly;
}

/// Water pours over the sideboards; heavy losses and a day spent drying out.
#[derive(Debug, Default)]
pub struct VehicleFloods {
    losses: Vec<(Entity, i32)>,
}

impl EventItem for VehicleFloods {
    fn execute(&mut self, target: EventTarget, world: &mut World) -> Result<(), GameError> {
        expect_vehicle(Self::NAME, target)?;
        self.losses = SWEPT
            .iter()
            .map(|entity| {
                let fraction = world.rng.gen_range(0.25..0.5);
                (*entity, world.vehicle.inventory.remove_fraction(*entity, fraction))
            })
            .collect();
        Ok(())
    }

    fn render(&self, _target: EventTarget, _world: &World) -> String {
        let lost = describe(&self.losses);
        if lost.is_empty() {
            String::from("The wagon was swamped. Lose 1 day drying out.")
        } else {
            format!("The wagon was swamped. You lost: {lost}. Lose 1 day drying out.")
        }
    }

    fn on_close(&mut self, world: &mut World) {
        world.schedule_skip(1);
    }
}

impl RegisteredEvent for VehicleFloods {
    const NAME: &'static str = "VehicleFloods";
    const CATEGORY: EventCategory = EventCategory::RiverCross;
    const POLICY: ExecutionPolicy = ExecutionPolicy::ManualOnly;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::content::{ContentLoader, StaticContent};

    #[test]
    fn flooding_loses_supplies_and_a_day() {
        let content = StaticContent.load_content().unwrap();
        let mut world = World::new(&content, SimConfig::default(), 6).unwrap();
        world.vehicle.inventory.add(Entity::Food, 400).unwrap();
        let mut event = VehicleFloods::default();
        event.execute(EventTarget::Vehicle, &mut world).unwrap();
        let food = world.vehicle.inventory.quantity(Entity::Food);
        assert!((200..=300).contains(&food), "food {food}");
        assert!(event.render(EventTarget::Vehicle, &world).contains("food"));
        event.on_close(&mut world);
        assert_eq!(world.pending_skip_days(), 1);
    }

    #[test]
    fn empty_wagon_loses_nothing() {
        let content = StaticContent.load_content().unwrap();
        let mut world = World::new(&content, SimConfig::default(), 6).unwrap();
        let mut event = SuppliesLost::default();
        event.execute(EventTarget::Vehicle, &mut world).unwrap();
        assert_eq!(
            event.render(EventTarget::Vehicle, &world),
            "The wagon tipped, but nothing was lost."
        );
    }
}
