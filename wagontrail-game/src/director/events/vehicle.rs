use rand::Rng;

use crate::director::{
    EventCategory, EventItem, EventTarget, ExecutionPolicy, RegisteredEvent, expect_vehicle,
};
use crate::error::GameError;
use crate::inventory::Entity;
use crate::screens::RandomEventInfo;
use crate::vehicle::{PartWeights, weighted_pick};
use crate::window::{FormKind, WindowContext};
use crate::world::World;

/// One of the oxen collapses in its traces.
#[derive(Debug, Default)]
pub struct OxenDied {
    lost: i32,
}

impl EventItem for OxenDied {
    fn execute(&mut self, target: EventTarget, world: &mut World) -> Result<(), GameError> {
        expect_vehicle(Self::NAME, target)?;
        self.lost = world.vehicle.inventory.remove(Entity::Animal, 1);
        Ok(())
    }

    fn render(&self, _target: EventTarget, world: &World) -> String {
        if self.lost == 0 {
            return String::from("The wagon creaks along without a team.");
        }
        match world.vehicle.inventory.quantity(Entity::Animal) {
            0 => String::from("Your last ox has died."),
            left => format!("One of your oxen has died. {left} remain."),
        }
    }
}

impl RegisteredEvent for OxenDied {
    const NAME: &'static str = "OxenDied";
    const CATEGORY: EventCategory = EventCategory::Vehicle;
    const ODDS: u32 = 2;
}

/// A wheel, axle or tongue snaps; the player decides whether to repair it.
#[derive(Debug, Default)]
pub struct BrokenPart {
    part: Option<Entity>,
}

impl EventItem for BrokenPart {
    fn execute(&mut self, target: EventTarget, world: &mut World) -> Result<(), GameError> {
        expect_vehicle(Self::NAME, target)?;
        let part = weighted_pick(&PartWeights::default().options(), &mut world.rng)
            .unwrap_or(Entity::Wheel);
        world.vehicle.break_part(part);
        world.vehicle.stop();
        self.part = Some(part);
        Ok(())
    }

    fn render(&self, _target: EventTarget, _world: &World) -> String {
        self.part.map_or_else(
            || String::from("The wagon lurches but holds together."),
            |part| format!("Broken {}.", part.label()),
        )
    }

    fn on_post_execute(
        &mut self,
        window: &mut WindowContext<'_, RandomEventInfo>,
    ) -> Result<bool, GameError> {
        if self.part.is_none() {
            return Ok(false);
        }
        window.set_form(FormKind::RepairPrompt);
        Ok(true)
    }
}

impl RegisteredEvent for BrokenPart {
    const NAME: &'static str = "BrokenPart";
    const CATEGORY: EventCategory = EventCategory::Vehicle;
    const ODDS: u32 = 3;
}

/// The player managed to mend the broken part in place.
#[derive(Debug, Default)]
pub struct PartRepaired {
    part: Option<Entity>,
}

impl EventItem for PartRepaired {
    fn execute(&mut self, target: EventTarget, world: &mut World) -> Result<(), GameError> {
        expect_vehicle(Self::NAME, target)?;
        self.part = world.vehicle.broken_part();
        world.vehicle.repair();
        Ok(())
    }

    fn render(&self, _target: EventTarget, _world: &World) -> String {
        self.part.map_or_else(
            || String::from("The wagon is in good shape."),
            |part| format!("You were able to repair the {}.", part.label()),
        )
    }
}

impl RegisteredEvent for PartRepaired {
    const NAME: &'static str = "PartRepaired";
    const CATEGORY: EventCategory = EventCategory::Vehicle;
    const POLICY: ExecutionPolicy = ExecutionPolicy::ManualOnly;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RepairOutcome {
    Nothing,
    Spare(Entity),
    Stranded(Entity),
}

/// Fired when the player declines or fails a repair. A spare part is used if
/// one is carried; otherwise the wagon is finished and so is the journey.
#[derive(Debug)]
pub struct NoRepair {
    outcome: RepairOutcome,
}

impl Default for NoRepair {
    fn default() -> Self {
        Self {
            outcome: RepairOutcome::Nothing,
        }
    }
}

impl EventItem for NoRepair {
    fn execute(&mut self, target: EventTarget, world: &mut World) -> Result<(), GameError> {
        expect_vehicle(Self::NAME, target)?;
        let Some(part) = world.vehicle.broken_part() else {
            self.outcome = RepairOutcome::Nothing;
            return Ok(());
        };
        if world.vehicle.replace_with_spare() {
            self.outcome = RepairOutcome::Spare(part);
        } else {
            world.vehicle.disable();
            world.end_game();
            self.outcome = RepairOutcome::Stranded(part);
        }
        Ok(())
    }

    fn render(&self, _target: EventTarget, _world: &World) -> String {
        match self.outcome {
            RepairOutcome::Nothing => String::from("Nothing needed replacing."),
            RepairOutcome::Spare(part) => {
                format!("You replaced the broken {} with a spare.", part.label())
            }
            RepairOutcome::Stranded(part) => format!(
                "You have no spare {}. Your wagon cannot go on.",
                part.label()
            ),
        }
    }
}

impl RegisteredEvent for NoRepair {
    const NAME: &'static str = "NoRepair";
    const CATEGORY: EventCategory = EventCategory::Vehicle;
    const POLICY: ExecutionPolicy = ExecutionPolicy::ManualOnly;
}

/// The party wanders off the ruts and loses a few days finding them again.
#[derive(Debug, Default)]
pub struct LostTrail {
    days: u32,
}

impl EventItem for LostTrail {
    fn execute(&mut self, target: EventTarget, world: &mut World) -> Result<(), GameError> {
        expect_vehicle(Self::NAME, target)?;
        self.days = world.rng.gen_range(1..=4);
        Ok(())
    }

    fn render(&self, _target: EventTarget, _world: &World) -> String {
        if self.days == 1 {
            String::from("Lost trail. Lose 1 day.")
        } else {
            format!("Lost trail. Lose {} days.", self.days)
        }
    }

    fn on_close(&mut self, world: &mut World) {
        world.schedule_skip(self.days);
    }
}

impl RegisteredEvent for LostTrail {
    const NAME: &'static str = "LostTrail";
    const CATEGORY: EventCategory = EventCategory::Vehicle;
}
