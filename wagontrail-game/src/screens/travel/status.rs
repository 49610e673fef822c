//! Read-mostly travel forms and the status block shown above them.
use std::fmt::Write as _;

use crate::constants::{ENTER_PROMPT, MENU_PROMPT};
use crate::error::GameError;
use crate::inventory::{Entity, format_cents};
use crate::party::HealthLevel;
use crate::screens::{Travel, parse_choice};
use crate::simulation::Simulation;
use crate::trail::LocationStatus;
use crate::vehicle::{RationLevel, TravelPace};
use crate::window::{Form, FormKind, FormView, WindowContext};

/// Overall party health as the band of the average living member.
fn party_health(sim: &Simulation) -> HealthLevel {
    let living: Vec<i32> = sim
        .world
        .vehicle
        .passengers()
        .iter()
        .filter(|p| p.is_alive())
        .map(|p| p.health())
        .collect();
    if living.is_empty() {
        return HealthLevel::Dead;
    }
    let count = i32::try_from(living.len()).unwrap_or(i32::MAX);
    HealthLevel::from_health(living.iter().sum::<i32>() / count)
}

/// Date, conditions and progress, shown above every travel form.
#[must_use]
pub fn status_block(sim: &Simulation) -> String {
    let world = &sim.world;
    let trail = &world.trail;
    let mut out = String::from("--------------------------------\n");
    let _ = writeln!(out, "{}", world.calendar);
    let _ = writeln!(out, "Season: {:?}", world.calendar.season());
    let _ = writeln!(out, "Health: {}", party_health(sim));
    let _ = writeln!(out, "Pace: {}", world.vehicle.pace());
    let _ = writeln!(out, "Rations: {}", world.vehicle.ration());
    match trail.status() {
        LocationStatus::Departed => {
            let next = trail.next().map_or("", |l| l.name.as_str());
            let _ = writeln!(out, "Next landmark: {next} ({} miles)", trail.distance_to_next());
        }
        LocationStatus::Unreached | LocationStatus::Reached => {
            let _ = writeln!(out, "Location: {}", trail.current().name);
        }
    }
    let _ = writeln!(out, "Miles traveled: {}", trail.total_miles());
    let _ = writeln!(
        out,
        "Food: {} pounds",
        world.vehicle.inventory.quantity(Entity::Food)
    );
    out.push_str("--------------------------------\n");
    out
}

#[derive(Debug, Default)]
pub(super) struct CheckSupplies;

impl Form<Travel> for CheckSupplies {
    fn kind(&self) -> FormKind {
        FormKind::CheckSupplies
    }

    fn render(&self, view: FormView<'_, Travel>) -> String {
        let vehicle = &view.sim.world.vehicle;
        let mut out = String::from("Your supplies\n\n");
        for item in vehicle.inventory.items() {
            let _ = writeln!(out, "  {:<14}{:>6}", item.name(), item.quantity());
        }
        let cash = format_cents(vehicle.inventory.cash_cents());
        let _ = writeln!(out, "  {:<14}{:>6}", "Money", cash);
        out.push_str("\nYour party\n\n");
        for person in vehicle.passengers() {
            let ailment = person
                .ailment()
                .map(|a| format!(" ({a})"))
                .unwrap_or_default();
            let _ = writeln!(out, "  {:<14}{}{ailment}", person.name(), person.health_level());
        }
        out.push('\n');
        out.push_str(ENTER_PROMPT);
        out
    }

    fn on_input(
        &mut self,
        ctx: &mut WindowContext<'_, Travel>,
        _input: &str,
    ) -> Result<(), GameError> {
        ctx.clear_form();
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(super) struct LookAtMap;

impl Form<Travel> for LookAtMap {
    fn kind(&self) -> FormKind {
        FormKind::LookAtMap
    }

    fn render(&self, view: FormView<'_, Travel>) -> String {
        let trail = &view.sim.world.trail;
        let mut out = String::from("Trail map\n\n");
        for (idx, location) in trail.locations().iter().enumerate() {
            let marker = if idx == trail.index() { '>' } else { ' ' };
            let visited = if idx < trail.index() { "*" } else { " " };
            let _ = writeln!(out, " {marker}{visited} {}", location.name);
        }
        let _ = write!(out, "\n{} miles traveled.\n\n{ENTER_PROMPT}", trail.total_miles());
        out
    }

    fn on_input(
        &mut self,
        ctx: &mut WindowContext<'_, Travel>,
        _input: &str,
    ) -> Result<(), GameError> {
        ctx.clear_form();
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(super) struct ChangePace;

impl Form<Travel> for ChangePace {
    fn kind(&self) -> FormKind {
        FormKind::ChangePace
    }

    fn render(&self, view: FormView<'_, Travel>) -> String {
        let current = view.sim.world.vehicle.pace();
        let mut out = format!("The current pace is {current}.\n\nYou may change your pace to:\n\n");
        for (idx, pace) in TravelPace::ALL.iter().enumerate() {
            let _ = writeln!(out, "  {}. a {pace} pace", idx + 1);
        }
        out.push('\n');
        out.push_str(MENU_PROMPT);
        out
    }

    fn on_input(
        &mut self,
        ctx: &mut WindowContext<'_, Travel>,
        input: &str,
    ) -> Result<(), GameError> {
        if let Some(idx) = parse_choice(input, TravelPace::ALL.len()) {
            ctx.sim.world.vehicle.set_pace(TravelPace::ALL[idx]);
            ctx.clear_form();
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(super) struct ChangeRations;

impl Form<Travel> for ChangeRations {
    fn kind(&self) -> FormKind {
        FormKind::ChangeRations
    }

    fn render(&self, view: FormView<'_, Travel>) -> String {
        let current = view.sim.world.vehicle.ration();
        let mut out = format!(
            "The current rations are {current}.\n\nYou may change your food rations to:\n\n"
        );
        for (idx, ration) in RationLevel::ALL.iter().enumerate() {
            let per_person = view.sim.world.config().food_per_person(*ration);
            let _ = writeln!(out, "  {}. {ration} ({per_person} lb per person a day)", idx + 1);
        }
        out.push('\n');
        out.push_str(MENU_PROMPT);
        out
    }

    fn on_input(
        &mut self,
        ctx: &mut WindowContext<'_, Travel>,
        input: &str,
    ) -> Result<(), GameError> {
        if let Some(idx) = parse_choice(input, RationLevel::ALL.len()) {
            ctx.sim.world.vehicle.set_ration(RationLevel::ALL[idx]);
            ctx.clear_form();
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(super) struct TalkToPeople;

impl Form<Travel> for TalkToPeople {
    fn kind(&self) -> FormKind {
        FormKind::TalkToPeople
    }

    fn render(&self, view: FormView<'_, Travel>) -> String {
        format!("{}\n\n{ENTER_PROMPT}", view.data.advice)
    }

    fn on_input(
        &mut self,
        ctx: &mut WindowContext<'_, Travel>,
        _input: &str,
    ) -> Result<(), GameError> {
        ctx.clear_form();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::party::Profession;
    use crate::world::PartySetup;

    #[test]
    fn status_block_reports_location_and_food() {
        let mut sim = Simulation::for_tests();
        sim.start_game(&PartySetup::new(Profession::Banker, 3));
        sim.world.vehicle.inventory.add(Entity::Food, 120).unwrap();
        let text = status_block(&sim);
        assert!(text.contains("March 1, 1848"));
        assert!(text.contains("Location: Independence"));
        assert!(text.contains("Food: 120 pounds"));
        assert!(text.contains("Health: good"));
    }

    #[test]
    fn dead_party_reports_dead_health() {
        let mut sim = Simulation::for_tests();
        sim.start_game(&PartySetup::new(Profession::Banker, 3));
        for idx in 0..4 {
            sim.world.vehicle.passenger_mut(idx).unwrap().kill();
        }
        assert_eq!(party_health(&sim), HealthLevel::Dead);
    }
}
