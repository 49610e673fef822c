//! End of the journey, win or lose.
use std::fmt::Write as _;

use crate::constants::ENTER_PROMPT;
use crate::error::GameError;
use crate::party::Profession;
use crate::simulation::{GameStatus, Simulation};
use crate::window::{
    Form, FormKind, FormRegistry, FormView, WindowContext, WindowKind, WindowState, default_form,
};

/// Snapshot of the journey taken when the window opens; the world is rebuilt
/// underneath it on restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOver {
    pub status: GameStatus,
    pub days: u32,
    pub miles: u32,
    pub survivors: Vec<String>,
    pub location: String,
    pub profession: Option<Profession>,
}

impl WindowState for GameOver {
    const KIND: WindowKind = WindowKind::GameOver;

    fn create(sim: &Simulation) -> Self {
        let world = &sim.world;
        Self {
            status: sim.status(),
            days: world.calendar.days_elapsed(),
            miles: world.trail.total_miles(),
            survivors: world
                .vehicle
                .passengers()
                .iter()
                .filter(|person| person.is_alive())
                .map(|person| person.name().to_string())
                .collect(),
            location: world.trail.current().name.clone(),
            profession: world.profession(),
        }
    }

    fn forms() -> FormRegistry<Self> {
        FormRegistry::new().with(FormKind::Outcome, default_form::<Outcome, Self>)
    }

    fn on_post_create(ctx: &mut WindowContext<'_, Self>) -> Result<(), GameError> {
        ctx.set_form(FormKind::Outcome);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Outcome;

impl Form<GameOver> for Outcome {
    fn kind(&self) -> FormKind {
        FormKind::Outcome
    }

    fn render(&self, view: FormView<'_, GameOver>) -> String {
        let data = view.data;
        let mut out = match data.status {
            GameStatus::Win => format!(
                "Congratulations! You have made it to {} after {} days on the trail.\n",
                data.location, data.days
            ),
            GameStatus::Fail | GameStatus::Running => format!(
                "Your journey has ended near {} after {} days and {} miles.\n",
                data.location, data.days, data.miles
            ),
        };
        if data.survivors.is_empty() {
            out.push_str("Nobody in your party survived.\n");
        } else {
            let _ = writeln!(out, "Survivors: {}", data.survivors.join(", "));
        }
        if data.status == GameStatus::Win
            && let Some(profession) = data.profession
        {
            let _ = writeln!(
                out,
                "As a {profession:?} your points are multiplied by {}.",
                profession.score_multiplier()
            );
        }
        out.push('\n');
        out.push_str(ENTER_PROMPT);
        out
    }

    fn on_input(
        &mut self,
        ctx: &mut WindowContext<'_, GameOver>,
        _input: &str,
    ) -> Result<(), GameError> {
        ctx.sim.restart()?;
        ctx.sim.request_window(WindowKind::MainMenu);
        ctx.remove_window();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::Entity;
    use crate::tick::Pulse;
    use crate::window::WindowManager;
    use crate::world::PartySetup;

    #[test]
    fn stranded_party_gets_the_fail_screen_and_restarts() {
        let mut sim = Simulation::for_tests();
        sim.start_game(&PartySetup::new(Profession::Farmer, 4));
        sim.world.vehicle.inventory.add(Entity::Animal, 2).unwrap();
        let mut manager = WindowManager::default();
        manager.add(WindowKind::Travel, &mut sim).unwrap();

        sim.world.end_game();
        assert_eq!(sim.take_turn(false).unwrap(), GameStatus::Fail);
        manager.tick(&mut sim, Pulse::SYSTEM).unwrap();
        assert!(manager.is_pending_removal(WindowKind::Travel));
        manager.tick(&mut sim, Pulse::SYSTEM).unwrap();

        assert_eq!(sim.status(), GameStatus::Fail);
        assert_eq!(manager.kinds(), vec![WindowKind::GameOver]);
        let text = manager.active_window_text(&sim);
        assert!(text.contains("journey has ended near Independence"));
        assert!(text.contains("Survivors: "));

        manager.send_input(&mut sim, "").unwrap();
        assert_eq!(sim.status(), GameStatus::Running);
        assert_eq!(sim.total_turns(), 0);
        manager.tick(&mut sim, Pulse::SYSTEM).unwrap();
        assert_eq!(manager.kinds(), vec![WindowKind::MainMenu]);
    }
}
