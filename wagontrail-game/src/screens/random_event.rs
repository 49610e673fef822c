//! The window that presents fired events to the player one at a time.
use log::debug;
use rand::Rng;
use std::collections::VecDeque;

use crate::constants::ENTER_PROMPT;
use crate::director::{EventNotice, EventTarget};
use crate::director::events::vehicle::{NoRepair, PartRepaired};
use crate::error::GameError;
use crate::screens::yes_no;
use crate::simulation::Simulation;
use crate::window::{
    Form, FormKind, FormRegistry, FormView, WindowContext, WindowKind, WindowState, default_form,
};

#[derive(Debug, Default)]
pub struct RandomEventInfo {
    /// Notice the executor form is showing.
    current: Option<EventNotice>,
    /// Notices delivered while another one was on screen.
    queue: VecDeque<EventNotice>,
}

impl RandomEventInfo {
    /// Text of the notice on screen, if any.
    #[must_use]
    pub fn current_text(&self) -> Option<&str> {
        self.current.as_ref().map(|notice| notice.text.as_str())
    }

    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Show the next queued notice, or close once nothing is left to show.
    fn advance(ctx: &mut WindowContext<'_, Self>) {
        if let Some(next) = ctx.data.queue.pop_front() {
            debug!("showing event {}", next.key);
            ctx.data.current = Some(next);
            ctx.set_form(FormKind::EventExecutor);
        } else if ctx.sim.director().has_pending_notices() {
            ctx.clear_form();
        } else {
            ctx.remove_window();
        }
    }
}

impl WindowState for RandomEventInfo {
    const KIND: WindowKind = WindowKind::RandomEvent;

    fn create(_sim: &Simulation) -> Self {
        Self::default()
    }

    fn forms() -> FormRegistry<Self> {
        FormRegistry::new()
            .with(FormKind::EventExecutor, default_form::<EventExecutor, Self>)
            .with(FormKind::RepairPrompt, default_form::<RepairPrompt, Self>)
    }

    fn header(&self, sim: &Simulation) -> String {
        format!("{}\n", sim.world.calendar)
    }

    fn accept_event(
        ctx: &mut WindowContext<'_, Self>,
        notice: EventNotice,
    ) -> Result<(), GameError> {
        ctx.data.queue.push_back(notice);
        if ctx.data.current.is_none() {
            Self::advance(ctx);
        }
        Ok(())
    }
}

/// Shows the rendered outcome and runs the item's closing hooks on ENTER.
#[derive(Debug, Default)]
struct EventExecutor;

impl Form<RandomEventInfo> for EventExecutor {
    fn kind(&self) -> FormKind {
        FormKind::EventExecutor
    }

    fn render(&self, view: FormView<'_, RandomEventInfo>) -> String {
        let text = view.data.current_text().unwrap_or_default();
        format!("{text}\n\n{ENTER_PROMPT}")
    }

    fn on_input(
        &mut self,
        ctx: &mut WindowContext<'_, RandomEventInfo>,
        _input: &str,
    ) -> Result<(), GameError> {
        let Some(mut notice) = ctx.data.current.take() else {
            RandomEventInfo::advance(ctx);
            return Ok(());
        };
        let redirected = notice.item.on_post_execute(ctx)?;
        notice.item.on_close(&mut ctx.sim.world);
        if !redirected {
            RandomEventInfo::advance(ctx);
        }
        Ok(())
    }
}

/// Asks whether to try fixing a broken part. The answer fires the follow-up
/// event, which the manager routes back into this window.
#[derive(Debug, Default)]
struct RepairPrompt {
    answered: bool,
}

impl Form<RandomEventInfo> for RepairPrompt {
    fn kind(&self) -> FormKind {
        FormKind::RepairPrompt
    }

    fn render(&self, view: FormView<'_, RandomEventInfo>) -> String {
        let part = view
            .sim
            .world
            .vehicle
            .broken_part()
            .map_or("wagon", |part| part.label());
        format!("Would you like to try to repair the {part}? (Y/N)")
    }

    fn on_input(
        &mut self,
        ctx: &mut WindowContext<'_, RandomEventInfo>,
        input: &str,
    ) -> Result<(), GameError> {
        let Some(attempt) = yes_no(input) else {
            return Ok(());
        };
        self.answered = true;
        let (director, world) = ctx.sim.director_and_world();
        let chance = f64::from(world.config().repair_chance);
        let repaired = attempt && world.rng.gen_bool(chance);
        debug!("repair attempted: {attempt}, succeeded: {repaired}");
        if repaired {
            director.trigger_event::<PartRepaired>(world, EventTarget::Vehicle)?;
        } else {
            director.trigger_event::<NoRepair>(world, EventTarget::Vehicle)?;
        }
        Ok(())
    }

    fn allow_input(&self) -> bool {
        !self.answered
    }
}

#[cfg(test)]
mod tests {
    use crate::config::SimConfig;
    use crate::director::events::vehicle::{BrokenPart, LostTrail, OxenDied};
    use crate::director::{EventTarget, RegisteredEvent};
    use crate::inventory::Entity;
    use crate::party::Profession;
    use crate::simulation::Simulation;
    use crate::tick::Pulse;
    use crate::window::{FormKind, WindowKind, WindowManager};
    use crate::world::PartySetup;

    fn started() -> (Simulation, WindowManager) {
        let mut sim = Simulation::for_tests();
        sim.start_game(&PartySetup::new(Profession::Banker, 3));
        sim.world.vehicle.inventory.add(Entity::Animal, 4).unwrap();
        let mut manager = WindowManager::default();
        manager.add(WindowKind::Travel, &mut sim).unwrap();
        (sim, manager)
    }

    fn fire<E: RegisteredEvent>(sim: &mut Simulation) {
        let (director, world) = sim.director_and_world();
        director.trigger_event::<E>(world, EventTarget::Vehicle).unwrap();
    }

    #[test]
    fn queued_notices_are_shown_in_order() {
        let (mut sim, mut manager) = started();
        fire::<OxenDied>(&mut sim);
        fire::<OxenDied>(&mut sim);
        manager.tick(&mut sim, Pulse::SYSTEM).unwrap();

        assert_eq!(manager.top_kind(), Some(WindowKind::RandomEvent));
        assert_eq!(manager.top_form(), Some(FormKind::EventExecutor));
        assert!(manager.active_window_text(&sim).contains("3 remain"));

        manager.send_input(&mut sim, "").unwrap();
        assert!(manager.active_window_text(&sim).contains("2 remain"));

        manager.send_input(&mut sim, "").unwrap();
        assert!(manager.is_pending_removal(WindowKind::RandomEvent));
        manager.tick(&mut sim, Pulse::SYSTEM).unwrap();
        assert_eq!(manager.top_kind(), Some(WindowKind::Travel));
    }

    #[test]
    fn close_hooks_run_after_acknowledgement() {
        let (mut sim, mut manager) = started();
        fire::<LostTrail>(&mut sim);
        manager.tick(&mut sim, Pulse::SYSTEM).unwrap();
        assert_eq!(sim.world.pending_skip_days(), 0);

        manager.send_input(&mut sim, "").unwrap();
        assert!(sim.world.pending_skip_days() >= 1);
    }

    #[test]
    fn broken_part_asks_for_a_repair() {
        let (mut sim, mut manager) = started();
        sim.set_config(SimConfig {
            repair_chance: 1.0,
            ..SimConfig::default()
        })
        .unwrap();
        fire::<BrokenPart>(&mut sim);
        manager.tick(&mut sim, Pulse::SYSTEM).unwrap();
        manager.send_input(&mut sim, "").unwrap();
        assert_eq!(manager.top_form(), Some(FormKind::RepairPrompt));

        manager.send_input(&mut sim, "maybe").unwrap();
        assert_eq!(manager.top_form(), Some(FormKind::RepairPrompt));

        manager.send_input(&mut sim, "y").unwrap();
        assert_eq!(manager.top_form(), Some(FormKind::EventExecutor));
        assert!(manager.active_window_text(&sim).contains("able to repair"));
        assert!(sim.world.vehicle.broken_part().is_none());
    }

    #[test]
    fn declining_without_spares_strands_the_wagon() {
        let (mut sim, mut manager) = started();
        fire::<BrokenPart>(&mut sim);
        manager.tick(&mut sim, Pulse::SYSTEM).unwrap();
        manager.send_input(&mut sim, "").unwrap();
        manager.send_input(&mut sim, "n").unwrap();

        assert!(manager.active_window_text(&sim).contains("cannot go on"));
        assert!(sim.world.should_end_game());
    }
}
