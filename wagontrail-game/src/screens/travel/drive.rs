//! Forms that spend days: driving, resting and waiting out lost time.
use std::fmt::Write as _;

use crate::constants::ENTER_PROMPT;
use crate::error::GameError;
use crate::screens::Travel;
use crate::tick::Pulse;
use crate::window::{Form, FormKind, FormView, WindowContext};

const WAGON_FRAMES: [&str; 4] = [
    "   __.---.__\n  (_________)\n   O       O  .",
    "   __.---.__\n  (_________)\n   O       O .",
    "   __.---.__\n  (_________)\n   O       O  ",
    "   __.---.__\n  (_________)\n   O       O   .",
];

const MAX_REST_DAYS: u32 = 9;

/// Rolls the wagon one day per simulation tick until something stops it.
#[derive(Debug, Default)]
pub(super) struct Drive {
    frame: usize,
}

impl Form<Travel> for Drive {
    fn kind(&self) -> FormKind {
        FormKind::Drive
    }

    fn render(&self, _view: FormView<'_, Travel>) -> String {
        format!(
            "{}\n\nPress ENTER to size up the situation.",
            WAGON_FRAMES[self.frame % WAGON_FRAMES.len()]
        )
    }

    fn on_input(
        &mut self,
        ctx: &mut WindowContext<'_, Travel>,
        _input: &str,
    ) -> Result<(), GameError> {
        ctx.sim.world.vehicle.stop();
        ctx.clear_form();
        Ok(())
    }

    fn on_tick(
        &mut self,
        ctx: &mut WindowContext<'_, Travel>,
        pulse: Pulse,
    ) -> Result<(), GameError> {
        if pulse.system {
            self.frame = (self.frame + 1) % WAGON_FRAMES.len();
            return Ok(());
        }
        if !ctx.sim.world.vehicle.is_moving() {
            ctx.clear_form();
            return Ok(());
        }
        if ctx.sim.take_turn(pulse.forced_skip)?.is_terminal() {
            return Ok(());
        }
        if ctx.sim.last_turn().is_some_and(|turn| turn.arrived) {
            ctx.sim.world.vehicle.stop();
            ctx.set_form(FormKind::LocationArrive);
        }
        Ok(())
    }
}

/// Asks how long to rest.
#[derive(Debug, Default)]
pub(super) struct RestDays;

impl Form<Travel> for RestDays {
    fn kind(&self) -> FormKind {
        FormKind::RestDays
    }

    fn render(&self, _view: FormView<'_, Travel>) -> String {
        format!("How many days would you like to rest? (1-{MAX_REST_DAYS}, blank to cancel)")
    }

    fn on_input(
        &mut self,
        ctx: &mut WindowContext<'_, Travel>,
        input: &str,
    ) -> Result<(), GameError> {
        let input = input.trim();
        if input.is_empty() {
            ctx.clear_form();
            return Ok(());
        }
        if let Ok(days) = input.parse::<u32>()
            && (1..=MAX_REST_DAYS).contains(&days)
        {
            ctx.data.rest_days = days;
            ctx.sim.world.vehicle.stop();
            ctx.set_form(FormKind::Resting);
        }
        Ok(())
    }
}

/// One normal turn per simulation tick with the wagon stopped.
#[derive(Debug, Default)]
pub(super) struct Resting;

impl Form<Travel> for Resting {
    fn kind(&self) -> FormKind {
        FormKind::Resting
    }

    fn render(&self, view: FormView<'_, Travel>) -> String {
        match view.data.rest_days {
            0 => String::from("Done resting."),
            1 => String::from("Resting... 1 day left."),
            days => format!("Resting... {days} days left."),
        }
    }

    fn on_input(
        &mut self,
        _ctx: &mut WindowContext<'_, Travel>,
        _input: &str,
    ) -> Result<(), GameError> {
        Ok(())
    }

    fn on_tick(
        &mut self,
        ctx: &mut WindowContext<'_, Travel>,
        pulse: Pulse,
    ) -> Result<(), GameError> {
        if pulse.system {
            return Ok(());
        }
        if ctx.data.rest_days == 0 {
            ctx.clear_form();
            return Ok(());
        }
        ctx.sim.world.vehicle.stop();
        ctx.sim.take_turn(false)?;
        ctx.data.rest_days -= 1;
        Ok(())
    }

    fn input_fills_buffer(&self) -> bool {
        false
    }
}

/// Burns scheduled skip days through forced-skip turns.
#[derive(Debug, Default)]
pub(super) struct LoseTime;

impl Form<Travel> for LoseTime {
    fn kind(&self) -> FormKind {
        FormKind::LoseTime
    }

    fn render(&self, view: FormView<'_, Travel>) -> String {
        let mut out = String::from("Time passes while the wagon waits.\n");
        match view.sim.world.pending_skip_days() {
            0 => out.push_str(ENTER_PROMPT),
            days => {
                let _ = write!(out, "{days} more day(s) to wait.");
            }
        }
        out
    }

    fn on_input(
        &mut self,
        ctx: &mut WindowContext<'_, Travel>,
        _input: &str,
    ) -> Result<(), GameError> {
        if ctx.sim.world.pending_skip_days() == 0 {
            ctx.clear_form();
        }
        Ok(())
    }

    fn on_tick(
        &mut self,
        ctx: &mut WindowContext<'_, Travel>,
        pulse: Pulse,
    ) -> Result<(), GameError> {
        if pulse.system {
            return Ok(());
        }
        if ctx.sim.world.take_skip_day() {
            ctx.sim.take_turn(true)?;
        } else {
            ctx.clear_form();
        }
        Ok(())
    }
}
