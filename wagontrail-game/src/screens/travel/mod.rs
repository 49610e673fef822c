//! The travel window: the hub the player returns to between every stop.
mod drive;
mod location;
mod status;

pub use status::status_block;

use log::debug;

use crate::error::GameError;
use crate::simulation::Simulation;
use crate::trail::LocationStatus;
use crate::window::{FormKind, FormRegistry, WindowContext, WindowKind, WindowState, default_form};

/// Per-window state shared by the travel forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Travel {
    /// Days left in the current rest stop.
    pub rest_days: u32,
    /// Line of advice picked when the player last talked to people.
    pub advice: String,
    /// Set when a river crossing could not be paid for.
    pub notice: Option<String>,
}

impl Travel {
    /// Rebuild the command menu for the current game state.
    fn rebuild_menu(ctx: &mut WindowContext<'_, Self>) {
        ctx.menu.clear();
        ctx.menu.add("ContinueOnTrail", "Continue on trail", continue_on_trail);
        ctx.menu
            .add_form("CheckSupplies", "Check supplies", FormKind::CheckSupplies);
        ctx.menu.add_form("LookAtMap", "Look at map", FormKind::LookAtMap);
        ctx.menu.add_form("ChangePace", "Change pace", FormKind::ChangePace);
        ctx.menu
            .add_form("ChangeRations", "Change food rations", FormKind::ChangeRations);
        ctx.menu.add_form("StopToRest", "Stop to rest", FormKind::RestDays);
        ctx.menu.add("TalkToPeople", "Talk to people", |ctx| {
            ctx.data.advice = ctx.sim.random_advice();
            ctx.set_form(FormKind::TalkToPeople);
            Ok(())
        });
        if ctx.sim.world.trail.store_available() {
            ctx.menu.add("BuySupplies", "Buy supplies", |ctx| {
                ctx.sim.request_window(WindowKind::Store);
                Ok(())
            });
        }
    }
}

/// Decide what leaving the current spot means right now.
fn continue_on_trail(ctx: &mut WindowContext<'_, Travel>) -> Result<(), GameError> {
    let world = &mut ctx.sim.world;
    if let Some(missing) = world.vehicle.missing_requirement() {
        debug!("cannot travel without {missing}");
        ctx.set_form(FormKind::MissingItem);
        return Ok(());
    }
    if world.trail.status() == LocationStatus::Unreached {
        world.trail.mark_reached();
        ctx.set_form(FormKind::LocationArrive);
        return Ok(());
    }
    if world.trail.needs_crossing() {
        ctx.set_form(FormKind::RiverCross);
        return Ok(());
    }
    if world.trail.at_final_location() {
        ctx.sim.take_turn(false)?;
        return Ok(());
    }
    if world.trail.depart() || world.trail.status() == LocationStatus::Departed {
        world.vehicle.start();
        ctx.set_form(FormKind::Drive);
    }
    Ok(())
}

impl WindowState for Travel {
    const KIND: WindowKind = WindowKind::Travel;

    fn create(_sim: &Simulation) -> Self {
        Self::default()
    }

    fn forms() -> FormRegistry<Self> {
        FormRegistry::new()
            .with(FormKind::Drive, default_form::<drive::Drive, Self>)
            .with(FormKind::Resting, default_form::<drive::Resting, Self>)
            .with(FormKind::RestDays, default_form::<drive::RestDays, Self>)
            .with(FormKind::LoseTime, default_form::<drive::LoseTime, Self>)
            .with(FormKind::MissingItem, default_form::<location::MissingItem, Self>)
            .with(FormKind::LocationArrive, default_form::<location::LocationArrive, Self>)
            .with(FormKind::RiverCross, default_form::<location::RiverCross, Self>)
            .with(FormKind::CheckSupplies, default_form::<status::CheckSupplies, Self>)
            .with(FormKind::LookAtMap, default_form::<status::LookAtMap, Self>)
            .with(FormKind::ChangePace, default_form::<status::ChangePace, Self>)
            .with(FormKind::ChangeRations, default_form::<status::ChangeRations, Self>)
            .with(FormKind::TalkToPeople, default_form::<status::TalkToPeople, Self>)
    }

    fn header(&self, sim: &Simulation) -> String {
        status_block(sim)
    }

    fn on_post_create(ctx: &mut WindowContext<'_, Self>) -> Result<(), GameError> {
        Self::rebuild_menu(ctx);
        Ok(())
    }

    fn on_activate(ctx: &mut WindowContext<'_, Self>) -> Result<(), GameError> {
        let world = &ctx.sim.world;
        if world.should_end_game() || world.vehicle.all_dead() {
            ctx.sim.take_turn(false)?;
            return Ok(());
        }
        if world.pending_skip_days() > 0 {
            ctx.sim.world.vehicle.stop();
            ctx.set_form(FormKind::LoseTime);
        }
        Self::rebuild_menu(ctx);
        Ok(())
    }

    fn on_form_change(ctx: &mut WindowContext<'_, Self>) -> Result<(), GameError> {
        Self::rebuild_menu(ctx);
        Ok(())
    }
}
