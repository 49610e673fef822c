use log::{debug, warn};
use rand::Rng;
use std::fmt::Write as _;

use crate::constants::{ENTER_PROMPT, MENU_PROMPT};
use crate::director::EventTarget;
use crate::director::events::river::{SuppliesLost, VehicleFloods};
use crate::error::GameError;
use crate::inventory::format_cents;
use crate::screens::{Travel, parse_choice};
use crate::tick::Pulse;
use crate::window::{Form, FormKind, FormView, WindowContext, WindowKind};

/// Shown when the wagon lacks something it needs to roll.
#[derive(Debug, Default)]
pub(super) struct MissingItem;

impl Form<Travel> for MissingItem {
    fn kind(&self) -> FormKind {
        FormKind::MissingItem
    }

    fn render(&self, view: FormView<'_, Travel>) -> String {
        let vehicle = &view.sim.world.vehicle;
        let missing = vehicle.missing_requirement().map_or("supplies", |e| e.label());
        let mut out = format!("You cannot travel without {missing}.\n");
        if view.sim.world.trail.store_available() {
            out.push_str("You can buy some at the store here.\n");
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
        if ctx.sim.world.trail.store_available() {
            ctx.sim.request_window(WindowKind::Store);
        }
        ctx.clear_form();
        Ok(())
    }
}

/// Announces a stop. At the end of the trail it hands over to the orchestrator.
#[derive(Debug, Default)]
pub(super) struct LocationArrive;

impl Form<Travel> for LocationArrive {
    fn kind(&self) -> FormKind {
        FormKind::LocationArrive
    }

    fn render(&self, view: FormView<'_, Travel>) -> String {
        let world = &view.sim.world;
        let location = world.trail.current();
        let mut out = format!("You are now at {}.\n{}\n\n", location.name, world.calendar);
        if location.last {
            out.push_str("You have reached the end of the trail.");
            return out;
        }
        if world.trail.needs_crossing() {
            out.push_str("You must cross the river before going on.\n\n");
        } else if location.has_store() {
            out.push_str("There is a store here.\n\n");
        }
        out.push_str(ENTER_PROMPT);
        out
    }

    fn on_input(
        &mut self,
        ctx: &mut WindowContext<'_, Travel>,
        _input: &str,
    ) -> Result<(), GameError> {
        let trail = &ctx.sim.world.trail;
        if trail.current().last {
            return Ok(());
        }
        if trail.needs_crossing() {
            ctx.set_form(FormKind::RiverCross);
        } else {
            ctx.clear_form();
        }
        Ok(())
    }

    fn on_tick(
        &mut self,
        ctx: &mut WindowContext<'_, Travel>,
        pulse: Pulse,
    ) -> Result<(), GameError> {
        if pulse.is_simulation() && ctx.sim.world.trail.at_final_location() {
            ctx.sim.take_turn(false)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Crossing {
    Ford,
    Float,
    Ferry,
    Wait,
}

const CROSSINGS: [Crossing; 4] = [Crossing::Ford, Crossing::Float, Crossing::Ferry, Crossing::Wait];

/// Ford, float, pay the ferry or wait a day.
#[derive(Debug, Default)]
pub(super) struct RiverCross;

impl RiverCross {
    fn cross(ctx: &mut WindowContext<'_, Travel>, how: Crossing) -> Result<(), GameError> {
        let (director, world) = ctx.sim.director_and_world();
        let depth = world.trail.current().river_depth_ft;
        let limit = world.config().ford_depth_limit_ft;
        match how {
            Crossing::Ford => {
                if depth > limit {
                    director.trigger_event::<VehicleFloods>(world, EventTarget::Vehicle)?;
                } else if depth > limit * 0.66 && world.rng.gen_bool(0.3) {
                    director.trigger_event::<SuppliesLost>(world, EventTarget::Vehicle)?;
                }
            }
            Crossing::Float => {
                let chance = f64::from(world.config().float_loss_chance);
                if world.rng.gen_bool(chance) {
                    director.trigger_event::<SuppliesLost>(world, EventTarget::Vehicle)?;
                }
            }
            Crossing::Ferry => {
                let cost = world.config().ferry_cost_cents;
                if let Err(err) = world.vehicle.inventory.spend(cost) {
                    warn!("ferry refused: {err}");
                    ctx.data.notice = Some(format!(
                        "You cannot afford the {} ferry.",
                        format_cents(cost)
                    ));
                    return Ok(());
                }
                let delay = world.config().ferry_delay_days;
                world.schedule_skip(delay);
                world.trail.mark_crossed();
                debug!("ferry taken, waiting {delay} days");
                ctx.data.notice = None;
                ctx.set_form(FormKind::LoseTime);
                return Ok(());
            }
            Crossing::Wait => {
                ctx.sim.take_turn(true)?;
                return Ok(());
            }
        }
        debug!("crossed {} by {how:?}", world.trail.current().name);
        world.trail.mark_crossed();
        ctx.data.notice = None;
        ctx.clear_form();
        Ok(())
    }
}

impl Form<Travel> for RiverCross {
    fn kind(&self) -> FormKind {
        FormKind::RiverCross
    }

    fn render(&self, view: FormView<'_, Travel>) -> String {
        let world = &view.sim.world;
        let location = world.trail.current();
        let mut out = format!(
            "{}\nThe river is {:.1} feet deep.\n\nYou may:\n\n",
            location.name, location.river_depth_ft
        );
        for (idx, how) in CROSSINGS.iter().enumerate() {
            let label = match how {
                Crossing::Ford => String::from("attempt to ford the river"),
                Crossing::Float => String::from("caulk the wagon and float it across"),
                Crossing::Ferry => format!(
                    "take a ferry across ({}, {} days)",
                    format_cents(world.config().ferry_cost_cents),
                    world.config().ferry_delay_days
                ),
                Crossing::Wait => String::from("wait to see if conditions improve"),
            };
            let _ = writeln!(out, "  {}. {label}", idx + 1);
        }
        if let Some(notice) = &view.data.notice {
            out.push('\n');
            out.push_str(notice);
            out.push('\n');
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
        match parse_choice(input, CROSSINGS.len()) {
            Some(idx) => Self::cross(ctx, CROSSINGS[idx]),
            None => Ok(()),
        }
    }
}
