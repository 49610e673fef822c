//! Title screen and the new-game setup chain.
use log::debug;
use std::fmt::Write as _;

use crate::calendar::Calendar;
use crate::constants::{ENTER_PROMPT, FIRST_START_MONTH, LAST_START_MONTH, MENU_PROMPT, PARTY_SIZE};
use crate::error::GameError;
use crate::party::Profession;
use crate::screens::{parse_choice, yes_no};
use crate::simulation::Simulation;
use crate::window::{
    Form, FormKind, FormRegistry, FormView, WindowContext, WindowKind, WindowState, default_form,
};
use crate::world::PartySetup;

/// Choices gathered while walking through the setup forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainMenu {
    pub profession: Option<Profession>,
    pub names: Vec<String>,
    pub start_month: u32,
}

impl MainMenu {
    fn reset(&mut self, start_month: u32) {
        self.profession = None;
        self.names.clear();
        self.start_month = start_month;
    }

    fn setup(&self) -> Option<PartySetup> {
        Some(PartySetup {
            profession: self.profession?,
            names: self.names.clone(),
            start_month: self.start_month,
        })
    }
}

fn month_name(month: u32) -> String {
    Calendar::starting(month).date().format("%B").to_string()
}

impl WindowState for MainMenu {
    const KIND: WindowKind = WindowKind::MainMenu;

    fn create(sim: &Simulation) -> Self {
        Self {
            profession: None,
            names: Vec::new(),
            start_month: sim.world.config().start_month,
        }
    }

    fn forms() -> FormRegistry<Self> {
        FormRegistry::new()
            .with(FormKind::ProfessionSelect, default_form::<ProfessionSelect, Self>)
            .with(FormKind::PartyNames, default_form::<PartyNames, Self>)
            .with(FormKind::StartingMonth, default_form::<StartingMonth, Self>)
            .with(FormKind::NewGameConfirm, default_form::<NewGameConfirm, Self>)
            .with(FormKind::TrailInfo, default_form::<TrailInfo, Self>)
    }

    fn header(&self, _sim: &Simulation) -> String {
        String::from("The Oregon Trail\n")
    }

    fn on_post_create(ctx: &mut WindowContext<'_, Self>) -> Result<(), GameError> {
        ctx.menu.add("TravelTheTrail", "Travel the trail", |ctx| {
            let month = ctx.sim.world.config().start_month;
            ctx.data.reset(month);
            ctx.set_form(FormKind::ProfessionSelect);
            Ok(())
        });
        ctx.menu
            .add_form("LearnAboutTrail", "Learn about the trail", FormKind::TrailInfo);
        ctx.menu.add("EndProgram", "End", |ctx| {
            ctx.sim.request_quit();
            Ok(())
        });
        Ok(())
    }
}

#[derive(Debug, Default)]
struct ProfessionSelect;

impl Form<MainMenu> for ProfessionSelect {
    fn kind(&self) -> FormKind {
        FormKind::ProfessionSelect
    }

    fn render(&self, _view: FormView<'_, MainMenu>) -> String {
        let mut out = String::from("Many kinds of people made the trip to Oregon.\n\nYou may:\n\n");
        for (idx, profession) in Profession::ALL.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", idx + 1, profession.description());
        }
        out.push('\n');
        out.push_str(MENU_PROMPT);
        out
    }

    fn on_input(
        &mut self,
        ctx: &mut WindowContext<'_, MainMenu>,
        input: &str,
    ) -> Result<(), GameError> {
        if let Some(idx) = parse_choice(input, Profession::ALL.len()) {
            ctx.data.profession = Some(Profession::ALL[idx]);
            ctx.set_form(FormKind::PartyNames);
        }
        Ok(())
    }
}

/// Collects the leader and companions one name at a time.
#[derive(Debug, Default)]
struct PartyNames;

impl Form<MainMenu> for PartyNames {
    fn kind(&self) -> FormKind {
        FormKind::PartyNames
    }

    fn render(&self, view: FormView<'_, MainMenu>) -> String {
        let mut out = String::new();
        for (idx, name) in view.data.names.iter().enumerate() {
            let _ = writeln!(out, "  {}. {name}", idx + 1);
        }
        if !view.data.names.is_empty() {
            out.push('\n');
        }
        if view.data.names.is_empty() {
            out.push_str("What is the first name of the wagon leader?");
        } else {
            let _ = write!(
                out,
                "What is the first name of party member {}?",
                view.data.names.len() + 1
            );
        }
        out.push_str("\n(Leave blank for a suggested name.)");
        out
    }

    fn on_input(
        &mut self,
        ctx: &mut WindowContext<'_, MainMenu>,
        input: &str,
    ) -> Result<(), GameError> {
        let slot = ctx.data.names.len();
        let name = match input.trim() {
            "" => ctx.sim.content().default_name(slot),
            name => name.to_string(),
        };
        debug!("party slot {slot} named {name}");
        ctx.data.names.push(name);
        if ctx.data.names.len() >= PARTY_SIZE {
            ctx.set_form(FormKind::StartingMonth);
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct StartingMonth;

impl Form<MainMenu> for StartingMonth {
    fn kind(&self) -> FormKind {
        FormKind::StartingMonth
    }

    fn render(&self, _view: FormView<'_, MainMenu>) -> String {
        let mut out = String::from(
            "It is 1848. Your jumping off place for Oregon is Independence, Missouri.\n\
             You must decide which month to leave.\n\n",
        );
        for (idx, month) in (FIRST_START_MONTH..=LAST_START_MONTH).enumerate() {
            let _ = writeln!(out, "  {}. {}", idx + 1, month_name(month));
        }
        out.push('\n');
        out.push_str(MENU_PROMPT);
        out
    }

    fn on_input(
        &mut self,
        ctx: &mut WindowContext<'_, MainMenu>,
        input: &str,
    ) -> Result<(), GameError> {
        let months = (LAST_START_MONTH - FIRST_START_MONTH + 1) as usize;
        if let Some(idx) = parse_choice(input, months) {
            ctx.data.start_month = FIRST_START_MONTH + u32::try_from(idx).unwrap_or_default();
            ctx.set_form(FormKind::NewGameConfirm);
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct NewGameConfirm;

impl Form<MainMenu> for NewGameConfirm {
    fn kind(&self) -> FormKind {
        FormKind::NewGameConfirm
    }

    fn render(&self, view: FormView<'_, MainMenu>) -> String {
        let data = view.data;
        let mut out = String::new();
        if let Some(profession) = data.profession {
            let _ = writeln!(out, "{}", profession.description());
        }
        let _ = writeln!(out, "Party: {}", data.names.join(", "));
        let _ = writeln!(out, "Leaving in {}\n", month_name(data.start_month));
        out.push_str("Is this correct? (Y/N)");
        out
    }

    fn on_input(
        &mut self,
        ctx: &mut WindowContext<'_, MainMenu>,
        input: &str,
    ) -> Result<(), GameError> {
        match yes_no(input) {
            Some(true) => {
                let Some(setup) = ctx.data.setup() else {
                    ctx.set_form(FormKind::ProfessionSelect);
                    return Ok(());
                };
                ctx.sim.start_game(&setup);
                ctx.remove_window();
                ctx.sim.request_window(WindowKind::Travel);
                ctx.sim.request_window(WindowKind::Store);
            }
            Some(false) => {
                let month = ctx.sim.world.config().start_month;
                ctx.data.reset(month);
                ctx.clear_form();
            }
            None => {}
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct TrailInfo;

impl Form<MainMenu> for TrailInfo {
    fn kind(&self) -> FormKind {
        FormKind::TrailInfo
    }

    fn render(&self, view: FormView<'_, MainMenu>) -> String {
        let trail = &view.sim.world.trail;
        let total: u32 = trail
            .locations()
            .iter()
            .map(|location| location.distance_to_next)
            .sum();
        let first = trail.locations().first().map_or("", |l| l.name.as_str());
        let last = trail.locations().last().map_or("", |l| l.name.as_str());
        format!(
            "Try taking a journey by covered wagon across {total} miles of plains, rivers \
             and mountains. Leave {first} with a wagon, oxen and supplies, and try to \
             reach {last} before winter.\n\n\
             Buy enough food and spare parts before you leave. Rivers can be forded, \
             floated or crossed by ferry. Rest when your party's health grows \
             poor.\n\n{ENTER_PROMPT}"
        )
    }

    fn on_input(
        &mut self,
        ctx: &mut WindowContext<'_, MainMenu>,
        _input: &str,
    ) -> Result<(), GameError> {
        ctx.clear_form();
        Ok(())
    }
}
