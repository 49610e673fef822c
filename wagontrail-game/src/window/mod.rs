//! Window and form state machine.
//!
//! A [`Window`] is a top-level mode owning typed user data, a numbered command
//! menu and at most one active [`Form`]. Forms never swap themselves directly:
//! they record a request on the [`WindowContext`] and the window applies it
//! once the form's handler has returned, then fires `on_form_change`.
//!
//! Window types are described by [`WindowState`]; the manager only ever sees
//! the object-safe [`GameWindow`] facade.

pub mod manager;
pub mod registry;

pub use manager::WindowManager;
pub use registry::{FormFactory, FormRegistry, WindowFactory, WindowRegistry, default_form};

use log::{debug, trace};
use std::fmt::{self, Write as _};
use std::rc::Rc;

use crate::constants::{MAX_FORM_HOPS, MENU_PROMPT};
use crate::director::EventNotice;
use crate::error::GameError;
use crate::simulation::Simulation;
use crate::tick::Pulse;

/// Addressable top-level modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WindowKind {
    MainMenu,
    Travel,
    Store,
    RandomEvent,
    GameOver,
}

/// Every form shipped with the core, across all windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormKind {
    // Main menu
    ProfessionSelect,
    PartyNames,
    StartingMonth,
    NewGameConfirm,
    TrailInfo,
    // Travel
    Drive,
    MissingItem,
    LocationArrive,
    RiverCross,
    CheckSupplies,
    LookAtMap,
    ChangePace,
    ChangeRations,
    RestDays,
    Resting,
    TalkToPeople,
    LoseTime,
    // Store
    BuyItem,
    // Random event
    EventExecutor,
    RepairPrompt,
    // Game over
    Outcome,
}

/// Read-only access to the world and the owning window's data.
pub struct FormView<'a, D> {
    pub sim: &'a Simulation,
    pub data: &'a D,
}

impl<D> Clone for FormView<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for FormView<'_, D> {}

/// One screen inside a window.
pub trait Form<D>: fmt::Debug {
    fn kind(&self) -> FormKind;

    /// Text for the current state. Called any number of times per frame.
    fn render(&self, view: FormView<'_, D>) -> String;

    /// Handle a completed input line.
    ///
    /// # Errors
    ///
    /// Only configuration defects; bad player input is handled in place.
    fn on_input(&mut self, ctx: &mut WindowContext<'_, D>, input: &str) -> Result<(), GameError>;

    /// Handle a pulse while this form is active on the top window.
    ///
    /// # Errors
    ///
    /// Propagates defects raised by the turn orchestrator.
    fn on_tick(&mut self, _ctx: &mut WindowContext<'_, D>, _pulse: Pulse) -> Result<(), GameError> {
        Ok(())
    }

    /// Whether keystrokes are buffered at all while this form is active.
    fn input_fills_buffer(&self) -> bool {
        true
    }

    /// Whether a completed buffer is dispatched to [`Form::on_input`].
    fn allow_input(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormRequest {
    Set(FormKind),
    Clear,
}

#[derive(Debug, Default)]
struct WindowControl {
    pending: Option<FormRequest>,
    removal: Option<u64>,
}

/// Mutable handle given to forms, commands and window hooks.
pub struct WindowContext<'a, D> {
    pub sim: &'a mut Simulation,
    pub data: &'a mut D,
    pub menu: &'a mut Menu<D>,
    form: Option<FormKind>,
    control: &'a mut WindowControl,
}

impl<D> WindowContext<'_, D> {
    /// Replace the active form once the current handler returns. The last
    /// request made during one handler wins.
    pub fn set_form(&mut self, kind: FormKind) {
        self.control.pending = Some(FormRequest::Set(kind));
    }

    /// Drop back to the command menu once the current handler returns.
    pub fn clear_form(&mut self) {
        self.control.pending = Some(FormRequest::Clear);
    }

    /// Flag the window for removal at the next manager tick.
    pub fn remove_window(&mut self) {
        if self.control.removal.is_none() {
            self.control.removal = Some(self.sim.next_removal_stamp());
        }
    }

    #[must_use]
    pub const fn removal_pending(&self) -> bool {
        self.control.removal.is_some()
    }

    /// Form that was active when this context was created.
    #[must_use]
    pub const fn form(&self) -> Option<FormKind> {
        self.form
    }

    #[must_use]
    pub fn view(&self) -> FormView<'_, D> {
        FormView {
            sim: &*self.sim,
            data: &*self.data,
        }
    }
}

/// Callback bound to a menu entry.
pub type CommandAction<D> = Rc<dyn Fn(&mut WindowContext<'_, D>) -> Result<(), GameError>>;

pub struct Command<D> {
    pub id: &'static str,
    pub label: String,
    action: CommandAction<D>,
}

/// Numbered command list shown while a window has no active form.
pub struct Menu<D> {
    commands: Vec<Command<D>>,
}

impl<D> Default for Menu<D> {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
        }
    }
}

impl<D> fmt::Debug for Menu<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.commands.iter().map(|command| command.id))
            .finish()
    }
}

impl<D> Menu<D> {
    /// Append an entry. A duplicate id replaces the existing entry in place.
    pub fn add(
        &mut self,
        id: &'static str,
        label: impl Into<String>,
        action: impl Fn(&mut WindowContext<'_, D>) -> Result<(), GameError> + 'static,
    ) {
        let command = Command {
            id,
            label: label.into(),
            action: Rc::new(action),
        };
        if let Some(existing) = self.commands.iter_mut().find(|c| c.id == id) {
            *existing = command;
        } else {
            self.commands.push(command);
        }
    }

    /// Shorthand for an entry that only opens a form.
    pub fn add_form(&mut self, id: &'static str, label: impl Into<String>, form: FormKind) {
        self.add(id, label, move |ctx| {
            ctx.set_form(form);
            Ok(())
        });
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.iter().map(|command| command.id)
    }

    /// Match a 1-based index or a case-insensitive command id.
    #[must_use]
    pub fn resolve(&self, input: &str) -> Option<CommandAction<D>> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        let found = match input.parse::<usize>() {
            Ok(number) => number.checked_sub(1).and_then(|idx| self.commands.get(idx)),
            Err(_) => self
                .commands
                .iter()
                .find(|command| command.id.eq_ignore_ascii_case(input)),
        };
        found.map(|command| Rc::clone(&command.action))
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (idx, command) in self.commands.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", idx + 1, command.label);
        }
        out.push('\n');
        out.push_str(MENU_PROMPT);
        out
    }
}

/// Behavior of one window type, implemented by its user data.
pub trait WindowState: fmt::Debug + Sized + 'static {
    const KIND: WindowKind;

    /// Build the initial data. Must not mutate the world.
    fn create(sim: &Simulation) -> Self;

    /// Forms this window may host.
    fn forms() -> FormRegistry<Self>;

    fn header(&self, _sim: &Simulation) -> String {
        String::new()
    }

    fn footer(&self, _sim: &Simulation) -> String {
        String::new()
    }

    /// Runs once, right after the window is pushed.
    ///
    /// # Errors
    ///
    /// Propagates defects.
    fn on_post_create(_ctx: &mut WindowContext<'_, Self>) -> Result<(), GameError> {
        Ok(())
    }

    /// Runs when the window becomes top-most: on push and when exposed again.
    ///
    /// # Errors
    ///
    /// Propagates defects.
    fn on_activate(_ctx: &mut WindowContext<'_, Self>) -> Result<(), GameError> {
        Ok(())
    }

    /// Runs after every form swap or clear.
    ///
    /// # Errors
    ///
    /// Propagates defects.
    fn on_form_change(_ctx: &mut WindowContext<'_, Self>) -> Result<(), GameError> {
        Ok(())
    }

    /// One-time exit logic once the manager pops the window.
    fn on_removed(&mut self, _sim: &mut Simulation) {}

    /// Receive a fired event from the director.
    ///
    /// # Errors
    ///
    /// Windows that cannot host events reject them.
    fn accept_event(
        _ctx: &mut WindowContext<'_, Self>,
        _notice: EventNotice,
    ) -> Result<(), GameError> {
        Err(GameError::EventRejected(Self::KIND))
    }
}

/// Object-safe facade the manager stacks.
pub trait GameWindow: fmt::Debug {
    fn kind(&self) -> WindowKind;
    fn removal_stamp(&self) -> Option<u64>;
    fn request_removal(&mut self, sim: &mut Simulation);
    fn form_kind(&self) -> Option<FormKind>;
    /// False while pending removal or while the active form refuses buffering.
    fn accepts_input(&self) -> bool;
    fn post_create(&mut self, sim: &mut Simulation) -> Result<(), GameError>;
    fn activate(&mut self, sim: &mut Simulation) -> Result<(), GameError>;
    fn removed(&mut self, sim: &mut Simulation);
    fn tick(&mut self, sim: &mut Simulation, pulse: Pulse) -> Result<(), GameError>;
    fn receive_input(&mut self, sim: &mut Simulation, input: &str) -> Result<(), GameError>;
    fn deliver_event(
        &mut self,
        sim: &mut Simulation,
        notice: EventNotice,
    ) -> Result<(), GameError>;
    fn render(&self, sim: &Simulation) -> String;
}

pub struct Window<D: WindowState> {
    data: D,
    menu: Menu<D>,
    form: Option<Box<dyn Form<D>>>,
    forms: FormRegistry<D>,
    control: WindowControl,
}

impl<D: WindowState> fmt::Debug for Window<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("kind", &D::KIND)
            .field("data", &self.data)
            .field("menu", &self.menu)
            .field("form", &self.form)
            .field("control", &self.control)
            .finish()
    }
}

impl<D: WindowState> Window<D> {
    #[must_use]
    pub fn new(sim: &Simulation) -> Self {
        Self {
            data: D::create(sim),
            menu: Menu::default(),
            form: None,
            forms: D::forms(),
            control: WindowControl::default(),
        }
    }

    /// Factory entry for [`WindowRegistry`].
    #[must_use]
    pub fn boxed(sim: &Simulation) -> Box<dyn GameWindow> {
        Box::new(Self::new(sim))
    }

    #[must_use]
    pub const fn data(&self) -> &D {
        &self.data
    }

    /// Borrow the active form and a context over the remaining fields.
    fn split<'a>(
        &'a mut self,
        sim: &'a mut Simulation,
    ) -> (Option<&'a mut Box<dyn Form<D>>>, WindowContext<'a, D>) {
        let current = self.form.as_ref().map(|form| form.kind());
        let Self {
            data,
            menu,
            form,
            control,
            ..
        } = self;
        let ctx = WindowContext {
            sim,
            data,
            menu,
            form: current,
            control,
        };
        (form.as_mut(), ctx)
    }

    /// Run a window hook, then apply any form request it made.
    fn with_context<T>(
        &mut self,
        sim: &mut Simulation,
        hook: impl FnOnce(&mut WindowContext<'_, D>) -> Result<T, GameError>,
    ) -> Result<T, GameError> {
        let value = {
            let (_, mut ctx) = self.split(sim);
            hook(&mut ctx)?
        };
        self.settle(sim)?;
        Ok(value)
    }

    /// Apply pending form requests until none remain.
    fn settle(&mut self, sim: &mut Simulation) -> Result<(), GameError> {
        let mut hops = 0;
        while let Some(request) = self.control.pending.take() {
            hops += 1;
            if hops > MAX_FORM_HOPS {
                return Err(GameError::FormTransitionLoop {
                    window: D::KIND,
                    limit: MAX_FORM_HOPS,
                });
            }
            match request {
                FormRequest::Set(kind) => {
                    let factory = self.forms.factory(kind)?;
                    let form = factory(FormView {
                        sim: &*sim,
                        data: &self.data,
                    });
                    debug!("{:?}: form -> {kind:?}", D::KIND);
                    self.form = Some(form);
                }
                FormRequest::Clear => {
                    debug!("{:?}: form cleared", D::KIND);
                    self.form = None;
                }
            }
            let (_, mut ctx) = self.split(sim);
            D::on_form_change(&mut ctx)?;
        }
        Ok(())
    }
}

impl<D: WindowState> GameWindow for Window<D> {
    fn kind(&self) -> WindowKind {
        D::KIND
    }

    fn removal_stamp(&self) -> Option<u64> {
        self.control.removal
    }

    fn request_removal(&mut self, sim: &mut Simulation) {
        if self.control.removal.is_none() {
            self.control.removal = Some(sim.next_removal_stamp());
        }
    }

    fn form_kind(&self) -> Option<FormKind> {
        self.form.as_ref().map(|form| form.kind())
    }

    fn accepts_input(&self) -> bool {
        self.control.removal.is_none()
            && self.form.as_ref().is_none_or(|form| form.input_fills_buffer())
    }

    fn post_create(&mut self, sim: &mut Simulation) -> Result<(), GameError> {
        self.with_context(sim, D::on_post_create)
    }

    fn activate(&mut self, sim: &mut Simulation) -> Result<(), GameError> {
        self.with_context(sim, D::on_activate)
    }

    fn removed(&mut self, sim: &mut Simulation) {
        self.form = None;
        self.data.on_removed(sim);
    }

    fn tick(&mut self, sim: &mut Simulation, pulse: Pulse) -> Result<(), GameError> {
        {
            let (form, mut ctx) = self.split(sim);
            let Some(form) = form else {
                return Ok(());
            };
            form.on_tick(&mut ctx, pulse)?;
        }
        self.settle(sim)
    }

    fn receive_input(&mut self, sim: &mut Simulation, input: &str) -> Result<(), GameError> {
        if self.control.removal.is_some() {
            trace!("{:?}: input {input:?} ignored, window closing", D::KIND);
            return Ok(());
        }
        if let Some(form) = &self.form {
            if !form.allow_input() {
                trace!("{:?}: input {input:?} ignored by {:?}", D::KIND, form.kind());
                return Ok(());
            }
            {
                let (form, mut ctx) = self.split(sim);
                if let Some(form) = form {
                    form.on_input(&mut ctx, input)?;
                }
            }
            return self.settle(sim);
        }
        let Some(action) = self.menu.resolve(input) else {
            trace!("{:?}: no command matches {input:?}", D::KIND);
            return Ok(());
        };
        self.with_context(sim, |ctx| action(ctx))
    }

    fn deliver_event(
        &mut self,
        sim: &mut Simulation,
        notice: EventNotice,
    ) -> Result<(), GameError> {
        self.with_context(sim, |ctx| D::accept_event(ctx, notice))
    }

    fn render(&self, sim: &Simulation) -> String {
        let mut out = self.data.header(sim);
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        match &self.form {
            Some(form) => out.push_str(&form.render(FormView {
                sim,
                data: &self.data,
            })),
            None => out.push_str(&self.menu.render()),
        }
        let footer = self.data.footer(sim);
        if !footer.is_empty() {
            if !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&footer);
        }
        out
    }
}
