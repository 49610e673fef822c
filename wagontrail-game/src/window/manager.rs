//! Window stack driver.
//!
//! Only the top-most window is ticked or receives input; everything beneath it
//! is frozen. Removal is deferred: flagged windows are pruned at the start of
//! the next [`WindowManager::tick`], never while the stack is being walked.
use log::debug;

use crate::director::EventNotice;
use crate::error::GameError;
use crate::simulation::{Simulation, WindowRequest};
use crate::tick::Pulse;
use crate::window::{FormKind, GameWindow, WindowKind, WindowRegistry};

#[derive(Debug)]
pub struct WindowManager {
    registry: WindowRegistry,
    windows: Vec<Box<dyn GameWindow>>,
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new(WindowRegistry::standard())
    }
}

impl WindowManager {
    #[must_use]
    pub fn new(registry: WindowRegistry) -> Self {
        Self {
            registry,
            windows: Vec::new(),
        }
    }

    /// Build a window and push it on top of the stack.
    ///
    /// # Errors
    ///
    /// Fails when a live window of the same kind exists, when the kind has no
    /// factory, or when a creation hook raises a defect.
    pub fn add(&mut self, kind: WindowKind, sim: &mut Simulation) -> Result<(), GameError> {
        if self
            .windows
            .iter()
            .any(|window| window.kind() == kind && window.removal_stamp().is_none())
        {
            return Err(GameError::DuplicateWindow(kind));
        }
        let window = self.registry.create(kind, sim)?;
        self.windows.push(window);
        let index = self.windows.len() - 1;
        debug!("window push {kind:?} (depth {})", self.windows.len());

        self.windows[index].post_create(sim)?;
        if index + 1 == self.windows.len() {
            self.windows[index].activate(sim)?;
        }
        Ok(())
    }

    /// Prune flagged windows, tick the top one, then attach whatever the tick
    /// asked for.
    ///
    /// # Errors
    ///
    /// Propagates every configuration defect; the stack is undefined afterwards.
    pub fn tick(&mut self, sim: &mut Simulation, pulse: Pulse) -> Result<(), GameError> {
        self.prune(sim)?;
        if let Some(top) = self.windows.last_mut() {
            top.tick(sim, pulse)?;
        }
        self.process_requests(sim)
    }

    /// Deliver a completed input line to the top window.
    ///
    /// # Errors
    ///
    /// Propagates configuration defects raised while handling the input.
    pub fn send_input(&mut self, sim: &mut Simulation, input: &str) -> Result<(), GameError> {
        let Some(top) = self.windows.last_mut() else {
            return Ok(());
        };
        if !top.accepts_input() {
            log::trace!("input {input:?} discarded by {:?}", top.kind());
            return Ok(());
        }
        top.receive_input(sim, input)?;
        self.process_requests(sim)
    }

    fn prune(&mut self, sim: &mut Simulation) -> Result<(), GameError> {
        let top_leaving = self
            .windows
            .last()
            .is_some_and(|window| window.removal_stamp().is_some());
        if !self.windows.iter().any(|w| w.removal_stamp().is_some()) {
            return Ok(());
        }
        let (mut leaving, staying): (Vec<_>, Vec<_>) = self
            .windows
            .drain(..)
            .partition(|window| window.removal_stamp().is_some());
        self.windows = staying;
        leaving.sort_by_key(|window| window.removal_stamp());
        for mut window in leaving {
            debug!("window pop {:?} (depth {})", window.kind(), self.windows.len());
            window.removed(sim);
        }
        if top_leaving && let Some(top) = self.windows.last_mut() {
            top.activate(sim)?;
        }
        Ok(())
    }

    /// Drain window requests and fired events queued on the simulation.
    fn process_requests(&mut self, sim: &mut Simulation) -> Result<(), GameError> {
        loop {
            if let Some(request) = sim.take_window_request() {
                match request {
                    WindowRequest::Attach(kind) => self.add(kind, sim)?,
                    WindowRequest::EndGame => {
                        self.clear(sim);
                        self.add(WindowKind::GameOver, sim)?;
                    }
                }
                continue;
            }
            if let Some(notice) = sim.director_mut().take_notice() {
                if sim.status().is_terminal() {
                    debug!("event {} dropped, game already over", notice.key);
                    continue;
                }
                self.route_event(sim, notice)?;
                continue;
            }
            return Ok(());
        }
    }

    fn route_event(&mut self, sim: &mut Simulation, notice: EventNotice) -> Result<(), GameError> {
        let live = self.windows.iter().rposition(|window| {
            window.kind() == WindowKind::RandomEvent && window.removal_stamp().is_none()
        });
        let index = if let Some(index) = live {
            index
        } else {
            self.add(WindowKind::RandomEvent, sim)?;
            self.windows.len() - 1
        };
        self.windows[index].deliver_event(sim, notice)
    }

    #[must_use]
    pub fn current_window_count(&self) -> usize {
        self.windows.len()
    }

    #[must_use]
    pub fn top_kind(&self) -> Option<WindowKind> {
        self.windows.last().map(|window| window.kind())
    }

    #[must_use]
    pub fn top_form(&self) -> Option<FormKind> {
        self.windows.last().and_then(|window| window.form_kind())
    }

    /// Kinds from bottom to top, including windows pending removal.
    #[must_use]
    pub fn kinds(&self) -> Vec<WindowKind> {
        self.windows.iter().map(|window| window.kind()).collect()
    }

    #[must_use]
    pub fn is_pending_removal(&self, kind: WindowKind) -> bool {
        self.windows
            .iter()
            .any(|window| window.kind() == kind && window.removal_stamp().is_some())
    }

    /// Whether the top window would buffer keystrokes right now.
    #[must_use]
    pub fn accepts_input(&self) -> bool {
        self.windows.last().is_some_and(|window| window.accepts_input())
    }

    /// Composed text of the top window; empty when the stack is.
    #[must_use]
    pub fn active_window_text(&self, sim: &Simulation) -> String {
        self.windows
            .last()
            .map(|window| window.render(sim))
            .unwrap_or_default()
    }

    /// Flag every window for removal without pushing anything new.
    pub fn clear(&mut self, sim: &mut Simulation) {
        for window in &mut self.windows {
            window.request_removal(sim);
        }
    }
}
