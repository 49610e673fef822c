use log::info;

use crate::config::SimConfig;
use crate::content::{Content, ContentLoader, StaticContent};
use crate::director::EventDirector;
use crate::error::GameError;
use crate::simulation::{GameStatus, Simulation};
use crate::tick::Pulse;
use crate::window::{FormKind, WindowKind, WindowManager};

/// High-level session wrapper binding the window stack to a simulation.
///
/// Front-ends only need this type: feed it pulses and completed input lines
/// and draw whatever [`GameSession::screen`] returns.
#[derive(Debug)]
pub struct GameSession {
    sim: Simulation,
    windows: WindowManager,
}

impl GameSession {
    /// Construct a fresh session with the main menu showing.
    ///
    /// # Errors
    ///
    /// Returns an error when the config or content is invalid.
    pub fn new(content: Content, config: SimConfig, seed: u64) -> Result<Self, GameError> {
        Self::from_simulation(Simulation::new(content, config, seed)?)
    }

    /// Session over the bundled content tables and default tuning.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled content fails to load.
    pub fn bundled(seed: u64) -> Result<Self, GameError> {
        let content = StaticContent.load_content()?;
        Self::new(content, SimConfig::default(), seed)
    }

    /// Session with a caller-supplied event catalog.
    ///
    /// # Errors
    ///
    /// Returns an error when the config, content or catalog odds are invalid.
    pub fn with_director(
        content: Content,
        config: SimConfig,
        seed: u64,
        director: EventDirector,
    ) -> Result<Self, GameError> {
        Self::from_simulation(Simulation::with_director(content, config, seed, director)?)
    }

    fn from_simulation(mut sim: Simulation) -> Result<Self, GameError> {
        let mut windows = WindowManager::default();
        windows.add(WindowKind::MainMenu, &mut sim)?;
        info!("session ready");
        Ok(Self { sim, windows })
    }

    /// Deliver one pulse to the window stack.
    ///
    /// # Errors
    ///
    /// Propagates configuration defects; the session is unusable afterwards.
    pub fn pulse(&mut self, pulse: Pulse) -> Result<(), GameError> {
        self.sim.record_tick();
        self.windows.tick(&mut self.sim, pulse)
    }

    /// Deliver a completed input line to the top window.
    ///
    /// # Errors
    ///
    /// Propagates configuration defects.
    pub fn send_input(&mut self, input: &str) -> Result<(), GameError> {
        self.windows.send_input(&mut self.sim, input)
    }

    /// Push a window directly, bypassing the menus.
    ///
    /// # Errors
    ///
    /// Fails on duplicate or unregistered windows.
    pub fn attach(&mut self, kind: WindowKind) -> Result<(), GameError> {
        self.windows.add(kind, &mut self.sim)
    }

    /// Text of the top window.
    #[must_use]
    pub fn screen(&self) -> String {
        self.windows.active_window_text(&self.sim)
    }

    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.sim.status()
    }

    #[must_use]
    pub const fn quit_requested(&self) -> bool {
        self.sim.quit_requested()
    }

    /// Whether the top window would buffer keystrokes right now.
    #[must_use]
    pub fn accepts_input(&self) -> bool {
        self.windows.accepts_input()
    }

    #[must_use]
    pub fn top_window(&self) -> Option<WindowKind> {
        self.windows.top_kind()
    }

    #[must_use]
    pub fn top_form(&self) -> Option<FormKind> {
        self.windows.top_form()
    }

    /// Borrow the simulation.
    #[must_use]
    pub const fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Borrow the simulation mutably.
    pub const fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }

    /// Borrow the window stack.
    #[must_use]
    pub const fn windows(&self) -> &WindowManager {
        &self.windows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_opens_on_the_main_menu() {
        let session = GameSession::bundled(1).unwrap();
        assert_eq!(session.top_window(), Some(WindowKind::MainMenu));
        assert_eq!(session.status(), GameStatus::Running);
        assert!(session.screen().contains("Travel the trail"));
    }

    #[test]
    fn pulses_are_counted() {
        let mut session = GameSession::bundled(1).unwrap();
        session.pulse(Pulse::SYSTEM).unwrap();
        session.pulse(Pulse::SIMULATION).unwrap();
        assert_eq!(session.simulation().total_ticks(), 2);
        assert_eq!(session.simulation().total_turns(), 0);
    }

    #[test]
    fn end_program_requests_quit() {
        let mut session = GameSession::bundled(1).unwrap();
        session.send_input("EndProgram").unwrap();
        assert!(session.quit_requested());
    }
}
