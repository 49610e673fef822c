//! Turn orchestrator and the context object every window, form and event
//! works through.
use log::{debug, info};
use std::collections::VecDeque;

use crate::config::SimConfig;
use crate::content::Content;
use crate::director::events::person::Death;
use crate::director::{EventCategory, EventDirector, EventTarget, catalog};
use crate::error::GameError;
use crate::window::WindowKind;
use crate::world::{PartySetup, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    #[default]
    Running,
    Win,
    Fail,
}

impl GameStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Window-stack changes requested from inside a pulse; the manager drains
/// these once the top window's handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowRequest {
    Attach(WindowKind),
    /// Flag every window for removal and attach the game over screen.
    EndGame,
}

/// Summary of the most recent normal turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TurnReport {
    pub turn: u64,
    pub miles: u32,
    pub arrived: bool,
    pub deaths: usize,
}

#[derive(Debug)]
pub struct Simulation {
    pub world: World,
    director: EventDirector,
    content: Content,
    seed: u64,
    status: GameStatus,
    total_ticks: u64,
    total_turns: u64,
    requests: VecDeque<WindowRequest>,
    removal_seq: u64,
    quit: bool,
    last_turn: Option<TurnReport>,
}

impl Simulation {
    /// A fresh simulation with the shipped event catalog.
    ///
    /// # Errors
    ///
    /// Returns an error when the config or content is invalid.
    pub fn new(content: Content, config: SimConfig, seed: u64) -> Result<Self, GameError> {
        Self::with_director(content, config, seed, catalog::standard()?)
    }

    /// A fresh simulation driven by a caller-built event catalog.
    ///
    /// # Errors
    ///
    /// Returns an error when the config or content is invalid, or the
    /// catalog's odds overflow the configured draw space.
    pub fn with_director(
        content: Content,
        config: SimConfig,
        seed: u64,
        director: EventDirector,
    ) -> Result<Self, GameError> {
        config.validate()?;
        director.validate_odds(&config)?;
        let world = World::new(&content, config, seed)?;
        Ok(Self {
            world,
            director,
            content,
            seed,
            status: GameStatus::Running,
            total_ticks: 0,
            total_turns: 0,
            requests: VecDeque::new(),
            removal_seq: 0,
            quit: false,
            last_turn: None,
        })
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        use crate::content::{ContentLoader, StaticContent};
        let content = StaticContent.load_content().expect("bundled content");
        Self::new(content, SimConfig::default(), 7).expect("default simulation")
    }

    /// Outfit the party and reset the clock for a new journey.
    pub fn start_game(&mut self, setup: &PartySetup) {
        self.world.outfit(&self.content, setup);
        self.status = GameStatus::Running;
        self.total_turns = 0;
        self.last_turn = None;
        info!(
            "new game: {:?} leaving {}",
            setup.profession, self.world.calendar
        );
    }

    /// Throw away the journey and stand at the trailhead again. The random
    /// stream continues so a restarted game does not replay the last one.
    ///
    /// # Errors
    ///
    /// Returns an error if the content tables cannot rebuild the world.
    pub fn restart(&mut self) -> Result<(), GameError> {
        let rng = self.world.rng.clone();
        self.world = World::new(&self.content, self.world.config().clone(), self.seed)?;
        self.world.rng = rng;
        self.status = GameStatus::Running;
        self.total_ticks = 0;
        self.total_turns = 0;
        self.last_turn = None;
        info!("game restarted");
        Ok(())
    }

    /// Advance one day.
    ///
    /// End conditions are checked first; a terminal status is sticky and
    /// nothing moves afterwards. A forced skip spends the day without
    /// travelling or eating.
    ///
    /// # Errors
    ///
    /// Propagates event catalog defects.
    pub fn take_turn(&mut self, force_skip: bool) -> Result<GameStatus, GameError> {
        if self.status.is_terminal() {
            return Ok(self.status);
        }
        if let Some(outcome) = self.evaluate_status() {
            info!("game over: {outcome:?} after {} turns", self.total_turns);
            self.status = outcome;
            self.world.vehicle.stop();
            self.requests.push_back(WindowRequest::EndGame);
            return Ok(outcome);
        }

        self.total_turns += 1;
        self.world.calendar.advance_day();
        if force_skip {
            self.skip_day()?;
        } else {
            self.travel_day()?;
        }
        Ok(self.status)
    }

    /// First matching end rule, in fixed order.
    fn evaluate_status(&self) -> Option<GameStatus> {
        if self.world.should_end_game() {
            Some(GameStatus::Fail)
        } else if self.world.trail.at_final_location() {
            Some(GameStatus::Win)
        } else if self.world.vehicle.all_dead() {
            Some(GameStatus::Fail)
        } else {
            None
        }
    }

    fn travel_day(&mut self) -> Result<(), GameError> {
        let report = self.world.tick_vehicle();
        let arrived = self.world.trail.advance(report.miles);
        for index in &report.deaths {
            self.director
                .trigger_event::<Death>(&mut self.world, EventTarget::Person(*index))?;
        }
        self.roll_events()?;

        let turn = TurnReport {
            turn: self.total_turns,
            miles: report.miles,
            arrived,
            deaths: report.deaths.len(),
        };
        debug!(
            "turn {} on {}: {} mi, {} lb eaten{}",
            turn.turn,
            self.world.calendar,
            report.miles,
            report.food_eaten,
            if report.starving { ", starving" } else { "" }
        );
        self.last_turn = Some(turn);
        Ok(())
    }

    fn skip_day(&mut self) -> Result<(), GameError> {
        debug!("turn {} on {}: skipped", self.total_turns, self.world.calendar);
        self.roll_events()?;
        self.last_turn = Some(TurnReport {
            turn: self.total_turns,
            ..TurnReport::default()
        });
        Ok(())
    }

    fn roll_events(&mut self) -> Result<(), GameError> {
        let world = &mut self.world;
        if world.vehicle.is_moving() {
            self.director
                .trigger_by_category(world, EventTarget::Vehicle, EventCategory::Vehicle)?;
        }
        if let Some(index) = world.vehicle.random_living(&mut world.rng) {
            self.director
                .trigger_by_category(world, EventTarget::Person(index), EventCategory::Person)?;
        }
        for category in [EventCategory::Weather, EventCategory::Wild] {
            self.director
                .trigger_by_category(world, EventTarget::Vehicle, category)?;
        }
        Ok(())
    }

    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Count one pulse of any kind.
    pub const fn record_tick(&mut self) {
        self.total_ticks += 1;
    }

    #[must_use]
    pub const fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    #[must_use]
    pub const fn total_turns(&self) -> u64 {
        self.total_turns
    }

    #[must_use]
    pub const fn last_turn(&self) -> Option<TurnReport> {
        self.last_turn
    }

    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        self.world.config()
    }

    /// Swap in new tuning mid-session.
    ///
    /// # Errors
    ///
    /// Rejects an invalid config, or one whose draw spaces no longer fit the
    /// catalog's odds, and keeps the current tuning.
    pub fn set_config(&mut self, config: SimConfig) -> Result<(), GameError> {
        config.validate()?;
        self.director.validate_odds(&config)?;
        debug!("config replaced");
        self.world.replace_config(config);
        Ok(())
    }

    #[must_use]
    pub const fn content(&self) -> &Content {
        &self.content
    }

    #[must_use]
    pub const fn director(&self) -> &EventDirector {
        &self.director
    }

    pub const fn director_mut(&mut self) -> &mut EventDirector {
        &mut self.director
    }

    /// A line of trail advice drawn from the world's rng.
    pub fn random_advice(&mut self) -> String {
        self.content.random_advice(&mut self.world.rng)
    }

    /// Split borrow for forms that fire events explicitly.
    pub fn director_and_world(&mut self) -> (&mut EventDirector, &mut World) {
        (&mut self.director, &mut self.world)
    }

    /// Ask the manager to push `kind` once the current handler returns.
    pub fn request_window(&mut self, kind: WindowKind) {
        self.requests.push_back(WindowRequest::Attach(kind));
    }

    pub fn take_window_request(&mut self) -> Option<WindowRequest> {
        self.requests.pop_front()
    }

    /// Monotonic stamp ordering window removals.
    pub fn next_removal_stamp(&mut self) -> u64 {
        self.removal_seq += 1;
        self.removal_seq
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    #[must_use]
    pub const fn quit_requested(&self) -> bool {
        self.quit
    }
}
