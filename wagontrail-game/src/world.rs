//! Mutable game world shared by every window, form and event.
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::calendar::Calendar;
use crate::config::SimConfig;
use crate::constants::PARTY_SIZE;
use crate::content::{Content, ContentError};
use crate::party::{Person, Profession};
use crate::trail::Trail;
use crate::vehicle::{DayReport, Vehicle};

/// Choices made on the main menu before departure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartySetup {
    pub profession: Profession,
    /// Leader first; missing names are filled from the content table.
    pub names: Vec<String>,
    pub start_month: u32,
}

impl PartySetup {
    #[must_use]
    pub fn new(profession: Profession, start_month: u32) -> Self {
        Self {
            profession,
            names: Vec::new(),
            start_month,
        }
    }
}

#[derive(Debug, Clone)]
pub struct World {
    pub calendar: Calendar,
    pub trail: Trail,
    pub vehicle: Vehicle,
    pub rng: ChaCha20Rng,
    config: SimConfig,
    profession: Option<Profession>,
    should_end_game: bool,
    pending_skip_days: u32,
    pending_deaths: Vec<usize>,
}

impl World {
    /// A world with an empty wagon standing at the first location.
    ///
    /// # Errors
    ///
    /// Returns an error if the content tables cannot produce a trail or inventory.
    pub fn new(content: &Content, config: SimConfig, seed: u64) -> Result<Self, ContentError> {
        Ok(Self {
            calendar: Calendar::starting(config.start_month),
            trail: content.trail()?,
            vehicle: Vehicle::new(content.empty_inventory()?),
            rng: ChaCha20Rng::seed_from_u64(seed),
            config,
            profession: None,
            should_end_game: false,
            pending_skip_days: 0,
            pending_deaths: Vec::new(),
        })
    }

    /// Board the party and hand over the profession's starting cash.
    pub fn outfit(&mut self, content: &Content, setup: &PartySetup) {
        self.calendar = Calendar::starting(setup.start_month);
        self.profession = Some(setup.profession);
        let cash = self.config.starting_cash_cents(setup.profession);
        self.vehicle.inventory.set_cash_cents(cash);
        for slot in 0..PARTY_SIZE {
            let name = setup
                .names
                .get(slot)
                .map(|name| name.trim())
                .filter(|name| !name.is_empty())
                .map_or_else(|| content.default_name(slot), str::to_string);
            self.vehicle.board(Person::new(name, slot == 0));
        }
    }

    /// Tuning in force for this journey.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Run the wagon's day under this journey's tuning.
    pub fn tick_vehicle(&mut self) -> DayReport {
        self.vehicle.tick_day(&self.config, &mut self.rng)
    }

    /// Only the simulation swaps tuning, after checking it against the catalog.
    pub(crate) fn replace_config(&mut self, config: SimConfig) {
        self.config = config;
    }

    #[must_use]
    pub const fn profession(&self) -> Option<Profession> {
        self.profession
    }

    /// Ask the orchestrator to fail the game on its next turn.
    pub fn end_game(&mut self) {
        self.should_end_game = true;
    }

    #[must_use]
    pub const fn should_end_game(&self) -> bool {
        self.should_end_game
    }

    /// Schedule days that pass without the wagon moving.
    pub fn schedule_skip(&mut self, days: u32) {
        self.pending_skip_days = self.pending_skip_days.saturating_add(days);
    }

    #[must_use]
    pub const fn pending_skip_days(&self) -> u32 {
        self.pending_skip_days
    }

    /// Note a passenger killed by an event so the director can announce it.
    pub fn record_death(&mut self, index: usize) {
        if !self.pending_deaths.contains(&index) {
            self.pending_deaths.push(index);
        }
    }

    /// Drain deaths recorded since the last call, in the order they happened.
    pub fn take_pending_deaths(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.pending_deaths)
    }

    /// Consume one scheduled skip day. Returns false when none were pending.
    pub fn take_skip_day(&mut self) -> bool {
        if self.pending_skip_days == 0 {
            return false;
        }
        self.pending_skip_days -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentLoader, StaticContent};

    #[test]
    fn outfitting_fills_blank_names_and_sets_cash() {
        let content = StaticContent.load_content().unwrap();
        let mut world = World::new(&content, SimConfig::default(), 1).unwrap();
        let setup = PartySetup {
            profession: Profession::Carpenter,
            names: vec![String::from("Hattie"), String::from("  ")],
            start_month: 5,
        };
        world.outfit(&content, &setup);

        let names: Vec<&str> = world.vehicle.passengers().iter().map(Person::name).collect();
        assert_eq!(names, ["Hattie", "Mary", "Jed", "Sara"]);
        assert!(world.vehicle.passengers()[0].is_leader());
        assert_eq!(world.vehicle.inventory.cash_cents(), 80_000);
        assert_eq!(world.calendar.to_string(), "May 1, 1848");
    }

    #[test]
    fn skip_days_are_consumed_one_at_a_time() {
        let content = StaticContent.load_content().unwrap();
        let mut world = World::new(&content, SimConfig::default(), 1).unwrap();
        world.schedule_skip(2);
        assert!(world.take_skip_day());
        assert!(world.take_skip_day());
        assert!(!world.take_skip_day());
    }

    #[test]
    fn recorded_deaths_drain_once() {
        let content = StaticContent.load_content().unwrap();
        let mut world = World::new(&content, SimConfig::default(), 1).unwrap();
        world.record_death(2);
        world.record_death(0);
        world.record_death(2);
        assert_eq!(world.take_pending_deaths(), [2, 0]);
        assert!(world.take_pending_deaths().is_empty());
    }
}
