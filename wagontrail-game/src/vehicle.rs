//! The wagon: supplies, passengers, odometer and the daily travel tick.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::SimConfig;
use crate::constants::{
    BROKEN_AXLE_WEIGHT, BROKEN_TONGUE_WEIGHT, BROKEN_WHEEL_WEIGHT, FULL_TEAM_OXEN,
};
use crate::inventory::{Entity, Inventory};
use crate::party::{DailyConditions, Person};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TravelPace {
    #[default]
    Steady,
    Strenuous,
    Grueling,
}

impl TravelPace {
    pub const ALL: [Self; 3] = [Self::Steady, Self::Strenuous, Self::Grueling];
}

impl fmt::Display for TravelPace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Steady => "steady",
            Self::Strenuous => "strenuous",
            Self::Grueling => "grueling",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RationLevel {
    #[default]
    Filling,
    Meager,
    BareBones,
}

impl RationLevel {
    pub const ALL: [Self; 3] = [Self::Filling, Self::Meager, Self::BareBones];
}

impl fmt::Display for RationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Filling => "filling",
            Self::Meager => "meager",
            Self::BareBones => "bare bones",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum VehicleStatus {
    #[default]
    Stopped,
    Moving,
    /// Broken beyond repair; the journey cannot continue.
    Disabled,
}

/// Part weights for picking which part breaks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartWeights {
    pub wheel: u32,
    pub axle: u32,
    pub tongue: u32,
}

impl Default for PartWeights {
    fn default() -> Self {
        Self {
            wheel: BROKEN_WHEEL_WEIGHT,
            axle: BROKEN_AXLE_WEIGHT,
            tongue: BROKEN_TONGUE_WEIGHT,
        }
    }
}

impl PartWeights {
    #[must_use]
    pub const fn options(&self) -> [(Entity, u32); 3] {
        [
            (Entity::Wheel, self.wheel),
            (Entity::Axle, self.axle),
            (Entity::Tongue, self.tongue),
        ]
    }
}

/// Weighted random selection from a list of options
pub fn weighted_pick<T, R>(options: &[(T, u32)], rng: &mut R) -> Option<T>
where
    R: Rng + ?Sized,
    T: Clone,
{
    let total_weight: u32 = options.iter().map(|(_, weight)| *weight).sum();
    if total_weight == 0 {
        return None;
    }

    let roll = rng.gen_range(0..total_weight);
    let mut current_weight = 0;
    for (item, weight) in options {
        current_weight += weight;
        if roll < current_weight {
            return Some(item.clone());
        }
    }
    options.first().map(|(item, _)| item.clone())
}

/// What one day on the trail did to the wagon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayReport {
    pub miles: u32,
    pub food_eaten: i32,
    pub starving: bool,
    /// Passenger indices that died today.
    pub deaths: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub inventory: Inventory,
    passengers: Vec<Person>,
    odometer: u32,
    pace: TravelPace,
    ration: RationLevel,
    status: VehicleStatus,
    broken_part: Option<Entity>,
}

impl Vehicle {
    #[must_use]
    pub fn new(inventory: Inventory) -> Self {
        Self {
            inventory,
            passengers: Vec::new(),
            odometer: 0,
            pace: TravelPace::default(),
            ration: RationLevel::default(),
            status: VehicleStatus::default(),
            broken_part: None,
        }
    }

    pub fn board(&mut self, person: Person) {
        self.passengers.push(person);
    }

    #[must_use]
    pub fn passengers(&self) -> &[Person] {
        &self.passengers
    }

    #[must_use]
    pub fn passenger(&self, index: usize) -> Option<&Person> {
        self.passengers.get(index)
    }

    pub fn passenger_mut(&mut self, index: usize) -> Option<&mut Person> {
        self.passengers.get_mut(index)
    }

    #[must_use]
    pub fn living_passengers(&self) -> usize {
        self.passengers.iter().filter(|p| p.is_alive()).count()
    }

    /// Indices of passengers still alive.
    #[must_use]
    pub fn living_indices(&self) -> Vec<usize> {
        self.passengers
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_alive())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Pick a living passenger at random.
    pub fn random_living<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        let living = self.living_indices();
        if living.is_empty() {
            return None;
        }
        Some(living[rng.gen_range(0..living.len())])
    }

    #[must_use]
    pub fn all_dead(&self) -> bool {
        self.passengers.iter().all(|p| !p.is_alive())
    }

    #[must_use]
    pub const fn odometer(&self) -> u32 {
        self.odometer
    }

    #[must_use]
    pub const fn pace(&self) -> TravelPace {
        self.pace
    }

    pub const fn set_pace(&mut self, pace: TravelPace) {
        self.pace = pace;
    }

    #[must_use]
    pub const fn ration(&self) -> RationLevel {
        self.ration
    }

    pub const fn set_ration(&mut self, ration: RationLevel) {
        self.ration = ration;
    }

    #[must_use]
    pub const fn status(&self) -> VehicleStatus {
        self.status
    }

    #[must_use]
    pub const fn is_moving(&self) -> bool {
        matches!(self.status, VehicleStatus::Moving)
    }

    /// Start rolling; a disabled wagon stays disabled.
    pub fn start(&mut self) {
        if self.status != VehicleStatus::Disabled {
            self.status = VehicleStatus::Moving;
        }
    }

    pub fn stop(&mut self) {
        if self.status != VehicleStatus::Disabled {
            self.status = VehicleStatus::Stopped;
        }
    }

    pub fn disable(&mut self) {
        self.status = VehicleStatus::Disabled;
    }

    #[must_use]
    pub const fn broken_part(&self) -> Option<Entity> {
        self.broken_part
    }

    /// Mark a part as broken. Non-part entities are ignored.
    pub fn break_part(&mut self, part: Entity) {
        if part.is_part() {
            self.broken_part = Some(part);
        }
    }

    pub fn repair(&mut self) {
        self.broken_part = None;
    }

    /// Swap the broken part for a spare. Returns false when no spare is carried.
    pub fn replace_with_spare(&mut self) -> bool {
        let Some(part) = self.broken_part else {
            return false;
        };
        if self.inventory.remove(part, 1) == 1 {
            self.broken_part = None;
            true
        } else {
            false
        }
    }

    /// First required supply the wagon lacks before it can roll.
    #[must_use]
    pub fn missing_requirement(&self) -> Option<Entity> {
        (self.inventory.quantity(Entity::Animal) <= 0).then_some(Entity::Animal)
    }

    /// Miles covered in one day at the current pace and team size.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn daily_mileage(&self, cfg: &SimConfig) -> u32 {
        if !self.is_moving() || self.broken_part.is_some() {
            return 0;
        }
        let oxen = self.inventory.quantity(Entity::Animal);
        if oxen <= 0 {
            return 0;
        }
        let team = (oxen.min(FULL_TEAM_OXEN) as f32) / FULL_TEAM_OXEN as f32;
        let miles = cfg.base_miles_per_day * cfg.pace_factor(self.pace) * team.max(0.5);
        miles.round().max(0.0) as u32
    }

    /// Advance the wagon by one day: move, eat and age the passengers.
    pub fn tick_day<R: Rng + ?Sized>(&mut self, cfg: &SimConfig, rng: &mut R) -> DayReport {
        let miles = self.daily_mileage(cfg);
        self.odometer = self.odometer.saturating_add(miles);

        let living = i32::try_from(self.living_passengers()).unwrap_or(i32::MAX);
        let needed = living.saturating_mul(cfg.food_per_person(self.ration));
        let food_eaten = self.inventory.remove(Entity::Food, needed);
        let starving = food_eaten < needed;

        let conditions = DailyConditions {
            pace: self.pace,
            ration: self.ration,
            starving,
            resting: !self.is_moving(),
        };
        let deaths = self
            .passengers
            .iter_mut()
            .enumerate()
            .filter_map(|(idx, person)| person.tick(conditions, rng).then_some(idx))
            .collect();

        DayReport {
            miles,
            food_eaten,
            starving,
            deaths,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::SimItem;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn stocked_vehicle(oxen: i32, food: i32) -> Vehicle {
        let mut inventory = Inventory::new([
            SimItem::new(Entity::Animal, "Oxen", 1, 20, 0).unwrap(),
            SimItem::new(Entity::Food, "Food", 1, 2000, 1).unwrap(),
            SimItem::new(Entity::Wheel, "Wheel", 1, 3, 0).unwrap(),
        ]);
        if oxen > 0 {
            inventory.add(Entity::Animal, oxen).unwrap();
        }
        if food > 0 {
            inventory.add(Entity::Food, food).unwrap();
        }
        let mut vehicle = Vehicle::new(inventory);
        vehicle.board(Person::new("Ada", true));
        vehicle.board(Person::new("Bo", false));
        vehicle
    }

    #[test]
    fn weighted_pick_breaks_on_match() {
        let options = [(Entity::Wheel, 1), (Entity::Axle, 1)];
        let mut rng = StepRng::new(0, 0);
        assert_eq!(weighted_pick(&options, &mut rng), Some(Entity::Wheel));
        assert_eq!(weighted_pick::<Entity, _>(&[], &mut rng), None);
    }

    #[test]
    fn stopped_wagon_covers_no_ground_but_eats() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let mut vehicle = stocked_vehicle(6, 100);
        let report = vehicle.tick_day(&SimConfig::default(), &mut rng);
        assert_eq!(report.miles, 0);
        assert_eq!(report.food_eaten, 6);
        assert_eq!(vehicle.inventory.quantity(Entity::Food), 94);
    }

    #[test]
    fn full_team_moves_at_base_rate_times_pace() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let mut vehicle = stocked_vehicle(6, 100);
        vehicle.start();
        vehicle.set_pace(TravelPace::Strenuous);
        let report = vehicle.tick_day(&SimConfig::default(), &mut rng);
        assert_eq!(report.miles, 23);
        assert_eq!(vehicle.odometer(), 23);
    }

    #[test]
    fn broken_part_or_missing_oxen_halts_travel() {
        let cfg = SimConfig::default();
        let mut vehicle = stocked_vehicle(0, 100);
        vehicle.start();
        assert_eq!(vehicle.missing_requirement(), Some(Entity::Animal));
        assert_eq!(vehicle.daily_mileage(&cfg), 0);

        let mut vehicle = stocked_vehicle(4, 100);
        vehicle.start();
        vehicle.break_part(Entity::Axle);
        assert_eq!(vehicle.daily_mileage(&cfg), 0);
        assert!(!vehicle.replace_with_spare(), "no spare axle carried");
        vehicle.repair();
        assert!(vehicle.daily_mileage(&cfg) > 0);
    }

    #[test]
    fn spare_replaces_broken_part() {
        let mut vehicle = stocked_vehicle(2, 0);
        vehicle.inventory.add(Entity::Wheel, 1).unwrap();
        vehicle.break_part(Entity::Wheel);
        assert!(vehicle.replace_with_spare());
        assert_eq!(vehicle.broken_part(), None);
        assert_eq!(vehicle.inventory.quantity(Entity::Wheel), 0);
    }

    #[test]
    fn food_never_goes_negative() {
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let mut vehicle = stocked_vehicle(2, 4);
        let report = vehicle.tick_day(&SimConfig::default(), &mut rng);
        assert!(report.starving);
        assert_eq!(report.food_eaten, 4);
        assert_eq!(vehicle.inventory.quantity(Entity::Food), 0);
    }

    #[test]
    fn disabled_wagon_cannot_restart() {
        let mut vehicle = stocked_vehicle(2, 0);
        vehicle.disable();
        vehicle.start();
        assert_eq!(vehicle.status(), VehicleStatus::Disabled);
    }
}
