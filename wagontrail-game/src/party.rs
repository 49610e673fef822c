//! Party members riding in the wagon.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    AILMENT_DAILY_DAMAGE, AILMENT_RECOVERY_CHANCE, AILMENT_RECOVERY_CHANCE_RESTING,
    BARE_BONES_DAILY_DAMAGE, FILLING_DAILY_HEAL, GRUELING_DAILY_DAMAGE, HEALTH_FAIR_THRESHOLD,
    HEALTH_POOR_THRESHOLD, HEALTH_VERY_POOR_THRESHOLD, PERSON_HEALTH_MAX, REST_DAILY_HEAL,
    STARVATION_DAILY_DAMAGE,
};
use crate::vehicle::{RationLevel, TravelPace};

/// Occupation of the wagon leader; decides starting cash and the score multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profession {
    Banker,
    Carpenter,
    Farmer,
}

impl Profession {
    pub const ALL: [Self; 3] = [Self::Banker, Self::Carpenter, Self::Farmer];

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Banker => "Be a banker from Boston",
            Self::Carpenter => "Be a carpenter from Ohio",
            Self::Farmer => "Be a farmer from Illinois",
        }
    }

    #[must_use]
    pub const fn score_multiplier(self) -> u32 {
        match self {
            Self::Banker => 1,
            Self::Carpenter => 2,
            Self::Farmer => 3,
        }
    }
}

/// Sicknesses and injuries that drain health each day until they heal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ailment {
    Dysentery,
    Cholera,
    Measles,
    Typhoid,
    Exhaustion,
    BrokenArm,
    BrokenLeg,
    Snakebite,
}

impl Ailment {
    pub const ILLNESSES: [Self; 5] = [
        Self::Dysentery,
        Self::Cholera,
        Self::Measles,
        Self::Typhoid,
        Self::Exhaustion,
    ];

    pub const INJURIES: [Self; 2] = [Self::BrokenArm, Self::BrokenLeg];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dysentery => "dysentery",
            Self::Cholera => "cholera",
            Self::Measles => "measles",
            Self::Typhoid => "typhoid fever",
            Self::Exhaustion => "exhaustion",
            Self::BrokenArm => "a broken arm",
            Self::BrokenLeg => "a broken leg",
            Self::Snakebite => "a snakebite",
        }
    }
}

impl fmt::Display for Ailment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse health bands shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HealthLevel {
    Dead,
    VeryPoor,
    Poor,
    Fair,
    Good,
}

impl HealthLevel {
    #[must_use]
    pub const fn from_health(health: i32) -> Self {
        if health <= 0 {
            Self::Dead
        } else if health < HEALTH_VERY_POOR_THRESHOLD {
            Self::VeryPoor
        } else if health < HEALTH_POOR_THRESHOLD {
            Self::Poor
        } else if health < HEALTH_FAIR_THRESHOLD {
            Self::Fair
        } else {
            Self::Good
        }
    }
}

impl fmt::Display for HealthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dead => "dead",
            Self::VeryPoor => "very poor",
            Self::Poor => "poor",
            Self::Fair => "fair",
            Self::Good => "good",
        })
    }
}

/// Conditions shared by every passenger for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyConditions {
    pub pace: TravelPace,
    pub ration: RationLevel,
    pub starving: bool,
    pub resting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    name: String,
    leader: bool,
    health: i32,
    ailment: Option<Ailment>,
}

impl Person {
    #[must_use]
    pub fn new(name: impl Into<String>, leader: bool) -> Self {
        Self {
            name: name.into(),
            leader,
            health: PERSON_HEALTH_MAX,
            ailment: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn is_leader(&self) -> bool {
        self.leader
    }

    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    #[must_use]
    pub const fn health_level(&self) -> HealthLevel {
        HealthLevel::from_health(self.health)
    }

    #[must_use]
    pub const fn ailment(&self) -> Option<Ailment> {
        self.ailment
    }

    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Afflict the person; an existing ailment is kept and health takes the hit instead.
    /// Returns true when the hit killed them.
    pub fn afflict(&mut self, ailment: Ailment) -> bool {
        if !self.is_alive() {
            return false;
        }
        if self.ailment.is_some() {
            return self.damage(AILMENT_DAILY_DAMAGE * 2);
        }
        self.ailment = Some(ailment);
        false
    }

    /// Returns true when this hit took the last of their health.
    pub fn damage(&mut self, amount: i32) -> bool {
        if amount <= 0 || !self.is_alive() {
            return false;
        }
        self.health = (self.health - amount).max(0);
        if self.health == 0 {
            self.ailment = None;
            return true;
        }
        false
    }

    pub fn heal(&mut self, amount: i32) {
        if amount <= 0 || !self.is_alive() {
            return;
        }
        self.health = (self.health + amount).min(PERSON_HEALTH_MAX);
    }

    /// Kill the person outright.
    pub fn kill(&mut self) {
        self.health = 0;
        self.ailment = None;
    }

    /// Apply one day of travel. Returns true when this day killed the person.
    pub fn tick<R: Rng + ?Sized>(&mut self, conditions: DailyConditions, rng: &mut R) -> bool {
        if !self.is_alive() {
            return false;
        }
        let mut delta = 0;
        if let Some(ailment) = self.ailment {
            let recovery = if conditions.resting {
                AILMENT_RECOVERY_CHANCE_RESTING
            } else {
                AILMENT_RECOVERY_CHANCE
            };
            if rng.r#gen::<f32>() < recovery {
                log::debug!("{} recovered from {ailment}", self.name);
                self.ailment = None;
            } else {
                delta -= AILMENT_DAILY_DAMAGE;
            }
        }
        if conditions.starving {
            delta -= STARVATION_DAILY_DAMAGE;
        } else if conditions.ration == RationLevel::BareBones {
            delta -= BARE_BONES_DAILY_DAMAGE;
        } else if conditions.ration == RationLevel::Filling {
            delta += FILLING_DAILY_HEAL;
        }
        if conditions.resting {
            delta += REST_DAILY_HEAL;
        } else if conditions.pace == TravelPace::Grueling {
            delta -= GRUELING_DAILY_DAMAGE;
        }

        if delta < 0 {
            self.damage(-delta)
        } else {
            self.heal(delta);
            false
        }
    }
}
