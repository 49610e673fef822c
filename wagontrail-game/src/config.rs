//! Simulation tuning loaded from JSON, with validated defaults.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use crate::constants::{FIRST_START_MONTH, LAST_START_MONTH};
use crate::director::EventCategory;
use crate::party::Profession;
use crate::vehicle::{RationLevel, TravelPace};

/// Errors raised when simulation tuning invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("config could not be parsed: {0}")]
    Parse(String),
    #[error("simulation tick interval must be at least 1ms")]
    ZeroTickInterval,
    #[error("no draw space configured for {0:?} events")]
    MissingDrawSpace(EventCategory),
    #[error("draw space for {0:?} events must be at least 1")]
    ZeroDrawSpace(EventCategory),
    #[error("{category:?} events add up to odds {odds}, above the draw space of {space}")]
    OddsExceedDrawSpace {
        category: EventCategory,
        odds: u32,
        space: u32,
    },
    #[error("{field} must be greater than {min:.2} (got {value:.2})")]
    MinViolation {
        field: &'static str,
        min: f32,
        value: f32,
    },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f32,
        max: f32,
        value: f32,
    },
    #[error("starting month {0} is outside March..=July")]
    StartMonth(u32),
}

/// Tunable simulation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Wall-clock spacing between simulation ticks.
    #[serde(default = "SimConfig::default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Size of the odds roll per category: an event with odds `n` fires `n` times in `space`.
    #[serde(default = "SimConfig::default_draw_space")]
    pub draw_space: HashMap<EventCategory, u32>,
    #[serde(default = "SimConfig::default_base_miles_per_day")]
    pub base_miles_per_day: f32,
    #[serde(default = "SimConfig::default_pace_factor")]
    pub pace_factor: HashMap<TravelPace, f32>,
    /// Pounds of food each living passenger eats per day.
    #[serde(default = "SimConfig::default_food_per_person")]
    pub food_per_person: HashMap<RationLevel, i32>,
    #[serde(default = "SimConfig::default_start_month")]
    pub start_month: u32,
    #[serde(default = "SimConfig::default_starting_cash_cents")]
    pub starting_cash_cents: HashMap<Profession, i64>,
    #[serde(default = "SimConfig::default_ferry_cost_cents")]
    pub ferry_cost_cents: i64,
    #[serde(default = "SimConfig::default_ferry_delay_days")]
    pub ferry_delay_days: u32,
    #[serde(default = "SimConfig::default_ford_depth_limit_ft")]
    pub ford_depth_limit_ft: f32,
    #[serde(default = "SimConfig::default_float_loss_chance")]
    pub float_loss_chance: f32,
    #[serde(default = "SimConfig::default_repair_chance")]
    pub repair_chance: f32,
}

impl SimConfig {
    const fn default_tick_interval_ms() -> u64 {
        1_000
    }

    fn default_draw_space() -> HashMap<EventCategory, u32> {
        EventCategory::ALL.iter().map(|category| (*category, 100)).collect()
    }

    const fn default_base_miles_per_day() -> f32 {
        18.0
    }

    fn default_pace_factor() -> HashMap<TravelPace, f32> {
        HashMap::from([
            (TravelPace::Steady, 1.0),
            (TravelPace::Strenuous, 1.25),
            (TravelPace::Grueling, 1.5),
        ])
    }

    fn default_food_per_person() -> HashMap<RationLevel, i32> {
        HashMap::from([
            (RationLevel::Filling, 3),
            (RationLevel::Meager, 2),
            (RationLevel::BareBones, 1),
        ])
    }

    const fn default_start_month() -> u32 {
        FIRST_START_MONTH
    }

    fn default_starting_cash_cents() -> HashMap<Profession, i64> {
        HashMap::from([
            (Profession::Banker, 160_000),
            (Profession::Carpenter, 80_000),
            (Profession::Farmer, 40_000),
        ])
    }

    const fn default_ferry_cost_cents() -> i64 {
        500
    }

    const fn default_ferry_delay_days() -> u32 {
        2
    }

    const fn default_ford_depth_limit_ft() -> f32 {
        3.0
    }

    const fn default_float_loss_chance() -> f32 {
        0.35
    }

    const fn default_repair_chance() -> f32 {
        0.5
    }

    /// Parse a config document; missing fields fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check every tuning invariant.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        for category in EventCategory::ALL {
            match self.draw_space.get(&category) {
                None => return Err(ConfigError::MissingDrawSpace(category)),
                Some(0) => return Err(ConfigError::ZeroDrawSpace(category)),
                Some(_) => {}
            }
        }
        if self.base_miles_per_day <= 0.0 {
            return Err(ConfigError::MinViolation {
                field: "base_miles_per_day",
                min: 0.0,
                value: self.base_miles_per_day,
            });
        }
        for pace in TravelPace::ALL {
            let factor = self.pace_factor(pace);
            if factor <= 0.0 {
                return Err(ConfigError::MinViolation {
                    field: "pace_factor",
                    min: 0.0,
                    value: factor,
                });
            }
        }
        for (field, chance) in [
            ("float_loss_chance", self.float_loss_chance),
            ("repair_chance", self.repair_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(ConfigError::RangeViolation {
                    field,
                    min: 0.0,
                    max: 1.0,
                    value: chance,
                });
            }
        }
        if !(FIRST_START_MONTH..=LAST_START_MONTH).contains(&self.start_month) {
            return Err(ConfigError::StartMonth(self.start_month));
        }
        Ok(())
    }

    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Draw space for a category; validated configs always carry one.
    #[must_use]
    pub fn draw_space(&self, category: EventCategory) -> u32 {
        self.draw_space.get(&category).copied().unwrap_or(1).max(1)
    }

    #[must_use]
    pub fn pace_factor(&self, pace: TravelPace) -> f32 {
        self.pace_factor.get(&pace).copied().unwrap_or(1.0)
    }

    #[must_use]
    pub fn food_per_person(&self, ration: RationLevel) -> i32 {
        self.food_per_person.get(&ration).copied().unwrap_or(0).max(0)
    }

    #[must_use]
    pub fn starting_cash_cents(&self, profession: Profession) -> i64 {
        self.starting_cash_cents
            .get(&profession)
            .copied()
            .unwrap_or(0)
            .max(0)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: Self::default_tick_interval_ms(),
            draw_space: Self::default_draw_space(),
            base_miles_per_day: Self::default_base_miles_per_day(),
            pace_factor: Self::default_pace_factor(),
            food_per_person: Self::default_food_per_person(),
            start_month: Self::default_start_month(),
            starting_cash_cents: Self::default_starting_cash_cents(),
            ferry_cost_cents: Self::default_ferry_cost_cents(),
            ferry_delay_days: Self::default_ferry_delay_days(),
            ford_depth_limit_ft: Self::default_ford_depth_limit_ft(),
            float_loss_chance: Self::default_float_loss_chance(),
            repair_chance: Self::default_repair_chance(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg = SimConfig::from_json(r#"{ "tick_interval_ms": 250 }"#).expect("valid config");
        assert_eq!(cfg.tick_interval(), Duration::from_millis(250));
        assert_eq!(cfg.draw_space(EventCategory::Vehicle), 100);
        assert_eq!(cfg.food_per_person(RationLevel::Filling), 3);
    }

    #[test]
    fn rejects_zero_tick_interval_and_draw_space() {
        let cfg = SimConfig {
            tick_interval_ms: 0,
            ..SimConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroTickInterval));

        let mut cfg = SimConfig::default();
        cfg.draw_space.insert(EventCategory::Wild, 0);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ZeroDrawSpace(EventCategory::Wild))
        );

        cfg.draw_space.remove(&EventCategory::Wild);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::MissingDrawSpace(EventCategory::Wild))
        );
    }

    #[test]
    fn rejects_out_of_range_chances_and_months() {
        let cfg = SimConfig {
            repair_chance: 1.5,
            ..SimConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::RangeViolation {
                field: "repair_chance",
                ..
            })
        ));

        let cfg = SimConfig {
            start_month: 12,
            ..SimConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::StartMonth(12)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            SimConfig::from_json("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }
}
