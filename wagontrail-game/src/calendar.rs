//! Linear game time: one turn is one day.
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::START_YEAR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Fall => "fall",
            Self::Winter => "winter",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    date: NaiveDate,
    days_elapsed: u32,
}

impl Calendar {
    /// Start on the first day of `month` in the departure year.
    ///
    /// Invalid months fall back to March.
    #[must_use]
    pub fn starting(month: u32) -> Self {
        let date = NaiveDate::from_ymd_opt(START_YEAR, month, 1)
            .or_else(|| NaiveDate::from_ymd_opt(START_YEAR, 3, 1))
            .unwrap_or_default();
        Self {
            date,
            days_elapsed: 0,
        }
    }

    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub const fn days_elapsed(&self) -> u32 {
        self.days_elapsed
    }

    pub fn advance_day(&mut self) {
        if let Some(next) = self.date.checked_add_days(Days::new(1)) {
            self.date = next;
        }
        self.days_elapsed = self.days_elapsed.saturating_add(1);
    }

    #[must_use]
    pub fn season(&self) -> Season {
        match self.date.month() {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Fall,
            _ => Season::Winter,
        }
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format("%B %-d, %Y"))
    }
}
