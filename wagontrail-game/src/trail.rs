//! The trail: an ordered run of locations with distances between them.
use serde::{Deserialize, Serialize};

use crate::content::ContentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    Landmark,
    Settlement,
    RiverCrossing,
}

/// One stop as authored in the content table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub kind: LocationKind,
    /// Miles from this location to the next one; ignored for the last stop.
    #[serde(default)]
    pub distance_to_next: u32,
    /// Depth in feet, only meaningful for river crossings.
    #[serde(default)]
    pub river_depth_ft: f32,
    /// Set on the final location when the trail is built.
    #[serde(skip)]
    pub last: bool,
}

impl Location {
    #[must_use]
    pub const fn has_store(&self) -> bool {
        matches!(self.kind, LocationKind::Settlement)
    }

    #[must_use]
    pub const fn is_river(&self) -> bool {
        matches!(self.kind, LocationKind::RiverCrossing)
    }
}

/// Where the party stands relative to the current location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationStatus {
    /// Standing at the location but the arrival has not been acknowledged.
    Unreached,
    Reached,
    /// Left the location and rolling toward the next one.
    Departed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    locations: Vec<Location>,
    index: usize,
    status: LocationStatus,
    crossed: bool,
    distance_to_next: u32,
    total_miles: u32,
}

impl Trail {
    /// Build a trail from authored locations, flagging the last as final.
    ///
    /// # Errors
    ///
    /// Returns an error if no locations are provided.
    pub fn new(mut locations: Vec<Location>) -> Result<Self, ContentError> {
        let last = locations.last_mut().ok_or(ContentError::EmptyTrail)?;
        last.last = true;
        last.distance_to_next = 0;
        Ok(Self {
            locations,
            index: 0,
            status: LocationStatus::Unreached,
            crossed: false,
            distance_to_next: 0,
            total_miles: 0,
        })
    }

    #[must_use]
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    #[must_use]
    pub fn current(&self) -> &Location {
        &self.locations[self.index]
    }

    #[must_use]
    pub fn next(&self) -> Option<&Location> {
        self.locations.get(self.index + 1)
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn status(&self) -> LocationStatus {
        self.status
    }

    #[must_use]
    pub const fn distance_to_next(&self) -> u32 {
        self.distance_to_next
    }

    #[must_use]
    pub const fn total_miles(&self) -> u32 {
        self.total_miles
    }

    /// True when standing at a river that has not been crossed yet.
    #[must_use]
    pub fn needs_crossing(&self) -> bool {
        self.status == LocationStatus::Reached && self.current().is_river() && !self.crossed
    }

    /// True once the final location has been reached.
    #[must_use]
    pub fn at_final_location(&self) -> bool {
        self.status == LocationStatus::Reached && self.current().last
    }

    /// Settlements keep their store open until the party leaves.
    #[must_use]
    pub fn store_available(&self) -> bool {
        self.status != LocationStatus::Departed && self.current().has_store()
    }

    /// Acknowledge standing at the current location.
    pub fn mark_reached(&mut self) {
        if self.status == LocationStatus::Unreached {
            self.status = LocationStatus::Reached;
        }
    }

    pub fn mark_crossed(&mut self) {
        self.crossed = true;
    }

    /// Leave the current location. The final location cannot be left.
    pub fn depart(&mut self) -> bool {
        if self.status != LocationStatus::Reached || self.current().last || self.needs_crossing() {
            return false;
        }
        self.distance_to_next = self.current().distance_to_next;
        self.status = LocationStatus::Departed;
        true
    }

    /// Roll forward; returns true when the next location was reached.
    ///
    /// Miles past the location are dropped so every stop is visited.
    pub fn advance(&mut self, miles: u32) -> bool {
        if self.status != LocationStatus::Departed || miles == 0 {
            return false;
        }
        let step = miles.min(self.distance_to_next);
        self.total_miles = self.total_miles.saturating_add(step);
        self.distance_to_next -= step;
        if self.distance_to_next > 0 {
            return false;
        }
        self.index = (self.index + 1).min(self.locations.len() - 1);
        self.status = LocationStatus::Reached;
        self.crossed = false;
        true
    }
}
