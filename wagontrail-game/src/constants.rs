//! Centralized balance and tuning constants for the simulation.
//!
//! Values that players or front-ends may want to tweak live in
//! [`crate::config::SimConfig`]; these are the fixed limits the rest of the
//! code relies on.

// Party ---------------------------------------------------------------------
pub(crate) const PARTY_SIZE: usize = 4;
pub(crate) const PERSON_HEALTH_MAX: i32 = 100;
pub(crate) const HEALTH_FAIR_THRESHOLD: i32 = 70;
pub(crate) const HEALTH_POOR_THRESHOLD: i32 = 40;
pub(crate) const HEALTH_VERY_POOR_THRESHOLD: i32 = 15;
pub(crate) const AILMENT_DAILY_DAMAGE: i32 = 6;
pub(crate) const STARVATION_DAILY_DAMAGE: i32 = 8;
pub(crate) const BARE_BONES_DAILY_DAMAGE: i32 = 2;
pub(crate) const GRUELING_DAILY_DAMAGE: i32 = 3;
pub(crate) const REST_DAILY_HEAL: i32 = 5;
pub(crate) const FILLING_DAILY_HEAL: i32 = 1;
pub(crate) const AILMENT_RECOVERY_CHANCE: f32 = 0.08;
pub(crate) const AILMENT_RECOVERY_CHANCE_RESTING: f32 = 0.25;

// Window machinery ----------------------------------------------------------
pub(crate) const MAX_FORM_HOPS: usize = 8;
pub(crate) const MENU_PROMPT: &str = "What is your choice?";
pub(crate) const ENTER_PROMPT: &str = "Press ENTER to continue.";

// Vehicle -------------------------------------------------------------------
pub(crate) const FULL_TEAM_OXEN: i32 = 6;
pub(crate) const BROKEN_WHEEL_WEIGHT: u32 = 50;
pub(crate) const BROKEN_AXLE_WEIGHT: u32 = 30;
pub(crate) const BROKEN_TONGUE_WEIGHT: u32 = 20;

// Store ---------------------------------------------------------------------
pub(crate) const STORE_PRICE_STEP_PCT: i64 = 25;

// Calendar ------------------------------------------------------------------
pub(crate) const START_YEAR: i32 = 1848;
pub(crate) const FIRST_START_MONTH: u32 = 3;
pub(crate) const LAST_START_MONTH: u32 = 7;
