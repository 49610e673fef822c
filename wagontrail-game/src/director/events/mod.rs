//! Events shipped with the core, grouped by category.
pub mod person;
pub mod river;
pub mod vehicle;
pub mod weather;
pub mod wild;
