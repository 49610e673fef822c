//! Wagontrail Game Engine
//!
//! Platform-agnostic core of a turn-based wagon trail survival simulation:
//! a window/form state machine, an event director and the turn orchestrator.
//! Front-ends drive a [`GameSession`] with pulses and input lines and draw
//! the text it returns.

pub mod calendar;
pub mod config;
mod constants;
pub mod content;
pub mod director;
pub mod error;
pub mod inventory;
pub mod party;
pub mod screens;
pub mod session;
pub mod simulation;
pub mod tick;
pub mod trail;
pub mod vehicle;
pub mod window;
pub mod world;

// Re-export commonly used types
pub use calendar::{Calendar, Season};
pub use config::{ConfigError, SimConfig};
pub use content::{Content, ContentError, ContentLoader, PriceEntry, StaticContent};
pub use director::{
    EventCategory, EventDirector, EventItem, EventKey, EventNotice, EventTarget, ExecutionPolicy,
    HistoryEntry, RegisteredEvent,
};
pub use error::GameError;
pub use inventory::{Entity, Inventory, InventoryError, SimItem, format_cents};
pub use party::{Ailment, HealthLevel, Person, Profession};
pub use session::GameSession;
pub use simulation::{GameStatus, Simulation, TurnReport, WindowRequest};
pub use tick::{Pulse, TickSource};
pub use trail::{Location, LocationKind, LocationStatus, Trail};
pub use vehicle::{RationLevel, TravelPace, Vehicle, VehicleStatus};
pub use window::{FormKind, WindowKind, WindowManager};
pub use world::{PartySetup, World};
