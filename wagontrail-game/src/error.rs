//! Error taxonomy for the simulation core.
//!
//! `GameError` covers configuration and catalog defects. These are never a
//! player's fault, so the window manager propagates them to the driver instead
//! of recovering. Player input problems and domain invariant rejections are
//! handled at the form or operation boundary and never become a `GameError`.

use thiserror::Error;

use crate::config::ConfigError;
use crate::content::ContentError;
use crate::director::{EventCategory, EventTarget};
use crate::window::{FormKind, WindowKind};

/// Fatal defects raised by the window/form machinery and the event director.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("no factory registered for window {0:?}")]
    UnregisteredWindow(WindowKind),
    #[error("window {window:?} has no factory for form {form:?}")]
    UnregisteredForm { window: WindowKind, form: FormKind },
    #[error("window {0:?} is already active")]
    DuplicateWindow(WindowKind),
    #[error("window {window:?} exceeded {limit} chained form transitions")]
    FormTransitionLoop { window: WindowKind, limit: usize },
    #[error("window {0:?} cannot host fired events")]
    EventRejected(WindowKind),
    #[error("event {name} is already registered under {category:?}")]
    DuplicateEvent {
        category: EventCategory,
        name: &'static str,
    },
    #[error("event {name} is not registered under {category:?}")]
    UnknownEvent {
        category: EventCategory,
        name: &'static str,
    },
    #[error("event {name} rendered no text for the player")]
    EmptyEventRender { name: &'static str },
    #[error("event {name} cannot execute against {target:?}")]
    EventTarget {
        name: &'static str,
        target: EventTarget,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Content(#[from] ContentError),
}
